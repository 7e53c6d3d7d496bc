//! C ABI.
//!
//! Every getter returns a heap-allocated, NUL-terminated UTF-8 JSON string
//! that the caller must hand back to [`hs_free_string`]. Errors and panics
//! never cross the boundary; they become `{"error":"internal_error"}`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, UnwindSafe};

use once_cell::sync::Lazy;

use crate::core::{Config, Telemetry};
use crate::error::Result;
use crate::ui::json::error_payload;

static TELEMETRY: Lazy<Telemetry> = Lazy::new(|| {
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Using default configuration: {:#}", e);
        Config::default()
    });
    Telemetry::new(config)
});

const INTERNAL_ERROR: &str = "internal_error";

fn into_raw(json: String) -> *mut c_char {
    match CString::new(json) {
        Ok(c_string) => c_string.into_raw(),
        // serde_json escapes NUL, so this only guards hand-built payloads
        Err(_) => CString::new(error_payload(INTERNAL_ERROR))
            .map(CString::into_raw)
            .unwrap_or(std::ptr::null_mut()),
    }
}

/// Run `produce`, mapping failures and panics to the error payload
fn guarded<F>(produce: F) -> *mut c_char
where
    F: FnOnce() -> Result<String> + UnwindSafe,
{
    let json = match panic::catch_unwind(produce) {
        Ok(Ok(json)) => json,
        Ok(Err(e)) => {
            log::warn!("FFI call failed: {}", e);
            error_payload(e.code())
        }
        Err(_) => {
            log::error!("FFI call panicked");
            error_payload(INTERNAL_ERROR)
        }
    };
    into_raw(json)
}

/// Borrow a C string argument; NULL reads as empty
///
/// # Safety
/// `ptr` must be NULL or point to a NUL-terminated string valid for the call.
unsafe fn arg_to_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

#[no_mangle]
pub extern "C" fn hs_get_system_summary() -> *mut c_char {
    guarded(|| TELEMETRY.summary_json())
}

#[no_mangle]
pub extern "C" fn hs_get_cpu_info() -> *mut c_char {
    guarded(|| TELEMETRY.cpu_info_json())
}

#[no_mangle]
pub extern "C" fn hs_get_cpu_usage() -> *mut c_char {
    guarded(|| TELEMETRY.cpu_usage_json())
}

#[no_mangle]
pub extern "C" fn hs_get_gpu_info() -> *mut c_char {
    guarded(|| TELEMETRY.gpu_info_json())
}

#[no_mangle]
pub extern "C" fn hs_get_memory_info() -> *mut c_char {
    guarded(|| TELEMETRY.memory_info_json())
}

#[no_mangle]
pub extern "C" fn hs_get_disk_info() -> *mut c_char {
    guarded(|| TELEMETRY.disk_info_json())
}

#[no_mangle]
pub extern "C" fn hs_get_network_info() -> *mut c_char {
    guarded(|| TELEMETRY.network_json())
}

#[no_mangle]
pub extern "C" fn hs_get_drivers_info() -> *mut c_char {
    guarded(|| TELEMETRY.drivers_json())
}

#[no_mangle]
pub extern "C" fn hs_get_performance_history() -> *mut c_char {
    guarded(|| TELEMETRY.performance_history_json())
}

/// Set or clear the proxy environment variables of the process.
///
/// # Safety
/// Each argument must be NULL or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn hs_set_proxy(http: *const c_char, https: *const c_char) -> *mut c_char {
    let http = arg_to_string(http);
    let https = arg_to_string(https);
    guarded(move || TELEMETRY.set_proxy_json(&http, &https))
}

/// Release a string returned by any `hs_*` function. NULL is ignored.
///
/// # Safety
/// `ptr` must come from this library and must not be freed twice.
#[no_mangle]
pub unsafe extern "C" fn hs_free_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    drop(CString::from_raw(ptr));
}
