use std::env;

use crate::core::system_info::types::{ProxySettings, ProxyUpdate};

const HTTP_PROXY: &str = "http_proxy";
const HTTPS_PROXY: &str = "https_proxy";

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

pub fn current() -> ProxySettings {
    ProxySettings {
        http: read_var(HTTP_PROXY),
        https: read_var(HTTPS_PROXY),
    }
}

/// Set or clear one variable; values the environment cannot hold are refused
fn apply(name: &str, value: &str) -> bool {
    if value.is_empty() {
        env::remove_var(name);
        return true;
    }
    if value.contains('\0') {
        log::warn!("Refusing {} value containing a NUL byte", name);
        return false;
    }
    env::set_var(name, value);
    true
}

/// Update the proxy variables of this process; an empty value removes one
pub fn set_proxy(http: &str, https: &str) -> ProxyUpdate {
    let http_ok = apply(HTTP_PROXY, http);
    let https_ok = apply(HTTPS_PROXY, https);
    let ok = http_ok && https_ok;

    ProxyUpdate {
        ok,
        http_proxy: http.to_string(),
        https_proxy: https.to_string(),
        error: (!ok).then(|| "failed_to_set_proxy".to_string()),
    }
}
