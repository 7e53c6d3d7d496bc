// Output formatting module

pub mod json;

// Re-export commonly used items for cleaner imports
pub use json::{error_payload, to_json, two_decimals};
