pub mod collector;
pub mod cpu;
pub mod drivers;
pub mod gpu;
pub mod memory;
pub mod network;
pub mod os;
pub mod proxy;
pub mod storage;
pub mod types;

pub use collector::{collect_summary, SampledSections};
pub use types::*;
