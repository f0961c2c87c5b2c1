pub mod client;
pub mod types;

pub use client::{ProbeOutcome, TasmotaClient};
pub use types::DeviceSnapshot;
