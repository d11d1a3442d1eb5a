pub mod bridge;
pub mod manager;

pub use bridge::Severity;
pub use manager::BrowserManager;
