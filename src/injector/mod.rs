pub mod catalog;
pub mod engine;
pub mod events;
pub mod scripts;

pub use engine::{copy_to_clipboard, find_target, insert_text, InjectError, InjectionOutcome};
pub use scripts::TargetInfo;
