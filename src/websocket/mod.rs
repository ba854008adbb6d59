pub mod listener;
pub mod types;

pub use listener::{LiveUpdateError, LiveUpdates};
pub use types::RefreshHint;
