//! Background side of the app: runs jobs and the clipboard watcher

pub mod actor;
pub mod messages;

pub use actor::{BackendActor, BackendConfig};
pub use messages::{BackendCommand, BackendEvent};
