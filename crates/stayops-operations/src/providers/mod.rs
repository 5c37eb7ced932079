mod json_file;
mod memory;
mod notifier;

pub use json_file::JsonFileStore;
pub use memory::{InMemoryStore, StoreState};
pub use notifier::TracingNotifier;
pub use stayops_saga::SystemClock;
