//! Lifecycle announcement adapters.

mod file_notifier;

pub use file_notifier::FileNotifier;
