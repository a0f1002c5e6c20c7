pub mod log_dirs;
pub mod process_backend;
pub mod time_source;
#[cfg(feature = "runtime")]
pub mod tracing_setup;
