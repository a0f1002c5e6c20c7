// Common test utilities

pub mod fakes;
pub mod tracing;
