pub mod backend;
pub mod filesystem;
