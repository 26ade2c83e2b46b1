//! Resolver implementations

mod process;

pub use process::ProcessResolver;
