//! Infrastructure layer - External process, cache, codec and observability implementations

pub mod cache;
pub mod observability;
pub mod resolver;
pub mod services;
