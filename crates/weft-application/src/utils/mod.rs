//! Application utilities

mod timing;

pub use timing::TimedOperation;
