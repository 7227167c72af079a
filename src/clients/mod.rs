pub mod backend;
pub mod rest;

pub use backend::{Backend, BackendError, ProgressFn};
pub use rest::RestBackend;
