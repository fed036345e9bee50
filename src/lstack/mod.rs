pub mod config;
pub mod error;
pub mod metrics;
pub mod stack;
pub mod store;

pub use config::StackConfig;
pub use error::{AllocError, AllocErrorKind, StackError};
pub use metrics::Metrics;
pub use stack::Stack;
