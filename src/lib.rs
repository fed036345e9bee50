#[macro_use]
extern crate lazy_static;

#[macro_use]
mod macros;

pub mod lstack;
pub mod ops;
pub mod types;

pub use lstack::{AllocError, AllocErrorKind, Metrics, Stack, StackConfig, StackError};
pub use ops::{parse_script, stack_interact, ParseOpError, Reply, StackOps};
pub use types::{Count, Value};
