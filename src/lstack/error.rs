use std::error::Error;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::types::Count;

/// Why the backing storage could not be grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocErrorKind {
    /// The next capacity does not fit in `usize`.
    CapacityOverflow,
    /// The stack already holds `limit` slots, its configured maximum.
    LimitReached { limit: Count },
    /// The allocator refused the reservation.
    OutOfMemory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocError {
    /// Capacity, in slots, that was being reserved.
    pub requested: Count,
    pub kind: AllocErrorKind,
}

impl AllocError {
    pub fn new(requested: Count, kind: AllocErrorKind) -> Self {
        Self { requested, kind }
    }
}

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            AllocErrorKind::CapacityOverflow => {
                write!(f, "stack capacity overflow while growing past {} slots", self.requested)
            }
            AllocErrorKind::LimitReached { limit } => write!(
                f,
                "stack is full: capacity limit of {} slots reached",
                limit
            ),
            AllocErrorKind::OutOfMemory => write!(
                f,
                "allocation of {} stack slots failed",
                self.requested
            ),
        }
    }
}

impl Error for AllocError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackError {
    /// `pop` or `peek` was called on a stack that holds no values.
    EmptyStack,
    /// Backing storage could not be grown.
    Alloc(AllocError),
}

impl StackError {
    pub fn is_empty_stack(&self) -> bool {
        matches!(self, StackError::EmptyStack)
    }
}

impl From<AllocError> for StackError {
    fn from(err: AllocError) -> StackError {
        StackError::Alloc(err)
    }
}

impl Display for StackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StackError::EmptyStack => write!(f, "stack is empty"),
            StackError::Alloc(err) => write!(f, "{}", err),
        }
    }
}

impl Error for StackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StackError::EmptyStack => None,
            StackError::Alloc(err) => Some(err),
        }
    }
}
