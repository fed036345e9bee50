pub type Value = i64;
pub type Count = usize;

/// Capacity of a freshly created stack.
pub const DEFAULT_INITIAL_CAPACITY: Count = 1;
/// Multiplier applied to the capacity on every reallocation.
pub const DEFAULT_GROWTH_FACTOR: Count = 2;
/// Largest accepted growth factor.
pub const MAX_GROWTH_FACTOR: Count = 16;
