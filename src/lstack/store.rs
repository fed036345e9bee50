use std::cmp;
use std::mem;

use log::warn;

use super::error::{AllocError, AllocErrorKind};
use crate::types::{Count, Value};

/// Largest slot count a single allocation may describe.
pub const MAX_SLOTS: Count = isize::MAX as usize / mem::size_of::<Value>();

/// Fixed-capacity block of value slots.
///
/// The block never tracks which slots are in use; its owner keeps the
/// occupancy count. Growing replaces the block with a larger one and moves
/// the leading `filled` slots across, so their indices are preserved.
#[derive(Clone)]
pub struct Slots {
    data: Box<[Value]>,
}

impl Slots {
    /// One-slot block.
    pub fn new() -> Self {
        Self {
            data: vec![0; 1].into_boxed_slice(),
        }
    }

    pub fn with_capacity(capacity: Count) -> Result<Self, AllocError> {
        Ok(Self {
            data: allocate(capacity)?,
        })
    }

    pub fn capacity(&self) -> Count {
        self.data.len()
    }

    pub fn get(&self, index: Count) -> Value {
        self.data[index]
    }

    pub fn set(&mut self, index: Count, value: Value) {
        self.data[index] = value;
    }

    /// The leading `filled` slots.
    pub fn filled(&self, filled: Count) -> &[Value] {
        &self.data[..filled]
    }

    /// Capacity the next reallocation should request.
    pub fn next_capacity(&self, factor: Count, limit: Option<Count>) -> Result<Count, AllocError> {
        next_capacity(self.capacity(), factor, limit)
    }

    /// Replaces the block with a larger one and moves the leading `filled`
    /// slots across. Returns the new capacity.
    ///
    /// If the allocator refuses the geometric size, a block with a single
    /// extra slot is tried before giving up. On failure the current block is
    /// left untouched.
    pub fn grow(
        &mut self,
        factor: Count,
        limit: Option<Count>,
        filled: Count,
    ) -> Result<Count, AllocError> {
        self.grow_with(factor, limit, filled, allocate)
    }

    fn grow_with<F>(
        &mut self,
        factor: Count,
        limit: Option<Count>,
        filled: Count,
        mut alloc: F,
    ) -> Result<Count, AllocError>
    where
        F: FnMut(Count) -> Result<Box<[Value]>, AllocError>,
    {
        debug_assert!(filled <= self.capacity());
        let target = self.next_capacity(factor, limit)?;
        let minimum = self.capacity() + 1;
        let mut data = match alloc(target) {
            Ok(data) => data,
            Err(err) if err.kind == AllocErrorKind::OutOfMemory && target > minimum => {
                warn!("{}, retrying with {} slots", err, minimum);
                alloc(minimum)?
            }
            Err(err) => return Err(err),
        };
        data[..filled].copy_from_slice(&self.data[..filled]);
        self.data = data;
        Ok(self.capacity())
    }
}

impl Default for Slots {
    fn default() -> Self {
        Self::new()
    }
}

/// Multiplies `current` by `factor`, adds at least one slot and never
/// exceeds `limit` or [`MAX_SLOTS`].
fn next_capacity(current: Count, factor: Count, limit: Option<Count>) -> Result<Count, AllocError> {
    if let Some(limit) = limit {
        if current >= limit {
            return Err(AllocError::new(
                current + 1,
                AllocErrorKind::LimitReached { limit },
            ));
        }
    }
    if current >= MAX_SLOTS {
        return Err(AllocError::new(
            current.saturating_add(1),
            AllocErrorKind::CapacityOverflow,
        ));
    }
    let next = cmp::max(current.saturating_mul(factor), current + 1);
    let next = cmp::min(next, MAX_SLOTS);
    Ok(match limit {
        Some(limit) => cmp::min(next, limit),
        None => next,
    })
}

fn allocate(capacity: Count) -> Result<Box<[Value]>, AllocError> {
    if capacity > MAX_SLOTS {
        return Err(AllocError::new(capacity, AllocErrorKind::CapacityOverflow));
    }
    let mut data = Vec::new();
    data.try_reserve_exact(capacity)
        .map_err(|_| AllocError::new(capacity, AllocErrorKind::OutOfMemory))?;
    data.resize(capacity, 0);
    Ok(data.into_boxed_slice())
}
