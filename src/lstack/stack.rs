use std::cell::Cell;
use std::fmt::{self, Debug, Display, Formatter};

use log::{debug, trace, warn};

use super::config::StackConfig;
use super::error::{AllocError, StackError};
use super::metrics::{MetricType, Metrics};
use super::store::Slots;
use crate::types::{Count, Value, DEFAULT_GROWTH_FACTOR};

/// Last-in-first-out stack of integers backed by one contiguous block.
///
/// Pushing into a full block reallocates it geometrically, so a run of `n`
/// pushes costs `O(n)` copying overall. Popping never shrinks the block and
/// [`clear`](Stack::clear) keeps it for reuse.
///
/// A `Stack` has no internal locking. It can be moved to another thread,
/// but shared use needs an outer mutex.
#[derive(Clone)]
pub struct Stack {
    slots: Slots,
    count: Count,
    growth_factor: Count,
    max_capacity: Option<Count>,
    metrics: Cell<Option<Metrics>>,
}

impl Stack {
    /// Empty stack with room for one value.
    pub fn new() -> Stack {
        Stack {
            slots: Slots::new(),
            count: 0,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            max_capacity: None,
            metrics: Cell::new(None),
        }
    }

    pub fn with_config(config: StackConfig) -> Result<Stack, StackError> {
        let config = config.normalized();
        let slots = Slots::with_capacity(config.initial_capacity).map_err(|err| {
            warn!("{}", err);
            err
        })?;
        let metrics = if config.metrics {
            Some(Metrics::new())
        } else {
            None
        };
        Ok(Stack {
            slots,
            count: 0,
            growth_factor: config.growth_factor,
            max_capacity: config.max_capacity,
            metrics: Cell::new(metrics),
        })
    }

    /// Turns counters on. Counters that are already running are kept.
    pub fn with_metrics(self) -> Self {
        if self.metrics.get().is_none() {
            self.metrics.set(Some(Metrics::new()));
        }
        self
    }

    pub fn metrics(&self) -> Option<Metrics> {
        self.metrics.get()
    }

    /// Zeroes the counters, if they are on.
    pub fn reset_metrics(&mut self) {
        if let Some(mut metrics) = self.metrics.get() {
            metrics.clear();
            self.metrics.set(Some(metrics));
        }
    }

    fn record(&self, metric: MetricType, delta: u64) {
        if let Some(mut metrics) = self.metrics.get() {
            metrics.insert(metric, delta);
            self.metrics.set(Some(metrics));
        }
    }

    fn grow(&mut self) -> Result<(), AllocError> {
        let from = self.slots.capacity();
        match self
            .slots
            .grow(self.growth_factor, self.max_capacity, self.count)
        {
            Ok(to) => {
                debug!("grew stack storage from {} to {} slots", from, to);
                self.record(MetricType::Grow, 1);
                self.record(MetricType::SlotCopy, self.count as u64);
                Ok(())
            }
            Err(err) => {
                warn!("{}", err);
                Err(err)
            }
        }
    }

    /// Pushes `value` on top and returns the new size.
    ///
    /// Fails only when the storage has to grow and cannot; the stack is
    /// unchanged in that case.
    pub fn push(&mut self, value: Value) -> Result<Count, StackError> {
        if self.count == self.slots.capacity() {
            self.grow()?;
        }
        self.slots.set(self.count, value);
        self.count += 1;
        self.record(MetricType::Push, 1);
        Ok(self.count)
    }

    pub fn pop(&mut self) -> Result<Value, StackError> {
        if self.is_empty() {
            self.record(MetricType::EmptyFailure, 1);
            return Err(StackError::EmptyStack);
        }
        self.count -= 1;
        self.record(MetricType::Pop, 1);
        Ok(self.slots.get(self.count))
    }

    pub fn peek(&self) -> Result<Value, StackError> {
        if self.is_empty() {
            self.record(MetricType::EmptyFailure, 1);
            return Err(StackError::EmptyStack);
        }
        self.record(MetricType::Peek, 1);
        Ok(self.slots.get(self.count - 1))
    }

    pub fn size(&self) -> Count {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Slots currently allocated, always at least one.
    pub fn capacity(&self) -> Count {
        self.slots.capacity()
    }

    /// Drops every value but keeps the allocated storage.
    pub fn clear(&mut self) {
        trace!("clearing {} values from stack", self.count);
        self.count = 0;
        self.record(MetricType::Clear, 1);
    }

    fn values(&self) -> &[Value] {
        self.slots.filled(self.count)
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Stack {
    fn eq(&self, other: &Self) -> bool {
        self.values() == other.values()
    }
}

impl Eq for Stack {}

impl Display for Stack {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.values().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl Debug for Stack {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("values", &self.values())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lstack::error::AllocErrorKind;
    use crate::types::MAX_GROWTH_FACTOR;
    use quickcheck::quickcheck;
    use rand::Rng;

    #[test]
    fn push_pop_peek_scenario() {
        let mut s = Stack::new();
        assert_eq!(s.push(5), Ok(1));
        assert_eq!(s.push(3), Ok(2));
        assert_eq!(s.push(8), Ok(3));
        assert_eq!(s.size(), 3);
        assert_eq!(s.pop(), Ok(8));
        assert_eq!(s.size(), 2);
        assert_eq!(s.peek(), Ok(3));
        assert_eq!(s.size(), 2);
        assert_eq!(s.pop(), Ok(3));
        assert_eq!(s.pop(), Ok(5));
        assert!(s.is_empty());
        assert_eq!(s.pop(), Err(StackError::EmptyStack));
    }

    #[test]
    fn clear_fresh_stack() {
        let mut s = Stack::new();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.size(), 0);
        assert_eq!(s.capacity(), 1);
    }

    #[test]
    fn empty_failures_keep_size() {
        let mut s = Stack::new().with_metrics();
        assert!(s.peek().unwrap_err().is_empty_stack());
        assert!(s.pop().unwrap_err().is_empty_stack());
        assert_eq!(s.size(), 0);
        s.push(0).unwrap();
        assert_eq!(s.peek(), Ok(0));
        assert_eq!(s.metrics().unwrap().empty_failures(), 2);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut s = Stack::new().with_metrics();
        for i in 0..10 {
            s.push(i).unwrap();
        }
        let capacity = s.capacity();
        let grows = s.metrics().unwrap().grows();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.capacity(), capacity);
        for i in 0..10 {
            s.push(i * 2).unwrap();
        }
        assert_eq!(s.metrics().unwrap().grows(), grows);
        assert_eq!(s.pop(), Ok(18));
    }

    #[test]
    fn stored_zero_is_not_empty() {
        let mut s = Stack::new();
        s.push(0).unwrap();
        assert_eq!(s.pop(), Ok(0));
        assert_eq!(s.pop(), Err(StackError::EmptyStack));
    }

    #[test]
    fn growth_is_geometric() {
        const N: usize = 100_000;
        let mut rng = rand::thread_rng();
        let values: Vec<Value> = (0..N).map(|_| rng.gen()).collect();

        let mut s = Stack::new().with_metrics();
        for value in &values {
            s.push(*value).unwrap();
        }
        assert_eq!(s.size(), N);
        assert_eq!(s.capacity(), 131_072);

        let metrics = s.metrics().unwrap();
        assert_eq!(metrics.grows(), 17);
        assert!(metrics.slots_copied() < 2 * N as u64);

        for value in values.iter().rev() {
            assert_eq!(s.pop(), Ok(*value));
        }
        assert!(s.is_empty());
    }

    #[test]
    fn custom_growth_factor() {
        let config = StackConfig::new()
            .with_initial_capacity(4)
            .with_growth_factor(3)
            .with_metrics();
        let mut s = Stack::with_config(config).unwrap();
        assert_eq!(s.capacity(), 4);
        for i in 0..5 {
            s.push(i).unwrap();
        }
        assert_eq!(s.capacity(), 12);
        assert_eq!(s.metrics().unwrap().grows(), 1);
        assert_eq!(s.metrics().unwrap().slots_copied(), 4);
    }

    #[test]
    fn capacity_limit_fails_push() {
        let config = StackConfig::new().with_max_capacity(4);
        let mut s = Stack::with_config(config).unwrap();
        for i in 1..=4 {
            assert_eq!(s.push(i), Ok(i as Count));
        }
        assert_eq!(s.capacity(), 4);
        match s.push(5) {
            Err(StackError::Alloc(err)) => {
                assert_eq!(err.kind, AllocErrorKind::LimitReached { limit: 4 })
            }
            other => panic!("unexpected push result {:?}", other),
        }
        assert_eq!(s.size(), 4);
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.peek(), Ok(4));
        assert_eq!(s.to_string(), "[1, 2, 3, 4]");
    }

    #[test]
    fn huge_growth_factor_still_grows() {
        let config = StackConfig {
            growth_factor: usize::MAX,
            ..StackConfig::default()
        };
        let mut s = Stack::with_config(config).unwrap();
        assert_eq!(s.push(1), Ok(1));
        assert_eq!(s.push(2), Ok(2));
        assert_eq!(s.capacity(), MAX_GROWTH_FACTOR);
        assert_eq!(s.to_string(), "[1, 2]");
    }

    #[test]
    fn with_metrics_keeps_running_counters() {
        let config = StackConfig::new().with_metrics();
        let mut s = Stack::with_config(config).unwrap();
        s.push(1).unwrap();
        s.push(2).unwrap();
        let s = s.with_metrics();
        let metrics = s.metrics().unwrap();
        assert_eq!(metrics.pushes(), 2);
        assert_eq!(metrics.grows(), 1);
    }

    #[test]
    fn reset_metrics_zeroes_counters() {
        let mut s = Stack::new().with_metrics();
        s.push(1).unwrap();
        s.pop().unwrap();
        s.reset_metrics();
        assert_eq!(s.metrics(), Some(Metrics::new()));
        s.push(3).unwrap();
        assert_eq!(s.metrics().unwrap().pushes(), 1);

        let mut plain = Stack::new();
        plain.reset_metrics();
        assert_eq!(plain.metrics(), None);
    }

    #[test]
    fn oversized_initial_capacity_fails() {
        let config = StackConfig {
            initial_capacity: usize::MAX,
            ..StackConfig::default()
        };
        match Stack::with_config(config) {
            Err(StackError::Alloc(err)) => {
                assert_eq!(err.kind, AllocErrorKind::CapacityOverflow)
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn equality_ignores_capacity() {
        let mut a = Stack::new();
        let mut b = Stack::with_config(StackConfig::new().with_initial_capacity(32)).unwrap();
        for i in [1, 2, 3] {
            a.push(i).unwrap();
            b.push(i).unwrap();
        }
        b.push(4).unwrap();
        assert_ne!(a, b);
        b.pop().unwrap();
        assert_eq!(a, b);
        assert_ne!(a.capacity(), b.capacity());
    }

    #[test]
    fn display_bottom_to_top() {
        let mut s = Stack::new();
        assert_eq!(s.to_string(), "[]");
        s.push(5).unwrap();
        s.push(-3).unwrap();
        assert_eq!(s.to_string(), "[5, -3]");
    }

    quickcheck! {
        fn prop_lifo(values: Vec<Value>) -> bool {
            let mut s = Stack::new();
            for value in &values {
                s.push(*value).unwrap();
            }
            let popped: Vec<Value> = (0..values.len()).map(|_| s.pop().unwrap()).collect();
            popped.into_iter().eq(values.into_iter().rev()) && s.is_empty()
        }

        fn prop_size_after_pops(values: Vec<Value>, pops: usize) -> bool {
            let mut s = Stack::new();
            for value in &values {
                s.push(*value).unwrap();
            }
            let pops = pops % (values.len() + 1);
            for _ in 0..pops {
                s.pop().unwrap();
            }
            s.size() == values.len() - pops && s.is_empty() == (s.size() == 0)
        }

        fn prop_peek_is_idempotent(values: Vec<Value>) -> bool {
            let mut s = Stack::new();
            for value in &values {
                s.push(*value).unwrap();
            }
            let size = s.size();
            let first = s.peek();
            let second = s.peek();
            first == second && s.size() == size && first.ok() == values.last().copied()
        }

        fn prop_clear_then_push(values: Vec<Value>, next: Value) -> bool {
            let mut s = Stack::new();
            for value in &values {
                s.push(*value).unwrap();
            }
            let capacity = s.capacity();
            s.clear();
            s.size() == 0
                && s.is_empty()
                && s.capacity() == capacity
                && s.push(next) == Ok(1)
                && s.peek() == Ok(next)
        }
    }
}
