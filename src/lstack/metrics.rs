use std::fmt::{self, Debug, Formatter};

use serde::{Deserialize, Serialize};

const METRICS: usize = 7;

#[derive(Debug, Clone, Copy)]
pub enum MetricType {
    Push = 0,
    Pop,
    Peek,
    Clear,
    EmptyFailure,
    Grow,
    SlotCopy,
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    all: [u64; METRICS],
}

impl Metrics {
    pub fn new() -> Self {
        Self { all: [0; METRICS] }
    }

    pub fn insert(&mut self, metric: MetricType, delta: u64) {
        self.all[metric as usize] += delta;
    }

    pub fn get(&self, metric: MetricType) -> u64 {
        self.all[metric as usize]
    }

    pub fn pushes(&self) -> u64 {
        self.get(MetricType::Push)
    }

    pub fn pops(&self) -> u64 {
        self.get(MetricType::Pop)
    }

    pub fn peeks(&self) -> u64 {
        self.get(MetricType::Peek)
    }

    pub fn clears(&self) -> u64 {
        self.get(MetricType::Clear)
    }

    /// `pop` and `peek` calls rejected because the stack was empty.
    pub fn empty_failures(&self) -> u64 {
        self.get(MetricType::EmptyFailure)
    }

    /// Number of times the backing storage was reallocated.
    pub fn grows(&self) -> u64 {
        self.get(MetricType::Grow)
    }

    /// Total slots moved into new storage across all reallocations.
    pub fn slots_copied(&self) -> u64 {
        self.get(MetricType::SlotCopy)
    }

    pub fn clear(&mut self) {
        self.all = [0; METRICS];
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Metrics {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("pushes", &self.pushes())
            .field("pops", &self.pops())
            .field("peeks", &self.peeks())
            .field("clears", &self.clears())
            .field("empty_failures", &self.empty_failures())
            .field("grows", &self.grows())
            .field("slots_copied", &self.slots_copied())
            .finish()
    }
}
