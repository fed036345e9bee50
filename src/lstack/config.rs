use log::warn;
use serde::{Deserialize, Serialize};

use crate::types::{Count, DEFAULT_GROWTH_FACTOR, DEFAULT_INITIAL_CAPACITY, MAX_GROWTH_FACTOR};

/// Construction-time settings for a [`Stack`](super::Stack).
///
/// Builder methods assert their arguments. Configs that come in through
/// serde are not checked on the way in; [`StackConfig::normalized`] clamps
/// out-of-range fields into range before a stack is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub initial_capacity: Count,
    pub growth_factor: Count,
    pub max_capacity: Option<Count>,
    pub metrics: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            max_capacity: None,
            metrics: false,
        }
    }
}

impl StackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capacity(mut self, capacity: Count) -> Self {
        assert_ne!(capacity, 0);
        if let Some(max) = self.max_capacity {
            assert!(capacity <= max);
        }
        self.initial_capacity = capacity;
        self
    }

    pub fn with_growth_factor(mut self, factor: Count) -> Self {
        assert!(factor >= 2);
        assert!(factor <= MAX_GROWTH_FACTOR);
        self.growth_factor = factor;
        self
    }

    pub fn with_max_capacity(mut self, max: Count) -> Self {
        assert!(max >= self.initial_capacity);
        self.max_capacity = Some(max);
        self
    }

    pub fn with_metrics(mut self) -> Self {
        self.metrics = true;
        self
    }

    pub fn normalized(mut self) -> Self {
        if self.initial_capacity < 1 {
            warn!(
                "initial_capacity {} is below 1, using 1",
                self.initial_capacity
            );
            self.initial_capacity = 1;
        }
        if self.growth_factor < 2 {
            warn!("growth_factor {} is below 2, using 2", self.growth_factor);
            self.growth_factor = 2;
        }
        if self.growth_factor > MAX_GROWTH_FACTOR {
            warn!(
                "growth_factor {} is above {}, using {}",
                self.growth_factor, MAX_GROWTH_FACTOR, MAX_GROWTH_FACTOR
            );
            self.growth_factor = MAX_GROWTH_FACTOR;
        }
        if let Some(max) = self.max_capacity {
            if max < self.initial_capacity {
                warn!(
                    "max_capacity {} is below initial_capacity {}, raising it",
                    max, self.initial_capacity
                );
                self.max_capacity = Some(self.initial_capacity);
            }
        }
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = StackConfig::new();
        assert_eq!(config.initial_capacity, 1);
        assert_eq!(config.growth_factor, 2);
        assert_eq!(config.max_capacity, None);
        assert!(!config.metrics);
        assert_eq!(config.normalized(), config);
    }

    #[test]
    fn normalize_out_of_range() {
        let config = StackConfig {
            initial_capacity: 0,
            growth_factor: 1,
            max_capacity: Some(0),
            metrics: true,
        }
        .normalized();
        assert_eq!(config.initial_capacity, 1);
        assert_eq!(config.growth_factor, 2);
        assert_eq!(config.max_capacity, Some(1));
        assert!(config.metrics);
    }

    #[test]
    #[should_panic]
    fn builder_rejects_zero_capacity() {
        let _ = StackConfig::new().with_initial_capacity(0);
    }

    #[test]
    #[should_panic]
    fn builder_rejects_linear_growth() {
        let _ = StackConfig::new().with_growth_factor(1);
    }

    #[test]
    #[should_panic]
    fn builder_rejects_oversized_growth() {
        let _ = StackConfig::new().with_growth_factor(MAX_GROWTH_FACTOR + 1);
    }

    #[test]
    fn normalize_caps_growth_factor() {
        let config = StackConfig {
            growth_factor: 1 << 20,
            ..StackConfig::default()
        }
        .normalized();
        assert_eq!(config.growth_factor, MAX_GROWTH_FACTOR);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("max_capacity".to_string(), 16_u64);
        let bytes = serde_cbor::to_vec(&fields).unwrap();
        let config: StackConfig = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(config, StackConfig::new().with_max_capacity(16));
    }
}
