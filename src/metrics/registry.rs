use std::collections::HashMap;

use parking_lot::RwLock;

use super::Metric;
use crate::error::{Error, Result};

// ─── Source trait ────────────────────────────────────────────────

/// Anything the reporter can pull `(name, instrument)` pairs from.
///
/// Order is unspecified and may differ between calls. Implementations
/// must be safe to call while other threads register or update
/// instruments.
pub trait MetricSource {
    type Entries: IntoIterator<Item = (String, Metric)>;

    fn entries(&self) -> Self::Entries;
}

/// Fixed fixture: always yields the same entries in the same order.
impl MetricSource for Vec<(String, Metric)> {
    type Entries = Vec<(String, Metric)>;

    fn entries(&self) -> Self::Entries {
        self.clone()
    }
}

// ─── Registry ────────────────────────────────────────────────────

/// Thread-safe name → instrument map.
#[derive(Debug, Default)]
pub struct Registry {
    metrics: RwLock<HashMap<String, Metric>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `metric` under `name`. Fails if the name is taken.
    pub fn register(&self, name: impl Into<String>, metric: impl Into<Metric>) -> Result<()> {
        let name = name.into();
        let mut metrics = self.metrics.write();
        if metrics.contains_key(&name) {
            return Err(Error::DuplicateMetric(name));
        }
        metrics.insert(name, metric.into());
        Ok(())
    }

    /// Return the instrument under `name`, registering the one built by
    /// `make` if there is none yet.
    pub fn get_or_register<F, M>(&self, name: &str, make: F) -> Metric
    where
        F: FnOnce() -> M,
        M: Into<Metric>,
    {
        if let Some(existing) = self.metrics.read().get(name) {
            return existing.clone();
        }
        self.metrics
            .write()
            .entry(name.to_owned())
            .or_insert_with(|| make().into())
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Metric> {
        self.metrics.read().get(name).cloned()
    }

    pub fn unregister(&self, name: &str) -> Option<Metric> {
        self.metrics.write().remove(name)
    }

    pub fn len(&self) -> usize {
        self.metrics.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.read().is_empty()
    }
}

/// Entries are copied out so the lock is released before any rendering.
impl MetricSource for Registry {
    type Entries = Vec<(String, Metric)>;

    fn entries(&self) -> Self::Entries {
        self.metrics
            .read()
            .iter()
            .map(|(name, metric)| (name.clone(), metric.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Counter, Gauge};
    use std::sync::Arc;

    #[test]
    fn test_register_rejects_duplicate_name() {
        let r = Registry::new();
        r.register("requests", Arc::new(Counter::new())).unwrap();

        let err = r.register("requests", Arc::new(Gauge::new())).unwrap_err();
        assert!(matches!(err, Error::DuplicateMetric(ref n) if n == "requests"));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn test_get_or_register_returns_existing() {
        let r = Registry::new();
        let first = Arc::new(Counter::new());
        first.inc(3);
        r.register("hits", first).unwrap();

        let got = r.get_or_register("hits", || Arc::new(Counter::new()));
        match got {
            Metric::Counter(c) => assert_eq!(c.count(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_entries_is_a_copy() {
        let r = Registry::new();
        r.register("a", Arc::new(Counter::new())).unwrap();
        let entries = r.entries();

        r.register("b", Arc::new(Counter::new())).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(r.entries().len(), 2);

        assert!(r.unregister("a").is_some());
        assert!(r.get("a").is_none());
    }
}
