//! Keyed series accumulation

use std::collections::HashMap;

use crate::data::SeriesPoint;

/// Collects points per key, remembering the order keys were first seen
#[derive(Debug, Default)]
pub struct SeriesAccumulator {
    order: Vec<String>,
    series: HashMap<String, Vec<SeriesPoint>>,
}

impl SeriesAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, point: SeriesPoint) {
        match self.series.get_mut(key) {
            Some(points) => points.push(point),
            None => {
                self.order.push(key.to_string());
                self.series.insert(key.to_string(), vec![point]);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(key, points)` pairs in first-seen key order
    pub fn into_series(mut self) -> Vec<(String, Vec<SeriesPoint>)> {
        self.order
            .into_iter()
            .map(|key| {
                let points = self.series.remove(&key).unwrap_or_default();
                (key, points)
            })
            .collect()
    }
}
