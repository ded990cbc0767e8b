use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::denomination::Denomination;

/// Running count of identified coins and their value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinTally {
    counts: BTreeMap<Denomination, usize>,
    coins: usize,
    total_cents: u64,
}

impl CoinTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, denomination: Denomination) {
        *self.counts.entry(denomination).or_insert(0) += 1;
        self.coins += 1;
        self.total_cents += u64::from(denomination.cents());
    }

    pub fn count(&self, denomination: Denomination) -> usize {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    /// Per-denomination counts, smallest value first. Denominations never
    /// seen are absent.
    pub fn counts(&self) -> &BTreeMap<Denomination, usize> {
        &self.counts
    }

    pub fn coins(&self) -> usize {
        self.coins
    }

    pub fn total_cents(&self) -> u64 {
        self.total_cents
    }

    /// Total in currency units.
    pub fn total_value(&self) -> f64 {
        self.total_cents as f64 / 100.0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
