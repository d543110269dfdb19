//! The single seeded random source every generation function draws from.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::errors::GenerationError;

const MILLIS_PER_DAY: i64 = 86_400_000;
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Seeded RNG plus the fixed clock relative dates are measured from.
#[derive(Debug)]
pub struct SeededRng {
    rng: ChaCha8Rng,
    now: DateTime<Utc>,
}

impl SeededRng {
    pub fn new(seed: u64, now: DateTime<Utc>) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Uniform integer in `min..=max`.
    pub fn int(&mut self, min: u32, max: u32) -> u32 {
        self.rng.gen_range(min..=max)
    }

    /// Uniform index into a collection of `len` elements. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }

    /// Uniform value in `min..=max` on a grid of `10^-places`.
    ///
    /// Draws an integer number of steps and scales it with decimal arithmetic,
    /// so `0.15` comes back as exactly the `f64` nearest to 0.15.
    pub fn decimal(&mut self, min: f64, max: f64, places: u32) -> f64 {
        let scale = 10_f64.powi(places as i32);
        let steps = ((max - min) * scale).round().max(0.0) as i64;
        let drawn = self.rng.gen_range(0..=steps);
        let base = Decimal::from_f64(min).unwrap_or(Decimal::ZERO);
        (base + Decimal::new(drawn, places)).round_dp(places).to_f64().unwrap_or(min)
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Fixed word lists are never empty; an empty one yields `""`.
    pub fn word(&mut self, words: &[&'static str]) -> &'static str {
        words.choose(&mut self.rng).copied().unwrap_or_default()
    }

    /// Up to `amount` distinct elements, in random order.
    pub fn sample<'a, T>(&mut self, items: &'a [T], amount: usize) -> Vec<&'a T> {
        items.choose_multiple(&mut self.rng, amount).collect()
    }

    pub fn weighted<T: Copy>(&mut self, table: &WeightedTable<T>) -> T {
        table.options[table.index.sample(&mut self.rng)]
    }

    /// An instant within the last `days` days.
    pub fn recent(&mut self, days: u32) -> DateTime<Utc> {
        let span = i64::from(days) * MILLIS_PER_DAY;
        self.now - Duration::milliseconds(self.rng.gen_range(0..=span))
    }

    /// An instant within the last `years` years (365-day years).
    pub fn past(&mut self, years: u32) -> DateTime<Utc> {
        self.recent(years * 365)
    }

    pub fn alphanumeric(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| char::from(ALPHANUMERIC[self.rng.gen_range(0..ALPHANUMERIC.len())]))
            .collect()
    }

    pub fn digits(&mut self, len: usize) -> String {
        (0..len).map(|_| char::from(b'0' + self.rng.gen_range(0..10u8))).collect()
    }
}

/// Categorical distribution over a fixed set of options.
#[derive(Clone, Debug)]
pub struct WeightedTable<T> {
    options: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> WeightedTable<T> {
    /// Rejects tables that are empty or whose weights do not sum to 1.0.
    pub fn new(field: &str, entries: &[(f64, T)]) -> Result<Self, GenerationError> {
        let total: f64 = entries.iter().map(|(weight, _)| weight).sum();
        if (total - 1.0).abs() > 1e-9 {
            return Err(GenerationError::Precondition(format!(
                "weights for `{field}` sum to {total}, expected 1.0"
            )));
        }
        let index = WeightedIndex::new(entries.iter().map(|(weight, _)| *weight)).map_err(
            |error| GenerationError::Precondition(format!("weights for `{field}`: {error}")),
        )?;
        Ok(Self { options: entries.iter().map(|(_, option)| *option).collect(), index })
    }
}
