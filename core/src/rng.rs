//! Deterministic random number generation.
//!
//! RULE: Nothing in the fabricator may call any platform RNG.
//! All randomness flows through ColumnRng instances derived
//! from the single master seed of the dataset.
//!
//! Each column gets its own RNG stream, seeded deterministically
//! from (master_seed XOR column_index). This means:
//!   - Adding a new column never changes existing columns' values.
//!   - The order fields are filled within a record does not matter.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::types::Seed;

/// A named, deterministic RNG for a single column.
pub struct ColumnRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl ColumnRng {
    /// Create a column RNG from the master seed and a stable
    /// column index. The index must never change once assigned.
    pub fn new(master_seed: Seed, column_index: u64) -> Self {
        let derived_seed = master_seed ^ (column_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Uniform integer in [lo, hi], both ends inclusive.
    pub fn uniform_u32(&mut self, lo: u32, hi: u32) -> u32 {
        assert!(lo <= hi, "{}: empty range {lo}..={hi}", self.name);
        self.inner.gen_range(lo..=hi)
    }

    /// Uniform float in [lo, hi].
    pub fn uniform_f64(&mut self, lo: f64, hi: f64) -> f64 {
        assert!(lo <= hi, "{}: empty range {lo}..={hi}", self.name);
        self.inner.gen_range(lo..=hi)
    }

    /// Pick one element uniformly. Panics on an empty slice.
    pub fn pick<T: Copy>(&mut self, choices: &[T]) -> T {
        assert!(!choices.is_empty(), "{}: pick() from empty slice", self.name);
        choices[self.inner.gen_range(0..choices.len())]
    }
}

/// All column RNGs for a single dataset, indexed by stable slot.
pub struct RngBank {
    master_seed: Seed,
}

impl RngBank {
    pub fn new(master_seed: Seed) -> Self {
        Self { master_seed }
    }

    pub fn for_column(&self, slot: ColumnSlot) -> ColumnRng {
        ColumnRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable column slot assignments.
/// NEVER reorder or remove entries - only append.
/// Reordering changes every column's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum ColumnSlot {
    Gender = 0,
    SeniorCitizen = 1,
    Partner = 2,
    Dependents = 3,
    Tenure = 4,
    PhoneService = 5,
    MultipleLines = 6,
    InternetService = 7,
    OnlineSecurity = 8,
    OnlineBackup = 9,
    DeviceProtection = 10,
    TechSupport = 11,
    StreamingTv = 12,
    StreamingMovies = 13,
    Contract = 14,
    PaperlessBilling = 15,
    PaymentMethod = 16,
    MonthlyCharges = 17,
    TotalChargesRatio = 18,
    Churn = 19,
    // Add new columns here - append only.
}

impl ColumnSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::SeniorCitizen => "senior_citizen",
            Self::Partner => "partner",
            Self::Dependents => "dependents",
            Self::Tenure => "tenure",
            Self::PhoneService => "phone_service",
            Self::MultipleLines => "multiple_lines",
            Self::InternetService => "internet_service",
            Self::OnlineSecurity => "online_security",
            Self::OnlineBackup => "online_backup",
            Self::DeviceProtection => "device_protection",
            Self::TechSupport => "tech_support",
            Self::StreamingTv => "streaming_tv",
            Self::StreamingMovies => "streaming_movies",
            Self::Contract => "contract",
            Self::PaperlessBilling => "paperless_billing",
            Self::PaymentMethod => "payment_method",
            Self::MonthlyCharges => "monthly_charges",
            Self::TotalChargesRatio => "total_charges_ratio",
            Self::Churn => "churn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_and_slot_give_same_stream() {
        let bank = RngBank::new(42);
        let mut a = bank.for_column(ColumnSlot::Tenure);
        let mut b = bank.for_column(ColumnSlot::Tenure);
        for _ in 0..100 {
            assert_eq!(a.uniform_u32(1, 72), b.uniform_u32(1, 72));
        }
    }

    #[test]
    fn different_slots_give_different_streams() {
        let bank = RngBank::new(42);
        let mut a = bank.for_column(ColumnSlot::Gender);
        let mut b = bank.for_column(ColumnSlot::Churn);
        let xs: Vec<f64> = (0..16).map(|_| a.uniform_f64(0.0, 1.0)).collect();
        let ys: Vec<f64> = (0..16).map(|_| b.uniform_f64(0.0, 1.0)).collect();
        assert_ne!(xs, ys, "column streams should be independent");
    }

    #[test]
    fn uniform_draws_stay_in_range() {
        let mut rng = RngBank::new(7).for_column(ColumnSlot::MonthlyCharges);
        for _ in 0..10_000 {
            let x = rng.uniform_f64(18.25, 118.75);
            assert!((18.25..=118.75).contains(&x), "{x} out of range");
            let n = rng.uniform_u32(1, 72);
            assert!((1..=72).contains(&n), "{n} out of range");
        }
    }

    #[test]
    fn pick_eventually_covers_every_choice() {
        let mut rng = RngBank::new(1).for_column(ColumnSlot::Contract);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[rng.pick(&[0usize, 1, 2])] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
