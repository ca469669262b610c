//! Shared primitive types used across the crate.

/// Sequential customer identifier. The first customer is 1.
pub type CustomerId = u32;

/// Tenure in whole months.
pub type Months = u32;

/// Master seed for a fabricated dataset.
pub type Seed = u64;
