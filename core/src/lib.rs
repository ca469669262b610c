//! Synthetic customer churn dataset, its aggregates, and the tabbed
//! dashboard built from them.
//!
//! Pipeline (each stage runs once, in this order):
//!   1. `Dataset::generate`   - fabricate the customer table from a seed
//!   2. `Aggregates::compute` - grouped summaries over the table
//!   3. `Dashboard::build`    - one figure per chart, arranged in tabs
//!   4. `Dashboard::render_html`

pub mod aggregate;
pub mod config;
pub mod customer;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod figures;
pub mod rng;
pub mod types;

pub use aggregate::Aggregates;
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use dataset::Dataset;
pub use error::{DashError, DashResult};
