//! Grouped summaries over the customer table.
//!
//! All aggregates are single-pass and keyed by the distinct values that
//! actually occur in the input, ordered ascending by key. An empty table
//! yields empty aggregates.

use crate::{
    customer::{Category, Contract, CustomerRecord, InternetService},
    types::Months,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnByContract {
    pub contract:          Contract,
    pub total_customers:   usize,
    pub churned_customers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvgChargesByInternet {
    pub internet_service:    InternetService,
    pub avg_monthly_charges: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenureCount {
    pub tenure:         Months,
    pub customer_count: usize,
}

/// Occurrences of one category value in a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// The three aggregate tables, computed once and held immutably.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub churn_by_contract:       Vec<ChurnByContract>,
    pub avg_charges_by_internet: Vec<AvgChargesByInternet>,
    pub tenure_distribution:     Vec<TenureCount>,
}

impl Aggregates {
    pub fn compute(customers: &[CustomerRecord]) -> Self {
        let aggregates = Self {
            churn_by_contract:       churn_by_contract(customers),
            avg_charges_by_internet: avg_charges_by_internet(customers),
            tenure_distribution:     tenure_distribution(customers),
        };
        log::info!(
            "aggregates: {} contract groups, {} internet groups, {} tenure values",
            aggregates.churn_by_contract.len(),
            aggregates.avg_charges_by_internet.len(),
            aggregates.tenure_distribution.len(),
        );
        aggregates
    }
}

/// Customer and churned-customer counts per contract type.
pub fn churn_by_contract(customers: &[CustomerRecord]) -> Vec<ChurnByContract> {
    let mut groups: BTreeMap<Contract, (usize, usize)> = BTreeMap::new();
    for c in customers {
        let entry = groups.entry(c.contract).or_default();
        entry.0 += 1;
        if c.churned() {
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(contract, (total, churned))| {
            log::debug!("aggregates: contract={contract} total={total} churned={churned}");
            ChurnByContract {
                contract,
                total_customers: total,
                churned_customers: churned,
            }
        })
        .collect()
}

/// Mean monthly charges per internet-service type.
pub fn avg_charges_by_internet(customers: &[CustomerRecord]) -> Vec<AvgChargesByInternet> {
    let mut groups: BTreeMap<InternetService, (f64, usize)> = BTreeMap::new();
    for c in customers {
        let entry = groups.entry(c.internet_service).or_default();
        entry.0 += c.monthly_charges;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(internet_service, (sum, n))| AvgChargesByInternet {
            internet_service,
            avg_monthly_charges: sum / n as f64,
        })
        .collect()
}

/// Customer count per distinct tenure value.
pub fn tenure_distribution(customers: &[CustomerRecord]) -> Vec<TenureCount> {
    count_by(customers, |c| c.tenure)
        .into_iter()
        .map(|(tenure, customer_count)| TenureCount { tenure, customer_count })
        .collect()
}

/// Value counts for one categorical column, in the category's declared order.
/// Values that never occur are omitted.
pub fn category_counts<C: Category>(
    customers: &[CustomerRecord],
    column: impl Fn(&CustomerRecord) -> C,
) -> Vec<CategoryCount> {
    count_by(customers, column)
        .into_iter()
        .map(|(value, count)| CategoryCount {
            label: value.label().to_string(),
            count,
        })
        .collect()
}

/// Value counts for a boolean flag column, labelled "0" and "1".
pub fn flag_counts(
    customers: &[CustomerRecord],
    column: impl Fn(&CustomerRecord) -> bool,
) -> Vec<CategoryCount> {
    count_by(customers, column)
        .into_iter()
        .map(|(value, count)| CategoryCount {
            label: u8::from(value).to_string(),
            count,
        })
        .collect()
}

fn count_by<K: Ord>(
    customers: &[CustomerRecord],
    key: impl Fn(&CustomerRecord) -> K,
) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();
    for c in customers {
        *counts.entry(key(c)).or_insert(0) += 1;
    }
    counts
}
