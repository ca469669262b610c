//! Data fabricator - builds the synthetic customer table.
//!
//! The table is generated once from a master seed and never mutated.
//! Each column draws from its own RngBank stream, so a column's values
//! depend only on (seed, column slot, row index).

use crate::{
    config::DatasetConfig,
    customer::{
        total_charges, round2, Category, Contract, CustomerRecord, Gender, InternetAddon,
        InternetService, MultipleLines, PaymentMethod, YesNo, MONTHLY_CHARGES_MAX,
        MONTHLY_CHARGES_MIN, TENURE_MAX, TENURE_MIN, TOTAL_CHARGES_RATIO_MAX,
        TOTAL_CHARGES_RATIO_MIN,
    },
    error::{DashError, DashResult},
    rng::{ColumnRng, ColumnSlot, RngBank},
    types::{CustomerId, Seed},
};
use serde::Serialize;

/// Immutable synthetic dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub seed: Seed,
    customers: Vec<CustomerRecord>,
}

impl Dataset {
    pub fn generate(config: &DatasetConfig) -> DashResult<Self> {
        let customers = fabricate(config.seed, config.num_customers)?;
        Ok(Self {
            seed: config.seed,
            customers,
        })
    }

    pub fn customers(&self) -> &[CustomerRecord] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

/// One RNG per column, opened together so every record draws in lockstep.
struct ColumnStreams {
    gender:            ColumnRng,
    senior_citizen:    ColumnRng,
    partner:           ColumnRng,
    dependents:        ColumnRng,
    tenure:            ColumnRng,
    phone_service:     ColumnRng,
    multiple_lines:    ColumnRng,
    internet_service:  ColumnRng,
    online_security:   ColumnRng,
    online_backup:     ColumnRng,
    device_protection: ColumnRng,
    tech_support:      ColumnRng,
    streaming_tv:      ColumnRng,
    streaming_movies:  ColumnRng,
    contract:          ColumnRng,
    paperless_billing: ColumnRng,
    payment_method:    ColumnRng,
    monthly_charges:   ColumnRng,
    total_ratio:       ColumnRng,
    churn:             ColumnRng,
}

impl ColumnStreams {
    fn open(bank: &RngBank) -> Self {
        Self {
            gender:            bank.for_column(ColumnSlot::Gender),
            senior_citizen:    bank.for_column(ColumnSlot::SeniorCitizen),
            partner:           bank.for_column(ColumnSlot::Partner),
            dependents:        bank.for_column(ColumnSlot::Dependents),
            tenure:            bank.for_column(ColumnSlot::Tenure),
            phone_service:     bank.for_column(ColumnSlot::PhoneService),
            multiple_lines:    bank.for_column(ColumnSlot::MultipleLines),
            internet_service:  bank.for_column(ColumnSlot::InternetService),
            online_security:   bank.for_column(ColumnSlot::OnlineSecurity),
            online_backup:     bank.for_column(ColumnSlot::OnlineBackup),
            device_protection: bank.for_column(ColumnSlot::DeviceProtection),
            tech_support:      bank.for_column(ColumnSlot::TechSupport),
            streaming_tv:      bank.for_column(ColumnSlot::StreamingTv),
            streaming_movies:  bank.for_column(ColumnSlot::StreamingMovies),
            contract:          bank.for_column(ColumnSlot::Contract),
            paperless_billing: bank.for_column(ColumnSlot::PaperlessBilling),
            payment_method:    bank.for_column(ColumnSlot::PaymentMethod),
            monthly_charges:   bank.for_column(ColumnSlot::MonthlyCharges),
            total_ratio:       bank.for_column(ColumnSlot::TotalChargesRatio),
            churn:             bank.for_column(ColumnSlot::Churn),
        }
    }

    fn next_record(&mut self, customer_id: CustomerId) -> CustomerRecord {
        let tenure = self.tenure.uniform_u32(TENURE_MIN, TENURE_MAX);
        let monthly_charges = round2(
            self.monthly_charges
                .uniform_f64(MONTHLY_CHARGES_MIN, MONTHLY_CHARGES_MAX),
        );
        let ratio = self
            .total_ratio
            .uniform_f64(TOTAL_CHARGES_RATIO_MIN, TOTAL_CHARGES_RATIO_MAX);

        CustomerRecord {
            customer_id,
            gender:            self.gender.pick(Gender::ALL),
            senior_citizen:    self.senior_citizen.pick(&[false, true]),
            partner:           self.partner.pick(YesNo::ALL),
            dependents:        self.dependents.pick(YesNo::ALL),
            tenure,
            phone_service:     self.phone_service.pick(YesNo::ALL),
            multiple_lines:    self.multiple_lines.pick(MultipleLines::ALL),
            internet_service:  self.internet_service.pick(InternetService::ALL),
            online_security:   self.online_security.pick(InternetAddon::ALL),
            online_backup:     self.online_backup.pick(InternetAddon::ALL),
            device_protection: self.device_protection.pick(InternetAddon::ALL),
            tech_support:      self.tech_support.pick(InternetAddon::ALL),
            streaming_tv:      self.streaming_tv.pick(InternetAddon::ALL),
            streaming_movies:  self.streaming_movies.pick(InternetAddon::ALL),
            contract:          self.contract.pick(Contract::ALL),
            paperless_billing: self.paperless_billing.pick(YesNo::ALL),
            payment_method:    self.payment_method.pick(PaymentMethod::ALL),
            monthly_charges,
            total_charges:     total_charges(monthly_charges, tenure, ratio),
            churn:             self.churn.pick(YesNo::ALL),
        }
    }
}

/// Produce exactly `n` customer records from `seed`.
///
/// Same `(seed, n)` always yields the same table, and a longer table
/// extends a shorter one with the same seed (row `i` never depends on `n`).
pub fn fabricate(seed: Seed, n: usize) -> DashResult<Vec<CustomerRecord>> {
    if n == 0 {
        return Err(DashError::invalid("n", "record count must be greater than zero"));
    }
    let last_id = CustomerId::try_from(n)
        .map_err(|_| DashError::invalid("n", format!("{n} exceeds the customer id range")))?;

    let bank = RngBank::new(seed);
    let mut streams = ColumnStreams::open(&bank);
    let customers: Vec<CustomerRecord> = (1..=last_id)
        .map(|customer_id| streams.next_record(customer_id))
        .collect();

    log::info!("fabricate: generated {} customers (seed={seed})", customers.len());
    Ok(customers)
}
