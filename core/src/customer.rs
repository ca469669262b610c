//! Customer record and its categorical value domains.
//!
//! Every categorical column is a closed enum. The serialized form of each
//! variant is the human label shown on the dashboard ("Fiber optic",
//! "Month-to-month", ...). Variant declaration order is the sort order
//! used when grouping, and it matches the labels' alphabetical order.

use crate::types::{CustomerId, Months};
use serde::{Deserialize, Serialize};

pub const TENURE_MIN: Months = 1;
pub const TENURE_MAX: Months = 72;
pub const MONTHLY_CHARGES_MIN: f64 = 18.25;
pub const MONTHLY_CHARGES_MAX: f64 = 118.75;
pub const TOTAL_CHARGES_RATIO_MIN: f64 = 0.8;
pub const TOTAL_CHARGES_RATIO_MAX: f64 = 1.2;

/// A closed set of labelled values a categorical column can take.
pub trait Category: Copy + Ord + 'static {
    /// Every value, in declaration (and sort) order.
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;
}

macro_rules! category {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Category for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

category!(Gender {
    Female => "Female",
    Male => "Male",
});

category!(
    /// Plain Yes/No flag (partner, dependents, phone service, churn, ...).
    YesNo {
        No => "No",
        Yes => "Yes",
    }
);

category!(MultipleLines {
    No => "No",
    NoPhoneService => "No phone service",
    Yes => "Yes",
});

category!(InternetService {
    Dsl => "DSL",
    FiberOptic => "Fiber optic",
    No => "No",
});

category!(
    /// Value of an internet add-on column (security, backup, streaming, ...).
    InternetAddon {
        No => "No",
        NoInternetService => "No internet service",
        Yes => "Yes",
    }
);

category!(Contract {
    MonthToMonth => "Month-to-month",
    OneYear => "One year",
    TwoYear => "Two year",
});

category!(PaymentMethod {
    BankTransfer => "Bank transfer (automatic)",
    CreditCard => "Credit card (automatic)",
    ElectronicCheck => "Electronic check",
    MailedCheck => "Mailed check",
});

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}

/// One synthetic customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id:       CustomerId,
    pub gender:            Gender,
    pub senior_citizen:    bool,
    pub partner:           YesNo,
    pub dependents:        YesNo,
    pub tenure:            Months,
    pub phone_service:     YesNo,
    pub multiple_lines:    MultipleLines,
    pub internet_service:  InternetService,
    pub online_security:   InternetAddon,
    pub online_backup:     InternetAddon,
    pub device_protection: InternetAddon,
    pub tech_support:      InternetAddon,
    pub streaming_tv:      InternetAddon,
    pub streaming_movies:  InternetAddon,
    pub contract:          Contract,
    pub paperless_billing: YesNo,
    pub payment_method:    PaymentMethod,
    pub monthly_charges:   f64,
    pub total_charges:     f64,
    pub churn:             YesNo,
}

impl CustomerRecord {
    pub fn churned(&self) -> bool {
        self.churn.is_yes()
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Lifetime charges for a customer: monthly charges over the whole tenure,
/// scaled by `ratio` (drawn per record from [0.8, 1.2]) and rounded to cents.
pub fn total_charges(monthly_charges: f64, tenure: Months, ratio: f64) -> f64 {
    round2(monthly_charges * f64::from(tenure) * ratio)
}
