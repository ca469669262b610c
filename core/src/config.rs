use crate::{
    error::{DashError, DashResult},
    types::Seed,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: Seed = 42;
pub const DEFAULT_NUM_CUSTOMERS: usize = 1000;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8050";
pub const DEFAULT_TITLE: &str = "Customer Churn Analysis Dashboard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub seed: Seed,
    pub num_customers: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            num_customers: DEFAULT_NUM_CUSTOMERS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub dataset: DatasetConfig,
    pub server: ServerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            dataset: DatasetConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file. Fields missing from the file keep their defaults.
    pub fn load(path: &str) -> DashResult<Self> {
        let content = std::fs::read_to_string(path).inspect_err(|e| {
            log::warn!("config: cannot read {path}: {e}");
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> DashResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Small dataset for unit tests.
    pub fn default_test() -> Self {
        Self {
            dataset: DatasetConfig {
                seed: 7,
                num_customers: 50,
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> DashResult<()> {
        if self.dataset.num_customers == 0 {
            return Err(DashError::invalid(
                "dataset.num_customers",
                "must be greater than zero",
            ));
        }
        if self.title.trim().is_empty() {
            return Err(DashError::invalid("title", "must not be empty"));
        }
        if self.server.bind_addr.trim().is_empty() {
            return Err(DashError::invalid("server.bind_addr", "must not be empty"));
        }
        Ok(())
    }
}
