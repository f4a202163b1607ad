use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::domain::product::{Product, ProductId};

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub catalog: Vec<ProductEntry>,
    pub pricing: PricingConfig,
    pub logging: LoggingConfig,
}

/// One catalog row as configured; prices are whole rupiah.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProductEntry {
    pub id: String,
    pub name: String,
    pub unit_price: i64,
    pub stock: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PricingConfig {
    pub budget_discount_pct: u8,
    pub budget_min_qty: u32,
    pub bulk_discount_pct: u8,
    pub bulk_min_qty: u32,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

struct MenuSeed {
    id: &'static str,
    name: &'static str,
    unit_price: i64,
    stock: u32,
    tags: &'static [&'static str],
}

const DEFAULT_MENU: &[MenuSeed] = &[
    MenuSeed {
        id: "nasi-padang",
        name: "Nasi Padang",
        unit_price: 25_000,
        stock: 20,
        tags: &["heavy", "mild"],
    },
    MenuSeed {
        id: "rendang",
        name: "Rendang",
        unit_price: 35_000,
        stock: 8,
        tags: &["spicy", "heavy"],
    },
    MenuSeed {
        id: "ayam-geprek",
        name: "Ayam Geprek",
        unit_price: 22_000,
        stock: 3,
        tags: &["spicy", "heavy"],
    },
    MenuSeed { id: "burger", name: "Burger", unit_price: 30_000, stock: 15, tags: &["heavy"] },
    MenuSeed {
        id: "ekonomis-box",
        name: "Ekonomis Box",
        unit_price: 15_000,
        stock: 10,
        tags: &["budget", "light"],
    },
    MenuSeed {
        id: "es-teh-manis",
        name: "Es Teh Manis",
        unit_price: 8_000,
        stock: 30,
        tags: &["sweet", "drink", "light"],
    },
    MenuSeed {
        id: "mango-juice",
        name: "Mango Juice",
        unit_price: 12_000,
        stock: 12,
        tags: &["sweet", "drink", "light"],
    },
    MenuSeed {
        id: "es-campur",
        name: "Es Campur",
        unit_price: 18_000,
        stock: 0,
        tags: &["sweet", "drink"],
    },
];

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog: DEFAULT_MENU
                .iter()
                .map(|seed| ProductEntry {
                    id: seed.id.to_string(),
                    name: seed.name.to_string(),
                    unit_price: seed.unit_price,
                    stock: seed.stock,
                    tags: seed.tags.iter().map(|tag| (*tag).to_string()).collect(),
                })
                .collect(),
            pricing: PricingConfig {
                budget_discount_pct: 15,
                budget_min_qty: 2,
                bulk_discount_pct: 10,
                bulk_min_qty: 5,
            },
            logging: LoggingConfig { level: "info".to_string() },
        }
    }
}

impl EngineConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("lapak.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            self.catalog = catalog;
        }

        if let Some(pricing) = patch.pricing {
            if let Some(budget_discount_pct) = pricing.budget_discount_pct {
                self.pricing.budget_discount_pct = budget_discount_pct;
            }
            if let Some(budget_min_qty) = pricing.budget_min_qty {
                self.pricing.budget_min_qty = budget_min_qty;
            }
            if let Some(bulk_discount_pct) = pricing.bulk_discount_pct {
                self.pricing.bulk_discount_pct = bulk_discount_pct;
            }
            if let Some(bulk_min_qty) = pricing.bulk_min_qty {
                self.pricing.bulk_min_qty = bulk_min_qty;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LAPAK_PRICING_BUDGET_DISCOUNT_PCT") {
            self.pricing.budget_discount_pct =
                parse_u8("LAPAK_PRICING_BUDGET_DISCOUNT_PCT", &value)?;
        }
        if let Some(value) = read_env("LAPAK_PRICING_BUDGET_MIN_QTY") {
            self.pricing.budget_min_qty = parse_u32("LAPAK_PRICING_BUDGET_MIN_QTY", &value)?;
        }
        if let Some(value) = read_env("LAPAK_PRICING_BULK_DISCOUNT_PCT") {
            self.pricing.bulk_discount_pct = parse_u8("LAPAK_PRICING_BULK_DISCOUNT_PCT", &value)?;
        }
        if let Some(value) = read_env("LAPAK_PRICING_BULK_MIN_QTY") {
            self.pricing.bulk_min_qty = parse_u32("LAPAK_PRICING_BULK_MIN_QTY", &value)?;
        }

        let log_level = read_env("LAPAK_LOGGING_LEVEL").or_else(|| read_env("LAPAK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.is_empty() {
            return Err(ConfigError::Validation("catalog must not be empty".to_string()));
        }
        for (index, entry) in self.catalog.iter().enumerate() {
            if entry.id.trim().is_empty() || entry.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "catalog entry {index} must have a non-empty id and name"
                )));
            }
            if entry.unit_price < 0 {
                return Err(ConfigError::Validation(format!(
                    "catalog entry `{}` has a negative unit_price",
                    entry.id
                )));
            }
            let duplicate = self.catalog[..index].iter().any(|earlier| {
                earlier.id == entry.id || earlier.name.eq_ignore_ascii_case(&entry.name)
            });
            if duplicate {
                return Err(ConfigError::Validation(format!(
                    "catalog entry `{}` duplicates an earlier id or name",
                    entry.id
                )));
            }
        }

        for (label, pct) in [
            ("pricing.budget_discount_pct", self.pricing.budget_discount_pct),
            ("pricing.bulk_discount_pct", self.pricing.bulk_discount_pct),
        ] {
            if pct >= 100 {
                return Err(ConfigError::Validation(format!("{label} must be below 100")));
            }
        }
        if self.pricing.budget_min_qty == 0 || self.pricing.bulk_min_qty == 0 {
            return Err(ConfigError::Validation(
                "pricing minimum quantities must be at least 1".to_string(),
            ));
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::Validation(
                "logging.level must be one of trace|debug|info|warn|error".to_string(),
            )),
        }
    }

    /// Materialize the configured catalog. Runs after `validate`, but maps
    /// any remaining domain rejection into a validation error.
    pub fn build_catalog(&self) -> Result<Catalog, ConfigError> {
        let products = self
            .catalog
            .iter()
            .map(|entry| Product {
                id: ProductId(entry.id.clone()),
                name: entry.name.clone(),
                unit_price: Decimal::from(entry.unit_price),
                stock: entry.stock,
                tags: entry.tags.clone(),
            })
            .collect();
        Catalog::new(products).map_err(|error| ConfigError::Validation(error.to_string()))
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("lapak.toml"), PathBuf::from("config/lapak.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u8(key: &str, value: &str) -> Result<u8, ConfigError> {
    value.parse::<u8>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<Vec<ProductEntry>>,
    pricing: Option<PricingPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    budget_discount_pct: Option<u8>,
    budget_min_qty: Option<u32>,
    bulk_discount_pct: Option<u8>,
    bulk_min_qty: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
}
