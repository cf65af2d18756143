//! CLI configuration file.
//!
//! ```toml
//! ir_grid = "data/ir_delta_observability_grid.csv"
//! vol_grid = "data/volatility_observability_grid.csv"
//!
//! [classification]
//! threshold_fraction = 0.10
//! parallel = true
//! parallel_threshold = 64
//!
//! [curves]
//! CHF = "CHF.SARON"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ifrs13_classify::ClassificationContext;
use ifrs13_core::{ClassificationConfig, CurrencyCode, CurrencyCurveMap};
use ifrs13_grid::{load_ir_grid, load_vol_grid, standard_ir_grid, standard_vol_grid};

use crate::error::{CliError, CliResult};

/// Settings read from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// IR delta grid CSV. The built-in grid is used when unset.
    #[serde(default)]
    pub ir_grid: Option<PathBuf>,

    /// Volatility grid CSV. The built-in grid is used when unset.
    #[serde(default)]
    pub vol_grid: Option<PathBuf>,

    /// Threshold and parallelism.
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Currency → discount curve overrides, merged over the standard OIS map.
    #[serde(default)]
    pub curves: BTreeMap<String, String>,
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| CliError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the explicit file if given, else the default file if present,
    /// else defaults.
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        if let Some(path) = explicit {
            info!(path = %path.display(), "Loading configuration");
            return Self::from_file(path);
        }
        match default_path() {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)
            }
            _ => {
                debug!("Using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Checks value ranges.
    pub fn validate(&self) -> CliResult<()> {
        self.classification
            .validate()
            .map_err(|e| CliError::InvalidConfig(e.to_string()))?;
        self.curve_map().map(|_| ())
    }

    /// Standard OIS map with the configured overrides applied.
    pub fn curve_map(&self) -> CliResult<CurrencyCurveMap> {
        let mut overrides = CurrencyCurveMap::new();
        for (currency, curve) in &self.curves {
            let code =
                CurrencyCode::new(currency).map_err(|e| CliError::InvalidConfig(e.to_string()))?;
            overrides.insert(code, curve.clone());
        }
        Ok(CurrencyCurveMap::standard_ois().merged(&overrides))
    }

    /// Builds the classification context.
    ///
    /// Command-line grid paths take precedence over configured ones.
    pub fn context(
        &self,
        ir_grid: Option<&Path>,
        vol_grid: Option<&Path>,
    ) -> anyhow::Result<ClassificationContext> {
        let ir = match ir_grid.or(self.ir_grid.as_deref()) {
            Some(path) => Arc::new(load_ir_grid(path)?),
            None => standard_ir_grid()?,
        };
        let vol = match vol_grid.or(self.vol_grid.as_deref()) {
            Some(path) => Arc::new(load_vol_grid(path)?),
            None => standard_vol_grid()?,
        };
        Ok(ClassificationContext::new(ir, vol, self.curve_map()?)?)
    }

    /// Classification settings with an optional threshold override.
    pub fn classification_config(&self, threshold: Option<f64>) -> CliResult<ClassificationConfig> {
        let mut config = self.classification.clone();
        if let Some(fraction) = threshold {
            let value = rust_decimal::Decimal::try_from(fraction)
                .map_err(|_| CliError::InvalidThreshold(fraction))?;
            config = config.with_threshold_fraction(value);
            config
                .validate()
                .map_err(|_| CliError::InvalidThreshold(fraction))?;
        }
        Ok(config)
    }
}

/// `<config dir>/ifrs13/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("ifrs13").join("config.toml"))
}
