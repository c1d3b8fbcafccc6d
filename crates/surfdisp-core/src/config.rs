//! Analysis configuration
//!
//! Sources, highest priority first:
//! 1. Environment variables (`SURFDISP_SYMMETRY_TOL`, `SURFDISP_VERIFY_TOL`)
//! 2. A JSON document
//! 3. Built-in defaults

use crate::eigen::asymmetry;
use crate::error::{Result, SurfaceError};
use log::debug;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::env;

pub const SYMMETRY_TOL_ENV: &str = "SURFDISP_SYMMETRY_TOL";
pub const VERIFY_TOL_ENV: &str = "SURFDISP_VERIFY_TOL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Largest |M[i][j] - M[j][i]| accepted as symmetric without a warning
    #[serde(default = "default_tolerance")]
    pub symmetry_tolerance: f64,
    /// Absolute tolerance for eigensystem residual checks
    #[serde(default = "default_tolerance")]
    pub verify_tolerance: f64,
}

fn default_tolerance() -> f64 {
    1e-9
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            symmetry_tolerance: default_tolerance(),
            verify_tolerance: default_tolerance(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a JSON document; missing keys take defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(text)
            .map_err(|err| SurfaceError::Config(format!("parse error: {err}")))?;
        config.validate()
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        AnalysisConfig::default().with_env_overrides()
    }

    /// Apply `SURFDISP_SYMMETRY_TOL` / `SURFDISP_VERIFY_TOL` when set
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(tol) = read_env_tolerance(SYMMETRY_TOL_ENV)? {
            self.symmetry_tolerance = tol;
        }
        if let Some(tol) = read_env_tolerance(VERIFY_TOL_ENV)? {
            self.verify_tolerance = tol;
        }
        self.validate()
    }

    /// True when `m` is symmetric within `symmetry_tolerance`
    pub fn is_symmetric(&self, m: &DMatrix<f64>) -> Result<bool> {
        Ok(asymmetry(m)? <= self.symmetry_tolerance)
    }

    /// Reject negative or non-finite tolerances
    pub fn validate(self) -> Result<Self> {
        for (name, value) in [
            ("symmetry_tolerance", self.symmetry_tolerance),
            ("verify_tolerance", self.verify_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SurfaceError::Config(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(self)
    }
}

fn read_env_tolerance(key: &str) -> Result<Option<f64>> {
    match env::var(key) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<f64>()
                .map_err(|err| SurfaceError::Config(format!("{key}={raw}: {err}")))?;
            debug!("config: {key} overrides tolerance with {value}");
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = AnalysisConfig::from_json_str(r#"{ "verify_tolerance": 1e-6 }"#).unwrap();
        assert_eq!(config.symmetry_tolerance, 1e-9);
        assert_eq!(config.verify_tolerance, 1e-6);
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let err = AnalysisConfig::from_json_str(r#"{ "symmetry_tolerance": -1.0 }"#).unwrap_err();
        assert!(matches!(err, SurfaceError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(AnalysisConfig::from_json_str("{ nope").is_err());
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = AnalysisConfig {
            symmetry_tolerance: 1e-3,
            verify_tolerance: 1e-12,
        };
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(AnalysisConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn test_symmetry_decision_follows_tolerance() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5 + 1e-3, 2.0]);
        let strict = AnalysisConfig::default();
        let loose = AnalysisConfig {
            symmetry_tolerance: 1e-2,
            ..AnalysisConfig::default()
        };
        assert!(!strict.is_symmetric(&m).unwrap());
        assert!(loose.is_symmetric(&m).unwrap());
        assert!(strict.is_symmetric(&DMatrix::identity(3, 3)).unwrap());
    }
}
