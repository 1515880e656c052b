//! Ranking policy: license priorities and score weights.
//!
//! The built-in [`ScoringPolicy::default`] favors public-domain and CC0
//! images, then attribution-only, share-alike, no-derivatives, and finally
//! non-commercial licenses. A YAML file can override any field:
//!
//! ```yaml
//! license_priority:
//!   public-domain: 5
//!   cc0: 5
//!   by: 4
//! license_multiplier: 3.0
//! bonus_providers: [wikimedia]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Weight per normalized license code. Unknown codes weigh 0.
    pub license_priority: BTreeMap<String, f64>,
    /// Factor applied to the license weight.
    pub license_multiplier: f64,
    /// The smaller image side is divided by this to get the resolution term.
    pub resolution_divisor: f64,
    /// Added when the candidate's provider is in `bonus_providers`.
    pub provider_bonus: f64,
    /// Lower-case provider names with stable, easily attributable hosting.
    pub bonus_providers: Vec<String>,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        let license_priority = [
            ("public-domain", 5.0),
            ("cc0", 5.0),
            ("by", 4.0),
            ("by-sa", 4.0),
            ("by-nd", 3.0),
            ("by-nc", 2.0),
            ("by-nc-sa", 2.0),
            ("by-nc-nd", 1.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            license_priority,
            license_multiplier: 3.0,
            resolution_divisor: 1000.0,
            provider_bonus: 0.5,
            bonus_providers: vec!["wikimedia".to_string(), "flickr".to_string()],
        }
    }
}

impl ScoringPolicy {
    /// Weight of an already-normalized license code.
    #[must_use]
    pub fn license_weight(&self, license: &str) -> f64 {
        self.license_priority.get(license).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_bonus_provider(&self, provider: &str) -> bool {
        let provider = provider.trim().to_lowercase();
        self.bonus_providers.iter().any(|p| *p == provider)
    }
}

/// Load a scoring policy from YAML. Fields left out keep their defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_scoring_policy(path: &Path) -> Result<ScoringPolicy, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut policy: ScoringPolicy =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    // Lookups use normalized codes, so normalize the table keys the same way.
    policy.license_priority = policy
        .license_priority
        .into_iter()
        .map(|(k, v)| (crate::normalize_license(&k), v))
        .collect();
    policy.bonus_providers = policy
        .bonus_providers
        .into_iter()
        .map(|p| p.trim().to_lowercase())
        .collect();

    validate_policy(&policy)?;
    Ok(policy)
}

fn validate_policy(policy: &ScoringPolicy) -> Result<(), ConfigError> {
    if !(policy.resolution_divisor.is_finite() && policy.resolution_divisor > 0.0) {
        return Err(ConfigError::Validation(format!(
            "resolution_divisor must be a positive number, got {}",
            policy.resolution_divisor
        )));
    }
    if !(policy.license_multiplier.is_finite() && policy.license_multiplier >= 0.0) {
        return Err(ConfigError::Validation(format!(
            "license_multiplier must be a non-negative number, got {}",
            policy.license_multiplier
        )));
    }
    if !policy.provider_bonus.is_finite() {
        return Err(ConfigError::Validation(
            "provider_bonus must be finite".to_string(),
        ));
    }
    if let Some((code, weight)) = policy
        .license_priority
        .iter()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(ConfigError::Validation(format!(
            "license '{code}' has invalid weight {weight}"
        )));
    }
    Ok(())
}
