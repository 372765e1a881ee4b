use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::config::EntitlementConfig;

/// Protected capabilities of the portal. Every guarded page or action maps
/// to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    SubjectBrowsing,
    Quizzes,
    Flashcards,
    Resources,
    SolutionBank,
    Forum,
    HomeworkHelp,
    QuickHelp,
    StudentDashboard,
}

impl Feature {
    pub const ALL: [Feature; 9] = [
        Feature::SubjectBrowsing,
        Feature::Quizzes,
        Feature::Flashcards,
        Feature::Resources,
        Feature::SolutionBank,
        Feature::Forum,
        Feature::HomeworkHelp,
        Feature::QuickHelp,
        Feature::StudentDashboard,
    ];

    /// Stable identifier string for API serialisation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::SubjectBrowsing => "subject-browsing",
            Feature::Quizzes => "quizzes",
            Feature::Flashcards => "flashcards",
            Feature::Resources => "resources",
            Feature::SolutionBank => "solution-bank",
            Feature::Forum => "forum",
            Feature::HomeworkHelp => "homework-help",
            Feature::QuickHelp => "quick-help",
            Feature::StudentDashboard => "student-dashboard",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown feature: '{}'", s))
    }
}

/// Access class of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureTier {
    /// Reachable without any subscription, even anonymously.
    Free,
    /// Requires a currently valid premium subscription (or a bypass role).
    Premium,
}

/// The static free/premium classification table. Held as explicit data so
/// it can be audited and overridden through configuration, never inferred
/// inside branch logic.
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    free: HashSet<Feature>,
}

impl FeatureCatalog {
    /// Build the catalog from configuration. Names that don't match a known
    /// feature are skipped with a warning rather than silently widening the
    /// free set.
    pub fn from_config(config: &EntitlementConfig) -> Self {
        let mut free = HashSet::new();
        for name in &config.free_features {
            match name.parse::<Feature>() {
                Ok(feature) => {
                    free.insert(feature);
                }
                Err(_) => {
                    warn!("Ignoring unknown feature '{}' in free-feature config", name);
                }
            }
        }
        Self { free }
    }

    /// Classify a known feature.
    pub fn tier(&self, feature: Feature) -> FeatureTier {
        if self.free.contains(&feature) {
            FeatureTier::Free
        } else {
            FeatureTier::Premium
        }
    }

    /// Classify a raw feature name. Names that don't resolve to a known
    /// feature classify as premium-required: an unrecognised identifier
    /// must never open a free path.
    pub fn tier_of_name(&self, name: &str) -> FeatureTier {
        match name.parse::<Feature>() {
            Ok(feature) => self.tier(feature),
            Err(_) => {
                warn!("Unknown feature '{}' requested; treating as premium", name);
                FeatureTier::Premium
            }
        }
    }

}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self {
            free: HashSet::from([Feature::SubjectBrowsing, Feature::Forum]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_identifiers() {
        for feature in Feature::ALL {
            assert_eq!(feature.as_str().parse::<Feature>().unwrap(), feature);
        }
        assert!("premium-everything".parse::<Feature>().is_err());
    }

    #[test]
    fn default_catalog_frees_browsing_and_forum() {
        let catalog = FeatureCatalog::default();
        assert_eq!(catalog.tier(Feature::SubjectBrowsing), FeatureTier::Free);
        assert_eq!(catalog.tier(Feature::Forum), FeatureTier::Free);
        for feature in [
            Feature::Quizzes,
            Feature::Flashcards,
            Feature::Resources,
            Feature::SolutionBank,
            Feature::HomeworkHelp,
            Feature::QuickHelp,
            Feature::StudentDashboard,
        ] {
            assert_eq!(catalog.tier(feature), FeatureTier::Premium);
        }
    }

    #[test]
    fn config_overrides_free_set() {
        let config = EntitlementConfig {
            free_features: vec!["quizzes".to_string(), "bogus".to_string()],
            cache_ttl_secs: 30,
            provider_timeout_ms: 1000,
        };
        let catalog = FeatureCatalog::from_config(&config);

        assert_eq!(catalog.tier(Feature::Quizzes), FeatureTier::Free);
        // No longer listed, so no longer free
        assert_eq!(catalog.tier(Feature::Forum), FeatureTier::Premium);
    }

    #[test]
    fn unknown_names_classify_as_premium() {
        let catalog = FeatureCatalog::default();
        assert_eq!(catalog.tier_of_name("forum"), FeatureTier::Free);
        assert_eq!(catalog.tier_of_name("made-up-page"), FeatureTier::Premium);
    }
}
