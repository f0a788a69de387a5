//! Career catalog — the fixed set of career profiles scored against a user's skills.
//!
//! Built once at startup and shared read-only through `AppState`.

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::careers::skills::fold_skill;
use crate::careers::CareerError;

/// A named role with the skills it requires and a multiplier applied to its score.
#[derive(Debug, Clone, Serialize)]
pub struct CareerProfile {
    pub name: String,
    /// Display order only. Scoring treats this as a set.
    pub required: Vec<String>,
    pub weight: f64,
}

impl CareerProfile {
    pub fn new(name: &str, required: &[&str], weight: f64) -> Self {
        Self {
            name: name.to_string(),
            required: required.iter().map(|s| s.to_string()).collect(),
            weight,
        }
    }
}

/// Immutable career catalog plus the display-casing table derived from it.
#[derive(Debug, Clone)]
pub struct CareerCatalog {
    profiles: Vec<CareerProfile>,
    /// folded skill → catalog spelling (first declaration wins)
    display: HashMap<String, String>,
}

impl CareerCatalog {
    /// Validates and indexes the given profiles.
    /// Rejects an empty catalog, duplicate names and non-positive weights.
    pub fn new(profiles: Vec<CareerProfile>) -> Result<Self> {
        if profiles.is_empty() {
            bail!("career catalog must contain at least one profile");
        }

        let mut names = HashSet::new();
        let mut display = HashMap::new();
        for profile in &profiles {
            if !names.insert(profile.name.as_str()) {
                bail!("duplicate career profile '{}'", profile.name);
            }
            if !(profile.weight > 0.0 && profile.weight.is_finite()) {
                bail!(
                    "career profile '{}' has invalid weight {}",
                    profile.name,
                    profile.weight
                );
            }
            for skill in &profile.required {
                display
                    .entry(fold_skill(skill))
                    .or_insert_with(|| skill.clone());
            }
        }

        Ok(Self { profiles, display })
    }

    /// Profiles in declaration order.
    pub fn careers(&self) -> &[CareerProfile] {
        &self.profiles
    }

    pub fn find(&self, name: &str) -> Result<&CareerProfile, CareerError> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CareerError::CareerNotFound(name.to_string()))
    }

    /// Catalog spelling for a skill, if any career requires it.
    pub fn canonical_casing(&self, skill: &str) -> Option<&str> {
        self.display.get(&fold_skill(skill)).map(String::as_str)
    }
}

/// The built-in catalog.
pub fn default_catalog() -> Result<CareerCatalog> {
    CareerCatalog::new(vec![
        CareerProfile::new(
            "Frontend Developer",
            &["JavaScript", "HTML", "CSS", "TypeScript", "Vue", "Svelte", "Stylus"],
            1.0,
        ),
        CareerProfile::new(
            "Backend Developer",
            &["Python", "Java", "Go", "Ruby", "PHP", "C++", "C#", "Kotlin", "Rust"],
            1.0,
        ),
        CareerProfile::new(
            "Data Scientist / ML Engineer",
            &["Python", "Jupyter Notebook", "R"],
            1.5,
        ),
        CareerProfile::new(
            "Mobile App Developer",
            &["Dart", "Kotlin", "Java", "Swift", "Objective-C"],
            1.0,
        ),
        CareerProfile::new(
            "DevOps Engineer",
            &["Shell", "Go", "Python", "Dockerfile", "PowerShell"],
            1.0,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.careers().len(), 5);
        assert_eq!(catalog.careers()[0].name, "Frontend Developer");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(CareerCatalog::new(vec![]).is_err());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = CareerCatalog::new(vec![
            CareerProfile::new("Backend", &["Go"], 1.0),
            CareerProfile::new("Backend", &["Rust"], 1.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_weight_rejected() {
        let result = CareerCatalog::new(vec![CareerProfile::new("Backend", &["Go"], 0.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = default_catalog().unwrap();
        let profile = catalog.find("devops engineer").unwrap();
        assert_eq!(profile.name, "DevOps Engineer");
    }

    #[test]
    fn test_find_unknown_career() {
        let catalog = default_catalog().unwrap();
        assert_eq!(
            catalog.find("Astronaut").unwrap_err(),
            CareerError::CareerNotFound("Astronaut".to_string())
        );
    }

    #[test]
    fn test_canonical_casing_uses_catalog_spelling() {
        let catalog = default_catalog().unwrap();
        assert_eq!(catalog.canonical_casing("javascript"), Some("JavaScript"));
        assert_eq!(catalog.canonical_casing("JUPYTER NOTEBOOK"), Some("Jupyter Notebook"));
        assert_eq!(catalog.canonical_casing("Docker"), None);
    }
}
