//! Deterministic, fixture-backed enrichment capabilities.
//!
//! ```json
//! {
//!   "companies":      { "Acme Corp": "C1" },
//!   "profiles":       [ { "full_name": "Ada Lovelace", "company_name": "Acme Corp",
//!                         "linkedin_url": "https://linkedin.com/in/ada" } ],
//!   "email_patterns": { "C1": { "pattern": "{first}.{last}", "domain": "acme.com" } }
//! }
//! ```
//!
//! Name matching is case-insensitive and whitespace-trimmed.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use talent_flow_core::errors::ConfigError;
use talent_flow_core::traits::{CompanyLookup, EmailPattern, EmailPatternSource, LinkedInResolver};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureProfile {
    pub full_name: String,
    /// `None` matches the person at any company.
    #[serde(default)]
    pub company_name: Option<String>,
    pub linkedin_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureData {
    pub companies: BTreeMap<String, String>,
    pub profiles: Vec<FixtureProfile>,
    pub email_patterns: BTreeMap<String, EmailPattern>,
}

fn key(s: &str) -> String {
    s.trim().to_lowercase()
}

impl FixtureData {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut data: Self = serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
            path: "<fixtures>".to_string(),
            message: e.to_string(),
        })?;
        data.companies = data
            .companies
            .into_iter()
            .map(|(name, id)| (key(&name), id))
            .collect();
        Ok(data)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_json(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }
}

pub struct FixtureCompanyLookup {
    data: Arc<FixtureData>,
}

impl FixtureCompanyLookup {
    pub fn new(data: Arc<FixtureData>) -> Self {
        Self { data }
    }
}

impl CompanyLookup for FixtureCompanyLookup {
    fn lookup_company_id(&self, company_name: &str) -> Option<String> {
        self.data.companies.get(&key(company_name)).cloned()
    }
}

pub struct FixtureLinkedInResolver {
    data: Arc<FixtureData>,
}

impl FixtureLinkedInResolver {
    pub fn new(data: Arc<FixtureData>) -> Self {
        Self { data }
    }
}

impl LinkedInResolver for FixtureLinkedInResolver {
    /// A company-specific profile beats a company-agnostic one.
    fn resolve_profile(&self, full_name: &str, company_name: Option<&str>) -> Option<String> {
        let name = key(full_name);
        let company = company_name.map(key);
        let candidates = self.data.profiles.iter().filter(|p| key(&p.full_name) == name);
        let mut fallback = None;
        for profile in candidates {
            match profile.company_name.as_deref().map(key) {
                Some(c) if Some(&c) == company.as_ref() => return Some(profile.linkedin_url.clone()),
                None if fallback.is_none() => fallback = Some(profile.linkedin_url.clone()),
                _ => {}
            }
        }
        fallback
    }
}

pub struct FixtureEmailPatternSource {
    data: Arc<FixtureData>,
}

impl FixtureEmailPatternSource {
    pub fn new(data: Arc<FixtureData>) -> Self {
        Self { data }
    }
}

impl EmailPatternSource for FixtureEmailPatternSource {
    fn email_pattern(&self, company_id: &str) -> Option<EmailPattern> {
        self.data.email_patterns.get(company_id.trim()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Arc<FixtureData> {
        Arc::new(
            FixtureData::from_json(
                r#"{
                    "companies": { "Acme Corp": "C1" },
                    "profiles": [
                        { "full_name": "Sam Lee", "linkedin_url": "any" },
                        { "full_name": "Sam Lee", "company_name": "Acme Corp", "linkedin_url": "acme" }
                    ]
                }"#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_company_lookup_is_case_insensitive() {
        let lookup = FixtureCompanyLookup::new(data());
        assert_eq!(lookup.lookup_company_id("  ACME corp ").as_deref(), Some("C1"));
        assert_eq!(lookup.lookup_company_id("Globex"), None);
    }

    #[test]
    fn test_company_specific_profile_wins() {
        let resolver = FixtureLinkedInResolver::new(data());
        assert_eq!(resolver.resolve_profile("sam lee", Some("acme corp")).as_deref(), Some("acme"));
        assert_eq!(resolver.resolve_profile("Sam Lee", Some("Globex")).as_deref(), Some("any"));
        assert_eq!(resolver.resolve_profile("Nobody", None), None);
    }

    #[test]
    fn test_missing_file_and_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FixtureData::load(&dir.path().join("none.json")),
            Err(ConfigError::FileNotFound { .. })
        ));
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(FixtureData::load(&bad), Err(ConfigError::ParseError { .. })));
    }
}
