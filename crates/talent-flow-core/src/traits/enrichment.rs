//! Enrichment capabilities consumed by the engine.
//!
//! Vendor adapters sit behind these traits. The engine only ever sees the
//! resolved values; network-backed implementations live outside this workspace.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Resolves a company name to a stable company identifier.
pub trait CompanyLookup: Send + Sync {
    fn lookup_company_id(&self, company_name: &str) -> Option<String>;
}

/// Resolves a person to a LinkedIn profile URL.
pub trait LinkedInResolver: Send + Sync {
    fn resolve_profile(&self, full_name: &str, company_name: Option<&str>) -> Option<String>;
}

/// Supplies the email address pattern used at a company.
pub trait EmailPatternSource: Send + Sync {
    fn email_pattern(&self, company_id: &str) -> Option<EmailPattern>;
}

impl<T: CompanyLookup + ?Sized> CompanyLookup for Arc<T> {
    fn lookup_company_id(&self, company_name: &str) -> Option<String> {
        (**self).lookup_company_id(company_name)
    }
}

impl<T: LinkedInResolver + ?Sized> LinkedInResolver for Arc<T> {
    fn resolve_profile(&self, full_name: &str, company_name: Option<&str>) -> Option<String> {
        (**self).resolve_profile(full_name, company_name)
    }
}

impl<T: EmailPatternSource + ?Sized> EmailPatternSource for Arc<T> {
    fn email_pattern(&self, company_id: &str) -> Option<EmailPattern> {
        (**self).email_pattern(company_id)
    }
}

/// A company email convention, e.g. `{first}.{last}` at `acme.com`.
///
/// Placeholders: `{first}`, `{last}`, `{f}` (first initial), `{l}` (last initial).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailPattern {
    pub pattern: String,
    pub domain: String,
    /// How reliable the vendor considers this pattern, in [0,1].
    #[serde(default = "default_pattern_confidence")]
    pub confidence: f64,
}

fn default_pattern_confidence() -> f64 {
    0.5
}

impl EmailPattern {
    /// Render an address for `full_name`. `None` when the name has no usable
    /// first and last token or the pattern leaves a placeholder unfilled.
    pub fn render(&self, full_name: &str) -> Option<String> {
        let tokens: Vec<String> = full_name
            .split_whitespace()
            .map(|t| {
                t.chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase()
            })
            .filter(|t| !t.is_empty())
            .collect();
        let first = tokens.first()?;
        let last = if tokens.len() > 1 { tokens.last()? } else { return None };
        let local = self
            .pattern
            .replace("{first}", first)
            .replace("{last}", last)
            .replace("{f}", &first[..1])
            .replace("{l}", &last[..1]);
        if local.is_empty() || local.contains('{') || self.domain.trim().is_empty() {
            return None;
        }
        Some(format!("{local}@{}", self.domain.trim().to_ascii_lowercase()))
    }
}
