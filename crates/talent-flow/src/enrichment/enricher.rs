//! `StateEnricher`: capability-injected gap filling.

use std::sync::Arc;

use talent_flow_core::traits::{CompanyLookup, EmailPatternSource, LinkedInResolver};
use talent_flow_core::types::PersonState;

/// Fills `company_id` and `linkedin_url` where absent. Supplied values are
/// never overwritten. With no capabilities attached it is the identity.
#[derive(Clone, Default)]
pub struct StateEnricher {
    companies: Option<Arc<dyn CompanyLookup>>,
    profiles: Option<Arc<dyn LinkedInResolver>>,
    email_patterns: Option<Arc<dyn EmailPatternSource>>,
}

impl std::fmt::Debug for StateEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateEnricher")
            .field("companies", &self.companies.is_some())
            .field("profiles", &self.profiles.is_some())
            .field("email_patterns", &self.email_patterns.is_some())
            .finish()
    }
}

impl StateEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company_lookup(mut self, lookup: Arc<dyn CompanyLookup>) -> Self {
        self.companies = Some(lookup);
        self
    }

    pub fn with_linkedin_resolver(mut self, resolver: Arc<dyn LinkedInResolver>) -> Self {
        self.profiles = Some(resolver);
        self
    }

    pub fn with_email_patterns(mut self, source: Arc<dyn EmailPatternSource>) -> Self {
        self.email_patterns = Some(source);
        self
    }

    pub fn enrich(&self, mut state: PersonState) -> PersonState {
        if state.company_id.is_none() {
            if let (Some(lookup), Some(name)) = (&self.companies, state.company_name.as_deref()) {
                state.company_id = lookup.lookup_company_id(name);
            }
        }
        if state.linkedin_url.is_none() {
            if let (Some(resolver), Some(name)) = (&self.profiles, state.full_name.as_deref()) {
                state.linkedin_url = resolver.resolve_profile(name, state.company_name.as_deref());
            }
        }
        state
    }

    /// Likely work address at the person's current company, if a pattern is known.
    pub fn email_candidate(&self, state: &PersonState) -> Option<String> {
        let source = self.email_patterns.as_ref()?;
        let company_id = state.company_id.as_deref()?;
        let full_name = state.full_name.as_deref()?;
        source.email_pattern(company_id)?.render(full_name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::enrichment::fixtures::*;

    fn enricher() -> StateEnricher {
        let data = Arc::new(
            FixtureData::from_json(
                r#"{
                    "companies": { "NewCo": "C2" },
                    "profiles": [ { "full_name": "Ada Lovelace", "linkedin_url": "https://linkedin.com/in/ada" } ],
                    "email_patterns": { "C2": { "pattern": "{first}.{last}", "domain": "newco.io" } }
                }"#,
            )
            .unwrap(),
        );
        StateEnricher::new()
            .with_company_lookup(Arc::new(FixtureCompanyLookup::new(data.clone())))
            .with_linkedin_resolver(Arc::new(FixtureLinkedInResolver::new(data.clone())))
            .with_email_patterns(Arc::new(FixtureEmailPatternSource::new(data)))
    }

    fn ada() -> PersonState {
        let mut s = PersonState::new("p1", Utc::now());
        s.full_name = Some("Ada Lovelace".into());
        s.company_name = Some("newco".into());
        s
    }

    #[test]
    fn test_fills_missing_fields() {
        let s = enricher().enrich(ada());
        assert_eq!(s.company_id.as_deref(), Some("C2"));
        assert_eq!(s.linkedin_url.as_deref(), Some("https://linkedin.com/in/ada"));
    }

    #[test]
    fn test_never_overwrites_supplied_values() {
        let mut state = ada();
        state.company_id = Some("C9".into());
        assert_eq!(enricher().enrich(state).company_id.as_deref(), Some("C9"));
    }

    #[test]
    fn test_email_candidate() {
        let e = enricher();
        let s = e.enrich(ada());
        assert_eq!(e.email_candidate(&s).as_deref(), Some("ada.lovelace@newco.io"));
        assert_eq!(StateEnricher::new().email_candidate(&s), None);
    }

    #[test]
    fn test_empty_enricher_is_identity() {
        let state = ada();
        assert_eq!(StateEnricher::new().enrich(state.clone()), state);
    }
}
