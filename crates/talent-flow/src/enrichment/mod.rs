//! Enrichment: fill resolvable identity fields before fingerprinting.

pub mod enricher;
pub mod fixtures;

pub use enricher::StateEnricher;
pub use fixtures::{
    FixtureCompanyLookup, FixtureData, FixtureEmailPatternSource, FixtureLinkedInResolver,
    FixtureProfile,
};
