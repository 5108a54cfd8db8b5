//! `PersonState`: one point-in-time snapshot of a person's employment attributes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which vendor supplied a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    LinkedIn,
    Apollo,
    Apify,
    Manual,
    CsvImport,
    #[default]
    Unknown,
}

impl DataSource {
    pub const ALL: [DataSource; 6] = [
        DataSource::LinkedIn,
        DataSource::Apollo,
        DataSource::Apify,
        DataSource::Manual,
        DataSource::CsvImport,
        DataSource::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinkedIn => "linkedin",
            Self::Apollo => "apollo",
            Self::Apify => "apify",
            Self::Manual => "manual",
            Self::CsvImport => "csv_import",
            Self::Unknown => "unknown",
        }
    }

    /// Strict parse: `None` for names that are not a known source.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|s| s.as_str() == normalized)
    }
}

impl FromStr for DataSource {
    type Err = std::convert::Infallible;

    /// Lenient parse: unrecognized vendors map to `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s).unwrap_or(Self::Unknown))
    }
}

impl From<String> for DataSource {
    fn from(value: String) -> Self {
        Self::parse(&value).unwrap_or(Self::Unknown)
    }
}

impl From<DataSource> for String {
    fn from(value: DataSource) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison-relevant fields of a `PersonState`.
///
/// `person_id`, `data_source`, and `observed_at` are identity/provenance,
/// never comparison fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    Title,
    CompanyName,
    CompanyId,
    Department,
    StartDate,
    EndDate,
    LinkedinUrl,
    TitleLevel,
    OrgLayer,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::FullName,
        Field::Title,
        Field::CompanyName,
        Field::CompanyId,
        Field::Department,
        Field::StartDate,
        Field::EndDate,
        Field::LinkedinUrl,
        Field::TitleLevel,
        Field::OrgLayer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Title => "title",
            Self::CompanyName => "company_name",
            Self::CompanyId => "company_id",
            Self::Department => "department",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::LinkedinUrl => "linkedin_url",
            Self::TitleLevel => "title_level",
            Self::OrgLayer => "org_layer",
        }
    }

    /// Ordinal fields support `level_increased`.
    pub fn is_ordinal(&self) -> bool {
        matches!(self, Self::TitleLevel | Self::OrgLayer)
    }

    /// Date fields support `recent`.
    pub fn is_date(&self) -> bool {
        matches!(self, Self::StartDate | Self::EndDate)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-in-time snapshot of one person's employment-relevant attributes.
///
/// Every attribute except `person_id` and `observed_at` may be absent;
/// a missing key and an explicit `null` deserialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonState {
    /// Stable external identifier. Empty means malformed input.
    #[serde(default)]
    pub person_id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    /// Seniority ordinal derived from the title when not supplied.
    #[serde(default)]
    pub title_level: Option<u8>,
    /// Optional secondary seniority signal; higher is more senior.
    #[serde(default)]
    pub org_layer: Option<u8>,
    #[serde(default)]
    pub data_source: DataSource,
    pub observed_at: DateTime<Utc>,
}

impl PersonState {
    /// A bare state with only identity and observation time set.
    pub fn new(person_id: impl Into<String>, observed_at: DateTime<Utc>) -> Self {
        Self {
            person_id: person_id.into(),
            full_name: None,
            title: None,
            company_name: None,
            company_id: None,
            department: None,
            start_date: None,
            end_date: None,
            linkedin_url: None,
            title_level: None,
            org_layer: None,
            data_source: DataSource::Unknown,
            observed_at,
        }
    }

    /// Fill derived attributes: blank strings become `None` and a missing
    /// `title_level` is derived from the title text.
    pub fn normalized(mut self) -> Self {
        for slot in [
            &mut self.full_name,
            &mut self.title,
            &mut self.company_name,
            &mut self.company_id,
            &mut self.department,
            &mut self.linkedin_url,
        ] {
            if slot.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *slot = None;
            }
        }
        if self.title_level.is_none() {
            self.title_level = Some(derive_title_level(self.title.as_deref()));
        }
        self
    }

    /// Textual value of a comparison field, `None` when absent.
    /// Dates render as ISO-8601, ordinals as decimal.
    pub fn field_text(&self, field: Field) -> Option<String> {
        match field {
            Field::FullName => self.full_name.clone(),
            Field::Title => self.title.clone(),
            Field::CompanyName => self.company_name.clone(),
            Field::CompanyId => self.company_id.clone(),
            Field::Department => self.department.clone(),
            Field::StartDate => self.start_date.map(|d| d.to_string()),
            Field::EndDate => self.end_date.map(|d| d.to_string()),
            Field::LinkedinUrl => self.linkedin_url.clone(),
            Field::TitleLevel => self.title_level.map(|l| l.to_string()),
            Field::OrgLayer => self.org_layer.map(|l| l.to_string()),
        }
    }

    /// Whether a field carries a non-blank value.
    pub fn is_present(&self, field: Field) -> bool {
        self.field_text(field).is_some_and(|v| !v.trim().is_empty())
    }

    /// Ordinal value for `title_level` / `org_layer`.
    pub fn level(&self, field: Field) -> Option<u8> {
        match field {
            Field::TitleLevel => self.title_level,
            Field::OrgLayer => self.org_layer,
            _ => None,
        }
    }

    /// Date value for `start_date` / `end_date`.
    pub fn date(&self, field: Field) -> Option<NaiveDate> {
        match field {
            Field::StartDate => self.start_date,
            Field::EndDate => self.end_date,
            _ => None,
        }
    }
}

/// Keyword ladder for title seniority, highest rung first.
const TITLE_LADDER: &[(u8, &[&str])] = &[
    (
        7,
        &["chief", "ceo", "cto", "cfo", "coo", "cmo", "cio", "ciso", "founder", "president", "owner", "partner"],
    ),
    (6, &["vice president", "vp", "svp", "evp", "avp"]),
    (5, &["director", "head of", "head"]),
    (4, &["manager", "mgr"]),
    (3, &["senior", "sr", "lead", "staff", "principal"]),
    (1, &["intern", "trainee", "junior", "jr", "assistant", "associate", "apprentice"]),
];

/// Derive a seniority ordinal from free-form title text.
///
/// 0 = absent, 1 = entry, 2 = individual contributor, 3 = senior/lead,
/// 4 = manager, 5 = director, 6 = vice president, 7 = executive.
pub fn derive_title_level(title: Option<&str>) -> u8 {
    let Some(title) = title.map(str::trim).filter(|t| !t.is_empty()) else {
        return 0;
    };
    let lower = title.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for (level, keywords) in TITLE_LADDER {
        let hit = keywords.iter().any(|kw| {
            if kw.contains(' ') {
                lower.contains(kw)
            } else {
                words.iter().any(|w| w == kw)
            }
        });
        if hit {
            return *level;
        }
    }
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_level_ladder() {
        assert_eq!(derive_title_level(None), 0);
        assert_eq!(derive_title_level(Some("   ")), 0);
        assert_eq!(derive_title_level(Some("Engineer")), 2);
        assert_eq!(derive_title_level(Some("Senior Engineer")), 3);
        assert_eq!(derive_title_level(Some("Engineering Manager")), 4);
        assert_eq!(derive_title_level(Some("Director of Sales")), 5);
        assert_eq!(derive_title_level(Some("VP, Marketing")), 6);
        assert_eq!(derive_title_level(Some("Chief Technology Officer")), 7);
        assert_eq!(derive_title_level(Some("Junior Analyst")), 1);
    }

    #[test]
    fn test_title_level_highest_rung_wins() {
        // "Senior Director" is a director, not a senior IC.
        assert_eq!(derive_title_level(Some("Senior Director, Platform")), 5);
    }

    #[test]
    fn test_title_level_matches_whole_words() {
        assert_eq!(derive_title_level(Some("Staffing Coordinator")), 2);
        assert_eq!(derive_title_level(Some("Team Leader")), 2);
    }

    #[test]
    fn test_normalized_blanks_and_derives_level() {
        let mut state = PersonState::new("p1", Utc::now());
        state.title = Some("Senior Engineer".into());
        state.department = Some("  ".into());
        let state = state.normalized();
        assert_eq!(state.department, None);
        assert_eq!(state.title_level, Some(3));
    }

    #[test]
    fn test_normalized_keeps_supplied_level() {
        let mut state = PersonState::new("p1", Utc::now());
        state.title = Some("Engineer".into());
        state.title_level = Some(5);
        assert_eq!(state.normalized().title_level, Some(5));
    }

    #[test]
    fn test_missing_and_null_deserialize_identically() {
        let a: PersonState = serde_json::from_str(
            r#"{"person_id":"p1","observed_at":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let b: PersonState = serde_json::from_str(
            r#"{"person_id":"p1","title":null,"observed_at":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_data_source_is_lenient() {
        let s: PersonState = serde_json::from_str(
            r#"{"person_id":"p1","data_source":"Some Scraper","observed_at":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(s.data_source, DataSource::Unknown);
        assert_eq!(DataSource::parse("LinkedIn"), Some(DataSource::LinkedIn));
        assert_eq!(DataSource::parse("nope"), None);
    }
}
