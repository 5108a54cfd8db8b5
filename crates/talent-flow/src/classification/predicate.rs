//! Evaluation of the `Predicate` tagged union.
//!
//! Pure and allocation-light: predicates are evaluated once per rule per
//! changed state pair.

use chrono::{DateTime, Utc};
use talent_flow_core::config::Predicate;
use talent_flow_core::types::PersonState;

use crate::diff::ChangeSet;

/// Everything a predicate may look at.
#[derive(Debug, Clone, Copy)]
pub struct PredicateContext<'a> {
    pub old: &'a PersonState,
    pub new: &'a PersonState,
    pub changes: &'a ChangeSet,
    /// Evaluation time, for `recent`.
    pub now: DateTime<Utc>,
}

impl<'a> PredicateContext<'a> {
    pub fn evaluate(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::FieldChanged(field) => self.changes.contains(*field),
            Predicate::FieldUnchanged(field) => !self.changes.contains(*field),
            Predicate::LevelIncreased(field) => {
                match (self.old.level(*field), self.new.level(*field)) {
                    (Some(before), Some(after)) => after > before,
                    _ => false,
                }
            }
            Predicate::TitleMatches(keywords) => {
                let new_title = self.new.title.as_deref().unwrap_or_default();
                let old_title = self.old.title.as_deref().unwrap_or_default();
                keywords.iter().any(|kw| {
                    title_has_keyword(new_title, kw) && !title_has_keyword(old_title, kw)
                })
            }
            Predicate::WasNull(field) => !self.old.is_present(*field),
            Predicate::IsNull(field) => !self.new.is_present(*field),
            Predicate::IsPresent(field) => self.new.is_present(*field),
            Predicate::Recent(window) => match self.new.date(window.field) {
                // Future dates (announced moves) count as recent.
                Some(date) => {
                    (self.now.date_naive() - date).num_days() <= i64::from(window.days)
                }
                None => false,
            },
            Predicate::All(children) => children.iter().all(|p| self.evaluate(p)),
            Predicate::Any(children) => children.iter().any(|p| self.evaluate(p)),
            Predicate::Not(inner) => !self.evaluate(inner),
        }
    }
}

/// Case-insensitive keyword test. Single words match whole words only
/// ("lead" does not match "leader"); phrases match as substrings.
pub fn title_has_keyword(title: &str, keyword: &str) -> bool {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return false;
    }
    let lower = title.to_lowercase();
    if keyword.contains(' ') {
        return lower.contains(&keyword);
    }
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == keyword)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use talent_flow_core::config::RecentWindow;
    use talent_flow_core::types::Field;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    fn person(title: Option<&str>, company: Option<&str>) -> PersonState {
        let mut s = PersonState::new("p1", now());
        s.title = title.map(String::from);
        s.company_name = company.map(String::from);
        s.normalized()
    }

    fn eval(old: &PersonState, new: &PersonState, changes: &[Field], p: &Predicate) -> bool {
        let changes: ChangeSet = changes.iter().copied().collect();
        PredicateContext {
            old,
            new,
            changes: &changes,
            now: now(),
        }
        .evaluate(p)
    }

    #[test]
    fn test_level_increased() {
        let old = person(Some("Engineer"), Some("Acme"));
        let new = person(Some("Senior Engineer"), Some("Acme"));
        let p = Predicate::LevelIncreased(Field::TitleLevel);
        assert!(eval(&old, &new, &[Field::Title, Field::TitleLevel], &p));
        assert!(!eval(&new, &old, &[Field::Title, Field::TitleLevel], &p));
    }

    #[test]
    fn test_title_matches_requires_new_keyword() {
        let p = Predicate::title_matches(["manager"]);
        let sales = person(Some("Sales Manager"), Some("Acme"));
        let marketing = person(Some("Marketing Manager"), Some("Acme"));
        let rep = person(Some("Sales Rep"), Some("Acme"));
        assert!(eval(&rep, &sales, &[Field::Title], &p));
        assert!(!eval(&sales, &marketing, &[Field::Title], &p));
    }

    #[test]
    fn test_null_predicates() {
        let old = person(None, Some("Acme"));
        let new = person(Some("Engineer"), None);
        assert!(eval(&old, &new, &[], &Predicate::WasNull(Field::Title)));
        assert!(eval(&old, &new, &[], &Predicate::IsNull(Field::CompanyName)));
        assert!(eval(&old, &new, &[], &Predicate::IsPresent(Field::Title)));
    }

    #[test]
    fn test_recent_window() {
        let old = person(None, None);
        let mut new = person(None, None);
        let p = Predicate::Recent(RecentWindow {
            field: Field::StartDate,
            days: 30,
        });
        assert!(!eval(&old, &new, &[], &p));
        new.start_date = NaiveDate::from_ymd_opt(2026, 6, 1);
        assert!(eval(&old, &new, &[], &p));
        new.start_date = NaiveDate::from_ymd_opt(2026, 1, 1);
        assert!(!eval(&old, &new, &[], &p));
        new.start_date = NaiveDate::from_ymd_opt(2026, 7, 1);
        assert!(eval(&old, &new, &[], &p));
    }

    #[test]
    fn test_combinators() {
        let s = person(Some("Engineer"), Some("Acme"));
        let yes = Predicate::IsPresent(Field::Title);
        let no = Predicate::IsNull(Field::Title);
        assert!(eval(&s, &s, &[], &Predicate::all([yes.clone(), Predicate::not(no.clone())])));
        assert!(eval(&s, &s, &[], &Predicate::any([no.clone(), yes.clone()])));
        assert!(!eval(&s, &s, &[], &Predicate::all([yes, no])));
    }

    #[test]
    fn test_keyword_whole_word() {
        assert!(title_has_keyword("Team Lead, Payments", "lead"));
        assert!(!title_has_keyword("Team Leader", "lead"));
        assert!(title_has_keyword("Vice President, Sales", "vice president"));
        assert!(!title_has_keyword("Engineer", " "));
    }
}
