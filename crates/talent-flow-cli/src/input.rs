//! People input: a JSON array of states, or one JSON object per line.

use std::path::Path;

use serde_json::Value;
use talent_flow_core::errors::ConfigError;
use talent_flow_core::types::PersonState;
use tracing::warn;

/// Parsed states plus the count of records that did not deserialize.
#[derive(Debug, Default)]
pub struct PeopleInput {
    pub states: Vec<PersonState>,
    pub rejected: usize,
}

pub fn load_people(path: &Path) -> Result<PeopleInput, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
    parse_people(&content).map_err(|message| ConfigError::ParseError {
        path: path.display().to_string(),
        message,
    })
}

/// Only a missing file is `FileNotFound`; any other read failure keeps its
/// io message.
fn read_error(path: &Path, e: std::io::Error) -> ConfigError {
    let path = path.display().to_string();
    match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileNotFound { path },
        _ => ConfigError::ParseError {
            path,
            message: e.to_string(),
        },
    }
}

/// A document that is not an array is read as JSON lines. Individual bad
/// records are skipped with a warning; only an unreadable array is an error.
pub fn parse_people(content: &str) -> Result<PeopleInput, String> {
    let mut input = PeopleInput::default();
    if content.trim_start().starts_with('[') {
        let records: Vec<Value> = serde_json::from_str(content).map_err(|e| e.to_string())?;
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<PersonState>(record) {
                Ok(state) => input.states.push(state),
                Err(e) => {
                    warn!(record = index, error = %e, "skipping unreadable person record");
                    input.rejected += 1;
                }
            }
        }
        return Ok(input);
    }

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<PersonState>(line) {
            Ok(state) => input.states.push(state),
            Err(e) => {
                warn!(line = index + 1, error = %e, "skipping unreadable person record");
                input.rejected += 1;
            }
        }
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_array() {
        let input = parse_people(
            r#"[
                {"person_id": "p1", "company_name": "Acme", "observed_at": "2026-05-01T00:00:00Z"},
                {"person_id": "p2", "observed_at": "not a date"},
                {"person_id": "p3", "data_source": "linkedin", "observed_at": "2026-05-02T00:00:00Z"}
            ]"#,
        )
        .unwrap();
        assert_eq!(input.states.len(), 2);
        assert_eq!(input.rejected, 1);
        assert_eq!(input.states[0].company_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_json_lines_skip_bad_and_blank() {
        let input = parse_people(
            "{\"person_id\": \"p1\", \"observed_at\": \"2026-05-01T00:00:00Z\"}\n\
             \n\
             {broken\n\
             {\"person_id\": \"p2\", \"title\": \"CTO\", \"observed_at\": \"2026-05-01T00:00:00Z\"}\n",
        )
        .unwrap();
        assert_eq!(input.states.len(), 2);
        assert_eq!(input.rejected, 1);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_people(&dir.path().join("absent.jsonl")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_unreadable_input_keeps_io_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.jsonl");
        std::fs::write(&path, [0xff, 0xfe, b'{']).unwrap();
        match load_people(&path).unwrap_err() {
            ConfigError::ParseError { message, .. } => {
                assert!(message.contains("UTF-8"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncated_array_is_an_error() {
        assert!(parse_people("[{\"person_id\": \"p1\"").is_err());
    }
}
