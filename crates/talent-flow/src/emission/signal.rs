//! Pure `Movement -> Signal` mapping.

use chrono::NaiveDate;
use talent_flow_core::types::{ContradictionKind, Movement, MovementType, Signal};

fn transition_digest(parts: [&str; 5]) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update(&[0x1f]);
    }
    hasher.finalize().to_hex()[..32].to_string()
}

/// Movement id keyed on the transition it describes: the person, the type,
/// and the (dated) fingerprint pair. Re-detecting the same transition after
/// a failed commit yields the same id.
pub fn movement_id_for(
    person_id: &str,
    movement_type: MovementType,
    old_snapshot_date: NaiveDate,
    old_fingerprint: &str,
    new_fingerprint: &str,
) -> String {
    let date = old_snapshot_date.to_string();
    let digest = transition_digest([
        person_id,
        movement_type.as_str(),
        date.as_str(),
        old_fingerprint,
        new_fingerprint,
    ]);
    format!("mv_{digest}")
}

/// Contradiction id, keyed like `movement_id_for` with the pattern in place
/// of the movement type.
pub fn contradiction_id_for(
    person_id: &str,
    kind: ContradictionKind,
    old_snapshot_date: NaiveDate,
    old_fingerprint: &str,
    new_fingerprint: &str,
) -> String {
    let date = old_snapshot_date.to_string();
    let digest = transition_digest([
        person_id,
        kind.as_str(),
        date.as_str(),
        old_fingerprint,
        new_fingerprint,
    ]);
    format!("ct_{digest}")
}

/// Stable signal id for a movement: same movement, same id.
pub fn signal_id_for(movement_id: &str) -> String {
    let digest = blake3::hash(format!("signal\x1f{movement_id}").as_bytes());
    format!("sig_{}", &digest.to_hex()[..32])
}

/// `signal_type = movement_<type>`, `signal_weight = round(base * confidence)`.
///
/// An exit signal points at the company the person left; every other type
/// at the company in the new state.
pub fn derive_signal(movement: &Movement, base_weight: u32) -> Signal {
    let company_id = match movement.movement_type {
        MovementType::Exit => movement.old_state.company_id.clone(),
        _ => movement.new_state.company_id.clone(),
    };
    Signal {
        signal_id: signal_id_for(&movement.movement_id),
        person_id: movement.person_id.clone(),
        company_id,
        signal_type: movement.movement_type.signal_type(),
        signal_weight: (f64::from(base_weight) * movement.confidence).round() as i64,
        source_id: movement.movement_id.clone(),
        detected_at: movement.detected_at,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use talent_flow_core::types::{DataSource, PersonState};

    use super::*;

    fn movement(confidence: f64) -> Movement {
        let now = Utc::now();
        let mut new_state = PersonState::new("p1", now);
        new_state.company_id = Some("C2".into());
        Movement {
            movement_id: "mv-1".into(),
            person_id: "p1".into(),
            movement_type: MovementType::Hire,
            confidence,
            old_state: PersonState::new("p1", now),
            new_state,
            data_source: DataSource::LinkedIn,
            metadata: serde_json::json!({}),
            detected_at: now,
        }
    }

    #[test]
    fn test_signal_shape() {
        let s = derive_signal(&movement(0.9), 30);
        assert_eq!(s.signal_type, "movement_hire");
        assert_eq!(s.signal_weight, 27);
        assert_eq!(s.source_id, "mv-1");
        assert_eq!(s.company_id.as_deref(), Some("C2"));
    }

    #[test]
    fn test_signal_is_deterministic() {
        let m = movement(0.77);
        assert_eq!(derive_signal(&m, 25), derive_signal(&m, 25));
        assert_ne!(signal_id_for("mv-1"), signal_id_for("mv-2"));
    }

    #[test]
    fn test_movement_id_depends_on_transition() {
        let d = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let a = movement_id_for("p1", MovementType::Hire, d, "f0", "f1");
        assert_eq!(a, movement_id_for("p1", MovementType::Hire, d, "f0", "f1"));
        assert_ne!(a, movement_id_for("p1", MovementType::Exit, d, "f0", "f1"));
        assert_ne!(a, movement_id_for("p1", MovementType::Hire, d.succ_opt().unwrap(), "f0", "f1"));
    }

    #[test]
    fn test_exit_signal_points_at_previous_company() {
        let mut m = movement(0.9);
        m.movement_type = MovementType::Exit;
        m.old_state.company_id = Some("C1".into());
        let s = derive_signal(&m, 20);
        assert_eq!(s.signal_type, "movement_exit");
        assert_eq!(s.company_id.as_deref(), Some("C1"));

        m.new_state.company_id = None;
        assert_eq!(derive_signal(&m, 20).company_id.as_deref(), Some("C1"));
    }

    #[test]
    fn test_contradiction_id_depends_on_transition() {
        let d = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let kind = ContradictionKind::CompanyNameChangedIdStable;
        let a = contradiction_id_for("p1", kind, d, "f0", "f1");
        assert!(a.starts_with("ct_"));
        assert_eq!(a, contradiction_id_for("p1", kind, d, "f0", "f1"));
        assert_ne!(a, contradiction_id_for("p1", ContradictionKind::EndDateCleared, d, "f0", "f1"));
        assert_ne!(a, contradiction_id_for("p1", kind, d, "f0", "f2"));
    }

    #[test]
    fn test_weight_rounds_half_away_from_zero() {
        assert_eq!(derive_signal(&movement(0.5), 15).signal_weight, 8);
    }
}
