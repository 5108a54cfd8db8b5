//! `PersonEvaluator`: one person, left to right.
//!
//! enrich -> fingerprint -> hash guard -> diff -> contradictions ->
//! classify -> score/filter -> conflicts -> cooldown/rate cap -> commit.
//!
//! Everything before the commit is pure apart from reads. The snapshot is
//! written on every changed path, including suppressed ones, so the next
//! diff is computed against current truth.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use talent_flow_core::config::{RetryConfig, TalentFlowConfig};
use talent_flow_core::errors::EvaluationError;
use talent_flow_core::traits::{AuditSink, ITalentFlowStorage};
use talent_flow_core::types::{
    AuditEvent, AuditEventType, AuditSeverity, Contradiction, GovernanceState, Movement,
    MovementType, PersonState, RunSummary, Snapshot,
};
use tracing::{debug, warn};

use crate::classification::Classifier;
use crate::diff::{has_changed, ChangeSet, Fingerprinter};
use crate::emission::{movement_id_for, with_retry, CommitPlan, SignalEmitter};
use crate::enrichment::StateEnricher;
use crate::governance::{period_key, ContradictionDetector, SafetyGovernor, Transition};
use crate::scoring::{resolve_conflicts, same_employer, MovementEvaluator, ScoredMovement};

pub struct PersonEvaluator {
    fingerprinter: Fingerprinter,
    classifier: Classifier,
    movements: MovementEvaluator,
    governor: SafetyGovernor,
    contradictions: ContradictionDetector,
    emitter: SignalEmitter,
    enricher: StateEnricher,
    store: Arc<dyn ITalentFlowStorage>,
    audit: Arc<dyn AuditSink>,
    retry: RetryConfig,
}

/// Per-call audit context.
struct Ctx<'a> {
    worker_id: &'a str,
    person_id: &'a str,
    now: DateTime<Utc>,
}

impl PersonEvaluator {
    pub fn new(
        config: &TalentFlowConfig,
        store: Arc<dyn ITalentFlowStorage>,
        audit: Arc<dyn AuditSink>,
        enricher: StateEnricher,
    ) -> Self {
        Self {
            fingerprinter: Fingerprinter::new(&config.fingerprint),
            classifier: Classifier::from_config(config),
            movements: MovementEvaluator::from_config(config),
            governor: SafetyGovernor::from_config(&config.governance),
            contradictions: ContradictionDetector::from_config(&config.contradictions),
            emitter: SignalEmitter::new(store.clone(), config),
            enricher,
            store,
            audit,
            retry: config.storage.retry.clone(),
        }
    }

    fn record(&self, ctx: &Ctx<'_>, event_type: AuditEventType, data: serde_json::Value) {
        self.audit
            .record(&AuditEvent::info(ctx.worker_id, ctx.person_id, event_type, data).at(ctx.now));
    }

    /// Evaluate one selected candidate and fold its counts into `summary`.
    ///
    /// Errors are per-person: a failed lookup or commit leaves governance
    /// untouched and the caller moves on to the next person.
    pub fn evaluate(
        &self,
        state: PersonState,
        worker_id: &str,
        now: DateTime<Utc>,
        summary: &mut RunSummary,
    ) -> Result<(), EvaluationError> {
        let state = self.enricher.enrich(state.normalized()).normalized();
        let person_id = state.person_id.clone();
        let ctx = Ctx {
            worker_id,
            person_id: &person_id,
            now,
        };

        let fingerprint = self.fingerprinter.fingerprint(&state);
        let snapshot = Snapshot {
            person_id: person_id.clone(),
            state: state.clone(),
            fingerprint: fingerprint.clone(),
            snapshot_date: now.date_naive(),
            created_at: now,
        };

        let last = with_retry("get_last_snapshot", &self.retry, || {
            self.store.get_last_snapshot(&person_id)
        })
        .map_err(|source| EvaluationError::LookupFailed {
            person_id: person_id.clone(),
            source,
        })?;

        // First observation: nothing to diff against.
        let Some(last) = last else {
            self.emitter.save_snapshot(&snapshot)?;
            summary.baselined += 1;
            summary.snapshots_saved += 1;
            self.record(&ctx, AuditEventType::BaselineSnapshot, json!({ "fingerprint": fingerprint }));
            return Ok(());
        };

        // Guard 1: hash unchanged. The classifier never runs.
        if !has_changed(&last.fingerprint, &fingerprint) {
            summary.unchanged += 1;
            debug!(person_id = %person_id, "hash unchanged");
            self.record(&ctx, AuditEventType::HashUnchanged, json!({ "fingerprint": fingerprint }));
            return Ok(());
        }

        let old = &last.state;
        let changes = self.fingerprinter.changed_fields(old, &state);

        let transition = Transition {
            old,
            new: &state,
            old_snapshot_date: last.snapshot_date,
            old_fingerprint: &last.fingerprint,
            new_fingerprint: &fingerprint,
        };
        let mut contradictions = self.contradictions.detect(&transition, now);

        let classifications = self.classifier.classify(old, &state, &changes, now);
        let had_candidates = !classifications.is_empty();
        let evaluation = self.movements.evaluate(classifications, &state, now);
        for rejected in &evaluation.rejected {
            summary.below_threshold += 1;
            self.record(
                &ctx,
                AuditEventType::BelowThreshold,
                json!({
                    "movement_type": rejected.movement_type,
                    "confidence": rejected.confidence,
                    "min_confidence": rejected.min_confidence,
                }),
            );
        }

        let resolution = resolve_conflicts(evaluation.accepted, same_employer(old, &state));
        if resolution.is_ambiguous() {
            let raw_weight = resolution.kept.first().map_or(0.0, ScoredMovement::raw_weight);
            contradictions.extend(self.contradictions.ambiguous(
                &transition,
                &resolution.tied,
                raw_weight,
                now,
            ));
        }
        for dropped in &resolution.dropped {
            debug!(
                person_id = %person_id,
                movement_type = %dropped.movement_type(),
                "conflicting movement dropped at same employer"
            );
        }

        self.record_contradictions(&ctx, contradictions, summary);

        if resolution.kept.is_empty() {
            if !had_candidates {
                self.record(
                    &ctx,
                    AuditEventType::NoMovementDetected,
                    json!({ "changed_fields": changes.names() }),
                );
            }
            self.emitter.save_snapshot(&snapshot)?;
            summary.snapshots_saved += 1;
            return Ok(());
        }

        let governance = with_retry("get_governance_state", &self.retry, || {
            self.store.get_governance_state(&person_id)
        })
        .map_err(|source| EvaluationError::LookupFailed {
            person_id: person_id.clone(),
            source,
        })?
        .unwrap_or_else(|| GovernanceState::new(person_id.as_str()));

        let admission = self.governor.admit(&governance, resolution.kept, now);
        for vetoed in &admission.suppressed_cooldown {
            summary.suppressed_cooldown += 1;
            self.record(
                &ctx,
                AuditEventType::CooldownSuppressed,
                json!({
                    "movement_type": vetoed.movement_type(),
                    "confidence": vetoed.confidence(),
                    "last_movement_at": governance.last_movement_at,
                }),
            );
        }
        for capped in &admission.suppressed_rate_cap {
            summary.suppressed_rate_cap += 1;
            self.record(
                &ctx,
                AuditEventType::RateCapSuppressed,
                json!({
                    "movement_type": capped.movement_type(),
                    "confidence": capped.confidence(),
                    "period_key": period_key(now),
                }),
            );
        }

        if admission.admitted.is_empty() {
            self.emitter.save_snapshot(&snapshot)?;
            summary.snapshots_saved += 1;
            return Ok(());
        }

        let movements: Vec<Movement> = admission
            .admitted
            .iter()
            .map(|scored| self.build_movement(scored, &last, &state, &fingerprint, &changes, now))
            .collect();

        let report = self.emitter.commit(CommitPlan {
            person_id: person_id.clone(),
            movements,
            snapshot,
            governance: Some(admission.next_state),
        })?;

        summary.snapshots_saved += 1;
        for movement in &report.movements {
            summary.record_movement(movement.movement_type);
            self.record(
                &ctx,
                AuditEventType::MovementAccepted,
                json!({
                    "movement_id": movement.movement_id,
                    "movement_type": movement.movement_type,
                    "confidence": movement.confidence,
                }),
            );
        }
        for signal in &report.signals {
            summary.signals_emitted += 1;
            self.record(
                &ctx,
                AuditEventType::SignalEmitted,
                json!({
                    "signal_id": signal.signal_id,
                    "signal_type": signal.signal_type,
                    "signal_weight": signal.signal_weight,
                }),
            );
        }
        Ok(())
    }

    fn build_movement(
        &self,
        scored: &ScoredMovement,
        last: &Snapshot,
        new: &PersonState,
        new_fingerprint: &str,
        changes: &ChangeSet,
        now: DateTime<Utc>,
    ) -> Movement {
        let movement_type = scored.movement_type();
        let mut metadata = json!({
            "matched_rules": scored.matched_rules(),
            "raw_weight": scored.raw_weight(),
            "score": scored.breakdown(),
            "changed_fields": changes.names(),
            "previous_snapshot_date": last.snapshot_date,
        });
        if movement_type == MovementType::Hire {
            if let Some(email) = self.enricher.email_candidate(new) {
                metadata["email_candidate"] = json!(email);
            }
        }
        Movement {
            movement_id: movement_id_for(
                &new.person_id,
                movement_type,
                last.snapshot_date,
                &last.fingerprint,
                new_fingerprint,
            ),
            person_id: new.person_id.clone(),
            movement_type,
            confidence: scored.confidence(),
            old_state: last.state.clone(),
            new_state: new.clone(),
            data_source: new.data_source,
            metadata,
            detected_at: now,
        }
    }

    /// Advisory: a failed write is logged and never fails the person.
    fn record_contradictions(
        &self,
        ctx: &Ctx<'_>,
        contradictions: Vec<Contradiction>,
        summary: &mut RunSummary,
    ) {
        for contradiction in contradictions {
            match self.emitter.save_contradiction(&contradiction) {
                Ok(()) => {
                    summary.contradictions_detected += 1;
                    self.record(
                        ctx,
                        AuditEventType::ContradictionDetected,
                        json!({
                            "contradiction_id": contradiction.contradiction_id,
                            "contradiction_type": contradiction.contradiction_type,
                            "severity": contradiction.severity,
                            "detail": contradiction.detail,
                        }),
                    );
                }
                Err(e) => {
                    warn!(person_id = %ctx.person_id, error = %e, "contradiction not persisted");
                    self.audit.record(
                        &AuditEvent::with_severity(
                            ctx.worker_id,
                            ctx.person_id,
                            AuditEventType::PersistenceFailed,
                            json!({ "stage": "contradiction", "error": e.to_string() }),
                            AuditSeverity::Warning,
                        )
                        .at(ctx.now),
                    );
                }
            }
        }
    }
}
