//! Batch runner: select, evaluate in parallel, summarize, persist the run.
//!
//! Candidates are unique per person after selection, so no two workers ever
//! write for the same person. Cancellation is checked before each person; a
//! person already committing finishes its writes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde_json::json;
use talent_flow_core::config::TalentFlowConfig;
use talent_flow_core::errors::{ErrorChain, EvaluationError, TalentFlowErrorCode};
use talent_flow_core::traits::{AuditSink, Cancellable, CancellationToken, ITalentFlowStorage};
use talent_flow_core::types::{AuditEvent, AuditEventType, AuditSeverity, PersonState, RunSummary};
use tracing::{info, warn};

use super::evaluator::PersonEvaluator;
use crate::emission::with_retry;
use crate::enrichment::StateEnricher;
use crate::selection::CandidateSelector;

/// Summary plus every isolated per-person failure.
#[derive(Debug)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub errors: ErrorChain,
}

pub struct TalentFlowRunner {
    config: TalentFlowConfig,
    store: Arc<dyn ITalentFlowStorage>,
    audit: Arc<dyn AuditSink>,
    selector: CandidateSelector,
    evaluator: PersonEvaluator,
    cancel: CancellationToken,
}

fn worker_id() -> String {
    match rayon::current_thread_index() {
        Some(index) => format!("worker-{index}"),
        None => "worker-main".to_string(),
    }
}

impl TalentFlowRunner {
    pub fn new(
        config: TalentFlowConfig,
        store: Arc<dyn ITalentFlowStorage>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let evaluator = PersonEvaluator::new(
            &config,
            store.clone(),
            audit.clone(),
            StateEnricher::new(),
        );
        Self {
            selector: CandidateSelector::from_config(&config.selection),
            evaluator,
            config,
            store,
            audit,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_enricher(mut self, enricher: StateEnricher) -> Self {
        self.evaluator =
            PersonEvaluator::new(&self.config, self.store.clone(), self.audit.clone(), enricher);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &TalentFlowConfig {
        &self.config
    }

    fn thread_pool(&self) -> Option<rayon::ThreadPool> {
        let threads = self.config.runner.effective_threads();
        if threads == 0 {
            return None;
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("talent-flow-{i}"))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!(threads, error = %e, "thread pool build failed, using the global pool");
                None
            }
        }
    }

    /// Run one batch over `states` at evaluation time `now`.
    pub fn run(&self, states: Vec<PersonState>, now: DateTime<Utc>) -> RunOutcome {
        self.run_with_rejected(states, 0, now)
    }

    /// Like `run`, for input where `rejected` records already failed to
    /// decode upstream. They count as malformed in the run summary.
    pub fn run_with_rejected(
        &self,
        states: Vec<PersonState>,
        rejected: u32,
        now: DateTime<Utc>,
    ) -> RunOutcome {
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut summary = RunSummary::new(run_id.as_str(), now);
        info!(run_id = %run_id, records = states.len(), "talent flow run starting");

        let selection = self
            .selector
            .select(states, self.store.as_ref(), self.audit.as_ref(), now);
        summary.skipped_malformed = selection.skipped_malformed + rejected;
        summary.not_active = selection.not_active;
        summary.deferred = selection.deferred.len() as u32;
        let candidate_count = selection.candidates.len();

        let candidates = selection.candidates;
        let evaluate_all = || {
            candidates
                .into_par_iter()
                .fold(
                    || (RunSummary::new(run_id.as_str(), now), ErrorChain::new()),
                    |(mut part, mut errors), state| {
                        self.evaluate_one(state, now, &mut part, &mut errors);
                        (part, errors)
                    },
                )
                .reduce(
                    || (RunSummary::new(run_id.as_str(), now), ErrorChain::new()),
                    |(mut a, mut a_errors), (b, b_errors)| {
                        a.merge(&b);
                        a_errors.extend(b_errors);
                        (a, a_errors)
                    },
                )
        };
        let (partial, errors) = match self.thread_pool() {
            Some(pool) => pool.install(evaluate_all),
            None => evaluate_all(),
        };
        summary.merge(&partial);
        summary.finished_at = Some(Utc::now().max(now));

        if summary.cancelled {
            let skipped = candidate_count.saturating_sub(summary.processed as usize);
            warn!(run_id = %run_id, skipped, "run cancelled, remaining candidates left for next run");
            self.audit.record(
                &AuditEvent::with_severity(
                    "runner",
                    "",
                    AuditEventType::Cancelled,
                    json!({ "run_id": run_id, "skipped": skipped }),
                    AuditSeverity::Warning,
                )
                .at(now),
            );
        }

        self.finish(&summary, now);
        RunOutcome { summary, errors }
    }

    fn evaluate_one(
        &self,
        state: PersonState,
        now: DateTime<Utc>,
        part: &mut RunSummary,
        errors: &mut ErrorChain,
    ) {
        if self.cancel.is_cancelled() {
            part.cancelled = true;
            return;
        }
        let worker_id = worker_id();
        let person_id = state.person_id.clone();
        part.processed += 1;

        if let Err(e) = self.evaluator.evaluate(state, &worker_id, now, part) {
            part.persistence_failures += 1;
            let stage = match &e {
                EvaluationError::PersistenceFailed { stage, .. } => *stage,
                EvaluationError::LookupFailed { .. } => "lookup",
                EvaluationError::InputMalformed { .. } => "input",
            };
            warn!(
                person_id = %person_id,
                stage,
                error = %e.coded_string(),
                "person evaluation failed, continuing batch"
            );
            self.audit.record(
                &AuditEvent::with_severity(
                    worker_id.as_str(),
                    person_id.as_str(),
                    AuditEventType::PersistenceFailed,
                    json!({ "stage": stage, "code": e.error_code(), "error": e.to_string() }),
                    AuditSeverity::Error,
                )
                .at(now),
            );
            errors.push(person_id, e);
        }
    }

    /// Store the run summary, apply retention, and log the summary line.
    /// Failures here are logged; the batch outcome stands.
    fn finish(&self, summary: &RunSummary, now: DateTime<Utc>) {
        let retry = &self.config.storage.retry;
        if let Err(e) = with_retry("save_run", retry, || self.store.save_run(summary)) {
            warn!(run_id = %summary.run_id, error = %e, "run summary not persisted");
        }

        let storage = &self.config.storage;
        match self.store.apply_retention(
            now,
            storage.effective_audit_retention_days(),
            storage.effective_run_retention_days(),
        ) {
            Ok(report) => tracing::debug!(
                audit_events_deleted = report.audit_events_deleted,
                runs_deleted = report.runs_deleted,
                "retention applied"
            ),
            Err(e) => warn!(error = %e, "retention not applied"),
        }

        info!(
            run_id = %summary.run_id,
            processed = summary.processed,
            unchanged = summary.unchanged,
            baselined = summary.baselined,
            not_active = summary.not_active,
            skipped_malformed = summary.skipped_malformed,
            deferred = summary.deferred,
            movements = summary.total_movements(),
            signals_emitted = summary.signals_emitted,
            snapshots_saved = summary.snapshots_saved,
            contradictions = summary.contradictions_detected,
            suppressed_cooldown = summary.suppressed_cooldown,
            suppressed_rate_cap = summary.suppressed_rate_cap,
            below_threshold = summary.below_threshold,
            persistence_failures = summary.persistence_failures,
            cancelled = summary.cancelled,
            "talent flow run complete"
        );
    }
}
