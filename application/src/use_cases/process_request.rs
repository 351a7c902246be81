//! Request orchestration use case
//!
//! Owns one request's lifecycle end to end: measurement fetch, agent
//! panel fan-out, consensus reduction, evidence archival, ledger
//! submission. Stages are hard sequence points; a failure at any stage
//! terminates the run in `Failed(stage, cause)` and the only retry is a
//! fresh run for the same request id.

use crate::config::PipelineParams;
use crate::ports::evidence_store::{ArchiveError, EvidenceIndex, EvidenceStore};
use crate::ports::ledger_gateway::{LedgerGateway, SubmissionError, TransactionHandle};
use crate::ports::measurement_provider::{MeasurementProvider, ProviderError};
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::evaluate_agents::EvaluateAgentsUseCase;
use oracle_domain::{
    AgentResponse, ConsensusError, ConsensusResult, DomainError, EvaluationPackage,
    EvidenceBundle, EvidenceReference, PipelineStage, RequestId, RequestOutcome, RequestState,
    VerificationRequest, compute_consensus,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

/// Errors that can occur during request processing
///
/// Every variant is fatal for the current run and names its stage; the
/// orchestrator performs no cross-stage recovery.
#[derive(Error, Debug)]
pub enum ProcessRequestError {
    #[error("Measurement stage failed: {0}")]
    Measurement(#[from] ProviderError),

    #[error("Consensus stage failed: {0}")]
    Consensus(#[from] ConsensusError),

    #[error("Archive stage failed: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Submission stage failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Lifecycle violation at {stage}: {source}")]
    Lifecycle {
        stage: PipelineStage,
        #[source]
        source: DomainError,
    },
}

impl ProcessRequestError {
    /// The pipeline stage this failure terminates
    pub fn stage(&self) -> PipelineStage {
        match self {
            ProcessRequestError::Measurement(_) => PipelineStage::Measurement,
            ProcessRequestError::Consensus(_) => PipelineStage::Consensus,
            ProcessRequestError::Archive(_) => PipelineStage::Archive,
            ProcessRequestError::Submission(_) => PipelineStage::Submission,
            ProcessRequestError::Lifecycle { stage, .. } => *stage,
        }
    }
}

/// Result of a completed orchestration run
#[derive(Debug)]
pub struct ProcessRequestOutput {
    pub request_id: RequestId,
    /// Terminal state, always `Submitted`
    pub state: RequestState,
    pub outcome: RequestOutcome,
    pub consensus: ConsensusResult,
    /// Every panel response, failed ones included
    pub responses: Vec<AgentResponse>,
    pub evidence: EvidenceReference,
    pub transaction: TransactionHandle,
}

/// Use case for processing one verification request
pub struct ProcessRequestUseCase {
    measurement: Arc<dyn MeasurementProvider>,
    pool: EvaluateAgentsUseCase,
    store: Arc<dyn EvidenceStore>,
    index: Arc<dyn EvidenceIndex>,
    ledger: Arc<dyn LedgerGateway>,
    params: PipelineParams,
}

impl ProcessRequestUseCase {
    pub fn new(
        measurement: Arc<dyn MeasurementProvider>,
        pool: EvaluateAgentsUseCase,
        store: Arc<dyn EvidenceStore>,
        index: Arc<dyn EvidenceIndex>,
        ledger: Arc<dyn LedgerGateway>,
        params: PipelineParams,
    ) -> Self {
        Self {
            measurement,
            pool,
            store,
            index,
            ledger,
            params,
        }
    }

    /// Process one request through the full pipeline
    pub async fn process(
        &self,
        request: &VerificationRequest,
        progress: &dyn ProgressNotifier,
    ) -> Result<ProcessRequestOutput, ProcessRequestError> {
        let started = Instant::now();
        info!(request = %request.request_id, "starting verification pipeline");

        match self.run(request, progress).await {
            Ok(output) => {
                info!(
                    request = %request.request_id,
                    outcome = %output.outcome,
                    tx = %output.transaction,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request completed"
                );
                Ok(output)
            }
            Err(err) => {
                let terminal = RequestState::failed(err.stage(), err.to_string());
                error!(
                    request = %request.request_id,
                    state = %terminal,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request failed"
                );
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        request: &VerificationRequest,
        progress: &dyn ProgressNotifier,
    ) -> Result<ProcessRequestOutput, ProcessRequestError> {
        let mut state = RequestState::Received;

        // Stage 1: Measurement. Fatal on failure - no measurement, no
        // evaluable package.
        progress.on_stage_start(PipelineStage::Measurement);
        let measurement = self
            .measurement
            .fetch(request.latitude, request.longitude)
            .await?;
        state = advance(state, RequestState::MeasurementFetched, PipelineStage::Measurement)?;
        progress.on_stage_complete(PipelineStage::Measurement);
        info!(
            area_sqm = measurement.area_sqm,
            vegetation_index = measurement.vegetation_index,
            "measurement fetched"
        );

        // Stage 2: Agent panel. The pool always returns; sufficiency is
        // judged by the consensus precondition below.
        progress.on_stage_start(PipelineStage::AgentEvaluation);
        let package = EvaluationPackage::new(request, measurement.clone());
        let responses = self.pool.evaluate(&package, progress).await;
        let valid: Vec<AgentResponse> =
            responses.iter().filter(|r| r.is_valid()).cloned().collect();
        state = advance(
            state,
            RequestState::AgentsEvaluated {
                valid: valid.len(),
                failed: responses.len() - valid.len(),
            },
            PipelineStage::AgentEvaluation,
        )?;
        progress.on_stage_complete(PipelineStage::AgentEvaluation);

        // Stage 3: Consensus.
        progress.on_stage_start(PipelineStage::Consensus);
        let consensus = compute_consensus(&valid)?;
        state = advance(state, RequestState::ConsensusComputed, PipelineStage::Consensus)?;
        progress.on_stage_complete(PipelineStage::Consensus);
        info!(
            final_valuation = consensus.final_valuation,
            final_confidence = consensus.final_confidence,
            consensus_score = consensus.consensus_score,
            standard_deviation = consensus.statistics.standard_deviation,
            "consensus reached"
        );

        let outcome = self.decide_outcome(&consensus);

        // Stage 4: Evidence. Archival precedes submission by design so
        // every on-chain outcome has an auditable trail.
        progress.on_stage_start(PipelineStage::Archive);
        let bundle = EvidenceBundle::new(
            request.request_id.clone(),
            outcome.clone(),
            measurement,
            responses.clone(),
            consensus.clone(),
        );
        let evidence = self.store.put(&bundle).await?;
        self.index.record(&request.request_id, &evidence).await?;
        state = advance(state, RequestState::EvidenceArchived, PipelineStage::Archive)?;
        progress.on_stage_complete(PipelineStage::Archive);
        info!(evidence = %evidence, "evidence archived");

        // Stage 5: Submission. The ledger contract is the idempotency
        // authority; a duplicate submission surfaces as an RPC error.
        progress.on_stage_start(PipelineStage::Submission);
        let transaction = match &outcome {
            RequestOutcome::Verified {
                valuation,
                confidence,
            } => {
                self.ledger
                    .submit_verification(&request.request_id, *valuation, *confidence)
                    .await?
            }
            RequestOutcome::Rejected { reason } => {
                self.ledger
                    .submit_rejection(&request.request_id, reason)
                    .await?
            }
        };
        state = advance(
            state,
            RequestState::Submitted(outcome.clone()),
            PipelineStage::Submission,
        )?;
        progress.on_stage_complete(PipelineStage::Submission);

        Ok(ProcessRequestOutput {
            request_id: request.request_id.clone(),
            state,
            outcome,
            consensus,
            responses,
            evidence,
            transaction,
        })
    }

    /// Decide between verification and explicit rejection
    ///
    /// Rejection is a business outcome, not an error: the panel did its
    /// work and the asset did not pass. A zero consensus valuation or a
    /// panel confidence below the configured floor routes to the
    /// rejection sentinel.
    fn decide_outcome(&self, consensus: &ConsensusResult) -> RequestOutcome {
        let valuation = consensus.final_valuation.round() as u64;

        if valuation == 0 {
            RequestOutcome::Rejected {
                reason: "consensus valuation is zero".to_string(),
            }
        } else if consensus.final_confidence < self.params.rejection_confidence_floor {
            RequestOutcome::Rejected {
                reason: format!(
                    "panel confidence {}% below floor {}%",
                    consensus.final_confidence, self.params.rejection_confidence_floor
                ),
            }
        } else {
            RequestOutcome::Verified {
                valuation,
                confidence: consensus.final_confidence,
            }
        }
    }
}

fn advance(
    state: RequestState,
    next: RequestState,
    stage: PipelineStage,
) -> Result<RequestState, ProcessRequestError> {
    state
        .advance(next)
        .map_err(|source| ProcessRequestError::Lifecycle { stage, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::ports::valuation_agent::{AgentError, ValuationAgent};
    use async_trait::async_trait;
    use oracle_domain::{AgentKind, MeasurementRecord};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ==================== Scripted port implementations ====================

    struct ScriptedMeasurement {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MeasurementProvider for ScriptedMeasurement {
        async fn fetch(
            &self,
            latitude: f64,
            longitude: f64,
        ) -> Result<MeasurementRecord, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::RequestFailed("provider offline".to_string()));
            }
            Ok(MeasurementRecord {
                latitude,
                longitude,
                area_sqm: 40_000.0,
                vegetation_index: 0.4,
                cloud_coverage_percent: 2.0,
                resolution_meters: 10.0,
                provider_name: "Sentinel-2".to_string(),
                captured_at: "2026-01-01T00:00:00Z".to_string(),
                rgb_image_url: None,
                vegetation_image_url: None,
            })
        }
    }

    struct StaticAgent {
        kind: AgentKind,
        outcome: Result<(f64, u8), &'static str>,
    }

    #[async_trait]
    impl ValuationAgent for StaticAgent {
        fn kind(&self) -> AgentKind {
            self.kind.clone()
        }

        async fn evaluate(
            &self,
            _package: &EvaluationPackage,
        ) -> Result<AgentResponse, AgentError> {
            match self.outcome {
                Ok((valuation, confidence)) => Ok(AgentResponse::valued(
                    self.kind.clone(),
                    valuation,
                    confidence,
                    "static",
                    vec![],
                )),
                Err(e) => Err(AgentError::RequestFailed(e.to_string())),
            }
        }
    }

    struct MemoryStore {
        fail: bool,
        puts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EvidenceStore for MemoryStore {
        async fn put(&self, bundle: &EvidenceBundle) -> Result<EvidenceReference, ArchiveError> {
            if self.fail {
                return Err(ArchiveError::Upload("quota exceeded".to_string()));
            }
            self.puts.lock().unwrap().push(bundle.name_hint());
            Ok(EvidenceReference::new(format!(
                "Qm{}",
                bundle.request_id.as_str()
            )))
        }
    }

    struct MemoryIndex {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl EvidenceIndex for MemoryIndex {
        async fn record(
            &self,
            request_id: &RequestId,
            reference: &EvidenceReference,
        ) -> Result<(), ArchiveError> {
            self.entries
                .lock()
                .unwrap()
                .insert(request_id.to_string(), reference.to_string());
            Ok(())
        }

        async fn lookup(
            &self,
            request_id: &RequestId,
        ) -> Result<Option<EvidenceReference>, ArchiveError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .get(request_id.as_str())
                .map(EvidenceReference::new))
        }
    }

    struct RecordingLedger {
        fail: bool,
        submissions: Mutex<Vec<(String, u64, u8)>>,
    }

    #[async_trait]
    impl LedgerGateway for RecordingLedger {
        async fn submit_verification(
            &self,
            request_id: &RequestId,
            valuation: u64,
            confidence: u8,
        ) -> Result<TransactionHandle, SubmissionError> {
            if self.fail {
                return Err(SubmissionError::Transport("rpc unreachable".to_string()));
            }
            self.submissions
                .lock()
                .unwrap()
                .push((request_id.to_string(), valuation, confidence));
            Ok(TransactionHandle::new("0xabc"))
        }

        async fn pending_requests(&self) -> Result<Vec<VerificationRequest>, SubmissionError> {
            Ok(vec![])
        }

        async fn request_by_id(
            &self,
            _request_id: &RequestId,
        ) -> Result<Option<VerificationRequest>, SubmissionError> {
            Ok(None)
        }
    }

    // ==================== Harness ====================

    struct Harness {
        measurement: Arc<ScriptedMeasurement>,
        store: Arc<MemoryStore>,
        index: Arc<MemoryIndex>,
        ledger: Arc<RecordingLedger>,
        use_case: ProcessRequestUseCase,
    }

    fn harness(
        agents: Vec<(AgentKind, Result<(f64, u8), &'static str>)>,
        measurement_fails: bool,
        store_fails: bool,
        ledger_fails: bool,
    ) -> Harness {
        let measurement = Arc::new(ScriptedMeasurement {
            fail: measurement_fails,
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(MemoryStore {
            fail: store_fails,
            puts: Mutex::new(vec![]),
        });
        let index = Arc::new(MemoryIndex {
            entries: Mutex::new(HashMap::new()),
        });
        let ledger = Arc::new(RecordingLedger {
            fail: ledger_fails,
            submissions: Mutex::new(vec![]),
        });

        let panel: Vec<Arc<dyn ValuationAgent>> = agents
            .into_iter()
            .map(|(kind, outcome)| {
                Arc::new(StaticAgent { kind, outcome }) as Arc<dyn ValuationAgent>
            })
            .collect();
        let pool = EvaluateAgentsUseCase::new(panel, Duration::from_secs(30));

        let use_case = ProcessRequestUseCase::new(
            Arc::clone(&measurement) as Arc<dyn MeasurementProvider>,
            pool,
            Arc::clone(&store) as Arc<dyn EvidenceStore>,
            Arc::clone(&index) as Arc<dyn EvidenceIndex>,
            Arc::clone(&ledger) as Arc<dyn LedgerGateway>,
            PipelineParams::default(),
        );

        Harness {
            measurement,
            store,
            index,
            ledger,
            use_case,
        }
    }

    fn request() -> VerificationRequest {
        VerificationRequest::new(
            RequestId::new("42"),
            12.97,
            77.59,
            vec!["QmDoc1".to_string()],
        )
        .unwrap()
    }

    fn full_panel() -> Vec<(AgentKind, Result<(f64, u8), &'static str>)> {
        vec![
            (AgentKind::Groq, Ok((100_000.0, 90))),
            (AgentKind::OpenRouter, Ok((102_000.0, 85))),
            (AgentKind::Gemini, Ok((98_000.0, 95))),
        ]
    }

    // ==================== Scenarios ====================

    #[tokio::test]
    async fn test_happy_path_verifies_and_submits_once() {
        let h = harness(full_panel(), false, false, false);
        let output = h.use_case.process(&request(), &NoProgress).await.unwrap();

        assert!(output.outcome.is_verified());
        assert!(output.state.is_terminal());
        assert_eq!(output.responses.len(), 3);

        let submissions = h.ledger.submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        let (id, valuation, confidence) = &submissions[0];
        assert_eq!(id, "42");
        assert_eq!(*valuation, 99_926); // weighted mean, rounded
        assert_eq!(*confidence, 90);

        // Evidence archived and indexed before submission
        assert_eq!(h.store.puts.lock().unwrap().len(), 1);
        let entries = h.index.entries.lock().unwrap();
        assert_eq!(entries.get("42").map(String::as_str), Some("Qm42"));
    }

    #[tokio::test]
    async fn test_one_agent_failure_still_verifies() {
        let mut panel = full_panel();
        panel[1].1 = Err("rate limited");
        let h = harness(panel, false, false, false);

        let output = h.use_case.process(&request(), &NoProgress).await.unwrap();
        assert!(output.outcome.is_verified());
        assert_eq!(output.responses.iter().filter(|r| r.is_valid()).count(), 2);
    }

    #[tokio::test]
    async fn test_two_agent_failures_fail_consensus() {
        let panel = vec![
            (AgentKind::Groq, Ok((100_000.0, 90))),
            (AgentKind::OpenRouter, Err("down")),
            (AgentKind::Gemini, Err("down")),
        ];
        let h = harness(panel, false, false, false);

        let err = h
            .use_case
            .process(&request(), &NoProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessRequestError::Consensus(_)));
        assert_eq!(err.stage(), PipelineStage::Consensus);

        // Nothing persisted, nothing submitted
        assert!(h.store.puts.lock().unwrap().is_empty());
        assert!(h.ledger.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_measurement_failure_is_fatal_before_agents() {
        let h = harness(full_panel(), true, false, false);

        let err = h
            .use_case
            .process(&request(), &NoProgress)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), PipelineStage::Measurement);
        assert_eq!(h.measurement.calls.load(Ordering::SeqCst), 1);
        assert!(h.ledger.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_archive_failure_blocks_submission() {
        let h = harness(full_panel(), false, true, false);

        let err = h
            .use_case
            .process(&request(), &NoProgress)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), PipelineStage::Archive);
        assert!(h.ledger.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submission_failure_after_archive() {
        let h = harness(full_panel(), false, false, true);

        let err = h
            .use_case
            .process(&request(), &NoProgress)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), PipelineStage::Submission);

        // Evidence was already archived; the retry is a fresh run
        assert_eq!(h.store.puts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_valuation_routes_to_rejection_sentinel() {
        let panel = vec![
            (AgentKind::Groq, Ok((0.0, 20))),
            (AgentKind::OpenRouter, Ok((0.0, 25))),
            (AgentKind::Gemini, Ok((0.0, 15))),
        ];
        let h = harness(panel, false, false, false);

        let output = h.use_case.process(&request(), &NoProgress).await.unwrap();
        assert!(output.outcome.is_rejected());

        let submissions = h.ledger.submissions.lock().unwrap();
        assert_eq!(submissions[0].1, 0);
        assert_eq!(submissions[0].2, 1);
    }

    #[tokio::test]
    async fn test_low_confidence_routes_to_rejection_sentinel() {
        // Positive valuations, but the panel is barely confident
        let panel = vec![
            (AgentKind::Groq, Ok((80_000.0, 10))),
            (AgentKind::OpenRouter, Ok((82_000.0, 12))),
        ];
        let h = harness(panel, false, false, false);

        let output = h.use_case.process(&request(), &NoProgress).await.unwrap();
        assert!(output.outcome.is_rejected());
        assert_eq!(output.outcome.ledger_encoding(), (0, 1));

        // The evidence bundle still records the real consensus numbers
        assert!(output.consensus.final_valuation > 0.0);
    }

    #[tokio::test]
    async fn test_rejected_requests_still_archive_evidence() {
        let panel = vec![
            (AgentKind::Groq, Ok((0.0, 10))),
            (AgentKind::OpenRouter, Ok((0.0, 10))),
        ];
        let h = harness(panel, false, false, false);

        h.use_case.process(&request(), &NoProgress).await.unwrap();
        assert_eq!(h.store.puts.lock().unwrap().len(), 1);
        assert!(h.index.entries.lock().unwrap().contains_key("42"));
    }
}
