//! Scan session: keyword in, live candidate board out.
//!
//! `DomainScanner` is the single owner of the scan state. It translates a
//! keyword, builds the candidate list, and hands the list to a background
//! sweep. Every sweep gets a fresh generation; starting one aborts the
//! previous worker, and any of its results still queued are discarded when
//! they arrive because their generation no longer matches the board.

use crate::checker::{AvailabilityChecker, CandidateUpdate, Generation, SweepEvent};
use crate::error::DomainScanError;
use crate::generate::generate_candidates;
use crate::providers::TranslationProvider;
use crate::translate::Translator;
use crate::types::{CandidateStatus, DomainCandidate, ScanConfig, Translation};
use crate::utils::validate_keyword;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const EVENT_BUFFER: usize = 64;

/// Per-status counts for a board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total: usize,
    pub checking: usize,
    pub available: usize,
    pub registered: usize,
    pub unknown: usize,
    pub error: usize,
}

/// The candidate list of the current generation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanBoard {
    generation: Generation,
    candidates: Vec<DomainCandidate>,
}

impl ScanBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn candidates(&self) -> &[DomainCandidate] {
        &self.candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Install a new candidate list under a new generation.
    pub fn replace(&mut self, candidates: Vec<DomainCandidate>) -> Generation {
        self.generation += 1;
        self.candidates = candidates;
        self.generation
    }

    /// Empty the board; anything still in flight becomes stale.
    pub fn clear(&mut self) -> Generation {
        self.replace(Vec::new())
    }

    /// Merge an update. Returns `false` (and changes nothing) when the update
    /// belongs to another generation or does not match a candidate.
    pub fn apply(&mut self, update: &CandidateUpdate) -> bool {
        if update.generation != self.generation {
            return false;
        }
        match self.candidates.get_mut(update.index) {
            Some(slot) if slot.domain == update.candidate.domain => {
                *slot = update.candidate.clone();
                true
            }
            _ => false,
        }
    }

    /// Whether every candidate has reached a terminal status.
    pub fn is_settled(&self) -> bool {
        self.candidates.iter().all(|c| c.status.is_terminal())
    }

    pub fn summary(&self) -> ScanSummary {
        let mut summary = ScanSummary {
            total: self.candidates.len(),
            ..Default::default()
        };
        for candidate in &self.candidates {
            match candidate.status {
                CandidateStatus::Checking => summary.checking += 1,
                CandidateStatus::Available => summary.available += 1,
                CandidateStatus::Registered => summary.registered += 1,
                CandidateStatus::Unknown => summary.unknown += 1,
                CandidateStatus::Error => summary.error += 1,
            }
        }
        summary
    }
}

/// Keyword-to-candidates session with a single live sweep.
pub struct DomainScanner {
    translator: Arc<dyn TranslationProvider>,
    checker: AvailabilityChecker,
    tlds: Vec<String>,
    translations: Vec<Translation>,
    board: ScanBoard,
    events_tx: mpsc::Sender<SweepEvent>,
    events_rx: mpsc::Receiver<SweepEvent>,
    active: Option<JoinHandle<()>>,
}

impl DomainScanner {
    /// Create a scanner around an existing translator and checker.
    pub fn new(
        translator: Arc<dyn TranslationProvider>,
        checker: AvailabilityChecker,
        tlds: Vec<String>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        Self {
            translator,
            checker,
            tlds,
            translations: Vec::new(),
            board: ScanBoard::new(),
            events_tx,
            events_rx,
            active: None,
        }
    }

    /// Create a scanner using the real translator, RDAP and traffic estimator.
    pub fn from_config(config: &ScanConfig) -> Result<Self, DomainScanError> {
        let translator = Translator::from_config(config)?;
        let checker = AvailabilityChecker::from_config(config)?;
        Ok(Self::new(Arc::new(translator), checker, config.tlds.clone()))
    }

    pub fn board(&self) -> &ScanBoard {
        &self.board
    }

    pub fn translations(&self) -> &[Translation] {
        &self.translations
    }

    pub fn tlds(&self) -> &[String] {
        &self.tlds
    }

    /// Whether the translator is answering from its offline mock.
    pub fn uses_mock_translations(&self) -> bool {
        self.translator.is_mock()
    }

    /// Whether a sweep is still producing results for the current board.
    pub fn is_sweeping(&self) -> bool {
        self.active.is_some()
    }

    /// Translate `keyword`, build candidates and start checking them.
    ///
    /// The board is cleared before translation starts. A translation failure
    /// aborts the submission and leaves the board empty.
    pub async fn submit_keyword(
        &mut self,
        keyword: &str,
    ) -> Result<&[DomainCandidate], DomainScanError> {
        let keyword = validate_keyword(keyword)?;

        self.cancel_sweep();
        self.board.clear();
        self.translations.clear();

        info!("translating '{}'", keyword);
        self.translations = self.translator.translate(&keyword).await?;
        debug!("received {} translations", self.translations.len());

        self.restart_sweep()
    }

    /// Change the suffix selection and rebuild candidates from the stored
    /// translations.
    pub fn select_tlds(&mut self, tlds: Vec<String>) -> Result<&[DomainCandidate], DomainScanError> {
        self.tlds = tlds;
        if self.translations.is_empty() {
            return Ok(self.board.candidates());
        }
        self.restart_sweep()
    }

    /// Regenerate the board and launch a sweep over it.
    fn restart_sweep(&mut self) -> Result<&[DomainCandidate], DomainScanError> {
        self.cancel_sweep();

        if self.tlds.is_empty() {
            self.board.clear();
            return Ok(self.board.candidates());
        }

        let candidates = match generate_candidates(&self.translations, &self.tlds) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("{}", e);
                self.board.clear();
                return Err(e);
            }
        };

        let domains: Vec<String> = candidates.iter().map(|c| c.domain.clone()).collect();
        let generation = self.board.replace(candidates);

        if !domains.is_empty() {
            info!("sweep {}: checking {} candidates", generation, domains.len());
            self.active = Some(
                self.checker
                    .spawn_sweep(generation, domains, self.events_tx.clone()),
            );
        }

        Ok(self.board.candidates())
    }

    fn cancel_sweep(&mut self) {
        if let Some(handle) = self.active.take() {
            debug!("aborting sweep {}", self.board.generation());
            handle.abort();
        }
    }

    /// Wait for the next result of the current sweep and merge it into the
    /// board.
    ///
    /// Returns `None` once the sweep has finished (or if none is running).
    pub async fn next_update(&mut self) -> Option<CandidateUpdate> {
        while self.active.is_some() {
            match self.events_rx.recv().await? {
                SweepEvent::Resolved(update) => {
                    if self.board.apply(&update) {
                        return Some(update);
                    }
                    debug!(
                        "discarding stale update for {} (generation {})",
                        update.candidate.domain, update.generation
                    );
                }
                SweepEvent::Finished { generation } => {
                    if generation == self.board.generation() {
                        self.active = None;
                    }
                }
            }
        }
        None
    }

    /// Drain the current sweep and return the settled board.
    pub async fn run_to_completion(&mut self) -> &ScanBoard {
        while self.next_update().await.is_some() {}
        &self.board
    }
}

impl Drop for DomainScanner {
    fn drop(&mut self) {
        self.cancel_sweep();
    }
}
