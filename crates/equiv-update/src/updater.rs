//! One subject through one configured pipeline.
//!
//! Generate → Score → Combine → Filter → Extract → Handle. Sources for a
//! subject run in parallel on rayon, each into its own audit trail; trails
//! are absorbed in configuration order so the record reads the same on every
//! run. A failing source abstains and the run carries on.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use equiv_core::errors::UpdateError;
use equiv_core::models::{EquivalenceResults, HandleOutcome, HandlerFailure, StoredEquivalenceResult};
use equiv_core::{AuditTrail, Content, EquivResult, ScoredCandidates};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::configuration::UpdaterConfiguration;
use crate::outcome::{UpdateOutcome, UpdateReport, UpdateStage};
use crate::update_span;

/// Output of one source: its name, what it produced, and what it wrote down.
type SourceRun = (String, EquivResult<ScoredCandidates>, AuditTrail);

pub struct ContentEquivalenceUpdater {
    config: UpdaterConfiguration,
}

impl ContentEquivalenceUpdater {
    pub fn new(config: UpdaterConfiguration) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn configuration(&self) -> &UpdaterConfiguration {
        &self.config
    }

    pub fn run(&self, subject: Arc<Content>) -> EquivResult<UpdateOutcome> {
        let span = update_span!(subject.canonical_uri, self.config.name);
        let _enter = span.enter();

        let mut run = Run::new(&subject);
        let mut trail = AuditTrail::new();

        run.advance(UpdateStage::Generating);
        trail.start_stage("Generating");
        let generated = self.generate(&subject, &mut trail, &mut run.abstained);
        trail.finish_stage();
        let pool = candidate_pool(&generated);
        info!(
            subject = %subject.canonical_uri,
            sources = generated.len(),
            candidates = pool.len(),
            "generation complete"
        );

        // An empty pool still goes through handling so edges left over from
        // earlier runs are retracted.
        let abstained = pool.is_empty();
        let scored = if abstained {
            trail.append("no candidates proposed; scoring skipped");
            info!(subject = %subject.canonical_uri, "all sources abstained");
            Vec::new()
        } else {
            run.advance(UpdateStage::Scoring);
            trail.start_stage("Scoring");
            let scored = self.score(&subject, &pool, &mut trail, &mut run.abstained);
            trail.finish_stage();
            scored
        };
        let raw_scores = merge_by_source(generated.into_iter().chain(scored));

        run.advance(UpdateStage::Combining);
        let combined = self.config.builder.combine(&subject, &raw_scores, &mut trail);
        run.advance(UpdateStage::Filtering);
        let filtered = self.config.builder.filter(&subject, &combined, &mut trail);
        run.advance(UpdateStage::Extracting);
        let accepted = self.config.builder.extract(&subject, &filtered, &mut trail);

        let results = EquivalenceResults {
            subject: subject.clone(),
            raw_scores,
            combined,
            accepted,
            trail: trail.finish(),
        };
        info!(
            subject = %subject.canonical_uri,
            filtered = filtered.len(),
            accepted = results.accepted_candidates().count(),
            "extraction complete"
        );

        run.advance(UpdateStage::Handling);
        match self.config.handler.handle(&results) {
            Ok(HandleOutcome::DependencyMissing { container_uri }) => {
                info!(subject = %subject.canonical_uri, container = %container_uri, "container not yet equivalated");
                Ok(UpdateOutcome::DependencyMissing { container_uri })
            }
            Ok(HandleOutcome::Handled { changed, mut failures }) => {
                if changed {
                    if let Some(messenger) = &self.config.messenger {
                        if let Err(e) = messenger.send(&results) {
                            warn!(subject = %subject.canonical_uri, error = %e, "assertion message not sent");
                            failures.push(HandlerFailure {
                                handler: "assertion messenger".into(),
                                reason: e.to_string(),
                            });
                        }
                    }
                }
                run.advance(UpdateStage::Done);
                info!(subject = %subject.canonical_uri, changed, failures = failures.len(), "update complete");
                let report = run.report(self.name(), &results, changed, failures);
                if abstained {
                    Ok(UpdateOutcome::Abstained(report))
                } else {
                    Ok(UpdateOutcome::Completed(report))
                }
            }
            Err(e) => {
                run.advance(UpdateStage::Failed);
                error!(subject = %subject.canonical_uri, handler = self.config.handler.name(), error = %e, "handling failed");
                Err(UpdateError::HandlerFailure {
                    handler: self.config.handler.name().to_string(),
                    subject: subject.canonical_uri.clone(),
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }

    fn generate(
        &self,
        subject: &Content,
        trail: &mut AuditTrail,
        abstained: &mut Vec<String>,
    ) -> Vec<ScoredCandidates> {
        let runs: Vec<SourceRun> = self
            .config
            .generators
            .par_iter()
            .map(|generator| {
                let mut own = AuditTrail::new();
                own.start_stage(generator.name().to_string());
                let result = generator.generate(subject, &mut own);
                (generator.name().to_string(), result, own)
            })
            .collect();

        runs.into_iter()
            .map(|(name, result, own)| {
                let mut set = settle(name, result, own, trail, abstained);
                self.drop_excluded(subject, &mut set, trail);
                set
            })
            .collect()
    }

    fn score(
        &self,
        subject: &Content,
        pool: &[Arc<Content>],
        trail: &mut AuditTrail,
        abstained: &mut Vec<String>,
    ) -> Vec<ScoredCandidates> {
        let runs: Vec<SourceRun> = self
            .config
            .scorers
            .par_iter()
            .map(|scorer| {
                let mut own = AuditTrail::new();
                own.start_stage(scorer.name().to_string());
                let result = scorer.score(subject, pool, &mut own);
                (scorer.name().to_string(), result, own)
            })
            .collect();

        runs.into_iter()
            .map(|(name, result, own)| settle(name, result, own, trail, abstained))
            .collect()
    }

    /// The subject and anything on the exclusion lists never reach scoring.
    fn drop_excluded(&self, subject: &Content, set: &mut ScoredCandidates, trail: &mut AuditTrail) {
        let before = set.len();
        set.retain(|c| c.uri() != subject.canonical_uri && !self.config.excludes(&c.candidate));
        let dropped = before - set.len();
        if dropped > 0 {
            trail.append(format!("{}: dropped {} excluded candidates", set.source(), dropped));
        }
    }
}

/// Fold one source's output into the main trail. Errors become an empty set.
fn settle(
    name: String,
    result: EquivResult<ScoredCandidates>,
    mut own: AuditTrail,
    trail: &mut AuditTrail,
    abstained: &mut Vec<String>,
) -> ScoredCandidates {
    let set = match result {
        Ok(set) => {
            debug!(source = %name, candidates = set.len(), "source finished");
            set
        }
        Err(e) => {
            warn!(source = %name, error = %e, "source abstained");
            own.append(format!("abstained: {e}"));
            abstained.push(name.clone());
            ScoredCandidates::abstained(name)
        }
    };
    trail.absorb(own);
    set
}

/// Distinct candidates across every generated set, in uri order.
fn candidate_pool(sets: &[ScoredCandidates]) -> Vec<Arc<Content>> {
    let mut pool: BTreeMap<&str, Arc<Content>> = BTreeMap::new();
    for set in sets {
        for c in set.iter() {
            pool.entry(c.uri()).or_insert_with(|| c.candidate.clone());
        }
    }
    pool.into_values().collect()
}

/// Sets sharing a source name become one; first appearance fixes the order.
fn merge_by_source(sets: impl IntoIterator<Item = ScoredCandidates>) -> Vec<ScoredCandidates> {
    let mut merged: Vec<ScoredCandidates> = Vec::new();
    for set in sets {
        match merged.iter_mut().find(|m| m.source() == set.source()) {
            Some(existing) => {
                for c in set.iter() {
                    existing.add(c.candidate.clone(), c.score);
                }
            }
            None => merged.push(set),
        }
    }
    merged
}

/// Stage bookkeeping for one run.
struct Run {
    subject_uri: String,
    stage: UpdateStage,
    abstained: Vec<String>,
}

impl Run {
    fn new(subject: &Content) -> Self {
        Self {
            subject_uri: subject.canonical_uri.clone(),
            stage: UpdateStage::Idle,
            abstained: Vec::new(),
        }
    }

    fn advance(&mut self, to: UpdateStage) {
        debug!(subject = %self.subject_uri, from = %self.stage, to = %to, "stage");
        self.stage = to;
    }

    fn report(
        &mut self,
        updater: &str,
        results: &EquivalenceResults,
        changed: bool,
        failures: Vec<HandlerFailure>,
    ) -> UpdateReport {
        UpdateReport {
            subject_uri: self.subject_uri.clone(),
            updater: updater.to_string(),
            changed,
            audit: StoredEquivalenceResult::from_results(results, Utc::now()),
            abstained_sources: std::mem::take(&mut self.abstained),
            failures,
            stage: self.stage,
        }
    }
}
