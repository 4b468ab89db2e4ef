//! Batch simulation over stored problems
//!
//! Runs every reference implementation of every problem through the
//! full pipeline, one at a time. The loop owns the stats and log; a
//! shared flag lets a signal handler stop it between runs.

use crate::executor::{Executor, RunRequest};
use anyhow::Result;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use testsmith_common::types::{Language, ProblemRecord, RunReport, RunStatus};
use tracing::{info, warn};

const SOLUTION_CODE_TYPE: &str = "solution";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationStats {
    pub runs: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
    pub cancelled: bool,
    pub stopped_early: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    pub problem: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<RunReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimulationOutcome {
    pub fn passed(&self) -> bool {
        matches!(&self.report, Some(r) if r.status == RunStatus::Passed)
    }
}

pub struct Simulation {
    stop_on_failure: bool,
    cancel: Arc<AtomicBool>,
    stats: SimulationStats,
    log: Vec<String>,
    outcomes: Vec<SimulationOutcome>,
}

/// One runnable (problem, implementation) pair
struct Job {
    label: String,
    request: RunRequest,
}

impl Simulation {
    pub fn new(stop_on_failure: bool) -> Self {
        Self {
            stop_on_failure,
            cancel: Arc::new(AtomicBool::new(false)),
            stats: SimulationStats::default(),
            log: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    /// Flag that stops the loop before its next run once set
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn outcomes(&self) -> &[SimulationOutcome] {
        &self.outcomes
    }

    fn note(&mut self, line: String) {
        info!("{}", line);
        self.log.push(line);
    }

    /// Expand problems into jobs, skipping implementations in unknown
    /// languages or without code.
    fn plan(&mut self, problems: &[ProblemRecord]) -> Vec<Job> {
        let mut jobs = Vec::new();
        for problem in problems {
            let label = problem.label();
            for implementation in &problem.implementations {
                let Some(language) = Language::from_str(&implementation.lang) else {
                    self.stats.skipped += 1;
                    self.note(format!("[{}] skipped: unsupported language '{}'", label, implementation.lang));
                    continue;
                };
                let entry = implementation
                    .code
                    .iter()
                    .find(|c| c.code_type.eq_ignore_ascii_case(SOLUTION_CODE_TYPE))
                    .or_else(|| implementation.code.first());
                let Some(entry) = entry else {
                    self.stats.skipped += 1;
                    self.note(format!("[{}] skipped: no {} code", label, language));
                    continue;
                };
                jobs.push(Job {
                    label: label.clone(),
                    request: RunRequest::for_problem(problem, language, &entry.code),
                });
            }
        }
        jobs
    }

    /// Run every job through `executor`
    pub async fn run(&mut self, executor: &Executor, problems: &[ProblemRecord]) -> &SimulationStats {
        self.run_with(problems, move |request| async move { executor.run(&request).await })
            .await
    }

    /// Control loop with the run step supplied by the caller
    pub async fn run_with<F, Fut>(&mut self, problems: &[ProblemRecord], mut step: F) -> &SimulationStats
    where
        F: FnMut(RunRequest) -> Fut,
        Fut: Future<Output = Result<RunReport>>,
    {
        let jobs = self.plan(problems);
        self.note(format!("simulating {} runs", jobs.len()));

        for job in jobs {
            if self.cancel.load(Ordering::SeqCst) {
                self.stats.cancelled = true;
                self.note("cancelled; remaining runs dropped".to_string());
                break;
            }

            let language = job.request.language;
            self.stats.runs += 1;
            let outcome = match step(job.request).await {
                Ok(report) => {
                    match report.status {
                        RunStatus::Passed => self.stats.passed += 1,
                        RunStatus::Failed => self.stats.failed += 1,
                        RunStatus::Errored => self.stats.errored += 1,
                    }
                    self.note(format!(
                        "[{}] {}: {:?} ({}/{})",
                        job.label, language, report.status, report.passed, report.total
                    ));
                    SimulationOutcome {
                        problem: job.label,
                        language,
                        report: Some(report),
                        error: None,
                    }
                }
                Err(e) => {
                    self.stats.errored += 1;
                    warn!(problem = %job.label, language = %language, error = %e, "Run failed");
                    self.note(format!("[{}] {}: error: {:#}", job.label, language, e));
                    SimulationOutcome {
                        problem: job.label,
                        language,
                        report: None,
                        error: Some(format!("{:#}", e)),
                    }
                }
            };

            let passed = outcome.passed();
            self.outcomes.push(outcome);
            if !passed && self.stop_on_failure {
                self.stats.stopped_early = true;
                self.note("stopping on first failure".to_string());
                break;
            }
        }

        &self.stats
    }
}
