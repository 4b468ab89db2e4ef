//! Run report aggregation
//!
//! **Core Responsibility:**
//! Turn one judge response into a [`RunReport`].
//!
//! **Status Rules:**
//! - Errored: nothing recoverable in stdout (compile error, crash, timeout)
//! - Failed: any verdict not `pass`, or fewer verdicts than test cases
//! - Passed: one passing verdict per test case
//!
//! Knows nothing about HTTP or how the program was built.

use testsmith_common::types::{JudgeResponse, Language, RunReport, RunStatus, VerdictStatus};
use testsmith_engine::recovery::extract_verdicts;
use tracing::{debug, warn};
use uuid::Uuid;

fn non_empty(text: &Option<String>) -> Option<String> {
    text.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}

/// Aggregate `response` for a run of `total` test cases.
pub fn build_report(run_id: Uuid, language: Language, total: usize, response: &JudgeResponse) -> RunReport {
    let stdout = response.stdout.as_deref().unwrap_or("");
    let stderr = non_empty(&response.stderr);
    let compile_output = non_empty(&response.compile_output);

    let (status, verdicts) = match extract_verdicts(stdout) {
        Ok(verdicts) => {
            let all_pass = verdicts.iter().all(|v| v.status == VerdictStatus::Pass);
            let status = if all_pass && verdicts.len() == total {
                RunStatus::Passed
            } else {
                RunStatus::Failed
            };
            (status, verdicts)
        }
        Err(e) => {
            warn!(run_id = %run_id, error = %e, "Judge output held no verdicts");
            (RunStatus::Errored, Vec::new())
        }
    };

    let passed = verdicts.iter().filter(|v| v.status == VerdictStatus::Pass).count();
    debug!(run_id = %run_id, passed = passed, total = total, status = ?status, "Run aggregated");

    RunReport {
        run_id,
        language,
        status,
        passed,
        total,
        verdicts,
        stderr,
        compile_output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testsmith_engine::recovery::{RESULTS_END, RESULTS_START};

    fn response(stdout: &str) -> JudgeResponse {
        JudgeResponse {
            stdout: Some(stdout.to_string()),
            stderr: Some(String::new()),
            compile_output: None,
        }
    }

    fn wrapped(payload: &str) -> String {
        format!("{}\n{}\n{}\n", RESULTS_START, payload, RESULTS_END)
    }

    #[test]
    fn test_all_pass() {
        let stdout = wrapped(r#"[{"status":"pass","expected":[1],"actual":[1],"time":0.1},{"status":"pass","expected":2,"actual":2,"time":0.2}]"#);
        let report = build_report(Uuid::new_v4(), Language::Python, 2, &response(&stdout));
        assert_eq!(report.status, RunStatus::Passed);
        assert_eq!(report.passed, 2);
        assert!(report.stderr.is_none());
    }

    #[test]
    fn test_identity_sort_fails() {
        let stdout = wrapped(r#"[{"status":"fail","expected":[1,2,4,5,8],"actual":[5,1,4,2,8],"time":0.1}]"#);
        let report = build_report(Uuid::new_v4(), Language::TypeScript, 1, &response(&stdout));
        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.passed, 0);
        assert_eq!(report.verdicts[0].actual, serde_json::json!([5, 1, 4, 2, 8]));
    }

    #[test]
    fn test_missing_verdicts_is_a_failure() {
        let stdout = wrapped(r#"[{"status":"pass","expected":1,"actual":1,"time":0}]"#);
        let report = build_report(Uuid::new_v4(), Language::Java, 3, &response(&stdout));
        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.passed, 1);
    }

    #[test]
    fn test_compile_error_is_errored() {
        let judge = JudgeResponse {
            stdout: None,
            stderr: None,
            compile_output: Some("Main.java:3: error: ';' expected".to_string()),
        };
        let report = build_report(Uuid::new_v4(), Language::Java, 1, &judge);
        assert_eq!(report.status, RunStatus::Errored);
        assert!(report.verdicts.is_empty());
        assert_eq!(report.compile_output.as_deref(), Some("Main.java:3: error: ';' expected"));
    }
}
