//! Run Executor - synthesize, judge, recover
//!
//! **Responsibility:**
//! Glue between the engine and the judge: build the harness, submit it
//! with the catalogued language id, aggregate whatever comes back.
//! Nothing is cached; every run re-synthesizes.

use crate::report::build_report;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use testsmith_common::config::LanguageCatalog;
use testsmith_common::judge::JudgeClient;
use testsmith_common::types::{
    ExecutionOptions, InputSchemaEntry, JudgeRequest, JudgeResponse, Language, ProblemRecord, RunReport, TestCase,
};
use testsmith_engine::synth::synthesize_test_harness;
use tracing::{info, instrument};
use uuid::Uuid;

/// Everything needed to run one solution against its test cases
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub language: Language,
    pub source: String,
    pub test_cases: Vec<TestCase>,
    pub input_schema: Vec<InputSchemaEntry>,
    #[serde(default)]
    pub entry_name: Option<String>,
    #[serde(default)]
    pub options: Option<ExecutionOptions>,
}

impl RunRequest {
    /// Request for `source` against a stored problem
    pub fn for_problem(problem: &ProblemRecord, language: Language, source: &str) -> Self {
        Self {
            language,
            source: source.to_string(),
            test_cases: problem.test_cases.clone(),
            input_schema: problem.input_schema.clone(),
            entry_name: problem.entry_name.clone(),
            options: Some(problem.options.clone()),
        }
    }
}

pub struct Executor {
    judge: JudgeClient,
    catalog: LanguageCatalog,
}

impl Executor {
    pub fn new(judge: JudgeClient, catalog: LanguageCatalog) -> Self {
        Self { judge, catalog }
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    /// Submit a finished program to the judge
    pub async fn submit(&self, language: Language, source_code: String, stdin: String) -> Result<JudgeResponse> {
        let language_id = self
            .catalog
            .language_id(language)
            .with_context(|| format!("no judge language id for {}", language))?;
        let request = JudgeRequest {
            language_id,
            source_code,
            stdin,
        };
        self.judge
            .execute(&request)
            .await
            .with_context(|| format!("judge at {} failed", self.judge.endpoint()))
    }

    /// Run `request` end to end
    #[instrument(skip(self, request), fields(language = %request.language, cases = request.test_cases.len()))]
    pub async fn run(&self, request: &RunRequest) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let program = synthesize_test_harness(
            &request.source,
            request.language,
            &request.test_cases,
            &request.input_schema,
            request.entry_name.as_deref(),
            request.options.as_ref(),
        );
        info!(run_id = %run_id, bytes = program.len(), "Submitting harness");

        let response = self.submit(request.language, program, String::new()).await?;
        let report = build_report(run_id, request.language, request.test_cases.len(), &response);

        info!(
            run_id = %run_id,
            status = ?report.status,
            passed = report.passed,
            total = report.total,
            "Run finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use testsmith_common::config::JudgeSettings;

    #[test]
    fn test_request_wire_format() {
        let request: RunRequest = serde_json::from_value(json!({
            "language": "py",
            "source": "def f(a):\n    return a\n",
            "testCases": [{"input": [1], "expectedOutput": 1}],
            "inputSchema": [{"name": "a", "type": "number"}],
            "options": {"unordered": true}
        }))
        .unwrap();
        assert_eq!(request.language, Language::Python);
        assert_eq!(request.test_cases.len(), 1);
        assert!(request.options.unwrap().unordered);
        assert!(request.entry_name.is_none());
    }

    #[test]
    fn test_for_problem_copies_cases_and_hint() {
        let problem: ProblemRecord = serde_json::from_value(json!({
            "title": "Sort",
            "entryName": "sortArray",
            "test_cases": [{"input": [[2, 1]], "expectedOutput": [1, 2]}],
            "input_schema": [{"name": "nums", "type": "number[]"}]
        }))
        .unwrap();
        let request = RunRequest::for_problem(&problem, Language::Java, "class Solution {}");
        assert_eq!(request.entry_name.as_deref(), Some("sortArray"));
        assert_eq!(request.input_schema[0].type_name, "number[]");
    }

    #[tokio::test]
    async fn test_unreachable_judge_surfaces_error() {
        let settings = JudgeSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(500),
        };
        let executor = Executor::new(JudgeClient::new(&settings), LanguageCatalog::builtin());
        let request = RunRequest {
            language: Language::Python,
            source: "def f(a):\n    return a\n".to_string(),
            test_cases: vec![TestCase { input: vec![json!(1)], expected_output: json!(1) }],
            input_schema: vec![InputSchemaEntry::new("a", "number")],
            entry_name: None,
            options: None,
        };
        let err = executor.run(&request).await.unwrap_err();
        assert!(err.to_string().contains("judge at http://127.0.0.1:9/execute failed"));
    }
}
