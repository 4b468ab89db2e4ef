use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Execution languages a harness can be synthesized for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[serde(alias = "ts")]
    TypeScript,
    #[serde(alias = "py")]
    Python,
    Java,
    #[serde(alias = "c++")]
    Cpp,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::TypeScript,
        Language::Python,
        Language::Java,
        Language::Cpp,
    ];

    /// Parse a language name, accepting the short aliases used by the UI
    pub fn from_str(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "typescript" | "ts" => Some(Language::TypeScript),
            "python" | "py" | "python3" => Some(Language::Python),
            "java" => Some(Language::Java),
            "cpp" | "c++" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// Languages whose declarations look like `<modifiers> <type> name(args)`
    pub fn is_c_family(&self) -> bool {
        matches!(self, Language::Java | Language::Cpp)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
        };
        write!(f, "{}", name)
    }
}

/// One parameter of the user's entry point, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchemaEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inplace: Option<bool>,
}

impl InputSchemaEntry {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            inplace: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: Vec<Value>,
    pub expected_output: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOptions {
    #[serde(default)]
    pub unordered: bool,
    #[serde(default)]
    pub multi_expected: bool,
    #[serde(default)]
    pub return_modified_input: bool,
    #[serde(default)]
    pub modified_input_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Pass,
    Fail,
    Error,
}

/// Per-test-case outcome printed by a generated harness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    #[serde(default)]
    pub expected: Value,
    #[serde(default)]
    pub actual: Value,
    #[serde(default)]
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `POST /execute` on the judge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeRequest {
    pub language_id: u32,
    pub source_code: String,
    pub stdin: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JudgeResponse {
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEntry {
    pub code_type: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Implementation {
    pub lang: String,
    #[serde(default)]
    pub code: Vec<CodeEntry>,
}

/// Problem record as read from the problem store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "entryName")]
    pub entry_name: Option<String>,
    pub test_cases: Vec<TestCase>,
    pub input_schema: Vec<InputSchemaEntry>,
    #[serde(default)]
    pub options: ExecutionOptions,
    #[serde(default)]
    pub implementations: Vec<Implementation>,
}

impl ProblemRecord {
    pub fn label(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.id.clone())
            .unwrap_or_else(|| "untitled".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Passed,
    Failed,
    Errored,
}

/// Aggregated outcome of one synthesize → judge → recover round-trip
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: Uuid,
    pub language: Language,
    pub status: RunStatus,
    pub passed: usize,
    pub total: usize,
    pub verdicts: Vec<Verdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_output: Option<String>,
}
