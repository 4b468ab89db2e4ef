//! Harness synthesis
//!
//! **Core Responsibility:**
//! Turn user source plus test cases into one self-contained program that
//! runs every case in isolation and prints the verdicts as a single JSON
//! array between the result sentinels.
//!
//! **Structure:**
//! - [`HarnessPlan`] holds everything language-neutral: the resolved
//!   entry point, per-parameter types, the composites to emit and the
//!   canonical expected strings for each case
//! - one [`Backend`] per language turns a plan into program text
//!
//! Every call re-plans from scratch; nothing is cached between calls.

mod cpp;
mod java;
mod python;
mod typescript;

use crate::canonical::{accepted_outputs, to_canonical_string};
use crate::logical::{CompositeKind, LogicalType};
use crate::registry;
use crate::resolver::{self, EntryPoint};
use serde_json::Value;
use testsmith_common::types::{ExecutionOptions, InputSchemaEntry, Language, TestCase};
use tracing::{debug, warn};

pub use crate::recovery::{RESULTS_END, RESULTS_START};

/// Code generation for one target language
pub trait Backend {
    fn language(&self) -> Language;

    /// Program that runs every planned case and prints sentinel-wrapped verdicts
    fn test_harness(&self, plan: &HarnessPlan) -> String;

    /// Program that reads one JSON argument array from stdin and prints
    /// the canonical JSON of the result
    fn judge_harness(&self, plan: &HarnessPlan) -> String;
}

pub fn backend_for(language: Language) -> &'static dyn Backend {
    match language {
        Language::TypeScript => &typescript::TypeScriptBackend,
        Language::Python => &python::PythonBackend,
        Language::Java => &java::JavaBackend,
        Language::Cpp => &cpp::CppBackend,
    }
}

/// One parameter of the entry point
#[derive(Debug, Clone)]
pub struct ParamPlan {
    pub name: String,
    pub logical: LogicalType,
    /// Declared type from the user's signature, cleaned
    pub declared: Option<String>,
}

/// A catalogued composite the program needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeUse {
    pub kind: CompositeKind,
    pub definition: bool,
    pub helpers: bool,
}

#[derive(Debug, Clone)]
pub enum CaseBody {
    Runnable { inputs: Vec<Value>, accepted: Vec<String> },
    /// Verdict JSON emitted as-is (input arity did not match the schema)
    Prebaked(String),
}

#[derive(Debug, Clone)]
pub struct CasePlan {
    pub index: usize,
    pub expected_json: String,
    pub body: CaseBody,
}

/// Language-neutral description of a harness
#[derive(Debug, Clone)]
pub struct HarnessPlan<'a> {
    pub language: Language,
    pub user_code: &'a str,
    pub entry: EntryPoint,
    pub params: Vec<ParamPlan>,
    pub composites: Vec<CompositeUse>,
    pub options: ExecutionOptions,
    /// Argument whose post-call state is the result (in-place mode)
    pub modified_index: Option<usize>,
    pub cases: Vec<CasePlan>,
}

impl<'a> HarnessPlan<'a> {
    pub fn build(
        user_code: &'a str,
        language: Language,
        test_cases: &[TestCase],
        input_schema: &[InputSchemaEntry],
        entry_name: Option<&str>,
        options: Option<&ExecutionOptions>,
    ) -> Self {
        let options = options.cloned().unwrap_or_default();
        let entry = resolver::resolve(user_code, language, input_schema, entry_name);
        let declared = entry.params(language);

        let params: Vec<ParamPlan> = input_schema
            .iter()
            .enumerate()
            .map(|(i, schema)| ParamPlan {
                name: schema.name.clone(),
                logical: LogicalType::parse(&schema.type_name),
                declared: declared.get(i).and_then(|d| d.declared_type.clone()),
            })
            .collect();

        let modified_index = modified_index(&options, input_schema);
        let composites = needed_composites(user_code, language, &params, &entry);

        let cases = test_cases
            .iter()
            .enumerate()
            .map(|(index, case)| plan_case(index, case, params.len(), &options))
            .collect();

        Self {
            language,
            user_code,
            entry,
            params,
            composites,
            options,
            modified_index,
            cases,
        }
    }

    /// Kinds whose parser/serializer pair is emitted, in catalog order
    pub fn helper_kinds(&self) -> impl Iterator<Item = CompositeKind> + '_ {
        self.composites.iter().filter(|c| c.helpers).map(|c| c.kind)
    }

    pub fn definition_kinds(&self) -> impl Iterator<Item = CompositeKind> + '_ {
        self.composites.iter().filter(|c| c.definition).map(|c| c.kind)
    }

    /// Whether the entry point is known to return nothing
    pub fn returns_void(&self) -> bool {
        self.entry.return_type.as_deref().map(str::trim) == Some("void")
    }

    /// Composite handed back as the result: the in-place argument's kind,
    /// else the declared return type when it names exactly one composite.
    /// Untyped entries fall back to the kind shared by every composite
    /// argument. A null result of this kind is rendered by its serializer.
    pub fn result_kind(&self) -> Option<CompositeKind> {
        if let Some(k) = self.modified_index {
            return match self.params[k].logical {
                LogicalType::Composite(kind) => Some(kind),
                _ => None,
            };
        }
        match self.entry.return_type.as_deref() {
            Some(return_type) => single_composite(return_type),
            None => {
                let mut kinds = self.params.iter().filter_map(|p| match p.logical {
                    LogicalType::Composite(kind) => Some(kind),
                    _ => None,
                });
                let first = kinds.next()?;
                kinds.all(|k| k == first).then_some(first)
            }
        }
    }

    /// Declared type for parameter `i`, falling back to one derived from
    /// the schema and the first available sample value
    pub fn native_type(&self, i: usize) -> crate::formatter::NativeType {
        use crate::formatter::NativeType;
        let param = &self.params[i];
        match &param.declared {
            Some(declared) => NativeType::parse(declared, self.language),
            None => {
                let sample = self.cases.iter().find_map(|c| match &c.body {
                    CaseBody::Runnable { inputs, .. } => inputs.get(i),
                    CaseBody::Prebaked(_) => None,
                });
                NativeType::derive(&param.logical, self.language, sample)
            }
        }
    }
}

fn modified_index(options: &ExecutionOptions, schema: &[InputSchemaEntry]) -> Option<usize> {
    let index = if options.return_modified_input {
        Some(options.modified_input_index)
    } else {
        schema.iter().position(|s| s.inplace == Some(true))
    }?;
    if index >= schema.len() {
        warn!(index = index, params = schema.len(), "Modified input index out of range, using return value");
        return None;
    }
    Some(index)
}

/// Composite emission rule: types the schema or signatures require always
/// get parser and serializer, and a definition unless the user declares
/// one; types only mentioned in user code are emitted in full unless the
/// user declares them.
fn needed_composites(user_code: &str, language: Language, params: &[ParamPlan], entry: &EntryPoint) -> Vec<CompositeUse> {
    let mut required: Vec<CompositeKind> = params.iter().filter_map(|p| p.logical.composite()).collect();
    for text in params.iter().filter_map(|p| p.declared.as_deref()).chain(entry.return_type.as_deref()) {
        required.extend(CompositeKind::ALL.into_iter().filter(|k| mentions(text, k.type_name())));
    }
    let mentioned = registry::mentioned_composites(user_code, language);

    CompositeKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let is_required = required.contains(&kind);
            if !is_required && !mentioned.contains(&kind) {
                return None;
            }
            let user_defined = registry::is_user_defined(kind.type_name(), user_code, language);
            let usage = CompositeUse {
                kind,
                definition: !user_defined,
                helpers: is_required || !user_defined,
            };
            (usage.definition || usage.helpers).then_some(usage)
        })
        .collect()
}

/// `TreeNode`, `Optional[TreeNode]`, `TreeNode | null`, `ListNode*`; not
/// arrays or containers of them.
fn single_composite(return_type: &str) -> Option<CompositeKind> {
    if return_type.contains("[]") {
        return None;
    }
    let mut words = return_type
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .filter(|w| !matches!(*w, "Optional" | "typing" | "null" | "None" | "undefined" | "const" | "struct"));
    let kind = CompositeKind::from_name(words.next()?)?;
    words.next().is_none().then_some(kind)
}

fn mentions(text: &str, word: &str) -> bool {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_')).any(|w| w == word)
}

fn plan_case(index: usize, case: &TestCase, arity: usize, options: &ExecutionOptions) -> CasePlan {
    let expected_json = to_canonical_string(&case.expected_output);
    if case.input.len() != arity {
        warn!(case = index, inputs = case.input.len(), arity = arity, "Test case arity mismatch");
        let message = format!(
            "test case {} has {} inputs but the entry point takes {}",
            index + 1,
            case.input.len(),
            arity
        );
        return CasePlan {
            index,
            body: CaseBody::Prebaked(error_verdict(&expected_json, &message)),
            expected_json,
        };
    }
    CasePlan {
        index,
        body: CaseBody::Runnable {
            inputs: case.input.clone(),
            accepted: accepted_outputs(&case.expected_output, options.unordered, options.multi_expected),
        },
        expected_json,
    }
}

/// Verdict JSON for a case that never ran, keys in wire order
pub fn error_verdict(expected_json: &str, message: &str) -> String {
    format!(
        r#"{{"status":"error","expected":{},"actual":null,"time":0,"error":{}}}"#,
        expected_json,
        Value::String(message.to_string())
    )
}

/// Build the complete test harness program for `user_code`.
pub fn synthesize_test_harness(
    user_code: &str,
    language: Language,
    test_cases: &[TestCase],
    input_schema: &[InputSchemaEntry],
    entry_name: Option<&str>,
    options: Option<&ExecutionOptions>,
) -> String {
    let plan = HarnessPlan::build(user_code, language, test_cases, input_schema, entry_name, options);
    debug!(
        language = %language,
        entry = %plan.entry.name,
        cases = plan.cases.len(),
        composites = plan.composites.len(),
        "Synthesizing test harness"
    );
    backend_for(language).test_harness(&plan)
}

/// Build a one-shot program that reads a JSON argument array from stdin.
pub fn synthesize_judge_harness(
    user_code: &str,
    language: Language,
    input_schema: &[InputSchemaEntry],
    entry_name: Option<&str>,
    options: Option<&ExecutionOptions>,
) -> String {
    let plan = HarnessPlan::build(user_code, language, &[], input_schema, entry_name, options);
    debug!(language = %language, entry = %plan.entry.name, "Synthesizing judge harness");
    backend_for(language).judge_harness(&plan)
}

/// Push `text` followed by a newline, skipping empty fragments.
pub(crate) fn push_block(out: &mut String, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    out.push_str(text.trim_end());
    out.push_str("\n\n");
}
