use super::{push_block, Backend, CaseBody, HarnessPlan, RESULTS_END, RESULTS_START};
use crate::formatter::{format, string_literal};
use crate::logical::LogicalType;
use crate::registry;
use std::fmt::Write as _;
use testsmith_common::types::Language;

pub struct PythonBackend;

const LANG: Language = Language::Python;

const IMPORTS: &str = r#"import bisect
import collections
import contextlib
import functools
import heapq
import io
import itertools
import json
import math
import re
import string
import sys
import time
from collections import Counter, OrderedDict, defaultdict, deque
from functools import lru_cache, reduce
from typing import *

sys.setrecursionlimit(10 ** 6)"#;

impl PythonBackend {
    fn prelude(&self, plan: &HarnessPlan) -> String {
        let mut out = String::new();
        push_block(&mut out, IMPORTS);
        for kind in plan.definition_kinds() {
            if let Some(descriptor) = registry::lookup(kind, LANG) {
                push_block(&mut out, descriptor.definition);
            }
        }
        push_block(&mut out, plan.user_code);
        for kind in plan.helper_kinds() {
            if let Some(descriptor) = registry::lookup(kind, LANG) {
                push_block(&mut out, descriptor.parser);
                push_block(&mut out, descriptor.serializer);
            }
        }

        let mut cascade = String::from("def _harness_to_plain(value):\n");
        for kind in plan.helper_kinds() {
            let _ = writeln!(
                cascade,
                "    if isinstance(value, {}):\n        return {}(value)",
                kind.type_name(),
                kind.serializer_name(LANG)
            );
        }
        cascade.push_str("    return _harness_plain_builtin(value)");
        push_block(&mut out, &cascade);
        push_block(&mut out, registry::runtime(LANG));
        out
    }

    fn call_expression(&self, plan: &HarnessPlan) -> String {
        let args: Vec<String> = (0..plan.params.len()).map(|i| format!("arg{}", i)).collect();
        if plan.entry.wrapped_in_container {
            format!("Solution().{}({})", plan.entry.name, args.join(", "))
        } else {
            format!("{}({})", plan.entry.name, args.join(", "))
        }
    }

    /// `var`, with a null composite result sent through its serializer
    fn plain_result(&self, plan: &HarnessPlan, var: &str) -> String {
        match plan.result_kind() {
            Some(kind) => format!("{0}(None) if {1} is None else {1}", kind.serializer_name(LANG), var),
            None => var.to_string(),
        }
    }

    fn convert(&self, expr: &str, logical: &LogicalType, depth: usize) -> String {
        match logical {
            LogicalType::Composite(kind) => format!("{}({})", kind.parser_name(LANG), expr),
            LogicalType::Array(inner) if inner.composite().is_some() => {
                let var = format!("jv{}", depth);
                format!("[{} for {} in ({} or [])]", self.convert(&var, inner, depth + 1), var, expr)
            }
            _ => expr.to_string(),
        }
    }

    fn py_bool(value: bool) -> &'static str {
        if value {
            "True"
        } else {
            "False"
        }
    }
}

impl Backend for PythonBackend {
    fn language(&self) -> Language {
        LANG
    }

    fn test_harness(&self, plan: &HarnessPlan) -> String {
        let mut out = self.prelude(plan);
        let mut runs = String::from("_harness_verdicts = []\n");

        for case in &plan.cases {
            match &case.body {
                CaseBody::Prebaked(verdict) => {
                    let _ = writeln!(runs, "_harness_verdicts.append(json.loads({}))", string_literal(verdict, LANG));
                }
                CaseBody::Runnable { inputs, accepted } => {
                    let _ = writeln!(out, "def _harness_case_{}(timer):", case.index);
                    for (i, (value, param)) in inputs.iter().zip(&plan.params).enumerate() {
                        let _ = writeln!(out, "    arg{} = {}", i, format(value, &param.logical, LANG, None));
                    }
                    out.push_str("    with timer:\n");
                    let _ = writeln!(out, "        result = {}", self.call_expression(plan));
                    let returned = match plan.modified_index {
                        Some(k) => format!("arg{}", k),
                        None => "result".to_string(),
                    };
                    let _ = writeln!(out, "    return {}\n\n", self.plain_result(plan, &returned));
                    let accepted: Vec<String> = accepted.iter().map(|a| string_literal(a, LANG)).collect();
                    let _ = writeln!(
                        runs,
                        "_harness_verdicts.append(_harness_run_case(_harness_case_{}, {}, [{}], {}))",
                        case.index,
                        string_literal(&case.expected_json, LANG),
                        accepted.join(", "),
                        Self::py_bool(plan.options.unordered)
                    );
                }
            }
        }

        out.push_str(&runs);
        let _ = writeln!(out, "print({})", string_literal(RESULTS_START, LANG));
        out.push_str("print(json.dumps(_harness_verdicts, separators=(\",\", \":\"), ensure_ascii=False))\n");
        let _ = writeln!(out, "print({})", string_literal(RESULTS_END, LANG));
        out
    }

    fn judge_harness(&self, plan: &HarnessPlan) -> String {
        let mut out = self.prelude(plan);
        out.push_str("_harness_line = sys.stdin.readline()\n");
        out.push_str("_harness_args = json.loads(_harness_line) if _harness_line.strip() else []\n");
        // User output goes to stderr so stdout carries only the result
        out.push_str("with contextlib.redirect_stdout(sys.stderr):\n");
        for (i, param) in plan.params.iter().enumerate() {
            let _ = writeln!(
                out,
                "    arg{} = {}",
                i,
                self.convert(&format!("_harness_args[{}]", i), &param.logical, 0)
            );
        }
        let _ = writeln!(out, "    _harness_result = {}", self.call_expression(plan));
        if let Some(k) = plan.modified_index {
            let _ = writeln!(out, "_harness_result = arg{}", k);
        }
        let _ = writeln!(
            out,
            "_harness_actual = _harness_to_plain({})",
            self.plain_result(plan, "_harness_result")
        );
        if plan.options.unordered {
            out.push_str("_harness_actual = _harness_normalize(_harness_actual)\n");
        }
        out.push_str("print(_harness_dumps(_harness_actual))\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::super::{synthesize_judge_harness, synthesize_test_harness};
    use serde_json::json;
    use testsmith_common::types::{ExecutionOptions, InputSchemaEntry, Language, TestCase};

    #[test]
    fn test_harness_shape() {
        let src = "class Solution:\n    def twoSum(self, nums: List[int], target: int) -> List[int]:\n        return [0, 1]\n";
        let cases = vec![TestCase { input: vec![json!([2, 7]), json!(9)], expected_output: json!([0, 1]) }];
        let schema = vec![InputSchemaEntry::new("nums", "number[]"), InputSchemaEntry::new("target", "number")];
        let program = synthesize_test_harness(src, Language::Python, &cases, &schema, Some("twoSum"), None);

        assert!(program.starts_with("import bisect"));
        assert!(program.contains("def _harness_case_0(timer):\n    arg0 = [2, 7]\n    arg1 = 9\n    with timer:\n        result = Solution().twoSum(arg0, arg1)\n    return result\n"));
        assert!(program.contains(r#"_harness_run_case(_harness_case_0, "[0,1]", ["[0,1]"], False)"#));
        assert!(program.trim_end().ends_with("print(\"___TEST_RESULTS_END___\")"));
    }

    #[test]
    fn test_unordered_multi_expected() {
        let src = "def pairs(n):\n    return [[1, 0]]\n";
        let cases = vec![TestCase { input: vec![json!(2)], expected_output: json!([[[0, 1]], [[1, 0]]]) }];
        let schema = vec![InputSchemaEntry::new("n", "number")];
        let options = ExecutionOptions { unordered: true, multi_expected: true, ..Default::default() };
        let program = synthesize_test_harness(src, Language::Python, &cases, &schema, None, Some(&options));
        assert!(program.contains(r#"["[[0,1]]"], True)"#));
    }

    #[test]
    fn test_tree_input_and_cascade() {
        let src = "def maxDepth(root: Optional[TreeNode]) -> int:\n    return 0\n";
        let cases = vec![TestCase { input: vec![json!([3, 9, 20, null, null, 15, 7])], expected_output: json!(3) }];
        let schema = vec![InputSchemaEntry::new("root", "TreeNode")];
        let program = synthesize_test_harness(src, Language::Python, &cases, &schema, None, None);
        assert!(program.contains("arg0 = parse_tree_node([3, 9, 20, None, None, 15, 7])"));
        assert!(program.contains("    if isinstance(value, TreeNode):\n        return serialize_tree_node(value)"));
    }

    #[test]
    fn test_judge_harness() {
        let src = "def rotate(nums, k):\n    nums[:] = nums[-k:] + nums[:-k]\n";
        let schema = vec![InputSchemaEntry::new("nums", "number[]"), InputSchemaEntry::new("k", "number")];
        let options = ExecutionOptions { return_modified_input: true, modified_input_index: 0, ..Default::default() };
        let program = synthesize_judge_harness(src, Language::Python, &schema, None, Some(&options));
        assert!(program.contains("    arg0 = _harness_args[0]\n    arg1 = _harness_args[1]\n"));
        assert!(program.contains("    _harness_result = rotate(arg0, arg1)\n_harness_result = arg0\n"));
        assert!(program.contains("print(_harness_dumps(_harness_actual))"));
    }

    #[test]
    fn test_null_composite_result_uses_serializer() {
        let cases = vec![TestCase { input: vec![json!([])], expected_output: json!([]) }];
        let schema = vec![InputSchemaEntry::new("root", "TreeNode")];
        let src = "def invertTree(root: Optional[TreeNode]) -> Optional[TreeNode]:\n    return root\n";
        let program = synthesize_test_harness(src, Language::Python, &cases, &schema, None, None);
        assert!(program.contains("    return serialize_tree_node(None) if result is None else result\n"));
        assert!(program.contains("arg0 = parse_tree_node([])"));

        let program = synthesize_judge_harness(src, Language::Python, &schema, None, None);
        assert!(program.contains(
            "_harness_actual = _harness_to_plain(serialize_tree_node(None) if _harness_result is None else _harness_result)"
        ));
    }
}
