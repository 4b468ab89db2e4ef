use super::{push_block, Backend, CaseBody, HarnessPlan, RESULTS_END, RESULTS_START};
use crate::formatter::{format, string_literal};
use crate::logical::LogicalType;
use crate::registry;
use std::fmt::Write as _;
use testsmith_common::types::Language;

pub struct TypeScriptBackend;

const LANG: Language = Language::TypeScript;

impl TypeScriptBackend {
    /// Definitions, user code, composite helpers, the serializer cascade
    /// and the runtime, in that order.
    fn prelude(&self, plan: &HarnessPlan) -> String {
        let mut out = String::new();
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

        let mut cascade = String::from("function harnessToPlain(value: any): any {\n");
        for kind in plan.helper_kinds() {
            let _ = writeln!(
                cascade,
                "    if (value instanceof {}) return {}(value);",
                kind.type_name(),
                kind.serializer_name(LANG)
            );
        }
        cascade.push_str("    return harnessPlainBuiltin(value);\n}");
        push_block(&mut out, &cascade);
        push_block(&mut out, registry::runtime(LANG));
        out
    }

    fn call_expression(&self, plan: &HarnessPlan) -> String {
        let args: Vec<String> = (0..plan.params.len()).map(|i| format!("arg{}", i)).collect();
        if plan.entry.wrapped_in_container {
            format!("new Solution().{}({})", plan.entry.name, args.join(", "))
        } else {
            format!("{}({})", plan.entry.name, args.join(", "))
        }
    }

    /// `var`, with a null composite result sent through its serializer
    fn plain_result(&self, plan: &HarnessPlan, var: &str) -> String {
        match plan.result_kind() {
            Some(kind) => format!(
                "({1} === null || {1} === undefined) ? {0}(null) : {1}",
                kind.serializer_name(LANG),
                var
            ),
            None => var.to_string(),
        }
    }

    /// Expression converting parsed judge input to the parameter's shape
    fn convert(&self, expr: &str, logical: &LogicalType, depth: usize) -> String {
        match logical {
            LogicalType::Composite(kind) => format!("{}({})", kind.parser_name(LANG), expr),
            LogicalType::Array(inner) if inner.composite().is_some() => {
                let var = format!("jv{}", depth);
                format!("({} || []).map(({}: any) => {})", expr, var, self.convert(&var, inner, depth + 1))
            }
            _ => expr.to_string(),
        }
    }
}

impl Backend for TypeScriptBackend {
    fn language(&self) -> Language {
        LANG
    }

    fn test_harness(&self, plan: &HarnessPlan) -> String {
        let mut out = self.prelude(plan);
        out.push_str("const harnessVerdicts: any[] = [];\n\n");

        for case in &plan.cases {
            match &case.body {
                CaseBody::Prebaked(verdict) => {
                    let _ = writeln!(out, "harnessVerdicts.push(JSON.parse({}));\n", string_literal(verdict, LANG));
                }
                CaseBody::Runnable { inputs, accepted } => {
                    let _ = writeln!(out, "// case {}", case.index + 1);
                    out.push_str("harnessVerdicts.push(harnessRunCase((timer: HarnessTimer) => {\n");
                    for (i, (value, param)) in inputs.iter().zip(&plan.params).enumerate() {
                        let _ = writeln!(out, "    const arg{}: any = {};", i, format(value, &param.logical, LANG, None));
                    }
                    out.push_str("    timer.start();\n");
                    let _ = writeln!(out, "    const result: any = {};", self.call_expression(plan));
                    out.push_str("    timer.stop();\n");
                    let returned = match plan.modified_index {
                        Some(k) => format!("arg{}", k),
                        None => "result".to_string(),
                    };
                    let _ = writeln!(out, "    return {};", self.plain_result(plan, &returned));
                    let accepted: Vec<String> = accepted.iter().map(|a| string_literal(a, LANG)).collect();
                    let _ = writeln!(
                        out,
                        "}}, {}, [{}], {}));\n",
                        string_literal(&case.expected_json, LANG),
                        accepted.join(", "),
                        plan.options.unordered
                    );
                }
            }
        }

        let _ = writeln!(out, "console.log({});", string_literal(RESULTS_START, LANG));
        out.push_str("console.log(JSON.stringify(harnessVerdicts));\n");
        let _ = writeln!(out, "console.log({});", string_literal(RESULTS_END, LANG));
        out
    }

    fn judge_harness(&self, plan: &HarnessPlan) -> String {
        let mut out = self.prelude(plan);
        out.push_str("const harnessFs: any = eval(\"require\")(\"fs\");\n");
        out.push_str("const harnessLine: string = String(harnessFs.readFileSync(0, \"utf8\")).split(\"\\n\")[0] || \"\";\n");
        out.push_str("const harnessArgs: any[] = harnessLine.trim() === \"\" ? [] : JSON.parse(harnessLine);\n");
        for (i, param) in plan.params.iter().enumerate() {
            let _ = writeln!(
                out,
                "const arg{}: any = {};",
                i,
                self.convert(&format!("harnessArgs[{}]", i), &param.logical, 0)
            );
        }
        // User output goes to stderr so stdout carries only the result
        out.push_str("const harnessSavedLog = console.log;\n");
        out.push_str("console.log = (...parts: any[]) => { console.error(...parts); };\n");
        out.push_str("let harnessResult: any;\n");
        out.push_str("try {\n");
        let _ = writeln!(out, "    harnessResult = {};", self.call_expression(plan));
        out.push_str("} finally {\n    console.log = harnessSavedLog;\n}\n");
        if let Some(k) = plan.modified_index {
            let _ = writeln!(out, "harnessResult = arg{};", k);
        }
        let _ = writeln!(
            out,
            "let harnessActual: any = harnessToPlain({});",
            self.plain_result(plan, "harnessResult")
        );
        if plan.options.unordered {
            out.push_str("harnessActual = harnessNormalize(harnessActual);\n");
        }
        out.push_str("console.log(harnessStringify(harnessActual));\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::super::{synthesize_judge_harness, synthesize_test_harness};
    use serde_json::json;
    use testsmith_common::types::{ExecutionOptions, InputSchemaEntry, Language, TestCase};

    const SORT: &str = "function sortArray(nums: number[]): number[] {\n    return nums.slice().sort((a, b) => a - b);\n}";

    #[test]
    fn test_harness_shape() {
        let cases = vec![TestCase { input: vec![json!([5, 1, 4, 2, 8])], expected_output: json!([1, 2, 4, 5, 8]) }];
        let schema = vec![InputSchemaEntry::new("nums", "number[]")];
        let program = synthesize_test_harness(SORT, Language::TypeScript, &cases, &schema, None, None);

        assert!(program.contains(SORT));
        assert!(program.contains("const arg0: any = [5, 1, 4, 2, 8];"));
        assert!(program.contains("const result: any = sortArray(arg0);"));
        assert!(program.contains(r#"}, "[1,2,4,5,8]", ["[1,2,4,5,8]"], false));"#));
        assert!(program.contains("console.log(\"___TEST_RESULTS_START___\");"));
        assert!(program.find("timer.start()").unwrap() < program.find("sortArray(arg0)").unwrap());
        assert!(!program.contains("class ListNode"));
    }

    #[test]
    fn test_in_place_returns_argument() {
        let cases = vec![TestCase { input: vec![json!([3, 1])], expected_output: json!([1, 3]) }];
        let schema = vec![InputSchemaEntry::new("nums", "number[]")];
        let options = ExecutionOptions { return_modified_input: true, ..Default::default() };
        let src = "class Solution {\n    sortInPlace(nums: number[]): void {\n        nums.sort((a, b) => a - b);\n    }\n}";
        let program = synthesize_test_harness(src, Language::TypeScript, &cases, &schema, None, Some(&options));
        assert!(program.contains("new Solution().sortInPlace(arg0)"));
        assert!(program.contains("    return arg0;"));
    }

    #[test]
    fn test_composites_cascade() {
        let cases = vec![TestCase { input: vec![json!([1, 2])], expected_output: json!([2, 1]) }];
        let schema = vec![InputSchemaEntry::new("head", "ListNode")];
        let src = "function reverseList(head: ListNode | null): ListNode | null {\n    return head;\n}";
        let program = synthesize_test_harness(src, Language::TypeScript, &cases, &schema, None, None);
        assert!(program.contains("class ListNode"));
        assert!(program.contains("const arg0: any = parseListNode([1, 2]);"));
        assert!(program.contains("if (value instanceof ListNode) return serializeListNode(value);"));
        assert!(program.find("class ListNode").unwrap() < program.find("function reverseList").unwrap());
    }

    #[test]
    fn test_judge_harness_reads_stdin() {
        let schema = vec![InputSchemaEntry::new("lists", "ListNode[]")];
        let src = "function merge(lists: any[]): any { return null; }";
        let program = synthesize_judge_harness(src, Language::TypeScript, &schema, None, None);
        assert!(program.contains("readFileSync(0"));
        assert!(program.contains("(harnessArgs[0] || []).map((jv0: any) => parseListNode(jv0))"));
        assert!(program.contains("console.log(harnessStringify(harnessActual));"));
        assert!(!program.contains("___TEST_RESULTS_START___"));
    }

    #[test]
    fn test_null_composite_result_uses_serializer() {
        let cases = vec![TestCase { input: vec![json!([])], expected_output: json!([]) }];
        let schema = vec![InputSchemaEntry::new("root", "TreeNode")];
        let src = "function invertTree(root: TreeNode | null): TreeNode | null {\n    return root;\n}";
        let program = synthesize_test_harness(src, Language::TypeScript, &cases, &schema, None, None);
        assert!(program.contains("    return (result === null || result === undefined) ? serializeTreeNode(null) : result;"));

        let program = synthesize_judge_harness(src, Language::TypeScript, &schema, None, None);
        assert!(program.contains(
            "let harnessActual: any = harnessToPlain((harnessResult === null || harnessResult === undefined) ? serializeTreeNode(null) : harnessResult);"
        ));
    }

    #[test]
    fn test_captured_logs_end_with_newline() {
        let cases = vec![TestCase { input: vec![json!([1])], expected_output: json!([1]) }];
        let schema = vec![InputSchemaEntry::new("nums", "number[]")];
        let program = synthesize_test_harness(SORT, Language::TypeScript, &cases, &schema, None, None);
        assert!(program.contains(".join(\" \") + \"\\n\");"));
        assert!(program.contains("verdict.logs = timer.logs.join(\"\");"));
    }
}
