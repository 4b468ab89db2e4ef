use super::{push_block, Backend, CaseBody, HarnessPlan, RESULTS_END, RESULTS_START};
use crate::formatter::{format, string_literal, NativeType};
use crate::registry;
use crate::resolver::{brace_depth, make_top_level_static};
use crate::source::strip_comments;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Write as _;
use testsmith_common::types::Language;

pub struct JavaBackend;

const LANG: Language = Language::Java;

const IMPORTS: &str = "import java.util.*;\nimport java.util.stream.*;\nimport java.io.*;";

/// Output capture and error message helpers paired with the case methods
const CAPTURE_HELPER: &str = r#"    static String harnessLogs(ByteArrayOutputStream captured) {
        try {
            return captured.toString("UTF-8");
        } catch (UnsupportedEncodingException e) {
            return captured.toString();
        }
    }

    static String harnessErrorMessage(Throwable e) {
        String message = e.getMessage();
        return message != null ? message : e.getClass().getSimpleName();
    }"#;

lazy_static! {
    static ref PUBLIC_TYPE: Regex =
        Regex::new(r"\bpublic\s+(?:(?:final|abstract|static|sealed)\s+)*(?:class|interface|enum|record)\b").unwrap();
}

/// User source split into hoisted imports and the remaining body
struct UserSource {
    imports: Vec<String>,
    body: String,
}

/// Pull `import` lines out and drop `package` lines; only `Main` may be
/// public, so top-level `public` types are demoted.
fn prepare_user_source(source: &str, static_fixup: bool) -> UserSource {
    let stripped = strip_comments(source, LANG);
    let mut imports = Vec::new();
    let mut kept = Vec::new();
    for (line, bare) in source.lines().zip(stripped.lines()) {
        let trimmed = bare.trim();
        if trimmed.starts_with("import ") && trimmed.ends_with(';') {
            imports.push(trimmed.to_string());
        } else if trimmed.starts_with("package ") && trimmed.ends_with(';') {
            continue;
        } else {
            kept.push(line);
        }
    }
    let body = demote_public_types(&kept.join("\n"));
    let body = if static_fixup { make_top_level_static(&body) } else { body };
    UserSource { imports, body }
}

fn demote_public_types(source: &str) -> String {
    let stripped = strip_comments(source, LANG);
    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for m in PUBLIC_TYPE.find_iter(&stripped) {
        if brace_depth(&stripped, m.start()) != 0 {
            continue;
        }
        out.push_str(&source[last..m.start()]);
        last = m.start() + "public".len();
        // swallow the whitespace after `public`
        while source[last..].starts_with([' ', '\t']) {
            last += 1;
        }
    }
    out.push_str(&source[last..]);
    out
}

impl JavaBackend {
    /// Everything up to and including the opening of `Main` plus the
    /// shared members inside it.
    fn prelude(&self, plan: &HarnessPlan) -> String {
        let user = prepare_user_source(plan.user_code, !plan.entry.wrapped_in_container);
        let mut out = String::new();

        let mut imports = String::from(IMPORTS);
        for line in &user.imports {
            if !imports.lines().any(|l| l == line) {
                imports.push('\n');
                imports.push_str(line);
            }
        }
        push_block(&mut out, &imports);

        for kind in plan.definition_kinds() {
            if let Some(descriptor) = registry::lookup(kind, LANG) {
                push_block(&mut out, descriptor.definition);
            }
        }
        if plan.entry.wrapped_in_container {
            push_block(&mut out, &user.body);
        }

        out.push_str("public class Main {\n");
        if !plan.entry.wrapped_in_container {
            push_block(&mut out, &user.body);
        }
        push_block(&mut out, registry::runtime(LANG));
        push_block(&mut out, CAPTURE_HELPER);
        for kind in plan.helper_kinds() {
            if let Some(descriptor) = registry::lookup(kind, LANG) {
                push_block(&mut out, descriptor.parser);
                push_block(&mut out, descriptor.serializer);
            }
        }

        let mut cascade = String::from("    static Object harnessToPlain(Object value) {\n");
        for kind in plan.helper_kinds() {
            let _ = writeln!(
                cascade,
                "        if (value instanceof {0}) return {1}(({0}) value);",
                kind.type_name(),
                kind.serializer_name(LANG)
            );
        }
        cascade.push_str("        return harnessPlainBuiltin(value);\n    }");
        push_block(&mut out, &cascade);
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

    /// Statements performing the call and leaving the value in `result`
    fn call_statements(&self, plan: &HarnessPlan, indent: &str, timed: bool) -> String {
        let mut out = String::new();
        if timed {
            let _ = writeln!(out, "{}started = System.nanoTime();", indent);
        }
        let call = self.call_expression(plan);
        match plan.modified_index {
            Some(k) => {
                let _ = writeln!(out, "{}{};", indent, call);
                let _ = writeln!(out, "{}result = arg{};", indent, k);
            }
            None if plan.returns_void() => {
                let _ = writeln!(out, "{}{};", indent, call);
                let _ = writeln!(out, "{}result = null;", indent);
            }
            None => {
                let _ = writeln!(out, "{}result = {};", indent, call);
            }
        }
        if timed {
            let _ = writeln!(out, "{}time = (System.nanoTime() - started) / 1e6;", indent);
        }
        out
    }

    /// Plain form of `result`, with a null composite sent through its serializer
    fn plain_result(&self, plan: &HarnessPlan) -> String {
        match plan.result_kind() {
            Some(kind) => format!(
                "result == null ? {}(null) : harnessToPlain(result)",
                kind.serializer_name(LANG)
            ),
            None => "harnessToPlain(result)".to_string(),
        }
    }

    /// Expression converting a parsed JSON node `expr` to `ty`
    fn convert(&self, expr: &str, ty: &NativeType, depth: usize) -> String {
        let var = format!("jv{}", depth);
        match ty {
            NativeType::Int => format!("((Number) {}).intValue()", expr),
            NativeType::Long => format!("((Number) {}).longValue()", expr),
            NativeType::Short => format!("((Number) {}).shortValue()", expr),
            NativeType::Byte => format!("((Number) {}).byteValue()", expr),
            NativeType::Double => format!("((Number) {}).doubleValue()", expr),
            NativeType::Float => format!("((Number) {}).floatValue()", expr),
            NativeType::Bool => format!("((Boolean) {})", expr),
            NativeType::Char => format!("String.valueOf({}).charAt(0)", expr),
            NativeType::Str => format!("((String) {})", expr),
            NativeType::Composite(kind) => format!("{}({})", kind.parser_name(LANG), expr),
            NativeType::Array(inner) => match inner.as_ref() {
                NativeType::Int => format!("((List<?>) {}).stream().mapToInt({} -> ((Number) {}).intValue()).toArray()", expr, var, var),
                NativeType::Long => format!("((List<?>) {}).stream().mapToLong({} -> ((Number) {}).longValue()).toArray()", expr, var, var),
                NativeType::Double => format!("((List<?>) {}).stream().mapToDouble({} -> ((Number) {}).doubleValue()).toArray()", expr, var, var),
                NativeType::Char => format!("harnessCharArray({})", expr),
                NativeType::Bool => format!("harnessBooleanArray({})", expr),
                other => format!(
                    "((List<?>) {}).stream().map({} -> {}).toArray({}[]::new)",
                    expr,
                    var,
                    self.convert(&var, other, depth + 1),
                    other.render(LANG, false)
                ),
            },
            NativeType::List(outer, inner) => {
                let constructor = match outer.as_str() {
                    "LinkedList" => "LinkedList",
                    "Deque" | "ArrayDeque" => "ArrayDeque",
                    _ => "ArrayList",
                };
                format!(
                    "((List<?>) {}).stream().<{}>map({} -> {}).collect(Collectors.toCollection({}::new))",
                    expr,
                    inner.render(LANG, true),
                    var,
                    self.convert(&var, inner, depth + 1),
                    constructor
                )
            }
            NativeType::Other(text) if text == "Object" => expr.to_string(),
            NativeType::Other(text) => format!("(({}) (Object) {})", text, expr),
        }
    }
}

impl Backend for JavaBackend {
    fn language(&self) -> Language {
        LANG
    }

    fn test_harness(&self, plan: &HarnessPlan) -> String {
        let mut out = self.prelude(plan);
        let mut runs = String::new();

        for case in &plan.cases {
            match &case.body {
                CaseBody::Prebaked(verdict) => {
                    let _ = writeln!(runs, "        verdicts.add({});", string_literal(verdict, LANG));
                }
                CaseBody::Runnable { inputs, accepted } => {
                    let accepted: Vec<String> = accepted.iter().map(|a| string_literal(a, LANG)).collect();
                    let _ = writeln!(out, "    static String runCase{}() {{", case.index);
                    let _ = writeln!(out, "        String expectedJson = {};", string_literal(&case.expected_json, LANG));
                    let _ = writeln!(out, "        List<String> accepted = Arrays.asList({});", accepted.join(", "));
                    out.push_str("        PrintStream originalOut = System.out;\n");
                    out.push_str("        ByteArrayOutputStream captured = new ByteArrayOutputStream();\n");
                    out.push_str("        long started = System.nanoTime();\n");
                    out.push_str("        double time = 0;\n");
                    out.push_str("        try {\n");
                    for (i, value) in inputs.iter().enumerate() {
                        let native = plan.native_type(i);
                        let param = &plan.params[i];
                        let declared = native.render(LANG, false);
                        let _ = writeln!(
                            out,
                            "            {} arg{} = {};",
                            declared,
                            i,
                            format(value, &param.logical, LANG, Some(&declared))
                        );
                    }
                    out.push_str("            Object result;\n");
                    out.push_str("            System.setOut(new PrintStream(captured, true, \"UTF-8\"));\n");
                    out.push_str(&self.call_statements(plan, "            ", true));
                    out.push_str("            System.setOut(originalOut);\n");
                    let _ = writeln!(out, "            Object actual = {};", self.plain_result(plan));
                    if plan.options.unordered {
                        out.push_str("            actual = harnessNormalize(actual);\n");
                    }
                    out.push_str("            String actualJson = harnessStringify(actual);\n");
                    out.push_str("            String status = accepted.contains(actualJson) ? \"pass\" : \"fail\";\n");
                    out.push_str("            return harnessVerdict(status, expectedJson, actualJson, time, harnessLogs(captured), null);\n");
                    out.push_str("        } catch (Throwable e) {\n");
                    out.push_str("            System.setOut(originalOut);\n");
                    out.push_str("            if (time == 0) time = (System.nanoTime() - started) / 1e6;\n");
                    out.push_str("            return harnessVerdict(\"error\", expectedJson, \"null\", time, harnessLogs(captured), harnessErrorMessage(e));\n");
                    out.push_str("        } finally {\n");
                    out.push_str("            System.setOut(originalOut);\n");
                    out.push_str("        }\n");
                    out.push_str("    }\n\n");
                    let _ = writeln!(runs, "        verdicts.add(runCase{}());", case.index);
                }
            }
        }

        out.push_str("    public static void main(String[] args) {\n");
        out.push_str("        List<String> verdicts = new ArrayList<>();\n");
        out.push_str(&runs);
        let _ = writeln!(out, "        System.out.println({});", string_literal(RESULTS_START, LANG));
        out.push_str("        System.out.println(\"[\" + String.join(\",\", verdicts) + \"]\");\n");
        let _ = writeln!(out, "        System.out.println({});", string_literal(RESULTS_END, LANG));
        out.push_str("    }\n}\n");
        out
    }

    fn judge_harness(&self, plan: &HarnessPlan) -> String {
        let mut out = self.prelude(plan);
        out.push_str("    public static void main(String[] args) throws Exception {\n");
        out.push_str("        BufferedReader reader = new BufferedReader(new InputStreamReader(System.in, \"UTF-8\"));\n");
        out.push_str("        String line = reader.readLine();\n");
        out.push_str("        List<?> input = (List<?>) harnessParseJson(line == null || line.trim().isEmpty() ? \"[]\" : line);\n");
        out.push_str("        PrintStream originalOut = System.out;\n");
        // User output goes to stderr so stdout carries only the result
        out.push_str("        System.setOut(System.err);\n");
        out.push_str("        Object result;\n");
        out.push_str("        try {\n");
        for i in 0..plan.params.len() {
            let native = plan.native_type(i);
            let _ = writeln!(
                out,
                "            {} arg{} = {};",
                native.render(LANG, false),
                i,
                self.convert(&format!("input.get({})", i), &native, 0)
            );
        }
        out.push_str(&self.call_statements(plan, "            ", false));
        out.push_str("        } finally {\n");
        out.push_str("            System.setOut(originalOut);\n");
        out.push_str("        }\n");
        let _ = writeln!(out, "        Object actual = {};", self.plain_result(plan));
        if plan.options.unordered {
            out.push_str("        actual = harnessNormalize(actual);\n");
        }
        out.push_str("        System.out.println(harnessStringify(actual));\n");
        out.push_str("    }\n}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::super::{synthesize_judge_harness, synthesize_test_harness};
    use super::*;
    use serde_json::json;
    use testsmith_common::types::{ExecutionOptions, InputSchemaEntry, TestCase};

    const JAVA_SORT_SRC: &str = "class Solution {\n    public int[] sortArray(int[] nums) {\n        Arrays.sort(nums);\n        return nums;\n    }\n}";

    fn sort_case() -> (Vec<TestCase>, Vec<InputSchemaEntry>) {
        (
            vec![TestCase { input: vec![json!([5, 1, 4, 2, 8])], expected_output: json!([1, 2, 4, 5, 8]) }],
            vec![InputSchemaEntry::new("nums", "number[]")],
        )
    }

    #[test]
    fn test_container_stays_outside_main() {
        let (cases, schema) = sort_case();
        let src = "import java.util.function.*;\n\npublic class Solution {\n    public int[] sortArray(int[] nums) {\n        Arrays.sort(nums);\n        return nums;\n    }\n}";
        let program = synthesize_test_harness(src, Language::Java, &cases, &schema, None, None);

        assert!(program.starts_with("import java.util.*;"));
        assert!(program.contains("import java.util.function.*;"));
        assert!(program.contains("\nclass Solution {"));
        assert!(!program.contains("public class Solution"));
        assert!(program.find("class Solution").unwrap() < program.find("public class Main").unwrap());
        assert!(program.contains("            int[] arg0 = new int[]{5, 1, 4, 2, 8};"));
        assert!(program.contains("            result = new Solution().sortArray(arg0);"));
        assert!(program.contains("        verdicts.add(runCase0());"));
    }

    #[test]
    fn test_free_methods_become_static_inside_main() {
        let (cases, schema) = sort_case();
        let src = "int[] sortArray(int[] nums) {\n    Arrays.sort(nums);\n    return nums;\n}";
        let program = synthesize_test_harness(src, Language::Java, &cases, &schema, None, None);
        let main_at = program.find("public class Main {").unwrap();
        let method_at = program.find("static int[] sortArray(int[] nums)").unwrap();
        assert!(method_at > main_at);
        assert!(program.contains("            result = sortArray(arg0);"));
    }

    #[test]
    fn test_void_in_place_call() {
        let cases = vec![TestCase { input: vec![json!(["h", "i"])], expected_output: json!(["i", "h"]) }];
        let schema = vec![InputSchemaEntry::new("s", "string[]")];
        let options = ExecutionOptions { return_modified_input: true, ..Default::default() };
        let src = "class Solution {\n    public void reverseString(char[] s) {\n    }\n}";
        let program = synthesize_test_harness(src, Language::Java, &cases, &schema, None, Some(&options));
        assert!(program.contains("            char[] arg0 = new char[]{'h', 'i'};"));
        assert!(program.contains("            new Solution().reverseString(arg0);\n            result = arg0;"));
    }

    #[test]
    fn test_composite_cascade_and_definitions() {
        let cases = vec![TestCase { input: vec![json!([1, 2, 3])], expected_output: json!([3, 2, 1]) }];
        let schema = vec![InputSchemaEntry::new("head", "ListNode")];
        let src = "class Solution {\n    public ListNode reverseList(ListNode head) {\n        return head;\n    }\n}";
        let program = synthesize_test_harness(src, Language::Java, &cases, &schema, None, None);
        assert!(program.contains("class ListNode {"));
        assert!(program.contains("ListNode arg0 = parseListNode(harnessParseJson(\"[1,2,3]\"));"));
        assert!(program.contains("if (value instanceof ListNode) return serializeListNode((ListNode) value);"));
    }

    #[test]
    fn test_judge_conversions() {
        let schema = vec![
            InputSchemaEntry::new("grid", "number[][]"),
            InputSchemaEntry::new("words", "string[]"),
        ];
        let src = "class Solution {\n    public int count(int[][] grid, List<String> words) {\n        return 0;\n    }\n}";
        let program = synthesize_judge_harness(src, Language::Java, &schema, None, None);
        assert!(program.contains(
            "int[][] arg0 = ((List<?>) input.get(0)).stream().map(jv0 -> ((List<?>) jv0).stream().mapToInt(jv1 -> ((Number) jv1).intValue()).toArray()).toArray(int[][]::new);"
        ));
        assert!(program.contains(
            "List<String> arg1 = ((List<?>) input.get(1)).stream().<String>map(jv0 -> ((String) jv0)).collect(Collectors.toCollection(ArrayList::new));"
        ));
        assert!(program.contains("System.setOut(System.err);"));
    }

    #[test]
    fn test_demote_public_types_only_at_top_level() {
        let src = "public final class Helper {\n    public class Inner {}\n}";
        let out = demote_public_types(src);
        assert!(out.starts_with("final class Helper"));
        assert!(out.contains("    public class Inner"));
    }

    #[test]
    fn test_null_composite_result_uses_serializer() {
        let cases = vec![TestCase { input: vec![json!([])], expected_output: json!([]) }];
        let schema = vec![InputSchemaEntry::new("root", "TreeNode")];
        let src = "class Solution {\n    public TreeNode invertTree(TreeNode root) {\n        return root;\n    }\n}";
        let program = synthesize_test_harness(src, Language::Java, &cases, &schema, None, None);
        assert!(program.contains("            Object actual = result == null ? serializeTreeNode(null) : harnessToPlain(result);"));

        let (cases, schema) = sort_case();
        let program = synthesize_test_harness(JAVA_SORT_SRC, Language::Java, &cases, &schema, None, None);
        assert!(program.contains("            Object actual = harnessToPlain(result);"));
    }

    #[test]
    fn test_error_verdict_carries_message() {
        let (cases, schema) = sort_case();
        let program = synthesize_test_harness(JAVA_SORT_SRC, Language::Java, &cases, &schema, None, None);
        assert!(program.contains("static String harnessErrorMessage(Throwable e) {"));
        assert!(program.contains("return message != null ? message : e.getClass().getSimpleName();"));
        assert!(program.contains("harnessLogs(captured), harnessErrorMessage(e));"));
        assert!(!program.contains("String.valueOf(e)"));
    }
}
