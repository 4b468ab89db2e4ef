use super::{push_block, Backend, CaseBody, HarnessPlan, RESULTS_END, RESULTS_START};
use crate::formatter::{format, string_literal};
use crate::logical::CompositeKind;
use crate::registry::{self, CPP_RUNTIME_CORE, CPP_RUNTIME_TEMPLATES};
use std::fmt::Write as _;
use testsmith_common::types::Language;

pub struct CppBackend;

const LANG: Language = Language::Cpp;

const INCLUDES: &[&str] = &[
    "algorithm", "bitset", "cctype", "cerrno", "chrono", "climits", "cmath", "cstdio", "cstdlib", "deque",
    "functional", "iomanip", "iostream", "map", "numeric", "queue", "set", "sstream", "stack", "string",
    "tuple", "unordered_map", "unordered_set", "utility", "vector",
];

impl CppBackend {
    fn prelude(&self, plan: &HarnessPlan) -> String {
        let mut out = String::new();
        let mut header = String::new();
        for name in INCLUDES {
            let _ = writeln!(header, "#include <{}>", name);
        }
        header.push_str("\nusing namespace std;");
        push_block(&mut out, &header);

        for kind in plan.definition_kinds() {
            if let Some(descriptor) = registry::lookup(kind, LANG) {
                push_block(&mut out, descriptor.definition);
            }
        }
        push_block(&mut out, plan.user_code);
        push_block(&mut out, CPP_RUNTIME_CORE);

        let helpers: Vec<CompositeKind> = plan.helper_kinds().collect();
        for kind in &helpers {
            if let Some(descriptor) = registry::lookup(*kind, LANG) {
                push_block(&mut out, descriptor.parser);
                push_block(&mut out, descriptor.serializer);
            }
        }
        // Composite overloads must be visible before the container templates
        let mut overloads = String::new();
        for kind in &helpers {
            let param = match kind {
                CompositeKind::Interval => "const Interval&".to_string(),
                other => other.cpp_type(),
            };
            let _ = writeln!(
                overloads,
                "JsonValue toJsonValue({} value) {{ return {}(value); }}",
                param,
                kind.serializer_name(LANG)
            );
        }
        push_block(&mut out, &overloads);
        push_block(&mut out, CPP_RUNTIME_TEMPLATES);

        let mut converts = String::new();
        for kind in &helpers {
            let ty = kind.cpp_type();
            let _ = writeln!(
                converts,
                "template <> struct JsonConvert<{0}> {{\n    static {0} from(const JsonValue& v) {{ return {1}(v); }}\n}};\n",
                ty,
                kind.parser_name(LANG)
            );
        }
        push_block(&mut out, &converts);
        out
    }

    fn call_expression(&self, plan: &HarnessPlan) -> String {
        let args: Vec<String> = (0..plan.params.len()).map(|i| format!("arg{}", i)).collect();
        if plan.entry.wrapped_in_container {
            format!("harnessInstance.{}({})", plan.entry.name, args.join(", "))
        } else {
            format!("{}({})", plan.entry.name, args.join(", "))
        }
    }

    /// Instance creation (if any) and the call, leaving `JsonValue actual`
    /// holding the converted result.
    fn call_statements(&self, plan: &HarnessPlan, indent: &str, timed: bool) -> String {
        let mut out = String::new();
        if plan.entry.wrapped_in_container {
            let _ = writeln!(out, "{}Solution harnessInstance;", indent);
        }
        if timed {
            let _ = writeln!(out, "{}started = chrono::steady_clock::now();", indent);
        }
        let call = self.call_expression(plan);
        let conversion = match plan.modified_index {
            Some(k) => {
                let _ = writeln!(out, "{}{};", indent, call);
                format!("toJsonValue(arg{})", k)
            }
            None if plan.returns_void() => {
                let _ = writeln!(out, "{}{};", indent, call);
                "JsonValue()".to_string()
            }
            None => {
                let _ = writeln!(out, "{}auto result = {};", indent, call);
                "toJsonValue(result)".to_string()
            }
        };
        if timed {
            let _ = writeln!(
                out,
                "{}time = chrono::duration<double, milli>(chrono::steady_clock::now() - started).count();",
                indent
            );
            let _ = writeln!(out, "{}capture.restore();", indent);
        } else {
            let _ = writeln!(out, "{}cout.rdbuf(harnessSaved);", indent);
        }
        let _ = writeln!(out, "{}JsonValue actual = {};", indent, conversion);
        if plan.options.unordered {
            let _ = writeln!(out, "{}actual = harnessNormalize(actual);", indent);
        }
        out
    }
}

impl Backend for CppBackend {
    fn language(&self) -> Language {
        LANG
    }

    fn test_harness(&self, plan: &HarnessPlan) -> String {
        let mut out = self.prelude(plan);
        let mut runs = String::new();

        for case in &plan.cases {
            match &case.body {
                CaseBody::Prebaked(verdict) => {
                    let _ = writeln!(runs, "    verdicts.push_back({});", string_literal(verdict, LANG));
                }
                CaseBody::Runnable { inputs, accepted } => {
                    let accepted: Vec<String> = accepted.iter().map(|a| string_literal(a, LANG)).collect();
                    let _ = writeln!(out, "string runCase{}() {{", case.index);
                    let _ = writeln!(out, "    const string expectedJson = {};", string_literal(&case.expected_json, LANG));
                    let _ = writeln!(out, "    const vector<string> accepted = {{{}}};", accepted.join(", "));
                    out.push_str("    HarnessCapture capture;\n");
                    out.push_str("    auto started = chrono::steady_clock::now();\n");
                    out.push_str("    double time = 0;\n");
                    out.push_str("    try {\n");
                    for (i, value) in inputs.iter().enumerate() {
                        let declared = plan.native_type(i).render(LANG, false);
                        let _ = writeln!(
                            out,
                            "        {} arg{} = {};",
                            declared,
                            i,
                            format(value, &plan.params[i].logical, LANG, Some(&declared))
                        );
                    }
                    out.push_str(&self.call_statements(plan, "        ", true));
                    out.push_str("        string actualJson = harnessStringify(actual);\n");
                    out.push_str("        bool matched = find(accepted.begin(), accepted.end(), actualJson) != accepted.end();\n");
                    out.push_str("        return harnessVerdict(matched ? \"pass\" : \"fail\", expectedJson, actualJson, time, capture.buffer.str(), false, \"\");\n");
                    out.push_str("    } catch (const exception& e) {\n");
                    out.push_str("        capture.restore();\n");
                    out.push_str("        if (time == 0) time = chrono::duration<double, milli>(chrono::steady_clock::now() - started).count();\n");
                    out.push_str("        return harnessVerdict(\"error\", expectedJson, \"null\", time, capture.buffer.str(), true, e.what());\n");
                    out.push_str("    } catch (...) {\n");
                    out.push_str("        capture.restore();\n");
                    out.push_str("        return harnessVerdict(\"error\", expectedJson, \"null\", time, capture.buffer.str(), true, \"unknown exception\");\n");
                    out.push_str("    }\n");
                    out.push_str("}\n\n");
                    let _ = writeln!(runs, "    verdicts.push_back(runCase{}());", case.index);
                }
            }
        }

        out.push_str("int main() {\n");
        out.push_str("    vector<string> verdicts;\n");
        out.push_str(&runs);
        let _ = writeln!(out, "    cout << {} << \"\\n\";", string_literal(RESULTS_START, LANG));
        out.push_str("    cout << \"[\";\n");
        out.push_str("    for (size_t i = 0; i < verdicts.size(); i++) cout << (i ? \",\" : \"\") << verdicts[i];\n");
        out.push_str("    cout << \"]\\n\";\n");
        let _ = writeln!(out, "    cout << {} << endl;", string_literal(RESULTS_END, LANG));
        out.push_str("    return 0;\n}\n");
        out
    }

    fn judge_harness(&self, plan: &HarnessPlan) -> String {
        let mut out = self.prelude(plan);
        out.push_str("int main() {\n");
        out.push_str("    string line;\n");
        out.push_str("    getline(cin, line);\n");
        out.push_str("    JsonValue input = harnessParseJson(line.empty() ? string(\"[]\") : line);\n");
        let _ = writeln!(
            out,
            "    while (input.items.size() < {}) input.items.push_back(JsonValue());",
            plan.params.len()
        );
        // User output goes to stderr so stdout carries only the result
        out.push_str("    streambuf* harnessSaved = cout.rdbuf(cerr.rdbuf());\n");
        for i in 0..plan.params.len() {
            let declared = plan.native_type(i).render(LANG, false);
            let _ = writeln!(out, "    {0} arg{1} = JsonConvert<{0}>::from(input.items[{1}]);", declared, i);
        }
        out.push_str(&self.call_statements(plan, "    ", false));
        out.push_str("    cout << harnessStringify(actual) << endl;\n");
        out.push_str("    return 0;\n}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::super::{synthesize_judge_harness, synthesize_test_harness};
    use super::*;
    use serde_json::json;
    use testsmith_common::types::{ExecutionOptions, InputSchemaEntry, TestCase};

    const SORT: &str = "class Solution {\npublic:\n    vector<int> sortArray(vector<int>& nums) {\n        sort(nums.begin(), nums.end());\n        return nums;\n    }\n};";

    #[test]
    fn test_harness_layout() {
        let cases = vec![TestCase { input: vec![json!([5, 1, 4, 2, 8])], expected_output: json!([1, 2, 4, 5, 8]) }];
        let schema = vec![InputSchemaEntry::new("nums", "number[]")];
        let program = synthesize_test_harness(SORT, Language::Cpp, &cases, &schema, None, None);

        assert!(program.starts_with("#include <algorithm>"));
        assert!(program.contains("using namespace std;"));
        assert!(program.contains("        vector<int> arg0 = {5, 1, 4, 2, 8};"));
        assert!(program.contains("        Solution harnessInstance;\n        started = chrono::steady_clock::now();\n        auto result = harnessInstance.sortArray(arg0);"));
        assert!(program.contains(r#"    const vector<string> accepted = {"[1,2,4,5,8]"};"#));
        assert!(program.contains("    verdicts.push_back(runCase0());"));
        let user_at = program.find("class Solution").unwrap();
        assert!(user_at < program.find("struct JsonValue").unwrap());
        assert!(program.find("struct JsonValue").unwrap() < program.find("struct HarnessCapture").unwrap());
    }

    #[test]
    fn test_composite_overloads_precede_templates() {
        let cases = vec![TestCase { input: vec![json!([1, 2])], expected_output: json!([2, 1]) }];
        let schema = vec![InputSchemaEntry::new("head", "ListNode")];
        let src = "ListNode* reverseList(ListNode* head) {\n    return head;\n}";
        let program = synthesize_test_harness(src, Language::Cpp, &cases, &schema, None, None);

        let definition = program.find("struct ListNode {").unwrap();
        let user = program.find("ListNode* reverseList").unwrap();
        let overload = program.find("JsonValue toJsonValue(ListNode* value) { return serializeListNode(value); }").unwrap();
        let templates = program.find("template <typename T> JsonValue toJsonValue(const vector<T>& items);").unwrap();
        let convert = program.find("template <> struct JsonConvert<ListNode*>").unwrap();
        assert!(definition < user && user < overload && overload < templates && templates < convert);
        assert!(program.contains("ListNode* arg0 = parseListNode(harnessParseJson(\"[1,2]\"));"));
        assert!(program.contains("        auto result = reverseList(arg0);"));
    }

    #[test]
    fn test_void_in_place() {
        let cases = vec![TestCase { input: vec![json!([3, 1, 2])], expected_output: json!([1, 2, 3]) }];
        let schema = vec![InputSchemaEntry::new("nums", "number[]")];
        let options = ExecutionOptions { return_modified_input: true, ..Default::default() };
        let src = "void sortColors(vector<int>& nums) {\n    sort(nums.begin(), nums.end());\n}";
        let program = synthesize_test_harness(src, Language::Cpp, &cases, &schema, None, Some(&options));
        assert!(program.contains("        sortColors(arg0);\n"));
        assert!(program.contains("        JsonValue actual = toJsonValue(arg0);"));
        assert!(!program.contains("auto result"));
    }

    #[test]
    fn test_interval_overload_by_reference() {
        let schema = vec![InputSchemaEntry::new("a", "Interval")];
        let src = "int length(Interval a) {\n    return a.end - a.start;\n}";
        let program = synthesize_judge_harness(src, Language::Cpp, &schema, None, None);
        assert!(program.contains("JsonValue toJsonValue(const Interval& value)"));
        assert!(program.contains("    Interval arg0 = JsonConvert<Interval>::from(input.items[0]);"));
    }

    #[test]
    fn test_judge_harness() {
        let schema = vec![
            InputSchemaEntry::new("grid", "string[][]"),
            InputSchemaEntry::new("k", "number"),
        ];
        let options = ExecutionOptions { unordered: true, ..Default::default() };
        let src = "class Solution {\npublic:\n    vector<int> pick(vector<vector<char>>& grid, int k) { return {}; }\n};";
        let program = synthesize_judge_harness(src, Language::Cpp, &schema, None, Some(&options));
        assert!(program.contains("    vector<vector<char>> arg0 = JsonConvert<vector<vector<char>>>::from(input.items[0]);"));
        assert!(program.contains("    int arg1 = JsonConvert<int>::from(input.items[1]);"));
        assert!(program.contains("    while (input.items.size() < 2) input.items.push_back(JsonValue());"));
        assert!(program.contains("    cout.rdbuf(harnessSaved);\n    JsonValue actual = toJsonValue(result);\n    actual = harnessNormalize(actual);"));
        assert!(!program.contains("___TEST_RESULTS_START___"));
    }
}
