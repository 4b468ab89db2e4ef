/// End-to-end tests that compile and run generated harnesses
///
/// These need local toolchains (python3, node + tsc, javac/java, g++)
/// and are ignored by default. Run with `--ignored`.
mod harness_execution_tests {
    use crate::recovery::extract_verdicts;
    use crate::synth::{synthesize_judge_harness, synthesize_test_harness};
    use serde_json::{json, Value};
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use std::process::{Command, Stdio};
    use testsmith_common::types::{ExecutionOptions, InputSchemaEntry, Language, TestCase, Verdict, VerdictStatus};

    fn sort_cases() -> Vec<TestCase> {
        vec![
            TestCase { input: vec![json!([5, 1, 4, 2, 8])], expected_output: json!([1, 2, 4, 5, 8]) },
            TestCase { input: vec![json!([3, -1, 0])], expected_output: json!([-1, 0, 3]) },
        ]
    }

    fn sort_schema() -> Vec<InputSchemaEntry> {
        vec![InputSchemaEntry::new("nums", "number[]")]
    }

    fn run(command: &mut Command, stdin: Option<&str>) -> String {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn toolchain");
        if let Some(input) = stdin {
            child
                .stdin
                .take()
                .expect("stdin piped")
                .write_all(input.as_bytes())
                .expect("Failed to write stdin");
        }
        let output = child.wait_with_output().expect("Failed to wait for process");
        assert!(
            output.status.success(),
            "process failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Build (if needed) and run `program`, returning stdout.
    fn execute(language: Language, program: &str, stdin: Option<&str>) -> String {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path();
        match language {
            Language::Python => {
                let file = path.join("main.py");
                fs::write(&file, program).expect("write source");
                run(Command::new("python3").arg(&file), stdin)
            }
            Language::TypeScript => {
                let file = path.join("main.ts");
                fs::write(&file, program).expect("write source");
                run(
                    Command::new("tsc")
                        .args(["--target", "es2020", "--module", "commonjs", "--outDir"])
                        .arg(path)
                        .arg(&file),
                    None,
                );
                run(Command::new("node").arg(path.join("main.js")), stdin)
            }
            Language::Java => {
                let file = path.join("Main.java");
                fs::write(&file, program).expect("write source");
                run(Command::new("javac").arg(&file), None);
                run(Command::new("java").arg("-cp").arg(path).arg("Main"), stdin)
            }
            Language::Cpp => {
                let file = path.join("main.cpp");
                let binary = path.join("main");
                fs::write(&file, program).expect("write source");
                run(Command::new("g++").args(["-std=c++17", "-O2", "-o"]).arg(&binary).arg(&file), None);
                run(&mut Command::new(Path::new(&binary)), stdin)
            }
        }
    }

    fn verdicts(language: Language, source: &str, cases: &[TestCase], schema: &[InputSchemaEntry], options: Option<&ExecutionOptions>) -> Vec<Verdict> {
        let program = synthesize_test_harness(source, language, cases, schema, None, options);
        let output = execute(language, &program, None);
        extract_verdicts(&output).expect("Harness output should contain verdicts")
    }

    const PY_SORT: &str = "class Solution:\n    def sortArray(self, nums: List[int]) -> List[int]:\n        print('sorting', len(nums))\n        return sorted(nums)\n";
    const TS_SORT: &str = "function sortArray(nums: number[]): number[] {\n    return nums.slice().sort((a, b) => a - b);\n}\n";
    const JAVA_SORT: &str = "class Solution {\n    public int[] sortArray(int[] nums) {\n        int[] copy = nums.clone();\n        Arrays.sort(copy);\n        return copy;\n    }\n}\n";
    const CPP_SORT: &str = "class Solution {\npublic:\n    vector<int> sortArray(vector<int>& nums) {\n        vector<int> copy = nums;\n        sort(copy.begin(), copy.end());\n        return copy;\n    }\n};\n";

    #[test]
    #[ignore] // Requires python3
    fn test_python_sort_passes_and_captures_logs() {
        let results = verdicts(Language::Python, PY_SORT, &sort_cases(), &sort_schema(), None);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|v| v.status == VerdictStatus::Pass));
        assert_eq!(results[0].logs.as_deref(), Some("sorting 5\n"));
    }

    #[test]
    #[ignore] // Requires python3
    fn test_python_wrong_answer_and_exception_are_isolated() {
        let source = "def sortArray(nums):\n    if not nums[0]:\n        raise ValueError('boom')\n    return nums\n";
        let cases = vec![
            TestCase { input: vec![json!([2, 1])], expected_output: json!([1, 2]) },
            TestCase { input: vec![json!([0, 1])], expected_output: json!([0, 1]) },
            TestCase { input: vec![json!([1, 2])], expected_output: json!([1, 2]) },
        ];
        let results = verdicts(Language::Python, source, &cases, &sort_schema(), None);
        let statuses: Vec<VerdictStatus> = results.iter().map(|v| v.status).collect();
        assert_eq!(statuses, vec![VerdictStatus::Fail, VerdictStatus::Error, VerdictStatus::Pass]);
        assert_eq!(results[0].actual, json!([2, 1]));
        assert!(results[1].error.as_deref().unwrap_or("").contains("boom"));
    }

    #[test]
    #[ignore] // Requires node and tsc
    fn test_typescript_sort() {
        let results = verdicts(Language::TypeScript, TS_SORT, &sort_cases(), &sort_schema(), None);
        assert!(results.iter().all(|v| v.status == VerdictStatus::Pass));
    }

    #[test]
    #[ignore] // Requires a JDK
    fn test_java_sort() {
        let results = verdicts(Language::Java, JAVA_SORT, &sort_cases(), &sort_schema(), None);
        assert!(results.iter().all(|v| v.status == VerdictStatus::Pass));
    }

    #[test]
    #[ignore] // Requires g++
    fn test_cpp_sort() {
        let results = verdicts(Language::Cpp, CPP_SORT, &sort_cases(), &sort_schema(), None);
        assert!(results.iter().all(|v| v.status == VerdictStatus::Pass));
    }

    #[test]
    #[ignore] // Requires python3
    fn test_python_linked_list_round_trip() {
        let source = "def reverseList(head: Optional[ListNode]) -> Optional[ListNode]:\n    prev = None\n    while head:\n        head.next, prev, head = prev, head, head.next\n    return prev\n";
        let cases = vec![TestCase { input: vec![json!([1, 2, 3])], expected_output: json!([3, 2, 1]) }];
        let schema = vec![InputSchemaEntry::new("head", "ListNode")];
        let results = verdicts(Language::Python, source, &cases, &schema, None);
        assert_eq!(results[0].status, VerdictStatus::Pass);
    }

    /// Identity over a composite: every input must come back unchanged
    fn assert_round_trips(language: Language, source: &str, type_name: &str, inputs: &[Value]) {
        let cases: Vec<TestCase> = inputs
            .iter()
            .map(|v| TestCase { input: vec![v.clone()], expected_output: v.clone() })
            .collect();
        let schema = vec![InputSchemaEntry::new("value", type_name)];
        let results = verdicts(language, source, &cases, &schema, None);
        assert_eq!(results.len(), inputs.len());
        for (result, input) in results.iter().zip(inputs) {
            assert_eq!(result.status, VerdictStatus::Pass, "{} {} {}: {:?}", language, type_name, input, result);
        }
    }

    fn tree_inputs() -> Vec<Value> {
        vec![json!([1, null, 2, 3]), json!([])]
    }

    fn graph_inputs() -> Vec<Value> {
        vec![json!([[2, 4], [1, 3], [2, 4], [1, 3]]), json!([])]
    }

    #[test]
    #[ignore] // Requires python3
    fn test_python_composites_round_trip() {
        let tree = "def identity(root: Optional[TreeNode]) -> Optional[TreeNode]:\n    return root\n";
        assert_round_trips(Language::Python, tree, "TreeNode", &tree_inputs());
        let untyped = "def identity(root):\n    return root\n";
        assert_round_trips(Language::Python, untyped, "TreeNode", &tree_inputs());
        let list = "def identity(head: Optional[ListNode]) -> Optional[ListNode]:\n    return head\n";
        assert_round_trips(Language::Python, list, "ListNode", &[json!([1, 2]), json!([])]);
        let graph = "def identity(node: Optional['GraphNode']) -> Optional['GraphNode']:\n    return node\n";
        assert_round_trips(Language::Python, graph, "GraphNode", &graph_inputs());
    }

    #[test]
    #[ignore] // Requires node and tsc
    fn test_typescript_composites_round_trip() {
        let tree = "function identity(root: TreeNode | null): TreeNode | null {\n    return root;\n}\n";
        assert_round_trips(Language::TypeScript, tree, "TreeNode", &tree_inputs());
        let list = "function identity(head: ListNode | null): ListNode | null {\n    return head;\n}\n";
        assert_round_trips(Language::TypeScript, list, "ListNode", &[json!([1, 2]), json!([])]);
        let graph = "function identity(node: GraphNode | null): GraphNode | null {\n    return node;\n}\n";
        assert_round_trips(Language::TypeScript, graph, "GraphNode", &graph_inputs());
    }

    #[test]
    #[ignore] // Requires a JDK
    fn test_java_composites_round_trip() {
        let tree = "class Solution {\n    public TreeNode identity(TreeNode root) {\n        return root;\n    }\n}\n";
        assert_round_trips(Language::Java, tree, "TreeNode", &tree_inputs());
        let list = "class Solution {\n    public ListNode identity(ListNode head) {\n        return head;\n    }\n}\n";
        assert_round_trips(Language::Java, list, "ListNode", &[json!([1, 2]), json!([])]);
        let graph = "class Solution {\n    public GraphNode identity(GraphNode node) {\n        return node;\n    }\n}\n";
        assert_round_trips(Language::Java, graph, "GraphNode", &graph_inputs());
    }

    #[test]
    #[ignore] // Requires g++
    fn test_cpp_composites_round_trip() {
        let tree = "class Solution {\npublic:\n    TreeNode* identity(TreeNode* root) {\n        return root;\n    }\n};\n";
        assert_round_trips(Language::Cpp, tree, "TreeNode", &tree_inputs());
        let list = "class Solution {\npublic:\n    ListNode* identity(ListNode* head) {\n        return head;\n    }\n};\n";
        assert_round_trips(Language::Cpp, list, "ListNode", &[json!([1, 2]), json!([])]);
        let graph = "class Solution {\npublic:\n    GraphNode* identity(GraphNode* node) {\n        return node;\n    }\n};\n";
        assert_round_trips(Language::Cpp, graph, "GraphNode", &graph_inputs());
    }

    #[test]
    #[ignore] // Requires a JDK
    fn test_java_error_reports_message_only() {
        let source = "class Solution {\n    public int first(int[] nums) {\n        return nums[5];\n    }\n}\n";
        let cases = vec![TestCase { input: vec![json!([1])], expected_output: json!(1) }];
        let results = verdicts(Language::Java, source, &cases, &sort_schema(), None);
        assert_eq!(results[0].status, VerdictStatus::Error);
        let error = results[0].error.as_deref().unwrap_or("");
        assert!(!error.starts_with("java.lang."), "{}", error);
        assert!(error.contains('5'));
    }

    #[test]
    #[ignore] // Requires node and tsc
    fn test_typescript_logs_keep_trailing_newline() {
        let source = "function sortArray(nums: number[]): number[] {\n    console.log(\"sorting\", nums.length);\n    return nums.slice().sort((a, b) => a - b);\n}\n";
        let results = verdicts(Language::TypeScript, source, &sort_cases(), &sort_schema(), None);
        assert_eq!(results[0].logs.as_deref(), Some("sorting 5\n"));
    }

    #[test]
    #[ignore] // Requires g++
    fn test_cpp_unordered_in_place() {
        let source = "void shuffle(vector<int>& nums) {\n    reverse(nums.begin(), nums.end());\n}\n";
        let cases = vec![TestCase { input: vec![json!([1, 2, 3])], expected_output: json!([2, 3, 1]) }];
        let options = ExecutionOptions { unordered: true, return_modified_input: true, ..Default::default() };
        let results = verdicts(Language::Cpp, source, &cases, &sort_schema(), Some(&options));
        assert_eq!(results[0].status, VerdictStatus::Pass);
    }

    #[test]
    #[ignore] // Requires a JDK
    fn test_java_judge_harness_reads_stdin() {
        let program = synthesize_judge_harness(JAVA_SORT, Language::Java, &sort_schema(), None, None);
        let output = execute(Language::Java, &program, Some("[[3,1,2]]\n"));
        let value: Value = serde_json::from_str(output.trim()).expect("judge output is JSON");
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    #[ignore] // Requires g++
    fn test_cpp_judge_harness_reads_stdin() {
        let program = synthesize_judge_harness(CPP_SORT, Language::Cpp, &sort_schema(), None, None);
        let output = execute(Language::Cpp, &program, Some("[[3,1,2]]\n"));
        assert_eq!(output.trim(), "[1,2,3]");
    }
}
