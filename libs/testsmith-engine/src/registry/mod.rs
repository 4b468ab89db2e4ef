//! Composite-type registry
//!
//! **Core Responsibility:**
//! Per-language source fragments (definition, parser, serializer) for the
//! five catalogued composite structures, plus the small JSON runtime each
//! generated program carries.
//!
//! **Wire encodings:**
//! - `ListNode`: array of values
//! - `TreeNode`: level-order array with `null` markers, trailing nulls trimmed
//! - `Interval`: `[start, end]`
//! - `GraphNode`: adjacency list of 1-based node values, rows sorted by value
//! - `TrieNode`: nested object keyed by character, `"isEnd": true` on terminals
//!
//! The table is built once and never mutated, so concurrent synthesis
//! calls share it freely.

mod cpp;
mod java;
mod python;
mod typescript;

use crate::logical::CompositeKind;
use crate::source::strip_comments;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use testsmith_common::types::Language;

pub use cpp::{RUNTIME_CORE as CPP_RUNTIME_CORE, RUNTIME_TEMPLATES as CPP_RUNTIME_TEMPLATES};

/// Source fragments for one composite type in one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeDescriptor {
    pub definition: &'static str,
    pub parser: &'static str,
    pub serializer: &'static str,
}

lazy_static! {
    static ref CATALOG: HashMap<(CompositeKind, Language), CompositeDescriptor> = {
        let mut m = HashMap::new();
        m.insert((CompositeKind::ListNode, Language::TypeScript), typescript::LIST_NODE);
        m.insert((CompositeKind::TreeNode, Language::TypeScript), typescript::TREE_NODE);
        m.insert((CompositeKind::Interval, Language::TypeScript), typescript::INTERVAL);
        m.insert((CompositeKind::GraphNode, Language::TypeScript), typescript::GRAPH_NODE);
        m.insert((CompositeKind::TrieNode, Language::TypeScript), typescript::TRIE_NODE);

        m.insert((CompositeKind::ListNode, Language::Python), python::LIST_NODE);
        m.insert((CompositeKind::TreeNode, Language::Python), python::TREE_NODE);
        m.insert((CompositeKind::Interval, Language::Python), python::INTERVAL);
        m.insert((CompositeKind::GraphNode, Language::Python), python::GRAPH_NODE);
        m.insert((CompositeKind::TrieNode, Language::Python), python::TRIE_NODE);

        m.insert((CompositeKind::ListNode, Language::Java), java::LIST_NODE);
        m.insert((CompositeKind::TreeNode, Language::Java), java::TREE_NODE);
        m.insert((CompositeKind::Interval, Language::Java), java::INTERVAL);
        m.insert((CompositeKind::GraphNode, Language::Java), java::GRAPH_NODE);
        m.insert((CompositeKind::TrieNode, Language::Java), java::TRIE_NODE);

        m.insert((CompositeKind::ListNode, Language::Cpp), cpp::LIST_NODE);
        m.insert((CompositeKind::TreeNode, Language::Cpp), cpp::TREE_NODE);
        m.insert((CompositeKind::Interval, Language::Cpp), cpp::INTERVAL);
        m.insert((CompositeKind::GraphNode, Language::Cpp), cpp::GRAPH_NODE);
        m.insert((CompositeKind::TrieNode, Language::Cpp), cpp::TRIE_NODE);
        m
    };
}

/// Fetch the fragments for `kind` in `language`.
pub fn lookup(kind: CompositeKind, language: Language) -> Option<&'static CompositeDescriptor> {
    CATALOG.get(&(kind, language))
}

/// Lookup by type name as written in a schema or user source.
pub fn lookup_name(type_name: &str, language: Language) -> Option<&'static CompositeDescriptor> {
    CompositeKind::from_name(type_name).and_then(|kind| lookup(kind, language))
}

/// JSON runtime shared by every generated program in `language`.
/// For C++ this is only the core half; the templates follow the
/// generated composite overloads.
pub fn runtime(language: Language) -> &'static str {
    match language {
        Language::TypeScript => typescript::RUNTIME,
        Language::Python => python::RUNTIME,
        Language::Java => java::RUNTIME,
        Language::Cpp => cpp::RUNTIME_CORE,
    }
}

/// Whether the user's own source declares a type named `type_name`.
/// Mentions inside comments (and Python docstrings) do not count.
pub fn is_user_defined(type_name: &str, source: &str, language: Language) -> bool {
    let stripped = strip_comments(source, language);
    let name = regex::escape(type_name.trim());
    let pattern = match language {
        Language::Python => format!(r"(?m)^\s*class\s+{}\b", name),
        Language::TypeScript => format!(r"\b(class|interface|type)\s+{}\b", name),
        Language::Java => format!(r"\b(class|interface|record|enum)\s+{}\b", name),
        Language::Cpp => format!(r"\b(class|struct)\s+{}\b", name),
    };
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(&stripped),
        Err(_) => false,
    }
}

/// Catalogued composite names that appear anywhere in `source` as a word.
pub fn mentioned_composites(source: &str, language: Language) -> Vec<CompositeKind> {
    lazy_static! {
        static ref WORD: Regex = Regex::new(r"\b(ListNode|TreeNode|Interval|GraphNode|TrieNode)\b").unwrap();
    }
    let stripped = strip_comments(source, language);
    let mut found: Vec<CompositeKind> = WORD
        .find_iter(&stripped)
        .filter_map(|m| CompositeKind::from_name(m.as_str()))
        .collect();
    found.sort();
    found.dedup();
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_complete() {
        for kind in CompositeKind::ALL {
            for language in Language::ALL {
                let descriptor = lookup(kind, language)
                    .unwrap_or_else(|| panic!("missing {} for {}", kind, language));
                assert!(descriptor.definition.contains(kind.type_name()));
                assert!(descriptor.parser.contains(&kind.parser_name(language)));
                assert!(descriptor.serializer.contains(&kind.serializer_name(language)));
            }
        }
    }

    #[test]
    fn test_lookup_by_name() {
        assert!(lookup_name("TreeNode", Language::Cpp).is_some());
        assert!(lookup_name("Matrix", Language::Cpp).is_none());
    }

    #[test]
    fn test_user_defined_ignores_comments() {
        let src = "// class ListNode is provided for you\nclass Solution {}";
        assert!(!is_user_defined("ListNode", src, Language::Java));

        let src = "/* struct TreeNode { int val; }; */\nint f() { return 0; }";
        assert!(!is_user_defined("TreeNode", src, Language::Cpp));

        let src = "struct TreeNode {\n    int val;\n};";
        assert!(is_user_defined("TreeNode", src, Language::Cpp));
    }

    #[test]
    fn test_user_defined_python_docstring() {
        let src = "\"\"\"\nclass ListNode:\n\"\"\"\ndef f(head):\n    return head\n";
        assert!(!is_user_defined("ListNode", src, Language::Python));

        let src = "class ListNode:\n    pass\n";
        assert!(is_user_defined("ListNode", src, Language::Python));
    }

    #[test]
    fn test_user_defined_typescript_interface() {
        let src = "interface Interval { start: number; end: number }";
        assert!(is_user_defined("Interval", src, Language::TypeScript));
        assert!(!is_user_defined("IntervalTree", "class IntervalTreeX {}", Language::TypeScript));
    }

    #[test]
    fn test_mentioned_composites() {
        let src = "def f(root: TreeNode) -> ListNode:\n    # GraphNode only in a comment\n    pass";
        assert_eq!(
            mentioned_composites(src, Language::Python),
            vec![CompositeKind::ListNode, CompositeKind::TreeNode]
        );
    }

    #[test]
    fn test_tree_serializers_trim_trailing_nulls() {
        for language in Language::ALL {
            let tree = lookup(CompositeKind::TreeNode, language).unwrap();
            let text = tree.serializer;
            assert!(
                text.contains("pop") || text.contains("remove"),
                "{} tree serializer keeps trailing nulls",
                language
            );
        }
    }

    #[test]
    fn test_graph_serializers_sort_by_value() {
        assert!(lookup(CompositeKind::GraphNode, Language::Python).unwrap().serializer.contains("sorted(seen)"));
        assert!(lookup(CompositeKind::GraphNode, Language::TypeScript).unwrap().serializer.contains("sort"));
        assert!(lookup(CompositeKind::GraphNode, Language::Java).unwrap().serializer.contains("TreeMap"));
        assert!(lookup(CompositeKind::GraphNode, Language::Cpp).unwrap().serializer.contains("map<int, GraphNode*>"));
    }
}
