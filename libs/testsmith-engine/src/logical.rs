use std::fmt;
use testsmith_common::types::Language;

/// Registered composite domain structures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompositeKind {
    ListNode,
    TreeNode,
    Interval,
    GraphNode,
    TrieNode,
}

impl CompositeKind {
    pub const ALL: [CompositeKind; 5] = [
        CompositeKind::ListNode,
        CompositeKind::TreeNode,
        CompositeKind::Interval,
        CompositeKind::GraphNode,
        CompositeKind::TrieNode,
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            CompositeKind::ListNode => "ListNode",
            CompositeKind::TreeNode => "TreeNode",
            CompositeKind::Interval => "Interval",
            CompositeKind::GraphNode => "GraphNode",
            CompositeKind::TrieNode => "TrieNode",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name.trim())
    }

    /// Name of the generated parser function in the target language
    pub fn parser_name(&self, language: Language) -> String {
        match language {
            Language::Python => format!("parse_{}", self.snake_name()),
            _ => format!("parse{}", self.type_name()),
        }
    }

    pub fn serializer_name(&self, language: Language) -> String {
        match language {
            Language::Python => format!("serialize_{}", self.snake_name()),
            _ => format!("serialize{}", self.type_name()),
        }
    }

    fn snake_name(&self) -> &'static str {
        match self {
            CompositeKind::ListNode => "list_node",
            CompositeKind::TreeNode => "tree_node",
            CompositeKind::Interval => "interval",
            CompositeKind::GraphNode => "graph_node",
            CompositeKind::TrieNode => "trie_node",
        }
    }

    /// How the type is spelled as a C++ value (pointers for linked structures)
    pub fn cpp_type(&self) -> String {
        match self {
            CompositeKind::Interval => "Interval".to_string(),
            other => format!("{}*", other.type_name()),
        }
    }
}

impl fmt::Display for CompositeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Logical parameter type as written in an input schema (`number[][]`, `TreeNode`, ...)
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalType {
    Number,
    String,
    Boolean,
    Char,
    Composite(CompositeKind),
    Array(Box<LogicalType>),
    /// Anything outside the catalog; rendered as plain JSON-shaped data
    Opaque(String),
}

impl LogicalType {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        if let Some(inner) = text.strip_suffix("[]") {
            return LogicalType::Array(Box::new(LogicalType::parse(inner)));
        }
        for prefix in ["Array<", "List<", "list["] {
            if let Some(rest) = text.strip_prefix(prefix) {
                let inner = rest.trim_end_matches(['>', ']']);
                return LogicalType::Array(Box::new(LogicalType::parse(inner)));
            }
        }
        match text.to_lowercase().as_str() {
            "number" | "int" | "integer" | "long" | "float" | "double" => LogicalType::Number,
            "string" | "str" => LogicalType::String,
            "boolean" | "bool" => LogicalType::Boolean,
            "char" | "character" => LogicalType::Char,
            _ => match CompositeKind::from_name(text) {
                Some(kind) => LogicalType::Composite(kind),
                None => LogicalType::Opaque(text.to_string()),
            },
        }
    }

    /// Number of array dimensions wrapped around the base type
    pub fn depth(&self) -> usize {
        match self {
            LogicalType::Array(inner) => 1 + inner.depth(),
            _ => 0,
        }
    }

    /// Innermost non-array type
    pub fn base(&self) -> &LogicalType {
        match self {
            LogicalType::Array(inner) => inner.base(),
            other => other,
        }
    }

    pub fn composite(&self) -> Option<CompositeKind> {
        match self.base() {
            LogicalType::Composite(kind) => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_arrays() {
        let ty = LogicalType::parse("string[][]");
        assert_eq!(ty.depth(), 2);
        assert_eq!(ty.base(), &LogicalType::String);
    }

    #[test]
    fn test_parse_composites_and_opaque() {
        assert_eq!(
            LogicalType::parse("ListNode[]").composite(),
            Some(CompositeKind::ListNode)
        );
        assert_eq!(LogicalType::parse("TreeNode"), LogicalType::Composite(CompositeKind::TreeNode));
        assert_eq!(LogicalType::parse("Map"), LogicalType::Opaque("Map".to_string()));
        assert_eq!(LogicalType::parse("List<number>").depth(), 1);
    }

    #[test]
    fn test_function_names() {
        assert_eq!(CompositeKind::TreeNode.parser_name(Language::Python), "parse_tree_node");
        assert_eq!(CompositeKind::TreeNode.serializer_name(Language::Java), "serializeTreeNode");
        assert_eq!(CompositeKind::Interval.cpp_type(), "Interval");
        assert_eq!(CompositeKind::GraphNode.cpp_type(), "GraphNode*");
    }
}
