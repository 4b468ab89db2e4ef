//! Raw-text scanning helpers shared by the resolver, the registry and the
//! backends.
//!
//! Comment stripping blanks comment bytes to spaces instead of removing
//! them, so every byte offset found in the stripped text is also a valid
//! offset into the original source.

use testsmith_common::types::Language;

#[derive(Clone, Copy, PartialEq)]
enum Scan {
    Code,
    LineComment,
    BlockComment,
    Quoted(u8),
    Triple(u8),
}

/// Blank out comments (and Python triple-quoted strings), keeping newlines
/// and byte length intact. String literals are skipped so `"http://x"` is
/// left alone.
pub fn strip_comments(source: &str, language: Language) -> String {
    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let python = language == Language::Python;
    let mut state = Scan::Code;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            Scan::Code => {
                if python {
                    if b == b'#' {
                        state = Scan::LineComment;
                        out[i] = b' ';
                    } else if (b == b'"' || b == b'\'') && starts_triple(bytes, i) {
                        blank(&mut out, i, i + 3);
                        state = Scan::Triple(b);
                        i += 3;
                        continue;
                    } else if b == b'"' || b == b'\'' {
                        state = Scan::Quoted(b);
                    }
                } else if b == b'/' && next == Some(b'/') {
                    state = Scan::LineComment;
                    blank(&mut out, i, i + 2);
                    i += 2;
                    continue;
                } else if b == b'/' && next == Some(b'*') {
                    state = Scan::BlockComment;
                    blank(&mut out, i, i + 2);
                    i += 2;
                    continue;
                } else if b == b'"' || b == b'\'' || (b == b'`' && language == Language::TypeScript) {
                    state = Scan::Quoted(b);
                }
            }
            Scan::LineComment => {
                if b == b'\n' {
                    state = Scan::Code;
                } else {
                    out[i] = b' ';
                }
            }
            Scan::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    blank(&mut out, i, i + 2);
                    state = Scan::Code;
                    i += 2;
                    continue;
                }
                if b != b'\n' {
                    out[i] = b' ';
                }
            }
            Scan::Quoted(delim) => {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                // Unterminated single-line strings must not swallow the rest of the file
                if b == delim || (b == b'\n' && delim != b'`') {
                    state = Scan::Code;
                }
            }
            Scan::Triple(delim) => {
                if b == b'\\' {
                    blank(&mut out, i, (i + 2).min(bytes.len()));
                    i += 2;
                    continue;
                }
                if b == delim && starts_triple(bytes, i) {
                    blank(&mut out, i, i + 3);
                    state = Scan::Code;
                    i += 3;
                    continue;
                }
                if b != b'\n' {
                    out[i] = b' ';
                }
            }
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn starts_triple(bytes: &[u8], i: usize) -> bool {
    i + 2 < bytes.len() && bytes[i] == bytes[i + 1] && bytes[i] == bytes[i + 2]
}

fn blank(out: &mut [u8], from: usize, to: usize) {
    let end = to.min(out.len());
    for byte in out.iter_mut().take(end).skip(from) {
        if *byte != b'\n' {
            *byte = b' ';
        }
    }
}

/// Find the byte index of the `)` matching the `(` at `open`.
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    for (offset, &b) in bytes[open..].iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits a raw parameter list into top-level parameters.
///
/// Kept behind a trait so a real per-language tokenizer can replace the
/// depth counter without touching callers.
pub trait ParamSplitter {
    fn split<'a>(&self, params: &'a str) -> Vec<&'a str>;

    fn count(&self, params: &str) -> usize {
        self.split(params).len()
    }
}

/// Top-level comma splitter with bracket depth tracking
#[derive(Debug, Default, Clone, Copy)]
pub struct DepthSplitter;

impl ParamSplitter for DepthSplitter {
    fn split<'a>(&self, params: &'a str) -> Vec<&'a str> {
        let bytes = params.as_bytes();
        let mut pieces = Vec::new();
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;
        let mut start = 0;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            if let Some(q) = quote {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == q {
                    quote = None;
                }
                i += 1;
                continue;
            }
            match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'<' | b'(' | b'[' | b'{' => depth += 1,
                // `=>` and `->` are arrows, not closers
                b'>' if i > 0 && (bytes[i - 1] == b'=' || bytes[i - 1] == b'-') => {}
                b'>' | b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => {
                    pieces.push(&params[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }
        pieces.push(&params[start..]);

        pieces
            .into_iter()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// A parameter split into its name and its declared type text (if any)
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub declared_type: Option<String>,
}

/// Parse one parameter declaration for the given language.
pub fn parse_param(raw: &str, language: Language) -> ParamDecl {
    // Default values never contribute to the type
    let without_default = split_default(raw).trim();

    match language {
        Language::TypeScript | Language::Python => {
            let (name_part, type_part) = match find_top_level(without_default, b':') {
                Some(idx) => (&without_default[..idx], Some(without_default[idx + 1..].trim())),
                None => (without_default, None),
            };
            let name = name_part
                .trim()
                .trim_start_matches("...")
                .trim_start_matches('*')
                .trim_end_matches('?')
                .split_whitespace()
                .last()
                .unwrap_or("")
                .to_string();
            ParamDecl {
                name,
                declared_type: type_part.filter(|t| !t.is_empty()).map(str::to_string),
            }
        }
        Language::Java | Language::Cpp => {
            let mut text = without_default.trim_end_matches("...").trim_end();
            // Java allows `int nums[]`; move the brackets onto the type
            let mut suffix = String::new();
            while let Some(rest) = text.strip_suffix("[]") {
                suffix.push_str("[]");
                text = rest.trim_end();
            }
            let name_start = trailing_ident_start(text);
            let name = text[name_start..].to_string();
            let ty = clean_c_type(&format!("{}{}", text[..name_start].trim(), suffix), language);
            ParamDecl {
                name,
                declared_type: if ty.is_empty() { None } else { Some(ty) },
            }
        }
    }
}

/// Byte offset where the trailing identifier of `text` begins. Always a
/// char boundary, whatever separator precedes the identifier.
pub fn trailing_ident_start(text: &str) -> usize {
    text.char_indices()
        .rev()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0)
}

fn split_default(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' | b'(' | b'[' | b'{' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'=' => {}
            b'>' | b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'=' if depth == 0 && bytes.get(i + 1) != Some(&b'>') && bytes.get(i + 1) != Some(&b'=') => {
                return &raw[..i];
            }
            _ => {}
        }
    }
    raw
}

fn find_top_level(text: &str, needle: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'<' | b'(' | b'[' | b'{' => depth += 1,
            b'>' | b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ if b == needle && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Normalize a C-family declared type: drop qualifiers, references and
/// annotations, collapse whitespace.
pub fn clean_c_type(raw: &str, language: Language) -> String {
    let words: Vec<&str> = raw
        .split_whitespace()
        .filter(|w| !w.starts_with('@'))
        .filter(|w| !matches!(*w, "final" | "const" | "volatile" | "struct"))
        .collect();
    let joined = words.join(" ");
    let mut cleaned = joined.replace('&', "");
    if language == Language::Cpp {
        cleaned = cleaned.replace("std::", "");
    }
    cleaned
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" *", "*")
        .replace(" [", "[")
        .replace(", ", ",")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_and_block_comments() {
        let src = "int a; // int f(int x) {\n/* int g() {} */ int b;";
        let stripped = strip_comments(src, Language::Java);
        assert_eq!(stripped.len(), src.len());
        assert!(!stripped.contains("f(int"));
        assert!(!stripped.contains("g()"));
        assert!(stripped.contains("int b;"));
        assert_eq!(stripped.matches('\n').count(), 1);
    }

    #[test]
    fn test_strip_keeps_strings() {
        let src = "const url = \"http://x\"; // gone";
        let stripped = strip_comments(src, Language::TypeScript);
        assert!(stripped.contains("\"http://x\""));
        assert!(!stripped.contains("gone"));
    }

    #[test]
    fn test_strip_python_docstrings_and_hashes() {
        let src = "def a(x):\n    \"\"\"def fake(y, z):\"\"\"\n    return x  # def other(q)\n";
        let stripped = strip_comments(src, Language::Python);
        assert_eq!(stripped.len(), src.len());
        assert!(stripped.contains("def a(x):"));
        assert!(!stripped.contains("fake"));
        assert!(!stripped.contains("other"));
    }

    #[test]
    fn test_strip_preserves_multibyte_offsets() {
        let src = "// héllo\nint x;";
        let stripped = strip_comments(src, Language::Cpp);
        assert_eq!(stripped.len(), src.len());
        assert_eq!(&stripped[stripped.len() - 6..], "int x;");
    }

    #[test]
    fn test_split_generic_params() {
        let splitter = DepthSplitter;
        let params = "Map<String, List<Integer>> graph, int[][] grid, int k";
        assert_eq!(splitter.count(params), 3);
        assert_eq!(splitter.split(params)[0], "Map<String, List<Integer>> graph");
    }

    #[test]
    fn test_split_arrow_types_and_defaults() {
        let splitter = DepthSplitter;
        assert_eq!(splitter.count("cb: (a: number, b: number) => void, n: number"), 2);
        assert_eq!(splitter.count("self, nums: List[int], sep=\",\""), 3);
        assert_eq!(splitter.count(""), 0);
        assert_eq!(splitter.count("a, b,"), 2);
    }

    #[test]
    fn test_matching_paren() {
        let text = "f(a, (b), c) {";
        assert_eq!(matching_paren(text, 1), Some(11));
        assert_eq!(matching_paren("f(a", 1), None);
    }

    #[test]
    fn test_parse_param_per_language() {
        let p = parse_param("const vector<vector<int>>& grid", Language::Cpp);
        assert_eq!(p.name, "grid");
        assert_eq!(p.declared_type.as_deref(), Some("vector<vector<int>>"));

        let p = parse_param("final List<Integer> nums", Language::Java);
        assert_eq!(p.declared_type.as_deref(), Some("List<Integer>"));

        let p = parse_param("int nums[]", Language::Java);
        assert_eq!(p.name, "nums");
        assert_eq!(p.declared_type.as_deref(), Some("int[]"));

        let p = parse_param("TreeNode* root", Language::Cpp);
        assert_eq!(p.declared_type.as_deref(), Some("TreeNode*"));

        let p = parse_param("nums: number[]", Language::TypeScript);
        assert_eq!(p.name, "nums");
        assert_eq!(p.declared_type.as_deref(), Some("number[]"));

        let p = parse_param("k: int = 3", Language::Python);
        assert_eq!(p.name, "k");
        assert_eq!(p.declared_type.as_deref(), Some("int"));

        let p = parse_param("nums", Language::Python);
        assert_eq!(p.declared_type, None);
    }

    #[test]
    fn test_parse_param_non_ascii_separator() {
        let p = parse_param("int\u{a0}a", Language::Java);
        assert_eq!(p.name, "a");
        assert_eq!(p.declared_type.as_deref(), Some("int"));

        let p = parse_param("vector<int>&\u{3000}nums", Language::Cpp);
        assert_eq!(p.name, "nums");
        assert_eq!(p.declared_type.as_deref(), Some("vector<int>"));
    }

    #[test]
    fn test_trailing_ident_start() {
        assert_eq!(trailing_ident_start("int x"), 4);
        assert_eq!(trailing_ident_start("x"), 0);
        assert_eq!(trailing_ident_start("int\u{a0}x"), 5);
        assert_eq!(trailing_ident_start("é x"), 3);
    }
}
