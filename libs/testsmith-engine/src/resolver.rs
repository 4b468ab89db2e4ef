//! Entry-point resolution
//!
//! **Core Responsibility:**
//! Given raw user source, find the function/method the harness should
//! call, its raw parameter text and whether it lives inside a
//! `Solution` container.
//!
//! **Flow:**
//! 1. Blank comments so commented-out code never matches
//! 2. Detect the container textually
//! 3. Collect candidates with one matcher per language family
//! 4. Keep candidates whose arity equals the schema length
//! 5. Rank survivors, or walk the fallback chain when none survive
//!
//! Resolution never fails: malformed code still yields a name to call.

use crate::logical::CompositeKind;
use crate::source::{
    matching_paren, parse_param, strip_comments, trailing_ident_start, DepthSplitter, ParamDecl, ParamSplitter,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use testsmith_common::types::{InputSchemaEntry, Language};
use tracing::{debug, warn};

/// Name called when nothing better can be found
pub const DEFAULT_ENTRY_NAME: &str = "solution";

lazy_static! {
    static ref CONTAINER: Regex = Regex::new(r"\bclass\s+Solution\b").unwrap();
    static ref CPP_CONTAINER: Regex = Regex::new(r"\b(?:class|struct)\s+Solution\b").unwrap();

    static ref TS_FUNCTION: Regex =
        Regex::new(r"\bfunction\b\s*\*?\s*([A-Za-z_$][\w$]*)\s*(?:<[^>()]*>)?\s*\(").unwrap();
    static ref TS_BINDING: Regex = Regex::new(
        r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=;]+)?=\s*(?:async\s*)?(?:function\b\s*\*?\s*[\w$]*\s*)?(?:<[^>()]*>)?\s*\("
    )
    .unwrap();
    static ref TS_BINDING_TAIL: Regex = Regex::new(r"^\s*(?::\s*[^{;=]+?)?(?:=>|\{)").unwrap();
    static ref TS_SINGLE_ARROW: Regex = Regex::new(
        r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?([A-Za-z_$][\w$]*)\s*=>"
    )
    .unwrap();
    static ref TS_METHOD: Regex = Regex::new(
        r"(?m)^[ \t]*(?:(?:public|private|protected|static|async|readonly|override|abstract)\s+)*\*?\s*([A-Za-z_$][\w$]*)\s*(?:<[^>()]*>)?\s*\("
    )
    .unwrap();
    static ref TS_BODY_TAIL: Regex = Regex::new(r"^\s*(?::\s*([^{;=]+?))?\s*\{").unwrap();
    static ref TS_RETURN: Regex = Regex::new(r"^\s*:\s*([^{;=]+?)\s*(?:=>|\{)").unwrap();

    static ref PY_DEF: Regex = Regex::new(r"(?m)^[ \t]*(?:async[ \t]+)?def[ \t]+([A-Za-z_]\w*)\s*\(").unwrap();
    static ref PY_RETURN: Regex = Regex::new(r"^\s*->\s*([^:]+?)\s*:").unwrap();

    static ref C_CALLABLE: Regex = Regex::new(r"\b([A-Za-z_]\w*)\s*\(").unwrap();
    static ref C_BODY_TAIL: Regex =
        Regex::new(r"^\s*(?:(?:const|noexcept|override|final)\s*|throws\s+[\w.,\s]+)*\{").unwrap();
    static ref C_RETURN_TYPE: Regex =
        Regex::new(r"^(?:<[^>]*>\s*)?[A-Za-z_][\w:<>,\s\*&\[\]\.?]*$").unwrap();
    static ref CPP_ACCESS: Regex = Regex::new(r"\b(public|private|protected)\s*:[^:]").unwrap();
    static ref CPP_AGGREGATE: Regex = Regex::new(r"\b(class|struct)\s+\w+[^;{]*\{").unwrap();
    static ref JAVA_CLASS: Regex = Regex::new(r"\bclass\s+[A-Za-z_]\w*").unwrap();
}

const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "new", "else", "throw", "sizeof", "do", "try",
    "synchronized", "function", "constructor", "operator", "super", "this", "delete", "typeof",
];

const C_MODIFIERS: &[&str] = &[
    "public", "private", "protected", "static", "final", "abstract", "synchronized", "native",
    "strictfp", "default", "inline", "virtual", "constexpr", "explicit", "friend", "extern",
];

const C_NON_TYPES: &[&str] = &[
    "return", "new", "else", "throw", "case", "goto", "sizeof", "delete", "class", "struct",
    "interface", "enum", "record", "typedef", "using", "namespace", "do", "assert", "yield",
    "co_return", "co_yield", "if", "while", "for", "switch",
];

/// A function-shaped declaration found in user source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    pub arg_count: usize,
    pub args_str: String,
    pub return_type: Option<String>,
    pub is_public: bool,
    pub looks_like_main_solution: bool,
    pub source_order: usize,
    /// Byte offset of the name in the source
    #[serde(skip)]
    pub offset: usize,
    /// Byte offset where the return type starts (C-family only)
    #[serde(skip)]
    pub type_offset: usize,
    #[serde(skip)]
    pub modifiers: Vec<String>,
    /// Brace depth at the declaration
    #[serde(skip)]
    pub depth: usize,
}

/// The resolved call target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    pub name: String,
    pub args_str: String,
    pub wrapped_in_container: bool,
    pub return_type: Option<String>,
}

impl EntryPoint {
    /// Parameters of the entry point, split and parsed for `language`.
    pub fn params(&self, language: Language) -> Vec<ParamDecl> {
        DepthSplitter
            .split(&self.args_str)
            .into_iter()
            .map(|raw| parse_param(raw, language))
            .collect()
    }
}

/// Whether the source wraps its methods in a `Solution` container.
pub fn has_container(source: &str, language: Language) -> bool {
    let stripped = strip_comments(source, language);
    match language {
        Language::Cpp => CPP_CONTAINER.is_match(&stripped),
        _ => CONTAINER.is_match(&stripped),
    }
}

/// Resolve the entry point for `source`.
pub fn resolve(
    source: &str,
    language: Language,
    input_schema: &[InputSchemaEntry],
    hinted_name: Option<&str>,
) -> EntryPoint {
    let wrapped_in_container = has_container(source, language);
    let candidates = find_candidates(source, language);
    let hinted = hinted_name.map(str::trim).filter(|h| !h.is_empty());
    let arity = input_schema.len();

    let mut matching: Vec<&Candidate> = candidates.iter().filter(|c| c.arg_count == arity).collect();

    let chosen = if matching.is_empty() {
        warn!(
            language = %language,
            arity = arity,
            candidates = candidates.len(),
            "No candidate matches schema arity, falling back"
        );
        hinted
            .and_then(|h| candidates.iter().find(|c| c.name == h))
            .or_else(|| candidates.first())
    } else {
        matching.sort_by_key(|c| {
            (
                hinted != Some(c.name.as_str()),
                !c.looks_like_main_solution,
                language.is_c_family() && !c.is_public,
                c.source_order,
            )
        });
        matching.first().copied()
    };

    let entry = match chosen {
        Some(c) => EntryPoint {
            name: c.name.clone(),
            args_str: c.args_str.clone(),
            wrapped_in_container,
            return_type: c.return_type.clone(),
        },
        None => EntryPoint {
            name: hinted.unwrap_or(DEFAULT_ENTRY_NAME).to_string(),
            args_str: String::new(),
            wrapped_in_container,
            return_type: None,
        },
    };

    debug!(
        language = %language,
        name = %entry.name,
        container = entry.wrapped_in_container,
        "Resolved entry point"
    );
    entry
}

/// Every function-shaped declaration in `source`, in source order.
pub fn find_candidates(source: &str, language: Language) -> Vec<Candidate> {
    let stripped = strip_comments(source, language);
    let mut found = match language {
        Language::TypeScript => typescript_candidates(&stripped),
        Language::Python => python_candidates(&stripped),
        Language::Java | Language::Cpp => c_family_candidates(&stripped, language),
    };

    found.sort_by_key(|c| c.offset);
    found.dedup_by(|a, b| a.offset == b.offset);
    for (order, candidate) in found.iter_mut().enumerate() {
        candidate.source_order = order;
    }
    found
}

fn excluded_name(name: &str) -> bool {
    CONTROL_KEYWORDS.contains(&name)
        || matches!(name, "main" | "Main" | "Solution")
        || CompositeKind::from_name(name).is_some()
}

fn candidate(
    name: &str,
    args: &str,
    return_type: Option<String>,
    offset: usize,
    depth: usize,
) -> Candidate {
    let lowered = name.to_lowercase();
    Candidate {
        name: name.to_string(),
        arg_count: DepthSplitter.count(args),
        args_str: args.trim().to_string(),
        return_type,
        is_public: false,
        looks_like_main_solution: lowered.contains("solution") || lowered == "solve",
        source_order: 0,
        offset,
        type_offset: offset,
        modifiers: Vec::new(),
        depth,
    }
}

/// Brace depth at `offset`, ignoring braces inside string literals.
pub(crate) fn brace_depth(text: &str, offset: usize) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < offset.min(bytes.len()) {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q || b == b'\n' {
                quote = None;
            }
        } else {
            match b {
                b'"' | b'\'' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        i += 1;
    }
    depth
}

fn typescript_candidates(text: &str) -> Vec<Candidate> {
    let mut out = Vec::new();

    for caps in TS_FUNCTION.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else { continue };
        let open = whole.end() - 1;
        let Some(close) = matching_paren(text, open) else { continue };
        let return_type = TS_RETURN
            .captures(&text[close + 1..])
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string());
        out.push(candidate(name.as_str(), &text[open + 1..close], return_type, name.start(), brace_depth(text, name.start())));
    }

    for caps in TS_BINDING.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else { continue };
        let open = whole.end() - 1;
        let Some(close) = matching_paren(text, open) else { continue };
        if !TS_BINDING_TAIL.is_match(&text[close + 1..]) {
            continue;
        }
        let return_type = TS_RETURN
            .captures(&text[close + 1..])
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string());
        out.push(candidate(name.as_str(), &text[open + 1..close], return_type, name.start(), brace_depth(text, name.start())));
    }

    for caps in TS_SINGLE_ARROW.captures_iter(text) {
        let (Some(name), Some(param)) = (caps.get(1), caps.get(2)) else { continue };
        out.push(candidate(name.as_str(), param.as_str(), None, name.start(), brace_depth(text, name.start())));
    }

    for caps in TS_METHOD.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else { continue };
        if excluded_name(name.as_str()) {
            continue;
        }
        let open = whole.end() - 1;
        let Some(close) = matching_paren(text, open) else { continue };
        let Some(tail) = TS_BODY_TAIL.captures(&text[close + 1..]) else { continue };
        let return_type = tail.get(1).map(|m| m.as_str().trim().to_string());
        out.push(candidate(name.as_str(), &text[open + 1..close], return_type, name.start(), brace_depth(text, name.start())));
    }

    out.retain(|c| !excluded_name(&c.name));
    out
}

fn python_candidates(text: &str) -> Vec<Candidate> {
    let mut out = Vec::new();
    for caps in PY_DEF.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else { continue };
        let name = name.as_str();
        if name.starts_with("__") && name.ends_with("__") {
            continue;
        }
        let open = whole.end() - 1;
        let Some(close) = matching_paren(text, open) else { continue };
        let params = &text[open + 1..close];
        // Bound methods: the receiver is not part of the schema
        let pieces = DepthSplitter.split(params);
        let args = match pieces.first().map(|p| parse_param(p, Language::Python).name) {
            Some(first) if first == "self" || first == "cls" => pieces[1..].join(", "),
            _ => pieces.join(", "),
        };
        let return_type = PY_RETURN
            .captures(&text[close + 1..])
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        let offset = caps.get(1).map(|m| m.start()).unwrap_or(whole.start());
        out.push(candidate(name, &args, return_type, offset, 0));
    }
    out
}

struct CHeader {
    type_offset: usize,
    modifiers: Vec<String>,
    return_type: String,
}

/// Parse the text between the previous statement boundary and a name:
/// annotations, `template<...>`, modifiers, then the return type.
fn c_header(text: &str, name_start: usize) -> Option<CHeader> {
    let before = &text[..name_start];
    let mut start = before.rfind([';', '{', '}']).map(|i| i + 1).unwrap_or(0);

    // C++ access labels (`public:`) end a segment too; `::` does not
    let segment = &text[start..name_start];
    let bytes = segment.as_bytes();
    for i in (0..bytes.len()).rev() {
        if bytes[i] == b':' {
            let prev = i > 0 && bytes[i - 1] == b':';
            let next = bytes.get(i + 1) == Some(&b':');
            if !prev && !next {
                start += i + 1;
                break;
            }
        }
    }

    let segment = &text[start..name_start];
    let bytes = segment.as_bytes();
    let mut cursor = 0;
    let mut modifiers = Vec::new();
    loop {
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor >= bytes.len() {
            break;
        }
        let rest = &segment[cursor..];
        if rest.starts_with('@') {
            cursor += 1;
            while cursor < bytes.len() && (bytes[cursor].is_ascii_alphanumeric() || bytes[cursor] == b'_' || bytes[cursor] == b'.') {
                cursor += 1;
            }
            if segment[cursor..].trim_start().starts_with('(') {
                let open = cursor + (segment[cursor..].len() - segment[cursor..].trim_start().len());
                cursor = matching_paren(segment, open)? + 1;
            }
            continue;
        }
        if rest.starts_with("template") && rest["template".len()..].trim_start().starts_with('<') {
            let open = cursor + rest.find('<')?;
            cursor = skip_angle(segment, open)?;
            continue;
        }
        let word_len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let word = &rest[..word_len];
        if word_len > 0 && C_MODIFIERS.contains(&word) {
            modifiers.push(word.to_string());
            cursor += word_len;
            continue;
        }
        break;
    }

    let mut return_type = segment[cursor..].trim().to_string();
    // Out-of-class definitions: `int Solution::twoSum(...)`
    while return_type.ends_with("::") {
        let trimmed = return_type.trim_end_matches("::");
        let cut = trailing_ident_start(trimmed);
        return_type = trimmed[..cut].trim_end().to_string();
    }

    let first_word = return_type
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .unwrap_or("");
    if return_type.is_empty()
        || return_type.ends_with('.')
        || C_NON_TYPES.contains(&first_word)
        || !C_RETURN_TYPE.is_match(&return_type)
    {
        return None;
    }

    Some(CHeader {
        type_offset: start + cursor,
        modifiers,
        return_type,
    })
}

fn skip_angle(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, b) in text.as_bytes()[open..].iter().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn c_family_candidates(text: &str, language: Language) -> Vec<Candidate> {
    let mut out = Vec::new();
    for caps in C_CALLABLE.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else { continue };
        if excluded_name(name.as_str()) {
            continue;
        }
        let open = whole.end() - 1;
        let Some(close) = matching_paren(text, open) else { continue };
        if !C_BODY_TAIL.is_match(&text[close + 1..]) {
            continue;
        }
        let Some(header) = c_header(text, name.start()) else { continue };

        let mut found = candidate(
            name.as_str(),
            &text[open + 1..close],
            Some(crate::source::clean_c_type(&header.return_type, language)),
            name.start(),
            brace_depth(text, name.start()),
        );
        found.is_public = match language {
            Language::Java => header.modifiers.iter().any(|m| m == "public"),
            _ => cpp_is_public(text, name.start()),
        };
        found.type_offset = header.type_offset;
        found.modifiers = header.modifiers;
        out.push(found);
    }
    out
}

/// Last access label before `offset` wins; with no label, `struct`
/// members and free functions are public, `class` members are not.
fn cpp_is_public(text: &str, offset: usize) -> bool {
    let before = &text[..offset];
    if let Some(label) = CPP_ACCESS.captures_iter(before).last().and_then(|c| c.get(1)) {
        return label.as_str() == "public";
    }
    if brace_depth(text, offset) == 0 {
        return true;
    }
    CPP_AGGREGATE
        .captures_iter(before)
        .last()
        .and_then(|c| c.get(1))
        .map(|kw| kw.as_str() == "struct")
        .unwrap_or(true)
}

/// Java without a container: make every top-level method and class
/// `static` so the generated `Main` can reach them without an instance.
pub fn make_top_level_static(source: &str) -> String {
    let stripped = strip_comments(source, Language::Java);
    let mut inserts: Vec<usize> = c_family_candidates(&stripped, Language::Java)
        .into_iter()
        .filter(|c| c.depth == 0 && !c.modifiers.iter().any(|m| m == "static"))
        .map(|c| c.type_offset)
        .collect();

    for m in JAVA_CLASS.find_iter(&stripped) {
        if brace_depth(&stripped, m.start()) != 0 {
            continue;
        }
        let preceding = stripped[..m.start()].trim_end();
        if !preceding.ends_with("static") {
            inserts.push(m.start());
        }
    }

    inserts.sort_unstable();
    inserts.dedup();

    let mut out = String::with_capacity(source.len() + inserts.len() * 7);
    let mut last = 0;
    for at in inserts {
        out.push_str(&source[last..at]);
        out.push_str("static ");
        last = at;
    }
    out.push_str(&source[last..]);
    out
}
