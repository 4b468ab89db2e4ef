//! Literal value formatting
//!
//! Renders a JSON-shaped test value as source text in the target
//! language. The logical schema type picks composites; for Java and C++
//! the declared parameter type (when the user wrote one) decides between
//! native arrays and list/vector containers and fixes dimensionality, so
//! `[[]]` still renders as a two-dimensional value.

use crate::logical::{CompositeKind, LogicalType};
use serde_json::Value;
use std::fmt::Write as _;
use testsmith_common::types::Language;

/// A Java or C++ parameter type, reduced to what literal rendering needs
#[derive(Debug, Clone, PartialEq)]
pub enum NativeType {
    Int,
    Long,
    Short,
    Byte,
    Double,
    Float,
    Bool,
    Char,
    Str,
    /// Java `T[]`
    Array(Box<NativeType>),
    /// Java `List<T>`-like containers (outer name kept), C++ `vector<T>`
    List(String, Box<NativeType>),
    Composite(CompositeKind),
    /// Anything else, kept verbatim
    Other(String),
}

impl NativeType {
    /// Parse a cleaned declared type (`int[][]`, `List<Integer>`,
    /// `vector<vector<char>>`, `TreeNode*`).
    pub fn parse(raw: &str, language: Language) -> Self {
        let text = raw.trim();
        if let Some(inner) = text.strip_suffix("...") {
            return NativeType::Array(Box::new(NativeType::parse(inner, language)));
        }
        if let Some(inner) = text.strip_suffix("[]") {
            return NativeType::Array(Box::new(NativeType::parse(inner, language)));
        }
        if let Some(open) = text.find('<') {
            if text.ends_with('>') {
                let outer = text[..open].trim();
                let inner = &text[open + 1..text.len() - 1];
                let is_list = match language {
                    Language::Cpp => matches!(outer, "vector" | "std::vector"),
                    _ => matches!(
                        outer,
                        "List" | "ArrayList" | "LinkedList" | "Collection" | "Iterable" | "Deque" | "ArrayDeque"
                    ),
                };
                if is_list {
                    return NativeType::List(outer.to_string(), Box::new(NativeType::parse(inner, language)));
                }
                return NativeType::Other(text.to_string());
            }
        }
        let bare = text.trim_end_matches('*').trim();
        if let Some(kind) = CompositeKind::from_name(bare) {
            return NativeType::Composite(kind);
        }
        match text {
            "int" | "Integer" | "int32_t" | "unsigned" | "unsigned int" => NativeType::Int,
            "long" | "Long" | "long long" | "int64_t" | "long int" | "unsigned long" | "unsigned long long" | "size_t" => {
                NativeType::Long
            }
            "short" | "Short" => NativeType::Short,
            "byte" | "Byte" => NativeType::Byte,
            "double" | "Double" | "long double" => NativeType::Double,
            "float" | "Float" => NativeType::Float,
            "boolean" | "Boolean" | "bool" => NativeType::Bool,
            "char" | "Character" => NativeType::Char,
            "String" | "string" => NativeType::Str,
            other => NativeType::Other(other.to_string()),
        }
    }

    /// Derive a declaration type from the schema's logical type when the
    /// user's signature gives none. Opaque types are inferred from the
    /// value's shape by drilling into first elements.
    pub fn derive(logical: &LogicalType, language: Language, sample: Option<&Value>) -> Self {
        match logical {
            LogicalType::Number => number_type(sample),
            LogicalType::String => NativeType::Str,
            LogicalType::Boolean => NativeType::Bool,
            LogicalType::Char => NativeType::Char,
            LogicalType::Composite(kind) => NativeType::Composite(*kind),
            LogicalType::Array(inner) => {
                let element = sample.and_then(first_non_null_element);
                let inner = NativeType::derive(inner, language, element);
                wrap_sequence(inner, language)
            }
            LogicalType::Opaque(name) => match sample {
                Some(value) => infer(value, language),
                None if language == Language::Cpp => NativeType::Other("JsonValue".to_string()),
                None => NativeType::Other(if name.is_empty() { "Object".to_string() } else { name.clone() }),
            },
        }
    }

    /// Type text usable in a declaration. `boxed` selects Java wrapper
    /// classes for generic arguments.
    pub fn render(&self, language: Language, boxed: bool) -> String {
        match language {
            Language::Cpp => match self {
                NativeType::Int => "int".into(),
                NativeType::Long => "long long".into(),
                NativeType::Short => "short".into(),
                NativeType::Byte => "signed char".into(),
                NativeType::Double => "double".into(),
                NativeType::Float => "float".into(),
                NativeType::Bool => "bool".into(),
                NativeType::Char => "char".into(),
                NativeType::Str => "string".into(),
                NativeType::Array(inner) | NativeType::List(_, inner) => {
                    format!("vector<{}>", inner.render(language, false))
                }
                NativeType::Composite(kind) => kind.cpp_type(),
                NativeType::Other(text) => text.clone(),
            },
            _ => match self {
                NativeType::Int => if boxed { "Integer" } else { "int" }.into(),
                NativeType::Long => if boxed { "Long" } else { "long" }.into(),
                NativeType::Short => if boxed { "Short" } else { "short" }.into(),
                NativeType::Byte => if boxed { "Byte" } else { "byte" }.into(),
                NativeType::Double => if boxed { "Double" } else { "double" }.into(),
                NativeType::Float => if boxed { "Float" } else { "float" }.into(),
                NativeType::Bool => if boxed { "Boolean" } else { "boolean" }.into(),
                NativeType::Char => if boxed { "Character" } else { "char" }.into(),
                NativeType::Str => "String".into(),
                NativeType::Array(inner) => format!("{}[]", inner.render(language, false)),
                NativeType::List(outer, inner) => format!("{}<{}>", outer, inner.render(language, true)),
                NativeType::Composite(kind) => kind.type_name().into(),
                NativeType::Other(text) => text.clone(),
            },
        }
    }

    /// Java array element type with all dimensions removed, plus the
    /// number of dimensions.
    fn java_array_base(&self) -> (&NativeType, usize) {
        match self {
            NativeType::Array(inner) => {
                let (base, dims) = inner.java_array_base();
                (base, dims + 1)
            }
            other => (other, 0),
        }
    }

    pub fn composite(&self) -> Option<CompositeKind> {
        match self {
            NativeType::Composite(kind) => Some(*kind),
            NativeType::Array(inner) | NativeType::List(_, inner) => inner.composite(),
            _ => None,
        }
    }
}

fn wrap_sequence(inner: NativeType, language: Language) -> NativeType {
    match language {
        Language::Cpp => NativeType::List("vector".to_string(), Box::new(inner)),
        _ => NativeType::Array(Box::new(inner)),
    }
}

fn first_non_null_element(value: &Value) -> Option<&Value> {
    value.as_array().and_then(|items| items.iter().find(|v| !v.is_null()))
}

fn number_type(sample: Option<&Value>) -> NativeType {
    match sample {
        Some(Value::Number(n)) if n.is_f64() => NativeType::Double,
        Some(Value::Number(n)) if n.as_i64().map(|i| i32::try_from(i).is_err()).unwrap_or(true) => NativeType::Long,
        _ => NativeType::Int,
    }
}

/// Structural inference for values with no usable type information.
fn infer(value: &Value, language: Language) -> NativeType {
    match value {
        Value::Number(_) => number_type(Some(value)),
        Value::String(_) => NativeType::Str,
        Value::Bool(_) => NativeType::Bool,
        Value::Array(_) => match first_non_null_element(value) {
            Some(first) => wrap_sequence(infer(first, language), language),
            // Empty arrays carry no element information
            None => wrap_sequence(NativeType::Int, language),
        },
        _ => match language {
            Language::Cpp => NativeType::Other("JsonValue".to_string()),
            _ => NativeType::Other("Object".to_string()),
        },
    }
}

/// Render `value` as a source literal.
///
/// `declared` is the user's declared parameter type (already cleaned);
/// when absent for Java/C++ the type is derived from `logical`.
pub fn format(value: &Value, logical: &LogicalType, language: Language, declared: Option<&str>) -> String {
    match language {
        Language::TypeScript | Language::Python => format_dynamic(value, logical, language),
        Language::Java | Language::Cpp => {
            let native = declared
                .map(|d| NativeType::parse(d, language))
                .unwrap_or_else(|| NativeType::derive(logical, language, Some(value)));
            format_native(value, &native, language)
        }
    }
}

fn format_dynamic(value: &Value, logical: &LogicalType, language: Language) -> String {
    match (logical, value) {
        (LogicalType::Composite(kind), v) => format!("{}({})", kind.parser_name(language), dynamic_literal(v, language)),
        (LogicalType::Array(inner), Value::Array(items)) if inner.composite().is_some() => {
            let rendered: Vec<String> = items.iter().map(|item| format_dynamic(item, inner, language)).collect();
            format!("[{}]", rendered.join(", "))
        }
        (_, v) => dynamic_literal(v, language),
    }
}

/// Plain JSON-shaped literal for TypeScript or Python
fn dynamic_literal(value: &Value, language: Language) -> String {
    match value {
        Value::Null => if language == Language::Python { "None" } else { "null" }.to_string(),
        Value::Bool(b) => match (language, b) {
            (Language::Python, true) => "True".to_string(),
            (Language::Python, false) => "False".to_string(),
            (_, b) => b.to_string(),
        },
        Value::Number(n) => n.to_string(),
        Value::String(s) => Value::String(s.clone()).to_string(),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(|v| dynamic_literal(v, language)).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", Value::String(k.clone()), dynamic_literal(v, language)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

fn format_native(value: &Value, native: &NativeType, language: Language) -> String {
    if value.is_null() && !matches!(native, NativeType::Composite(_)) {
        return match language {
            Language::Cpp => match native {
                NativeType::Other(text) if text.ends_with('*') => "nullptr".to_string(),
                _ => format!("{}()", native.render(language, false)),
            },
            _ => "null".to_string(),
        };
    }

    match native {
        NativeType::Int => integer_literal(value, ""),
        NativeType::Long => integer_literal(value, if language == Language::Cpp { "LL" } else { "L" }),
        NativeType::Short if language == Language::Java => format!("(short) {}", integer_literal(value, "")),
        NativeType::Byte if language == Language::Java => format!("(byte) {}", integer_literal(value, "")),
        NativeType::Short | NativeType::Byte => integer_literal(value, ""),
        NativeType::Double => double_literal(value, ""),
        NativeType::Float => double_literal(value, "f"),
        NativeType::Bool => match value {
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => (n.as_f64().unwrap_or(0.0) != 0.0).to_string(),
            _ => "false".to_string(),
        },
        NativeType::Char => char_literal(value),
        NativeType::Str => match value {
            Value::String(s) => string_literal(s, language),
            other => string_literal(&other.to_string(), language),
        },
        NativeType::Array(inner) | NativeType::List(_, inner) if language == Language::Cpp => {
            let items = value.as_array().map(Vec::as_slice).unwrap_or(&[]);
            let rendered: Vec<String> = items.iter().map(|item| format_native(item, inner, language)).collect();
            format!("{{{}}}", rendered.join(", "))
        }
        NativeType::Array(inner) => {
            let items = value.as_array().map(Vec::as_slice).unwrap_or(&[]);
            let rendered: Vec<String> = items.iter().map(|item| format_native(item, inner, language)).collect();
            let (base, dims) = native.java_array_base();
            format!(
                "new {}{}{{{}}}",
                base.render(language, false),
                "[]".repeat(dims),
                rendered.join(", ")
            )
        }
        NativeType::List(outer, inner) => {
            let element = inner.render(language, true);
            let constructor = match outer.as_str() {
                "List" | "ArrayList" | "Collection" | "Iterable" => "ArrayList",
                "Deque" => "ArrayDeque",
                other => other,
            };
            let items = value.as_array().map(Vec::as_slice).unwrap_or(&[]);
            if items.is_empty() {
                return format!("new {}<{}>()", constructor, element);
            }
            let rendered: Vec<String> = items.iter().map(|item| format_native(item, inner, language)).collect();
            format!(
                "new {}<{}>(Arrays.<{}>asList({}))",
                constructor,
                element,
                element,
                rendered.join(", ")
            )
        }
        NativeType::Composite(kind) => format!(
            "{}(harnessParseJson({}))",
            kind.parser_name(language),
            string_literal(&value.to_string(), language)
        ),
        NativeType::Other(text) => match language {
            Language::Cpp if text == "JsonValue" => {
                format!("harnessParseJson({})", string_literal(&value.to_string(), language))
            }
            Language::Cpp => format!(
                "JsonConvert<{}>::from(harnessParseJson({}))",
                text,
                string_literal(&value.to_string(), language)
            ),
            _ if text == "Object" => {
                format!("harnessParseJson({})", string_literal(&value.to_string(), language))
            }
            _ => format!(
                "({}) (Object) harnessParseJson({})",
                text,
                string_literal(&value.to_string(), language)
            ),
        },
    }
}

fn integer_literal(value: &Value, suffix: &str) -> String {
    let n = match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Value::Bool(b) => *b as i64,
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    // i64::MIN has no positive counterpart to negate
    if n == i64::MIN {
        return format!("({}{} - 1{})", n + 1, suffix, suffix);
    }
    format!("{}{}", n, suffix)
}

fn double_literal(value: &Value, suffix: &str) -> String {
    let f = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    let mut text = if f.is_finite() { format!("{:?}", f) } else { "0.0".to_string() };
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    text.push_str(suffix);
    text
}

fn char_literal(value: &Value) -> String {
    let c = match value {
        Value::String(s) => s.chars().next().unwrap_or('\0'),
        Value::Number(n) => n.as_u64().and_then(|u| char::from_u32(u as u32)).unwrap_or('\0'),
        _ => '\0',
    };
    match c {
        '\'' => "'\\''".to_string(),
        '\\' => "'\\\\'".to_string(),
        '\n' => "'\\n'".to_string(),
        '\t' => "'\\t'".to_string(),
        '\r' => "'\\r'".to_string(),
        c if (c as u32) < 0x20 || c == '\u{7f}' => format!("'\\{:o}'", c as u32),
        c => format!("'{}'", c),
    }
}

/// String literal for the target language. Control characters use octal
/// escapes so no `\u` sequence ever reaches a Java source file.
pub fn string_literal(s: &str, language: Language) -> String {
    match language {
        Language::TypeScript | Language::Python => Value::String(s.to_string()).to_string(),
        Language::Java | Language::Cpp => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('"');
            let bytes_mode = language == Language::Cpp;
            for c in s.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    // `??x` would be a trigraph in older C++ dialects
                    '?' if bytes_mode => out.push_str("\\?"),
                    c if (c as u32) < 0x20 || c == '\u{7f}' => {
                        let _ = write!(out, "\\{:03o}", c as u32);
                    }
                    c => out.push(c),
                }
            }
            out.push('"');
            out
        }
    }
}
