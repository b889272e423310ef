//! Render an inferred type tree as Python `typing` source
//!
//! Objects become `TypedDict` declarations named after their position. A
//! declaration is emitted once all the types it references are emitted, so
//! the generated module never refers to a name before defining it.

use crate::config::RenderConfig;
use crate::types::{ObjectDef, OneOfDef, Position, ScalarKind, StringDef, TypeDef, ITEMS_SEGMENT};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Write;

pub const TYPING_IMPORT: &str = "import typing as t";

static IDENTIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

static NON_IDENTIFIER_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Renders type nodes and collects the declarations they need
#[derive(Debug)]
pub struct TypeRenderer<'a> {
    config: &'a RenderConfig,
    declarations: Vec<String>,
    names: HashSet<String>,
}

impl<'a> TypeRenderer<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        TypeRenderer {
            config,
            declarations: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Type expression for `def`; nested objects are declared as a side effect
    pub fn render(&mut self, def: &TypeDef) -> String {
        match def {
            TypeDef::Never => "list[t.Any]".to_string(),
            TypeDef::Scalar(scalar) => scalar_name(scalar.kind).to_string(),
            TypeDef::String(string) => self.render_string(string),
            TypeDef::Object(object) => self.render_object(object),
            TypeDef::Array(array) => match array.items.as_ref() {
                TypeDef::Never => "list[t.Any]".to_string(),
                items => format!("list[{}]", self.render(items)),
            },
            TypeDef::OneOf(one_of) => self.render_one_of(one_of),
        }
    }

    /// Declarations emitted so far, in emission order
    pub fn declarations(&self) -> &[String] {
        &self.declarations
    }

    fn render_string(&self, string: &StringDef) -> String {
        let values = &string.values;
        if values.is_overflowed() || values.distinct_len() >= self.config.enum_threshold {
            return "str".to_string();
        }

        let literals: Vec<String> = values.values().map(python_repr).collect();
        format!("t.Literal[{}]", literals.join(", "))
    }

    fn render_object(&mut self, object: &ObjectDef) -> String {
        if object.properties.is_empty() {
            return "dict[str, t.Any]".to_string();
        }

        let name = self.claim_name(&object.position);

        let mut fields = Vec::with_capacity(object.properties.len());
        for (key, value) in &object.properties {
            let rendered = self.render(value);
            let rendered = if object.not_required.contains(key) {
                format!("t.NotRequired[{rendered}]")
            } else {
                rendered
            };
            fields.push((key.as_str(), rendered));
        }

        let declaration = if fields.iter().all(|(key, _)| is_identifier(key)) {
            let mut lines = vec![format!("class {name}(t.TypedDict):")];
            for (key, rendered) in &fields {
                lines.push(format!("    {key}: {rendered}"));
            }
            lines.join("\n")
        } else {
            let entries: Vec<String> = fields
                .iter()
                .map(|(key, rendered)| format!("{}: {rendered}", python_repr(key)))
                .collect();
            format!(
                "{name} = t.TypedDict({}, {{{}}})",
                python_repr(&name),
                entries.join(", ")
            )
        };
        self.declarations.push(declaration);

        name
    }

    fn render_one_of(&mut self, one_of: &OneOfDef) -> String {
        let items: Vec<&TypeDef> = one_of.items.iter().filter(|item| !item.is_none()).collect();

        match items.as_slice() {
            [] => scalar_name(ScalarKind::None).to_string(),
            [single] => format!("t.Optional[{}]", self.render(single)),
            many => {
                let rendered: Vec<String> = many.iter().map(|item| self.render(item)).collect();
                format!("t.Union[{}]", rendered.join(", "))
            }
        }
    }

    /// Reserve a declaration name for the object at `position`
    ///
    /// Every object node is declared once, so a name is never shared: the
    /// first object to normalise to a name keeps it. Later objects fall back to
    /// a name spelled from their full path, then to a numeric suffix. Keys
    /// containing `/` can make two objects share a position string, which
    /// still yields two names.
    fn claim_name(&mut self, position: &Position) -> String {
        let mut candidates = vec![type_name(position), full_path_name(position)];
        candidates.dedup();

        for base in &candidates {
            let name = format!("{base}Dict");
            if self.names.insert(name.clone()) {
                return name;
            }
        }

        let base = candidates.last().cloned().unwrap_or_default();
        let mut suffix = 2;
        loop {
            let name = format!("{base}{suffix}Dict");
            if self.names.insert(name.clone()) {
                return name;
            }
            suffix += 1;
        }
    }
}

/// Render a complete module: import, declarations, then the root alias
pub fn render_module(root: &TypeDef, config: &RenderConfig) -> String {
    let mut renderer = TypeRenderer::new(config);
    let root_type = renderer.render(root);

    let mut output = String::new();
    output.push_str(TYPING_IMPORT);
    output.push_str("\n\n");
    for declaration in renderer.declarations() {
        output.push_str(declaration);
        output.push_str("\n\n");
    }
    let _ = write!(output, "{} = {}", config.root_name, root_type);
    output
}

fn scalar_name(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Int => "int",
        ScalarKind::Float => "float",
        ScalarKind::Bool => "bool",
        ScalarKind::None => "None",
    }
}

/// Name from the position with array markers dropped, e.g. `$/user/*/tags` -> `UserTags`
pub fn type_name(position: &Position) -> String {
    let path = position.as_str();
    let path = path.strip_prefix('$').unwrap_or(path);
    let path = path.replace('/', "_");
    let path = path.trim_matches('_').replace(ITEMS_SEGMENT, "");
    let path = NON_IDENTIFIER_CHARS.replace_all(&path, "_");

    finish_name(path.split('_').map(capitalize).collect())
}

/// Name from every segment of the position, array markers spelled `Item`
fn full_path_name(position: &Position) -> String {
    let name = position
        .segments()
        .map(|segment| {
            if segment == ITEMS_SEGMENT {
                "Item".to_string()
            } else {
                NON_IDENTIFIER_CHARS
                    .replace_all(segment, "_")
                    .split('_')
                    .map(capitalize)
                    .collect()
            }
        })
        .collect();
    finish_name(name)
}

fn finish_name(name: String) -> String {
    if name.is_empty() {
        "Root".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("T{name}")
    } else {
        name
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Whether `key` can be written as a field in `class` syntax
///
/// Names starting with `__` are mangled inside a class body.
fn is_identifier(key: &str) -> bool {
    IDENTIFIER_REGEX.is_match(key) && !PYTHON_KEYWORDS.contains(&key) && !key.starts_with("__")
}

/// Quote a string the way Python's `repr` does
pub fn python_repr(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
