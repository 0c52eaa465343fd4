//! # Schema Validation
//!
//! Runs the `jsonschema` engine against a compiled [`Schema`] and turns its
//! errors into [`Violation`] records.
//!
//! ## Ordering
//!
//! Violations are sorted by document path, then by keyword, then by
//! message. Index segments order before key segments and a path orders
//! before any path it prefixes, so `[]` < `[0]` < `["a"]` < `["a", 0]`.

use std::cmp::Ordering;
use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::Schema;

/// One step into a JSON document: an array index or an object key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Position within an array.
    Index(usize),
    /// Member name within an object.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => write!(f, "{}", k.replace('~', "~0").replace('/', "~1")),
        }
    }
}

/// A single schema-rule failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Human-readable description.
    pub message: String,
    /// Location of the offending value within the document.
    pub path: Vec<PathSegment>,
    /// Schema keyword that failed (e.g. `required`, `type`).
    pub validator: String,
    /// The keyword's value in the schema, `null` when it lives outside the
    /// schema document.
    pub validator_value: Value,
}

impl Violation {
    /// The document path rendered as a JSON Pointer (`""` for the root).
    pub fn pointer(&self) -> String {
        self.path.iter().map(|s| format!("/{s}")).collect()
    }

    fn from_engine_error(error: &ValidationError<'_>, schema: &Value, document: &Value) -> Self {
        let schema_path = error.schema_path.to_string();

        // A `false` subschema has no keyword; its path ends at whatever
        // holds it (a property name, a `$defs` entry).
        let (validator, validator_value) = match error.kind {
            ValidationErrorKind::FalseSchema => ("false".to_string(), Value::Bool(false)),
            _ => (
                pointer_tokens(&schema_path)
                    .last()
                    .cloned()
                    .unwrap_or_default(),
                keyword_value(schema, &schema_path),
            ),
        };

        Self {
            message: engine_message(error),
            path: instance_segments(&error.instance_path.to_string(), document),
            validator,
            validator_value,
        }
    }

    fn sort_key_cmp(&self, other: &Self) -> Ordering {
        self.path
            .cmp(&other.path)
            .then_with(|| self.validator.cmp(&other.validator))
            .then_with(|| self.message.cmp(&other.message))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.pointer(), self.message)
        }
    }
}

/// Result of validating one document.
///
/// `Valid` if and only if there are no violations; [`Self::from_violations`]
/// is the only constructor that takes a list.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The document satisfies the schema.
    Valid,
    /// Non-empty, sorted list of violations.
    Invalid(Vec<Violation>),
}

impl ValidationOutcome {
    /// Build an outcome, mapping an empty list to [`Self::Valid`].
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(violations)
        }
    }

    /// Returns true if the document passed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Violations, empty for a valid document.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Valid => &[],
            Self::Invalid(v) => v,
        }
    }

    /// Consume the outcome and return its violations.
    pub fn into_violations(self) -> Vec<Violation> {
        match self {
            Self::Valid => Vec::new(),
            Self::Invalid(v) => v,
        }
    }
}

/// Validate `document` against `schema`.
///
/// Pure and infallible: schemas are compiled when the registry loads.
pub fn validate(schema: &Schema, document: &Value) -> ValidationOutcome {
    let mut violations: Vec<Violation> = schema
        .validator()
        .iter_errors(document)
        .map(|error| Violation::from_engine_error(&error, schema.document(), document))
        .collect();
    violations.sort_by(Violation::sort_key_cmp);
    ValidationOutcome::from_violations(violations)
}

/// Message for an engine error. `required` failures are rendered with the
/// property in single quotes, independent of the engine's own wording.
fn engine_message(error: &ValidationError<'_>) -> String {
    match &error.kind {
        ValidationErrorKind::Required { property } => match property {
            Value::String(name) => format!("'{name}' is a required property"),
            other => format!("{other} is a required property"),
        },
        _ => error.to_string(),
    }
}

/// Split a JSON Pointer into unescaped reference tokens.
fn pointer_tokens(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer
        .trim_start_matches('/')
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Decode an instance pointer into typed segments, using the document to
/// tell array indices from numeric-looking object keys.
fn instance_segments(pointer: &str, document: &Value) -> Vec<PathSegment> {
    let mut current = Some(document);
    let mut segments = Vec::new();

    for token in pointer_tokens(pointer) {
        let segment = match current {
            Some(Value::Array(items)) => match token.parse::<usize>() {
                Ok(index) => {
                    current = items.get(index);
                    PathSegment::Index(index)
                }
                Err(_) => {
                    current = None;
                    PathSegment::Key(token)
                }
            },
            Some(Value::Object(members)) => {
                current = members.get(&token);
                PathSegment::Key(token)
            }
            _ => {
                current = None;
                PathSegment::Key(token)
            }
        };
        segments.push(segment);
    }

    segments
}

/// Value at `schema_path` within the root schema, following local `$ref`
/// hops (JSON Pointer fragments and `$anchor` names). Returns `null` if the
/// path leaves the document.
fn keyword_value(root: &Value, schema_path: &str) -> Value {
    let mut current = root;

    for token in pointer_tokens(schema_path) {
        if token == "$ref" {
            if let Some(reference) = current.get("$ref").and_then(Value::as_str) {
                match resolve_local_ref(root, reference) {
                    Some(target) => {
                        current = target;
                        continue;
                    }
                    None => return Value::Null,
                }
            }
        }

        let next = match current {
            Value::Object(members) => members.get(&token),
            Value::Array(items) => token.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }

    current.clone()
}

/// Resolve a same-document reference: `#`, `#/json/pointer` or `#anchor`.
fn resolve_local_ref<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let fragment = reference.strip_prefix('#')?;
    if fragment.is_empty() || fragment.starts_with('/') {
        root.pointer(fragment)
    } else {
        find_anchor(root, fragment)
    }
}

/// Depth-first search for the subschema declaring `"$anchor": anchor`.
fn find_anchor<'a>(node: &'a Value, anchor: &str) -> Option<&'a Value> {
    match node {
        Value::Object(members) => {
            if members.get("$anchor").and_then(Value::as_str) == Some(anchor) {
                return Some(node);
            }
            members.values().find_map(|child| find_anchor(child, anchor))
        }
        Value::Array(items) => items.iter().find_map(|item| find_anchor(item, anchor)),
        _ => None,
    }
}
