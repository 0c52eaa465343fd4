//! # Schema Registry
//!
//! In-memory, read-only collection of compiled JSON Schemas keyed by name.
//!
//! ## Naming
//!
//! A schema's name is the first dot-separated segment of its file name:
//! `thing.json` and `thing.schema.json` both register as `thing`. When two
//! files share a name, the later file in sorted order wins and a warning is
//! logged.
//!
//! ## Schema Resolution
//!
//! Every loaded schema is indexed by its `$id` (when present) and by its
//! bare file name. Cross-schema `$ref`s are resolved against that index by
//! a local retriever; unresolvable references fail compilation instead of
//! reaching out to the network.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::validate::{validate, ValidationOutcome};

/// Local retriever that resolves `$ref` URIs to schemas loaded from the
/// registry directory.
struct LocalSchemaRetriever {
    /// Map from `$id` URI or bare file name to schema value.
    schemas_by_uri: Arc<HashMap<String, Value>>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        // Relative refs arrive resolved against the engine's default base
        // URI; fall back to the trailing file name.
        let file_name = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(file_name) {
            return Ok(value.clone());
        }

        Err(format!("no schema in the registry directory resolves '{uri_str}'").into())
    }
}

/// Error while loading the schema registry.
///
/// Every variant is fatal at startup: a process must not serve with a
/// partially loaded registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The schema directory could not be listed.
    #[error("cannot read schema directory '{}': {source}", dir.display())]
    ReadDir {
        /// The directory that was scanned.
        dir: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A schema file could not be read.
    #[error("cannot read schema file '{}': {source}", path.display())]
    ReadFile {
        /// Path to the schema file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A schema file is not valid JSON.
    #[error("schema file '{}' is not valid JSON: {source}", path.display())]
    InvalidJson {
        /// Path to the schema file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The engine rejected the schema (malformed keyword, unresolvable `$ref`).
    #[error("schema '{schema}' does not compile: {reason}")]
    Compile {
        /// Schema file name or name.
        schema: String,
        /// Engine error message.
        reason: String,
    },
}

/// An immutable, compiled JSON Schema.
pub struct Schema {
    name: String,
    file_name: String,
    document: Value,
    validator: Validator,
}

impl Schema {
    /// Compile a standalone schema document under the given name.
    ///
    /// The schema cannot `$ref` other files; use [`SchemaRegistry::load`]
    /// for directories of schemas that reference each other.
    pub fn new(name: impl Into<String>, document: Value) -> Result<Self, RegistryError> {
        let name = name.into();
        Self::compile(name.clone(), name, document, Arc::new(HashMap::new()))
    }

    fn compile(
        name: String,
        file_name: String,
        document: Value,
        schemas_by_uri: Arc<HashMap<String, Value>>,
    ) -> Result<Self, RegistryError> {
        let mut options = jsonschema::options();
        options
            .with_draft(Draft::Draft202012)
            .with_retriever(LocalSchemaRetriever { schemas_by_uri });

        let validator = options
            .build(&document)
            .map_err(|e| RegistryError::Compile {
                schema: file_name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            name,
            file_name,
            document,
            validator,
        })
    }

    /// Registry name of the schema.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name the schema was loaded from.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The parsed schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate `document` against this schema.
    pub fn validate(&self, document: &Value) -> ValidationOutcome {
        validate(self, document)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("file_name", &self.file_name)
            .finish_non_exhaustive()
    }
}

/// Registry name for a schema file: its first dot-separated segment.
pub fn schema_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Read-only mapping from schema name to compiled [`Schema`].
///
/// `SchemaRegistry` is `Send + Sync`. Iteration is ordered by name.
#[derive(Debug)]
pub struct SchemaRegistry {
    schema_dir: PathBuf,
    schemas: BTreeMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Load every `*.json` schema in `schema_dir`.
    ///
    /// Files are read in sorted file-name order. Hidden files and
    /// subdirectories are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the directory or any schema file cannot
    /// be read, a file is not valid JSON, or a schema fails to compile.
    pub fn load(schema_dir: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let schema_dir = schema_dir.as_ref().to_path_buf();
        let read_dir_err = |source| RegistryError::ReadDir {
            dir: schema_dir.clone(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&schema_dir).map_err(read_dir_err)? {
            let path = entry.map_err(read_dir_err)?.path();
            let is_schema_file = path.is_file()
                && path.extension().is_some_and(|ext| ext == "json")
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| !n.starts_with('.'));
            if is_schema_file {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents: Vec<(String, PathBuf, Value)> = Vec::with_capacity(paths.len());
        for path in paths {
            let content = std::fs::read_to_string(&path).map_err(|source| {
                RegistryError::ReadFile {
                    path: path.clone(),
                    source,
                }
            })?;
            let value: Value = serde_json::from_str(&content).map_err(|source| {
                RegistryError::InvalidJson {
                    path: path.clone(),
                    source,
                }
            })?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            documents.push((file_name, path, value));
        }

        let mut schemas_by_uri: HashMap<String, Value> = HashMap::new();
        for (file_name, _, value) in &documents {
            if let Some(id) = value.get("$id").and_then(Value::as_str) {
                schemas_by_uri.insert(id.to_string(), value.clone());
            }
            schemas_by_uri.insert(file_name.clone(), value.clone());
        }
        let schemas_by_uri = Arc::new(schemas_by_uri);

        let mut schemas: BTreeMap<String, Arc<Schema>> = BTreeMap::new();
        for (file_name, path, value) in documents {
            let name = schema_name(&file_name).to_string();
            let schema = Arc::new(Schema::compile(
                name.clone(),
                file_name,
                value,
                Arc::clone(&schemas_by_uri),
            )?);
            tracing::debug!(schema = %name, path = %path.display(), "compiled schema");

            if let Some(previous) = schemas.insert(name.clone(), Arc::clone(&schema)) {
                tracing::warn!(
                    schema = %name,
                    kept = %schema.file_name(),
                    replaced = %previous.file_name(),
                    "duplicate schema name; the later file wins"
                );
            }
        }

        tracing::info!(
            schema_count = schemas.len(),
            dir = %schema_dir.display(),
            "loaded schema registry"
        );

        Ok(Self {
            schema_dir,
            schemas,
        })
    }

    /// Directory the registry was loaded from.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Look up a schema by name.
    pub fn lookup(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if the directory held no schemas.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Schema names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Iterate schemas in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.values()
    }
}
