//! Field registry: the trusted mapping from logical field names to storage.
//!
//! Clients only ever name logical fields. Physical columns, joins and raw
//! SQL templates come from the registry, which is built once at startup
//! (in code or from a TOML file) and then only read.
//!
//! ```toml
//! [fields.name]
//! column = "users.name"
//! type = "string"
//!
//! [fields.team]
//! column = "teams.name"
//! type = "string"
//! join = "LEFT JOIN teams ON teams.id = users.team_id"
//!
//! [order.name]
//! column = "users.name"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strsim::levenshtein;
use thiserror::Error;

use crate::filter::{FilterError, FilterResult};

/// Maximum Levenshtein distance to consider a name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Value type of a field; selects coercion and validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Text.
    String,
    /// 64-bit integer.
    Int,
    /// Boolean.
    Bool,
    /// Date and time, `YYYY-MM-DD HH:MM:SS`.
    DateTime,
    /// Time of day, `HH:MM:SS`.
    Time,
}

impl FieldType {
    /// Returns the lowercase name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::DateTime => "datetime",
            FieldType::Time => "time",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a filterable field maps to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptor {
    /// Physical column, possibly table-qualified.
    pub column: String,

    /// Value type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Join clause the column needs, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,

    /// SQL template with `?` placeholders that replaces type-based
    /// compilation. Only the `in` operator is accepted for such fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_sql: Option<String>,
}

impl FieldDescriptor {
    /// Creates a descriptor for a plain column.
    pub fn new(column: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            column: column.into(),
            field_type,
            join: None,
            raw_sql: None,
        }
    }

    /// Sets the join clause.
    pub fn with_join(mut self, join: impl Into<String>) -> Self {
        self.join = Some(join.into());
        self
    }

    /// Sets the raw SQL template.
    pub fn with_raw_sql(mut self, template: impl Into<String>) -> Self {
        self.raw_sql = Some(template.into());
        self
    }
}

/// How a sortable field maps to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderField {
    /// Physical column, possibly table-qualified.
    pub column: String,

    /// Join clause the column needs, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,
}

impl OrderField {
    /// Creates an order field for a plain column.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            join: None,
        }
    }

    /// Sets the join clause.
    pub fn with_join(mut self, join: impl Into<String>) -> Self {
        self.join = Some(join.into());
        self
    }
}

/// Errors that can occur while loading a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file '{path}': {source}")]
    Read {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The registry file is not valid TOML or has unknown keys.
    #[error("failed to parse registry: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field definition is inconsistent.
    #[error("invalid definition for field '{field}': {message}")]
    Invalid {
        /// The logical field name.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

/// The filter and order vocabularies exposed to clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldRegistry {
    #[serde(default)]
    fields: BTreeMap<String, FieldDescriptor>,

    #[serde(default)]
    order: BTreeMap<String, OrderField>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filterable field.
    pub fn with_field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }

    /// Adds a sortable field.
    pub fn with_order(mut self, name: impl Into<String>, field: OrderField) -> Self {
        self.order.insert(name.into(), field);
        self
    }

    /// Adds a field that is both filterable and sortable on the same column.
    pub fn with_sortable_field(self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        let name = name.into();
        let order = OrderField {
            column: descriptor.column.clone(),
            join: descriptor.join.clone(),
        };
        self.with_field(name.clone(), descriptor).with_order(name, order)
    }

    /// Parses a registry from TOML and validates it.
    pub fn from_toml_str(input: &str) -> Result<Self, RegistryError> {
        let registry: FieldRegistry = toml::from_str(input)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Loads a registry from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks that every definition is usable.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (name, descriptor) in &self.fields {
            if descriptor.column.trim().is_empty() {
                return Err(invalid(name, "column is empty"));
            }
            if let Some(template) = &descriptor.raw_sql {
                if !template.contains('?') {
                    return Err(invalid(name, "raw_sql has no '?' placeholder"));
                }
            }
        }
        for (name, field) in &self.order {
            if field.column.trim().is_empty() {
                return Err(invalid(name, "order column is empty"));
            }
        }
        Ok(())
    }

    /// Looks up a filterable field.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownColumn`, with a suggestion when a
    /// registered name is close.
    pub fn field(&self, name: &str) -> FilterResult<&FieldDescriptor> {
        self.fields.get(name).ok_or_else(|| {
            let suggestion = find_similar_name(name, self.fields.keys().map(String::as_str));
            FilterError::unknown_column(name, suggestion)
        })
    }

    /// Looks up a sortable field.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownOrderColumn`, with a suggestion when a
    /// registered name is close.
    pub fn order_field(&self, name: &str) -> FilterResult<&OrderField> {
        self.order.get(name).ok_or_else(|| {
            let suggestion = find_similar_name(name, self.order.keys().map(String::as_str));
            FilterError::unknown_order_column(name, suggestion)
        })
    }

    /// Returns the declared type of a filterable field, if registered.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).map(|d| d.field_type)
    }

    /// Iterates filterable fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates sortable fields in name order.
    pub fn order_fields(&self) -> impl Iterator<Item = (&str, &OrderField)> {
        self.order.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true when no fields of either kind are registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.order.is_empty()
    }
}

fn invalid(field: &str, message: &str) -> RegistryError {
    RegistryError::Invalid {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Finds the best matching name from a list of candidates using Levenshtein distance.
///
/// Returns the best match if its edit distance is within the threshold,
/// otherwise returns `None`.
pub(crate) fn find_similar_name<'a>(
    query: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .filter(|name| !name.is_empty())
        .map(|name| (name, levenshtein(&query_lower, &name.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}
