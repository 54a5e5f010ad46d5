//! Object and array schemas plus their composition operations.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::rules::FieldSpec;

/// Named fields in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectSchema {
    fields: IndexMap<String, FieldSpec>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a field.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Add every field of `other`; fields with the same name are replaced.
    pub fn extend(mut self, other: ObjectSchema) -> Self {
        self.fields.extend(other.fields);
        self
    }

    /// Every field becomes optional. Defaults are kept.
    pub fn partial(mut self) -> Self {
        for spec in self.fields.values_mut() {
            spec.required = false;
        }
        self
    }

    /// Keep only the named fields. Unknown names are ignored.
    pub fn pick(&self, names: &[&str]) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|(name, _)| names.contains(&name.as_str()))
                .map(|(name, spec)| (name.clone(), spec.clone()))
                .collect(),
        }
    }

    /// Drop the named fields.
    pub fn omit(&self, names: &[&str]) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|(name, _)| !names.contains(&name.as_str()))
                .map(|(name, spec)| (name.clone(), spec.clone()))
                .collect(),
        }
    }

    /// An array schema whose elements are objects of this shape.
    pub fn array(self) -> Schema {
        Schema::array(FieldSpec::object(self))
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Top-level request schema: either an object or an array of elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "schema", rename_all = "snake_case")]
pub enum Schema {
    Object(ObjectSchema),
    Array(Box<FieldSpec>),
}

impl Schema {
    pub fn object(schema: ObjectSchema) -> Self {
        Self::Object(schema)
    }

    pub fn array(items: FieldSpec) -> Self {
        Self::Array(Box::new(items))
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::Object(_) => SchemaKind::Object,
            Self::Array(_) => SchemaKind::Array,
        }
    }
}

impl From<ObjectSchema> for Schema {
    fn from(schema: ObjectSchema) -> Self {
        Self::Object(schema)
    }
}

/// Structural kind of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Object,
    Array,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Object => "object",
            Self::Array => "array",
        })
    }
}

/// Structural kind of an incoming payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl PayloadKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interview() -> ObjectSchema {
        ObjectSchema::new()
            .field("title", FieldSpec::string())
            .field("duration", FieldSpec::integer())
            .field("notes", FieldSpec::string().optional())
    }

    #[test]
    fn extend_appends_and_replaces() {
        let extended = interview().extend(
            ObjectSchema::new()
                .field("token", FieldSpec::string())
                .field("duration", FieldSpec::number()),
        );
        let names: Vec<_> = extended.field_names().collect();
        assert_eq!(names, ["title", "duration", "notes", "token"]);
        assert_eq!(
            extended.get("duration").map(|f| f.kind.name()),
            Some("number")
        );
    }

    #[test]
    fn partial_makes_every_field_optional() {
        let partial = interview().partial();
        assert!(partial.fields().all(|(_, spec)| !spec.required));
    }

    #[test]
    fn pick_and_omit_select_subsets() {
        let picked = interview().pick(&["title", "missing"]);
        assert_eq!(picked.field_names().collect::<Vec<_>>(), ["title"]);

        let omitted = interview().omit(&["title"]);
        assert_eq!(
            omitted.field_names().collect::<Vec<_>>(),
            ["duration", "notes"]
        );
    }

    #[test]
    fn array_of_object_schema() {
        let schema = interview().array();
        assert_eq!(schema.kind(), SchemaKind::Array);
    }

    #[test]
    fn payload_kind_of_values() {
        assert_eq!(PayloadKind::of(&serde_json::json!(null)), PayloadKind::Null);
        assert_eq!(PayloadKind::of(&serde_json::json!([1])), PayloadKind::Array);
        assert_eq!(PayloadKind::of(&serde_json::json!("x")).to_string(), "string");
    }
}
