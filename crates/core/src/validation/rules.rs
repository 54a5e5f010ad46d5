//! Field descriptors: kind, presence, constraints, defaults.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::ObjectSchema;

/// Structural type a field value must have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    /// Accepts any non-null JSON value.
    Any,
    Array {
        items: Box<FieldSpec>,
    },
    Object {
        schema: ObjectSchema,
    },
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Any => "any",
            Self::Array { .. } => "array",
            Self::Object { .. } => "object",
        }
    }

    pub(crate) fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.as_f64().is_some_and(|n| n.fract() == 0.0),
            Self::Boolean => value.is_boolean(),
            Self::Any => !value.is_null(),
            Self::Array { .. } => value.is_array(),
            Self::Object { .. } => value.is_object(),
        }
    }
}

/// A single constraint. Length checks count characters for strings and items
/// for arrays; numeric bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "value", rename_all = "snake_case")]
pub enum Check {
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    OneOf(Vec<Value>),
    Pattern(Pattern),
    Email,
    Url,
}

/// A regular expression check. Compiled on first use; clones share the
/// compiled form. Serialized as its source string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Pattern {
    source: String,
    compiled: Arc<OnceLock<Result<Regex, regex::Error>>>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: Arc::new(OnceLock::new()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> Result<&Regex, &regex::Error> {
        self.compiled
            .get_or_init(|| Regex::new(&self.source))
            .as_ref()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.source
    }
}

/// A constraint plus the message reported when it fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub check: Check,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Everything the validator needs to know about one field.
///
/// Built fluently:
///
/// ```
/// use aiview_core::validation::FieldSpec;
///
/// let title = FieldSpec::string()
///     .min_len(1)
///     .max_len(120)
///     .message("Title is too long")
///     .describe("Human readable interview title");
/// assert!(title.required);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub kind: FieldKind,
    #[serde(default = "required_by_default")]
    pub required: bool,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Documentation for downstream consumers; never read by the validator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Message for presence and type failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn required_by_default() -> bool {
    true
}

impl FieldSpec {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            nullable: false,
            rules: Vec::new(),
            default: None,
            description: None,
            message: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn any() -> Self {
        Self::new(FieldKind::Any)
    }

    pub fn array(items: FieldSpec) -> Self {
        Self::new(FieldKind::Array {
            items: Box::new(items),
        })
    }

    pub fn object(schema: ObjectSchema) -> Self {
        Self::new(FieldKind::Object { schema })
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Value substituted when the field is absent. Implies optional.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn rule(mut self, check: Check) -> Self {
        self.rules.push(Rule {
            check,
            message: None,
        });
        self
    }

    /// Set the message of the most recently added rule, or the presence/type
    /// message when no rule has been added yet.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        let message = Some(message.into());
        match self.rules.last_mut() {
            Some(rule) => rule.message = message,
            None => self.message = message,
        }
        self
    }

    pub fn min_len(self, min: usize) -> Self {
        self.rule(Check::MinLength(min))
    }

    pub fn max_len(self, max: usize) -> Self {
        self.rule(Check::MaxLength(max))
    }

    pub fn min(self, min: f64) -> Self {
        self.rule(Check::Min(min))
    }

    pub fn max(self, max: f64) -> Self {
        self.rule(Check::Max(max))
    }

    pub fn one_of<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rule(Check::OneOf(values.into_iter().map(Into::into).collect()))
    }

    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.rule(Check::Pattern(Pattern::new(pattern)))
    }

    pub fn email(self) -> Self {
        self.rule(Check::Email)
    }

    pub fn url(self) -> Self {
        self.rule(Check::Url)
    }
}
