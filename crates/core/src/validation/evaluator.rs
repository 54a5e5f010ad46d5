//! Schema evaluator -- pure logic, no I/O.
//!
//! The returned payload is rebuilt from declared fields only, so undeclared
//! keys never survive validation (at any object depth).

use serde_json::Value;
use validator::{ValidateEmail, ValidateUrl};

use super::field_errors::FieldErrors;
use super::rules::{Check, FieldKind, FieldSpec};
use super::schema::{ObjectSchema, PayloadKind, Schema};
use crate::error::CoreError;
use crate::types::JsonObject;

/// Validate `payload` against `schema`, returning the pruned payload.
///
/// - object schema + JSON object: every declared field is checked and all
///   failing fields are reported.
/// - array schema + JSON array: elements are checked in order; the first
///   failing element fails the call.
/// - any other combination: [`CoreError::UnsupportedPayload`].
pub fn validate(schema: &Schema, payload: Value) -> Result<Value, CoreError> {
    match (schema, payload) {
        (Schema::Object(object), Value::Object(input)) => match validate_object(object, input) {
            Ok(output) => Ok(Value::Object(output)),
            Err(ObjectFault::Fields(issues)) => Err(CoreError::Validation(into_field_errors(issues))),
            Err(ObjectFault::Schema(msg)) => Err(CoreError::Schema(msg)),
        },
        (Schema::Array(items), Value::Array(elements)) => validate_elements(items, elements),
        (schema, other) => Err(CoreError::UnsupportedPayload {
            expected: schema.kind(),
            found: PayloadKind::of(&other),
        }),
    }
}

/// A field failure with its path below the reporting field.
#[derive(Debug)]
struct Issue {
    path: Vec<String>,
    message: String,
}

impl Issue {
    fn new(message: String) -> Self {
        Self {
            path: Vec::new(),
            message,
        }
    }

    fn within(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }

    fn render(&self) -> String {
        if self.path.is_empty() {
            self.message.clone()
        } else {
            format!("{}: {}", self.path.join("."), self.message)
        }
    }
}

#[derive(Debug)]
enum Fault {
    Invalid(Issue),
    Schema(String),
}

#[derive(Debug)]
enum ObjectFault {
    Fields(Vec<(String, Issue)>),
    Schema(String),
}

fn into_field_errors(issues: Vec<(String, Issue)>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (field, issue) in issues {
        errors.insert_first(field, issue.render());
    }
    errors
}

fn validate_elements(items: &FieldSpec, elements: Vec<Value>) -> Result<Value, CoreError> {
    let mut output = Vec::with_capacity(elements.len());

    for (index, element) in elements.into_iter().enumerate() {
        let checked = match (&items.kind, element) {
            (FieldKind::Object { schema }, Value::Object(input)) => {
                match validate_object(schema, input) {
                    Ok(object) => Value::Object(object),
                    Err(ObjectFault::Fields(issues)) => {
                        return Err(CoreError::Validation(into_field_errors(issues)))
                    }
                    Err(ObjectFault::Schema(msg)) => return Err(CoreError::Schema(msg)),
                }
            }
            (_, element) => match check_present(items, element) {
                Ok(value) => value,
                Err(Fault::Invalid(issue)) => {
                    let mut errors = FieldErrors::new();
                    errors.insert_first(index.to_string(), issue.render());
                    return Err(CoreError::Validation(errors));
                }
                Err(Fault::Schema(msg)) => return Err(CoreError::Schema(msg)),
            },
        };
        output.push(checked);
    }

    Ok(Value::Array(output))
}

fn validate_object(schema: &ObjectSchema, mut input: JsonObject) -> Result<JsonObject, ObjectFault> {
    let mut output = JsonObject::new();
    let mut issues = Vec::new();

    for (name, spec) in schema.fields() {
        match check_field(spec, input.remove(name)) {
            Ok(Some(value)) => {
                output.insert(name.to_string(), value);
            }
            Ok(None) => {}
            Err(Fault::Invalid(issue)) => issues.push((name.to_string(), issue)),
            Err(Fault::Schema(msg)) => return Err(ObjectFault::Schema(msg)),
        }
    }

    if issues.is_empty() {
        Ok(output)
    } else {
        Err(ObjectFault::Fields(issues))
    }
}

/// Check a possibly absent field. `Ok(None)` means "leave it out".
fn check_field(spec: &FieldSpec, value: Option<Value>) -> Result<Option<Value>, Fault> {
    match value {
        Some(value) => check_present(spec, value).map(Some),
        None => match (&spec.default, spec.required) {
            (Some(default), _) => Ok(Some(default.clone())),
            (None, false) => Ok(None),
            (None, true) => Err(invalid(spec.message.as_deref(), "Required".to_string())),
        },
    }
}

fn check_present(spec: &FieldSpec, value: Value) -> Result<Value, Fault> {
    if value.is_null() && spec.nullable {
        return Ok(value);
    }

    if !spec.kind.accepts(&value) {
        let fallback = format!(
            "Expected {}, received {}",
            spec.kind.name(),
            PayloadKind::of(&value)
        );
        return Err(invalid(spec.message.as_deref(), fallback));
    }

    for rule in &spec.rules {
        if let Some(fallback) = evaluate_check(&rule.check, &value)? {
            return Err(invalid(rule.message.as_deref(), fallback));
        }
    }

    match (&spec.kind, value) {
        (FieldKind::Object { schema }, Value::Object(input)) => match validate_object(schema, input) {
            Ok(output) => Ok(Value::Object(output)),
            Err(ObjectFault::Fields(mut issues)) => {
                let (field, issue) = issues.remove(0);
                Err(Fault::Invalid(issue.within(field)))
            }
            Err(ObjectFault::Schema(msg)) => Err(Fault::Schema(msg)),
        },
        (FieldKind::Array { items }, Value::Array(elements)) => {
            let mut output = Vec::with_capacity(elements.len());
            for (index, element) in elements.into_iter().enumerate() {
                match check_present(items, element) {
                    Ok(value) => output.push(value),
                    Err(Fault::Invalid(issue)) => {
                        return Err(Fault::Invalid(issue.within(index.to_string())))
                    }
                    Err(fault) => return Err(fault),
                }
            }
            Ok(Value::Array(output))
        }
        (_, value) => Ok(value),
    }
}

fn invalid(custom: Option<&str>, fallback: String) -> Fault {
    let message = custom.map(str::to_string).unwrap_or(fallback);
    Fault::Invalid(Issue::new(message))
}

/// Evaluate one constraint. Returns the built-in message on violation.
/// Checks that do not apply to the value's type pass.
fn evaluate_check(check: &Check, value: &Value) -> Result<Option<String>, Fault> {
    let violation = match check {
        Check::MinLength(min) => match value {
            Value::String(s) if s.chars().count() < *min => {
                Some(format!("Must be at least {min} characters"))
            }
            Value::Array(items) if items.len() < *min => {
                Some(format!("Must contain at least {min} items"))
            }
            _ => None,
        },
        Check::MaxLength(max) => match value {
            Value::String(s) if s.chars().count() > *max => {
                Some(format!("Must be at most {max} characters"))
            }
            Value::Array(items) if items.len() > *max => {
                Some(format!("Must contain at most {max} items"))
            }
            _ => None,
        },
        Check::Min(min) => value
            .as_f64()
            .filter(|n| n < min)
            .map(|_| format!("Must be greater than or equal to {min}")),
        Check::Max(max) => value
            .as_f64()
            .filter(|n| n > max)
            .map(|_| format!("Must be less than or equal to {max}")),
        Check::OneOf(allowed) => {
            if allowed.contains(value) {
                None
            } else {
                let listed: Vec<String> = allowed.iter().map(display_value).collect();
                Some(format!("Must be one of: {}", listed.join(", ")))
            }
        }
        Check::Pattern(pattern) => match value.as_str() {
            Some(s) => {
                let re = pattern.regex().map_err(|e| {
                    Fault::Schema(format!("invalid pattern `{}`: {e}", pattern.as_str()))
                })?;
                (!re.is_match(s)).then(|| "Invalid format".to_string())
            }
            None => None,
        },
        Check::Email => value
            .as_str()
            .filter(|s| !s.validate_email())
            .map(|_| "Invalid email address".to_string()),
        Check::Url => value
            .as_str()
            .filter(|s| !s.validate_url())
            .map(|_| "Invalid URL".to_string()),
    };
    Ok(violation)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn round_schema() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .field("token", FieldSpec::string().min_len(1))
                .field(
                    "user",
                    FieldSpec::string().max_len(10).message("Answer is too long"),
                )
                .field("attempt", FieldSpec::integer().min(1.0).default_value(1)),
        )
    }

    fn field_errors(result: Result<Value, CoreError>) -> FieldErrors {
        match result {
            Err(CoreError::Validation(errors)) => errors,
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn valid_object_is_pruned_to_declared_fields() {
        let payload = json!({"token": "t", "user": "hi", "attempt": 2, "admin": true});
        let output = validate(&round_schema(), payload).unwrap();
        assert_eq!(output, json!({"token": "t", "user": "hi", "attempt": 2}));
    }

    #[test]
    fn default_is_substituted_for_absent_field() {
        let output = validate(&round_schema(), json!({"token": "t", "user": "hi"})).unwrap();
        assert_eq!(output["attempt"], 1);
    }

    #[test]
    fn optional_absent_field_is_left_out() {
        let schema = Schema::object(
            ObjectSchema::new()
                .field("a", FieldSpec::string())
                .field("b", FieldSpec::string().optional()),
        );
        let output = validate(&schema, json!({"a": "x"})).unwrap();
        assert_eq!(output, json!({"a": "x"}));
    }

    #[test]
    fn missing_required_field_is_reported() {
        let errors = field_errors(validate(&round_schema(), json!({"user": "hi"})));
        assert_eq!(errors.get("token"), Some("Required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn every_failing_field_is_reported_with_first_message() {
        let errors = field_errors(validate(
            &round_schema(),
            json!({"token": "", "user": "far too long answer", "attempt": 0}),
        ));
        assert_eq!(errors.get("token"), Some("Must be at least 1 characters"));
        assert_eq!(errors.get("user"), Some("Answer is too long"));
        assert_eq!(errors.get("attempt"), Some("Must be greater than or equal to 1"));
    }

    #[test]
    fn type_mismatch_reports_expected_and_received() {
        let errors = field_errors(validate(
            &round_schema(),
            json!({"token": 5, "user": "hi"}),
        ));
        assert_eq!(errors.get("token"), Some("Expected string, received number"));
    }

    #[test]
    fn null_is_rejected_unless_nullable() {
        let schema = Schema::object(
            ObjectSchema::new()
                .field("a", FieldSpec::string())
                .field("b", FieldSpec::string().nullable()),
        );
        let errors = field_errors(validate(&schema, json!({"a": null, "b": null})));
        assert_eq!(errors.get("a"), Some("Expected string, received null"));
        assert!(!errors.contains("b"));
    }

    #[test]
    fn custom_type_message_is_used() {
        let schema = Schema::object(
            ObjectSchema::new().field("age", FieldSpec::integer().message("Age must be a number")),
        );
        let errors = field_errors(validate(&schema, json!({"age": "ten"})));
        assert_eq!(errors.get("age"), Some("Age must be a number"));
    }

    #[test]
    fn empty_custom_message_falls_back_to_invalid_value() {
        let schema = Schema::object(
            ObjectSchema::new().field("a", FieldSpec::string().min_len(3).message("")),
        );
        let errors = field_errors(validate(&schema, json!({"a": "x"})));
        assert_eq!(errors.get("a"), Some("Invalid value"));
    }

    #[test]
    fn enum_email_and_url_checks() {
        let schema = Schema::object(
            ObjectSchema::new()
                .field("status", FieldSpec::string().one_of(["pending", "done"]))
                .field("email", FieldSpec::string().email())
                .field("site", FieldSpec::string().url()),
        );
        let ok = json!({"status": "done", "email": "a@example.com", "site": "https://example.com"});
        assert!(validate(&schema, ok).is_ok());

        let errors = field_errors(validate(
            &schema,
            json!({"status": "lost", "email": "nope", "site": "not a url"}),
        ));
        assert_eq!(errors.get("status"), Some("Must be one of: pending, done"));
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert_eq!(errors.get("site"), Some("Invalid URL"));
    }

    #[test]
    fn nested_object_is_validated_and_pruned() {
        let schema = Schema::object(ObjectSchema::new().field(
            "flags",
            FieldSpec::object(
                ObjectSchema::new()
                    .field("cheatingScore", FieldSpec::number())
                    .field("unclearScore", FieldSpec::number()),
            ),
        ));

        let output = validate(
            &schema,
            json!({"flags": {"cheatingScore": 0.1, "unclearScore": 0.2, "extra": 1}}),
        )
        .unwrap();
        assert_eq!(output, json!({"flags": {"cheatingScore": 0.1, "unclearScore": 0.2}}));

        let errors = field_errors(validate(&schema, json!({"flags": {"cheatingScore": 0.1}})));
        assert_eq!(errors.get("flags"), Some("unclearScore: Required"));
    }

    #[test]
    fn nested_array_reports_element_path() {
        let schema = Schema::object(
            ObjectSchema::new().field("rounds", FieldSpec::array(FieldSpec::string()).max_len(3)),
        );
        let errors = field_errors(validate(&schema, json!({"rounds": ["a", 2]})));
        assert_eq!(errors.get("rounds"), Some("1: Expected string, received number"));

        let errors = field_errors(validate(&schema, json!({"rounds": ["a", "b", "c", "d"]})));
        assert_eq!(errors.get("rounds"), Some("Must contain at most 3 items"));
    }

    #[test]
    fn array_schema_fails_when_any_element_fails() {
        let schema = ObjectSchema::new().field("a", FieldSpec::number()).array();
        let errors = field_errors(validate(&schema, json!([{"a": 1}, {"a": "bad"}])));
        assert_eq!(errors.get("a"), Some("Expected number, received string"));
    }

    #[test]
    fn array_schema_prunes_valid_elements() {
        let schema = ObjectSchema::new().field("a", FieldSpec::number()).array();
        let output = validate(&schema, json!([{"a": 1, "b": 2}, {"a": 3}])).unwrap();
        assert_eq!(output, json!([{"a": 1}, {"a": 3}]));
    }

    #[test]
    fn array_of_scalars_reports_failing_index() {
        let schema = Schema::array(FieldSpec::integer());
        let errors = field_errors(validate(&schema, json!([1, 2, "three"])));
        assert_eq!(errors.get("2"), Some("Expected integer, received string"));
    }

    #[test]
    fn kind_mismatch_is_unsupported_payload() {
        let object = round_schema();
        assert_matches!(
            validate(&object, json!([1, 2])),
            Err(CoreError::UnsupportedPayload { found: PayloadKind::Array, .. })
        );
        assert_matches!(
            validate(&object, Value::Null),
            Err(CoreError::UnsupportedPayload { found: PayloadKind::Null, .. })
        );

        let array = Schema::array(FieldSpec::string());
        assert_matches!(
            validate(&array, json!({"a": 1})),
            Err(CoreError::UnsupportedPayload { found: PayloadKind::Object, .. })
        );
    }

    #[test]
    fn invalid_pattern_is_a_schema_error() {
        let schema = Schema::object(ObjectSchema::new().field("a", FieldSpec::string().pattern("(")));
        assert_matches!(validate(&schema, json!({"a": "x"})), Err(CoreError::Schema(_)));
    }

    #[test]
    fn pattern_mismatch_is_a_field_error() {
        let schema = Schema::object(
            ObjectSchema::new().field("code", FieldSpec::string().pattern("^[A-Z]{3}$")),
        );
        let errors = field_errors(validate(&schema, json!({"code": "abc"})));
        assert_eq!(errors.get("code"), Some("Invalid format"));
    }
}
