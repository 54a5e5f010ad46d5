use serde_json::Value;

/// An open, untyped JSON object. Default payload and metadata type everywhere
/// a caller does not pick a concrete one.
pub type JsonObject = serde_json::Map<String, Value>;
