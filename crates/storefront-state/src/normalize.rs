//! Identifier normalization for documents leaving the store.
//!
//! Raw documents carry the store identifier under `_id`; callers see it as a
//! plain string under `id`. Normalizing an already-normalized document is a
//! no-op.

use serde_json::Value;

use crate::schema::RawDocument;
use crate::storage_traits::INTERNAL_ID_FIELD;

/// Field under which callers receive the document identifier.
pub const EXTERNAL_ID_FIELD: &str = "id";

/// Replace the internal identifier with its external string form.
pub fn normalize(mut raw: RawDocument) -> RawDocument {
    if let Some(internal) = raw.shift_remove(INTERNAL_ID_FIELD) {
        raw.insert(
            EXTERNAL_ID_FIELD.to_string(),
            Value::String(canonical_id(&internal)),
        );
    }
    raw
}

/// Normalize every document, keeping order.
pub fn normalize_all(docs: impl IntoIterator<Item = RawDocument>) -> Vec<RawDocument> {
    docs.into_iter().map(normalize).collect()
}

fn canonical_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // Extended-JSON object ids and table:key record ids
        Value::Object(map) => map
            .get("$oid")
            .or_else(|| map.get("id"))
            .map(canonical_id)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}
