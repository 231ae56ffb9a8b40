//! Wire DTOs for the preference endpoint.

use perch_core::error::{PerchError, Result};
use perch_core::preference::{DisplayAnchor, PreferenceRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by the preference endpoint after a save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: bool,
}

/// Decodes a preference payload into records.
///
/// The payload must be a JSON array. Entries that are not valid records
/// (missing `model_path`, non-numeric geometry, `null`, ...) are skipped so one
/// bad entry does not hide every other preference. An unusable `display` is
/// dropped and non-numeric `parameters` values are removed; the rest of the
/// entry still decodes.
pub fn decode_records(payload: Value) -> Result<Vec<PreferenceRecord>> {
    let Value::Array(entries) = payload else {
        return Err(PerchError::Serialization {
            format: "JSON".to_string(),
            message: "preference payload is not an array".to_string(),
        });
    };

    let total = entries.len();
    let records: Vec<PreferenceRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, mut entry)| {
            strip_unusable_optionals(index, &mut entry);
            match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::debug!("[Preferences] Skipping entry #{}: {}", index, e);
                    None
                }
            }
        })
        .collect();

    if records.len() < total {
        tracing::warn!(
            "[Preferences] Skipped {} malformed preference entries",
            total - records.len()
        );
    }

    Ok(records)
}

/// Removes optional fields that would otherwise fail the whole entry.
fn strip_unusable_optionals(index: usize, entry: &mut Value) {
    let Value::Object(fields) = entry else {
        return;
    };

    let bad_display = fields.get("display").is_some_and(|display| {
        !display.is_null() && serde_json::from_value::<DisplayAnchor>(display.clone()).is_err()
    });
    if bad_display {
        tracing::debug!("[Preferences] Ignoring unusable display of entry #{}", index);
        fields.remove("display");
    }

    match fields.get_mut("parameters") {
        Some(Value::Object(parameters)) => {
            let before = parameters.len();
            parameters.retain(|_, value| value.as_f64().is_some());
            if parameters.len() < before {
                tracing::debug!(
                    "[Preferences] Dropped {} non-numeric parameter(s) of entry #{}",
                    before - parameters.len(),
                    index
                );
            }
        }
        Some(Value::Null) | None => {}
        Some(_) => {
            tracing::debug!("[Preferences] Ignoring unusable parameters of entry #{}", index);
            fields.remove("parameters");
        }
    }
}
