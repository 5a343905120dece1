use crate::error::{LookupError, Result};
use crate::minecraft::dto::minecraft_profile::{
    ProfileDocument, ProfileProperty, ProfileResponse, PropertyRecord,
};
use crate::minecraft::dto::lenient;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use log::{debug, error};
use serde_json::{Map, Value};

/// Standard alphabet; trailing `=` padding may be present or not.
const PROPERTY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes a base64 property value into the JSON object it carries.
pub fn decode_property_value(raw: &str) -> Result<Map<String, Value>> {
    let bytes = PROPERTY_ENGINE.decode(raw).map_err(|e| {
        error!("[MC Utils] Failed to decode property base64: {}", e);
        LookupError::PlayerNotFound(format!("property value is not valid base64: {}", e))
    })?;

    let text = String::from_utf8(bytes).map_err(|e| {
        error!("[MC Utils] Decoded property is not UTF-8: {}", e);
        LookupError::PlayerNotFound(format!("property value is not UTF-8 text: {}", e))
    })?;

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => {
            error!("[MC Utils] Decoded property is not a JSON object: {}", other);
            Err(LookupError::PlayerNotFound(
                "property value is not a JSON object".to_string(),
            ))
        }
        Err(e) => {
            error!("[MC Utils] Failed to parse property JSON: {}\nJSON: {}", e, text);
            Err(LookupError::PlayerNotFound(format!(
                "property value is not JSON: {}",
                e
            )))
        }
    }
}

/// Inverse of [`decode_property_value`], padded standard base64.
pub fn encode_property_value(value: &Map<String, Value>) -> String {
    base64::engine::general_purpose::STANDARD.encode(Value::Object(value.clone()).to_string())
}

fn decode_property(value: Value) -> Result<ProfileProperty> {
    let record: PropertyRecord = lenient::object(value).ok_or_else(|| {
        LookupError::PlayerNotFound("profile property has no string `value`".to_string())
    })?;

    let decoded_value = decode_property_value(&record.value)?;
    Ok(ProfileProperty {
        name: record.name.unwrap_or_default(),
        raw_value: record.value,
        signature: record.signature,
        decoded_value,
    })
}

/// Builds a [`ProfileDocument`] out of a session server body, decoding every
/// property. Any shape violation is reported as a missing player.
pub fn decode_profile(body: &str, requested_uuid: &str) -> Result<ProfileDocument> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        debug!("[MC Utils] Profile body for {} is not JSON: {}", requested_uuid, e);
        LookupError::PlayerNotFound(requested_uuid.to_string())
    })?;

    let response: ProfileResponse = lenient::object(value).ok_or_else(|| {
        debug!(
            "[MC Utils] Profile body for {} has no `properties` array",
            requested_uuid
        );
        LookupError::PlayerNotFound(requested_uuid.to_string())
    })?;

    let properties = response
        .properties
        .into_iter()
        .map(decode_property)
        .collect::<Result<Vec<_>>>()
        .map_err(|e| {
            debug!("[MC Utils] Profile {} failed to decode: {}", requested_uuid, e);
            LookupError::PlayerNotFound(requested_uuid.to_string())
        })?;

    debug!(
        "[MC Utils] Decoded {} properties for profile {}",
        properties.len(),
        requested_uuid
    );
    Ok(ProfileDocument {
        uuid: response.id.unwrap_or_else(|| requested_uuid.to_string()),
        name: response.name,
        properties,
    })
}
