use crate::error::{LookupError, Result};
use crate::minecraft::dto::lenient;
use crate::minecraft::dto::minecraft_profile::{ProfileDocument, TextureInfo, TexturesData};
use chrono::{DateTime, Utc};
use log::debug;
use serde_json::Value;

const TEXTURES_PROPERTY: &str = "textures";

/// `timestamp` of the first property, in epoch milliseconds.
pub fn last_skin_change_timestamp(profile: &ProfileDocument) -> Result<i64> {
    let first = profile.properties.first().ok_or_else(|| {
        LookupError::Format(format!("profile {} has no properties", profile.uuid))
    })?;

    first
        .decoded_value
        .get("timestamp")
        .and_then(lenient::millis_from_value)
        .ok_or_else(|| {
            LookupError::Format(format!(
                "property '{}' of profile {} has no timestamp",
                first.name, profile.uuid
            ))
        })
}

pub fn last_skin_change_time(profile: &ProfileDocument) -> Result<DateTime<Utc>> {
    let millis = last_skin_change_timestamp(profile)?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| LookupError::Format(format!("timestamp {} is out of range", millis)))
}

/// A single field of the decoded `textures` property, e.g. `timestamp`,
/// `profileId`, `profileName`, `isPublic` or `textures`.
pub fn texture_info<'a>(profile: &'a ProfileDocument, key: &str) -> Result<&'a Value> {
    let property = profile.property(TEXTURES_PROPERTY).ok_or_else(|| {
        LookupError::Format(format!("profile {} has no textures property", profile.uuid))
    })?;

    property.decoded_value.get(key).ok_or_else(|| {
        LookupError::Format(format!(
            "textures of profile {} have no field '{}'",
            profile.uuid, key
        ))
    })
}

/// Typed view of the `textures` property.
pub fn textures(profile: &ProfileDocument) -> Result<TexturesData> {
    let property = profile.property(TEXTURES_PROPERTY).ok_or_else(|| {
        LookupError::Format(format!("profile {} has no textures property", profile.uuid))
    })?;

    serde_json::from_value(Value::Object(property.decoded_value.clone())).map_err(|e| {
        LookupError::Format(format!(
            "textures of profile {} are malformed: {}",
            profile.uuid, e
        ))
    })
}

fn texture<F>(profile: &ProfileDocument, pick: F) -> Option<TextureInfo>
where
    F: FnOnce(TexturesData) -> Option<TextureInfo>,
{
    match textures(profile) {
        Ok(data) => pick(data),
        Err(e) => {
            debug!("[Profile Utils] {}", e);
            None
        }
    }
}

pub fn skin_url(profile: &ProfileDocument) -> Option<String> {
    texture(profile, |data| data.textures.skin).map(|info| info.url)
}

pub fn cape_url(profile: &ProfileDocument) -> Option<String> {
    texture(profile, |data| data.textures.cape).map(|info| info.url)
}

/// "slim" or "default". Skins without metadata use the default model.
pub fn skin_model(profile: &ProfileDocument) -> Option<String> {
    texture(profile, |data| data.textures.skin).map(|info| {
        info.metadata
            .and_then(|meta| meta.model)
            .unwrap_or_else(|| "default".to_string())
    })
}
