use super::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A player profile as returned by Mojang's session server, with every
/// property value already decoded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileDocument {
    /// Player UUID (without hyphens)
    pub uuid: String,
    /// Player username, when the service sent one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Properties in the order the service sent them
    pub properties: Vec<ProfileProperty>,
}

impl ProfileDocument {
    pub fn property(&self, name: &str) -> Option<&ProfileProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A property of a profile, typically `textures`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileProperty {
    pub name: String,
    /// Base64 text as received
    pub raw_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// JSON object carried inside `raw_value`
    pub decoded_value: Map<String, Value>,
}

/// Wire shape of `GET /session/minecraft/profile/{uuid}`
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileResponse {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    pub properties: Vec<Value>,
}

/// One element of `properties` before decoding
#[derive(Debug, Deserialize)]
pub(crate) struct PropertyRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    pub value: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub signature: Option<String>,
}

/// Decoded `textures` property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TexturesData {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub profile_id: String,
    pub profile_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub textures: TexturesDictionary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TexturesDictionary {
    #[serde(rename = "SKIN", default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<TextureInfo>,
    #[serde(rename = "CAPE", default, skip_serializing_if = "Option::is_none")]
    pub cape: Option<TextureInfo>,
}

/// A skin or cape texture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub url: String,
    /// Only present for slim skins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TextureMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureMetadata {
    /// "slim" or "default"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_textures_data_from_session_payload() {
        let payload = json!({
            "timestamp": 1_650_000_000_000_i64,
            "profileId": "069a79f444e94726a5befca90e38aaf5",
            "profileName": "Notch",
            "textures": {
                "SKIN": {
                    "url": "http://textures.minecraft.net/texture/abc",
                    "metadata": { "model": "slim" }
                }
            }
        });

        let data: TexturesData = serde_json::from_value(payload).unwrap();
        assert_eq!(data.profile_name, "Notch");
        assert!(data.textures.cape.is_none());
        let skin = data.textures.skin.unwrap();
        assert_eq!(skin.metadata.unwrap().model.as_deref(), Some("slim"));
    }

    #[test]
    fn test_property_lookup_by_name() {
        let document = ProfileDocument {
            uuid: "069a79f444e94726a5befca90e38aaf5".to_string(),
            name: Some("Notch".to_string()),
            properties: vec![ProfileProperty {
                name: "textures".to_string(),
                raw_value: "e30=".to_string(),
                signature: None,
                decoded_value: Map::new(),
            }],
        };
        assert!(document.property("textures").is_some());
        assert!(document.property("capes").is_none());
    }
}
