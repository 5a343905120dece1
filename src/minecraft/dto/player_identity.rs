use super::lenient;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One point-in-time answer of the identity service for a player name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    /// Name in the casing the service uses
    pub name: String,
    /// Player UUID (without hyphens), exactly as received
    pub uuid: String,
    /// Account predates the Mojang account migration
    pub legacy: bool,
    /// Account never bought the game
    pub demo: bool,
}

impl PlayerIdentity {
    /// The UUID in 8-4-4-4-12 form, if the service returned a valid one.
    pub fn hyphenated_uuid(&self) -> Option<String> {
        Uuid::parse_str(&self.uuid)
            .ok()
            .map(|uuid| uuid.hyphenated().to_string())
    }
}

/// Wire shape of `GET /users/profiles/minecraft/{name}`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdentityResponse {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub legacy: Option<bool>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub demo: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphenated_uuid() {
        let identity = PlayerIdentity {
            name: "Notch".to_string(),
            uuid: "069a79f444e94726a5befca90e38aaf5".to_string(),
            legacy: false,
            demo: false,
        };
        assert_eq!(
            identity.hyphenated_uuid().as_deref(),
            Some("069a79f4-44e9-4726-a5be-fca90e38aaf5")
        );

        let odd = PlayerIdentity {
            uuid: "not-a-uuid".to_string(),
            ..identity
        };
        assert!(odd.hyphenated_uuid().is_none());
    }

    #[test]
    fn test_wrong_typed_flag_does_not_break_record() {
        let response: IdentityResponse = serde_json::from_str(
            r#"{"id":"069a79f444e94726a5befca90e38aaf5","name":"Notch","legacy":"maybe","demo":7}"#,
        )
        .unwrap();
        assert_eq!(response.name.as_deref(), Some("Notch"));
        assert!(response.legacy.is_none());
        assert!(response.demo.is_none());
    }
}
