use super::minecraft_profile::ProfileDocument;
use super::name_history::NameHistoryEntry;
use super::player_identity::PlayerIdentity;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a full lookup of one player produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerReport {
    pub identity: PlayerIdentity,
    pub name_history: Vec<NameHistoryEntry>,
    pub profile: ProfileDocument,
    /// `None` when the profile carries no usable timestamp
    pub last_skin_change: Option<DateTime<Utc>>,
    pub body_render_url: String,
}
