pub mod lenient;
pub mod minecraft_profile;
pub mod name_history;
pub mod player_identity;
pub mod player_report;

pub use minecraft_profile::{ProfileDocument, ProfileProperty, TexturesData};
pub use name_history::NameHistoryEntry;
pub use player_identity::PlayerIdentity;
pub use player_report::PlayerReport;
