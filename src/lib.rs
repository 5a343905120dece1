pub mod config;
pub mod error;
pub mod logging;
pub mod minecraft;
pub mod utils;

pub use config::ClientConfig;
pub use error::{ErrorKind, ErrorReport, LookupError, Result};
pub use minecraft::dto::{
    NameHistoryEntry, PlayerIdentity, PlayerReport, ProfileDocument, ProfileProperty,
};
pub use minecraft::PlayerDirectoryClient;
