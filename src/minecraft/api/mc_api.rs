use crate::config::ClientConfig;
use crate::error::{LookupError, Result};
use crate::minecraft::dto::lenient;
use crate::minecraft::dto::minecraft_profile::ProfileDocument;
use crate::minecraft::dto::name_history::{NameHistoryEntry, NameHistoryRecord};
use crate::minecraft::dto::player_identity::{IdentityResponse, PlayerIdentity};
use crate::minecraft::dto::player_report::PlayerReport;
use crate::utils::download_utils::{FetchedResource, HttpFetcher, ResourceFetcher};
use crate::utils::{mc_utils, profile_utils};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Client for the Mojang identity and session services.
///
/// Holds no mutable state; one instance can serve lookups from several
/// threads at once.
pub struct PlayerDirectoryClient<F: ResourceFetcher = HttpFetcher> {
    config: ClientConfig,
    fetcher: F,
}

impl PlayerDirectoryClient<HttpFetcher> {
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }
}

impl<F: ResourceFetcher> PlayerDirectoryClient<F> {
    pub fn with_fetcher(config: ClientConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    fn identity_url(&self, name: &str) -> String {
        format!(
            "{}/users/profiles/minecraft/{}",
            self.config.api_base_url,
            urlencoding::encode(name)
        )
    }

    fn name_history_url(&self, uuid: &str) -> String {
        format!("{}/user/profiles/{}/names", self.config.api_base_url, uuid)
    }

    fn profile_url(&self, uuid: &str) -> String {
        format!(
            "{}/session/minecraft/profile/{}",
            self.config.session_base_url, uuid
        )
    }

    /// URL of the full body render for a player, built from the uuid exactly
    /// as the identity service returned it.
    pub fn body_render_url(&self, uuid: &str) -> String {
        format!("{}/renders/body/{}", self.config.render_base_url, uuid)
    }

    /// Fetches `url`, turning rate limiting and server failures into network
    /// errors. Every other status is left for shape validation.
    fn get(&self, url: &str, timeout: Duration) -> Result<FetchedResource> {
        debug!("Request URL: {}", url);
        let resource = self.fetcher.fetch(url, timeout)?;

        if resource.status == 429 || resource.status >= 500 {
            error!("{} is unavailable (HTTP {})", url, resource.status);
            return Err(LookupError::UpstreamStatus {
                status: resource.status,
                url: url.to_string(),
            });
        }

        Ok(resource)
    }

    /// `None` when the body is not a JSON object.
    fn fetch_identity(&self, name: &str, timeout: Duration) -> Result<Option<IdentityResponse>> {
        let resource = self.get(&self.identity_url(name), timeout)?;

        let parsed = serde_json::from_slice::<Value>(&resource.body)
            .ok()
            .and_then(lenient::object::<IdentityResponse>);

        if parsed.is_none() {
            debug!(
                "Identity response for '{}' is not an object (status {}): {}",
                name,
                resource.status,
                resource.text()
            );
        }
        Ok(parsed)
    }

    /// Current name of a player, in the casing the service uses.
    pub fn resolve_current_name(&self, name: &str) -> Result<String> {
        debug!("API call: resolve_current_name for name: {}", name);
        self.fetch_identity(name, self.config.timeout)?
            .and_then(|response| response.name)
            .ok_or_else(|| LookupError::PlayerNotFound(name.to_string()))
    }

    /// UUID of a player without hyphens.
    pub fn resolve_uuid(&self, name: &str) -> Result<String> {
        debug!("API call: resolve_uuid for name: {}", name);
        self.fetch_identity(name, self.config.timeout)?
            .and_then(|response| response.id)
            .ok_or_else(|| LookupError::PlayerNotFound(name.to_string()))
    }

    /// `false` for Mojang accounts, unknown players and malformed responses.
    pub fn is_legacy_account(&self, name: &str) -> Result<bool> {
        debug!("API call: is_legacy_account for name: {}", name);
        Ok(self
            .fetch_identity(name, self.config.timeout)?
            .and_then(|response| response.legacy)
            .unwrap_or(false))
    }

    /// `false` for paid accounts, unknown players and malformed responses.
    pub fn is_demo_account(&self, name: &str) -> Result<bool> {
        debug!("API call: is_demo_account for name: {}", name);
        Ok(self
            .fetch_identity(name, self.config.timeout)?
            .and_then(|response| response.demo)
            .unwrap_or(false))
    }

    /// All identity fields from a single request.
    pub fn lookup_identity(&self, name: &str) -> Result<PlayerIdentity> {
        debug!("API call: lookup_identity for name: {}", name);
        self.identity_within(name, self.config.timeout)
    }

    fn identity_within(&self, name: &str, timeout: Duration) -> Result<PlayerIdentity> {
        let response = self
            .fetch_identity(name, timeout)?
            .ok_or_else(|| LookupError::PlayerNotFound(name.to_string()))?;

        match (response.name, response.id) {
            (Some(canonical), Some(uuid)) => Ok(PlayerIdentity {
                name: canonical,
                uuid,
                legacy: response.legacy.unwrap_or(false),
                demo: response.demo.unwrap_or(false),
            }),
            _ => Err(LookupError::PlayerNotFound(name.to_string())),
        }
    }

    /// Every name the account has held. Order follows the response and
    /// carries no meaning; a repeated name keeps its last timestamp.
    pub fn fetch_name_history(&self, uuid: &str) -> Result<Vec<NameHistoryEntry>> {
        debug!("API call: fetch_name_history for UUID: {}", uuid);
        self.name_history_within(uuid, self.config.timeout)
    }

    fn name_history_within(&self, uuid: &str, timeout: Duration) -> Result<Vec<NameHistoryEntry>> {
        let resource = self.get(&self.name_history_url(uuid), timeout)?;
        let text = resource.text();

        if text.trim().is_empty() {
            debug!("Empty name history for UUID: {}", uuid);
            return Ok(Vec::new());
        }

        let records: Vec<Value> = serde_json::from_str(&text).map_err(|e| {
            LookupError::Format(format!("name history of {} is not a JSON array: {}", uuid, e))
        })?;

        let mut entries: Vec<NameHistoryEntry> = Vec::with_capacity(records.len());
        for record in records {
            let entry: NameHistoryEntry = lenient::object::<NameHistoryRecord>(record)
                .ok_or_else(|| {
                    LookupError::Format(format!("name history of {} has an entry without a name", uuid))
                })?
                .into();

            match entries.iter_mut().find(|existing| existing.name == entry.name) {
                Some(existing) => existing.changed_to_at = entry.changed_to_at,
                None => entries.push(entry),
            }
        }

        debug!("Name history for UUID {} has {} entries", uuid, entries.len());
        Ok(entries)
    }

    /// Profile with every property decoded.
    pub fn fetch_profile_document(&self, uuid: &str) -> Result<ProfileDocument> {
        debug!("API call: fetch_profile_document for UUID: {}", uuid);
        self.profile_within(uuid, self.config.timeout)
    }

    fn profile_within(&self, uuid: &str, timeout: Duration) -> Result<ProfileDocument> {
        let resource = self.get(&self.profile_url(uuid), timeout)?;
        mc_utils::decode_profile(&resource.text(), uuid)
    }

    /// Runs identity, name history and profile lookups in sequence.
    ///
    /// With `lookup_deadline` set, every step only gets the time left in the
    /// overall budget. A retired or malformed name history does not abort
    /// the lookup; network failures always do.
    pub fn lookup_player(&self, name: &str) -> Result<PlayerReport> {
        info!("Looking up player '{}'", name);
        let budget = LookupBudget::start(&self.config);

        let identity = self.identity_within(name, budget.timeout_for("identity")?)?;
        debug!("Resolved '{}' to {} ({})", name, identity.name, identity.uuid);

        let name_history =
            match self.name_history_within(&identity.uuid, budget.timeout_for("name history")?) {
                Ok(history) => history,
                Err(LookupError::Format(reason)) => {
                    warn!("Ignoring name history of {}: {}", identity.uuid, reason);
                    Vec::new()
                }
                Err(e) => return Err(e),
            };

        let profile = self.profile_within(&identity.uuid, budget.timeout_for("profile")?)?;

        let last_skin_change = match profile_utils::last_skin_change_time(&profile) {
            Ok(time) => Some(time),
            Err(e) => {
                warn!("No skin change time for {}: {}", identity.uuid, e);
                None
            }
        };

        let body_render_url = self.body_render_url(&identity.uuid);
        info!(
            "Lookup of '{}' finished in {} ms",
            name,
            budget.started.elapsed().as_millis()
        );

        Ok(PlayerReport {
            identity,
            name_history,
            profile,
            last_skin_change,
            body_render_url,
        })
    }
}

struct LookupBudget {
    started: Instant,
    deadline: Option<Duration>,
    per_request: Duration,
}

impl LookupBudget {
    fn start(config: &ClientConfig) -> Self {
        Self {
            started: Instant::now(),
            deadline: config.lookup_deadline,
            per_request: config.timeout,
        }
    }

    fn timeout_for(&self, step: &str) -> Result<Duration> {
        let Some(deadline) = self.deadline else {
            return Ok(self.per_request);
        };

        match deadline.checked_sub(self.started.elapsed()) {
            Some(remaining) if !remaining.is_zero() => Ok(remaining.min(self.per_request)),
            _ => {
                warn!("Lookup deadline of {} ms used up before {}", deadline.as_millis(), step);
                Err(LookupError::DeadlineExceeded(step.to_string()))
            }
        }
    }
}
