use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::texts::Lang;

/// Root configuration snapshot.
///
/// Loaded once at startup and treated as immutable; a reload produces a
/// whole new snapshot swapped in through [`super::ConfigStore`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Chat identity of the admin. Unset means no admin-only command or
    /// friend request can complete.
    #[serde(default)]
    pub admin_user_id: Option<i64>,
    /// Chat identities allowed to use the bot as friends.
    #[serde(default)]
    pub friend_user_ids: Vec<i64>,
    /// Language for requester-facing messages.
    #[serde(default)]
    pub language: Lang,
    /// Streaming-provider short codes the admin subscribes to (e.g. "nfx").
    #[serde(default)]
    pub subscribed_services: Vec<String>,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub plex: PlexConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub radarr: RadarrConfig,
    #[serde(default)]
    pub sonarr: SonarrConfig,
    #[serde(default)]
    pub overseerr: OverseerrConfig,
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Bot token. Empty means fall back to the TELOXIDE_TOKEN env var.
    #[serde(default)]
    pub bot_token: String,
}

/// Local HTTP endpoint for health and metrics.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_host")]
    pub host: IpAddr,
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
        }
    }
}

fn default_http_host() -> IpAddr {
    "127.0.0.1".parse().unwrap()
}

fn default_http_port() -> u16 {
    8081
}

/// Plex library server.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlexConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: String,
}

impl PlexConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.token.is_empty()
    }
}

/// TMDB catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,
    /// Streaming region for watch-provider lookups.
    #[serde(default = "default_region")]
    pub region: String,
    /// Search language passed to the catalog.
    #[serde(default = "default_search_language")]
    pub search_language: String,
    /// Base URL override, mainly for tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            region: default_region(),
            search_language: default_search_language(),
            base_url: None,
        }
    }
}

impl TmdbConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn default_region() -> String {
    "BR".to_string()
}

fn default_search_language() -> String {
    "en-US".to_string()
}

/// Radarr movie acquisition service.
///
/// Profile ids are provider-side opaque integers, carried as strings and
/// coerced only at submission time.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RadarrConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub quality_profile_id: String,
    #[serde(default)]
    pub root_folder_path: String,
    /// Distinct 4K pair; both empty means the 4K tier is unavailable.
    #[serde(default)]
    pub quality_profile_id_4k: String,
    #[serde(default)]
    pub root_folder_path_4k: String,
}

impl RadarrConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.api_key.is_empty()
    }
}

/// Sonarr show acquisition service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SonarrConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub quality_profile_id: String,
    #[serde(default = "default_language_profile")]
    pub language_profile_id: String,
    #[serde(default)]
    pub root_folder_path: String,
    #[serde(default)]
    pub quality_profile_id_4k: String,
    #[serde(default)]
    pub root_folder_path_4k: String,
}

impl Default for SonarrConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            quality_profile_id: String::new(),
            language_profile_id: default_language_profile(),
            root_folder_path: String::new(),
            quality_profile_id_4k: String::new(),
            root_folder_path_4k: String::new(),
        }
    }
}

impl SonarrConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.api_key.is_empty()
    }
}

fn default_language_profile() -> String {
    "1".to_string()
}

/// Overseerr request tracker.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OverseerrConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
}

impl OverseerrConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.admin_user_id, None);
        assert_eq!(config.tmdb.region, "BR");
        assert_eq!(config.sonarr.language_profile_id, "1");
        assert_eq!(config.http.port, 8081);
        assert!(!config.plex.is_configured());
    }

    #[test]
    fn test_section_configured_needs_all_fields() {
        let plex = PlexConfig {
            url: "http://plex:32400".to_string(),
            token: String::new(),
        };
        assert!(!plex.is_configured());

        let overseerr = OverseerrConfig {
            url: "http://overseerr:5055".to_string(),
            api_key: "key".to_string(),
        };
        assert!(overseerr.is_configured());
    }
}
