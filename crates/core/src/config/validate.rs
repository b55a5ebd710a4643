use super::{types::Config, ConfigError};

/// Validate configuration.
///
/// Missing service sections are allowed (the cascade treats an
/// unconfigured adapter as an automatic miss); only internally
/// inconsistent values are rejected here.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.http.port == 0 {
        return Err(ConfigError::ValidationError(
            "http.port cannot be 0".to_string(),
        ));
    }

    // A half-filled section is a typo, not an opt-out.
    if (config.plex.url.is_empty()) != (config.plex.token.is_empty()) {
        return Err(ConfigError::ValidationError(
            "plex needs both url and token, or neither".to_string(),
        ));
    }
    if (config.overseerr.url.is_empty()) != (config.overseerr.api_key.is_empty()) {
        return Err(ConfigError::ValidationError(
            "overseerr needs both url and api_key, or neither".to_string(),
        ));
    }
    if (config.radarr.url.is_empty()) != (config.radarr.api_key.is_empty()) {
        return Err(ConfigError::ValidationError(
            "radarr needs both url and api_key, or neither".to_string(),
        ));
    }
    if (config.sonarr.url.is_empty()) != (config.sonarr.api_key.is_empty()) {
        return Err(ConfigError::ValidationError(
            "sonarr needs both url and api_key, or neither".to_string(),
        ));
    }

    // The 4K tier is either fully present or absent.
    if (config.radarr.quality_profile_id_4k.is_empty())
        != (config.radarr.root_folder_path_4k.is_empty())
    {
        return Err(ConfigError::ValidationError(
            "radarr 4k tier needs both quality_profile_id_4k and root_folder_path_4k".to_string(),
        ));
    }
    if (config.sonarr.quality_profile_id_4k.is_empty())
        != (config.sonarr.root_folder_path_4k.is_empty())
    {
        return Err(ConfigError::ValidationError(
            "sonarr 4k tier needs both quality_profile_id_4k and root_folder_path_4k".to_string(),
        ));
    }

    if !config.subscribed_services.is_empty() && !config.tmdb.is_configured() {
        return Err(ConfigError::ValidationError(
            "subscribed_services requires a tmdb api_key".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_config_is_ok() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_half_filled_plex_fails() {
        let mut config = Config::default();
        config.plex.url = "http://plex:32400".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_lone_4k_profile_fails() {
        let mut config = Config::default();
        config.radarr.url = "http://radarr:7878".to_string();
        config.radarr.api_key = "key".to_string();
        config.radarr.quality_profile_id_4k = "5".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_services_without_tmdb_fails() {
        let mut config = Config::default();
        config.subscribed_services = vec!["nfx".to_string()];
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
