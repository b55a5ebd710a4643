//! Caller identity and role resolution.
//!
//! The login conversation and friend-code issuance live outside this crate;
//! the config file is the contract. Handlers compose these guard functions
//! explicitly ahead of their own logic instead of relying on wrappers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::texts::Lang;

/// Role of an authenticated caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Friend,
}

/// An authenticated caller, as consumed by the core components.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Numeric chat identity.
    pub id: i64,
    pub role: Role,
    /// Language for requester-facing messages.
    pub lang: Lang,
}

/// Typed rejection returned by the guards.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("this command is admin only")]
    AdminOnly,
    #[error("caller is not authenticated")]
    Unknown,
}

/// Resolve a chat identity against the config snapshot.
pub fn resolve_role(config: &Config, user_id: i64) -> Option<Role> {
    if config.admin_user_id == Some(user_id) {
        return Some(Role::Admin);
    }
    if config.friend_user_ids.contains(&user_id) {
        return Some(Role::Friend);
    }
    None
}

/// Build a `Caller` for a known identity, or reject.
pub fn authenticate(config: &Config, user_id: i64) -> Result<Caller, AccessDenied> {
    let role = resolve_role(config, user_id).ok_or(AccessDenied::Unknown)?;
    Ok(Caller {
        id: user_id,
        role,
        lang: config.language,
    })
}

/// Guard for admin-only operations.
pub fn require_admin(caller: &Caller) -> Result<(), AccessDenied> {
    match caller.role {
        Role::Admin => Ok(()),
        Role::Friend => Err(AccessDenied::AdminOnly),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_users() -> Config {
        let mut config = Config::default();
        config.admin_user_id = Some(42);
        config.friend_user_ids = vec![7, 555];
        config
    }

    #[test]
    fn test_resolve_role() {
        let config = config_with_users();
        assert_eq!(resolve_role(&config, 42), Some(Role::Admin));
        assert_eq!(resolve_role(&config, 555), Some(Role::Friend));
        assert_eq!(resolve_role(&config, 1), None);
    }

    #[test]
    fn test_authenticate_unknown_rejected() {
        let config = config_with_users();
        assert_eq!(authenticate(&config, 1).unwrap_err(), AccessDenied::Unknown);
    }

    #[test]
    fn test_require_admin() {
        let config = config_with_users();
        let admin = authenticate(&config, 42).unwrap();
        let friend = authenticate(&config, 7).unwrap();
        assert!(require_admin(&admin).is_ok());
        assert_eq!(require_admin(&friend).unwrap_err(), AccessDenied::AdminOnly);
    }
}
