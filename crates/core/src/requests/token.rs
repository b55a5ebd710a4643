//! Approval callback tokens.
//!
//! A pending approval has no stored record; its whole state lives inside
//! the opaque token attached to the admin's buttons, so the encoding must
//! round-trip exactly. Decoding fails closed: anything that is not the
//! expected five-field shape is rejected outright.

use thiserror::Error;

use crate::media::{MediaKind, QualityTier};

/// First token field, shared by every approval action.
const TOKEN_PREFIX: &str = "req";
const MARKER_STANDARD: &str = "std";
const MARKER_ULTRA_HD: &str = "4k";
const MARKER_DECLINE: &str = "decline";

/// What the admin chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    Approve(QualityTier),
    Decline,
}

/// The full state of a pending approval, carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalToken {
    pub action: ApprovalAction,
    pub kind: MediaKind,
    pub catalog_id: u32,
    pub requester: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("unexpected token shape")]
    UnexpectedShape,
    #[error("unknown token field: {0}")]
    UnknownField(String),
    #[error("invalid numeric token field: {0}")]
    InvalidNumber(String),
}

impl ApprovalToken {
    /// Whether a raw callback payload belongs to this token family.
    pub fn matches(data: &str) -> bool {
        data.starts_with(TOKEN_PREFIX) && data[TOKEN_PREFIX.len()..].starts_with('_')
    }

    /// Encode as `req_{marker}_{kind}_{catalogId}_{requester}`.
    pub fn encode(&self) -> String {
        let marker = match self.action {
            ApprovalAction::Approve(QualityTier::Standard) => MARKER_STANDARD,
            ApprovalAction::Approve(QualityTier::UltraHd) => MARKER_ULTRA_HD,
            ApprovalAction::Decline => MARKER_DECLINE,
        };
        format!(
            "{}_{}_{}_{}_{}",
            TOKEN_PREFIX,
            marker,
            self.kind.as_str(),
            self.catalog_id,
            self.requester
        )
    }

    /// Decode a raw callback payload. Rejects on any unexpected shape.
    pub fn decode(data: &str) -> Result<Self, TokenError> {
        let parts: Vec<&str> = data.split('_').collect();
        let [prefix, marker, kind, catalog_id, requester] = parts.as_slice() else {
            return Err(TokenError::UnexpectedShape);
        };

        if *prefix != TOKEN_PREFIX {
            return Err(TokenError::UnknownField(prefix.to_string()));
        }

        let action = match *marker {
            MARKER_STANDARD => ApprovalAction::Approve(QualityTier::Standard),
            MARKER_ULTRA_HD => ApprovalAction::Approve(QualityTier::UltraHd),
            MARKER_DECLINE => ApprovalAction::Decline,
            other => return Err(TokenError::UnknownField(other.to_string())),
        };

        let kind = MediaKind::from_str_strict(kind)
            .ok_or_else(|| TokenError::UnknownField(kind.to_string()))?;

        let catalog_id = catalog_id
            .parse()
            .map_err(|_| TokenError::InvalidNumber(catalog_id.to_string()))?;
        let requester = requester
            .parse()
            .map_err(|_| TokenError::InvalidNumber(requester.to_string()))?;

        Ok(Self {
            action,
            kind,
            catalog_id,
            requester,
        })
    }
}
