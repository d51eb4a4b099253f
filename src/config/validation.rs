//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the router origin is a bare absolute http(s) URL
//! - Validate indicator timing ranges
//! - Reject reserved paths that could never match a single segment
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RautaConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::RautaConfig;

/// Upper bound for `indicator.min_visible_ms`.
pub const MAX_MIN_VISIBLE_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("router.origin {0:?} is not an absolute URL")]
    InvalidOrigin(String),

    #[error("router.origin {0:?} must use http or https")]
    UnsupportedScheme(String),

    #[error("router.origin {0:?} must not contain a path, query or fragment")]
    OriginHasPath(String),

    #[error("indicator.fade_ms must be greater than zero")]
    ZeroFade,

    #[error("indicator.min_visible_ms {0} exceeds 10000")]
    MinVisibleTooLong(u64),

    #[error("portal.reserved_paths entry {0:?} must be a single non-empty segment")]
    InvalidReservedPath(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RautaConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let origin = &config.router.origin;
    match Url::parse(origin) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(origin.clone()));
            }
            if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::OriginHasPath(origin.clone()));
            }
        }
        Err(_) => errors.push(ValidationError::InvalidOrigin(origin.clone())),
    }

    if config.indicator.fade_ms == 0 {
        errors.push(ValidationError::ZeroFade);
    }
    if config.indicator.min_visible_ms > MAX_MIN_VISIBLE_MS {
        errors.push(ValidationError::MinVisibleTooLong(
            config.indicator.min_visible_ms,
        ));
    }

    for path in &config.portal.reserved_paths {
        let segment = path.strip_prefix('/').unwrap_or(path);
        if segment.is_empty() || segment.contains('/') {
            errors.push(ValidationError::InvalidReservedPath(path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
