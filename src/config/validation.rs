//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;

/// Minimum length for a session ID.
const MIN_SESSION_ID_LENGTH: usize = 8;

/// Upper bound on concurrent transfers.
const MAX_CONCURRENT_DOWNLOADS: usize = 32;

/// Upper bound on the retry backoff multiplier.
const MAX_BACKOFF_MULTIPLIER: f64 = 10.0;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_session_id(&config.account.session_id)?;
    validate_country_code(&config.account.country_code)?;
    validate_concurrency(config.download.max_concurrent_downloads)?;
    validate_retry(
        config.retry.initial_delay_ms,
        config.retry.max_delay_ms,
        config.retry.backoff_multiplier,
    )?;

    Ok(())
}

/// Validate the session ID.
pub fn validate_session_id(session_id: &str) -> Result<()> {
    if session_id.is_empty() {
        return Err(Error::MissingConfig("session_id".to_string()));
    }

    if session_id.len() < MIN_SESSION_ID_LENGTH {
        return Err(Error::ConfigValidation {
            field: "session_id".to_string(),
            message: format!(
                "Session ID must be at least {} characters (got {})",
                MIN_SESSION_ID_LENGTH,
                session_id.len()
            ),
        });
    }

    let lower = session_id.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_session") {
        return Err(Error::ConfigValidation {
            field: "session_id".to_string(),
            message: "Session ID appears to be a placeholder.".to_string(),
        });
    }

    Ok(())
}

/// Validate the country code (ISO 3166-1 alpha-2, upper case).
pub fn validate_country_code(country_code: &str) -> Result<()> {
    let pattern = Regex::new(r"^[A-Z]{2}$").expect("static regex");

    if !pattern.is_match(country_code) {
        return Err(Error::ConfigValidation {
            field: "country_code".to_string(),
            message: format!(
                "'{}' is not a two-letter upper-case country code",
                country_code
            ),
        });
    }

    Ok(())
}

/// Validate the concurrent download limit.
pub fn validate_concurrency(max_concurrent: usize) -> Result<()> {
    if max_concurrent == 0 || max_concurrent > MAX_CONCURRENT_DOWNLOADS {
        return Err(Error::ConfigValidation {
            field: "max_concurrent_downloads".to_string(),
            message: format!(
                "Must be between 1 and {} (got {})",
                MAX_CONCURRENT_DOWNLOADS, max_concurrent
            ),
        });
    }

    Ok(())
}

/// Validate retry backoff parameters.
pub fn validate_retry(initial_delay_ms: u64, max_delay_ms: u64, multiplier: f64) -> Result<()> {
    if initial_delay_ms > max_delay_ms {
        return Err(Error::ConfigValidation {
            field: "retry".to_string(),
            message: format!(
                "initial_delay_ms ({}) exceeds max_delay_ms ({})",
                initial_delay_ms, max_delay_ms
            ),
        });
    }

    if !(1.0..=MAX_BACKOFF_MULTIPLIER).contains(&multiplier) {
        return Err(Error::ConfigValidation {
            field: "retry.backoff_multiplier".to_string(),
            message: format!(
                "Must be between 1.0 and {} (got {})",
                MAX_BACKOFF_MULTIPLIER, multiplier
            ),
        });
    }

    Ok(())
}

/// Extract a catalog id from a bare id or a TIDAL share URL.
///
/// `kind` is the URL path segment: "track", "video", "album", "artist" or
/// "playlist". Playlist ids are UUIDs, everything else is numeric.
pub fn parse_catalog_id(input: &str, kind: &str) -> Result<String> {
    let input = input.trim();
    let id_pattern = if kind == "playlist" {
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}"
    } else {
        r"\d+"
    };

    if input.starts_with("http://") || input.starts_with("https://") {
        // e.g. https://tidal.com/browse/album/123456
        let url = url::Url::parse(input)?;
        let url_pattern = Regex::new(&format!(r"/{}/({})(?:/|$)", kind, id_pattern))
            .expect("static regex");

        if let Some(id) = url_pattern.captures(url.path()).and_then(|c| c.get(1)) {
            return Ok(id.as_str().to_string());
        }

        return Err(Error::ConfigValidation {
            field: kind.to_string(),
            message: format!("Could not extract {} id from URL: {}", kind, input),
        });
    }

    let bare_pattern = Regex::new(&format!("^{}$", id_pattern)).expect("static regex");
    if bare_pattern.is_match(input) {
        return Ok(input.to_string());
    }

    Err(Error::ConfigValidation {
        field: kind.to_string(),
        message: format!("Invalid {} id: '{}'", kind, input),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id() {
        assert!(validate_session_id("4f0a1c2e-9b7d-4c1e").is_ok());
        assert!(matches!(
            validate_session_id(""),
            Err(Error::MissingConfig(_))
        ));
        assert!(validate_session_id("short").is_err());
        assert!(validate_session_id("REPLACEME-REPLACEME").is_err());
    }

    #[test]
    fn test_country_code() {
        assert!(validate_country_code("US").is_ok());
        assert!(validate_country_code("de").is_err());
        assert!(validate_country_code("USA").is_err());
    }

    #[test]
    fn test_concurrency() {
        assert!(validate_concurrency(1).is_ok());
        assert!(validate_concurrency(0).is_err());
        assert!(validate_concurrency(33).is_err());
    }

    #[test]
    fn test_retry() {
        assert!(validate_retry(250, 10_000, 2.0).is_ok());
        assert!(validate_retry(20_000, 10_000, 2.0).is_err());
        assert!(validate_retry(250, 10_000, 0.5).is_err());
        assert!(validate_retry(250, 10_000, f64::NAN).is_err());
        assert!(validate_retry(250, 10_000, 10.0).is_ok());
        assert!(validate_retry(1, 10, 1e300).is_err());
        assert!(validate_retry(1, 10, f64::INFINITY).is_err());
    }

    #[test]
    fn test_full_config() {
        let mut config = Config::default();
        assert!(validate_config(&config).is_err());

        config.account.session_id = "4f0a1c2e-9b7d-4c1e".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_parse_catalog_id() {
        assert_eq!(parse_catalog_id("12345", "album").unwrap(), "12345");
        assert_eq!(
            parse_catalog_id("https://tidal.com/browse/album/12345", "album").unwrap(),
            "12345"
        );
        assert_eq!(
            parse_catalog_id("https://listen.tidal.com/track/77/", "track").unwrap(),
            "77"
        );
        assert!(parse_catalog_id("https://tidal.com/browse/track/77", "album").is_err());
        assert!(parse_catalog_id("abc", "track").is_err());
    }

    #[test]
    fn test_parse_playlist_uuid() {
        let uuid = "36ea71a8-445e-41a4-82ab-6628c581535d";
        assert_eq!(parse_catalog_id(uuid, "playlist").unwrap(), uuid);
        assert_eq!(
            parse_catalog_id(&format!("https://tidal.com/browse/playlist/{}", uuid), "playlist")
                .unwrap(),
            uuid
        );
        assert!(parse_catalog_id("12345", "playlist").is_err());
    }
}
