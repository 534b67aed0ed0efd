//! Local input checks applied before any request is issued.

use crate::error::ValidationError;
use reqwest::Url;
use uuid::Uuid;

/// Largest page size accepted by the chunk listing endpoint.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Require a hyphenated UUID (`8-4-4-4-12` hex digits).
pub fn validate_uuid(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    let hyphenated = trimmed.len() == 36
        && trimmed
            .char_indices()
            .all(|(idx, ch)| match idx {
                8 | 13 | 18 | 23 => ch == '-',
                _ => ch.is_ascii_hexdigit(),
            });

    if hyphenated && Uuid::try_parse(trimmed).is_ok() {
        Ok(())
    } else {
        Err(ValidationError::InvalidUuid {
            field,
            value: value.to_string(),
        })
    }
}

/// Require a page size within `1..=MAX_PAGE_SIZE`.
pub fn validate_limit(limit: u32) -> Result<(), ValidationError> {
    if (1..=MAX_PAGE_SIZE).contains(&limit) {
        Ok(())
    } else {
        Err(ValidationError::Limit(limit))
    }
}

/// Require a score, confidence, or threshold within `[0.0, 1.0]`.
pub fn validate_unit_interval(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfUnitRange { field, value })
    }
}

/// Parse and normalize an API base URL, dropping any trailing slash.
pub fn normalize_base_url(url: &str) -> Result<String, ValidationError> {
    let mut parsed =
        Url::parse(url.trim()).map_err(|err| ValidationError::BaseUrl(format!("{url}: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::BaseUrl(format!(
            "{url}: unsupported scheme '{}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(ValidationError::BaseUrl(format!("{url}: missing host")));
    }
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    parsed.set_query(None);
    parsed.set_fragment(None);
    Ok(parsed.to_string().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hyphenated_uuid_only() {
        assert!(validate_uuid("variant_id", "6f1c2a8e-4b7d-4e1a-9c3f-2d5e8b7a1c90").is_ok());
        assert!(validate_uuid("variant_id", "6F1C2A8E-4B7D-4E1A-9C3F-2D5E8B7A1C90").is_ok());

        for bad in [
            "",
            "not-a-uuid",
            "6f1c2a8e4b7d4e1a9c3f2d5e8b7a1c90",
            "{6f1c2a8e-4b7d-4e1a-9c3f-2d5e8b7a1c90}",
            "6f1c2a8e-4b7d-4e1a-9c3f-2d5e8b7a1c9z",
            "../6f1c2a8e-4b7d-4e1a-9c3f-2d5e8b7a1c",
        ] {
            let err = validate_uuid("variant_id", bad).expect_err(bad);
            assert!(matches!(err, ValidationError::InvalidUuid { field: "variant_id", .. }));
        }
    }

    #[test]
    fn limit_window_is_inclusive() {
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(MAX_PAGE_SIZE).is_ok());
        assert_eq!(validate_limit(0), Err(ValidationError::Limit(0)));
        assert_eq!(
            validate_limit(MAX_PAGE_SIZE + 1),
            Err(ValidationError::Limit(MAX_PAGE_SIZE + 1))
        );
    }

    #[test]
    fn unit_interval_bounds() {
        assert!(validate_unit_interval("auto_link_threshold", 0.0).is_ok());
        assert!(validate_unit_interval("auto_link_threshold", 1.0).is_ok());
        assert!(validate_unit_interval("auto_link_threshold", 1.01).is_err());
        assert!(validate_unit_interval("auto_link_threshold", -0.1).is_err());
        assert!(validate_unit_interval("auto_link_threshold", f64::NAN).is_err());
    }

    #[test]
    fn base_url_is_normalized() {
        assert_eq!(
            normalize_base_url("https://api.example.com/v1/").unwrap(),
            "https://api.example.com/v1"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8080").unwrap(),
            "http://127.0.0.1:8080"
        );
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(ValidationError::BaseUrl(_))
        ));
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(ValidationError::BaseUrl(_))
        ));
    }
}
