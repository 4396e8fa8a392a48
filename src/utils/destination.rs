//! Destination validation.
//!
//! A destination is stored in canonical form so listings and resolutions
//! always render the same text: lowercase host, no fragment, no default
//! port. Anything that is not an absolute HTTP(S) URL is rejected at the
//! creation boundary before it can reach the store.

use url::Url;

use crate::error::AppError;

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Canonicalizes a destination URL, rejecting non-HTTP(S) input.
///
/// Dangerous schemes (`javascript:`, `data:`, `file:`, ...) never make it
/// into a link record.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] when the input does not parse as an
/// absolute URL or carries a scheme outside `http`/`https`.
pub fn canonical_destination(input: &str) -> Result<String, AppError> {
    let mut url = Url::parse(input)
        .map_err(|e| AppError::InvalidInput(format!("destination is not a valid URL: {e}")))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(AppError::InvalidInput(format!(
            "destination scheme {:?} is not allowed, expected http or https",
            url.scheme()
        )));
    }

    if let Some(host) = url.host_str().map(str::to_ascii_lowercase) {
        url.set_host(Some(&host))
            .map_err(|e| AppError::InvalidInput(format!("destination host is invalid: {e}")))?;
    }

    url.set_fragment(None);

    let on_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if on_default_port {
        // set_port only fails for URLs that cannot carry a port; an
        // absolute http(s) URL always can.
        let _ = url.set_port(None);
    }

    Ok(url.into())
}
