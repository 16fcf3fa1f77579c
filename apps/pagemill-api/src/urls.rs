//! Result mapping from stored image paths to client-facing URLs
//!
//! Generated images live under the storage root and are served at the
//! `/uploads` mount. URLs are built against the incoming request's scheme
//! and host so the same deployment works behind any hostname, port, or
//! reverse proxy.

use std::path::{Path, PathBuf};

use axum::http::HeaderMap;

/// Base URL (scheme + host) of the request being answered.
///
/// The scheme honors `X-Forwarded-Proto` when a proxy sets it and falls
/// back to `http`.
pub fn request_base_url(headers: &HeaderMap, host: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|scheme| !scheme.is_empty())
        .unwrap_or("http");

    format!("{}://{}", scheme, host)
}

/// Map one generated image path to an absolute URL under the static mount.
///
/// Returns `None` for paths outside the storage root; those are never
/// exposed.
pub fn image_url(base_url: &str, root: &Path, image: &Path) -> Option<String> {
    let relative = image.strip_prefix(root).ok()?;
    let relative = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    Some(format!("{}/uploads/{}", base_url, relative))
}

/// Map a set of generated image paths to absolute URLs.
pub fn image_urls(base_url: &str, root: &Path, images: &[PathBuf]) -> Vec<String> {
    images
        .iter()
        .filter_map(|image| image_url(base_url, root, image))
        .collect()
}
