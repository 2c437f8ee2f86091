//! Placeholder-cover detection
//!
//! Cover services answer "no cover" with a stock graphic rather than a 404.
//! Such graphics are recognised by byte length or by their fixed pixel size.

use image::ImageReader;
use leafy_common::config::PlaceholderConfig;
use std::io::Cursor;
use tracing::debug;

/// Pixel size of an image body, `None` when it cannot be decoded
pub fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Whether an image body is a stock "no cover" graphic
///
/// Bodies under `min_bytes` (including empty ones), bodies that do not
/// decode as an image, and images whose size matches a configured
/// placeholder size all count as placeholders.
pub fn is_placeholder(bytes: &[u8], config: &PlaceholderConfig) -> bool {
    if bytes.len() < config.min_bytes.max(1) {
        debug!(len = bytes.len(), "Placeholder: body under size threshold");
        return true;
    }

    match image_dimensions(bytes) {
        Some((width, height)) => {
            let known = config.dimensions.contains(&[width, height]);
            if known {
                debug!(width, height, "Placeholder: known stock image size");
            }
            known
        }
        None => {
            debug!(len = bytes.len(), "Placeholder: body is not a decodable image");
            true
        }
    }
}

/// Whether a link contains a "no image" marker (case-insensitive)
pub fn has_sentinel(link: &str, sentinels: &[String]) -> bool {
    let link = link.to_ascii_lowercase();
    sentinels
        .iter()
        .any(|s| !s.is_empty() && link.contains(&s.to_ascii_lowercase()))
}
