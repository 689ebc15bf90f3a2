use serde_json::Value;
use tracing::debug;

use super::{list, text_field};

/// Image URLs in display order; the first one is the cover.
pub fn extract_images(images: Option<&Value>) -> Vec<String> {
    list(images, "images")
        .iter()
        .filter_map(|image| {
            let url = text_field(image, "url");
            if url.is_none() {
                debug!("skipping image entry without a url");
            }
            url
        })
        .collect()
}
