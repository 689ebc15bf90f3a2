use serde_json::Value;
use tracing::warn;

use super::{list, text};

const GETTING_AROUND: &str = "getting around";
const NEIGHBOURHOOD_HIGHLIGHTS: &str = "neighbourhood highlights";

/// Location text and transport notes taken from the description blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationInfo {
    pub location: String,
    pub getting_around: String,
}

/// Replace HTML line breaks with newlines and `&nbsp;` with a space.
pub fn clean_html_content(content: &str) -> String {
    content
        .replace("<br />", "\n")
        .replace("<br/>", "\n")
        .replace("<br>", "\n")
        .replace("&nbsp;", " ")
}

/// Scan titled description blocks in order.
///
/// "Getting around" fills `getting_around` and "neighbourhood highlights"
/// fills `location` with its content. Otherwise the first block with content
/// names the location by its title, falling back to the content when the
/// title is blank; later untitled blocks never overwrite it.
pub fn extract_location_info(descriptions: Option<&Value>) -> LocationInfo {
    let mut info = LocationInfo::default();

    for block in list(descriptions, "location_descriptions") {
        let (Some(title), Some(content)) = (
            block.get("title").and_then(text),
            block.get("content").and_then(text),
        ) else {
            warn!("skipping malformed location description");
            continue;
        };

        let content = clean_html_content(&content);

        match title.to_lowercase().as_str() {
            GETTING_AROUND => info.getting_around = content,
            NEIGHBOURHOOD_HIGHLIGHTS => info.location = content,
            _ if info.location.is_empty() && !content.trim().is_empty() => {
                info.location = if title.is_empty() { content } else { title };
            }
            _ => {}
        }
    }

    info
}
