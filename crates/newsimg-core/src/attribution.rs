//! Attribution markup for a cached image.
//!
//! Both outputs are pure functions of an [`ImageRecord`] and the story title,
//! rebuilt on every call.

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};

use crate::types::ImageRecord;

/// Structured attribution for embedding in a page template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttribution {
    pub src: String,
    pub alt: String,
    pub caption: String,
    pub license: String,
    pub license_url: Option<String>,
    pub source_url: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn display_title(record: &ImageRecord) -> &str {
    non_empty(Some(record.title.as_str())).unwrap_or("Image")
}

fn display_creator(record: &ImageRecord) -> &str {
    non_empty(Some(record.creator.as_str())).unwrap_or("Unknown")
}

fn license_label(record: &ImageRecord) -> String {
    record.license.to_uppercase()
}

/// Render a `<figure>` with the display image and a credit caption.
///
/// The caption links to the license text when a license URL is known and
/// falls back to a plain `Licensed <LICENSE>` label otherwise.
#[must_use]
pub fn render_fragment(record: &ImageRecord, alt: &str) -> String {
    let src = encode_double_quoted_attribute(&record.display_path);
    let alt = encode_double_quoted_attribute(alt);
    let title = encode_text(display_title(record));
    let creator = encode_text(display_creator(record));
    let source_url = encode_double_quoted_attribute(
        non_empty(record.source_url.as_deref()).unwrap_or("#"),
    );
    let label = license_label(record);
    let label = encode_text(&label);

    let credit = format!(
        r#"{title} by {creator} via <a href="{source_url}" rel="noopener nofollow">source</a>"#
    );
    let caption = match non_empty(record.license_url.as_deref()) {
        Some(url) => {
            let url = encode_double_quoted_attribute(url);
            format!(r#"{credit} · <a href="{url}" rel="license noopener nofollow">{label}</a>"#)
        }
        None => format!("{credit} · Licensed {label}"),
    };

    format!(
        "<figure class=\"news-image\">\n  <img src=\"{src}\" alt=\"{alt}\" loading=\"lazy\" decoding=\"async\">\n  <figcaption>{caption}</figcaption>\n</figure>"
    )
}

/// Build the structured attribution for a record.
#[must_use]
pub fn attribution(record: &ImageRecord, alt: &str) -> ImageAttribution {
    let provider = non_empty(Some(record.source.as_str())).unwrap_or("unknown source");
    ImageAttribution {
        src: record.display_path.clone(),
        alt: alt.to_string(),
        caption: format!(
            "{} by {} via {provider}",
            display_title(record),
            display_creator(record)
        ),
        license: license_label(record),
        license_url: non_empty(record.license_url.as_deref()).map(str::to_string),
        source_url: non_empty(record.source_url.as_deref()).map(str::to_string),
    }
}
