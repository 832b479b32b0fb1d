// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use once_cell::sync::Lazy;
use regex::Regex;

// Only anchored at the start, so "https://host/a.png?size=large" is an image as well.
static IMAGE_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://.*\.(?:png|jpg|jpeg|gif|webp)").expect("Invalid image URL regex")
});

static LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?|ftp|file)://[-A-Z0-9+&@#/%?=~_|!:,.;]*[-A-Z0-9+&@#/%=~_|]")
        .expect("Invalid link regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// The whole message text is the URL of an image.
    Image { url: String },
    Text { segments: Vec<TextSegment> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    Plain(String),
    Link(String),
}

/// Decides how a message text should be rendered.
///
/// Messages don't carry a content type. Whether a text is an image is guessed from its file
/// extension, every other text is split into plain runs and links.
pub fn classify_content(text: &str) -> MessageContent {
    if IMAGE_URL_REGEX.is_match(text) {
        return MessageContent::Image {
            url: text.to_string(),
        };
    }

    let mut segments = vec![];
    let mut last_end = 0;

    for link in LINK_REGEX.find_iter(text) {
        if link.start() > last_end {
            segments.push(TextSegment::Plain(text[last_end..link.start()].to_string()));
        }
        segments.push(TextSegment::Link(link.as_str().to_string()));
        last_end = link.end();
    }

    if last_end < text.len() {
        segments.push(TextSegment::Plain(text[last_end..].to_string()));
    }

    MessageContent::Text { segments }
}
