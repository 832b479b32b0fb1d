// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::path::Path;

use mime::Mime;

/// A file picked by the user that should be uploaded and sent as an image message.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub media_type: Option<Mime>,
    pub data: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: None,
            data,
        }
    }

    pub fn with_media_type(mut self, media_type: Mime) -> Self {
        self.media_type = Some(media_type);
        self
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Returns the explicit media type or guesses one from the file extension.
    pub fn media_type(&self) -> Mime {
        self.media_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(Path::new(&self.file_name)).first_or_octet_stream()
        })
    }

    pub fn is_image(&self) -> bool {
        self.media_type().type_() == mime::IMAGE
    }
}
