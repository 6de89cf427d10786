//! Image payloads and the MIME allow-list.
//!
//! An [`ImageBlob`] can only be built for one of the four allowed formats, so
//! anything that reaches the store or an archive has already passed the
//! allow-list.

use bytes::Bytes;

use crate::constants::MAX_FILE_SIZE;
use crate::error::MediaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMime {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageMime {
    pub const ALL: [ImageMime; 4] = [ImageMime::Jpeg, ImageMime::Png, ImageMime::Gif, ImageMime::Webp];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Gif => "image/gif",
            ImageMime::Webp => "image/webp",
        }
    }

    /// Extension used for archive entries.
    pub fn extension(self) -> &'static str {
        match self {
            ImageMime::Png => "png",
            ImageMime::Jpeg => "jpg",
            ImageMime::Gif => "gif",
            ImageMime::Webp => "webp",
        }
    }

    pub fn parse(mime: &str) -> Result<Self, MediaError> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Ok(ImageMime::Png),
            "image/jpeg" | "image/jpg" => Ok(ImageMime::Jpeg),
            "image/gif" => Ok(ImageMime::Gif),
            "image/webp" => Ok(ImageMime::Webp),
            other => Err(MediaError::UnsupportedType(other.to_string())),
        }
    }

    /// Detect the format from magic bytes, ignoring any claimed type or
    /// file extension.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageMime::Jpeg);
        }
        if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(ImageMime::Png);
        }
        if data.starts_with(b"GIF8") {
            return Some(ImageMime::Gif);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageMime::Webp);
        }
        None
    }
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    data: Bytes,
    mime: ImageMime,
}

impl ImageBlob {
    pub fn new(data: impl Into<Bytes>, mime: ImageMime) -> Self {
        Self {
            data: data.into(),
            mime,
        }
    }

    /// Build a blob whose type is decided by its content.
    pub fn sniffed(data: impl Into<Bytes>) -> Result<Self, MediaError> {
        let data = data.into();
        if data.is_empty() {
            return Err(MediaError::Empty);
        }
        let mime = ImageMime::sniff(&data).ok_or(MediaError::UnrecognizedContent)?;
        Ok(Self { data, mime })
    }

    /// Validate an uploaded file: size ceiling first, then content sniffing.
    pub fn from_upload(data: impl Into<Bytes>) -> Result<Self, MediaError> {
        let data = data.into();
        if data.len() > MAX_FILE_SIZE {
            return Err(MediaError::TooLarge {
                size: data.len(),
                max: MAX_FILE_SIZE,
            });
        }
        Self::sniffed(data)
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Display name for an uploaded file: the name without its last extension.
pub fn file_name_without_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(idx) => &file_name[..idx],
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn sniffs_each_allowed_format() {
        assert_eq!(ImageMime::sniff(PNG), Some(ImageMime::Png));
        assert_eq!(ImageMime::sniff(JPEG), Some(ImageMime::Jpeg));
        assert_eq!(ImageMime::sniff(WEBP), Some(ImageMime::Webp));
        assert_eq!(ImageMime::sniff(GIF), Some(ImageMime::Gif));
        assert_eq!(ImageMime::sniff(b"<svg xmlns="), None);
        assert_eq!(ImageMime::sniff(b"RIFF"), None);
    }

    #[test]
    fn extension_mapping() {
        assert_eq!(ImageMime::Png.extension(), "png");
        assert_eq!(ImageMime::Jpeg.extension(), "jpg");
        assert_eq!(ImageMime::Webp.extension(), "webp");
        assert_eq!(ImageMime::Gif.extension(), "gif");
    }

    #[test]
    fn parse_rejects_types_outside_allow_list() {
        assert_eq!(ImageMime::parse("image/webp"), Ok(ImageMime::Webp));
        assert_eq!(ImageMime::parse("IMAGE/PNG"), Ok(ImageMime::Png));
        assert!(matches!(
            ImageMime::parse("image/svg+xml"),
            Err(MediaError::UnsupportedType(_))
        ));
    }

    #[test]
    fn upload_checks_size_before_content() {
        let big = vec![0u8; MAX_FILE_SIZE + 1];
        assert!(matches!(
            ImageBlob::from_upload(big),
            Err(MediaError::TooLarge { .. })
        ));
        assert_eq!(ImageBlob::from_upload(Vec::new()), Err(MediaError::Empty));
        assert_eq!(
            ImageBlob::from_upload(b"plain text".to_vec()),
            Err(MediaError::UnrecognizedContent)
        );
        let blob = ImageBlob::from_upload(PNG.to_vec()).unwrap();
        assert_eq!(blob.mime(), ImageMime::Png);
        assert_eq!(blob.len(), PNG.len());
    }

    #[test]
    fn strips_last_extension() {
        assert_eq!(file_name_without_extension("squat.final.png"), "squat.final");
        assert_eq!(file_name_without_extension("スクワット.webp"), "スクワット");
        assert_eq!(file_name_without_extension(".hidden"), ".hidden");
        assert_eq!(file_name_without_extension("noext"), "noext");
    }
}
