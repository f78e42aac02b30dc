/// Identity of an uploaded image; extraction results are memoized per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(pub String);

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageKey {
    fn from(key: &str) -> Self {
        ImageKey(key.to_string())
    }
}

impl From<String> for ImageKey {
    fn from(key: String) -> Self {
        ImageKey(key)
    }
}

pub const SUPPORTED_MEDIA_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

pub fn is_supported_media_type(media_type: &str) -> bool {
    SUPPORTED_MEDIA_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(media_type.trim()))
}

/// An uploaded invoice. Never mutated; a new upload replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceImage {
    key: ImageKey,
    data: Vec<u8>,
    media_type: String,
}

impl InvoiceImage {
    pub fn new(key: impl Into<ImageKey>, data: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            data,
            media_type: media_type.into(),
        }
    }

    pub fn key(&self) -> &ImageKey {
        &self.key
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn to_prompt_part(&self) -> crate::ai::PromptPart {
        crate::ai::PromptPart::image(self.data.clone(), self.media_type.clone())
    }
}
