use serde::{Deserialize, Serialize};

/// A media file attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    /// `"image"` or `"video"`
    pub filetype: String,
    pub filename: String,
}

impl Attachment {
    pub fn new(
        url: impl Into<String>,
        filetype: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            filetype: filetype.into(),
            filename: filename.into(),
        }
    }

    pub fn is_video(&self) -> bool {
        self.filetype == "video"
    }

    /// MIME type used when the file is uploaded or played back.
    pub fn mime_type(&self) -> &'static str {
        if self.is_video() {
            "video/3gp"
        } else {
            "image/jpg"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type() {
        assert_eq!(Attachment::new("u", "video", "a.3gp").mime_type(), "video/3gp");
        assert_eq!(Attachment::new("u", "image", "a.jpg").mime_type(), "image/jpg");
        assert_eq!(Attachment::new("u", "", "a").mime_type(), "image/jpg");
    }
}
