//! Geospatial layer payload.

/// Image returned by `/api/map`.
///
/// The bytes are kept opaque; the dashboard only reports what it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapImage {
    /// Raw response body.
    pub bytes: Vec<u8>,
    /// `Content-Type` header, when the server sent one.
    pub content_type: Option<String>,
}

impl MapImage {
    /// Size of the payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the payload starts with the PNG signature.
    #[must_use]
    pub fn is_png(&self) -> bool {
        self.bytes.starts_with(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'])
    }

    /// Human-readable size, e.g. `1.2 MB`.
    #[must_use]
    pub fn size_string(&self) -> String {
        let len = self.len() as f64;
        if len >= 1024.0 * 1024.0 {
            format!("{:.1} MB", len / (1024.0 * 1024.0))
        } else if len >= 1024.0 {
            format!("{:.1} KB", len / 1024.0)
        } else {
            format!("{} B", self.len())
        }
    }
}
