//! Contracts for the collaborators that read images and project them onto
//! the sky. Implementations live outside this crate.

/// An extension of an image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionInfo {
    pub index: usize,
    pub name: String,
}

impl ExtensionInfo {
    #[must_use]
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }

    /// Whether the extension name contains `tag`, ignoring ASCII case.
    #[must_use]
    pub fn matches(&self, tag: &str) -> bool {
        self.name
            .to_ascii_uppercase()
            .contains(&tag.to_ascii_uppercase())
    }
}

/// Lists the extensions of an image.
pub trait ImageLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the image's extensions in file order.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if the image cannot be read.
    fn list_extensions(&self, image_id: &str) -> Result<Vec<ExtensionInfo>, Self::Error>;
}

/// Projects an extension's pixel boundary onto the sky.
pub trait WcsProjector {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the extension's boundary as `(longitude, latitude)` pairs in
    /// degrees, consistently wound.
    ///
    /// # Errors
    ///
    /// Returns the projector's error if the WCS cannot be evaluated.
    fn project_footprint(
        &self,
        image_id: &str,
        extension: usize,
    ) -> Result<Vec<(f64, f64)>, Self::Error>;
}
