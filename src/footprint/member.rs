use std::hash::{Hash, Hasher};

use crate::geometry::SphericalPolygon;

/// The footprint of one image extension.
///
/// Two members are the same member when they name the same image and
/// extension, whatever their polygons.
#[derive(Debug, Clone)]
pub struct FootprintMember {
    image_id: String,
    extension: usize,
    polygon: SphericalPolygon,
}

impl FootprintMember {
    /// Creates a member for extension `extension` of image `image_id`.
    #[must_use]
    pub fn new(image_id: impl Into<String>, extension: usize, polygon: SphericalPolygon) -> Self {
        Self {
            image_id: image_id.into(),
            extension,
            polygon,
        }
    }

    /// Returns the image identifier.
    #[must_use]
    pub fn image_id(&self) -> &str {
        &self.image_id
    }

    /// Returns the extension index within the image.
    #[must_use]
    pub fn extension(&self) -> usize {
        self.extension
    }

    /// Returns the projected footprint of the extension.
    #[must_use]
    pub fn polygon(&self) -> &SphericalPolygon {
        &self.polygon
    }
}

impl PartialEq for FootprintMember {
    fn eq(&self, other: &Self) -> bool {
        self.extension == other.extension && self.image_id == other.image_id
    }
}

impl Eq for FootprintMember {}

impl Hash for FootprintMember {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.image_id.hash(state);
        self.extension.hash(state);
    }
}
