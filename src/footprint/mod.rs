//! Image footprints built from per-extension polygons.
mod member;
mod mosaic;
mod skyline;
mod source;

pub use member::FootprintMember;
pub use mosaic::{best_pair, mosaic_order, overlap_table, MosaicPlan, PairOverlap};
pub use skyline::SkyLine;
pub use source::{ExtensionInfo, ImageLoader, WcsProjector};

/// Parameters for building a [`SkyLine`] from an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkyLineParams {
    /// Extension tag to select, matched case-insensitively as a substring.
    pub extname: String,
}

impl Default for SkyLineParams {
    fn default() -> Self {
        Self {
            extname: "SCI".to_string(),
        }
    }
}

impl SkyLineParams {
    /// Returns these parameters with a different extension tag.
    #[must_use]
    pub fn with_extname(mut self, extname: impl Into<String>) -> Self {
        self.extname = extname.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selects_science_extensions() {
        assert_eq!(SkyLineParams::default().extname, "SCI");
        assert_eq!(SkyLineParams::default().with_extname("err").extname, "err");
    }
}
