//! Skyline mosaic demo: plans the combination order of a few synthetic
//! images and prints their footprints.
//!
//! Usage:
//! ```text
//! cargo run --example mosaic
//! RUST_LOG=skyline=debug cargo run --example mosaic
//! ```

use std::collections::HashMap;

use skyline::footprint::{
    mosaic_order, overlap_table, ExtensionInfo, ImageLoader, SkyLine, SkyLineParams,
    WcsProjector,
};

#[derive(Debug, thiserror::Error)]
#[error("unknown image or extension: {0}")]
struct UnknownImage(String);

/// Synthetic two-chip images on a dither pattern.
struct DitherSet {
    chips: HashMap<String, Vec<(String, Vec<(f64, f64)>)>>,
}

impl DitherSet {
    fn new(offsets: &[(f64, f64)]) -> Self {
        let mut chips = HashMap::new();
        for (i, &(dlon, dlat)) in offsets.iter().enumerate() {
            let (lon, lat) = (150.0 + dlon, 2.2 + dlat);
            let extensions = [("SCI", 0.0), ("ERR", 0.0), ("SCI", 0.0255)]
                .iter()
                .map(|&(name, shift)| {
                    let lat = lat + shift;
                    let corners = vec![
                        (lon, lat),
                        (lon + 0.05, lat),
                        (lon + 0.05, lat + 0.025),
                        (lon, lat + 0.025),
                    ];
                    (name.to_string(), corners)
                })
                .collect();
            chips.insert(format!("exposure{i}"), extensions);
        }
        Self { chips }
    }
}

impl ImageLoader for DitherSet {
    type Error = UnknownImage;

    fn list_extensions(&self, image_id: &str) -> Result<Vec<ExtensionInfo>, UnknownImage> {
        let extensions = self
            .chips
            .get(image_id)
            .ok_or_else(|| UnknownImage(image_id.to_string()))?;
        Ok(extensions
            .iter()
            .enumerate()
            .map(|(i, (name, _))| ExtensionInfo::new(i + 1, name.clone()))
            .collect())
    }
}

impl WcsProjector for DitherSet {
    type Error = UnknownImage;

    fn project_footprint(
        &self,
        image_id: &str,
        extension: usize,
    ) -> Result<Vec<(f64, f64)>, UnknownImage> {
        self.chips
            .get(image_id)
            .zip(extension.checked_sub(1))
            .and_then(|(extensions, index)| extensions.get(index))
            .map(|(_, corners)| corners.clone())
            .ok_or_else(|| UnknownImage(format!("{image_id}[{extension}]")))
    }
}

fn main() -> skyline::Result<()> {
    // Default: WARN for everything, INFO for skyline.
    // Override with RUST_LOG env var (e.g. RUST_LOG=skyline=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("mosaic=info".parse().unwrap_or_default())
        .add_directive("skyline=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let set = DitherSet::new(&[(0.0, 0.0), (0.01, 0.008), (0.3, 0.0), (0.02, -0.004)]);
    let params = SkyLineParams::default();

    let mut images = Vec::new();
    for i in 0..4 {
        let image_id = format!("exposure{i}");
        let sky = SkyLine::from_image(&set, &set, &image_id, &params)?;
        tracing::info!(
            image_id,
            members = sky.members().len(),
            components = sky.region().len(),
            area_sr = sky.area(),
            "loaded footprint"
        );
        images.push(sky);
    }

    for pair in overlap_table(&images)? {
        println!(
            "exposure{} vs exposure{}: {:.3}",
            pair.first, pair.second, pair.overlap
        );
    }

    let plan = mosaic_order(&images)?;
    println!("combination order: {:?}", plan.order);
    for (i, component) in plan.reference.region().components().iter().enumerate() {
        println!("component {i}:");
        for (lon, lat) in component.to_lonlat_deg() {
            println!("  {lon:.6} {lat:.6}");
        }
    }

    Ok(())
}
