use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::{FootprintError, Result};
use crate::geometry::{MultiPolygonSet, SkyPoint, SphericalPolygon};
use crate::operations::boolean::MultiUnion;

use super::member::FootprintMember;
use super::source::{ImageLoader, WcsProjector};
use super::SkyLineParams;

/// The footprint of one or more images on the sky.
///
/// A `SkyLine` pairs a region with the list of extension footprints that
/// produced it. Members keep insertion order and appear once; when two
/// members name the same image extension, the first one seen is kept.
///
/// Geometry queries are answered by the region. Cloning copies the region
/// and shares the members.
#[derive(Debug, Clone, Default)]
pub struct SkyLine {
    region: MultiPolygonSet,
    members: Vec<Arc<FootprintMember>>,
}

impl SkyLine {
    /// Returns the empty footprint: no members, empty region.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the footprint of an image from its matching extensions.
    ///
    /// Extensions whose name contains `params.extname` (ignoring case) are
    /// projected in file order, and their polygons are unioned.
    ///
    /// # Errors
    ///
    /// - `FootprintError::Source` if a collaborator fails.
    /// - `FootprintError::NoMatchingExtensions` if no extension matches.
    /// - A geometry error if a projected boundary is not a valid polygon.
    pub fn from_image<L, P>(
        loader: &L,
        projector: &P,
        image_id: &str,
        params: &SkyLineParams,
    ) -> Result<Self>
    where
        L: ImageLoader,
        P: WcsProjector,
    {
        let extensions = loader
            .list_extensions(image_id)
            .map_err(|e| source_error(image_id, e))?;

        let mut members = Vec::new();
        for extension in extensions.iter().filter(|e| e.matches(&params.extname)) {
            let boundary = projector
                .project_footprint(image_id, extension.index)
                .map_err(|e| source_error(image_id, e))?;
            let polygon = SphericalPolygon::from_lonlat_deg(&boundary)?;
            members.push(FootprintMember::new(image_id, extension.index, polygon));
        }

        if members.is_empty() {
            return Err(FootprintError::NoMatchingExtensions {
                image_id: image_id.to_string(),
                extname: params.extname.clone(),
            }
            .into());
        }

        debug!(
            image_id,
            extensions = extensions.len(),
            members = members.len(),
            "building image footprint"
        );
        Self::from_members(members)
    }

    /// Builds a footprint from members; the region is their union.
    ///
    /// # Errors
    ///
    /// Returns an error if the union fails.
    pub fn from_members(members: impl IntoIterator<Item = FootprintMember>) -> Result<Self> {
        let members = unique_members(members.into_iter().map(Arc::new));
        if members.is_empty() {
            return Ok(Self::empty());
        }
        let polygons: Vec<SphericalPolygon> =
            members.iter().map(|m| m.polygon().clone()).collect();
        let region = MultiUnion::new(&polygons).execute()?;
        Ok(Self { region, members })
    }

    /// Union of two footprints.
    ///
    /// Members are this footprint's followed by the other's unseen ones.
    /// The region is over-approximated where the two enclose an uncovered
    /// window: holes are filled, so `contains_point` reports points that no
    /// member covers.
    ///
    /// # Errors
    ///
    /// Returns an error if the region union fails.
    pub fn union(&self, other: &SkyLine) -> Result<SkyLine> {
        let region = self.region.union(&other.region)?;
        let members = unique_members(self.members.iter().chain(&other.members).cloned());
        Ok(Self { region, members })
    }

    /// Intersection of two footprints.
    ///
    /// Members of either footprint are kept, in order, when their polygon
    /// overlaps the resulting region with positive area. A member that only
    /// touches the region along its boundary is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the region intersection fails.
    pub fn intersection(&self, other: &SkyLine) -> Result<SkyLine> {
        let region = self.region.intersection(&other.region)?;
        let mut retained = Vec::new();
        for member in self.members.iter().chain(&other.members) {
            if region.intersect_polygon(member.polygon())?.area() > 0.0 {
                retained.push(Arc::clone(member));
            }
        }
        Ok(Self {
            region,
            members: unique_members(retained),
        })
    }

    /// Replaces region and members together.
    pub fn replace_state(&mut self, region: MultiPolygonSet, members: Vec<Arc<FootprintMember>>) {
        self.region = region;
        self.members = unique_members(members);
    }

    /// Unions `other` into this footprint.
    ///
    /// # Errors
    ///
    /// Returns an error if the union fails; `self` is left unchanged.
    pub fn accumulate(&mut self, other: &SkyLine) -> Result<()> {
        let merged = self.union(other)?;
        self.replace_state(merged.region, merged.members);
        Ok(())
    }

    /// Returns the covered region.
    #[must_use]
    pub fn region(&self) -> &MultiPolygonSet {
        &self.region
    }

    /// Returns the members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[Arc<FootprintMember>] {
        &self.members
    }

    /// Returns `true` if there are no members and no region.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.region.is_empty()
    }

    /// Returns one inside point per region component.
    #[must_use]
    pub fn inside_points(&self) -> Vec<SkyPoint> {
        self.region.inside_points()
    }

    /// Returns `true` if the region contains `point`, boundary included.
    #[must_use]
    pub fn contains_point(&self, point: &SkyPoint) -> bool {
        self.region.contains_point(point)
    }

    /// Returns `true` if the region shares a point with `polygon`.
    #[must_use]
    pub fn intersects_poly(&self, polygon: &SphericalPolygon) -> bool {
        self.region.intersects_poly(polygon)
    }

    /// Returns `true` if the arc `from -> to` touches the region boundary.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the arc is undefined.
    pub fn intersects_arc(&self, from: &SkyPoint, to: &SkyPoint) -> Result<bool> {
        self.region.intersects_arc(from, to)
    }

    /// Returns the region area in steradians.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.region.area()
    }

    /// Fraction of this footprint's area covered by `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if the intersection cannot be computed.
    pub fn overlap(&self, other: &SkyLine) -> Result<f64> {
        self.region.overlap(&other.region)
    }

    /// Returns `true` if both regions have the same boundary points.
    #[must_use]
    pub fn same_points_as(&self, other: &SkyLine) -> bool {
        self.region.same_points_as(&other.region)
    }
}

fn source_error<E>(image_id: &str, error: E) -> FootprintError
where
    E: std::error::Error + Send + Sync + 'static,
{
    FootprintError::Source {
        image_id: image_id.to_string(),
        source: Box::new(error),
    }
}

/// Keeps the first of each member identity, preserving order.
fn unique_members(
    members: impl IntoIterator<Item = Arc<FootprintMember>>,
) -> Vec<Arc<FootprintMember>> {
    let mut seen = HashSet::new();
    members
        .into_iter()
        .filter(|m| seen.insert(Arc::clone(m)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rect(lon: f64, lat: f64, dlon: f64, dlat: f64) -> SphericalPolygon {
        SphericalPolygon::from_lonlat_deg(&[
            (lon, lat),
            (lon + dlon, lat),
            (lon + dlon, lat + dlat),
            (lon, lat + dlat),
        ])
        .unwrap()
    }

    fn image(id: &str, lon: f64) -> SkyLine {
        SkyLine::from_members([
            FootprintMember::new(id, 1, rect(lon, 0.0, 1.0, 0.5)),
            FootprintMember::new(id, 4, rect(lon, 0.6, 1.0, 0.5)),
        ])
        .unwrap()
    }

    #[test]
    fn empty_skyline() {
        let empty = SkyLine::empty();
        assert!(empty.is_empty());
        assert_abs_diff_eq!(empty.area(), 0.0);
        assert!(SkyLine::from_members([]).unwrap().is_empty());
    }

    #[test]
    fn chips_with_gap_stay_separate() {
        let a = image("a", 0.0);
        assert_eq!(a.members().len(), 2);
        assert_eq!(a.region().len(), 2);
        assert_eq!(a.inside_points().len(), 2);
    }

    #[test]
    fn duplicate_members_first_seen_wins() {
        let sky = SkyLine::from_members([
            FootprintMember::new("a", 1, rect(0.0, 0.0, 1.0, 1.0)),
            FootprintMember::new("a", 1, rect(5.0, 0.0, 1.0, 1.0)),
        ])
        .unwrap();
        assert_eq!(sky.members().len(), 1);
        assert!(sky.contains_point(&SkyPoint::from_lonlat_deg(0.5, 0.5).unwrap()));
        assert!(!sky.contains_point(&SkyPoint::from_lonlat_deg(5.5, 0.5).unwrap()));
    }

    #[test]
    fn union_members_in_order() {
        let a = image("a", 0.0);
        let b = image("b", 0.5);
        let u = a.union(&b).unwrap();
        let ids: Vec<_> = u
            .members()
            .iter()
            .map(|m| (m.image_id().to_string(), m.extension()))
            .collect();
        assert_eq!(
            ids,
            [("a".to_string(), 1), ("a".to_string(), 4), ("b".to_string(), 1), ("b".to_string(), 4)]
        );
        assert_eq!(a.union(&a).unwrap().members().len(), 2);
    }

    #[test]
    fn intersection_drops_unreached_members() {
        let a = image("a", 0.0);
        let low = SkyLine::from_members([FootprintMember::new("c", 1, rect(0.2, 0.1, 0.3, 0.2))])
            .unwrap();
        let shared = a.intersection(&low).unwrap();
        let exts: Vec<_> = shared
            .members()
            .iter()
            .map(|m| (m.image_id().to_string(), m.extension()))
            .collect();
        assert_eq!(exts, [("a".to_string(), 1), ("c".to_string(), 1)]);
    }

    #[test]
    fn intersection_drops_members_touching_only_an_edge() {
        let a = SkyLine::from_members([FootprintMember::new("a", 1, rect(0.0, 0.0, 1.0, 1.0))])
            .unwrap();
        let c = SkyLine::from_members([
            FootprintMember::new("c", 1, rect(0.5, 0.0, 0.5, 1.0)),
            FootprintMember::new("c", 2, rect(1.0, 0.0, 1.0, 1.0)),
        ])
        .unwrap();
        let shared = a.intersection(&c).unwrap();
        let edge_only = c.members()[1].polygon();
        assert!(shared.intersects_poly(edge_only));

        let exts: Vec<_> = shared
            .members()
            .iter()
            .map(|m| (m.image_id().to_string(), m.extension()))
            .collect();
        assert_eq!(exts, [("a".to_string(), 1), ("c".to_string(), 1)]);
    }

    #[test]
    fn accumulate_replaces_state() {
        let mut acc = SkyLine::empty();
        acc.accumulate(&image("a", 0.0)).unwrap();
        acc.accumulate(&image("b", 10.0)).unwrap();
        assert_eq!(acc.members().len(), 4);
        assert_eq!(acc.region().len(), 4);
        let area = image("a", 0.0).area() + image("b", 10.0).area();
        assert!((acc.area() - area).abs() < 1e-15);
    }

    #[test]
    fn replace_state_dedups() {
        let a = image("a", 0.0);
        let mut sky = SkyLine::empty();
        let doubled: Vec<_> = a.members().iter().chain(a.members()).cloned().collect();
        sky.replace_state(a.region().clone(), doubled);
        assert_eq!(sky.members().len(), 2);
        assert!(sky.same_points_as(&a));
    }
}
