//! Ordering images for mosaicking.
//!
//! Images are combined starting from the pair that overlaps most; the
//! reference footprint then grows one image at a time, always taking the
//! image that overlaps the reference most.
use tracing::debug;

use crate::error::Result;

use super::skyline::SkyLine;

/// Overlap between two footprints, by index into the input slice.
///
/// `overlap` is the fraction of `first`'s area covered by `second`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairOverlap {
    pub first: usize,
    pub second: usize,
    pub overlap: f64,
}

/// The order in which to combine images, and the combined footprint.
#[derive(Debug, Clone)]
pub struct MosaicPlan {
    /// Input indices in combination order; every input appears once.
    pub order: Vec<usize>,
    /// Union of all inputs.
    pub reference: SkyLine,
}

/// Overlaps of every pair `i < j`, in row order.
///
/// # Errors
///
/// Returns an error if an intersection cannot be computed.
pub fn overlap_table(skylines: &[SkyLine]) -> Result<Vec<PairOverlap>> {
    let mut table = Vec::new();
    for (first, a) in skylines.iter().enumerate() {
        for (second, b) in skylines.iter().enumerate().skip(first + 1) {
            table.push(PairOverlap {
                first,
                second,
                overlap: a.overlap(b)?,
            });
        }
    }
    Ok(table)
}

/// The pair with the largest positive overlap; the earliest pair wins ties.
///
/// # Errors
///
/// Returns an error if an intersection cannot be computed.
pub fn best_pair(skylines: &[SkyLine]) -> Result<Option<PairOverlap>> {
    let mut best: Option<PairOverlap> = None;
    for pair in overlap_table(skylines)? {
        if pair.overlap > best.map_or(0.0, |b| b.overlap) {
            best = Some(pair);
        }
    }
    Ok(best)
}

/// Plans the combination order.
///
/// Starts from [`best_pair`] (or the first image when nothing overlaps),
/// then repeatedly adds the remaining image with the largest overlap
/// against the accumulated reference. Images that overlap nothing are
/// appended last, in input order.
///
/// # Errors
///
/// Returns an error if an overlap or union cannot be computed.
pub fn mosaic_order(skylines: &[SkyLine]) -> Result<MosaicPlan> {
    let mut reference = SkyLine::empty();
    let mut order = Vec::with_capacity(skylines.len());
    let mut remaining: Vec<usize> = (0..skylines.len()).collect();

    let seeds = match best_pair(skylines)? {
        Some(pair) => vec![pair.first, pair.second],
        None => remaining.first().copied().into_iter().collect(),
    };
    for index in seeds {
        reference.accumulate(&skylines[index])?;
        order.push(index);
        remaining.retain(|&i| i != index);
    }

    loop {
        let mut next: Option<(usize, f64)> = None;
        for (slot, &index) in remaining.iter().enumerate() {
            let overlap = skylines[index].overlap(&reference)?;
            if overlap > next.map_or(0.0, |(_, best)| best) {
                next = Some((slot, overlap));
            }
        }
        let Some((slot, overlap)) = next else {
            break;
        };
        let index = remaining.remove(slot);
        debug!(index, overlap, "adding image to mosaic reference");
        reference.accumulate(&skylines[index])?;
        order.push(index);
    }

    for index in remaining {
        reference.accumulate(&skylines[index])?;
        order.push(index);
    }

    Ok(MosaicPlan { order, reference })
}
