//! Raster compositing of plan images.
//!
//! All merges allocate a canvas exactly as large as the bounding rectangle
//! of the placed inputs and copy them with opaque overwrite: no scaling, no
//! blending, no alignment. Uncovered canvas stays transparent black.

use crate::loader::LoadOutcome;
use image::{imageops, RgbaImage};

/// Place `top` at (0, 0) and `bottom` directly below it.
pub fn merge_two_vertical(top: &RgbaImage, bottom: &RgbaImage) -> RgbaImage {
    let width = top.width().max(bottom.width());
    let height = top.height() + bottom.height();

    let mut canvas = RgbaImage::new(width, height);
    imageops::replace(&mut canvas, top, 0, 0);
    imageops::replace(&mut canvas, bottom, 0, i64::from(top.height()));
    canvas
}

/// Place `left` at (0, 0) and `right` directly to its right.
pub fn merge_two_horizontal(left: &RgbaImage, right: &RgbaImage) -> RgbaImage {
    let width = left.width() + right.width();
    let height = left.height().max(right.height());

    let mut canvas = RgbaImage::new(width, height);
    imageops::replace(&mut canvas, left, 0, 0);
    imageops::replace(&mut canvas, right, i64::from(left.width()), 0);
    canvas
}

fn fold(images: Vec<RgbaImage>, merge: fn(&RgbaImage, &RgbaImage) -> RgbaImage) -> Option<RgbaImage> {
    let mut iter = images.into_iter();
    let Some(first) = iter.next() else {
        log::info!("No images found");
        return None;
    };
    Some(iter.fold(first, |acc, next| merge(&acc, &next)))
}

/// Stack images top to bottom. `None` for an empty sequence; a single image
/// is returned as is.
pub fn merge_vertical(images: Vec<RgbaImage>) -> Option<RgbaImage> {
    fold(images, merge_two_vertical)
}

/// Line images up left to right. `None` for an empty sequence.
pub fn merge_horizontal(images: Vec<RgbaImage>) -> Option<RgbaImage> {
    fold(images, merge_two_horizontal)
}

/// Stack one day's successfully loaded images; failed loads are dropped.
pub fn compose_group(outcomes: Vec<LoadOutcome>) -> Option<RgbaImage> {
    let images = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            LoadOutcome::Loaded(img) => Some(img),
            LoadOutcome::Failed(failure) => {
                log::warn!("Skipping image: {}", failure);
                None
            }
        })
        .collect();
    merge_vertical(images)
}

/// Put today's and tomorrow's composites side by side.
///
/// A missing side counts as zero-width, so the other side comes back
/// unchanged. `None` only when both are missing.
pub fn assemble(today: Option<RgbaImage>, tomorrow: Option<RgbaImage>) -> Option<RgbaImage> {
    match (today, tomorrow) {
        (Some(a), Some(b)) => Some(merge_two_horizontal(&a, &b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}
