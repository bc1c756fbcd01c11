//! Geometry routines.
//!
//! Provides the coordinate types shared by the element model and the output
//! records, and the bounding-box merge used when text fragments are grouped.

use crate::error::{ChunkError, Result};

/// A 2D point (x, y) in the layout engine's coordinate space.
pub type Point = (f64, f64);

/// An element's bounding polygon, in the order the layout engine reported it.
pub type PointSet = Vec<Point>;

/// An axis-aligned rectangle as four corners:
/// `(min_x, min_y), (min_x, max_y), (max_x, max_y), (max_x, min_y)`.
pub type Quad = [Point; 4];

/// A rectangle defined by (x0, y0, x1, y1) where (x0, y0) is the minimum corner.
pub type Rect = (f64, f64, f64, f64);

/// Expands `rect` so that it covers `pt`.
#[inline]
fn extend_rect(rect: Rect, pt: Point) -> Rect {
    let (x0, y0, x1, y1) = rect;
    let (x, y) = pt;
    (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
}

/// Converts a (x0, y0, x1, y1) rectangle into its four corners.
pub fn rect_to_quad(rect: Rect) -> Quad {
    let (x0, y0, x1, y1) = rect;
    [(x0, y0), (x0, y1), (x1, y1), (x1, y0)]
}

/// Returns the tight (x0, y0, x1, y1) bounds of a single point set.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    let (&first, rest) = points.split_first()?;
    let seed = (first.0, first.1, first.0, first.1);
    Some(rest.iter().fold(seed, |acc, &pt| extend_rect(acc, pt)))
}

/// Computes the minimal axis-aligned rectangle enclosing every point of
/// every point set.
///
/// Fails with [`ChunkError::InvalidGeometry`] when `point_sets` is empty or
/// contains an empty point set, since neither has a defined minimum.
pub fn merge_bounding_boxes<P: AsRef<[Point]>>(point_sets: &[P]) -> Result<Quad> {
    let mut bounds: Option<Rect> = None;

    for (idx, points) in point_sets.iter().enumerate() {
        let (x0, y0, x1, y1) = points_bounds(points.as_ref()).ok_or_else(|| {
            ChunkError::InvalidGeometry(format!("point set {idx} has no points"))
        })?;
        bounds = Some(match bounds {
            Some(rect) => extend_rect(extend_rect(rect, (x0, y0)), (x1, y1)),
            None => (x0, y0, x1, y1),
        });
    }

    bounds
        .map(rect_to_quad)
        .ok_or_else(|| ChunkError::InvalidGeometry("no point sets to merge".to_string()))
}
