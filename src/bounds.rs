use common::{Point, Segment};
use linify::Error;

/// Side of the square the point set is fitted into, in display units.
pub const TARGET_SIZE: f64 = 400.;
pub const MARGIN: f64 = 10.;

/// Uniform scale plus origin mapping raw coordinates onto the display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingTransform {
    pub scale: f64,
    pub origin: Point,
}

impl BoundingTransform {
    /// Fits the axis-aligned bounding box of `points` into a
    /// `target_size` square, keeping aspect ratio.
    ///
    /// An axis with zero extent does not constrain the scale. When both
    /// axes collapse (all points coincide), or the extent is too small or
    /// too large for a finite non-zero scale, `Error::DegenerateExtent` is
    /// returned.
    pub fn new(points: &[Point], target_size: f64) -> Result<BoundingTransform, Error> {
        if !target_size.is_finite() || target_size <= 0. {
            return Err(Error::InvalidTargetSize(target_size));
        }
        let first = points.first().ok_or(Error::EmptyInput)?;
        if let Some((index, &point)) = points.iter().enumerate().find(|&(_, p)| !p.is_finite()) {
            return Err(Error::NonFiniteCoordinate { index, point, });
        }

        let origin = points.iter().fold(*first, |topleft, p| Point {
            x: topleft.x.min(p.x),
            y: topleft.y.min(p.y),
        });
        let extent = points.iter().fold(Point::new(0., 0.), |wh, p| {
            let offset = p.sub(&origin);
            Point { x: wh.x.max(offset.x), y: wh.y.max(offset.y), }
        });

        if !extent.is_finite() {
            return Err(Error::DegenerateExtent { width: extent.x, height: extent.y, });
        }

        let scale = match (extent.x > 0., extent.y > 0.) {
            (true, true) =>
                (target_size / extent.x).min(target_size / extent.y),
            (true, false) =>
                target_size / extent.x,
            (false, true) =>
                target_size / extent.y,
            (false, false) =>
                return Err(Error::DegenerateExtent { width: extent.x, height: extent.y, }),
        };
        if !scale.is_finite() || scale <= 0. {
            return Err(Error::DegenerateExtent { width: extent.x, height: extent.y, });
        }
        debug!("bounding box at {:?} size {:?}, scale {}", origin, extent, scale);

        Ok(BoundingTransform { scale, origin, })
    }

    pub fn to_display(&self, point: &Point, margin: f64) -> Point {
        let offset = point.sub(&self.origin);
        Point {
            x: margin + self.scale * offset.x,
            y: margin + self.scale * offset.y,
        }
    }

    /// Line endpoints in the `[x1, y1, x2, y2]` layout piston expects.
    pub fn segment_to_display(&self, segment: &Segment, margin: f64) -> [f64; 4] {
        let src = self.to_display(&segment.src, margin);
        let dst = self.to_display(&segment.dst, margin);
        [src.x, src.y, dst.x, dst.y]
    }
}
