use common::{Point, Segment};
use bounds::BoundingTransform;

/// Default threshold for twice the triangle area spanned by three points.
pub const COLLINEAR_TOLERANCE: f64 = 0.005;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    EmptyInput,
    NonFiniteCoordinate { index: usize, point: Point, },
    DegenerateExtent { width: f64, height: f64, },
    InvalidTolerance(f64),
    InvalidTargetSize(f64),
}

/// How the run still open after the scan is closed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TailPolicy {
    /// Close the open run with a new segment ending at the last point.
    Append,
    /// Replace the last emitted segment with the open run, ending at the last point.
    /// Drops the previously emitted run when there was at least one turn.
    OverwriteLast,
}

impl Default for TailPolicy {
    fn default() -> TailPolicy {
        TailPolicy::Append
    }
}

/// Checks whether `p1`, `p2`, `p3` lie on one line.
///
/// The test compares the absolute value of twice the signed triangle area
/// `(p2 - p1) x (p3 - p1)` against `tolerance`, so it is not normalized by
/// point spacing. The result for non-finite coordinates is unspecified.
pub fn is_line(p1: &Point, p2: &Point, p3: &Point, tolerance: f64) -> bool {
    p2.sub(p1).cross(&p3.sub(p1)).abs() < tolerance
}

/// Greedy single pass reduction of `points` into straight segments.
///
/// Fewer than three points give no segments, three points give one segment
/// from the first point to the last. A new run starts at the end
/// of the previous one, so consecutive segments always share an endpoint.
pub fn solve(points: &[Point], tolerance: f64, tail: TailPolicy) -> Vec<Segment> {
    if points.len() < 3 {
        return Vec::new();
    }
    let last = points[points.len() - 1];

    let mut lines = Vec::new();
    let mut src = points[0];
    let mut dst = points[1];
    for k in 1 .. points.len() - 2 {
        if is_line(&points[k - 1], &points[k], &points[k + 1], tolerance) {
            dst = points[k + 1];
        } else {
            debug!("run break at point #{}: {:?} -> {:?}", k, src, dst);
            lines.push(Segment { src, dst, });
            src = dst;
        }
    }

    let tail_segment = Segment { src, dst: last, };
    match tail {
        TailPolicy::Append =>
            (),
        TailPolicy::OverwriteLast => {
            lines.pop();
        },
    }
    lines.push(tail_segment);
    lines
}

/// Anything that can hand points and segments to a renderer.
pub trait Scene {
    fn points(&self) -> &[Point];
    fn segments(&self) -> &[Segment];
}

/// Segmentation engine bound to one validated point sequence.
///
/// The segments are computed on the first `solve` call and kept afterwards.
pub struct Linify {
    points: Vec<Point>,
    tolerance: f64,
    tail: TailPolicy,
    lines: Vec<Segment>,
    solved: bool,
}

impl Linify {
    pub fn new(points: Vec<Point>) -> Result<Linify, Error> {
        if let Some((index, &point)) = points.iter().enumerate().find(|&(_, p)| !p.is_finite()) {
            return Err(Error::NonFiniteCoordinate { index, point, });
        }
        Ok(Linify {
            points,
            tolerance: COLLINEAR_TOLERANCE,
            tail: TailPolicy::default(),
            lines: Vec::new(),
            solved: false,
        })
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Linify, Error> {
        if !tolerance.is_finite() || tolerance <= 0. {
            return Err(Error::InvalidTolerance(tolerance));
        }
        self.tolerance = tolerance;
        self.reset();
        Ok(self)
    }

    pub fn with_tail_policy(mut self, tail: TailPolicy) -> Linify {
        self.tail = tail;
        self.reset();
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn solve(&mut self) -> &[Segment] {
        if !self.solved {
            self.lines = solve(&self.points, self.tolerance, self.tail);
            self.solved = true;
            info!("{} points reduced to {} segments", self.points.len(), self.lines.len());
        }
        &self.lines
    }

    /// Segments from the last `solve` call, empty before the first one.
    pub fn lines(&self) -> &[Segment] {
        &self.lines
    }

    pub fn bounding_transform(&self, target_size: f64) -> Result<BoundingTransform, Error> {
        BoundingTransform::new(&self.points, target_size)
    }

    fn reset(&mut self) {
        self.lines.clear();
        self.solved = false;
    }
}

impl Scene for Linify {
    fn points(&self) -> &[Point] {
        &self.points
    }

    fn segments(&self) -> &[Segment] {
        self.lines()
    }
}

#[cfg(test)]
mod tests {
    use common::{Point, Segment};
    use super::{is_line, solve, Error, Linify, Scene, TailPolicy, COLLINEAR_TOLERANCE};

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn right_angle() -> Vec<Point> {
        pts(&[(0., 0.), (1., 0.), (2., 0.), (2., 1.), (2., 2.)])
    }

    #[test]
    fn exact_collinear_triple() {
        assert!(is_line(&Point::new(1., 1.), &Point::new(2., 2.), &Point::new(3., 3.), COLLINEAR_TOLERANCE));
    }

    #[test]
    fn perturbed_triple() {
        assert!(!is_line(&Point::new(1., 1.), &Point::new(2., 2.), &Point::new(3., 3.1), COLLINEAR_TOLERANCE));
    }

    #[test]
    fn area_at_tolerance_is_not_a_line() {
        let (a, b, c) = (Point::new(0., 0.), Point::new(1., 0.), Point::new(0., 0.5));
        assert!(!is_line(&a, &b, &c, 0.5));
        assert!(is_line(&a, &b, &c, 0.5000001));
    }

    #[test]
    fn tolerance_is_unscaled_area() {
        // same shape, ten times smaller: area shrinks by a hundred and passes
        let (a, b, c) = (Point::new(0., 0.), Point::new(1., 0.), Point::new(2., 0.1));
        assert!(!is_line(&a, &b, &c, COLLINEAR_TOLERANCE));
        let (a, b, c) = (Point::new(0., 0.), Point::new(0.1, 0.), Point::new(0.2, 0.01));
        assert!(is_line(&a, &b, &c, COLLINEAR_TOLERANCE));
    }

    #[test]
    fn predicate_ignores_relabeling() {
        let (a, b, c) = (Point::new(0., 0.), Point::new(1., 0.3), Point::new(2., -0.4));
        let expected = is_line(&a, &b, &c, 0.5);
        assert_eq!(is_line(&c, &a, &b, 0.5), expected);
        assert_eq!(is_line(&b, &a, &c, 0.5), expected);
    }

    #[test]
    fn straight_path_single_segment() {
        let points = pts(&[(0., 0.), (1., 1.), (2., 2.), (3., 3.), (4., 4.), (5., 5.)]);
        let lines = solve(&points, COLLINEAR_TOLERANCE, TailPolicy::Append);
        assert_eq!(lines, vec![Segment { src: points[0], dst: points[5], }]);
    }

    #[test]
    fn right_angle_two_segments() {
        let points = right_angle();
        let lines = solve(&points, COLLINEAR_TOLERANCE, TailPolicy::Append);
        assert_eq!(lines, vec![
            Segment { src: Point::new(0., 0.), dst: Point::new(2., 0.), },
            Segment { src: Point::new(2., 0.), dst: Point::new(2., 2.), },
        ]);
        assert!(lines.iter().all(|l| points.contains(&l.src) && points.contains(&l.dst)));
    }

    #[test]
    fn overwrite_last_drops_previous_run() {
        let lines = solve(&right_angle(), COLLINEAR_TOLERANCE, TailPolicy::OverwriteLast);
        assert_eq!(lines, vec![Segment { src: Point::new(2., 0.), dst: Point::new(2., 2.), }]);
    }

    #[test]
    fn overwrite_last_without_breaks_appends() {
        let points = pts(&[(0., 0.), (1., 0.), (2., 0.), (3., 0.)]);
        let lines = solve(&points, COLLINEAR_TOLERANCE, TailPolicy::OverwriteLast);
        assert_eq!(lines, vec![Segment { src: points[0], dst: points[3], }]);
    }

    #[test]
    fn consecutive_segments_are_contiguous() {
        let points = pts(&[
            (0., 0.), (1., 0.), (2., 0.),
            (2., 1.), (2., 2.),
            (3., 3.), (4., 4.), (5., 5.),
        ]);
        let lines = solve(&points, COLLINEAR_TOLERANCE, TailPolicy::Append);
        assert_eq!(lines.len(), 3);
        for pair in lines.windows(2) {
            assert_eq!(pair[0].dst, pair[1].src);
        }
        assert_eq!(lines[0].src, points[0]);
        assert_eq!(lines[2].dst, points[7]);
    }

    #[test]
    fn short_inputs() {
        assert!(solve(&[], COLLINEAR_TOLERANCE, TailPolicy::Append).is_empty());
        assert!(solve(&pts(&[(1., 2.)]), COLLINEAR_TOLERANCE, TailPolicy::Append).is_empty());

        let two = pts(&[(0., 0.), (3., 4.)]);
        assert!(solve(&two, COLLINEAR_TOLERANCE, TailPolicy::Append).is_empty());
        assert!(solve(&two, COLLINEAR_TOLERANCE, TailPolicy::OverwriteLast).is_empty());

        let three = pts(&[(0., 0.), (1., 5.), (2., 0.)]);
        assert_eq!(solve(&three, COLLINEAR_TOLERANCE, TailPolicy::Append), vec![Segment { src: three[0], dst: three[2], }]);
    }

    #[test]
    fn engine_rejects_non_finite() {
        let points = pts(&[(0., 0.), (1., ::std::f64::NAN), (2., 2.)]);
        match Linify::new(points) {
            Err(Error::NonFiniteCoordinate { index: 1, .. }) =>
                (),
            other =>
                panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn engine_rejects_bad_tolerance() {
        let linify = Linify::new(right_angle()).unwrap();
        assert_eq!(linify.with_tolerance(0.).err(), Some(Error::InvalidTolerance(0.)));
        let linify = Linify::new(right_angle()).unwrap();
        assert!(linify.with_tolerance(::std::f64::INFINITY).is_err());
    }

    #[test]
    fn engine_solve_is_cached_and_idempotent() {
        let mut linify = Linify::new(right_angle()).unwrap();
        assert!(linify.lines().is_empty());
        let first = linify.solve().to_vec();
        let second = linify.solve().to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(linify.segments(), &first[..]);
        assert_eq!(linify.points().len(), 5);
    }

    #[test]
    fn engine_empty_input() {
        let mut linify = Linify::new(Vec::new()).unwrap();
        assert!(linify.solve().is_empty());
        let mut linify = Linify::new(pts(&[(1., 1.)])).unwrap();
        assert!(linify.solve().is_empty());
        let mut linify = Linify::new(pts(&[(1., 1.), (2., 2.)])).unwrap();
        assert!(linify.solve().is_empty());
    }

    #[test]
    fn engine_tolerance_changes_result() {
        let points = pts(&[(0., 0.), (1., 0.), (2., 0.), (3., 0.2), (4., 0.4), (5., 0.6)]);
        let mut strict = Linify::new(points.clone()).unwrap();
        assert_eq!(strict.solve().len(), 2);
        let mut loose = Linify::new(points).unwrap().with_tolerance(1.).unwrap();
        assert!(is_line(&Point::new(1., 0.), &Point::new(2., 0.), &Point::new(3., 0.2), loose.tolerance()));
        assert_eq!(loose.solve().len(), 1);
    }
}
