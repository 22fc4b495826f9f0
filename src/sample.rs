use std::f64::consts::PI;

use rand::Rng;

use common::Point;

/// Measured contour used as the default input: a slightly wobbly vertical
/// edge that turns into an almost horizontal one.
pub fn reference_contour() -> Vec<Point> {
    [
        (0.849999487, -1.47224224),
        (0.848479152, -1.01117814),
        (0.842648506, -0.707066119),
        (0.848704576, -0.489999771),
        (0.845723033, -0.307818025),
        (0.846934378, -0.149337426),
        (0.859999716, 0.),
        (0.846934378, 0.149337381),
        (0.845723033, 0.307817996),
        (0.848704517, 0.489999801),
        (0.842648506, 0.707066059),
        (0.848479271, 1.01117814),
        (0.599999666, 1.03923011),
        (0.376222014, 1.03366148),
        (0.184067041, 1.04389584),
        (0., 1.0399996),
        (-0.184066996, 1.04389584),
        (-0.376221985, 1.03366148),
        (-0.599999726, 1.03922999),
        (-0.874190629, 1.04181993),
        (-1.24099123, 1.04131532),
    ]
        .iter()
        .map(|&(x, y)| Point::new(x, y))
        .collect()
}

const MIN_STEPS: usize = 2;
const MAX_STEPS: usize = 6;
const MIN_TURN: f64 = 0.5;
const MAX_TURN: f64 = 2.5;

/// Random path made of `runs` exactly straight runs.
///
/// Every run has at least two steps and every turn is sharp enough to
/// break a run at the default tolerance, so each run maps to one segment.
pub fn random_path<R: Rng>(rng: &mut R, runs: usize) -> Vec<Point> {
    let mut corner = Point::new(0., 0.);
    let mut heading = rng.gen_range(0., 2. * PI);
    let mut points = vec![corner];
    for _ in 0 .. runs {
        let steps = rng.gen_range(MIN_STEPS, MAX_STEPS + 1);
        let step = rng.gen_range(0.2, 0.5);
        let (dx, dy) = (heading.cos() * step, heading.sin() * step);
        for i in 1 ..= steps {
            points.push(Point::new(corner.x + dx * i as f64, corner.y + dy * i as f64));
        }
        corner = points[points.len() - 1];

        let turn = rng.gen_range(MIN_TURN, MAX_TURN);
        heading += if rng.gen() { turn } else { -turn };
    }
    points
}
