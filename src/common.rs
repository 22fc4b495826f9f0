#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y, }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn sub(&self, other: &Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y, }
    }

    /// z-component of the 2-D cross product
    pub fn cross(&self, other: &Point) -> f64 {
        self.x * other.y - other.x * self.y
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub src: Point,
    pub dst: Point,
}
