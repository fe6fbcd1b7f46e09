use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{Area, Coord, Distance, Haversine, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

// geo works in (x, y) which is (lon, lat) for geographic data
impl From<Coordinate> for Coord<f64> {
    fn from(val: Coordinate) -> Self {
        Coord {
            x: val.longitude,
            y: val.latitude,
        }
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(val: Coordinate) -> Self {
        Point::new(val.longitude, val.latitude)
    }
}

/// Closed region containment test. Points lying on an edge or a vertex count as
/// contained, so boundary jitter never turns a valid address into an uncovered one.
///
/// Degenerate rings (fewer than 3 distinct vertices or no enclosed area) never
/// contain anything.
pub fn contains(ring: &[Coordinate], point: &Coordinate) -> bool {
    if distinct_vertices(ring) < 3 {
        return false;
    }
    let exterior: LineString<f64> = ring.iter().map(|it| Coord::from(*it)).collect();
    let polygon = Polygon::new(exterior, vec![]);
    if polygon.unsigned_area() == 0.0 {
        return false;
    }
    polygon.coordinate_position(&Coord::from(*point)) != CoordPos::Outside
}

/// Haversine great-circle distance in kilometers.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    Haversine::distance(Point::from(*a), Point::from(*b)) / 1000.0
}

fn distinct_vertices(ring: &[Coordinate]) -> usize {
    let mut distinct: Vec<&Coordinate> = vec![];
    for vertex in ring {
        if !distinct.contains(&vertex) {
            distinct.push(vertex);
            if distinct.len() >= 3 {
                break;
            }
        }
    }
    distinct.len()
}
