//! Quadrilateral frame candidate.

use super::polygon::point_in_polygon;

/// Four-vertex polygon accepted by the shape classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Square {
    vertices: [[f64; 2]; 4],
    centroid: [f64; 2],
    longside: f64,
}

impl Square {
    /// Builds a square from exactly four polygon vertices, in contour order.
    pub fn from_vertices(points: &[[f64; 2]]) -> Option<Self> {
        let vertices: [[f64; 2]; 4] = points.try_into().ok()?;
        let centroid = [
            vertices.iter().map(|v| v[0]).sum::<f64>() / 4.0,
            vertices.iter().map(|v| v[1]).sum::<f64>() / 4.0,
        ];
        let longside = (0..4)
            .map(|i| {
                let a = vertices[i];
                let b = vertices[(i + 1) % 4];
                (b[0] - a[0]).hypot(b[1] - a[1])
            })
            .fold(0.0, f64::max);
        Some(Self {
            vertices,
            centroid,
            longside,
        })
    }

    /// Vertices in contour order.
    pub fn vertices(&self) -> &[[f64; 2]; 4] {
        &self.vertices
    }

    /// Mean of the four vertices.
    pub fn centroid(&self) -> [f64; 2] {
        self.centroid
    }

    /// Length of the longest edge.
    pub fn longside(&self) -> f64 {
        self.longside
    }

    /// Signed containment: positive inside, zero on an edge, negative outside.
    pub fn containment(&self, x: f64, y: f64) -> f64 {
        point_in_polygon(&self.vertices, [x, y])
    }

    /// True when `(x, y)` is strictly inside the square.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.containment(x, y) > 0.0
    }
}
