//! Static 2D k-d tree for radius queries.

use crate::util::math::dist2;

/// Immutable 2D k-d tree over a point set.
///
/// Nodes are stored implicitly: the median of each index range sits in the
/// middle of that range, with the split axis alternating by depth.
#[derive(Clone, Debug)]
pub struct KdTree {
    points: Vec<[f64; 2]>,
    order: Vec<usize>,
}

impl KdTree {
    /// Builds the tree; point `i` is reported as index `i` by queries.
    pub fn build(points: &[[f64; 2]]) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        build_range(points, &mut order, 0);
        Self {
            points: points.to_vec(),
            order,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Indices of all points with distance `<= radius` from `center`, ascending.
    pub fn within_radius(&self, center: [f64; 2], radius: f64) -> Vec<usize> {
        let mut hits = Vec::new();
        if radius.is_nan() || radius < 0.0 {
            return hits;
        }
        self.search(0, self.order.len(), 0, center, radius * radius, &mut hits);
        hits.sort_unstable();
        hits
    }

    fn search(
        &self,
        lo: usize,
        hi: usize,
        depth: usize,
        center: [f64; 2],
        r2: f64,
        hits: &mut Vec<usize>,
    ) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let idx = self.order[mid];
        let p = self.points[idx];
        if dist2(p, center) <= r2 {
            hits.push(idx);
        }
        let axis = depth % 2;
        let delta = center[axis] - p[axis];
        let (near, far) = if delta < 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };
        self.search(near.0, near.1, depth + 1, center, r2, hits);
        if delta * delta <= r2 {
            self.search(far.0, far.1, depth + 1, center, r2, hits);
        }
    }
}

fn build_range(points: &[[f64; 2]], order: &mut [usize], depth: usize) {
    if order.len() <= 1 {
        return;
    }
    let axis = depth % 2;
    let mid = order.len() / 2;
    order.select_nth_unstable_by(mid, |&a, &b| points[a][axis].total_cmp(&points[b][axis]));
    let (left, right) = order.split_at_mut(mid);
    build_range(points, left, depth + 1);
    build_range(points, &mut right[1..], depth + 1);
}
