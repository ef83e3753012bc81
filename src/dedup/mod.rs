//! Removal of uncoded targets that belong to a coded target.
//!
//! The rings of a coded target often produce dot-like ellipses and frames
//! of their own. Any uncoded target whose centre lies within the semi-major
//! axis of a coded target is dropped.

mod kdtree;

pub use kdtree::KdTree;

use std::collections::HashSet;

use crate::classify::Target;
use crate::trace::{trace_event, trace_span};

/// Returns `small` without the targets lying within `Ma/2` of any RAD target.
///
/// The boundary is inclusive. Survivors keep their relative order, and a
/// target within reach of several RAD targets is removed once.
pub fn remove_near_rad(small: Vec<Target>, rad: &[Target]) -> Vec<Target> {
    let _span = trace_span!("dedup", small = small.len(), rad = rad.len()).entered();
    if small.is_empty() || rad.is_empty() {
        return small;
    }
    let centers: Vec<[f64; 2]> = small.iter().map(Target::center).collect();
    let tree = KdTree::build(&centers);

    let marked: HashSet<usize> = rad
        .iter()
        .flat_map(|target| tree.within_radius(target.center(), target.ellipse().semi_major()))
        .collect();
    trace_event!("dedup_removed", count = marked.len());

    small
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !marked.contains(i))
        .map(|(_, target)| target)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::remove_near_rad;
    use crate::classify::Target;
    use crate::geometry::Ellipse;

    fn dot(x: f64, y: f64) -> Target {
        Target::circle(Ellipse::new(x, y, 10.0, 10.0, 0.0))
    }

    #[test]
    fn removes_within_semi_major_inclusive() {
        let rad = [Target::rad(
            Ellipse::new(100.0, 100.0, 60.0, 60.0, 0.0),
            "101010101010".parse().unwrap(),
        )];
        let small = vec![dot(130.0, 100.0), dot(130.0 + 1e-6, 100.0), dot(100.0, 100.0)];
        let kept = remove_near_rad(small, &rad);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].center()[0] > 130.0);
    }

    #[test]
    fn overlapping_rad_targets_remove_once_and_keep_order() {
        let code = "100000000000".parse().unwrap();
        let rad = [
            Target::rad(Ellipse::new(0.0, 0.0, 40.0, 40.0, 0.0), code),
            Target::rad(Ellipse::new(10.0, 0.0, 40.0, 40.0, 0.0), code),
        ];
        let small = vec![dot(200.0, 0.0), dot(5.0, 0.0), dot(-100.0, 0.0), dot(50.0, 50.0)];
        let kept = remove_near_rad(small, &rad);
        let xs: Vec<f64> = kept.iter().map(|t| t.center()[0]).collect();
        assert_eq!(xs, vec![200.0, -100.0, 50.0]);
    }

    #[test]
    fn no_rad_targets_keeps_everything() {
        let small = vec![dot(1.0, 1.0), dot(2.0, 2.0)];
        assert_eq!(remove_near_rad(small.clone(), &[]), small);
    }
}
