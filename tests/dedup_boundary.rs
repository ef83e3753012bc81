use radtarget::lowlevel::{remove_near_rad, KdTree};
use radtarget::{Ellipse, Target};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn rad_at(x: f64, y: f64, major: f64) -> Target {
    Target::rad(
        Ellipse::new(x, y, major, major * 0.8, 0.0),
        "101010101010".parse().unwrap(),
    )
}

fn dot_at(x: f64, y: f64) -> Target {
    Target::circle(Ellipse::new(x, y, 8.0, 8.0, 0.0))
}

#[test]
fn radius_boundary_is_inclusive() {
    let rad = [rad_at(100.0, 100.0, 60.0)];
    let on_boundary = dot_at(100.0, 130.0);
    let just_outside = dot_at(100.0, 130.0 + 1e-9);
    let kept = remove_near_rad(vec![on_boundary, just_outside.clone()], &rad);
    assert_eq!(kept, vec![just_outside]);
}

#[test]
fn query_uses_semi_major_not_semi_minor() {
    // Semi-minor is 24, semi-major is 30.
    let rad = [rad_at(0.0, 0.0, 60.0)];
    let kept = remove_near_rad(vec![dot_at(27.0, 0.0), dot_at(0.0, 27.0)], &rad);
    assert!(kept.is_empty());
}

#[test]
fn random_scene_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);
    let small: Vec<Target> = (0..400)
        .map(|_| dot_at(rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0)))
        .collect();
    let rad: Vec<Target> = (0..20)
        .map(|_| {
            rad_at(
                rng.random_range(0.0..1000.0),
                rng.random_range(0.0..1000.0),
                rng.random_range(20.0..120.0),
            )
        })
        .collect();

    let expected: Vec<Target> = small
        .iter()
        .filter(|dot| {
            rad.iter().all(|r| {
                let dx = dot.center()[0] - r.center()[0];
                let dy = dot.center()[1] - r.center()[1];
                dx * dx + dy * dy > r.ellipse().semi_major().powi(2)
            })
        })
        .cloned()
        .collect();
    assert_eq!(remove_near_rad(small, &rad), expected);
}

#[test]
fn tree_reports_sorted_indices() {
    let points: Vec<[f64; 2]> = (0..50).map(|i| [(i % 7) as f64, (i / 7) as f64]).collect();
    let tree = KdTree::build(&points);
    assert_eq!(tree.len(), 50);
    let hits = tree.within_radius([3.0, 3.0], 1.0);
    assert_eq!(hits, vec![17, 23, 24, 25, 31]);
}
