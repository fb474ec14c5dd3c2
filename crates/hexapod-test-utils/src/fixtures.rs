use hexapod_core::types::{LegLengths, Point3D};

/// Segment lengths used throughout the worked examples: coxa 3, femur 5,
/// tibia 7 (reachable annulus [2, 12]).
pub fn reference_lengths() -> LegLengths {
    LegLengths {
        coxa: 3.0,
        femur: 5.0,
        tibia: 7.0,
    }
}

/// Largest pairwise distance between two equally long point lists.
///
/// # Panics
///
/// Panics if the lists differ in length.
pub fn max_point_distance(a: &[Point3D], b: &[Point3D]) -> f64 {
    assert_eq!(a.len(), b.len(), "point lists differ in length");
    a.iter()
        .zip(b)
        .map(|(p, q)| (p - q).norm())
        .fold(0.0, f64::max)
}

/// Assert every point of `actual` lies within `tolerance` of `expected`.
#[track_caller]
pub fn assert_points_close(actual: &[Point3D], expected: &[Point3D], tolerance: f64) {
    let worst = max_point_distance(actual, expected);
    assert!(
        worst <= tolerance,
        "points differ by {worst} (tolerance {tolerance}):\n  actual:   {actual:?}\n  expected: {expected:?}"
    );
}
