use super::*;
use crate::point::Point2D;

fn is_permutation(input: &[Point2D], output: &[Point2D]) -> bool {
    if input.len() != output.len() {
        return false;
    }
    let mut remaining: Vec<Point2D> = input.to_vec();
    for p in output {
        match remaining.iter().position(|q| q == p) {
            Some(idx) => {
                remaining.swap_remove(idx);
            }
            None => return false,
        }
    }
    true
}

fn tour_length(start: Point2D, path: &[Point2D]) -> f64 {
    let mut total = 0.0;
    let mut current = start;
    for p in path {
        total += current.euclid_distance(p);
        current = *p;
    }
    total
}

#[test]
fn nearest_neighbor_orders_colinear_points_by_distance() {
    let planner = NearestNeighborPlanner;
    let start = Point2D::new(0.0, 0.0);
    let points = vec![
        Point2D::new(3.0, 0.0),
        Point2D::new(1.0, 0.0),
        Point2D::new(2.0, 0.0),
    ];
    let path = planner.plan_path(start, &points);
    assert_eq!(
        path,
        vec![
            Point2D::new(1.0, 0.0),
            Point2D::new(2.0, 0.0),
            Point2D::new(3.0, 0.0),
        ]
    );
}

#[test]
fn exact_planner_finds_minimal_colinear_tour() {
    let planner = ExactPlanner;
    let start = Point2D::new(0.0, 0.0);
    let points = vec![
        Point2D::new(3.0, 0.0),
        Point2D::new(1.0, 0.0),
        Point2D::new(2.0, 0.0),
    ];
    let path = planner.plan_path(start, &points);
    assert!(is_permutation(&points, &path));
    let length = tour_length(start, &path);
    assert!((length - 3.0).abs() < 1e-9, "expected tour length 3.0, got {length}");
}

#[test]
fn both_planners_return_empty_for_empty_input() {
    let start = Point2D::new(0.0, 0.0);
    assert!(NearestNeighborPlanner.plan_path(start, &[]).is_empty());
    assert!(ExactPlanner.plan_path(start, &[]).is_empty());
}

#[test]
fn nearest_neighbor_output_is_always_a_permutation() {
    let start = Point2D::new(5.0, -3.0);
    for n in 1..20 {
        let points: Vec<Point2D> = (0..n)
            .map(|i| {
                let f = i as f64;
                Point2D::new((f * 37.0) % 23.0 - 11.0, (f * 13.0) % 17.0 - 8.0)
            })
            .collect();
        let path = NearestNeighborPlanner.plan_path(start, &points);
        assert!(is_permutation(&points, &path), "n={n}");
    }
}

#[test]
fn exact_planner_output_is_always_a_permutation() {
    let start = Point2D::new(-2.0, 4.0);
    // Held-Karp is exponential in subset count, keep this small enough to
    // stay fast while still exercising non-trivial subset sizes.
    for n in 1..8 {
        let points: Vec<Point2D> = (0..n)
            .map(|i| {
                let f = i as f64;
                Point2D::new((f * 7.0) % 19.0 - 9.0, (f * 11.0) % 5.0 - 2.0)
            })
            .collect();
        let path = ExactPlanner.plan_path(start, &points);
        assert!(is_permutation(&points, &path), "n={n}");
    }
}

#[test]
fn exact_planner_never_exceeds_nearest_neighbor_length() {
    let start = Point2D::new(1.0, 1.0);
    for n in 1..8 {
        let points: Vec<Point2D> = (0..n)
            .map(|i| {
                let f = i as f64;
                Point2D::new((f * 29.0) % 13.0 - 6.0, (f * 17.0) % 11.0 - 5.0)
            })
            .collect();
        let nn_path = NearestNeighborPlanner.plan_path(start, &points);
        let exact_path = ExactPlanner.plan_path(start, &points);
        let nn_len = tour_length(start, &nn_path);
        let exact_len = tour_length(start, &exact_path);
        assert!(exact_len <= nn_len + 1e-9, "n={n} exact={exact_len} nn={nn_len}");
    }
}
