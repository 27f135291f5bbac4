//! Exact planner: minimizes total Euclidean tour length from `start`.
//!
//! The original reference implementation
//! (`examples/original_source/.../planners/ilp_planner.py`) formulates this
//! as an integer program and solves it with the commercial Gurobi solver,
//! which has no free Rust binding in this stack. Per spec.md §4.B ("The
//! core depends on the contract only") this is reimplemented as a
//! Held-Karp dynamic program over subsets, exact for the point counts this
//! system handles (spec.md §8 Scenario 5 exercises up to 20 points). See
//! DESIGN.md for the dependency-substitution rationale.

use super::PathPlanner;
use crate::point::Point2D;

pub struct ExactPlanner;

impl PathPlanner for ExactPlanner {
    fn plan_path(&self, start: Point2D, points: &[Point2D]) -> Vec<Point2D> {
        if points.is_empty() {
            return Vec::new();
        }

        let n = points.len();
        // dist[0] is the start; dist[1..=n] are `points`.
        let mut nodes = Vec::with_capacity(n + 1);
        nodes.push(start);
        nodes.extend_from_slice(points);

        let dist = |i: usize, j: usize| nodes[i].euclid_distance(&nodes[j]);

        // dp[mask][i] = shortest path visiting exactly the set `mask` of
        // `points`-indices (1-based within `nodes`), ending at node `i`,
        // starting from node 0. `mask` bit `k` set means `nodes[k+1]` visited.
        let full_mask = 1usize << n;
        let mut dp = vec![vec![f64::INFINITY; n + 1]; full_mask];
        let mut parent = vec![vec![usize::MAX; n + 1]; full_mask];

        for i in 1..=n {
            let mask = 1usize << (i - 1);
            dp[mask][i] = dist(0, i);
        }

        for mask in 1..full_mask {
            for i in 1..=n {
                if mask & (1 << (i - 1)) == 0 || dp[mask][i].is_infinite() {
                    continue;
                }
                let cost_i = dp[mask][i];
                for j in 1..=n {
                    if mask & (1 << (j - 1)) != 0 {
                        continue;
                    }
                    let next_mask = mask | (1 << (j - 1));
                    let candidate = cost_i + dist(i, j);
                    if candidate < dp[next_mask][j] {
                        dp[next_mask][j] = candidate;
                        parent[next_mask][j] = i;
                    }
                }
            }
        }

        let final_mask = full_mask - 1;
        let (_, mut last) = (1..=n)
            .map(|i| (dp[final_mask][i], i))
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .expect("n >= 1");

        let mut order = Vec::with_capacity(n);
        let mut mask = final_mask;
        loop {
            order.push(last);
            let prev = parent[mask][last];
            mask &= !(1 << (last - 1));
            if prev == usize::MAX {
                break;
            }
            last = prev;
        }
        order.reverse();

        order.into_iter().map(|i| nodes[i]).collect()
    }
}
