//! Property-based tests for the route arena.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::distance::DistanceMatrix;
    use crate::solution::{Link, NodeId, Solution};

    const NUM_LOCATIONS: usize = 12;

    /// An edit expressed with indices that are resolved against the
    /// current state when applied.
    #[derive(Debug, Clone)]
    enum Edit {
        Insert { customer: usize, after: usize },
        NewRoute { customer: usize },
        Remove { pick: usize },
        Reverse { pick: usize, span: usize },
        Move { pick: usize, span: usize, dest: usize, reversed: bool },
        Exchange { first: usize, second: usize },
    }

    fn edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            3 => (1..NUM_LOCATIONS, any::<usize>())
                .prop_map(|(customer, after)| Edit::Insert { customer, after }),
            1 => (1..NUM_LOCATIONS).prop_map(|customer| Edit::NewRoute { customer }),
            2 => any::<usize>().prop_map(|pick| Edit::Remove { pick }),
            2 => (any::<usize>(), 0..5usize).prop_map(|(pick, span)| Edit::Reverse { pick, span }),
            2 => (any::<usize>(), 0..4usize, any::<usize>(), any::<bool>())
                .prop_map(|(pick, span, dest, reversed)| Edit::Move { pick, span, dest, reversed }),
            1 => (any::<usize>(), any::<usize>())
                .prop_map(|(first, second)| Edit::Exchange { first, second }),
        ]
    }

    fn coordinates() -> impl Strategy<Value = Vec<(f64, f64)>> {
        proptest::collection::vec((-50.0..50.0f64, -50.0..50.0f64), NUM_LOCATIONS)
    }

    fn asymmetric_matrix() -> impl Strategy<Value = DistanceMatrix> {
        proptest::collection::vec(0.0..100.0f64, NUM_LOCATIONS * NUM_LOCATIONS).prop_map(|data| {
            DistanceMatrix::from_data(NUM_LOCATIONS, data).expect("square by construction")
        })
    }

    /// Walks up to `span` successors from `head`, stopping at the route end.
    fn segment_from(sol: &Solution, head: NodeId, span: usize) -> Vec<NodeId> {
        let mut segment = vec![head];
        for _ in 0..span {
            match sol.successor(*segment.last().expect("starts non-empty")) {
                Link::Node(next) => segment.push(next),
                Link::Depot => break,
            }
        }
        segment
    }

    fn apply(sol: &mut Solution, edit: &Edit) {
        match *edit {
            Edit::Insert { customer, after } => {
                if sol.is_empty() {
                    sol.insert(customer, 1, Link::Depot, Link::Depot);
                } else {
                    let a = sol.node_indices()[after % sol.len()];
                    let b = sol.successor(a);
                    sol.insert(customer, 1, a, b);
                }
            }
            Edit::NewRoute { customer } => {
                sol.insert(customer, 1, Link::Depot, Link::Depot);
            }
            Edit::Remove { pick } => {
                if !sol.is_empty() {
                    let node = sol.node_indices()[pick % sol.len()];
                    sol.remove(node);
                }
            }
            Edit::Reverse { pick, span } => {
                if sol.is_empty() {
                    return;
                }
                let left = sol.node_indices()[pick % sol.len()];
                let right = *segment_from(sol, left, span).last().expect("non-empty");
                let (before, after) = (sol.predecessor(left), sol.successor(right));
                sol.reverse_segment(left, right, before, after)
                    .expect("segment walked from live links");
            }
            Edit::Move { pick, span, dest, reversed } => {
                if sol.is_empty() {
                    return;
                }
                let head = sol.node_indices()[pick % sol.len()];
                let segment = segment_from(sol, head, span);
                let tail = *segment.last().expect("non-empty");
                let outside: Vec<NodeId> = sol
                    .node_indices()
                    .iter()
                    .copied()
                    .filter(|n| !segment.contains(n))
                    .collect();
                // One extra choice past the end moves the segment to a route of its own.
                let (predecessor, successor) = match outside.get(dest % (outside.len() + 1)) {
                    Some(&anchor) => {
                        let after = match sol.successor(anchor) {
                            Link::Node(next) if next == head => sol.successor(tail),
                            other => other,
                        };
                        (Link::Node(anchor), after)
                    }
                    None => (Link::Depot, Link::Depot),
                };
                sol.move_segment(head, tail, predecessor, successor, reversed)
                    .expect("segment walked from live links");
            }
            Edit::Exchange { first, second } => {
                if sol.len() < 2 {
                    return;
                }
                let a = sol.node_indices()[first % sol.len()];
                let b = sol.node_indices()[second % sol.len()];
                if a != b {
                    sol.exchange(a, b).expect("distinct live nodes");
                }
            }
        }
    }

    fn links(sol: &Solution) -> Vec<(NodeId, Link, Link)> {
        let mut links: Vec<_> = sol
            .node_indices()
            .iter()
            .map(|&n| (n, sol.predecessor(n), sol.successor(n)))
            .collect();
        links.sort_by_key(|&(n, _, _)| n);
        links
    }

    /// Consecutive-pair distance of every route, computed independently of
    /// the arena's own objective: `d(c, previous)` per stop plus
    /// `d(last, depot)`.
    fn reference_distance(sol: &Solution, dm: &DistanceMatrix) -> f64 {
        sol.to_routes()
            .iter()
            .map(|route| {
                let mut previous = 0;
                let mut total = 0.0;
                for &c in route {
                    total += dm.get(c, previous);
                    previous = c;
                }
                total + dm.get(previous, 0)
            })
            .sum()
    }

    proptest! {
        #[test]
        fn invariants_hold_after_edits(edits in proptest::collection::vec(edit(), 0..60)) {
            let mut sol = Solution::new();
            for e in &edits {
                apply(&mut sol, e);
                prop_assert_eq!(sol.validate(), Ok(()));
            }
            prop_assert_eq!(sol.len() + sol.free_indices().len(), sol.num_slots());
        }

        #[test]
        fn insert_then_remove_restores_links(
            edits in proptest::collection::vec(edit(), 1..30),
            pick in any::<usize>(),
        ) {
            let mut sol = Solution::new();
            for e in &edits {
                apply(&mut sol, e);
            }
            prop_assume!(!sol.is_empty());

            let before = links(&sol);
            let a = sol.node_indices()[pick % sol.len()];
            let b = sol.successor(a);
            let x = sol.insert(0, 0, a, b);
            sol.remove(x);

            prop_assert_eq!(links(&sol), before);
            prop_assert_eq!(sol.free_indices().last().copied(), Some(x));
        }

        #[test]
        fn double_reversal_is_identity(
            edits in proptest::collection::vec(edit(), 1..30),
            pick in any::<usize>(),
            span in 0..6usize,
        ) {
            let mut sol = Solution::new();
            for e in &edits {
                apply(&mut sol, e);
            }
            prop_assume!(!sol.is_empty());

            let before_links = links(&sol);
            let before_routes = sol.to_routes();

            let left = sol.node_indices()[pick % sol.len()];
            let mut right = left;
            for _ in 0..span {
                if let Link::Node(next) = sol.successor(right) {
                    right = next;
                }
            }
            let (p, s) = (sol.predecessor(left), sol.successor(right));
            sol.reverse_segment(left, right, p, s).expect("live segment");
            sol.reverse_segment(right, left, p, s).expect("reversed segment");

            prop_assert_eq!(links(&sol), before_links);
            prop_assert_eq!(sol.to_routes(), before_routes);
        }

        #[test]
        fn objective_matches_consecutive_pairs(
            points in coordinates(),
            edits in proptest::collection::vec(edit(), 0..40),
        ) {
            let dm = DistanceMatrix::from_coordinates(&points);
            let mut sol = Solution::new();
            for e in &edits {
                apply(&mut sol, e);
            }
            let total = sol.total_distance(&dm);
            prop_assert!((total - reference_distance(&sol, &dm)).abs() < 1e-6);
        }

        #[test]
        fn objective_matches_pairs_on_asymmetric_matrix(
            dm in asymmetric_matrix(),
            edits in proptest::collection::vec(edit(), 0..40),
        ) {
            let mut sol = Solution::new();
            for e in &edits {
                apply(&mut sol, e);
            }
            let per_route: f64 = sol.route_heads().map(|h| sol.route_distance(h, &dm)).sum();
            let reference = reference_distance(&sol, &dm);
            prop_assert!((sol.total_distance(&dm) - reference).abs() < 1e-6);
            prop_assert!((per_route - reference).abs() < 1e-6);
        }

        #[test]
        fn objective_independent_of_used_order(
            points in coordinates(),
            routes in proptest::collection::vec(
                proptest::collection::vec(1..NUM_LOCATIONS, 1..6), 1..4),
        ) {
            let dm = DistanceMatrix::from_coordinates(&points);
            let forward = Solution::from_routes(&routes, |_| 1);
            let reversed: Vec<Vec<usize>> = routes.iter().rev().cloned().collect();
            let backward = Solution::from_routes(&reversed, |_| 1);
            let diff = forward.total_distance(&dm) - backward.total_distance(&dm);
            prop_assert!(diff.abs() < 1e-6);
        }
    }

    #[test]
    fn seeded_stress_keeps_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sol = Solution::with_capacity(64);
        for _ in 0..5_000 {
            let e = match rng.random_range(0..11u32) {
                0..=2 => Edit::Insert {
                    customer: rng.random_range(1..NUM_LOCATIONS),
                    after: rng.random_range(0..usize::MAX),
                },
                3 => Edit::NewRoute {
                    customer: rng.random_range(1..NUM_LOCATIONS),
                },
                4 | 5 => Edit::Remove {
                    pick: rng.random_range(0..usize::MAX),
                },
                6 | 7 => Edit::Reverse {
                    pick: rng.random_range(0..usize::MAX),
                    span: rng.random_range(0..5),
                },
                8 | 9 => Edit::Move {
                    pick: rng.random_range(0..usize::MAX),
                    span: rng.random_range(0..4),
                    dest: rng.random_range(0..usize::MAX),
                    reversed: rng.random_bool(0.5),
                },
                _ => Edit::Exchange {
                    first: rng.random_range(0..usize::MAX),
                    second: rng.random_range(0..usize::MAX),
                },
            };
            apply(&mut sol, &e);
        }
        assert_eq!(sol.validate(), Ok(()));
        assert!(sol.num_slots() <= 5_000);
    }
}
