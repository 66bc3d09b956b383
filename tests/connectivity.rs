//! End-to-end scenarios and a randomized cross-check against a reference
//! union-find, rebuilt from the live edge set after every operation.

use std::collections::HashSet;

use disjoint_sets::UnionFind;
use euler_forest::EulerTourTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn scenario_a_path() {
    let mut t = EulerTourTree::with_seed(1);
    for v in 1..=4 {
        t.create_vertex(v);
    }
    t.link(1, 2);
    t.link(2, 3);
    t.link(3, 4);

    assert!(t.connected(1, 4));
    assert_eq!(t.size(1), 4);
    assert_eq!(t.component_vertices(1), HashSet::from([1, 2, 3, 4]));
    assert_eq!(t.component_count(), 1);
}

#[test]
fn scenario_b_split() {
    let mut t = EulerTourTree::with_seed(2);
    for v in 1..=4 {
        t.create_vertex(v);
    }
    t.link(1, 2);
    t.link(2, 3);
    t.link(3, 4);
    t.cut(2, 3);

    assert!(t.connected(1, 2));
    assert!(t.connected(3, 4));
    assert!(!t.connected(2, 3));
    assert_eq!(t.size(1), 2);
    assert_eq!(t.size(3), 2);
    assert_eq!(t.component_count(), 2);
}

/// Builds two independent paths (`A-B`, `C-D`) and merges them through a
/// single seam edge (`B-C`), exercising the branch of `link` where both
/// endpoints already head non-trivial tours -- then cuts that seam back
/// apart. Transitively equivalent to building `A-B-C-D` one edge at a time,
/// the way `scenario_a_path` does, but via a merge of two established tours
/// instead of successive single-vertex extensions.
#[test]
fn scenario_c_merge_two_paths_then_cut_the_seam() {
    let mut t = EulerTourTree::with_seed(3);
    for v in ['A', 'B', 'C', 'D'] {
        t.create_vertex(v);
    }
    t.link('A', 'B');
    t.link('C', 'D');
    t.link('B', 'C');

    assert!(t.connected('A', 'D'));
    assert_eq!(t.size('A'), 4);
    assert_eq!(t.component_count(), 1);

    t.cut('B', 'C');

    assert!(t.connected('A', 'B'));
    assert!(t.connected('C', 'D'));
    assert!(!t.connected('A', 'D'));
    assert_eq!(t.size('A'), 2);
    assert_eq!(t.size('D'), 2);
    assert_eq!(t.component_count(), 2);
}

#[test]
fn scenario_d_singleton() {
    let mut t: EulerTourTree<u32> = EulerTourTree::with_seed(4);
    t.create_vertex(100);

    assert_eq!(t.size(100), 1);
    assert_eq!(t.find_root(100), None);
    let visited: Vec<_> = t.vertex_iter(100).collect();
    assert_eq!(visited, vec![100]);
}

#[test]
fn scenario_e_make_root() {
    let mut t = EulerTourTree::with_seed(5);
    for v in 1..=3 {
        t.create_vertex(v);
    }
    t.link(1, 2);
    t.link(2, 3);

    for start in [2, 3] {
        let mut visited: Vec<_> = t.vertex_iter(start).collect();
        visited.sort();
        assert_eq!(visited, vec![1, 2, 3]);
        let first_emitted = t.vertex_iter(start).next().unwrap();
        assert_eq!(Some(first_emitted), t.find_root(start));
    }
}

/// Scenario F: 1000 random link/cut operations on 100 vertices, cross-checked
/// against a reference union-find rebuilt from the current edge set after
/// every mutating operation.
#[test]
fn scenario_f_stress_against_reference_union_find() {
    let _ = env_logger::try_init();

    const N: usize = 100;
    const OPS: usize = 1000;

    let mut t = EulerTourTree::with_seed(0xC0FFEE);
    for v in 0..N {
        t.create_vertex(v);
    }

    let mut edges: HashSet<(usize, usize)> = HashSet::new();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for _ in 0..OPS {
        let u = rng.gen_range(0..N);
        let v = rng.gen_range(0..N);
        if u == v {
            continue;
        }
        let key = if u < v { (u, v) } else { (v, u) };

        if edges.contains(&key) {
            if t.connected(u, v) {
                t.cut(u, v);
                edges.remove(&key);
            }
        } else if !t.connected(u, v) {
            t.link(u, v);
            edges.insert(key);
        }

        let mut reference = UnionFind::new(N);
        for &(a, b) in &edges {
            reference.union(a, b);
        }
        for probe_a in 0..10 {
            let a = rng.gen_range(0..N);
            let b = rng.gen_range(0..N);
            let _ = probe_a;
            assert_eq!(
                t.connected(a, b),
                reference.equiv(a, b),
                "connected({a}, {b}) disagreed with reference union-find"
            );
        }
    }
}

#[test]
fn universal_invariant_component_count_matches_roots_and_singletons() {
    let mut t = EulerTourTree::with_seed(6);
    for v in 0..6 {
        t.create_vertex(v);
    }
    t.link(0, 1);
    t.link(1, 2);
    t.link(3, 4);
    // vertex 5 remains a singleton.

    assert_eq!(t.component_count(), 3);
    assert_eq!(t.size(0), 3);
    assert_eq!(t.size(3), 2);
    assert_eq!(t.size(5), 1);
}

#[test]
fn universal_invariant_link_then_cut_restores_state() {
    let mut t = EulerTourTree::with_seed(7);
    t.create_vertex(1);
    t.create_vertex(2);
    t.create_vertex(3);
    t.link(1, 2);
    t.link(2, 3);

    let before_sizes = [t.size(1), t.size(2), t.size(3)];
    t.cut(1, 2);
    t.link(1, 2);

    assert_eq!([t.size(1), t.size(2), t.size(3)], before_sizes);
    assert!(t.connected(1, 3));
}

#[test]
fn universal_invariant_connected_is_an_equivalence_relation() {
    let mut t = EulerTourTree::with_seed(8);
    for v in 0..8 {
        t.create_vertex(v);
    }
    t.link(0, 1);
    t.link(1, 2);
    t.link(4, 5);

    for v in 0..8 {
        assert!(t.connected(v, v), "connected should be reflexive at {v}");
    }
    for a in 0..8 {
        for b in 0..8 {
            assert_eq!(t.connected(a, b), t.connected(b, a), "connected should be symmetric");
        }
    }
    for a in 0..8 {
        for b in 0..8 {
            for c in 0..8 {
                if t.connected(a, b) && t.connected(b, c) {
                    assert!(t.connected(a, c), "connected should be transitive");
                }
            }
        }
    }
}
