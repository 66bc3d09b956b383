//! Euler-tour-tree based dynamic connectivity.
//!
//! [`EulerTourTree`] keeps a forest of Euler tours, one per connected
//! component, each realized as a [`Treap`] over that component's half-edges in
//! tour order. `link`/`cut` maintain the tours by splicing and splitting the
//! treap; `connected`/`size`/`find_root` read off its structure.
//!
//! References for the approach: Henzinger & King, "Randomized Fully Dynamic
//! Graph Algorithms with Polylogarithmic Time per Operation" (JACM 1999);
//! the underlying rotation/splice case analysis follows sonLib's
//! `stEulerTour` (Benedict Paten et al.), adapted here to an explicit
//! half-edge/treap-node arena.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::edge_container::EdgeContainer;
use crate::half_edge::{HalfEdge, HalfEdgeId, Vertex};
use crate::treap::{NodeId, Treap};

/// Blanket bound for opaque, caller-owned vertex identifiers.
pub trait IdType: Copy + Debug + Eq + Hash {}
impl<I: Copy + Debug + Eq + Hash> IdType for I {}

/// Dynamic connectivity over an undirected graph on vertices of type `V`.
///
/// `V` is any small, hashable, copyable identifier the caller already has --
/// an index, a string interned elsewhere, whatever identifies a vertex to the
/// caller. The tree never looks inside it.
pub struct EulerTourTree<V: IdType> {
    vertices: HashMap<V, Vertex>,
    half_edges: Vec<Option<HalfEdge<V>>>,
    free_half_edges: Vec<HalfEdgeId>,
    treap: Treap<HalfEdgeId>,
    forward_edges: EdgeContainer<V, HalfEdgeId>,
    backward_edges: EdgeContainer<V, HalfEdgeId>,
    component_count: usize,
    version: u64,
}

impl<V: IdType> EulerTourTree<V> {
    pub fn new() -> Self {
        Self::with_seed(0x5eed_1234_dead_beef)
    }

    /// Like [`Self::new`], but with an explicit treap-priority seed, so tests
    /// can reproduce a particular shuffle of rotations.
    pub fn with_seed(seed: u64) -> Self {
        EulerTourTree {
            vertices: HashMap::new(),
            half_edges: Vec::new(),
            free_half_edges: Vec::new(),
            treap: Treap::new(seed),
            forward_edges: EdgeContainer::new(),
            backward_edges: EdgeContainer::new(),
            component_count: 0,
            version: 0,
        }
    }

    pub fn create_vertex(&mut self, id: V) {
        debug_assert!(!self.vertices.contains_key(&id), "vertex {id:?} already exists");
        self.vertices.insert(id, Vertex::default());
        self.component_count += 1;
        self.version = self.version.wrapping_add(1);
        log::trace!("create_vertex({id:?})");
    }

    /// Precondition: `id` is currently a singleton (no incident edges).
    pub fn remove_vertex(&mut self, id: V) {
        let singleton = self.vertex(id).is_singleton();
        debug_assert!(singleton, "cannot remove non-singleton vertex {id:?}");
        self.vertices.remove(&id);
        self.component_count -= 1;
        self.version = self.version.wrapping_add(1);
        log::trace!("remove_vertex({id:?})");
    }

    pub fn contains_vertex(&self, id: V) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    fn vertex(&self, id: V) -> &Vertex {
        self.vertices.get(&id).unwrap_or_else(|| panic!("unknown vertex {id:?}"))
    }

    fn vertex_mut(&mut self, id: V) -> &mut Vertex {
        self.vertices.get_mut(&id).unwrap_or_else(|| panic!("unknown vertex {id:?}"))
    }

    fn he(&self, id: HalfEdgeId) -> &HalfEdge<V> {
        self.half_edges[id.0].as_ref().unwrap_or_else(|| panic!("half-edge {id:?} does not exist"))
    }

    fn he_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge<V> {
        self.half_edges[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("half-edge {id:?} does not exist"))
    }

    fn alloc_half_edge(&mut self, is_forward: bool, from: V, to: V) -> HalfEdgeId {
        let id = match self.free_half_edges.pop() {
            Some(id) => id,
            None => {
                self.half_edges.push(None);
                HalfEdgeId(self.half_edges.len() - 1)
            }
        };
        let node = self.treap.insert(id);
        self.half_edges[id.0] = Some(HalfEdge {
            is_forward,
            from,
            to,
            inverse: id,
            node,
        });
        id
    }

    fn free_half_edge(&mut self, id: HalfEdgeId) {
        let node = self.he(id).node;
        self.treap.remove(node);
        self.half_edges[id.0] = None;
        self.free_half_edges.push(id);
    }

    fn node_of(&self, h: HalfEdgeId) -> NodeId {
        self.he(h).node
    }

    /// `size()` of the whole tour containing `node`, not just `node`'s own
    /// subtree: the treap's `size` is a subtree count, so finding the tour's
    /// size means rooting first.
    fn tour_len(&self, node: NodeId) -> usize {
        self.treap.size(self.treap.find_root(node))
    }

    /// Are `u` and `v` in the same component?
    pub fn connected(&self, u: V, v: V) -> bool {
        if u == v {
            return true;
        }
        match (self.vertex(u).left_out, self.vertex(v).left_out) {
            (Some(lu), Some(lv)) => {
                self.treap.find_root(self.node_of(lu)) == self.treap.find_root(self.node_of(lv))
            }
            _ => false,
        }
    }

    /// Number of vertices in `v`'s component.
    pub fn size(&self, v: V) -> usize {
        match self.vertex(v).left_out {
            None => 1,
            Some(lo) => self.tour_len(self.node_of(lo)) / 2 + 1,
        }
    }

    /// The vertex the tour of `v`'s component currently starts at, or `None`
    /// if `v` is a singleton.
    pub fn find_root(&self, v: V) -> Option<V> {
        let lo = self.vertex(v).left_out?;
        let root = self.treap.find_root(self.node_of(lo));
        let min_edge = self.treap.payload(self.treap.find_min(root));
        Some(self.he(min_edge).from)
    }

    /// All vertices reachable from `v`, `v` included.
    pub fn component_vertices(&self, v: V) -> HashSet<V> {
        self.vertex_iter(v).collect()
    }

    fn half_edge_contains(&self, h: HalfEdgeId, v: V) -> bool {
        self.he(h).contains(v)
    }

    /// Rotates `v`'s tour so it starts at `v`: afterwards `v.left_out` is the
    /// minimum treap node of the tour and `v.right_in` the maximum. No-op if
    /// `v` is a singleton or its tour is a single edge.
    pub fn make_root(&mut self, v: V) {
        let f0 = match self.vertex(v).left_out {
            Some(f0) => f0,
            None => return,
        };
        let b0 = self.vertex(v).right_in.unwrap();
        let f0n = self.node_of(f0);
        let b0n = self.node_of(b0);
        let root = self.treap.find_root(f0n);
        if self.treap.size(root) == 2 {
            debug_assert_eq!(root, self.treap.find_root(b0n));
            return;
        }

        let (mut f, b) = if self.treap.compare(f0n, b0n) == std::cmp::Ordering::Greater {
            (b0, f0)
        } else {
            (f0, b0)
        };
        debug_assert_ne!(f, b);
        let other = self.he(f).other(v);
        debug_assert_ne!(other, v);

        let f_node = self.node_of(f);
        let next_node = self
            .treap
            .next(f_node)
            .expect("tour has more than two half-edges here, so f has a successor");
        let next_edge = self.treap.payload(next_node);

        if !self.half_edge_contains(next_edge, v) {
            match self.treap.prev(f_node) {
                None => return, // v is already the tour root
                Some(prev_node) => f = self.treap.payload(prev_node),
            }
        } else if self.half_edge_contains(next_edge, other) {
            let next_next = self.treap.next(next_node).or_else(|| self.treap.prev(f_node));
            if let Some(nn_node) = next_next {
                let nn_edge = self.treap.payload(nn_node);
                if self.half_edge_contains(nn_edge, v) {
                    f = next_edge;
                }
                // else: v is a leaf here; f stays put.
            }
        }
        // else: next(f) already contains v; f stays put.

        let f_node = self.node_of(f);
        if let Some(suffix) = self.treap.split_after(f_node) {
            self.treap.concat(suffix, f_node);
        }
        self.version = self.version.wrapping_add(1);
        log::trace!("make_root({v:?})");
    }

    /// Inserts an edge between two currently-disconnected vertices.
    ///
    /// Precondition: `u != v` and `!connected(u, v)`.
    pub fn link(&mut self, u: V, v: V) {
        debug_assert_ne!(u, v, "cannot link a vertex to itself");
        debug_assert!(!self.connected(u, v), "{u:?} and {v:?} are already connected");
        self.component_count -= 1;

        let f = self.alloc_half_edge(true, u, v);
        let b = self.alloc_half_edge(false, v, u);
        self.he_mut(f).inverse = b;
        self.he_mut(b).inverse = f;
        self.forward_edges.insert(u, v, f);
        self.backward_edges.insert(v, u, b);

        self.make_root(u);
        self.make_root(v);

        let f_node = self.node_of(f);
        let b_node = self.node_of(b);

        match self.vertex(u).left_out {
            Some(u_first) => {
                let u_first_node = self.node_of(u_first);
                self.treap.concat(u_first_node, f_node);
            }
            None => self.vertex_mut(u).left_out = Some(f),
        }

        match self.vertex(v).left_out {
            Some(v_first) => {
                let v_first_node = self.node_of(v_first);
                self.treap.concat(f_node, v_first_node);
            }
            None => self.vertex_mut(v).left_out = Some(f),
        }

        match self.vertex(v).right_in {
            Some(v_last) => {
                let v_last_node = self.node_of(v_last);
                self.treap.concat(v_last_node, b_node);
            }
            None => {
                self.vertex_mut(v).right_in = Some(b);
                let u_first_node = self.node_of(self.vertex(u).left_out.unwrap());
                self.treap.concat(u_first_node, b_node);
            }
        }

        self.vertex_mut(u).right_in = Some(b);

        self.version = self.version.wrapping_add(1);
        debug_assert!(self.connected(u, v));
        log::debug!("link({u:?}, {v:?})");
    }

    /// Given the two neighbors flanking a removed inner segment in the
    /// stitched-together outer tour, fills in whichever one is missing so both
    /// describe the same tour (one side of a cut can vanish if the surviving
    /// outer component has nothing on that side).
    fn close_outer_neighbors(&self, n: Option<NodeId>, p: Option<NodeId>) -> (Option<NodeId>, Option<NodeId>) {
        match (n, p) {
            (None, Some(p)) => (Some(self.treap.find_min(self.treap.find_root(p))), Some(p)),
            (Some(n), None) => (Some(n), Some(self.treap.find_max(self.treap.find_root(n)))),
            other => other,
        }
    }

    fn set_incidence(&mut self, v: V, left_out: Option<HalfEdgeId>, right_in: Option<HalfEdgeId>) {
        let vx = self.vertex_mut(v);
        vx.left_out = left_out;
        vx.right_in = right_in;
    }

    fn clear_incidence(&mut self, v: V) {
        self.set_incidence(v, None, None);
    }

    fn collapse_if_singleton(&mut self, v: V) {
        if let Some(h) = self.vertex(v).left_out {
            if self.tour_len(self.node_of(h)) == 1 {
                self.clear_incidence(v);
            }
        }
    }

    /// Removes the edge between `u` and `v`, possibly splitting their
    /// component into two.
    ///
    /// Precondition: the edge exists.
    pub fn cut(&mut self, u: V, v: V) {
        let f = *self
            .forward_edges
            .get(u, v)
            .unwrap_or_else(|| panic!("no edge between {u:?} and {v:?}"));
        let b = *self
            .backward_edges
            .get(u, v)
            .unwrap_or_else(|| panic!("no edge between {u:?} and {v:?}"));
        debug_assert_eq!(self.he(self.he(f).inverse).inverse, f);
        self.component_count += 1;

        let (f, b) = {
            let (fn_, bn) = (self.node_of(f), self.node_of(b));
            if self.treap.compare(fn_, bn) == std::cmp::Ordering::Greater {
                (b, f)
            } else {
                (f, b)
            }
        };
        let from = self.he(f).from;
        let to = self.he(f).to;

        let f_node = self.node_of(f);
        let b_node = self.node_of(b);
        let p = self.treap.prev(f_node);
        let n = self.treap.next(b_node);
        let pn = self
            .treap
            .next(f_node)
            .expect("f has a successor: at minimum, its inverse b");
        let nn = self
            .treap
            .prev(b_node)
            .expect("b has a predecessor: at minimum, its inverse f");

        let tree1 = self.treap.split_before(f_node);
        let tree2 = self.treap.split_after(b_node);
        if let (Some(t1), Some(t2)) = (tree1, tree2) {
            self.treap.concat(t1, t2);
        }

        let pn_edge = self.treap.payload(pn);
        let nn_edge = self.treap.payload(nn);
        let pn_has_from = self.half_edge_contains(pn_edge, from);
        let pn_has_to = self.half_edge_contains(pn_edge, to);

        if pn_has_from && pn_has_to {
            let (n2, p2) = self.close_outer_neighbors(n, p);
            match n2 {
                Some(n2) => {
                    let p2_edge = self.treap.payload(p2.unwrap());
                    let n2_edge = self.treap.payload(n2);
                    if self.half_edge_contains(n2_edge, from) {
                        self.set_incidence(from, Some(n2_edge), Some(p2_edge));
                        self.clear_incidence(to);
                    } else {
                        self.set_incidence(to, Some(n2_edge), Some(p2_edge));
                        self.clear_incidence(from);
                    }
                }
                None => {
                    self.clear_incidence(from);
                    self.clear_incidence(to);
                }
            }
        } else if pn_has_from {
            self.set_incidence(from, Some(pn_edge), Some(nn_edge));
            let (n2, p2) = self.close_outer_neighbors(n, p);
            match n2 {
                Some(n2) => {
                    let n2_edge = self.treap.payload(n2);
                    let p2_edge = self.treap.payload(p2.unwrap());
                    self.set_incidence(to, Some(n2_edge), Some(p2_edge));
                }
                None => self.clear_incidence(to),
            }
        } else {
            debug_assert!(self.half_edge_contains(pn_edge, to));
            self.set_incidence(to, Some(pn_edge), Some(nn_edge));
            let (n2, p2) = self.close_outer_neighbors(n, p);
            match n2 {
                Some(n2) => {
                    let n2_edge = self.treap.payload(n2);
                    let p2_edge = self.treap.payload(p2.unwrap());
                    self.set_incidence(from, Some(n2_edge), Some(p2_edge));
                }
                None => self.clear_incidence(from),
            }
        }

        self.treap.split_after(f_node);
        self.treap.split_before(b_node);

        self.collapse_if_singleton(from);
        self.collapse_if_singleton(to);

        self.forward_edges.remove(u, v);
        self.backward_edges.remove(u, v);
        self.free_half_edge(f);
        self.free_half_edge(b);

        self.version = self.version.wrapping_add(1);
        log::debug!("cut({u:?}, {v:?})");
    }

    /// Vertices of `v`'s component, in tour order starting at the tour root.
    pub fn vertex_iter(&self, v: V) -> VertexIter<'_, V> {
        match self.vertex(v).left_out {
            Some(lo) => {
                let root = self.treap.find_root(self.node_of(lo));
                VertexIter {
                    tree: self,
                    current: Some(self.treap.find_min(root)),
                    pending_last: None,
                    singleton: None,
                    version: self.version,
                }
            }
            None => VertexIter {
                tree: self,
                current: None,
                pending_last: None,
                singleton: Some(v),
                version: self.version,
            },
        }
    }

    /// Half-edges of `v`'s component, in tour order (each undirected edge
    /// appears twice, once per direction).
    pub fn edge_iter(&self, v: V) -> EdgeIter<'_, V> {
        let current = self.vertex(v).left_out.map(|lo| {
            let root = self.treap.find_root(self.node_of(lo));
            self.treap.find_min(root)
        });
        EdgeIter {
            tree: self,
            current,
            version: self.version,
        }
    }
}

impl<V: IdType> Default for EulerTourTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct VertexIter<'a, V: IdType> {
    tree: &'a EulerTourTree<V>,
    current: Option<NodeId>,
    pending_last: Option<V>,
    singleton: Option<V>,
    version: u64,
}

impl<'a, V: IdType> Iterator for VertexIter<'a, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        debug_assert_eq!(self.version, self.tree.version, "tour was mutated during iteration");
        if let Some(v) = self.singleton.take() {
            return Some(v);
        }
        match self.current {
            Some(node) => {
                let edge = self.tree.treap.payload(node);
                let he = self.tree.he(edge);
                self.pending_last = Some(he.to);
                self.current = self.tree.treap.next(node);
                Some(he.from)
            }
            None => self.pending_last.take(),
        }
    }
}

pub struct EdgeIter<'a, V: IdType> {
    tree: &'a EulerTourTree<V>,
    current: Option<NodeId>,
    version: u64,
}

impl<'a, V: IdType> Iterator for EdgeIter<'a, V> {
    type Item = (V, V);

    fn next(&mut self) -> Option<(V, V)> {
        debug_assert_eq!(self.version, self.tree.version, "tour was mutated during iteration");
        let node = self.current?;
        let edge = self.tree.treap.payload(node);
        let he = self.tree.he(edge);
        self.current = self.tree.treap.next(node);
        Some((he.from, he.to))
    }
}
