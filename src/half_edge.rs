//! Vertex and half-edge records.
//!
//! Every undirected edge `{u,v}` is materialized as two directed half-edges,
//! `u -> v` and `v -> u`, inverse-linked to each other. Each carries a pointer
//! to the treap node holding it as payload; `Vertex` carries the two half-edges
//! that delimit its position in the tour it currently belongs to.

use crate::treap::NodeId;

/// Dense-arena handle for a half-edge, reused by the edge container and by the
/// treap (whose nodes carry a `HalfEdgeId` as payload).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct HalfEdgeId(pub(crate) usize);

/// A vertex is a singleton (`left_out`/`right_in` both `None`) or belongs to a
/// tour of length >= 2 (both `Some`) -- never just one.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Vertex {
    pub left_out: Option<HalfEdgeId>,
    pub right_in: Option<HalfEdgeId>,
}

impl Vertex {
    pub fn is_singleton(&self) -> bool {
        debug_assert_eq!(self.left_out.is_none(), self.right_in.is_none());
        self.left_out.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct HalfEdge<V> {
    pub is_forward: bool,
    pub from: V,
    pub to: V,
    pub inverse: HalfEdgeId,
    pub node: NodeId,
}

impl<V: PartialEq + Copy> HalfEdge<V> {
    pub fn contains(&self, v: V) -> bool {
        self.from == v || self.to == v
    }

    pub fn other(&self, v: V) -> V {
        if self.from == v {
            self.to
        } else {
            debug_assert_eq!(self.to, v);
            self.from
        }
    }
}
