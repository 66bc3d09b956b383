//! Dynamic connectivity for undirected graphs.
//!
//! A [`euler_tour_tree::EulerTourTree`] answers `connected`/`link`/`cut` queries on a
//! forest of Euler tours, each tour realized as a [`treap::Treap`] of the tree's
//! half-edges ordered by tour position. See [`euler_tour_tree`] for the public API.

pub mod edge_container;
pub mod euler_tour_tree;
pub mod half_edge;
pub mod treap;

pub use euler_tour_tree::EulerTourTree;
