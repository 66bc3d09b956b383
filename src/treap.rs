//! A keyless treap: a balanced BST ordered purely by in-order (tour) position,
//! heap-ordered by an independently random priority.
//!
//! There is no key to compare against; a node's position is entirely structural,
//! determined by where it was `concat`ed or `split` relative to its neighbors.
//! `compare` recovers that position's order in expected O(log n) by walking each
//! node's root path and counting left-subtree sizes along the way, the same trick
//! `Treaps::order` uses in the reference `lists::treap` backend this module is
//! modeled on -- just climbing parent pointers instead of descending from a root.
//!
//! Nodes live in a dense, reusable arena (`Vec<Option<Node<T>>>`) rather than as
//! `Box`ed/`Rc`ed trees, since a treap node's parent/children form a cyclic graph
//! that a single-owner tree can't express directly in safe Rust.

use std::cmp::Ordering;
use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type NodeId = usize;

struct Node<T> {
    payload: T,
    priority: u64,
    size: usize,
    parent: Option<NodeId>,
    lchild: Option<NodeId>,
    rchild: Option<NodeId>,
}

impl<T> Node<T> {
    fn leaf(payload: T, priority: u64) -> Self {
        Node {
            payload,
            priority,
            size: 1,
            parent: None,
            lchild: None,
            rchild: None,
        }
    }
}

/// A forest of treaps over payloads of type `T`, addressed by dense [`NodeId`]s.
pub struct Treap<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<NodeId>,
    rng: StdRng,
}

impl<T: Copy> Treap<T> {
    pub fn new(seed: u64) -> Self {
        Treap {
            nodes: Vec::new(),
            free: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn node(&self, n: NodeId) -> &Node<T> {
        self.nodes[n].as_ref().unwrap_or_else(|| panic!("treap node {n} does not exist"))
    }

    fn node_mut(&mut self, n: NodeId) -> &mut Node<T> {
        self.nodes[n].as_mut().unwrap_or_else(|| panic!("treap node {n} does not exist"))
    }

    fn size_of(&self, n: Option<NodeId>) -> usize {
        n.map_or(0, |n| self.node(n).size)
    }

    fn recompute_size(&mut self, n: NodeId) {
        let (l, r) = (self.node(n).lchild, self.node(n).rchild);
        let size = self.size_of(l) + self.size_of(r) + 1;
        self.node_mut(n).size = size;
    }

    /// Inserts `payload` as a brand-new singleton node and returns its id.
    pub fn insert(&mut self, payload: T) -> NodeId {
        let priority = self.rng.gen();
        let node = Node::leaf(payload, priority);
        if let Some(id) = self.free.pop() {
            self.nodes[id] = Some(node);
            id
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    /// Reclaims a node's arena slot. `n` must already be an isolated singleton
    /// (no parent, no children) -- callers split it free first.
    pub fn remove(&mut self, n: NodeId) {
        let node = self.node(n);
        debug_assert!(
            node.parent.is_none() && node.lchild.is_none() && node.rchild.is_none(),
            "cannot remove treap node {n} that is still attached to a tree"
        );
        self.nodes[n] = None;
        self.free.push(n);
    }

    pub fn payload(&self, n: NodeId) -> T {
        self.node(n).payload
    }

    /// Number of nodes in the subtree rooted at `n`.
    pub fn size(&self, n: NodeId) -> usize {
        self.node(n).size
    }

    pub fn find_root(&self, mut n: NodeId) -> NodeId {
        while let Some(p) = self.node(n).parent {
            n = p;
        }
        n
    }

    pub fn find_min(&self, mut n: NodeId) -> NodeId {
        while let Some(l) = self.node(n).lchild {
            n = l;
        }
        n
    }

    pub fn find_max(&self, mut n: NodeId) -> NodeId {
        while let Some(r) = self.node(n).rchild {
            n = r;
        }
        n
    }

    pub fn next(&self, n: NodeId) -> Option<NodeId> {
        if let Some(r) = self.node(n).rchild {
            return Some(self.find_min(r));
        }
        let mut v = n;
        while let Some(p) = self.node(v).parent {
            if self.node(p).lchild == Some(v) {
                return Some(p);
            }
            v = p;
        }
        None
    }

    pub fn prev(&self, n: NodeId) -> Option<NodeId> {
        if let Some(l) = self.node(n).lchild {
            return Some(self.find_max(l));
        }
        let mut v = n;
        while let Some(p) = self.node(v).parent {
            if self.node(p).rchild == Some(v) {
                return Some(p);
            }
            v = p;
        }
        None
    }

    /// 0-indexed in-order rank of `n` within its own tree.
    fn rank(&self, n: NodeId) -> usize {
        let mut path = vec![n];
        let mut cur = n;
        while let Some(p) = self.node(cur).parent {
            path.push(p);
            cur = p;
        }
        path.reverse();
        let mut rank = 0;
        for w in path.windows(2) {
            let (parent, child) = (w[0], w[1]);
            if self.node(parent).rchild == Some(child) {
                rank += self.size_of(self.node(parent).lchild) + 1;
            }
        }
        rank + self.size_of(self.node(n).lchild)
    }

    /// Total order of two nodes known to share a tree, by in-order position.
    pub fn compare(&self, a: NodeId, b: NodeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        debug_assert_eq!(
            self.find_root(a),
            self.find_root(b),
            "compare() called on nodes from different trees"
        );
        self.rank(a).cmp(&self.rank(b))
    }

    fn set_lchild(&mut self, parent: NodeId, child: Option<NodeId>) {
        if let Some(c) = child {
            self.node_mut(c).parent = Some(parent);
        }
        self.node_mut(parent).lchild = child;
    }

    fn set_rchild(&mut self, parent: NodeId, child: Option<NodeId>) {
        if let Some(c) = child {
            self.node_mut(c).parent = Some(parent);
        }
        self.node_mut(parent).rchild = child;
    }

    /// Merges two trees so that every node of `a`'s tree precedes every node of
    /// `b`'s tree in-order. Either argument may be any node of its tree, not
    /// necessarily the root.
    pub fn concat(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let ra = self.find_root(a);
        let rb = self.find_root(b);
        debug_assert_ne!(ra, rb, "concat() called on nodes already in the same tree");
        self.concat_roots(ra, rb)
    }

    fn concat_roots(&mut self, a: NodeId, b: NodeId) -> NodeId {
        if self.node(a).priority >= self.node(b).priority {
            let new_rchild = match self.node(a).rchild {
                Some(ar) => self.concat_roots(ar, b),
                None => b,
            };
            self.set_rchild(a, Some(new_rchild));
            self.node_mut(a).parent = None;
            self.recompute_size(a);
            a
        } else {
            let new_lchild = match self.node(b).lchild {
                Some(bl) => self.concat_roots(a, bl),
                None => a,
            };
            self.set_lchild(b, Some(new_lchild));
            self.node_mut(b).parent = None;
            self.recompute_size(b);
            b
        }
    }

    /// Splits off everything strictly before `n`; `n` remains, as the new
    /// minimum of its (now smaller) tree. Returns the root of the left part, or
    /// `None` if `n` was already the minimum.
    pub fn split_before(&mut self, n: NodeId) -> Option<NodeId> {
        match self.prev(n) {
            Some(p) => self.split_after(p),
            None => None,
        }
    }

    /// Splits off everything strictly after `n`; `n` remains, as the new maximum
    /// of its (now smaller) tree. Returns the root of the right part, or `None`
    /// if `n` was already the maximum.
    ///
    /// Walks from `n` to its root, re-zipping the path into two trees as it
    /// goes: every ancestor `p` reached by ascending through `p`'s right child
    /// belongs (together with whatever has accumulated so far on that side) to
    /// the left part, and symmetrically for the right part. Priorities only
    /// increase along the path from `n` to the root, so each re-attachment keeps
    /// heap order -- the same walk-up split used for height-balanced trees,
    /// just riding on that fact instead of on balance.
    pub fn split_after(&mut self, n: NodeId) -> Option<NodeId> {
        let mut lsplit = n;
        let mut rsplit = self.detach_rchild(n);
        self.recompute_size(n);

        let mut v = n;
        while let Some(p) = self.node(v).parent {
            self.node_mut(v).parent = None;
            if self.node(p).rchild == Some(v) {
                self.set_rchild(p, Some(lsplit));
                lsplit = p;
            } else {
                debug_assert_eq!(self.node(p).lchild, Some(v));
                self.set_lchild(p, rsplit);
                rsplit = Some(p);
            }
            self.recompute_size(p);
            v = p;
        }
        rsplit
    }

    fn detach_rchild(&mut self, n: NodeId) -> Option<NodeId> {
        let c = self.node(n).rchild;
        if let Some(c) = c {
            self.node_mut(n).rchild = None;
            self.node_mut(c).parent = None;
        }
        c
    }
}

impl<T: Copy + Debug> Debug for Treap<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Treap")
            .field("node_count", &(self.nodes.len() - self.free.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(t: &mut Treap<char>, labels: &str) -> NodeId {
        let mut ids = labels.chars().map(|c| t.insert(c));
        let mut root = ids.next().unwrap();
        for id in ids {
            root = t.concat(root, id);
        }
        root
    }

    fn collect(t: &Treap<char>, root: NodeId) -> String {
        let mut n = t.find_min(root);
        let mut out = String::new();
        loop {
            out.push(t.payload(n));
            match t.next(n) {
                Some(next) => n = next,
                None => break,
            }
        }
        out
    }

    #[test]
    fn singleton_is_its_own_root_and_bounds() {
        let mut t: Treap<char> = Treap::new(1);
        let a = t.insert('a');
        assert_eq!(t.find_root(a), a);
        assert_eq!(t.find_min(a), a);
        assert_eq!(t.find_max(a), a);
        assert_eq!(t.size(a), 1);
        assert_eq!(t.next(a), None);
        assert_eq!(t.prev(a), None);
    }

    #[test]
    fn concat_preserves_order() {
        let mut t: Treap<char> = Treap::new(2);
        let root = chain(&mut t, "abcdef");
        assert_eq!(collect(&t, root), "abcdef");
        assert_eq!(t.size(root), 6);
    }

    #[test]
    fn compare_matches_in_order_position() {
        let mut t: Treap<char> = Treap::new(3);
        let root = chain(&mut t, "abcde");
        let mut n = t.find_min(root);
        let mut nodes = vec![n];
        while let Some(next) = t.next(n) {
            nodes.push(next);
            n = next;
        }
        for i in 0..nodes.len() {
            for j in 0..nodes.len() {
                let expected = i.cmp(&j);
                assert_eq!(t.compare(nodes[i], nodes[j]), expected, "i={i} j={j}");
            }
        }
    }

    #[test]
    fn split_after_then_concat_round_trips() {
        let mut t: Treap<char> = Treap::new(4);
        let root = chain(&mut t, "abcdefg");
        let d = {
            let mut n = t.find_min(root);
            while t.payload(n) != 'd' {
                n = t.next(n).unwrap();
            }
            n
        };
        let suffix = t.split_after(d).expect("d is not the maximum");
        assert_eq!(collect(&t, t.find_root(d)), "abcd");
        assert_eq!(collect(&t, suffix), "efg");
        assert_ne!(t.find_root(d), t.find_root(suffix));
        let rejoined = t.concat(t.find_root(d), suffix);
        assert_eq!(collect(&t, rejoined), "abcdefg");
    }

    #[test]
    fn split_after_maximum_returns_none() {
        let mut t: Treap<char> = Treap::new(5);
        let root = chain(&mut t, "xyz");
        let z = t.find_max(root);
        assert_eq!(t.split_after(z), None);
    }

    #[test]
    fn split_before_mirrors_split_after() {
        let mut t: Treap<char> = Treap::new(6);
        let root = chain(&mut t, "abcdef");
        let c = {
            let mut n = t.find_min(root);
            while t.payload(n) != 'c' {
                n = t.next(n).unwrap();
            }
            n
        };
        let prefix = t.split_before(c).expect("c is not the minimum");
        assert_eq!(collect(&t, prefix), "ab");
        assert_eq!(collect(&t, t.find_root(c)), "cdef");
    }

    #[test]
    fn split_before_minimum_returns_none() {
        let mut t: Treap<char> = Treap::new(7);
        let root = chain(&mut t, "xyz");
        let x = t.find_min(root);
        assert_eq!(t.split_before(x), None);
    }

    #[test]
    fn insert_reuses_freed_slots() {
        let mut t: Treap<char> = Treap::new(8);
        let a = t.insert('a');
        t.remove(a);
        let b = t.insert('b');
        assert_eq!(a, b, "freed arena slot should be reused");
    }

    #[test]
    fn split_on_long_chain_keeps_sizes_consistent() {
        let mut t: Treap<usize> = Treap::new(9);
        let mut ids = Vec::new();
        let mut root = t.insert(0);
        ids.push(root);
        for i in 1..200 {
            let id = t.insert(i);
            root = t.concat(root, id);
            ids.push(id);
        }
        assert_eq!(t.size(t.find_root(root)), 200);
        let mid = ids[100];
        let suffix = t.split_after(mid).unwrap();
        assert_eq!(t.size(t.find_root(mid)), 101);
        assert_eq!(t.size(suffix), 99);
    }
}
