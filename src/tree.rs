//! Huffman tree construction.
//!
//! Repeatedly merges the two lightest subtrees until one remains.
//!
//! # Tie-breaking
//!
//! Queue entries are ordered by `(weight, seq)`. Leaves receive sequence
//! numbers in ascending symbol order; every merged node takes the next
//! number after all existing ones. Equal weights therefore resolve to the
//! entry that entered the queue first, and the same frequency table always
//! yields the same tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;

/// Huffman tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A symbol and its occurrence count.
    Leaf {
        /// Byte value.
        symbol: u8,
        /// Occurrence count.
        weight: u64,
    },
    /// Two merged subtrees. `weight` is the sum of both children.
    Internal {
        /// Sum of the children's weights.
        weight: u64,
        /// Subtree reached by a `0` bit.
        left: Box<Node>,
        /// Subtree reached by a `1` bit.
        right: Box<Node>,
    },
}

impl Node {
    /// Total weight of this subtree.
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of leaves, i.e. distinct symbols.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn merge(left: Node, right: Node) -> Result<Node> {
        let weight = left
            .weight()
            .checked_add(right.weight())
            .ok_or(Error::WeightOverflow)?;
        Ok(Node::Internal {
            weight,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

/// Priority queue entry.
#[derive(Debug)]
struct Entry {
    weight: u64,
    seq: u32,
    node: Node,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-priority queue on (weight, seq)
        (other.weight, other.seq).cmp(&(self.weight, self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build a Huffman tree from symbol frequencies.
///
/// # Errors
/// Returns `Error::InsufficientAlphabet` if fewer than two symbols have a
/// non-zero count, and `Error::WeightOverflow` if the counts sum past `u64::MAX`.
pub fn build(freqs: &FrequencyTable) -> Result<Node> {
    let distinct = freqs.distinct();
    if distinct < 2 {
        return Err(Error::InsufficientAlphabet { distinct });
    }

    let mut pq = BinaryHeap::with_capacity(distinct);
    let mut seq = 0u32;
    for (symbol, weight) in freqs.iter() {
        pq.push(Entry {
            weight,
            seq,
            node: Node::Leaf { symbol, weight },
        });
        seq += 1;
    }

    loop {
        let (left, right) = match (pq.pop(), pq.pop()) {
            (Some(left), Some(right)) => (left, right),
            (Some(root), None) => return Ok(root.node),
            // Seeded with at least two entries and every pass pushes one back.
            (None, _) => return Err(Error::InsufficientAlphabet { distinct: 0 }),
        };
        let node = Node::merge(left.node, right.node)?;
        pq.push(Entry {
            weight: node.weight(),
            seq,
            node,
        });
        seq += 1;
    }
}
