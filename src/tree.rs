//! Huffman tree arena and the merge-based builder.
//!
//! Every node ever created lives in one `Vec`; children and the root are
//! indices into it. Codes are grown at the low end as merges happen, so once
//! a build finishes the least significant bit of a leaf's code is the bit
//! taken at the root, and reading a code from bit 0 upward walks the tree
//! from the root down to the leaf.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;

/// Index of a node in its tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf { value: u8 },
    Internal { left: NodeId, right: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub frequency: u64,
    pub code: u32,
    pub code_length: u8,
}

impl Node {
    fn leaf(value: u8, frequency: u64) -> Self {
        Self {
            kind: NodeKind::Leaf { value },
            frequency,
            code: 0,
            code_length: 0,
        }
    }

    /// A leaf restored from a persisted table; its frequency is unknown.
    pub(crate) fn coded_leaf(value: u8, code: u32, code_length: u8) -> Self {
        Self {
            kind: NodeKind::Leaf { value },
            frequency: 0,
            code,
            code_length,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn value(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Leaf { value } => Some(value),
            NodeKind::Internal { .. } => None,
        }
    }

    /// The code as a root-to-node bit path.
    pub fn path(&self) -> BitVec<u8, Msb0> {
        (0..self.code_length)
            .map(|i| (self.code >> i) & 1 == 1)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    byte_count: u64,
    max_frequency: u64,
    root: Option<NodeId>,
}

impl HuffmanTree {
    /// Builds the merge tree for every byte value seen in `freq`.
    ///
    /// Leaves start in ascending byte order and are stably sorted by
    /// frequency, so equal weights keep their positional order. Each round
    /// merges the two lowest unmerged nodes (lower one left, bit 0) and
    /// re-sorts only the unmerged suffix.
    pub fn build(freq: &FrequencyTable, config: &CodecConfig) -> Result<Self> {
        config.validate()?;
        if freq.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut tree = Self {
            nodes: freq.observed().map(|(v, f)| Node::leaf(v, f)).collect(),
            byte_count: freq.byte_count(),
            max_frequency: freq.max_frequency(),
            root: None,
        };
        let leaf_count = tree.nodes.len();

        if leaf_count == 1 {
            // nothing to merge, but the encoder still needs one bit per byte
            tree.nodes[0].code_length = 1;
            tree.root = Some(0);
        } else {
            let mut pool: Vec<NodeId> = (0..leaf_count).collect();
            pool.sort_by_key(|&id| tree.nodes[id].frequency);

            let mut next = 0;
            while pool.len() - next > 1 {
                let parent = tree.merge(pool[next], pool[next + 1], config.max_code_length)?;
                pool.push(parent);
                next += 2;

                let nodes = &tree.nodes;
                pool[next..].sort_by_key(|&id| nodes[id].frequency);
            }
            tree.root = Some(pool[next]);
        }

        tree.verify(leaf_count)?;

        debug!(
            leaves = leaf_count,
            nodes = tree.nodes.len(),
            bytes = tree.byte_count,
            "built huffman tree"
        );
        if config.trace_codes {
            for (value, leaf) in tree.leaves() {
                trace!(value, code = leaf.code, length = leaf.code_length, "leaf code");
            }
        }

        Ok(tree)
    }

    /// A flat tree of leaves only, as restored from a persisted table.
    pub(crate) fn from_leaves(leaves: Vec<Node>) -> Self {
        Self {
            nodes: leaves,
            ..Default::default()
        }
    }

    fn merge(&mut self, left: NodeId, right: NodeId, max_len: u8) -> Result<NodeId> {
        self.push_bit(left, false, max_len)?;
        self.push_bit(right, true, max_len)?;

        let frequency = self.nodes[left].frequency + self.nodes[right].frequency;
        self.nodes.push(Node {
            kind: NodeKind::Internal { left, right },
            frequency,
            code: 0,
            code_length: 0,
        });

        let id = self.nodes.len() - 1;
        trace!(id, left, right, frequency, "merged nodes");
        Ok(id)
    }

    /// Appends `bit` at the low end of the code of `id` and of every node
    /// below it.
    fn push_bit(&mut self, id: NodeId, bit: bool, max_len: u8) -> Result<()> {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id];
            if node.code_length >= max_len {
                return Err(Error::TreeIntegrity(format!(
                    "code for node {id} would exceed {max_len} bits"
                )));
            }
            node.code = (node.code << 1) | bit as u32;
            node.code_length += 1;

            if let NodeKind::Internal { left, right } = node.kind {
                stack.push(left);
                stack.push(right);
            }
        }
        Ok(())
    }

    fn verify(&self, leaf_count: usize) -> Result<()> {
        if self.nodes.len() != 2 * leaf_count - 1 {
            return Err(Error::TreeIntegrity(format!(
                "{} nodes for {leaf_count} leaves",
                self.nodes.len()
            )));
        }

        let root = self
            .root()
            .ok_or_else(|| Error::TreeIntegrity("tree has no root".into()))?;
        if root.frequency != self.byte_count {
            return Err(Error::TreeIntegrity(format!(
                "root frequency {} does not match byte count {}",
                root.frequency, self.byte_count
            )));
        }

        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// `None` for trees restored from a persisted table.
    pub fn root(&self) -> Option<&Node> {
        self.root.and_then(|id| self.nodes.get(id))
    }

    /// Leaves in arena order, with their byte value.
    pub fn leaves(&self) -> impl Iterator<Item = (u8, &Node)> + '_ {
        self.nodes.iter().filter_map(|n| n.value().map(|v| (v, n)))
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Number of nodes in the arena.
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    pub fn max_frequency(&self) -> u64 {
        self.max_frequency
    }

    /// Plain-data snapshot of the tree for diagnostics.
    pub fn describe(&self) -> TreeSummary {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, n)| {
                let (left, right) = match n.kind {
                    NodeKind::Internal { left, right } => (Some(left), Some(right)),
                    NodeKind::Leaf { .. } => (None, None),
                };
                NodeSummary {
                    index,
                    value: n.value(),
                    frequency: n.frequency,
                    code: n.code,
                    code_length: n.code_length,
                    left,
                    right,
                }
            })
            .collect();

        TreeSummary {
            byte_count: self.byte_count,
            node_count: self.nodes.len(),
            leaf_count: self.leaf_count(),
            max_frequency: self.max_frequency,
            root: self.root,
            nodes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSummary {
    pub byte_count: u64,
    pub node_count: usize,
    pub leaf_count: usize,
    pub max_frequency: u64,
    pub root: Option<NodeId>,
    /// In arena order; the root, when present, is last.
    pub nodes: Vec<NodeSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub index: NodeId,
    pub value: Option<u8>,
    pub frequency: u64,
    pub code: u32,
    pub code_length: u8,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}
