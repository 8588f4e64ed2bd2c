use log::{debug, trace};

use crate::error::CodecError;
use crate::tools::freq_count::FreqTable;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Children are indices into the owning Tree's node arena.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum NodeData {
    Kids(usize, usize),
    Leaf(u8),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Node {
    pub weight: u64,
    pub node_data: NodeData,
}
impl Node {
    /// Create a new node
    pub fn new(weight: u64, node_data: NodeData) -> Node {
        Node { weight, node_data }
    }
}

/// A Huffman tree stored as an arena. Nodes only point down; nothing is shared between subtrees.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub root: usize,
}

impl Tree {
    /// Get a node by arena index.
    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// Number of leaves (symbols) in the tree.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.node_data, NodeData::Leaf(_)))
            .count()
    }

    /// Length of the longest root-to-leaf path. Walks with a stack, not recursion.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0_usize)];
        while let Some((idx, depth)) = stack.pop() {
            match self.nodes[idx].node_data {
                NodeData::Kids(left, right) => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
                NodeData::Leaf(_) => max = max.max(depth),
            }
        }
        max
    }
}

/// Priority queue entry. seq breaks weight ties: leaves use their symbol value, internal nodes
/// count up from 256 in the order they are made.
#[derive(Eq, PartialEq, Debug)]
struct Pending {
    weight: u64,
    seq: u32,
    idx: usize,
}
impl Ord for Pending {
    /// Reverse both keys so the BinaryHeap pops the lightest, oldest node first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Build the Huffman tree for a frequency table. The same table always gives the same tree.
pub fn build_tree(freqs: &FreqTable) -> Result<Tree, CodecError> {
    // Leaves go into the arena in ascending symbol order.
    let mut nodes: Vec<Node> = freqs
        .iter()
        .enumerate()
        .filter(|(_, &f)| f > 0)
        .map(|(sym, &f)| Node::new(f, NodeData::Leaf(sym as u8)))
        .collect();

    match nodes.len() {
        0 => return Err(CodecError::EmptyInput),
        1 => {
            // One symbol would get an empty code. Give it a weightless sibling so it gets one bit.
            if let NodeData::Leaf(sym) = nodes[0].node_data {
                let phantom = sym.wrapping_add(1);
                debug!(
                    "Single symbol alphabet ({}); adding phantom leaf {}",
                    sym, phantom
                );
                let leaf = Node::new(0, NodeData::Leaf(phantom));
                if phantom < sym {
                    nodes.insert(0, leaf);
                } else {
                    nodes.push(leaf);
                }
            }
        }
        _ => {}
    }

    let mut heap: BinaryHeap<Pending> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| Pending {
            weight: node.weight,
            seq: match node.node_data {
                NodeData::Leaf(sym) => sym as u32,
                NodeData::Kids(..) => unreachable!("only leaves exist before merging"),
            },
            idx,
        })
        .collect();

    // Pare it down to one single node, first popped goes left.
    let mut seq = 256_u32;
    while heap.len() > 1 {
        let (left, right) = match (heap.pop(), heap.pop()) {
            (Some(l), Some(r)) => (l, r),
            _ => break,
        };
        let weight = left.weight + right.weight;
        nodes.push(Node::new(weight, NodeData::Kids(left.idx, right.idx)));
        trace!(
            "Merged nodes {} ({}) and {} ({}) into {}",
            left.idx,
            left.weight,
            right.idx,
            right.weight,
            nodes.len() - 1
        );
        heap.push(Pending {
            weight,
            seq,
            idx: nodes.len() - 1,
        });
        seq += 1;
    }

    let root = nodes.len() - 1;
    let tree = Tree { nodes, root };
    debug!(
        "Built tree with {} leaves, depth {}",
        tree.leaf_count(),
        tree.depth()
    );
    Ok(tree)
}
