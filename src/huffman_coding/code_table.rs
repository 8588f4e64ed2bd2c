//! Turns a Huffman tree into codes, and moves the tree in and out of the stream header.
//!
//! The header is a pre-order walk of the tree: a 0 bit for an internal node, a 1 bit followed
//! by the 8 bit symbol for a leaf. The walk is self-delimiting, so the decoder knows where the
//! tree ends without a symbol count.
//!
//! Every walk here uses an explicit stack. A badly skewed tree cannot blow the call stack.
//!

use log::trace;
use rustc_hash::FxHashMap;

use super::huffman::{Node, NodeData, Tree};
use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bitreader::BitReader;
use crate::error::CodecError;

/// Trees decoded from a header can have at most 256 leaves, and so 511 nodes.
const MAX_NODES: usize = 511;

/// A variable length code held in the low `len` bits of `bits`, first bit most significant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Code {
    pub bits: u128,
    pub len: u8,
}

impl Code {
    /// Return this code extended by one bit.
    pub fn push(self, bit: bool) -> Code {
        debug_assert!(self.len < 128, "Huffman code longer than 128 bits");
        Code {
            bits: self.bits << 1 | bit as u128,
            len: self.len + 1,
        }
    }

    /// True if this code is a prefix of (or equal to) other.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len
            && other
                .bits
                .checked_shr((other.len - self.len) as u32)
                .unwrap_or(0)
                == self.bits
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (0..self.len)
            .rev()
            .try_for_each(|i| write!(f, "{}", (self.bits >> i) & 1))
    }
}

/// Symbol to code lookup.
pub type CodeTable = FxHashMap<u8, Code>;

/// Walk the tree and hand every leaf the path that leads to it (left = 0, right = 1).
pub fn derive_codes(tree: &Tree) -> CodeTable {
    let mut table = CodeTable::default();
    let mut stack = vec![(tree.root, Code::default())];

    while let Some((idx, code)) = stack.pop() {
        match tree.node(idx).node_data {
            NodeData::Kids(left, right) => {
                stack.push((right, code.push(true)));
                stack.push((left, code.push(false)));
            }
            NodeData::Leaf(sym) => {
                trace!("Symbol {:>3}: {}", sym, code);
                table.insert(sym, code);
            }
        }
    }
    table
}

/// True if no code in the table is a prefix of another.
pub fn is_prefix_free(table: &CodeTable) -> bool {
    let mut codes: Vec<&Code> = table.values().collect();
    // After sorting by length, a prefix can only sit before the code it prefixes.
    codes.sort_unstable_by_key(|c| c.len);
    codes.iter().enumerate().all(|(i, short)| {
        short.len > 0 && codes[i + 1..].iter().all(|long| !short.is_prefix_of(long))
    })
}

/// Pack the tree into header bytes (pre-order, zero padded to a whole byte).
pub fn serialize_tree(tree: &Tree) -> Vec<u8> {
    // 9 bits per leaf plus 1 per internal node
    let mut bp = BitPacker::new(tree.nodes.len() * 9 / 8 + 1);
    let mut stack = vec![tree.root];

    while let Some(idx) = stack.pop() {
        match tree.node(idx).node_data {
            NodeData::Kids(left, right) => {
                bp.out24(1 << 24);
                stack.push(right);
                stack.push(left);
            }
            NodeData::Leaf(sym) => bp.out24((9 << 24) | 0x100 | sym as u32),
        }
    }
    bp.flush();
    bp.output
}

/// Rebuild a tree from header bytes. The header must describe at least two distinct leaves
/// and must end in its final byte.
pub fn deserialize_tree(header: &[u8]) -> Result<Tree, CodecError> {
    let mut br = BitReader::new(header);
    let mut nodes: Vec<Node> = Vec::new();
    let mut seen = [false; 256];
    // Child slots still waiting for a node: (parent, is_right)
    let mut pending: Vec<(usize, bool)> = Vec::new();

    let root = read_node(&mut br, &mut nodes, &mut seen)?;
    match nodes[root].node_data {
        NodeData::Kids(..) => {
            pending.push((root, true));
            pending.push((root, false));
        }
        NodeData::Leaf(_) => {
            return Err(CodecError::MalformedHeader(
                "tree has only one leaf".to_string(),
            ))
        }
    }

    while let Some((parent, is_right)) = pending.pop() {
        let idx = read_node(&mut br, &mut nodes, &mut seen)?;
        if let NodeData::Kids(ref mut left, ref mut right) = nodes[parent].node_data {
            if is_right {
                *right = idx;
            } else {
                *left = idx;
            }
        }
        if let NodeData::Kids(..) = nodes[idx].node_data {
            pending.push((idx, true));
            pending.push((idx, false));
        }
    }

    // Only padding may follow the tree, and only inside its last byte.
    if (br.bits_read() + 7) / 8 != header.len() {
        return Err(CodecError::MalformedHeader(format!(
            "{} unused bytes after the tree",
            header.len() - (br.bits_read() + 7) / 8
        )));
    }

    Ok(Tree { nodes, root })
}

/// Read one node marker (and symbol, for a leaf) and append the node to the arena.
fn read_node(
    br: &mut BitReader<'_>,
    nodes: &mut Vec<Node>,
    seen: &mut [bool; 256],
) -> Result<usize, CodecError> {
    if nodes.len() == MAX_NODES {
        return Err(CodecError::MalformedHeader(format!(
            "tree has more than {} nodes",
            MAX_NODES
        )));
    }
    let short = || CodecError::MalformedHeader("tree ends early".to_string());
    let is_leaf = br.bool_bit().ok_or_else(short)?;

    let node_data = if is_leaf {
        let sym = br.byte().ok_or_else(short)?;
        if seen[sym as usize] {
            return Err(CodecError::MalformedHeader(format!(
                "symbol {} appears twice",
                sym
            )));
        }
        seen[sym as usize] = true;
        NodeData::Leaf(sym)
    } else {
        // Children are patched in once they are read.
        NodeData::Kids(usize::MAX, usize::MAX)
    };
    nodes.push(Node::new(0, node_data));
    Ok(nodes.len() - 1)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::huffman_coding::huffman::build_tree;
    use crate::tools::freq_count::freqs;

    /// Decoded trees carry no weights, so compare shapes only.
    fn same_shape(a: &Tree, b: &Tree) -> bool {
        derive_codes(a) == derive_codes(b)
    }

    #[test]
    fn codes_for_runs() {
        // "aaaabbbcc" after RLE: a 4 b 3 c 2
        let data = [b'a', 4, b'b', 3, b'c', 2];
        let table = derive_codes(&build_tree(&freqs(&data)).unwrap());
        assert_eq!(table.len(), 6);
        assert!(is_prefix_free(&table));
        // Six equally weighted symbols make codes of two and three bits.
        assert!(table.values().all(|c| c.len == 2 || c.len == 3));
    }

    #[test]
    fn frequent_symbols_get_short_codes() {
        let data = b"aaaaaaaaaaaaaaaabbbbbbbbccccdde";
        let table = derive_codes(&build_tree(&freqs(data)).unwrap());
        assert_eq!(table[&b'a'].len, 1);
        assert_eq!(table[&b'b'].len, 2);
        assert_eq!(table[&b'c'].len, 3);
        assert!(table[&b'e'].len >= table[&b'd'].len);
        assert!(is_prefix_free(&table));
    }

    #[test]
    fn single_symbol_code() {
        let table = derive_codes(&build_tree(&freqs(&[0x41; 10])).unwrap());
        assert_eq!(table[&0x41], Code { bits: 1, len: 1 });
        assert_eq!(table[&0x42], Code { bits: 0, len: 1 });
    }

    #[test]
    fn code_display_and_prefix() {
        let a = Code { bits: 0b01, len: 2 };
        let b = Code { bits: 0b011, len: 3 };
        assert_eq!(a.to_string(), "01");
        assert_eq!(b.to_string(), "011");
        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
        assert!(!Code { bits: 0b1, len: 1 }.is_prefix_of(&a));
    }

    #[test]
    fn header_two_leaves() {
        let tree = build_tree(&freqs(b"ab")).unwrap();
        // 0, 1 'a', 1 'b' = 0 1 01100001 1 01100010, padded
        let header = serialize_tree(&tree);
        assert_eq!(header, vec![0b0101_1000, 0b0110_1100, 0b0100_0000]);
        let back = deserialize_tree(&header).unwrap();
        assert!(same_shape(&tree, &back));
    }

    #[test]
    fn header_full_alphabet() {
        let data: Vec<u8> = (0..=255_u8).chain(0..10).collect();
        let tree = build_tree(&freqs(&data)).unwrap();
        let header = serialize_tree(&tree);
        // 256 leaves * 9 bits + 255 internal nodes = 2559 bits
        assert_eq!(header.len(), 320);
        assert!(same_shape(&tree, &deserialize_tree(&header).unwrap()));
    }

    #[test]
    fn header_lone_leaf() {
        let header = [0b1010_0000, 0b1000_0000];
        assert!(matches!(
            deserialize_tree(&header),
            Err(CodecError::MalformedHeader(_))
        ));
    }

    #[test]
    fn header_duplicate_symbol() {
        // 0, 1 'a', 1 'a'
        let header = [0b0101_1000, 0b0110_1100, 0b0010_0000];
        assert!(matches!(
            deserialize_tree(&header),
            Err(CodecError::MalformedHeader(_))
        ));
    }

    #[test]
    fn header_cut_short() {
        let tree = build_tree(&freqs(b"abc")).unwrap();
        let header = serialize_tree(&tree);
        assert!(matches!(
            deserialize_tree(&header[..header.len() - 1]),
            Err(CodecError::MalformedHeader(_))
        ));
    }

    #[test]
    fn header_trailing_byte() {
        let tree = build_tree(&freqs(b"abc")).unwrap();
        let mut header = serialize_tree(&tree);
        header.push(0);
        assert!(matches!(
            deserialize_tree(&header),
            Err(CodecError::MalformedHeader(_))
        ));
    }

    #[test]
    fn header_all_internal() {
        // Nothing but internal markers: runs out of data or nodes, never loops forever.
        assert!(matches!(
            deserialize_tree(&[0_u8; 200]),
            Err(CodecError::MalformedHeader(_))
        ));
    }
}
