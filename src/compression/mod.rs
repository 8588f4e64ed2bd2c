//! The compression module manages both directions of the rlehuff codec.
//!
//! Compression happens in the following steps:
//! - Run Length Encoding: Collapse every run of identical bytes into a (value, count) pair.
//! - Frequency count: Count how often each byte value occurs in the pairs.
//! - Huffman tree: Merge the two lightest nodes until one root remains.
//! - Code derivation: Walk the tree to give every symbol its bit code.
//! - Header: Store the tree so the decoder can rebuild it.
//! - Bit packing: Write the code for every pair byte into the payload.
//!
//! Decompression follows the inverse of the compression process.
//! - Header parsing: Check the stream marker and rebuild the tree.
//! - Huffman decoding: Walk the tree bit by bit to recover the pair bytes.
//! - RLE expansion: Expand every pair back into its run.
//!

pub mod compress;
pub mod decompress;

/// Pipeline stages, in the order they run. Each one needs the previous one finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RleEncoding,
    FrequencyAnalysis,
    TreeBuilding,
    CodeDerivation,
    HeaderSerialization,
    BitPacking,
    HeaderParsing,
    BitUnpacking,
    RleExpansion,
    Done,
}
impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stage_display() {
        assert_eq!(Stage::RleEncoding.to_string(), "RleEncoding");
        assert_eq!(Stage::BitUnpacking.to_string(), "BitUnpacking");
    }
}
