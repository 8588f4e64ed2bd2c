use log::trace;

use super::bitpacker::BitPacker;
use crate::error::CodecError;

/// Format marker at the start of every compressed stream.
pub const MAGIC: [u8; 4] = *b"RLH1";
/// Kind byte: nothing follows the marker.
pub const KIND_EMPTY: u8 = 0x00;
/// Kind byte: length, tree, bit count and payload follow.
pub const KIND_CODED: u8 = 0x01;

/// Assembles the output stream. Takes the payload packed by BitPacker and frames it with the
/// stream marker, the original length, the serialized tree and the payload bit count.
pub struct BitWriter {
    /// Output buffer used to build the stream.
    output: Vec<u8>,
}

impl BitWriter {
    /// Create a new BitWriter with an output buffer of the size specified.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
        }
    }

    /// Push the stream marker and kind byte to the output buffer.
    fn push_header(&mut self, kind: u8) {
        MAGIC.iter().for_each(|&x| self.out8(x));
        self.out8(kind);
    }

    /// The complete stream for an empty input.
    pub fn empty_stream() -> Vec<u8> {
        let mut bw = BitWriter::new(MAGIC.len() + 1);
        bw.push_header(KIND_EMPTY);
        bw.output
    }

    /// Write the coded block: original length, tree, bit count and the packed payload.
    /// The packer must already be flushed.
    pub fn add_block(
        &mut self,
        orig_len: u64,
        tree: &[u8],
        payload: &BitPacker,
    ) -> Result<(), CodecError> {
        let tree_len = u16::try_from(tree.len()).map_err(|_| {
            CodecError::MalformedHeader(format!("tree of {} bytes is too large", tree.len()))
        })?;

        self.push_header(KIND_CODED);
        self.out64(orig_len);
        self.out16(tree_len);
        trace!("Tree written at byte {}", self.output.len());
        self.output.extend_from_slice(tree);
        self.out64(payload.bit_count());
        trace!("Payload written at byte {}", self.output.len());
        self.output.extend_from_slice(&payload.output);
        Ok(())
    }

    /// Put a byte on the stream.
    fn out8(&mut self, data: u8) {
        self.output.push(data);
    }

    /// Put a 16 bit word on the stream, big endian.
    fn out16(&mut self, data: u16) {
        self.output.extend_from_slice(&data.to_be_bytes());
    }

    /// Put a 64 bit word on the stream, big endian.
    fn out64(&mut self, data: u64) {
        self.output.extend_from_slice(&data.to_be_bytes());
    }

    /// Hand back the finished stream.
    pub fn finish(self) -> Vec<u8> {
        self.output
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_stream_test() {
        assert_eq!(BitWriter::empty_stream(), b"RLH1\x00".to_vec());
    }

    #[test]
    fn block_layout_test() {
        let mut bp = BitPacker::new(4);
        bp.out24((5 << 24) | 0b10110);
        bp.flush();
        let mut bw = BitWriter::new(32);
        bw.add_block(9, &[0xAA, 0xBB], &bp).unwrap();
        let out = bw.finish();
        assert_eq!(&out[..5], b"RLH1\x01");
        assert_eq!(&out[5..13], &9_u64.to_be_bytes());
        assert_eq!(&out[13..15], &[0, 2]);
        assert_eq!(&out[15..17], &[0xAA, 0xBB]);
        assert_eq!(&out[17..25], &5_u64.to_be_bytes());
        assert_eq!(&out[25..], &[0b1011_0000]);
    }

    #[test]
    fn oversized_tree_test() {
        let bp = BitPacker::new(0);
        let mut bw = BitWriter::new(0);
        let tree = vec![0_u8; 70_000];
        assert!(matches!(
            bw.add_block(1, &tree, &bp),
            Err(CodecError::MalformedHeader(_))
        ));
    }
}
