use std::io;

use log::{debug, info, trace};

use super::Stage;
use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::{KIND_CODED, KIND_EMPTY, MAGIC};
use crate::error::CodecError;
use crate::huffman_coding::code_table::deserialize_tree;
use crate::huffman_coding::huffman::{NodeData, Tree};
use crate::tools::cli::{output_name, RlhOpts};
use crate::tools::data_io::{finish_input, read_input, write_output};
use crate::tools::report::{file_size, output_size, report_sizes};
use crate::tools::rle::rle_decode;

/// Decompress a buffer made by compress(). Any damage is reported, never papered over.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    debug!("Stage: {}", Stage::HeaderParsing);
    let mut br = BitReader::new(data);

    // Look for a valid signature.
    if br.bytes(MAGIC.len()).ok_or(CodecError::TruncatedStream)? != MAGIC {
        return Err(CodecError::MalformedHeader(
            "not an rlehuff stream".to_string(),
        ));
    }

    match br.byte().ok_or(CodecError::TruncatedStream)? {
        KIND_EMPTY => {
            if br.remaining_bits() > 0 {
                return Err(CodecError::MalformedHeader(
                    "data after the empty stream marker".to_string(),
                ));
            }
            info!("Found the empty stream marker.");
            return Ok(Vec::new());
        }
        KIND_CODED => {}
        kind => {
            return Err(CodecError::MalformedHeader(format!(
                "unknown stream kind {}",
                kind
            )))
        }
    }

    let orig_len = br.bint(64).ok_or(CodecError::TruncatedStream)?;
    let tree_len = br.bint(16).ok_or(CodecError::TruncatedStream)? as usize;
    let tree_bytes = br.bytes(tree_len).ok_or(CodecError::TruncatedStream)?;
    let tree = deserialize_tree(&tree_bytes)?;
    let bit_count = br.bint(64).ok_or(CodecError::TruncatedStream)?;
    // Every field so far is whole bytes, so the payload starts on a byte boundary.
    let payload = br.rest().unwrap_or(&[]);
    trace!(
        "Header: original length {}, tree {} bytes, payload {} bits",
        orig_len,
        tree_len,
        bit_count
    );

    debug!("Stage: {}", Stage::BitUnpacking);
    let intermediate = unpack(payload, bit_count, &tree)?;

    debug!("Stage: {}", Stage::RleExpansion);
    let out = rle_decode(&intermediate)?;
    if out.len() as u64 != orig_len {
        return Err(CodecError::LengthMismatch {
            expected: orig_len,
            actual: out.len() as u64,
        });
    }

    debug!("Stage: {}", Stage::Done);
    info!("Decompressed {} bytes to {} bytes.", data.len(), out.len());
    Ok(out)
}

/// Walk the tree bit by bit, emitting a symbol at each leaf, until exactly bit_count bits
/// are used. The payload must hold exactly the bytes those bits need.
pub fn unpack(payload: &[u8], bit_count: u64, tree: &Tree) -> Result<Vec<u8>, CodecError> {
    // bit_count comes straight off the stream, so round up without overflowing.
    let needed = bit_count / 8 + u64::from(bit_count % 8 != 0);
    if (payload.len() as u64) < needed {
        return Err(CodecError::TruncatedStream);
    }
    if payload.len() as u64 > needed {
        return Err(CodecError::MalformedHeader(format!(
            "{} bytes after the payload",
            payload.len() as u64 - needed
        )));
    }

    let mut br = BitReader::new(payload);
    let mut out = Vec::with_capacity(payload.len() * 2);
    let mut current = tree.root;

    for _ in 0..bit_count {
        let bit = br.bool_bit().ok_or(CodecError::TruncatedStream)?;
        current = match tree.node(current).node_data {
            NodeData::Kids(left, right) => {
                if bit {
                    right
                } else {
                    left
                }
            }
            NodeData::Leaf(_) => {
                return Err(CodecError::MalformedHeader(
                    "tree root is a leaf".to_string(),
                ))
            }
        };
        if let NodeData::Leaf(sym) = tree.node(current).node_data {
            out.push(sym);
            current = tree.root;
        }
    }

    // Running out of bits part way down the tree means the last code was cut off.
    if current != tree.root {
        return Err(CodecError::TruncatedStream);
    }
    Ok(out)
}

/// Decompress one file as directed by the options.
pub fn decompress_file(opts: &RlhOpts, file: &str) -> io::Result<()> {
    let data = read_input(file)?;
    let out = decompress(&data)?;
    let out_name = output_name(file, &opts.op_mode);
    write_output(opts, &out_name, &out)?;
    let in_size = file_size(file)?;
    let out_size = output_size(opts, &out_name, out.len())?;
    report_sizes(opts, file, in_size, out_size);
    finish_input(opts, file)
}

/// Check that a compressed file decodes cleanly. Writes nothing and keeps the input.
pub fn test_file(file: &str) -> io::Result<()> {
    let data = read_input(file)?;
    let out = decompress(&data)?;
    info!("{}: ok ({} bytes when decompressed)", file, out.len());
    Ok(())
}
