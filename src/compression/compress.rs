use std::io;

use log::{debug, info, trace};

use super::Stage;
use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::CodecError;
use crate::huffman_coding::code_table::{derive_codes, serialize_tree, CodeTable};
use crate::huffman_coding::huffman::build_tree;
use crate::tools::cli::{output_name, RlhOpts};
use crate::tools::data_io::{finish_input, read_input, write_output};
use crate::tools::freq_count::{distinct, freqs};
use crate::tools::report::{file_size, output_size, report_sizes};
use crate::tools::rle::{rle_encode, runs_to_bytes};

/// Compress a buffer: run length encode it, then Huffman code the runs. An empty buffer
/// becomes the five byte empty stream marker.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    if data.is_empty() {
        info!("Empty input, writing the empty stream marker.");
        return Ok(BitWriter::empty_stream());
    }

    debug!("Stage: {}", Stage::RleEncoding);
    let runs = rle_encode(data);
    let intermediate = runs_to_bytes(&runs);
    info!(
        "RLE turned {} bytes into {} runs ({} bytes).",
        data.len(),
        runs.len(),
        intermediate.len()
    );

    debug!("Stage: {}", Stage::FrequencyAnalysis);
    let freqs = freqs(&intermediate);
    info!("Found {} distinct symbols.", distinct(&freqs));

    debug!("Stage: {}", Stage::TreeBuilding);
    let tree = build_tree(&freqs)?;

    debug!("Stage: {}", Stage::CodeDerivation);
    let table = derive_codes(&tree);

    debug!("Stage: {}", Stage::HeaderSerialization);
    let header = serialize_tree(&tree);
    trace!("Tree header is {} bytes.", header.len());

    debug!("Stage: {}", Stage::BitPacking);
    let payload = pack(&intermediate, &table)?;

    let mut bw = BitWriter::new(header.len() + payload.output.len() + 32);
    bw.add_block(data.len() as u64, &header, &payload)?;
    let out = bw.finish();

    debug!("Stage: {}", Stage::Done);
    info!(
        "Compressed {} bytes to {} bytes ({} payload bits).",
        data.len(),
        out.len(),
        payload.bit_count()
    );
    Ok(out)
}

/// Write the code for every symbol, in order, and flush the final partial byte.
pub fn pack(symbols: &[u8], table: &CodeTable) -> Result<BitPacker, CodecError> {
    let mut bp = BitPacker::new(symbols.len() / 2 + 1);
    for &sym in symbols {
        let code = table.get(&sym).ok_or(CodecError::UnknownSymbol(sym))?;
        bp.out_code(code);
    }
    bp.flush();
    trace!("Packed payload ends at {}", bp.loc());
    Ok(bp)
}

/// Compress one file as directed by the options.
pub fn compress_file(opts: &RlhOpts, file: &str) -> io::Result<()> {
    let data = read_input(file)?;
    let out = compress(&data)?;
    let out_name = output_name(file, &opts.op_mode);
    write_output(opts, &out_name, &out)?;
    let in_size = file_size(file)?;
    let out_size = output_size(opts, &out_name, out.len())?;
    report_sizes(opts, file, in_size, out_size);
    finish_input(opts, file)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::huffman_coding::code_table::Code;

    #[test]
    fn compress_empty() {
        assert_eq!(compress(&[]).unwrap(), b"RLH1\x00".to_vec());
    }

    #[test]
    fn compress_header_fields() {
        let out = compress(b"aaaabbbcc").unwrap();
        assert_eq!(&out[..5], b"RLH1\x01");
        assert_eq!(&out[5..13], &9_u64.to_be_bytes());
        // Six leaves: 6 * 9 + 5 = 59 bits, 8 bytes of tree
        assert_eq!(&out[13..15], &[0, 8]);
    }

    #[test]
    fn pack_unknown_symbol() {
        let mut table = CodeTable::default();
        table.insert(1, Code { bits: 0, len: 1 });
        assert!(matches!(
            pack(&[1, 2], &table),
            Err(CodecError::UnknownSymbol(2))
        ));
    }

    #[test]
    fn pack_bits() {
        let mut table = CodeTable::default();
        table.insert(1, Code { bits: 0, len: 1 });
        table.insert(2, Code { bits: 0b10, len: 2 });
        table.insert(3, Code { bits: 0b11, len: 2 });
        let bp = pack(&[3, 1, 2, 1, 3], &table).unwrap();
        // 11 0 10 0 11 -> 1101_0011
        assert_eq!(bp.output, vec![0b1101_0011]);
        assert_eq!(bp.bit_count(), 8);
    }
}
