//! A two stage lossless byte compressor.
//!
//! Version 0.1.0
//!
//! Input is first run-length encoded into (value, count) pairs, then the pairs are Huffman
//! coded. The code tree travels in the stream header, so a stream decodes with nothing else.
//! Tree construction is fully deterministic: compressing the same bytes twice gives the same
//! output, bit for bit.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> rlehuff -z picture.png`
//!
//! This will compress the file and create the file picture.png.rlh.
//! The original file will be deleted unless -k is given.
//!
//! From code:
//!
//! ```
//! let packed = rlehuff::compress(b"aaaabbbcc").unwrap();
//! assert_eq!(rlehuff::decompress(&packed).unwrap(), b"aaaabbbcc");
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::compress;
pub use compression::decompress::decompress;
pub use error::CodecError;
