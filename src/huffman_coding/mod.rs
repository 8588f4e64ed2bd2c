//! The huffman module builds the entropy coding stage of the rlehuff compressor. Decoding the
//! huffman data happens in the decompress function.
//!
//! Trees are built from the byte frequencies of the run-length data. Ties between equal weights
//! are broken by symbol value (and, for merged nodes, by the order they were made), so the same
//! input always gives the same tree and the same codes.
//!
//! The process of building the tree is inherently sequential and does not benefit from multithreading.
//!

pub mod code_table;
pub mod huffman;
