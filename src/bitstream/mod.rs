//! The bitstream module forms the I/O subsystem for the rlehuff compressor.
//!
//! - bitpacker: packs variable length codes (and the tree header) into bytes, most significant
//!   bit first, zero padding the final byte and counting the valid bits.
//! - bitreader: reads those bits back from an in-memory buffer.
//! - bitwriter: frames the packed tree and payload into the finished stream.
//!
//! This I/O subsystem is designed to efficiently interface with the other modules within rlehuff. It is not intended for
//! more general use.
//!
pub mod bitpacker;
pub mod bitreader;
pub mod bitwriter;
