use thiserror::Error;

/// Everything that can go wrong inside the codec. Every stage aborts on the first error, so a
/// caller never sees partial output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Cannot build a Huffman tree from an empty frequency table")]
    EmptyInput,

    #[error("Run of {count} bytes exceeds the run counter width")]
    RunLengthOverflow { count: usize },

    #[error("Malformed run at byte {offset} of the run-length data")]
    MalformedRun { offset: usize },

    #[error("Malformed stream header: {0}")]
    MalformedHeader(String),

    #[error("No code for symbol {0}")]
    UnknownSymbol(u8),

    #[error("Compressed stream ends unexpectedly")]
    TruncatedStream,

    #[error("Decompressed {actual} bytes, but the header promised {expected}")]
    LengthMismatch { expected: u64, actual: u64 },
}

impl From<CodecError> for std::io::Error {
    fn from(e: CodecError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    }
}
