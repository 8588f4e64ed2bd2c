/*
Run Length Encoder for the first stage of compression. Every maximal run of identical bytes becomes
a (value, count) pair, so even a lone byte costs two bytes. That is fine: the Huffman stage that
follows squeezes the pairs back down.

Logic: Starting at the first byte, count how many identical bytes follow (at most MAX_RUN, since the
counter is a single byte). Emit the pair, jump past the run and repeat. A run longer than MAX_RUN
simply continues as a new pair with the same value, so nothing ever wraps around.
*/

use crate::error::CodecError;

/// Largest count a single run can carry (the counter is one byte).
pub const MAX_RUN: usize = u8::MAX as usize;

/// One (value, count) pair. The count is always 1..=MAX_RUN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub value: u8,
    pub count: u8,
}

impl Run {
    /// Create a run, refusing counts the one byte counter cannot hold.
    pub fn new(value: u8, count: usize) -> Result<Self, CodecError> {
        match count {
            0 => Err(CodecError::MalformedRun { offset: 0 }),
            1..=MAX_RUN => Ok(Run {
                value,
                count: count as u8,
            }),
            _ => Err(CodecError::RunLengthOverflow { count }),
        }
    }
}

/// Encode runs of identical bytes. Runs longer than MAX_RUN are split into several runs.
pub fn rle_encode(v: &[u8]) -> Vec<Run> {
    // Worst case is one run per byte, but that is rare. Start with a modest guess.
    let mut runs = Vec::with_capacity(v.len() / 4 + 1);
    let mut idx = 0;

    while idx < v.len() {
        let dups = count_dups(v, idx);
        runs.push(Run {
            value: v[idx],
            count: dups as u8,
        });
        idx += dups;
    }
    runs
}

/// Helper for rle_encode to count how many identical bytes start at idx (1..=MAX_RUN).
fn count_dups(v: &[u8], idx: usize) -> usize {
    // If position returns None, the run goes to the end of the data (or to the cap).
    let compare = v[idx];
    v.iter()
        .skip(idx)
        .take(MAX_RUN)
        .position(|&x| x != compare)
        .unwrap_or_else(|| (v.len() - idx).min(MAX_RUN))
}

/// Flatten runs into the interleaved value/count byte stream that the Huffman stage consumes.
pub fn runs_to_bytes(runs: &[Run]) -> Vec<u8> {
    let mut out = Vec::with_capacity(runs.len() * 2);
    for run in runs {
        out.push(run.value);
        out.push(run.count);
    }
    out
}

/// Expand an interleaved value/count byte stream. Fails on a zero count or a dangling value byte.
pub fn rle_decode(v: &[u8]) -> Result<Vec<u8>, CodecError> {
    // An odd length means the stream was cut in the middle of a pair.
    if v.len() % 2 != 0 {
        return Err(CodecError::MalformedRun {
            offset: v.len() - 1,
        });
    }
    let expanded: usize = v.chunks_exact(2).map(|pair| pair[1] as usize).sum();
    let mut out = Vec::with_capacity(expanded);

    for (i, pair) in v.chunks_exact(2).enumerate() {
        if pair[1] == 0 {
            return Err(CodecError::MalformedRun { offset: i * 2 + 1 });
        }
        out.resize(out.len() + pair[1] as usize, pair[0]);
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rle_simple() {
        let runs = rle_encode(b"aaaabbbcc");
        assert_eq!(
            runs,
            vec![
                Run { value: b'a', count: 4 },
                Run { value: b'b', count: 3 },
                Run { value: b'c', count: 2 },
            ]
        );
        assert_eq!(runs_to_bytes(&runs), vec![b'a', 4, b'b', 3, b'c', 2]);
    }

    #[test]
    fn rle_no_runs() {
        let runs = rle_encode(b"Goofy");
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[1], Run { value: b'o', count: 2 });
    }

    #[test]
    fn rle_splits_long_runs() {
        let runs = rle_encode(&[7_u8; 300]);
        assert_eq!(
            runs,
            vec![Run { value: 7, count: 255 }, Run { value: 7, count: 45 }]
        );
    }

    #[test]
    fn rle_exact_max_run() {
        let runs = rle_encode(&[1_u8; MAX_RUN * 2]);
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| r.count as usize == MAX_RUN));
    }

    #[test]
    fn rle_empty() {
        assert!(rle_encode(&[]).is_empty());
        assert_eq!(rle_decode(&[]), Ok(vec![]));
    }

    #[test]
    fn rle_de_simple() {
        let input = vec![b'G', 1, b'o', 2, b'f', 1, b'y', 1, b't', 1, b'e', 8, b's', 1, b't', 1];
        assert_eq!(rle_decode(&input).unwrap(), b"Goofyteeeeeeeest".to_vec());
    }

    #[test]
    fn rle_de_zero_count() {
        assert_eq!(
            rle_decode(&[b'a', 3, b'b', 0]),
            Err(CodecError::MalformedRun { offset: 3 })
        );
    }

    #[test]
    fn rle_de_dangling_value() {
        assert_eq!(
            rle_decode(&[b'a', 3, b'b']),
            Err(CodecError::MalformedRun { offset: 2 })
        );
    }

    #[test]
    fn run_new_bounds() {
        assert_eq!(Run::new(9, 255), Ok(Run { value: 9, count: 255 }));
        assert_eq!(
            Run::new(9, 256),
            Err(CodecError::RunLengthOverflow { count: 256 })
        );
        assert!(Run::new(9, 0).is_err());
    }
}
