//! BitReader: Reads an in-memory packed bitstream, most significant bit first.
//!
//! Every read returns None once the data runs out. Callers decide what running out means
//! (a truncated stream, or a malformed header).
//!

const BIT_MASK: u8 = 0xff;

/// Reads a compressed buffer bit by bit (or several bits at a time).
#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader over the buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            bit_index: 0,
        }
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<usize> {
        if self.cursor >= self.buffer.len() {
            return None;
        }
        let bit =
            (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        Some(bit as usize)
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Return Option<u64> of the next n bits (n <= 64), or None if there is not enough data.
    /// Nothing is consumed when the read fails.
    pub fn bint(&mut self, n: usize) -> Option<u64> {
        if n > 64 || self.remaining_bits() < n {
            return None;
        }
        /*
        Read as many bits as possible for each step. First take what is left of a partial
        byte, then whole bytes, then the leading bits of one more byte.
        */
        let mut result = 0_u64;
        let mut n = n;

        if self.bit_index > 0 && n > 0 {
            let needed = n.min(8 - self.bit_index);
            result = ((self.buffer[self.cursor] & BIT_MASK >> self.bit_index)
                >> (8 - self.bit_index - needed)) as u64;
            self.bit_index += needed;
            if self.bit_index == 8 {
                self.cursor += 1;
            }
            self.bit_index %= 8;
            n -= needed;
        }
        while n >= 8 {
            result = result << 8 | self.buffer[self.cursor] as u64;
            self.cursor += 1;
            n -= 8;
        }
        if n > 0 {
            result = result << n | (self.buffer[self.cursor] >> (8 - n)) as u64;
            self.bit_index = n;
        }
        Some(result)
    }

    /// Returns a byte as an Option<u8>, or None if there is no more data to read. This is
    /// a convenience function, and calls bint(8).
    pub fn byte(&mut self) -> Option<u8> {
        self.bint(8).map(|byte| byte as u8)
    }

    /// Returns an Option<Vec<u8>> of n bytes, or None if fewer than n bytes remain.
    pub fn bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        if self.remaining_bits() / 8 < n {
            return None;
        }
        (0..n).map(|_| self.byte()).collect()
    }

    /// The unread bytes, if the reader sits on a byte boundary.
    pub fn rest(&self) -> Option<&'a [u8]> {
        if self.bit_index == 0 {
            Some(&self.buffer[self.cursor.min(self.buffer.len())..])
        } else {
            None
        }
    }

    /// Number of bits consumed so far.
    pub fn bits_read(&self) -> usize {
        self.cursor * 8 + self.bit_index
    }

    /// Number of bits left to read.
    pub fn remaining_bits(&self) -> usize {
        self.buffer.len() * 8 - self.bits_read()
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}
