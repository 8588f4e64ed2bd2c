use log::error;

use crate::huffman_coding::code_table::Code;

/// Creates a bitstream for output.
pub struct BitPacker {
    pub output: Vec<u8>,
    pub last_bits: u8,
    queue: u64,
    q_bits: u8,
    bit_count: u64,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of size specified. Call flush() to flush
    /// the bit queue to the buffer before reading the output.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            last_bits: 0,
            queue: 0,
            q_bits: 0,
            bit_count: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /*
    NOTE: out24 takes a u32.  The 8 most significant bits of the word indicate how
    many of the least significant bits will be written. Those bits must be aligned to
    the least signficant bit. (The middle bits are masked out.)

    Eg 0000100_00000000_00000000_00000010 writes out 0010.
    */
    /// Writes 1-24 bits encoded with the number of bits to write in the most
    /// significant byte of a 32 bit word.
    pub fn out24(&mut self, data: u32) {
        let depth = (data >> 24) as u8; //get bit length by shifting out the 24 data bits
        self.queue <<= depth; //shift queue by bit length
        self.queue |= (data & (0xffffffff >> (32 - depth))) as u64; //add data portion to queue
        self.q_bits += depth; //update depth of queue bits
        self.bit_count += depth as u64;
        self.write_stream();
    }

    /// Puts a variable length Huffman code on the stream, most significant bit first.
    pub fn out_code(&mut self, code: &Code) {
        let mut remaining = code.len;
        // Feed the code through out24 a slice of at most 24 bits at a time.
        while remaining > 0 {
            let n = remaining.min(24);
            remaining -= n;
            let chunk = ((code.bits >> remaining) & ((1_u128 << n) - 1)) as u32;
            self.out24(((n as u32) << 24) | chunk);
        }
    }

    /// Number of data bits written so far, not counting any flush padding.
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Flushes the remaining bits (1-7) from the buffer, padding with 0s in the least
    /// signficant bits
    pub fn flush(&mut self) {
        self.last_bits = self.q_bits % 8;
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits += 8 - self.q_bits;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format! {"[{}.{}]",((self.output.len() * 8) + self.q_bits as usize)/8, ((self.output.len() * 8) + self.q_bits as usize)%8}
    }
}

#[cfg(test)]
mod test {
    use super::BitPacker;
    use crate::huffman_coding::code_table::Code;

    #[test]
    fn out24_and_loc_test() {
        let mut bw = BitPacker::new(100);
        let data = 0b00001000_00000000_00000000_00100001;
        bw.out24(data);
        bw.flush();
        let out = &bw.output;
        assert_eq!(out, "!".as_bytes());
        assert_eq!("[1.0]", &bw.loc());
        let data = 0b00011000_00000000_00000000_00000011;
        bw.out24(data);
        bw.flush();
        let out2 = &bw.output;
        assert_eq!(out2, &[33, 0, 0, 3]); // Note: '33' is data from previous call
        assert_eq!("[4.0]", &bw.loc());
    }

    #[test]
    fn partial_byte_padding() {
        let mut bw = BitPacker::new(10);
        bw.out24((3 << 24) | 0b101);
        assert_eq!("[0.3]", &bw.loc());
        bw.flush();
        assert_eq!(bw.output, vec![0b1010_0000]);
        assert_eq!(bw.last_bits, 3);
        assert_eq!(bw.bit_count(), 3);
    }

    #[test]
    fn long_code() {
        // 40 bits: one 24 bit slice and one 16 bit slice
        let code = Code {
            bits: 0xAB_CDEF_0123,
            len: 40,
        };
        let mut bw = BitPacker::new(10);
        bw.out_code(&code);
        bw.out_code(&Code { bits: 1, len: 1 });
        bw.flush();
        assert_eq!(bw.output, vec![0xAB, 0xCD, 0xEF, 0x01, 0x23, 0x80]);
        assert_eq!(bw.bit_count(), 41);
    }

    #[test]
    fn code_with_leading_zeros() {
        let mut bw = BitPacker::new(10);
        bw.out_code(&Code { bits: 0b0001, len: 4 });
        bw.out_code(&Code { bits: 0b0110, len: 4 });
        bw.flush();
        assert_eq!(bw.output, vec![0b0001_0110]);
        assert_eq!(bw.last_bits, 0);
    }
}
