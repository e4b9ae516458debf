//! LZW decompression
//!
//! TIFF LZW packs codes most significant bit first and widens the code one
//! entry early (at 511, 1023 and 2047).

use crate::error::{Error, Result};

const CLEAR_CODE: u16 = 256;
const EOI_CODE: u16 = 257;
const FIRST_CODE: usize = 258;
const MAX_CODE_BITS: u8 = 12;

/// Decompresses LZW compressed data
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    LzwDecoder::new().decode(data)
}

/// Dictionary entries are stored as (prefix code, last byte) pairs
struct LzwDecoder {
    prefixes: Vec<u16>,
    suffixes: Vec<u8>,
    firsts: Vec<u8>,
    scratch: Vec<u8>,
}

impl LzwDecoder {
    fn new() -> Self {
        let mut decoder = Self {
            prefixes: Vec::with_capacity(4096),
            suffixes: Vec::with_capacity(4096),
            firsts: Vec::with_capacity(4096),
            scratch: Vec::new(),
        };
        decoder.reset();
        decoder
    }

    fn reset(&mut self) {
        self.prefixes.clear();
        self.suffixes.clear();
        self.firsts.clear();
        for byte in 0..=255u8 {
            self.prefixes.push(u16::MAX);
            self.suffixes.push(byte);
            self.firsts.push(byte);
        }
        // Clear and EOI occupy the codes below FIRST_CODE
        for _ in 256..FIRST_CODE {
            self.prefixes.push(u16::MAX);
            self.suffixes.push(0);
            self.firsts.push(0);
        }
    }

    fn next_code(&self) -> usize {
        self.prefixes.len()
    }

    fn code_width(&self) -> u8 {
        match self.next_code() + 1 {
            n if n < 512 => 9,
            n if n < 1024 => 10,
            n if n < 2048 => 11,
            _ => MAX_CODE_BITS,
        }
    }

    fn emit(&mut self, code: u16, output: &mut Vec<u8>) {
        self.scratch.clear();
        let mut current = code;
        while current != u16::MAX {
            self.scratch.push(self.suffixes[current as usize]);
            current = self.prefixes[current as usize];
        }
        output.extend(self.scratch.iter().rev());
    }

    fn add(&mut self, prefix: u16, byte: u8) {
        if self.next_code() < 1 << MAX_CODE_BITS {
            self.firsts.push(self.firsts[prefix as usize]);
            self.prefixes.push(prefix);
            self.suffixes.push(byte);
        }
    }

    fn decode(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(data.len() * 2);
        let mut bits = BitReader::new(data);
        let mut previous: Option<u16> = None;

        while let Some(code) = bits.read(self.code_width()) {
            match code {
                EOI_CODE => break,
                CLEAR_CODE => {
                    self.reset();
                    previous = None;
                }
                _ => {
                    let known = (code as usize) < self.next_code();
                    match previous {
                        None if known => self.emit(code, &mut output),
                        None => {
                            return Err(Error::InvalidFormat(format!("Invalid LZW code: {}", code)));
                        }
                        Some(prev) if known => {
                            self.emit(code, &mut output);
                            self.add(prev, self.firsts[code as usize]);
                        }
                        Some(prev) if code as usize == self.next_code() => {
                            self.add(prev, self.firsts[prev as usize]);
                            self.emit(code, &mut output);
                        }
                        Some(_) => {
                            return Err(Error::InvalidFormat(format!("Invalid LZW code: {}", code)));
                        }
                    }
                    previous = Some(code);
                }
            }
        }

        Ok(output)
    }
}

/// Reads MSB-first variable-width codes
struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
    buffer: u32,
    buffered: u8,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            buffer: 0,
            buffered: 0,
        }
    }

    fn read(&mut self, width: u8) -> Option<u16> {
        while self.buffered < width {
            let byte = *self.data.get(self.position)?;
            self.position += 1;
            self.buffer = (self.buffer << 8) | byte as u32;
            self.buffered += 8;
        }
        self.buffered -= width;
        let code = (self.buffer >> self.buffered) & ((1 << width) - 1);
        Some(code as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Packs codes MSB first with the given widths
    fn pack(codes: &[(u16, u8)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut acc: u64 = 0;
        let mut bits = 0u32;
        for &(code, width) in codes {
            acc = (acc << width) | code as u64;
            bits += width as u32;
            while bits >= 8 {
                bits -= 8;
                out.push((acc >> bits) as u8);
            }
        }
        if bits > 0 {
            out.push((acc << (8 - bits)) as u8);
        }
        out
    }

    #[test]
    fn test_bit_reader_msb_first() {
        let data = [0b1010_1010, 0b1100_0000];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read(9), Some(0b1010_1010_1));
        assert_eq!(reader.read(1), Some(1));
        assert_eq!(reader.read(9), None);
    }

    #[test]
    fn test_literals() {
        let data = pack(&[(256, 9), (b'A' as u16, 9), (b'B' as u16, 9), (257, 9)]);
        assert_eq!(decompress(&data).unwrap(), b"AB");
    }

    #[test]
    fn test_repeated_sequence_uses_dictionary() {
        // "ABABABA": A, B, AB(258), ABA(260)
        let data = pack(&[
            (256, 9),
            (b'A' as u16, 9),
            (b'B' as u16, 9),
            (258, 9),
            (260, 9),
            (257, 9),
        ]);
        assert_eq!(decompress(&data).unwrap(), b"ABABABA");
    }

    #[test]
    fn test_clear_restarts_dictionary() {
        // After the second clear, "BA" is entry 258 again
        let data = pack(&[
            (256, 9),
            (b'A' as u16, 9),
            (b'B' as u16, 9),
            (256, 9),
            (b'B' as u16, 9),
            (b'A' as u16, 9),
            (FIRST_CODE as u16, 9),
            (257, 9),
        ]);
        assert_eq!(decompress(&data).unwrap(), b"ABBABA");
    }

    #[test]
    fn test_invalid_code() {
        let data = pack(&[(256, 9), (300, 9)]);
        assert!(decompress(&data).is_err());
    }
}
