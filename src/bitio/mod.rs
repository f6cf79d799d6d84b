/*! Bit-level I/O for the Huffman payload.

Both halves work most-significant-bit first: the first bit written lands in
bit 7 of the first byte, and the first bit read comes from bit 7 of the first
byte. The heavy lifting is done by the bitstream-io library; these wrappers
pin the bit order, keep a count of payload bits, and turn the library's
end-of-file errors into something the decoder can tell apart from real I/O
failures.
*/

use std::io::{ErrorKind, Read, Write};

use bit_vec::BitVec;
use bitstream_io::{BigEndian, BitRead, BitWrite};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BitIoError {
  #[error("Bit source ran out of bytes")]
  EndOfInput,
  #[error("Other IO error: {0}")]
  IOError(#[from] std::io::Error),
}

/// Reads single bits from a byte source, MSB first.
pub struct BitReader<R: Read> {
  bit_src: bitstream_io::BitReader<R, BigEndian>,
  bits_read: u64,
}

impl<R: Read> BitReader<R> {
  pub fn new(src: R) -> Self {
    Self {
      bit_src: bitstream_io::BitReader::new(src),
      bits_read: 0,
    }
  }

  /// Fetch the next bit. A new byte is pulled from the source only once all
  /// eight bits of the previous one have been handed out.
  pub fn read_bit(&mut self) -> Result<bool, BitIoError> {
    match self.bit_src.read_bit() {
      Ok(bit) => {
        self.bits_read += 1;
        Ok(bit)
      }
      Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(BitIoError::EndOfInput),
      Err(e) => Err(BitIoError::IOError(e)),
    }
  }

  pub fn bits_read(&self) -> u64 {
    self.bits_read
  }
}

/// Packs single bits into bytes, MSB first, zero-padding the last byte on
/// `flush`.
pub struct BitWriter<W: Write> {
  bit_sink: bitstream_io::BitWriter<W, BigEndian>,
  bits_written: u64,
}

impl<W: Write> BitWriter<W> {
  pub fn new(sink: W) -> Self {
    Self {
      bit_sink: bitstream_io::BitWriter::new(sink),
      bits_written: 0,
    }
  }

  /// Append one bit. Every eighth call emits a byte to the sink.
  pub fn write_bit(&mut self, bit: bool) -> Result<(), BitIoError> {
    self.bit_sink.write_bit(bit)?;
    self.bits_written += 1;
    Ok(())
  }

  /// Append a whole code, leftmost bit first.
  pub fn write_bits(&mut self, code: &BitVec) -> Result<(), BitIoError> {
    for bit in code.iter() {
      self.write_bit(bit)?;
    }
    Ok(())
  }

  /// Emit a partially filled byte, if there is one. Low bits that were never
  /// written come out as zero. Does nothing on a byte boundary.
  pub fn flush(&mut self) -> Result<(), BitIoError> {
    self.bit_sink.byte_align()?;
    Ok(())
  }

  /// Number of bits handed to `write_bit`, padding excluded.
  pub fn bits_written(&self) -> u64 {
    self.bits_written
  }

  /// Flush and give back the underlying sink.
  pub fn into_writer(mut self) -> Result<W, BitIoError> {
    self.flush()?;
    Ok(self.bit_sink.into_writer())
  }
}
