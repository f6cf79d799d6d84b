/*! The frequency header that precedes every encoded payload.

All fields are little-endian signed 32-bit integers:

```text
  +------------+------------+==========================================+
  | entryCount | totalCount | entryCount x (codepoint, frequency) pair |
  +------------+------------+==========================================+
```

`totalCount` is the number of symbols in the payload. The payload has no end
marker, so this is the only thing that tells the decoder when to stop. Pairs
are written in ascending code-point order, but the reader accepts any order.
*/

use std::collections::HashSet;
use std::convert::TryFrom;
use std::io::{ErrorKind, Read, Write};

use bitstream_io::{ByteRead, ByteReader, ByteWrite, ByteWriter, LittleEndian};
use thiserror::Error;

use crate::huff_tree::FrequencyTable;

/// Bytes taken by the two leading counts.
pub const PREAMBLE_LEN: usize = 8;
/// Bytes taken by one (codepoint, frequency) pair.
pub const ENTRY_LEN: usize = 8;

#[derive(Error, Debug)]
pub enum HeaderReadError {
  #[error("Header is truncated")]
  TruncatedHeader,
  #[error("Header count out of range: {0}")]
  InvalidCount(i32),
  #[error("Header entry is not a Unicode scalar value: {:#x}", .0)]
  InvalidSymbol(i32),
  #[error("Header frequency for {0:?} must be positive, got {1}")]
  InvalidFrequency(char, i32),
  #[error("Symbol {0:?} appears more than once in the header")]
  DuplicateSymbol(char),
  #[error("Header total says {0} symbols, but the frequencies add up to {1}")]
  TotalMismatch(u64, u64),
  #[error("Other IO error: {0}")]
  IOError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum HeaderWriteError {
  #[error("{0} does not fit in a 32-bit header field: {1}")]
  TooLarge(&'static str, u64),
  #[error("Other IO error: {0}")]
  IOError(#[from] std::io::Error),
}

/// A decoded header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
  pub frequencies: FrequencyTable,
  pub total_symbols: u64,
}

impl Header {
  pub fn from_frequencies(frequencies: FrequencyTable) -> Self {
    let total_symbols = frequencies.total();
    Self {
      frequencies,
      total_symbols,
    }
  }

  pub fn entry_count(&self) -> usize {
    self.frequencies.len()
  }

  /// Size of this header on the wire.
  pub fn encoded_len(&self) -> usize {
    PREAMBLE_LEN + ENTRY_LEN * self.entry_count()
  }
}

fn to_field(what: &'static str, value: u64) -> Result<i32, HeaderWriteError> {
  i32::try_from(value).map_err(|_| HeaderWriteError::TooLarge(what, value))
}

/// Serialize a frequency table. Returns the number of bytes written.
pub fn write_header<W: Write>(sink: W, freqs: &FrequencyTable) -> Result<usize, HeaderWriteError> {
  let entry_count = to_field("entry count", freqs.len() as u64)?;
  let total = to_field("total symbol count", freqs.total())?;

  let mut byte_sink: ByteWriter<W, LittleEndian> = ByteWriter::new(sink);
  byte_sink.write(entry_count)?;
  byte_sink.write(total)?;
  for (sym, freq) in freqs.iter() {
    byte_sink.write(u32::from(sym) as i32)?;
    byte_sink.write(to_field("frequency", freq)?)?;
  }

  let nbytes = PREAMBLE_LEN + ENTRY_LEN * freqs.len();
  log::debug!(
    "Wrote header: {} entries, {} symbols, {} bytes",
    entry_count,
    total,
    nbytes
  );
  Ok(nbytes)
}

/// Map running out of bytes to `TruncatedHeader`, keep other IO errors.
fn read_field<R: Read>(byte_src: &mut ByteReader<R, LittleEndian>) -> Result<i32, HeaderReadError> {
  byte_src.read::<i32>().map_err(|e| {
    if e.kind() == ErrorKind::UnexpectedEof {
      HeaderReadError::TruncatedHeader
    } else {
      HeaderReadError::IOError(e)
    }
  })
}

/// Read and validate a header, leaving `src` positioned at the first payload
/// byte.
pub fn read_header<R: Read>(src: R) -> Result<Header, HeaderReadError> {
  let mut byte_src: ByteReader<R, LittleEndian> = ByteReader::new(src);

  let entry_count = read_field(&mut byte_src)?;
  let total = read_field(&mut byte_src)?;
  if entry_count < 0 {
    return Err(HeaderReadError::InvalidCount(entry_count));
  }
  if total < 0 {
    return Err(HeaderReadError::InvalidCount(total));
  }

  let mut frequencies = FrequencyTable::new();
  let mut seen = HashSet::new();
  for _ in 0..entry_count {
    let raw_sym = read_field(&mut byte_src)?;
    let raw_freq = read_field(&mut byte_src)?;
    let sym = u32::try_from(raw_sym)
      .ok()
      .and_then(std::char::from_u32)
      .ok_or(HeaderReadError::InvalidSymbol(raw_sym))?;
    if raw_freq <= 0 {
      return Err(HeaderReadError::InvalidFrequency(sym, raw_freq));
    }
    if !seen.insert(sym) {
      return Err(HeaderReadError::DuplicateSymbol(sym));
    }
    frequencies.add_count(sym, raw_freq as u64);
  }

  let declared = total as u64;
  if frequencies.total() != declared {
    return Err(HeaderReadError::TotalMismatch(declared, frequencies.total()));
  }

  Ok(Header {
    frequencies,
    total_symbols: declared,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw_header(fields: &[i32]) -> Vec<u8> {
    fields.iter().flat_map(|f| f.to_le_bytes().to_vec()).collect()
  }

  #[test]
  fn layout_is_little_endian_i32() {
    let table = FrequencyTable::from_text("aaaee1");
    let mut out = Vec::new();
    let n = write_header(&mut out, &table).unwrap();
    assert_eq!(n, 32);
    let expected = raw_header(&[3, 6, '1' as i32, 1, 'a' as i32, 3, 'e' as i32, 2]);
    assert_eq!(out, expected);
  }

  #[test]
  fn read_back_matches_table() {
    let table = FrequencyTable::from_text("Grüße, 世界! 世界!");
    let mut out = Vec::new();
    write_header(&mut out, &table).unwrap();
    let header = read_header(&out[..]).unwrap();
    assert_eq!(header.frequencies, table);
    assert_eq!(header.total_symbols, table.total());
    assert_eq!(header.entry_count(), table.len());
    assert_eq!(header.encoded_len(), out.len());
  }

  #[test]
  fn entries_in_any_order_are_accepted() {
    let data = raw_header(&[2, 5, 'z' as i32, 4, 'b' as i32, 1]);
    let header = read_header(&data[..]).unwrap();
    assert_eq!(header.frequencies.get('z'), Some(4));
    assert_eq!(header.frequencies.get('b'), Some(1));
  }

  #[test]
  fn reader_stops_at_payload() {
    let mut data = raw_header(&[1, 2, 'x' as i32, 2]);
    data.push(0xaa);
    let mut src = &data[..];
    read_header(&mut src).unwrap();
    assert_eq!(src, &[0xaau8][..]);
  }

  #[test]
  fn truncated_entries() {
    let data = raw_header(&[3, 6, '1' as i32, 1, 'a' as i32, 3, 'e' as i32]);
    assert!(matches!(
      read_header(&data[..]),
      Err(HeaderReadError::TruncatedHeader)
    ));
  }

  #[test]
  fn truncated_preamble() {
    assert!(matches!(
      read_header(&[0u8; 0][..]),
      Err(HeaderReadError::TruncatedHeader)
    ));
    assert!(matches!(
      read_header(&[1u8, 0, 0, 0, 2, 0][..]),
      Err(HeaderReadError::TruncatedHeader)
    ));
  }

  #[test]
  fn invalid_fields_are_rejected() {
    let negative = raw_header(&[-1, 0]);
    assert!(matches!(
      read_header(&negative[..]),
      Err(HeaderReadError::InvalidCount(-1))
    ));

    let surrogate = raw_header(&[1, 1, 0xd800, 1]);
    assert!(matches!(
      read_header(&surrogate[..]),
      Err(HeaderReadError::InvalidSymbol(0xd800))
    ));

    let zero_freq = raw_header(&[1, 0, 'a' as i32, 0]);
    assert!(matches!(
      read_header(&zero_freq[..]),
      Err(HeaderReadError::InvalidFrequency('a', 0))
    ));

    let dup = raw_header(&[2, 2, 'a' as i32, 1, 'a' as i32, 1]);
    assert!(matches!(
      read_header(&dup[..]),
      Err(HeaderReadError::DuplicateSymbol('a'))
    ));

    let mismatch = raw_header(&[1, 7, 'a' as i32, 3]);
    assert!(matches!(
      read_header(&mismatch[..]),
      Err(HeaderReadError::TotalMismatch(7, 3))
    ));
  }

  #[test]
  fn oversized_frequency_is_rejected() {
    let mut table = FrequencyTable::new();
    table.add_count('a', 1 << 31);
    let mut out = Vec::new();
    assert!(matches!(
      write_header(&mut out, &table),
      Err(HeaderWriteError::TooLarge(_, _))
    ));
    assert!(out.is_empty());
  }
}
