use std::io::{Read, Write};

use thiserror::Error;

use super::header::{read_header, HeaderReadError};
use super::CodecStats;
use crate::bitio::{BitIoError, BitReader};
use crate::huff_tree::{HuffNode, HuffTree, TreeError};

#[derive(Error, Debug)]
pub enum DecodeError {
  #[error("Header describes no symbols")]
  EmptyInput,
  #[error("Payload ended after {decoded} of {expected} symbols")]
  TruncatedData { decoded: u64, expected: u64 },
  #[error("Bad header: {0}")]
  HeaderError(#[from] HeaderReadError),
  #[error("Could not rebuild the Huffman tree: {0}")]
  TreeError(#[from] TreeError),
  #[error("Other IO error: {0}")]
  IOError(#[from] std::io::Error),
}

/// Decode a header + payload from `src`, writing the UTF-8 text to `sink`.
///
/// Decoding stops as soon as the number of symbols promised by the header
/// has been produced. Whatever follows (padding bits in the last byte, or
/// anything else) is left unread.
pub fn decode<R: Read, W: Write>(mut src: R, mut sink: W) -> Result<CodecStats, DecodeError> {
  let header = read_header(&mut src)?;
  if header.frequencies.is_empty() {
    return Err(DecodeError::EmptyInput);
  }
  let tree = HuffTree::from_frequencies(&header.frequencies)?;
  let expected = header.total_symbols;
  log::debug!(
    "Decoding {} symbols ({} distinct)",
    expected,
    header.entry_count()
  );

  let root = tree.root();
  let mut bit_src = BitReader::new(&mut src);
  let mut current = root;
  let mut decoded = 0u64;
  let mut utf8 = [0u8; 4];

  while decoded < expected {
    let bit = match bit_src.read_bit() {
      Ok(bit) => bit,
      Err(BitIoError::EndOfInput) => {
        return Err(DecodeError::TruncatedData { decoded, expected })
      }
      Err(BitIoError::IOError(e)) => return Err(DecodeError::IOError(e)),
    };

    // A leaf root has no children: each bit stands for the lone symbol.
    if let Some(next) = current.child(bit) {
      current = next;
    }

    if let HuffNode::Leaf { sym, .. } = current {
      sink.write_all(sym.encode_utf8(&mut utf8).as_bytes())?;
      decoded += 1;
      current = root;
    }
  }
  sink.flush()?;

  Ok(CodecStats::new(
    header.entry_count(),
    expected,
    header.encoded_len(),
    bit_src.bits_read(),
  ))
}
