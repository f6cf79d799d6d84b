use std::io::{Read, Write};

use thiserror::Error;

use super::header::{write_header, HeaderWriteError};
use super::CodecStats;
use crate::bitio::{BitIoError, BitWriter};
use crate::huff_tree::{FrequencyTable, HuffTree, TreeError};

#[derive(Error, Debug)]
pub enum EncodeError {
  #[error("Nothing to encode: the input is empty")]
  EmptyInput,
  #[error("Input is not valid UTF-8: {0}")]
  InvalidUtf8(#[from] std::string::FromUtf8Error),
  #[error("Symbol {0:?} has no code in the encoding map")]
  UnknownSymbol(char),
  #[error("Could not write header: {0}")]
  HeaderError(#[from] HeaderWriteError),
  #[error("Could not build the Huffman tree: {0}")]
  TreeError(#[from] TreeError),
  #[error("Bit output failed: {0}")]
  BitError(#[from] BitIoError),
  #[error("Other IO Error: {0}")]
  IOError(#[from] std::io::Error),
}

/// Read `src` to the end and write its Huffman encoding to `sink`.
pub fn encode<R: Read, W: Write>(mut src: R, sink: W) -> Result<CodecStats, EncodeError> {
  let mut raw = Vec::new();
  src.read_to_end(&mut raw)?;
  let text = String::from_utf8(raw)?;
  encode_str(&text, sink)
}

/// Encode an in-memory string. Nothing is written if `text` is empty.
pub fn encode_str<W: Write>(text: &str, mut sink: W) -> Result<CodecStats, EncodeError> {
  let freqs = FrequencyTable::from_text(text);
  if freqs.is_empty() {
    return Err(EncodeError::EmptyInput);
  }
  let tree = HuffTree::from_frequencies(&freqs)?;
  let codes = tree.encoding_map();
  log::debug!(
    "Encoding {} symbols ({} distinct), longest code is {} bits",
    freqs.total(),
    freqs.len(),
    tree.max_code_len()
  );

  let header_bytes = write_header(&mut sink, &freqs)?;

  let mut bit_sink = BitWriter::new(&mut sink);
  for ch in text.chars() {
    let code = codes.get(&ch).ok_or(EncodeError::UnknownSymbol(ch))?;
    bit_sink.write_bits(code)?;
  }
  let payload_bits = bit_sink.bits_written();
  bit_sink.into_writer()?.flush()?;

  Ok(CodecStats::new(
    freqs.len(),
    freqs.total(),
    header_bytes,
    payload_bits,
  ))
}
