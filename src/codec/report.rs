/*! A serializable description of an encoded stream's header and the code
derived from it, for dumping to JSON. */

use serde::Serialize;

use super::header::Header;
use crate::huff_tree::{code_to_string, HuffTree, TreeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolReport {
  pub symbol: char,
  pub codepoint: u32,
  pub frequency: u64,
  pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderReport {
  pub entry_count: usize,
  pub total_symbols: u64,
  pub header_bytes: usize,
  /// Bits the payload must contain, padding excluded.
  pub payload_bits: u64,
  pub max_code_len: usize,
  pub symbols: Vec<SymbolReport>,
}

impl HeaderReport {
  pub fn from_header(header: &Header) -> Result<Self, TreeError> {
    let tree = HuffTree::from_frequencies(&header.frequencies)?;
    let codes = tree.encoding_map();

    let mut payload_bits = 0u64;
    let mut symbols = Vec::with_capacity(header.entry_count());
    for (sym, freq) in header.frequencies.iter() {
      // Every symbol of the table is a leaf of the tree built from it.
      let code = codes.get(&sym).map(code_to_string).unwrap_or_default();
      payload_bits += freq * code.len() as u64;
      symbols.push(SymbolReport {
        symbol: sym,
        codepoint: u32::from(sym),
        frequency: freq,
        code,
      });
    }

    Ok(Self {
      entry_count: header.entry_count(),
      total_symbols: header.total_symbols,
      header_bytes: header.encoded_len(),
      payload_bits,
      max_code_len: tree.max_code_len(),
      symbols,
    })
  }
}
