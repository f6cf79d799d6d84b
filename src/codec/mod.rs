/*! Whole-stream Huffman encoding and decoding.

An encoded stream is a frequency header (see `header`) followed by the
bit-packed codes of every input symbol, most significant bit first, with the
last byte padded with zeros. The tree itself is never stored: the decoder
rebuilds it from the frequencies using the same construction as the encoder.
*/

pub mod decoder;
pub mod encoder;
pub mod header;
pub mod report;

pub use decoder::{decode, DecodeError};
pub use encoder::{encode, encode_str, EncodeError};

use serde::Serialize;

/// Sizes observed while encoding or decoding one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CodecStats {
  pub distinct_symbols: usize,
  pub total_symbols: u64,
  pub header_bytes: usize,
  /// Payload bits carrying codes, padding excluded.
  pub payload_bits: u64,
  pub payload_bytes: u64,
}

impl CodecStats {
  pub fn new(
    distinct_symbols: usize,
    total_symbols: u64,
    header_bytes: usize,
    payload_bits: u64,
  ) -> Self {
    Self {
      distinct_symbols,
      total_symbols,
      header_bytes,
      payload_bits,
      payload_bytes: (payload_bits + 7) / 8,
    }
  }

  pub fn encoded_bytes(&self) -> u64 {
    self.header_bytes as u64 + self.payload_bytes
  }
}

mod test {
  #[allow(unused_imports)]
  use super::*;
  #[cfg(test)]
  use quickcheck_macros::quickcheck;

  #[cfg(test)]
  // Take a string down to the bit level and back up again
  fn roundtrip_bitlevel(text: &str) -> String {
    let mut encoded = Vec::new();
    encode(text.as_bytes(), &mut encoded).unwrap();
    let mut decoded = Vec::new();
    decode(&encoded[..], &mut decoded).unwrap();
    String::from_utf8(decoded).unwrap()
  }

  #[test]
  pub fn toplevel_roundtrip_1() {
    let data = "aaaee1";
    assert_eq!(roundtrip_bitlevel(data), data);
  }

  #[test]
  pub fn toplevel_roundtrip_2() {
    let data = "Entire any had depend and figure winter. Change stairs and men likely wisdom new happen piqued six. Now taken him timed sex world get. Enjoyed married an feeling delight pursuit as offered. As admire roused length likely played pretty to no. Means had joy miles her merry solid order.";
    assert_eq!(roundtrip_bitlevel(data), data);
  }

  #[test]
  pub fn toplevel_roundtrip_single_symbol() {
    assert_eq!(roundtrip_bitlevel("aaaa"), "aaaa");
    assert_eq!(roundtrip_bitlevel("x"), "x");
    assert_eq!(roundtrip_bitlevel("🦀🦀🦀🦀🦀🦀🦀🦀🦀"), "🦀🦀🦀🦀🦀🦀🦀🦀🦀");
  }

  #[test]
  pub fn toplevel_roundtrip_unicode() {
    let data = "Zwölf Boxkämpfer jagen Viktor quer über den großen Sylter Deich.\n\
                いろはにほへと ちりぬるを\n\
                Съешь же ещё этих мягких французских булок 🍞🥐";
    assert_eq!(roundtrip_bitlevel(data), data);
  }

  #[test]
  pub fn toplevel_roundtrip_random() {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    for _ in 0..10 {
      let len = rng.gen_range(1..2000);
      let data: String = (0..len)
        .map(|_| std::char::from_u32(rng.gen_range(0x20..0x3000)).unwrap_or('?'))
        .collect();
      assert_eq!(roundtrip_bitlevel(&data), data);
    }
  }

  #[test]
  pub fn stats_agree_between_directions() {
    let data = "mississippi river";
    let mut encoded = Vec::new();
    let enc = encode(data.as_bytes(), &mut encoded).unwrap();
    let mut decoded = Vec::new();
    let dec = decode(&encoded[..], &mut decoded).unwrap();
    assert_eq!(enc, dec);
    assert_eq!(enc.encoded_bytes(), encoded.len() as u64);
    assert_eq!(enc.total_symbols, 17);
  }

  #[test]
  pub fn header_alone_reproduces_table() {
    let data = "abracadabra";
    let mut encoded = Vec::new();
    encode(data.as_bytes(), &mut encoded).unwrap();
    let header = header::read_header(&encoded[..]).unwrap();
    assert_eq!(
      header.frequencies,
      crate::huff_tree::FrequencyTable::from_text(data)
    );
  }

  #[cfg(test)]
  #[quickcheck]
  fn prop_roundtrip(data: String) -> bool {
    if data.is_empty() {
      return true;
    }
    roundtrip_bitlevel(&data) == data
  }
}
