/*! Huffman coding of UTF-8 text.

The input is counted by Unicode code point, a Huffman tree is built from the
counts, and the stream is written as a small frequency header followed by the
bit-packed codes. Decoding rebuilds the same tree from the header and walks
it bit by bit until the promised number of symbols has come out.

```no_run
use std::fs::File;
use std::io::{BufReader, BufWriter};

let src = BufReader::new(File::open("input.txt")?);
let sink = BufWriter::new(File::create("input.huff")?);
let stats = huffcode::encode(src, sink)?;
println!("{} symbols in {} bytes", stats.total_symbols, stats.encoded_bytes());
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub mod bitio;
pub mod codec;
pub mod huff_tree;
pub mod pqueue;

pub use codec::{decode, encode, CodecStats, DecodeError, EncodeError};
