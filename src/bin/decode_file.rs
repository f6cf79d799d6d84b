use std::env;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::process;

use huffcode::codec::decode;

fn main() {
  let args: Vec<String> = env::args().collect();

  if args.len() != 3 {
    println!("Usage: {} <infilename> <outfilename>", &args[0]);
    println!("\tDecodes a file produced by encode_file back into UTF-8 text");
    process::exit(1);
  }

  pretty_env_logger::init();

  let infile = fs::File::open(&args[1]).unwrap_or_else(|e| {
    eprintln!("Could not open input file {}: {}", args[1], e);
    process::exit(1);
  });
  let outfile = fs::File::create(&args[2]).unwrap_or_else(|e| {
    eprintln!("Could not create output file {}: {}", args[2], e);
    process::exit(1);
  });

  match decode(BufReader::new(infile), BufWriter::new(outfile)) {
    Ok(stats) => {
      log::info!(
        "Read {} header bytes and {} payload bits",
        stats.header_bytes,
        stats.payload_bits
      );
      println!(
        "Decoded {} symbols ({} distinct)",
        stats.total_symbols, stats.distinct_symbols
      );
    }
    Err(e) => {
      // Whatever was written before the failure is not usable.
      eprintln!("Decoding failed: {}", e);
      process::exit(1);
    }
  }
}
