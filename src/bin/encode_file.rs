use std::env;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::process;

use huffcode::codec::encode;

#[derive(Debug)]
struct Opts {
  infilename: String,
  outfilename: String,
}

fn print_usage(prog_name: &str) {
  println!("Usage: {} <infilename> <outfilename>", prog_name);
  println!(
    r#"    Huffman-encodes a UTF-8 text file. The output starts with a table of
    symbol frequencies, followed by the packed codes."#
  );
}

fn try_parse_args(args: &[String]) -> Option<Opts> {
  if args.len() != 3 {
    return None;
  }
  Some(Opts {
    infilename: args[1].clone(),
    outfilename: args[2].clone(),
  })
}

fn main() {
  let args: Vec<String> = env::args().collect();
  let opts = match try_parse_args(&args) {
    Some(opts) => opts,
    None => {
      print_usage(&args[0]);
      process::exit(1);
    }
  };

  pretty_env_logger::init();

  let infile = fs::File::open(&opts.infilename).unwrap_or_else(|e| {
    eprintln!("Could not open input file {}: {}", opts.infilename, e);
    process::exit(1);
  });
  let outfile = fs::File::create(&opts.outfilename).unwrap_or_else(|e| {
    eprintln!("Could not create output file {}: {}", opts.outfilename, e);
    process::exit(1);
  });

  let stats = match encode(BufReader::new(infile), BufWriter::new(outfile)) {
    Ok(stats) => stats,
    Err(e) => {
      eprintln!("Encoding failed: {}", e);
      process::exit(1);
    }
  };

  log::info!(
    "Encoded {} symbols ({} distinct)",
    stats.total_symbols,
    stats.distinct_symbols
  );
  log::info!(
    "Header is {} bytes, payload is {} bits in {} bytes",
    stats.header_bytes,
    stats.payload_bits,
    stats.payload_bytes
  );
  println!("File size is {} bytes", stats.encoded_bytes());
}
