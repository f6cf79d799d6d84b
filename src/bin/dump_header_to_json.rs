use std::{env, fs, io::BufReader, io::Write, process};

use huffcode::codec::header::read_header;
use huffcode::codec::report::HeaderReport;

fn main() -> Result<(), std::io::Error> {
  let args: Vec<String> = env::args().collect();

  if args.len() != 3 {
    println!("Usage: {} <encoded-in> <json-out>", &args[0]);
    println!("\tDumps the frequency header of an encoded file, and the code derived from it, as JSON");
    process::exit(1);
  }

  pretty_env_logger::init();

  let infile = fs::File::open(&args[1])
    .unwrap_or_else(|_| panic!("Could not open input file {}", args[1]));

  let header = match read_header(BufReader::new(infile)) {
    Ok(h) => h,
    Err(e) => {
      eprintln!("{}", e);
      process::exit(1);
    }
  };
  log::info!(
    "Header has {} entries for {} symbols",
    header.entry_count(),
    header.total_symbols
  );

  let report = match HeaderReport::from_header(&header) {
    Ok(r) => r,
    Err(e) => {
      eprintln!("{}", e);
      process::exit(1);
    }
  };
  let json_string = serde_json::to_string_pretty(&report)?;

  let mut outfile = fs::File::create(&args[2])?;
  outfile.write_all(json_string.as_bytes())?;
  println!("Output written to {}", args[2]);

  Ok(())
}
