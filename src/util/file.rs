use anyhow::{self};

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

///
/// Read every line of the input_file into memory
///
/// Gzip and bgzip files are decompressed on the fly.
///
pub fn read_lines<P: AsRef<Path>>(input_file: P) -> anyhow::Result<Vec<Box<str>>> {
    let input_file = input_file.as_ref();
    let _file = File::open(input_file)?;

    let buf: Box<dyn BufRead> = match input_file.extension().and_then(|x| x.to_str()) {
        Some("gz") | Some("bgz") => Box::new(BufReader::new(MultiGzDecoder::new(_file))),
        _ => Box::new(BufReader::new(_file)),
    };

    let mut lines = vec![];
    for x in buf.lines() {
        lines.push(x?.into_boxed_str());
    }
    Ok(lines)
}

/// Read a plain list of names, one per line, skipping blank lines
pub fn read_name_list<P: AsRef<Path>>(input_file: P) -> anyhow::Result<Vec<Box<str>>> {
    Ok(read_lines(input_file)?
        .iter()
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .map(Box::from)
        .collect())
}
