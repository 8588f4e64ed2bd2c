use std::fs;
use std::io;
use std::path::Path;

use super::cli::{Output, RlhOpts, Verbosity};

/// Size of a file on disk, in bytes.
pub fn file_size<P: AsRef<Path>>(path: P) -> io::Result<u64> {
    Ok(fs::metadata(path)?.len())
}

/// Size of what was just written: the file on disk, or the buffer when it went to stdout.
pub fn output_size(opts: &RlhOpts, out_name: &str, written: usize) -> io::Result<u64> {
    match opts.output {
        Output::File => file_size(out_name),
        Output::Stdout => Ok(written as u64),
    }
}

/// Output size as a percentage of input size. An empty input reports 0.
pub fn ratio(in_size: u64, out_size: u64) -> f64 {
    if in_size == 0 {
        return 0.0;
    }
    out_size as f64 * 100.0 / in_size as f64
}

/// One line telling how much a file grew or shrank.
pub fn size_line(file: &str, in_size: u64, out_size: u64) -> String {
    format!(
        "{}: {} bytes in, {} bytes out ({:.1}%)",
        file,
        in_size,
        out_size,
        ratio(in_size, out_size)
    )
}

/// Reports sizes when the user asked for Info or more.
/// Goes to stderr when stdout carries the data.
pub fn report_sizes(opts: &RlhOpts, file: &str, in_size: u64, out_size: u64) {
    if opts.verbose >= Verbosity::Info {
        let msg = size_line(file, in_size, out_size);
        match opts.output {
            Output::File => println!("{}", msg),
            Output::Stdout => eprintln!("{}", msg),
        }
    }
}
