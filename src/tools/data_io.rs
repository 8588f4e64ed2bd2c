use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};

use log::{debug, error, info};

use super::cli::{Output, RlhOpts};

/// Read the whole input file. The codec works on one in-memory buffer.
pub fn read_input(file: &str) -> io::Result<Vec<u8>> {
    let mut f_in = File::open(file).map_err(|e| {
        error!("Cannot read from the file {}", file);
        e
    })?;
    let size = f_in.metadata().map(|m| m.len() as usize).unwrap_or(0);
    let mut buf = Vec::with_capacity(size);
    f_in.read_to_end(&mut buf)?;
    debug!("Read {} bytes from {}", buf.len(), file);
    Ok(buf)
}

/// Write the result to its output file, or to stdout. An existing file is only replaced
/// when the user forces it.
pub fn write_output(opts: &RlhOpts, out_name: &str, data: &[u8]) -> io::Result<()> {
    match opts.output {
        Output::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()
        }
        Output::File => {
            let mut f_out = OpenOptions::new()
                .write(true)
                .create(opts.force_overwrite)
                .create_new(!opts.force_overwrite)
                .truncate(true)
                .open(out_name)
                .map_err(|e| {
                    error!("Cannot write to the file {}: {}", out_name, e);
                    e
                })?;
            f_out.write_all(data)?;
            info!("Wrote {} bytes to {}", data.len(), out_name);
            Ok(())
        }
    }
}

/// Remove the input after a successful run, unless asked to keep it.
pub fn finish_input(opts: &RlhOpts, file: &str) -> io::Result<()> {
    if !opts.keep_input_files {
        fs::remove_file(file)?;
        debug!("Removed {}", file);
    }
    Ok(())
}
