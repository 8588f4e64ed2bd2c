//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io;

use log::{error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use rlehuff::compression::compress::compress_file;
use rlehuff::compression::decompress::{decompress_file, test_file};
use rlehuff::tools::cli::{log_opts, rlhopts_init, Mode, Output};

fn main() -> Result<(), std::io::Error> {
    let opts = rlhopts_init();

    // Keep log lines out of the data when the data goes to stdout.
    let mode = match opts.output {
        Output::Stdout => TerminalMode::Stderr,
        Output::File => TerminalMode::Stdout,
    };
    TermLogger::init(
        opts.verbose.level_filter(),
        Config::default(),
        mode,
        ColorChoice::Auto,
    )
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    log_opts(&opts);

    //----- Figure how what we need to do and go do it, one file at a time
    let mut failures = 0;
    for file in &opts.files {
        let result = match opts.op_mode {
            Mode::Zip => compress_file(&opts, file),
            Mode::Unzip => decompress_file(&opts, file),
            Mode::Test => test_file(file),
        };
        if let Err(e) = result {
            error!("{}: {}", file, e);
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{} of {} files failed", failures, opts.files.len()),
        ));
    }
    info!("Done.\n");
    Ok(())
}
