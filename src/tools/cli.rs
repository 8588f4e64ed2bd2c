use clap::Parser;
use log::{info, LevelFilter};
use std::{fmt::Display, fmt::Formatter};

/// Suffix added to compressed files.
pub const SUFFIX: &str = ".rlh";

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}
impl Verbosity {
    /// Map a -v count (0-5) onto a verbosity level.
    pub fn from_count(v: u8) -> Self {
        match v {
            0 => Verbosity::Quiet,
            1 => Verbosity::Errors,
            2 => Verbosity::Warnings,
            3 => Verbosity::Info,
            4 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    /// The log filter matching this verbosity.
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Errors => LevelFilter::Error,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug)]
pub struct RlhOpts {
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl RlhOpts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            force_overwrite: false,
            keep_input_files: false,
            op_mode: Mode::Zip,
            output: Output::File,
            verbose: Verbosity::Info,
        }
    }

    /// Put command line information from CLAP into our internal structure.
    pub fn from_args(args: Args) -> Self {
        let mut opts = RlhOpts::new();
        opts.files = args.files;
        // Later modes win: test beats decompress beats compress.
        if args.compress {
            opts.op_mode = Mode::Zip
        };
        if args.decompress {
            opts.op_mode = Mode::Unzip
        };
        if args.test {
            opts.op_mode = Mode::Test
        };
        if args.stdout {
            opts.output = Output::Stdout;
            // Nothing lands on disk, so never delete the source.
            opts.keep_input_files = true;
        };
        opts.keep_input_files |= args.keep;
        opts.force_overwrite = args.force;
        opts.verbose = Verbosity::from_count(args.v);
        opts
    }
}

impl Default for RlhOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A run-length + Huffman file compressor",
    long_about = "
    Compresses files in two stages. Runs of identical bytes are first collapsed into
    (value, count) pairs, then the pairs are Huffman coded with a code table stored in
    the stream header. Compressed files get the .rlh suffix."
)]
pub struct Args {
    /// Files to process
    #[clap(required = true)]
    files: Vec<String>,

    /// Compress the input files (default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Decompress the input files
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Keep input files
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Force overwriting output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', default_value_t = 3)]
    v: u8,
}

/// Parse the command line into RlhOpts.
pub fn rlhopts_init() -> RlhOpts {
    RlhOpts::from_args(Args::parse())
}

/// Report the settings to the user. Call once the logger is running.
pub fn log_opts(opts: &RlhOpts) {
    info!("---- rlehuff Initialization Start ----",);
    info!("Verbosity set to {}", opts.verbose.level_filter());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Sending output to {}", opts.output);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if opts.keep_input_files {
        info!("Keeping input files")
    };
    info!("---- rlehuff Initialization End ----\n");
}

/// Name of the file that processing `file` in this mode produces.
pub fn output_name(file: &str, mode: &Mode) -> String {
    match mode {
        Mode::Zip => format!("{}{}", file, SUFFIX),
        Mode::Unzip | Mode::Test => match file.strip_suffix(SUFFIX) {
            Some(stem) if !stem.is_empty() => stem.to_string(),
            _ => format!("{}.out", file),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> RlhOpts {
        RlhOpts::from_args(Args::try_parse_from(args).unwrap())
    }

    #[test]
    fn defaults() {
        let opts = parse(&["rlehuff", "a.txt"]);
        assert_eq!(opts.files, vec!["a.txt".to_string()]);
        assert_eq!(opts.op_mode, Mode::Zip);
        assert_eq!(opts.output, Output::File);
        assert_eq!(opts.verbose, Verbosity::Info);
        assert!(!opts.keep_input_files);
        assert!(!opts.force_overwrite);
    }

    #[test]
    fn decompress_flags() {
        let opts = parse(&["rlehuff", "-d", "-k", "-f", "-v", "5", "a.rlh", "b.rlh"]);
        assert_eq!(opts.op_mode, Mode::Unzip);
        assert_eq!(opts.files.len(), 2);
        assert!(opts.keep_input_files);
        assert!(opts.force_overwrite);
        assert_eq!(opts.verbose.level_filter(), LevelFilter::Trace);
    }

    #[test]
    fn stdout_keeps_input() {
        let opts = parse(&["rlehuff", "--stdout", "a.txt"]);
        assert_eq!(opts.output, Output::Stdout);
        assert!(opts.keep_input_files);
    }

    #[test]
    fn test_mode_wins() {
        let opts = parse(&["rlehuff", "-z", "-d", "-t", "a.rlh"]);
        assert_eq!(opts.op_mode, Mode::Test);
    }

    #[test]
    fn needs_a_file() {
        assert!(Args::try_parse_from(["rlehuff", "-d"]).is_err());
    }

    #[test]
    fn output_names() {
        assert_eq!(output_name("pic.png", &Mode::Zip), "pic.png.rlh");
        assert_eq!(output_name("pic.png.rlh", &Mode::Unzip), "pic.png");
        assert_eq!(output_name("pic.png", &Mode::Unzip), "pic.png.out");
        assert_eq!(output_name(".rlh", &Mode::Unzip), ".rlh.out");
    }
}
