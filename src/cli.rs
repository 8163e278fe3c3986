use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

pub const USAGE: &str = "pairtrim [-threads <N>] [-phred33|-phred64] [-trimlog <path>] [-summary <path>] [-quiet] \
<in1> <in2> <out1P> <out1U> <out2P> <out2U> <trimStep>...";

/// Options accepted with a single leading dash.
const LONG_OPTIONS: [&str; 6] = ["threads", "phred33", "phred64", "trimlog", "summary", "quiet"];

#[derive(Parser, Debug)]
#[command(name = "pairtrim", author, version, about = "Trim paired-end FASTQ reads", override_usage = USAGE)]
pub struct Args {
    /// Number of trimming threads; 1 runs everything on the main thread
    #[arg(long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Quality scores use the Phred+33 encoding
    #[arg(long, overrides_with = "phred64")]
    pub phred33: bool,

    /// Quality scores use the Phred+64 encoding (default)
    #[arg(long, overrides_with = "phred33")]
    pub phred64: bool,

    /// Write a per-read trim log to this path
    #[arg(long, value_name = "PATH")]
    pub trimlog: Option<PathBuf>,

    /// Write the final statistics as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Hide the progress spinner
    #[arg(long)]
    pub quiet: bool,

    /// Mate 1 input FASTQ (optionally compressed)
    pub input1: PathBuf,
    /// Mate 2 input FASTQ (optionally compressed)
    pub input2: PathBuf,
    /// Mate 1 output for reads whose mate also survived
    pub output1_paired: PathBuf,
    /// Mate 1 output for reads whose mate was dropped
    pub output1_unpaired: PathBuf,
    /// Mate 2 output for reads whose mate also survived
    pub output2_paired: PathBuf,
    /// Mate 2 output for reads whose mate was dropped
    pub output2_unpaired: PathBuf,

    /// Trimming steps, applied in order (e.g. SLIDINGWINDOW:4:15 MINLEN:36)
    #[arg(required = true, value_name = "STEP")]
    pub trim_steps: Vec<String>,
}

impl Args {
    /// Parse a full command line, accepting `-threads` style options as
    /// well as `--threads`.
    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn phred_offset(&self) -> u8 {
        if self.phred33 {
            33
        } else {
            64
        }
    }
}

/// Rewrite single-dash long options to their double-dash form. Everything
/// else, including unknown single-dash options, is passed through for clap
/// to reject.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.to_str().and_then(|s| s.strip_prefix('-')) {
            Some(name) if LONG_OPTIONS.contains(&name) => OsString::from(format!("--{}", name)),
            _ => arg,
        })
        .collect()
}

/// Report a command-line error and terminate. Help and version requests
/// exit 0, every usage error exits 1.
pub fn exit_with_usage(err: clap::Error) -> ! {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => {
            let _ = err.print();
            std::process::exit(1);
        }
    }
}
