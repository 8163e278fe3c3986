use crate::cli::Args;
use crate::config::Config;
use crate::pipeline::{PairedEndTrimmer, PairedOutputs};
use crate::sequence_processor::core::{RecordSink, TrimStats};
use crate::sequence_processor::readers::FastqReader;
use crate::sequence_processor::writers::{FastqWriter, TrimLogWriter};
use crate::trimmers::TrimmerChain;
use crate::utils::ProgressBarBuilder;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

#[derive(Serialize)]
struct SummaryReport<'a> {
    threads: u32,
    phred_offset: u8,
    trim_steps: &'a [String],
    #[serde(flatten)]
    stats: &'a TrimStats,
}

pub fn run(args: Args, command_line: &str) -> Result<()> {
    log::info!("pairtrim: Started with arguments: {}", command_line);

    // malformed steps must fail before any output file is created
    let trimmers = TrimmerChain::parse(&args.trim_steps)?;
    let config = Config::load();
    config.validate()?;
    let settings = config.pipeline_settings(args.threads as usize);
    let phred_offset = args.phred_offset();
    log::info!(
        "Using {} trimming steps, Phred+{} qualities, {} thread(s)",
        trimmers.len(),
        phred_offset,
        settings.threads
    );

    let input1 = FastqReader::new(&args.input1, phred_offset, config.read_buffer_bytes)?;
    let input2 = FastqReader::new(&args.input2, phred_offset, config.read_buffer_bytes)?;

    let outputs = PairedOutputs::new(
        create_sink(&args.output1_paired, config.compression_level)?,
        create_sink(&args.output1_unpaired, config.compression_level)?,
        create_sink(&args.output2_paired, config.compression_level)?,
        create_sink(&args.output2_unpaired, config.compression_level)?,
    );
    let trim_log = match &args.trimlog {
        Some(path) => Some(TrimLogWriter::create(path)?),
        None => None,
    };

    let progress = ProgressBarBuilder::new("Trimming")
        .with_tick(Duration::from_millis(200))
        .hidden(args.quiet)
        .build()?;

    let stats = PairedEndTrimmer::new(trimmers, settings)
        .with_progress(progress)
        .process(Box::new(input1), Box::new(input2), outputs, trim_log)?;

    println!("{}", stats.summary());
    println!("{}", stats.bases_summary());

    if let Some(path) = &args.summary {
        let report = SummaryReport {
            threads: args.threads,
            phred_offset,
            trim_steps: &args.trim_steps,
            stats: &stats,
        };
        write_summary(path, &report)?;
    }

    println!("pairtrim: Completed successfully");
    Ok(())
}

fn create_sink(path: &Path, compression_level: u32) -> Result<Box<dyn RecordSink>> {
    Ok(Box::new(FastqWriter::create(path, compression_level)?))
}

fn write_summary(path: &Path, report: &SummaryReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create summary file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("Failed to write summary to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fastq(path: &Path, lens: &[usize]) {
        let text: String = lens
            .iter()
            .enumerate()
            .map(|(i, &len)| format!("@r{}\n{}\n+\n{}\n", i, "C".repeat(len), "I".repeat(len)))
            .collect();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_run_writes_outputs_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let p = |name: &str| dir.path().join(name);
        write_fastq(&p("in1.fq"), &[40, 10, 40]);
        write_fastq(&p("in2.fq"), &[40, 40, 10]);

        let argv = [
            "pairtrim".to_string(),
            "-phred33".to_string(),
            "-quiet".to_string(),
            "-summary".to_string(),
            p("summary.json").display().to_string(),
            p("in1.fq").display().to_string(),
            p("in2.fq").display().to_string(),
            p("o1p.fq").display().to_string(),
            p("o1u.fq").display().to_string(),
            p("o2p.fq").display().to_string(),
            p("o2u.fq").display().to_string(),
            "MINLEN:20".to_string(),
        ];
        let args = Args::try_parse_normalized(argv.clone()).unwrap();
        run(args, &argv.join(" ")).unwrap();

        assert_eq!(fs::read_to_string(p("o1p.fq")).unwrap().lines().count(), 4);
        assert!(fs::read_to_string(p("o1u.fq")).unwrap().starts_with("@r2\n"));
        assert!(fs::read_to_string(p("o2u.fq")).unwrap().starts_with("@r1\n"));

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(p("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["input_pairs"], 3);
        assert_eq!(summary["both_kept"], 1);
        assert_eq!(summary["phred_offset"], 33);
    }

    #[test]
    fn test_bad_step_creates_no_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let p = |name: &str| dir.path().join(name).display().to_string();
        write_fastq(&dir.path().join("in1.fq"), &[10]);
        write_fastq(&dir.path().join("in2.fq"), &[10]);

        let argv = [
            "pairtrim".to_string(),
            p("in1.fq"),
            p("in2.fq"),
            p("o1p.fq"),
            p("o1u.fq"),
            p("o2p.fq"),
            p("o2u.fq"),
            "NOSUCHSTEP:3".to_string(),
        ];
        let args = Args::try_parse_normalized(argv.clone()).unwrap();
        assert!(run(args, &argv.join(" ")).is_err());
        assert!(!dir.path().join("o1p.fq").exists());
    }
}
