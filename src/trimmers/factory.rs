use super::*;
use crate::error::TrimError;
use anyhow::Result;
use std::path::Path;
use std::str::FromStr;

/// Parse one `NAME:arg:...` trimming step.
pub fn parse_trimmer(spec: &str) -> Result<Box<dyn Trimmer>> {
    let mut parts = spec.split(':');
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let trimmer: Box<dyn Trimmer> = match name {
        "LEADING" => {
            let [quality] = expect_args::<1>(spec, &args)?;
            Box::new(LeadingTrimmer::new(number(spec, quality)?))
        }
        "TRAILING" => {
            let [quality] = expect_args::<1>(spec, &args)?;
            Box::new(TrailingTrimmer::new(number(spec, quality)?))
        }
        "SLIDINGWINDOW" => {
            let [window, quality] = expect_args::<2>(spec, &args)?;
            let window: usize = number(spec, window)?;
            if window == 0 {
                return Err(TrimError::invalid_trimmer(spec, "window size must be positive").into());
            }
            Box::new(SlidingWindowTrimmer::new(window, number(spec, quality)?))
        }
        "CROP" => {
            let [length] = expect_args::<1>(spec, &args)?;
            Box::new(CropTrimmer::new(number(spec, length)?))
        }
        "HEADCROP" => {
            let [length] = expect_args::<1>(spec, &args)?;
            Box::new(HeadCropTrimmer::new(number(spec, length)?))
        }
        "MINLEN" => {
            let [length] = expect_args::<1>(spec, &args)?;
            Box::new(MinLenTrimmer::new(number(spec, length)?))
        }
        "AVGQUAL" => {
            let [quality] = expect_args::<1>(spec, &args)?;
            Box::new(AvgQualTrimmer::new(number(spec, quality)?))
        }
        "ILLUMINACLIP" => {
            let [fasta, seed, palindrome, simple] = expect_args::<4>(spec, &args)?;
            Box::new(IlluminaClipTrimmer::from_fasta(
                Path::new(fasta),
                number(spec, seed)?,
                number(spec, palindrome)?,
                number(spec, simple)?,
            )?)
        }
        _ => return Err(TrimError::UnknownTrimmer(spec.to_string()).into()),
    };

    Ok(trimmer)
}

fn expect_args<'a, const N: usize>(spec: &str, args: &[&'a str]) -> Result<[&'a str; N]> {
    <[&str; N]>::try_from(args).map_err(|_| {
        TrimError::invalid_trimmer(
            spec,
            format!("expected {} argument(s), found {}", N, args.len()),
        )
        .into()
    })
}

fn number<T: FromStr>(spec: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        TrimError::invalid_trimmer(spec, format!("'{}' is not a valid number", value)).into()
    })
}
