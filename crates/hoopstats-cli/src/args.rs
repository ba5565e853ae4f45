//! Command line argument handling.
//!
//! The surface is one positional path and a handful of flags, parsed by
//! hand. Flag defaults mirror the upload defaults in
//! [`hoopstats_client::UploadOptions`].

use std::path::PathBuf;

/// Usage text for `--help` and usage errors.
pub const USAGE: &str = "\
Usage: hoopstats [OPTIONS] <VIDEO>

Analyze a basketball game video and print the detected score report.

Arguments:
  <VIDEO>               Path to the game video file

Options:
      --no-compress     Upload the file as-is, skipping the large-file transcode
      --quality <Q>     Transcode quality, 0.1 to 1.0 [default: 0.7]
      --max-height <H>  Scale transcoded output to at most H lines, 480 to 1920
                        [default: 1280]
      --json <PATH>     Write the game data as JSON to PATH
      --download <PATH> Save the processed video to PATH after analysis
      --api <URL>       Gateway base URL (overrides HOOPSTATS_API_URL)
  -h, --help            Print help";

/// Parsed invocation of the `hoopstats` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub video: PathBuf,
    pub compress: bool,
    pub quality: f64,
    pub max_height: u32,
    pub json: Option<PathBuf>,
    pub download: Option<PathBuf>,
    pub api: Option<String>,
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Run(CliArgs),
}

/// Parse everything after the binary name.
pub fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();

    let mut video: Option<PathBuf> = None;
    let mut compress = true;
    let mut quality = 0.7f64;
    let mut max_height = 1280u32;
    let mut json = None;
    let mut download = None;
    let mut api = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--no-compress" => compress = false,
            "--quality" => {
                let raw = flag_value(&mut args, "--quality")?;
                quality = raw
                    .parse()
                    .map_err(|_| format!("invalid number for --quality: {raw}"))?;
            }
            "--max-height" => {
                let raw = flag_value(&mut args, "--max-height")?;
                max_height = raw
                    .parse()
                    .map_err(|_| format!("invalid number for --max-height: {raw}"))?;
            }
            "--json" => json = Some(PathBuf::from(flag_value(&mut args, "--json")?)),
            "--download" => download = Some(PathBuf::from(flag_value(&mut args, "--download")?)),
            "--api" => api = Some(flag_value(&mut args, "--api")?),
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            _ => {
                if video.is_some() {
                    return Err(format!("unexpected argument: {arg}"));
                }
                video = Some(PathBuf::from(arg));
            }
        }
    }

    let video = video.ok_or_else(|| "missing video path".to_string())?;
    if !(0.1..=1.0).contains(&quality) {
        return Err(format!("--quality must be between 0.1 and 1.0, got {quality}"));
    }
    if !(480..=1920).contains(&max_height) {
        return Err(format!("--max-height must be between 480 and 1920, got {max_height}"));
    }

    Ok(Command::Run(CliArgs {
        video,
        compress,
        quality,
        max_height,
        json,
        download,
        api,
    }))
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} requires a value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    fn run_args(args: &[&str]) -> CliArgs {
        match parse(args).unwrap() {
            Command::Run(args) => args,
            Command::Help => panic!("expected a run command"),
        }
    }

    #[test]
    fn test_video_path_with_defaults() {
        let args = run_args(&["game.mp4"]);
        assert_eq!(args.video, PathBuf::from("game.mp4"));
        assert!(args.compress);
        assert_eq!(args.quality, 0.7);
        assert_eq!(args.max_height, 1280);
        assert_eq!(args.json, None);
        assert_eq!(args.download, None);
        assert_eq!(args.api, None);
    }

    #[test]
    fn test_all_flags() {
        let args = run_args(&[
            "--no-compress",
            "--quality",
            "0.5",
            "--max-height",
            "720",
            "--json",
            "out.json",
            "--download",
            "out.mp4",
            "--api",
            "http://localhost:9000",
            "game.mp4",
        ]);
        assert!(!args.compress);
        assert_eq!(args.quality, 0.5);
        assert_eq!(args.max_height, 720);
        assert_eq!(args.json, Some(PathBuf::from("out.json")));
        assert_eq!(args.download, Some(PathBuf::from("out.mp4")));
        assert_eq!(args.api.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn test_help_flags() {
        assert_eq!(parse(&["--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-h", "game.mp4"]).unwrap(), Command::Help);
    }

    #[test]
    fn test_missing_video_path() {
        let err = parse(&["--no-compress"]).unwrap_err();
        assert!(err.contains("missing video path"));
    }

    #[test]
    fn test_quality_out_of_range() {
        let err = parse(&["--quality", "1.5", "game.mp4"]).unwrap_err();
        assert!(err.contains("between 0.1 and 1.0"));
    }

    #[test]
    fn test_quality_not_a_number() {
        let err = parse(&["--quality", "high", "game.mp4"]).unwrap_err();
        assert!(err.contains("invalid number for --quality"));
    }

    #[test]
    fn test_max_height_out_of_range() {
        let err = parse(&["--max-height", "64", "game.mp4"]).unwrap_err();
        assert!(err.contains("between 480 and 1920"));
    }

    #[test]
    fn test_flag_without_value() {
        let err = parse(&["game.mp4", "--json"]).unwrap_err();
        assert!(err.contains("--json requires a value"));
    }

    #[test]
    fn test_unknown_option() {
        let err = parse(&["--verbose", "game.mp4"]).unwrap_err();
        assert!(err.contains("unknown option: --verbose"));
    }

    #[test]
    fn test_second_positional_rejected() {
        let err = parse(&["a.mp4", "b.mp4"]).unwrap_err();
        assert!(err.contains("unexpected argument: b.mp4"));
    }
}
