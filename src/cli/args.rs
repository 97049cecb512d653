//! Command-line argument parsing.
//!
//! `minicon <program.dl> [count] [--prefs FILE] [--config FILE] [--flame FILE]
//! [--dedup] [--quiet] [--stats]`

use std::path::PathBuf;

use super::CliError;

pub const USAGE: &str = "\
Usage: minicon <program.dl> [count] [options]

Arguments:
  <program.dl>     Datalog file with one `?-` query and its views
  [count]          Number of rewritings to produce (default: all)

Options:
  --prefs FILE     JSON view ranks, overriding inline `@` ranks
  --config FILE    JSON engine configuration
  --flame FILE     Write folded span stacks for flamegraphs
  --dedup          Drop repeated rewritings
  --quiet          Print only the rewritings
  --stats          Print search metrics
  --help           Show this message";

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub program: PathBuf,
    pub count: Option<usize>,
    pub prefs: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub flame: Option<PathBuf>,
    pub dedup: bool,
    pub quiet: bool,
    pub stats: bool,
    pub help: bool,
}

/// Parse arguments, not including the program name.
pub fn parse_args<I, S>(args: I) -> Result<Args, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = Args::default();
    let mut program: Option<PathBuf> = None;
    let mut args = args.into_iter().map(Into::into);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--prefs" => parsed.prefs = Some(value_for(&arg, args.next())?),
            "--config" => parsed.config = Some(value_for(&arg, args.next())?),
            "--flame" => parsed.flame = Some(value_for(&arg, args.next())?),
            "--dedup" => parsed.dedup = true,
            "--quiet" | "-q" => parsed.quiet = true,
            "--stats" => parsed.stats = true,
            "--help" | "-h" => {
                parsed.help = true;
                return Ok(parsed);
            }
            flag if flag.starts_with('-') => {
                return Err(CliError::Usage(format!("Unknown option '{}'", flag)));
            }
            positional => {
                if program.is_none() {
                    program = Some(PathBuf::from(positional));
                } else if parsed.count.is_none() {
                    let count = positional.parse::<usize>().map_err(|_| {
                        CliError::Usage(format!("Count must be a non-negative integer, got '{}'", positional))
                    })?;
                    parsed.count = Some(count);
                } else {
                    return Err(CliError::Usage(format!("Unexpected argument '{}'", positional)));
                }
            }
        }
    }

    parsed.program = program.ok_or_else(|| CliError::Usage("Missing program file".to_string()))?;
    Ok(parsed)
}

fn value_for(flag: &str, value: Option<String>) -> Result<PathBuf, CliError> {
    match value {
        Some(v) if !v.starts_with("--") => Ok(PathBuf::from(v)),
        _ => Err(CliError::Usage(format!("Option '{}' needs a file argument", flag))),
    }
}
