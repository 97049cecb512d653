//! One CLI invocation: load, rank, rewrite, report.

use std::io::Write;
use std::time::Instant;

use crate::api::Engine;
use crate::config::EngineConfig;
use crate::preferences::Preferences;
use crate::record::format_record;
use crate::trace::{self, info};

use super::{Args, CliError};

/// Install the logging `args` asks for, then [`run`] and flush `out`.
///
/// A flamegraph guard lives only for this call, so its file is flushed
/// before the caller sees the result, error or not.
pub fn run_logged(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    run_guarded(args, out, start_logging)
}

fn start_logging(args: &Args) -> Result<Option<impl Drop>, CliError> {
    match &args.flame {
        Some(path) => Ok(Some(trace::init_flamegraph(&path.to_string_lossy())?)),
        None => {
            trace::init_subscriber();
            Ok(None)
        }
    }
}

fn run_guarded<G>(
    args: &Args,
    out: &mut impl Write,
    start: impl FnOnce(&Args) -> Result<G, CliError>,
) -> Result<(), CliError> {
    let _guard = start(args)?;
    run(args, out)?;
    out.flush()?;
    Ok(())
}

/// Run the CLI for `args`, writing the report to `out`.
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    let start = Instant::now();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    if let Some(count) = args.count {
        config.max_rewritings = Some(count);
    }
    config.dedup |= args.dedup;

    let engine = Engine::with_config(config);
    let text = std::fs::read_to_string(&args.program)?;
    let mut program = engine.parse_program(&text)?;
    let query = program.query.take().ok_or(CliError::NoQuery)?;

    if let Some(path) = &args.prefs {
        let prefs = Preferences::from_path(path)?;
        engine.apply_preferences(&mut program.views, &prefs);
    }
    let views = program.views;
    info!(views = views.len(), "program_loaded");

    if !args.quiet {
        writeln!(out, "Query:")?;
        writeln!(out, "  {}", format_record(&query, engine.symbols()).map_err(CliError::Render)?)?;
        writeln!(out, "Views:")?;
        for view in &views {
            let shown = format_record(view, engine.symbols()).map_err(CliError::Render)?;
            writeln!(out, "  {}  @ {}", shown, view.rank().value())?;
        }
        writeln!(out, "Rewritings:")?;
    }

    let run = engine.rewrite(&query, &views);
    if run.rewritings.is_empty() && !args.quiet {
        writeln!(out, "  (none)")?;
    }
    for (i, rewriting) in run.rewritings.iter().enumerate() {
        let shown = engine
            .format_rewriting(rewriting, &views)
            .map_err(CliError::Render)?;
        if args.quiet {
            writeln!(out, "{}", shown)?;
        } else {
            writeln!(out, "  {}. {}", i + 1, shown)?;
        }
    }

    if args.stats {
        write!(out, "{}", run.metrics)?;
    }
    if !args.quiet {
        writeln!(out, "Done in: {} ms", start.elapsed().as_millis())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("minicon-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn run_to_string(args: &Args) -> Result<String, CliError> {
        let mut out = Vec::new();
        run(args, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn args_for(program: &Path) -> Args {
        Args {
            program: program.to_path_buf(),
            ..Default::default()
        }
    }

    const PROGRAM: &str = "\
?- Q(x, y) :- p(x, z), q(z, y).
V1(x) :- p(x, 1).
V2(y) :- q(2, y).
V3(y) :- q(1, y).
";

    #[test]
    fn full_report() {
        let path = write_temp("full.dl", PROGRAM);
        let output = run_to_string(&args_for(&path)).unwrap();
        assert!(output.contains("Query:\n  Q(x, y) :- p(x, z), q(z, y)"));
        assert!(output.contains("V2(y) :- q(2, y)  @ 0"));
        assert!(output.contains("  1. Q(x, y) :- V1(x), V3(y)"));
        assert!(output.contains("Done in:"));
    }

    #[test]
    fn quiet_prints_only_rewritings() {
        let path = write_temp("quiet.dl", PROGRAM);
        let args = Args {
            quiet: true,
            ..args_for(&path)
        };
        assert_eq!(run_to_string(&args).unwrap(), "Q(x, y) :- V1(x), V3(y)\n");
    }

    #[test]
    fn count_and_prefs() {
        let path = write_temp(
            "ranked.dl",
            "?- Q(x) :- p(x).\nA(x) :- p(x) @ 9.\nB(x) :- p(x).\n",
        );
        let prefs = write_temp("ranked.json", r#"{ "ranks": { "B": 2.0 } }"#);
        let args = Args {
            count: Some(1),
            prefs: Some(prefs),
            quiet: true,
            ..args_for(&path)
        };
        assert_eq!(run_to_string(&args).unwrap(), "Q(x) :- B(x)\n");
    }

    #[test]
    fn stats_are_printed() {
        let path = write_temp("stats.dl", PROGRAM);
        let args = Args {
            stats: true,
            quiet: true,
            ..args_for(&path)
        };
        assert!(run_to_string(&args).unwrap().contains("=== Search Metrics ==="));
    }

    #[test]
    fn missing_query_is_an_error() {
        let path = write_temp("noquery.dl", "V(x) :- p(x).\n");
        assert!(matches!(run_to_string(&args_for(&path)), Err(CliError::NoQuery)));
    }

    #[test]
    fn parse_error_is_reported() {
        let path = write_temp("broken.dl", "?- Q(x) :- p(x\n");
        assert!(matches!(run_to_string(&args_for(&path)), Err(CliError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let args = args_for(Path::new("/nonexistent/program.dl"));
        assert!(matches!(run_to_string(&args), Err(CliError::Io(_))));
    }

    #[test]
    fn sample_program() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let args = Args {
            prefs: Some(data.join("sample_prefs.json")),
            quiet: true,
            ..args_for(&data.join("sample.dl"))
        };
        assert_eq!(
            run_to_string(&args).unwrap(),
            "Q(car, loc) :- CarLoc(car, loc)\n\
             Q(car, loc) :- CarMaker(car, maker), MakerLoc(maker, loc)\n"
        );
    }

    struct DropFlag<'a>(&'a std::cell::Cell<bool>);

    impl Drop for DropFlag<'_> {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    #[test]
    fn logging_guard_is_released_when_the_run_fails() {
        let path = write_temp("guarded.dl", "V(x) :- p(x).\n");
        let dropped = std::cell::Cell::new(false);
        let mut out = Vec::new();

        let result = run_guarded(&args_for(&path), &mut out, |_| Ok(DropFlag(&dropped)));

        assert!(matches!(result, Err(CliError::NoQuery)));
        assert!(dropped.get(), "guard must be dropped before the error is returned");
    }

    #[test]
    fn failed_logging_setup_skips_the_run() {
        let path = write_temp("unstarted.dl", PROGRAM);
        let mut out = Vec::new();

        let result = run_guarded(&args_for(&path), &mut out, |_| {
            Err::<(), _>(CliError::Usage("no logging".into()))
        });

        assert!(matches!(result, Err(CliError::Usage(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn config_file_sets_count() {
        let path = write_temp("cfg.dl", "?- Q(x) :- p(x).\nA(x) :- p(x).\nB(x) :- p(x).\n");
        let config = write_temp("cfg.json", r#"{ "max_rewritings": 1 }"#);
        let args = Args {
            config: Some(config),
            quiet: true,
            ..args_for(&path)
        };
        assert_eq!(run_to_string(&args).unwrap().lines().count(), 1);
    }
}
