pub mod bundle;
pub mod classnames;
pub mod components;
pub mod config;
pub mod generator;
pub mod stylesheet;

pub use classnames::{compose, ClassInput};

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

/// Outputs of `generate` and `build`; changes to them never trigger a rebuild.
const GENERATED_OUTPUTS: &[&str] = &[
    "**/core.css",
    "**/core.min.css",
    "**/variables.css",
    "**/utilities/*.css",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommonOptions {
    pub assets: Option<String>,
    pub config: Option<String>,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate(CommonOptions),
    Build(CommonOptions),
    Watch {
        options: CommonOptions,
        ignore: Vec<String>,
        poll: bool,
        poll_interval_ms: u64,
    },
    Help,
}

impl Command {
    fn verbose(&self) -> bool {
        match self {
            Command::Generate(options) | Command::Build(options) => options.verbose,
            Command::Watch { options, .. } => options.verbose,
            Command::Help => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    pub message: String,
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl From<generator::GenerateError> for CliError {
    fn from(err: generator::GenerateError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl From<bundle::BundleError> for CliError {
    fn from(err: bundle::BundleError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

pub fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Generate(options) => run_generate(&options),
        Command::Build(options) => run_build(&options),
        Command::Watch {
            options,
            ignore,
            poll,
            poll_interval_ms,
        } => run_watch(&options, &ignore, poll, poll_interval_ms),
        Command::Help => {
            print_help();
            Ok(())
        }
    }
}

pub fn run_from_env() -> Result<(), CliError> {
    let command = parse_args(env::args().skip(1))?;
    init_logging(command.verbose());
    run(command)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let _ = simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
}

pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut iter = args.into_iter();
    let Some(cmd) = iter.next() else {
        return Ok(Command::Help);
    };

    match cmd.as_str() {
        "generate" => parse_common_args("generate", iter.collect()).map(Command::Generate),
        "build" => parse_common_args("build", iter.collect()).map(Command::Build),
        "watch" => parse_watch_args(iter.collect()),
        "-h" | "--help" | "help" => Ok(Command::Help),
        _ => Err(CliError {
            message: format!("unknown command: {}", cmd),
        }),
    }
}

fn parse_common_args(command: &str, args: Vec<String>) -> Result<CommonOptions, CliError> {
    let mut options = CommonOptions::default();
    let mut idx = 0;

    while idx < args.len() {
        if !parse_common_flag(command, &args, &mut idx, &mut options)? {
            return Err(CliError {
                message: format!("{} does not accept '{}'", command, args[idx]),
            });
        }
        idx += 1;
    }

    Ok(options)
}

/// Consumes one shared flag at `args[*idx]`; returns `false` if it is not one.
fn parse_common_flag(
    command: &str,
    args: &[String],
    idx: &mut usize,
    options: &mut CommonOptions,
) -> Result<bool, CliError> {
    match args[*idx].as_str() {
        "--assets" | "-a" => {
            options.assets = Some(flag_value(command, "--assets", args, idx)?);
        }
        "--config" | "-c" => {
            options.config = Some(flag_value(command, "--config", args, idx)?);
        }
        "--verbose" | "-v" => {
            options.verbose = true;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn flag_value(
    command: &str,
    flag: &str,
    args: &[String],
    idx: &mut usize,
) -> Result<String, CliError> {
    *idx += 1;
    args.get(*idx).cloned().ok_or_else(|| CliError {
        message: format!("{} requires a value for {}", command, flag),
    })
}

fn parse_watch_args(args: Vec<String>) -> Result<Command, CliError> {
    let mut options = CommonOptions::default();
    let mut ignore = Vec::new();
    let mut poll = false;
    let mut poll_interval_ms = 500;
    let mut idx = 0;

    while idx < args.len() {
        if parse_common_flag("watch", &args, &mut idx, &mut options)? {
            idx += 1;
            continue;
        }
        match args[idx].as_str() {
            "--ignore" | "-I" => {
                ignore.push(flag_value("watch", "--ignore", &args, &mut idx)?);
            }
            "--poll" => {
                poll = true;
            }
            "--poll-interval" => {
                let value = flag_value("watch", "--poll-interval", &args, &mut idx)?;
                poll = true;
                poll_interval_ms = parse_u64_arg(&value, "--poll-interval")?;
            }
            value => {
                return Err(CliError {
                    message: format!("watch does not accept '{}'", value),
                });
            }
        }
        idx += 1;
    }

    Ok(Command::Watch {
        options,
        ignore,
        poll,
        poll_interval_ms,
    })
}

fn parse_u64_arg(value: &str, flag: &str) -> Result<u64, CliError> {
    value.parse::<u64>().map_err(|_| CliError {
        message: format!("{} requires a positive integer, got '{}'", flag, value),
    })
}

fn load_config(options: &CommonOptions) -> Result<config::Config, CliError> {
    match options.config.as_deref() {
        Some(path) => Ok(config::load(Path::new(path))?),
        None => Ok(config::Config::default()),
    }
}

fn resolve_assets_root(options: &CommonOptions, config: &config::Config) -> PathBuf {
    match options.assets.as_deref() {
        Some(path) => PathBuf::from(path),
        None => config.assets.root.clone(),
    }
}

fn run_generate(options: &CommonOptions) -> Result<(), CliError> {
    let config = load_config(options)?;
    let root = resolve_assets_root(options, &config);

    let utilities = generator::write_utilities(&root)?;
    for file in &utilities {
        println!("✅ Generated {} ({} bytes)", display_name(&file.path), file.bytes);
    }
    let variables = generator::write_variables(&root, &config.theme)?;
    println!(
        "✅ Generated {} ({} bytes, theme {})",
        display_name(&variables.path),
        variables.bytes,
        config.theme.name
    );

    let rules: usize = utilities.iter().map(|file| file.rules).sum();
    println!(
        "\n✨ Successfully generated {} utility files ({} rules)!",
        utilities.len(),
        rules
    );
    Ok(())
}

fn run_build(options: &CommonOptions) -> Result<(), CliError> {
    let config = load_config(options)?;
    let root = resolve_assets_root(options, &config);

    let report = bundle::build(&root, &config.bundle)?;
    for file in &report.included {
        println!("✅ Included {} ({})", file.name, bundle::format_size(file.bytes));
    }
    for name in &report.skipped {
        println!("⚠️  Skipping {} (not found)", name);
    }
    println!(
        "\n📦 Bundled {} files ({})",
        report.included.len(),
        bundle::format_size(report.total_input_bytes)
    );

    println!(
        "\n✨ Built {} ({})",
        display_name(&report.core_path),
        bundle::format_size(report.core_bytes)
    );
    println!(
        "✨ Built {} ({})",
        display_name(&report.minified_path),
        bundle::format_size(report.minified_bytes)
    );
    println!(
        "\n📊 Minification reduced size by {:.1}%",
        report.reduction_percent()
    );

    let budget = bundle::format_size(report.size_budget_bytes as usize);
    if report.within_budget() {
        println!("✅ SUCCESS: Bundle is under {} target!", budget);
    } else {
        println!("⚠️  WARNING: Bundle exceeds {} target", budget);
    }
    Ok(())
}

fn run_watch(
    options: &CommonOptions,
    ignore: &[String],
    poll: bool,
    poll_interval_ms: u64,
) -> Result<(), CliError> {
    run_generate(options)?;
    run_build(options)?;

    let mut ignore_patterns: Vec<String> =
        GENERATED_OUTPUTS.iter().map(|pattern| pattern.to_string()).collect();
    ignore_patterns.extend(ignore.iter().cloned());
    let ignore_set = build_globset(&ignore_patterns)?;

    let (tx, rx) = channel();
    let mut watcher: Box<dyn notify::Watcher> = if poll {
        Box::new(
            notify::PollWatcher::new(
                tx,
                notify::Config::default()
                    .with_poll_interval(Duration::from_millis(poll_interval_ms)),
            )
            .map_err(|err| CliError {
                message: format!("failed to start poll watcher: {}", err),
            })?,
        )
    } else {
        Box::new(notify::recommended_watcher(tx).map_err(|err| CliError {
            message: format!("failed to start watcher: {}", err),
        })?)
    };

    let config = load_config(options)?;
    let root = resolve_assets_root(options, &config);
    watcher
        .watch(&root, notify::RecursiveMode::Recursive)
        .map_err(|err| CliError {
            message: format!("failed to watch {}: {}", root.display(), err),
        })?;
    let config_path = options.config.as_deref().map(PathBuf::from);
    if let Some(path) = config_path.as_deref() {
        watcher
            .watch(path, notify::RecursiveMode::NonRecursive)
            .map_err(|err| CliError {
                message: format!("failed to watch {}: {}", path.display(), err),
            })?;
    }

    if poll {
        eprintln!("watching {} for changes (polling, press Ctrl+C to stop)...", root.display());
    } else {
        eprintln!("watching {} for changes (press Ctrl+C to stop)...", root.display());
    }

    let mut pending = PendingRebuild::default();
    loop {
        match rx.recv_timeout(WATCH_DEBOUNCE) {
            Ok(Ok(event)) if !should_ignore_event(&event, &ignore_set) => {
                let config_changed = config_path
                    .as_deref()
                    .is_some_and(|path| touches(&event, path));
                let kind = if config_changed {
                    Rebuild::Regenerate
                } else {
                    Rebuild::Build
                };
                pending.record(kind, Instant::now());
            }
            Ok(Ok(_)) => {}
            Ok(Err(err)) => log::warn!("watch error: {}", err),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }

        let Some(kind) = pending.take_due(Instant::now()) else {
            continue;
        };
        let result = match kind {
            Rebuild::Regenerate => {
                eprintln!("config changed, regenerating...");
                run_generate(options).and_then(|_| run_build(options))
            }
            Rebuild::Build => {
                eprintln!("change detected, rebuilding...");
                run_build(options)
            }
        };
        if let Err(err) = result {
            eprintln!("build failed: {}", err.message);
        }
    }

    Ok(())
}

const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rebuild {
    Build,
    Regenerate,
}

/// Changes seen since the last rebuild. A burst of events collapses into one
/// rebuild once the tree has been quiet for `WATCH_DEBOUNCE`.
#[derive(Debug, Default)]
struct PendingRebuild {
    kind: Option<Rebuild>,
    last_change: Option<Instant>,
}

impl PendingRebuild {
    fn record(&mut self, kind: Rebuild, now: Instant) {
        self.kind = self.kind.max(Some(kind));
        self.last_change = Some(now);
    }

    fn take_due(&mut self, now: Instant) -> Option<Rebuild> {
        let last_change = self.last_change?;
        if now.saturating_duration_since(last_change) < WATCH_DEBOUNCE {
            return None;
        }
        self.last_change = None;
        self.kind.take()
    }
}

fn touches(event: &notify::Event, path: &Path) -> bool {
    event
        .paths
        .iter()
        .any(|changed| changed == path || changed.file_name() == path.file_name())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_help() {
    println!("duk");
    println!();
    println!("USAGE:");
    println!("  duk generate [--assets <dir>] [--config <path>] [--verbose]");
    println!("  duk build [--assets <dir>] [--config <path>] [--verbose]");
    println!(
        "  duk watch [--assets <dir>] [--config <path>] [--ignore <glob>] [--poll] [--poll-interval <ms>]"
    );
    println!();
    println!("EXAMPLES:");
    println!("  duk generate");
    println!("  duk build --assets dash_ui_kit/assets");
    println!("  duk build -c duk.toml");
    println!("  duk watch -I \"**/*.bak\" --poll --poll-interval 250");
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, CliError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|err| CliError {
            message: format!("invalid glob pattern '{}': {}", pattern, err),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|err| CliError {
        message: format!("failed to build ignore glob set: {}", err),
    })
}

fn should_ignore_event(event: &notify::Event, ignore_set: &GlobSet) -> bool {
    if event.paths.is_empty() {
        return false;
    }
    event.paths.iter().all(|path| ignore_set.is_match(path))
}

#[cfg(test)]
mod tests {
    use super::{
        build_globset, parse_args, run, should_ignore_event, Command, CommonOptions,
        PendingRebuild, Rebuild, GENERATED_OUTPUTS, WATCH_DEBOUNCE,
    };
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn no_arguments_prints_help() {
        assert_eq!(parse_args(Vec::new()).expect("should parse"), Command::Help);
        assert_eq!(parse_args(args(&["--help"])).expect("should parse"), Command::Help);
    }

    #[test]
    fn generate_and_build_need_no_flags() {
        assert_eq!(
            parse_args(args(&["generate"])).expect("generate should parse"),
            Command::Generate(CommonOptions::default())
        );
        assert_eq!(
            parse_args(args(&["build"])).expect("build should parse"),
            Command::Build(CommonOptions::default())
        );
    }

    #[test]
    fn parse_build_supports_assets_and_config() {
        let command = parse_args(args(&[
            "build",
            "--assets",
            "pkg/assets",
            "-c",
            "duk.toml",
            "--verbose",
        ]))
        .expect("build args should parse");

        assert_eq!(
            command,
            Command::Build(CommonOptions {
                assets: Some("pkg/assets".to_string()),
                config: Some("duk.toml".to_string()),
                verbose: true,
            })
        );
    }

    #[test]
    fn parse_watch_supports_poll_and_ignore() {
        let command = parse_args(args(&[
            "watch",
            "-I",
            "**/*.bak",
            "--poll-interval",
            "250",
            "-a",
            "assets",
        ]))
        .expect("watch args should parse");

        assert_eq!(
            command,
            Command::Watch {
                options: CommonOptions {
                    assets: Some("assets".to_string()),
                    ..CommonOptions::default()
                },
                ignore: vec!["**/*.bak".to_string()],
                poll: true,
                poll_interval_ms: 250,
            }
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        let err = parse_args(args(&["build", "--config"])).expect_err("missing value");
        assert_eq!(err.message, "build requires a value for --config");

        let err = parse_args(args(&["generate", "--minify"])).expect_err("unknown flag");
        assert_eq!(err.message, "generate does not accept '--minify'");

        let err = parse_args(args(&["watch", "--poll-interval", "soon"])).expect_err("bad int");
        assert_eq!(
            err.message,
            "--poll-interval requires a positive integer, got 'soon'"
        );

        let err = parse_args(args(&["serve"])).expect_err("unknown command");
        assert_eq!(err.message, "unknown command: serve");
    }

    #[test]
    fn change_inside_debounce_window_is_kept_for_later() {
        let start = Instant::now();
        let mut pending = PendingRebuild::default();
        pending.record(Rebuild::Build, start);
        assert_eq!(pending.take_due(start), None);

        let second = start + Duration::from_millis(50);
        pending.record(Rebuild::Build, second);
        assert_eq!(pending.take_due(start + WATCH_DEBOUNCE), None);
        assert_eq!(
            pending.take_due(second + WATCH_DEBOUNCE),
            Some(Rebuild::Build)
        );
        assert_eq!(pending.take_due(second + WATCH_DEBOUNCE * 2), None);
    }

    #[test]
    fn config_change_wins_over_plain_rebuild() {
        let start = Instant::now();
        let mut pending = PendingRebuild::default();
        pending.record(Rebuild::Regenerate, start);
        pending.record(Rebuild::Build, start + Duration::from_millis(10));
        assert_eq!(
            pending.take_due(start + Duration::from_millis(10) + WATCH_DEBOUNCE),
            Some(Rebuild::Regenerate)
        );
    }

    #[test]
    fn ignores_events_for_generated_outputs() {
        let patterns: Vec<String> = GENERATED_OUTPUTS.iter().map(|p| p.to_string()).collect();
        let ignore_set = build_globset(&patterns).expect("globs should compile");

        let generated = notify::Event::new(notify::EventKind::Any)
            .add_path(PathBuf::from("/srv/app/assets/core.min.css"))
            .add_path(PathBuf::from("/srv/app/assets/utilities/spacing.css"));
        assert!(should_ignore_event(&generated, &ignore_set));

        let edited = notify::Event::new(notify::EventKind::Any)
            .add_path(PathBuf::from("/srv/app/assets/components.css"));
        assert!(!should_ignore_event(&edited, &ignore_set));

        let empty = notify::Event::new(notify::EventKind::Any);
        assert!(!should_ignore_event(&empty, &ignore_set));
    }

    #[test]
    fn generate_then_build_produces_bundle() {
        let root = temp_dir("duk_cli");
        let options = CommonOptions {
            assets: Some(root.display().to_string()),
            ..CommonOptions::default()
        };

        run(Command::Generate(options.clone())).expect("generate should succeed");
        run(Command::Build(options)).expect("build should succeed");

        let core = fs::read_to_string(root.join("core.css")).expect("core.css");
        let minified = fs::read_to_string(root.join("core.min.css")).expect("core.min.css");
        assert!(core.contains("/* spacing.css */"));
        assert!(core.contains("/* variables.css */"));
        assert!(!core.contains("/* reset.css */"));
        assert!(minified.contains(".p-4{padding:1rem;}"));
        assert!(minified.contains(".hover\\:opacity-80:hover{opacity:0.8;}"));
        assert!(minified.len() < core.len());
    }

    #[test]
    fn build_fails_on_unreadable_config() {
        let root = temp_dir("duk_cli_config");
        let err = run(Command::Build(CommonOptions {
            config: Some(root.join("missing.toml").display().to_string()),
            ..CommonOptions::default()
        }))
        .expect_err("missing config should fail");
        assert!(err.message.starts_with("failed to read config"));
    }

    fn temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{}_{}", prefix, nanos))
    }
}
