// SPDX-License-Identifier: MIT
//
// Command-line configuration.
//
// Flags override built-in defaults; the log path may also come from the
// `VT_DASH_LOG` environment variable. Parsing is a plain walk over the
// argument list, since there are only a handful of flags.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use vt_term::style::{ParseStyleError, Style};

use crate::cells::CELL_COUNT;

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "VT_DASH_LOG";

pub const USAGE: &str = "\
Usage: vt-dash [OPTIONS]

Options:
  --fg <COLOR>       Default text color (default: white)
  --bg <COLOR>       Default background color (default: blue)
  --format <FORMAT>  Default text format (default: bold)
  --cells <N>        Number of cells shown, 1-15 (default: 15)
  --poll-ms <MS>     Input poll timeout in milliseconds (default: 100)
  --seed <N>         Seed for the simulated readings
  --log <PATH>       Write logs to PATH (also: VT_DASH_LOG)
  -h, --help         Print this help

Colors: black red green yellow blue magenta cyan white default
Formats: off bold dim underline blink reverse invisible
Press Ctrl+C to quit.";

/// Why the command line was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown option {0:?}")]
    UnknownFlag(String),

    #[error("option {0} needs a value")]
    MissingValue(&'static str),

    #[error("option {flag} expects a number, got {value:?}")]
    InvalidNumber { flag: &'static str, value: String },

    #[error("--cells must be between 1 and {max}, got {0}", max = CELL_COUNT)]
    CellsOutOfRange(usize),

    #[error(transparent)]
    Style(#[from] ParseStyleError),
}

/// Runtime settings for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Style every primitive returns to.
    pub style: Style,
    /// How many cells the table shows.
    pub cells: usize,
    /// Longest wait for an input byte; also the tick period.
    pub poll: Duration,
    /// Fixed RNG seed, for reproducible readings.
    pub seed: Option<u64>,
    /// Log file. No logging without one.
    pub log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style: Style::dashboard_default(),
            cells: CELL_COUNT,
            poll: Duration::from_millis(100),
            seed: None,
            log: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    Help,
}

impl Config {
    /// Parse the process arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unknown flags or bad values.
    pub fn from_env() -> Result<Command, ConfigError> {
        Self::parse(env::args().skip(1), env::var_os(LOG_ENV).map(PathBuf::from))
    }

    /// Parse `args` (without the program name). `env_log` is the log path
    /// from the environment, which `--log` overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unknown flags or bad values.
    pub fn parse<I>(args: I, env_log: Option<PathBuf>) -> Result<Command, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self {
            log: env_log,
            ..Self::default()
        };
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "--fg" => config.style.fg = Some(value(&mut args, "--fg")?.parse()?),
                "--bg" => config.style.bg = Some(value(&mut args, "--bg")?.parse()?),
                "--format" => config.style.format = Some(value(&mut args, "--format")?.parse()?),
                "--cells" => {
                    let n: usize = number(&mut args, "--cells")?;
                    if !(1..=CELL_COUNT).contains(&n) {
                        return Err(ConfigError::CellsOutOfRange(n));
                    }
                    config.cells = n;
                }
                "--poll-ms" => config.poll = Duration::from_millis(number(&mut args, "--poll-ms")?),
                "--seed" => config.seed = Some(number(&mut args, "--seed")?),
                "--log" => config.log = Some(PathBuf::from(value(&mut args, "--log")?)),
                _ => return Err(ConfigError::UnknownFlag(arg)),
            }
        }

        Ok(Command::Run(config))
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<String, ConfigError> {
    args.next().ok_or(ConfigError::MissingValue(flag))
}

fn number<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<T, ConfigError> {
    let raw = value(args, flag)?;
    raw.parse()
        .map_err(|_| ConfigError::InvalidNumber { flag, value: raw })
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vt_term::style::{Color, Format};

    fn parse(args: &[&str]) -> Result<Command, ConfigError> {
        Config::parse(args.iter().map(|s| (*s).to_owned()), None)
    }

    fn run(args: &[&str]) -> Config {
        match parse(args).unwrap() {
            Command::Run(config) => config,
            Command::Help => panic!("expected a run config"),
        }
    }

    // ── Defaults ────────────────────────────────────────────────────────

    #[test]
    fn no_args_is_default() {
        assert_eq!(run(&[]), Config::default());
    }

    #[test]
    fn default_matches_dashboard_look() {
        let c = Config::default();
        assert_eq!(c.style, Style::dashboard_default());
        assert_eq!(c.cells, 15);
        assert_eq!(c.poll, Duration::from_millis(100));
        assert_eq!(c.seed, None);
        assert_eq!(c.log, None);
    }

    // ── Flags ───────────────────────────────────────────────────────────

    #[test]
    fn help_wins() {
        assert_eq!(parse(&["--cells", "3", "-h"]).unwrap(), Command::Help);
        assert_eq!(parse(&["--help"]).unwrap(), Command::Help);
    }

    #[test]
    fn style_flags_override_one_slot_each() {
        let c = run(&["--fg", "yellow", "--format", "underline"]);
        assert_eq!(c.style.fg, Some(Color::Yellow));
        assert_eq!(c.style.bg, Some(Color::Blue));
        assert_eq!(c.style.format, Some(Format::Underline));
    }

    #[test]
    fn numeric_flags() {
        let c = run(&["--cells", "4", "--poll-ms", "250", "--seed", "42"]);
        assert_eq!(c.cells, 4);
        assert_eq!(c.poll, Duration::from_millis(250));
        assert_eq!(c.seed, Some(42));
    }

    #[test]
    fn log_flag_overrides_env() {
        let cmd = Config::parse(
            ["--log".to_owned(), "flag.log".to_owned()],
            Some(PathBuf::from("env.log")),
        )
        .unwrap();
        let Command::Run(c) = cmd else {
            panic!("expected a run config");
        };
        assert_eq!(c.log, Some(PathBuf::from("flag.log")));
    }

    #[test]
    fn env_log_is_used() {
        let cmd = Config::parse(Vec::new(), Some(PathBuf::from("env.log"))).unwrap();
        let Command::Run(c) = cmd else {
            panic!("expected a run config");
        };
        assert_eq!(c.log, Some(PathBuf::from("env.log")));
    }

    // ── Errors ──────────────────────────────────────────────────────────

    #[test]
    fn unknown_flag() {
        assert_eq!(
            parse(&["--colour"]).unwrap_err(),
            ConfigError::UnknownFlag("--colour".into())
        );
    }

    #[test]
    fn missing_value() {
        assert_eq!(parse(&["--fg"]).unwrap_err(), ConfigError::MissingValue("--fg"));
    }

    #[test]
    fn bad_number() {
        assert_eq!(
            parse(&["--poll-ms", "soon"]).unwrap_err(),
            ConfigError::InvalidNumber {
                flag: "--poll-ms",
                value: "soon".into()
            }
        );
    }

    #[test]
    fn cells_range() {
        assert_eq!(parse(&["--cells", "0"]).unwrap_err(), ConfigError::CellsOutOfRange(0));
        assert_eq!(parse(&["--cells", "16"]).unwrap_err(), ConfigError::CellsOutOfRange(16));
        assert_eq!(run(&["--cells", "1"]).cells, 1);
    }

    #[test]
    fn bad_color_names_the_value() {
        let err = parse(&["--bg", "mauve"]).unwrap_err();
        assert!(matches!(err, ConfigError::Style(ParseStyleError::Color(ref s)) if s == "mauve"));
        assert!(err.to_string().contains("mauve"));
    }
}
