mod app;
mod calendar;
mod form;
mod help;
mod journal;
mod logging;
mod session;
mod theme;
use crate::app::App;
use crate::calendar::YMD_FMT;
use crate::journal::{EntryStore, FileStorage};
use crate::session::Session;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use log::LevelFilter;
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{Date, Month, OffsetDateTime};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct RunOptions {
    month: Option<(i32, Month)>,
    data_dir: Option<PathBuf>,
    log_level: LevelFilter,
}

impl Default for RunOptions {
    fn default() -> RunOptions {
        RunOptions {
            month: None,
            data_dir: None,
            log_level: logging::default_level(),
        }
    }
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('d') | Arg::Long("data-dir") => {
                    opts.data_dir = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('l') | Arg::Long("log-level") => {
                    opts.log_level = parser.value()?.parse_with(logging::parse_level)?;
                }
                Arg::Value(value) if opts.month.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&format!("{value}-01"), &YMD_FMT) {
                        Ok(d) => opts.month = Some((d.year(), d.month())),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                // Must happen before the logger starts its threads, as the
                // local offset cannot be determined once the process is
                // multithreaded.
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let data_dir = match opts.data_dir {
                    Some(dir) => dir,
                    None => dirs::data_dir()
                        .context("could not determine data directory; use --data-dir")?
                        .join(env!("CARGO_PKG_NAME")),
                };
                let _logger = logging::init_logging(opts.log_level, &data_dir.join("logs"))
                    .context("failed to set up logging")?;
                let store = EntryStore::load(FileStorage::new(&data_dir));
                let session = match opts.month {
                    Some((year, month)) => Session::new(store, year, month),
                    None => Session::open_at(store, today),
                }
                .context("cannot display month")?;
                with_terminal(|terminal| {
                    App::new(session, today)
                        .run(terminal)
                        .context("terminal I/O failed")
                })
            }
            Command::Help => {
                println!("Usage: daynote [<options>] [YYYY-MM]");
                println!();
                println!("Terminal calendar for keeping daily notes & screen-time numbers");
                println!();
                println!("Options:");
                println!("  -d, --data-dir <DIR>     Store entries & logs in the given directory");
                println!("  -l, --log-level <LEVEL>  Log at the given level [default: info]");
                println!("  -h, --help               Display this help message and exit");
                println!("  -V, --version            Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_args(args))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(RunOptions::default()));
    }

    #[test]
    fn test_month_and_options() {
        assert_eq!(
            parse(&["-d", "/tmp/notes", "--log-level", "warning", "2024-02"]).unwrap(),
            Command::Run(RunOptions {
                month: Some((2024, Month::February)),
                data_dir: Some(PathBuf::from("/tmp/notes")),
                log_level: LevelFilter::Warn,
            })
        );
    }

    #[test]
    fn test_bad_month() {
        assert!(matches!(
            parse(&["2024-13"]),
            Err(lexopt::Error::ParsingFailed { .. })
        ));
        assert!(parse(&["2024-02-10"]).is_err());
        assert!(parse(&["2024-02", "2024-03"]).is_err());
    }

    #[test]
    fn test_bad_level() {
        assert!(matches!(
            parse(&["-l", "loud"]),
            Err(lexopt::Error::ParsingFailed { .. })
        ));
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse(&["-h", "2024-02"]).unwrap(), Command::Help);
        assert_eq!(parse(&["--version"]).unwrap(), Command::Version);
    }
}
