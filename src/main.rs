mod app;
mod calendar;
mod categories;
mod confirm;
mod daypane;
mod forms;
mod help;
mod model;
mod query;
mod store;
mod theme;

use crate::app::App;
use crate::query::DEFAULT_NEARBY_WINDOW;
use crate::store::Store;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{
    format_description::FormatItem, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run { start: Option<Date> },
    Agenda { date: Option<Date> },
    Upcoming { window: i64 },
    Now,
    Todos { pattern: String, date: Option<Date> },
    Help,
    Version,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Cli {
    data: Option<PathBuf>,
    command: Command,
}

impl Cli {
    fn from_parser(mut parser: Parser) -> Result<Cli, lexopt::Error> {
        let mut data = None;
        let mut window = None;
        let mut words = Vec::new();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => {
                    return Ok(Cli {
                        data: None,
                        command: Command::Help,
                    })
                }
                Arg::Short('V') | Arg::Long("version") => {
                    return Ok(Cli {
                        data: None,
                        command: Command::Version,
                    })
                }
                Arg::Short('d') | Arg::Long("data") => {
                    data = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('w') | Arg::Long("window") => {
                    window = Some(parser.value()?.parse::<i64>()?);
                }
                Arg::Value(value) => words.push(value.string()?),
                _ => return Err(arg.unexpected()),
            }
        }
        let command = Command::from_words(words, window)?;
        Ok(Cli { data, command })
    }

    fn run(self) -> anyhow::Result<()> {
        let path = store::data_path(self.data);
        match self.command {
            Command::Run { start } => {
                let store = Store::open(path)?;
                let today = local_now()?.date();
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(store, today, start).run(terminal)?;
                    Ok(())
                })
            }
            Command::Agenda { date } => {
                let store = Store::open(path)?;
                let date = match date {
                    Some(date) => date,
                    None => local_now()?.date(),
                };
                print!(
                    "{}",
                    query::format_schedule(&query::day_schedule(&store, date), date)
                );
                Ok(())
            }
            Command::Upcoming { window } => {
                let store = Store::open(path)?;
                let now = local_now()?;
                let now = PrimitiveDateTime::new(now.date(), now.time());
                let schedule = query::nearby_items(&store, now, window);
                if schedule.events.is_empty() && schedule.todos.is_empty() {
                    println!("Nothing within {window} minutes.");
                    return Ok(());
                }
                for event in &schedule.events {
                    println!("{}", query::format_event(event));
                }
                for todo in &schedule.todos {
                    println!("[ ] {}", todo.content);
                }
                Ok(())
            }
            Command::Now => {
                let store = Store::open(path)?;
                let now = local_now()?;
                let now = PrimitiveDateTime::new(now.date(), now.time());
                let ongoing = query::ongoing_events(&store, now);
                if ongoing.is_empty() {
                    println!("No ongoing events.");
                }
                for event in ongoing {
                    println!("{}", query::format_event(event));
                }
                Ok(())
            }
            Command::Todos { pattern, date } => {
                let store = Store::open(path)?;
                let today = local_now()?.date();
                let todos = query::find_todos(&store, &pattern, date, today);
                if todos.is_empty() {
                    println!("No matching todos.");
                }
                for todo in todos {
                    let mark = if todo.completed { "[x]" } else { "[ ]" };
                    println!("{}  {} {}", model::ymd(todo.date), mark, todo.content);
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: dayplan [-d FILE] [YYYY-MM-DD]");
                println!("       dayplan [-d FILE] agenda [YYYY-MM-DD]");
                println!("       dayplan [-d FILE] upcoming [-w MINUTES]");
                println!("       dayplan [-d FILE] now");
                println!("       dayplan [-d FILE] todos PATTERN [YYYY-MM-DD]");
                println!();
                println!("Terminal month-grid planner for events, todos, and categories");
                println!();
                println!("Commands:");
                println!("  (none)       Open the planner, optionally starting on a date");
                println!("  agenda       Print a day's events and todos (default: today)");
                println!("  upcoming     Print events starting near now, plus open todos");
                println!("  now          Print events in progress at this moment");
                println!("  todos        Search todo contents over the last thirty days");
                println!();
                println!("Options:");
                println!("  -d, --data FILE       Planner file (or ${})", store::DATA_ENV_VAR);
                println!(
                    "  -w, --window MINUTES  Match window for 'upcoming' [default: {}]",
                    DEFAULT_NEARBY_WINDOW
                );
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl Command {
    fn from_words(words: Vec<String>, window: Option<i64>) -> Result<Command, lexopt::Error> {
        let mut words = words.into_iter();
        let command = match words.next() {
            None => Command::Run { start: None },
            Some(word) => match word.as_str() {
                "agenda" => Command::Agenda {
                    date: words.next().map(parse_date).transpose()?,
                },
                "upcoming" => Command::Upcoming {
                    window: window.unwrap_or(DEFAULT_NEARBY_WINDOW),
                },
                "now" => Command::Now,
                "todos" => Command::Todos {
                    pattern: words
                        .next()
                        .ok_or_else(|| custom_error("'todos' requires a PATTERN argument"))?,
                    date: words.next().map(parse_date).transpose()?,
                },
                _ => Command::Run {
                    start: Some(parse_date(word)?),
                },
            },
        };
        if window.is_some() && !matches!(command, Command::Upcoming { .. }) {
            return Err(custom_error("--window only applies to 'upcoming'"));
        }
        if let Some(extra) = words.next() {
            return Err(custom_error(format!("unexpected argument: {extra}")));
        }
        Ok(command)
    }
}

fn parse_date(value: String) -> Result<Date, lexopt::Error> {
    match Date::parse(&value, &YMD_FMT) {
        Ok(date) => Ok(date),
        Err(e) => Err(lexopt::Error::ParsingFailed {
            value,
            error: Box::new(e),
        }),
    }
}

fn custom_error<M: Into<String>>(message: M) -> lexopt::Error {
    lexopt::Error::Custom(message.into().into())
}

fn local_now() -> anyhow::Result<OffsetDateTime> {
    OffsetDateTime::now_local().context("failed to determine local time")
}

fn main() -> anyhow::Result<()> {
    Cli::from_parser(Parser::from_env())?.run()
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
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Cli, lexopt::Error> {
        let argv = std::iter::once("dayplan").chain(args.iter().copied());
        Cli::from_parser(Parser::from_iter(argv))
    }

    #[test]
    fn test_bare_invocation_runs_tui() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.command, Command::Run { start: None });
        assert_eq!(cli.data, None);
    }

    #[test]
    fn test_start_date_argument() {
        let cli = parse(&["2026-08-06"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Run {
                start: Some(date!(2026 - 08 - 06))
            }
        );
    }

    #[test]
    fn test_bad_date_argument() {
        assert!(parse(&["2026-13-06"]).is_err());
        assert!(parse(&["tuesday"]).is_err());
    }

    #[test]
    fn test_agenda_with_and_without_date() {
        assert_eq!(
            parse(&["agenda"]).unwrap().command,
            Command::Agenda { date: None }
        );
        assert_eq!(
            parse(&["agenda", "2026-08-06"]).unwrap().command,
            Command::Agenda {
                date: Some(date!(2026 - 08 - 06))
            }
        );
    }

    #[test]
    fn test_upcoming_window() {
        assert_eq!(
            parse(&["upcoming"]).unwrap().command,
            Command::Upcoming {
                window: DEFAULT_NEARBY_WINDOW
            }
        );
        assert_eq!(
            parse(&["upcoming", "-w", "45"]).unwrap().command,
            Command::Upcoming { window: 45 }
        );
        assert!(parse(&["-w", "45"]).is_err());
    }

    #[test]
    fn test_todos_requires_pattern() {
        assert!(parse(&["todos"]).is_err());
        assert_eq!(
            parse(&["todos", "milk", "2026-08-06"]).unwrap().command,
            Command::Todos {
                pattern: "milk".into(),
                date: Some(date!(2026 - 08 - 06)),
            }
        );
    }

    #[test]
    fn test_data_flag() {
        let cli = parse(&["-d", "/tmp/p.json", "agenda"]).unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/p.json")));
    }

    #[test]
    fn test_trailing_arguments_rejected() {
        assert!(parse(&["now", "extra"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
    }
}
