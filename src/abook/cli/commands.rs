use super::print::{print_error, print_messages, print_result};
use super::setup::{init_logging, Cli};
use super::table::{normalize, CommandSpec, CommandTable};
use abook::api::{BookApi, BookPaths, CmdMessage, CmdResult};
use abook::config::BookConfig;
use abook::error::{BookError, Result};
use abook::store::Format;
use clap::Parser;
use directories::ProjectDirs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PROMPT: &str = ">>> ";
const HOME_ENV: &str = "ABOOK_HOME";

/// Everything the loop needs; handlers receive it mutably.
pub struct AppContext {
    pub api: BookApi,
    pub commands: CommandTable,
    pub page_size: usize,
    /// Where `config.json` lives
    pub config_dir: PathBuf,
    running: bool,
}

impl AppContext {
    pub fn new(api: BookApi, page_size: usize, config_dir: PathBuf) -> Self {
        Self {
            api,
            commands: standard_commands(),
            page_size,
            config_dir,
            running: true,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;
    let stdin = io::stdin();
    repl(&mut ctx, stdin.lock())
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = data_dir();
    let config = BookConfig::load(&data_dir).unwrap_or_else(|e| {
        warn!("ignoring config: {}", e);
        BookConfig::default()
    });

    let data_file = cli
        .file
        .clone()
        .unwrap_or_else(|| config.data_path(&data_dir));
    let format = cli
        .format
        .map(Format::from)
        .unwrap_or_else(|| config.data_format(&data_file));
    let page_size = cli.page_size.unwrap_or(config.page_size);
    if page_size == 0 {
        return Err(BookError::InvalidPageSize(page_size.to_string()));
    }

    debug!(path = %data_file.display(), %format, page_size, "starting");
    let api = BookApi::open(BookPaths { data_file, format })?;
    Ok(AppContext::new(api, page_size, data_dir))
}

fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return PathBuf::from(home);
    }
    ProjectDirs::from("com", "abook", "abook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Reads commands until an exit command or end of input, then saves.
///
/// Undecodable bytes are replaced rather than rejected, so a garbled line
/// is just another failed command. A read error ends the loop like EOF.
fn repl<R: BufRead>(ctx: &mut AppContext, mut input: R) -> Result<()> {
    let mut buf = Vec::new();
    while ctx.running {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(err) => {
                warn!("stopped reading input: {}", err);
                print_error(&BookError::Io(err));
                break;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        let result = dispatch(ctx, &line);
        match result {
            Ok(result) => print_result(&result),
            Err(err) => print_error(&err),
        }
    }

    let saved = ctx.api.save(true)?;
    print_messages(&saved.messages);
    Ok(())
}

/// Runs one input line. Blank lines do nothing.
fn dispatch(ctx: &mut AppContext, line: &str) -> Result<CmdResult> {
    let line = normalize(line);
    if line.is_empty() {
        return Ok(CmdResult::default());
    }

    let Some((spec, args)) = ctx.commands.resolve(&line) else {
        return Err(BookError::Usage("No such command".to_string()));
    };
    if !spec.accepts(args.len()) {
        return Err(BookError::Usage(format!("Usage: {}", spec.usage)));
    }

    let handler = spec.handler;
    debug!(command = spec.names[0], ?args, "dispatch");
    handler(ctx, &args)
}

pub fn standard_commands() -> CommandTable {
    CommandTable::new(vec![
        CommandSpec {
            names: &["hello"],
            usage: "hello",
            about: "Say hello",
            min_args: 0,
            max_args: 0,
            handler: handle_hello,
        },
        CommandSpec {
            names: &["help"],
            usage: "help",
            about: "Show usage for every command",
            min_args: 0,
            max_args: 0,
            handler: handle_help,
        },
        CommandSpec {
            names: &["list"],
            usage: "list",
            about: "List all command names",
            min_args: 0,
            max_args: 0,
            handler: handle_list,
        },
        CommandSpec {
            names: &["show all", "show"],
            usage: "show all [page size]",
            about: "Show every contact, page by page",
            min_args: 0,
            max_args: 1,
            handler: handle_show_all,
        },
        CommandSpec {
            names: &["add"],
            usage: "add <name> [phone] [dd.mm.yyyy]",
            about: "Add a new contact",
            min_args: 1,
            max_args: 3,
            handler: handle_add,
        },
        CommandSpec {
            names: &["phone add"],
            usage: "phone add <name> <phone>",
            about: "Add a phone number to a contact",
            min_args: 2,
            max_args: 2,
            handler: handle_phone_add,
        },
        CommandSpec {
            names: &["phone remove"],
            usage: "phone remove <name> <phone>",
            about: "Remove a phone number from a contact",
            min_args: 2,
            max_args: 2,
            handler: handle_phone_remove,
        },
        CommandSpec {
            names: &["phone edit"],
            usage: "phone edit <name> <old phone> <new phone>",
            about: "Replace a phone number of a contact",
            min_args: 3,
            max_args: 3,
            handler: handle_phone_edit,
        },
        CommandSpec {
            names: &["phone"],
            usage: "phone <name>",
            about: "Show one contact",
            min_args: 1,
            max_args: 1,
            handler: handle_phone,
        },
        CommandSpec {
            names: &["remove"],
            usage: "remove <name>",
            about: "Remove a contact",
            min_args: 1,
            max_args: 1,
            handler: handle_remove,
        },
        CommandSpec {
            names: &["birthday"],
            usage: "birthday <name> <dd.mm.yyyy>",
            about: "Set the birthday of a contact",
            min_args: 2,
            max_args: 2,
            handler: handle_birthday,
        },
        CommandSpec {
            names: &["days"],
            usage: "days <name>",
            about: "Days until the next birthday of a contact",
            min_args: 1,
            max_args: 1,
            handler: handle_days,
        },
        CommandSpec {
            names: &["find"],
            usage: "find <text>",
            about: "Find contacts by part of a name or phone",
            min_args: 1,
            max_args: 1,
            handler: handle_find,
        },
        CommandSpec {
            names: &["export"],
            usage: "export <path> [csv|json|snapshot]",
            about: "Write all contacts to a new file",
            min_args: 1,
            max_args: 2,
            handler: handle_export,
        },
        CommandSpec {
            names: &["import"],
            usage: "import <path> [csv|json|snapshot]",
            about: "Replace all contacts with the contents of a file",
            min_args: 1,
            max_args: 2,
            handler: handle_import,
        },
        CommandSpec {
            names: &["clear"],
            usage: "clear",
            about: "Remove every contact",
            min_args: 0,
            max_args: 0,
            handler: handle_clear,
        },
        CommandSpec {
            names: &["config"],
            usage: "config [key] [value]",
            about: "Show or change settings in config.json",
            min_args: 0,
            max_args: 2,
            handler: handle_config,
        },
        CommandSpec {
            names: &["good bye", "close", "exit", "."],
            usage: "exit",
            about: "Save and quit",
            min_args: 0,
            max_args: 0,
            handler: handle_exit,
        },
    ])
}

fn handle_hello(_ctx: &mut AppContext, _args: &[&str]) -> Result<CmdResult> {
    Ok(CmdResult::default().with_message(CmdMessage::info("How can I help you?")))
}

fn handle_help(ctx: &mut AppContext, _args: &[&str]) -> Result<CmdResult> {
    let width = ctx.commands.iter().map(|c| c.usage.len()).max().unwrap_or(0);
    let mut result = CmdResult::default();
    for spec in ctx.commands.iter() {
        result.add_message(CmdMessage::info(format!(
            "{:<width$}  {}",
            spec.usage,
            spec.about,
            width = width
        )));
    }
    Ok(result)
}

fn handle_list(ctx: &mut AppContext, _args: &[&str]) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    for name in ctx.commands.iter().flat_map(|c| c.names.iter()) {
        result.add_message(CmdMessage::info(*name));
    }
    Ok(result)
}

fn handle_show_all(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    let page_size = match args.first() {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| BookError::InvalidPageSize(raw.to_string()))?,
        None => ctx.page_size,
    };
    ctx.api.show_all(page_size)
}

fn handle_add(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    ctx.api
        .add_contact(args[0], args.get(1).copied(), args.get(2).copied())
}

fn handle_phone_add(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    ctx.api.add_phone(args[0], args[1])
}

fn handle_phone_remove(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    ctx.api.remove_phone(args[0], args[1])
}

fn handle_phone_edit(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    ctx.api.edit_phone(args[0], args[1], args[2])
}

fn handle_phone(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    ctx.api.show_contact(args[0])
}

fn handle_remove(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    ctx.api.remove_contact(args[0])
}

fn handle_birthday(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    ctx.api.set_birthday(args[0], args[1])
}

fn handle_days(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    ctx.api.days_to_birthday(args[0])
}

fn handle_find(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    let mut result = ctx.api.search(args[0])?;
    if !result.listed_records.is_empty() {
        result
            .messages
            .insert(0, CmdMessage::info("Contacts found:"));
    }
    Ok(result)
}

fn handle_export(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    let format = args.get(1).map(|f| f.parse::<Format>()).transpose()?;
    ctx.api.export(Path::new(args[0]), format)
}

fn handle_import(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    let format = args.get(1).map(|f| f.parse::<Format>()).transpose()?;
    ctx.api.import(Path::new(args[0]), format)
}

fn handle_clear(ctx: &mut AppContext, _args: &[&str]) -> Result<CmdResult> {
    ctx.api.clear()
}

/// `data_file` and `format` take effect on the next start; `page_size` applies
/// right away.
fn handle_config(ctx: &mut AppContext, args: &[&str]) -> Result<CmdResult> {
    let mut config = BookConfig::load(&ctx.config_dir)?;
    let mut result = CmdResult::default();
    match args {
        [] => {
            for key in BookConfig::keys() {
                let value = config.get(key).unwrap_or_default();
                result.add_message(CmdMessage::info(format!("{} = {}", key, value)));
            }
        }
        [key] => match config.get(key) {
            Some(value) => result.add_message(CmdMessage::info(value)),
            None => {
                return Err(BookError::Config(format!("Unknown config key: {}", key)));
            }
        },
        [key, value, ..] => {
            config.set(key, value)?;
            config.save(&ctx.config_dir)?;
            if *key == "page_size" {
                ctx.page_size = config.page_size;
            }
            let shown = config.get(key).unwrap_or_else(|| value.to_string());
            result.add_message(CmdMessage::success(format!("{} set to {}", key, shown)));
        }
    }
    Ok(result)
}

/// The save itself happens once the loop ends.
fn handle_exit(ctx: &mut AppContext, _args: &[&str]) -> Result<CmdResult> {
    ctx.running = false;
    Ok(CmdResult::default().with_message(CmdMessage::info("Good bye!")))
}
