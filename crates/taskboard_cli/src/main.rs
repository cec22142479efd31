use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead, IsTerminal};
use taskboard_cli::cli::{CONFIG_OVERRIDE_FLAG, Cli, Command, NotesCommand, collect_overrides};
use taskboard_cli::output;
use taskboard_core::board::Board;
use taskboard_core::config::{
    Palette, default_data_dir, load_config_with_fallback, merge_overrides, palette_for_theme,
};
use taskboard_core::dates::SystemClock;
use taskboard_core::drag::DropOutcome;
use taskboard_core::error::AppError;
use taskboard_core::notes::NotesMode;
use taskboard_core::storage::{Backend, HttpBackend, JsonFileBackend};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

struct Session {
    board: Board,
    palette: Palette,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
}

fn open_session(raw_overrides: &[String]) -> Result<Session, AppError> {
    let load = load_config_with_fallback();
    if let Some(err) = load.error.as_ref() {
        warn!(error = %err, "falling back to default configuration");
    }

    let overrides = collect_overrides(raw_overrides)
        .map_err(|message| AppError::invalid_input(format!("{CONFIG_OVERRIDE_FLAG}: {message}")))?;
    let config = merge_overrides(&load.config, &overrides);

    let backend: Box<dyn Backend> = match config.backend_url.as_deref() {
        Some(url) => Box::new(HttpBackend::new(url)?),
        None => {
            let dir = match config.data_dir.clone() {
                Some(dir) => dir,
                None => default_data_dir()?,
            };
            debug!(dir = %dir.display(), "using local data directory");
            Box::new(JsonFileBackend::new(dir))
        }
    };

    Ok(Session {
        board: Board::open(backend, Box::new(SystemClock), config.categories()),
        palette: palette_for_theme(config.theme.as_deref()),
    })
}

fn print_json(value: serde_json::Value) {
    println!("{value}");
}

fn run_command(session: &mut Session, cli: Cli) -> Result<(), AppError> {
    let board = &mut session.board;
    match cli.command {
        Command::List => {
            let view = board.render();
            if cli.json {
                print_json(output::board_json(&view));
            } else {
                println!("{}", output::board_plain(&view, &session.palette));
            }
        }
        Command::Page => {
            println!("{}", output::page_html(&board.render_html()));
        }
        Command::Add {
            name,
            due,
            category,
        } => {
            let task = board.add_task(
                name.as_deref().unwrap_or_default(),
                due.as_deref().unwrap_or_default(),
                category.as_deref(),
            )?;
            let index = board.store().len() - 1;
            if cli.json {
                print_json(output::task_json(Some(index), &task));
            } else {
                println!("Added task: {} (#{index})", task.name);
            }
        }
        Command::Toggle { index } => {
            let task = board.toggle_complete(index)?;
            if cli.json {
                print_json(output::task_json(Some(index), &task));
            } else if task.completed {
                println!("Completed task: {} (#{index})", task.name);
            } else {
                println!("Reopened task: {} (#{index})", task.name);
            }
        }
        Command::Select { index } => set_placement(board, index, true, cli.json)?,
        Command::Unselect { index } => set_placement(board, index, false, cli.json)?,
        Command::Edit { index } => {
            board.begin_edit(index)?;
            let name = board.store().get(index)?.name.clone();
            if cli.json {
                print_json(output::board_json(&board.render()));
            } else {
                println!("Editing task: {name} (#{index})");
            }
        }
        Command::Cancel => {
            board.cancel_edit();
            if !cli.json {
                println!("Edit cancelled");
            }
        }
        Command::Save {
            index,
            name,
            due,
            category,
        } => {
            let task = board.save_edit(index, &name, &due, &category)?;
            if cli.json {
                print_json(output::task_json(Some(index), &task));
            } else {
                println!("Updated task: {} (#{index})", task.name);
            }
        }
        Command::Remove { index } => {
            let task = board.remove(index)?;
            if cli.json {
                print_json(output::task_json(None, &task));
            } else {
                println!("Removed task: {}", task.name);
            }
        }
        Command::Move { from, to } => {
            let outcome = board.move_task(from, to)?;
            if cli.json {
                let moved = matches!(outcome, DropOutcome::Moved { .. });
                print_json(serde_json::json!({ "from": from, "to": to, "moved": moved }));
            } else if let DropOutcome::Moved { from, to } = outcome {
                println!("Moved task #{from} to #{to}");
            } else {
                println!("Nothing moved");
            }
        }
        Command::Notes { notes } => run_notes(board, notes, cli.json),
    }

    Ok(())
}

fn set_placement(board: &mut Board, index: usize, current: bool, json: bool) -> Result<(), AppError> {
    let task = board.set_current(index, current)?;
    if json {
        print_json(output::task_json(Some(index), &task));
    } else {
        let list = if current { "current" } else { "other" };
        println!("Moved to {list}: {} (#{index})", task.name);
    }
    Ok(())
}

fn run_notes(board: &mut Board, command: NotesCommand, json: bool) {
    let editing = board.notes().mode() == NotesMode::Editing;
    let text = match command {
        NotesCommand::Show => {
            if editing {
                board.notes().buffer().to_string()
            } else {
                board.notes_html().unwrap_or_default()
            }
        }
        NotesCommand::Edit => board.begin_notes_edit().to_string(),
        NotesCommand::Input { text } => {
            if !editing {
                board.begin_notes_edit();
            }
            board.notes_input(&text);
            board.notes().buffer().to_string()
        }
        NotesCommand::Done => {
            if editing {
                board.finish_notes_edit()
            } else {
                board.notes_html().unwrap_or_default()
            }
        }
    };

    if json {
        let mode = match board.notes().mode() {
            NotesMode::Viewing => "viewing",
            NotesMode::Editing => "editing",
        };
        let controls = board.notes().controls();
        print_json(serde_json::json!({
            "mode": mode,
            "content": text,
            "controls": { "edit": controls.edit_visible, "done": controls.done_visible },
        }));
    } else {
        println!("{text}");
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_interactive(session: &mut Session) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("taskboard".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if !cli.config_override.is_empty() {
            warn!("configuration overrides only apply when the session starts");
        }

        if let Err(err) = run_command(session, cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        init_tracing(0);
        let result = open_session(&[]).and_then(|mut session| run_interactive(&mut session));
        if let Err(err) = result {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose);
    let overrides = cli.config_override.clone();
    let result = open_session(&overrides).and_then(|mut session| run_command(&mut session, cli));
    if let Err(err) = result {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
