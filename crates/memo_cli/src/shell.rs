//! Line commands of the terminal shell.
//!
//! # Responsibility
//! - Parse one input line into a `Command`.
//! - Apply commands to the editor session and render the results.
//!
//! # Invariants
//! - List positions shown to the user are 1-based.
//! - Rendering never prints more than one preview line per note.

use log::warn;
use memo_core::{EditorSession, Folder, LeaveOutcome, NoteStore, SessionError, TickOutcome};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

const PREVIEW_COLUMNS: usize = 60;

pub const HELP: &str = "\
commands:
  ls                     list notes of the visible folder
  open <n>               open note <n>
  show                   print the open note
  set <text>             replace the open note (\\n starts a new line)
  append <text>          append one line to the open note
  clear                  empty the open note
  new                    create a note
  mv                     move the open note to the other folder
  folder active|archive  switch the visible folder
  status                 show editor state
  help                   show this help
  quit                   exit";

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Open(usize),
    Show,
    Set(String),
    Append(String),
    Clear,
    New,
    Move,
    Folder(Folder),
    Status,
    Help,
    Quit,
}

/// Rejected input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidPosition(String),
    UnknownFolder(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(name) => write!(f, "unknown command `{name}`; try `help`"),
            Self::MissingArgument(command) => write!(f, "`{command}` needs an argument"),
            Self::InvalidPosition(value) => write!(f, "`{value}` is not a list position"),
            Self::UnknownFolder(value) => {
                write!(f, "unknown folder `{value}`; expected active|archive")
            }
        }
    }
}

impl Error for ParseError {}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let trimmed = line.trim_end_matches(['\n', '\r']);
    let (name, rest) = match trimmed.trim_start().split_once(' ') {
        Some((name, rest)) => (name, rest),
        None => (trimmed.trim(), ""),
    };

    let command = match name {
        "" => return Ok(None),
        "ls" | "list" => Command::List,
        "open" => {
            let value = rest.trim();
            if value.is_empty() {
                return Err(ParseError::MissingArgument("open"));
            }
            match value.parse::<usize>() {
                Ok(position) if position > 0 => Command::Open(position - 1),
                _ => return Err(ParseError::InvalidPosition(value.to_string())),
            }
        }
        "show" => Command::Show,
        "set" => Command::Set(unescape(rest)),
        "append" => Command::Append(unescape(rest)),
        "clear" => Command::Clear,
        "new" => Command::New,
        "mv" | "move" => Command::Move,
        "folder" => match rest.trim().to_ascii_lowercase().as_str() {
            "" => return Err(ParseError::MissingArgument("folder")),
            "active" => Command::Folder(Folder::Active),
            "archive" => Command::Folder(Folder::Archive),
            other => return Err(ParseError::UnknownFolder(other.to_string())),
        },
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// Applies `command` to the session and writes user-facing output.
///
/// `Quit` is handled by the event loop and is a no-op here.
pub fn execute<S: NoteStore>(
    session: &mut EditorSession<S>,
    command: Command,
    out: &mut impl Write,
) -> io::Result<()> {
    match command {
        Command::List => render_list(session, out),
        Command::Open(index) => match session.select(index) {
            Ok(outcome) => {
                report_leave(outcome.leave, out)?;
                if !outcome.loaded {
                    writeln!(out, "could not load note {}", index + 1)?;
                }
                render_text(session, out)
            }
            Err(err) => report_error(&err, out),
        },
        Command::Show => render_text(session, out),
        Command::Set(text) => apply_edit(session, text, out),
        Command::Append(line) => {
            let text = if session.text().is_empty() {
                line
            } else {
                format!("{}\n{line}", session.text())
            };
            apply_edit(session, text, out)
        }
        Command::Clear => apply_edit(session, String::new(), out),
        Command::New => match session.new_note() {
            Ok(outcome) => {
                report_leave(outcome.leave, out)?;
                writeln!(out, "created {}", outcome.id)
            }
            Err(err) => report_error(&err, out),
        },
        Command::Move => match session.move_current() {
            Ok(outcome) => {
                writeln!(out, "moved to {}", outcome.moved_to)?;
                render_list(session, out)
            }
            Err(err) => report_error(&err, out),
        },
        Command::Folder(folder) => match session.switch_folder(folder) {
            Ok(()) => render_list(session, out),
            Err(err) => report_error(&err, out),
        },
        Command::Status => render_status(session, out),
        Command::Help => writeln!(out, "{HELP}"),
        Command::Quit => Ok(()),
    }
}

/// Writes a user-facing line for tick outcomes worth surfacing.
///
/// `failing` tracks whether the previous autosave failed, so a failure streak
/// is reported once. A re-sort invalidates positions printed by `ls`.
pub fn report_tick(
    outcome: TickOutcome,
    failing: &mut bool,
    out: &mut impl Write,
) -> io::Result<()> {
    match outcome {
        TickOutcome::SaveFailed => {
            if !*failing {
                *failing = true;
                writeln!(out, "autosave failed; retrying")?;
            }
        }
        TickOutcome::Saved => {
            if *failing {
                *failing = false;
                writeln!(out, "autosave recovered")?;
            }
        }
        TickOutcome::Resorted => writeln!(out, "list re-sorted; run `ls` for new positions")?,
        TickOutcome::Inactive | TickOutcome::Idle => {}
    }
    Ok(())
}

fn apply_edit<S: NoteStore>(
    session: &mut EditorSession<S>,
    text: String,
    out: &mut impl Write,
) -> io::Result<()> {
    match session.edit(text) {
        Ok(()) => Ok(()),
        Err(err) => report_error(&err, out),
    }
}

pub fn render_list<S: NoteStore>(
    session: &EditorSession<S>,
    out: &mut impl Write,
) -> io::Result<()> {
    let notes = session.visible_notes();
    writeln!(out, "[{}] {} note(s)", session.folder(), notes.len())?;
    let selected = session.selected_index();
    for (index, entry) in notes.iter().enumerate() {
        let marker = if selected == Some(index) { '*' } else { ' ' };
        writeln!(
            out,
            "{marker}{:>3}  {:<19}  {}",
            index + 1,
            entry.last_modified,
            clip(&entry.preview, PREVIEW_COLUMNS)
        )?;
    }
    Ok(())
}

fn render_text<S: NoteStore>(session: &EditorSession<S>, out: &mut impl Write) -> io::Result<()> {
    match session.selected_id() {
        Some(id) => {
            writeln!(out, "--- {id}")?;
            if !session.text().is_empty() {
                writeln!(out, "{}", session.text())?;
            }
            writeln!(out, "---")
        }
        None => writeln!(out, "no note is open"),
    }
}

fn render_status<S: NoteStore>(
    session: &EditorSession<S>,
    out: &mut impl Write,
) -> io::Result<()> {
    let state = session.state();
    let note = state
        .selected
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        out,
        "folder={} note={} dirty={} ready={} resort={}",
        state.folder, note, state.dirty, state.ready_to_persist, state.list_needs_resort
    )
}

fn report_leave(leave: LeaveOutcome, out: &mut impl Write) -> io::Result<()> {
    match leave {
        LeaveOutcome::SaveFailed => writeln!(out, "previous note was not saved"),
        LeaveOutcome::DeleteFailed => writeln!(out, "empty note could not be removed"),
        LeaveOutcome::Untouched | LeaveOutcome::Saved | LeaveOutcome::Deleted => Ok(()),
    }
}

fn report_error(err: &SessionError, out: &mut impl Write) -> io::Result<()> {
    if let SessionError::Store(inner) = err {
        warn!(
            "event=shell_command module=cli status=error error_code={}",
            inner.code()
        );
    }
    writeln!(out, "error: {err}")
}

fn unescape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

fn clip(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut clipped = value.chars().take(max_chars).collect::<String>();
    clipped.push('…');
    clipped
}
