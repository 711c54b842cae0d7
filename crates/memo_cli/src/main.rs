//! Terminal shell for memo.
//!
//! # Responsibility
//! - Resolve configuration, start logging, and open the note store.
//! - Run the single-threaded event loop that interleaves user commands with
//!   the autosave timer tick.
//!
//! # Invariants
//! - Session mutations happen only on the main thread; the stdin reader thread
//!   only forwards raw lines.
//! - The shell refuses to start when the note store is unavailable.

mod shell;

use log::{error, info};
use memo_core::{init_logging, EditorSession, FsNoteStore, MemoConfig, NoteStore};
use shell::Command;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

enum InputEvent {
    Line(String),
    Closed,
}

fn main() -> ExitCode {
    let Some(config) = MemoConfig::from_home() else {
        eprintln!("memo: cannot resolve the home directory");
        return ExitCode::FAILURE;
    };
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("memo: file logging disabled: {err}");
    }

    let store = FsNoteStore::open(&config);
    let mut session = match EditorSession::start(store) {
        Ok(session) => session,
        Err(err) => {
            error!("event=shell_start module=cli status=error error={}", err);
            eprintln!("memo: {err} (root: {})", config.root_dir.display());
            return ExitCode::FAILURE;
        }
    };
    info!(
        "event=shell_start module=cli status=ok tick_ms={}",
        config.tick_period.as_millis()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = run(&mut session, &config, &mut out) {
        error!("event=shell_output module=cli status=error error={}", err);
    }

    match session.flush() {
        Ok(true) => info!("event=exit_flush module=cli status=ok"),
        Ok(false) => {}
        Err(err) => {
            error!(
                "event=exit_flush module=cli status=error error_code={} error={}",
                err.code(),
                err
            );
            eprintln!("memo: unsaved changes were lost: {err}");
        }
    }
    ExitCode::SUCCESS
}

fn run<S: NoteStore>(
    session: &mut EditorSession<S>,
    config: &MemoConfig,
    out: &mut impl Write,
) -> io::Result<()> {
    let input = spawn_stdin_reader();
    let mut autosave_failing = false;

    writeln!(out, "memo {} - type `help` for commands", memo_core::core_version())?;
    shell::render_list(session, out)?;
    prompt(out)?;

    let mut next_tick = Instant::now() + config.tick_period;
    loop {
        let wait = next_tick.saturating_duration_since(Instant::now());
        match input.recv_timeout(wait) {
            Ok(InputEvent::Line(line)) => {
                match shell::parse_command(&line) {
                    Ok(Some(Command::Quit)) => return Ok(()),
                    Ok(Some(command)) => shell::execute(session, command, out)?,
                    Ok(None) => {}
                    Err(err) => writeln!(out, "{err}")?,
                }
                prompt(out)?;
            }
            Ok(InputEvent::Closed) | Err(RecvTimeoutError::Disconnected) => return Ok(()),
            Err(RecvTimeoutError::Timeout) => {
                let outcome = session.tick();
                shell::report_tick(outcome, &mut autosave_failing, out)?;
                next_tick = Instant::now() + config.tick_period;
            }
        }
    }
}

fn spawn_stdin_reader() -> Receiver<InputEvent> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if sender.send(InputEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = sender.send(InputEvent::Closed);
    });
    receiver
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
