use std::io;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::SetCursorStyle;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

mod app;
mod archive;
mod cli;
mod logging;
mod model;
mod ssh;
mod storage;
mod transfer;
mod ui;

use app::constants::{
    MSG_DOWNLOAD_COMPLETE, MSG_DOWNLOAD_FAILED, MSG_HISTORY_WARNING, MSG_INSECURE_HOST_KEY,
    MSG_NO_SUBMISSION, MSG_UPLOAD_COMPLETE, MSG_UPLOAD_FAILED,
};
use app::{App, CursorMode};
use cli::Cli;
use logging::Logger;
use model::{FormOutcome, HistoryRecord, TransferMode, TransferRequest};
use transfer::TransferError;

const TICK_RATE: Duration = Duration::from_millis(33);

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let log_path = match &cli.log_file {
        Some(path) => path.clone(),
        None => storage::log_path()?,
    };
    let logger = Logger::open(log_path);
    let history_path = match &cli.history {
        Some(path) => path.clone(),
        None => storage::history_path()?,
    };
    let history = storage::load_history(&history_path, &logger);

    let (outcome, mut history) = run_form(history)?;
    let submission = match outcome {
        FormOutcome::Cancelled => {
            logger.log_line("Form cancelled");
            println!("{MSG_NO_SUBMISSION}");
            return Ok(ExitCode::SUCCESS);
        }
        FormOutcome::Submitted(submission) => submission,
    };

    let request = match TransferRequest::from_submission(&submission) {
        Ok(request) => request,
        Err(err) => {
            logger.log_line(&format!("Rejected submission: {err}"));
            println!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };
    logger.log_line(&format!("Submitted {}", request.describe()));

    let options = cli.connect_options();
    if options.accept_any_host_key {
        logger.log_line(MSG_INSECURE_HOST_KEY);
        eprintln!("{MSG_INSECURE_HOST_KEY}");
    }

    let code = match transfer::execute(&request, &options, &logger) {
        Ok(summary) => {
            logger.log_line(&format!(
                "Transferred {} bytes between {} and {}",
                summary.bytes, summary.local_path, summary.remote_path
            ));
            match summary.direction {
                TransferMode::Upload => {
                    println!("{MSG_UPLOAD_COMPLETE} {}", summary.remote_path)
                }
                TransferMode::Download => {
                    println!("{MSG_DOWNLOAD_COMPLETE} {}", summary.local_path)
                }
            }
            ExitCode::SUCCESS
        }
        Err(err @ TransferError::Connect(_)) => {
            logger.log_line(&err.to_string());
            println!("{err}");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => {
            logger.log_line(&format!("Transfer failed: {err}"));
            match request.transfer_mode {
                TransferMode::Upload => println!("{MSG_UPLOAD_FAILED} {err}"),
                TransferMode::Download => println!("{MSG_DOWNLOAD_FAILED} {err}"),
            }
            ExitCode::FAILURE
        }
    };

    match storage::save_history(&history_path, &request, &mut history) {
        Ok(()) => logger.log_line(&format!("Saved history to {}", history_path.display())),
        Err(err) => {
            logger.log_line(&format!("{MSG_HISTORY_WARNING} {err:#}"));
            println!("{MSG_HISTORY_WARNING} {err:#}");
        }
    }
    Ok(code)
}

fn run_form(history: HistoryRecord) -> Result<(FormOutcome, HistoryRecord)> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut app = App::new(history);
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        SetCursorStyle::DefaultUserShape,
        LeaveAlternateScreen
    )
    .ok();
    terminal.show_cursor().ok();

    let outcome = result?;
    Ok((outcome, app.into_history()))
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<FormOutcome> {
    let mut applied_cursor = None;
    loop {
        if applied_cursor != Some(app.cursor_mode) {
            let style = match app.cursor_mode {
                CursorMode::Blink | CursorMode::Hidden => SetCursorStyle::BlinkingBlock,
                CursorMode::Static => SetCursorStyle::SteadyBlock,
            };
            execute!(terminal.backend_mut(), style).context("set cursor style")?;
            applied_cursor = Some(app.cursor_mode);
        }

        terminal.draw(|frame| ui::draw_form(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(outcome) = app.handle_key(key) {
                    return Ok(outcome);
                }
            }
        }
    }
}
