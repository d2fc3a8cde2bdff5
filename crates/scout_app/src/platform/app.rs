use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail};
use engine_logging::{engine_debug, engine_info};
use scout_core::{update, AppState, AppViewModel, Msg, SearchOutcome, SearchPhase};

use super::effects::EffectRunner;
use super::persistence::{load_session, save_session};
use super::ui;

const EVENT_WAIT: Duration = Duration::from_millis(50);

/// Owns the core state and drives it with messages from the user and the engine.
pub struct App {
    state: AppState,
    runner: EffectRunner,
    output_dir: PathBuf,
}

impl App {
    pub fn new(runner: EffectRunner, output_dir: PathBuf) -> Self {
        Self {
            state: AppState::new(),
            runner,
            output_dir,
        }
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Applies `msg` and every follow-up message its effects produce.
    pub fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let resolved_with_records = matches!(
                &msg,
                Msg::SearchResolved {
                    outcome: SearchOutcome::Success { records },
                    ..
                } if !records.is_empty()
            );

            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;

            if resolved_with_records && self.state.phase() == SearchPhase::Resolved {
                if let Some(snapshot) = self.state.session_snapshot() {
                    save_session(&self.output_dir, &snapshot);
                }
            }
            queue.extend(self.runner.run(effects));
        }
    }

    /// Loads the last saved session into the state, if there is one.
    pub fn restore_session(&mut self) -> bool {
        match load_session(&self.output_dir) {
            Some(snapshot) => {
                self.dispatch(Msg::RestoreSession(snapshot));
                true
            }
            None => false,
        }
    }

    /// Pumps engine events until the current search resolves.
    pub fn await_search(&mut self, out: &mut impl Write) -> io::Result<()> {
        while self.state.is_searching() {
            if let Some(msg) = self.runner.next_msg(EVENT_WAIT) {
                self.dispatch(msg);
            }
            self.render_if_dirty(out)?;
        }
        self.render_if_dirty(out)
    }

    pub fn select_by_name(&mut self, name: &str) -> anyhow::Result<()> {
        let id = self
            .state
            .records()
            .iter()
            .find(|record| record.name.eq_ignore_ascii_case(name))
            .map(|record| record.id.clone())
            .ok_or_else(|| anyhow!("no channel named {name:?} in the results"))?;
        self.dispatch(Msg::RecordSelected { id });
        Ok(())
    }

    pub fn select_by_index(&mut self, index: usize) -> bool {
        let id = match index
            .checked_sub(1)
            .and_then(|i| self.state.records().get(i))
        {
            Some(record) => record.id.clone(),
            None => return false,
        };
        self.dispatch(Msg::RecordSelected { id });
        true
    }

    pub fn render_if_dirty(&mut self, out: &mut impl Write) -> io::Result<()> {
        if !self.state.consume_dirty() {
            return Ok(());
        }
        render_to(out, &self.state.view())
    }

    pub fn render(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.state.consume_dirty();
        render_to(out, &self.state.view())
    }

    /// Error currently shown to the user, if any.
    pub fn error(&self) -> Option<String> {
        self.view().error
    }
}

fn render_to(out: &mut impl Write, view: &AppViewModel) -> io::Result<()> {
    for line in ui::render::render(view) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

/// Runs one search to completion, optionally selecting a channel and exporting.
pub fn run_search(
    app: &mut App,
    query: String,
    max_results_text: String,
    select: Option<&str>,
    export: bool,
) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    app.dispatch(Msg::SearchSubmitted {
        query,
        max_results_text,
    });
    app.await_search(&mut stdout)?;
    if let Some(error) = app.error() {
        bail!(error);
    }

    if let Some(name) = select {
        app.select_by_name(name)?;
    }
    if export {
        app.dispatch(Msg::ExportClicked);
    }
    app.render_if_dirty(&mut stdout)?;
    Ok(())
}

enum Command {
    Search(String),
    Select(usize),
    Max(String),
    Export,
    Show,
    Quit,
    Help,
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Search(line.to_string());
    };
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("select"), Some(n)) => match n.parse() {
            Ok(index) => Command::Select(index),
            Err(_) => Command::Help,
        },
        (Some("max"), Some(n)) => Command::Max(n.to_string()),
        (Some("export"), None) => Command::Export,
        (Some("show"), None) => Command::Show,
        (Some("quit"), None) | (Some("q"), None) => Command::Quit,
        _ => Command::Help,
    }
}

const HELP: &str = "Type a search query, or one of: :select N, :max N, :export, :show, :quit";

/// Line-oriented session: each line is a query or a `:` command.
pub fn run_interactive(app: &mut App, max_results_text: String) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let mut max_results_text = max_results_text;

    if app.restore_session() {
        app.render(&mut stdout)?;
    }
    writeln!(stdout, "{HELP}")?;

    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    loop {
        match line_rx.try_recv() {
            Ok(line) => match parse_command(&line) {
                Command::Search(query) => {
                    engine_debug!("Interactive search query={:?}", query);
                    app.dispatch(Msg::SearchSubmitted {
                        query,
                        max_results_text: max_results_text.clone(),
                    });
                }
                Command::Select(index) => {
                    if !app.select_by_index(index) {
                        writeln!(stdout, "No result #{index}")?;
                    }
                }
                Command::Max(text) => {
                    writeln!(stdout, "Max results set to {text}")?;
                    max_results_text = text;
                }
                Command::Export => app.dispatch(Msg::ExportClicked),
                Command::Show => app.render(&mut stdout)?,
                Command::Quit => break,
                Command::Help => writeln!(stdout, "{HELP}")?,
            },
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => break,
        }

        if let Some(msg) = app.runner.next_msg(EVENT_WAIT) {
            app.dispatch(msg);
        }
        app.render_if_dirty(&mut stdout)?;
    }

    engine_info!("Interactive session finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use scout_core::{RawRecord, SearchRequest};
    use scout_engine::{
        EngineHandle, ExportOptions, FailureKind, JobHandle, JobReport, JobStatus, PollSettings,
        ScrapeService, ServiceError,
    };

    struct CannedService;

    #[async_trait::async_trait]
    impl ScrapeService for CannedService {
        async fn submit(&self, request: &SearchRequest) -> Result<JobHandle, ServiceError> {
            if request.query() == "offline" {
                return Err(ServiceError {
                    kind: FailureKind::Network,
                    message: "connection refused".to_string(),
                });
            }
            Ok(JobHandle {
                id: "job-1".to_string(),
            })
        }

        async fn job_status(&self, _job: &JobHandle) -> Result<JobReport, ServiceError> {
            Ok(JobReport {
                status: JobStatus::Completed,
                records: vec![
                    RawRecord {
                        channel_url: "https://www.youtube.com/@mkbhd".to_string(),
                        videos_count: Some("1,6 videos".to_string()),
                        ..RawRecord::default()
                    },
                    RawRecord {
                        channel_url: "https://www.youtube.com/@veritasium".to_string(),
                        ..RawRecord::default()
                    },
                ],
            })
        }
    }

    fn app(output_dir: PathBuf) -> App {
        let engine = EngineHandle::with_service(
            Arc::new(CannedService),
            PollSettings {
                max_attempts: 3,
                delay: Duration::from_millis(1),
            },
        )
        .unwrap();
        App::new(
            EffectRunner::new(engine, output_dir.clone(), ExportOptions::default()),
            output_dir,
        )
    }

    #[test]
    fn search_select_and_export() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut app = app(temp.path().to_path_buf());

        app.dispatch(Msg::SearchSubmitted {
            query: "tech".to_string(),
            max_results_text: "2".to_string(),
        });
        let mut out = Vec::new();
        app.await_search(&mut out).unwrap();

        let view = app.view();
        assert_eq!(view.result_count, 2);
        assert_eq!(view.records[0].videos, 16);

        app.select_by_name("veritasium").unwrap();
        assert_eq!(app.view().selected.unwrap().name, "veritasium");
        assert!(app.select_by_name("nobody").is_err());

        app.dispatch(Msg::ExportClicked);
        let csv = std::fs::read_to_string(temp.path().join("youtube_channels.csv")).unwrap();
        assert!(csv.starts_with("\"Channel Name\","));
        assert_eq!(csv.lines().count(), 3);
        assert!(app.view().notice.unwrap().starts_with("Saved 2 records"));

        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("2 Results Found"));
    }

    #[test]
    fn successful_search_is_restored_by_a_new_app() {
        let temp = tempfile::TempDir::new().unwrap();
        {
            let mut app = app(temp.path().to_path_buf());
            app.dispatch(Msg::SearchSubmitted {
                query: "tech".to_string(),
                max_results_text: "2".to_string(),
            });
            app.await_search(&mut io::sink()).unwrap();
        }

        let mut restored = app(temp.path().to_path_buf());
        assert!(restored.restore_session());
        let view = restored.view();
        assert_eq!(view.query, "tech");
        assert_eq!(view.result_count, 2);
    }

    #[test]
    fn failed_submission_surfaces_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut app = app(temp.path().to_path_buf());

        app.dispatch(Msg::SearchSubmitted {
            query: "offline".to_string(),
            max_results_text: String::new(),
        });
        app.await_search(&mut io::sink()).unwrap();

        assert_eq!(app.error().as_deref(), Some("Failed to queue scrape job"));
        assert!(!temp.path().join(".scout_state.ron").exists());
    }

    #[test]
    fn commands_are_parsed() {
        assert!(matches!(parse_command(":select 2"), Command::Select(2)));
        assert!(matches!(parse_command(":max 25"), Command::Max(ref n) if n == "25"));
        assert!(matches!(parse_command(":export"), Command::Export));
        assert!(matches!(parse_command(":q"), Command::Quit));
        assert!(matches!(parse_command(":bogus"), Command::Help));
        assert!(matches!(parse_command("  lofi beats "), Command::Search(ref q) if q == "lofi beats"));
    }
}
