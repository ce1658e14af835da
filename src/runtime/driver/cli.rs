use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use thiserror::Error;

use crate::error::NavError;
use crate::runtime::NavEngine;
use crate::runtime::router::KeyOutcome;

pub type DriverResult<T> = std::result::Result<T, CliDriverError>;

#[derive(Debug, Error)]
pub enum CliDriverError {
    #[error("navigation error: {0}")]
    Nav(#[from] NavError),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal host for a [`NavEngine`]: raw mode, alternate screen, key and
/// resize forwarding and a one-line focus status.
///
/// Terminal width is measured in columns, so hosts driving the engine from a
/// terminal usually configure `compact_threshold` in columns too.
pub struct CliDriver {
    engine: NavEngine,
    poll_interval: Duration,
    should_exit: bool,
    last_outcome: Option<KeyOutcome>,
}

impl CliDriver {
    pub fn new(engine: NavEngine) -> Self {
        Self {
            engine,
            poll_interval: Duration::from_millis(200),
            should_exit: false,
            last_outcome: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn engine(&self) -> &NavEngine {
        &self.engine
    }

    pub fn last_outcome(&self) -> Option<&KeyOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn run(mut self) -> DriverResult<()> {
        let mut stdout = io::stdout();
        self.enter(&mut stdout)?;
        let result = self.run_inner(&mut stdout);
        self.exit(&mut stdout);
        result
    }

    /// Feed a prepared event list; no terminal is touched.
    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> DriverResult<()>
    where
        I: IntoIterator<Item = Event>,
    {
        self.render(stdout)?;
        for event in events {
            self.dispatch(event);
            self.render(stdout)?;
            if self.should_exit {
                break;
            }
        }
        Ok(())
    }

    /// `active scope · focused id`, with placeholders for empty fields.
    pub fn status_line(&self) -> String {
        let state = self.engine.focus_state();
        let mut line = format!(
            "{} · {}",
            state.active_scope.as_deref().unwrap_or("-"),
            state.focused_id.as_deref().unwrap_or("-"),
        );
        if self.engine.is_compact() {
            line.push_str(" [compact]");
        }
        line
    }

    fn run_inner(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        let (width, _) = terminal::size()?;
        self.engine.set_viewport_width(u32::from(width));
        self.render(stdout)?;

        while !self.should_exit {
            if event::poll(self.poll_interval)? {
                let event = event::read()?;
                self.dispatch(event);
                self.render(stdout)?;
            }
        }
        self.engine.emit_metrics();
        Ok(())
    }

    fn dispatch(&mut self, event: Event) {
        match event {
            Event::Key(key) if is_interrupt(&key) => self.should_exit = true,
            Event::Key(key) => {
                self.last_outcome = Some(self.engine.handle_key_event(&key));
            }
            Event::Resize(width, _) => self.engine.set_viewport_width(u32::from(width)),
            _ => {}
        }
    }

    fn render(&self, stdout: &mut impl Write) -> DriverResult<()> {
        queue!(
            stdout,
            MoveTo(0, 0),
            Clear(ClearType::CurrentLine),
            Print(self.status_line())
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn enter(&self, stdout: &mut impl Write) -> DriverResult<()> {
        terminal::enable_raw_mode().map_err(|err| CliDriverError::Terminal(err.to_string()))?;
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    fn exit(&self, stdout: &mut impl Write) {
        execute!(stdout, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}
