//! Terminal backends.
//!
//! [`Tui`] drives a real terminal through crossterm and turns its input into
//! a stream of [`Event`]s on a background task. [`TestTui`] renders into an
//! in-memory [`TestBackend`] and is used both by tests and by the
//! `snapshot` command. [`TuiEnum`] lets the app hold either.

use std::{
    io::{Stderr, stderr},
    ops::{Deref, DerefMut},
    time::Duration,
};

use color_eyre::eyre::{Result, eyre};
use crossterm::event::{KeyCode, KeyModifiers};
use futures::{FutureExt, StreamExt};
use ratatui::{
    Frame,
    backend::{CrosstermBackend, TestBackend},
    crossterm::{
        cursor,
        event::{
            DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
            Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent,
        },
        terminal::{EnterAlternateScreen, LeaveAlternateScreen},
    },
};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, trace};

#[derive(Clone, Debug)]
pub enum Event {
    Init,
    /// The terminal input stream failed
    Error,
    Tick,
    Render,
    FocusGained,
    FocusLost,
    Paste(String),
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

impl From<KeyCode> for Event {
    fn from(value: KeyCode) -> Self {
        Event::Key(KeyEvent::new(value, KeyModifiers::NONE))
    }
}
impl From<char> for Event {
    fn from(value: char) -> Self {
        Event::Key(KeyEvent::new(KeyCode::Char(value), KeyModifiers::NONE))
    }
}

pub enum TuiEnum {
    Crossterm(Tui),
    Test(TestTui),
}

impl From<Tui> for TuiEnum {
    fn from(tui: Tui) -> Self {
        TuiEnum::Crossterm(tui)
    }
}
impl From<TestTui> for TuiEnum {
    fn from(tui: TestTui) -> Self {
        TuiEnum::Test(tui)
    }
}
impl TuiEnum {
    pub fn enter(&mut self) -> Result<()> {
        match self {
            TuiEnum::Crossterm(tui) => tui.enter(),
            TuiEnum::Test(_) => Ok(()),
        }
    }

    pub fn exit(&mut self) -> Result<()> {
        match self {
            TuiEnum::Crossterm(tui) => tui.exit(),
            TuiEnum::Test(_) => Ok(()),
        }
    }

    /// Leave the terminal and stop the process until it is continued
    pub fn suspend(&mut self) -> Result<()> {
        match self {
            TuiEnum::Crossterm(tui) => tui.suspend(),
            TuiEnum::Test(_) => Ok(()),
        }
    }

    pub fn resume(&mut self) -> Result<()> {
        match self {
            TuiEnum::Crossterm(tui) => tui.resume(),
            TuiEnum::Test(_) => Ok(()),
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        match self {
            TuiEnum::Crossterm(tui) => tui.clear().map_err(Into::into),
            TuiEnum::Test(tui) => tui.clear().map_err(Into::into),
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        match self {
            TuiEnum::Crossterm(tui) => tui.next().await,
            TuiEnum::Test(_) => Ok(Event::Tick),
        }
    }

    pub fn draw(&mut self, f: impl FnOnce(&mut Frame)) -> Result<()> {
        match self {
            TuiEnum::Crossterm(tui) => tui.draw(f).map(|_| ()).map_err(Into::into),
            TuiEnum::Test(tui) => tui.draw(f).map(|_| ()).map_err(Into::into),
        }
    }
}

pub struct Tui {
    pub terminal: ratatui::Terminal<CrosstermBackend<Stderr>>,
    pub task: JoinHandle<()>,
    pub cancellation_token: CancellationToken,
    pub event_rx: UnboundedReceiver<Event>,
    pub event_tx: UnboundedSender<Event>,
    pub frame_rate: f64,
    pub tick_rate: f64,
    pub mouse: bool,
    pub paste: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal = ratatui::Terminal::new(CrosstermBackend::new(stderr()))?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            task: tokio::spawn(async {}),
            cancellation_token: CancellationToken::new(),
            event_rx,
            event_tx,
            frame_rate: 60.0,
            tick_rate: 4.0,
            mouse: false,
            paste: false,
        })
    }

    pub fn tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn mouse(mut self, mouse: bool) -> Self {
        self.mouse = mouse;
        self
    }

    pub fn paste(mut self, paste: bool) -> Self {
        self.paste = paste;
        self
    }

    /// Spawn the task forwarding terminal input, ticks and frames as events
    pub fn start(&mut self) {
        let tick_delay = Duration::from_secs_f64(1.0 / self.tick_rate);
        let render_delay = Duration::from_secs_f64(1.0 / self.frame_rate);
        self.cancel();
        self.cancellation_token = CancellationToken::new();
        let cancellation_token = self.cancellation_token.clone();
        let event_tx = self.event_tx.clone();
        self.task = tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_delay);
            let mut render_interval = tokio::time::interval(render_delay);
            // the receiver only goes away when the app is shutting down
            let send = |event: Event| {
                let _ = event_tx.send(event);
            };
            send(Event::Init);
            loop {
                let tick_delay = tick_interval.tick();
                let render_delay = render_interval.tick();
                let crossterm_event = reader.next().fuse();
                tokio::select! {
                  _ = cancellation_token.cancelled() => {
                    break;
                  }
                  maybe_event = crossterm_event => {
                    match maybe_event {
                      Some(Ok(evt)) => match evt {
                        CrosstermEvent::Key(key) => {
                          if key.kind == KeyEventKind::Press {
                            send(Event::Key(key));
                          }
                        },
                        CrosstermEvent::Mouse(mouse) => send(Event::Mouse(mouse)),
                        CrosstermEvent::Resize(x, y) => send(Event::Resize(x, y)),
                        CrosstermEvent::FocusLost => send(Event::FocusLost),
                        CrosstermEvent::FocusGained => send(Event::FocusGained),
                        CrosstermEvent::Paste(s) => send(Event::Paste(s)),
                      },
                      Some(Err(e)) => {
                        error!("Failed to read terminal event: {e}");
                        send(Event::Error);
                      }
                      None => {},
                    }
                  },
                  _ = tick_delay => send(Event::Tick),
                  _ = render_delay => send(Event::Render),
                }
            }
        });
    }

    /// Cancel the event task, aborting it if it does not stop in time
    pub fn stop(&self) -> Result<()> {
        self.cancel();
        let mut counter = 0;
        while !self.task.is_finished() {
            std::thread::sleep(Duration::from_millis(1));
            counter += 1;
            if counter > 50 {
                self.task.abort();
            }
            if counter > 100 {
                error!("Failed to abort task in 100 milliseconds for unknown reason");
                break;
            }
        }
        Ok(())
    }

    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(stderr(), EnterAlternateScreen, cursor::Hide)?;
        if self.mouse {
            crossterm::execute!(stderr(), EnableMouseCapture)?;
        }
        if self.paste {
            crossterm::execute!(stderr(), EnableBracketedPaste)?;
        }
        trace!(mouse = self.mouse, paste = self.paste, "Entered terminal");
        self.start();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stop()?;
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.flush()?;
            if self.paste {
                crossterm::execute!(stderr(), DisableBracketedPaste)?;
            }
            if self.mouse {
                crossterm::execute!(stderr(), DisableMouseCapture)?;
            }
            crossterm::execute!(stderr(), LeaveAlternateScreen, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    pub fn suspend(&mut self) -> Result<()> {
        self.exit()?;
        #[cfg(not(windows))]
        signal_hook::low_level::raise(signal_hook::consts::signal::SIGTSTP)?;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.enter()?;
        Ok(())
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.event_rx
            .recv()
            .await
            .ok_or_else(|| eyre!("Unable to get event"))
    }
}

impl Deref for Tui {
    type Target = ratatui::Terminal<CrosstermBackend<Stderr>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            error!("Failed to restore terminal: {e:?}");
        }
    }
}

/// An off-screen terminal of fixed size
pub struct TestTui {
    pub terminal: ratatui::Terminal<TestBackend>,
}

impl TestTui {
    pub fn new(width: u16, height: u16) -> Result<Self> {
        let terminal = ratatui::Terminal::new(TestBackend::new(width, height))?;
        Ok(Self { terminal })
    }
}

impl Deref for TestTui {
    type Target = ratatui::Terminal<TestBackend>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TestTui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

#[cfg(test)]
impl TuiEnum {
    /// The in-memory backend; panics on a real terminal
    pub fn backend(&self) -> &TestBackend {
        match self {
            TuiEnum::Crossterm(_) => panic!("Not a test backend"),
            TuiEnum::Test(tui) => tui.backend(),
        }
    }
}
