pub(crate) mod layer_manager;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use layer_manager::{EventHandlingStatus, LayerManager};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::{
    actions::{Action, Layers},
    config::Config,
    tui::{Event, TuiEnum},
};

pub struct RootState {
    pub should_quit: bool,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,

    pub config: Config,
}

impl RootState {
    pub fn new(config: Config) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            should_quit: false,
            action_tx,
            action_rx,
            config,
        }
    }
}

pub struct App {
    layers: LayerManager,
    state: RootState,
    tui: TuiEnum,
}

impl App {
    pub fn new(state: RootState, tui: TuiEnum) -> Result<Self> {
        let start = Layers::Gallery(state.config.gallery.start_story.clone());
        let layer = LayerManager::get_layer(&start, &state)
            .ok_or_else(|| color_eyre::eyre::eyre!("Failed to build the gallery"))?;
        Ok(Self {
            layers: LayerManager::new(layer),
            state,
            tui,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;

        loop {
            let event = self.tui.next().await?;
            self.handle_event(event);

            while let Ok(action) = self.state.action_rx.try_recv() {
                self.perform_action(action)?;
            }

            // application exit
            if self.state.should_quit {
                break;
            }
        }

        self.tui.exit()?;
        Ok(())
    }

    /// Turn a terminal event into actions.
    ///
    /// Timer and system events map to app-wide actions, everything else goes
    /// to the top layer first. Ctrl+C always quits; `q` quits only when the
    /// layer did not use it, so it stays typeable in a search field.
    fn handle_event(&mut self, event: Event) {
        let tx = &self.state.action_tx;
        let app_action = match &event {
            Event::Tick => Some(Action::Tick),
            Event::Render => Some(Action::Render),
            Event::Resize(width, height) => {
                debug!(width, height, "Terminal resized");
                Some(Action::Render)
            }
            Event::Error => Some(Action::Quit),
            Event::Init | Event::FocusGained | Event::FocusLost => None,
            Event::Key(key) if key.modifiers == KeyModifiers::CONTROL => match key.code {
                KeyCode::Char('c') => Some(Action::Quit),
                KeyCode::Char('z') => Some(Action::Suspend),
                _ => None,
            },
            _ => None,
        };
        if let Some(action) = app_action {
            let _ = tx.send(action);
            return;
        }

        let status = self.layers.handle_event(&event);
        if let (EventHandlingStatus::Ignored, Event::Key(key)) = (status, &event) {
            if key.code == KeyCode::Char('q') && key.modifiers == KeyModifiers::NONE {
                let _ = self.state.action_tx.send(Action::Quit);
            }
        }
    }

    /// Apply an action. The only place where application state changes.
    fn perform_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Tick => {}
            Action::Quit => {
                info!("Quitting");
                self.state.should_quit = true;
            }
            Action::Render => {
                self.tui.draw(|f| {
                    self.layers.render(f);
                })?;
            }
            Action::ClearScreen => self.tui.clear()?,
            Action::Suspend => {
                debug!("Suspending");
                self.tui.suspend()?;
                let _ = self.state.action_tx.send(Action::Resume);
                let _ = self.state.action_tx.send(Action::ClearScreen);
            }
            Action::Resume => self.tui.resume()?,
            Action::Layer(action) => {
                self.layers.handle_layer_action(&action, &self.state);
            }
            _ => self.layers.handle_action(&action),
        }
        Ok(())
    }
}
