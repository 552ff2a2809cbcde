//! Pages are the layers stacked by the [`LayerManager`](crate::app::layer_manager).
//!
//! A page turns events into [`Action`]s on its sender, and only changes its
//! own state when those actions come back through [`EventLoopParticipant::update`].

use downcast_rs::{DowncastSync, impl_downcast};
use ratatui::{Frame, layout::Rect};

use crate::{actions::Action, app::layer_manager::EventHandlingStatus, tui::Event};

pub(crate) mod gallery;
pub(crate) mod help_popup;

/// A UI layer of the application.
///
/// Layers must be `Send + Sync` and can be downcast back to the concrete page.
pub(crate) trait Layer: WidgetExt + EventLoopParticipant + DowncastSync {
    /// Called once after the layer is created
    fn init(&mut self) {}
}
impl_downcast!(sync Layer);

pub(crate) trait WidgetExt {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

pub(crate) trait EventLoopParticipant {
    #[must_use]
    fn handle_events(&mut self, event: &Event) -> EventHandlingStatus;

    fn update(&mut self, action: &Action);

    /// Feed one event, then every action it caused, back into the page.
    #[cfg(test)]
    fn event_loop_once(
        &mut self,
        rx: &mut tokio::sync::mpsc::UnboundedReceiver<Action>,
        event: Event,
    ) -> EventHandlingStatus {
        let status = self.handle_events(&event);
        while let Ok(action) = rx.try_recv() {
            self.update(&action);
        }
        status
    }
}
