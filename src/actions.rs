use tracing::error;

use crate::{
    page::{gallery::GalleryAction, help_popup::HelpPopupAction},
    utils::help_msg::HelpMsg,
};

#[derive(Clone, Debug)]
pub enum Action {
    Tick,
    Render,
    /// Redraw everything on the next frame, e.g. after resuming
    ClearScreen,
    Suspend,
    Resume,
    Quit,

    Layer(LayerManageAction),

    Gallery(GalleryAction),
    HelpPopup(HelpPopupAction),
}

#[derive(Clone, Debug)]
pub enum LayerManageAction {
    Push(LayerPushTarget),
    Pop,
}

#[derive(Clone, Debug)]
pub struct LayerPushTarget {
    pub layer: Layers,
    /// Whether the layer below keeps rendering, e.g. under a popup
    pub render_self: bool,
}

#[derive(Clone, Debug, strum::Display)]
pub enum Layers {
    /// The gallery, optionally starting on the story with this id
    Gallery(Option<String>),
    Help(HelpMsg),
}

impl From<LayerManageAction> for Action {
    fn from(value: LayerManageAction) -> Self {
        Action::Layer(value)
    }
}

#[derive(Clone, Debug)]
pub struct ActionSender(pub tokio::sync::mpsc::UnboundedSender<Action>);

impl ActionSender {
    pub fn send<T: Into<Action>>(&self, action: T) {
        if let Err(e) = self.0.send(action.into()) {
            error!(action = ?e.0, "Action receiver is closed");
        }
    }
}
impl From<tokio::sync::mpsc::UnboundedSender<Action>> for ActionSender {
    fn from(value: tokio::sync::mpsc::UnboundedSender<Action>) -> Self {
        ActionSender(value)
    }
}
