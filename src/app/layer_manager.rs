use std::ops::{Deref, DerefMut};

use ratatui::Frame;
use tracing::{info, warn};

use super::RootState;
use crate::{
    actions::{Action, LayerManageAction, Layers},
    page::{Layer, gallery::Gallery, help_popup::HelpPopup},
    tui::Event,
};

/// Whether a layer (or a widget inside it) used an event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventHandlingStatus {
    Consumed,
    Ignored,
}

pub(super) struct BoxedLayer(Box<dyn Layer>);
impl Deref for BoxedLayer {
    type Target = dyn Layer;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
impl DerefMut for BoxedLayer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.0
    }
}
impl From<Box<dyn Layer>> for BoxedLayer {
    fn from(layer: Box<dyn Layer>) -> Self {
        Self(layer)
    }
}

pub(super) struct LayerConfig {
    layer: BoxedLayer,
    /// Lower layers stop rendering when something opaque is pushed on top
    render: bool,
}

pub(super) struct LayerManager {
    layers: Vec<LayerConfig>,
}

impl LayerManager {
    pub(super) fn new(layer: BoxedLayer) -> Self {
        Self {
            layers: vec![LayerConfig {
                layer,
                render: true,
            }],
        }
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.layers.len()
    }

    pub(super) fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        self.layers
            .iter_mut()
            .filter(|config| config.render)
            .for_each(|config| config.layer.render(f, area));
    }

    /// Only the top layer sees events
    pub(super) fn handle_event(&mut self, event: &Event) -> EventHandlingStatus {
        match self.layers.last_mut() {
            Some(config) => config.layer.handle_events(event),
            None => EventHandlingStatus::Ignored,
        }
    }

    /// Apply a [`LayerManageAction`], updating the layer stack
    pub(super) fn handle_layer_action(&mut self, action: &LayerManageAction, state: &RootState) {
        match action {
            LayerManageAction::Push(target) => {
                let Some(layer) = LayerManager::get_layer(&target.layer, state) else {
                    return;
                };
                if let Some(top) = self.layers.last_mut() {
                    top.render = target.render_self;
                }
                self.layers.push(LayerConfig {
                    layer,
                    render: true,
                });
                info!(
                    "Pushing a {} layer, current layer will {} render, new layer stack length {}",
                    target.layer,
                    if target.render_self { "still" } else { "not" },
                    self.layers.len()
                );
            }
            LayerManageAction::Pop => {
                if self.layers.len() <= 1 {
                    warn!("Refusing to pop the last layer");
                    return;
                }
                self.layers.pop();
                if let Some(top) = self.layers.last_mut() {
                    top.render = true;
                }
                info!("Popping layer, current layer stack length {}", self.layers.len());
            }
        }
    }

    /// Pass the action to the top layer
    pub(super) fn handle_action(&mut self, action: &Action) {
        if let Some(config) = self.layers.last_mut() {
            config.layer.update(action);
        }
    }

    /// Build a new layer of the given type
    pub(super) fn get_layer(layer: &Layers, state: &RootState) -> Option<BoxedLayer> {
        let mut page = match layer {
            Layers::Gallery(start) => Box::new(Gallery::new(
                state.action_tx.clone().into(),
                start.as_deref(),
                state.config.gallery.event_log_len,
            )) as Box<dyn Layer>,
            Layers::Help(help_msg) => {
                match HelpPopup::new(state.action_tx.clone().into(), help_msg.clone()) {
                    Some(help) => Box::new(help) as Box<dyn Layer>,
                    None => {
                        warn!("Help message is empty");
                        return None;
                    }
                }
            }
        };
        page.init();
        Some(page.into())
    }

    #[cfg(test)]
    pub(super) fn top_is<T: Layer>(&self) -> bool {
        self.layers
            .last()
            .is_some_and(|config| config.layer.0.is::<T>())
    }

    #[cfg(test)]
    pub(super) fn top<T: Layer>(&self) -> Option<&T> {
        self.layers
            .last()
            .and_then(|config| config.layer.0.downcast_ref::<T>())
    }
}
