use bevy::prelude::*;
use grassgen::config::ControlLimits;
use grassgen::controls::{ControlPanel, FieldCommand, dispatch};

/// Slider and checkbox values, plus the last values turned into commands
#[derive(Resource, Debug, Clone)]
pub struct ControlPanelState {
    pub current: ControlPanel,
    pub committed: ControlPanel,
    pub limits: ControlLimits,
}

impl ControlPanelState {
    pub fn new(panel: ControlPanel, limits: ControlLimits) -> Self {
        Self {
            current: panel,
            committed: panel,
            limits,
        }
    }

    /// Commands for everything edited since the last commit
    pub fn commit(&mut self) -> Vec<FieldCommand> {
        let changed = self.current.changed_fields(&self.committed);
        if changed.is_empty() {
            return Vec::new();
        }
        let commands = dispatch(&changed, &self.current, &self.limits);
        self.committed = self.current;
        commands
    }
}

/// Set while the pointer is over egui, so the camera leaves the input alone
#[derive(Resource, Debug, Default)]
pub struct PointerOverPanel(pub bool);
