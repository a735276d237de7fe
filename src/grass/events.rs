use bevy::prelude::*;
use grassgen::controls::FieldCommand;

/// Request for the active grass field, produced by the control panel
#[derive(Message, Debug, Clone, Copy)]
pub struct GrassCommandEvent(pub FieldCommand);
