use crate::config::{ControlLimits, FieldConfig};

/// Values shown on the control surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPanel {
    pub width: f32,
    pub height: f32,
    pub blade_count: u32,
    pub wind_strength: f32,
    pub ground_visible: bool,
    pub grass_rotate: bool,
}

impl ControlPanel {
    pub fn from_config(config: &FieldConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            blade_count: config.blade_count,
            wind_strength: config.wind_strength,
            ground_visible: true,
            grass_rotate: config.rotation_enabled,
        }
    }

    /// Fields whose value differs between `self` and `previous`
    pub fn changed_fields(&self, previous: &ControlPanel) -> Vec<ControlField> {
        ControlField::ALL
            .into_iter()
            .filter(|field| field.differs(self, previous))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlField {
    Width,
    Height,
    BladeCount,
    WindStrength,
    GroundVisible,
    GrassRotate,
}

impl ControlField {
    pub const ALL: [ControlField; 6] = [
        ControlField::Width,
        ControlField::Height,
        ControlField::BladeCount,
        ControlField::WindStrength,
        ControlField::GroundVisible,
        ControlField::GrassRotate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ControlField::Width => "Width",
            ControlField::Height => "Height",
            ControlField::BladeCount => "Grass Blades",
            ControlField::WindStrength => "Wind Strength",
            ControlField::GroundVisible => "Ground",
            ControlField::GrassRotate => "Grass Rotate",
        }
    }

    fn differs(self, a: &ControlPanel, b: &ControlPanel) -> bool {
        match self {
            ControlField::Width => a.width != b.width,
            ControlField::Height => a.height != b.height,
            ControlField::BladeCount => a.blade_count != b.blade_count,
            ControlField::WindStrength => a.wind_strength != b.wind_strength,
            ControlField::GroundVisible => a.ground_visible != b.ground_visible,
            ControlField::GrassRotate => a.grass_rotate != b.grass_rotate,
        }
    }
}

/// Operation requested from the field (or the ground) by a control change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldCommand {
    Resize { width: f32, height: f32 },
    SetBladeCount(u32),
    SetWindStrength(f32),
    SetGrassRotate(bool),
    SetGroundVisible(bool),
    Rebuild,
    Remove,
}

pub type ControlHandler = fn(&ControlPanel, &ControlLimits) -> Vec<FieldCommand>;

/// One handler per configurable field
pub const CONTROL_HANDLERS: [(ControlField, ControlHandler); 6] = [
    (ControlField::Width, on_size_changed),
    (ControlField::Height, on_size_changed),
    (ControlField::BladeCount, on_blade_count_changed),
    (ControlField::WindStrength, on_wind_strength_changed),
    (ControlField::GroundVisible, on_ground_visible_changed),
    (ControlField::GrassRotate, on_grass_rotate_changed),
];

pub fn handler_for(field: ControlField) -> ControlHandler {
    CONTROL_HANDLERS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, handler)| *handler)
        .unwrap_or(ignore_change)
}

/// Run the handler of every changed field, in table order
pub fn dispatch(
    changed: &[ControlField],
    panel: &ControlPanel,
    limits: &ControlLimits,
) -> Vec<FieldCommand> {
    let mut commands = Vec::new();
    for field in changed {
        for command in handler_for(*field)(panel, limits) {
            if !commands.contains(&command) {
                commands.push(command);
            }
        }
    }
    commands
}

fn ignore_change(_: &ControlPanel, _: &ControlLimits) -> Vec<FieldCommand> {
    Vec::new()
}

fn on_size_changed(panel: &ControlPanel, limits: &ControlLimits) -> Vec<FieldCommand> {
    let range = limits.size_range();
    vec![
        FieldCommand::Resize {
            width: panel.width.clamp(*range.start(), *range.end()),
            height: panel.height.clamp(*range.start(), *range.end()),
        },
        FieldCommand::Rebuild,
    ]
}

fn on_blade_count_changed(panel: &ControlPanel, limits: &ControlLimits) -> Vec<FieldCommand> {
    let range = limits.blade_range();
    vec![
        FieldCommand::SetBladeCount(panel.blade_count.clamp(*range.start(), *range.end())),
        FieldCommand::Rebuild,
    ]
}

fn on_wind_strength_changed(panel: &ControlPanel, _: &ControlLimits) -> Vec<FieldCommand> {
    vec![FieldCommand::SetWindStrength(
        panel.wind_strength.clamp(0.0, 1.0),
    )]
}

fn on_ground_visible_changed(panel: &ControlPanel, _: &ControlLimits) -> Vec<FieldCommand> {
    vec![FieldCommand::SetGroundVisible(panel.ground_visible)]
}

fn on_grass_rotate_changed(panel: &ControlPanel, _: &ControlLimits) -> Vec<FieldCommand> {
    vec![
        FieldCommand::SetGrassRotate(panel.grass_rotate),
        FieldCommand::Rebuild,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn panel() -> ControlPanel {
        ControlPanel::from_config(&FieldConfig::new(10.0, 10.0, 5, 0.5))
    }

    #[test]
    fn test_every_field_has_a_handler() {
        for field in ControlField::ALL {
            assert!(
                CONTROL_HANDLERS.iter().any(|(f, _)| *f == field),
                "{} has no handler",
                field.label()
            );
        }
    }

    #[test]
    fn test_no_change_no_commands() {
        let p = panel();
        assert!(p.changed_fields(&p).is_empty());
    }

    #[rstest]
    #[case(ControlField::Width)]
    #[case(ControlField::Height)]
    #[case(ControlField::BladeCount)]
    #[case(ControlField::GrassRotate)]
    fn test_rebuilding_fields(#[case] field: ControlField) {
        let commands = handler_for(field)(&panel(), &ControlLimits::default());
        assert_eq!(commands.last(), Some(&FieldCommand::Rebuild));
    }

    #[test]
    fn test_wind_strength_updates_in_place() {
        let mut p = panel();
        p.wind_strength = 0.8;

        let commands = dispatch(
            &p.changed_fields(&panel()),
            &p,
            &ControlLimits::default(),
        );

        assert_eq!(commands, vec![FieldCommand::SetWindStrength(0.8)]);
    }

    #[test]
    fn test_resize_both_axes_rebuilds_once() {
        let mut p = panel();
        p.width = 20.0;
        p.height = 30.0;

        let commands = dispatch(
            &p.changed_fields(&panel()),
            &p,
            &ControlLimits::default(),
        );

        assert_eq!(
            commands,
            vec![
                FieldCommand::Resize {
                    width: 20.0,
                    height: 30.0
                },
                FieldCommand::Rebuild
            ]
        );
    }

    #[test]
    fn test_handlers_clamp_to_limits() {
        let mut p = panel();
        p.blade_count = 5_000_000;
        p.width = 0.0;

        let limits = ControlLimits::default();
        assert_eq!(
            handler_for(ControlField::BladeCount)(&p, &limits)[0],
            FieldCommand::SetBladeCount(1_000_000)
        );
        assert_eq!(
            handler_for(ControlField::Width)(&p, &limits)[0],
            FieldCommand::Resize {
                width: 1.0,
                height: 10.0
            }
        );
    }

    #[test]
    fn test_ground_toggle_does_not_touch_grass() {
        let mut p = panel();
        p.ground_visible = false;

        let commands = dispatch(
            &p.changed_fields(&panel()),
            &p,
            &ControlLimits::default(),
        );

        assert_eq!(commands, vec![FieldCommand::SetGroundVisible(false)]);
        assert!(!commands.contains(&FieldCommand::Rebuild));
    }

    #[test]
    fn test_panel_starts_from_config() {
        let config = FieldConfig::new(12.0, 8.0, 40, 0.3).with_rotation(true);
        let p = ControlPanel::from_config(&config);

        assert_eq!((p.width, p.height), (12.0, 8.0));
        assert_eq!(p.blade_count, 40);
        assert_eq!(p.wind_strength, 0.3);
        assert!(p.grass_rotate);
        assert!(p.ground_visible);
    }
}
