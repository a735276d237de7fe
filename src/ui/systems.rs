use crate::grass::events::GrassCommandEvent;
use crate::grass::resources::GrassSettings;
use crate::ui::resources::{ControlPanelState, PointerOverPanel};
use bevy::app::AppExit;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use grassgen::controls::{ControlField, ControlPanel, FieldCommand};

pub fn setup_control_panel(mut commands: Commands, settings: Res<GrassSettings>) {
    let limits = settings.config.controls;
    let field = limits.clamp(settings.config.field);
    commands.insert_resource(ControlPanelState::new(
        ControlPanel::from_config(&field),
        limits,
    ));
}

pub fn render_control_panel(
    mut contexts: EguiContexts,
    mut state: ResMut<ControlPanelState>,
    mut pointer_over_panel: ResMut<PointerOverPanel>,
    mut grass_commands: MessageWriter<GrassCommandEvent>,
    mut app_exit_events: MessageWriter<AppExit>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let limits = state.limits;
    let mut dragging = false;
    let mut buttons = Vec::new();

    egui::SidePanel::right("grass_panel")
        .default_width(280.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Grass Field");
            ui.add_space(10.0);

            let panel = &mut state.current;

            ui.label(ControlField::Width.label());
            dragging |= ui
                .add(egui::Slider::new(&mut panel.width, limits.size_range()).step_by(1.0))
                .dragged();

            ui.label(ControlField::Height.label());
            dragging |= ui
                .add(egui::Slider::new(&mut panel.height, limits.size_range()).step_by(1.0))
                .dragged();

            ui.label(ControlField::BladeCount.label());
            dragging |= ui
                .add(
                    egui::Slider::new(&mut panel.blade_count, limits.blade_range())
                        .logarithmic(true),
                )
                .dragged();

            ui.label(ControlField::WindStrength.label());
            dragging |= ui
                .add(egui::Slider::new(&mut panel.wind_strength, 0.0..=1.0).step_by(0.01))
                .dragged();

            ui.add_space(10.0);
            ui.checkbox(&mut panel.ground_visible, ControlField::GroundVisible.label());
            ui.checkbox(&mut panel.grass_rotate, ControlField::GrassRotate.label());

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if ui.button("Rebuild").clicked() {
                    buttons.push(FieldCommand::Rebuild);
                }
                if ui.button("Remove").clicked() {
                    buttons.push(FieldCommand::Remove);
                }
            });

            ui.add_space(20.0);
            if ui.button("Quit").clicked() {
                app_exit_events.write(AppExit::Success);
            }
        });

    pointer_over_panel.0 = ctx.is_pointer_over_area() || ctx.wants_pointer_input();

    // a slider commits once it is let go
    if !dragging {
        for command in state.commit() {
            grass_commands.write(GrassCommandEvent(command));
        }
    }
    for command in buttons {
        grass_commands.write(GrassCommandEvent(command));
    }
}
