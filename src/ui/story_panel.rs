use eframe::egui;
use egui::{Color32, RichText};

use super::app::StoryApp;
use crate::engine::protocol::EngineCommand;

/// The window has exactly two choice slots. Extra authored options stay in
/// the data but are never wired to a button.
const CHOICE_SLOTS: usize = 2;

pub fn draw_story_panel(ctx: &egui::Context, app: &mut StoryApp) {
    // ---------- Status + choice bar ----------
    egui::TopBottomPanel::bottom("choice_bar").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.label(RichText::new(format!("Node: {}", app.ui.node_id)).weak());

        let mut picked: Option<String> = None;
        ui.horizontal(|ui| {
            for choice in app.ui.choices.iter().take(CHOICE_SLOTS) {
                if ui.button(&choice.label).clicked() {
                    picked = Some(choice.target.clone());
                }
            }
        });
        ui.add_space(4.0);

        if let Some(target) = picked {
            app.send_command(EngineCommand::Choose { target });
        }
    });

    // ---------- Story text ----------
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(&app.ui.text);

                if app.ui.generating {
                    ui.add_space(8.0);
                    ui.label(RichText::new("(Generating…)").italics().weak());
                }
            });
    });

    draw_error_window(ctx, app);
}

fn draw_error_window(ctx: &egui::Context, app: &mut StoryApp) {
    let Some(message) = app.ui.error.clone() else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new("Generation Error")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(RichText::new(message).color(Color32::LIGHT_RED));
            ui.add_space(6.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        app.ui.error = None;
    }
}
