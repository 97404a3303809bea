use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::compose::MAX_SCALE;
use crate::data::loader::{self, ImageSource};
use crate::data::model::Side;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            for side in Side::ALL {
                let label = match side {
                    Side::Left => "Open Left…",
                    Side::Right => "Open Right…",
                };
                if ui.button(label).clicked() {
                    open_image_dialog(state, side);
                    ui.close_menu();
                }
            }
            ui.separator();
            if ui
                .add_enabled(state.output.is_some(), egui::Button::new("Save Output…"))
                .clicked()
            {
                save_output_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(output) = &state.output {
            ui.label(format!(
                "{}×{} stereograph",
                output.image.width(),
                output.image.height()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Control panel
// ---------------------------------------------------------------------------

/// Scale and flip controls plus the generate button. Returns whether
/// generation was requested.
pub fn control_panel(ui: &mut Ui, state: &mut AppState) -> bool {
    ui.horizontal(|ui: &mut Ui| {
        let width = 260.0;
        ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));

        ui.vertical(|ui: &mut Ui| {
            ui.label("Image Scale");
            ui.add(
                egui::DragValue::new(&mut state.settings.scale)
                    .speed(0.01)
                    .range(0.01..=MAX_SCALE)
                    .fixed_decimals(2),
            );
        });
        ui.add_space(20.0);
        ui.vertical(|ui: &mut Ui| {
            ui.label("Flip Images");
            ui.checkbox(&mut state.settings.flip, "");
        });
    });
    ui.add_space(16.0);

    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(egui::Button::new(RichText::new("Generate Stereograph").size(16.0)))
            .clicked()
    })
    .inner
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub fn footer(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("© Copyright lavaboosted").size(14.0).color(Color32::GRAY));
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Let the user pick an image for `side` and start loading it.
pub fn open_image_dialog(state: &mut AppState, side: Side) {
    let extensions = loader::picker_extensions();
    let file = rfd::FileDialog::new()
        .set_title(format!("Open {} image", side.label()))
        .add_filter("Images", extensions.as_slice())
        .pick_file();

    if let Some(path) = file {
        state.request_load(side, ImageSource::Path(path));
    }
}

pub fn save_output_dialog(state: &mut AppState) {
    let file: Option<PathBuf> = rfd::FileDialog::new()
        .set_title("Save stereograph")
        .set_file_name("stereograph.png")
        .add_filter("PNG", &["png"])
        .add_filter("JPEG", &["jpg", "jpeg"])
        .save_file();

    if let Some(path) = file {
        match state.save_output(&path) {
            Ok(_) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to save stereograph: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
