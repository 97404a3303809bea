use eframe::egui::{self, Pos2, ScrollArea, Ui};

use crate::config::AppConfig;
use crate::data::model::Side;
use crate::state::AppState;
use crate::ui::output::Presenter;
use crate::ui::panels;
use crate::ui::zone::{self, DropZone};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct StereographApp {
    pub state: AppState,
    config: AppConfig,
    zones: [DropZone; 2],
    presenter: Presenter,
}

impl StereographApp {
    /// Build the app and start fetching the default images.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let ctx = cc.egui_ctx.clone();
        let mut state = AppState::with_repaint(move || ctx.request_repaint());
        state.load_defaults(&config.asset_dir);

        Self {
            state,
            config,
            zones: Side::ALL.map(DropZone::new),
            presenter: Presenter::default(),
        }
    }

    fn zone_under(&self, pos: Option<Pos2>) -> Option<Side> {
        let pos = pos?;
        Side::ALL
            .into_iter()
            .zip(&self.zones)
            .find(|(_, zone)| zone.contains(pos))
            .map(|(side, _)| side)
    }

    fn ready(&self) -> [bool; 2] {
        Side::ALL.map(|side| self.state.slot(side).is_ready())
    }

    /// Zone that would receive the files currently hovering the window.
    fn drag_target(&self, ctx: &egui::Context) -> Option<Side> {
        let (hovered, pointer) = ctx.input(|i| (i.raw.hovered_files.len(), i.pointer.latest_pos()));
        zone::assign_drops(hovered, self.zone_under(pointer), self.ready())
            .first()
            .copied()
    }

    fn handle_file_drops(&mut self, ctx: &egui::Context) {
        let (dropped, pointer) =
            ctx.input(|i| (i.raw.dropped_files.clone(), i.pointer.latest_pos()));
        if dropped.is_empty() {
            return;
        }

        let targets = zone::assign_drops(dropped.len(), self.zone_under(pointer), self.ready());
        for (side, file) in targets.into_iter().zip(&dropped) {
            match zone::dropped_source(file) {
                Some(source) => {
                    self.state.request_load(side, source);
                }
                None => log::debug!("Ignoring drop without path or data: {}", file.name),
            }
        }
    }

    fn drop_zones(&mut self, ui: &mut Ui, target: Option<Side>) {
        let size = self.config.zone_size;
        let gap = 20.0;
        ui.horizontal(|ui: &mut Ui| {
            ui.add_space(((ui.available_width() - 2.0 * size.x - gap) / 2.0).max(0.0));
            for (i, side) in Side::ALL.into_iter().enumerate() {
                if i > 0 {
                    ui.add_space(gap);
                }
                let slot = self.state.slot(side);
                let response = self.zones[i].show(
                    ui,
                    slot,
                    size,
                    self.config.thumbnail_side,
                    target == Some(side),
                );
                if response.clicked() {
                    panels::open_image_dialog(&mut self.state, side);
                }
            }
        });
    }
}

impl eframe::App for StereographApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_loads();
        self.handle_file_drops(ctx);

        let target = self.drag_target(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: footer ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui);
        });

        self.presenter.sync(ctx, self.state.output.as_ref());

        // ---- Central panel: zones, controls, output ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut scroll = ScrollArea::vertical().auto_shrink([false, false]);
            if target.is_some() {
                // Keep the drop zones in view while dragging files.
                scroll = scroll.vertical_scroll_offset(0.0);
            }

            scroll.show(ui, |ui: &mut Ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.heading("Stereograph Generator");
                });
                ui.add_space(12.0);

                self.drop_zones(ui, target);
                ui.add_space(20.0);

                if panels::control_panel(ui, &mut self.state) {
                    // A failure is logged; NotReady deliberately shows nothing.
                    let _ = self.state.generate();
                    self.presenter.sync(ctx, self.state.output.as_ref());
                }
                ui.add_space(24.0);

                if self.presenter.is_visible() {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.heading("Output Image");
                        if let Some(response) = self.presenter.show(ui) {
                            response.context_menu(|ui: &mut Ui| {
                                if ui.button("Save image as…").clicked() {
                                    panels::save_output_dialog(&mut self.state);
                                    ui.close_menu();
                                }
                            });
                        }
                    });
                }
            });
        });
    }
}
