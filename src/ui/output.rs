use std::borrow::Cow;

use eframe::egui::{
    self, load::SizedTexture, vec2, Response, Sense, TextureHandle, TextureOptions, Ui, Vec2,
};
use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::state::Output;

// ---------------------------------------------------------------------------
// Output presenter (central panel, below the controls)
// ---------------------------------------------------------------------------

/// Owns the GPU texture for the current stereograph.
#[derive(Default)]
pub struct Presenter {
    texture: Option<TextureHandle>,
    revision: Option<u64>,
    native_size: Vec2,
}

impl Presenter {
    /// Bring the texture in line with `output`, releasing the previous one
    /// before a new one is uploaded.
    pub fn sync(&mut self, ctx: &egui::Context, output: Option<&Output>) {
        let Some(output) = output else {
            if self.texture.take().is_some() {
                log::debug!("Released stereograph texture");
            }
            self.revision = None;
            return;
        };
        if self.revision == Some(output.revision) {
            return;
        }

        self.texture = None;

        let max_side = ctx.input(|i| i.max_texture_side);
        let display = fit_for_display(&output.image, max_side);
        let size = [display.width() as usize, display.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, display.as_raw());

        self.texture = Some(ctx.load_texture(
            format!("stereograph-{}", output.revision),
            image,
            TextureOptions::NEAREST,
        ));
        self.native_size = vec2(output.image.width() as f32, output.image.height() as f32);
        self.revision = Some(output.revision);
    }

    pub fn is_visible(&self) -> bool {
        self.texture.is_some()
    }

    /// Draw at native size, shrunk to the available width. Hidden (returns
    /// `None`) until something has been generated.
    pub fn show(&self, ui: &mut Ui) -> Option<Response> {
        let texture = self.texture.as_ref()?;
        let image = egui::Image::new(SizedTexture::new(texture.id(), self.native_size))
            .max_width(ui.available_width())
            .sense(Sense::click());
        Some(ui.add(image))
    }
}

/// Downsample for display when a side exceeds what the GPU accepts.
pub fn fit_for_display(image: &RgbaImage, max_side: usize) -> Cow<'_, RgbaImage> {
    let (w, h) = image.dimensions();
    let longest = w.max(h) as usize;
    if longest <= max_side || max_side == 0 {
        return Cow::Borrowed(image);
    }
    let ratio = max_side as f64 / longest as f64;
    let fit = |len: u32| ((f64::from(len) * ratio).round() as u32).clamp(1, max_side as u32);
    let (tw, th) = (fit(w), fit(h));
    Cow::Owned(imageops::resize(image, tw, th, FilterType::Nearest))
}
