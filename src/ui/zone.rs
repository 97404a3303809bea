use eframe::egui::{
    self, pos2, Color32, CursorIcon, DroppedFile, Id, Pos2, Rect, Response, RichText, Sense,
    Shape, Stroke, TextStyle, TextWrapMode, TextureHandle, TextureOptions, Ui, Vec2, WidgetText,
};

use crate::color::{self, HINT_TEXT};
use crate::data::loader::{self, ImageSource};
use crate::data::model::{Bitmap, LoadOrigin, Side, Slot, SlotState};

// ---------------------------------------------------------------------------
// Drop zone widget
// ---------------------------------------------------------------------------

/// One image slot on screen: click to browse, drop a file, see a preview.
pub struct DropZone {
    side: Side,
    /// Bitmap the preview texture was made from.
    thumbnail: Option<(Bitmap, TextureHandle)>,
    /// Where the zone was drawn last frame, for drop targeting.
    rect: Option<Rect>,
}

impl DropZone {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            thumbnail: None,
            rect: None,
        }
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.rect.is_some_and(|r| r.contains(pos))
    }

    /// Draw the zone for `slot`. `highlighted` is the drag-over state.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        slot: &Slot,
        size: Vec2,
        thumbnail_side: u32,
        highlighted: bool,
    ) -> Response {
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
        self.rect = Some(rect);

        let t = ui
            .ctx()
            .animate_bool(Id::new(("drop-zone-highlight", self.side)), highlighted);
        let colors = color::zone_colors(t);
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, colors.fill);

        match slot.state() {
            SlotState::Ready(bitmap) => {
                let texture = self.thumbnail_for(ui.ctx(), bitmap, thumbnail_side);
                let uv = cover_uv(texture.size_vec2(), rect.size());
                painter.image(texture.id(), rect, uv, Color32::WHITE);
            }
            SlotState::Empty => {
                self.thumbnail = None;
                centered_text(ui, rect, RichText::new(self.side.prompt()).color(HINT_TEXT));
            }
            SlotState::Loading(origin) => {
                let message = match origin {
                    LoadOrigin::Default => "Loading default image...",
                    LoadOrigin::User => "Loading image...",
                };
                centered_text(ui, rect, RichText::new(message).italics().color(HINT_TEXT));
            }
            SlotState::Failed(message) => {
                self.thumbnail = None;
                centered_text(ui, rect, RichText::new(message).color(Color32::DARK_RED));
            }
        }

        let outline = [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
            rect.left_top(),
        ];
        painter.extend(Shape::dashed_line(
            &outline,
            Stroke::new(2.0, colors.border),
            6.0,
            4.0,
        ));

        response.on_hover_cursor(CursorIcon::PointingHand)
    }

    /// Preview texture for `bitmap`, rebuilt only when the bitmap changes.
    fn thumbnail_for(
        &mut self,
        ctx: &egui::Context,
        bitmap: &Bitmap,
        max_side: u32,
    ) -> &TextureHandle {
        if !matches!(&self.thumbnail, Some((shown, _)) if shown.same(bitmap)) {
            // Dropping the old handle frees its texture.
            self.thumbnail = None;
        }
        let side = self.side;
        let (_, texture) = self.thumbnail.get_or_insert_with(|| {
            let preview = loader::make_thumbnail(bitmap, max_side);
            let size = [preview.width() as usize, preview.height() as usize];
            let image = egui::ColorImage::from_rgba_unmultiplied(size, preview.as_raw());
            let texture = ctx.load_texture(
                format!("thumbnail-{}", side.label()),
                image,
                TextureOptions::LINEAR,
            );
            (bitmap.clone(), texture)
        });
        texture
    }
}

fn centered_text(ui: &Ui, rect: Rect, text: RichText) {
    let galley = WidgetText::from(text).into_galley(
        ui,
        Some(TextWrapMode::Wrap),
        rect.width() - 24.0,
        TextStyle::Body,
    );
    let pos = rect.center() - galley.size() / 2.0;
    ui.painter_at(rect).galley(pos, galley, HINT_TEXT);
}

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

/// UV sub-rectangle that makes an image of `image` size fill a `frame`
/// without distortion, cropping the overflow equally on both sides.
pub fn cover_uv(image: Vec2, frame: Vec2) -> Rect {
    let full = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    if image.x <= 0.0 || image.y <= 0.0 || frame.x <= 0.0 || frame.y <= 0.0 {
        return full;
    }

    let image_aspect = image.x / image.y;
    let frame_aspect = frame.x / frame.y;
    if image_aspect > frame_aspect {
        let margin = (1.0 - frame_aspect / image_aspect) / 2.0;
        Rect::from_min_max(pos2(margin, 0.0), pos2(1.0 - margin, 1.0))
    } else {
        let margin = (1.0 - image_aspect / frame_aspect) / 2.0;
        Rect::from_min_max(pos2(0.0, margin), pos2(1.0, 1.0 - margin))
    }
}

// ---------------------------------------------------------------------------
// Drop routing
// ---------------------------------------------------------------------------

/// Decide which slot each of `count` dropped files goes to.
///
/// A zone under the pointer takes the first file. Without a pointer
/// position, two or more files fill Left then Right, and a single file
/// goes to the first slot not yet ready (Left if both are).
pub fn assign_drops(count: usize, under_pointer: Option<Side>, ready: [bool; 2]) -> Vec<Side> {
    if count == 0 {
        return Vec::new();
    }
    if let Some(side) = under_pointer {
        return vec![side];
    }
    if count >= 2 {
        return Side::ALL.to_vec();
    }
    let target = Side::ALL
        .into_iter()
        .zip(ready)
        .find(|(_, is_ready)| !is_ready)
        .map_or(Side::Left, |(side, _)| side);
    vec![target]
}

/// A dropped file as something the loader understands.
pub fn dropped_source(file: &DroppedFile) -> Option<ImageSource> {
    if let Some(path) = &file.path {
        return Some(ImageSource::Path(path.clone()));
    }
    file.bytes.as_ref().map(|bytes| ImageSource::Bytes {
        name: file.name.clone(),
        bytes: bytes.clone(),
    })
}
