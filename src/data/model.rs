use std::fmt;
use std::sync::Arc;

use image::RgbaImage;

use super::error::LoadError;

// ---------------------------------------------------------------------------
// Side – which eye an image belongs to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "LEFT",
            Side::Right => "RIGHT",
        }
    }

    /// Placeholder text shown in an empty drop zone.
    pub fn prompt(self) -> &'static str {
        match self {
            Side::Left => "Drop LEFT Image Here",
            Side::Right => "Drop RIGHT Image Here",
        }
    }

    /// Bundled image looked up next to the application at startup.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Side::Left => "LeftEye.jpg",
            Side::Right => "RightEye.jpg",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Bitmap – an immutable decoded image
// ---------------------------------------------------------------------------

/// A decoded RGBA8 image. Cloning shares the pixels; nothing mutates them.
#[derive(Clone)]
pub struct Bitmap(Arc<RgbaImage>);

impl Bitmap {
    pub fn new(image: RgbaImage) -> Self {
        Bitmap(Arc::new(image))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.0
    }

    /// Whether both handles share the same pixel buffer.
    pub fn same(&self, other: &Bitmap) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<RgbaImage> for Bitmap {
    fn from(image: RgbaImage) -> Self {
        Bitmap::new(image)
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitmap({}x{})", self.width(), self.height())
    }
}

// ---------------------------------------------------------------------------
// Slot – per-side load lifecycle
// ---------------------------------------------------------------------------

/// Where a load was started from. Only affects messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    User,
    Default,
}

/// Identifies one load attempt on a slot. Later attempts get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(u64);

#[derive(Debug, Clone)]
pub enum SlotState {
    Empty,
    Loading(LoadOrigin),
    Ready(Bitmap),
    /// Message shown inline in the zone.
    Failed(String),
}

#[derive(Debug)]
pub struct Slot {
    pub side: Side,
    state: SlotState,
    /// Token of the load whose result is still awaited.
    pending: Option<LoadToken>,
    issued: u64,
}

impl Slot {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            state: SlotState::Empty,
            pending: None,
            issued: 0,
        }
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        match &self.state {
            SlotState::Ready(bitmap) => Some(bitmap),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.bitmap().is_some()
    }

    /// Start a new load. Any load still in flight becomes stale.
    pub fn begin_load(&mut self, origin: LoadOrigin) -> LoadToken {
        self.issued += 1;
        let token = LoadToken(self.issued);
        self.pending = Some(token);
        self.state = SlotState::Loading(origin);
        token
    }

    /// Apply the outcome of the load identified by `token`.
    ///
    /// Returns `false` (and drops the result) when a newer load has been
    /// started since, or when no load is pending.
    pub fn finish(&mut self, token: LoadToken, result: Result<Bitmap, LoadError>) -> bool {
        if self.pending != Some(token) {
            log::debug!("Discarding superseded {} load {token:?}", self.side);
            return false;
        }
        self.pending = None;
        self.state = match result {
            Ok(bitmap) => SlotState::Ready(bitmap),
            Err(e) => SlotState::Failed(e.to_string()),
        };
        true
    }
}

// ---------------------------------------------------------------------------
// Settings – control panel values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Uniform factor applied to both images before placement.
    pub scale: f64,
    /// Put the right-eye image on the left (cross-view).
    pub flip: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            flip: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(w: u32, h: u32) -> Bitmap {
        Bitmap::new(RgbaImage::new(w, h))
    }

    #[test]
    fn new_slot_is_empty() {
        let slot = Slot::new(Side::Left);
        assert!(matches!(slot.state(), SlotState::Empty));
        assert!(!slot.is_ready());
    }

    #[test]
    fn successful_load_makes_slot_ready() {
        let mut slot = Slot::new(Side::Left);
        let token = slot.begin_load(LoadOrigin::User);
        assert!(matches!(slot.state(), SlotState::Loading(LoadOrigin::User)));

        assert!(slot.finish(token, Ok(bitmap(4, 3))));
        assert_eq!(slot.bitmap().map(Bitmap::dimensions), Some((4, 3)));
    }

    #[test]
    fn failed_load_keeps_message() {
        let mut slot = Slot::new(Side::Right);
        let token = slot.begin_load(LoadOrigin::Default);
        assert!(slot.finish(token, Err(LoadError::DefaultUnavailable(Side::Right))));

        match slot.state() {
            SlotState::Failed(msg) => assert_eq!(msg, "Failed to load default RIGHT image"),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn reload_replaces_ready_bitmap() {
        let mut slot = Slot::new(Side::Left);
        let first = slot.begin_load(LoadOrigin::Default);
        slot.finish(first, Ok(bitmap(2, 2)));

        let second = slot.begin_load(LoadOrigin::User);
        assert!(second > first);
        assert!(slot.finish(second, Ok(bitmap(8, 6))));
        assert_eq!(slot.bitmap().map(Bitmap::dimensions), Some((8, 6)));
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut slot = Slot::new(Side::Left);
        let stale = slot.begin_load(LoadOrigin::User);
        let fresh = slot.begin_load(LoadOrigin::User);

        assert!(slot.finish(fresh, Ok(bitmap(10, 10))));
        assert!(!slot.finish(stale, Ok(bitmap(1, 1))));
        assert_eq!(slot.bitmap().map(Bitmap::dimensions), Some((10, 10)));
    }

    #[test]
    fn stale_completion_does_not_end_newer_load() {
        let mut slot = Slot::new(Side::Left);
        let stale = slot.begin_load(LoadOrigin::User);
        let _fresh = slot.begin_load(LoadOrigin::User);

        assert!(!slot.finish(stale, Ok(bitmap(1, 1))));
        assert!(matches!(slot.state(), SlotState::Loading(_)));
    }

    #[test]
    fn bitmap_clones_share_pixels() {
        let a = bitmap(3, 3);
        let b = a.clone();
        assert!(a.same(&b));
        assert!(!a.same(&bitmap(3, 3)));
    }

    #[test]
    fn default_settings() {
        let s = Settings::default();
        assert_eq!(s.scale, 1.0);
        assert!(!s.flip);
    }
}
