/// Image layer: core types, loading, and compositing.
///
/// Architecture:
/// ```text
///  file picker / drop / LeftEye.jpg, RightEye.jpg
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode on a worker thread → LoadEvent
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  Slot (model) │  Empty → Loading → Ready(Bitmap) | Failed
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ compose   │  scale, flip, centre → one side-by-side RGBA image
///   └──────────┘
/// ```

pub mod compose;
pub mod error;
pub mod loader;
pub mod model;
