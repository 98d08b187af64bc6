//! Contracts between the UI core and its collaborators

mod store;
mod surface;

pub use store::{ConfigStore, MemoryStore, StoreError};
pub use surface::{
    Surface, SurfaceError, DISPLAY_COLS, DISPLAY_ROWS, KEY_TIMEOUT_SECS, SCROLL_DOWN_GLYPH,
    SCROLL_UP_GLYPH,
};
