//! Desktop window: image canvas, log panel, Start and Stop buttons.
//!
//! Layout and composition are plain image code so they can be tested without
//! a display. The `minifb` window itself is behind the `gui` feature.

mod compose;
mod layout;
#[cfg(feature = "gui")]
mod window;

pub use compose::Composer;
pub use layout::{Layout, Region, BUTTON_HEIGHT, BUTTON_WIDTH, LOG_PANEL_WIDTH, PADDING};
#[cfg(feature = "gui")]
pub use window::WindowSurface;

/// User input the window turns into app calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiAction {
    Start,
    Stop,
}
