use super::UiAction;

pub const PADDING: u32 = 10;
pub const LOG_PANEL_WIDTH: u32 = 360;
pub const MIN_LOG_PANEL_HEIGHT: u32 = 200;
pub const BUTTON_WIDTH: u32 = 120;
pub const BUTTON_HEIGHT: u32 = 36;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && y >= self.y as f32
            && x < (self.x + self.width) as f32
            && y < (self.y + self.height) as f32
    }
}

/// Window geometry for a given frame size.
///
/// ```text
/// +--------------------+  +-----------+
/// |      canvas        |  |    log    |
/// +--------------------+  +-----------+
///       [ Start ]            [ Stop ]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub canvas: Region,
    pub log: Region,
    pub start_button: Region,
    pub stop_button: Region,
    pub width: u32,
    pub height: u32,
}

impl Layout {
    pub fn for_frame(frame_width: u32, frame_height: u32) -> Self {
        let canvas = Region {
            x: PADDING,
            y: PADDING,
            width: frame_width,
            height: frame_height,
        };
        let log = Region {
            x: canvas.x + canvas.width + PADDING,
            y: PADDING,
            width: LOG_PANEL_WIDTH,
            height: frame_height.max(MIN_LOG_PANEL_HEIGHT),
        };
        let button_y = PADDING + canvas.height.max(log.height) + PADDING;
        let start_button = Region {
            x: canvas.x + canvas.width.saturating_sub(BUTTON_WIDTH) / 2,
            y: button_y,
            width: BUTTON_WIDTH,
            height: BUTTON_HEIGHT,
        };
        let stop_button = Region {
            x: log.x + (log.width - BUTTON_WIDTH) / 2,
            y: button_y,
            width: BUTTON_WIDTH,
            height: BUTTON_HEIGHT,
        };

        Self {
            canvas,
            log,
            start_button,
            stop_button,
            width: log.x + log.width + PADDING,
            height: button_y + BUTTON_HEIGHT + PADDING,
        }
    }

    /// Map a click to a button.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<UiAction> {
        if self.start_button.contains(x, y) {
            Some(UiAction::Start)
        } else if self.stop_button.contains(x, y) {
            Some(UiAction::Stop)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_matches_frame_and_log_sits_to_the_right() {
        let layout = Layout::for_frame(1280, 720);
        assert_eq!((layout.canvas.width, layout.canvas.height), (1280, 720));
        assert_eq!(layout.log.x, 10 + 1280 + 10);
        assert_eq!(layout.width, layout.log.x + LOG_PANEL_WIDTH + 10);
        assert_eq!(layout.height, 10 + 720 + 10 + BUTTON_HEIGHT + 10);
    }

    #[test]
    fn small_frames_keep_a_usable_log_panel() {
        let layout = Layout::for_frame(64, 48);
        assert_eq!(layout.log.height, MIN_LOG_PANEL_HEIGHT);
        assert!(layout.start_button.y >= layout.log.y + layout.log.height);
    }

    #[test]
    fn clicks_map_to_buttons() {
        let layout = Layout::for_frame(640, 480);
        let start = layout.start_button;
        let stop = layout.stop_button;

        assert_eq!(
            layout.hit_test(start.x as f32 + 1.0, start.y as f32 + 1.0),
            Some(UiAction::Start)
        );
        assert_eq!(
            layout.hit_test((stop.x + stop.width - 1) as f32, (stop.y + 1) as f32),
            Some(UiAction::Stop)
        );
        assert_eq!(layout.hit_test(20.0, 20.0), None);
        assert_eq!(
            layout.hit_test((start.x + start.width) as f32, start.y as f32),
            None
        );
    }
}
