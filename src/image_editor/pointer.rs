// SPDX-License-Identifier: MPL-2.0
//! Pointer routing from screen coordinates to editor tools.

use super::{EditSession, EditorTool};

/// Where the canvas sits on screen and how far its container is scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Top-left corner of the canvas in screen coordinates.
    pub origin: (f32, f32),
    /// Scroll offset of the canvas container.
    pub scroll: (f32, f32),
}

impl Viewport {
    #[must_use]
    pub fn new(origin: (f32, f32), scroll: (f32, f32)) -> Self {
        Self { origin, scroll }
    }

    /// Maps a screen point into image space: `(screen - origin + scroll) / zoom`.
    #[must_use]
    pub fn to_image(&self, screen: (f32, f32), zoom: f32) -> (f32, f32) {
        (
            (screen.0 - self.origin.0 + self.scroll.0) / zoom,
            (screen.1 - self.origin.1 + self.scroll.1) / zoom,
        )
    }
}

impl EditSession {
    fn image_point(&self, screen: (f32, f32), viewport: &Viewport) -> (f32, f32) {
        viewport.to_image(screen, self.zoom().value())
    }

    /// Pointer pressed on the canvas.
    pub fn pointer_down(&mut self, screen: (f32, f32), viewport: &Viewport) {
        let point = self.image_point(screen, viewport);
        match self.tool() {
            EditorTool::Crop => self.begin_crop(point),
            EditorTool::Pen | EditorTool::Erase => self.begin_stroke(point),
        }
    }

    /// Pointer moved over the canvas, pressed or not.
    pub fn pointer_move(&mut self, screen: (f32, f32), viewport: &Viewport) {
        let point = self.image_point(screen, viewport);
        match self.tool() {
            EditorTool::Crop => {
                if self.crop.is_some_and(|c| c.dragging) {
                    self.update_crop(point);
                }
            }
            EditorTool::Pen | EditorTool::Erase => self.stroke_to(point),
        }
    }

    /// Pointer released. Ends the stroke; a crop selection stays pending.
    pub fn pointer_up(&mut self) {
        self.end_stroke();
        if let Some(crop) = self.crop.as_mut() {
            crop.dragging = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_accounts_for_scroll_and_zoom() {
        let viewport = Viewport::new((100.0, 50.0), (20.0, 10.0));
        assert_eq!(viewport.to_image((140.0, 90.0), 2.0), (30.0, 25.0));
    }

    #[test]
    fn identity_viewport_passes_points_through() {
        assert_eq!(Viewport::default().to_image((7.5, 3.0), 1.0), (7.5, 3.0));
    }
}
