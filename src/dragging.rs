use crate::renderer::{Margins, ViewInfo};
use crate::resizing::{MAX_MARGIN, MIN_MARGIN};

/// A pan offset in view-space units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragOffset {
    pub x: f32,
    pub y: f32,
}

// Drag borders in view space; `top > bottom` in the view's coordinate system.
#[derive(Debug, Clone, Copy, Default)]
struct DragBorders {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

/// Pan state for a zoomed view.
///
/// Converts pixel deltas into a clamped view-space offset. The drag range
/// grows with zoom depth: an unzoomed view cannot be dragged at all, a fully
/// zoomed one can be dragged across the whole view extent.
///
/// # Examples
///
/// ```
/// use folio::{DraggingState, Margins, ViewInfo};
/// use lyon::math::{point, Box2D};
///
/// let mut drag = DraggingState::new();
/// drag.set_view_info(&ViewInfo {
///     view_rect: Box2D::new(point(-1.0, -1.0), point(1.0, 1.0)),
///     viewport: (800.0, 800.0),
/// });
/// drag.set_current_margins(Margins::uniform(-0.5));
/// drag.start_dragging();
///
/// // 80 px at 2 view units per 800 px is 0.2 units.
/// let offset = drag.process_dragging(80.0, 0.0);
/// assert!((offset.x - 0.2).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DraggingState {
    // Offset accumulated by completed drags.
    start_drag: DragOffset,
    // Offset of the drag in progress.
    current_dragging: DragOffset,
    // Absolute borders, from the view rect.
    dragging_borders: DragBorders,
    // Borders scaled to the current zoom depth, set at drag start.
    current_dragging_borders: Option<DragBorders>,
    current_margins: Margins,
    // How many view units one pixel covers.
    units_in_pixels: f32,
}

impl DraggingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the view rectangle and viewport size, deriving the isotropic
    /// pixel-to-unit conversion factor from their width and height ratios.
    pub fn set_view_info(&mut self, view_info: &ViewInfo) {
        let rect = &view_info.view_rect;
        let (viewport_w, viewport_h) = view_info.viewport;
        let width = (rect.max.x - rect.min.x).abs();
        let height = (rect.max.y - rect.min.y).abs();
        self.units_in_pixels = (width / viewport_w + height / viewport_h) / 2.0;
        self.dragging_borders = DragBorders {
            left: rect.min.x,
            top: rect.max.y,
            right: rect.max.x,
            bottom: rect.min.y,
        };
    }

    pub fn set_current_margins(&mut self, margins: Margins) {
        self.current_margins = margins;
    }

    /// Recomputes the effective drag borders for the current zoom depth.
    ///
    /// The absolute borders are scaled by how far the margin has travelled
    /// from `MAX_MARGIN` toward `MIN_MARGIN`: zero range when unzoomed, the
    /// full view extent when fully zoomed.
    pub fn start_dragging(&mut self) {
        let one_margin = self.current_margins.left;
        let scale = (one_margin - MAX_MARGIN) / (MIN_MARGIN - MAX_MARGIN);

        self.current_dragging_borders = Some(DragBorders {
            left: self.dragging_borders.left * scale,
            top: self.dragging_borders.top * scale,
            right: self.dragging_borders.right * scale,
            bottom: self.dragging_borders.bottom * scale,
        });
    }

    /// Converts a pixel delta into the clamped total drag offset.
    ///
    /// Screen y grows downward while view y grows upward, so the y delta is
    /// inverted. Any clamped excess is absorbed into the in-progress offset,
    /// so a drag that hits a border continues smoothly from the border
    /// rather than from the raw accumulated value.
    pub fn process_dragging(&mut self, distance_px_x: f32, distance_px_y: f32) -> DragOffset {
        self.current_dragging = DragOffset {
            x: distance_px_x * self.units_in_pixels,
            y: -distance_px_y * self.units_in_pixels,
        };
        self.dragging_factor(true)
    }

    /// Folds the in-progress offset into the accumulated one.
    pub fn complete_dragging(&mut self) {
        self.start_drag = self.dragging_factor(true);
        self.current_dragging = DragOffset::default();
    }

    /// Zeroes all offsets and returns the centered offset.
    pub fn reset(&mut self) -> DragOffset {
        self.start_drag = DragOffset::default();
        self.current_dragging = DragOffset::default();
        self.dragging_factor(false)
    }

    fn dragging_factor(&mut self, check_borders: bool) -> DragOffset {
        let mut result = DragOffset {
            x: self.start_drag.x + self.current_dragging.x,
            y: self.start_drag.y + self.current_dragging.y,
        };

        if check_borders {
            if let Some(borders) = self.current_dragging_borders {
                if result.x > borders.right {
                    self.current_dragging.x -= result.x - borders.right;
                    result.x = borders.right;
                } else if result.x < borders.left {
                    self.current_dragging.x += borders.left - result.x;
                    result.x = borders.left;
                }

                if result.y > borders.top {
                    self.current_dragging.y -= result.y - borders.top;
                    result.y = borders.top;
                } else if result.y < borders.bottom {
                    self.current_dragging.y += borders.bottom - result.y;
                    result.y = borders.bottom;
                }
            }
        }

        result
    }
}
