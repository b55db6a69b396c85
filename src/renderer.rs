//! View-space bookkeeping for the page compositor: view rectangle, margins,
//! left/right page rectangles, scale and pan transforms, and the ordered list
//! of meshes to draw. Pixel fetch and draw-call sequencing belong to the
//! render host; this module only decides what goes where.

use lyon::math::Point;

use crate::color::Color;
use crate::dragging::DragOffset;

pub(crate) type MathRect = lyon::math::Box2D;

/// Proportional margins applied to the view rectangle to produce the page
/// rectangles. A value of `-0.1` grows the page 10% past the view on that
/// side; `0.0` is flush.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margins {
    pub fn uniform(margin: f32) -> Self {
        Self {
            left: margin,
            top: margin,
            right: margin,
            bottom: margin,
        }
    }
}

/// The three mesh identities a frame can contain. Left and right are the
/// static pages; `Curl` is the page currently being turned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Left,
    Right,
    Curl,
}

/// A snapshot of the renderer's view rectangle and viewport pixel size.
#[derive(Debug, Clone, Copy)]
pub struct ViewInfo {
    pub view_rect: lyon::math::Box2D,
    /// Viewport size in pixels.
    pub viewport: (f32, f32),
}

/// Compositor state for the page curl scene.
///
/// Maintains the ordered draw list of [`PageSlot`]s, the view rectangle
/// derived from the viewport aspect ratio, the page rectangles derived from
/// the margins, and the scale/pan transforms the host applies when drawing.
///
/// # Examples
///
/// ```
/// use folio::{CurlRenderer, Margins, PageSlot};
///
/// let mut renderer = CurlRenderer::new();
/// renderer.set_viewport(800, 400);
/// renderer.set_margins(Margins::default());
///
/// let right = renderer.page_rect(PageSlot::Right).unwrap();
/// assert_eq!(right.max.y, 1.0);
///
/// renderer.add_mesh(PageSlot::Right);
/// renderer.add_mesh(PageSlot::Curl);
/// assert_eq!(renderer.draw_order(), &[PageSlot::Right, PageSlot::Curl]);
/// ```
#[derive(Debug)]
pub struct CurlRenderer {
    background_color: Color,

    // Meshes to draw, in order. Slots, not mesh objects: the meshes
    // themselves live in the view's named slots and swap identity there.
    draw_order: Vec<PageSlot>,

    margins: Margins,

    page_rect_left: MathRect,
    page_rect_right: MathRect,

    viewport_width: u32,
    viewport_height: u32,

    view_rect: MathRect,

    scale: f32,
    dragging: DragOffset,

    // Set whenever the page rectangles change size, consumed by the host to
    // re-render page textures at the new pixel size.
    page_size_px: Option<(u32, u32)>,
}

impl Default for CurlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CurlRenderer {
    pub fn new() -> Self {
        Self {
            background_color: Color::BLACK,
            draw_order: Vec::with_capacity(3),
            margins: Margins::default(),
            page_rect_left: MathRect::zero(),
            page_rect_right: MathRect::zero(),
            viewport_width: 0,
            viewport_height: 0,
            view_rect: MathRect::zero(),
            scale: 1.0,
            dragging: DragOffset::default(),
            page_size_px: None,
        }
    }

    /// Updates the viewport pixel size and derives the view rectangle from
    /// its aspect ratio: y spans `[-1, 1]`, x spans `[-ratio, ratio]`.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;

        let ratio = width as f32 / height as f32;
        self.view_rect = MathRect::new(Point::new(-ratio, -1.0), Point::new(ratio, 1.0));

        self.update_page_bounds();
    }

    /// Sets margins or padding. Margins are proportional: a value of `-0.1`
    /// grows the page 10% past the view.
    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
        self.update_page_bounds();
    }

    /// The rectangle reserved for the left or right page. `Curl` has no
    /// rectangle of its own; the curling page uses the rect of the side it
    /// was picked up from.
    pub fn page_rect(&self, slot: PageSlot) -> Option<&MathRect> {
        match slot {
            PageSlot::Left => Some(&self.page_rect_left),
            PageSlot::Right => Some(&self.page_rect_right),
            PageSlot::Curl => None,
        }
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_dragging(&mut self, dragging: DragOffset) {
        self.dragging = dragging;
    }

    pub fn dragging(&self) -> DragOffset {
        self.dragging
    }

    /// Change background/clear color.
    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    /// Appends a mesh slot to the draw list, moving it to the back if it is
    /// already present.
    pub fn add_mesh(&mut self, slot: PageSlot) {
        self.remove_mesh(slot);
        self.draw_order.push(slot);
    }

    /// Removes a mesh slot from the draw list.
    pub fn remove_mesh(&mut self, slot: PageSlot) {
        self.draw_order.retain(|s| *s != slot);
    }

    /// Meshes to draw this frame, in order.
    pub fn draw_order(&self) -> &[PageSlot] {
        &self.draw_order
    }

    /// Translates screen pixel coordinates into view coordinates.
    pub fn translate(&self, pt: Point) -> Point {
        let width = self.view_rect.max.x - self.view_rect.min.x;
        let height = self.view_rect.max.y - self.view_rect.min.y;
        Point::new(
            self.view_rect.min.x + width * pt.x / self.viewport_width as f32,
            self.view_rect.max.y - height * pt.y / self.viewport_height as f32,
        )
    }

    pub fn view_info(&self) -> ViewInfo {
        ViewInfo {
            view_rect: self.view_rect,
            viewport: (self.viewport_width as f32, self.viewport_height as f32),
        }
    }

    /// The page size in pixels, if it changed since the last call. The host
    /// consumes this to re-render page textures at the right resolution.
    pub fn take_page_size_changed(&mut self) -> Option<(u32, u32)> {
        self.page_size_px.take()
    }

    /// Recalculates page rectangles from the view rect and margins.
    fn update_page_bounds(&mut self) {
        let view_width = self.view_rect.max.x - self.view_rect.min.x;
        let view_height = self.view_rect.max.y - self.view_rect.min.y;
        if view_width == 0.0 || view_height == 0.0 {
            return;
        }

        let mut right = self.view_rect;
        right.min.x += view_width * self.margins.left;
        right.max.x -= view_width * self.margins.right;
        right.max.y -= view_height * self.margins.top;
        right.min.y += view_height * self.margins.bottom;
        self.page_rect_right = right;

        let page_width = right.max.x - right.min.x;
        self.page_rect_left = MathRect::new(
            Point::new(right.min.x - page_width, right.min.y),
            Point::new(right.min.x, right.max.y),
        );

        let page_height = right.max.y - right.min.y;
        let bitmap_w = (page_width * self.viewport_width as f32 / view_width) as u32;
        let bitmap_h = (page_height * self.viewport_height as f32 / view_height) as u32;
        self.page_size_px = Some((bitmap_w, bitmap_h));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer_800x400() -> CurlRenderer {
        let mut renderer = CurlRenderer::new();
        renderer.set_viewport(800, 400);
        renderer
    }

    #[test]
    fn view_rect_follows_aspect_ratio() {
        let renderer = renderer_800x400();
        let info = renderer.view_info();
        assert_eq!(info.view_rect.min.x, -2.0);
        assert_eq!(info.view_rect.max.x, 2.0);
        assert_eq!(info.view_rect.min.y, -1.0);
        assert_eq!(info.view_rect.max.y, 1.0);
    }

    #[test]
    fn zero_margins_give_page_rect_equal_to_view() {
        let mut renderer = renderer_800x400();
        renderer.set_margins(Margins::default());
        let right = *renderer.page_rect(PageSlot::Right).unwrap();
        assert_eq!(right, renderer.view_info().view_rect);
    }

    #[test]
    fn negative_margins_grow_the_page_rect() {
        let mut renderer = renderer_800x400();
        renderer.set_margins(Margins::uniform(-0.25));
        let right = renderer.page_rect(PageSlot::Right).unwrap();
        // Each side moves out by a quarter of the view extent.
        assert_eq!(right.min.x, -3.0);
        assert_eq!(right.max.x, 3.0);
        assert_eq!(right.min.y, -1.5);
        assert_eq!(right.max.y, 1.5);
    }

    #[test]
    fn left_page_rect_sits_left_of_the_right_one() {
        let mut renderer = renderer_800x400();
        renderer.set_margins(Margins::default());
        let right = *renderer.page_rect(PageSlot::Right).unwrap();
        let left = *renderer.page_rect(PageSlot::Left).unwrap();
        assert_eq!(left.max.x, right.min.x);
        assert_eq!(left.max.x - left.min.x, right.max.x - right.min.x);
        assert_eq!(left.min.y, right.min.y);
    }

    #[test]
    fn page_size_change_is_consumed_once() {
        let mut renderer = renderer_800x400();
        renderer.set_margins(Margins::default());
        assert_eq!(renderer.take_page_size_changed(), Some((800, 400)));
        assert_eq!(renderer.take_page_size_changed(), None);
    }

    #[test]
    fn translate_maps_pixel_corners_to_view_corners() {
        let renderer = renderer_800x400();
        let top_left = renderer.translate(Point::new(0.0, 0.0));
        assert_eq!(top_left, Point::new(-2.0, 1.0));

        let bottom_right = renderer.translate(Point::new(800.0, 400.0));
        assert_eq!(bottom_right, Point::new(2.0, -1.0));

        let center = renderer.translate(Point::new(400.0, 200.0));
        assert_eq!(center, Point::new(0.0, 0.0));
    }

    #[test]
    fn draw_order_reinserts_at_the_back() {
        let mut renderer = renderer_800x400();
        renderer.add_mesh(PageSlot::Left);
        renderer.add_mesh(PageSlot::Right);
        renderer.add_mesh(PageSlot::Left);
        assert_eq!(renderer.draw_order(), &[PageSlot::Right, PageSlot::Left]);

        renderer.remove_mesh(PageSlot::Right);
        assert_eq!(renderer.draw_order(), &[PageSlot::Left]);
    }
}
