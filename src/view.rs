//! The interaction host: owns the three page meshes, the resize and drag
//! states, and the renderer, and implements [`InteractionTarget`] so a
//! [`crate::GestureStateMachine`] can drive it. Turns pointer movement into
//! curl line position, direction and radius, and animates a released curl to
//! its settled position.

use std::f64::consts::PI;
use std::mem;
use std::time::{Duration, Instant};

use lyon::math::Point;
use tracing::debug;

use crate::color::Color;
use crate::dragging::DraggingState;
use crate::gesture::{InteractionTarget, ViewState};
use crate::mesh::CurlMesh;
use crate::page::TexturePage;
use crate::renderer::{CurlRenderer, Margins, PageSlot};
use crate::resizing::ResizingState;

const ANIMATION_DURATION: Duration = Duration::from_millis(300);

// Scales the pinch distance delta, relative to the screen diagonal, into a
// scale factor change.
const RESIZING_MULTIPLIER: f32 = 6.0;

/// Which page is currently being flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurlSide {
    None,
    Left,
    Right,
}

/// Where the release animation is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnimationTarget {
    None,
    ToLeft,
    ToRight,
}

/// Host-facing notifications, drained with [`CurlView::take_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The visible page index changed (a page turn settled, or the host set
    /// a new index).
    PageChanged(usize),
    /// A finger lifted inside a configured hot area.
    HotAreaPressed(u32),
    /// The page rectangle changed size; textures should be re-rendered at
    /// this pixel size.
    PageSizeChanged { width: u32, height: u32 },
    /// A mesh slot needs content for the given page index. The host responds
    /// by filling [`CurlView::texture_page_mut`] for that slot.
    PageContentNeeded {
        slot: PageSlot,
        page_index: usize,
    },
}

/// Static configuration for a [`CurlView`].
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Maximum number of bands the curl is divided into. Values below 1 are
    /// corrected to 1.
    pub max_curl_splits: usize,
    /// Whether a left (verso) page is rendered next to the right one.
    pub render_left_page: bool,
    /// Whether the last page can be curled away.
    pub can_curl_last_page: bool,
    pub initial_page_index: usize,
    pub background_color: Color,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            max_curl_splits: 10,
            render_left_page: true,
            can_curl_last_page: false,
            initial_page_index: 0,
            background_color: Color::BLACK,
        }
    }
}

/// The page-curl viewer core.
///
/// Owns the three [`CurlMesh`] slots (left-static, right-static, curling),
/// the [`ResizingState`] and [`DraggingState`], and the [`CurlRenderer`].
/// Mesh identity moves between the slots at curl start and at animation
/// completion; GPU-ready buffers are never duplicated.
///
/// The host feeds it three ways:
/// - touch: a [`crate::GestureStateMachine`] calls the
///   [`InteractionTarget`] methods;
/// - frame: [`update_animation`](CurlView::update_animation) before drawing;
/// - content: fill [`texture_page_mut`](CurlView::texture_page_mut) when a
///   [`ViewEvent::PageContentNeeded`] arrives.
///
/// When touch and rendering run on different threads, wrap the view in a
/// mutex; every entry point takes `&mut self` and recomputes state wholesale,
/// so a coarse lock per call is sufficient and nothing needs rollback.
#[derive(Debug)]
pub struct CurlView {
    curl_side: CurlSide,
    animation_target: AnimationTarget,
    animating: bool,
    animation_source: Point,
    animation_target_point: Point,
    animation_start: Option<Instant>,

    can_curl_last_page: bool,
    render_left_page: bool,

    curl_pos: Point,
    curl_dir: Point,

    current_page_index: usize,
    page_count: usize,

    drag_start_pos: Point,
    pointer_pos: Point,
    pointer_pressure: f32,

    page_curl: CurlMesh,
    page_left: CurlMesh,
    page_right: CurlMesh,

    renderer: CurlRenderer,
    resizing_state: ResizingState,
    // Distance between fingers at the previous resize step.
    resizing_points_distance: Option<f32>,
    dragging_state: DraggingState,
    first_dragging_point: Point,

    view_state: ViewState,
    screen_diagonal: f32,

    events: Vec<ViewEvent>,
    needs_render: bool,
}

impl CurlView {
    pub fn new(config: ViewConfig) -> Self {
        let mut renderer = CurlRenderer::new();
        renderer.set_background_color(config.background_color);

        let mut page_left = CurlMesh::new(config.max_curl_splits);
        let mut page_right = CurlMesh::new(config.max_curl_splits);
        let mut page_curl = CurlMesh::new(config.max_curl_splits);
        page_left.set_flip_texture(true);
        page_right.set_flip_texture(false);
        page_curl.set_flip_texture(false);

        Self {
            curl_side: CurlSide::None,
            animation_target: AnimationTarget::None,
            animating: false,
            animation_source: Point::zero(),
            animation_target_point: Point::zero(),
            animation_start: None,
            can_curl_last_page: config.can_curl_last_page,
            render_left_page: config.render_left_page,
            curl_pos: Point::zero(),
            curl_dir: Point::zero(),
            current_page_index: config.initial_page_index,
            page_count: 0,
            drag_start_pos: Point::zero(),
            pointer_pos: Point::zero(),
            pointer_pressure: 0.8,
            page_curl,
            page_left,
            page_right,
            renderer,
            resizing_state: ResizingState::new(Margins::default(), 1.0),
            resizing_points_distance: None,
            dragging_state: DraggingState::new(),
            first_dragging_point: Point::zero(),
            view_state: ViewState::NotResized,
            screen_diagonal: 0.0,
            events: Vec::new(),
            needs_render: false,
        }
    }

    /// Total number of pages the content provider can supply.
    pub fn set_page_count(&mut self, page_count: usize) {
        self.page_count = page_count;
    }

    pub fn page_index(&self) -> usize {
        self.current_page_index
    }

    /// Changes the current page and repositions the static meshes for it.
    pub fn set_page_index(&mut self, page_index: usize) {
        self.current_page_index = page_index;
        self.init_pages();
        self.events.push(ViewEvent::PageChanged(page_index));
    }

    /// Whether the view is currently zoomed; feed this to
    /// [`crate::GestureStateMachine::process`].
    pub fn view_state(&self) -> ViewState {
        self.view_state
    }

    pub fn renderer(&self) -> &CurlRenderer {
        &self.renderer
    }

    /// The mesh occupying a slot, for drawing.
    pub fn mesh(&self, slot: PageSlot) -> &CurlMesh {
        match slot {
            PageSlot::Left => &self.page_left,
            PageSlot::Right => &self.page_right,
            PageSlot::Curl => &self.page_curl,
        }
    }

    /// The texture page of a slot, for the host to fill with content.
    pub fn texture_page_mut(&mut self, slot: PageSlot) -> &mut TexturePage {
        match slot {
            PageSlot::Left => self.page_left.texture_page_mut(),
            PageSlot::Right => self.page_right.texture_page_mut(),
            PageSlot::Curl => self.page_curl.texture_page_mut(),
        }
    }

    /// Updates the viewport pixel size. Resets zoom, pan and any gesture in
    /// progress, and repositions the static pages.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.renderer.set_viewport(width, height);
        self.screen_diagonal =
            ((width as f32) * (width as f32) + (height as f32) * (height as f32)).sqrt();
        self.reset_view_state();
        self.init_pages();
        self.sync_page_size();
    }

    /// Per-frame hook: advances the release animation if one is running.
    /// Call before drawing each frame.
    pub fn update_animation(&mut self, now: Instant) {
        if !self.animating {
            return;
        }
        let Some(start) = self.animation_start else {
            return;
        };

        if now >= start + ANIMATION_DURATION {
            self.finish_animation();
            return;
        }

        // Smooth-step the pointer from the release point to the target edge
        // and let the regular curl update do the rest, exactly as if the user
        // had dragged there.
        let elapsed = now - start;
        let mut t = 1.0 - elapsed.as_secs_f32() / ANIMATION_DURATION.as_secs_f32();
        t = 1.0 - t * t * t * (3.0 - 2.0 * t);

        self.pointer_pos = Point::new(
            self.animation_source.x + (self.animation_target_point.x - self.animation_source.x) * t,
            self.animation_source.y + (self.animation_target_point.y - self.animation_source.y) * t,
        );
        self.update_curl_pos();
    }

    /// True once after something changed that needs a redraw.
    pub fn take_render_request(&mut self) -> bool {
        mem::take(&mut self.needs_render)
    }

    /// Drains pending host notifications.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        mem::take(&mut self.events)
    }

    fn request_render(&mut self) {
        self.needs_render = true;
    }

    fn sync_page_size(&mut self) {
        if let Some((width, height)) = self.renderer.take_page_size_changed() {
            self.events.push(ViewEvent::PageSizeChanged { width, height });
        }
    }

    /// Cancels zoom and pan: back to scale 1, zero margins, centered view.
    fn reset_view_state(&mut self) {
        let offset = self.dragging_state.reset();
        self.renderer.set_dragging(offset);

        self.page_left.set_flip_texture(true);

        self.resizing_state = ResizingState::new(Margins::default(), 1.0);
        self.renderer.set_margins(self.resizing_state.margins());
        self.renderer.set_scale(self.resizing_state.scale_factor());
        self.view_state = if self.resizing_state.is_resized() {
            ViewState::Resized
        } else {
            ViewState::NotResized
        };
        self.request_render();
    }

    /// Repositions the static meshes for the current page index and asks the
    /// host for their content.
    fn init_pages(&mut self) {
        let Some(&right_rect) = self.renderer.page_rect(PageSlot::Right) else {
            return;
        };
        let Some(&left_rect) = self.renderer.page_rect(PageSlot::Left) else {
            return;
        };

        self.renderer.remove_mesh(PageSlot::Left);
        self.renderer.remove_mesh(PageSlot::Right);
        self.renderer.remove_mesh(PageSlot::Curl);

        let right_index = self.current_page_index;
        if right_index < self.page_count {
            self.page_right.texture_page_mut().reset();
            self.events.push(ViewEvent::PageContentNeeded {
                slot: PageSlot::Right,
                page_index: right_index,
            });
            self.page_right.set_flip_texture(false);
            self.page_right.set_rect(&right_rect);
            self.page_right.reset();
            self.renderer.add_mesh(PageSlot::Right);
        }

        if self.render_left_page {
            if let Some(left_index) = self.current_page_index.checked_sub(1) {
                if left_index < self.page_count {
                    self.page_left.texture_page_mut().reset();
                    self.events.push(ViewEvent::PageContentNeeded {
                        slot: PageSlot::Left,
                        page_index: left_index,
                    });
                    self.page_left.set_flip_texture(true);
                    self.page_left.set_rect(&left_rect);
                    self.page_left.reset();
                    self.renderer.add_mesh(PageSlot::Left);
                }
            }
        }

        self.request_render();
    }

    fn memorize_point(&mut self, point: Point, pressure: f32) {
        self.pointer_pos = self.renderer.translate(point);
        self.pointer_pressure = pressure;
    }

    /// Switches mesh roles so the grabbed page becomes the curling one, and
    /// requests content for the page revealed underneath.
    fn start_curl(&mut self, side: CurlSide) {
        let Some(&right_rect) = self.renderer.page_rect(PageSlot::Right) else {
            return;
        };
        let Some(&left_rect) = self.renderer.page_rect(PageSlot::Left) else {
            return;
        };

        self.renderer.remove_mesh(PageSlot::Left);
        self.renderer.remove_mesh(PageSlot::Right);
        self.renderer.remove_mesh(PageSlot::Curl);

        match side {
            CurlSide::Right => {
                // The right page becomes the curling one; the former curl
                // mesh takes over the right slot and shows the next page.
                mem::swap(&mut self.page_right, &mut self.page_curl);

                if self.current_page_index > 0 {
                    self.page_left.set_flip_texture(true);
                    self.page_left.set_rect(&left_rect);
                    self.page_left.reset();
                    if self.render_left_page {
                        self.renderer.add_mesh(PageSlot::Left);
                    }
                }

                if self.current_page_index + 1 < self.page_count {
                    self.page_right.texture_page_mut().reset();
                    self.events.push(ViewEvent::PageContentNeeded {
                        slot: PageSlot::Right,
                        page_index: self.current_page_index + 1,
                    });
                    self.page_right.set_rect(&right_rect);
                    self.page_right.set_flip_texture(false);
                    self.page_right.reset();
                    self.renderer.add_mesh(PageSlot::Right);
                }

                self.page_curl.set_rect(&right_rect);
                self.page_curl.set_flip_texture(false);
                self.page_curl.reset();
                self.renderer.add_mesh(PageSlot::Curl);
                self.curl_side = CurlSide::Right;
            }
            CurlSide::Left => {
                // The left page unrolls back over the right side.
                mem::swap(&mut self.page_left, &mut self.page_curl);

                if self.current_page_index > 1 {
                    self.page_left.texture_page_mut().reset();
                    self.events.push(ViewEvent::PageContentNeeded {
                        slot: PageSlot::Left,
                        page_index: self.current_page_index - 2,
                    });
                    self.page_left.set_flip_texture(true);
                    self.page_left.set_rect(&left_rect);
                    self.page_left.reset();
                    if self.render_left_page {
                        self.renderer.add_mesh(PageSlot::Left);
                    }
                }

                if self.current_page_index < self.page_count {
                    self.page_right.set_flip_texture(false);
                    self.page_right.set_rect(&right_rect);
                    self.page_right.reset();
                    self.renderer.add_mesh(PageSlot::Right);
                }

                self.page_curl.set_rect(&right_rect);
                self.page_curl.set_flip_texture(false);
                self.page_curl.reset();
                self.renderer.add_mesh(PageSlot::Curl);
                self.curl_side = CurlSide::Left;
            }
            CurlSide::None => {}
        }
    }

    /// Updates curl position from the current pointer.
    fn update_curl_pos(&mut self) {
        let Some(&right_rect) = self.renderer.page_rect(PageSlot::Right) else {
            return;
        };
        let page_width = right_rect.max.x - right_rect.min.x;

        // Default curl radius, eased off by touch pressure: a firm press
        // makes a tighter roll.
        let mut radius = (page_width / 3.0) as f64;
        radius *= (1.0 - self.pointer_pressure).max(0.0) as f64;

        self.curl_pos = self.pointer_pos;

        if self.curl_side == CurlSide::Right {
            self.curl_dir = Point::new(
                self.curl_pos.x - self.drag_start_pos.x,
                self.curl_pos.y - self.drag_start_pos.y,
            );
            let dist =
                ((self.curl_dir.x * self.curl_dir.x + self.curl_dir.y * self.curl_dir.y) as f64)
                    .sqrt();

            // Shrink the radius once the page is dragged far enough toward
            // the opposite side, so the roll tightens to nothing at the
            // spine.
            let mut curl_len = radius * PI;
            if dist > (page_width * 2.0) as f64 - curl_len {
                curl_len = ((page_width * 2.0) as f64 - dist).max(0.0);
                radius = curl_len / PI;
            }

            if dist >= curl_len {
                let translate = (dist - curl_len) / 2.0;
                radius = ((self.curl_pos.x - right_rect.min.x) as f64)
                    .min(radius)
                    .max(0.0);
                self.curl_pos.y -= (self.curl_dir.y as f64 * translate / dist) as f32;
            } else {
                let angle = PI * (dist / curl_len).sqrt();
                let translate = radius * angle.sin();
                self.curl_pos.x += (self.curl_dir.x as f64 * translate / dist) as f32;
                self.curl_pos.y += (self.curl_dir.y as f64 * translate / dist) as f32;
            }
        } else if self.curl_side == CurlSide::Left {
            // Pin the curl radius to the distance from the page edge.
            radius = ((self.curl_pos.x - right_rect.min.x) as f64)
                .min(radius)
                .max(0.0);
            let page_right_x = right_rect.max.x;
            self.curl_pos.x -= ((page_right_x - self.curl_pos.x) as f64).min(radius) as f32;
            self.curl_dir = Point::new(
                self.curl_pos.x + self.drag_start_pos.x,
                self.curl_pos.y - self.drag_start_pos.y,
            );
        }

        self.set_curl_pos(radius);
    }

    /// Clamps the curl line so the page stays attached at the spine, then
    /// rebuilds the curling mesh.
    fn set_curl_pos(&mut self, radius: f64) {
        if self.curl_side != CurlSide::None {
            let Some(&page_rect) = self.renderer.page_rect(PageSlot::Right) else {
                return;
            };

            // Past the right edge the page is flat again.
            if self.curl_pos.x >= page_rect.max.x {
                self.page_curl.reset();
                self.request_render();
                return;
            }

            if self.curl_pos.x < page_rect.min.x {
                self.curl_pos.x = page_rect.min.x;
            }

            if self.curl_dir.y != 0.0 {
                let diff_x = self.curl_pos.x - page_rect.min.x;
                let left_y = self.curl_pos.y + diff_x * self.curl_dir.x / self.curl_dir.y;

                // Where the curl line leaves the page vertically, pivot the
                // direction around the nearer corner.
                if self.curl_dir.y < 0.0 && left_y < page_rect.max.y {
                    self.curl_dir.x = self.curl_pos.y - page_rect.max.y;
                    self.curl_dir.y = page_rect.min.x - self.curl_pos.x;
                } else if self.curl_dir.y > 0.0 && left_y > page_rect.min.y {
                    self.curl_dir.x = page_rect.min.y - self.curl_pos.y;
                    self.curl_dir.y = self.curl_pos.x - page_rect.min.x;
                }
            }
        }

        let dist =
            ((self.curl_dir.x * self.curl_dir.x + self.curl_dir.y * self.curl_dir.y) as f64).sqrt();
        if dist != 0.0 {
            let dir = Point::new(
                (self.curl_dir.x as f64 / dist) as f32,
                (self.curl_dir.y as f64 / dist) as f32,
            );
            self.page_curl.curl(self.curl_pos, dir, radius);
        } else {
            self.page_curl.reset();
        }
        self.request_render();
    }

    /// Rotates mesh identities once the release animation lands.
    fn finish_animation(&mut self) {
        match self.animation_target {
            AnimationTarget::ToRight => {
                // The curled page settles flat on the right.
                if let Some(&right_rect) = self.renderer.page_rect(PageSlot::Right) {
                    mem::swap(&mut self.page_curl, &mut self.page_right);
                    self.page_right.set_rect(&right_rect);
                    self.page_right.set_flip_texture(false);
                    self.page_right.reset();
                    self.renderer.remove_mesh(PageSlot::Curl);
                    self.renderer.add_mesh(PageSlot::Right);

                    if self.curl_side == CurlSide::Left {
                        self.current_page_index = self.current_page_index.saturating_sub(1);
                    }
                }
            }
            AnimationTarget::ToLeft => {
                // The curled page settles flat on the left.
                if let Some(&left_rect) = self.renderer.page_rect(PageSlot::Left) {
                    mem::swap(&mut self.page_curl, &mut self.page_left);
                    self.page_left.set_rect(&left_rect);
                    self.page_left.set_flip_texture(true);
                    self.page_left.reset();
                    self.renderer.remove_mesh(PageSlot::Curl);
                    if self.render_left_page {
                        self.renderer.add_mesh(PageSlot::Left);
                    } else {
                        self.renderer.remove_mesh(PageSlot::Left);
                    }

                    if self.curl_side == CurlSide::Right {
                        self.current_page_index += 1;
                    }
                }
            }
            AnimationTarget::None => {}
        }

        debug!(page = self.current_page_index, "page turn settled");
        self.curl_side = CurlSide::None;
        self.animating = false;
        self.animation_target = AnimationTarget::None;
        self.events
            .push(ViewEvent::PageChanged(self.current_page_index));
        self.request_render();
    }

    fn update_view_state(&mut self) {
        self.view_state = if self.resizing_state.is_resized() {
            ViewState::Resized
        } else {
            ViewState::NotResized
        };
    }
}

impl InteractionTarget for CurlView {
    fn start_curving(&mut self, point: Point, pressure: f32) {
        let Some(&right_rect) = self.renderer.page_rect(PageSlot::Right) else {
            return;
        };

        // A new grab always wins over an in-flight release animation.
        self.animating = false;
        self.animation_target = AnimationTarget::None;

        self.memorize_point(point, pressure);

        // The grab point is mapped to the nearer page edge; that edge is
        // where the user is "holding" the paper.
        self.drag_start_pos = self.pointer_pos;
        if self.drag_start_pos.y > right_rect.max.y {
            self.drag_start_pos.y = right_rect.max.y;
        } else if self.drag_start_pos.y < right_rect.min.y {
            self.drag_start_pos.y = right_rect.min.y;
        }

        let half_x = (right_rect.min.x + right_rect.max.x) / 2.0;
        if self.drag_start_pos.x < half_x && self.current_page_index > 0 {
            self.drag_start_pos.x = right_rect.min.x;
            self.start_curl(CurlSide::Left);
        } else if self.drag_start_pos.x >= half_x && self.current_page_index < self.page_count {
            self.drag_start_pos.x = right_rect.max.x;
            if !self.can_curl_last_page && self.current_page_index + 1 >= self.page_count {
                return;
            }
            self.start_curl(CurlSide::Right);
        }
    }

    fn curving(&mut self, point: Point, pressure: f32) {
        self.memorize_point(point, pressure);
        self.update_curl_pos();
    }

    fn complete_curving(&mut self, point: Point, pressure: f32) {
        let Some(&right_rect) = self.renderer.page_rect(PageSlot::Right) else {
            return;
        };
        let Some(&left_rect) = self.renderer.page_rect(PageSlot::Left) else {
            return;
        };
        self.memorize_point(point, pressure);

        if self.curl_side == CurlSide::None {
            return;
        }

        // The release is animated as simulated drag events toward the
        // settled edge, so the output is exactly what the user would get by
        // dragging the page all the way there.
        self.animation_source = self.pointer_pos;
        self.animation_start = Some(Instant::now());

        if self.pointer_pos.x > (right_rect.min.x + right_rect.max.x) / 2.0 {
            // On the right half, the target is the right page's right edge.
            self.animation_target_point = Point::new(right_rect.max.x, self.drag_start_pos.y);
            self.animation_target = AnimationTarget::ToRight;
        } else {
            // On the left half, the target depends on which page is turning.
            let target_x = if self.curl_side == CurlSide::Right {
                left_rect.min.x
            } else {
                right_rect.min.x
            };
            self.animation_target_point = Point::new(target_x, self.drag_start_pos.y);
            self.animation_target = AnimationTarget::ToLeft;
        }
        self.animating = true;

        let offset = self.dragging_state.reset();
        self.renderer.set_dragging(offset);
        self.request_render();
    }

    fn cancel_curving(&mut self, point: Point, pressure: f32) {
        if self.curl_side == CurlSide::None {
            return;
        }
        self.memorize_point(point, pressure);

        // Animate back to where the page was grabbed.
        match self.curl_side {
            CurlSide::Left => {
                let Some(&left_rect) = self.renderer.page_rect(PageSlot::Left) else {
                    return;
                };
                self.animation_target_point = Point::new(left_rect.min.x, self.drag_start_pos.y);
                self.animation_target = AnimationTarget::ToLeft;
            }
            CurlSide::Right => {
                let Some(&right_rect) = self.renderer.page_rect(PageSlot::Right) else {
                    return;
                };
                self.animation_target_point = Point::new(right_rect.max.x, self.drag_start_pos.y);
                self.animation_target = AnimationTarget::ToRight;
            }
            CurlSide::None => return,
        }

        self.animation_source = self.pointer_pos;
        self.animation_start = Some(Instant::now());
        self.animating = true;

        let offset = self.dragging_state.reset();
        self.renderer.set_dragging(offset);
        self.request_render();
    }

    fn start_resizing(&mut self) {
        self.resizing_points_distance = None;
        self.update_view_state();
        self.renderer.set_margins(Margins::default());
        self.renderer.set_scale(self.resizing_state.scale_factor());
        self.sync_page_size();

        // Recenter while pinching a zoomed view.
        if self.view_state == ViewState::Resized {
            let offset = self.dragging_state.reset();
            self.renderer.set_dragging(offset);
        }
    }

    fn resizing(&mut self, points: &[Point]) {
        let new_distance = mean_pairwise_distance(points);

        match self.resizing_points_distance {
            None if new_distance > 0.0 => {
                self.resizing_points_distance = Some(new_distance);
            }
            Some(old_distance) => {
                let factor =
                    RESIZING_MULTIPLIER * ((new_distance - old_distance) / self.screen_diagonal);
                self.resizing_state.update_scale_factor(factor);
                self.update_view_state();
                self.resizing_points_distance = Some(new_distance);
                self.renderer.set_scale(self.resizing_state.scale_factor());
                self.request_render();
            }
            None => {}
        }
    }

    fn complete_resizing(&mut self) {
        self.resizing_points_distance = None;
        self.update_view_state();
        self.resizing_state.recalculate_margins_by_scale_factor();

        let margins = self.resizing_state.margins();
        self.renderer.set_margins(margins);
        self.dragging_state.set_current_margins(margins);
        self.renderer.set_scale(1.0);
        self.sync_page_size();
        self.request_render();

        if self.view_state == ViewState::NotResized {
            // Place back to center.
            let offset = self.dragging_state.reset();
            self.renderer.set_dragging(offset);
            self.request_render();
        }
    }

    fn start_dragging(&mut self, point: Point) {
        self.first_dragging_point = point;
        self.dragging_state.set_view_info(&self.renderer.view_info());
        self.dragging_state.start_dragging();
    }

    fn dragging(&mut self, point: Point) {
        let delta_x = point.x - self.first_dragging_point.x;
        let delta_y = point.y - self.first_dragging_point.y;

        let offset = self.dragging_state.process_dragging(delta_x, delta_y);
        self.renderer.set_dragging(offset);
        self.request_render();
    }

    fn complete_dragging(&mut self, _point: Point) {
        self.dragging_state.complete_dragging();
    }

    fn on_hot_area_hit(&mut self, id: u32) {
        self.events.push(ViewEvent::HotAreaPressed(id));
    }
}

/// Mean pairwise distance between the touch points; zero for fewer than two.
fn mean_pairwise_distance(points: &[Point]) -> f32 {
    match points.len() {
        0 | 1 => 0.0,
        2 => (points[0] - points[1]).length(),
        n => {
            let mut sum = 0.0;
            for i in 0..n {
                for j in 0..n {
                    if i != j {
                        sum += (points[i] - points[j]).length();
                    }
                }
            }
            sum / (n * n - n) as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::math::point;

    fn view() -> CurlView {
        let mut view = CurlView::new(ViewConfig::default());
        view.set_page_count(10);
        view.set_viewport(800, 800);
        view.take_events();
        view.take_render_request();
        view
    }

    #[test]
    fn viewport_setup_reports_page_size_and_content() {
        let mut view = CurlView::new(ViewConfig::default());
        view.set_page_count(10);
        view.set_viewport(800, 800);

        let events = view.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, ViewEvent::PageSizeChanged { width: 800, height: 800 })));
        assert!(events.iter().any(|e| matches!(
            e,
            ViewEvent::PageContentNeeded {
                slot: PageSlot::Right,
                page_index: 0
            }
        )));
    }

    #[test]
    fn grabbing_the_right_edge_starts_a_right_curl() {
        let mut view = view();
        // Right half of an 800 px viewport.
        view.start_curving(point(780.0, 400.0), 0.8);

        assert_eq!(view.curl_side, CurlSide::Right);
        assert!(view.renderer().draw_order().contains(&PageSlot::Curl));

        // Dragging left curls the page: the curl mesh gains back-facing
        // geometry.
        view.curving(point(400.0, 400.0), 0.8);
        assert!(view.mesh(PageSlot::Curl).back_count() > 0);
        assert!(view.take_render_request());
    }

    #[test]
    fn last_page_cannot_be_curled_by_default() {
        let mut view = view();
        view.set_page_index(9);
        view.start_curving(point(780.0, 400.0), 0.8);
        assert_eq!(view.curl_side, CurlSide::None);
    }

    #[test]
    fn left_grab_needs_a_previous_page() {
        let mut view = view();
        // On page 0 there is nothing to flip back.
        view.start_curving(point(20.0, 400.0), 0.8);
        assert_eq!(view.curl_side, CurlSide::None);

        view.set_page_index(3);
        view.take_events();
        view.start_curving(point(20.0, 400.0), 0.8);
        assert_eq!(view.curl_side, CurlSide::Left);
    }

    #[test]
    fn completed_right_curl_to_left_advances_the_page() {
        let mut view = view();
        view.start_curving(point(780.0, 400.0), 0.8);
        view.curving(point(300.0, 400.0), 0.8);
        // Release on the left half: the page flips over to the left.
        view.complete_curving(point(200.0, 400.0), 0.8);
        assert!(view.animating);

        // Jump past the end of the animation.
        view.update_animation(Instant::now() + ANIMATION_DURATION * 2);
        assert!(!view.animating);
        assert_eq!(view.page_index(), 1);
        assert!(view
            .take_events()
            .contains(&ViewEvent::PageChanged(1)));
    }

    #[test]
    fn release_on_the_right_half_puts_the_page_back() {
        let mut view = view();
        view.start_curving(point(780.0, 400.0), 0.8);
        view.curving(point(700.0, 400.0), 0.8);
        view.complete_curving(point(700.0, 400.0), 0.8);
        view.update_animation(Instant::now() + ANIMATION_DURATION * 2);

        assert_eq!(view.page_index(), 0);
        // The right slot holds a flat page again.
        assert_eq!(view.mesh(PageSlot::Right).front_count(), 4);
        assert_eq!(view.mesh(PageSlot::Right).back_count(), 0);
    }

    #[test]
    fn new_grab_discards_inflight_animation() {
        let mut view = view();
        view.start_curving(point(780.0, 400.0), 0.8);
        view.complete_curving(point(200.0, 400.0), 0.8);
        assert!(view.animating);

        view.start_curving(point(780.0, 400.0), 0.8);
        assert!(!view.animating);
        assert_eq!(view.curl_side, CurlSide::Right);
    }

    #[test]
    fn pinch_resizes_and_pan_follows_zoom() {
        let mut view = view();
        view.start_resizing();
        // Fingers move apart by most of the diagonal: scale grows.
        view.resizing(&[point(350.0, 400.0), point(450.0, 400.0)]);
        view.resizing(&[point(100.0, 400.0), point(700.0, 400.0)]);
        assert_eq!(view.view_state(), ViewState::Resized);

        view.complete_resizing();
        // Zoomed completion derives negative margins.
        assert!(view.renderer().page_rect(PageSlot::Right).unwrap().max.x > 1.0);

        // And dragging now has room to move.
        view.start_dragging(point(400.0, 400.0));
        view.dragging(point(480.0, 400.0));
        assert!(view.renderer().dragging().x > 0.0);
    }

    #[test]
    fn hot_area_hits_surface_as_events() {
        let mut view = view();
        view.on_hot_area_hit(5);
        assert_eq!(view.take_events(), vec![ViewEvent::HotAreaPressed(5)]);
    }

    #[test]
    fn mean_pairwise_distance_of_two_points() {
        assert_eq!(
            mean_pairwise_distance(&[point(0.0, 0.0), point(3.0, 4.0)]),
            5.0
        );
        assert_eq!(mean_pairwise_distance(&[point(1.0, 1.0)]), 0.0);
    }
}
