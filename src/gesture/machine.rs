use lyon::math::Point;
use tracing::trace;

use super::events::{Event, TouchFrame};
use super::transformer::EventsTransformer;

/// Whether the view is currently zoomed in. Decides if a first touch starts
/// a curl or a pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    NotResized,
    Resized,
}

/// States of the gesture state machine. One sequence of touch frames walks
/// from `Init` to `Final`; `Final` resets to `Init` when the next frame
/// arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Init,
    Curving,
    Resizing,
    Dragging,
    /// A hot area was touched; waiting for the finger to lift.
    HotAreaHit,
    /// Terminal for this touch sequence.
    Final,
}

/// The object driven by the gesture state machine.
///
/// Implemented by the interaction host ([`crate::CurlView`] in this crate);
/// the machine translates classified touch events into these calls.
pub trait InteractionTarget {
    fn start_curving(&mut self, point: Point, pressure: f32);
    fn curving(&mut self, point: Point, pressure: f32);
    fn complete_curving(&mut self, point: Point, pressure: f32);
    fn cancel_curving(&mut self, point: Point, pressure: f32);
    fn start_resizing(&mut self);
    fn resizing(&mut self, points: &[Point]);
    fn complete_resizing(&mut self);
    fn start_dragging(&mut self, point: Point);
    fn dragging(&mut self, point: Point);
    fn complete_dragging(&mut self, point: Point);
    /// A finger lifted inside a hot area.
    fn on_hot_area_hit(&mut self, id: u32);
}

/// Drives curl, resize, drag and hot-area interactions from raw touch frames.
///
/// Every transition is an explicit match over the (state, event) pair;
/// anything not listed is deliberately a silent no-op, tolerating
/// out-of-order or platform-quirky touch sequences.
///
/// # Examples
///
/// A full single-finger curl gesture:
///
/// ```
/// use folio::{
///     GestureState, GestureStateMachine, InteractionTarget, TouchFrame, ViewState,
/// };
/// use lyon::math::{point, Point};
///
/// struct Recorder(Vec<&'static str>);
/// impl InteractionTarget for Recorder {
///     fn start_curving(&mut self, _: Point, _: f32) { self.0.push("start"); }
///     fn curving(&mut self, _: Point, _: f32) { self.0.push("move"); }
///     fn complete_curving(&mut self, _: Point, _: f32) { self.0.push("complete"); }
///     fn cancel_curving(&mut self, _: Point, _: f32) {}
///     fn start_resizing(&mut self) {}
///     fn resizing(&mut self, _: &[Point]) {}
///     fn complete_resizing(&mut self) {}
///     fn start_dragging(&mut self, _: Point) {}
///     fn dragging(&mut self, _: Point) {}
///     fn complete_dragging(&mut self, _: Point) {}
///     fn on_hot_area_hit(&mut self, _: u32) {}
/// }
///
/// let mut machine = GestureStateMachine::default();
/// let mut target = Recorder(Vec::new());
///
/// machine.process(&TouchFrame::down(point(10.0, 300.0)), ViewState::NotResized, &mut target);
/// machine.process(&TouchFrame::moved(point(60.0, 300.0)), ViewState::NotResized, &mut target);
/// machine.process(&TouchFrame::up(point(120.0, 300.0)), ViewState::NotResized, &mut target);
///
/// assert_eq!(machine.state(), GestureState::Final);
/// assert_eq!(target.0, ["start", "move", "complete"]);
/// ```
#[derive(Debug, Default)]
pub struct GestureStateMachine {
    state: GestureState,
    transformer: EventsTransformer,
    pending_hot_area: Option<u32>,
}

impl Default for GestureState {
    fn default() -> Self {
        GestureState::Init
    }
}

impl GestureStateMachine {
    pub fn new(transformer: EventsTransformer) -> Self {
        Self {
            state: GestureState::Init,
            transformer,
            pending_hot_area: None,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// The event transformer, for configuring hot areas and screen size.
    pub fn transformer_mut(&mut self) -> &mut EventsTransformer {
        &mut self.transformer
    }

    /// Processes the next touch frame, calling into `target` as transitions
    /// fire.
    pub fn process<T: InteractionTarget>(
        &mut self,
        frame: &TouchFrame,
        view_state: ViewState,
        target: &mut T,
    ) {
        self.try_reset();
        let event = self.transformer.transform(frame);
        let next = self.transition(event, view_state, target);
        if next != self.state {
            trace!(from = ?self.state, to = ?next, "gesture transition");
        }
        self.state = next;
    }

    /// Resets from the terminal state once the sequence is over.
    fn try_reset(&mut self) {
        if self.state == GestureState::Final {
            self.state = GestureState::Init;
            self.transformer.reset();
        }
    }

    fn transition<T: InteractionTarget>(
        &mut self,
        event: Event,
        view_state: ViewState,
        target: &mut T,
    ) -> GestureState {
        use GestureState::*;

        match (self.state, event) {
            (Init, Event::OneFingerDownInCurlingArea { points, pressure }) => {
                match points.first() {
                    Some(&point) if view_state == ViewState::NotResized => {
                        target.start_curving(point, pressure);
                        Curving
                    }
                    Some(&point) => {
                        target.start_dragging(point);
                        Dragging
                    }
                    None => Init,
                }
            }

            (Init, Event::OneFingerDown { points, .. }) => match points.first() {
                Some(&point) if view_state == ViewState::Resized => {
                    target.start_dragging(point);
                    Dragging
                }
                _ => Init,
            },

            (Init, Event::OneFingerDownInHotArea { area_id }) => {
                self.pending_hot_area = Some(area_id);
                HotAreaHit
            }

            (Init, Event::NextFingerDown { .. }) => {
                target.start_resizing();
                Resizing
            }

            (Curving, Event::Move { points, pressure }) => {
                if let Some(&point) = points.first() {
                    target.curving(point, pressure);
                }
                Curving
            }

            (Curving, Event::NextFingerDown { points, pressure }) => {
                if let Some(&point) = points.first() {
                    target.cancel_curving(point, pressure);
                }
                target.start_resizing();
                Resizing
            }

            (Curving, Event::OneFingerUp { points, pressure })
            | (Curving, Event::Cancel { points, pressure }) => {
                if let Some(&point) = points.first() {
                    target.complete_curving(point, pressure);
                }
                Final
            }

            (Resizing, Event::NextFingerDown { points, .. })
            | (Resizing, Event::Move { points, .. }) => {
                target.resizing(&points);
                Resizing
            }

            (
                Resizing,
                Event::NextFingerUp {
                    points,
                    finger_index,
                },
            ) => {
                // The lifted finger is still part of the point list.
                if points.len() > 2 {
                    target.resizing(&points);
                    Resizing
                } else {
                    target.complete_resizing();
                    if view_state == ViewState::NotResized {
                        Curving
                    } else {
                        let remaining = if finger_index == 0 {
                            points.get(1)
                        } else {
                            points.first()
                        };
                        match remaining {
                            Some(&point) => {
                                target.start_dragging(point);
                                Dragging
                            }
                            None => Final,
                        }
                    }
                }
            }

            (Dragging, Event::Move { points, .. }) => {
                if let Some(&point) = points.first() {
                    target.dragging(point);
                }
                Dragging
            }

            (Dragging, Event::NextFingerDown { points, .. }) => {
                if let Some(&point) = points.first() {
                    target.complete_dragging(point);
                }
                target.start_resizing();
                Resizing
            }

            (Dragging, Event::OneFingerUp { points, .. })
            | (Dragging, Event::Cancel { points, .. }) => {
                if let Some(&point) = points.first() {
                    target.complete_dragging(point);
                }
                Final
            }

            (HotAreaHit, Event::OneFingerUp { .. }) => {
                if let Some(id) = self.pending_hot_area.take() {
                    target.on_hot_area_hit(id);
                }
                Init
            }

            // Everything else is deliberately a silent no-op.
            (state, _) => state,
        }
    }
}
