use lyon::math::Point;

use super::events::{Area, Event, TouchFrame, TouchPhase};

// Substituted when touch pressure is unavailable or disabled. Reported
// pressure is wildly device-dependent, so a fixed nominal value is the
// default.
const NOMINAL_PRESSURE: f32 = 0.8;

/// Tunables for [`EventsTransformer`].
#[derive(Debug, Clone)]
pub struct TransformerConfig {
    /// Pass through the platform's touch pressure instead of the nominal
    /// value.
    pub use_touch_pressure: bool,
    /// Enable the central neutral band in which a first touch is a plain
    /// finger-down rather than a curl grab.
    pub non_curling_band: bool,
    /// Coalesce consecutive move events closer than this many pixels.
    /// Disabled when `None`.
    pub move_coalescing_px: Option<f32>,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            use_touch_pressure: false,
            non_curling_band: true,
            move_coalescing_px: None,
        }
    }
}

/// Classifies raw touch frames into semantic gesture [`Event`]s.
///
/// Holds no state besides last-move bookkeeping for the optional coalescing
/// and the session configuration (hot areas, screen size).
///
/// # Examples
///
/// ```
/// use folio::{Event, EventsTransformer, TouchFrame};
/// use lyon::math::point;
///
/// let mut transformer = EventsTransformer::default();
/// transformer.set_screen_size(1080.0, 1920.0);
///
/// // A touch at the left edge grabs the page for curling.
/// let event = transformer.transform(&TouchFrame::down(point(10.0, 900.0)));
/// assert!(matches!(event, Event::OneFingerDownInCurlingArea { .. }));
///
/// // A touch in the central band is a plain finger-down.
/// let event = transformer.transform(&TouchFrame::down(point(540.0, 900.0)));
/// assert!(matches!(event, Event::OneFingerDown { .. }));
/// ```
#[derive(Debug, Default)]
pub struct EventsTransformer {
    config: TransformerConfig,
    screen_size: Option<(f32, f32)>,
    hot_areas: Vec<Area>,
    last_move_point: Option<Point>,
}

impl EventsTransformer {
    pub fn new(config: TransformerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Screen size in pixels; required for the neutral band computation.
    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        self.screen_size = Some((width, height));
    }

    /// Sets the hot areas. A first touch inside one fires
    /// [`Event::OneFingerDownInHotArea`]; the first area in configured order
    /// wins.
    pub fn set_hot_areas(&mut self, areas: Vec<Area>) {
        self.hot_areas = areas;
    }

    /// Resets internal bookkeeping.
    pub fn reset(&mut self) {
        self.last_move_point = None;
    }

    /// Classifies one raw frame into exactly one semantic event.
    pub fn transform(&mut self, frame: &TouchFrame) -> Event {
        let pressure = self.resolve_pressure(frame.pressure);
        match frame.phase {
            TouchPhase::Down => self.action_down_event(frame, pressure),
            TouchPhase::PointerDown => {
                self.last_move_point = None;
                Event::NextFingerDown {
                    points: frame.points.clone(),
                    pressure,
                }
            }
            TouchPhase::Move => self.move_event(frame, pressure),
            TouchPhase::Up => {
                self.last_move_point = None;
                Event::OneFingerUp {
                    points: frame.points.clone(),
                    pressure,
                }
            }
            TouchPhase::PointerUp => {
                self.last_move_point = None;
                Event::NextFingerUp {
                    points: frame.points.clone(),
                    finger_index: frame.action_index,
                }
            }
            TouchPhase::Cancel => {
                self.last_move_point = None;
                Event::Cancel {
                    points: frame.points.clone(),
                    pressure,
                }
            }
        }
    }

    fn action_down_event(&mut self, frame: &TouchFrame, pressure: f32) -> Event {
        let Some(&first) = frame.points.first() else {
            return Event::None;
        };

        if let Some(area) = self.hot_areas.iter().find(|area| area.contains(first)) {
            return Event::OneFingerDownInHotArea { area_id: area.id };
        }

        if self.point_in_neutral_band(first) {
            Event::OneFingerDown {
                points: frame.points.clone(),
                pressure,
            }
        } else {
            Event::OneFingerDownInCurlingArea {
                points: frame.points.clone(),
                pressure,
            }
        }
    }

    fn move_event(&mut self, frame: &TouchFrame, pressure: f32) -> Event {
        if let (Some(threshold), Some(&first)) = (self.config.move_coalescing_px, frame.points.first())
        {
            if let Some(last) = self.last_move_point {
                if (first - last).length() < threshold {
                    return Event::None;
                }
            }
            self.last_move_point = Some(first);
        }

        Event::Move {
            points: frame.points.clone(),
            pressure,
        }
    }

    /// Central band of the screen in which a touch is neutral instead of a
    /// curl grab: one fifth of the width on a portrait screen, one tenth on
    /// a landscape one, measured from each side.
    fn point_in_neutral_band(&self, point: Point) -> bool {
        if !self.config.non_curling_band {
            return false;
        }
        let Some((width, height)) = self.screen_size else {
            return false;
        };

        let band_factor = if width < height { 0.2 } else { 0.1 };
        let lower = width * band_factor;
        point.x >= lower && point.x <= width - lower
    }

    fn resolve_pressure(&self, reported: Option<f32>) -> f32 {
        match reported {
            Some(pressure) if self.config.use_touch_pressure => pressure,
            _ => NOMINAL_PRESSURE,
        }
    }
}
