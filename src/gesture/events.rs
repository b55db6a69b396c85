use lyon::math::Point;
use smallvec::SmallVec;

/// Touch point list for one frame. Inline capacity covers a whole hand.
pub type TouchPoints = SmallVec<[Point; 5]>;

/// A rectangular touch zone that triggers a semantic action instead of page
/// interaction, configured by the host (e.g. a menu corner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub id: u32,
    pub left_top: Point,
    pub width: f32,
    pub height: f32,
}

impl Area {
    pub fn new(id: u32, left_top: Point, width: f32, height: f32) -> Self {
        Self {
            id,
            left_top,
            width,
            height,
        }
    }

    /// Is the point inside the area? Bounds are inclusive.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left_top.x
            && point.x <= self.left_top.x + self.width
            && point.y >= self.left_top.y
            && point.y <= self.left_top.y + self.height
    }
}

/// What happened in a raw touch frame, before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    /// First finger touched down.
    Down,
    /// An additional finger touched down while others are held.
    PointerDown,
    Move,
    /// The last finger lifted.
    Up,
    /// A finger lifted while others remain.
    PointerUp,
    /// The system cancelled the touch sequence or it left the surface.
    Cancel,
}

/// One raw multi-touch frame as delivered by the platform.
#[derive(Debug, Clone)]
pub struct TouchFrame {
    pub phase: TouchPhase,
    /// Positions of all fingers currently tracked, in screen pixels.
    pub points: TouchPoints,
    /// Touch pressure, if the platform reports one.
    pub pressure: Option<f32>,
    /// Index of the finger the phase applies to (used by `PointerUp`).
    pub action_index: usize,
}

impl TouchFrame {
    fn single(phase: TouchPhase, point: Point) -> Self {
        let mut points = TouchPoints::new();
        points.push(point);
        Self {
            phase,
            points,
            pressure: None,
            action_index: 0,
        }
    }

    pub fn down(point: Point) -> Self {
        Self::single(TouchPhase::Down, point)
    }

    pub fn moved(point: Point) -> Self {
        Self::single(TouchPhase::Move, point)
    }

    pub fn up(point: Point) -> Self {
        Self::single(TouchPhase::Up, point)
    }

    pub fn cancel(point: Point) -> Self {
        Self::single(TouchPhase::Cancel, point)
    }

    pub fn pointer_down(points: &[Point]) -> Self {
        Self {
            phase: TouchPhase::PointerDown,
            points: TouchPoints::from_slice(points),
            pressure: None,
            action_index: points.len().saturating_sub(1),
        }
    }

    pub fn pointer_up(points: &[Point], lifted_index: usize) -> Self {
        Self {
            phase: TouchPhase::PointerUp,
            points: TouchPoints::from_slice(points),
            pressure: None,
            action_index: lifted_index,
        }
    }

    pub fn multi_move(points: &[Point]) -> Self {
        Self {
            phase: TouchPhase::Move,
            points: TouchPoints::from_slice(points),
            pressure: None,
            action_index: 0,
        }
    }

    pub fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = Some(pressure);
        self
    }
}

/// A semantic gesture event, classified from one raw [`TouchFrame`].
///
/// Each variant carries only the fields relevant to it.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Nothing worth reporting (unknown phase, or a coalesced move).
    None,
    /// First finger down in the neutral zone.
    OneFingerDown { points: TouchPoints, pressure: f32 },
    /// First finger down in a page-curling zone.
    OneFingerDownInCurlingArea { points: TouchPoints, pressure: f32 },
    /// First finger down inside a configured hot area.
    OneFingerDownInHotArea { area_id: u32 },
    /// An additional finger down while others are held.
    NextFingerDown { points: TouchPoints, pressure: f32 },
    Move { points: TouchPoints, pressure: f32 },
    /// A finger lifted while others remain; carries which one.
    NextFingerUp {
        points: TouchPoints,
        finger_index: usize,
    },
    /// The last finger lifted.
    OneFingerUp { points: TouchPoints, pressure: f32 },
    Cancel { points: TouchPoints, pressure: f32 },
}
