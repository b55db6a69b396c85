use crate::renderer::Margins;

/// Smallest page margin, reached at full zoom. Margins are proportional and
/// negative: the page rectangle grows past the view as the margin shrinks.
pub const MIN_MARGIN: f32 = -0.5;
/// Margin of an unzoomed view.
pub const MAX_MARGIN: f32 = 0.0;
/// Scale of an unzoomed view.
pub const MIN_SCALE: f32 = 1.0;
/// Maximum pinch-zoom scale.
pub const MAX_SCALE: f32 = 2.0;

// Scale values this close above MIN_SCALE snap back to it, so float jitter
// from a pinch cannot leave the view stuck in resized mode.
const SCALE_SNAP_BAND: f32 = (MAX_SCALE - MIN_SCALE) * 0.05;

/// Pinch-zoom state: the current scale factor and the margins derived from it.
///
/// The scale is always clamped to `[MIN_SCALE, MAX_SCALE]`; margins move
/// linearly from `MAX_MARGIN` (unzoomed) to `MIN_MARGIN` (fully zoomed).
///
/// # Examples
///
/// ```
/// use folio::{Margins, ResizingState};
///
/// let mut state = ResizingState::new(Margins::default(), 1.0);
/// assert!(!state.is_resized());
///
/// state.update_scale_factor(0.5);
/// assert_eq!(state.scale_factor(), 1.5);
/// state.recalculate_margins_by_scale_factor();
/// assert_eq!(state.margins().left, -0.25);
/// ```
#[derive(Debug, Clone)]
pub struct ResizingState {
    margins: Margins,
    scale_factor: f32,
    is_resized: bool,
}

impl ResizingState {
    pub fn new(margins: Margins, scale_factor: f32) -> Self {
        let mut state = Self {
            margins: Margins {
                left: margins.left.clamp(MIN_MARGIN, MAX_MARGIN),
                top: margins.top.clamp(MIN_MARGIN, MAX_MARGIN),
                right: margins.right.clamp(MIN_MARGIN, MAX_MARGIN),
                bottom: margins.bottom.clamp(MIN_MARGIN, MAX_MARGIN),
            },
            scale_factor: MIN_SCALE,
            is_resized: false,
        };
        state.set_scale_factor(scale_factor);
        state
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Sets the scale factor, clamped to `[MIN_SCALE, MAX_SCALE]` and snapped
    /// to `MIN_SCALE` within the 5% deadband above it.
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        let mut scale = scale_factor.clamp(MIN_SCALE, MAX_SCALE);
        if scale <= MIN_SCALE + SCALE_SNAP_BAND {
            scale = MIN_SCALE;
        }
        self.scale_factor = scale;
        self.is_resized = self.scale_factor != MIN_SCALE;
    }

    /// Applies a relative scale change through the same clamp and snap.
    pub fn update_scale_factor(&mut self, delta: f32) {
        self.set_scale_factor(self.scale_factor + delta);
    }

    /// True when the view is zoomed in at all.
    pub fn is_resized(&self) -> bool {
        self.is_resized
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Derives margins from the current scale: zero margins at `MIN_SCALE`,
    /// `MIN_MARGIN` on every side at `MAX_SCALE`, linear in between.
    pub fn recalculate_margins_by_scale_factor(&mut self) {
        let margin = MIN_MARGIN * ((self.scale_factor - MIN_SCALE) / (MAX_SCALE - MIN_SCALE));
        self.margins = Margins {
            left: margin,
            top: margin,
            right: margin,
            bottom: margin,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_clamped() {
        let mut state = ResizingState::new(Margins::default(), 1.0);
        state.set_scale_factor(5.0);
        assert_eq!(state.scale_factor(), MAX_SCALE);
        state.set_scale_factor(-3.0);
        assert_eq!(state.scale_factor(), MIN_SCALE);
    }

    #[test]
    fn near_minimum_scale_snaps_to_exactly_one() {
        let mut state = ResizingState::new(Margins::default(), 1.0);
        state.set_scale_factor(1.04);
        assert_eq!(state.scale_factor(), 1.0);
        assert!(!state.is_resized());

        state.set_scale_factor(1.06);
        assert!(state.scale_factor() > 1.0);
        assert!(state.is_resized());
    }

    #[test]
    fn margins_are_linear_in_scale() {
        let mut state = ResizingState::new(Margins::default(), 1.0);
        state.recalculate_margins_by_scale_factor();
        assert_eq!(state.margins().left, 0.0);

        state.set_scale_factor(2.0);
        state.recalculate_margins_by_scale_factor();
        assert_eq!(state.margins().left, MIN_MARGIN);

        state.set_scale_factor(1.5);
        state.recalculate_margins_by_scale_factor();
        let m = state.margins();
        assert_eq!(m.left, MIN_MARGIN / 2.0);
        assert_eq!(m.left, m.top);
        assert_eq!(m.left, m.right);
        assert_eq!(m.left, m.bottom);
    }

    #[test]
    fn relative_updates_accumulate_through_the_clamp() {
        let mut state = ResizingState::new(Margins::default(), 1.5);
        state.update_scale_factor(0.3);
        assert_eq!(state.scale_factor(), 1.8);
        state.update_scale_factor(1.0);
        assert_eq!(state.scale_factor(), MAX_SCALE);
        // 2.0 - 0.97 lands inside the deadband, so it snaps.
        state.update_scale_factor(-0.97);
        assert_eq!(state.scale_factor(), 1.0);
    }
}
