//! What the controller needs from the page: somewhere to paint and a clock.

use super::track::ExtendedTrack;

/// The carousel's view of the DOM. Writes are fire-and-forget; the only reads
/// are viewport and card geometry.
pub trait RenderSurface {
    fn viewport_width(&self) -> f64;
    fn wrapper_width(&self) -> f64;

    /// Drop existing clones and lay the track out as `track` describes.
    fn rebuild_track(&mut self, track: &ExtendedTrack);
    fn set_card_basis(&mut self, px: f64);
    /// Left edges of the first two cards after a layout flush, if there are two.
    fn first_card_lefts(&self) -> Option<(f64, f64)>;

    fn set_offset(&mut self, px: f64);
    /// `false` jumps straight to the next offset without the CSS transition.
    fn set_animated(&mut self, animated: bool);

    fn render_dots(&mut self, count: usize);
    fn set_active_dot(&mut self, index: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Autoplay,
    TransitionFallback,
}

/// Schedules callbacks that come back to the controller as
/// [`CarouselController::on_timer`](super::controller::CarouselController::on_timer).
/// Dropping a handle cancels its timer.
pub trait Timers {
    type Handle;

    fn every(&mut self, kind: TimerKind, period_ms: u32) -> Self::Handle;
    fn after(&mut self, kind: TimerKind, delay_ms: u32) -> Self::Handle;
}
