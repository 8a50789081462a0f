use log::{debug, trace};

use super::gesture::{DragGesture, DragUpdate, Release};
use super::layout;
use super::surface::{RenderSurface, TimerKind, Timers};
use super::track::ExtendedTrack;
use super::CarouselError;
use crate::config::CarouselConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub items_per_view: usize,
    pub slide_width: f64,
    /// Index into the extended track, not into the testimonials.
    pub current_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Settled,
    /// A slide move is animating; further moves are dropped until it finishes.
    Transitioning,
}

pub struct CarouselController<S: RenderSurface, T: Timers> {
    surface: S,
    timers: T,
    config: CarouselConfig,
    item_count: usize,
    view: ViewState,
    track: ExtendedTrack,
    motion: Motion,
    drag: Option<DragGesture>,
    autoplay: Option<T::Handle>,
    fallback: Option<T::Handle>,
}

impl<S: RenderSurface, T: Timers> CarouselController<S, T> {
    /// Nothing is painted until [`initialize`](Self::initialize) runs.
    pub fn new(
        surface: S,
        timers: T,
        item_count: usize,
        config: CarouselConfig,
    ) -> Result<Self, CarouselError> {
        if item_count == 0 {
            return Err(CarouselError::NoItems);
        }
        config.validate()?;

        let items_per_view = layout::items_per_view(surface.viewport_width(), &config.breakpoints);
        Ok(Self {
            surface,
            timers,
            config,
            item_count,
            view: ViewState {
                items_per_view,
                slide_width: 0.0,
                current_index: items_per_view,
            },
            track: ExtendedTrack::build(item_count, items_per_view),
            motion: Motion::Settled,
            drag: None,
            autoplay: None,
            fallback: None,
        })
    }

    /// Rebuild clones for the current viewport, remeasure, jump to the first
    /// real item and start autoplay.
    pub fn initialize(&mut self) {
        self.stop_autoplay();
        self.fallback = None;
        self.motion = Motion::Settled;
        self.drag = None;

        let items_per_view =
            layout::items_per_view(self.surface.viewport_width(), &self.config.breakpoints);
        self.view.items_per_view = items_per_view;
        self.track = ExtendedTrack::build(self.item_count, items_per_view);
        self.surface.rebuild_track(&self.track);
        self.measure();

        self.view.current_index = items_per_view;
        self.surface.set_animated(false);
        self.paint(0.0);
        self.surface.render_dots(self.item_count);
        self.surface.set_active_dot(self.active_dot());

        debug!(
            "Carousel initialized: {} items, {} per view, slide width {}px",
            self.item_count, items_per_view, self.view.slide_width
        );
        self.start_autoplay();
    }

    fn measure(&mut self) {
        let wrapper_width = self.surface.wrapper_width();
        let basis = layout::card_basis(wrapper_width, self.view.items_per_view, self.config.gap_px);
        self.surface.set_card_basis(basis);
        self.view.slide_width =
            layout::slide_width(self.surface.first_card_lefts(), wrapper_width);
    }

    /// Returns `false` when the move was dropped because another one is in flight.
    pub fn move_to_slide(&mut self, index: usize) -> bool {
        if self.motion == Motion::Transitioning {
            trace!("Dropping move to {} while transitioning", index);
            return false;
        }

        self.motion = Motion::Transitioning;
        self.view.current_index = index;
        self.surface.set_animated(true);
        self.paint(0.0);
        self.surface.set_active_dot(self.active_dot());

        self.fallback = None;
        self.fallback = Some(self.timers.after(
            TimerKind::TransitionFallback,
            self.config.transition_fallback_ms,
        ));
        true
    }

    /// Ends the in-flight move. If it ran onto a clone, jumps to the matching
    /// real item with the transition disabled so the snap is invisible.
    pub fn finish_transition(&mut self) {
        if self.motion != Motion::Transitioning {
            return;
        }
        self.fallback = None;
        self.motion = Motion::Settled;

        let ViewState {
            items_per_view,
            current_index,
            ..
        } = self.view;
        let corrected = if current_index < items_per_view {
            current_index + self.item_count
        } else if current_index >= self.item_count + items_per_view {
            current_index - self.item_count
        } else {
            return;
        };

        trace!("Wrapping carousel index {} -> {}", current_index, corrected);
        self.view.current_index = corrected;
        self.surface.set_animated(false);
        self.paint(0.0);
    }

    pub fn next(&mut self) -> bool {
        self.move_to_slide(self.view.current_index + 1)
    }

    pub fn prev(&mut self) -> bool {
        match self.view.current_index.checked_sub(1) {
            Some(index) => self.move_to_slide(index),
            None => false,
        }
    }

    pub fn go_to_dot(&mut self, dot: usize) -> bool {
        if dot >= self.item_count {
            debug!("Ignoring click on unknown dot {}", dot);
            return false;
        }
        self.move_to_slide(dot + self.view.items_per_view)
    }

    pub fn handle_drag_start(&mut self, x: f64, y: f64) {
        self.drag = Some(DragGesture::start(x, y));
        self.surface.set_animated(false);
        self.stop_autoplay();
    }

    /// Returns `true` once the gesture is a horizontal swipe, in which case the
    /// caller should stop the page from scrolling.
    pub fn handle_drag_move(&mut self, x: f64, y: f64) -> bool {
        let buffer = self.config.axis_lock_buffer_px;
        let update = match self.drag.as_mut() {
            Some(drag) => drag.track(x, y, buffer),
            None => return false,
        };

        match update {
            DragUpdate::Follow { offset } => {
                self.paint(offset);
                true
            }
            DragUpdate::Ignored => false,
        }
    }

    pub fn handle_drag_end(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        self.surface.set_animated(true);

        // A rejected swipe (slide still moving) snaps back like a short one.
        match drag.release(self.view.slide_width, self.config.swipe_threshold_divisor) {
            Release::Next => {
                if !self.next() {
                    self.paint(0.0);
                }
            }
            Release::Prev => {
                if !self.prev() {
                    self.paint(0.0);
                }
            }
            Release::SnapBack => self.paint(0.0),
            Release::Ignore => {}
        }

        self.start_autoplay();
    }

    pub fn pause_autoplay(&mut self) {
        self.stop_autoplay();
    }

    /// No-op mid-drag; the drag end restarts autoplay itself.
    pub fn resume_autoplay(&mut self) {
        if self.drag.is_none() {
            self.start_autoplay();
        }
    }

    fn stop_autoplay(&mut self) {
        self.autoplay = None;
    }

    fn start_autoplay(&mut self) {
        self.stop_autoplay();
        self.autoplay = Some(
            self.timers
                .every(TimerKind::Autoplay, self.config.autoplay_interval_ms),
        );
    }

    pub fn on_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Autoplay => {
                if self.drag.is_none() {
                    self.next();
                }
            }
            TimerKind::TransitionFallback => {
                if self.motion == Motion::Transitioning {
                    debug!("transitionend not received, finishing carousel move from fallback");
                }
                self.finish_transition();
            }
        }
    }

    pub fn on_transition_end(&mut self) {
        self.finish_transition();
    }

    pub fn on_resize(&mut self) {
        self.stop_autoplay();
        self.initialize();
    }

    fn paint(&mut self, drag_offset: f64) {
        self.surface.set_offset(layout::track_offset(
            self.view.slide_width,
            self.view.current_index,
            drag_offset,
        ));
    }

    pub fn active_dot(&self) -> usize {
        layout::active_dot(
            self.view.current_index,
            self.view.items_per_view,
            self.item_count,
        )
    }

    #[cfg(test)]
    pub fn view(&self) -> ViewState {
        self.view
    }

    #[cfg(test)]
    pub fn current_index(&self) -> usize {
        self.view.current_index
    }

    pub fn items_per_view(&self) -> usize {
        self.view.items_per_view
    }

    pub fn slide_width(&self) -> f64 {
        self.view.slide_width
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    #[cfg(test)]
    pub fn is_transitioning(&self) -> bool {
        self.motion == Motion::Transitioning
    }

    #[cfg(test)]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    #[cfg(test)]
    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_some()
    }

    #[cfg(test)]
    pub fn track(&self) -> &ExtendedTrack {
        &self.track
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}
