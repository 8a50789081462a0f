use log::{warn, Level};
use serde::Deserialize;

use crate::carousel::CarouselError;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose carousel tracing while running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

const CAROUSEL_JSON: &str = include_str!("../assets/carousel.json");

/// Carousel settings shipped with the site. A broken file falls back to the
/// defaults rather than disabling the carousel.
pub fn carousel_config() -> CarouselConfig {
    CarouselConfig::from_json(CAROUSEL_JSON).unwrap_or_else(|err| {
        warn!("{}, falling back to default carousel config", err);
        CarouselConfig::default()
    })
}

/// Viewport widths (px) at which the carousel shows more cards at once.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub two_up: f64,
    pub three_up: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            two_up: 640.0,   // sm
            three_up: 1024.0, // lg
        }
    }
}

/// Tunables for the testimonial carousel.
///
/// Loaded from `assets/carousel.json`, e.g. `{"autoplay_interval_ms": 6000}`.
/// Missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Gap between cards, matches Tailwind's `gap-8`.
    pub gap_px: f64,
    pub breakpoints: Breakpoints,
    /// Length of the CSS transform transition.
    pub transition_ms: u32,
    /// Fires if `transitionend` never arrives. Must outlast `transition_ms`.
    pub transition_fallback_ms: u32,
    pub autoplay_interval_ms: u32,
    /// Horizontal bias used when locking the drag axis.
    pub axis_lock_buffer_px: f64,
    /// A swipe commits once it travels more than `slide_width / divisor`.
    pub swipe_threshold_divisor: f64,
    pub resize_debounce_ms: u32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            gap_px: 32.0,
            breakpoints: Breakpoints::default(),
            transition_ms: 600,
            transition_fallback_ms: 700,
            autoplay_interval_ms: 4000,
            axis_lock_buffer_px: 5.0,
            swipe_threshold_divisor: 5.0,
            resize_debounce_ms: 150,
        }
    }
}

impl CarouselConfig {
    pub fn from_json(raw: &str) -> Result<Self, CarouselError> {
        let config: CarouselConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CarouselError> {
        let invalid = |reason: &str| Err(CarouselError::InvalidConfig(reason.to_string()));

        if !(self.gap_px >= 0.0) {
            return invalid("gap_px must not be negative");
        }
        if !(self.swipe_threshold_divisor > 0.0) {
            return invalid("swipe_threshold_divisor must be positive");
        }
        if !(self.axis_lock_buffer_px >= 0.0) {
            return invalid("axis_lock_buffer_px must not be negative");
        }
        if self.autoplay_interval_ms == 0 {
            return invalid("autoplay_interval_ms must be positive");
        }
        if self.transition_fallback_ms <= self.transition_ms {
            return invalid("transition_fallback_ms must be longer than transition_ms");
        }
        if self.breakpoints.two_up > self.breakpoints.three_up {
            return invalid("breakpoints.two_up must not exceed breakpoints.three_up");
        }
        Ok(())
    }
}
