//! Testimonial carousel: a looping, draggable, auto-advancing strip of cards.
//!
//! The state machine in [`controller`] knows nothing about the DOM. It talks
//! to the page through the [`surface`] traits, which [`dom`] implements with
//! `web-sys` and `gloo-timers`.

pub mod controller;
pub mod dom;
pub mod gesture;
pub mod layout;
pub mod surface;
pub mod track;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CarouselError {
    #[error("carousel has no testimonials to show")]
    NoItems,
    #[error("carousel element #{0} not found")]
    MissingElement(&'static str),
    #[error("invalid carousel config: {0}")]
    InvalidConfig(String),
    #[error("could not parse carousel config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("DOM operation failed: {0}")]
    Dom(String),
}
