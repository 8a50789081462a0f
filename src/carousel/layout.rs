//! Geometry and index arithmetic shared by the controller.

use crate::config::Breakpoints;

pub fn items_per_view(viewport_width: f64, breakpoints: &Breakpoints) -> usize {
    if viewport_width >= breakpoints.three_up {
        3
    } else if viewport_width >= breakpoints.two_up {
        2
    } else {
        1
    }
}

/// Flex-basis for every card so that `items_per_view` cards and their gaps
/// fill the wrapper exactly.
pub fn card_basis(wrapper_width: f64, items_per_view: usize, gap: f64) -> f64 {
    if items_per_view > 1 {
        let per_view = items_per_view as f64;
        (wrapper_width - (per_view - 1.0) * gap) / per_view
    } else {
        wrapper_width
    }
}

/// Distance between two adjacent cards, which includes the gap.
pub fn slide_width(first_two_card_lefts: Option<(f64, f64)>, wrapper_width: f64) -> f64 {
    match first_two_card_lefts {
        Some((first, second)) => second - first,
        None => wrapper_width,
    }
}

pub fn track_offset(slide_width: f64, index: usize, drag_offset: f64) -> f64 {
    -slide_width * index as f64 + drag_offset
}

/// Which original item `index` (into the extended track) shows.
pub fn active_dot(index: usize, items_per_view: usize, item_count: usize) -> usize {
    let n = item_count as isize;
    let real = index as isize - items_per_view as isize;
    ((real % n + n) % n) as usize
}
