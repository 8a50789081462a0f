//! Drag-to-swipe bookkeeping for a single pointer or touch gesture.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// Axis not decided yet, or the gesture belongs to page scrolling.
    Ignored,
    /// Horizontal drag; the strip follows the pointer by `offset` px.
    Follow { offset: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Next,
    Prev,
    SnapBack,
    /// Vertical or undecided gesture, nothing to undo.
    Ignore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    pub start_x: f64,
    pub start_y: f64,
    pub axis: Option<Axis>,
    pub offset: f64,
}

impl DragGesture {
    pub fn start(x: f64, y: f64) -> Self {
        Self {
            start_x: x,
            start_y: y,
            axis: None,
            offset: 0.0,
        }
    }

    pub fn track(&mut self, x: f64, y: f64, buffer: f64) -> DragUpdate {
        if self.axis.is_none() {
            let dx = (x - self.start_x).abs();
            let dy = (y - self.start_y).abs();
            if dx <= buffer && dy <= buffer {
                return DragUpdate::Ignored;
            }
            // Biased towards vertical so the page keeps scrolling on phones.
            self.axis = Some(if dx > dy + buffer {
                Axis::Horizontal
            } else {
                Axis::Vertical
            });
        }

        match self.axis {
            Some(Axis::Horizontal) => {
                self.offset = x - self.start_x;
                DragUpdate::Follow {
                    offset: self.offset,
                }
            }
            _ => DragUpdate::Ignored,
        }
    }

    pub fn release(&self, slide_width: f64, threshold_divisor: f64) -> Release {
        if self.axis != Some(Axis::Horizontal) {
            return Release::Ignore;
        }
        let threshold = slide_width / threshold_divisor;
        if self.offset < -threshold {
            Release::Next
        } else if self.offset > threshold {
            Release::Prev
        } else {
            Release::SnapBack
        }
    }
}
