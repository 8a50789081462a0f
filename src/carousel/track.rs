use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Original,
    Clone,
}

/// One card position in the extended track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSlot {
    /// Index of the original testimonial this card shows.
    pub original: usize,
    pub kind: SlotKind,
}

/// The originals with `items_per_view` clones of the tail in front and
/// `items_per_view` clones of the head behind, so the strip can animate past
/// either end before snapping back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedTrack {
    item_count: usize,
    items_per_view: usize,
    slots: Vec<TrackSlot>,
}

impl ExtendedTrack {
    pub fn build(item_count: usize, items_per_view: usize) -> Self {
        let clone_of = |original| TrackSlot {
            original,
            kind: SlotKind::Clone,
        };

        let mut slots = Vec::with_capacity(item_count + 2 * items_per_view);
        if item_count > 0 {
            // Sources wrap when there are fewer items than fit in view, so each
            // side always carries exactly `items_per_view` clones.
            slots.extend(
                (0..items_per_view)
                    .map(|k| (k + item_count * items_per_view - items_per_view) % item_count)
                    .map(clone_of),
            );
            slots.extend((0..item_count).map(|original| TrackSlot {
                original,
                kind: SlotKind::Original,
            }));
            slots.extend((0..items_per_view).map(|k| k % item_count).map(clone_of));
        }

        Self {
            item_count,
            items_per_view,
            slots,
        }
    }

    #[cfg(test)]
    pub fn slots(&self) -> &[TrackSlot] {
        &self.slots
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Clones placed before the first original.
    pub fn leading(&self) -> &[TrackSlot] {
        &self.slots[..self.first_real().min(self.slots.len())]
    }

    /// Clones placed after the last original.
    pub fn trailing(&self) -> &[TrackSlot] {
        &self.slots[self.real_range().end.min(self.slots.len())..]
    }

    pub fn first_real(&self) -> usize {
        self.items_per_view
    }

    pub fn real_range(&self) -> Range<usize> {
        self.items_per_view..self.items_per_view + self.item_count
    }
}
