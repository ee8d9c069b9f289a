//! In-memory virtualized display surface.
//!
//! `SlotSurface` models a paginated line view: a pool of `page_size` slot
//! elements laid out one per row, of which any subset may be mounted, and a
//! viewport of `height` rows looking into them. Scrolling an element into view
//! moves the viewport; smooth scrolls are left as a pending animation that the
//! owner settles with [`SlotSurface::finish_animation`].
//!
//! Guarantees:
//! * `viewport().first_row()` never exceeds `content_rows() - height` (saturating).
//! * A scroll request is recorded on the element it was issued against.

use crate::slot::SlotId;
use crate::surface::{
    DisplaySurface, ScrollBehavior, ScrollBlock, ScrollIntoViewOptions, ScrollTarget,
};
use std::num::NonZeroUsize;
use tracing::debug;

/// Visible window over the slot rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    first_row: usize,
    height: usize,
}

impl Viewport {
    /// Height is raised to one row when zero.
    pub fn new(first_row: usize, height: usize) -> Self {
        Self {
            first_row,
            height: height.max(1),
        }
    }

    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Always at least one row.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, row: usize) -> bool {
        row >= self.first_row && row - self.first_row < self.height
    }

    /// Unclamped first row that puts `row` at `block`.
    pub fn first_row_for(&self, row: usize, block: ScrollBlock) -> usize {
        match block {
            ScrollBlock::Start => row,
            ScrollBlock::Center => row.saturating_sub(self.height / 2),
            ScrollBlock::End => row.saturating_sub(self.height.saturating_sub(1)),
            ScrollBlock::Nearest => {
                if row < self.first_row {
                    row
                } else if self.contains(row) {
                    self.first_row
                } else {
                    (row + 1).saturating_sub(self.height)
                }
            }
        }
    }
}

/// Smooth scroll in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollAnimation {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotElement {
    history: Vec<ScrollIntoViewOptions>,
}

impl SlotElement {
    /// Scroll requests received since the element was mounted, oldest first.
    pub fn scroll_history(&self) -> &[ScrollIntoViewOptions] {
        &self.history
    }
}

#[derive(Debug, Clone)]
pub struct SlotSurface {
    slots: Vec<Option<SlotElement>>,
    viewport: Viewport,
    animation: Option<ScrollAnimation>,
    last_scrolled: Option<SlotId>,
}

impl SlotSurface {
    /// Empty surface with a pool of `page_size` unmounted slots.
    pub fn new(page_size: NonZeroUsize, viewport_rows: usize) -> Self {
        Self {
            slots: vec![None; page_size.get()],
            viewport: Viewport::new(0, viewport_rows),
            animation: None,
            last_scrolled: None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.slots.len()
    }

    /// Mount the element for `slot`. Returns false when the slot is outside
    /// the pool. Mounting an already mounted slot keeps its history.
    pub fn mount(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                entry.get_or_insert_with(SlotElement::default);
                true
            }
            None => false,
        }
    }

    /// Mount slots `0..rows` (capped at the pool size) and unmount the rest.
    pub fn mount_rows(&mut self, rows: usize) {
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            if slot < rows {
                entry.get_or_insert_with(SlotElement::default);
            } else {
                *entry = None;
            }
        }
        self.clamp_to_content();
    }

    /// Returns true when the slot was mounted.
    pub fn unmount(&mut self, slot: usize) -> bool {
        let removed = self
            .slots
            .get_mut(slot)
            .and_then(Option::take)
            .is_some();
        if removed {
            self.clamp_to_content();
        }
        removed
    }

    pub fn is_mounted(&self, slot: usize) -> bool {
        matches!(self.slots.get(slot), Some(Some(_)))
    }

    pub fn element(&self, id: &SlotId) -> Option<&SlotElement> {
        self.slots.get(id.slot()).and_then(Option::as_ref)
    }

    /// Rows up to and including the last mounted slot.
    pub fn content_rows(&self) -> usize {
        self.slots
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn animation(&self) -> Option<ScrollAnimation> {
        self.animation
    }

    /// Where the viewport rests once any pending animation completes.
    pub fn target_first_row(&self) -> usize {
        self.animation.map_or(self.viewport.first_row, |a| a.to)
    }

    /// Settle a pending smooth scroll. Returns true when one was pending.
    pub fn finish_animation(&mut self) -> bool {
        match self.animation.take() {
            Some(anim) => {
                self.viewport.first_row = anim.to;
                true
            }
            None => false,
        }
    }

    pub fn last_scrolled(&self) -> Option<SlotId> {
        self.last_scrolled
    }

    fn max_first_row(&self) -> usize {
        self.content_rows().saturating_sub(self.viewport.height)
    }

    fn clamp_to_content(&mut self) {
        let max = self.max_first_row();
        self.viewport.first_row = self.viewport.first_row.min(max);
        if let Some(anim) = self.animation.as_mut() {
            anim.to = anim.to.min(max);
        }
    }

    fn scroll_row_into_view(&mut self, row: usize, options: ScrollIntoViewOptions) {
        let from = self.viewport.first_row;
        let to = self
            .viewport
            .first_row_for(row, options.block)
            .min(self.max_first_row());
        match options.behavior {
            ScrollBehavior::Smooth if to != from => {
                self.animation = Some(ScrollAnimation { from, to });
            }
            ScrollBehavior::Smooth => self.animation = None,
            ScrollBehavior::Instant | ScrollBehavior::Auto => {
                self.viewport.first_row = to;
                self.animation = None;
            }
        }
        debug!(
            target: "viewport",
            row,
            from,
            to,
            behavior = ?options.behavior,
            block = ?options.block,
            "scroll_into_view"
        );
    }
}

/// Mutable handle to a mounted slot element.
pub struct SlotHandle<'a> {
    surface: &'a mut SlotSurface,
    slot: usize,
}

impl SlotHandle<'_> {
    pub fn id(&self) -> SlotId {
        SlotId::new(self.slot)
    }
}

impl ScrollTarget for SlotHandle<'_> {
    fn scroll_into_view(&mut self, options: ScrollIntoViewOptions) {
        if let Some(Some(element)) = self.surface.slots.get_mut(self.slot) {
            element.history.push(options);
        }
        self.surface.last_scrolled = Some(SlotId::new(self.slot));
        self.surface.scroll_row_into_view(self.slot, options);
    }
}

impl DisplaySurface for SlotSurface {
    type Element<'a> = SlotHandle<'a>;

    fn element_by_id(&mut self, id: &SlotId) -> Option<SlotHandle<'_>> {
        if self.is_mounted(id.slot()) {
            Some(SlotHandle {
                surface: self,
                slot: id.slot(),
            })
        } else {
            None
        }
    }
}
