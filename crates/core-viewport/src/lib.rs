//! Scrolling a logical line into view on a paginated display.
//!
//! Lines are shown by a fixed pool of slot elements (see [`slot`]); the
//! element for line `n` is `line-<n % page_size>`. [`scroll_to_line`] finds
//! that element on a [`DisplaySurface`] and asks it to scroll into view,
//! centered and with smooth motion. A missing element is not an error.

use std::num::NonZeroUsize;
use tracing::{debug, trace};

pub mod slot;
pub mod slot_surface;
pub mod surface;

pub use slot::{SlotId, SlotIdError, slot_index};
pub use slot_surface::{ScrollAnimation, SlotElement, SlotHandle, SlotSurface, Viewport};
pub use surface::{
    DisplaySurface, ScrollBehavior, ScrollBlock, ScrollIntoViewOptions, ScrollTarget,
};

/// Scroll the element showing `line_number` to the vertical center of the
/// viewport using smooth motion. Does nothing when the element is not on the
/// surface.
pub fn scroll_to_line<S>(surface: &mut S, line_number: usize, page_size: NonZeroUsize)
where
    S: DisplaySurface + ?Sized,
{
    scroll_to_line_with(
        surface,
        line_number,
        page_size,
        ScrollIntoViewOptions::default(),
    );
}

/// [`scroll_to_line`] with explicit scroll options.
pub fn scroll_to_line_with<S>(
    surface: &mut S,
    line_number: usize,
    page_size: NonZeroUsize,
    options: ScrollIntoViewOptions,
) where
    S: DisplaySurface + ?Sized,
{
    let id = SlotId::for_line(line_number, page_size);
    match surface.element_by_id(&id) {
        Some(mut element) => {
            debug!(target: "viewport", line_number, slot = id.slot(), "scroll_to_line");
            element.scroll_into_view(options);
        }
        None => {
            trace!(target: "viewport", line_number, slot = id.slot(), "scroll_target_absent");
        }
    }
}
