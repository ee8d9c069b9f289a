//! Display surface abstraction.
//!
//! The surface owns the on-screen line elements and the scroll position. Line
//! scrolling only needs two capabilities from it: look an element up by its
//! slot identifier and ask that element to bring itself into view.

use crate::slot::SlotId;
use serde::Deserialize;

/// How the scroll position moves to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Animated motion.
    #[default]
    Smooth,
    /// Jump straight to the destination.
    Instant,
    /// Surface default; treated as a jump by [`crate::SlotSurface`].
    Auto,
}

/// Where the element ends up within the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    Start,
    #[default]
    Center,
    End,
    /// Move as little as possible; no movement when already visible.
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollIntoViewOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollIntoViewOptions {
    pub const fn new(behavior: ScrollBehavior, block: ScrollBlock) -> Self {
        Self { behavior, block }
    }
}

/// An element that can be scrolled into the viewport of its surface.
pub trait ScrollTarget {
    fn scroll_into_view(&mut self, options: ScrollIntoViewOptions);
}

/// A rendering target exposing line elements by slot identifier.
pub trait DisplaySurface {
    type Element<'a>: ScrollTarget
    where
        Self: 'a;

    /// The element currently displayed for `id`, if any.
    fn element_by_id(&mut self, id: &SlotId) -> Option<Self::Element<'_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_smooth_center() {
        let o = ScrollIntoViewOptions::default();
        assert_eq!(o.behavior, ScrollBehavior::Smooth);
        assert_eq!(o.block, ScrollBlock::Center);
    }
}
