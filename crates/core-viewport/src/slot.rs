//! Slot addressing for a recycled pool of line elements.
//!
//! A paginated view keeps one element per row of a page and reuses them from
//! page to page. Logical line `n` is therefore shown by the element in slot
//! `n % page_size`, whose identifier is `line-<slot>`. The identifier text is
//! shared with whatever renders the elements and must not change.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use thiserror::Error;

const PREFIX: &str = "line-";

/// Slot of the element displaying `line_number` on a page of `page_size` rows.
pub fn slot_index(line_number: usize, page_size: NonZeroUsize) -> usize {
    line_number % page_size
}

/// Identifier of a slot element, rendered as `line-<slot>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

impl SlotId {
    pub const fn new(slot: usize) -> Self {
        Self(slot)
    }

    pub fn for_line(line_number: usize, page_size: NonZeroUsize) -> Self {
        Self(slot_index(line_number, page_size))
    }

    pub const fn slot(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotIdError {
    #[error("slot id `{0}` does not start with `line-`")]
    MissingPrefix(String),
    #[error("slot id `{0}` has no valid slot number")]
    InvalidSlot(String),
}

impl FromStr for SlotId {
    type Err = SlotIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| SlotIdError::MissingPrefix(s.to_owned()))?;
        // usize::from_str would also take a leading '+'
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SlotIdError::InvalidSlot(s.to_owned()));
        }
        digits
            .parse()
            .map(Self)
            .map_err(|_| SlotIdError::InvalidSlot(s.to_owned()))
    }
}
