//! Property-based tests for slot addressing.

use core_viewport::{SlotId, slot_index};
use proptest::prelude::*;
use std::num::NonZeroUsize;

proptest! {
    // Slot always falls inside the page and wraps every page_size lines
    #[test]
    fn slot_within_page(line in 0usize..1_000_000, page in 1usize..500) {
        let p = NonZeroUsize::new(page).unwrap();
        let slot = slot_index(line, p);
        prop_assert!(slot < page);
        prop_assert_eq!(slot_index(line + page, p), slot);
    }

    // The textual id is `line-<line % page>` and parses back to the same slot
    #[test]
    fn id_text_contract(line in 0usize..1_000_000, page in 1usize..500) {
        let id = SlotId::for_line(line, NonZeroUsize::new(page).unwrap());
        let text = id.to_string();
        prop_assert_eq!(&text, &format!("line-{}", line % page));
        prop_assert_eq!(text.parse::<SlotId>().unwrap(), id);
    }
}
