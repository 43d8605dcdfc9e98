//! Course image slot assignment
//!
//! A saved course carries a sparse image list where `null` (or `""`) marks a
//! slot the operator cleared. Freshly uploaded files fill those gaps first,
//! in order, and overflow is appended at the end.

/// Place `uploaded` URLs into the free slots of `slots`.
///
/// One forward-only cursor: each URL goes to the first free slot at or after
/// the cursor, and the cursor steps past it. Once the cursor runs off the
/// end the remaining URLs are appended.
pub fn fill_slots(
    slots: Vec<Option<String>>,
    uploaded: impl IntoIterator<Item = String>,
) -> Vec<Option<String>> {
    let mut slots: Vec<Option<String>> = slots
        .into_iter()
        .map(|slot| slot.filter(|src| !src.is_empty()))
        .collect();

    let mut cursor = 0;
    for url in uploaded {
        while cursor < slots.len() && slots[cursor].is_some() {
            cursor += 1;
        }
        if cursor < slots.len() {
            slots[cursor] = Some(url);
        } else {
            slots.push(Some(url));
        }
        cursor += 1;
    }
    slots
}

/// `(position, src)` for every occupied slot, in order
pub fn occupied(slots: &[Option<String>]) -> Vec<(i64, &str)> {
    slots
        .iter()
        .enumerate()
        .filter_map(|(position, slot)| slot.as_deref().map(|src| (position as i64, src)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(items: &[Option<&str>]) -> Vec<Option<String>> {
        items.iter().map(|s| s.map(str::to_string)).collect()
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_upload_fills_the_gap() {
        let filled = fill_slots(slots(&[Some("urlA"), None, Some("urlB")]), urls(&["urlX"]));
        assert_eq!(filled, slots(&[Some("urlA"), Some("urlX"), Some("urlB")]));
    }

    #[test]
    fn test_overflow_is_appended() {
        let filled = fill_slots(slots(&[None, Some("a")]), urls(&["x", "y", "z"]));
        assert_eq!(filled, slots(&[Some("x"), Some("a"), Some("y"), Some("z")]));
    }

    #[test]
    fn test_cursor_never_moves_back() {
        let filled = fill_slots(slots(&[None, Some("a"), None, None]), urls(&["x", "y"]));
        assert_eq!(filled, slots(&[Some("x"), Some("a"), Some("y"), None]));
    }

    #[test]
    fn test_empty_string_is_a_free_slot() {
        let filled = fill_slots(slots(&[Some(""), Some("a")]), urls(&["x"]));
        assert_eq!(filled, slots(&[Some("x"), Some("a")]));

        let untouched = fill_slots(slots(&[Some(""), Some("a")]), Vec::new());
        assert_eq!(untouched, slots(&[None, Some("a")]));
    }

    #[test]
    fn test_no_slots() {
        assert_eq!(fill_slots(Vec::new(), urls(&["x"])), slots(&[Some("x")]));
        assert!(fill_slots(Vec::new(), Vec::new()).is_empty());
    }

    #[test]
    fn test_occupied_keeps_positions() {
        let filled = slots(&[Some("a"), None, Some("b")]);
        assert_eq!(occupied(&filled), vec![(0, "a"), (2, "b")]);
    }
}
