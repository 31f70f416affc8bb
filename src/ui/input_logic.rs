/// Move selection cursor one item up, wrapping to the last item.
pub fn select_prev(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    (selected % item_count + item_count - 1) % item_count
}

/// Move selection cursor one item down, wrapping to the first item.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    (selected % item_count + 1) % item_count
}

/// Pull a remembered index back inside a list that may have shrunk.
pub fn clamp_selection(selected: usize, item_count: usize) -> usize {
    selected.min(item_count.saturating_sub(1))
}
