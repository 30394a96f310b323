//! Page arithmetic for the listing: how many pages a set of posts spans, which
//! slice belongs to a page, and which page-number controls to show.

/// One entry in a pagination window: either a page number or a marker for a
/// run of skipped pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// The number of pages needed to show `len` items, `page_size` at a time.
/// Zero items means zero pages.
pub fn page_count(len: usize, page_size: usize) -> usize {
    match len % page_size {
        0 => len / page_size,
        _ => len / page_size + 1,
    }
}

/// Returns the items on 1-based page `page`. Pages past the end are empty
/// rather than an error.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let stop = start.saturating_add(page_size).min(items.len());
    &items[start..stop]
}

/// Computes the page-number controls to show for `current` out of `count`
/// pages. The first and last pages are always shown, as are the pages
/// immediately either side of `current`. A page exactly two away from
/// `current` (and not otherwise shown) becomes a single ellipsis standing in
/// for the gap beyond it.
pub fn window(current: usize, count: usize) -> Vec<PageItem> {
    let mut items = Vec::new();
    for i in 1..=count {
        if i == 1 || i == count || (current.saturating_sub(1) <= i && i <= current.saturating_add(1))
        {
            items.push(PageItem::Page(i));
        } else if current.checked_sub(2) == Some(i) || current.checked_add(2) == Some(i) {
            items.push(PageItem::Ellipsis);
        }
    }
    items
}

#[cfg(test)]
mod test {
    use super::PageItem::{Ellipsis, Page};
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 6), 0);
        assert_eq!(page_count(1, 6), 1);
        assert_eq!(page_count(6, 6), 1);
        assert_eq!(page_count(7, 6), 2);
        assert_eq!(page_count(12, 6), 2);
        assert_eq!(page_count(13, 6), 3);
    }

    #[test]
    fn test_page_slice() {
        let items: Vec<usize> = (0..7).collect();
        assert_eq!(page_slice(&items, 1, 6), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(page_slice(&items, 2, 6), &[6]);
        assert!(page_slice(&items, 3, 6).is_empty());
        assert!(page_slice(&items, usize::MAX, 6).is_empty());
    }

    #[test]
    fn test_window_middle() {
        assert_eq!(
            window(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_window_edges() {
        assert_eq!(window(1, 0), vec![]);
        assert_eq!(window(1, 1), vec![Page(1)]);
        assert_eq!(window(1, 2), vec![Page(1), Page(2)]);
        assert_eq!(window(1, 5), vec![Page(1), Page(2), Ellipsis, Page(5)]);
        assert_eq!(window(5, 5), vec![Page(1), Ellipsis, Page(4), Page(5)]);
        assert_eq!(
            window(3, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
        );
    }

    #[test]
    fn test_window_gap_of_one_is_an_ellipsis() {
        // Page 2 is the only skipped page but is still shown as a marker.
        assert_eq!(
            window(4, 7),
            vec![Page(1), Ellipsis, Page(3), Page(4), Page(5), Ellipsis, Page(7)]
        );
    }

    #[test]
    fn test_window_out_of_range_page() {
        assert_eq!(window(20, 3), vec![Page(1), Page(3)]);
    }

    #[test]
    fn test_window_largest_page() {
        assert_eq!(window(usize::MAX, 3), vec![Page(1), Page(3)]);
        assert_eq!(window(usize::MAX, 1), vec![Page(1)]);
        assert_eq!(window(usize::MAX, 0), vec![]);
    }
}
