/// Limit/offset window applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: Option<usize>,
}

/// One page of results and the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct List<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> List<T> {
    /// Keeps the items `keep` accepts, then cuts the requested window.
    /// `total` counts the filtered set, not the page.
    pub fn paginate<F>(items: Vec<T>, page: Page, mut keep: F) -> Self
    where
        F: FnMut(&T) -> bool,
    {
        let mut filtered: Vec<T> = items.into_iter().filter(|item| keep(item)).collect();
        let total = filtered.len();

        let offset = page.offset.min(total);
        let end = match page.limit {
            Some(limit) => offset.saturating_add(limit).min(total),
            None => total,
        };
        filtered.truncate(end);
        let items = filtered.split_off(offset);

        Self { items, total }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(offset: usize, limit: Option<usize>) -> Page {
        Page { offset, limit }
    }

    #[test]
    fn window_over_filtered_set() {
        let even = |n: &u32| n % 2 == 0;
        let full: Vec<u32> = (0..20).collect();
        let filtered: Vec<u32> = full.iter().copied().filter(even).collect();

        for offset in [0, 1, 5, 9, 10, 11, 40] {
            for limit in [None, Some(0), Some(1), Some(3), Some(100)] {
                let list = List::paginate(full.clone(), page(offset, limit), even);
                let start = offset.min(filtered.len());
                let end = limit.map_or(filtered.len(), |l| (start + l).min(filtered.len()));
                assert_eq!(list.items, filtered[start..end], "offset {offset} limit {limit:?}");
                assert_eq!(list.total, filtered.len());
            }
        }
    }

    #[test]
    fn offset_past_end_is_empty() {
        let list = List::paginate(vec![1, 2, 3], page(7, Some(2)), |_| true);
        assert!(list.is_empty());
        assert_eq!(list.total, 3);
    }
}
