use serde::Serialize;
use std::collections::HashMap;

/// One page of a larger collection ordered by id.
///
/// Built fresh for every query and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_count: u64,
    pub next_page: Option<u64>,
    pub previous_page: Option<u64>,
    pub current_page: u64,
}

impl<T> Page<T> {
    /// `page` is 1-based and `per_page` at least 1; `total` is the size of the
    /// filtered collection the items were sliced from.
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        let page_count = total.div_ceil(per_page.max(1));
        Self {
            items,
            page_count,
            previous_page: (page > 1).then(|| page - 1),
            next_page: (page < page_count).then(|| page + 1),
            current_page: page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_count: self.page_count,
            next_page: self.next_page,
            previous_page: self.previous_page,
            current_page: self.current_page,
        }
    }
}

/// Validated page coordinates taken from the query string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Reads `p` and `per_page` from the query.
    ///
    /// The page defaults to 1 and never goes below it; the page size defaults
    /// to `default_per_page` and is clamped to `1..=max_per_page`.
    pub fn from_query(query: &HashMap<String, String>, default_per_page: u64, max_per_page: u64) -> Self {
        Self {
            page: page_num(query),
            per_page: per_page(query, default_per_page, max_per_page),
        }
    }

    /// Rows to skip. Saturates at `i64::MAX`, the largest `OFFSET` Postgres
    /// accepts, so any page past the end is simply empty.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page).min(i64::MAX as u64)
    }
}

pub fn page_num(query: &HashMap<String, String>) -> u64 {
    query
        .get("p")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(|p| p.max(1) as u64)
        .unwrap_or(1)
}

pub fn per_page(query: &HashMap<String, String>, default: u64, max: u64) -> u64 {
    let requested = query
        .get("per_page")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default as i64);
    requested.clamp(1, max.max(1) as i64) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn page_count_is_ceiling_of_total_over_size() {
        for size in 1..=7u64 {
            for total in 0..=30u64 {
                let page = Page::<()>::new(vec![], total, 1, size);
                assert_eq!(page.page_count, (total + size - 1) / size, "total={total} size={size}");
            }
        }
    }

    #[test]
    fn neighbors_are_absent_at_the_boundaries() {
        for size in 1..=5u64 {
            for total in 1..=20u64 {
                let last = Page::<()>::new(vec![], total, 1, size).page_count;
                assert_eq!(Page::<()>::new(vec![], total, last, size).next_page, None);
                assert_eq!(Page::<()>::new(vec![], total, 1, size).previous_page, None);
            }
        }
    }

    #[test]
    fn first_of_three_pages() {
        let page = Page::new((1..=12).collect::<Vec<_>>(), 25, 1, 12);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.previous_page, None);
        assert_eq!(page.next_page, Some(2));
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn empty_collection_has_no_pages() {
        let page = Page::<u8>::new(vec![], 0, 1, 12);
        assert_eq!(page.page_count, 0);
        assert_eq!(page.previous_page, None);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn page_past_the_end_has_no_next() {
        let page = Page::<u8>::new(vec![], 25, 9, 12);
        assert_eq!(page.next_page, None);
        assert_eq!(page.previous_page, Some(8));
    }

    #[test]
    fn serializes_absent_neighbors_as_null() {
        let value = serde_json::to_value(Page::new(vec![1], 1, 1, 12)).unwrap();
        assert_eq!(value["next_page"], serde_json::Value::Null);
        assert_eq!(value["previous_page"], serde_json::Value::Null);
        assert_eq!(value["items"], serde_json::json!([1]));
    }

    #[test]
    fn query_parameters_are_clamped() {
        assert_eq!(page_num(&query(&[])), 1);
        assert_eq!(page_num(&query(&[("p", "0")])), 1);
        assert_eq!(page_num(&query(&[("p", "-4")])), 1);
        assert_eq!(page_num(&query(&[("p", "3")])), 3);
        assert_eq!(page_num(&query(&[("p", "abc")])), 1);

        assert_eq!(per_page(&query(&[]), 12, 50), 12);
        assert_eq!(per_page(&query(&[("per_page", "500")]), 12, 50), 50);
        assert_eq!(per_page(&query(&[("per_page", "0")]), 12, 50), 1);
    }

    #[test]
    fn offset_follows_page_and_size() {
        assert_eq!(PageRequest::new(1, 12).offset(), 0);
        assert_eq!(PageRequest::new(3, 12).offset(), 24);
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 1));
    }

    #[test]
    fn huge_page_numbers_saturate_the_offset() {
        let huge = page_num(&query(&[("p", "9223372036854775807")]));
        assert_eq!(huge, i64::MAX as u64);
        assert_eq!(PageRequest::new(huge, 50).offset(), i64::MAX as u64);
        assert_eq!(PageRequest::new(u64::MAX, u64::MAX).offset(), i64::MAX as u64);

        let page = Page::<u8>::new(vec![], 25, huge, 50);
        assert_eq!(page.next_page, None);
        assert_eq!(page.previous_page, Some(huge - 1));
    }
}
