use serde::Serialize;

/// Page size used when the caller does not request one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;
/// Largest page size a caller may request.
pub const MAX_ITEMS_PER_PAGE: usize = 2000;

/// A slice of a larger ordered collection together with its position.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: usize,
    pub total_pages: usize,
    /// Zero-based page number.
    pub number: usize,
    pub size: usize,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, number: usize, size: usize, total_elements: usize) -> Self {
        let total_pages = if size == 0 {
            usize::from(!content.is_empty())
        } else {
            total_elements.div_ceil(size)
        };

        Self {
            number_of_elements: content.len(),
            empty: content.is_empty(),
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
            content,
            total_elements,
            total_pages,
            number,
            size,
        }
    }

    /// Converts every element while keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_page_metadata() {
        let page = Page::new(vec![1, 2], 1, 2, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number_of_elements, 2);
        assert!(!page.first);
        assert!(!page.last);
        assert!(!page.empty);
    }

    #[test]
    fn last_page_and_empty_collection() {
        let last = Page::new(vec![5], 2, 2, 5);
        assert!(last.last);

        let empty: Page<i32> = Page::new(vec![], 0, 20, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.first);
        assert!(empty.last);
        assert!(empty.empty);
    }

    #[test]
    fn page_past_the_end_is_last() {
        let page: Page<i32> = Page::new(vec![], usize::MAX, 20, 5);
        assert!(page.last);
        assert!(page.empty);
        assert!(!page.first);
    }

    #[test]
    fn map_preserves_metadata() {
        let page = Page::new(vec![1, 2, 3], 0, 3, 7).map(|n| n.to_string());
        assert_eq!(page.content, vec!["1", "2", "3"]);
        assert_eq!(page.total_elements, 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.size, 3);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(Page::new(vec![1], 0, 20, 1)).unwrap();
        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["numberOfElements"], 1);
        assert_eq!(json["content"][0], 1);
    }
}
