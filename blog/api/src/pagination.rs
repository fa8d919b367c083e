/// Computes page boundaries for the post feeds. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    /// How many items a full page holds.
    pub page_size: i64,
}

impl Paginator {
    pub fn new(page_size: i64) -> Self {
        Self { page_size }
    }

    /// Saturates instead of overflowing, so an absurd page number reads as
    /// a page far past the end rather than a panic or a negative offset.
    pub fn offset(&self, page: i64) -> i64 {
        page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Total number of pages. An empty listing still has one (empty) page.
    pub fn total_pages(&self, total_items: i64) -> i64 {
        if total_items == 0 {
            1
        } else {
            (total_items + self.page_size - 1) / self.page_size
        }
    }

    /// How many items the given page holds when the listing has
    /// `total_items` items overall. Pages past the end hold zero.
    pub fn expected_len(&self, page: i64, total_items: i64) -> i64 {
        (total_items - self.offset(page)).clamp(0, self.page_size)
    }

    pub fn page<T>(&self, items: Vec<T>, number: i64, total_items: i64) -> Page<T> {
        Page {
            items,
            number,
            page_size: self.page_size,
            total_items,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub page_size: i64,
    pub total_items: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        Paginator::new(self.page_size).total_pages(self.total_items)
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Normalizes a raw `page` query parameter. Absent, malformed, or < 1 values
/// all mean the first page.
pub fn page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|raw| raw.parse::<i64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}
