//! Listing window shared by every paged query.

use crate::errors::{Error, Result};
use sea_orm::QuerySelect;

/// A `from`/`size` listing window.
///
/// `from` is an element offset rounded down to a whole page, so `from = 15,
/// size = 10` returns the second page (elements 10..20).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    from: u64,
    size: u64,
}

impl Page {
    /// Builds a window; a zero `size` is rejected since it cannot address a page.
    pub fn new(from: u64, size: u64) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidArgument {
                message: "Page size must be greater than zero".to_string(),
            });
        }
        Ok(Self { from, size })
    }

    /// Offset of the first row of the page containing `from`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.from / self.size) * self.size
    }

    /// Restricts `query` to this window.
    #[must_use]
    pub fn apply<Q: QuerySelect>(&self, query: Q) -> Q {
        query.offset(self.offset()).limit(self.size)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_offset_rounds_down_to_page() {
        assert_eq!(Page::new(0, 10).unwrap().offset(), 0);
        assert_eq!(Page::new(9, 10).unwrap().offset(), 0);
        assert_eq!(Page::new(10, 10).unwrap().offset(), 10);
        assert_eq!(Page::new(15, 10).unwrap().offset(), 10);
        assert_eq!(Page::new(3, 1).unwrap().offset(), 3);
    }

    #[test]
    fn test_apply_sets_limit_and_offset() {
        use crate::entities::Item;
        use sea_orm::{DbBackend, EntityTrait, QueryTrait};

        let sql = Page::new(15, 10)
            .unwrap()
            .apply(Item::find())
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(sql.ends_with("LIMIT 10 OFFSET 10"), "{sql}");
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            Page::new(0, 0),
            Err(Error::InvalidArgument { .. })
        ));
    }
}
