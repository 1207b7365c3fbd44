use error_stack::Report;
use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectLimit(i32);

impl SelectLimit {
    pub fn new(value: impl Into<i32>) -> Self {
        SelectLimit(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SelectOffset(i32);

impl SelectOffset {
    pub fn new(value: impl Into<i32>) -> Self {
        SelectOffset(value.into())
    }
}

/// A 1-indexed page of `size` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    limit: SelectLimit,
    offset: SelectOffset,
}

impl Pagination {
    pub fn new(size: i32, page: i32) -> error_stack::Result<Self, KernelError> {
        if size < 1 {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Page size must be positive, got {size}")));
        }
        if page < 1 {
            return Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Page number starts at 1, got {page}")));
        }
        let offset = (page - 1).checked_mul(size).ok_or_else(|| {
            Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Offset of page {page} with size {size} overflows"))
        })?;
        Ok(Self {
            limit: SelectLimit::new(size),
            offset: SelectOffset::new(offset),
        })
    }

    pub fn limit(&self) -> &SelectLimit {
        &self.limit
    }

    pub fn offset(&self) -> &SelectOffset {
        &self.offset
    }
}

#[cfg(test)]
mod test {
    use crate::entity::Pagination;
    use crate::KernelError;

    #[test]
    fn first_page_skips_nothing() {
        let page = Pagination::new(10, 1).unwrap();
        assert_eq!(page.limit().as_ref(), &10);
        assert_eq!(page.offset().as_ref(), &0);
    }

    #[test]
    fn second_page_skips_one_page() {
        let page = Pagination::new(10, 2).unwrap();
        assert_eq!(page.limit().as_ref(), &10);
        assert_eq!(page.offset().as_ref(), &10);
    }

    #[test]
    fn rejects_non_positive_input() {
        for (size, page) in [(10, 0), (10, -1), (0, 1), (-5, 3)] {
            let error = Pagination::new(size, page).unwrap_err();
            assert_eq!(error.current_context(), &KernelError::InvalidArgument);
        }
    }

    #[test]
    fn rejects_overflowing_offset() {
        let error = Pagination::new(i32::MAX, 3).unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidArgument);
    }
}
