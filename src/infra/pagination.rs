use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Pagination parameters.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// The 0-indexed page to fetch.
    page: Option<i64>,
    /// The number of elements per page.
    page_size: Option<i64>,
}

impl PaginationParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(50)
    }

    pub fn limit(&self) -> i64 {
        self.page_size()
    }

    pub fn offset(&self) -> i64 {
        self.page() * self.page_size()
    }
}

#[cfg(test)]
mod tests {
    use super::PaginationParams;

    #[test]
    fn defaults_to_first_page() {
        let params = PaginationParams::default();
        assert_eq!(0, params.offset());
        assert_eq!(50, params.limit());
    }

    #[test]
    fn offset_skips_previous_pages() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"page": 2, "pageSize": 10}"#).unwrap();
        assert_eq!(20, params.offset());
        assert_eq!(10, params.limit());
    }
}
