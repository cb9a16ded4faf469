//! Query parameter records for the paged endpoints
//!
//! Each record has a matching `*Patch` type. Merging a patch overwrites
//! only the fields it sets or clears, so paging and filter widgets can
//! update one field at a time while the rest of the query persists.

use serde::{Deserialize, Serialize};

use super::{BatchId, ImportStatus};

/// Default page size for list views
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Page size used when loading a batch's error log
pub const ERROR_LOG_PAGE_SIZE: u32 = 100;

/// Sort direction accepted by the email list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "asc",
            OrderDirection::Desc => "desc",
        }
    }
}

/// Outgoing query string, in insertion order
pub type QueryPairs = Vec<(String, String)>;

fn push<V: ToString>(pairs: &mut QueryPairs, key: &str, value: &Option<V>) {
    if let Some(value) = value {
        pairs.push((key.to_string(), value.to_string()));
    }
}

/// One field of a query patch
///
/// `Keep` leaves the stored value alone, `Set` replaces it and `Clear`
/// removes it from the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Set(T),
    Clear,
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    /// Write this change into `target`
    pub fn apply(self, target: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Set(value) => *target = Some(value),
            Patch::Clear => *target = None,
        }
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Patch::Set(value)
    }
}

/// Move a two-element `[start, end]` range into discrete bounds.
///
/// Returns true when the range was consumed. Any other shape leaves all
/// three fields untouched.
fn split_range(
    range: &mut Option<Vec<String>>,
    start: &mut Option<String>,
    end: &mut Option<String>,
) -> bool {
    match range.take() {
        Some(bounds) if bounds.len() == 2 => {
            let mut bounds = bounds.into_iter();
            *start = bounds.next();
            *end = bounds.next();
            true
        }
        other => {
            *range = other;
            false
        }
    }
}

/// Filters and paging for the archived email list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailQueryParams {
    pub page_no: Option<u32>,
    pub page_size: Option<u32>,
    pub subject: Option<String>,
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub original_path: Option<String>,
    pub is_starred: Option<bool>,
    /// UI date-picker range; the backend only understands the bounds
    pub send_date_range: Option<Vec<String>>,
    pub send_date_start: Option<String>,
    pub send_date_end: Option<String>,
    pub import_batch_id: Option<BatchId>,
    pub order_by: Option<String>,
    pub order_direction: Option<OrderDirection>,
}

impl EmailQueryParams {
    /// First page at the default page size
    pub fn first_page() -> Self {
        Self {
            page_no: Some(1),
            page_size: Some(DEFAULT_PAGE_SIZE),
            ..Self::default()
        }
    }

    /// Replace `send_date_range` with `send_date_start`/`send_date_end`
    /// when it holds exactly two elements.
    pub fn split_send_date_range(&mut self) -> bool {
        split_range(
            &mut self.send_date_range,
            &mut self.send_date_start,
            &mut self.send_date_end,
        )
    }

    pub fn merge(&mut self, patch: EmailQueryPatch) {
        let EmailQueryPatch {
            page_no,
            page_size,
            subject,
            sender,
            recipient,
            original_path,
            is_starred,
            send_date_range,
            send_date_start,
            send_date_end,
            import_batch_id,
            order_by,
            order_direction,
        } = patch;

        page_no.apply(&mut self.page_no);
        page_size.apply(&mut self.page_size);
        subject.apply(&mut self.subject);
        sender.apply(&mut self.sender);
        recipient.apply(&mut self.recipient);
        original_path.apply(&mut self.original_path);
        is_starred.apply(&mut self.is_starred);
        send_date_range.apply(&mut self.send_date_range);
        send_date_start.apply(&mut self.send_date_start);
        send_date_end.apply(&mut self.send_date_end);
        import_batch_id.apply(&mut self.import_batch_id);
        order_by.apply(&mut self.order_by);
        order_direction.apply(&mut self.order_direction);
    }

    /// Drop every filter while keeping paging and ordering
    pub fn clear_filters(&mut self) {
        *self = Self {
            page_no: self.page_no,
            page_size: self.page_size,
            order_by: self.order_by.take(),
            order_direction: self.order_direction,
            ..Self::default()
        };
    }

    pub fn to_query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "pageNo", &self.page_no);
        push(&mut pairs, "pageSize", &self.page_size);
        push(&mut pairs, "subject", &self.subject);
        push(&mut pairs, "sender", &self.sender);
        push(&mut pairs, "recipient", &self.recipient);
        push(&mut pairs, "originalPath", &self.original_path);
        push(&mut pairs, "isStarred", &self.is_starred);
        for bound in self.send_date_range.iter().flatten() {
            pairs.push(("sendDateRange".to_string(), bound.clone()));
        }
        push(&mut pairs, "sendDateStart", &self.send_date_start);
        push(&mut pairs, "sendDateEnd", &self.send_date_end);
        push(&mut pairs, "importBatchId", &self.import_batch_id);
        push(&mut pairs, "orderBy", &self.order_by);
        push(
            &mut pairs,
            "orderDirection",
            &self.order_direction.map(|d| d.as_str()),
        );
        pairs
    }
}

/// Partial update for [`EmailQueryParams`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmailQueryPatch {
    pub page_no: Patch<u32>,
    pub page_size: Patch<u32>,
    pub subject: Patch<String>,
    pub sender: Patch<String>,
    pub recipient: Patch<String>,
    pub original_path: Patch<String>,
    pub is_starred: Patch<bool>,
    pub send_date_range: Patch<Vec<String>>,
    pub send_date_start: Patch<String>,
    pub send_date_end: Patch<String>,
    pub import_batch_id: Patch<BatchId>,
    pub order_by: Patch<String>,
    pub order_direction: Patch<OrderDirection>,
}

impl EmailQueryPatch {
    pub fn page(page_no: u32) -> Self {
        Self {
            page_no: Patch::Set(page_no),
            ..Self::default()
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Patch::Set(page_size);
        self
    }
}

/// Filters and paging for the import batch list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatchQueryParams {
    pub page_no: Option<u32>,
    pub page_size: Option<u32>,
    pub batch_name: Option<String>,
    pub user_id: Option<i64>,
    pub status: Option<ImportStatus>,
    pub create_time_range: Option<Vec<String>>,
    pub create_time_start: Option<String>,
    pub create_time_end: Option<String>,
}

impl ImportBatchQueryParams {
    pub fn first_page() -> Self {
        Self {
            page_no: Some(1),
            page_size: Some(DEFAULT_PAGE_SIZE),
            ..Self::default()
        }
    }

    /// Replace `create_time_range` with `create_time_start`/`create_time_end`
    /// when it holds exactly two elements.
    pub fn split_create_time_range(&mut self) -> bool {
        split_range(
            &mut self.create_time_range,
            &mut self.create_time_start,
            &mut self.create_time_end,
        )
    }

    pub fn merge(&mut self, patch: ImportBatchQueryPatch) {
        let ImportBatchQueryPatch {
            page_no,
            page_size,
            batch_name,
            user_id,
            status,
            create_time_range,
            create_time_start,
            create_time_end,
        } = patch;

        page_no.apply(&mut self.page_no);
        page_size.apply(&mut self.page_size);
        batch_name.apply(&mut self.batch_name);
        user_id.apply(&mut self.user_id);
        status.apply(&mut self.status);
        create_time_range.apply(&mut self.create_time_range);
        create_time_start.apply(&mut self.create_time_start);
        create_time_end.apply(&mut self.create_time_end);
    }

    pub fn to_query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "pageNo", &self.page_no);
        push(&mut pairs, "pageSize", &self.page_size);
        push(&mut pairs, "batchName", &self.batch_name);
        push(&mut pairs, "userId", &self.user_id);
        push(&mut pairs, "status", &self.status.map(|s| s.code()));
        for bound in self.create_time_range.iter().flatten() {
            pairs.push(("createTimeRange".to_string(), bound.clone()));
        }
        push(&mut pairs, "createTimeStart", &self.create_time_start);
        push(&mut pairs, "createTimeEnd", &self.create_time_end);
        pairs
    }
}

/// Partial update for [`ImportBatchQueryParams`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportBatchQueryPatch {
    pub page_no: Patch<u32>,
    pub page_size: Patch<u32>,
    pub batch_name: Patch<String>,
    pub user_id: Patch<i64>,
    pub status: Patch<ImportStatus>,
    pub create_time_range: Patch<Vec<String>>,
    pub create_time_start: Patch<String>,
    pub create_time_end: Patch<String>,
}

impl ImportBatchQueryPatch {
    pub fn page(page_no: u32) -> Self {
        Self {
            page_no: Patch::Set(page_no),
            ..Self::default()
        }
    }
}

/// Paging and filters for one batch's error log
///
/// `batch_id` is sent both in the URL path and the query string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportErrorQueryParams {
    pub page_no: Option<u32>,
    pub page_size: Option<u32>,
    pub batch_id: BatchId,
    pub error_type: Option<String>,
    pub file_path: Option<String>,
}

impl ImportErrorQueryParams {
    /// Query for the first error-log page of a batch
    pub fn for_batch(batch_id: BatchId) -> Self {
        Self {
            page_no: Some(1),
            page_size: Some(ERROR_LOG_PAGE_SIZE),
            batch_id,
            error_type: None,
            file_path: None,
        }
    }

    pub fn merge(&mut self, patch: ImportErrorQueryPatch) {
        let ImportErrorQueryPatch {
            page_no,
            page_size,
            error_type,
            file_path,
        } = patch;

        page_no.apply(&mut self.page_no);
        page_size.apply(&mut self.page_size);
        error_type.apply(&mut self.error_type);
        file_path.apply(&mut self.file_path);
    }

    pub fn to_query_pairs(&self) -> QueryPairs {
        let mut pairs = QueryPairs::new();
        push(&mut pairs, "pageNo", &self.page_no);
        push(&mut pairs, "pageSize", &self.page_size);
        pairs.push(("batchId".to_string(), self.batch_id.to_string()));
        push(&mut pairs, "errorType", &self.error_type);
        push(&mut pairs, "filePath", &self.file_path);
        pairs
    }
}

/// Partial update for [`ImportErrorQueryParams`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportErrorQueryPatch {
    pub page_no: Patch<u32>,
    pub page_size: Patch<u32>,
    pub error_type: Patch<String>,
    pub file_path: Patch<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(a: &str, b: &str) -> Option<Vec<String>> {
        Some(vec![a.to_string(), b.to_string()])
    }

    #[test]
    fn test_split_two_element_send_range() {
        let mut params = EmailQueryParams {
            send_date_range: range("2024-01-01", "2024-01-31"),
            ..EmailQueryParams::first_page()
        };

        assert!(params.split_send_date_range());
        assert!(params.send_date_range.is_none());
        assert_eq!(params.send_date_start.as_deref(), Some("2024-01-01"));
        assert_eq!(params.send_date_end.as_deref(), Some("2024-01-31"));

        let keys: Vec<String> = params.to_query_pairs().into_iter().map(|(k, _)| k).collect();
        assert!(keys.contains(&"sendDateStart".to_string()));
        assert!(!keys.contains(&"sendDateRange".to_string()));
    }

    #[test]
    fn test_one_element_range_left_alone() {
        let mut params = EmailQueryParams {
            send_date_range: Some(vec!["2024-01-01".to_string()]),
            ..EmailQueryParams::default()
        };
        let before = params.clone();

        assert!(!params.split_send_date_range());
        assert_eq!(params, before);

        let mut absent = EmailQueryParams::first_page();
        assert!(!absent.split_send_date_range());
        assert_eq!(absent, EmailQueryParams::first_page());
    }

    #[test]
    fn test_split_create_time_range() {
        let mut params = ImportBatchQueryParams {
            create_time_range: range("2024-02-01 00:00:00", "2024-02-02 00:00:00"),
            ..ImportBatchQueryParams::first_page()
        };

        assert!(params.split_create_time_range());
        assert!(params.create_time_range.is_none());
        assert_eq!(params.create_time_start.as_deref(), Some("2024-02-01 00:00:00"));
        assert_eq!(params.create_time_end.as_deref(), Some("2024-02-02 00:00:00"));
    }

    #[test]
    fn test_merge_overwrites_only_set_fields() {
        let mut params = EmailQueryParams::first_page();
        params.merge(EmailQueryPatch {
            subject: "invoice".to_string().into(),
            ..EmailQueryPatch::default()
        });
        params.merge(EmailQueryPatch::page(3));

        assert_eq!(params.page_no, Some(3));
        assert_eq!(params.page_size, Some(DEFAULT_PAGE_SIZE));
        assert_eq!(params.subject.as_deref(), Some("invoice"));
    }

    #[test]
    fn test_merge_clears_filters() {
        let mut params = EmailQueryParams::first_page();
        params.merge(EmailQueryPatch {
            subject: Patch::Set("invoice".to_string()),
            sender: Patch::Set("jane@example.com".to_string()),
            is_starred: Patch::Set(true),
            ..EmailQueryPatch::default()
        });

        params.merge(EmailQueryPatch {
            subject: Patch::Clear,
            is_starred: Patch::Clear,
            ..EmailQueryPatch::default()
        });

        assert!(params.subject.is_none());
        assert!(params.is_starred.is_none());
        assert_eq!(params.sender.as_deref(), Some("jane@example.com"));
        assert_eq!(params.page_no, Some(1));

        let mut batches = ImportBatchQueryParams::first_page();
        batches.merge(ImportBatchQueryPatch {
            status: Patch::Set(ImportStatus::Failed),
            ..ImportBatchQueryPatch::default()
        });
        batches.merge(ImportBatchQueryPatch {
            status: Patch::Clear,
            ..ImportBatchQueryPatch::default()
        });
        assert!(batches.status.is_none());
        assert!(!batches.to_query_pairs().iter().any(|(k, _)| k == "status"));
    }

    #[test]
    fn test_clear_filters_keeps_paging() {
        let mut params = EmailQueryParams::first_page();
        params.merge(EmailQueryPatch {
            page_no: Patch::Set(4),
            sender: Patch::Set("jane@example.com".to_string()),
            is_starred: Patch::Set(true),
            order_direction: Patch::Set(OrderDirection::Desc),
            ..EmailQueryPatch::default()
        });

        params.clear_filters();
        assert_eq!(params.page_no, Some(4));
        assert_eq!(params.order_direction, Some(OrderDirection::Desc));
        assert!(params.sender.is_none());
        assert!(params.is_starred.is_none());
    }

    #[test]
    fn test_email_query_pairs_order_and_encoding() {
        let params = EmailQueryParams {
            is_starred: Some(true),
            import_batch_id: Some(BatchId(9)),
            order_direction: Some(OrderDirection::Asc),
            ..EmailQueryParams::first_page()
        };

        let pairs = params.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("pageNo".to_string(), "1".to_string()),
                ("pageSize".to_string(), "20".to_string()),
                ("isStarred".to_string(), "true".to_string()),
                ("importBatchId".to_string(), "9".to_string()),
                ("orderDirection".to_string(), "asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_error_query_defaults_and_merge() {
        let mut params = ImportErrorQueryParams::for_batch(BatchId(5));
        params.merge(ImportErrorQueryPatch {
            error_type: Patch::Set("PARSE_ERROR".to_string()),
            ..ImportErrorQueryPatch::default()
        });

        let pairs = params.to_query_pairs();
        assert!(pairs.contains(&("batchId".to_string(), "5".to_string())));
        assert!(pairs.contains(&("pageSize".to_string(), "100".to_string())));
        assert!(pairs.contains(&("errorType".to_string(), "PARSE_ERROR".to_string())));
    }
}
