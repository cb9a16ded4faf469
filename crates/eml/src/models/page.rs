//! Response envelopes shared by every endpoint

use serde::{Deserialize, Serialize};

use super::de::null_as_default;

/// Offset-paginated list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PageResult<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub list: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(default)]
    pub page_no: u32,
    #[serde(default)]
    pub page_size: u32,
}

/// The `{code, data, msg}` wrapper every backend response arrives in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub code: i64,
    pub data: Option<T>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl<T> ApiResult<T> {
    /// Codes the backend uses for success
    pub const SUCCESS_CODES: [i64; 2] = [0, 200];

    pub fn is_success(&self) -> bool {
        Self::SUCCESS_CODES.contains(&self.code)
    }

    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_page_result_tolerates_null_list_and_total() {
        let page: PageResult<i64> =
            serde_json::from_str(r#"{"list": null, "total": null, "pageNo": 1, "pageSize": 20}"#)
                .unwrap();
        assert!(page.list.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.page_size, 20);
    }

    #[test]
    fn test_envelope_success_codes() {
        let ok: ApiResult<Value> = serde_json::from_str(r#"{"code": 0, "data": 5}"#).unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.data, Some(Value::from(5)));

        let legacy: ApiResult<Value> = serde_json::from_str(r#"{"code": 200, "data": null}"#).unwrap();
        assert!(legacy.is_success());

        let err: ApiResult<Value> =
            serde_json::from_str(r#"{"code": 500, "msg": "boom"}"#).unwrap();
        assert!(!err.is_success());
        assert_eq!(err.message(), "boom");
        assert!(err.data.is_none());
    }
}
