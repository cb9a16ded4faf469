//! Archived email endpoints (`/system/email`)

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;

use super::decode;
use super::transport::{ApiRequest, Transport};
use crate::models::{EmailAttachment, EmailId, EmailMessage, EmailQueryParams, PageResult};

/// Stateless client for the email archive endpoints
///
/// Every method is a single backend call. Failures propagate unchanged;
/// nothing is retried or cached.
#[derive(Clone)]
pub struct EmailApi {
    transport: Arc<dyn Transport>,
}

impl EmailApi {
    const BASE: &'static str = "/system/email";

    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn path(suffix: &str) -> String {
        format!("{}{}", Self::BASE, suffix)
    }

    /// Fetch one page of archived emails
    ///
    /// A two-element `send_date_range` is moved into
    /// `send_date_start`/`send_date_end` on `params` itself before sending.
    pub fn get_email_message_page(
        &self,
        params: &mut EmailQueryParams,
    ) -> Result<PageResult<EmailMessage>> {
        params.split_send_date_range();
        let request = ApiRequest::get(Self::path("/page")).query(params.to_query_pairs());
        decode(self.transport.send(&request)?, "email page")
    }

    /// Fetch one email with its attachments
    pub fn get_email_message(&self, id: EmailId) -> Result<EmailMessage> {
        let request = ApiRequest::get(Self::path("/get")).param("id", id);
        decode(self.transport.send(&request)?, "email detail")
    }

    /// Flip the star flag server-side
    ///
    /// The returned value is whatever the backend sent back; the new state
    /// is not implied by the call succeeding.
    pub fn toggle_email_star(&self, id: EmailId) -> Result<Value> {
        let request = ApiRequest::put(Self::path("/toggle-star")).param("id", id);
        self.transport.send(&request)
    }

    /// Delete several emails in one call
    ///
    /// Not yet implemented by the backend.
    pub fn delete_email_messages(&self, ids: &[EmailId]) -> Result<Value> {
        let request = ApiRequest::delete(Self::path("/batch")).json(serde_json::to_value(ids)?);
        self.transport.send(&request)
    }

    pub fn delete_email_message(&self, id: EmailId) -> Result<Value> {
        let request = ApiRequest::delete(Self::path("/delete")).param("id", id);
        self.transport.send(&request)
    }

    /// Download an attachment's content
    ///
    /// Not yet implemented by the backend.
    pub fn download_attachment(&self, attachment_id: i64) -> Result<Vec<u8>> {
        let request = ApiRequest::get(Self::path(&format!("/attachment/{}/download", attachment_id)));
        self.transport.download(&request)
    }

    /// Not yet implemented by the backend.
    pub fn get_attachment_info(&self, attachment_id: i64) -> Result<EmailAttachment> {
        let request = ApiRequest::get(Self::path(&format!("/attachment/{}", attachment_id)));
        decode(self.transport.send(&request)?, "attachment info")
    }

    /// Export the emails matching `params` as a file
    ///
    /// Applies the same date range split as the page query.
    /// Not yet implemented by the backend.
    pub fn export_email_messages(&self, params: &mut EmailQueryParams) -> Result<Vec<u8>> {
        params.split_send_date_range();
        let request = ApiRequest::get(Self::path("/export")).query(params.to_query_pairs());
        self.transport.download(&request)
    }

    pub fn get_email_statistics(&self) -> Result<Value> {
        self.transport.send(&ApiRequest::get(Self::path("/statistics")))
    }

    /// Folder tree of original archive paths
    ///
    /// Not yet implemented by the backend.
    pub fn get_email_file_tree(&self, path: Option<&str>) -> Result<Value> {
        let mut request = ApiRequest::get(Self::path("/file-tree"));
        if let Some(path) = path {
            request = request.param("path", path);
        }
        self.transport.send(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, ScriptedTransport};
    use serde_json::json;
    use crate::error::HttpStatusError;

    fn setup() -> (Arc<ScriptedTransport>, EmailApi) {
        let transport = Arc::new(ScriptedTransport::new());
        let api = EmailApi::new(transport.clone());
        (transport, api)
    }

    #[test]
    fn test_page_query_splits_range() {
        let (transport, api) = setup();
        transport.respond(
            Method::Get,
            "/system/email/page",
            json!({"list": [{"id": 1, "subject": "hi"}], "total": 1, "pageNo": 1, "pageSize": 20}),
        );

        let mut params = EmailQueryParams {
            send_date_range: Some(vec!["2024-01-01".into(), "2024-02-01".into()]),
            ..EmailQueryParams::first_page()
        };
        let page = api.get_email_message_page(&mut params).unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.list[0].subject, "hi");
        assert!(params.send_date_range.is_none());

        let request = transport.last_request().unwrap();
        assert_eq!(request.query_value("sendDateStart"), Some("2024-01-01"));
        assert_eq!(request.query_value("sendDateEnd"), Some("2024-02-01"));
        assert_eq!(request.query_value("sendDateRange"), None);
    }

    #[test]
    fn test_toggle_star_is_put_with_id() {
        let (transport, api) = setup();
        transport.respond(Method::Put, "/system/email/toggle-star", json!(true));

        api.toggle_email_star(EmailId(8)).unwrap();
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.query_value("id"), Some("8"));
    }

    #[test]
    fn test_batch_delete_sends_id_array_body() {
        let (transport, api) = setup();
        transport.respond(Method::Delete, "/system/email/batch", json!(true));

        api.delete_email_messages(&[EmailId(1), EmailId(2)]).unwrap();
        let request = transport.last_request().unwrap();
        assert_eq!(request.body, Some(json!([1, 2])));
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_unimplemented_endpoint_fails() {
        let (_transport, api) = setup();
        let err = api.download_attachment(5).unwrap_err();
        assert!(err.downcast_ref::<HttpStatusError>().is_some());

        let err = api.get_email_file_tree(Some("inbox")).unwrap_err();
        assert!(err.downcast_ref::<HttpStatusError>().is_some());
    }

    #[test]
    fn test_detail_decodes_attachments() {
        let (transport, api) = setup();
        transport.respond(
            Method::Get,
            "/system/email/get",
            json!({
                "id": 3,
                "attachmentCount": 1,
                "attachments": [{"id": 10, "emailId": 3, "filename": "a.pdf", "fileSize": 12}]
            }),
        );

        let email = api.get_email_message(EmailId(3)).unwrap();
        let attachments = email.attachments.unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].filename, "a.pdf");
    }
}
