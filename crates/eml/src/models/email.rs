//! Archived email message and attachment models

use serde::{Deserialize, Serialize};
use std::fmt;

use super::BatchId;
use super::de::{null_as_default, opt_string_or_number};

/// Backend primary key of an archived email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailId(pub i64);

impl EmailId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for EmailId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EmailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An archived email as returned by the backend
///
/// List pages carry only `attachment_count`; the detail endpoint also
/// fills `attachments`. The two are never cross-checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub id: EmailId,
    /// Protocol Message-ID header, opaque
    #[serde(default, deserialize_with = "null_as_default")]
    pub message_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sender: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recipients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cc_recipients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bcc_recipients: Vec<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub send_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub received_date: Option<String>,
    #[serde(default)]
    pub body_text: Option<String>,
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub content_text: Option<String>,
    #[serde(default)]
    pub content_html: Option<String>,
    /// Path of the `.eml` file inside the uploaded archive
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_starred: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachment_count: u32,
    #[serde(default)]
    pub import_batch_id: Option<BatchId>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub create_time: Option<String>,
    #[serde(default)]
    pub attachments: Option<Vec<EmailAttachment>>,
}

impl EmailMessage {
    /// Create a message with only an id set
    pub fn new(id: impl Into<EmailId>) -> Self {
        Self {
            id: id.into(),
            message_id: String::new(),
            subject: String::new(),
            sender: String::new(),
            recipients: Vec::new(),
            cc_recipients: Vec::new(),
            bcc_recipients: Vec::new(),
            send_date: None,
            received_date: None,
            body_text: None,
            body_html: None,
            content_text: None,
            content_html: None,
            original_path: String::new(),
            is_starred: false,
            attachment_count: 0,
            import_batch_id: None,
            create_time: None,
            attachments: None,
        }
    }

    /// HTML body for display, preferring the rendered content field
    pub fn display_html(&self) -> Option<&str> {
        self.content_html
            .as_deref()
            .or(self.body_html.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Plain text body for display, preferring the rendered content field
    pub fn display_text(&self) -> Option<&str> {
        self.content_text
            .as_deref()
            .or(self.body_text.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn has_attachments(&self) -> bool {
        self.attachment_count > 0
    }
}

/// A file attached to an archived email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAttachment {
    pub id: i64,
    pub email_id: EmailId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    /// Alias some endpoints send instead of `filename`
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_type: String,
    /// Size in bytes
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_size: u64,
    /// Object storage path on the backend
    #[serde(default, deserialize_with = "null_as_default")]
    pub minio_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub download_url: String,
}

impl EmailAttachment {
    pub fn display_name(&self) -> &str {
        if self.filename.is_empty() {
            &self.file_name
        } else {
            &self.filename
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_list_entry() {
        let json = r#"{
            "id": 7,
            "messageId": "<abc@mail.example.com>",
            "subject": "Quarterly report",
            "sender": "Jane <jane@example.com>",
            "recipients": ["bob@example.com"],
            "sendDate": 1700000000000,
            "originalPath": "2023/q4/report.eml",
            "isStarred": true,
            "attachmentCount": 2,
            "importBatchId": 3
        }"#;

        let email: EmailMessage = serde_json::from_str(json).unwrap();
        assert_eq!(email.id, EmailId(7));
        assert_eq!(email.send_date.as_deref(), Some("1700000000000"));
        assert!(email.cc_recipients.is_empty());
        assert!(email.attachments.is_none());
        assert_eq!(email.import_batch_id, Some(BatchId(3)));
        assert!(email.has_attachments());
    }

    #[test]
    fn test_deserialize_null_fields_as_defaults() {
        let json = r#"{
            "id": 1,
            "subject": null,
            "recipients": ["a@x.com"],
            "ccRecipients": null,
            "bccRecipients": null,
            "originalPath": null,
            "isStarred": null,
            "attachmentCount": null
        }"#;

        let email: EmailMessage = serde_json::from_str(json).unwrap();
        assert_eq!(email.subject, "");
        assert_eq!(email.recipients, vec!["a@x.com".to_string()]);
        assert!(email.cc_recipients.is_empty());
        assert!(email.bcc_recipients.is_empty());
        assert_eq!(email.original_path, "");
        assert!(!email.is_starred);
        assert_eq!(email.attachment_count, 0);

        let json = r#"{"id": 1, "emailId": 2, "filename": null, "fileSize": null, "downloadUrl": null}"#;
        let attachment: EmailAttachment = serde_json::from_str(json).unwrap();
        assert_eq!(attachment.display_name(), "");
        assert_eq!(attachment.file_size, 0);
    }

    #[test]
    fn test_display_body_prefers_content_fields() {
        let mut email = EmailMessage::new(1);
        email.body_html = Some("<p>raw</p>".to_string());
        assert_eq!(email.display_html(), Some("<p>raw</p>"));

        email.content_html = Some("<p>rendered</p>".to_string());
        assert_eq!(email.display_html(), Some("<p>rendered</p>"));
        assert_eq!(email.display_text(), None);
    }

    #[test]
    fn test_attachment_display_name_falls_back_to_alias() {
        let json = r#"{"id": 1, "emailId": 2, "fileName": "invoice.pdf", "fileSize": 2048}"#;
        let attachment: EmailAttachment = serde_json::from_str(json).unwrap();
        assert_eq!(attachment.display_name(), "invoice.pdf");
        assert_eq!(attachment.file_size, 2048);
    }
}
