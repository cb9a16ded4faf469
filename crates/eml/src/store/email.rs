//! Email list, detail and selection state

use anyhow::Result;
use log::{debug, error, info};
use serde::Serialize;

use super::EmlStore;
use crate::models::{
    EmailAttachment, EmailId, EmailMessage, EmailQueryParams, EmailQueryPatch, EmailStats,
    PageResult,
};

/// Everything the email views read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailState {
    pub list: Vec<EmailMessage>,
    pub total: u64,
    pub loading: bool,
    pub current: Option<EmailMessage>,
    pub attachments: Vec<EmailAttachment>,
    pub query: EmailQueryParams,
    /// Selection order is kept; ids are not checked against `list`
    pub selected_ids: Vec<EmailId>,
}

impl Default for EmailState {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
            loading: false,
            current: None,
            attachments: Vec::new(),
            query: EmailQueryParams::first_page(),
            selected_ids: Vec::new(),
        }
    }
}

/// Flip the local star flag after the backend accepted a toggle
///
/// Applies to the matching list entry and to `current` when it has the
/// same id. The backend's reply is not consulted.
pub fn reconcile_star_toggle(state: &mut EmailState, id: EmailId) {
    if let Some(email) = state.list.iter_mut().find(|e| e.id == id) {
        email.is_starred = !email.is_starred;
    }
    if let Some(current) = state.current.as_mut()
        && current.id == id
    {
        current.is_starred = !current.is_starred;
    }
}

/// Drop deleted emails from the loaded page and the selection
///
/// `total` goes down by the number of distinct ids, never below zero.
pub fn reconcile_deletion(state: &mut EmailState, ids: &[EmailId]) {
    let mut distinct = ids.to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    state.list.retain(|e| !distinct.contains(&e.id));
    state.total = state.total.saturating_sub(distinct.len() as u64);
    state.selected_ids.retain(|id| !distinct.contains(id));
}

impl EmailState {
    pub fn selected_count(&self) -> usize {
        self.selected_ids.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_ids.is_empty()
    }

    pub fn is_selected(&self, id: EmailId) -> bool {
        self.selected_ids.contains(&id)
    }

    pub fn stats(&self) -> EmailStats {
        EmailStats::from_page(self.total, &self.list)
    }
}

impl EmlStore {
    /// Load a page of emails, merging `patch` into the stored query first
    ///
    /// The stored query keeps the merged filters for later calls. A
    /// two-element `send_date_range` is split into its bounds there too.
    pub fn fetch_email_list(
        &self,
        patch: Option<EmailQueryPatch>,
    ) -> Result<PageResult<EmailMessage>> {
        let (mut query, ticket) = {
            let mut state = self.email_write();
            if let Some(patch) = patch {
                state.query.merge(patch);
            }
            state.query.split_send_date_range();
            state.loading = true;
            (state.query.clone(), self.email_list_seq.issue())
        };

        let result = self.email_api.get_email_message_page(&mut query);

        let mut state = self.email_write();
        let current = self.email_list_seq.is_current(ticket);
        if current {
            state.loading = false;
        }
        match result {
            Ok(page) => {
                if current {
                    state.list = page.list.clone();
                    state.total = page.total;
                } else {
                    debug!("Dropping email page from superseded request {}", ticket);
                }
                Ok(page)
            }
            Err(e) => {
                error!("Failed to fetch email list: {:#}", e);
                Err(e)
            }
        }
    }

    /// Load one email and its attachments into `current`
    pub fn fetch_email_detail(&self, id: EmailId) -> Result<EmailMessage> {
        let ticket = self.email_detail_seq.issue();
        let email = self.email_api.get_email_message(id).inspect_err(|e| {
            error!("Failed to fetch email {}: {:#}", id, e);
        })?;

        let mut state = self.email_write();
        if self.email_detail_seq.is_current(ticket) {
            state.attachments = email.attachments.clone().unwrap_or_default();
            state.current = Some(email.clone());
        } else {
            debug!("Dropping detail of email {} from superseded request", id);
        }
        Ok(email)
    }

    /// Toggle the star flag on the backend, then locally
    pub fn toggle_star(&self, id: EmailId) -> Result<()> {
        self.email_api.toggle_email_star(id).inspect_err(|e| {
            error!("Failed to toggle star on email {}: {:#}", id, e);
        })?;

        reconcile_star_toggle(&mut self.email_write(), id);
        Ok(())
    }

    /// Delete emails with a single backend call, then prune local state
    pub fn batch_delete_emails(&self, ids: &[EmailId]) -> Result<()> {
        self.email_api.delete_email_messages(ids).inspect_err(|e| {
            error!("Failed to delete {} emails: {:#}", ids.len(), e);
        })?;

        info!("Deleted {} emails", ids.len());
        reconcile_deletion(&mut self.email_write(), ids);
        Ok(())
    }

    pub fn set_selected_emails(&self, ids: Vec<EmailId>) {
        self.email_write().selected_ids = ids;
    }

    pub fn clear_selected_emails(&self) {
        self.email_write().selected_ids.clear();
    }

    /// Add `id` to the selection, or remove it if already selected
    pub fn toggle_email_selection(&self, id: EmailId) {
        let mut state = self.email_write();
        match state.selected_ids.iter().position(|s| *s == id) {
            Some(index) => {
                state.selected_ids.remove(index);
            }
            None => state.selected_ids.push(id),
        }
    }

    /// Select every email on the loaded page, or none
    pub fn toggle_all_email_selection(&self, select_all: bool) {
        let mut state = self.email_write();
        state.selected_ids = if select_all {
            state.list.iter().map(|e| e.id).collect()
        } else {
            Vec::new()
        };
    }

    pub fn is_email_loading(&self) -> bool {
        self.email_read().loading
    }

    pub fn selected_email_count(&self) -> usize {
        self.email_read().selected_count()
    }

    pub fn has_selected_emails(&self) -> bool {
        self.email_read().has_selection()
    }

    pub fn current_email_has_attachments(&self) -> bool {
        !self.email_read().attachments.is_empty()
    }

    pub fn email_stats(&self) -> EmailStats {
        self.email_read().stats()
    }

    /// Restore defaults; responses to requests already in flight are dropped
    pub fn reset_email_state(&self) {
        let mut state = self.email_write();
        self.email_list_seq.issue();
        self.email_detail_seq.issue();
        *state = EmailState::default();
    }
}
