use serde_json::Value;
use tracing::{debug, info, warn};

use bella_core::{AppError, AppResult, RecordId};

use crate::resource_definitions::{
    DELETE_ACTION, EDIT_ACTION, ResourceDefinition, VIEW_ACTION,
};
use crate::screen_ports::NotificationKind;

use super::{ModalState, ScreenController, ScreenState};

/// Result of opening a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The modal is open.
    Opened,
    /// The row has no backing record; nothing was opened.
    RecordMissing,
    /// The action is disabled for the row.
    Disabled,
    /// Another modal is open or a request is in flight.
    Ignored,
}

/// Result of submitting the create or edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; every field is now touched.
    Invalid,
    /// The record was saved and the modal closed.
    Saved,
    /// The API rejected the request; the modal stays open.
    Failed,
    /// No form is open, a request is already in flight, or the screen was
    /// unmounted meanwhile.
    Ignored,
}

/// Result of confirming a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was deleted.
    Deleted,
    /// The API rejected the request.
    Failed,
    /// No confirmation is open or a request is already in flight.
    Ignored,
}

enum Mutation {
    Create,
    Update(RecordId),
}

impl ScreenController {
    /// Opens the empty create form.
    pub async fn open_create(&self) -> ActionOutcome {
        let mut state = self.state.lock().await;
        if !can_open(&state) {
            return ActionOutcome::Ignored;
        }

        state.form.reset();
        state.modal = ModalState::Create;
        ActionOutcome::Opened
    }

    /// Handles a row action clicked in the table.
    ///
    /// Unknown action ids are configuration errors.
    pub async fn handle_action(&self, action_id: &str, row: &Value) -> AppResult<ActionOutcome> {
        let event = self.state.lock().await.table.dispatch_action(action_id, row)?;
        let Some(event) = event else {
            return Ok(ActionOutcome::Disabled);
        };

        match event.action_id.as_str() {
            VIEW_ACTION => Ok(self.open_view(&event.row).await),
            EDIT_ACTION => Ok(self.open_edit(&event.row).await),
            DELETE_ACTION => Ok(self.open_delete(&event.row).await),
            other => Err(AppError::Configuration(format!(
                "{} screen has no handler for action '{other}'",
                self.resource().as_str()
            ))),
        }
    }

    /// Opens the read-only details of a row's record.
    pub async fn open_view(&self, row: &Value) -> ActionOutcome {
        self.open_with_record(row, ModalState::View).await
    }

    /// Opens the edit form pre-filled from a row's record.
    pub async fn open_edit(&self, row: &Value) -> ActionOutcome {
        let Some(id) = self.definition.record_id(row) else {
            return self.record_missing(row);
        };

        let mut state = self.state.lock().await;
        if !can_open(&state) {
            return ActionOutcome::Ignored;
        }

        let Some(record) = find_record(&state, self.definition.as_ref(), &id) else {
            drop(state);
            return self.record_missing(row);
        };

        let values = self.definition.form_values(&record);
        state.form.reset();
        state.form.patch(&values);
        state.modal = ModalState::Edit(id);
        ActionOutcome::Opened
    }

    /// Opens the delete confirmation for a row's record.
    pub async fn open_delete(&self, row: &Value) -> ActionOutcome {
        self.open_with_record(row, ModalState::DeleteConfirm).await
    }

    /// Closes the open modal without saving.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if matches!(state.modal, ModalState::Create | ModalState::Edit(_)) {
            state.form.reset();
        }
        state.modal = ModalState::Closed;
    }

    /// Submits the create or edit form.
    pub async fn submit(&self) -> SubmitOutcome {
        let resource = self.resource();
        let (mutation, payload, epoch) = {
            let mut state = self.state.lock().await;
            if state.pending || !state.mounted {
                return SubmitOutcome::Ignored;
            }

            let mutation = match &state.modal {
                ModalState::Create => Mutation::Create,
                ModalState::Edit(id) => Mutation::Update(id.clone()),
                _ => return SubmitOutcome::Ignored,
            };

            if !state.form.is_valid() {
                state.form.mark_all_touched();
                return SubmitOutcome::Invalid;
            }

            state.pending = true;
            (mutation, state.form.payload(), state.epoch)
        };

        let result = match &mutation {
            Mutation::Create => self.gateway.create(resource, payload).await,
            Mutation::Update(id) => self.gateway.update(resource, id, payload).await,
        };

        {
            let mut state = self.state.lock().await;
            state.pending = false;
            if !state.mounted || state.epoch != epoch {
                debug!(
                    resource = resource.as_str(),
                    "discarding save response from an unmounted screen"
                );
                return SubmitOutcome::Ignored;
            }

            if result.is_ok() {
                state.form.reset();
                state.modal = ModalState::Closed;
            }
        }

        match result {
            Ok(_) => {
                let message = match &mutation {
                    Mutation::Create => resource.created_message(),
                    Mutation::Update(_) => resource.updated_message(),
                };
                info!(resource = resource.as_str(), "{message}");
                self.notifier
                    .notify(message.as_str(), NotificationKind::Success, None);
                self.reload().await;
                SubmitOutcome::Saved
            }
            Err(error) => {
                warn!(resource = resource.as_str(), error = %error, "save request failed");
                self.notify_remote_error(&error);
                SubmitOutcome::Failed
            }
        }
    }

    /// Issues the delete confirmed by the user.
    pub async fn confirm_delete(&self) -> DeleteOutcome {
        let resource = self.resource();
        let (record_id, epoch) = {
            let mut state = self.state.lock().await;
            if state.pending || !state.mounted {
                return DeleteOutcome::Ignored;
            }

            let ModalState::DeleteConfirm(record) = &state.modal else {
                return DeleteOutcome::Ignored;
            };

            let Some(record_id) = self.definition.record_id(record) else {
                state.modal = ModalState::Closed;
                drop(state);
                self.notifier.notify(
                    resource.not_found_message().as_str(),
                    NotificationKind::Error,
                    None,
                );
                return DeleteOutcome::Failed;
            };

            state.pending = true;
            (record_id, state.epoch)
        };

        let result = self.gateway.delete(resource, &record_id).await;

        {
            let mut state = self.state.lock().await;
            state.pending = false;
            if !state.mounted || state.epoch != epoch {
                debug!(
                    resource = resource.as_str(),
                    record_id = %record_id,
                    "discarding delete response from an unmounted screen"
                );
                return DeleteOutcome::Ignored;
            }
            state.modal = ModalState::Closed;
        }

        match result {
            Ok(()) => {
                info!(
                    resource = resource.as_str(),
                    record_id = %record_id,
                    "deleted record"
                );
                self.notifier.notify(
                    resource.deleted_message().as_str(),
                    NotificationKind::Success,
                    None,
                );
                self.reload().await;
                DeleteOutcome::Deleted
            }
            Err(error) => {
                warn!(
                    resource = resource.as_str(),
                    record_id = %record_id,
                    error = %error,
                    "delete request failed"
                );
                self.notify_remote_error(&error);
                DeleteOutcome::Failed
            }
        }
    }

    async fn open_with_record(
        &self,
        row: &Value,
        modal: impl FnOnce(Value) -> ModalState,
    ) -> ActionOutcome {
        let Some(id) = self.definition.record_id(row) else {
            return self.record_missing(row);
        };

        let mut state = self.state.lock().await;
        if !can_open(&state) {
            return ActionOutcome::Ignored;
        }

        let Some(record) = find_record(&state, self.definition.as_ref(), &id) else {
            drop(state);
            return self.record_missing(row);
        };

        state.modal = modal(record);
        ActionOutcome::Opened
    }

    fn record_missing(&self, row: &Value) -> ActionOutcome {
        let resource = self.resource();
        warn!(
            resource = resource.as_str(),
            row = %row,
            "row has no backing record"
        );
        self.notifier.notify(
            resource.not_found_message().as_str(),
            NotificationKind::Error,
            None,
        );
        ActionOutcome::RecordMissing
    }
}

fn can_open(state: &ScreenState) -> bool {
    state.mounted && !state.pending && state.modal == ModalState::Closed
}

fn find_record(
    state: &ScreenState,
    definition: &dyn ResourceDefinition,
    id: &RecordId,
) -> Option<Value> {
    state
        .records
        .iter()
        .find(|record| definition.record_id(record).as_ref() == Some(id))
        .cloned()
}
