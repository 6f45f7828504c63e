mod modal;


use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use bella_core::{AppResult, RecordId};
use bella_domain::{CellDisplay, FormState, ResourceKind, TableView};

use crate::remote::RemoteError;
use crate::resource_definitions::ResourceDefinition;
use crate::screen_ports::{CrudGateway, NotificationKind, Notifier};

pub use modal::{ActionOutcome, DeleteOutcome, SubmitOutcome};

/// Loading phase of a screen's row list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Not mounted yet.
    Idle,
    /// A list request is in flight.
    Loading,
    /// Rows are available, possibly empty after a failure.
    Loaded,
}

/// Modal currently shown over the screen. At most one is open.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalState {
    /// No modal.
    Closed,
    /// Empty create form.
    Create,
    /// Edit form pre-filled from a record.
    Edit(RecordId),
    /// Read-only record details.
    View(Value),
    /// Delete confirmation for a record.
    DeleteConfirm(Value),
}

/// Outcome of a list reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Rows were replaced.
    Loaded,
    /// The list call failed and rows were cleared.
    Failed,
    /// The response was stale or arrived after unmount.
    Discarded,
}

/// Rendered page of the screen's table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenPage {
    /// Projected rows of the page.
    pub rows: Vec<Value>,
    /// Rendered cells, one vector per row in column order.
    pub cells: Vec<Vec<CellDisplay>>,
    /// Rows matching the search term.
    pub total_items: usize,
    /// Number of pages, at least one.
    pub total_pages: usize,
    /// Current page, one-based.
    pub page: usize,
}

struct ScreenState {
    load: LoadState,
    modal: ModalState,
    records: Vec<Value>,
    rows: Vec<Value>,
    table: TableView,
    form: FormState,
    mounted: bool,
    pending: bool,
    generation: u64,
    epoch: u64,
}

/// Per-resource workflow wiring a form and a table to the CRUD gateway.
///
/// Every operation takes `&self`; state sits behind an async mutex that is
/// released before each gateway call.
pub struct ScreenController {
    definition: Arc<dyn ResourceDefinition>,
    gateway: Arc<dyn CrudGateway>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ScreenState>,
}

impl ScreenController {
    /// Creates a screen. Descriptor errors surface here.
    pub fn new(
        definition: Arc<dyn ResourceDefinition>,
        gateway: Arc<dyn CrudGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> AppResult<Self> {
        let page_size = definition.page_size();
        Self::with_page_size(definition, gateway, notifier, page_size)
    }

    /// Creates a screen whose table shows `page_size` rows per page.
    pub fn with_page_size(
        definition: Arc<dyn ResourceDefinition>,
        gateway: Arc<dyn CrudGateway>,
        notifier: Arc<dyn Notifier>,
        page_size: usize,
    ) -> AppResult<Self> {
        let form = FormState::build(definition.fields()?)?;
        let table = TableView::new(definition.columns()?, definition.actions()?, page_size)?;

        Ok(Self {
            definition,
            gateway,
            notifier,
            state: Mutex::new(ScreenState {
                load: LoadState::Idle,
                modal: ModalState::Closed,
                records: Vec::new(),
                rows: Vec::new(),
                table,
                form,
                mounted: false,
                pending: false,
                generation: 0,
                epoch: 0,
            }),
        })
    }

    /// Returns the administered resource.
    #[must_use]
    pub fn resource(&self) -> ResourceKind {
        self.definition.kind()
    }

    /// Loads rows and select options.
    pub async fn mount(&self) -> AppResult<ReloadOutcome> {
        {
            let mut state = self.state.lock().await;
            state.mounted = true;
            state.epoch += 1;
        }
        let outcome = self.reload().await;
        self.load_options().await?;
        Ok(outcome)
    }

    /// Stops the screen and closes any modal.
    ///
    /// Responses still in flight are discarded, even after a later `mount`.
    /// A create, update or delete already sent keeps the screen pending until
    /// its response arrives.
    pub async fn unmount(&self) {
        let mut state = self.state.lock().await;
        state.mounted = false;
        state.epoch += 1;
        state.modal = ModalState::Closed;
        state.form.reset();
    }

    /// Replaces the rows with a fresh list from the gateway.
    pub async fn reload(&self) -> ReloadOutcome {
        let resource = self.resource();
        let generation = {
            let mut state = self.state.lock().await;
            if !state.mounted {
                return ReloadOutcome::Discarded;
            }
            state.generation += 1;
            state.load = LoadState::Loading;
            state.generation
        };

        let result = self.gateway.list(resource).await;

        let mut state = self.state.lock().await;
        if !state.mounted || state.generation != generation {
            debug!(
                resource = resource.as_str(),
                generation, "discarding stale list response"
            );
            return ReloadOutcome::Discarded;
        }

        let (outcome, failure) = match result {
            Ok(records) => {
                state.rows = records
                    .iter()
                    .map(|record| self.definition.project_row(record))
                    .collect();
                state.records = records;
                info!(
                    resource = resource.as_str(),
                    count = state.rows.len(),
                    "loaded rows"
                );
                (ReloadOutcome::Loaded, None)
            }
            Err(error) => {
                warn!(resource = resource.as_str(), error = %error, "list request failed");
                state.records.clear();
                state.rows.clear();
                (ReloadOutcome::Failed, Some(error))
            }
        };

        let ScreenState { table, rows, .. } = &mut *state;
        table.sync_rows(rows);
        state.load = LoadState::Loaded;
        drop(state);

        if let Some(error) = failure {
            self.notify_remote_error(&error);
        }
        outcome
    }

    async fn load_options(&self) -> AppResult<()> {
        let resource = self.resource();
        for source in self.definition.option_sources() {
            let records = match self.gateway.list(source.resource()).await {
                Ok(records) => records,
                Err(error) => {
                    warn!(
                        resource = resource.as_str(),
                        field = source.field(),
                        source = source.resource().as_str(),
                        error = %error,
                        "failed to load select options"
                    );
                    continue;
                }
            };

            let mut state = self.state.lock().await;
            if !state.mounted {
                return Ok(());
            }
            state
                .form
                .update_options(source.field(), source.options_from(&records))?;
        }

        Ok(())
    }

    /// Sets the search term.
    pub async fn search(&self, term: impl Into<String>) {
        self.state.lock().await.table.on_search(term);
    }

    /// Toggles sorting on a column.
    pub async fn sort(&self, key: &str) -> AppResult<()> {
        self.state.lock().await.table.on_sort(key)
    }

    /// Moves by `delta` pages.
    pub async fn page(&self, delta: i64) {
        let mut state = self.state.lock().await;
        let ScreenState { table, rows, .. } = &mut *state;
        table.on_page(rows, delta);
    }

    /// Renders the current table page.
    pub async fn current_page(&self) -> ScreenPage {
        let state = self.state.lock().await;
        let snapshot = state.table.derive(&state.rows);
        let cells = snapshot
            .page_rows
            .iter()
            .map(|row| {
                state
                    .table
                    .columns()
                    .iter()
                    .map(|column| column.format_cell(row))
                    .collect()
            })
            .collect();

        ScreenPage {
            rows: snapshot.page_rows.into_iter().cloned().collect(),
            cells,
            total_items: snapshot.total_items,
            total_pages: snapshot.total_pages,
            page: snapshot.page,
        }
    }

    /// Returns the loading phase.
    pub async fn load_state(&self) -> LoadState {
        self.state.lock().await.load
    }

    /// Returns the open modal.
    pub async fn modal(&self) -> ModalState {
        self.state.lock().await.modal.clone()
    }

    /// Returns whether a create, update or delete is in flight.
    pub async fn is_pending(&self) -> bool {
        self.state.lock().await.pending
    }

    /// Returns a copy of the form.
    pub async fn form(&self) -> FormState {
        self.state.lock().await.form.clone()
    }

    /// Records user input on the open form.
    pub async fn set_field(&self, name: &str, value: impl Into<Value>) -> AppResult<()> {
        self.state.lock().await.form.set_value(name, value)
    }

    /// Marks a form field touched, as on blur.
    pub async fn touch_field(&self, name: &str) -> AppResult<()> {
        self.state.lock().await.form.mark_touched(name)
    }

    fn notify_remote_error(&self, error: &RemoteError) {
        for message in error.messages() {
            self.notifier
                .notify(message.as_str(), NotificationKind::Error, None);
        }
    }
}
