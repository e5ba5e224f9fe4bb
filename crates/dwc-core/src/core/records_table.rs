//! Paged, sortable records table.
//!
//! [`RecordsTable`] owns the query state, the field configuration, the last
//! fetched page and the field menu. It never performs I/O itself: operations
//! that need data return a [`FetchPlan`], and the caller runs the request and
//! feeds the result back through [`RecordsTable::apply_response`]. Every
//! remote request carries a sequence number so a slow, superseded response
//! can't overwrite a newer one.

use crate::api::models::{FieldCatalog, Record, ResultPage};
use crate::core::fields::{FieldDescriptor, FieldSet, build_fields_parameter};
use crate::core::menu::{ContextMenu, MenuEvent, MenuGroup, MenuItem, MenuOverlay};
use crate::core::query::{DEFAULT_PAGE_SIZE, QueryState, RecordsQuery, SortOrder};
use crate::core::render::{
    HeaderCell, RenderOptions, RenderedRow, paging_label, render_header, render_rows,
};
use crate::core::source::RecordSource;
use crate::error::{ApiError, TableError};
use serde_json::Value;

/// Menu group holding one toggle item per field.
pub const FIELD_MENU_GROUP: &str = "fields";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordsTableOptions {
    pub start: u64,
    pub count: u64,
    pub default_sort: Option<String>,
    pub default_order: SortOrder,
    /// Initial gateway filter expression.
    pub filter: Option<String>,
    pub row_numbers: bool,
    /// Shown when neither the record nor the field supplies a value.
    pub default_value: Value,
    pub id_field: String,
    /// Clicking an id cell selects the record for a detail table.
    pub linked_detail: bool,
    pub load_on_init: bool,
    pub fields: Vec<FieldDescriptor>,
}

impl Default for RecordsTableOptions {
    fn default() -> Self {
        RecordsTableOptions {
            start: 0,
            count: DEFAULT_PAGE_SIZE,
            default_sort: None,
            default_order: SortOrder::Ascending,
            filter: None,
            row_numbers: true,
            default_value: Value::String(String::new()),
            id_field: "id".to_string(),
            linked_detail: true,
            load_on_init: true,
            fields: FieldSet::darwin_core_defaults().iter().cloned().collect(),
        }
    }
}

/// Everything a user can ask the table to do.
#[derive(Debug, Clone, PartialEq)]
pub enum TableCommand {
    Sort(String),
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    ToggleField(String),
    AddField(FieldDescriptor),
    RemoveField(String),
    SetFilter(Option<String>),
    Refresh,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordsRequest {
    pub seq: u64,
    pub query: RecordsQuery,
}

/// What the caller has to do after a table operation.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPlan {
    /// Rows were rebuilt from the cached page; nothing to fetch.
    FromCache,
    Remote(RecordsRequest),
}

/// Callbacks into the embedding application.
pub trait SelectionHandler {
    fn on_row_selected(&mut self, record: &Record);

    fn on_field_activated(&mut self, key: &str, record: &Record);
}

pub struct RecordsTable {
    query: QueryState,
    fields: FieldSet,
    row_numbers: bool,
    default_value: Value,
    id_field: String,
    linked_detail: bool,
    load_on_init: bool,
    cache: Option<ResultPage>,
    /// Query and fields the cached page is shown with.
    rendered: Option<(QueryState, FieldSet)>,
    total: u64,
    header: Vec<HeaderCell>,
    rows: Vec<RenderedRow>,
    paging_label: String,
    latest_seq: u64,
    loading: bool,
    last_error: Option<ApiError>,
    catalog: Option<FieldCatalog>,
    menu: ContextMenu<TableCommand>,
}

impl RecordsTable {
    pub fn new(options: RecordsTableOptions, overlay: MenuOverlay) -> Result<Self, TableError> {
        let mut query = QueryState::new(options.start, options.count)
            .ok_or(TableError::InvalidPageSize(options.count))?;
        query.sort_field = options.default_sort;
        query.sort_order = options.default_order;
        query.filter = options
            .filter
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        let mut fields = FieldSet::new(options.fields)?;
        fields.normalize_weights();

        let mut table = RecordsTable {
            query,
            fields,
            row_numbers: options.row_numbers,
            default_value: options.default_value,
            id_field: options.id_field,
            linked_detail: options.linked_detail,
            load_on_init: options.load_on_init,
            cache: None,
            rendered: None,
            total: 0,
            header: Vec::new(),
            rows: Vec::new(),
            paging_label: String::new(),
            latest_seq: 0,
            loading: false,
            last_error: None,
            catalog: None,
            menu: ContextMenu::new(overlay),
        };
        table.rebuild_header();
        Ok(table)
    }

    fn render_options(&self) -> RenderOptions<'_> {
        RenderOptions {
            row_numbers: self.row_numbers,
            default_value: &self.default_value,
            id_field: &self.id_field,
            linked_detail: self.linked_detail,
        }
    }

    fn rebuild_header(&mut self) {
        let sort = self
            .query
            .sort_field
            .as_deref()
            .map(|key| (key, self.query.sort_order));
        self.header = render_header(&self.fields, &self.render_options(), sort);
    }

    fn rerender(&mut self) {
        self.rebuild_header();
        match &self.cache {
            Some(page) => {
                self.rows = render_rows(page, &self.fields, &self.render_options());
                self.paging_label = paging_label(page.start, self.query.count(), self.total);
            }
            None => {
                self.rows.clear();
                self.paging_label.clear();
            }
        }
    }

    /// The initial fetch, if the table was configured to load on creation.
    pub fn initial_fetch(&mut self) -> Option<FetchPlan> {
        self.load_on_init.then(|| self.fetch_records(false))
    }

    /// Re-render from the cached page when allowed, otherwise start a new
    /// request for the current query.
    pub fn fetch_records(&mut self, use_cache: bool) -> FetchPlan {
        if use_cache && self.cache.is_some() {
            if let Some((_, fields)) = &mut self.rendered {
                *fields = self.fields.clone();
            }
            self.rerender();
            return FetchPlan::FromCache;
        }

        self.latest_seq += 1;
        self.loading = true;
        let query = RecordsQuery::from_state(&self.query, build_fields_parameter(&self.fields));
        log::debug!("records request #{}: {:?}", self.latest_seq, query);
        FetchPlan::Remote(RecordsRequest {
            seq: self.latest_seq,
            query,
        })
    }

    /// Feed back the outcome of the request tagged `seq`.
    ///
    /// Responses to superseded requests are dropped. On failure the cache
    /// stays, and paging, sort, filter and fields return to what the page
    /// on screen was rendered with.
    pub fn apply_response(
        &mut self,
        seq: u64,
        result: Result<ResultPage, ApiError>,
    ) -> Result<(), TableError> {
        if seq != self.latest_seq {
            log::warn!(
                "discarding stale records response #{} (latest #{})",
                seq,
                self.latest_seq
            );
            return Err(TableError::StaleResponse {
                seq,
                latest: self.latest_seq,
            });
        }
        self.loading = false;

        match result {
            Ok(page) => {
                self.total = page.num_found;
                self.cache = Some(page);
                self.rendered = Some((self.query.clone(), self.fields.clone()));
                self.last_error = None;
                self.rerender();
                Ok(())
            }
            Err(error) => {
                log::warn!("records request #{} failed: {}", seq, error);
                self.restore_rendered();
                self.last_error = Some(error.clone());
                Err(TableError::FetchFailed(error))
            }
        }
    }

    /// Run `plan` against `source` and apply the result.
    pub async fn execute(
        &mut self,
        source: &dyn RecordSource,
        plan: FetchPlan,
    ) -> Result<(), TableError> {
        match plan {
            FetchPlan::FromCache => Ok(()),
            FetchPlan::Remote(request) => {
                let result = source.fetch_records(&request.query).await;
                self.apply_response(request.seq, result)
            }
        }
    }

    pub async fn load(&mut self, source: &dyn RecordSource, use_cache: bool) -> Result<(), TableError> {
        let plan = self.fetch_records(use_cache);
        self.execute(source, plan).await
    }

    /// Put query and fields back to what the cached page was shown with.
    fn restore_rendered(&mut self) {
        let Some((query, fields)) = self.rendered.clone() else {
            return;
        };
        // Fields added since the page was shown need their menu item reset too
        let keys: Vec<String> = self.fields.iter().map(|f| f.key.clone()).collect();
        self.query = query;
        self.fields = fields;
        for key in &keys {
            self.sync_menu_item(key);
        }
        self.rerender();
    }

    fn sync_menu_item(&mut self, key: &str) {
        if self.fields.is_displayed(key) {
            self.menu.set_item_on(FIELD_MENU_GROUP, key);
        } else {
            self.menu.set_item_off(FIELD_MENU_GROUP, key);
        }
    }

    /// Show a field, merging `descriptor` into any existing configuration.
    /// The cached page may lack the field, so this always fetches.
    pub fn add_field(&mut self, mut descriptor: FieldDescriptor) -> FetchPlan {
        descriptor.displayed = true;
        let key = descriptor.key.clone();
        self.fields.upsert(descriptor);
        self.fields.normalize_weights();
        self.sync_menu_item(&key);
        self.rebuild_header();
        self.fetch_records(false)
    }

    /// Hide a field; its configuration is kept for re-adding.
    pub fn remove_field(&mut self, key: &str) -> Result<FetchPlan, TableError> {
        self.fields.set_displayed(key, false)?;
        self.sync_menu_item(key);
        self.rebuild_header();
        Ok(self.fetch_records(true))
    }

    pub fn toggle_field(&mut self, key: &str) -> Result<FetchPlan, TableError> {
        if self.fields.is_displayed(key) {
            return self.remove_field(key);
        }
        let mut descriptor = FieldDescriptor::new(key);
        if !self.fields.contains(key) {
            if let Some(label) = self
                .catalog
                .as_ref()
                .and_then(|c| c.fields.get(key))
                .and_then(|meta| meta.label.clone())
            {
                descriptor.label = Some(label);
            }
        }
        Ok(self.add_field(descriptor))
    }

    pub fn sort_by_field(&mut self, key: &str) -> FetchPlan {
        self.query.sort_by(key);
        self.rebuild_header();
        self.fetch_records(false)
    }

    pub fn first_page(&mut self) -> Option<FetchPlan> {
        self.query.first_page().then(|| self.fetch_records(false))
    }

    pub fn prev_page(&mut self) -> Option<FetchPlan> {
        self.query.prev_page().then(|| self.fetch_records(false))
    }

    pub fn next_page(&mut self) -> Option<FetchPlan> {
        let total = self.total;
        self.query.next_page(total).then(|| self.fetch_records(false))
    }

    pub fn last_page(&mut self) -> Option<FetchPlan> {
        let total = self.total;
        self.query.last_page(total).then(|| self.fetch_records(false))
    }

    pub fn set_filter(&mut self, filter: Option<String>) -> FetchPlan {
        self.query.set_filter(filter);
        self.fetch_records(false)
    }

    pub fn update(&mut self, command: TableCommand) -> Result<Option<FetchPlan>, TableError> {
        let plan = match command {
            TableCommand::Sort(key) => Some(self.sort_by_field(&key)),
            TableCommand::FirstPage => self.first_page(),
            TableCommand::PrevPage => self.prev_page(),
            TableCommand::NextPage => self.next_page(),
            TableCommand::LastPage => self.last_page(),
            TableCommand::ToggleField(key) => Some(self.toggle_field(&key)?),
            TableCommand::AddField(descriptor) => Some(self.add_field(descriptor)),
            TableCommand::RemoveField(key) => Some(self.remove_field(&key)?),
            TableCommand::SetFilter(filter) => Some(self.set_filter(filter)),
            TableCommand::Refresh => Some(self.fetch_records(false)),
        };
        Ok(plan)
    }

    /// Build the field menu from gateway metadata. Configured fields the
    /// gateway doesn't list are appended.
    pub fn install_field_menu(&mut self, catalog: FieldCatalog) {
        let mut group = MenuGroup::new("Fields").with_header();
        for key in catalog.keys() {
            let label = self
                .fields
                .get(key)
                .map(|f| f.label().to_string())
                .unwrap_or_else(|| catalog.label(key).to_string());
            group = group.item(
                key,
                MenuItem::new(
                    label,
                    self.fields.is_displayed(key),
                    TableCommand::ToggleField(key.to_string()),
                ),
            );
        }
        for field in self.fields.iter().filter(|f| !catalog.contains(&f.key)) {
            group = group.item(
                field.key.clone(),
                MenuItem::new(
                    field.label(),
                    field.displayed,
                    TableCommand::ToggleField(field.key.clone()),
                ),
            );
        }

        self.menu.clear();
        self.menu.add_group(FIELD_MENU_GROUP, group);
        self.catalog = Some(catalog);
    }

    pub fn menu(&self) -> &ContextMenu<TableCommand> {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut ContextMenu<TableCommand> {
        &mut self.menu
    }

    pub fn show_field_menu(&mut self, position: (u16, u16), viewport: (u16, u16)) {
        self.menu.show(position, viewport);
    }

    /// Route a menu event; an activated item runs its command.
    pub fn handle_menu_event(&mut self, event: MenuEvent) -> Result<Option<FetchPlan>, TableError> {
        match self.menu.handle_event(event) {
            Some(command) => self.update(command),
            None => Ok(None),
        }
    }

    /// Route a command produced by the menu outside of `handle_menu_event`
    /// (keyboard activation or mouse click).
    pub fn run_menu_command(&mut self, command: Option<TableCommand>) -> Result<Option<FetchPlan>, TableError> {
        match command {
            Some(command) => self.update(command),
            None => Ok(None),
        }
    }

    /// A cell in row `row` (0-based within the page) was activated.
    /// Returns whether the handler was called.
    pub fn activate_cell(&self, row: usize, key: &str, handler: &mut dyn SelectionHandler) -> bool {
        let Some(record) = self.record(row) else {
            return false;
        };
        if key == self.id_field && self.linked_detail {
            handler.on_row_selected(record);
            return true;
        }
        if self.fields.get(key).is_some_and(|f| f.clickable && f.displayed) {
            handler.on_field_activated(key, record);
            return true;
        }
        false
    }

    pub fn record(&self, row: usize) -> Option<&Record> {
        self.cache.as_ref()?.docs.get(row)
    }

    pub fn header(&self) -> &[HeaderCell] {
        &self.header
    }

    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    pub fn paging_label(&self) -> &str {
        &self.paging_label
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn cached_page(&self) -> Option<&ResultPage> {
        self.cache.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::GatewayClient;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// In-memory source over `total` generated records that counts requests.
    struct CountingSource {
        docs: Vec<Record>,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new(total: usize) -> Self {
            let docs = (1..=total)
                .map(|i| {
                    let value = json!({
                        "id": format!("R.{}", i),
                        "sciName_s": format!("Species {}", i % 7),
                        "lat": (i % 90) as f64,
                        "lng": -((i % 180) as f64),
                        "genus_s": "Esox"
                    });
                    value.as_object().cloned().unwrap()
                })
                .collect();
            CountingSource {
                docs,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RecordSource for CountingSource {
        async fn fetch_records(&self, query: &RecordsQuery) -> Result<ResultPage, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let keys: Option<Vec<&str>> = query.fields.as_deref().map(|f| f.split(',').collect());
            let docs = self
                .docs
                .iter()
                .skip(query.start as usize)
                .take(query.count as usize)
                .map(|doc| match &keys {
                    Some(keys) => doc
                        .iter()
                        .filter(|(k, _)| keys.contains(&k.as_str()))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                    None => doc.clone(),
                })
                .collect();
            Ok(ResultPage {
                num_found: self.docs.len() as u64,
                start: query.start,
                docs,
            })
        }

        async fn fetch_record(&self, id: &str) -> Result<Record, ApiError> {
            self.docs
                .iter()
                .find(|d| d.get("id") == Some(&json!(id)))
                .cloned()
                .ok_or(ApiError::Http {
                    status: 404,
                    endpoint: format!("record/{}", id),
                    message: "Not Found".to_string(),
                })
        }

        async fn fetch_fields(&self) -> Result<FieldCatalog, ApiError> {
            Ok(serde_json::from_value(json!(["id", "sciName_s", "lat", "lng", "genus_s"])).unwrap())
        }
    }

    fn table() -> RecordsTable {
        RecordsTable::new(RecordsTableOptions::default(), MenuOverlay::new()).unwrap()
    }

    fn column_keys(table: &RecordsTable) -> Vec<Option<String>> {
        table.header().iter().map(|h| h.key.clone()).collect()
    }

    fn remote(plan: FetchPlan) -> RecordsRequest {
        match plan {
            FetchPlan::Remote(request) => request,
            FetchPlan::FromCache => panic!("expected a remote fetch"),
        }
    }

    #[derive(Default)]
    struct Recorder {
        selected: Vec<String>,
        activated: Vec<(String, String)>,
    }

    impl SelectionHandler for Recorder {
        fn on_row_selected(&mut self, record: &Record) {
            self.selected.push(record["id"].as_str().unwrap_or_default().to_string());
        }

        fn on_field_activated(&mut self, key: &str, record: &Record) {
            self.activated.push((
                key.to_string(),
                record["id"].as_str().unwrap_or_default().to_string(),
            ));
        }
    }

    #[test]
    fn test_new_validates_options() {
        let options = RecordsTableOptions {
            count: 0,
            ..Default::default()
        };
        assert_eq!(
            RecordsTable::new(options, MenuOverlay::new()).err(),
            Some(TableError::InvalidPageSize(0))
        );

        let options = RecordsTableOptions {
            fields: vec![FieldDescriptor::new("id"), FieldDescriptor::new("id")],
            ..Default::default()
        };
        assert_eq!(
            RecordsTable::new(options, MenuOverlay::new()).err(),
            Some(TableError::DuplicateField("id".to_string()))
        );
    }

    #[test]
    fn test_initial_state() {
        let mut t = table();
        let titles: Vec<String> = t.header().iter().map(HeaderCell::title).collect();
        assert_eq!(titles, vec!["#", "ID", "Species", "Longitude", "Latitude"]);
        assert!(t.rows().is_empty());
        assert_eq!(t.paging_label(), "");

        let request = remote(t.initial_fetch().unwrap());
        assert_eq!(request.seq, 1);
        assert_eq!(request.query.fields.as_deref(), Some("id,sciName_s,lng,lat"));
        assert!(t.is_loading());
    }

    #[tokio::test]
    async fn test_load_renders_rows_and_label() {
        let source = CountingSource::new(103);
        let mut t = table();
        t.load(&source, false).await.unwrap();

        assert_eq!(t.total(), 103);
        assert_eq!(t.rows().len(), 25);
        assert_eq!(t.rows()[0].cells[1].text, "R.1");
        assert_eq!(t.paging_label(), "Showing Results: 1 - 25 (103 total)");
        assert!(!t.is_loading());
    }

    #[tokio::test]
    async fn test_cached_rerender_issues_no_request() {
        let source = CountingSource::new(30);
        let mut t = table();
        t.load(&source, false).await.unwrap();
        let rows = t.rows().to_vec();
        assert_eq!(source.calls(), 1);

        t.load(&source, true).await.unwrap();
        assert_eq!(source.calls(), 1);
        assert_eq!(t.rows(), rows.as_slice());

        t.load(&source, false).await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_paging_commands() {
        let source = CountingSource::new(103);
        let mut t = table();
        t.load(&source, false).await.unwrap();

        assert_eq!(t.update(TableCommand::PrevPage).unwrap(), None);
        assert_eq!(t.update(TableCommand::FirstPage).unwrap(), None);

        let plan = t.update(TableCommand::LastPage).unwrap().unwrap();
        t.execute(&source, plan).await.unwrap();
        assert_eq!(t.query().start, 100);
        assert_eq!(t.rows().len(), 3);
        assert_eq!(t.rows()[2].number, 103);
        assert_eq!(t.paging_label(), "Showing Results: 101 - 103 (103 total)");

        assert_eq!(t.update(TableCommand::NextPage).unwrap(), None);
        assert_eq!(t.update(TableCommand::LastPage).unwrap(), None);

        let plan = t.update(TableCommand::PrevPage).unwrap().unwrap();
        t.execute(&source, plan).await.unwrap();
        assert_eq!(t.query().start, 75);

        let plan = t.update(TableCommand::FirstPage).unwrap().unwrap();
        t.execute(&source, plan).await.unwrap();
        assert_eq!(t.query().start, 0);
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn test_single_page_has_no_paging() {
        let source = CountingSource::new(10);
        let mut t = table();
        t.load(&source, false).await.unwrap();
        assert_eq!(t.next_page(), None);
        assert_eq!(t.last_page(), None);
        assert_eq!(t.paging_label(), "Showing Results: 1 - 10 (10 total)");
    }

    #[tokio::test]
    async fn test_sort_flips_and_marks_header() {
        let source = CountingSource::new(5);
        let mut t = table();
        t.load(&source, false).await.unwrap();

        let request = remote(t.sort_by_field("lat"));
        assert_eq!(request.query.order_by.as_deref(), Some("lat"));
        assert_eq!(request.query.order, SortOrder::Ascending);
        let request = remote(t.update(TableCommand::Sort("lat".to_string())).unwrap().unwrap());
        assert_eq!(request.query.order, SortOrder::Descending);

        let lat = t.header().iter().find(|h| h.key.as_deref() == Some("lat")).unwrap();
        assert_eq!(lat.title(), "Latitude ▼");
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut t = table();
        let older = remote(t.fetch_records(false));
        let newer = remote(t.fetch_records(false));

        let newer_page = ResultPage {
            num_found: 1,
            start: 0,
            docs: vec![json!({"id": "new"}).as_object().cloned().unwrap()],
        };
        let older_page = ResultPage {
            num_found: 1,
            start: 0,
            docs: vec![json!({"id": "old"}).as_object().cloned().unwrap()],
        };

        t.apply_response(newer.seq, Ok(newer_page)).unwrap();
        assert_eq!(
            t.apply_response(older.seq, Ok(older_page)),
            Err(TableError::StaleResponse { seq: 1, latest: 2 })
        );
        assert_eq!(t.rows()[0].record_id.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_view() {
        let source = CountingSource::new(60);
        let mut t = table();
        t.load(&source, false).await.unwrap();
        let rows = t.rows().to_vec();

        let request = remote(t.next_page().unwrap());
        assert_eq!(t.query().start, 25);
        let error = ApiError::Http {
            status: 502,
            endpoint: "records".to_string(),
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(
            t.apply_response(request.seq, Err(error.clone())),
            Err(TableError::FetchFailed(error.clone()))
        );
        assert_eq!(t.rows(), rows.as_slice());
        assert_eq!(t.query().start, 0);
        assert_eq!(t.last_error(), Some(&error));
        assert!(!t.is_loading());
    }

    fn gateway_down() -> ApiError {
        ApiError::Http {
            status: 503,
            endpoint: "records".to_string(),
            message: "Service Unavailable".to_string(),
        }
    }

    fn header_titles(table: &RecordsTable) -> Vec<String> {
        table.header().iter().map(|h| h.title()).collect()
    }

    #[tokio::test]
    async fn test_unlinked_table_id_cells_are_plain() {
        let source = CountingSource::new(2);
        let options = RecordsTableOptions {
            linked_detail: false,
            ..RecordsTableOptions::default()
        };
        let mut t = RecordsTable::new(options, MenuOverlay::new()).unwrap();
        t.load(&source, false).await.unwrap();

        assert!(!t.rows()[0].cell("id").unwrap().clickable);
        let mut recorder = Recorder::default();
        assert!(!t.activate_cell(0, "id", &mut recorder));
        assert!(recorder.selected.is_empty());
    }

    #[tokio::test]
    async fn test_failed_sort_keeps_header() {
        let source = CountingSource::new(3);
        let mut t = table();
        t.load(&source, false).await.unwrap();
        let titles = header_titles(&t);

        let request = remote(t.sort_by_field("lat"));
        assert_ne!(header_titles(&t), titles);
        assert!(t.apply_response(request.seq, Err(gateway_down())).is_err());

        assert_eq!(header_titles(&t), titles);
        assert_eq!(t.query().sort_field, None);

        // The next page request carries the restored query
        let request = remote(t.fetch_records(false));
        assert_eq!(request.query.order_by, None);
    }

    #[tokio::test]
    async fn test_failed_filter_is_rolled_back() {
        let source = CountingSource::new(3);
        let mut t = table();
        t.load(&source, false).await.unwrap();

        let request = remote(t.set_filter(Some("genus_s:Esox".to_string())));
        assert!(t.apply_response(request.seq, Err(gateway_down())).is_err());
        assert_eq!(t.query().filter, None);
    }

    #[tokio::test]
    async fn test_failed_add_field_drops_new_column() {
        let source = CountingSource::new(3);
        let mut t = table();
        t.load(&source, false).await.unwrap();
        t.install_field_menu(source.fetch_fields().await.unwrap());

        let request = remote(t.add_field(FieldDescriptor::new("genus_s").with_label("Genus")));
        assert!(t.menu().item(FIELD_MENU_GROUP, "genus_s").unwrap().on);
        assert!(t.apply_response(request.seq, Err(gateway_down())).is_err());

        assert_eq!(t.header().len(), t.rows()[0].cells.len());
        assert!(!t.fields().is_displayed("genus_s"));
        assert!(!t.menu().item(FIELD_MENU_GROUP, "genus_s").unwrap().on);
    }

    #[tokio::test]
    async fn test_failure_after_cached_remove_keeps_removal() {
        let source = CountingSource::new(3);
        let mut t = table();
        t.load(&source, false).await.unwrap();
        assert_eq!(t.remove_field("lng").unwrap(), FetchPlan::FromCache);

        let request = remote(t.sort_by_field("id"));
        assert!(t.apply_response(request.seq, Err(gateway_down())).is_err());
        assert!(!t.fields().is_displayed("lng"));
        assert_eq!(t.header().len(), t.rows()[0].cells.len());
    }

    #[tokio::test]
    async fn test_remove_field_uses_cache_and_add_fetches() {
        let source = CountingSource::new(5);
        let mut t = table();
        t.load(&source, false).await.unwrap();

        let plan = t.remove_field("sciName_s").unwrap();
        assert_eq!(plan, FetchPlan::FromCache);
        assert_eq!(
            column_keys(&t),
            vec![None, Some("id".into()), Some("lng".into()), Some("lat".into())]
        );
        assert_eq!(t.rows()[0].cells.len(), 4);

        let request = remote(t.add_field(FieldDescriptor::new("genus_s").with_label("Genus")));
        assert_eq!(request.query.fields.as_deref(), Some("id,lng,lat,genus_s"));
        t.apply_response(request.seq, source.fetch_records(&request.query).await)
            .unwrap();
        assert_eq!(t.rows()[0].cell("genus_s").unwrap().text, "Esox");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_toggle_restores_configuration() {
        let source = CountingSource::new(5);
        let options = RecordsTableOptions {
            fields: vec![
                FieldDescriptor::new("id"),
                FieldDescriptor::new("lat")
                    .with_label("Latitude")
                    .with_default(json!("?"))
                    .with_weight(1),
            ],
            ..Default::default()
        };
        let mut t = RecordsTable::new(options, MenuOverlay::new()).unwrap();
        t.load(&source, false).await.unwrap();

        t.update(TableCommand::ToggleField("lat".to_string())).unwrap();
        assert!(!t.fields().is_displayed("lat"));
        let plan = t.update(TableCommand::ToggleField("lat".to_string())).unwrap().unwrap();
        t.execute(&source, plan).await.unwrap();

        let lat = t.fields().get("lat").unwrap();
        assert!(lat.displayed);
        assert_eq!(lat.label(), "Latitude");
        assert_eq!(lat.default_value, Some(json!("?")));
        // Weighted first, ahead of the unweighted id column.
        assert_eq!(t.header()[1].label, "Latitude");
    }

    #[tokio::test]
    async fn test_menu_activation_drops_column() {
        let source = CountingSource::new(5);
        let mut t = table();
        let overlay = t.menu().overlay().clone();
        t.load(&source, false).await.unwrap();
        t.install_field_menu(source.fetch_fields().await.unwrap());

        assert!(t.menu().item(FIELD_MENU_GROUP, "lat").unwrap().on);
        assert!(!t.menu().item(FIELD_MENU_GROUP, "genus_s").unwrap().on);
        assert_eq!(t.menu().item(FIELD_MENU_GROUP, "lat").unwrap().label, "Latitude");

        t.show_field_menu((2, 2), (80, 24));
        assert!(overlay.is_visible());
        let plan = t
            .handle_menu_event(MenuEvent::Activate {
                group: FIELD_MENU_GROUP.to_string(),
                item: "lat".to_string(),
            })
            .unwrap();
        assert_eq!(plan, Some(FetchPlan::FromCache));
        assert!(!overlay.is_visible());
        assert!(!t.menu().item(FIELD_MENU_GROUP, "lat").unwrap().on);
        assert!(t.rows()[0].cell("lat").is_none());
        assert_eq!(source.calls(), 1);

        // Turning an unconfigured field on fetches and flips its item.
        t.show_field_menu((2, 2), (80, 24));
        let plan = t
            .handle_menu_event(MenuEvent::Activate {
                group: FIELD_MENU_GROUP.to_string(),
                item: "genus_s".to_string(),
            })
            .unwrap();
        assert!(matches!(plan, Some(FetchPlan::Remote(_))));
        assert!(t.menu().item(FIELD_MENU_GROUP, "genus_s").unwrap().on);
    }

    #[tokio::test]
    async fn test_activate_cell() {
        let source = CountingSource::new(3);
        let options = RecordsTableOptions {
            fields: vec![
                FieldDescriptor::new("id"),
                FieldDescriptor::new("sciName_s").clickable(),
                FieldDescriptor::new("lat"),
            ],
            ..Default::default()
        };
        let mut t = RecordsTable::new(options, MenuOverlay::new()).unwrap();
        t.load(&source, false).await.unwrap();

        let mut recorder = Recorder::default();
        assert!(t.activate_cell(1, "id", &mut recorder));
        assert!(t.activate_cell(2, "sciName_s", &mut recorder));
        assert!(!t.activate_cell(0, "lat", &mut recorder));
        assert!(!t.activate_cell(9, "id", &mut recorder));

        assert_eq!(recorder.selected, vec!["R.2"]);
        assert_eq!(recorder.activated, vec![("sciName_s".to_string(), "R.3".to_string())]);
    }

    #[tokio::test]
    async fn test_filter_resets_paging() {
        let source = CountingSource::new(60);
        let mut t = table();
        t.load(&source, false).await.unwrap();
        let plan = t.next_page().unwrap();
        t.execute(&source, plan).await.unwrap();

        let request = remote(t.set_filter(Some("genus_s:Esox".to_string())));
        assert_eq!(request.query.start, 0);
        assert_eq!(request.query.filter.as_deref(), Some("genus_s:Esox"));
    }

    #[tokio::test]
    async fn test_load_against_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gateway/records"))
            .and(query_param("count", "2"))
            .and(query_param("fields", "id,sciName_s,lng,lat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "numFound": 2,
                "start": 0,
                "docs": [
                    {"id": "MVZ.1", "sciName_s": "Bufo boreas", "lat": 37.8, "lng": -122.2},
                    {"id": "MVZ.2", "sciName_s": "Rana draytonii"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let options = RecordsTableOptions {
            count: 2,
            row_numbers: false,
            default_value: json!("—"),
            ..Default::default()
        };
        let mut t = RecordsTable::new(options, MenuOverlay::new()).unwrap();
        t.load(&client, false).await.unwrap();

        let texts: Vec<Vec<String>> = t
            .rows()
            .iter()
            .map(|r| r.cells.iter().map(|c| c.text.clone()).collect())
            .collect();
        assert_eq!(texts[0], vec!["MVZ.1", "Bufo boreas", "-122.2", "37.8"]);
        assert_eq!(texts[1], vec!["MVZ.2", "Rana draytonii", "—", "—"]);
        assert_eq!(t.paging_label(), "Showing Results: 1 - 2 (2 total)");
    }
}
