// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use crate::address::{AddressLookupResult, complete};
use crate::forms::{FormDraft, FormField};
use crate::ids::{CompanyNumber, FetchToken, MutationToken};
use crate::model::{
    CompanyType, ConfirmKind, CountryType, ListPage, MutationKind, Notice, PageInfo, Record,
    RecordSlot,
};
use crate::pagination::Pager;
use crate::query::{self, ListQuery};

const FETCH_FAILED_MESSAGE: &str = "could not load accounts -- refresh or search again to retry";
const MUTATION_BUSY_MESSAGE: &str = "another change is still in flight -- wait for it and retry";
const DELETE_WITHOUT_KEY_MESSAGE: &str = "select an account before deleting";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Whether a second change may be submitted while one is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationPolicy {
    #[default]
    Concurrent,
    Exclusive,
}

/// Payload captured when a mutation is submitted. Completion applies this
/// snapshot, never the live draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRequest {
    Create(Record),
    Update(Record),
    Delete(CompanyNumber),
}

impl MutationRequest {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Create(_) => MutationKind::Create,
            Self::Update(_) => MutationKind::Update,
            Self::Delete(_) => MutationKind::Delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Navigate(String),
    Search {
        business_number: String,
        company_name: String,
    },
    GoToPage(NonZeroU32),
    PrevPage,
    NextPage,
    Refresh,
    FetchCompleted {
        token: FetchToken,
        outcome: Result<ListPage, String>,
    },
    SelectRecord(CompanyNumber),
    EditField(FormField, String),
    SetCompanyType(CompanyType),
    SetCountryType(CountryType),
    ResetForm,
    ApplyAddress(AddressLookupResult),
    OpenConfirm(ConfirmKind),
    CancelConfirm,
    SubmitCreate,
    SubmitUpdate,
    SubmitDelete,
    MutationCompleted {
        token: MutationToken,
        outcome: Result<(), String>,
    },
    ClearNotice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    LocationChanged(String),
    FetchRequested {
        token: FetchToken,
        query: ListQuery,
    },
    ListLoaded {
        rows: usize,
    },
    ListFailed(String),
    StaleFetchIgnored(FetchToken),
    SelectionChanged(Option<CompanyNumber>),
    DraftChanged,
    ConfirmOpened(ConfirmKind),
    ConfirmClosed(ConfirmKind),
    MutationRequested {
        token: MutationToken,
        request: MutationRequest,
    },
    MutationRejected(MutationKind),
    MutationFailed {
        kind: MutationKind,
        error: String,
    },
    ListPatched(MutationKind),
    UnknownMutationIgnored(MutationToken),
    NoticeShown(Notice),
    NoticeCleared,
}

/// Keeps the location, the fetched page and the edit form consistent.
///
/// The state never performs I/O. Commands that need the record-storage
/// service emit [`AppEvent::FetchRequested`] or
/// [`AppEvent::MutationRequested`]; the caller runs the request and feeds the
/// result back as [`AppCommand::FetchCompleted`] or
/// [`AppCommand::MutationCompleted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub query: ListQuery,
    pub location: String,
    pub records: Vec<RecordSlot>,
    pub page_info: Option<PageInfo>,
    pub list_status: ListStatus,
    pub draft: FormDraft,
    pub selection: Option<CompanyNumber>,
    pub confirm: Option<ConfirmKind>,
    pub notice: Option<Notice>,
    pub mutation_policy: MutationPolicy,
    fetched_query: Option<ListQuery>,
    in_flight_fetch: Option<FetchToken>,
    pending_mutations: BTreeMap<MutationToken, MutationRequest>,
    next_token: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            query: ListQuery::default(),
            location: query::location(&ListQuery::default()),
            records: Vec::new(),
            page_info: None,
            list_status: ListStatus::Loading,
            draft: FormDraft::default(),
            selection: None,
            confirm: None,
            notice: None,
            mutation_policy: MutationPolicy::default(),
            fetched_query: None,
            in_flight_fetch: None,
            pending_mutations: BTreeMap::new(),
            next_token: 1,
        }
    }
}

impl AppState {
    pub fn with_policy(mutation_policy: MutationPolicy) -> Self {
        Self {
            mutation_policy,
            ..Self::default()
        }
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Navigate(raw) => self.navigate_to(query::decode(&raw), false),
            AppCommand::Search {
                business_number,
                company_name,
            } => self.navigate_to(ListQuery::search(&business_number, &company_name), false),
            AppCommand::GoToPage(page) => {
                let target = Pager::target(&self.query, page);
                self.navigate_to(target, false)
            }
            AppCommand::PrevPage => match self.page_info.and_then(|info| info.prev_target()) {
                Some(page) => self.navigate_to(Pager::target(&self.query, page), false),
                None => Vec::new(),
            },
            AppCommand::NextPage => match self.page_info.and_then(|info| info.next_target()) {
                Some(page) => self.navigate_to(Pager::target(&self.query, page), false),
                None => Vec::new(),
            },
            AppCommand::Refresh => self.navigate_to(self.query.clone(), true),
            AppCommand::FetchCompleted { token, outcome } => self.finish_fetch(token, outcome),
            AppCommand::SelectRecord(key) => self.select(key),
            AppCommand::EditField(field, value) => {
                self.draft.set(field, &value);
                vec![AppEvent::DraftChanged]
            }
            AppCommand::SetCompanyType(kind) => {
                self.draft.company_type = kind;
                vec![AppEvent::DraftChanged]
            }
            AppCommand::SetCountryType(kind) => {
                self.draft.country_type = kind;
                vec![AppEvent::DraftChanged]
            }
            AppCommand::ResetForm => {
                self.draft = FormDraft::reset();
                self.selection = None;
                vec![AppEvent::SelectionChanged(None), AppEvent::DraftChanged]
            }
            AppCommand::ApplyAddress(result) => {
                self.draft.apply_address(complete(&result));
                vec![AppEvent::DraftChanged]
            }
            AppCommand::OpenConfirm(kind) => {
                self.confirm = Some(kind);
                vec![AppEvent::ConfirmOpened(kind)]
            }
            AppCommand::CancelConfirm => match self.confirm.take() {
                Some(kind) => vec![AppEvent::ConfirmClosed(kind)],
                None => Vec::new(),
            },
            AppCommand::SubmitCreate => self.submit_upsert(MutationKind::Create),
            AppCommand::SubmitUpdate => self.submit_upsert(MutationKind::Update),
            AppCommand::SubmitDelete => self.submit_delete(),
            AppCommand::MutationCompleted { token, outcome } => {
                self.finish_mutation(token, outcome)
            }
            AppCommand::ClearNotice => {
                self.notice = None;
                vec![AppEvent::NoticeCleared]
            }
        }
    }

    /// Rows that may be shown. `None` while loading or after a failed fetch,
    /// so stale rows are never presented as current.
    pub fn visible_records(&self) -> Option<Vec<&Record>> {
        match self.list_status {
            ListStatus::Ready => Some(self.records.iter().flatten().collect()),
            ListStatus::Loading | ListStatus::Failed(_) => None,
        }
    }

    pub fn pager(&self) -> Option<Pager> {
        match (&self.list_status, &self.page_info) {
            (ListStatus::Ready, Some(info)) => Some(Pager::from_page_info(info)),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.list_status == ListStatus::Loading
    }

    pub fn in_flight_fetch(&self) -> Option<FetchToken> {
        self.in_flight_fetch
    }

    pub fn pending_mutations(&self) -> usize {
        self.pending_mutations.len()
    }

    fn navigate_to(&mut self, target: ListQuery, force: bool) -> Vec<AppEvent> {
        let mut events = Vec::new();

        let location = query::location(&target);
        self.query = target;
        if location != self.location {
            self.location.clone_from(&location);
            events.push(AppEvent::LocationChanged(location));
        }

        let needs_fetch = force
            || self.fetched_query.as_ref() != Some(&self.query)
            || matches!(self.list_status, ListStatus::Failed(_));
        if needs_fetch {
            events.push(self.begin_fetch());
        }
        events
    }

    fn begin_fetch(&mut self) -> AppEvent {
        let token = FetchToken::new(self.issue_token());
        self.in_flight_fetch = Some(token);
        self.fetched_query = Some(self.query.clone());
        self.list_status = ListStatus::Loading;
        AppEvent::FetchRequested {
            token,
            query: self.query.clone(),
        }
    }

    fn finish_fetch(
        &mut self,
        token: FetchToken,
        outcome: Result<ListPage, String>,
    ) -> Vec<AppEvent> {
        if self.in_flight_fetch != Some(token) {
            return vec![AppEvent::StaleFetchIgnored(token)];
        }
        self.in_flight_fetch = None;

        match outcome {
            Ok(page) => {
                self.records = page.records;
                self.page_info = Some(page.page_info);
                self.list_status = ListStatus::Ready;
                let rows = self.records.iter().flatten().count();
                vec![AppEvent::ListLoaded { rows }]
            }
            Err(error) => {
                self.list_status = ListStatus::Failed(error.clone());
                vec![
                    AppEvent::ListFailed(error),
                    self.set_notice(Notice::error(FETCH_FAILED_MESSAGE)),
                ]
            }
        }
    }

    fn select(&mut self, key: CompanyNumber) -> Vec<AppEvent> {
        let found = self
            .records
            .iter()
            .flatten()
            .find(|record| record.has_key(&key))
            .map(FormDraft::select);

        match found {
            Some(draft) => {
                self.draft = draft;
                self.selection = Some(key.clone());
                vec![AppEvent::SelectionChanged(Some(key)), AppEvent::DraftChanged]
            }
            None => vec![self.set_notice(Notice::warning(&format!(
                "account {key} is not on this page"
            )))],
        }
    }

    fn submit_upsert(&mut self, kind: MutationKind) -> Vec<AppEvent> {
        let mut events = Vec::new();
        let outcome = match self.check_can_submit() {
            Err(message) => Err(message),
            Ok(()) => self.draft.validate().map_err(|error| error.to_string()),
        };

        match outcome {
            Ok(()) => {
                let record = self.draft.to_record();
                let request = match kind {
                    MutationKind::Update => MutationRequest::Update(record),
                    _ => MutationRequest::Create(record),
                };
                events.push(self.begin_mutation(request));
            }
            Err(message) => {
                events.push(AppEvent::MutationRejected(kind));
                events.push(self.set_notice(Notice::error(&message)));
                if kind == MutationKind::Update {
                    events.extend(self.close_confirm(ConfirmKind::Edit));
                }
            }
        }
        events
    }

    fn submit_delete(&mut self) -> Vec<AppEvent> {
        let key = match self.check_can_submit() {
            Err(message) => Err(message),
            Ok(()) => self
                .draft
                .key()
                .ok_or_else(|| DELETE_WITHOUT_KEY_MESSAGE.to_owned()),
        };

        match key {
            Ok(key) => vec![self.begin_mutation(MutationRequest::Delete(key))],
            Err(message) => vec![
                AppEvent::MutationRejected(MutationKind::Delete),
                self.set_notice(Notice::error(&message)),
            ],
        }
    }

    fn check_can_submit(&self) -> Result<(), String> {
        if self.mutation_policy == MutationPolicy::Exclusive && !self.pending_mutations.is_empty()
        {
            return Err(MUTATION_BUSY_MESSAGE.to_owned());
        }
        Ok(())
    }

    fn begin_mutation(&mut self, request: MutationRequest) -> AppEvent {
        let token = MutationToken::new(self.issue_token());
        self.pending_mutations.insert(token, request.clone());
        AppEvent::MutationRequested { token, request }
    }

    fn finish_mutation(
        &mut self,
        token: MutationToken,
        outcome: Result<(), String>,
    ) -> Vec<AppEvent> {
        let Some(request) = self.pending_mutations.remove(&token) else {
            return vec![AppEvent::UnknownMutationIgnored(token)];
        };
        let kind = request.kind();
        let mut events = Vec::new();

        match outcome {
            Ok(()) => {
                if self.apply_optimistic(request) {
                    events.push(AppEvent::ListPatched(kind));
                }
                events.push(self.set_notice(Notice::success(kind.success_message())));
                match kind {
                    MutationKind::Update => events.extend(self.close_confirm(ConfirmKind::Edit)),
                    MutationKind::Delete => events.extend(self.close_confirm(ConfirmKind::Delete)),
                    MutationKind::Create => {}
                }
            }
            Err(error) => {
                events.push(AppEvent::MutationFailed { kind, error });
                events.push(self.set_notice(Notice::error(kind.failure_message())));
                if kind == MutationKind::Update {
                    events.extend(self.close_confirm(ConfirmKind::Edit));
                }
            }
        }
        events
    }

    /// Returns whether a visible row changed. An update or delete whose key
    /// is not on the current page succeeds without touching the list.
    fn apply_optimistic(&mut self, request: MutationRequest) -> bool {
        match request {
            MutationRequest::Create(record) => {
                self.records.insert(0, Some(record));
                true
            }
            MutationRequest::Update(record) => {
                let mut replaced = false;
                for slot in self.records.iter_mut().flatten() {
                    if slot.company_number == record.company_number {
                        slot.clone_from(&record);
                        replaced = true;
                    }
                }
                replaced
            }
            MutationRequest::Delete(key) => {
                if self.selection.as_ref() == Some(&key) {
                    self.selection = None;
                }
                let before = self.records.len();
                self.records
                    .retain(|slot| !slot.as_ref().is_some_and(|record| record.has_key(&key)));
                self.records.len() != before
            }
        }
    }

    fn close_confirm(&mut self, kind: ConfirmKind) -> Option<AppEvent> {
        if self.confirm == Some(kind) {
            self.confirm = None;
            return Some(AppEvent::ConfirmClosed(kind));
        }
        None
    }

    fn set_notice(&mut self, notice: Notice) -> AppEvent {
        self.notice = Some(notice.clone());
        AppEvent::NoticeShown(notice)
    }

    fn issue_token(&mut self) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        token
    }
}
