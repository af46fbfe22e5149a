// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::VecDeque;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::ids::CompanyNumber;
use crate::model::{ListPage, Record};
use crate::query::ListQuery;
use crate::state::{AppCommand, AppEvent, AppState, MutationPolicy, MutationRequest};

/// The record-storage service contract: one listing endpoint and three
/// mutations keyed by business number.
pub trait RecordService {
    fn list(&mut self, query: &ListQuery) -> Result<ListPage>;
    fn create(&mut self, record: &Record) -> Result<()>;
    fn update(&mut self, record: &Record) -> Result<()>;
    fn delete(&mut self, key: &CompanyNumber) -> Result<()>;
}

impl<S: RecordService + ?Sized> RecordService for Box<S> {
    fn list(&mut self, query: &ListQuery) -> Result<ListPage> {
        (**self).list(query)
    }

    fn create(&mut self, record: &Record) -> Result<()> {
        (**self).create(record)
    }

    fn update(&mut self, record: &Record) -> Result<()> {
        (**self).update(record)
    }

    fn delete(&mut self, key: &CompanyNumber) -> Result<()> {
        (**self).delete(key)
    }
}

/// Drives an [`AppState`] against a blocking service. Every request the
/// state emits is executed before `run` returns.
pub struct Session<S> {
    state: AppState,
    service: S,
}

impl<S: RecordService> Session<S> {
    pub fn new(service: S, policy: MutationPolicy) -> Self {
        Self {
            state: AppState::with_policy(policy),
            service,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    pub fn into_service(self) -> S {
        self.service
    }

    /// Dispatches `command` and every completion it triggers, returning the
    /// events in the order they were produced.
    pub fn run(&mut self, command: AppCommand) -> Vec<AppEvent> {
        let mut queue = VecDeque::from([command]);
        let mut trail = Vec::new();

        while let Some(next) = queue.pop_front() {
            let events = self.state.dispatch(next);
            for event in &events {
                if let Some(completion) = self.perform(event) {
                    queue.push_back(completion);
                }
            }
            trail.extend(events);
        }
        trail
    }

    fn perform(&mut self, event: &AppEvent) -> Option<AppCommand> {
        match event {
            AppEvent::FetchRequested { token, query } => {
                debug!(token = token.get(), ?query, "fetching account list");
                let outcome = self.service.list(query).map_err(|error| {
                    let message = format!("{error:#}");
                    warn!(token = token.get(), error = %message, "account list fetch failed");
                    message
                });
                Some(AppCommand::FetchCompleted {
                    token: *token,
                    outcome,
                })
            }
            AppEvent::MutationRequested { token, request } => {
                let kind = request.kind();
                let result = match request {
                    MutationRequest::Create(record) => self.service.create(record),
                    MutationRequest::Update(record) => self.service.update(record),
                    MutationRequest::Delete(key) => self.service.delete(key),
                };
                let outcome = match result {
                    Ok(()) => {
                        info!(token = token.get(), kind = kind.label(), "account change applied");
                        Ok(())
                    }
                    Err(error) => {
                        let message = format!("{error:#}");
                        warn!(
                            token = token.get(),
                            kind = kind.label(),
                            error = %message,
                            "account change failed"
                        );
                        Err(message)
                    }
                };
                Some(AppCommand::MutationCompleted {
                    token: *token,
                    outcome,
                })
            }
            _ => None,
        }
    }
}
