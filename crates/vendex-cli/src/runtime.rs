// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use std::io::{BufRead, Write};
use std::num::NonZeroU32;
use vendex_app::{
    AddressLookupResult, AppCommand, AppEvent, AppState, CompanyNumber, CompanyType,
    ConfirmKind, CountryType, FormField, ListStatus, Notice, NoticeLevel, RecordService, Session,
};

const PROMPT: &str = "vendex> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Open(String),
    Search {
        business_number: String,
        company_name: String,
    },
    Page(NonZeroU32),
    Prev,
    Next,
    Refresh,
    List,
    Select(CompanyNumber),
    Show,
    Set(FormField, String),
    Type(CompanyType),
    Country(CountryType),
    Reset,
    Address(AddressLookupResult),
    Create,
    Edit,
    Delete,
    Yes,
    No,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    Continue,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ShellCommand> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "open" => ShellCommand::Open(if rest.is_empty() { "/" } else { rest }.to_owned()),
        "search" => {
            let (business_number, company_name) = match rest.split_once(char::is_whitespace) {
                Some((number, name)) => (number, name.trim()),
                None => (rest, ""),
            };
            ShellCommand::Search {
                business_number: blank_dash(business_number),
                company_name: blank_dash(company_name),
            }
        }
        "page" => {
            let number = rest
                .parse::<u32>()
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or_else(|| anyhow!("page needs a page number of 1 or more, got {rest:?}"))?;
            ShellCommand::Page(number)
        }
        "prev" => ShellCommand::Prev,
        "next" => ShellCommand::Next,
        "refresh" => ShellCommand::Refresh,
        "list" | "ls" => ShellCommand::List,
        "select" => ShellCommand::Select(
            CompanyNumber::parse(rest)
                .ok_or_else(|| anyhow!("select needs a business number from the list"))?,
        ),
        "show" => ShellCommand::Show,
        "set" => {
            let (name, value) = match rest.split_once(char::is_whitespace) {
                Some((name, value)) => (name, value.trim()),
                None => (rest, ""),
            };
            let field = FormField::parse(name).ok_or_else(|| {
                anyhow!("unknown field {name:?} -- run `show` to list the field names")
            })?;
            ShellCommand::Set(field, value.to_owned())
        }
        "type" => ShellCommand::Type(parse_company_type(rest)?),
        "country" => ShellCommand::Country(parse_country_type(rest)?),
        "reset" => ShellCommand::Reset,
        "address" => {
            let result: AddressLookupResult = serde_json::from_str(rest).with_context(|| {
                "address needs the lookup result as JSON, for example {\"zonecode\":\"06234\",\"userSelectedType\":\"J\",\"jibunAddress\":\"...\"}"
            })?;
            ShellCommand::Address(result)
        }
        "create" => ShellCommand::Create,
        "edit" => ShellCommand::Edit,
        "delete" => ShellCommand::Delete,
        "yes" | "y" => ShellCommand::Yes,
        "no" | "n" => ShellCommand::No,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        unknown => bail!("unknown command {unknown:?} -- type `help` to see the commands"),
    };
    Ok(command)
}

/// Line-oriented front end over a [`Session`].
pub struct Shell<S, W> {
    session: Session<S>,
    out: W,
}

impl<S: RecordService, W: Write> Shell<S, W> {
    pub fn new(session: Session<S>, out: W) -> Self {
        Self { session, out }
    }

    pub fn state(&self) -> &AppState {
        self.session.state()
    }

    pub fn into_parts(self) -> (Session<S>, W) {
        (self.session, self.out)
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(self.out)?;
                return Ok(());
            };
            let line = line.context("read command")?;
            if self.execute(&line)? == ShellAction::Quit {
                return Ok(());
            }
        }
    }

    pub fn execute(&mut self, line: &str) -> Result<ShellAction> {
        if line.trim().is_empty() {
            return Ok(ShellAction::Continue);
        }
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(error) => {
                writeln!(self.out, "error: {error:#}")?;
                return Ok(ShellAction::Continue);
            }
        };

        let app_command = match command {
            ShellCommand::Open(location) => AppCommand::Navigate(location),
            ShellCommand::Search {
                business_number,
                company_name,
            } => AppCommand::Search {
                business_number,
                company_name,
            },
            ShellCommand::Page(number) => AppCommand::GoToPage(number),
            ShellCommand::Prev => AppCommand::PrevPage,
            ShellCommand::Next => AppCommand::NextPage,
            ShellCommand::Refresh => AppCommand::Refresh,
            ShellCommand::Select(key) => AppCommand::SelectRecord(key),
            ShellCommand::Set(field, value) => AppCommand::EditField(field, value),
            ShellCommand::Type(kind) => AppCommand::SetCompanyType(kind),
            ShellCommand::Country(kind) => AppCommand::SetCountryType(kind),
            ShellCommand::Reset => AppCommand::ResetForm,
            ShellCommand::Address(result) => AppCommand::ApplyAddress(result),
            ShellCommand::Create => AppCommand::SubmitCreate,
            ShellCommand::Edit => AppCommand::OpenConfirm(ConfirmKind::Edit),
            ShellCommand::Delete => AppCommand::OpenConfirm(ConfirmKind::Delete),
            ShellCommand::Yes => match self.session.state().confirm {
                Some(ConfirmKind::Edit) => AppCommand::SubmitUpdate,
                Some(ConfirmKind::Delete) => AppCommand::SubmitDelete,
                None => {
                    writeln!(self.out, "nothing to confirm")?;
                    return Ok(ShellAction::Continue);
                }
            },
            ShellCommand::No => AppCommand::CancelConfirm,
            ShellCommand::List => {
                self.render_list()?;
                return Ok(ShellAction::Continue);
            }
            ShellCommand::Show => {
                self.render_draft()?;
                return Ok(ShellAction::Continue);
            }
            ShellCommand::Help => {
                self.render_help()?;
                return Ok(ShellAction::Continue);
            }
            ShellCommand::Quit => return Ok(ShellAction::Quit),
        };

        self.execute_command(app_command)?;
        Ok(ShellAction::Continue)
    }

    /// Runs one controller command and prints what changed.
    pub fn execute_command(&mut self, command: AppCommand) -> Result<()> {
        let events = self.session.run(command);
        self.render_events(&events)
    }

    fn render_events(&mut self, events: &[AppEvent]) -> Result<()> {
        for event in events {
            match event {
                AppEvent::LocationChanged(location) => writeln!(self.out, "at {location}")?,
                AppEvent::ListLoaded { .. } => self.render_list()?,
                AppEvent::SelectionChanged(Some(key)) => writeln!(self.out, "selected {key}")?,
                AppEvent::ConfirmOpened(kind) => self.render_confirm(*kind)?,
                AppEvent::ConfirmClosed(_) => writeln!(self.out, "confirmation closed")?,
                AppEvent::NoticeShown(notice) => self.render_notice(notice)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn render_list(&mut self) -> Result<()> {
        let state = self.session.state();
        let Some(records) = state.visible_records() else {
            let message = match &state.list_status {
                ListStatus::Failed(_) => "accounts unavailable -- run `refresh` to retry",
                ListStatus::Loading | ListStatus::Ready => "loading...",
            };
            writeln!(self.out, "{message}")?;
            return Ok(());
        };

        if records.is_empty() {
            writeln!(self.out, "no accounts")?;
        }
        for record in &records {
            let marker = if state
                .selection
                .as_ref()
                .is_some_and(|key| record.has_key(key))
            {
                '*'
            } else {
                ' '
            };
            writeln!(
                self.out,
                "{marker} {:<16} {}",
                record.company_number,
                record.list_label()
            )?;
        }

        if let Some(pager) = state.pager() {
            let mut strip = Vec::with_capacity(pager.buttons.len() + 2);
            if let Some(prev) = pager.prev {
                strip.push(format!("< {prev}"));
            }
            for button in &pager.buttons {
                if button.active {
                    strip.push(format!("[{}]", button.number));
                } else {
                    strip.push(button.number.to_string());
                }
            }
            if let Some(next) = pager.next {
                strip.push(format!("{next} >"));
            }
            writeln!(self.out, "pages: {}", strip.join(" "))?;
        }
        Ok(())
    }

    fn render_draft(&mut self) -> Result<()> {
        let state = self.session.state();
        let draft = &state.draft;
        for field in FormField::ALL {
            writeln!(
                self.out,
                "{:<22} {:<16} {}",
                field.as_str(),
                field.label(),
                draft.get(field)
            )?;
        }
        writeln!(
            self.out,
            "{:<22} {:<16} {}",
            "companyType",
            "company type",
            draft.company_type.as_str()
        )?;
        writeln!(
            self.out,
            "{:<22} {:<16} {}",
            "countryType",
            "country",
            draft.country_type.as_str()
        )?;
        Ok(())
    }

    fn render_confirm(&mut self, kind: ConfirmKind) -> Result<()> {
        let key = self.session.state().draft.company_number.clone();
        let action = match kind {
            ConfirmKind::Edit => "update",
            ConfirmKind::Delete => "delete",
        };
        writeln!(self.out, "{action} account {key:?}? type `yes` or `no`")?;
        Ok(())
    }

    fn render_notice(&mut self, notice: &Notice) -> Result<()> {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        writeln!(self.out, "{tag}: {}", notice.message)?;
        Ok(())
    }

    fn render_help(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "\
open [location]            go to a location such as /?p=2&c=Acme
search <number|-> [name]   search by business number and company name
page <n>, prev, next       move between pages
refresh                    reload the current page
list                       show the current page
select <number>            load an account into the form
show                       show the form
set <field> <value>        change a form field (names from `show`)
type <법인|개인>            set the company type
country <국내|해외>         set the country type
address <json>             fill the address from a lookup result
reset                      clear the form and the selection
create                     register the form as a new account
edit, delete               update or delete the form's account (asks first)
yes, no                    answer a pending confirmation
quit                       leave"
        )?;
        Ok(())
    }
}

fn blank_dash(value: &str) -> String {
    if value == "-" {
        String::new()
    } else {
        value.to_owned()
    }
}

fn parse_company_type(value: &str) -> Result<CompanyType> {
    CompanyType::ALL
        .into_iter()
        .find(|kind| kind.as_str() == value || kind.label().eq_ignore_ascii_case(value))
        .ok_or_else(|| anyhow!("company type must be 법인 (corporate) or 개인 (individual)"))
}

fn parse_country_type(value: &str) -> Result<CountryType> {
    CountryType::ALL
        .into_iter()
        .find(|kind| kind.as_str() == value || kind.label().eq_ignore_ascii_case(value))
        .ok_or_else(|| anyhow!("country type must be 국내 (domestic) or 해외 (overseas)"))
}
