// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

use crate::ids::CompanyNumber;

pub const LIST_LABEL_MAX_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompanyType {
    #[default]
    Corporate,
    Individual,
}

impl CompanyType {
    pub const ALL: [Self; 2] = [Self::Corporate, Self::Individual];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Corporate => "법인",
            Self::Individual => "개인",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "법인" => Some(Self::Corporate),
            "개인" => Some(Self::Individual),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Corporate => "corporate",
            Self::Individual => "individual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountryType {
    #[default]
    Domestic,
    Overseas,
}

impl CountryType {
    pub const ALL: [Self; 2] = [Self::Domestic, Self::Overseas];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domestic => "국내",
            Self::Overseas => "해외",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "국내" => Some(Self::Domestic),
            "해외" => Some(Self::Overseas),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Domestic => "domestic",
            Self::Overseas => "overseas",
        }
    }
}

/// One business partner as the record-storage service stores it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default)]
    pub company_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representative: Option<String>,
    #[serde(
        rename = "responsiblefor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub responsible_for: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax_number: Option<String>,
    #[serde(rename = "homepageurl", default, skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_period1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_period2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offices: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banking_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
}

impl Record {
    pub fn key(&self) -> Option<CompanyNumber> {
        CompanyNumber::parse(&self.company_number)
    }

    pub fn has_key(&self, key: &CompanyNumber) -> bool {
        self.company_number == key.as_str()
    }

    pub fn list_label(&self) -> String {
        truncate_label(
            self.company_name.as_deref().unwrap_or_default(),
            LIST_LABEL_MAX_CHARS,
        )
    }
}

/// A list entry; the service may return `null` placeholders.
pub type RecordSlot = Option<Record>;

pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Pagination window as computed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page_number: u32,
    pub start_page_number: u32,
    pub end_page_number: u32,
    #[serde(default)]
    pub prev_page_number: Option<u32>,
    #[serde(default)]
    pub next_page_number: Option<u32>,
}

impl PageInfo {
    pub fn prev_target(&self) -> Option<NonZeroU32> {
        self.prev_page_number.and_then(NonZeroU32::new)
    }

    pub fn next_target(&self) -> Option<NonZeroU32> {
        self.next_page_number.and_then(NonZeroU32::new)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    #[serde(rename = "accountList", default)]
    pub records: Vec<RecordSlot>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Create => "account registered",
            Self::Update => "account updated",
            Self::Delete => "account deleted",
        }
    }

    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Create => "could not register account -- check the fields and retry",
            Self::Update => "could not update account -- retry",
            Self::Delete => "could not delete account -- retry",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.to_owned(),
        }
    }

    pub fn warning(message: &str) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.to_owned(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.to_owned(),
        }
    }
}
