// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Mapping between [`ListQuery`] and the location query string.
//!
//! Keys are `p` (page), `b` (business number) and `c` (company name). Absent
//! fields are never written, and anything unparsable on the way back in is
//! treated as absent.

use std::num::NonZeroU32;
use url::form_urlencoded;

const PAGE_KEY: &str = "p";
const BUSINESS_NUMBER_KEY: &str = "b";
const COMPANY_NAME_KEY: &str = "c";

/// Navigation snapshot. Replaced wholesale on every navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub page: Option<NonZeroU32>,
    pub business_number: Option<String>,
    pub company_name: Option<String>,
}

impl ListQuery {
    /// A fresh search: page reset, empty inputs omitted.
    pub fn search(business_number: &str, company_name: &str) -> Self {
        Self {
            page: None,
            business_number: non_empty(business_number),
            company_name: non_empty(company_name),
        }
    }

    /// Same filters, different page.
    pub fn with_page(&self, page: NonZeroU32) -> Self {
        Self {
            page: Some(page),
            ..self.clone()
        }
    }

    pub fn effective_page(&self) -> NonZeroU32 {
        self.page.unwrap_or(NonZeroU32::MIN)
    }

    pub fn has_filters(&self) -> bool {
        self.business_number.is_some() || self.company_name.is_some()
    }
}

pub fn encode(query: &ListQuery) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if let Some(page) = query.page {
        serializer.append_pair(PAGE_KEY, &page.to_string());
    }
    if let Some(number) = query.business_number.as_deref().filter(|v| !v.is_empty()) {
        serializer.append_pair(BUSINESS_NUMBER_KEY, number);
    }
    if let Some(name) = query.company_name.as_deref().filter(|v| !v.is_empty()) {
        serializer.append_pair(COMPANY_NAME_KEY, name);
    }
    serializer.finish()
}

/// Address-bar form of the query, e.g. `/?p=2&b=123`.
pub fn location(query: &ListQuery) -> String {
    let encoded = encode(query);
    if encoded.is_empty() {
        "/".to_owned()
    } else {
        format!("/?{encoded}")
    }
}

pub fn decode(raw: &str) -> ListQuery {
    let query_part = match raw.split_once('?') {
        Some((_, rest)) => rest,
        None if raw.starts_with('/') => "",
        None => raw,
    };
    let query_part = query_part.split('#').next().unwrap_or_default();

    let mut decoded = ListQuery::default();
    let (mut seen_page, mut seen_number, mut seen_name) = (false, false, false);
    for (key, value) in form_urlencoded::parse(query_part.as_bytes()) {
        match key.as_ref() {
            PAGE_KEY if !seen_page => {
                seen_page = true;
                decoded.page = parse_page(&value);
            }
            BUSINESS_NUMBER_KEY if !seen_number => {
                seen_number = true;
                decoded.business_number = non_empty(&value);
            }
            COMPANY_NAME_KEY if !seen_name => {
                seen_name = true;
                decoded.company_name = non_empty(&value);
            }
            _ => {}
        }
    }
    decoded
}

fn parse_page(raw: &str) -> Option<NonZeroU32> {
    raw.trim().parse::<u32>().ok().and_then(NonZeroU32::new)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
