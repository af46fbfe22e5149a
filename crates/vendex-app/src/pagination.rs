// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::num::NonZeroU32;

use crate::model::PageInfo;
use crate::query::ListQuery;

/// Rows per listed page.
pub const PAGE_SIZE: u32 = 10;
/// Page buttons per strip.
pub const PAGE_WINDOW: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub number: NonZeroU32,
    pub active: bool,
}

/// Render model for the page strip. Only page numbers the service named are
/// ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pager {
    pub buttons: Vec<PageButton>,
    pub prev: Option<NonZeroU32>,
    pub next: Option<NonZeroU32>,
}

impl Pager {
    pub fn from_page_info(info: &PageInfo) -> Self {
        let buttons = (info.start_page_number..=info.end_page_number)
            .filter_map(NonZeroU32::new)
            .map(|number| PageButton {
                number,
                active: number.get() == info.current_page_number,
            })
            .collect();

        Self {
            buttons,
            prev: info.prev_target(),
            next: info.next_target(),
        }
    }

    pub fn active(&self) -> Option<NonZeroU32> {
        self.buttons
            .iter()
            .find(|button| button.active)
            .map(|button| button.number)
    }

    /// Navigation target for `page`, keeping every filter of `current`.
    pub fn target(current: &ListQuery, page: NonZeroU32) -> ListQuery {
        current.with_page(page)
    }

    pub fn prev_query(&self, current: &ListQuery) -> Option<ListQuery> {
        self.prev.map(|page| Self::target(current, page))
    }

    pub fn next_query(&self, current: &ListQuery) -> Option<ListQuery> {
        self.next.map(|page| Self::target(current, page))
    }
}

/// Number of the last page for `total_rows` rows. An empty listing still has
/// one (empty) page.
pub fn last_page(total_rows: u64) -> u32 {
    let pages = total_rows.div_ceil(u64::from(PAGE_SIZE)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Server-side page metadata: `requested` is clamped to the last page and the
/// strip is the aligned block of [`PAGE_WINDOW`] pages containing it.
pub fn page_window(requested: NonZeroU32, total_rows: u64) -> PageInfo {
    let last = last_page(total_rows);
    let current = requested.get().min(last);
    let start = (current - 1) / PAGE_WINDOW * PAGE_WINDOW + 1;
    let end = start.saturating_add(PAGE_WINDOW - 1).min(last);

    PageInfo {
        current_page_number: current,
        start_page_number: start,
        end_page_number: end,
        prev_page_number: (start > 1).then(|| start - 1),
        next_page_number: (end < last).then(|| end + 1),
    }
}
