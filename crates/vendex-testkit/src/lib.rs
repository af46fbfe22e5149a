// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use std::num::NonZeroU32;
use std::path::PathBuf;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, Time};
use vendex_app::{
    CompanyNumber, CompanyType, CountryType, ListPage, ListQuery, PAGE_SIZE, Record,
    RecordService, page_window,
};

const REFERENCE_YEAR: i32 = 2026;

const NAME_STEMS: [&str; 14] = [
    "Hanbit", "Saerom", "Daehan", "Mirae", "Seoul", "Nuri", "Haneul", "Gaon", "Arum", "Doul",
    "Baekdu", "Hanul", "Sejong", "Areum",
];

const INDUSTRIES: [&str; 10] = [
    "Logistics",
    "Electronics",
    "Textiles",
    "Foods",
    "Chemicals",
    "Precision",
    "Software",
    "Steel",
    "Pharma",
    "Trading",
];

const LEGAL_SUFFIXES: [&str; 4] = ["Co., Ltd.", "Corp.", "Inc.", "Industries"];

const KOREAN_NAMES: [&str; 8] = [
    "(주)한빛물산",
    "새롬전자",
    "대한정밀공업",
    "미래식품",
    "누리소프트",
    "하늘무역",
    "가온화학",
    "아름섬유",
];

const SURNAMES: [&str; 10] = [
    "Kim", "Lee", "Park", "Choi", "Jung", "Kang", "Cho", "Yoon", "Jang", "Lim",
];
const GIVEN_NAMES: [&str; 12] = [
    "Minjun", "Seoyeon", "Jiho", "Hayoon", "Dohyun", "Jiwoo", "Eunwoo", "Sua", "Yejun",
    "Jimin", "Siwoo", "Chaewon",
];

const ROADS: [&str; 10] = [
    "Teheran-ro",
    "Sejong-daero",
    "Gangnam-daero",
    "Olympic-ro",
    "Hangang-daero",
    "Eulji-ro",
    "Jong-ro",
    "Dosan-daero",
    "Yeoksam-ro",
    "Banpo-daero",
];
const DISTRICTS: [&str; 8] = [
    "Gangnam-gu",
    "Jung-gu",
    "Mapo-gu",
    "Songpa-gu",
    "Jongno-gu",
    "Seocho-gu",
    "Yeongdeungpo-gu",
    "Guro-gu",
];
const BANKS: [&str; 6] = [
    "Kookmin Bank",
    "Shinhan Bank",
    "Woori Bank",
    "Hana Bank",
    "NongHyup Bank",
    "Industrial Bank of Korea",
];
const RESPONSIBILITIES: [&str; 6] = [
    "purchasing",
    "accounting",
    "sales",
    "logistics",
    "quality",
    "legal",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Deterministic generator of partner accounts. The same seed always yields
/// the same sequence.
#[derive(Debug, Clone)]
pub struct AccountFaker {
    rng: DeterministicRng,
    issued: u32,
}

impl AccountFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            issued: 0,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    /// A business-registration number in the `NNN-NN-NNNNN` layout. Numbers
    /// issued by one faker never repeat.
    pub fn company_number(&mut self) -> String {
        self.issued += 1;
        format!(
            "{:03}-{:02}-{:05}",
            self.int_range(100, 999),
            self.int_range(10, 99),
            self.issued,
        )
    }

    pub fn company_name(&mut self) -> String {
        if self.rng.int_n(4) == 0 {
            return self.pick(&KOREAN_NAMES).to_owned();
        }
        format!(
            "{} {} {}",
            self.pick(&NAME_STEMS),
            self.pick(&INDUSTRIES),
            self.pick(&LEGAL_SUFFIXES),
        )
    }

    pub fn person(&mut self) -> String {
        format!("{} {}", self.pick(&SURNAMES), self.pick(&GIVEN_NAMES))
    }

    /// A fully populated record, as the service returns it.
    pub fn account(&mut self) -> Record {
        let company_name = self.company_name();
        let abbreviated: String = company_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_owned();
        let company_type = if self.rng.bool() {
            CompanyType::Corporate
        } else {
            CompanyType::Individual
        };
        let country_type = if self.rng.int_n(5) == 0 {
            CountryType::Overseas
        } else {
            CountryType::Domestic
        };
        let industry = self.pick(&INDUSTRIES);
        let registered = self.datetime_in_year(REFERENCE_YEAR - 1);
        let changed = registered + Duration::days(self.int_range(1, 180).into());
        let contract_start = registered.date();
        let contract_end = contract_start + Duration::days(365);

        Record {
            company_number: self.company_number(),
            abbreviated: Some(abbreviated.clone()),
            company_name: Some(company_name),
            representative: Some(self.person()),
            responsible_for: Some(format!(
                "{} ({})",
                self.person(),
                self.pick(&RESPONSIBILITIES)
            )),
            business_type: Some("Manufacturing".to_owned()),
            items: Some(industry.to_owned()),
            postal_code: Some(format!("{:05}", self.int_range(1_000, 63_999))),
            primary_address: Some(format!(
                "{} {}, {}, Seoul",
                self.int_range(1, 999),
                self.pick(&ROADS),
                self.pick(&DISTRICTS),
            )),
            detailed_address: Some(format!("Suite {}", self.int_range(101, 2_099))),
            phone_number: Some(self.phone()),
            fax_number: Some(self.phone()),
            homepage_url: Some(format!(
                "https://www.{}.example",
                abbreviated.to_lowercase().replace(['(', ')'], "")
            )),
            company_type: Some(company_type.as_str().to_owned()),
            country_type: Some(country_type.as_str().to_owned()),
            contract_period1: Some(contract_start.to_string()),
            contract_period2: Some(contract_end.to_string()),
            registration_information: Some(format!("registered by {}", self.person())),
            registration_date_time: Some(format_timestamp(registered)),
            change_information: Some(format!("updated by {}", self.person())),
            change_date_time: Some(format_timestamp(changed)),
            offices: Some(format!("{} offices", self.int_range(1, 12))),
            banking_information: Some(self.pick(&BANKS).to_owned()),
            account_number: Some(format!(
                "{:03}-{:06}-{:02}-{:03}",
                self.int_range(100, 999),
                self.int_range(0, 999_999),
                self.int_range(10, 99),
                self.int_range(0, 999),
            )),
        }
    }

    /// A record carrying only the key and a name, as a sparse list row.
    pub fn sparse_account(&mut self) -> Record {
        Record {
            company_number: self.company_number(),
            company_name: Some(self.company_name()),
            ..Record::default()
        }
    }

    pub fn accounts(&mut self, count: usize) -> Vec<Record> {
        (0..count).map(|_| self.account()).collect()
    }

    pub fn datetime_in_year(&mut self, year: i32) -> OffsetDateTime {
        let start = midnight_utc(year, Month::January, 1);
        let end =
            midnight_utc(year, Month::December, 31) + Duration::days(1) - Duration::seconds(1);
        let span = (end.unix_timestamp() - start.unix_timestamp()) as u64;
        let offset = self.rng.next_u64() % (span + 1);
        start + Duration::seconds(offset as i64)
    }

    fn phone(&mut self) -> String {
        format!(
            "02-{:04}-{:04}",
            self.int_range(2_000, 9_999),
            self.int_range(0, 9_999)
        )
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = i64::from(max) - i64::from(min) + 1;
        let offset = (self.rng.next_u64() % (span as u64)) as i64;
        (i64::from(min) + offset) as i32
    }
}

/// One call observed by [`FakeService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    List(ListQuery),
    Create(Record),
    Update(Record),
    Delete(CompanyNumber),
}

/// In-memory record service with the listing contract of the real one:
/// substring filters, newest first, ten rows per page.
#[derive(Debug, Clone, Default)]
pub struct FakeService {
    pub records: Vec<Record>,
    pub calls: Vec<ServiceCall>,
    pub fail_list: bool,
    pub fail_mutations: bool,
}

impl FakeService {
    /// `records` are given oldest first, the order they were registered in.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn mutation_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| !matches!(call, ServiceCall::List(_)))
            .count()
    }

    pub fn list_calls(&self) -> usize {
        self.calls.len() - self.mutation_calls()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.company_number == key)
    }
}

impl RecordService for FakeService {
    fn list(&mut self, query: &ListQuery) -> Result<ListPage> {
        self.calls.push(ServiceCall::List(query.clone()));
        if self.fail_list {
            bail!("service unavailable (503)");
        }

        let contains = |value: &str, needle: &Option<String>| {
            needle.as_deref().is_none_or(|needle| value.contains(needle))
        };
        let matching: Vec<&Record> = self
            .records
            .iter()
            .rev()
            .filter(|record| {
                contains(&record.company_number, &query.business_number)
                    && contains(
                        record.company_name.as_deref().unwrap_or_default(),
                        &query.company_name,
                    )
            })
            .collect();

        let page_info = page_window(query.effective_page(), matching.len() as u64);
        let offset = (page_info.current_page_number - 1) as usize * PAGE_SIZE as usize;
        let records = matching
            .into_iter()
            .skip(offset)
            .take(PAGE_SIZE as usize)
            .cloned()
            .map(Some)
            .collect();
        Ok(ListPage { records, page_info })
    }

    fn create(&mut self, record: &Record) -> Result<()> {
        self.calls.push(ServiceCall::Create(record.clone()));
        if self.fail_mutations {
            bail!("server error (500)");
        }
        if self.position(&record.company_number).is_some() {
            bail!("account {} already exists", record.company_number);
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn update(&mut self, record: &Record) -> Result<()> {
        self.calls.push(ServiceCall::Update(record.clone()));
        if self.fail_mutations {
            bail!("server error (500)");
        }
        let Some(index) = self.position(&record.company_number) else {
            bail!("account {} not found", record.company_number);
        };
        self.records[index] = record.clone();
        Ok(())
    }

    fn delete(&mut self, key: &CompanyNumber) -> Result<()> {
        self.calls.push(ServiceCall::Delete(key.clone()));
        if self.fail_mutations {
            bail!("server error (500)");
        }
        let Some(index) = self.position(key.as_str()) else {
            bail!("account {key} not found");
        };
        self.records.remove(index);
        Ok(())
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("vendex.db");
    Ok((dir, db_path))
}

pub fn fixture_datetime() -> &'static str {
    "2026-02-19 12:34:56"
}

pub fn page(number: u32) -> NonZeroU32 {
    NonZeroU32::new(number).unwrap_or(NonZeroU32::MIN)
}

fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    at.format(&format).unwrap_or_default()
}

fn midnight_utc(year: i32, month: Month, day: u8) -> OffsetDateTime {
    let date = Date::from_calendar_date(year, month, day).expect("valid calendar date");
    date.with_time(Time::MIDNIGHT).assume_utc()
}

#[cfg(test)]
mod tests {
    use super::{AccountFaker, FakeService, ServiceCall, page};
    use std::collections::BTreeSet;
    use vendex_app::{CompanyNumber, CompanyType, CountryType, ListQuery, RecordService};

    #[test]
    fn new_deterministic_seed() {
        let mut left = AccountFaker::new(42);
        let mut right = AccountFaker::new(42);
        assert_eq!(left.account(), right.account());
    }

    #[test]
    fn account_is_fully_populated() {
        let mut faker = AccountFaker::new(1);
        let account = faker.account();

        assert!(!account.company_number.is_empty());
        assert!(account.company_name.as_deref().is_some_and(|n| !n.is_empty()));
        assert!(account.registration_date_time.is_some());
        let company_type = account.company_type.as_deref().unwrap_or_default();
        assert!(CompanyType::parse(company_type).is_some());
        let country_type = account.country_type.as_deref().unwrap_or_default();
        assert!(CountryType::parse(country_type).is_some());
    }

    #[test]
    fn company_numbers_never_repeat() {
        let mut faker = AccountFaker::new(7);
        let keys: BTreeSet<String> = (0..200).map(|_| faker.company_number()).collect();
        assert_eq!(keys.len(), 200);
    }

    #[test]
    fn variety_across_seeds() {
        let names: BTreeSet<String> = (1_u64..=20)
            .map(|seed| AccountFaker::new(seed).company_name())
            .collect();
        assert!(names.len() > 5, "only {} distinct names", names.len());
    }

    #[test]
    fn int_n() {
        let mut faker = AccountFaker::new(9);
        for _ in 0..100 {
            assert!(faker.int_n(3) < 3);
        }
        assert_eq!(faker.int_n(0), 0);
    }

    #[test]
    fn fake_service_lists_newest_first_in_pages_of_ten() {
        let mut faker = AccountFaker::new(3);
        let records = faker.accounts(25);
        let newest = records[24].company_number.clone();
        let mut service = FakeService::with_records(records);

        let first = service.list(&ListQuery::default()).expect("list");
        assert_eq!(first.records.len(), 10);
        assert_eq!(
            first.records[0].as_ref().map(|r| r.company_number.clone()),
            Some(newest)
        );
        assert_eq!(first.page_info.end_page_number, 3);

        let last = service
            .list(&ListQuery::default().with_page(page(3)))
            .expect("list");
        assert_eq!(last.records.len(), 5);
        assert_eq!(service.list_calls(), 2);
    }

    #[test]
    fn fake_service_mutations_follow_key_rules() {
        let mut faker = AccountFaker::new(4);
        let record = faker.account();
        let key = CompanyNumber::parse(&record.company_number).expect("key");
        let mut service = FakeService::default();

        service.create(&record).expect("create");
        assert!(service.create(&record).is_err());
        service.update(&record).expect("update");
        service.delete(&key).expect("delete");
        assert!(service.delete(&key).is_err());
        assert_eq!(service.mutation_calls(), 5);
        assert!(matches!(service.calls[0], ServiceCall::Create(_)));
    }
}
