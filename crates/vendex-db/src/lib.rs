// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};
use vendex_app::{
    CompanyNumber, CompanyType, CountryType, ListPage, ListQuery, PAGE_SIZE, Record,
    RecordService, page_window,
};

pub const APP_NAME: &str = "vendex";

/// Record columns in wire order. `company_number` is the key.
const ACCOUNT_COLUMNS: [&str; 24] = [
    "company_number",
    "abbreviated",
    "company_name",
    "representative",
    "responsible_for",
    "business_type",
    "items",
    "postal_code",
    "primary_address",
    "detailed_address",
    "phone_number",
    "fax_number",
    "homepage_url",
    "company_type",
    "country_type",
    "contract_period1",
    "contract_period2",
    "registration_information",
    "registration_date_time",
    "change_information",
    "change_date_time",
    "offices",
    "banking_information",
    "account_number",
];

const REQUIRED_INDEXES: &[(&str, &str)] = &[(
    "idx_accounts_company_name",
    "CREATE INDEX IF NOT EXISTS idx_accounts_company_name ON accounts (company_name)",
)];

const DEMO_STEMS: [&str; 12] = [
    "Hanbit", "Saerom", "Daehan", "Mirae", "Nuri", "Haneul", "Gaon", "Arum", "Doul", "Baekdu",
    "Sejong", "Areum",
];
const DEMO_INDUSTRIES: [&str; 8] = [
    "Logistics",
    "Electronics",
    "Textiles",
    "Foods",
    "Chemicals",
    "Precision",
    "Software",
    "Trading",
];
const DEMO_KOREAN_NAMES: [&str; 5] = [
    "(주)한빛물산",
    "새롬전자",
    "대한정밀공업",
    "누리소프트",
    "하늘무역",
];
const DEMO_PEOPLE: [&str; 6] = [
    "Kim Minjun",
    "Lee Seoyeon",
    "Park Jiho",
    "Choi Hayoon",
    "Jung Dohyun",
    "Kang Jiwoo",
];

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }

        ensure_required_indexes(&self.conn)?;
        Ok(())
    }

    pub fn count_accounts(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
            .context("count accounts")?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// One page of accounts, newest first. `b` and `c` filter by substring
    /// of the business number and company name. A page past the end yields
    /// the last page.
    pub fn list_accounts(&self, query: &ListQuery) -> Result<ListPage> {
        let business_number = query.business_number.as_deref();
        let company_name = query.company_name.as_deref();

        let total: i64 = self
            .conn
            .query_row(
                "
                SELECT COUNT(*)
                FROM accounts
                WHERE (?1 IS NULL OR instr(company_number, ?1) > 0)
                  AND (?2 IS NULL OR instr(COALESCE(company_name, ''), ?2) > 0)
                ",
                params![business_number, company_name],
                |row| row.get(0),
            )
            .context("count matching accounts")?;

        let page_info = page_window(
            query.effective_page(),
            u64::try_from(total).unwrap_or_default(),
        );
        let offset = i64::from(page_info.current_page_number - 1) * i64::from(PAGE_SIZE);

        let sql = format!(
            "
            SELECT {}
            FROM accounts
            WHERE (?1 IS NULL OR instr(company_number, ?1) > 0)
              AND (?2 IS NULL OR instr(COALESCE(company_name, ''), ?2) > 0)
            ORDER BY id DESC
            LIMIT ?3 OFFSET ?4
            ",
            ACCOUNT_COLUMNS.join(", ")
        );
        let mut stmt = self.conn.prepare(&sql).context("prepare account list")?;
        let rows = stmt
            .query_map(
                params![business_number, company_name, PAGE_SIZE, offset],
                account_from_row,
            )
            .context("query account list")?;
        let records = rows
            .map(|row| row.map(Some))
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("collect account list")?;

        debug!(
            rows = records.len(),
            total,
            page = page_info.current_page_number,
            "listed accounts"
        );
        Ok(ListPage { records, page_info })
    }

    pub fn get_account(&self, key: &CompanyNumber) -> Result<Option<Record>> {
        let sql = format!(
            "SELECT {} FROM accounts WHERE company_number = ?",
            ACCOUNT_COLUMNS.join(", ")
        );
        self.conn
            .query_row(&sql, params![key.as_str()], account_from_row)
            .optional()
            .with_context(|| format!("load account {key}"))
    }

    /// Stores a new account exactly as submitted.
    pub fn create_account(&self, record: &Record) -> Result<()> {
        let key = require_key(record)?;
        if self.get_account(&key)?.is_some() {
            bail!("account {key} already exists -- edit it instead of registering it again");
        }

        let mut stored = record.clone();
        stored.company_number = key.as_str().to_owned();

        let now = now_rfc3339()?;
        let placeholders = vec!["?"; ACCOUNT_COLUMNS.len() + 2].join(", ");
        let sql = format!(
            "INSERT INTO accounts ({}, created_at, updated_at) VALUES ({placeholders})",
            ACCOUNT_COLUMNS.join(", ")
        );
        let mut values: Vec<Option<String>> = account_values(&stored);
        values.push(Some(now.clone()));
        values.push(Some(now));

        self.conn
            .execute(&sql, params_from_iter(values))
            .with_context(|| format!("insert account {key}"))?;
        debug!(%key, "registered account");
        Ok(())
    }

    /// Overwrites every field of the account with the same key.
    pub fn update_account(&self, record: &Record) -> Result<()> {
        let key = require_key(record)?;

        let mut stored = record.clone();
        stored.company_number = key.as_str().to_owned();

        let assignments = ACCOUNT_COLUMNS[1..]
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE accounts SET {assignments}, updated_at = ? WHERE company_number = ?"
        );
        let mut values: Vec<Option<String>> = account_values(&stored).split_off(1);
        values.push(Some(now_rfc3339()?));
        values.push(Some(key.as_str().to_owned()));

        let changed = self
            .conn
            .execute(&sql, params_from_iter(values))
            .with_context(|| format!("update account {key}"))?;
        if changed == 0 {
            bail!("account {key} not found -- refresh the list and retry");
        }
        debug!(%key, "updated account");
        Ok(())
    }

    pub fn delete_account(&self, key: &CompanyNumber) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM accounts WHERE company_number = ?",
                params![key.as_str()],
            )
            .with_context(|| format!("delete account {key}"))?;
        if changed == 0 {
            bail!("account {key} not found -- refresh the list and retry");
        }
        debug!(%key, "deleted account");
        Ok(())
    }

    /// Inserts `count` deterministic sample accounts, skipping keys that
    /// already exist. Returns the number inserted.
    pub fn seed_demo_accounts(&self, count: usize) -> Result<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin demo seed")?;
        let now = now_rfc3339()?;
        let placeholders = vec!["?"; ACCOUNT_COLUMNS.len() + 2].join(", ");
        let sql = format!(
            "INSERT OR IGNORE INTO accounts ({}, created_at, updated_at) VALUES ({placeholders})",
            ACCOUNT_COLUMNS.join(", ")
        );

        let mut inserted = 0;
        for index in 0..count {
            let mut values = account_values(&demo_account(index));
            values.push(Some(now.clone()));
            values.push(Some(now.clone()));
            inserted += tx
                .execute(&sql, params_from_iter(values))
                .with_context(|| format!("insert demo account {index}"))?;
        }
        tx.commit().context("commit demo seed")?;

        info!(inserted, "seeded demo accounts");
        Ok(inserted)
    }
}

impl RecordService for Store {
    fn list(&mut self, query: &ListQuery) -> Result<ListPage> {
        self.list_accounts(query)
    }

    fn create(&mut self, record: &Record) -> Result<()> {
        self.create_account(record)
    }

    fn update(&mut self, record: &Record) -> Result<()> {
        self.update_account(record)
    }

    fn delete(&mut self, key: &CompanyNumber) -> Result<()> {
        self.delete_account(key)
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("VENDEX_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set VENDEX_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("vendex.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn require_key(record: &Record) -> Result<CompanyNumber> {
    CompanyNumber::parse(&record.company_number).ok_or_else(|| {
        anyhow!("business number is required -- enter a business number and retry")
    })
}

fn account_values(record: &Record) -> Vec<Option<String>> {
    vec![
        Some(record.company_number.clone()),
        record.abbreviated.clone(),
        record.company_name.clone(),
        record.representative.clone(),
        record.responsible_for.clone(),
        record.business_type.clone(),
        record.items.clone(),
        record.postal_code.clone(),
        record.primary_address.clone(),
        record.detailed_address.clone(),
        record.phone_number.clone(),
        record.fax_number.clone(),
        record.homepage_url.clone(),
        record.company_type.clone(),
        record.country_type.clone(),
        record.contract_period1.clone(),
        record.contract_period2.clone(),
        record.registration_information.clone(),
        record.registration_date_time.clone(),
        record.change_information.clone(),
        record.change_date_time.clone(),
        record.offices.clone(),
        record.banking_information.clone(),
        record.account_number.clone(),
    ]
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        company_number: row.get(0)?,
        abbreviated: row.get(1)?,
        company_name: row.get(2)?,
        representative: row.get(3)?,
        responsible_for: row.get(4)?,
        business_type: row.get(5)?,
        items: row.get(6)?,
        postal_code: row.get(7)?,
        primary_address: row.get(8)?,
        detailed_address: row.get(9)?,
        phone_number: row.get(10)?,
        fax_number: row.get(11)?,
        homepage_url: row.get(12)?,
        company_type: row.get(13)?,
        country_type: row.get(14)?,
        contract_period1: row.get(15)?,
        contract_period2: row.get(16)?,
        registration_information: row.get(17)?,
        registration_date_time: row.get(18)?,
        change_information: row.get(19)?,
        change_date_time: row.get(20)?,
        offices: row.get(21)?,
        banking_information: row.get(22)?,
        account_number: row.get(23)?,
    })
}

fn demo_account(index: usize) -> Record {
    let stem = DEMO_STEMS[index % DEMO_STEMS.len()];
    let industry = DEMO_INDUSTRIES[(index / DEMO_STEMS.len()) % DEMO_INDUSTRIES.len()];
    let company_name = if index % 7 == 3 {
        DEMO_KOREAN_NAMES[index % DEMO_KOREAN_NAMES.len()].to_owned()
    } else {
        format!("{stem} {industry} Co., Ltd.")
    };
    let company_type = if index % 3 == 0 {
        CompanyType::Individual
    } else {
        CompanyType::Corporate
    };
    let country_type = if index % 5 == 4 {
        CountryType::Overseas
    } else {
        CountryType::Domestic
    };
    let serial = index + 1;

    Record {
        company_number: format!("{:03}-{:02}-{serial:05}", 100 + (index * 37) % 900, 10 + index % 90),
        abbreviated: Some(stem.to_owned()),
        company_name: Some(company_name),
        representative: Some(DEMO_PEOPLE[index % DEMO_PEOPLE.len()].to_owned()),
        responsible_for: Some(DEMO_PEOPLE[(index + 2) % DEMO_PEOPLE.len()].to_owned()),
        business_type: Some("Wholesale".to_owned()),
        items: Some(industry.to_owned()),
        postal_code: Some(format!("{:05}", 6_000 + serial)),
        primary_address: Some(format!("{} Teheran-ro, Gangnam-gu, Seoul", 100 + serial)),
        detailed_address: Some(format!("Suite {}", 200 + serial)),
        phone_number: Some(format!("02-555-{:04}", serial % 10_000)),
        fax_number: Some(format!("02-556-{:04}", serial % 10_000)),
        homepage_url: Some(format!("https://www.{}.example", stem.to_lowercase())),
        company_type: Some(company_type.as_str().to_owned()),
        country_type: Some(country_type.as_str().to_owned()),
        contract_period1: Some("2026-01-01".to_owned()),
        contract_period2: Some("2026-12-31".to_owned()),
        registration_information: Some("demo".to_owned()),
        registration_date_time: Some("2026-01-02 09:00:00".to_owned()),
        change_information: None,
        change_date_time: None,
        offices: Some(format!("{} offices", 1 + index % 4)),
        banking_information: Some("Kookmin Bank".to_owned()),
        account_number: Some(format!("123-{serial:06}-01-001")),
    }
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    if !table_exists(conn, "accounts")? {
        bail!(
            "database is missing required table `accounts`; use a vendex database or point [storage].db_path elsewhere"
        );
    }

    let columns = table_columns(conn, "accounts")?;
    let missing: Vec<&str> = ACCOUNT_COLUMNS
        .iter()
        .copied()
        .chain(["id", "created_at", "updated_at"])
        .filter(|column| !columns.contains(*column))
        .collect();

    if !missing.is_empty() {
        bail!(
            "table `accounts` is missing required columns: {}; migrate the database before launching",
            missing.join(", ")
        );
    }
    Ok(())
}

fn ensure_required_indexes(conn: &Connection) -> Result<()> {
    for (name, create_sql) in REQUIRED_INDEXES {
        conn.execute_batch(create_sql)
            .with_context(|| format!("ensure required index `{name}`"))?;
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}
