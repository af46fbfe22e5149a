// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use vendex_app::{CompanyNumber, ListQuery, Record, RecordService};
use vendex_db::{Store, validate_db_path};
use vendex_testkit::{AccountFaker, page, temp_db_path};

fn seeded(count: usize) -> Result<(Store, Vec<Record>)> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    let mut faker = AccountFaker::new(21);
    let records = faker.accounts(count);
    for record in &records {
        store.create_account(record)?;
    }
    Ok((store, records))
}

fn keys(records: &[Option<Record>]) -> Vec<String> {
    records
        .iter()
        .flatten()
        .map(|record| record.company_number.clone())
        .collect()
}

#[test]
fn validate_db_path_rejects_uri_forms() {
    assert!(validate_db_path("").is_err());
    assert!(validate_db_path("file:test.db").is_err());
    assert!(validate_db_path("https://example.com/db.sqlite").is_err());
    assert!(validate_db_path("db.sqlite?mode=ro").is_err());
    assert!(validate_db_path(":memory:").is_ok());
    assert!(validate_db_path("/tmp/vendex.db").is_ok());
}

#[test]
fn bootstrap_is_idempotent_on_disk() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    {
        let store = Store::open(&path)?;
        store.bootstrap()?;
        store.seed_demo_accounts(3)?;
    }

    let store = Store::open(&path)?;
    store.bootstrap()?;
    assert_eq!(store.count_accounts()?, 3);
    Ok(())
}

#[test]
fn bootstrap_rejects_schema_missing_required_column() -> Result<()> {
    let store = Store::open_memory()?;
    store.raw_connection().execute_batch(
        "
            CREATE TABLE accounts (
              id INTEGER PRIMARY KEY,
              company_number TEXT NOT NULL,
              company_name TEXT,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );
            ",
    )?;

    let error = store.bootstrap().expect_err("missing columns should fail");
    let message = error.to_string();
    assert!(message.contains("missing required columns"), "{message}");
    assert!(message.contains("responsible_for"), "{message}");
    Ok(())
}

#[test]
fn bootstrap_rejects_foreign_database() -> Result<()> {
    let store = Store::open_memory()?;
    store
        .raw_connection()
        .execute_batch("CREATE TABLE projects (id INTEGER PRIMARY KEY);")?;
    let error = store.bootstrap().expect_err("foreign schema should fail");
    assert!(error.to_string().contains("`accounts`"));
    Ok(())
}

#[test]
fn list_pages_newest_first_with_window_metadata() -> Result<()> {
    let (store, records) = seeded(25)?;

    let first = store.list_accounts(&ListQuery::default())?;
    assert_eq!(first.records.len(), 10);
    assert_eq!(keys(&first.records)[0], records[24].company_number);
    assert_eq!(first.page_info.current_page_number, 1);
    assert_eq!(first.page_info.start_page_number, 1);
    assert_eq!(first.page_info.end_page_number, 3);
    assert!(first.page_info.prev_page_number.is_none());
    assert!(first.page_info.next_page_number.is_none());

    let third = store.list_accounts(&ListQuery::default().with_page(page(3)))?;
    assert_eq!(keys(&third.records).len(), 5);
    assert_eq!(keys(&third.records)[4], records[0].company_number);

    let beyond = store.list_accounts(&ListQuery::default().with_page(page(40)))?;
    assert_eq!(beyond.page_info.current_page_number, 3);
    assert_eq!(keys(&beyond.records), keys(&third.records));
    Ok(())
}

#[test]
fn list_window_advances_in_blocks_of_ten() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    store.seed_demo_accounts(205)?;

    let listed = store.list_accounts(&ListQuery::default().with_page(page(12)))?;
    assert_eq!(listed.page_info.start_page_number, 11);
    assert_eq!(listed.page_info.end_page_number, 20);
    assert_eq!(listed.page_info.prev_page_number, Some(10));
    assert_eq!(listed.page_info.next_page_number, Some(21));
    Ok(())
}

#[test]
fn list_filters_by_substring_of_number_and_name() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    for (key, name) in [
        ("220-81-00001", "Acme Trading"),
        ("220-81-00002", "Beta Foods"),
        ("110-22-00003", "Acme Foods"),
    ] {
        store.create_account(&Record {
            company_number: key.to_owned(),
            company_name: Some(name.to_owned()),
            ..Record::default()
        })?;
    }

    let by_number = store.list_accounts(&ListQuery::search("220-81", ""))?;
    assert_eq!(keys(&by_number.records), vec!["220-81-00002", "220-81-00001"]);

    let by_name = store.list_accounts(&ListQuery::search("", "Acme"))?;
    assert_eq!(keys(&by_name.records), vec!["110-22-00003", "220-81-00001"]);

    let both = store.list_accounts(&ListQuery::search("220", "Foods"))?;
    assert_eq!(keys(&both.records), vec!["220-81-00002"]);

    let none = store.list_accounts(&ListQuery::search("999", ""))?;
    assert!(none.records.is_empty());
    assert_eq!(none.page_info.end_page_number, 1);
    Ok(())
}

#[test]
fn create_rejects_duplicates_and_blank_keys() -> Result<()> {
    let (store, records) = seeded(1)?;

    let error = store
        .create_account(&records[0])
        .expect_err("duplicate key should fail");
    assert!(error.to_string().contains("already exists"));

    let error = store
        .create_account(&Record::default())
        .expect_err("blank key should fail");
    assert!(error.to_string().contains("business number is required"));
    Ok(())
}

#[test]
fn create_and_update_store_records_verbatim() -> Result<()> {
    let mut store = Store::open_memory()?;
    store.bootstrap()?;
    let created = Record {
        company_number: "1".to_owned(),
        company_name: Some("Acme".to_owned()),
        registration_date_time: Some(String::new()),
        change_date_time: Some(String::new()),
        ..Record::default()
    };
    store.create(&created)?;
    assert_eq!(listed_rows(&mut store)?, vec![created.clone()]);

    let mut updated = created;
    updated.company_name = Some("Acme Ltd".to_owned());
    store.update(&updated)?;
    assert_eq!(listed_rows(&mut store)?, vec![updated]);
    Ok(())
}

fn listed_rows(store: &mut Store) -> Result<Vec<Record>> {
    Ok(store
        .list(&ListQuery::default())?
        .records
        .into_iter()
        .flatten()
        .collect())
}

#[test]
fn update_overwrites_fields_by_key() -> Result<()> {
    let (store, records) = seeded(3)?;
    let mut changed = records[1].clone();
    changed.company_name = Some("Renamed".to_owned());
    changed.phone_number = None;
    changed.change_date_time = Some("2026-03-01 10:00:00".to_owned());
    store.update_account(&changed)?;

    let key = CompanyNumber::parse(&changed.company_number).expect("key");
    let stored = store.get_account(&key)?.expect("stored account");
    assert_eq!(stored, changed);

    let untouched_key = CompanyNumber::parse(&records[0].company_number).expect("key");
    assert_eq!(store.get_account(&untouched_key)?, Some(records[0].clone()));
    Ok(())
}

#[test]
fn update_and_delete_of_missing_key_fail() -> Result<()> {
    let (store, _) = seeded(1)?;
    let missing = Record {
        company_number: "000-00-00000".to_owned(),
        ..Record::default()
    };
    assert!(store.update_account(&missing).is_err());

    let key = CompanyNumber::parse("000-00-00000").expect("key");
    let error = store.delete_account(&key).expect_err("missing key should fail");
    assert!(error.to_string().contains("not found"));
    Ok(())
}

#[test]
fn delete_removes_only_that_account() -> Result<()> {
    let (mut store, records) = seeded(3)?;
    let key = CompanyNumber::parse(&records[1].company_number).expect("key");
    store.delete(&key)?;

    assert_eq!(store.count_accounts()?, 2);
    assert!(store.get_account(&key)?.is_none());
    let listed = store.list(&ListQuery::default())?;
    assert!(!keys(&listed.records).contains(&records[1].company_number));
    Ok(())
}

#[test]
fn seed_demo_accounts_skips_existing_keys() -> Result<()> {
    let store = Store::open_memory()?;
    store.bootstrap()?;
    assert_eq!(store.seed_demo_accounts(12)?, 12);
    assert_eq!(store.seed_demo_accounts(15)?, 3);
    assert_eq!(store.count_accounts()?, 15);
    Ok(())
}
