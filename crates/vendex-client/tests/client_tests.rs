// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use std::io::Read;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Method, Response, Server};
use vendex_app::{CompanyNumber, ListQuery, Record, RecordService};
use vendex_client::Client;

fn json_header() -> Header {
    Header::from_bytes("Content-Type", "application/json").expect("valid content type header")
}

fn mock_server() -> Result<(Server, String)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());
    Ok((server, addr))
}

#[test]
fn unreachable_service_error_contains_remediation() {
    let client = Client::new("http://127.0.0.1:1", Some(Duration::from_millis(50)))
        .expect("client should initialize");

    let error = client.ping().expect_err("ping should fail for unreachable endpoint");
    assert!(error.to_string().contains("check that the account service is running"));
}

#[test]
fn list_sends_query_keys_and_decodes_page() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Get);
        assert_eq!(request.url(), "/api/account/list?p=3&b=220&c=%EB%B2%95%EC%9D%B8+Co");
        let body = r#"{
            "accountList": [
                {"companyNumber": "220-81-00001", "companyName": "Acme", "homepageurl": "https://acme.example"},
                null
            ],
            "pageInfo": {
                "currentPageNumber": 3,
                "startPageNumber": 1,
                "endPageNumber": 10,
                "prevPageNumber": 0,
                "nextPageNumber": 11
            }
        }"#;
        let response = Response::from_string(body)
            .with_status_code(200)
            .with_header(json_header());
        request.respond(response).expect("response should succeed");
    });

    let client = Client::new(&addr, Some(Duration::from_secs(2)))?;
    let query = ListQuery::search("220", "법인 Co").with_page(NonZeroU32::new(3).expect("page"));
    let page = client.list_accounts(&query)?;

    assert_eq!(page.records.len(), 2);
    let first = page.records[0].as_ref().expect("first row");
    assert_eq!(first.company_number, "220-81-00001");
    assert_eq!(first.homepage_url.as_deref(), Some("https://acme.example"));
    assert!(page.records[1].is_none());
    assert_eq!(page.page_info.current_page_number, 3);
    assert!(page.page_info.prev_target().is_none());
    assert_eq!(page.page_info.next_target().map(NonZeroU32::get), Some(11));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn default_query_lists_without_query_string() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/account/list");
        let body = r#"{"accountList":[],"pageInfo":{"currentPageNumber":1,"startPageNumber":1,"endPageNumber":1}}"#;
        let response = Response::from_string(body)
            .with_status_code(200)
            .with_header(json_header());
        request.respond(response).expect("response should succeed");
    });

    let mut client = Client::new(&addr, None)?;
    let page = client.list(&ListQuery::default())?;
    assert!(page.records.is_empty());

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn mutations_use_expected_methods_paths_and_bodies() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for _ in 0..3 {
            let mut request = server.recv().expect("request expected");
            let mut body = String::new();
            request
                .as_reader()
                .read_to_string(&mut body)
                .expect("read body");
            let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
            seen.push((request.method().clone(), request.url().to_owned(), json));
            request
                .respond(Response::from_string("{}").with_status_code(200))
                .expect("response should succeed");
        }
        seen
    });

    let mut client = Client::new(&addr, Some(Duration::from_secs(2)))?;
    let record = Record {
        company_number: "123-45-67890".to_owned(),
        company_name: Some("Acme".to_owned()),
        responsible_for: Some("Kim".to_owned()),
        detailed_address: Some(String::new()),
        ..Record::default()
    };
    client.create(&record)?;
    client.update(&record)?;
    client.delete(&CompanyNumber::parse("123-45-67890").expect("key"))?;

    let seen = handle.join().expect("server thread should join");
    assert_eq!(seen[0].0, Method::Post);
    assert_eq!(seen[0].1, "/api/account/add");
    assert_eq!(seen[0].2["companyNumber"], "123-45-67890");
    assert_eq!(seen[0].2["responsiblefor"], "Kim");
    assert_eq!(seen[0].2["detailedAddress"], "");

    assert_eq!(seen[1].0, Method::Put);
    assert_eq!(seen[1].1, "/api/account/edit");
    assert_eq!(seen[1].2["companyName"], "Acme");

    assert_eq!(seen[2].0, Method::Delete);
    assert_eq!(seen[2].1, "/api/account/delete");
    assert_eq!(
        seen[2].2,
        serde_json::json!({ "companyNumber": "123-45-67890" })
    );
    Ok(())
}

#[test]
fn non_success_status_surfaces_server_message() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let response = Response::from_string(r#"{"message":"companyNumber already registered"}"#)
            .with_status_code(409)
            .with_header(json_header());
        request.respond(response).expect("response should succeed");
    });

    let client = Client::new(&addr, Some(Duration::from_secs(2)))?;
    let error = client
        .create_account(&Record {
            company_number: "1".to_owned(),
            ..Record::default()
        })
        .expect_err("conflict should fail");
    assert_eq!(
        error.to_string(),
        "server error (409): companyNumber already registered"
    );

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn malformed_list_body_is_an_error() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let response = Response::from_string("<html>oops</html>")
            .with_status_code(200)
            .with_header(json_header());
        request.respond(response).expect("response should succeed");
    });

    let client = Client::new(&addr, Some(Duration::from_secs(2)))?;
    let error = client
        .list_accounts(&ListQuery::default())
        .expect_err("html is not a list");
    assert!(format!("{error:#}").contains("decode account list response"));

    handle.join().expect("server thread should join");
    Ok(())
}
