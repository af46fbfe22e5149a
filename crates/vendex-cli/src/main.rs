// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use runtime::Shell;
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vendex_app::{AppCommand, RecordService, Session};
use vendex_client::Client;
use vendex_db::Store;

const DEMO_ACCOUNTS: usize = 137;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `vendex --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    setup_tracing(config.log_filter());

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let service: Box<dyn RecordService> = if options.demo || options.local {
        let store = Store::open(&db_path).with_context(|| {
            format!(
                "open database {} -- if this path is wrong, set [storage].db_path or VENDEX_DB_PATH",
                db_path.display()
            )
        })?;
        store.bootstrap()?;
        if options.demo {
            store.seed_demo_accounts(DEMO_ACCOUNTS)?;
        }
        info!(path = %db_path.display(), "using local account store");
        Box::new(store)
    } else {
        let client = Client::new(config.base_url(), config.timeout()?).with_context(|| {
            format!(
                "invalid [service] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        })?;
        if options.check_only {
            client.ping()?;
        }
        info!(base_url = client.base_url(), "using account service");
        Box::new(client)
    };
    if options.check_only {
        return Ok(());
    }

    let mut shell = Shell::new(
        Session::new(service, config.mutation_policy()),
        io::stdout(),
    );
    shell.execute_command(AppCommand::Navigate(options.start_location))?;
    shell.run(io::stdin().lock())
}

/// Logs go to stderr so they never interleave with shell output on stdout.
/// `VENDEX_LOG` wins over the configured filter.
fn setup_tracing(config_filter: &str) {
    let filter = EnvFilter::try_from_env("VENDEX_LOG")
        .or_else(|_| EnvFilter::try_new(config_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    local: bool,
    start_location: String,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        local: false,
        start_location: "/".to_owned(),
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--query" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--query requires a location such as \"/?p=2&c=Acme\"")
                })?;
                options.start_location = value.as_ref().to_owned();
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--local" => {
                options.local = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("vendex: partner account manager");
    println!("  --config <path>          Use a specific config path");
    println!("  --query <location>       Start at a location such as /?p=2&b=220&c=Acme");
    println!("  --local                  Use the local SQLite store instead of the service");
    println!("  --demo                   Use an in-memory store seeded with demo accounts");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config and reach the account service, then exit");
    println!("  --help                   Show this help");
}
