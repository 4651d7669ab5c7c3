//! `worklog <path> [--today yyyy-MM-dd] [--fetch]`
//!
//! Resolves a route (following redirects), prints its view model as JSON and,
//! with `--fetch`, loads it through a query session and prints the settled
//! view state.

use std::process::ExitCode;

use worklog_lib::config::{self, Config};
use worklog_lib::filters;
use worklog_lib::navigation::{Destination, NavigationController};
use worklog_lib::query::QuerySession;
use worklog_lib::transport::HttpArtifactClient;
use worklog_lib::{period, route, view};

const USAGE: &str = "usage: worklog <path> [--today yyyy-MM-dd] [--fetch]";

struct Args {
    path: String,
    today: Option<String>,
    fetch: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut path = None;
    let mut today = None;
    let mut fetch = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fetch" => fetch = true,
            "--today" => today = Some(args.next().ok_or("--today needs a date")?),
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if path.is_none() => path = Some(arg),
            _ => return Err(format!("unexpected argument '{}'\n{}", arg, USAGE)),
        }
    }

    Ok(Args {
        path: path.ok_or(USAGE)?,
        today,
        fetch,
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

fn print_entry(config: &Config) -> Result<(), String> {
    let preselected = config.default_sources.clone().unwrap_or_default();
    let choices: Vec<serde_json::Value> = filters::INTEGRATIONS
        .iter()
        .map(|i| {
            serde_json::json!({
                "id": i.id,
                "label": i.label,
                "description": i.description,
                "selected": preselected.contains(i.id),
            })
        })
        .collect();
    print_json(&serde_json::json!({
        "path": route::ENTRY_PATH,
        "title": "Select sources",
        "integrations": choices,
        "allSelected": preselected.covers_all_integrations(),
        "canContinue": !preselected.is_empty(),
    }))
}

fn run(args: Args) -> Result<(), String> {
    let config = config::load_config().map_err(|e| e.to_string())?;
    let today = match &args.today {
        Some(value) => period::parse_iso(value).map_err(|e| e.to_string())?,
        None => config.today(),
    };
    let nav = NavigationController::new(today).with_lookback(config.lookback_months);

    let target = match route::resolve_path(&nav, &args.path) {
        Destination::Entry => return print_entry(&config),
        Destination::View(target) => target,
    };

    let model = view::build(&nav, &target).map_err(|e| e.to_string())?;
    print_json(&model)?;

    if args.fetch {
        let client = HttpArtifactClient::from_config(&config).map_err(|e| e.to_string())?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| e.to_string())?;
        let session = QuerySession::new();
        runtime
            .block_on(session.load(&client, &target))
            .map_err(|e| e.to_string())?;
        print_json(&session.snapshot())?;
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("worklog: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
