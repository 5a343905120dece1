use clap::Parser;
use log::{error, info, LevelFilter};
use mc_player_info_lib::config::DEFAULT_TIMEOUT_MS;
use mc_player_info_lib::error::{ErrorKind, ErrorReport, LookupError};
use mc_player_info_lib::logging;
use mc_player_info_lib::minecraft::dto::PlayerReport;
use mc_player_info_lib::utils::profile_utils;
use mc_player_info_lib::{ClientConfig, PlayerDirectoryClient};
use serde::Serialize;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

/// Looks up public Minecraft player information
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Player names to look up. Several names are looked up in parallel.
    #[arg(required = true)]
    names: Vec<String>,

    /// Connect and read timeout for every single request, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Overall time budget for the lookup of one player, in milliseconds.
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Print the results as JSON.
    #[arg(long)]
    json: bool,

    /// Log debug output to stderr and the log file.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupOutcome {
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<PlayerReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::setup_logging(log_level(args.verbose)) {
        eprintln!("Logging could not be initialized: {}", e);
    }

    let config = ClientConfig::default()
        .with_timeout_millis(args.timeout_ms)
        .with_lookup_deadline(args.deadline_ms.map(Duration::from_millis));

    let client = match PlayerDirectoryClient::with_config(config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            eprintln!("Can't create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let queries: Vec<String> = args.names.iter().map(|n| n.trim().to_string()).collect();
    info!("Starting lookup of {} player(s)", queries.len());

    let results: Vec<(String, Result<PlayerReport, LookupError>)> = thread::scope(|scope| {
        let handles: Vec<_> = queries
            .iter()
            .map(|query| {
                let client = &client;
                (query, scope.spawn(move || client.lookup_player(query)))
            })
            .collect();

        handles
            .into_iter()
            .filter_map(|(query, handle)| match handle.join() {
                Ok(result) => Some((query.clone(), result)),
                Err(_) => {
                    error!("Lookup thread for '{}' panicked", query);
                    None
                }
            })
            .collect()
    });

    let all_ok = results.len() == queries.len() && results.iter().all(|(_, r)| r.is_ok());

    if args.json {
        let outcomes: Vec<LookupOutcome> = results
            .into_iter()
            .map(|(query, result)| match result {
                Ok(report) => LookupOutcome {
                    query,
                    report: Some(report),
                    error: None,
                },
                Err(e) => LookupOutcome {
                    query,
                    report: None,
                    error: Some(e.into()),
                },
            })
            .collect();

        match serde_json::to_string_pretty(&outcomes) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Can't serialize results: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for (query, result) in &results {
            match result {
                Ok(report) => print_report(report),
                Err(e) => print_error(query, e),
            }
            println!();
        }
    }

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn log_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn print_report(report: &PlayerReport) {
    let identity = &report.identity;
    println!("Name:         {}", identity.name);
    println!("UUID:         {}", identity.uuid);
    println!(
        "Account:      {}",
        if identity.legacy {
            "Minecraft-Account"
        } else {
            "Mojang-Account"
        }
    );
    println!(
        "Status:       {}",
        if identity.demo {
            "Demo Account"
        } else {
            "Paid Account"
        }
    );

    let mut label = "Names:";
    for entry in &report.name_history {
        match entry.changed_at() {
            Some(date) => println!("{:<13} {} ({})", label, entry.name, date),
            None => println!("{:<13} {}", label, entry.name),
        }
        label = "";
    }

    match report.last_skin_change {
        Some(date) => println!("Skin changed: {}", date),
        None => println!("Skin changed: - Dump Time -"),
    }
    if let Some(url) = profile_utils::skin_url(&report.profile) {
        println!("Skin:         {}", url);
    }
    if let Some(url) = profile_utils::cape_url(&report.profile) {
        println!("Cape:         {}", url);
    }
    println!("Render:       {}", report.body_render_url);
}

fn print_error(query: &str, error: &LookupError) {
    match error.kind() {
        ErrorKind::PlayerNotFound => {
            eprintln!("{}: A player with this name doesn't exist!", query)
        }
        ErrorKind::Network => {
            eprintln!("{}: Can't retrieve user information.\n{}", query, error)
        }
        ErrorKind::Format => eprintln!("{}: Unexpected profile data.\n{}", query, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_defaults_to_info() {
        assert_eq!(log_level(false), LevelFilter::Info);
        assert_eq!(log_level(true), LevelFilter::Debug);
    }
}
