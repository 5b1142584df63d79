use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sc_cli::{
    init_logging, load_config, read_audit_log, run_race, run_scenario, write_audit_log,
    RaceConfig,
};
use sc_core::{ClubManager, InMemoryStore};
use std::path::PathBuf;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("schoolconnect")
        .version(sc_core::VERSION)
        .about("SchoolConnect club leadership harness")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to manager config (TOML)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("scenario")
                .about("Run the claim / promote / transfer walkthrough")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("race")
                .about("Race concurrent claims on fresh clubs")
                .arg(
                    Arg::new("contenders")
                        .long("contenders")
                        .default_value("16")
                        .value_parser(value_parser!(usize))
                        .help("Concurrent claimants per club"),
                )
                .arg(
                    Arg::new("clubs")
                        .long("clubs")
                        .default_value("4")
                        .value_parser(value_parser!(usize))
                        .help("Number of clubs"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("audit")
                .about("Run the walkthrough and print its audit log")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Also write the log as JSON to this file"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("verify-log")
                .about("Verify integrity of an exported audit log")
                .arg(
                    Arg::new("path")
                        .long("path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to audit log JSON"),
                ),
        )
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

/// Returns whether the command's checks passed
async fn run(command: &str, args: &ArgMatches) -> anyhow::Result<bool> {
    let config = load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let manager = Arc::new(ClubManager::new(Arc::new(InMemoryStore::new()), config)?);

    match command {
        "scenario" => {
            let report = run_scenario(&manager).await;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.generate_text());
            }
            Ok(report.passed())
        }
        "race" => {
            let race = RaceConfig {
                contenders: args.get_one::<usize>("contenders").copied().unwrap_or(16),
                clubs: args.get_one::<usize>("clubs").copied().unwrap_or(4),
            };
            let report = run_race(Arc::clone(&manager), race).await?;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.generate_text());
            }
            Ok(report.passed())
        }
        "audit" => {
            let report = run_scenario(&manager).await;
            let log = manager.audit();
            let integrity = log.verify_integrity();

            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&log.events())?);
            } else {
                println!("Audit Log ({} events):", log.len());
                for e in log.events() {
                    let actor = e.actor.map_or_else(|| "system".to_string(), |a| a.to_string());
                    println!(
                        "  #{:<3} {} {:<13} club={} actor={} hash={}",
                        e.seq,
                        e.timestamp.to_rfc3339(),
                        e.action.label(),
                        e.club_id,
                        actor,
                        &hex_prefix(&e.hash),
                    );
                }
                match &integrity {
                    Ok(()) => println!("Log integrity: VALID"),
                    Err(e) => println!("Log integrity: INVALID ({e})"),
                }
            }

            if let Some(out) = args.get_one::<PathBuf>("out") {
                write_audit_log(log, out)?;
                tracing::info!(path = %out.display(), "audit log written");
            }
            Ok(report.passed() && integrity.is_ok())
        }
        "verify-log" => {
            let path = args
                .get_one::<PathBuf>("path")
                .context("--path is required")?;
            let log = read_audit_log(path)?;
            match log.verify_integrity() {
                Ok(()) => {
                    println!("Log integrity: VALID");
                    println!("Events checked: {}", log.len());
                    Ok(true)
                }
                Err(e) => {
                    println!("Log integrity: INVALID ({e})");
                    Ok(false)
                }
            }
        }
        other => anyhow::bail!("unknown command: {other}"),
    }
}

fn hex_prefix(hash: &[u8; 32]) -> String {
    hash[..6].iter().map(|b| format!("{b:02x}")).collect()
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    // global flags are propagated into the subcommand's matches
    let Some((command, args)) = matches.subcommand() else {
        eprintln!("error: a subcommand is required");
        std::process::exit(2);
    };
    init_logging(args.get_flag("log-json"));

    match run(command, args).await {
        Ok(passed) => std::process::exit(i32::from(!passed)),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}
