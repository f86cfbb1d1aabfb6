use std::env;

use anyhow::{bail, Context, Result};
use formbot::{
    chat::commands::profile::{
        ProfileCommandBridge, ProfileDeleteRequest, ProfileListRequest, ProfileShowRequest,
    },
    config::{self, load_or_default, AppConfig},
    logging::init_logging,
    ProfileStore,
};

fn main() -> Result<()> {
    init_logging();
    match Command::parse()? {
        Command::InitConfig => init_config(),
        command => run_store_command(command),
    }
}

fn run_store_command(command: Command) -> Result<()> {
    let config = load_or_default()?;
    let store = ProfileStore::open(&config.store)?;
    let bridge = ProfileCommandBridge::new(&store);

    let output = match command {
        Command::List { complete_only } => bridge.list(ProfileListRequest { complete_only }),
        Command::Show {
            user_id,
            include_timestamps,
        } => bridge.show(ProfileShowRequest {
            user_id,
            include_timestamps,
        })?,
        Command::Delete { user_id, confirm } => {
            bridge.delete(ProfileDeleteRequest { user_id, confirm })?
        }
        Command::InitConfig => return init_config(),
    };
    println!("{output}");
    Ok(())
}

enum Command {
    List { complete_only: bool },
    Show { user_id: String, include_timestamps: bool },
    Delete { user_id: String, confirm: bool },
    InitConfig,
}

impl Command {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let Some(name) = args.next() else {
            print_usage();
            std::process::exit(2);
        };
        let rest: Vec<String> = args.collect();
        let flag = |f: &str| rest.iter().any(|arg| arg == f);
        let positional = || {
            rest.iter()
                .find(|arg| !arg.starts_with("--"))
                .cloned()
                .context("Expected a user id")
        };
        match name.as_str() {
            "list" => Ok(Command::List {
                complete_only: flag("--complete"),
            }),
            "show" => Ok(Command::Show {
                user_id: positional()?,
                include_timestamps: flag("--timestamps"),
            }),
            "delete" => Ok(Command::Delete {
                user_id: positional()?,
                confirm: flag("--confirm"),
            }),
            "init-config" => Ok(Command::InitConfig),
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("Unknown command '{other}'. Run with --help for usage instructions."),
        }
    }
}

/// Writes a default config file unless one already exists.
fn init_config() -> Result<()> {
    let path = config::config_file_path()?;
    if path.exists() {
        println!("Config already present at {}", path.display());
        return Ok(());
    }
    config::save(&AppConfig::default())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn print_usage() {
    println!("FormBot profile administration");
    println!("Usage: cargo run --bin formbot-admin -- <command> [options]");
    println!("Commands:");
    println!("  list [--complete]              List stored profiles");
    println!("  show <user-id> [--timestamps]  Show one profile");
    println!("  delete <user-id> --confirm     Delete one profile");
    println!("  init-config                    Write a default config file");
}
