use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use storefront::{
    AuthError, FileSlot, InMemoryUserRepository, Role, RoleGuard, SessionConfig, SessionStore, UserPatch,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "storefront", about = "Storefront session store CLI")]
struct Cli {
    /// Directory holding the session slot. Overrides `STOREFRONT_SLOT_DIR`.
    #[arg(long)]
    slot_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with an email and secret.
    Login { email: String, secret: String },
    /// Register a new viewer and log in as them.
    Register { name: String, email: String, secret: String },
    /// Clear the saved session.
    Logout,
    /// Print the current session record.
    Whoami,
    /// Change the logged-in user's display name.
    Rename { name: String },
    /// Exit 0 if the logged-in user holds any of the given roles.
    Can {
        #[arg(required = true)]
        roles: Vec<Role>,
    },
}

type Store = SessionStore<InMemoryUserRepository, FileSlot>;

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = SessionConfig::from_env();
    if let Some(dir) = cli.slot_dir {
        config.slot_dir = dir;
    }

    let repository =
        if config.seed_users { InMemoryUserRepository::seeded() } else { InMemoryUserRepository::new() };
    let slot = FileSlot::new(&config.slot_dir, &config.slot_key);
    tracing::debug!(slot = %slot.path().display(), seeded = config.seed_users, "opening session store");
    let mut store = SessionStore::open(repository, slot);

    match run(&mut store, cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(store: &mut Store, command: Command) -> Result<bool, CliError> {
    match command {
        Command::Login { email, secret } => Ok(report(store.try_login(&email, &secret).map(|u| u.name))),
        Command::Register { name, email, secret } => {
            Ok(report(store.try_register(&name, &email, &secret).map(|u| format!("{} (id {})", u.name, u.id))))
        }
        Command::Logout => {
            store.logout();
            println!("logged out");
            Ok(true)
        }
        Command::Whoami => {
            println!("{}", serde_json::to_string_pretty(store.session())?);
            Ok(store.session().is_logged_in())
        }
        Command::Rename { name } => Ok(report(store.try_update_user(UserPatch::name(name)).map(|u| u.name))),
        Command::Can { roles } => {
            let allowed = RoleGuard::new(roles).allows(&*store);
            println!("{}", if allowed { "allowed" } else { "denied" });
            Ok(allowed)
        }
    }
}

fn report(outcome: Result<String, AuthError>) -> bool {
    match outcome {
        Ok(name) => {
            println!("ok: {name}");
            true
        }
        Err(e) => {
            println!("failed: {e}");
            false
        }
    }
}
