//! hallpass - command-line shell for the session lifecycle.
//!
//! Exercises hallpass-core end to end: login, registration, logout, session
//! status, a guard probe for route destinations, and the theme preference.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hallpass_core::api::AuthClient;
use hallpass_core::auth::{token, CredentialStore, FileTokenStore, Session, TokenStore};
use hallpass_core::config::Config;
use hallpass_core::nav::{GuardDecision, NavigationGuard, RouteTable};
use hallpass_core::prefs::{Theme, ThemeStore};

const USAGE: &str = "\
Usage: hallpass <command>

Commands:
  login [username]    Authenticate and persist the session token
  register            Create an account (implies login)
  logout              Clear the persisted session token
  status              Show the current session state
  guard [path]        Evaluate the navigation guard for a destination
  theme [show|toggle|dark|light]
                      Show or change the theme preference";

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the log level (e.g. RUST_LOG=debug). Log files
/// roll daily under the data directory; if that directory cannot be
/// created, stderr-only logging still comes up.
fn init_tracing(log_dir: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let file = tracing_appender::rolling::daily(log_dir, "hallpass.log");
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    let data_dir = Config::data_dir()?;
    let _log_guard = init_tracing(&data_dir.join("logs"));
    info!("hallpass starting");

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("status");

    match command {
        "login" => cmd_login(config, &data_dir, args.get(2).map(String::as_str)).await,
        "register" => cmd_register(&config, &data_dir).await,
        "logout" => cmd_logout(&config, &data_dir),
        "status" => cmd_status(&config, &data_dir),
        "guard" => cmd_guard(&config, &data_dir, args.get(2).map(String::as_str)),
        "theme" => cmd_theme(&data_dir, args.get(2).map(String::as_str)),
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}\n\n{USAGE}");
            std::process::exit(2);
        }
    }
}

fn build_session(config: &Config, data_dir: &Path) -> Result<Session<AuthClient>> {
    let client = AuthClient::new(config.api_url())?;
    Ok(Session::new(client, Box::new(FileTokenStore::new(data_dir))))
}

async fn cmd_login(
    mut config: Config,
    data_dir: &Path,
    username_arg: Option<&str>,
) -> Result<()> {
    let username = match username_arg {
        Some(u) => u.to_string(),
        None => prompt_username(config.last_username.as_deref())?,
    };

    let password = if CredentialStore::has_saved(&username) && confirm("Use stored password?")? {
        CredentialStore::password_for(&username)?
    } else {
        rpassword::prompt_password("Password: ")?
    };

    let session = build_session(&config, data_dir)?;
    println!("Authenticating...");
    session.login(&username, &password).await?;

    if let Err(e) = CredentialStore::remember(&username, &password) {
        warn!(error = %e, "Failed to store credentials");
    }
    config.last_username = Some(username);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    match session.user_id() {
        Some(user_id) => println!("Login successful (user id {user_id})."),
        None => println!("Login successful."),
    }
    Ok(())
}

async fn cmd_register(config: &Config, data_dir: &Path) -> Result<()> {
    let username = prompt_username(None)?;
    let email = prompt_line("Email: ")?;
    let password = rpassword::prompt_password("Password: ")?;
    let password_confirm = rpassword::prompt_password("Confirm password: ")?;

    let session = build_session(config, data_dir)?;
    println!("Registering...");
    session
        .register(&username, &email, &password, &password_confirm)
        .await?;

    match session.user_id() {
        Some(user_id) => println!("Registration successful (user id {user_id})."),
        None => println!("Registration successful."),
    }
    Ok(())
}

fn cmd_logout(config: &Config, data_dir: &Path) -> Result<()> {
    let session = build_session(config, data_dir)?;
    session.logout();
    println!("Logged out.");
    Ok(())
}

fn cmd_status(config: &Config, data_dir: &Path) -> Result<()> {
    let session = build_session(config, data_dir)?;
    session.bootstrap();

    if !session.is_authenticated() {
        println!("Not authenticated.");
        return Ok(());
    }

    match session.user_id() {
        Some(user_id) => println!("Authenticated as user id {user_id}."),
        None => println!("Authenticated."),
    }

    // Expiry display is informational; the session has already validated it.
    let store = FileTokenStore::new(data_dir);
    if let Some(tok) = store.read() {
        if let Ok(claims) = token::decode(&tok) {
            if let Some(exp) = claims.expires_at {
                let minutes = ((exp - Utc::now().timestamp()) / 60).max(0);
                println!("Token expires in {minutes}m.");
            }
        }
    }
    Ok(())
}

fn cmd_guard(config: &Config, data_dir: &Path, destination: Option<&str>) -> Result<()> {
    let destination = destination.unwrap_or("/dashboard");
    let session = build_session(config, data_dir)?;
    session.bootstrap();

    let guard = NavigationGuard::new(RouteTable::standard());
    match guard.evaluate(destination, session.is_authenticated()) {
        GuardDecision::Allow => println!("{destination}: allowed"),
        decision => println!("{destination}: redirected to {}", decision.target(destination)),
    }
    Ok(())
}

fn cmd_theme(data_dir: &Path, action: Option<&str>) -> Result<()> {
    // Terminals expose no color-scheme preference; fall back to light the
    // way a browser without matchMedia support would.
    let mut store = ThemeStore::load(data_dir, false);

    match action {
        None | Some("show") => println!("Theme: {}", store.theme().as_str()),
        Some("toggle") => println!("Theme: {}", store.toggle().as_str()),
        Some("dark") => {
            store.set(Theme::Dark);
            println!("Theme: dark");
        }
        Some("light") => {
            store.set(Theme::Light);
            println!("Theme: light");
        }
        Some(other) => anyhow::bail!("Unknown theme action: {other}"),
    }
    Ok(())
}

fn prompt_username(default: Option<&str>) -> Result<String> {
    match default {
        Some(last) => print!("Username [{last}]: "),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        if let Some(last) = default {
            return Ok(last.to_string());
        }
        anyhow::bail!("Username required");
    }
    Ok(input.to_string())
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [Y/n]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_lowercase() != "n")
}
