//! meetctl - A command-line client for the meeting management API.
//!
//! Provides login/register/logout session management and CRUD operations
//! on meeting records. The server is authoritative for all data; this
//! client holds nothing locally except the session token.

mod api;
mod auth;
mod config;
mod models;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::{ApiClient, ApiError};
use auth::{AuthEvent, AuthEventReceiver, Navigation, SessionController, SessionStore};
use config::Config;
use models::{Credentials, Meeting, MeetingPayload, MeetingStatus, Registration};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn usage() {
    eprintln!("Usage: meetctl <command> [args]");
    eprintln!();
    eprintln!("Session:");
    eprintln!("  login <username>                 authenticate and store a session token");
    eprintln!("  register <username> <email>      create an account (does not log in)");
    eprintln!("  logout                           clear the stored session");
    eprintln!("  status                           show whether a session is active");
    eprintln!();
    eprintln!("Meetings:");
    eprintln!("  list                             list all meetings");
    eprintln!("  create --date <YYYY-MM-DD> --time <HH:MM> --agenda <text>");
    eprintln!("         [--status <upcoming|in-review|cancelled|completed>] [--url <website>]");
    eprintln!("  update <id> [--date ..] [--time ..] [--agenda ..] [--status ..] [--url ..]");
    eprintln!("  delete <id>                      delete a meeting by id");
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let (events_tx, mut events_rx) = auth::events::channel();

    let result = run(events_tx).await;

    // The HTTP layer never navigates or prints; session teardown lands here.
    let session_expired = drain_auth_events(&mut events_rx);

    if let Err(e) = result {
        if !reported_via_events(&e, session_expired) {
            report_error(&e);
        }
        std::process::exit(1);
    }
}

async fn run(events_tx: auth::AuthEventSender) -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        usage();
        return Ok(());
    };

    let mut config = Config::load().context("Failed to load configuration")?;
    let base_url = config.api_base_url();
    info!(base_url = %base_url, "Resolved API endpoint");

    let sessions = SessionStore::new(Config::data_dir()?);
    sessions.load();

    let client = ApiClient::new(base_url, sessions.clone())?.with_events(events_tx);
    let controller = SessionController::new(client.clone(), sessions);

    match command.as_str() {
        "login" => cmd_login(&controller, &mut config, &args[2..]).await,
        "register" => cmd_register(&controller, &args[2..]).await,
        "logout" => cmd_logout(&controller),
        "status" => cmd_status(&controller),
        "list" => cmd_list(&client).await,
        "create" => cmd_create(&client, &args[2..]).await,
        "update" => cmd_update(&client, &args[2..]).await,
        "delete" => cmd_delete(&client, &args[2..]).await,
        "help" | "--help" | "-h" => {
            usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            usage();
            std::process::exit(2);
        }
    }
}

// ===== Session Commands =====

async fn cmd_login(
    controller: &SessionController,
    config: &mut Config,
    args: &[String],
) -> Result<()> {
    let username = match args.first() {
        Some(u) => u.clone(),
        None => config
            .last_username
            .clone()
            .context("Usage: meetctl login <username>")?,
    };
    let password = prompt("Password: ")?;

    let nav = controller
        .login(Credentials {
            username: username.clone(),
            password,
        })
        .await?;

    config.last_username = Some(username.clone());
    if let Err(e) = config.save() {
        tracing::warn!(error = %e, "Failed to save configuration");
    }

    debug_assert_eq!(nav, Navigation::Home);
    println!("Logged in as {}", username);
    Ok(())
}

async fn cmd_register(controller: &SessionController, args: &[String]) -> Result<()> {
    let (username, email) = match (args.first(), args.get(1)) {
        (Some(u), Some(e)) => (u.clone(), e.clone()),
        _ => anyhow::bail!("Usage: meetctl register <username> <email>"),
    };
    let password = prompt("Password: ")?;

    let nav = controller
        .register(Registration {
            username,
            email,
            password,
        })
        .await?;

    debug_assert_eq!(nav, Navigation::Login);
    println!("Account created. Run `meetctl login` to sign in.");
    Ok(())
}

fn cmd_logout(controller: &SessionController) -> Result<()> {
    controller.logout();
    println!("Logged out");
    Ok(())
}

fn cmd_status(controller: &SessionController) -> Result<()> {
    match controller.username() {
        Some(username) => println!("Logged in as {}", username),
        None => println!("Not logged in"),
    }
    Ok(())
}

// ===== Meeting Commands =====

async fn cmd_list(client: &ApiClient) -> Result<()> {
    let meetings = client.list_meetings().await?;
    if meetings.is_empty() {
        println!("No meetings");
        return Ok(());
    }

    println!(
        "{:>5}  {:<12}  {:<13}  {:<9}  {:<40}  {}",
        "ID", "DATE", "TIME", "STATUS", "AGENDA", "WEBSITE"
    );
    for m in &meetings {
        println!(
            "{:>5}  {:<12}  {:<13}  {:<9}  {:<40}  {}",
            m.id,
            m.formatted_date(),
            m.formatted_time(),
            m.status,
            truncate(&m.agenda, 40),
            m.website_display()
        );
    }
    Ok(())
}

async fn cmd_create(client: &ApiClient, args: &[String]) -> Result<()> {
    let date = flag(args, "date").context("--date is required")?;
    let time = flag(args, "time").context("--time is required")?;
    let agenda = flag(args, "agenda").context("--agenda is required")?;
    let status = match flag(args, "status") {
        Some(s) => parse_status(s)?,
        None => MeetingStatus::Upcoming,
    };

    let payload = MeetingPayload {
        status,
        agenda: agenda.to_string(),
        date: date.to_string(),
        start_time: time.to_string(),
        website: flag(args, "url").map(str::to_string),
    };

    let meeting = client.create_meeting(&payload).await?;
    println!("Created meeting {}", meeting.id);
    Ok(())
}

async fn cmd_update(client: &ApiClient, args: &[String]) -> Result<()> {
    let id = parse_id(args.first())?;

    // PUT replaces the whole record, so start from the server's current copy
    // and apply the requested changes, like the original edit form did.
    let meetings = client.list_meetings().await?;
    let current = meetings
        .iter()
        .find(|m| m.id == id)
        .with_context(|| format!("No meeting with id {}", id))?;

    let payload = apply_overrides(current, args)?;
    let meeting = client.update_meeting(id, &payload).await?;
    println!("Updated meeting {}", meeting.id);
    Ok(())
}

async fn cmd_delete(client: &ApiClient, args: &[String]) -> Result<()> {
    let id = parse_id(args.first())?;
    client.delete_meeting(id).await?;
    println!("Deleted meeting {}", id);
    Ok(())
}

// ===== Helpers =====

fn apply_overrides(current: &Meeting, args: &[String]) -> Result<MeetingPayload> {
    Ok(MeetingPayload {
        status: match flag(args, "status") {
            Some(s) => parse_status(s)?,
            None => current.status,
        },
        agenda: flag(args, "agenda")
            .map(str::to_string)
            .unwrap_or_else(|| current.agenda.clone()),
        date: flag(args, "date")
            .map(str::to_string)
            .unwrap_or_else(|| current.date.clone()),
        start_time: flag(args, "time")
            .map(str::to_string)
            .unwrap_or_else(|| current.start_time.clone()),
        website: flag(args, "url").map(str::to_string).or_else(|| current.website.clone()),
    })
}

/// Find the value following `--name` in the argument list
fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let marker = format!("--{}", name);
    args.iter()
        .position(|a| *a == marker)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_status(s: &str) -> Result<MeetingStatus> {
    MeetingStatus::parse_arg(s).with_context(|| {
        format!(
            "Invalid status '{}' (expected upcoming, in-review, cancelled or completed)",
            s
        )
    })
}

fn parse_id(arg: Option<&String>) -> Result<i64> {
    let arg = arg.context("Meeting id required")?;
    arg.parse::<i64>()
        .with_context(|| format!("Invalid meeting id '{}'", arg))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Errors are rendered once, here at the call site. The only globally
/// handled failure is the 401 teardown reported through the event channel.
fn report_error(e: &anyhow::Error) {
    match e.downcast_ref::<ApiError>() {
        Some(api_err) => eprintln!("Error: {}", api_err.user_message()),
        None => eprintln!("Error: {}", e),
    }
}

/// Each failure is rendered exactly once. When the event drain already told
/// the user their session expired, the typed `Unauthorized` error behind it
/// stays silent at the call site.
fn reported_via_events(e: &anyhow::Error, session_expired: bool) -> bool {
    session_expired && matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized))
}

fn drain_auth_events(rx: &mut AuthEventReceiver) -> bool {
    let mut session_expired = false;
    while let Ok(event) = rx.try_recv() {
        match event {
            AuthEvent::SessionExpired => {
                session_expired = true;
                eprintln!("Your session has expired. Run `meetctl login` to sign in again.");
            }
        }
    }
    session_expired
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flag_finds_values_anywhere_in_the_list() {
        let a = args(&["--date", "2026-09-01", "--agenda", "Planning", "--time", "10:00"]);
        assert_eq!(flag(&a, "date"), Some("2026-09-01"));
        assert_eq!(flag(&a, "time"), Some("10:00"));
        assert_eq!(flag(&a, "agenda"), Some("Planning"));
        assert_eq!(flag(&a, "url"), None);
    }

    #[test]
    fn flag_without_value_is_none() {
        let a = args(&["--date"]);
        assert_eq!(flag(&a, "date"), None);
    }

    #[test]
    fn update_overrides_merge_with_current_record() {
        let current = Meeting {
            id: 7,
            status: MeetingStatus::Upcoming,
            agenda: "Planning".to_string(),
            date: "2026-09-01".to_string(),
            start_time: "10:00".to_string(),
            website: Some("https://meet.example.com".to_string()),
        };

        let payload =
            apply_overrides(&current, &args(&["7", "--status", "completed"])).unwrap();
        assert_eq!(payload.status, MeetingStatus::Completed);
        assert_eq!(payload.agenda, "Planning");
        assert_eq!(payload.date, "2026-09-01");
        assert_eq!(payload.start_time, "10:00");
        assert_eq!(payload.website.as_deref(), Some("https://meet.example.com"));

        let payload = apply_overrides(&current, &args(&["7", "--agenda", "Retro"])).unwrap();
        assert_eq!(payload.agenda, "Retro");
        assert_eq!(payload.status, MeetingStatus::Upcoming);
    }

    #[test]
    fn unauthorized_is_rendered_only_by_the_event_drain() {
        let expired = anyhow::Error::from(ApiError::Unauthorized);
        assert!(reported_via_events(&expired, true));
        // No teardown event drained: the call site still owns the message
        assert!(!reported_via_events(&expired, false));

        // Other failures are always call-site rendered
        let not_found = anyhow::Error::from(ApiError::NotFound("gone".to_string()));
        assert!(!reported_via_events(&not_found, true));
    }

    #[test]
    fn drain_reports_session_expiry_once_seen() {
        let (tx, mut rx) = auth::events::channel();
        assert!(!drain_auth_events(&mut rx));

        tx.send(AuthEvent::SessionExpired).unwrap();
        assert!(drain_auth_events(&mut rx));
        // Channel drained, nothing left to report
        assert!(!drain_auth_events(&mut rx));
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert_eq!(parse_id(Some(&"42".to_string())).unwrap(), 42);
        assert!(parse_id(Some(&"forty-two".to_string())).is_err());
        assert!(parse_id(None).is_err());
    }

    #[test]
    fn truncate_respects_character_boundaries() {
        assert_eq!(truncate("short", 40), "short");
        let long = "a".repeat(50);
        let cut = truncate(&long, 40);
        assert_eq!(cut.chars().count(), 40);
        assert!(cut.ends_with('…'));
    }
}
