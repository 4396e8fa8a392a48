//! Interactive console for the link shortener.
//!
//! A thin menu loop over the service API: create or select a principal, then
//! shorten, resolve, list, export, delete, or re-limit links. All state is
//! process-lifetime; quitting discards everything.
//!
//! # Usage
//!
//! ```bash
//! # With defaults
//! cargo run
//!
//! # With explicit ceilings
//! MAX_CLICK_LIMIT=50 MAX_LINK_LIFETIME_SECONDS=3600 cargo run
//! ```
//!
//! # Environment Variables
//!
//! See [`link_shortener::config`] for the full list.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use dialoguer::{Confirm, Input, Select};
use tracing_subscriber::EnvFilter;

use link_shortener::config::{self, Config};
use link_shortener::prelude::*;

/// In-process link shortener with per-principal ownership and dual expiry.
#[derive(Parser)]
#[command(name = "link-shortener")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level override (takes precedence over RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = config::load_from_env().context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        max_click_limit = config.max_click_limit,
        max_link_lifetime_seconds = config.max_link_lifetime_seconds,
        "link shortener ready"
    );

    let service = ShortenerService::with_system_clock(config.limits());

    println!("{}", "Welcome to the link shortener!".bold());

    let mut current: Option<PrincipalId> = None;
    loop {
        match current {
            None => println!("\nCurrent principal: {}", "none selected".dimmed()),
            Some(id) => println!("\nCurrent principal: {}", id.to_string().cyan()),
        }

        let keep_going = match current {
            None => guest_menu(&service, &mut current)?,
            Some(owner) => principal_menu(&service, &config, owner, &mut current)?,
        };
        if !keep_going {
            break;
        }
    }

    println!("Bye.");
    Ok(())
}

/// Menu shown before a principal is selected. Returns `false` to quit.
fn guest_menu(service: &ShortenerService, current: &mut Option<PrincipalId>) -> Result<bool> {
    let choice = Select::new()
        .with_prompt("Choose an action")
        .items(&[
            "Create a new principal",
            "Select an existing principal",
            "Quit",
        ])
        .default(0)
        .interact()?;

    match choice {
        0 => {
            let id = service.create_principal();
            println!("Created principal {}", id.to_string().green());
            *current = Some(id);
        }
        1 => *current = select_principal(service)?,
        _ => return Ok(false),
    }

    Ok(true)
}

/// Menu shown while acting as a principal. Returns `false` to quit.
fn principal_menu(
    service: &ShortenerService,
    config: &Config,
    owner: PrincipalId,
    current: &mut Option<PrincipalId>,
) -> Result<bool> {
    let choice = Select::new()
        .with_prompt("Choose an action")
        .items(&[
            "Shorten a URL",
            "Resolve a short link",
            "List my links",
            "Export my links as JSON",
            "Delete a link",
            "Update a click limit",
            "Switch principal",
            "Quit",
        ])
        .default(0)
        .interact()?;

    match choice {
        0 => shorten(service, config, owner)?,
        1 => resolve(service, owner)?,
        2 => list(service, owner)?,
        3 => export_json(service, owner)?,
        4 => delete(service, owner)?,
        5 => update_limit(service, config, owner)?,
        6 => *current = None,
        _ => return Ok(false),
    }

    Ok(true)
}

/// Lets the user pick one of the known principals, if any exist.
fn select_principal(service: &ShortenerService) -> Result<Option<PrincipalId>> {
    let mut ids = service.principal_ids();
    if ids.is_empty() {
        println!("{}", "No principals have been created yet.".yellow());
        return Ok(None);
    }
    ids.sort();

    let labels: Vec<String> = ids.iter().map(ToString::to_string).collect();
    let choice = Select::new()
        .with_prompt("Select a principal")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(Some(ids[choice]))
}

fn shorten(service: &ShortenerService, config: &Config, owner: PrincipalId) -> Result<()> {
    let destination: String = Input::new()
        .with_prompt("Destination URL")
        .interact_text()?;

    let click_limit = prompt_bounded(
        "Click limit",
        config.default_click_limit,
        config.max_click_limit,
    )?;
    let ttl_seconds = prompt_bounded(
        "Lifetime in seconds",
        config.default_link_lifetime_seconds,
        config.max_link_lifetime_seconds,
    )?;

    match service.build_short_url(owner, &destination, click_limit, ttl_seconds) {
        Ok(short) => println!("Short link created: {}", short.green().bold()),
        Err(e) => report(&e),
    }
    Ok(())
}

fn resolve(service: &ShortenerService, owner: PrincipalId) -> Result<()> {
    let short: String = Input::new().with_prompt("Short link").interact_text()?;

    match service.restore_long_url(owner, &short) {
        Ok(destination) => println!("Destination: {}", destination.green()),
        Err(e) => report(&e),
    }
    Ok(())
}

fn list(service: &ShortenerService, owner: PrincipalId) -> Result<()> {
    match service.list_links(owner) {
        Ok(links) if links.is_empty() => {
            println!("{}", "You have no links.".yellow());
        }
        Ok(links) => {
            println!("Your links:");
            for (short, snapshot) in &links {
                println!(
                    "  {} -> {} | {} clicks left | {} s left",
                    short.cyan(),
                    snapshot.destination,
                    snapshot.remaining_clicks,
                    snapshot.remaining_lifetime_seconds
                );
            }
        }
        Err(e) => report(&e),
    }
    Ok(())
}

fn export_json(service: &ShortenerService, owner: PrincipalId) -> Result<()> {
    match service.list_links(owner) {
        Ok(links) => {
            let json = serde_json::to_string_pretty(&links)
                .context("Failed to serialize link snapshots")?;
            println!("{json}");
        }
        Err(e) => report(&e),
    }
    Ok(())
}

fn delete(service: &ShortenerService, owner: PrincipalId) -> Result<()> {
    let short: String = Input::new()
        .with_prompt("Short link to delete")
        .interact_text()?;

    let confirmed = Confirm::new()
        .with_prompt(format!("Delete {short}?"))
        .default(false)
        .interact()?;
    if !confirmed {
        return Ok(());
    }

    match service.delete_link(owner, &short) {
        Ok(true) => println!("{}", "Link deleted.".green()),
        Ok(false) => println!("{}", "Link not found or not owned by you.".yellow()),
        Err(e) => report(&e),
    }
    Ok(())
}

fn update_limit(service: &ShortenerService, config: &Config, owner: PrincipalId) -> Result<()> {
    let short: String = Input::new()
        .with_prompt("Short link to update")
        .interact_text()?;
    let new_limit = prompt_bounded("New click limit", None, config.max_click_limit)?;

    match service.update_click_limit(owner, &short, new_limit) {
        Ok(true) => println!("{}", "Click limit updated; consumed clicks reset.".green()),
        Ok(false) => println!("{}", "Link not found or not owned by you.".yellow()),
        Err(e) => report(&e),
    }
    Ok(())
}

/// Prompts for a positive number no greater than `max`, re-asking on bad
/// input.
fn prompt_bounded(prompt: &str, default: Option<u64>, max: u64) -> Result<u64> {
    let mut input = Input::<u64>::new()
        .with_prompt(format!("{prompt} (max {max})"))
        .validate_with(|value: &u64| {
            if *value == 0 {
                Err("must be positive")
            } else if *value > max {
                Err("exceeds the configured maximum")
            } else {
                Ok(())
            }
        });
    if let Some(value) = default {
        input = input.default(value);
    }

    Ok(input.interact_text()?)
}

/// Renders a service failure without terminating the session.
fn report(error: &AppError) {
    println!("{} {}", "Error:".red().bold(), error);
}
