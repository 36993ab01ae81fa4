//! Command-line interface for bbqctl.
//!
//! This binary talks to the controller daemon over its HTTP API.

use std::env;

use anyhow::Result;

use bbqctl::api_client::{self, types::SettingsPatchRequest};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "status" => cmd_status().await?,
        "settings" => cmd_settings().await?,
        "set" => cmd_set(&args[2..]).await?,
        _ => {
            eprintln!("Unknown command: {}", command);
            eprintln!("Run without arguments to see usage.");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_usage() {
    eprintln!("Usage: bbqctl-cli <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  status               Show temperatures and fan duty");
    eprintln!("  settings             Show control settings");
    eprintln!("  set KEY=VALUE ...    Change settings, e.g. set threshold_f=250 lid_mode=on");
    eprintln!();
    eprintln!("Settings keys:");
    eprintln!("  lid_mode, is_manual, manual_duty_pct, automatic_duty_pct,");
    eprintln!("  threshold_f, bang_bang_window");
    eprintln!();
    eprintln!("Environment:");
    eprintln!(
        "  BBQ_API_URL    API base URL (default: {})",
        api_client::DEFAULT_BASE_URL
    );
}

/// Build an API client, honoring BBQ_API_URL if set.
fn make_client() -> api_client::Client {
    match env::var("BBQ_API_URL") {
        Ok(url) => api_client::Client::with_base_url(url),
        Err(_) => api_client::Client::new(),
    }
}

/// Print a summary of the current controller state.
async fn cmd_status() -> Result<()> {
    let client = make_client();
    let state = client.get_state().await?;

    println!("Session: {}", state.session_id);
    println!("Uptime:  {} s", state.uptime_secs);
    println!(
        "Pit:     {:.1} °F{}",
        state.ambient_temp_f,
        if state.ambient_probe_fault { "  (probe fault)" } else { "" }
    );
    println!(
        "Food:    {:.1} °F{}",
        state.food_temp_f,
        if state.food_probe_fault { "  (probe fault)" } else { "" }
    );
    println!("Fan:     {}%", state.duty_pct);

    match (&state.mode, &state.auto_state) {
        (Some(mode), Some(auto_state)) => println!("Mode:    {} ({})", mode, auto_state),
        (Some(mode), None) => println!("Mode:    {}", mode),
        (None, _) => println!("Mode:    (no report yet)"),
    }

    if state.warming_up {
        println!("Sample window still filling; readings may lag.");
    }

    Ok(())
}

async fn cmd_settings() -> Result<()> {
    let client = make_client();
    let settings = client.get_settings().await?;

    println!("lid_mode:           {}", settings.lid_mode);
    println!("is_manual:          {}", settings.is_manual);
    println!("manual_duty_pct:    {}", settings.manual_duty_pct);
    println!("automatic_duty_pct: {}", settings.automatic_duty_pct);
    println!("threshold_f:        {}", settings.threshold_f);
    println!("bang_bang_window:   {}", settings.bang_bang_window);

    Ok(())
}

async fn cmd_set(assignments: &[String]) -> Result<()> {
    let patch = SettingsPatchRequest::from_assignments(assignments)?;
    if patch.is_empty() {
        eprintln!("Nothing to set. Usage: bbqctl-cli set KEY=VALUE ...");
        std::process::exit(1);
    }

    make_client().patch_settings(&patch).await?;
    cmd_settings().await
}
