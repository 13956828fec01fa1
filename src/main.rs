mod cli;
mod update;
mod webhook;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Input};
use crate::webhook::WebhookClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap runs so file-sourced variables join the
    // flag > env > default fallback chain
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tgsim=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let profile = cli.profile();

    let update = match cli.input() {
        Input::Command(command) => update::command_update(&profile, &command),
        Input::Text(text) => update::message_update(&profile, &text),
        Input::Callback(data) => update::callback_update(&profile, &data),
    };

    println!("{}", "=".repeat(80));
    println!("WARNING: this sends a real webhook request to your bot deployment!");
    println!(
        "WARNING: replies will reach Telegram user id {}",
        profile.user_id
    );
    println!("WARNING: use --user-id with a throwaway id to keep your own chat clean");
    println!("{}", "=".repeat(80));
    println!("Sending update to {}...", cli.webhook_url);
    println!("Update type: {}", update.kind());
    println!("Update data: {}", serde_json::to_string_pretty(&update)?);
    println!("{}", "-".repeat(80));

    let client = WebhookClient::new(cli.webhook_url.clone(), cli.secret_token.clone())?;
    let delivery = client.send(&update).await?;

    println!("Response status: {}", delivery.status);
    println!("Response body: {}", delivery.body);
    println!("{}", "-".repeat(80));

    // Delivery is the job; whether the bot liked the update is the
    // operator's call, so a non-2xx status still exits zero
    if delivery.status.is_success() {
        println!("[OK] update accepted by the webhook");
    } else {
        println!(
            "[WARN] webhook answered {}; check the bot's logs to judge the outcome",
            delivery.status
        );
    }

    Ok(())
}
