//! Send Email
//!
//! Sends one email through Unsend using configuration from the environment
//! (`UNSEND_API_KEY`, `UNSEND_FROM_ADDRESS`, `UNSEND_URL`, ...).

use clap::Parser;
use email_unsend::{AdapterConfig, Attachment, EmailAdapter, OutboundMessage, UnsendAdapter};
use eyre::{Result, WrapErr, eyre};
use std::path::{Path, PathBuf};
use tracing::info;

mod telemetry;

#[derive(Parser)]
#[command(name = "send-email")]
#[command(about = "Send an email through the Unsend REST API")]
struct Cli {
    /// Recipients, comma separated
    #[arg(short, long, value_delimiter = ',', required_unless_present_any = ["message", "check"])]
    to: Vec<String>,

    /// Sender, e.g. "Name <sender@example.com>". Defaults to the configured sender.
    #[arg(short, long)]
    from: Option<String>,

    #[arg(long, value_delimiter = ',')]
    cc: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    bcc: Vec<String>,

    #[arg(long)]
    reply_to: Option<String>,

    #[arg(short, long)]
    subject: Option<String>,

    /// Plain text body
    #[arg(long)]
    text: Option<String>,

    /// File holding the HTML body
    #[arg(long)]
    html: Option<PathBuf>,

    /// Files to attach
    #[arg(short, long)]
    attach: Vec<PathBuf>,

    /// Read the whole message from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["to", "from", "cc", "bcc", "reply_to", "subject", "text", "html", "attach"])]
    message: Option<PathBuf>,

    /// Only validate the configuration
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::install_color_eyre();
    telemetry::init_tracing(telemetry::is_production());

    let cli = Cli::parse();

    let config = AdapterConfig::from_env().wrap_err("Failed to load Unsend configuration")?;
    let adapter = UnsendAdapter::new(config);

    adapter
        .health_check()
        .await
        .wrap_err("Unsend configuration is invalid")?;

    if cli.check {
        info!(adapter = adapter.name(), "Configuration is valid");
        return Ok(());
    }

    let message = build_message(&cli)?;
    let sent = adapter
        .send_email(&message)
        .await
        .map_err(|e| eyre!("[{}] {}", e.status, e.message))?;

    info!(email_id = %sent.email_id, "Email accepted");
    println!("{}", serde_json::to_string_pretty(&sent)?);

    Ok(())
}

fn build_message(cli: &Cli) -> Result<OutboundMessage> {
    if let Some(path) = &cli.message {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        return serde_json::from_str(&raw)
            .wrap_err_with(|| format!("Invalid message in {}", path.display()));
    }

    let mut message = OutboundMessage::new(recipients(&cli.to));

    if let Some(from) = &cli.from {
        message = message.with_from(from.as_str());
    }
    if !cli.cc.is_empty() {
        message = message.with_cc(recipients(&cli.cc));
    }
    if !cli.bcc.is_empty() {
        message = message.with_bcc(recipients(&cli.bcc));
    }
    if let Some(reply_to) = &cli.reply_to {
        message = message.with_reply_to(reply_to.as_str());
    }
    if let Some(subject) = &cli.subject {
        message = message.with_subject(subject.as_str());
    }
    if let Some(text) = &cli.text {
        message = message.with_text(text.as_str());
    }
    if let Some(path) = &cli.html {
        let html = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        message = message.with_html(html);
    }
    for path in &cli.attach {
        message = message.with_attachment(read_attachment(path)?);
    }

    Ok(message)
}

fn recipients(addresses: &[String]) -> Vec<email_unsend::Address> {
    addresses
        .iter()
        .map(|address| address.trim().into())
        .collect()
}

fn read_attachment(path: &Path) -> Result<Attachment> {
    let content =
        std::fs::read(path).wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| eyre!("Attachment path has no file name: {}", path.display()))?;

    Ok(Attachment::binary(filename, content))
}
