// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `zapsend send`: connect, load contacts, confirm, dispatch.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use zapsend_config::ZapsendConfig;
use zapsend_config::model::DispatchConfig;
use zapsend_contacts::source_for_path;
use zapsend_core::{
    ContactSource, DeliveryResult, DispatchSummary, MediaAttachment, MediaKind, ZapsendError,
};
use zapsend_dispatch::{DeliveryDispatcher, DispatchPlan, render_template};

use crate::setup::{build_gateway, connect_session};

/// Message used when neither the command line nor the config provides one.
pub const DEFAULT_TEMPLATE: &str = "Hello, {name}!

We help local businesses grow their online presence with modern websites, \
booking systems and WhatsApp integration.

Would you like to know more? Just reply to this message.";

#[derive(Args, Debug)]
pub struct SendArgs {
    /// CSV or .xlsx file with columns: name, phone, address, rating, website.
    pub contacts: PathBuf,

    /// Message template. Placeholders: {name} {phone} {address} {rating} {website}.
    pub message: Vec<String>,

    /// Read the message template from a file.
    #[arg(long, conflicts_with = "message")]
    pub template_file: Option<PathBuf>,

    /// Seconds to wait between sends (overrides config).
    #[arg(long)]
    pub delay: Option<f64>,

    /// Do not check that recipients use WhatsApp before sending.
    #[arg(long)]
    pub no_verify: bool,

    /// Send this media URL with the message as caption.
    #[arg(long, requires = "media_kind")]
    pub media_url: Option<String>,

    /// Kind of media given with --media-url.
    #[arg(long, value_parser = parse_media_kind)]
    pub media_kind: Option<MediaKind>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

fn parse_media_kind(raw: &str) -> Result<MediaKind, String> {
    raw.parse::<MediaKind>()
        .map_err(|_| format!("`{raw}` is not one of image, video, audio, document"))
}

/// Picks the template: inline arguments, then `--template-file`, then the
/// configured file, then the configured inline template, then the default.
pub fn resolve_template(args: &SendArgs, config: &DispatchConfig) -> Result<String, ZapsendError> {
    if !args.message.is_empty() {
        return Ok(args.message.join(" "));
    }
    if let Some(path) = args.template_file.as_ref().or(config.template_file.as_ref()) {
        return std::fs::read_to_string(path)
            .map(|t| t.trim_end().to_string())
            .map_err(|e| {
                ZapsendError::Config(format!("cannot read template {}: {e}", path.display()))
            });
    }
    Ok(config
        .template
        .clone()
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()))
}

/// Builds the dispatch plan from config with command-line overrides.
pub fn build_plan(
    args: &SendArgs,
    config: &DispatchConfig,
    template: String,
) -> Result<DispatchPlan, ZapsendError> {
    let mut plan = DispatchPlan::from_config(template, config);
    if let Some(secs) = args.delay {
        if !(0.0..=zapsend_config::MAX_SECS as f64).contains(&secs) {
            return Err(ZapsendError::Config(format!(
                "--delay must be between 0 and {} seconds, got {secs}",
                zapsend_config::MAX_SECS
            )));
        }
        plan = plan.with_delay(Duration::from_secs_f64(secs));
    }
    if args.no_verify {
        plan = plan.with_verify(false);
    }
    if let (Some(url), Some(kind)) = (&args.media_url, args.media_kind) {
        plan = plan.with_media(MediaAttachment {
            url: url.clone(),
            kind,
        });
    }
    Ok(plan)
}

fn confirmed(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "sim"
    )
}

fn ask_confirmation() -> Result<bool, ZapsendError> {
    print!("\nContinue? (y/N): ");
    std::io::stdout()
        .flush()
        .map_err(|e| ZapsendError::Internal(format!("failed to flush stdout: {e}")))?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| ZapsendError::Internal(format!("failed to read answer: {e}")))?;
    Ok(confirmed(&answer))
}

pub async fn run_send(
    config: &ZapsendConfig,
    args: SendArgs,
    cancel: CancellationToken,
) -> Result<(), ZapsendError> {
    let template = resolve_template(&args, &config.dispatch)?;
    let plan = build_plan(&args, &config.dispatch, template)?;

    let gateway = build_gateway(config)?;
    connect_session(config, gateway.clone(), cancel.clone()).await?;

    println!("\nLoading contacts from {}", args.contacts.display());
    let contacts = source_for_path(&args.contacts).load()?;
    let Some(first) = contacts.first() else {
        return Err(ZapsendError::EmptyInput(format!(
            "no contacts with a valid phone in {}",
            args.contacts.display()
        )));
    };
    println!("{} {} contacts with a valid phone", "✓".green(), contacts.len());

    println!("\nMessage preview:");
    println!("{}", "-".repeat(40));
    println!("{}", render_template(&plan.template, first));
    println!("{}", "-".repeat(40));
    if let Some(media) = &plan.media {
        println!("Attached {}: {}", media.kind, media.url);
    }

    if args.yes {
        println!("\nConfirmation skipped (--yes). Starting delivery...");
    } else if !ask_confirmation()? {
        println!("Aborted.");
        return Ok(());
    }

    info!(contacts = contacts.len(), "dispatch confirmed");
    let dispatcher = DeliveryDispatcher::new(gateway, config.session.name.clone(), cancel);
    let summary = dispatcher.dispatch(&contacts, &plan).await;
    print_summary(&summary);

    if summary.cancelled() {
        return Err(ZapsendError::Cancelled);
    }
    Ok(())
}

fn print_summary(summary: &DispatchSummary) {
    println!();
    for record in summary.records() {
        match &record.result {
            DeliveryResult::Sent => {}
            DeliveryResult::Failed(reason) => {
                println!("  {} {} ({}): {reason}", "✗".red(), record.name, record.phone)
            }
            DeliveryResult::Skipped(reason) => {
                println!("  {} {} ({}): {reason}", "-".yellow(), record.name, record.phone)
            }
        }
    }
    println!("{}", "Summary".bold());
    println!("  {} sent:    {}", "✓".green(), summary.sent());
    println!("  {} failed:  {}", "✗".red(), summary.failed());
    println!("  {} skipped: {}", "-".yellow(), summary.skipped());
    println!("  total:     {}", summary.total());
    if summary.cancelled() {
        println!("  {}", "cancelled before all contacts were processed".yellow());
    }
}
