//! CLI entry point for `invitecopy`.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use invitecopy::config::Config;
use invitecopy::controller::{ClickOutcome, DisplayOutcome, InviteAction};
use invitecopy::host::local::LocalHost;
use invitecopy::model::summary::MeetingSummary;
use invitecopy::parser::{eml, mbox::MboxReader, summarize_message};

#[derive(Parser)]
#[command(
    name = "invitecopy",
    version,
    about = "Copy start, end and join link of a Teams invite found in an email"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the meeting summary of an .eml file
    Extract {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Show whether the invite action would be enabled, and with which icon
    Show { path: PathBuf },
    /// Copy the meeting summary of an .eml file to the clipboard
    Copy { path: PathBuf },
    /// List the messages of an MBOX that carry an invite
    Scan {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = invitecopy::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Extract { path, json } => cmd_extract(&path, json),
        Commands::Show { path } => cmd_show(&path, &config).await,
        Commands::Copy { path } => cmd_copy(&path, &config).await,
        Commands::Scan { path, json } => cmd_scan(&path, json),
        Commands::InitConfig { force } => cmd_init_config(force),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = invitecopy::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "invitecopy.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Print the summary of one message.
fn cmd_extract(path: &Path, json: bool) -> anyhow::Result<()> {
    let raw = eml::read_message(path)?;
    let Some(summary) = summarize_message(&raw)? else {
        anyhow::bail!("No calendar invite found in {}", path.display());
    };

    if json {
        let output = SummaryJson::new(&summary);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

/// Dispatch a display event for a message and report the toolbar state.
async fn cmd_show(path: &Path, config: &Config) -> anyhow::Result<()> {
    let mut host = LocalHost::new(config);
    let (tab, message) = host.open_file(path)?;
    let action = InviteAction::new(host, config.icons.clone());

    let outcome = action.on_message_displayed(tab, &message).await;
    let state = action.host().action_state();

    match outcome {
        DisplayOutcome::Enabled(theme) => {
            println!("  {:<10} enabled", "Action");
            println!("  {:<10} {}", "Theme", theme);
            println!("  {:<10} {}", "Icon", state.icon.as_deref().unwrap_or("-"));
        }
        DisplayOutcome::Disabled => {
            println!("  {:<10} disabled (no calendar invite)", "Action");
        }
        DisplayOutcome::Failed(reason) => {
            println!("  {:<10} disabled ({reason})", "Action");
        }
    }
    Ok(())
}

/// Display a message, then click the action, copying its summary.
async fn cmd_copy(path: &Path, config: &Config) -> anyhow::Result<()> {
    let mut host = LocalHost::new(config);
    let (tab, message) = host.open_file(path)?;
    let action = InviteAction::new(host, config.icons.clone());

    if let DisplayOutcome::Disabled = action.on_message_displayed(tab, &message).await {
        anyhow::bail!("No calendar invite found in {}", path.display());
    }

    match action.on_action_clicked(tab).await {
        ClickOutcome::Copied(summary) => {
            eprintln!("  Copied meeting summary ({})", summary.url);
            Ok(())
        }
        ClickOutcome::NoInvite => {
            anyhow::bail!("No calendar invite found in {}", path.display())
        }
        ClickOutcome::Failed(reason) => anyhow::bail!("Nothing copied: {reason}"),
    }
}

/// List the messages of an MBOX carrying an invite.
fn cmd_scan(path: &Path, json: bool) -> anyhow::Result<()> {
    let file_size = std::fs::metadata(path)?.len();
    let pb = ProgressBar::new(file_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Scanning [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let mut reader = MboxReader::open(path)?;
    let mut found = Vec::new();
    let mut total: u64 = 0;

    while let Some(message) = reader.next() {
        let message = message?;
        total += 1;
        pb.set_position(reader.bytes_read());

        let raw = String::from_utf8_lossy(&message.raw);
        match summarize_message(&raw) {
            Ok(Some(summary)) => {
                let subject = eml::message_subject(&message.raw).unwrap_or_default();
                found.push((message.sequence, subject, summary));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    sequence = message.sequence,
                    offset = message.offset,
                    error = %e,
                    "Skipping unreadable invite"
                );
            }
        }
    }
    pb.finish_and_clear();

    if json {
        let output = ScanJson {
            messages: total,
            invites: found
                .iter()
                .map(|(sequence, subject, summary)| ScanItemJson {
                    sequence: *sequence,
                    subject,
                    summary: SummaryJson::new(summary),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("  {} invite(s) in {} message(s)", found.len(), total);
    println!();
    for (sequence, subject, summary) in &found {
        println!("  #{sequence:<6} {subject}");
        for line in summary.to_string().lines() {
            println!("          {line}");
        }
        println!();
    }
    Ok(())
}

/// JSON form of a summary: its fields plus the clipboard text.
#[derive(Serialize)]
struct SummaryJson<'a> {
    #[serde(flatten)]
    summary: &'a MeetingSummary,
    text: String,
}

impl<'a> SummaryJson<'a> {
    fn new(summary: &'a MeetingSummary) -> Self {
        Self {
            summary,
            text: summary.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ScanItemJson<'a> {
    sequence: u64,
    subject: &'a str,
    #[serde(flatten)]
    summary: SummaryJson<'a>,
}

#[derive(Serialize)]
struct ScanJson<'a> {
    messages: u64,
    invites: Vec<ScanItemJson<'a>>,
}

/// Write the default configuration to the standard location.
fn cmd_init_config(force: bool) -> anyhow::Result<()> {
    let path = invitecopy::config::config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    invitecopy::config::save_config(&Config::default())?;
    println!("  Wrote {}", path.display());
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "invitecopy", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
