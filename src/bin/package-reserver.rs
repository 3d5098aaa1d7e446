//! Package Reserver CLI
//!
//! Reserve an npm package name by publishing a placeholder version from a
//! sanitized, disposable copy of the current project.

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;
use package_reserver::security::TOKEN_ENV_VAR;
use package_reserver::{
    NpmRegistry, PackageReserver, ReservationRequest, ReserveError, ReserveOptions,
    SecureTokenManager,
};
use secrecy::ExposeSecret;
use std::path::PathBuf;
use std::process;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Reserve an npm package name by publishing a placeholder
#[derive(Parser)]
#[command(name = "package-reserver")]
#[command(version = "0.1.0")]
#[command(about = "Reserve an npm package name by publishing a placeholder", long_about = None)]
struct Cli {
    /// Package name to reserve
    #[arg(value_name = "NAME")]
    name_arg: Option<String>,

    /// npm username recorded as the package author
    #[arg(value_name = "USERNAME")]
    username_arg: Option<String>,

    /// Package name to reserve (takes precedence over the positional)
    #[arg(short = 'n', long = "name")]
    name: Option<String>,

    /// npm username (takes precedence over the positional)
    #[arg(short = 'u', long = "user")]
    user: Option<String>,

    /// Template project directory (defaults to current directory)
    #[arg(long, value_name = "PROJECT_PATH")]
    project: Option<PathBuf>,

    /// Skip the pre-publish confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Non-interactive mode (CI/CD)
    #[arg(long)]
    non_interactive: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            if let Some(reserve_error) = e.downcast_ref::<ReserveError>() {
                for action in reserve_error.suggested_actions() {
                    eprintln!("  💡 {}", action);
                }
            }
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    println!("\n📦 package-reserver\n");

    let interactive = std::io::stdin().is_terminal() && !cli.non_interactive;

    let package_name = resolve_field(
        cli.name,
        cli.name_arg,
        "Package name to reserve: ",
        interactive,
    )
    .await?;
    let username = resolve_field(cli.user, cli.username_arg, "npm username: ", interactive).await?;

    let request = ReservationRequest::new(package_name, username);
    request.validate()?;

    // The token is read once here and injected into the publisher;
    // absence aborts before anything is staged.
    let token_manager = SecureTokenManager::new();
    let Some(token) = token_manager.get_token() else {
        return Err(ReserveError::TokenMissing {
            env_var: TOKEN_ENV_VAR.to_string(),
        }
        .into());
    };
    if token_manager.looks_like_placeholder(token.expose_secret()) {
        eprintln!(
            "⚠️  {} looks like a placeholder value ({})",
            TOKEN_ENV_VAR,
            token_manager.mask_token(token.expose_secret())
        );
    }

    let project_path = cli.project.unwrap_or_else(|| PathBuf::from("."));
    let registry = NpmRegistry::new(token);
    let mut reserver = PackageReserver::new(&project_path, Box::new(registry));

    let options = ReserveOptions {
        assume_yes: cli.yes,
        non_interactive: !interactive,
    };

    let report = reserver.reserve(request, options).await?;

    if report.success {
        println!(
            "\n✅ Reserved '{}' ({} ms)",
            report.package_name, report.duration_ms
        );
        for warning in &report.warnings {
            eprintln!("  ⚠️  {}", warning);
        }
        Ok(0)
    } else {
        println!("\n❌ Reservation failed");
        for error in &report.errors {
            eprintln!("  - {}", error);
        }
        Ok(1)
    }
}

/// First non-empty source wins: flag, then positional, then prompt.
///
/// Prompting requires an interactive terminal; otherwise the run fails
/// with a descriptive error before any staging happens.
async fn resolve_field(
    flag: Option<String>,
    positional: Option<String>,
    prompt: &str,
    interactive: bool,
) -> Result<String> {
    if let Some(value) = flag.filter(|v| !v.is_empty()) {
        return Ok(value);
    }
    if let Some(value) = positional.filter(|v| !v.is_empty()) {
        return Ok(value);
    }
    if !interactive {
        return Err(ReserveError::NotInteractive.into());
    }
    prompt_line(prompt).await
}

/// Read one line from the interactive terminal
async fn prompt_line(message: &str) -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(message.as_bytes()).await?;
    stdout.flush().await?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;

    Ok(answer.trim().to_string())
}
