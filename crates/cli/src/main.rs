mod config_commands;
mod submit_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    medcheck_wizard::{HttpBackend, WizardController, terminal},
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "medcheck", about = "Medication & food intake checker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Backend endpoint (overrides MEDCHECK_API_URL and the config file).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file to use instead of searching ./ and ~/.config/medcheck/.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive wizard (default when no subcommand is provided).
    Check,
    /// Submit one check without prompting and print the response.
    Submit {
        #[command(subcommand)]
        form: submit_commands::SubmitForm,
    },
    /// Configuration helpers.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

/// Logs go to stderr so the wizard owns stdout.
fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn backend(cli: &Cli) -> anyhow::Result<HttpBackend> {
    let url = medcheck_config::resolve_endpoint(cli.api_url.as_deref(), cli.config.as_deref())?;
    debug!(%url, "using backend");
    Ok(HttpBackend::new(url))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let mut cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "medcheck starting");

    match cli.command.take() {
        None | Some(Commands::Check) => {
            let mut controller = WizardController::new(backend(&cli)?);
            let stdin = std::io::stdin();
            let mut reader = stdin.lock();
            let mut stdout = std::io::stdout();
            terminal::run_session(&mut controller, &mut reader, &mut stdout).await?;
            Ok(())
        },
        Some(Commands::Submit { form }) => {
            let mut controller = WizardController::new(backend(&cli)?);
            let response = submit_commands::handle_submit(&mut controller, form).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        },
        Some(Commands::Config { action }) => {
            config_commands::handle_config(action, cli.api_url.as_deref(), cli.config.as_deref())
        },
    }
}
