use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod output;
mod progress;
mod ui;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("sheetgate error: {error:#}");
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded; `false` maps to exit code 1.
async fn run() -> anyhow::Result<bool> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    let project_root = bootstrap::resolve_project_root(&flags)?;

    match &cli.command {
        Some(cli::Commands::Hook { action }) => {
            commands::hook::handle(action, &flags, &project_root).await
        }
        Some(cli::Commands::Generate(args)) => {
            commands::generate::handle(args, &flags, &project_root).await?;
            Ok(true)
        }
        None => {
            let config = bootstrap::load_config(&project_root);
            commands::check::handle(&cli.check, &flags, &project_root, &config).await
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SHEETGATE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
