//! SegmentScribe CLI entry point

use std::process::ExitCode;

use clap::Parser;

use segment_scribe::cli::{
    app::{run_discard, run_retry, run_transcribe, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use segment_scribe::infrastructure::{init_tracing, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = XdgConfigStore::new();

    match cli.command {
        Commands::Transcribe(args) => run_transcribe(args, &store).await,
        Commands::Retry {
            session,
            only,
            output,
        } => run_retry(&session, only, output.as_deref(), &store).await,
        Commands::Discard { session } => run_discard(&session).await,
        Commands::Config { action } => {
            let presenter = Presenter::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
    }
}
