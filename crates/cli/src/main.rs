use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use prodshot_cli::cli::Cli;
use prodshot_cli::download::DownloadWriter;
use prodshot_cli::session::Session;
use prodshot_gemini::{GeminiConfig, GeminiEditor};
use prodshot_pipeline::BatchController;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the rendered items; logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "prodshot=info,prodshot_cli=info,prodshot_pipeline=info,prodshot_gemini=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = GeminiConfig::from_env()?;
    tracing::info!(model = %config.model, "Gemini editor configured");
    let editor = Arc::new(GeminiEditor::new(&config));

    let downloads = DownloadWriter::create(&cli.out_dir)
        .await
        .with_context(|| format!("Cannot use output directory {}", cli.out_dir.display()))?;
    tracing::info!(out_dir = %downloads.out_dir().display(), "Writing edited images");

    let controller = BatchController::new(editor);
    let mut session = Session::new(controller, downloads, std::io::stdout());
    session
        .run(&cli.paths, cli.interactive, BufReader::new(tokio::io::stdin()))
        .await
}
