use anyhow::Result;
use colored::*;
use std::path::PathBuf;
use tracing::debug;

use rename_ai::{
    cli,
    config::{Config, API_KEY_ENV},
    console::{ConsoleUi, Ui},
    errors::RenameError,
    file_analyzer::{FileSystem, OsFileSystem},
    logging,
    pipeline::RenamePipeline,
    providers::GeminiProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build().get_matches();
    logging::init(matches.get_count("verbose"));

    if let Err(e) = run(&matches).await {
        eprintln!("{}: {}", "Error".red().bold(), e);

        if matches!(
            e.downcast_ref::<RenameError>(),
            Some(RenameError::MissingApiKey(_))
        ) {
            eprintln!("\n{}", "💡 Tip: Make sure to set your API key:".yellow());
            eprintln!("  export {}=your_key_here", API_KEY_ENV);
        }

        std::process::exit(1);
    }

    Ok(())
}

async fn run(matches: &clap::ArgMatches) -> Result<()> {
    // A missing file is reported before a missing API key.
    let fs = OsFileSystem;
    if let Some(file) = matches.get_one::<PathBuf>("file") {
        if !fs.exists(file) {
            return Err(RenameError::NotFound(file.clone()).into());
        }
    }

    let config = Config::from_matches(matches)?;
    debug!(?config, "resolved configuration");

    let mut console = ConsoleUi::stdio();
    let provider = GeminiProvider::from_config(&config).map_err(RenameError::from)?;
    console.print_model_info(provider.get_model_name());

    let outcome = RenamePipeline::new(&fs, &provider, &mut console, config.dry_run)
        .run(&config.file)
        .await?;
    debug!(?outcome, "finished");

    Ok(())
}
