use std::sync::Arc;

use anyhow::Context;
use tokio::io::BufReader;

use airsafe::api::{AirSafeApi, HttpApi, RecommendationClient, ReferenceDataCache};
use airsafe::cli::{self, WizardPrompt};
use airsafe::config::ClientConfig;
use airsafe::results::{FileResultStore, ResultStore, render_bundle};
use airsafe::submission::SubmissionPipeline;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with wizard prompts.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    let store: Arc<dyn ResultStore> = Arc::new(FileResultStore::new(&config.results_path));

    if std::env::args().skip(1).any(|a| a == "--show") {
        match store.get().await.context("reading stored results")? {
            Some(bundle) => println!("{}", render_bundle(&bundle)),
            None => eprintln!("No stored results at {}", config.results_path.display()),
        }
        return Ok(());
    }

    eprintln!("🌬️  AirSafe v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Service: {}", config.api_url);
    eprintln!("   Results: {}", config.results_path.display());
    eprintln!("   Type < at any prompt to go back.\n");

    let api: Arc<dyn AirSafeApi> =
        Arc::new(HttpApi::new(&config).context("invalid client configuration")?);
    let reference = ReferenceDataCache::new(Arc::clone(&api), config.request_timeout);
    let client = RecommendationClient::new(api, config.request_timeout);
    let pipeline = SubmissionPipeline::new(client, store);

    let mut prompt = WizardPrompt::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    match cli::run(&mut prompt, &reference, &pipeline).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => {
            eprintln!("Submission abandoned.");
            Ok(())
        }
        Err(e) if e.is_input_closed() => {
            eprintln!("\nInput closed; nothing submitted.");
            Ok(())
        }
        Err(e) => Err(e).context("wizard failed"),
    }
}
