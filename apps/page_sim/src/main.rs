mod driver;
mod fixture;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use interaction_core::{
    discovery::discover, HttpSubmissionTransport, PageController, SubmissionTransport,
};
use shared::config::{apply_env_overrides, load_settings, load_settings_from, SiteSettings};
use tracing_subscriber::EnvFilter;

use crate::{driver::Driver, fixture::PageFixture};

/// Drives the page interaction controller against a JSON page fixture in
/// virtual time and prints the resulting document.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    page: PathBuf,
    #[arg(long)]
    script: Option<PathBuf>,
    /// Settings file; defaults to `site.toml` plus `SITE__*` overrides.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => {
            let mut settings = load_settings_from(path)?;
            apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
            settings
        }
        None => load_settings(),
    };
    settings.validate()?;

    let dom = PageFixture::load(&args.page)?.build();
    let handles = discover(&dom);
    let mut controller = PageController::new(dom, handles, &settings);
    let subscriptions = controller.attach();
    tracing::info!(subscriptions, page = %args.page.display(), "page attached");

    let mut driver = Driver::new(controller, transport_for(&settings)?);
    if let Some(script) = &args.script {
        let steps = driver::load_script(script)?;
        driver.run(&steps).await?;
    }

    println!("{}", serde_json::to_string_pretty(&driver.snapshot())?);
    Ok(())
}

fn transport_for(settings: &SiteSettings) -> Result<Option<Box<dyn SubmissionTransport>>> {
    let Some(endpoint) = &settings.submit_endpoint else {
        return Ok(None);
    };
    let transport = HttpSubmissionTransport::new(
        endpoint,
        Duration::from_millis(settings.submit_timeout_ms),
    )?;
    tracing::info!(endpoint = %transport.endpoint(), "submissions delivered over HTTP");
    Ok(Some(Box::new(transport)))
}
