//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, FetchArgs};
use crate::config::Settings;
use crate::engine::{Collator, RunSummary};
use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::PagePathPaginator;
use crate::shutdown::ShutdownSignal;
use tracing::{error, info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch(args) => {
                let settings = self.load_settings(args)?;
                let shutdown = ShutdownSignal::new();
                shutdown.install_ctrl_c_handler();

                let summary = Self::fetch(&settings, shutdown).await?;
                println!("{summary}");
                Ok(())
            }
            Commands::ShowConfig(args) => {
                let settings = self.load_settings(args)?;
                println!("{}", serde_json::to_string_pretty(&settings.masked())?);
                Ok(())
            }
        }
    }

    /// Settings file (if any) with command-line overrides applied
    fn load_settings(&self, args: &FetchArgs) -> Result<Settings> {
        let mut settings = match &self.cli.settings {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };
        args.apply(&mut settings);
        Ok(settings)
    }

    /// Validate settings, wire up the pipeline, and run it to completion
    pub async fn fetch(settings: &Settings, shutdown: ShutdownSignal) -> Result<RunSummary> {
        settings.validate()?;

        let http_config = HttpClientConfig::builder()
            .retry(settings.rate_limiting.retry_policy())
            .rate_limit(settings.rate_limiting.rate_limiter_config())
            .build();
        let client = HttpClient::with_config(http_config)?.with_shutdown(shutdown);

        let fetcher = PageFetcher::new(client, &settings.bearer_token);
        let paginator = PagePathPaginator::new(&settings.base_url, settings.total_pages);
        let collator = Collator::new(fetcher, Box::new(paginator));

        info!(
            base_url = %settings.base_url,
            pages = settings.total_pages,
            output = %settings.output_path.display(),
            "Starting run"
        );

        match collator.run_to_file(&settings.output_path).await {
            Ok(summary) => {
                info!(
                    pages = summary.stats.pages_fetched,
                    bytes = summary.file_size,
                    path = %summary.path.display(),
                    "Run complete in {:.2?}",
                    summary.stats.elapsed
                );
                Ok(summary)
            }
            Err(e) if e.is_cancelled() => {
                warn!(error = %e, "Run cancelled; output left incomplete");
                Err(e)
            }
            Err(e) => {
                error!(error = %e, "Run failed");
                Err(e)
            }
        }
    }
}
