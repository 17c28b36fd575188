//! CLI for imgfetch.

mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use imgfetch_core::config::{self, FetcherConfig};
use imgfetch_core::{report, Fetcher};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Fetch one image from the web and save it locally.
#[derive(Debug, Parser)]
#[command(name = "imgfetch")]
#[command(about = "Fetch a single image over HTTP(S) into Fetched_Images", long_about = None)]
pub struct Cli {
    /// Image URL. Prompted for on stdin when omitted.
    pub url: Option<String>,

    /// Directory to save into (default: Fetched_Images, or `output_dir` from config.toml).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        let cfg = match config::load_or_default() {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!("ignoring config: {:#}", err);
                FetcherConfig::default()
            }
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let stdin = io::stdin();
        let stdout = io::stdout();
        cli.run(cfg, &mut stdin.lock(), &mut stdout.lock())
    }

    /// Banner, URL (argument or prompt), one fetch, report.
    ///
    /// Every fetch outcome is printed and yields `Ok`; `Err` means `out` itself failed.
    pub fn run<R: BufRead, W: Write>(
        self,
        mut cfg: FetcherConfig,
        input: &mut R,
        out: &mut W,
    ) -> Result<()> {
        if let Some(dir) = self.output_dir {
            cfg.output_dir = dir;
        }

        report::banner(out).context("write banner")?;

        let url = match self.url {
            Some(url) => url.trim().to_string(),
            None => match prompt::read_url(input, out) {
                Ok(url) => url,
                Err(err) => {
                    tracing::warn!("no URL read: {}", err);
                    report::failure(out, &err).context("write report")?;
                    return Ok(());
                }
            },
        };

        let fetcher = Fetcher::new(cfg);
        let outcome = fetcher
            .fetch_and_report(&url, out)
            .context("write report")?;
        match outcome {
            Ok(fetched) => tracing::info!(
                "fetched {} -> {} ({} bytes)",
                url,
                fetched.path.display(),
                fetched.bytes_written
            ),
            Err(err) => tracing::info!("fetch of {} failed ({:?})", url, err.kind()),
        }
        out.flush().context("flush stdout")?;
        Ok(())
    }
}
