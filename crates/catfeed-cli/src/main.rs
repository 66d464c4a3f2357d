use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use catfeed_commerce::{
    fetch_and_enrich_products, fetch_and_enrich_products_with_deadline, CommerceClient,
    Pagination, PipelineOptions, RetryPolicy,
};

#[derive(Debug, Parser)]
#[command(name = "catfeed-cli")]
#[command(about = "Commerce catalog enrichment pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the catalog, enrich it with categories and stock levels, and
    /// emit the result as JSON for the downstream feed layer.
    ExportProducts {
        /// Override the configured products-per-page.
        #[arg(long)]
        page_size: Option<u32>,
        /// Override the configured page cap.
        #[arg(long)]
        max_pages: Option<u32>,
        /// Write JSON here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = catfeed_core::load_app_config().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.clone())),
        )
        .init();
    match cli.command {
        Commands::ExportProducts {
            page_size,
            max_pages,
            output,
        } => export_products(&config, page_size, max_pages, output).await,
    }
}

async fn export_products(
    config: &catfeed_core::AppConfig,
    page_size: Option<u32>,
    max_pages: Option<u32>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let client = CommerceClient::new(
        &config.base_url,
        &config.admin_token,
        config.request_timeout_secs,
        &config.user_agent,
        RetryPolicy {
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        },
    )
    .context("failed to build commerce client")?;

    let options = PipelineOptions {
        pagination: Pagination {
            page_size: page_size.unwrap_or(config.page_size),
            max_pages: max_pages.unwrap_or(config.max_pages),
        },
        category_batch_size: config.category_batch_size,
        inventory_batch_size: config.inventory_batch_size,
        max_concurrent: config.max_concurrent,
        inter_chunk_delay_ms: config.inter_chunk_delay_ms,
    };

    let result = match config.pipeline_deadline_secs {
        Some(secs) => {
            fetch_and_enrich_products_with_deadline(
                &client,
                &options,
                Duration::from_secs(secs),
            )
            .await
        }
        None => fetch_and_enrich_products(&client, &options).await,
    }
    .context("product enrichment pipeline failed")?;

    tracing::info!(
        products = result.metrics.processed_products,
        unique_categories = result.metrics.unique_categories,
        product_api_calls = result.metrics.product_api_calls,
        category_api_calls = result.metrics.category_api_calls,
        stock_api_calls = result.metrics.stock_api_calls,
        total_api_calls = result.metrics.total_api_calls,
        elapsed_ms = result.metrics.elapsed_ms,
        "export complete"
    );

    let rendered =
        serde_json::to_string_pretty(&result.products).context("failed to serialize products")?;

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote enriched products");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
