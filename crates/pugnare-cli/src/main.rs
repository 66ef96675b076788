mod catalog;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pugnare_core::{CatalogRules, Validator};
use pugnare_fda::client::FDA_LABEL_API;
use pugnare_fda::{FdaLabelClient, LookupConfig, Reconciler, cancellation};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pugnare", version, about = "Medication catalog FDA label reconciliation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check label dates against openFDA, validate, and write the annotated catalog.
    Check(CheckArgs),
    /// Validate the catalog without contacting openFDA.
    Validate {
        /// Directory holding one JSON file per product.
        #[arg(long, env = "PUGNARE_CATALOG", default_value = "catalog")]
        catalog: PathBuf,
    },
}

#[derive(Args)]
struct CheckArgs {
    /// Directory holding one JSON file per product.
    #[arg(long, env = "PUGNARE_CATALOG", default_value = "catalog")]
    catalog: PathBuf,

    /// Where to write the annotated catalog (stdout if omitted).
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Skip the openFDA phase entirely.
    #[arg(long, env = "PUGNARE_SKIP_FDA")]
    skip_fda: bool,

    /// openFDA drug label search endpoint.
    #[arg(long, env = "PUGNARE_FDA_API", default_value = FDA_LABEL_API)]
    fda_api: String,

    /// Seconds between openFDA requests (at most one day).
    #[arg(
        long,
        default_value_t = 2,
        value_parser = clap::value_parser!(u64).range(0..=86_400)
    )]
    interval_secs: u64,

    /// Results requested per search.
    #[arg(long, default_value_t = 30)]
    page_size: u32,
}

impl CheckArgs {
    fn lookup_config(&self) -> LookupConfig {
        LookupConfig {
            api_base: self.fda_api.clone(),
            page_size: self.page_size,
            interval: Duration::from_secs(self.interval_secs),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    info!("pugnare v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Command::Check(args) => check(args).await,
        Command::Validate { catalog } => {
            let products = catalog::load_catalog(&catalog)?;
            Validator::new(CatalogRules::default())
                .validate_catalog(&products)
                .context("catalog validation failed")?;
            Ok(())
        }
    }
}

async fn check(args: CheckArgs) -> anyhow::Result<()> {
    let rules = CatalogRules::default();
    let mut products = catalog::load_catalog(&args.catalog)?;

    if args.skip_fda {
        info!("skipping FDA label check");
    } else {
        let client =
            FdaLabelClient::new(&args.lookup_config()).context("building FDA label client")?;
        let reconciler = Reconciler::new(client, rules.clone());

        let (handle, token) = cancellation();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, canceling FDA label lookup");
                handle.cancel();
            }
        });

        let report = reconciler
            .reconcile(&mut products, &token)
            .await
            .context("FDA label check failed")?;
        for brand in &report.flagged {
            warn!(brand = %brand, "FDA label needs update");
        }
    }

    Validator::new(rules)
        .validate_catalog(&products)
        .context("catalog validation failed")?;

    catalog::sort_for_display(&mut products);
    catalog::write_catalog(&products, args.output.as_deref())
}
