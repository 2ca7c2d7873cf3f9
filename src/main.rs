//! email-harvest CLI
//!
//! Search a directory of documents for email addresses.

use clap::Parser;
use email_harvest::{Dispatcher, report, scan_tree};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "email-harvest",
    about = "Search a directory containing documents for email addresses"
)]
struct Cli {
    /// Directory containing documents
    directory: PathBuf,

    /// File to write found email addresses to
    #[arg(short, long, default_value = "emails_out.txt")]
    outfile: PathBuf,
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let dispatcher = Dispatcher::with_defaults();
    let outcome = scan_tree(&cli.directory, &dispatcher);

    report(&outcome, &cli.directory, &cli.outfile)
}
