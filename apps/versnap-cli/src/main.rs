use std::ffi::OsString;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use versnap_common::SnapshotLayout;
use versnap_persist::Snapshotter;

/// Archive `src/` into `submits/<version>.zip` and bump `submits/version.txt`.
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(name = "versnap", about = "Save a numbered zip snapshot of src/")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Parse `args`, falling back to defaults on anything unrecognised.
    ///
    /// Arguments never change what gets archived or printed.
    fn parse_lenient<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).unwrap_or_default()
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_lenient(std::env::args_os());

    // stdout is reserved for the confirmation line.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let layout = SnapshotLayout::default();
    debug!(?layout, "starting snapshot");

    let mut snapshotter = Snapshotter::from_layout(layout);
    let receipt = snapshotter.run(&mut std::io::stdout().lock())?;
    debug!(
        version = %receipt.version,
        entries = receipt.entries,
        sha256 = %receipt.sha256,
        "snapshot complete"
    );

    Ok(())
}
