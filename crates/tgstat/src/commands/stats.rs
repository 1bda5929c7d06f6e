//! One-shot statistics command.

use tracing::debug;

use tgstat_core::StatsPoller;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output::RecordPrinter;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (_, client, credentials) = config::connect(global)?;
    let mut poller = StatsPoller::new(client, credentials);

    let out = poller.poll().await?;
    debug!(warnings = out.warnings.len(), "record assembled");

    RecordPrinter::new(global.output, global.header, global.quiet).print(&out.record)
}
