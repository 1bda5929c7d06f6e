//! Polling driver: one record per interval until Ctrl-C or `--count`.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use tgstat_core::StatsPoller;

use crate::cli::{GlobalOpts, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output::RecordPrinter;

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (cfg, client, credentials) = config::connect(global)?;
    let interval: Duration = args.interval.map_or_else(|| cfg.interval(), Into::into);
    if interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let mut poller = StatsPoller::new(client, credentials);
    let mut printer = RecordPrinter::new(global.output, global.header, global.quiet);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        address = %cfg.address.as_deref().unwrap_or_default(),
        interval = %humantime::format_duration(interval),
        "watching"
    );

    let mut polls: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        let result = tokio::select! {
            r = poller.poll() => r,
            _ = tokio::signal::ctrl_c() => break,
        };
        match result {
            Ok(out) => printer.print(&out.record)?,
            // The poller has already dropped a suspect session; the next
            // tick starts with a fresh handshake.
            Err(e) => error!(error = %e, "poll failed"),
        }

        polls += 1;
        if args.count.is_some_and(|n| polls >= n) {
            break;
        }
    }

    info!(polls, "stopped");
    Ok(())
}
