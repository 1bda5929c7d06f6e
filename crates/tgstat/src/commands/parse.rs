//! Offline extraction from saved modal pages.

use std::path::Path;

use chrono::Local;

use tgstat_api::PageKind;
use tgstat_core::{Extraction, extract, format_timestamp};

use crate::cli::{GlobalOpts, ParseArgs};
use crate::error::CliError;
use crate::output::RecordPrinter;

fn read_markup(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

pub fn handle(args: &ParseArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let broadband = read_markup(&args.broadband)?;
    let gateway = args.gateway.as_deref().map(read_markup).transpose()?;

    let mut out = Extraction::default();
    out.record.insert("datetime", format_timestamp(&Local::now()));
    out.merge(extract(&broadband, PageKind::Broadband));
    if let Some(ref markup) = gateway {
        out.merge(extract(markup, PageKind::Gateway));
    }

    RecordPrinter::new(global.output, global.header, global.quiet).print(&out.record)
}
