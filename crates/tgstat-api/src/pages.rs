// Diagnostic modal pages
//
// The web UI renders these fragments into dialogs; they are the only place
// the firmware exposes line statistics and device identity.

use std::fmt;

use tracing::debug;

use crate::error::Error;
use crate::session::Session;

/// Which modal a piece of markup came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// DSL line status, rates, power, margins, counters.
    Broadband,
    /// Product identity, versions, serial, MAC, uptime.
    Gateway,
}

impl PageKind {
    /// Path relative to the device origin.
    pub fn path(self) -> &'static str {
        match self {
            Self::Broadband => "/modals/broadband-bridge-modal.lp",
            Self::Gateway => "/modals/gateway-modal.lp",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Broadband => "broadband page",
            Self::Gateway => "gateway page",
        })
    }
}

/// Markup of one modal, consumed once by the extractor.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub kind: PageKind,
    pub markup: String,
}

impl Session {
    /// `GET` one modal page.
    pub async fn fetch_page(&self, kind: PageKind) -> Result<RawPage, Error> {
        let url = self.origin().join(kind.path())?;
        debug!("GET {}", url);

        let resp = self.http().get(url).send().await.map_err(Error::fetching(kind))?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::Fetch {
                page: kind,
                status: status.as_u16(),
            });
        }

        let markup = resp.text().await.map_err(Error::fetching(kind))?;
        debug!(page = %kind, bytes = markup.len(), "fetched");
        Ok(RawPage { kind, markup })
    }

    /// Fetch the broadband and gateway modals, in that order.
    pub async fn fetch(&self) -> Result<(RawPage, RawPage), Error> {
        let broadband = self.fetch_page(PageKind::Broadband).await?;
        let gateway = self.fetch_page(PageKind::Gateway).await?;
        Ok((broadband, gateway))
    }
}
