use serde::Serialize;
use ts_rs::TS;
use vestry_domain::NavEntry;

/// One visible navigation entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/nav-entry-response.ts"
)]
pub struct NavEntryResponse {
    pub label: String,
    pub href: String,
}

impl From<NavEntry> for NavEntryResponse {
    fn from(entry: NavEntry) -> Self {
        Self {
            label: entry.label,
            href: entry.href,
        }
    }
}
