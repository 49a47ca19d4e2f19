//! Centralized constants for default endpoints and UA.

pub(crate) const USER_AGENT: &str = concat!("esg-ingest/", env!("CARGO_PKG_VERSION"));

/// Placeholder replaced by the notification's resource id in endpoint templates.
pub const RESOURCE_PLACEHOLDER: &str = "{resource_id}";

/// Spreadsheet service: full grid data for one spreadsheet.
pub(crate) const DEFAULT_SPREADSHEET_ENDPOINT: &str =
    "https://sheets.googleapis.com/v4/spreadsheets/{resource_id}?includeGridData=true";

/// Office document graph: raw content of one drive item.
pub(crate) const DEFAULT_OFFICE_GRAPH_ENDPOINT: &str =
    "https://graph.microsoft.com/v1.0/me/drive/items/{resource_id}/content";
