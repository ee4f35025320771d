use crate::error::ExportError;
use crate::types::RedditItem;
use chrono::SecondsFormat;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const CSV_HEADERS: [&str; 6] = ["title", "content", "author", "subreddit", "created_at", "url"];

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    title: &'a str,
    content: &'a str,
    author: &'a str,
    subreddit: &'a str,
    created_at: String,
    url: &'a str,
}

impl<'a> From<&'a RedditItem> for ExportRow<'a> {
    fn from(item: &'a RedditItem) -> Self {
        Self {
            title: &item.title,
            content: item.content(),
            author: &item.author,
            subreddit: &item.subreddit,
            created_at: item
                .created_at()
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
                .unwrap_or_default(),
            url: &item.url,
        }
    }
}

/// Encodes `items` as CSV text, header row first.
pub fn to_csv(items: &[RedditItem]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for item in items {
        writer.serialize(ExportRow::from(item))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}

pub fn write_csv(items: &[RedditItem], path: &Path) -> Result<(), ExportError> {
    let csv = to_csv(items)?;
    std::fs::write(path, csv).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Exported {} results to {}", items.len(), path.display());
    Ok(())
}
