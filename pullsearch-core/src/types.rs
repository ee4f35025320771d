use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Largest page size the search service accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size of a fresh search, and the step used when loading more.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    #[default]
    Submission,
    Comment,
}

impl SearchType {
    pub const ALL: &'static [SearchType] = &[SearchType::Submission, SearchType::Comment];

    /// Path segment of the search endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Submission => "submission",
            SearchType::Comment => "comment",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchType::Submission => write!(f, "Posts"),
            SearchType::Comment => write!(f, "Comments"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    #[default]
    CreatedUtc,
    Score,
    NumComments,
}

impl SortType {
    pub const ALL: &'static [SortType] =
        &[SortType::CreatedUtc, SortType::Score, SortType::NumComments];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::CreatedUtc => "created_utc",
            SortType::Score => "score",
            SortType::NumComments => "num_comments",
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortType::CreatedUtc => write!(f, "Date"),
            SortType::Score => write!(f, "Score"),
            SortType::NumComments => write!(f, "Comments"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

impl SortDirection {
    pub const ALL: &'static [SortDirection] = &[SortDirection::Desc, SortDirection::Asc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Desc => "desc",
            SortDirection::Asc => "asc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Desc => write!(f, "Descending"),
            SortDirection::Asc => write!(f, "Ascending"),
        }
    }
}

/// Complete input of one search request.
///
/// `after` and `before` are millisecond timestamps; they are converted to
/// seconds only when the request is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub query: String,
    #[serde(rename = "type")]
    pub search_type: SearchType,
    pub subreddit: String,
    pub after: Option<i64>,
    pub before: Option<i64>,
    pub sort_type: SortType,
    pub sort: SortDirection,
    pub size: u32,
    pub page: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            query: String::new(),
            search_type: SearchType::default(),
            subreddit: String::new(),
            after: None,
            before: None,
            sort_type: SortType::default(),
            sort: SortDirection::default(),
            size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl SearchFilters {
    /// True when both filters describe the same search, page aside.
    pub fn same_context(&self, other: &SearchFilters) -> bool {
        self.query == other.query
            && self.search_type == other.search_type
            && self.subreddit == other.subreddit
            && self.after == other.after
            && self.before == other.before
            && self.sort_type == other.sort_type
            && self.sort == other.sort
            && self.size == other.size
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Query string pairs in the order the service documents them.
    ///
    /// Empty optional fields are left out, the size is clamped to
    /// `max_size` and date bounds are sent in whole seconds.
    pub fn query_pairs(&self, max_size: u32) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(8);
        pairs.push(("q", self.query.trim().to_string()));

        if !self.subreddit.is_empty() {
            pairs.push(("subreddit", self.subreddit.clone()));
        }
        if let Some(after) = self.after.filter(|ms| *ms != 0) {
            pairs.push(("after", millis_to_seconds(after).to_string()));
        }
        if let Some(before) = self.before.filter(|ms| *ms != 0) {
            pairs.push(("before", millis_to_seconds(before).to_string()));
        }

        pairs.push(("sort_type", self.sort_type.as_str().to_string()));
        pairs.push(("sort", self.sort.as_str().to_string()));
        pairs.push(("size", self.size.min(max_size).to_string()));
        pairs.push(("page", self.page.to_string()));
        pairs
    }
}

/// One post or comment returned by the search service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default, deserialize_with = "epoch_seconds")]
    pub created_utc: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: Option<u64>,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub is_self: Option<bool>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl RedditItem {
    /// Text shown for the item: self text, then comment body, then nothing.
    pub fn content(&self) -> &str {
        self.selftext
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| self.body.as_deref().filter(|text| !text.is_empty()))
            .unwrap_or("")
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.created_utc, 0).single()
    }

    /// Link to the item itself, falling back to its permalink.
    pub fn link(&self) -> Option<String> {
        if !self.url.is_empty() {
            Some(self.url.clone())
        } else if !self.permalink.is_empty() {
            Some(format!("https://www.reddit.com{}", self.permalink))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMetadata {
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<RedditItem>,
    #[serde(default)]
    pub metadata: Option<SearchMetadata>,
}

impl SearchResponse {
    /// Total match count reported by the service, or the page length when
    /// the service omits it.
    pub fn total(&self) -> u64 {
        self.reported_total().unwrap_or(self.data.len() as u64)
    }

    /// Total match count, only when the service sent one.
    pub fn reported_total(&self) -> Option<u64> {
        self.metadata.as_ref().and_then(|metadata| metadata.total)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EpochSeconds {
    Int(i64),
    Float(f64),
    Text(String),
}

fn epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match EpochSeconds::deserialize(deserializer)? {
        EpochSeconds::Int(seconds) => Ok(seconds),
        EpochSeconds::Float(seconds) => Ok(seconds.trunc() as i64),
        EpochSeconds::Text(text) => text
            .trim()
            .parse::<f64>()
            .map(|seconds| seconds.trunc() as i64)
            .map_err(serde::de::Error::custom),
    }
}

pub fn millis_to_seconds(millis: i64) -> i64 {
    millis.div_euclid(1000)
}

/// Midnight UTC of `date` as a millisecond timestamp.
pub fn date_to_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc().timestamp_millis())
        .unwrap_or_default()
}

pub fn millis_to_date(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

/// Parses a `YYYY-MM-DD` calendar date into a millisecond timestamp.
pub fn parse_date_millis(input: &str) -> Option<i64> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .ok()
        .map(date_to_millis)
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview_text(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}
