/// Placeholder the scraper writes for a field it could not read.
pub const NOT_FOUND_SENTINEL: &str = "Not found";

const UNKNOWN_TEXT: &str = "Unknown";
const ZERO_COUNT: &str = "0";

/// One channel as reported by the scraping service.
///
/// Every optional field is `None` when the scraper reported the sentinel (or
/// nothing at all); display defaults are only applied by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    pub channel_url: String,
    pub nationality: Option<String>,
    pub joined_on: Option<String>,
    pub subscribers: Option<String>,
    pub videos_count: Option<String>,
    pub total_views: Option<String>,
}

/// Display-ready channel row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    pub id: String,
    pub name: String,
    pub nationality: String,
    pub joined_on: String,
    pub subscribers: String,
    pub videos: u64,
    pub total_views: String,
}

/// Maps a scraped value to `None` when it carries the sentinel.
pub fn scraped_value(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value == NOT_FOUND_SENTINEL {
        None
    } else {
        Some(value)
    }
}

/// Normalizes one raw record. Total: malformed counts degrade to zero.
pub fn normalize(raw: &RawRecord) -> DisplayRecord {
    DisplayRecord {
        id: raw.channel_url.clone(),
        name: channel_name(&raw.channel_url),
        nationality: text_or(raw.nationality.as_deref(), UNKNOWN_TEXT),
        joined_on: text_or(raw.joined_on.as_deref(), UNKNOWN_TEXT),
        subscribers: text_or(raw.subscribers.as_deref(), ZERO_COUNT),
        videos: raw.videos_count.as_deref().map(digits_only).unwrap_or(0),
        total_views: text_or(raw.total_views.as_deref(), ZERO_COUNT),
    }
}

fn text_or(value: Option<&str>, fallback: &str) -> String {
    value.unwrap_or(fallback).to_string()
}

/// Segment after the first `@` handle marker, up to the next one.
///
/// Channel links without a handle (`/channel/UC...`) fall back to their last
/// path segment; anything unparseable yields an empty name.
pub fn channel_name(channel_url: &str) -> String {
    if let Some(handle) = channel_url.split('@').nth(1) {
        return handle.to_string();
    }
    last_path_segment(channel_url).unwrap_or_default()
}

fn last_path_segment(channel_url: &str) -> Option<String> {
    let parsed = url::Url::parse(channel_url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(ToOwned::to_owned)
}

/// Literal digit stripping: `"1.6K videos"` is 16, not 1600.
pub fn digits_only(text: &str) -> u64 {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit))
        })
}
