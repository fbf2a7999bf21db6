use chrono::Utc;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC time in the format stored by `DateTime` columns.
pub fn now() -> String {
    Utc::now().format(DATETIME_FORMAT).to_string()
}

pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Content of an optional column, treating the empty string as absent.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Whether `value` parses as an absolute `http(s)` URL with a host.
pub fn is_absolute_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
