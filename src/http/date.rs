use chrono::{DateTime, Utc};

/// RFC 1123 date as used by the `Date` header.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub fn http_date(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

pub fn now() -> String {
    http_date(Utc::now())
}
