use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a `--values` argument into a JSON object.
pub fn parse_values(raw: &str) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
    match serde_json::from_str(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => anyhow::bail!("--values must be a JSON object"),
        Err(error) => anyhow::bail!("--values is not valid JSON: {error}"),
    }
}

/// Parse a deadline given as RFC 3339 or a bare `YYYY-MM-DD` (end of that day, UTC).
pub fn parse_deadline(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow::anyhow!("invalid deadline '{raw}': expected RFC 3339 or YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use grid_core::enums::{ColumnKind, EntryStatus};
    use pretty_assertions::assert_eq;

    use super::{parse_deadline, parse_enum, parse_values};

    #[test]
    fn parses_snake_case_enum() {
        let status: EntryStatus = parse_enum("submitted", "status").expect("status should parse");
        assert_eq!(status, EntryStatus::Submitted);
        let kind: ColumnKind = parse_enum("Select", "kind").expect("kind should parse");
        assert_eq!(kind, ColumnKind::Select);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<EntryStatus>("done", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'done'"));
    }

    #[test]
    fn values_must_be_an_object() {
        assert_eq!(parse_values(r#"{"col-a": 3}"#).expect("object parses").len(), 1);
        assert!(parse_values("[1, 2]").is_err());
        assert!(parse_values("{").is_err());
    }

    #[test]
    fn deadline_accepts_date_or_timestamp() {
        let day = parse_deadline("2026-09-30").expect("date parses");
        assert_eq!(day.to_rfc3339(), "2026-09-30T23:59:59+00:00");
        assert!(parse_deadline("2026-09-30T08:00:00Z").is_ok());
        assert!(parse_deadline("next week").is_err());
    }
}
