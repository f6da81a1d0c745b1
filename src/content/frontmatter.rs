//! Front-matter parsing

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced while parsing a post's front-matter.
///
/// Every variant is fatal to generation; there is no skip-and-warn path.
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("missing front-matter block (expected a leading ---)")]
    Missing,

    #[error("unterminated front-matter block (expected a closing ---)")]
    Unterminated,

    #[error("invalid front-matter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front-matter is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unrecognized date `{0}` (expected YYYY-MM-DD)")]
    BadDate(String),
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string.
    ///
    /// Returns (front_matter, body). The body is the exact remainder of the
    /// file after the closing delimiter line, untouched beyond skipping that
    /// line's own terminator.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}');

        let rest = content.strip_prefix("---").ok_or(FrontMatterError::Missing)?;
        let rest = rest.strip_prefix('\r').unwrap_or(rest);
        let rest = rest.strip_prefix('\n').ok_or(FrontMatterError::Missing)?;

        let end_pos = rest.find("\n---").ok_or(FrontMatterError::Unterminated)?;
        let yaml_content = &rest[..end_pos];

        // Skip past the closing --- and that line's terminator, nothing more.
        let body = &rest[end_pos + 4..];
        let body = body.strip_prefix('\r').unwrap_or(body);
        let body = body.strip_prefix('\n').unwrap_or(body);

        let fm: FrontMatter = serde_yaml::from_str(yaml_content)?;
        Ok((fm, body))
    }

    /// The required `title` field
    pub fn require_title(&self) -> Result<&str, FrontMatterError> {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(FrontMatterError::MissingField("title"))
    }

    /// The required `date` field, parsed as a calendar date
    pub fn require_date(&self) -> Result<NaiveDate, FrontMatterError> {
        let raw = self
            .date
            .as_deref()
            .ok_or(FrontMatterError::MissingField("date"))?;
        parse_date_string(raw).ok_or_else(|| FrontMatterError::BadDate(raw.to_string()))
    }
}

/// Parse a date string in the accepted formats
fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = "---\ntitle: Hello World\ndate: 2024-01-15\n---\n\nThis is the content.\n";

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.require_date().unwrap().to_string(), "2024-01-15");
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_body_is_untouched() {
        let raw_body = "# Heading\n\nSome *markdown* text.\n\n```rust\nfn main() {}\n```\n";
        let content = format!("---\ntitle: T\ndate: 2020-01-01\n---\n{}", raw_body);

        let (_, body) = FrontMatter::parse(&content).unwrap();
        assert_eq!(body, raw_body);
    }

    #[test]
    fn test_missing_frontmatter() {
        let err = FrontMatter::parse("# Just markdown\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Missing));
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let err = FrontMatter::parse("---\ntitle: Oops\n\ncontent").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_invalid_yaml_is_fatal() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_missing_required_fields() {
        let (fm, _) = FrontMatter::parse("---\ntitle: Only Title\n---\n").unwrap();
        assert!(matches!(
            fm.require_date(),
            Err(FrontMatterError::MissingField("date"))
        ));

        let (fm, _) = FrontMatter::parse("---\ndate: 2020-01-01\n---\n").unwrap();
        assert!(matches!(
            fm.require_title(),
            Err(FrontMatterError::MissingField("title"))
        ));
    }

    #[test]
    fn test_parse_date_formats() {
        for raw in ["2024-01-15", "2024/01/15", "2024-01-15 10:30:00"] {
            let (fm, _) =
                FrontMatter::parse(&format!("---\ntitle: T\ndate: '{}'\n---\n", raw)).unwrap();
            assert_eq!(fm.require_date().unwrap().to_string(), "2024-01-15");
        }
    }

    #[test]
    fn test_bad_date() {
        let (fm, _) = FrontMatter::parse("---\ntitle: T\ndate: someday\n---\n").unwrap();
        assert!(matches!(fm.require_date(), Err(FrontMatterError::BadDate(_))));
    }

    #[test]
    fn test_extra_fields_preserved() {
        let (fm, _) =
            FrontMatter::parse("---\ntitle: T\ndate: 2020-01-01\nauthor: jane\n---\n").unwrap();
        assert_eq!(
            fm.extra.get("author").and_then(|v| v.as_str()),
            Some("jane")
        );
    }
}
