//! Display helpers shared by every view of a project or comment.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::AuthorSummary;

/// Characters of project content shown in list views.
pub const EXCERPT_CHARS: usize = 200;

/// Tags shown before collapsing the rest into a `+N` badge.
pub const TAG_PREVIEW: usize = 3;

/// Visibility status derived from `published` and `abandonedAt`; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Draft,
    Published,
    Abandoned,
}

impl ProjectStatus {
    /// Abandonment wins over publication.
    pub fn classify(published: bool, abandoned_at: Option<DateTime<Utc>>) -> Self {
        match (abandoned_at, published) {
            (Some(_), _) => ProjectStatus::Abandoned,
            (None, true) => ProjectStatus::Published,
            (None, false) => ProjectStatus::Draft,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "Draft",
            ProjectStatus::Published => "Published",
            ProjectStatus::Abandoned => "Abandoned",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// First `max_chars` characters followed by `...`, or the whole text if it fits.
pub fn excerpt(content: &str, max_chars: usize) -> Cow<'_, str> {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &content[..cut])),
        None => Cow::Borrowed(content),
    }
}

/// `Oct 19, 2026`
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y").to_string()
}

/// Author name, or email when the name is missing or blank.
pub fn display_name(author: &AuthorSummary) -> &str {
    match author.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name,
        _ => &author.email,
    }
}

/// Split a comma-separated tag field, trimming and dropping empties.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Leading tags to show and how many were left out.
pub fn tag_preview(tags: &[String], shown: usize) -> (&[String], usize) {
    let cut = tags.len().min(shown);
    (&tags[..cut], tags.len() - cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn status_classification() {
        let t = Some(Utc::now());
        assert_eq!(ProjectStatus::classify(false, None), ProjectStatus::Draft);
        assert_eq!(ProjectStatus::classify(true, None), ProjectStatus::Published);
        assert_eq!(ProjectStatus::classify(false, t), ProjectStatus::Abandoned);
        assert_eq!(ProjectStatus::classify(true, t), ProjectStatus::Abandoned);
        assert_eq!(ProjectStatus::Abandoned.to_string(), "Abandoned");
    }

    #[test]
    fn excerpt_cuts_on_characters() {
        assert_eq!(excerpt("short", 200), "short");
        let long = "é".repeat(250);
        let cut = excerpt(&long, 200);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(excerpt(&"a".repeat(200), 200).len(), 200);
    }

    #[test]
    fn dates_use_short_us_style() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 9, 18, 30, 0).unwrap();
        assert_eq!(format_date(ts), "Oct 9, 2026");
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut author = AuthorSummary {
            id: Uuid::new_v4(),
            name: Some("Ada".to_string()),
            email: "ada@localhost.dev".to_string(),
        };
        assert_eq!(display_name(&author), "Ada");
        author.name = Some("  ".to_string());
        assert_eq!(display_name(&author), "ada@localhost.dev");
        author.name = None;
        assert_eq!(display_name(&author), "ada@localhost.dev");
    }

    #[test]
    fn tags_parse_and_preview() {
        let tags = parse_tags(" rust, wasm,,  game engine ,ecs ");
        assert_eq!(tags, vec!["rust", "wasm", "game engine", "ecs"]);
        let (shown, hidden) = tag_preview(&tags, TAG_PREVIEW);
        assert_eq!(shown.len(), 3);
        assert_eq!(hidden, 1);
        assert_eq!(tag_preview(&tags[..1], TAG_PREVIEW).1, 0);
        assert!(parse_tags("").is_empty());
    }
}
