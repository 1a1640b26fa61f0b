use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Canonical textual form of a post date, used for storage and exchange.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Post entity - represents a blog post.
///
/// `date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub date: NaiveDate,
    pub likes: u64,
}

impl Post {
    /// The date in canonical `YYYY-MM-DD` form.
    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Parse a `YYYY-MM-DD` date.
///
/// Years are limited to 1..=9999 so the canonical text is always four digits
/// wide and sorts the same way the dates do.
pub fn parse_post_date(raw: &str) -> Result<NaiveDate, DomainError> {
    let invalid = || DomainError::Validation(format!("Invalid date '{raw}', expected YYYY-MM-DD"));

    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())?;
    if !(1..=9999).contains(&date.year()) {
        return Err(invalid());
    }
    Ok(date)
}

/// Fields supplied by a client when creating a post.
///
/// Every field is optional at this stage so that absent and empty values are
/// reported the same way by [`NewPost::into_post`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

impl NewPost {
    /// Validate the fields and build a post with the given id and zero likes.
    pub fn into_post(self, id: u64) -> Result<Post, DomainError> {
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("content", &self.content),
            ("author", &self.author),
            ("date", &self.date),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(DomainError::Validation(format!(
                "Invalid post data, missing or empty fields: {}",
                missing.join(", ")
            )));
        }

        let date = parse_post_date(self.date.as_deref().unwrap_or_default())?;

        Ok(Post {
            id,
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            date,
            likes: 0,
        })
    }
}

/// Partial update of a post. Absent fields are left untouched.
///
/// Unlike [`NewPost`], empty strings are accepted here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

impl PostPatch {
    /// Apply the patch. On error the post is left unchanged.
    pub fn apply(self, post: &mut Post) -> Result<(), DomainError> {
        let date = self.date.as_deref().map(parse_post_date).transpose()?;

        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(date) = date {
            post.date = date;
        }
        Ok(())
    }
}
