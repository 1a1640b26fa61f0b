//! Sorting and search vocabulary for post listings.

use std::cmp::Ordering;
use std::str::FromStr;

use super::post::Post;
use crate::error::DomainError;

/// Field a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Content,
    Author,
    Date,
}

impl SortField {
    /// Ascending comparison of two posts on this field.
    ///
    /// Text fields compare byte-wise (case-sensitive). Dates compare as dates,
    /// which matches the order of their zero-padded canonical text.
    pub fn compare(self, a: &Post, b: &Post) -> Ordering {
        match self {
            SortField::Title => a.title.cmp(&b.title),
            SortField::Content => a.content.cmp(&b.content),
            SortField::Author => a.author.cmp(&b.author),
            SortField::Date => a.date.cmp(&b.date),
        }
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortField::Title),
            "content" => Ok(SortField::Content),
            "author" => Ok(SortField::Author),
            "date" => Ok(SortField::Date),
            other => Err(DomainError::InvalidQuery(format!(
                "Invalid sort field '{other}'. Available fields: title, content, author, date"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(DomainError::InvalidQuery(format!(
                "Invalid sort direction '{other}'. Available directions: asc, desc"
            ))),
        }
    }
}

/// Requested ordering of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl PostOrder {
    /// Build an ordering from raw query values.
    ///
    /// Empty values count as absent. Without a sort field the direction is
    /// ignored and `None` (insertion order) is returned.
    pub fn parse(sort: Option<&str>, direction: Option<&str>) -> Result<Option<Self>, DomainError> {
        let Some(sort) = sort.filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let field = sort.parse()?;
        let direction = match direction.filter(|d| !d.is_empty()) {
            Some(direction) => direction.parse()?,
            None => SortDirection::default(),
        };

        Ok(Some(Self { field, direction }))
    }

    /// Stable in-place sort. Equal keys keep insertion order in both directions.
    pub fn sort(&self, posts: &mut [Post]) {
        match self.direction {
            SortDirection::Asc => posts.sort_by(|a, b| self.field.compare(a, b)),
            SortDirection::Desc => posts.sort_by(|a, b| self.field.compare(b, a)),
        }
    }
}

/// A single search criterion: case-insensitive exact equality on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    Title(String),
    Content(String),
    Author(String),
    Date(String),
}

impl SearchFilter {
    /// Pick the filter to apply from the raw search parameters.
    ///
    /// Parameters are checked in the order title, content, author, date, and
    /// only the first non-empty one is used. The rest are ignored even when
    /// the chosen filter matches nothing.
    pub fn from_params(
        title: Option<&str>,
        content: Option<&str>,
        author: Option<&str>,
        date: Option<&str>,
    ) -> Option<Self> {
        let pick = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_lowercase);

        pick(title)
            .map(SearchFilter::Title)
            .or_else(|| pick(content).map(SearchFilter::Content))
            .or_else(|| pick(author).map(SearchFilter::Author))
            .or_else(|| pick(date).map(SearchFilter::Date))
    }

    pub fn matches(&self, post: &Post) -> bool {
        match self {
            SearchFilter::Title(needle) => post.title.to_lowercase() == *needle,
            SearchFilter::Content(needle) => post.content.to_lowercase() == *needle,
            SearchFilter::Author(needle) => post.author.to_lowercase() == *needle,
            SearchFilter::Date(needle) => post.date_text().to_lowercase() == *needle,
        }
    }
}
