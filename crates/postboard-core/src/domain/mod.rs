//! Domain entities - the core business objects.

mod post;
mod query;

pub use post::{DATE_FORMAT, NewPost, Post, PostPatch, parse_post_date};
pub use query::{PostOrder, SearchFilter, SortDirection, SortField};
