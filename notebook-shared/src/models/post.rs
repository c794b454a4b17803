/// Posts: blog-style text records visible to every user
///
/// Same shape as notes, stored separately. The post list shows every user's
/// posts, and editing a post leaves its owner unchanged.

use super::record::{ListScope, OwnedEntity, Record};

/// Kind marker for posts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostKind;

impl OwnedEntity for PostKind {
    const TABLE: &'static str = "posts";
    const TITLE_MAX_CHARS: usize = 100;
    const LIST_SCOPE: ListScope = ListScope::All;
    const REASSIGN_OWNER_ON_UPDATE: bool = false;
}

/// A blog post
pub type Post = Record<PostKind>;
