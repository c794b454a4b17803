/// HTTP-facing configuration for each record kind
///
/// The generic handlers in [`crate::routes::records`] are instantiated once
/// per kind; this trait supplies the labels, URLs and form type they need.

use crate::forms::{NoteForm, PostForm, RecordForm};
use notebook_shared::models::{note::NoteKind, post::PostKind, record::OwnedEntity};

/// Where a successful create or edit redirects to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterSave {
    /// The saved record's detail page
    Detail,

    /// The list page
    List,
}

pub trait Resource: OwnedEntity {
    /// Lowercase singular name, e.g. "note"
    const NAME: &'static str;

    /// Heading of the list page
    const PLURAL_LABEL: &'static str;

    /// List page URL
    const LIST_PATH: &'static str;

    /// URL prefix of item pages; item URLs are `{prefix}{pk}/...`
    const ITEM_PREFIX: &'static str;

    const AFTER_SAVE: AfterSave;

    type Form: RecordForm<Kind = Self>;

    fn detail_path(pk: i64) -> String {
        format!("{}{}/", Self::ITEM_PREFIX, pk)
    }

    fn new_path() -> String {
        format!("{}new/", Self::ITEM_PREFIX)
    }

    fn edit_path(pk: i64) -> String {
        format!("{}{}/edit/", Self::ITEM_PREFIX, pk)
    }

    fn delete_path(pk: i64) -> String {
        format!("{}{}/delete/", Self::ITEM_PREFIX, pk)
    }

    fn after_save_path(pk: i64) -> String {
        match Self::AFTER_SAVE {
            AfterSave::Detail => Self::detail_path(pk),
            AfterSave::List => Self::LIST_PATH.to_string(),
        }
    }
}

impl Resource for NoteKind {
    const NAME: &'static str = "note";
    const PLURAL_LABEL: &'static str = "Notes";
    const LIST_PATH: &'static str = "/";
    const ITEM_PREFIX: &'static str = "/note/";
    const AFTER_SAVE: AfterSave = AfterSave::Detail;
    type Form = NoteForm;
}

impl Resource for PostKind {
    const NAME: &'static str = "post";
    const PLURAL_LABEL: &'static str = "Posts";
    const LIST_PATH: &'static str = "/posts/";
    const ITEM_PREFIX: &'static str = "/posts/";
    const AFTER_SAVE: AfterSave = AfterSave::List;
    type Form = PostForm;
}
