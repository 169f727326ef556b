//! Import string parsing
//!
//! Child resources import as `"<parent>:<id>"`; everything else imports
//! as a bare id.

/// A parsed import string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportId<'a> {
    /// Parent identifier, when the composite form was used
    pub parent: Option<&'a str>,
    /// Entity id
    pub id: &'a str,
}

/// Split an import string on its first `:`
///
/// An empty parent part (`":abc"`) is treated as absent.
pub fn parse_import_id(import_id: &str) -> ImportId<'_> {
    match import_id.split_once(':') {
        Some((parent, id)) => ImportId {
            parent: Some(parent).filter(|p| !p.is_empty()),
            id,
        },
        None => ImportId {
            parent: None,
            id: import_id,
        },
    }
}
