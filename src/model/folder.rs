use serde::Deserialize;

/// Numeric folder id minted by the target instance.
pub type FolderId = i64;

/// A folder as listed by the source instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Folder {
    pub uid: String,
    pub title: String,
}

/// Response body of a folder creation on the target.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedFolder {
    pub id: FolderId,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}
