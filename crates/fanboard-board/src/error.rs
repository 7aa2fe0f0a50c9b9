use thiserror::Error;

use fanboard_blob::BlobError;
use fanboard_store::StoreError;

#[derive(Debug, Error)]
pub enum BoardError {
    /// A post needs text or an image; neither was supplied.
    #[error("write a comment or attach an image")]
    EmptyPost,

    /// A reply needs text.
    #[error("write a reply first")]
    EmptyReply,

    /// Liking requires a (self-reported) viewer name.
    #[error("enter your name to like a post")]
    MissingViewerName,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),
}

impl BoardError {
    /// Local validation failures: reported to the user synchronously,
    /// no write was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BoardError::EmptyPost | BoardError::EmptyReply | BoardError::MissingViewerName
        )
    }
}
