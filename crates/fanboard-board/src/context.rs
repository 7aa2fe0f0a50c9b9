use std::sync::Arc;

use fanboard_blob::BlobStore;
use fanboard_store::{CollectionPath, DocId, Store};

/// Collection the posts live in.
pub const POSTS: &str = "posts";
/// Nested collection holding each post's replies.
pub const REPLIES: &str = "replies";

pub fn posts_path() -> CollectionPath {
    CollectionPath::root(POSTS)
}

pub fn replies_path(post_id: DocId) -> CollectionPath {
    CollectionPath::nested(POSTS, post_id, REPLIES)
}

/// The board's collaborators, bundled for explicit injection: constructed
/// once at startup, passed by reference, never reassigned.
#[derive(Clone)]
pub struct BoardContext {
    pub store: Arc<Store>,
    pub blobs: Arc<dyn BlobStore>,
}

impl BoardContext {
    pub fn new(store: Arc<Store>, blobs: Arc<dyn BlobStore>) -> Self {
        BoardContext { store, blobs }
    }
}
