//! Form handlers: one write each (plus one optional upload), local
//! validation before any network-equivalent call, no retry on failure.

use serde_json::{json, Map};

use fanboard_blob::BlobStore;
use fanboard_store::{DocId, Document, FieldTransform};

use crate::context::{posts_path, replies_path, BoardContext};
use crate::error::BoardError;

/// Display name used when the author field is left blank.
pub const DEFAULT_AUTHOR: &str = "anonymous fan";

pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct NewPost {
    pub author: String,
    pub content: String,
    pub image: Option<ImageUpload>,
}

pub struct NewReply {
    pub author: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    Unliked,
    /// The post vanished between the click and the write. Logged and
    /// abandoned; nothing to surface to the viewer.
    Gone,
}

fn display_author(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_AUTHOR.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Create a post. Content is required unless an image is attached. The
/// image uploads first; a post write that fails afterwards leaves the
/// uploaded blob orphaned (no cleanup, the user retries the whole action).
pub fn submit_post(ctx: &BoardContext, post: NewPost) -> Result<Document, BoardError> {
    let author = display_author(&post.author);
    let content = post.content.trim().to_string();
    if content.is_empty() && post.image.is_none() {
        return Err(BoardError::EmptyPost);
    }

    let image_url = match &post.image {
        Some(image) => Some(ctx.blobs.put(&image.filename, &image.bytes)?.url),
        None => None,
    };

    let mut fields = Map::new();
    fields.insert("author".into(), json!(author));
    fields.insert("content".into(), json!(content));
    fields.insert("likes".into(), json!(0));
    fields.insert("liked_by".into(), json!([]));
    if let Some(url) = image_url {
        fields.insert("image_url".into(), json!(url));
    }

    Ok(ctx.store.add(&posts_path(), fields)?)
}

/// Toggle the viewer's like on a post. The viewer name is the only
/// admission check — it is a self-reported identity token, nothing more.
///
/// The membership read and the transform write are deliberately not one
/// transaction: two rapid toggles by the same viewer can race. The
/// transforms themselves are atomic, so the counter and the membership set
/// move together within each write.
pub fn toggle_like(
    ctx: &BoardContext,
    post_id: &DocId,
    viewer: &str,
) -> Result<LikeOutcome, BoardError> {
    let viewer = viewer.trim();
    if viewer.is_empty() {
        return Err(BoardError::MissingViewerName);
    }

    let doc = match ctx.store.get(&posts_path(), post_id)? {
        Some(doc) => doc,
        None => {
            eprintln!("[board] like on missing post {}", post_id);
            return Ok(LikeOutcome::Gone);
        }
    };

    let already_liked = doc.array_contains("liked_by", &json!(viewer));
    let transforms = if already_liked {
        [
            FieldTransform::increment("likes", -1),
            FieldTransform::array_remove("liked_by", json!(viewer)),
        ]
    } else {
        [
            FieldTransform::increment("likes", 1),
            FieldTransform::array_union("liked_by", json!(viewer)),
        ]
    };

    match ctx.store.update(&posts_path(), post_id, &transforms) {
        Ok(()) => Ok(if already_liked {
            LikeOutcome::Unliked
        } else {
            LikeOutcome::Liked
        }),
        Err(fanboard_store::StoreError::NotFound(path)) => {
            eprintln!("[board] like raced a missing post {}", path);
            Ok(LikeOutcome::Gone)
        }
        Err(e) => Err(e.into()),
    }
}

/// Write one reply into the post's nested reply collection. Content is
/// required; the author defaults like posts do.
pub fn submit_reply(
    ctx: &BoardContext,
    post_id: &DocId,
    reply: NewReply,
) -> Result<Document, BoardError> {
    let content = reply.content.trim().to_string();
    if content.is_empty() {
        return Err(BoardError::EmptyReply);
    }

    let mut fields = Map::new();
    fields.insert("author".into(), json!(display_author(&reply.author)));
    fields.insert("content".into(), json!(content));

    Ok(ctx.store.add(&replies_path(post_id.clone()), fields)?)
}
