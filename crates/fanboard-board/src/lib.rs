//! fanboard-board — the board core
//!
//! Posts, replies, and likes over the document store; the live list
//! binder that keeps the rendered tree consistent with the store; and the
//! LiveBoard assembly that fans rendered snapshots out to delivery layers.

mod binder;
mod board;
mod context;
mod error;
pub mod handlers;
mod timefmt;
pub mod view;

pub use binder::{ItemRenderer, ListBinder};
pub use board::{LiveBoard, RenderedBoard};
pub use context::{posts_path, replies_path, BoardContext, POSTS, REPLIES};
pub use error::BoardError;
pub use handlers::{
    submit_post, submit_reply, toggle_like, ImageUpload, LikeOutcome, NewPost, NewReply,
    DEFAULT_AUTHOR,
};
pub use timefmt::{now_millis, relative};
