//! LiveBoard: wires the binder, views, and store together into one
//! continuously rendered board, and fans the result out to subscribers.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use fanboard_dom::{DomNode, Snapshot};
use fanboard_render_html::render_to_html;
use fanboard_store::QuerySpec;

use crate::binder::ListBinder;
use crate::context::{posts_path, replies_path, BoardContext};
use crate::timefmt;
use crate::view;

/// One fully rendered board state, in both wire forms.
#[derive(Debug, Clone)]
pub struct RenderedBoard {
    /// JSON DOM snapshot (`Snapshot { root }`), single line.
    pub snapshot_json: String,
    /// The same tree as HTML, for SSR and innerHTML swaps.
    pub html: String,
}

/// The live board. Subscribing yields a `RenderedBoard` after every store
/// change; `current()` renders on demand for SSR and action responses.
pub struct LiveBoard {
    ctx: BoardContext,
    tree: Arc<Mutex<DomNode>>,
    renders: broadcast::Sender<RenderedBoard>,
}

impl LiveBoard {
    /// Build the shell tree, bind the posts list (which recursively binds
    /// each post's replies), and deliver the initial render.
    pub fn start(ctx: BoardContext) -> Arc<LiveBoard> {
        let tree = Arc::new(Mutex::new(view::board_shell()));
        let (renders, _) = broadcast::channel(64);

        let emit_tree = Arc::clone(&tree);
        let emit_tx = renders.clone();
        let binder = ListBinder::new(
            Arc::clone(&ctx.store),
            Arc::clone(&tree),
            move || {
                // No receivers is fine; the render is simply dropped.
                let _ = emit_tx.send(render_tree(&emit_tree));
            },
        );

        let post_binder = Arc::clone(&binder);
        binder.bind(
            QuerySpec::newest_first(posts_path()),
            view::POSTS_KEY,
            Arc::new(move |doc: &fanboard_store::Document| {
                let reply_query = QuerySpec::oldest_first(replies_path(doc.id.clone()));
                let reply_renderer =
                    Arc::new(|reply: &fanboard_store::Document| {
                        view::reply_item(reply, timefmt::now_millis())
                    });
                // Idempotent: only the first rebuild that sees this post
                // registers its reply subscription.
                post_binder.bind(
                    reply_query.clone(),
                    view::replies_key(&doc.id),
                    reply_renderer,
                );
                let replies = post_binder.store().query(&reply_query);
                view::post_card(doc, &replies.docs, timefmt::now_millis())
            }),
        );

        Arc::new(LiveBoard { ctx, tree, renders })
    }

    pub fn context(&self) -> &BoardContext {
        &self.ctx
    }

    /// Receive a render after every change. Missed messages only skip
    /// intermediate states — the next render is always the full board.
    pub fn subscribe(&self) -> broadcast::Receiver<RenderedBoard> {
        self.renders.subscribe()
    }

    /// Render the board as of now.
    pub fn current(&self) -> RenderedBoard {
        render_tree(&self.tree)
    }

    /// Copy of the rendered tree as of now, for page assembly.
    pub fn current_tree(&self) -> DomNode {
        self.tree.lock().unwrap().clone()
    }
}

fn render_tree(tree: &Arc<Mutex<DomNode>>) -> RenderedBoard {
    let tree = tree.lock().unwrap();
    RenderedBoard {
        snapshot_json: Snapshot::new(tree.clone()).to_json(),
        html: render_to_html(&tree),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fanboard_blob::MemBlobStore;
    use fanboard_store::Store;

    use crate::handlers::{
        submit_post, submit_reply, toggle_like, NewPost, NewReply,
    };
    use crate::error::BoardError;

    fn live_board() -> Arc<LiveBoard> {
        let ctx = BoardContext::new(Arc::new(Store::new()), Arc::new(MemBlobStore::new()));
        LiveBoard::start(ctx)
    }

    fn post(board: &LiveBoard, author: &str, content: &str) -> fanboard_store::Document {
        submit_post(
            board.context(),
            NewPost {
                author: author.into(),
                content: content.into(),
                image: None,
            },
        )
        .unwrap()
    }

    /// Top-to-bottom keys of the rendered post cards.
    fn rendered_post_keys(board: &LiveBoard) -> Vec<String> {
        let snap = fanboard_dom::parse_snapshot(&board.current().snapshot_json).unwrap();
        snap.root
            .find_by_key(view::POSTS_KEY)
            .unwrap()
            .children
            .iter()
            .map(|c| c.key.clone().unwrap())
            .collect()
    }

    #[test]
    fn posts_render_newest_first_after_each_insert() {
        let board = live_board();
        let a = post(&board, "Alice", "first");
        let b = post(&board, "Bob", "second");
        assert_eq!(
            rendered_post_keys(&board),
            vec![view::post_key(&b.id), view::post_key(&a.id)]
        );

        let c = post(&board, "Carol", "third");
        assert_eq!(
            rendered_post_keys(&board),
            vec![
                view::post_key(&c.id),
                view::post_key(&b.id),
                view::post_key(&a.id)
            ]
        );
    }

    #[test]
    fn replies_render_oldest_first_and_append() {
        let board = live_board();
        let p = post(&board, "Alice", "hi");
        for content in ["one", "two", "three"] {
            submit_reply(
                board.context(),
                &p.id,
                NewReply {
                    author: "Bob".into(),
                    content: content.into(),
                },
            )
            .unwrap();
        }

        let snap = fanboard_dom::parse_snapshot(&board.current().snapshot_json).unwrap();
        let list = snap.root.find_by_key(&view::replies_key(&p.id)).unwrap();
        let texts: Vec<&str> = list
            .children
            .iter()
            .map(|item| {
                item.children
                    .iter()
                    .find(|c| c.class() == Some("reply-content"))
                    .and_then(|c| c.text.as_deref())
                    .unwrap()
            })
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn empty_reply_leaves_rendered_list_unchanged() {
        let board = live_board();
        let p = post(&board, "Alice", "hi");
        submit_reply(
            board.context(),
            &p.id,
            NewReply {
                author: "Bob".into(),
                content: "real".into(),
            },
        )
        .unwrap();

        let before = board.current().html;
        let err = submit_reply(
            board.context(),
            &p.id,
            NewReply {
                author: "Bob".into(),
                content: "  ".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, BoardError::EmptyReply));
        assert_eq!(board.current().html, before);
    }

    #[test]
    fn end_to_end_post_then_like_toggle() {
        let board = live_board();
        let p = post(&board, "Alice", "hi");

        let html = board.current().html;
        assert!(html.contains("<strong>Alice</strong>"));
        assert!(html.contains("Like (0)"));

        toggle_like(board.context(), &p.id, "Bob").unwrap();
        assert!(board.current().html.contains("Like (1)"));

        toggle_like(board.context(), &p.id, "Bob").unwrap();
        assert!(board.current().html.contains("Like (0)"));
    }

    #[test]
    fn reply_subscriptions_do_not_stack_across_rebuilds() {
        let board = live_board();
        let p = post(&board, "Alice", "hi");
        // Each new post rebuilds the whole list; the first post's reply
        // binding must stay singular.
        post(&board, "Bob", "more");
        post(&board, "Carol", "even more");

        // One posts watcher plus exactly one reply watcher per post.
        assert_eq!(board.context().store.watcher_count(), 4);

        // And the original post's replies still flow.
        submit_reply(
            board.context(),
            &p.id,
            NewReply {
                author: "Dan".into(),
                content: "still live".into(),
            },
        )
        .unwrap();
        assert!(board.current().html.contains("still live"));
    }

    #[test]
    fn subscribers_receive_a_render_per_change() {
        let board = live_board();
        let mut rx = board.subscribe();
        post(&board, "Alice", "hello subscribers");

        let rendered = rx.try_recv().expect("a render was broadcast");
        assert!(rendered.html.contains("hello subscribers"));
        assert!(rendered.snapshot_json.contains("hello subscribers"));
    }

    #[test]
    fn image_posts_render_an_img_tag() {
        let board = live_board();
        submit_post(
            board.context(),
            NewPost {
                author: "Alice".into(),
                content: "look at this".into(),
                image: Some(crate::handlers::ImageUpload {
                    filename: "cat.png".into(),
                    bytes: b"pixels".to_vec(),
                }),
            },
        )
        .unwrap();
        let html = board.current().html;
        assert!(html.contains("<img"));
        assert!(html.contains("/media/"));
    }
}
