//! Board views: the page shell, post cards, and reply items as DomNode
//! trees. Interaction events carry the post id in data attributes; the
//! client runtime turns them into action posts.

use fanboard_dom::DomNode;
use fanboard_store::{DocId, Document};

use crate::timefmt;

/// Key of the posts list container.
pub const POSTS_KEY: &str = "posts";

/// Key of one post's replies container.
pub fn replies_key(post_id: &DocId) -> String {
    format!("replies-{}", post_id)
}

pub fn post_key(post_id: &DocId) -> String {
    format!("post-{}", post_id)
}

/// The static page skeleton: heading, post form, and the (initially empty)
/// posts container the binder keeps in sync.
pub fn board_shell() -> DomNode {
    DomNode::new("div")
        .key("board")
        .attr("class", "board")
        .child(DomNode::text_node("h1", "Fan Board"))
        .child(
            DomNode::new("form")
                .key("post-form")
                .attr("class", "post-form")
                .event("submit", "submit_post")
                .child(
                    DomNode::new("input")
                        .key("author-input")
                        .attr("id", "author")
                        .attr("type", "text")
                        .attr("placeholder", "Your name (optional)")
                        .attr("autocomplete", "off"),
                )
                .child(
                    DomNode::new("textarea")
                        .key("content-input")
                        .attr("id", "content")
                        .attr("placeholder", "Write a comment..."),
                )
                .child(
                    DomNode::new("input")
                        .key("image-input")
                        .attr("id", "image")
                        .attr("type", "file")
                        .attr("accept", "image/*"),
                )
                .child(
                    DomNode::new("button")
                        .attr("type", "submit")
                        .text("Post"),
                ),
        )
        .child(DomNode::new("div").key(POSTS_KEY).attr("class", "posts"))
}

/// One post card, replies included. Rebuilt wholesale on every snapshot;
/// the reply section always starts collapsed again afterwards.
pub fn post_card(doc: &Document, replies: &[Document], now_millis: u64) -> DomNode {
    let id = doc.id.clone();
    let likes = doc.int_field("likes").unwrap_or(0);
    let content = doc.str_field("content").unwrap_or("");

    let mut card = DomNode::new("div")
        .key(post_key(&id))
        .attr("class", "post-card")
        .child(header("post", doc, now_millis));

    if !content.is_empty() {
        card = card.child(
            DomNode::text_node("p", content).attr("class", "post-content"),
        );
    }

    if let Some(url) = doc.str_field("image_url") {
        card = card.child(
            DomNode::new("img")
                .attr("class", "post-image")
                .attr("src", url)
                .attr("alt", "attached image"),
        );
    }

    card.child(
        DomNode::new("div")
            .attr("class", "post-footer")
            .child(
                DomNode::new("button")
                    .attr("class", "like-button")
                    .attr("data-post-id", id.as_str())
                    .event("click", "toggle_like")
                    .text(format!("Like ({})", likes)),
            )
            .child(
                DomNode::new("button")
                    .attr("class", "toggle-reply-button")
                    .attr("data-post-id", id.as_str())
                    .event("click", "toggle_replies")
                    .text("Reply"),
            ),
    )
    .child(reply_section(&id, replies, now_millis))
}

fn reply_section(post_id: &DocId, replies: &[Document], now_millis: u64) -> DomNode {
    DomNode::new("div")
        .key(format!("reply-section-{}", post_id))
        .attr("class", "reply-section")
        .attr("style", "display:none")
        .child(
            DomNode::new("input")
                .attr("class", "reply-author")
                .attr("type", "text")
                .attr("placeholder", "Your name (optional)"),
        )
        .child(
            DomNode::new("textarea")
                .attr("class", "reply-content")
                .attr("placeholder", "Write a reply"),
        )
        .child(
            DomNode::new("button")
                .attr("class", "reply-post-button")
                .attr("data-post-id", post_id.as_str())
                .event("click", "submit_reply")
                .text("Post reply"),
        )
        .child(
            DomNode::new("div")
                .key(replies_key(post_id))
                .attr("class", "replies-list")
                .children(replies.iter().map(|r| reply_item(r, now_millis))),
        )
}

pub fn reply_item(doc: &Document, now_millis: u64) -> DomNode {
    DomNode::new("div")
        .key(format!("reply-{}", doc.id))
        .attr("class", "reply-item")
        .child(header("reply", doc, now_millis))
        .child(
            DomNode::text_node("p", doc.str_field("content").unwrap_or(""))
                .attr("class", "reply-content"),
        )
}

fn header(kind: &str, doc: &Document, now_millis: u64) -> DomNode {
    DomNode::new("div")
        .attr("class", format!("{}-header", kind))
        .child(DomNode::text_node(
            "strong",
            doc.str_field("author").unwrap_or(""),
        ))
        .child(
            DomNode::text_node("span", timefmt::relative(doc.created_at, now_millis))
                .attr("class", format!("{}-date", kind)),
        )
}
