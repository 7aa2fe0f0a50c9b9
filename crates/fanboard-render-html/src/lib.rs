//! fanboard-render-html — render DomNode trees to HTML strings
//!
//! Produces SSR-ready HTML with data-key and data-a_ attributes so the
//! client runtime can delegate events and reuse nodes by key.

use fanboard_dom::DomNode;

/// Void elements that must not have closing tags
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Render a DomNode tree to an HTML string.
pub fn render_to_html(node: &DomNode) -> String {
    let mut buf = String::with_capacity(4096);
    write_node(node, &mut buf);
    buf
}

/// Options for rendering a full HTML page.
pub struct PageOptions {
    pub root: DomNode,
    pub title: String,
    pub inline_css: Option<String>,
    /// Mount element id; SSR content is injected inside it.
    pub mount_id: String,
    /// SSE endpoint the inline client runtime should subscribe to.
    pub sse_url: Option<String>,
    /// Inline script blocks appended before </body> (the client runtime).
    pub inline_scripts: Vec<String>,
}

impl PageOptions {
    pub fn new(root: DomNode, title: impl Into<String>) -> Self {
        PageOptions {
            root,
            title: title.into(),
            inline_css: None,
            mount_id: "app".into(),
            sse_url: None,
            inline_scripts: Vec::new(),
        }
    }
}

/// Render a full HTML page: head, inline CSS, mount div with SSR content,
/// inline scripts.
pub fn render_page(opts: &PageOptions) -> String {
    let body_html = render_to_html(&opts.root);

    let mut html = String::with_capacity(body_html.len() + 2048);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&opts.title)));

    if let Some(css) = &opts.inline_css {
        html.push_str("<style>");
        html.push_str(css);
        html.push_str("</style>\n");
    }

    html.push_str("</head>\n<body>\n");

    // Mount point with SSR content
    html.push_str(&format!(
        "<div id=\"{}\">{}</div>\n",
        escape_attr(&opts.mount_id),
        body_html
    ));

    if let Some(sse_url) = &opts.sse_url {
        html.push_str(&format!(
            "<script>window.FANBOARD_SSE = \"{}\";</script>\n",
            escape_attr(sse_url)
        ));
    }

    for script in &opts.inline_scripts {
        html.push_str("<script>\n");
        html.push_str(script);
        html.push_str("\n</script>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

fn write_node(node: &DomNode, buf: &mut String) {
    let is_void = VOID_ELEMENTS.contains(&node.tag.as_str());

    buf.push('<');
    buf.push_str(&node.tag);

    if let Some(key) = &node.key {
        buf.push_str(" data-key=\"");
        buf.push_str(&escape_attr(key));
        buf.push('"');
    }

    // BTreeMap iteration is already sorted — deterministic output.
    for (k, v) in &node.attrs {
        buf.push(' ');
        buf.push_str(k);
        buf.push_str("=\"");
        buf.push_str(&escape_attr(v));
        buf.push('"');
    }

    // Event attributes → data-a_ prefix for client delegation
    for (k, v) in &node.events {
        buf.push_str(" data-a_");
        buf.push_str(k);
        buf.push_str("=\"");
        buf.push_str(&escape_attr(v));
        buf.push('"');
    }

    buf.push('>');

    if let Some(text) = &node.text {
        buf.push_str(&escape_html(text));
    }

    for child in &node.children {
        write_node(child, buf);
    }

    if !is_void {
        buf.push_str("</");
        buf.push_str(&node.tag);
        buf.push('>');
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
