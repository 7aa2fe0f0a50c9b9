//! Live list binder: keeps a list container in the rendered tree
//! continuously consistent with an ordered live query.
//!
//! Each delivered snapshot is the entire current result set. The binder
//! discards every previously rendered child of the container, renders a
//! fresh element per item in snapshot order, and installs the new children
//! wholesale: a full clear-and-rebuild, never a diff. Any transient state
//! inside the old subtree is lost with it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use fanboard_dom::DomNode;
use fanboard_store::{Document, QuerySpec, Store};

/// Renders one result-set item to its list element.
pub type ItemRenderer = Arc<dyn Fn(&Document) -> DomNode + Send + Sync>;

/// Binds live queries to containers in a shared rendered tree.
///
/// Bindings are process-lifetime: nothing is ever unbound, matching the
/// page-lifetime subscriptions of the board. `bind` is idempotent per
/// container key, so re-binding a nested list during every parent rebuild
/// does not stack duplicate subscriptions.
pub struct ListBinder {
    store: Arc<Store>,
    tree: Arc<Mutex<DomNode>>,
    on_change: Box<dyn Fn() + Send + Sync>,
    bound: Mutex<HashSet<String>>,
}

impl ListBinder {
    pub fn new(
        store: Arc<Store>,
        tree: Arc<Mutex<DomNode>>,
        on_change: impl Fn() + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(ListBinder {
            store,
            tree,
            on_change: Box::new(on_change),
            bound: Mutex::new(HashSet::new()),
        })
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// True if a binding for this container already exists.
    pub fn is_bound(&self, container_key: &str) -> bool {
        self.bound.lock().unwrap().contains(container_key)
    }

    /// Bind `query` to the container carrying `container_key`. The first
    /// snapshot arrives synchronously; later ones arrive after every
    /// commit to the watched collection.
    ///
    /// Item renderers may bind further (nested) lists re-entrantly — a
    /// post card binds its reply list while the post list is rebuilding.
    pub fn bind(
        self: &Arc<Self>,
        query: QuerySpec,
        container_key: impl Into<String>,
        render_item: ItemRenderer,
    ) {
        let key = container_key.into();
        if !self.bound.lock().unwrap().insert(key.clone()) {
            return;
        }

        let binder = Arc::clone(self);
        self.store.watch(
            query,
            Box::new(move |snapshot| {
                let fresh: Vec<DomNode> =
                    snapshot.docs.iter().map(|doc| render_item(doc)).collect();
                {
                    let mut tree = binder.tree.lock().unwrap();
                    match tree.find_by_key_mut(&key) {
                        Some(container) => container.children = fresh,
                        // Container not in the tree yet — a nested binding
                        // firing before its parent's rebuild installed it.
                        // The parent rebuild renders current data itself.
                        None => return,
                    }
                }
                (binder.on_change)();
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use fanboard_store::CollectionPath;
    use serde_json::json;

    fn fields(content: &str) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("content".into(), json!(content));
        map
    }

    fn render_p(doc: &Document) -> DomNode {
        DomNode::text_node("p", doc.str_field("content").unwrap_or(""))
            .key(format!("item-{}", doc.id))
    }

    fn tree_with_container() -> Arc<Mutex<DomNode>> {
        Arc::new(Mutex::new(
            DomNode::new("div")
                .key("root")
                .child(DomNode::new("div").key("list")),
        ))
    }

    #[test]
    fn rebuild_replaces_children_in_snapshot_order() {
        let store = Arc::new(Store::new());
        let path = CollectionPath::root("notes");
        let tree = tree_with_container();
        let binder = ListBinder::new(Arc::clone(&store), Arc::clone(&tree), || {});

        binder.bind(
            QuerySpec::newest_first(path.clone()),
            "list",
            Arc::new(render_p),
        );

        store.add(&path, fields("first")).unwrap();
        store.add(&path, fields("second")).unwrap();

        let tree = tree.lock().unwrap();
        let list = tree.find_by_key("list").unwrap();
        let texts: Vec<&str> = list
            .children
            .iter()
            .map(|c| c.text.as_deref().unwrap())
            .collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn on_change_fires_once_per_installed_rebuild() {
        let store = Arc::new(Store::new());
        let path = CollectionPath::root("notes");
        let tree = tree_with_container();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_cb = Arc::clone(&fired);
        let binder = ListBinder::new(Arc::clone(&store), tree, move || {
            fired_cb.fetch_add(1, Ordering::SeqCst);
        });

        binder.bind(
            QuerySpec::newest_first(path.clone()),
            "list",
            Arc::new(render_p),
        );
        assert_eq!(fired.load(Ordering::SeqCst), 1); // initial snapshot

        store.add(&path, fields("a")).unwrap();
        store.add(&path, fields("b")).unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn bind_is_idempotent_per_container() {
        let store = Arc::new(Store::new());
        let path = CollectionPath::root("notes");
        let binder = ListBinder::new(Arc::clone(&store), tree_with_container(), || {});

        for _ in 0..5 {
            binder.bind(
                QuerySpec::newest_first(path.clone()),
                "list",
                Arc::new(render_p),
            );
        }
        assert_eq!(store.watcher_count(), 1);
        assert!(binder.is_bound("list"));
    }

    #[test]
    fn missing_container_is_tolerated() {
        let store = Arc::new(Store::new());
        let path = CollectionPath::root("notes");
        let tree = Arc::new(Mutex::new(DomNode::new("div").key("root")));
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_cb = Arc::clone(&fired);
        let binder = ListBinder::new(Arc::clone(&store), tree, move || {
            fired_cb.fetch_add(1, Ordering::SeqCst);
        });

        binder.bind(QuerySpec::newest_first(path.clone()), "nowhere", Arc::new(render_p));
        store.add(&path, fields("a")).unwrap();
        // Nothing installed, so no change notifications either.
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
