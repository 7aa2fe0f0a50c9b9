use crate::document::Document;
use crate::path::CollectionPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// An ordered query over one collection. The only ordering key is the
/// store-assigned creation timestamp, which is strictly increasing, so
/// ordering is total and stable across writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub path: CollectionPath,
    pub direction: SortDirection,
}

impl QuerySpec {
    pub fn newest_first(path: CollectionPath) -> Self {
        QuerySpec {
            path,
            direction: SortDirection::Desc,
        }
    }

    pub fn oldest_first(path: CollectionPath) -> Self {
        QuerySpec {
            path,
            direction: SortDirection::Asc,
        }
    }
}

/// A complete ordered result set at one point in time. Watchers always
/// receive the whole set, never a diff.
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub query: QuerySpec,
    pub docs: Vec<Document>,
}

impl QuerySnapshot {
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }
}

/// Order documents by creation timestamp in the requested direction.
pub(crate) fn order_docs(docs: &mut [Document], direction: SortDirection) {
    match direction {
        SortDirection::Asc => docs.sort_by_key(|d| d.created_at),
        SortDirection::Desc => {
            docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
    }
}
