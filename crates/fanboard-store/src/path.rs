use crate::document::DocId;

/// Addresses a collection of documents. Nesting is exactly one level deep:
/// a nested collection is scoped to a single parent document
/// (`posts/{id}/replies`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CollectionPath {
    Root {
        collection: String,
    },
    Nested {
        parent_collection: String,
        parent_id: DocId,
        collection: String,
    },
}

impl CollectionPath {
    pub fn root(collection: impl Into<String>) -> Self {
        CollectionPath::Root {
            collection: collection.into(),
        }
    }

    pub fn nested(
        parent_collection: impl Into<String>,
        parent_id: DocId,
        collection: impl Into<String>,
    ) -> Self {
        CollectionPath::Nested {
            parent_collection: parent_collection.into(),
            parent_id,
            collection: collection.into(),
        }
    }

    /// The parent document this collection is scoped to, if nested.
    pub fn parent(&self) -> Option<(&str, &DocId)> {
        match self {
            CollectionPath::Root { .. } => None,
            CollectionPath::Nested {
                parent_collection,
                parent_id,
                ..
            } => Some((parent_collection.as_str(), parent_id)),
        }
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionPath::Root { collection } => f.write_str(collection),
            CollectionPath::Nested {
                parent_collection,
                parent_id,
                collection,
            } => write!(f, "{}/{}/{}", parent_collection, parent_id, collection),
        }
    }
}
