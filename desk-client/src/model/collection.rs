use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Something a [`Collection`] can hold
pub trait Entity: Send + Sync {
    type Key: PartialEq + fmt::Display + ?Sized;

    fn key(&self) -> &Self::Key;
    fn name(&self) -> &str;
}

/// Where a collection's records come from and how they become entities
#[async_trait]
pub trait Source: Send + Sync {
    type Record: Send;
    type Item: Entity;

    /// Used in log lines and not-found errors
    const KIND: &'static str;

    async fn fetch(&self) -> ClientResult<Vec<Self::Record>>;
    async fn build(&self, record: Self::Record) -> ClientResult<Arc<Self::Item>>;
}

/// Lazily fetched, cached list of entities.
///
/// The first read fetches and builds every record; later reads hand out the
/// same `Arc`s until [`Collection::get`] is called with `force`.
pub struct Collection<S: Source> {
    source: S,
    items: Mutex<Option<Vec<Arc<S::Item>>>>,
}

impl<S: Source> Collection<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            items: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Cached entities, fetching them first if needed
    pub async fn get(&self, force: bool) -> ClientResult<Vec<Arc<S::Item>>> {
        let mut items = self.items.lock().await;
        if force || items.is_none() {
            let records = self.source.fetch().await?;
            let mut built = Vec::with_capacity(records.len());
            for record in records {
                built.push(self.source.build(record).await?);
            }
            debug!(kind = S::KIND, count = built.len(), "Collection fetched");
            *items = Some(built);
        }
        Ok(items.clone().unwrap_or_default())
    }

    /// First entity with this name; absence is not an error
    pub async fn find(&self, name: &str) -> ClientResult<Option<Arc<S::Item>>> {
        Ok(self
            .get(false)
            .await?
            .into_iter()
            .find(|item| item.name() == name))
    }

    /// Like [`Collection::find`] but fails with the list of known names
    pub async fn require(&self, name: &str) -> ClientResult<Arc<S::Item>> {
        let items = self.get(false).await?;
        if let Some(item) = items.iter().find(|item| item.name() == name) {
            return Ok(item.clone());
        }
        Err(ClientError::NotFound {
            kind: S::KIND,
            name: name.to_string(),
            available: items.iter().map(|item| item.name().to_string()).collect(),
        })
    }

    pub async fn find_by_pk(
        &self,
        key: &<S::Item as Entity>::Key,
    ) -> ClientResult<Arc<S::Item>> {
        let items = self.get(false).await?;
        if let Some(item) = items.iter().find(|item| item.key() == key) {
            return Ok(item.clone());
        }
        Err(ClientError::NotFound {
            kind: S::KIND,
            name: key.to_string(),
            available: items.iter().map(|item| item.key().to_string()).collect(),
        })
    }

    /// Entities matching `predicate`, over the cached list
    pub async fn filter<F>(
        &self,
        mut predicate: F,
    ) -> ClientResult<impl Iterator<Item = Arc<S::Item>>>
    where
        F: FnMut(&S::Item) -> bool,
    {
        Ok(self
            .get(false)
            .await?
            .into_iter()
            .filter(move |item| predicate(item)))
    }

    pub async fn names(&self) -> ClientResult<Vec<String>> {
        Ok(self
            .get(false)
            .await?
            .iter()
            .map(|item| item.name().to_string())
            .collect())
    }

    /// Number of cached entities; zero before the first fetch
    pub async fn len(&self) -> usize {
        self.items.lock().await.as_ref().map_or(0, Vec::len)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Item {
        id: String,
        name: String,
    }

    impl Entity for Item {
        type Key = str;

        fn key(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    struct Counting {
        records: Vec<(&'static str, &'static str)>,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl Source for Counting {
        type Record = (&'static str, &'static str);
        type Item = Item;

        const KIND: &'static str = "item";

        async fn fetch(&self) -> ClientResult<Vec<Self::Record>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }

        async fn build(&self, record: Self::Record) -> ClientResult<Arc<Item>> {
            let (id, name) = record;
            Ok(Arc::new(Item {
                id: id.to_string(),
                name: name.to_string(),
            }))
        }
    }

    fn collection(records: Vec<(&'static str, &'static str)>) -> Collection<Counting> {
        Collection::new(Counting {
            records,
            fetches: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_get_fetches_once() {
        let items = collection(vec![("1", "A"), ("2", "B")]);
        assert_eq!(items.len().await, 0);

        let first = items.get(false).await.unwrap();
        let second = items.get(false).await.unwrap();
        assert_eq!(items.source().fetches.load(Ordering::SeqCst), 1);
        assert_eq!(first.len(), 2);
        assert!(first.iter().zip(&second).all(|(a, b)| Arc::ptr_eq(a, b)));

        let forced = items.get(true).await.unwrap();
        assert_eq!(items.source().fetches.load(Ordering::SeqCst), 2);
        assert!(!Arc::ptr_eq(&first[0], &forced[0]));
    }

    #[tokio::test]
    async fn test_empty_result_is_cached() {
        let items = collection(vec![]);
        assert!(items.get(false).await.unwrap().is_empty());
        assert!(items.get(false).await.unwrap().is_empty());
        assert_eq!(items.source().fetches.load(Ordering::SeqCst), 1);
        assert!(items.is_empty().await);
    }

    #[tokio::test]
    async fn test_find_and_find_by_pk() {
        let items = collection(vec![("1", "A"), ("2", "B")]);

        assert_eq!(items.find("B").await.unwrap().unwrap().id, "2");
        assert!(items.find("X").await.unwrap().is_none());

        assert_eq!(items.find_by_pk("1").await.unwrap().name, "A");
        let err = items.find_by_pk("9").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { kind: "item", .. }));
    }

    #[tokio::test]
    async fn test_require_lists_available_names() {
        let items = collection(vec![("1", "A"), ("2", "B")]);
        match items.require("X").await {
            Err(ClientError::NotFound {
                name, available, ..
            }) => {
                assert_eq!(name, "X");
                assert_eq!(available, vec!["A", "B"]);
            }
            other => panic!("expected NotFound, got {:?}", other.map(|i| i.id.clone())),
        }
    }

    #[tokio::test]
    async fn test_filter_and_names() {
        let items = collection(vec![("1", "A"), ("2", "B"), ("3", "AB")]);
        let ids: Vec<String> = items
            .filter(|item| item.name.starts_with('A'))
            .await
            .unwrap()
            .map(|item| item.id.clone())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(items.names().await.unwrap(), vec!["A", "B", "AB"]);
        assert_eq!(items.source().fetches.load(Ordering::SeqCst), 1);
    }
}
