//! Repositories for devices and assessment history

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::types::Identified;
use crate::logic::error::{RiskError, RiskResult};

pub trait Repository<T>: Send + Sync {
    /// Fails with `AlreadyExists` when the id is taken
    fn create(&self, item: T) -> RiskResult<T>;
    fn get(&self, id: &str) -> RiskResult<T>;
    fn list(&self) -> Vec<T>;
    /// Fails with `NotFound` when the id is unknown
    fn update(&self, item: T) -> RiskResult<T>;
}

/// Map-backed repository, ordered by id
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    items: RwLock<BTreeMap<String, T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identified + Clone + Send + Sync> Repository<T> for InMemoryRepository<T> {
    fn create(&self, item: T) -> RiskResult<T> {
        let mut items = self.items.write();
        if items.contains_key(item.id()) {
            return Err(RiskError::AlreadyExists(item.id().to_string()));
        }
        items.insert(item.id().to_string(), item.clone());
        Ok(item)
    }

    fn get(&self, id: &str) -> RiskResult<T> {
        self.items
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| RiskError::NotFound(id.to_string()))
    }

    fn list(&self) -> Vec<T> {
        self.items.read().values().cloned().collect()
    }

    fn update(&self, item: T) -> RiskResult<T> {
        let mut items = self.items.write();
        match items.get_mut(item.id()) {
            Some(slot) => {
                *slot = item.clone();
                Ok(item)
            }
            None => Err(RiskError::NotFound(item.id().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        value: u32,
    }

    impl Identified for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, value: u32) -> Item {
        Item {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn test_create_get_list() {
        let repo = InMemoryRepository::new();
        repo.create(item("b", 2)).unwrap();
        repo.create(item("a", 1)).unwrap();

        assert_eq!(repo.get("a").unwrap().value, 1);
        assert_eq!(repo.list(), vec![item("a", 1), item("b", 2)]);
        assert!(matches!(repo.get("zzz"), Err(RiskError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_create_rejected() {
        let repo = InMemoryRepository::new();
        repo.create(item("a", 1)).unwrap();
        assert!(matches!(repo.create(item("a", 9)), Err(RiskError::AlreadyExists(_))));
        assert_eq!(repo.get("a").unwrap().value, 1);
    }

    #[test]
    fn test_update_requires_existing() {
        let repo = InMemoryRepository::new();
        assert!(matches!(repo.update(item("a", 1)), Err(RiskError::NotFound(_))));

        repo.create(item("a", 1)).unwrap();
        repo.update(item("a", 5)).unwrap();
        assert_eq!(repo.get("a").unwrap().value, 5);
        assert_eq!(repo.len(), 1);
    }
}
