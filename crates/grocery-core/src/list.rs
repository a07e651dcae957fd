//! The grocery list service
//!
//! Each operation validates its input, performs exactly one store call and
//! publishes an event. Writes are unconditional overwrites: the last writer
//! for a name wins.

use std::sync::Arc;

use crate::error::{GroceryError, Result};
use crate::event::{EventSink, ItemEvent, ItemEventKind, NoopSink};
use crate::item::{item_key, validate_name, GroceryItem, GROUP};
use crate::store::KeyValueStore;

/// Grocery list operations over an injected store
#[derive(Clone)]
pub struct GroceryList {
    store: Arc<dyn KeyValueStore>,
    events: Arc<dyn EventSink>,
}

impl GroceryList {
    /// Create a list over `store` that discards events
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            events: Arc::new(NoopSink),
        }
    }

    /// Replace the event sink
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Name of the underlying store backend
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Add an item, replacing any existing item with the same name.
    ///
    /// A previously stored status is not carried over.
    pub fn add_item(&self, name: &str, quantity: i64) -> Result<GroceryItem> {
        let item = GroceryItem::new(name, quantity, None)?;
        self.write(&item)?;
        self.publish(
            &item.name,
            ItemEventKind::Added {
                quantity: item.quantity,
            },
        );
        Ok(item)
    }

    /// Delete an item. Deleting a missing item is not an error.
    pub fn delete_item(&self, name: &str) -> Result<()> {
        let name = validate_name("name", name.to_string())?;
        let existed = self.store.delete(GROUP, &item_key(&name))?;
        tracing::debug!(item = %name, existed, "deleted item");
        self.publish(&name, ItemEventKind::Deleted);
        Ok(())
    }

    /// Overwrite an item with the full given state, creating it if absent
    pub fn update_item(
        &self,
        name: &str,
        quantity: i64,
        status: Option<bool>,
    ) -> Result<GroceryItem> {
        let item = GroceryItem::new(name, quantity, status)?;
        self.write(&item)?;
        self.publish(
            &item.name,
            ItemEventKind::Updated {
                quantity: item.quantity,
                status: item.status,
            },
        );
        Ok(item)
    }

    /// Move an item to a new name in a single store call
    pub fn rename_item(
        &self,
        from: &str,
        name: &str,
        quantity: i64,
        status: Option<bool>,
    ) -> Result<GroceryItem> {
        let from = validate_name("from", from.to_string())?;
        let item = GroceryItem::new(name, quantity, status)?;

        if from == item.name {
            self.write(&item)?;
        } else {
            self.store
                .rename(GROUP, &item_key(&from), &item.key(), serde_json::to_value(&item)?)?;
        }

        self.publish(
            &item.name,
            ItemEventKind::Renamed {
                from,
                quantity: item.quantity,
            },
        );
        Ok(item)
    }

    /// All items, sorted by name
    pub fn items(&self) -> Result<Vec<GroceryItem>> {
        let mut items = self
            .store
            .get_group(GROUP)?
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<GroceryItem>, _>>()
            .map_err(GroceryError::from)?;
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    fn write(&self, item: &GroceryItem) -> Result<()> {
        self.store
            .set(GROUP, &item.key(), serde_json::to_value(item)?)?;
        Ok(())
    }

    fn publish(&self, name: &str, kind: ItemEventKind) {
        self.events.publish(ItemEvent::new(name, kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MemorySink;
    use crate::store::MemoryStore;

    fn list() -> (GroceryList, Arc<MemoryStore>, Arc<MemorySink>) {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(MemorySink::new());
        let list = GroceryList::new(store.clone()).with_events(sink.clone());
        (list, store, sink)
    }

    #[test]
    fn test_add_then_list() {
        let (list, _, _) = list();
        list.add_item("milk", 2).unwrap();

        let items = list.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "milk");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].status, None);
    }

    #[test]
    fn test_add_twice_overwrites() {
        let (list, store, _) = list();
        list.add_item("eggs", 6).unwrap();
        list.add_item("eggs", 12).unwrap();

        let items = list.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 12);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_add_drops_previous_status() {
        let (list, _, _) = list();
        list.update_item("tea", 1, Some(true)).unwrap();
        list.add_item("tea", 3).unwrap();

        let items = list.items().unwrap();
        assert_eq!(items[0].status, None);
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let (list, _, _) = list();
        list.add_item("bread", 1).unwrap();
        list.delete_item("butter").unwrap();

        let names: Vec<_> = list.items().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["bread"]);
    }

    #[test]
    fn test_update_creates_missing_item() {
        let (list, _, _) = list();
        list.update_item("rice", 1, Some(false)).unwrap();

        let items = list.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].status, Some(false));
    }

    #[test]
    fn test_update_without_status_clears_it() {
        let (list, _, _) = list();
        list.update_item("jam", 1, Some(true)).unwrap();
        list.update_item("jam", 2, None).unwrap();

        let items = list.items().unwrap();
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].status, None);
    }

    #[test]
    fn test_validation_happens_before_store() {
        let (list, store, sink) = list();

        assert!(matches!(
            list.add_item("", 1),
            Err(GroceryError::Validation(_))
        ));
        assert!(matches!(
            list.add_item("milk", 0),
            Err(GroceryError::Validation(_))
        ));
        assert!(matches!(
            list.update_item("milk", -1, None),
            Err(GroceryError::Validation(_))
        ));
        assert!(matches!(
            list.update_item("", 2, Some(true)),
            Err(GroceryError::Validation(_))
        ));
        assert!(matches!(
            list.delete_item(""),
            Err(GroceryError::Validation(_))
        ));

        assert!(store.is_empty().unwrap());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_rename_moves_item() {
        let (list, store, _) = list();
        list.update_item("cofee", 1, Some(true)).unwrap();
        list.rename_item("cofee", "coffee", 2, Some(true)).unwrap();

        let items = list.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "coffee");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].status, Some(true));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_rename_to_same_name_updates() {
        let (list, _, _) = list();
        list.add_item("salt", 1).unwrap();
        list.rename_item("salt", "salt", 5, None).unwrap();

        let items = list.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
    }

    #[test]
    fn test_rename_rejects_empty_source() {
        let (list, _, _) = list();
        let err = list.rename_item("", "salt", 1, None).unwrap_err();
        match err {
            GroceryError::Validation(v) => assert_eq!(v.field, "from"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_items_sorted_by_name() {
        let (list, _, _) = list();
        for name in ["pears", "apples", "milk"] {
            list.add_item(name, 1).unwrap();
        }
        let names: Vec<_> = list.items().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["apples", "milk", "pears"]);
    }

    #[test]
    fn test_events_published() {
        let (list, _, sink) = list();
        list.add_item("milk", 2).unwrap();
        list.update_item("milk", 2, Some(true)).unwrap();
        list.rename_item("milk", "oat milk", 2, Some(true)).unwrap();
        list.delete_item("oat milk").unwrap();

        assert_eq!(
            sink.topics(),
            vec!["item-added", "item-updated", "item-renamed", "item-deleted"]
        );
    }

    #[test]
    fn test_end_to_end_lifecycle() {
        let (list, _, _) = list();

        list.add_item("milk", 2).unwrap();
        assert_eq!(
            serde_json::to_value(list.items().unwrap()).unwrap(),
            serde_json::json!([{"name": "milk", "quantity": 2}])
        );

        list.update_item("milk", 2, Some(true)).unwrap();
        assert_eq!(
            serde_json::to_value(list.items().unwrap()).unwrap(),
            serde_json::json!([{"name": "milk", "quantity": 2, "status": true}])
        );

        list.delete_item("milk").unwrap();
        assert!(list.items().unwrap().is_empty());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_backed_list() {
        let store = Arc::new(crate::store::SqliteStore::in_memory().unwrap());
        let list = GroceryList::new(store);

        list.add_item("milk", 2).unwrap();
        list.rename_item("milk", "cream", 1, None).unwrap();

        let items = list.items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "cream");
        assert_eq!(list.backend(), "sqlite");
    }
}
