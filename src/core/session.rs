//! Per-session state: one owned record store plus a view to notify
//!
//! Each handler performs a single store operation and, when something
//! changed, marks the session dirty and asks the view to refresh.

use std::path::Path;
use tracing::info;

use crate::core::headers::HeaderMap;
use crate::core::item::NewItem;
use crate::core::normalize::{ImportError, ImportReport, Normalizer, RawTable};
use crate::core::remote::{RemoteError, RemoteSheet};
use crate::core::source::read_table;
use crate::core::store::{Change, RecordStore, StoreError};

/// Receives a notification after every effective mutation
pub trait View {
    fn refresh(&mut self, store: &RecordStore, change: &Change);
}

/// View that ignores notifications
#[derive(Debug, Default)]
pub struct NullView;

impl View for NullView {
    fn refresh(&mut self, _store: &RecordStore, _change: &Change) {}
}

/// Result of an import or pull
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub change: Change,
    pub report: ImportReport,
}

pub struct Session {
    store: RecordStore,
    dirty: bool,
    view: Box<dyn View>,
}

impl Session {
    pub fn new(store: RecordStore, view: Box<dyn View>) -> Self {
        Self {
            store,
            dirty: false,
            view,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Whether the store has changes not yet saved locally
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn notify(&mut self, change: Change) -> Change {
        if !change.is_unchanged() {
            self.dirty = true;
            self.view.refresh(&self.store, &change);
        }
        change
    }

    pub fn add(&mut self, item: NewItem) -> Result<Change, StoreError> {
        let change = self.store.add(item)?;
        Ok(self.notify(change))
    }

    pub fn increment(&mut self, sku: &str) -> Result<Change, StoreError> {
        let change = self.store.increment(sku)?;
        Ok(self.notify(change))
    }

    pub fn decrement(&mut self, sku: &str) -> Result<Change, StoreError> {
        let change = self.store.decrement(sku)?;
        Ok(self.notify(change))
    }

    pub fn set_quantity(&mut self, sku: &str, quantity: u32) -> Result<Change, StoreError> {
        let change = self.store.set_quantity(sku, quantity)?;
        Ok(self.notify(change))
    }

    pub fn remove(&mut self, sku: &str) -> Result<Change, StoreError> {
        let change = self.store.remove(sku)?;
        Ok(self.notify(change))
    }

    /// Normalize a table and merge it by sku
    ///
    /// With `dry_run` the merge runs against a copy and nothing is notified.
    pub fn import_table(
        &mut self,
        table: &RawTable,
        headers: &HeaderMap,
        dry_run: bool,
    ) -> Result<ImportOutcome, ImportError> {
        let normalized = Normalizer::new(headers).normalize(table)?;

        if dry_run {
            let mut preview = self.store.clone();
            let change = preview.merge(normalized.items);
            return Ok(ImportOutcome {
                change,
                report: normalized.report,
            });
        }

        let change = self.store.merge(normalized.items);
        Ok(ImportOutcome {
            change: self.notify(change),
            report: normalized.report,
        })
    }

    /// Read a file completely, then merge it; a bad file changes nothing
    pub fn import_file(
        &mut self,
        path: &Path,
        sheet: Option<&str>,
        headers: &HeaderMap,
        dry_run: bool,
    ) -> Result<ImportOutcome, ImportError> {
        let table = read_table(path, sheet)?;
        self.import_table(&table, headers, dry_run)
    }

    /// Replace the whole store with the remote table
    ///
    /// The store is only touched after the fetch and normalization succeed.
    pub fn pull(
        &mut self,
        remote: &dyn RemoteSheet,
        headers: &HeaderMap,
    ) -> Result<ImportOutcome, RemoteError> {
        let table = remote.fetch()?;
        let normalized = Normalizer::new(headers).normalize(&table)?;
        let change = self.store.replace_all(normalized.items);
        info!(remote = %remote.describe(), items = self.store.len(), "pulled remote sheet");
        Ok(ImportOutcome {
            change: self.notify(change),
            report: normalized.report,
        })
    }

    /// Overwrite the remote table with the whole store
    ///
    /// Local state, including the dirty flag, is left alone either way.
    pub fn push(&self, remote: &dyn RemoteSheet) -> Result<usize, RemoteError> {
        let table = RawTable::from_items(self.store.iter());
        remote.replace(&table)?;
        info!(remote = %remote.describe(), items = self.store.len(), "pushed to remote sheet");
        Ok(self.store.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::Field;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingView {
        changes: Rc<RefCell<Vec<Change>>>,
    }

    impl View for RecordingView {
        fn refresh(&mut self, _store: &RecordStore, change: &Change) {
            self.changes.borrow_mut().push(change.clone());
        }
    }

    struct MemorySheet {
        table: RefCell<RawTable>,
    }

    impl RemoteSheet for MemorySheet {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        fn fetch(&self) -> Result<RawTable, RemoteError> {
            Ok(self.table.borrow().clone())
        }

        fn replace(&self, table: &RawTable) -> Result<(), RemoteError> {
            *self.table.borrow_mut() = table.clone();
            Ok(())
        }
    }

    struct OfflineSheet;

    impl RemoteSheet for OfflineSheet {
        fn describe(&self) -> String {
            "offline".to_string()
        }

        fn fetch(&self) -> Result<RawTable, RemoteError> {
            Err(RemoteError::Transport {
                url: "http://sheets.invalid".to_string(),
                message: "connection refused".to_string(),
            })
        }

        fn replace(&self, _table: &RawTable) -> Result<(), RemoteError> {
            Err(RemoteError::Transport {
                url: "http://sheets.invalid".to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    fn form(sku: &str, name: &str, quantity: u32) -> NewItem {
        NewItem {
            sku: sku.to_string(),
            name: name.to_string(),
            image_url: None,
            quantity,
        }
    }

    fn session_with_view() -> (Session, Rc<RefCell<Vec<Change>>>) {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let view = RecordingView {
            changes: Rc::clone(&changes),
        };
        (Session::new(RecordStore::new(), Box::new(view)), changes)
    }

    fn five_items() -> Session {
        let mut session = Session::new(RecordStore::new(), Box::new(NullView));
        for i in 1..=5 {
            session
                .add(form(&format!("SKU-{i}"), &format!("Item {i}"), i))
                .unwrap();
        }
        session.mark_saved();
        session
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mutations_notify_view() {
        let (mut session, changes) = session_with_view();
        session.add(form("A", "Apple", 1)).unwrap();
        session.increment("A").unwrap();
        session.remove("A").unwrap();

        assert_eq!(changes.borrow().len(), 3);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_unchanged_does_not_notify() {
        let (mut session, changes) = session_with_view();
        session.add(form("A", "Apple", 0)).unwrap();
        session.mark_saved();

        session.decrement("A").unwrap();
        session.set_quantity("A", 0).unwrap();

        assert_eq!(changes.borrow().len(), 1);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_failed_add_changes_nothing() {
        let (mut session, changes) = session_with_view();
        assert!(session.add(form("", "Apple", 1)).is_err());
        assert!(session.add(form("A", "", 1)).is_err());
        assert!(session.store().is_empty());
        assert!(changes.borrow().is_empty());
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_import_dry_run_leaves_store() {
        let mut session = five_items();
        let headers = HeaderMap::builtin().unwrap();
        let table = RawTable::new(
            strings(&["sku", "name"]),
            vec![strings(&["SKU-1", "Renamed"]), strings(&["NEW", "New"])],
        );

        let outcome = session.import_table(&table, &headers, true).unwrap();
        assert_eq!(
            outcome.change,
            Change::Merged {
                inserted: 1,
                updated: 1
            }
        );
        assert_eq!(session.store().len(), 5);
        assert!(!session.is_dirty());

        session.import_table(&table, &headers, false).unwrap();
        assert_eq!(session.store().len(), 6);
        assert_eq!(session.store().get("SKU-1").unwrap().name, "Renamed");
    }

    #[test]
    fn test_failed_import_leaves_store() {
        let mut session = five_items();
        let headers = HeaderMap::builtin().unwrap();
        let result = session.import_file(Path::new("inventory.docx"), None, &headers, false);

        assert!(matches!(result, Err(ImportError::UnsupportedFormat { .. })));
        assert_eq!(session.store().len(), 5);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_failed_pull_keeps_five_items() {
        let mut session = five_items();
        let before = session.store().items().to_vec();
        let headers = HeaderMap::builtin().unwrap();

        let result = session.pull(&OfflineSheet, &headers);

        assert!(matches!(result, Err(RemoteError::Transport { .. })));
        assert_eq!(session.store().len(), 5);
        assert_eq!(session.store().items(), before.as_slice());
    }

    #[test]
    fn test_pull_without_key_column_keeps_store() {
        let mut session = five_items();
        let headers = HeaderMap::builtin().unwrap();
        let remote = MemorySheet {
            table: RefCell::new(RawTable::new(
                strings(&["name"]),
                vec![strings(&["Nameless"])],
            )),
        };

        assert!(matches!(
            session.pull(&remote, &headers),
            Err(RemoteError::Import(ImportError::NoKeyColumn { .. }))
        ));
        assert_eq!(session.store().len(), 5);
    }

    #[test]
    fn test_pull_replaces_whole_store() {
        let mut session = five_items();
        let headers = HeaderMap::builtin().unwrap();
        let remote = MemorySheet {
            table: RefCell::new(RawTable::new(
                strings(&["코드", "품명", "수량"]),
                vec![strings(&["R-1", "원격", "3"])],
            )),
        };

        let outcome = session.pull(&remote, &headers).unwrap();
        assert_eq!(outcome.change, Change::Replaced { count: 1 });
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().get("R-1").unwrap().quantity, 3);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_push_writes_canonical_table() {
        let session = five_items();
        let remote = MemorySheet {
            table: RefCell::new(RawTable::default()),
        };

        assert_eq!(session.push(&remote).unwrap(), 5);
        let written = remote.table.borrow();
        assert_eq!(written.headers, Field::header_row());
        assert_eq!(written.rows.len(), 5);
        assert_eq!(written.rows[0][0], "SKU-1");
    }

    #[test]
    fn test_failed_push_keeps_local_edits() {
        let mut session = five_items();
        session.increment("SKU-1").unwrap();

        assert!(session.push(&OfflineSheet).is_err());
        assert!(session.is_dirty());
        assert_eq!(session.store().get("SKU-1").unwrap().quantity, 2);
    }
}
