//! Activity store - the persisted source of truth for the activity list
//!
//! The list lives in a key-value storage backend under a fixed key as a JSON
//! array. Every mutation persists synchronously and then notifies the
//! registered listeners with the new list.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::mem;
use std::path::PathBuf;
use std::rc::Rc;

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::activity::{Activity, ActivityId};
use crate::config;

/// Key the activity list is stored under
pub const STORAGE_KEY: &str = "chronodex-activities";

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not determine data directory")]
    NoDataDir,
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Minimal string key-value storage
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// In-memory storage, used by tests and as a fallback
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.to_string(), value.to_string());
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage in the platform data directory
    pub fn in_data_dir() -> Result<Self, StorageError> {
        config::data_dir()
            .map(Self::new)
            .ok_or(StorageError::NoDataDir)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }
}

/// Handle returned by [`ActivityStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback receiving the full activity list after each change
pub type Listener = Box<dyn FnMut(&[Activity])>;

/// Observer-style access to the activity list.
///
/// Methods take `&self`: the store is shared behind an `Rc` by the views that
/// read it, and mutations are serialized by the single-threaded event loop.
pub trait ActivityStore {
    /// Register a listener. It is called once immediately with the current
    /// list and again after every change.
    fn subscribe(&self, listener: Listener) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId);
    fn snapshot(&self) -> Vec<Activity>;
    fn add(&self, activity: Activity);
    /// Replace the activity with the same id. Unknown ids are ignored.
    fn update(&self, activity: Activity);
    fn delete(&self, id: ActivityId);
    fn clear(&self);
}

/// Unregisters its listener when dropped
pub struct Subscription<S: ActivityStore + ?Sized> {
    store: Rc<S>,
    id: ListenerId,
}

impl<S: ActivityStore + ?Sized> Subscription<S> {
    pub fn new(store: Rc<S>, listener: Listener) -> Self {
        let id = store.subscribe(listener);
        Self { store, id }
    }
}

impl<S: ActivityStore + ?Sized> Drop for Subscription<S> {
    fn drop(&mut self) {
        self.store.unsubscribe(self.id);
    }
}

/// Activity store persisted to a [`KeyValueStorage`]
///
/// Listeners may call back into the store. Mutations made from inside a
/// listener are applied at once and announced in a further notification
/// round once the current one has finished.
pub struct LocalStore<S: KeyValueStorage> {
    storage: RefCell<S>,
    activities: RefCell<Vec<Activity>>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_listener: Cell<u64>,
    notifying: Cell<bool>,
    /// The list changed while listeners were running
    dirty: Cell<bool>,
    /// Listeners unsubscribed while their list was taken out for a round
    unsubscribed: RefCell<Vec<ListenerId>>,
}

impl<S: KeyValueStorage> LocalStore<S> {
    /// Load the stored list. Missing or malformed data starts an empty list.
    pub fn open(storage: S) -> Self {
        let activities = load_activities(&storage);
        info!("loaded {} activities", activities.len());
        Self {
            storage: RefCell::new(storage),
            activities: RefCell::new(activities),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            notifying: Cell::new(false),
            dirty: Cell::new(false),
            unsubscribed: RefCell::new(Vec::new()),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn commit(&self, next: Vec<Activity>) {
        match serde_json::to_string(&next) {
            Ok(json) => {
                if let Err(e) = self.storage.borrow_mut().set(STORAGE_KEY, &json) {
                    error!("failed to persist activities: {}", e);
                }
            }
            Err(e) => error!("failed to serialize activities: {}", e),
        }
        *self.activities.borrow_mut() = next;
        self.notify();
    }

    fn notify(&self) {
        if self.notifying.get() {
            self.dirty.set(true);
            return;
        }
        self.notifying.set(true);
        loop {
            self.dirty.set(false);
            let snapshot = self.activities.borrow().clone();
            let mut round = mem::take(&mut *self.listeners.borrow_mut());
            for (id, listener) in round.iter_mut() {
                if self.unsubscribed.borrow().contains(id) {
                    continue;
                }
                listener(&snapshot);
            }

            // Put the round back ahead of listeners registered during it
            let unsubscribed = mem::take(&mut *self.unsubscribed.borrow_mut());
            round.retain(|(id, _)| !unsubscribed.contains(id));
            let mut listeners = self.listeners.borrow_mut();
            round.append(&mut listeners);
            *listeners = round;
            drop(listeners);

            if !self.dirty.get() {
                break;
            }
        }
        self.notifying.set(false);
    }
}

fn load_activities<S: KeyValueStorage>(storage: &S) -> Vec<Activity> {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("could not read stored activities, starting empty: {}", e);
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<Activity>>(&raw) {
        Ok(mut activities) => {
            activities.iter_mut().for_each(Activity::refresh_duration);
            activities
        }
        Err(e) => {
            warn!("stored activities are malformed, starting empty: {}", e);
            Vec::new()
        }
    }
}

impl<S: KeyValueStorage> ActivityStore for LocalStore<S> {
    fn subscribe(&self, mut listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        let snapshot = self.activities.borrow().clone();
        listener(&snapshot);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(other, _)| *other != id);
        if self.notifying.get() {
            self.unsubscribed.borrow_mut().push(id);
        }
    }

    fn snapshot(&self) -> Vec<Activity> {
        self.activities.borrow().clone()
    }

    fn add(&self, mut activity: Activity) {
        activity.refresh_duration();
        debug!("add activity {}", activity.id);
        let mut next = self.snapshot();
        next.push(activity);
        self.commit(next);
    }

    fn update(&self, mut activity: Activity) {
        let mut next = self.snapshot();
        let Some(slot) = next.iter_mut().find(|a| a.id == activity.id) else {
            debug!("update of unknown activity {} ignored", activity.id);
            return;
        };
        activity.refresh_duration();
        *slot = activity;
        self.commit(next);
    }

    fn delete(&self, id: ActivityId) {
        debug!("delete activity {}", id);
        let next = self
            .snapshot()
            .into_iter()
            .filter(|a| a.id != id)
            .collect();
        self.commit(next);
    }

    fn clear(&self) {
        info!("clearing all activities");
        self.commit(Vec::new());
    }
}
