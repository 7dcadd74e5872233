//! Membership stores for the targets of a build, opened lazily.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use parcel_build::{BuildError, BuildTarget, FileMembershipStore, MembershipStore, StoreProvider};

/// Per-target [`FileMembershipStore`]s, keyed by target name.
#[derive(Debug, Default)]
pub struct TargetStores {
    stores: BTreeMap<String, FileMembershipStore>,
}

impl TargetStores {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the store of `target` if it was opened.
    pub fn get(&self, target: &str) -> Option<&FileMembershipStore> {
        self.stores.get(target)
    }

    /// Flushes every opened store.
    pub fn flush_all(&mut self) -> Result<(), BuildError> {
        for store in self.stores.values_mut() {
            store.flush()?;
        }
        Ok(())
    }
}

impl StoreProvider for TargetStores {
    fn store(&mut self, target: &BuildTarget) -> Result<&mut dyn MembershipStore, BuildError> {
        let store = match self.stores.entry(target.name.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(FileMembershipStore::open(&target.data_dir)?),
        };
        Ok(store)
    }
}
