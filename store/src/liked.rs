use std::collections::BTreeSet;

use chirp_types::ThoughtId;

use crate::kv::{FileStore, StoreError};

/// Durable key the liked ids live under, as a JSON array of strings.
const LIKED_KEY: &str = "likedThoughts";

/// The device's memory of which thoughts it has hearted.
///
/// Membership only grows, one id at a time; the single exception is
/// [`LikedStore::clear`], the logout path. The set answers "has this
/// device liked this" for the heart toggle and the liked-thoughts view.
#[derive(Debug)]
pub struct LikedStore {
    kv: FileStore,
    ids: BTreeSet<ThoughtId>,
}

impl LikedStore {
    /// Load the persisted set. Absent or corrupt storage yields an empty
    /// set; corruption is logged and never surfaced.
    #[must_use]
    pub fn open(kv: FileStore) -> Self {
        let ids = match kv.get(LIKED_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!("liked-thoughts storage corrupt, starting empty: {e}");
                    BTreeSet::new()
                }
            },
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                tracing::warn!("liked-thoughts storage unreadable, starting empty: {e}");
                BTreeSet::new()
            }
        };
        Self { kv, ids }
    }

    #[must_use]
    pub fn contains(&self, id: &ThoughtId) -> bool {
        self.ids.contains(id)
    }

    /// Record a like. Records for an already-present id write nothing.
    ///
    /// The updated set is persisted before the in-memory insert commits,
    /// so a storage failure leaves memory and disk agreeing on the old
    /// membership.
    pub fn mark_liked(&mut self, id: &ThoughtId) -> Result<(), StoreError> {
        if self.ids.contains(id) {
            return Ok(());
        }
        let mut next = self.ids.clone();
        next.insert(id.clone());
        let encoded = serde_json::to_string(&next)?;
        self.kv.set(LIKED_KEY, &encoded)?;
        self.ids = next;
        Ok(())
    }

    /// Drop every recorded like from memory and durable storage.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.kv.remove(LIKED_KEY)?;
        self.ids.clear();
        Ok(())
    }

    /// Recorded ids in stable (lexicographic) order.
    pub fn ids(&self) -> impl Iterator<Item = &ThoughtId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
