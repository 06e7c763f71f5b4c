use std::collections::HashSet;

use chirp_store::{LikedStore, SessionStore};
use chirp_types::{Thought, ThoughtId};

/// Mutation kinds guarded per thought id.
///
/// One id admits at most one in-flight call of each kind. Different
/// kinds are deliberately not serialized against each other: an edit
/// racing a delete resolves by whichever lands, not by queueing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PendingOp {
    Like,
    Edit,
    Delete,
}

/// Everything behind the board's mutex.
#[derive(Debug)]
pub(crate) struct BoardState {
    pub(crate) thoughts: Vec<Thought>,
    pub(crate) refreshing: bool,
    pub(crate) posting: bool,
    pending: HashSet<(PendingOp, ThoughtId)>,
    pub(crate) session: SessionStore,
    pub(crate) liked: LikedStore,
}

impl BoardState {
    pub(crate) fn new(session: SessionStore, liked: LikedStore) -> Self {
        Self {
            thoughts: Vec::new(),
            refreshing: false,
            posting: false,
            pending: HashSet::new(),
            session,
            liked,
        }
    }

    /// Claim the in-flight slot for `op` on `id`. False when already taken.
    pub(crate) fn begin(&mut self, op: PendingOp, id: &ThoughtId) -> bool {
        self.pending.insert((op, id.clone()))
    }

    /// Release the slot. Must pair with a successful [`BoardState::begin`].
    pub(crate) fn finish(&mut self, op: PendingOp, id: &ThoughtId) {
        self.pending.remove(&(op, id.clone()));
    }

    pub(crate) fn is_pending(&self, op: PendingOp, id: &ThoughtId) -> bool {
        self.pending.contains(&(op, id.clone()))
    }

    pub(crate) fn find_mut(&mut self, id: &ThoughtId) -> Option<&mut Thought> {
        self.thoughts.iter_mut().find(|t| t.id == *id)
    }
}

#[cfg(test)]
mod tests {
    use chirp_store::FileStore;

    use super::*;

    fn state() -> (tempfile::TempDir, BoardState) {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = SessionStore::open(FileStore::open(dir.path()).expect("kv"));
        let liked = LikedStore::open(FileStore::open(dir.path()).expect("kv"));
        (dir, BoardState::new(session, liked))
    }

    #[test]
    fn one_slot_per_op_and_id() {
        let (_dir, mut state) = state();
        let id = ThoughtId::from("t1");

        assert!(state.begin(PendingOp::Like, &id));
        assert!(!state.begin(PendingOp::Like, &id));
        assert!(state.is_pending(PendingOp::Like, &id));

        state.finish(PendingOp::Like, &id);
        assert!(!state.is_pending(PendingOp::Like, &id));
        assert!(state.begin(PendingOp::Like, &id));
    }

    #[test]
    fn different_kinds_share_an_id() {
        let (_dir, mut state) = state();
        let id = ThoughtId::from("t1");

        assert!(state.begin(PendingOp::Edit, &id));
        assert!(state.begin(PendingOp::Delete, &id));
        assert!(state.begin(PendingOp::Like, &id));
    }

    #[test]
    fn ids_do_not_interfere() {
        let (_dir, mut state) = state();

        assert!(state.begin(PendingOp::Like, &ThoughtId::from("t1")));
        assert!(state.begin(PendingOp::Like, &ThoughtId::from("t2")));
        assert!(!state.is_pending(PendingOp::Like, &ThoughtId::from("t3")));
    }
}
