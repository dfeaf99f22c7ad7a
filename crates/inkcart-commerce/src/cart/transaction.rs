//! Snapshot-based optimistic transactions.

/// An explicit optimistic transaction over a cloneable state value.
///
/// Begin one before mutating local UI state, mutate freely, then either
/// `commit` (drop the snapshot) once persistence confirms, or `rollback`
/// to restore the pre-operation state verbatim. The reconciler wraps every
/// cart mutation in one of these instead of ad hoc revert closures.
#[derive(Debug)]
pub struct Transaction<T: Clone> {
    snapshot: T,
}

impl<T: Clone> Transaction<T> {
    /// Snapshot the current state.
    pub fn begin(state: &T) -> Self {
        Self {
            snapshot: state.clone(),
        }
    }

    /// Keep the optimistic state; the snapshot is discarded.
    pub fn commit(self) {}

    /// Restore the pre-operation state verbatim.
    pub fn rollback(self, state: &mut T) {
        *state = self.snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_restores_snapshot() {
        let mut state = vec![1, 2, 3];
        let txn = Transaction::begin(&state);
        state.push(4);
        state[0] = 9;
        txn.rollback(&mut state);
        assert_eq!(state, vec![1, 2, 3]);
    }

    #[test]
    fn test_commit_keeps_changes() {
        let mut state = vec![1];
        let txn = Transaction::begin(&state);
        state.push(2);
        txn.commit();
        assert_eq!(state, vec![1, 2]);
    }
}
