#![allow(async_fn_in_trait)]

use crate::domain::types::{AuthCodeRecord, CodeDelivery, CodeKey};
use crate::error::AuthServiceError;

/// Store of outstanding auth codes, at most one per [`CodeKey`].
///
/// Implementations must make every method atomic with respect to the others:
/// `with_record` in particular runs its closure with exclusive access to the
/// slot, which is what guarantees at most one successful verification per code.
pub trait AuthCodeStore: Send + Sync {
    /// Insert `record`, replacing any record under the same key. Returns the
    /// superseded record, if any.
    fn put(&self, record: AuthCodeRecord) -> Option<AuthCodeRecord>;

    /// Run `f` against the slot for `key` under exclusive access. Setting the
    /// slot to `None` evicts the record; leaving `Some` keeps (or stores) it.
    fn with_record<R>(&self, key: &CodeKey, f: impl FnOnce(&mut Option<AuthCodeRecord>) -> R)
    -> R;

    /// Remove every record for which `evict` returns true. Returns the number removed.
    fn evict_where(&self, evict: impl FnMut(&AuthCodeRecord) -> bool) -> usize;

    /// Number of live records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outbound delivery of a freshly generated code (email in production).
pub trait CodeNotifier: Send + Sync {
    async fn send(&self, delivery: &CodeDelivery<'_>) -> Result<(), AuthServiceError>;
}
