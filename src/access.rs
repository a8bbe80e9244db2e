//! Access control: a fixed owner plus a mutable admin set.
//!
//! The owner id comes from configuration and is never stored; the admin set
//! lives in the [`Store`]. Tier checks are therefore a config comparison
//! plus one document read, with no cached membership to go stale.

use crate::models::ActorId;
use crate::store::{Store, StoreError};

/// Outcome of an admin-set mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminChange {
    Added,
    Removed,
    /// The owner was named. Owners are implicitly authorized and never
    /// enter the admin set.
    AlreadyOwner,
    /// No-op: adding an existing admin or removing a non-admin.
    Unchanged,
}

#[derive(Clone)]
pub struct Access {
    owner: ActorId,
    store: Store,
}

impl Access {
    pub fn new(owner: ActorId, store: Store) -> Self {
        Self { owner, store }
    }

    pub fn is_owner(&self, actor: ActorId) -> bool {
        actor == self.owner
    }

    /// Owner or admin.
    pub fn is_authorized(&self, actor: ActorId) -> Result<bool, StoreError> {
        Ok(self.is_owner(actor) || self.store.is_admin(actor)?)
    }

    pub fn add_admin(&self, actor: ActorId) -> Result<AdminChange, StoreError> {
        if self.is_owner(actor) {
            return Ok(AdminChange::AlreadyOwner);
        }
        if self.store.insert_admin(actor)? {
            self.store
                .record_activity(&format!("Admin {actor} added by owner"))?;
            Ok(AdminChange::Added)
        } else {
            Ok(AdminChange::Unchanged)
        }
    }

    pub fn remove_admin(&self, actor: ActorId) -> Result<AdminChange, StoreError> {
        if self.is_owner(actor) {
            return Ok(AdminChange::AlreadyOwner);
        }
        if self.store.remove_admin(actor)? {
            self.store
                .record_activity(&format!("Admin {actor} removed by owner"))?;
            Ok(AdminChange::Removed)
        } else {
            Ok(AdminChange::Unchanged)
        }
    }

    /// The admin flow asks for one identifier and flips its membership:
    /// unknown ids become admins, current admins are demoted.
    pub fn toggle_admin(&self, actor: ActorId) -> Result<AdminChange, StoreError> {
        if self.is_owner(actor) {
            return Ok(AdminChange::AlreadyOwner);
        }
        if self.store.is_admin(actor)? {
            self.remove_admin(actor)
        } else {
            self.add_admin(actor)
        }
    }
}
