//! Parent repository contract and store-backed implementation.
//!
//! Child linking lives in the student repository because the link is stored
//! on the student row.

use super::{RepoError, RepoResult};
use crate::model::parent::Parent;
use crate::store::{Store, Table};
use log::{debug, info};

pub trait ParentRepository {
    /// Appends a new parent; rejects a taken username.
    fn register_parent(&mut self, parent: Parent) -> RepoResult<Parent>;
    fn login_parent(&mut self, username: &str, password: &str) -> RepoResult<Option<Parent>>;
    fn get_parent(&mut self, id: &str) -> RepoResult<Option<Parent>>;
    fn list_parents(&mut self) -> RepoResult<Vec<Parent>>;
}

pub struct StoreParentRepository<'s> {
    store: &'s mut Store,
}

impl<'s> StoreParentRepository<'s> {
    pub fn new(store: &'s mut Store) -> Self {
        Self { store }
    }
}

impl ParentRepository for StoreParentRepository<'_> {
    fn register_parent(&mut self, parent: Parent) -> RepoResult<Parent> {
        parent.validate()?;
        self.store.refresh(Table::Parents);

        if self
            .store
            .parents()
            .iter()
            .any(|existing| existing.username == parent.username)
        {
            info!("event=parent_register module=repo status=rejected reason=duplicate_username");
            return Err(RepoError::DuplicateKey {
                entity: "parent",
                field: "username",
                key: parent.username,
            });
        }

        self.store.parents_mut().push(parent.clone());
        self.store.commit(Table::Parents)?;
        info!(
            "event=parent_register module=repo status=ok parent_id={}",
            parent.id
        );
        Ok(parent)
    }

    fn login_parent(&mut self, username: &str, password: &str) -> RepoResult<Option<Parent>> {
        self.store.refresh(Table::Parents);
        let found = self
            .store
            .parents()
            .iter()
            .find(|parent| parent.username == username && parent.password.verify(password))
            .cloned();
        debug!(
            "event=parent_login module=repo status={}",
            if found.is_some() { "ok" } else { "rejected" }
        );
        Ok(found)
    }

    fn get_parent(&mut self, id: &str) -> RepoResult<Option<Parent>> {
        self.store.refresh(Table::Parents);
        Ok(self
            .store
            .parents()
            .iter()
            .find(|parent| parent.id == id)
            .cloned())
    }

    fn list_parents(&mut self) -> RepoResult<Vec<Parent>> {
        self.store.refresh(Table::Parents);
        Ok(self.store.parents().to_vec())
    }
}
