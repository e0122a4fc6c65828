//! Notification repository.
//!
//! # Invariants
//! - Rows are stored in insertion order; listings come back newest first.
//! - A notification whose target does not fit its kind is never stored.

use super::{handle_missing, RepoResult};
use crate::model::notification::Notification;
use crate::service::targeting::{visible_notifications, Viewer};
use crate::store::{Store, Table};
use log::info;

pub trait NotificationRepository {
    fn add_notification(&mut self, notification: Notification) -> RepoResult<Notification>;
    fn delete_notification(&mut self, id: &str) -> RepoResult<()>;
    /// Every notification, newest first.
    fn list_notifications(&mut self) -> RepoResult<Vec<Notification>>;
    /// Notifications `viewer` may see, newest first.
    fn list_visible(&mut self, viewer: &Viewer) -> RepoResult<Vec<Notification>>;
}

pub struct StoreNotificationRepository<'s> {
    store: &'s mut Store,
}

impl<'s> StoreNotificationRepository<'s> {
    pub fn new(store: &'s mut Store) -> Self {
        Self { store }
    }
}

impl NotificationRepository for StoreNotificationRepository<'_> {
    fn add_notification(&mut self, notification: Notification) -> RepoResult<Notification> {
        notification.validate()?;
        self.store.refresh(Table::Notifications);
        self.store.notifications_mut().push(notification.clone());
        self.store.commit(Table::Notifications)?;
        info!(
            "event=notification_add module=repo status=ok notification_id={} kind={}",
            notification.id, notification.kind
        );
        Ok(notification)
    }

    fn delete_notification(&mut self, id: &str) -> RepoResult<()> {
        self.store.refresh(Table::Notifications);
        let Some(index) = self
            .store
            .notifications()
            .iter()
            .position(|notification| notification.id == id)
        else {
            return handle_missing(self.store, "notification_delete", "notification", id);
        };
        self.store.notifications_mut().remove(index);
        self.store.commit(Table::Notifications)?;
        info!(
            "event=notification_delete module=repo status=ok notification_id={}",
            id
        );
        Ok(())
    }

    fn list_notifications(&mut self) -> RepoResult<Vec<Notification>> {
        self.store.refresh(Table::Notifications);
        Ok(self.store.notifications().iter().rev().cloned().collect())
    }

    fn list_visible(&mut self, viewer: &Viewer) -> RepoResult<Vec<Notification>> {
        self.store.refresh(Table::Notifications);
        Ok(visible_notifications(viewer, self.store.notifications()))
    }
}
