//! Document store over the portal SQLite database.
//!
//! # Responsibility
//! - Keep exactly one in-memory cache per logical table.
//! - Make synchronization explicit: `refresh(table)` reads, `commit(table)` writes.
//! - Absorb storage failures so callers never see them.
//!
//! # Invariants
//! - A table is one `documents` row holding `{"format_version", "rows"}` JSON.
//! - A failed or corrupt read keeps the last-known-good cache (seed data on
//!   first run) and is logged, never returned.
//! - An externally deleted row is re-created from the cache on the next commit.
//! - Commits are optimistic: the row revision must match the revision last
//!   read, otherwise `ConflictPolicy` decides.
//! - Single writer per handle; nothing here locks across tables.

pub mod seed;

use crate::config::{ConflictPolicy, NotFoundPolicy, PortalConfig};
use crate::model::book::Book;
use crate::model::catalog::Weekday;
use crate::model::notification::Notification;
use crate::model::parent::Parent;
use crate::model::schedule::ScheduleBook;
use crate::model::student::Student;
use crate::model::teacher::Teacher;
use crate::model::validation::ValidationError;
use log::{debug, error, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Version of the JSON envelope written into `documents.body`.
pub const FORMAT_VERSION: u32 = 1;

/// Logical tables held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Students,
    Teachers,
    Parents,
    Books,
    Notifications,
    Schedules,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Self::Students,
        Self::Teachers,
        Self::Parents,
        Self::Books,
        Self::Notifications,
        Self::Schedules,
    ];

    /// Key of the table's row in `documents`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Teachers => "teachers",
            Self::Parents => "parents",
            Self::Books => "books",
            Self::Notifications => "notifications",
            Self::Schedules => "schedules",
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Another writer committed the table since it was last read. The local
    /// edit has been discarded and the cache reloaded.
    StaleSnapshot {
        table: Table,
        expected_revision: Option<i64>,
        actual_revision: Option<i64>,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleSnapshot {
                table,
                expected_revision,
                actual_revision,
            } => write!(
                f,
                "table `{table}` changed concurrently (expected revision {}, found {}); reload and retry",
                display_revision(*expected_revision),
                display_revision(*actual_revision)
            ),
        }
    }
}

impl Error for StoreError {}

fn display_revision(revision: Option<i64>) -> String {
    revision.map_or_else(|| "none".to_string(), |value| value.to_string())
}

/// Rows that can live in one table document.
pub trait TableRows: Serialize + DeserializeOwned {
    /// Checks persisted rows before they replace the cache.
    fn check(&self) -> Result<(), ValidationError>;
}

/// Rejects a natural key that appears on more than one row.
fn check_unique<'a>(
    field: &'static str,
    keys: impl IntoIterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(ValidationError::DuplicateKey {
                field,
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

impl TableRows for Vec<Student> {
    fn check(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(Student::validate)?;
        check_unique(
            "seat number",
            self.iter().map(|student| student.seat_number.as_str()),
        )
    }
}

impl TableRows for Vec<Teacher> {
    fn check(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(Teacher::validate)?;
        check_unique("username", self.iter().map(|teacher| teacher.username.as_str()))
    }
}

impl TableRows for Vec<Parent> {
    fn check(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(Parent::validate)?;
        check_unique("username", self.iter().map(|parent| parent.username.as_str()))
    }
}

impl TableRows for Vec<Book> {
    fn check(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(Book::validate)
    }
}

impl TableRows for Vec<Notification> {
    fn check(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(Notification::validate)
    }
}

impl TableRows for ScheduleBook {
    fn check(&self) -> Result<(), ValidationError> {
        for week in self.values() {
            for (expected, day) in Weekday::ALL.iter().zip(week.days()) {
                if day.day != *expected {
                    return Err(ValidationError::DayOutOfOrder {
                        expected: *expected,
                        found: day.day,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    format_version: u32,
    rows: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeIn<T> {
    format_version: u32,
    rows: T,
}

struct TableCache<T> {
    rows: T,
    /// Revision of the row the cache was last synchronized with.
    revision: Option<i64>,
}

impl<T> TableCache<T> {
    fn unsynced(rows: T) -> Self {
        Self {
            rows,
            revision: None,
        }
    }
}

/// Handle owning the portal connection and one cache per table.
pub struct Store {
    conn: Connection,
    not_found: NotFoundPolicy,
    conflicts: ConflictPolicy,
    students: TableCache<Vec<Student>>,
    teachers: TableCache<Vec<Teacher>>,
    parents: TableCache<Vec<Parent>>,
    books: TableCache<Vec<Book>>,
    notifications: TableCache<Vec<Notification>>,
    schedules: TableCache<ScheduleBook>,
}

impl Store {
    /// Wraps a migrated connection, seeds missing tables and loads every cache.
    pub fn open(conn: Connection, config: &PortalConfig) -> Self {
        let seed = seed::SeedData::build();
        let mut store = Self {
            conn,
            not_found: config.not_found,
            conflicts: config.conflicts,
            students: TableCache::unsynced(seed.students.clone()),
            teachers: TableCache::unsynced(seed.teachers.clone()),
            parents: TableCache::unsynced(seed.parents.clone()),
            books: TableCache::unsynced(seed.books.clone()),
            notifications: TableCache::unsynced(seed.notifications.clone()),
            schedules: TableCache::unsynced(seed.schedules.clone()),
        };
        seed::bootstrap_with(&mut store, &seed);
        store
    }

    pub fn not_found_policy(&self) -> NotFoundPolicy {
        self.not_found
    }

    /// Underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Revision the cache of `table` was last synchronized with.
    pub fn revision(&self, table: Table) -> Option<i64> {
        match table {
            Table::Students => self.students.revision,
            Table::Teachers => self.teachers.revision,
            Table::Parents => self.parents.revision,
            Table::Books => self.books.revision,
            Table::Notifications => self.notifications.revision,
            Table::Schedules => self.schedules.revision,
        }
    }

    /// Re-reads one table. Never fails; see module invariants.
    pub fn refresh(&mut self, table: Table) {
        let conn = &self.conn;
        match table {
            Table::Students => refresh_cache(conn, table, &mut self.students),
            Table::Teachers => refresh_cache(conn, table, &mut self.teachers),
            Table::Parents => refresh_cache(conn, table, &mut self.parents),
            Table::Books => refresh_cache(conn, table, &mut self.books),
            Table::Notifications => refresh_cache(conn, table, &mut self.notifications),
            Table::Schedules => refresh_cache(conn, table, &mut self.schedules),
        }
    }

    pub fn refresh_all(&mut self) {
        for table in Table::ALL {
            self.refresh(table);
        }
    }

    /// Persists the cache of one table.
    ///
    /// # Errors
    /// - `StaleSnapshot` only under `ConflictPolicy::RejectStale`.
    ///
    /// Storage failures are logged and swallowed; the cache keeps the new value.
    pub(crate) fn commit(&mut self, table: Table) -> StoreResult<()> {
        let conn = &self.conn;
        let policy = self.conflicts;
        match table {
            Table::Students => commit_cache(conn, table, &mut self.students, policy),
            Table::Teachers => commit_cache(conn, table, &mut self.teachers, policy),
            Table::Parents => commit_cache(conn, table, &mut self.parents, policy),
            Table::Books => commit_cache(conn, table, &mut self.books, policy),
            Table::Notifications => commit_cache(conn, table, &mut self.notifications, policy),
            Table::Schedules => commit_cache(conn, table, &mut self.schedules, policy),
        }
    }

    pub fn students(&self) -> &[Student] {
        &self.students.rows
    }

    pub(crate) fn students_mut(&mut self) -> &mut Vec<Student> {
        &mut self.students.rows
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers.rows
    }

    pub(crate) fn teachers_mut(&mut self) -> &mut Vec<Teacher> {
        &mut self.teachers.rows
    }

    pub fn parents(&self) -> &[Parent] {
        &self.parents.rows
    }

    pub(crate) fn parents_mut(&mut self) -> &mut Vec<Parent> {
        &mut self.parents.rows
    }

    pub fn books(&self) -> &[Book] {
        &self.books.rows
    }

    pub(crate) fn books_mut(&mut self) -> &mut Vec<Book> {
        &mut self.books.rows
    }

    /// Notifications in insertion order.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications.rows
    }

    pub(crate) fn notifications_mut(&mut self) -> &mut Vec<Notification> {
        &mut self.notifications.rows
    }

    pub fn schedules(&self) -> &ScheduleBook {
        &self.schedules.rows
    }

    pub(crate) fn schedules_mut(&mut self) -> &mut ScheduleBook {
        &mut self.schedules.rows
    }

    /// Reads the persisted revision of a table without touching the cache.
    pub(crate) fn persisted_revision(&self, table: Table) -> rusqlite::Result<Option<i64>> {
        read_revision(&self.conn, table)
    }

    /// Replaces a table cache with seed rows and writes it.
    pub(crate) fn install_seed(&mut self, table: Table, seed: &seed::SeedData) -> StoreResult<()> {
        match table {
            Table::Students => self.students.rows = seed.students.clone(),
            Table::Teachers => self.teachers.rows = seed.teachers.clone(),
            Table::Parents => self.parents.rows = seed.parents.clone(),
            Table::Books => self.books.rows = seed.books.clone(),
            Table::Notifications => self.notifications.rows = seed.notifications.clone(),
            Table::Schedules => self.schedules.rows = seed.schedules.clone(),
        }
        self.commit(table)
    }

    pub(crate) fn meta_flag(&self, key: &str) -> rusqlite::Result<bool> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM store_meta WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value.is_some())
    }

    pub(crate) fn set_meta_flag(&self, key: &str) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT INTO store_meta (key, value) VALUES (?1, '1')
             ON CONFLICT(key) DO NOTHING;",
            [key],
        )?;
        Ok(())
    }
}

fn read_revision(conn: &Connection, table: Table) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT revision FROM documents WHERE table_name = ?1;",
        [table.name()],
        |row| row.get(0),
    )
    .optional()
}

fn decode<T: TableRows>(body: &str) -> Result<T, String> {
    let envelope: EnvelopeIn<T> = serde_json::from_str(body).map_err(|err| err.to_string())?;
    if envelope.format_version != FORMAT_VERSION {
        return Err(format!(
            "unsupported format_version {} (expected {FORMAT_VERSION})",
            envelope.format_version
        ));
    }
    envelope.rows.check().map_err(|err| err.to_string())?;
    Ok(envelope.rows)
}

fn refresh_cache<T: TableRows>(conn: &Connection, table: Table, cache: &mut TableCache<T>) {
    let row = conn
        .query_row(
            "SELECT body, revision FROM documents WHERE table_name = ?1;",
            [table.name()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )
        .optional();

    match row {
        Ok(Some((body, revision))) => match decode::<T>(&body) {
            Ok(rows) => {
                cache.rows = rows;
                cache.revision = Some(revision);
            }
            Err(reason) => {
                // Adopting the revision lets the next commit replace the bad row.
                cache.revision = Some(revision);
                error!(
                    "event=store_refresh module=store status=fallback table={} reason=corrupt revision={} error={}",
                    table, revision, reason
                );
            }
        },
        Ok(None) => {
            // Row deleted externally; the next commit re-creates it from the cache.
            if cache.revision.take().is_some() {
                warn!(
                    "event=store_refresh module=store status=missing table={} reason=row_deleted",
                    table
                );
            } else {
                debug!(
                    "event=store_refresh module=store status=missing table={}",
                    table
                );
            }
        }
        Err(err) => {
            error!(
                "event=store_refresh module=store status=fallback table={} reason=read_failed error={}",
                table, err
            );
        }
    }
}

fn commit_cache<T: TableRows>(
    conn: &Connection,
    table: Table,
    cache: &mut TableCache<T>,
    policy: ConflictPolicy,
) -> StoreResult<()> {
    let body = match serde_json::to_string(&EnvelopeOut {
        format_version: FORMAT_VERSION,
        rows: &cache.rows,
    }) {
        Ok(body) => body,
        Err(err) => {
            error!(
                "event=store_commit module=store status=error table={} error_code=encode_failed error={}",
                table, err
            );
            return Ok(());
        }
    };

    let written = match cache.revision {
        Some(expected) => conn.execute(
            "UPDATE documents
             SET
                body = ?1,
                revision = revision + 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE table_name = ?2
               AND revision = ?3;",
            params![body, table.name(), expected],
        ),
        None => conn.execute(
            "INSERT INTO documents (table_name, body, revision)
             VALUES (?1, ?2, 1)
             ON CONFLICT(table_name) DO NOTHING;",
            params![table.name(), body],
        ),
    };

    match written {
        Ok(0) => resolve_conflict(conn, table, cache, policy, &body),
        Ok(_) => {
            let revision = cache.revision.map_or(1, |current| current + 1);
            cache.revision = Some(revision);
            debug!(
                "event=store_commit module=store status=ok table={} revision={}",
                table, revision
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=store_commit module=store status=error table={} error_code=write_failed error={}",
                table, err
            );
            Ok(())
        }
    }
}

fn resolve_conflict<T: TableRows>(
    conn: &Connection,
    table: Table,
    cache: &mut TableCache<T>,
    policy: ConflictPolicy,
    body: &str,
) -> StoreResult<()> {
    let expected = cache.revision;
    if expected.is_some()
        && matches!(read_revision(conn, table), Ok(None))
        && recreate_row(conn, table, cache, body)
    {
        return Ok(());
    }
    match policy {
        ConflictPolicy::LastWriteWins => {
            let overwritten = conn.query_row(
                "INSERT INTO documents (table_name, body, revision)
                 VALUES (?1, ?2, 1)
                 ON CONFLICT(table_name) DO UPDATE SET
                    body = excluded.body,
                    revision = documents.revision + 1,
                    updated_at = (strftime('%s', 'now') * 1000)
                 RETURNING revision;",
                params![table.name(), body],
                |row| row.get::<_, i64>(0),
            );
            match overwritten {
                Ok(revision) => {
                    cache.revision = Some(revision);
                    warn!(
                        "event=store_commit module=store status=conflict_overwritten table={} expected_revision={} revision={}",
                        table,
                        display_revision(expected),
                        revision
                    );
                }
                Err(err) => {
                    error!(
                        "event=store_commit module=store status=error table={} error_code=overwrite_failed error={}",
                        table, err
                    );
                }
            }
            Ok(())
        }
        ConflictPolicy::RejectStale => {
            let actual = read_revision(conn, table).unwrap_or(None);
            refresh_cache(conn, table, cache);
            warn!(
                "event=store_commit module=store status=conflict_rejected table={} expected_revision={} actual_revision={}",
                table,
                display_revision(expected),
                display_revision(actual)
            );
            Err(StoreError::StaleSnapshot {
                table,
                expected_revision: expected,
                actual_revision: actual,
            })
        }
    }
}

/// Inserts the cache as a fresh row after the previous one was deleted.
///
/// No competing write is lost, so this applies under every conflict policy.
/// Returns `false` when another writer re-created the row first, leaving the
/// conflict to the policy.
fn recreate_row<T: TableRows>(
    conn: &Connection,
    table: Table,
    cache: &mut TableCache<T>,
    body: &str,
) -> bool {
    let inserted = conn.execute(
        "INSERT INTO documents (table_name, body, revision)
         VALUES (?1, ?2, 1)
         ON CONFLICT(table_name) DO NOTHING;",
        params![table.name(), body],
    );
    match inserted {
        Ok(0) => false,
        Ok(_) => {
            cache.revision = Some(1);
            warn!(
                "event=store_commit module=store status=row_recreated table={} revision=1",
                table
            );
            true
        }
        Err(err) => {
            cache.revision = None;
            error!(
                "event=store_commit module=store status=error table={} error_code=recreate_failed error={}",
                table, err
            );
            true
        }
    }
}
