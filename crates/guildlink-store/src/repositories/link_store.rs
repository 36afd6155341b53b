//! Link store - confirmed links and pending codes
//!
//! Both maps are concurrent so lookups from HTTP handlers and the gateway
//! session never block each other. Link mutations and the snapshot write that
//! follows them run under one mutex, so two concurrent saves can never persist
//! out of order. [`LinkStore::try_link`] runs its conflict checks under the
//! same mutex, so a remote account can never end up linked to two players.
//!
//! Every link mutation writes the snapshot synchronously and may block on
//! disk I/O.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, error, info, instrument, warn};

use guildlink_core::{
    normalize_code, BlobStore, DomainError, LinkRecord, PendingLink, PlayerId, Snowflake,
};

use super::StoreResult;
use crate::models::LinkSnapshot;

/// Why [`LinkStore::try_link`] refused a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkConflict {
    /// The remote account is linked to this other player
    RemoteTaken(PlayerId),
    /// The player already has a link and overwriting was not allowed
    PlayerLinked,
}

/// A record accepted by [`LinkStore::try_link`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedLink {
    /// The record as stored, roles carried over from `replaced`
    pub record: LinkRecord,
    pub replaced: Option<LinkRecord>,
}

pub struct LinkStore {
    links: DashMap<PlayerId, LinkRecord>,
    pending: DashMap<String, PendingLink>,
    codes_generated: AtomicU64,
    blob: Option<Arc<dyn BlobStore>>,
    write_lock: Mutex<()>,
}

impl LinkStore {
    /// Store with no persistence; state is lost on drop
    pub fn in_memory() -> Self {
        Self {
            links: DashMap::new(),
            pending: DashMap::new(),
            codes_generated: AtomicU64::new(0),
            blob: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Open a store over `blob`, loading whatever it holds.
    ///
    /// Absent or blank blobs are initialized with an empty snapshot. A blob
    /// that cannot be parsed is reported at error level and replaced with an
    /// empty snapshot; the links it held are lost.
    pub fn open(blob: Arc<dyn BlobStore>) -> Self {
        let store = Self {
            blob: Some(blob),
            ..Self::in_memory()
        };
        store.load();
        store
    }

    fn load(&self) {
        let Some(blob) = &self.blob else { return };

        let raw = match blob.read() {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "Failed to read link storage; starting empty");
                None
            }
        };

        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            info!("Link storage is empty; initializing");
            self.persist_or_log();
            return;
        };

        match LinkSnapshot::from_json(&raw) {
            Ok(snapshot) => {
                self.codes_generated
                    .store(snapshot.codes_generated, Ordering::Relaxed);
                for record in snapshot.links {
                    self.links.insert(record.player_id, record);
                }
                for pending in snapshot.pending {
                    self.pending.insert(pending.key(), pending);
                }
                info!(
                    links = self.links.len(),
                    pending = self.pending.len(),
                    "Loaded link storage"
                );
            }
            Err(e) => {
                error!(
                    error = %e,
                    bytes = raw.len(),
                    "Link storage is corrupt; resetting to empty and discarding stored links"
                );
                self.persist_or_log();
            }
        }
    }

    // =========================================================================
    // Links
    // =========================================================================

    pub fn find_link(&self, player: PlayerId) -> Option<LinkRecord> {
        self.links.get(&player).map(|r| r.value().clone())
    }

    /// Upsert by player, then persist the full snapshot.
    ///
    /// The in-memory change stands even if the write fails.
    #[instrument(skip(self, record), fields(player = %record.player_id, remote = %record.remote_id))]
    pub fn save_link(&self, record: LinkRecord) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        self.links.insert(record.player_id, record);
        self.persist()
    }

    /// Insert `record` unless it conflicts with an existing link.
    ///
    /// The checks and the insert happen under the write lock. A remote account
    /// linked to a different player always conflicts; an existing link for
    /// the same player conflicts unless `allow_overwrite` is set, in which
    /// case the old record's roles are carried into the new one. A failed
    /// snapshot write is logged and the in-memory link stands.
    #[instrument(skip(self, record), fields(player = %record.player_id, remote = %record.remote_id))]
    pub fn try_link(
        &self,
        record: LinkRecord,
        allow_overwrite: bool,
    ) -> Result<AppliedLink, LinkConflict> {
        let _guard = self.write_lock.lock();

        if let Some(owner) = self.remote_linked_to(record.remote_id) {
            if owner != record.player_id {
                return Err(LinkConflict::RemoteTaken(owner));
            }
        }

        let replaced = self.find_link(record.player_id);
        let record = match &replaced {
            Some(_) if !allow_overwrite => return Err(LinkConflict::PlayerLinked),
            Some(previous) => record.with_roles(previous.roles.clone()),
            None => record,
        };

        self.links.insert(record.player_id, record.clone());
        if let Err(e) = self.persist() {
            warn!(error = %e, "Link kept in memory only");
        }

        Ok(AppliedLink { record, replaced })
    }

    /// Delete if present, then persist
    #[instrument(skip(self))]
    pub fn remove_link(&self, player: PlayerId) -> StoreResult<Option<LinkRecord>> {
        let _guard = self.write_lock.lock();
        let removed = self.links.remove(&player).map(|(_, record)| record);
        self.persist()?;
        Ok(removed)
    }

    /// Replace the stored role snapshot of an existing link.
    ///
    /// Returns `false` when the player has no link (it was removed while a
    /// sync was in flight).
    pub fn set_roles(
        &self,
        player: PlayerId,
        roles: Vec<Snowflake>,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let _guard = self.write_lock.lock();
        let updated = match self.links.get_mut(&player) {
            Some(mut record) => {
                record.update_roles(roles, now);
                true
            }
            None => false,
        };
        if updated {
            self.persist()?;
        }
        Ok(updated)
    }

    pub fn is_remote_already_linked(&self, remote_id: Snowflake) -> bool {
        self.links.iter().any(|r| r.remote_id == remote_id)
    }

    /// Player the remote account is linked to, if any
    pub fn remote_linked_to(&self, remote_id: Snowflake) -> Option<PlayerId> {
        self.links
            .iter()
            .find(|r| r.remote_id == remote_id)
            .map(|r| r.player_id)
    }

    /// All links, ordered by link time
    pub fn links(&self) -> Vec<LinkRecord> {
        let mut links: Vec<LinkRecord> = self.links.iter().map(|r| r.value().clone()).collect();
        links.sort_by_key(|r| r.linked_at);
        links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    // =========================================================================
    // Pending codes (memory only; written out with the next link mutation)
    // =========================================================================

    pub fn save_pending(&self, pending: PendingLink) {
        self.pending.insert(pending.key(), pending);
    }

    pub fn find_pending(&self, code: &str) -> Option<PendingLink> {
        self.pending
            .get(&normalize_code(code))
            .map(|p| p.value().clone())
    }

    pub fn remove_pending(&self, code: &str) -> Option<PendingLink> {
        self.pending.remove(&normalize_code(code)).map(|(_, p)| p)
    }

    /// First pending code found for the player; iteration order is unspecified
    pub fn find_pending_by_player(&self, player: PlayerId) -> Option<PendingLink> {
        self.pending
            .iter()
            .find(|p| p.player_id == player)
            .map(|p| p.value().clone())
    }

    pub fn count_pending_for_player(&self, player: PlayerId) -> usize {
        self.pending.iter().filter(|p| p.player_id == player).count()
    }

    /// Drop pending codes whose expiry is at or before `now`
    pub fn cleanup_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, p| p.expires_at > now);
        let removed = before.saturating_sub(self.pending.len());
        if removed > 0 {
            debug!(removed, "Swept expired pending codes");
        }
        removed
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    // =========================================================================
    // Counters
    // =========================================================================

    pub fn codes_generated(&self) -> u64 {
        self.codes_generated.load(Ordering::Relaxed)
    }

    pub fn record_code_generated(&self) -> u64 {
        self.codes_generated.fetch_add(1, Ordering::Relaxed) + 1
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn snapshot(&self) -> LinkSnapshot {
        LinkSnapshot {
            codes_generated: self.codes_generated(),
            links: self.links.iter().map(|r| r.value().clone()).collect(),
            pending: self.pending.iter().map(|p| p.value().clone()).collect(),
        }
    }

    /// Serialize and write; callers hold `write_lock` when mutating links
    fn persist(&self) -> StoreResult<()> {
        let Some(blob) = &self.blob else {
            return Ok(());
        };
        let json = self
            .snapshot()
            .to_json()
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        blob.write(&json).map_err(|e| {
            error!(error = %e, "Failed to persist link storage");
            DomainError::from(e)
        })
    }

    fn persist_or_log(&self) {
        if let Err(e) = self.persist() {
            warn!(error = %e, "Could not initialize link storage");
        }
    }
}

impl std::fmt::Debug for LinkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkStore")
            .field("links", &self.links.len())
            .field("pending", &self.pending.len())
            .field("persistent", &self.blob.is_some())
            .finish()
    }
}
