//! Explicit session state shared by every command.
//!
//! `Session` owns the matching service handle, the patient directory, the
//! donors from the last successful search and the open chat thread. It is
//! wrapped in `Arc` by the UI adapter; tests build one per case.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use crate::chat::ChatThread;
use crate::client::MatchingService;
use crate::directory::DirectoryCache;
use crate::matching::MatchRequestBuilder;
use crate::models::Donor;

/// Errors from session state access.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Internal lock error")]
    LockPoisoned,
}

pub struct Session<S> {
    service: S,
    builder: MatchRequestBuilder,
    directory: DirectoryCache,
    /// Donors behind the current results; chat can only target these.
    last_donors: RwLock<Vec<Donor>>,
    /// Single search slot. See [`Session::try_begin_search`].
    searching: AtomicBool,
    chat: Mutex<Option<ChatThread>>,
}

impl<S: MatchingService> Session<S> {
    pub fn new(service: S) -> Self {
        Self::with_builder(service, MatchRequestBuilder::new())
    }

    pub fn with_builder(service: S, builder: MatchRequestBuilder) -> Self {
        Self {
            service,
            builder,
            directory: DirectoryCache::new(),
            last_donors: RwLock::new(Vec::new()),
            searching: AtomicBool::new(false),
            chat: Mutex::new(None),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn builder(&self) -> &MatchRequestBuilder {
        &self.builder
    }

    pub fn directory(&self) -> &DirectoryCache {
        &self.directory
    }

    // ── Search slot ─────────────────────────────────────────

    /// Claim the search slot without waiting.
    ///
    /// Returns `None` while another search holds it. The slot is released
    /// when the guard drops, whatever the search outcome.
    pub fn try_begin_search(&self) -> Option<SearchGuard<'_>> {
        self.searching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(SearchGuard {
            flag: &self.searching,
        })
    }

    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::Acquire)
    }

    // ── Last results ────────────────────────────────────────

    pub fn set_last_donors(&self, donors: Vec<Donor>) -> Result<(), SessionError> {
        let mut guard = self
            .last_donors
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        *guard = donors;
        Ok(())
    }

    pub fn last_donors(&self) -> Result<Vec<Donor>, SessionError> {
        self.last_donors
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| SessionError::LockPoisoned)
    }

    pub fn find_donor(&self, donor_id: &str) -> Result<Option<Donor>, SessionError> {
        let guard = self
            .last_donors
            .read()
            .map_err(|_| SessionError::LockPoisoned)?;
        Ok(guard.iter().find(|d| d.id == donor_id).cloned())
    }

    // ── Chat ────────────────────────────────────────────────

    /// Replace any open thread with `thread`.
    pub fn open_chat(&self, thread: ChatThread) -> Result<(), SessionError> {
        let mut guard = self.chat.lock().map_err(|_| SessionError::LockPoisoned)?;
        *guard = Some(thread);
        Ok(())
    }

    /// Run `f` on the open thread, `Ok(None)` when no thread is open.
    pub fn with_chat<T>(
        &self,
        f: impl FnOnce(&mut ChatThread) -> T,
    ) -> Result<Option<T>, SessionError> {
        let mut guard = self.chat.lock().map_err(|_| SessionError::LockPoisoned)?;
        Ok(guard.as_mut().map(f))
    }
}

/// RAII search slot. Dropping it frees the slot.
#[must_use = "the search slot is released as soon as the guard is dropped"]
pub struct SearchGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SearchGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeService;
    use crate::models::GeoPoint;

    fn donor(id: &str) -> Donor {
        Donor {
            id: id.into(),
            display_name: Donor::display_name_for(id),
            blood_type: "O-".into(),
            location: "Pune".into(),
            coordinates: GeoPoint { lat: 18.5, lon: 73.8 },
            confidence_percent: 70,
            distance_km: 1.0,
            score: 0.7,
            phone: String::new(),
            availability: String::new(),
            last_donation: "Recently".into(),
        }
    }

    #[test]
    fn search_slot_is_exclusive() {
        let session = Session::new(FakeService::default());
        let guard = session.try_begin_search().unwrap();
        assert!(session.is_searching());
        assert!(session.try_begin_search().is_none());

        drop(guard);
        assert!(!session.is_searching());
        assert!(session.try_begin_search().is_some());
    }

    #[test]
    fn donors_replaced_wholesale() {
        let session = Session::new(FakeService::default());
        session.set_last_donors(vec![donor("D1"), donor("D2")]).unwrap();
        assert!(session.find_donor("D2").unwrap().is_some());

        session.set_last_donors(vec![donor("D3")]).unwrap();
        assert!(session.find_donor("D2").unwrap().is_none());
        assert_eq!(session.last_donors().unwrap().len(), 1);
    }

    #[test]
    fn chat_absent_until_opened() {
        let session = Session::new(FakeService::default());
        assert!(session.with_chat(|t| t.id.clone()).unwrap().is_none());

        let thread = ChatThread::open(&donor("D1"));
        let id = thread.id.clone();
        session.open_chat(thread).unwrap();
        assert_eq!(session.with_chat(|t| t.id.clone()).unwrap(), Some(id));
    }
}
