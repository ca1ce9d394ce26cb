//! Per-job processing sessions and the shared workspace they run in.

pub mod handlers;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::classifier::{classify, is_resume_selector};
use crate::models::field::{FieldDescriptor, FieldSnapshot};
use crate::models::job::JobContext;
use crate::resolver::cover_letter::CoverLetterState;
use crate::resolver::{AnswerResolver, Resolution};
use crate::store::AnswerStore;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub job: Option<JobContext>,
    /// Set once a cover letter was generated during this session.
    pub used_cover: bool,
    pub cover_letter_state: Option<CoverLetterState>,
    pub fields_resolved: usize,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(job: Option<JobContext>) -> Self {
        Self {
            id: Uuid::new_v4(),
            job,
            used_cover: false,
            cover_letter_state: None,
            fields_resolved: 0,
            started_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            job: self.job.clone(),
            used_cover: self.used_cover,
            cover_letter_state: self.cover_letter_state,
            fields_resolved: self.fields_resolved,
            started_at: self.started_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub job: Option<JobContext>,
    pub used_cover: bool,
    pub cover_letter_state: Option<CoverLetterState>,
    pub fields_resolved: usize,
    pub started_at: DateTime<Utc>,
}

/// Sessions older than this are dropped when a new one opens.
const SESSION_TTL_HOURS: i64 = 24;

/// Everything field work mutates. Lives behind one mutex in `AppState`.
#[derive(Debug, Default)]
pub struct Workspace {
    pub store: AnswerStore,
    pub sessions: HashMap<Uuid, Session>,
}

impl Workspace {
    pub fn new(store: AnswerStore) -> Self {
        Self {
            store,
            sessions: HashMap::new(),
        }
    }

    pub fn open_session(&mut self, job: Option<JobContext>) -> &Session {
        self.sweep_expired(Utc::now());
        let session = Session::new(job);
        let id = session.id;
        match &session.job {
            Some(job) => info!("Opened session {id} for {}", job.headline()),
            None => info!("Opened session {id} without job context"),
        }
        self.sessions.entry(id).or_insert(session)
    }

    /// Drops a session without recording an outcome.
    pub fn close_session(&mut self, id: &Uuid) -> Option<Session> {
        let session = self.sessions.remove(id)?;
        info!("Closed session {id} after {} fields", session.fields_resolved);
        Some(session)
    }

    fn sweep_expired(&mut self, now: DateTime<Utc>) {
        let cutoff = now - Duration::hours(SESSION_TTL_HOURS);
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.started_at > cutoff);
        let dropped = before - self.sessions.len();
        if dropped > 0 {
            warn!("Dropped {dropped} abandoned sessions");
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub descriptor: FieldDescriptor,
    /// `None` when the field was skipped.
    pub resolution: Option<Resolution>,
    pub skipped: bool,
}

/// Classifies and resolves one field. Resume pickers are left alone; the
/// driver keeps whatever file the site preselected.
pub async fn process_field(
    resolver: &AnswerResolver,
    snapshot: &FieldSnapshot,
    store: &mut AnswerStore,
    session: &mut Session,
) -> FieldReport {
    let descriptor = classify(snapshot);

    if is_resume_selector(&descriptor) {
        info!("Skipping resume selector '{}'", descriptor.label);
        return FieldReport {
            descriptor,
            resolution: None,
            skipped: true,
        };
    }

    let resolution = resolver.resolve(&descriptor, store, session).await;
    session.fields_resolved += 1;

    if resolution.persisted {
        if let Err(e) = store.flush() {
            error!("Failed to persist answer for '{}': {e}", descriptor.label);
        }
    }

    FieldReport {
        descriptor,
        resolution: Some(resolution),
        skipped: false,
    }
}
