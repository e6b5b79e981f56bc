pub mod backend;
pub mod file_store;

pub use backend::DocumentStore;
pub use file_store::FileDocumentStore;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::types::UserProfile;

/// Shared handle to the process-wide document store.
///
/// Services hold the lock across each read-modify-write sequence, so
/// compound operations (profile merge, diary append) never interleave.
pub type SharedStore = Arc<Mutex<Box<dyn DocumentStore>>>;

/// The singleton profile document as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDoc {
    pub nickname: String,
    pub age: String,
    pub occupation: String,
    pub medical_conditions: String,
    pub updated_at: DateTime<Utc>,
}

impl ProfileDoc {
    /// Fresh document with onboarding defaults and a current timestamp.
    pub fn with_defaults() -> Self {
        let defaults = UserProfile::default();
        Self {
            nickname: defaults.nickname,
            age: defaults.age,
            occupation: defaults.occupation,
            medical_conditions: defaults.medical_conditions,
            updated_at: Utc::now(),
        }
    }

    /// Projection into the public wire shape.
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            nickname: self.nickname.clone(),
            age: self.age.clone(),
            occupation: self.occupation.clone(),
            medical_conditions: self.medical_conditions.clone(),
        }
    }
}

/// A diary entry document. At most one exists per calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryDoc {
    pub id: Uuid,
    pub date: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl DiaryDoc {
    pub fn new(date: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: date.into(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}
