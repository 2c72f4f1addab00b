use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ResumeStorage, StoreError};
use crate::careers::applications::form::ResumeAttachment;
use crate::config::StorageConfig;

/// Location of an uploaded resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResume {
    pub object_name: String,
    pub signed_url: String,
}

#[derive(Debug, Clone)]
struct StoredObject {
    content_type: String,
    len: usize,
}

/// Object storage double that keeps resume metadata and mints signed URLs.
#[derive(Debug, Clone)]
pub struct InMemoryResumeStorage {
    config: StorageConfig,
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl InMemoryResumeStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            objects: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn object_names(&self) -> Vec<String> {
        match self.objects.lock() {
            Ok(guard) => {
                let mut names: Vec<_> = guard.keys().cloned().collect();
                names.sort();
                names
            }
            Err(_) => Vec::new(),
        }
    }

    pub fn content_type(&self, object_name: &str) -> Option<String> {
        self.objects
            .lock()
            .ok()
            .and_then(|guard| guard.get(object_name).map(|object| object.content_type.clone()))
    }

    fn signed_url(&self, object_name: &str, ttl: Duration) -> String {
        let now = Utc::now().timestamp();
        let expires = i64::try_from(ttl.as_secs())
            .map_or(i64::MAX, |secs| now.saturating_add(secs));
        format!(
            "{}/storage/v1/object/sign/{}/{}?token={}&expires={}",
            self.config.public_url.trim_end_matches('/'),
            self.config.resume_bucket,
            object_name,
            Uuid::new_v4().simple(),
            expires
        )
    }
}

/// `{owner}-{unix_millis}.{ext}` so repeat uploads by one applicant never collide.
pub fn resume_object_name(owner_id: &str, unix_millis: i64, resume: &ResumeAttachment) -> String {
    format!("{owner_id}-{unix_millis}.{}", resume.extension())
}

impl ResumeStorage for InMemoryResumeStorage {
    fn upload_resume(
        &self,
        resume: &ResumeAttachment,
        owner_id: &str,
    ) -> Result<StoredResume, StoreError> {
        if resume.bytes.is_empty() {
            return Err(StoreError::Unavailable("resume upload was empty".to_string()));
        }

        let object_name = resume_object_name(owner_id, Utc::now().timestamp_millis(), resume);
        let object = StoredObject {
            content_type: resume.resolved_content_type().to_string(),
            len: resume.bytes.len(),
        };

        let mut guard = self
            .objects
            .lock()
            .map_err(|_| StoreError::Unavailable("resume storage lock poisoned".to_string()))?;
        guard.insert(object_name.clone(), object);
        drop(guard);

        tracing::info!(
            bucket = %self.config.resume_bucket,
            object = %object_name,
            bytes = resume.bytes.len(),
            "resume uploaded"
        );

        Ok(StoredResume {
            signed_url: self.signed_url(&object_name, self.config.resume_url_ttl),
            object_name,
        })
    }
}

impl InMemoryResumeStorage {
    pub fn stored_len(&self, object_name: &str) -> Option<usize> {
        self.objects
            .lock()
            .ok()
            .and_then(|guard| guard.get(object_name).map(|object| object.len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names_follow_owner_timestamp_extension() {
        let resume = ResumeAttachment::new("Jane Doe CV.docx", vec![1, 2, 3]);
        assert_eq!(
            resume_object_name("user-7", 1_700_000_000_000, &resume),
            "user-7-1700000000000.docx"
        );
    }

    #[test]
    fn upload_returns_signed_url_in_bucket() {
        let storage = InMemoryResumeStorage::new(StorageConfig::default());
        let resume = ResumeAttachment::new("cv.pdf", b"%PDF-1.4".to_vec());

        let stored = storage.upload_resume(&resume, "owner-1").expect("upload succeeds");

        assert!(stored.object_name.starts_with("owner-1-"));
        assert!(stored.object_name.ends_with(".pdf"));
        assert!(stored
            .signed_url
            .starts_with("http://127.0.0.1:54321/storage/v1/object/sign/resumes/owner-1-"));
        assert_eq!(
            storage.content_type(&stored.object_name).as_deref(),
            Some("application/pdf")
        );
        assert_eq!(storage.stored_len(&stored.object_name), Some(8));
    }

    #[test]
    fn oversized_ttl_saturates_expiry() {
        let storage = InMemoryResumeStorage::new(StorageConfig {
            resume_url_ttl: Duration::from_secs(u64::MAX),
            ..StorageConfig::default()
        });
        let resume = ResumeAttachment::new("cv.pdf", b"%PDF-1.4".to_vec());

        let stored = storage.upload_resume(&resume, "owner-1").expect("upload succeeds");

        assert!(stored.signed_url.ends_with(&format!("expires={}", i64::MAX)));
    }

    #[test]
    fn empty_upload_is_rejected() {
        let storage = InMemoryResumeStorage::new(StorageConfig::default());
        let resume = ResumeAttachment::new("cv.pdf", Vec::new());
        assert!(matches!(
            storage.upload_resume(&resume, "owner-1"),
            Err(StoreError::Unavailable(_))
        ));
        assert!(storage.object_names().is_empty());
    }
}
