//! In-memory fakes for the upload orchestration tests.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;
use veridia_core::models::User;
use veridia_core::{AppError, StorageBackend};
use veridia_db::{SessionRepositoryTrait, UserFaceRepositoryTrait, UserRepositoryTrait};
use veridia_events::EventPublisher;
use veridia_storage::{Storage, StorageError, StorageResult};

/// Storage fake that records keys, tracks peak concurrency, and can inject
/// per-photo delays and failures.
#[derive(Default)]
pub struct MockStorage {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    uploaded: Mutex<Vec<String>>,
    index_delays: Vec<Duration>,
    uniform_delay: Option<Duration>,
    fail_on: Option<String>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay each upload by the duration at its photo index.
    pub fn with_index_delays(mut self, delays: Vec<Duration>) -> Self {
        self.index_delays = delays;
        self
    }

    pub fn with_uniform_delay(mut self, delay: Duration) -> Self {
        self.uniform_delay = Some(delay);
        self
    }

    /// Fail any upload whose key contains the given substring.
    pub fn with_failure_on(mut self, key_fragment: &str) -> Self {
        self.fail_on = Some(key_fragment.to_string());
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn uploaded_keys(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    fn delay_for(&self, key: &str) -> Option<Duration> {
        if let Some(delay) = self.uniform_delay {
            return Some(delay);
        }
        // Keys look like `<prefix>/<session>/<pose>_face_<index>_<random><ext>`
        // where the index is 1-based.
        let index: usize = key
            .rsplit('/')
            .next()?
            .split('_')
            .nth(2)?
            .parse()
            .ok()?;
        self.index_delays.get(index.checked_sub(1)?).copied()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put_object(
        &self,
        storage_key: &str,
        _data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay_for(storage_key) {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(fragment) = &self.fail_on {
            if storage_key.contains(fragment.as_str()) {
                return Err(StorageError::UploadFailed(format!(
                    "injected failure for {storage_key}"
                )));
            }
        }

        self.uploaded
            .lock()
            .unwrap()
            .push(storage_key.to_string());
        Ok(format!("mock://{storage_key}"))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

pub fn test_user(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: "$2b$04$placeholderplaceholderplace".to_string(),
        full_name: None,
        phone_number: None,
        is_ekyc_uploaded: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Default)]
pub struct MockUserRepository {
    users: Mutex<HashMap<String, User>>,
    pub ekyc_marked: Mutex<Vec<Uuid>>,
    fail_mark_ekyc: bool,
}

impl MockUserRepository {
    pub fn with_user(user: User) -> Self {
        let repo = Self::default();
        repo.users.lock().unwrap().insert(user.email.clone(), user);
        repo
    }

    pub fn failing_mark_ekyc(mut self) -> Self {
        self.fail_mark_ekyc = true;
        self
    }
}

#[async_trait]
impl UserRepositoryTrait for MockUserRepository {
    async fn get_by_email(&self, email: &str) -> Result<User, AppError> {
        self.users
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .ok_or_else(|| AppError::UserNotFound("user not found".to_string()))
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(email) {
            return Err(AppError::AlreadyExists("user already exists".to_string()));
        }
        let mut user = test_user(email);
        user.password_hash = password_hash.to_string();
        user.full_name = full_name.map(str::to_string);
        user.phone_number = phone_number.map(str::to_string);
        users.insert(email.to_string(), user.clone());
        Ok(user)
    }

    async fn mark_ekyc_uploaded(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.fail_mark_ekyc {
            return Err(AppError::Internal("injected flag failure".to_string()));
        }
        self.ekyc_marked.lock().unwrap().push(user_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockFaceRepository {
    pub enrollments: Mutex<Vec<(Uuid, Vec<String>, Vec<String>, Vec<String>)>>,
    pub logins: Mutex<Vec<(Uuid, Vec<String>)>>,
    fail: bool,
}

impl MockFaceRepository {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl UserFaceRepositoryTrait for MockFaceRepository {
    async fn replace_enrollment_faces(
        &self,
        user_id: Uuid,
        left_urls: &[String],
        right_urls: &[String],
        front_urls: &[String],
    ) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Internal("injected persistence failure".to_string()));
        }
        self.enrollments.lock().unwrap().push((
            user_id,
            left_urls.to_vec(),
            right_urls.to_vec(),
            front_urls.to_vec(),
        ));
        Ok(())
    }

    async fn append_login_faces(&self, user_id: Uuid, urls: &[String]) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Internal("injected persistence failure".to_string()));
        }
        self.logins.lock().unwrap().push((user_id, urls.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockSessionRepository {
    pub tokens: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl MockSessionRepository {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SessionRepositoryTrait for MockSessionRepository {
    async fn register_push_token(&self, session_id: &str, fcm_token: &str) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Internal("injected token failure".to_string()));
        }
        self.tokens
            .lock()
            .unwrap()
            .push((session_id.to_string(), fcm_token.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockPublisher {
    pub signups: Mutex<Vec<(Uuid, String)>>,
    pub signins: Mutex<Vec<(Uuid, String)>>,
}

#[async_trait]
impl EventPublisher for MockPublisher {
    async fn publish_signup(&self, user_id: Uuid, session_id: &str) {
        self.signups
            .lock()
            .unwrap()
            .push((user_id, session_id.to_string()));
    }

    async fn publish_signin(&self, user_id: Uuid, session_id: &str) {
        self.signins
            .lock()
            .unwrap()
            .push((user_id, session_id.to_string()));
    }
}
