//! Hand-rolled in-memory collaborators for flow-engine tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use super::otp_flow::OtpGenerator;
use super::{ConfigStore, CredentialStore, EmailSender, SmsSender, TokenIssuer, UserDirectory};
use crate::clock::Clock;
use crate::errors::{AppError, Result};
use crate::models::user::{NewUser, UniqueField, User};

pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            millis: AtomicI64::new(start),
        }
    }

    pub fn advance(&self, ms: i64) {
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct MemoryConfigStore {
    values: Mutex<HashMap<String, serde_json::Value>>,
}

impl MemoryConfigStore {
    pub fn with(key: &str, value: serde_json::Value) -> Self {
        let store = Self::default();
        store.set(key, value);
        store
    }

    pub fn set(&self, key: &str, value: serde_json::Value) {
        self.values.lock().unwrap().insert(key.to_string(), value);
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }
}

#[derive(Default)]
pub struct FakeUsers {
    users: Mutex<Vec<User>>,
}

impl FakeUsers {
    pub fn seeded(user: User) -> Self {
        Self {
            users: Mutex::new(vec![user]),
        }
    }

    pub fn user(
        id: &str,
        email: Option<&str>,
        username: Option<&str>,
        firstname: Option<&str>,
    ) -> User {
        let now = Utc::now();
        User {
            id: Some(ObjectId::parse_str(id).expect("24-char hex id")),
            firstname: firstname.map(str::to_string),
            lastname: None,
            fullname: None,
            email: email.map(str::to_string),
            username: username.map(str::to_string),
            phone: None,
            phone_country_code: None,
            phone_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn all(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

fn unique_value(user: &User, field: UniqueField) -> Option<String> {
    match field {
        UniqueField::Email => user.email.clone(),
        UniqueField::Username => user.username.clone(),
        UniqueField::Phone => user.phone.clone(),
    }
}

#[async_trait]
impl UserDirectory for FakeUsers {
    async fn get_by_unique(&self, field: UniqueField, value: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| unique_value(u, field).as_deref() == Some(value))
            .cloned())
    }

    async fn create(&self, new: NewUser, unique: UniqueField) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let value = match unique {
            UniqueField::Email => new.email.clone(),
            UniqueField::Username => new.username.clone(),
            UniqueField::Phone => new.phone.clone(),
        }
        .ok_or(AppError::FailedToCreateUser)?;

        if let Some(existing) = users
            .iter()
            .find(|u| unique_value(u, unique).as_deref() == Some(value.as_str()))
        {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let user = User {
            id: Some(ObjectId::new()),
            firstname: new.firstname,
            lastname: new.lastname,
            fullname: new.fullname,
            email: new.email,
            username: new.username,
            phone: new.phone,
            phone_country_code: new.phone_country_code,
            phone_verified: new.phone_verified,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id_hex() == id)
            .cloned())
    }
}

type SentMessage = (String, String, HashMap<String, String>);

#[derive(Default)]
pub struct FakeSms {
    pub sent: Mutex<Vec<SentMessage>>,
    fail: AtomicBool,
}

impl FakeSms {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl SmsSender for FakeSms {
    async fn send(
        &self,
        receptor: &str,
        template: &str,
        params: HashMap<String, String>,
    ) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Sms("provider unavailable".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((receptor.to_string(), template.to_string(), params));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeEmail {
    pub sent: Mutex<Vec<SentMessage>>,
}

impl FakeEmail {
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailSender for FakeEmail {
    async fn send(
        &self,
        receptor: &str,
        template: &str,
        params: HashMap<String, String>,
    ) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((receptor.to_string(), template.to_string(), params));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePasswords {
    pub saved: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl CredentialStore for FakePasswords {
    async fn save(&self, user_id: &str, password: &str) -> Result<()> {
        self.saved
            .lock()
            .unwrap()
            .push((user_id.to_string(), password.to_string()));
        Ok(())
    }

    async fn compare(&self, user_id: &str, password: &str) -> Result<bool> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .iter()
            .any(|(u, p)| u == user_id && p == password))
    }
}

#[derive(Default)]
pub struct FakeTokens {
    counter: AtomicUsize,
}

#[async_trait]
impl TokenIssuer for FakeTokens {
    async fn issue(&self, _identity: &str, _service: &str) -> Result<String> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("token-{}", n))
    }
}

/// Scripted generator: yields the given codes in order, then keeps
/// repeating the last one.
pub struct SequenceOtpGenerator {
    codes: Vec<String>,
    next: AtomicUsize,
}

impl SequenceOtpGenerator {
    pub fn new(codes: &[&str]) -> Self {
        assert!(!codes.is_empty());
        Self {
            codes: codes.iter().map(|c| c.to_string()).collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl OtpGenerator for SequenceOtpGenerator {
    fn generate(&self, _length: u32) -> String {
        let idx = self.next.fetch_add(1, Ordering::SeqCst);
        self.codes[idx.min(self.codes.len() - 1)].clone()
    }
}
