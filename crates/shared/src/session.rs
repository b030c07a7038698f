use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::privacy::{PrivacyChoice, SessionAuthorization, apply_choice};

const MAX_MEMORY_EXCHANGES: usize = 20;

/// Sessions are addressed by the sha-256 hash of the bearer token; the raw
/// token never lives in the store.
pub type SessionKey = Vec<u8>;

#[derive(Debug, Clone)]
pub struct Exchange {
    pub user_input: String,
    pub bot_response: String,
}

#[derive(Debug, Clone)]
struct SessionState {
    authorization: SessionAuthorization,
    memory: Vec<Exchange>,
    expires_at: DateTime<Utc>,
}

/// In-process session store. Holds only the per-session history
/// authorization and the capped conversation memory; nothing here is
/// durable and nothing outlives the process.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionKey, SessionState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, ttl_seconds: u64, now: DateTime<Utc>) -> String {
        let token = generate_secure_token("at");
        let state = SessionState {
            authorization: SessionAuthorization::denied(),
            memory: Vec::new(),
            expires_at: now + Duration::seconds(ttl_seconds as i64),
        };
        self.sessions.write().await.insert(hash_token(&token), state);
        token
    }

    pub async fn resolve(&self, token: &str, now: DateTime<Utc>) -> Option<SessionKey> {
        let key = hash_token(token);
        let sessions = self.sessions.read().await;
        let state = sessions.get(&key)?;
        if state.expires_at <= now {
            return None;
        }
        Some(key)
    }

    pub async fn authorization(&self, key: &SessionKey) -> Option<SessionAuthorization> {
        self.sessions
            .read()
            .await
            .get(key)
            .map(|state| state.authorization)
    }

    /// Routes a consent choice through the privacy gate's transition rules
    /// and returns the resulting authorization.
    pub async fn apply_consent(
        &self,
        key: &SessionKey,
        choice: PrivacyChoice,
    ) -> Option<SessionAuthorization> {
        let mut sessions = self.sessions.write().await;
        let state = sessions.get_mut(key)?;
        apply_choice(&mut state.authorization, choice);
        Some(state.authorization)
    }

    pub async fn memory(&self, key: &SessionKey) -> Vec<Exchange> {
        self.sessions
            .read()
            .await
            .get(key)
            .map(|state| state.memory.clone())
            .unwrap_or_default()
    }

    pub async fn record_exchange(&self, key: &SessionKey, user_input: &str, bot_response: &str) {
        let mut sessions = self.sessions.write().await;
        if let Some(state) = sessions.get_mut(key) {
            state.memory.push(Exchange {
                user_input: user_input.to_string(),
                bot_response: bot_response.to_string(),
            });
            if state.memory.len() > MAX_MEMORY_EXCHANGES {
                state.memory.remove(0);
            }
        }
    }
}

fn hash_token(value: &str) -> SessionKey {
    let digest = Sha256::digest(value.as_bytes());
    digest.to_vec()
}

fn generate_secure_token(prefix: &str) -> String {
    format!(
        "{prefix}_{}_{}",
        Uuid::new_v4().as_simple(),
        Uuid::new_v4().as_simple()
    )
}
