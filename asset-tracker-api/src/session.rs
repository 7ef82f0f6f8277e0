use anyhow::Result;
use asset_tracker_database::user;
use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: Option<i32>, // 管理员没有 user_id
    pub role: Role,
}

impl Session {
    pub fn admin() -> Self {
        Session {
            user_id: None,
            role: Role::Admin,
        }
    }

    pub fn user(user_id: i32) -> Self {
        Session {
            user_id: Some(user_id),
            role: Role::User,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// 会话存储，按令牌读写
pub trait SessionStore: Send + Sync {
    fn get(&self, token: &str) -> Option<Session>;

    fn put(&self, token: &str, session: Session);

    fn delete(&self, token: &str) -> Option<Session>;
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionStore {
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    fn put(&self, token: &str, session: Session) {
        self.sessions.insert(token.to_string(), session);
    }

    fn delete(&self, token: &str) -> Option<Session> {
        self.sessions.remove(token).map(|(_, session)| session)
    }
}

// SHA-256 十六进制摘要
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// 登录、登出和会话查询，存储中只保存令牌摘要
pub struct Authenticator<S> {
    store: S,
    admin_token_hash: Option<String>,
}

impl<S: SessionStore> Authenticator<S> {
    pub fn new(store: S, admin_token_hash: Option<String>) -> Self {
        Authenticator {
            store,
            admin_token_hash: admin_token_hash.map(|hash| hash.trim().to_lowercase()),
        }
    }

    pub fn admin_login(&self, token: &str) -> Option<Session> {
        let expected = self.admin_token_hash.as_deref()?;
        let token_hash = hash_token(token);

        if token_hash != expected {
            return None;
        }

        let session = Session::admin();
        self.store.put(&token_hash, session.clone());

        Some(session)
    }

    pub async fn user_login(&self, db: &PgPool, token: &str) -> Result<Option<Session>> {
        let token_hash = hash_token(token);

        let Some(user) = user::find_by_login_token_hash(db, &token_hash).await? else {
            return Ok(None);
        };

        let session = Session::user(user.id);
        self.store.put(&token_hash, session.clone());

        Ok(Some(session))
    }

    pub fn session(&self, token: &str) -> Option<Session> {
        self.store.get(&hash_token(token))
    }

    pub fn logout(&self, token: &str) -> Option<Session> {
        self.store.delete(&hash_token(token))
    }
}

impl<S> fmt::Debug for Authenticator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("admin_token_hash", &self.admin_token_hash.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}
