use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{UniversityId, UserProfile, UserRole},
    protocol::{LoginRequest, LoginResponse},
};
use tracing::{info, warn};

use crate::{
    gateway::Gateway,
    mutation::{FieldError, SubmitOutcome},
    notify::{Notice, NoticeSize, NotificationShell},
};

/// Single-slot persisted token storage. Read before each authenticated
/// request, cleared when the backend rejects the session.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Option<String>;
    async fn save(&self, token: &str);
    async fn clear(&self);
}

#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Option<String> {
        self.guard().clone()
    }

    async fn save(&self, token: &str) {
        *self.guard() = Some(token.to_string());
    }

    async fn clear(&self) {
        *self.guard() = None;
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenSlot {
    token: String,
}

/// Token slot persisted as a small TOML file next to the app's other data.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_slot(&self) -> anyhow::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read token file '{}'", self.path.display()))?;
        let slot: TokenSlot = toml::from_str(&raw)
            .with_context(|| format!("invalid token file '{}'", self.path.display()))?;
        Ok(Some(slot.token))
    }

    fn write_slot(&self, token: &str) -> anyhow::Result<()> {
        ensure_parent_dir_exists(&self.path)?;
        let raw = toml::to_string(&TokenSlot {
            token: token.to_string(),
        })
        .context("failed to encode token slot")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write token file '{}'", self.path.display()))?;
        Ok(())
    }
}

fn ensure_parent_dir_exists(path: &Path) -> anyhow::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for token file",
            parent.display()
        )
    })?;
    Ok(())
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Option<String> {
        match self.read_slot() {
            Ok(token) => token,
            Err(err) => {
                warn!("session: {err:#}");
                None
            }
        }
    }

    async fn save(&self, token: &str) {
        if let Err(err) = self.write_slot(token) {
            warn!("session: {err:#}");
        }
    }

    async fn clear(&self) {
        if self.path.exists() {
            if let Err(err) = fs::remove_file(&self.path) {
                warn!(
                    "session: failed to remove token file '{}': {err}",
                    self.path.display()
                );
            }
        }
    }
}

/// Symbolic navigation targets. The core asks the shell to move; it does not
/// own route definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Categories,
    Universities,
    UniversityCreate,
    UniversityDetail(UniversityId),
    UniversityEdit(UniversityId),
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: Route) {
        info!(?route, "session: navigation requested with no shell attached");
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            errors.push(FieldError::new("email", "Email address is invalid"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        } else if self.password.chars().count() < 6 {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

pub struct Session {
    gateway: Gateway,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn NotificationShell>,
}

impl Session {
    pub fn new(
        gateway: Gateway,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn NotificationShell>,
    ) -> Self {
        Self {
            gateway,
            tokens,
            navigator,
            notifier,
        }
    }

    /// Signs in and persists the token. Only a system administrator is
    /// accepted; any other role is treated as an invalid credential and the
    /// token is discarded.
    pub async fn login(&self, form: &LoginForm) -> SubmitOutcome {
        if let Err(errors) = form.validate() {
            return SubmitOutcome::Invalid(errors);
        }

        let request = LoginRequest {
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };
        match self
            .gateway
            .post_json::<_, LoginResponse>("/auth/login", &request)
            .await
        {
            Ok(response) if response.user.role == UserRole::SystemAdmin => {
                self.tokens.save(&response.token).await;
                info!(user_id = response.user.id.0, "session: administrator signed in");
                self.navigator.navigate(Route::Home);
                SubmitOutcome::Completed
            }
            Ok(response) => {
                warn!(
                    user_id = response.user.id.0,
                    "session: login rejected for non-administrator role"
                );
                self.notifier.open(
                    Notice::error("Sign in failed", "Invalid administrator credentials")
                        .sized(NoticeSize::Sm),
                );
                SubmitOutcome::Failed
            }
            Err(err) => {
                warn!(status = err.status, "session: login failed: {}", err.message);
                self.notifier
                    .open(Notice::error("Sign in failed", err.message).sized(NoticeSize::Sm));
                SubmitOutcome::Failed
            }
        }
    }

    /// Fetches the signed-in profile. With no stored token, or when the
    /// backend rejects the session, the token slot is cleared and the shell
    /// is sent back to the login route.
    pub async fn current_user(&self) -> Option<UserProfile> {
        if self.tokens.load().await.is_none() {
            self.navigator.navigate(Route::Login);
            return None;
        }
        match self.gateway.get_json::<UserProfile>("/user/profile", &[]).await {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(
                    status = err.status,
                    "session: profile fetch failed: {}", err.message
                );
                self.tokens.clear().await;
                self.navigator.navigate(Route::Login);
                None
            }
        }
    }

    pub async fn logout(&self) {
        self.tokens.clear().await;
        self.navigator.navigate(Route::Login);
    }
}
