use std::sync::Arc;

use url::Url;

pub mod categories;
pub mod criteria;
pub mod debounce;
pub mod gateway;
pub mod list;
pub mod mutation;
pub mod notify;
pub mod pagination;
pub mod session;
pub mod universities;

use crate::{
    categories::CategoryBrowser,
    gateway::Gateway,
    notify::NotificationShell,
    session::{Navigator, Session, TokenStore},
    universities::{UniversityBrowser, UniversityDetailView},
};

/// Entry point wiring the gateway and its collaborators. Page workflows are
/// created on demand and share the same authenticated gateway.
pub struct AdminClient {
    gateway: Gateway,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn NotificationShell>,
}

impl AdminClient {
    pub fn new(
        base_url: Url,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn NotificationShell>,
    ) -> Self {
        let gateway = Gateway::new(base_url, Arc::clone(&tokens), Arc::clone(&navigator));
        Self {
            gateway,
            tokens,
            navigator,
            notifier,
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn session(&self) -> Session {
        Session::new(
            self.gateway.clone(),
            Arc::clone(&self.tokens),
            Arc::clone(&self.navigator),
            Arc::clone(&self.notifier),
        )
    }

    pub fn categories(&self) -> Arc<CategoryBrowser> {
        CategoryBrowser::new(self.gateway.clone(), Arc::clone(&self.notifier))
    }

    pub fn universities(&self) -> Arc<UniversityBrowser> {
        UniversityBrowser::new(
            self.gateway.clone(),
            Arc::clone(&self.notifier),
            Arc::clone(&self.navigator),
        )
    }

    pub fn university_detail(&self) -> UniversityDetailView {
        UniversityDetailView::new(self.gateway.clone())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
