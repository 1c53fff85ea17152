use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use shared::{
    domain::{Category, CategoryId, CategoryType},
    error::ApiResult,
    protocol::{CategoryPayload, PageResponse},
};
use tokio::sync::Mutex;

use crate::{
    criteria::{CategoryCriteria, CategoryFilters},
    debounce::{Debouncer, SEARCH_DEBOUNCE},
    gateway::Gateway,
    list::{FetchOutcome, ListFetcher, ListState},
    mutation::{FieldError, MutationMessages, MutationRunner, SubmitOutcome},
    notify::{Notice, NotificationShell},
    pagination::Pager,
};

#[derive(Clone)]
pub struct CategoryApi {
    gateway: Gateway,
}

impl CategoryApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, criteria: &CategoryCriteria) -> ApiResult<PageResponse<Category>> {
        self.gateway
            .get_json("/admin/categories", &criteria.to_query())
            .await
    }

    pub async fn create(&self, payload: &CategoryPayload) -> ApiResult<()> {
        self.gateway.post("/admin/categories", payload).await
    }

    pub async fn update(&self, id: CategoryId, payload: &CategoryPayload) -> ApiResult<()> {
        self.gateway
            .put(&format!("/admin/categories/{}", id.0), payload)
            .await
    }

    pub async fn delete(&self, id: CategoryId) -> ApiResult<()> {
        self.gateway
            .delete(&format!("/admin/categories/{}", id.0))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct CategoryForm {
    pub name: String,
    pub kind: CategoryType,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<CategoryPayload, Vec<FieldError>> {
        let name = self.name.trim();
        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        } else if name.chars().count() > 100 {
            errors.push(FieldError::new(
                "name",
                "Name must be at most 100 characters",
            ));
        }
        if errors.is_empty() {
            Ok(CategoryPayload {
                name: name.to_string(),
                kind: self.kind,
            })
        } else {
            Err(errors)
        }
    }
}

struct CategoryPageState {
    filters: CategoryFilters,
    committed: CategoryFilters,
    pager: Pager,
}

/// The categories page workflow: debounced filters feed the criteria
/// builder, which drives the list fetcher; mutations refresh the visible
/// page on success.
pub struct CategoryBrowser {
    api: CategoryApi,
    notifier: Arc<dyn NotificationShell>,
    page: Mutex<CategoryPageState>,
    list: ListFetcher<Category>,
    name_debounce: Debouncer<String>,
    kind_debounce: Debouncer<Option<CategoryType>>,
    create_action: MutationRunner,
    update_action: MutationRunner,
    delete_action: MutationRunner,
}

impl CategoryBrowser {
    pub fn new(gateway: Gateway, notifier: Arc<dyn NotificationShell>) -> Arc<Self> {
        Self::new_with_debounce(gateway, notifier, SEARCH_DEBOUNCE)
    }

    pub fn new_with_debounce(
        gateway: Gateway,
        notifier: Arc<dyn NotificationShell>,
        window: Duration,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<CategoryBrowser>| {
            let name_debounce = {
                let weak = weak.clone();
                Debouncer::new(window, move |value: String| {
                    if let Some(browser) = weak.upgrade() {
                        tokio::spawn(async move { browser.commit_name(value).await });
                    }
                })
            };
            let kind_debounce = {
                let weak = weak.clone();
                Debouncer::new(window, move |value: Option<CategoryType>| {
                    if let Some(browser) = weak.upgrade() {
                        tokio::spawn(async move { browser.commit_kind(value).await });
                    }
                })
            };
            CategoryBrowser {
                api: CategoryApi::new(gateway),
                notifier: Arc::clone(&notifier),
                page: Mutex::new(CategoryPageState {
                    filters: CategoryFilters::default(),
                    committed: CategoryFilters::default(),
                    pager: Pager::new(),
                }),
                list: ListFetcher::new(),
                name_debounce,
                kind_debounce,
                create_action: MutationRunner::new(Arc::clone(&notifier)),
                update_action: MutationRunner::new(Arc::clone(&notifier)),
                delete_action: MutationRunner::new(notifier),
            }
        })
    }

    pub async fn state(&self) -> ListState<Category> {
        self.list.snapshot().await
    }

    pub async fn pager(&self) -> Pager {
        self.page.lock().await.pager
    }

    /// Re-runs the list fetch with the current committed criteria.
    pub async fn refresh(&self) {
        let criteria = {
            let page = self.page.lock().await;
            CategoryCriteria::build(&page.committed, page.pager.request_page())
        };
        let api = self.api.clone();
        match self
            .list
            .fetch_with(async move { api.list(&criteria).await })
            .await
        {
            FetchOutcome::Applied { total_pages } => {
                self.page.lock().await.pager.set_total_pages(total_pages);
            }
            FetchOutcome::Failed(err) => {
                let body = if err.is_generic() {
                    "The category list could not be loaded.".to_string()
                } else {
                    err.message
                };
                self.notifier.open(Notice::error("Failed to load categories", body));
            }
            FetchOutcome::Superseded => {}
        }
    }

    /// Records a keystroke in the name filter; the commit is debounced.
    pub async fn type_name(&self, input: &str) {
        self.page.lock().await.filters.name = input.to_string();
        self.name_debounce.submit(input.to_string()).await;
    }

    async fn commit_name(&self, value: String) {
        {
            let mut page = self.page.lock().await;
            page.committed.name = value;
            page.pager.reset();
        }
        self.refresh().await;
    }

    /// Switching the type filter resets the page immediately; the fetch
    /// itself still waits out the quiescence window.
    pub async fn select_kind(&self, kind: Option<CategoryType>) {
        {
            let mut page = self.page.lock().await;
            page.filters.kind = kind;
            page.pager.reset();
        }
        self.kind_debounce.submit(kind).await;
    }

    async fn commit_kind(&self, value: Option<CategoryType>) {
        {
            let mut page = self.page.lock().await;
            page.committed.kind = value;
            page.pager.reset();
        }
        self.refresh().await;
    }

    /// Commits filters in one synchronous step, cancelling pending debounce
    /// commits. Used by the clear-filters affordance and non-interactive
    /// shells.
    pub async fn apply_filters(&self, filters: CategoryFilters) {
        self.name_debounce.cancel().await;
        self.kind_debounce.cancel().await;
        {
            let mut page = self.page.lock().await;
            page.filters = filters.clone();
            page.committed = filters;
            page.pager.reset();
        }
        self.refresh().await;
    }

    pub async fn clear_filters(&self) {
        self.apply_filters(CategoryFilters::default()).await;
    }

    pub async fn go_to_page(&self, display_page: u32) {
        let moved = self.page.lock().await.pager.go_to(display_page);
        if moved {
            self.refresh().await;
        }
    }

    pub async fn next_page(&self) {
        let moved = self.page.lock().await.pager.next();
        if moved {
            self.refresh().await;
        }
    }

    pub async fn prev_page(&self) {
        let moved = self.page.lock().await.pager.prev();
        if moved {
            self.refresh().await;
        }
    }

    pub async fn create(self: &Arc<Self>, form: &CategoryForm) -> SubmitOutcome {
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };
        let api = self.api.clone();
        let browser = Arc::clone(self);
        let messages = MutationMessages::new(
            "Category created",
            "The category has been created.",
            "Could not create category",
            "The category could not be created.",
        );
        self.create_action
            .run(
                async move { api.create(&payload).await },
                &messages,
                async move { browser.refresh().await },
            )
            .await
    }

    pub async fn update(self: &Arc<Self>, id: CategoryId, form: &CategoryForm) -> SubmitOutcome {
        let payload = match form.validate() {
            Ok(payload) => payload,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };
        let api = self.api.clone();
        let browser = Arc::clone(self);
        let messages = MutationMessages::new(
            "Category updated",
            "The category has been updated.",
            "Could not update category",
            "The category could not be updated.",
        );
        self.update_action
            .run(
                async move { api.update(id, &payload).await },
                &messages,
                async move { browser.refresh().await },
            )
            .await
    }

    pub async fn delete(self: &Arc<Self>, id: CategoryId) -> SubmitOutcome {
        let api = self.api.clone();
        let browser = Arc::clone(self);
        let messages = MutationMessages::new(
            "Category deleted",
            "The category has been deleted.",
            "Could not delete category",
            "The category could not be deleted.",
        );
        self.delete_action
            .run(
                async move { api.delete(id).await },
                &messages,
                async move { browser.refresh().await },
            )
            .await
    }

    pub fn is_deleting(&self) -> bool {
        self.delete_action.is_in_flight()
    }
}
