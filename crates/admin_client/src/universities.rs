use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use reqwest::multipart;
use shared::{
    domain::{University, UniversityId, UniversityStatus},
    error::{ApiError, ApiResult},
    protocol::{ChangeStatusRequest, PageResponse},
};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{
    criteria::{UniversityCriteria, UniversityFilters},
    debounce::{Debouncer, SEARCH_DEBOUNCE},
    gateway::Gateway,
    list::{DetailFetcher, DetailState, FetchOutcome, ListFetcher, ListState},
    mutation::{FieldError, MutationMessages, MutationRunner, SubmitOutcome},
    notify::{Notice, NotificationShell},
    pagination::Pager,
    session::{Navigator, Route},
};

/// University records are created and edited as multipart forms so the logo
/// image can ride along with the scalar fields.
#[derive(Debug, Clone)]
pub struct UniversityForm {
    pub name: String,
    pub short_name: String,
    pub address: String,
    pub email_domain: String,
    pub city: String,
    pub website: String,
    pub description: String,
    pub status: UniversityStatus,
}

impl UniversityForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if self.short_name.trim().is_empty() {
            errors.push(FieldError::new("shortName", "Short name is required"));
        }
        if self.email_domain.trim().is_empty() {
            errors.push(FieldError::new("emailDomain", "Email domain is required"));
        } else if !self.email_domain.contains('.') {
            errors.push(FieldError::new("emailDomain", "Email domain is invalid"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

fn multipart_form(form: &UniversityForm, logo: Option<&LogoUpload>) -> ApiResult<multipart::Form> {
    let mut parts = multipart::Form::new()
        .text("name", form.name.clone())
        .text("shortName", form.short_name.clone())
        .text("address", form.address.clone())
        .text("emailDomain", form.email_domain.clone())
        .text("city", form.city.clone())
        .text("website", form.website.clone())
        .text("description", form.description.clone())
        .text("status", form.status.as_str());
    if let Some(logo) = logo {
        let part = multipart::Part::bytes(logo.bytes.clone())
            .file_name(logo.filename.clone())
            .mime_str(&logo.content_type)
            .map_err(|err| {
                warn!("universities: invalid logo content type: {err}");
                ApiError::internal()
            })?;
        parts = parts.part("logo", part);
    }
    Ok(parts)
}

#[derive(Clone)]
pub struct UniversityApi {
    gateway: Gateway,
}

impl UniversityApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, criteria: &UniversityCriteria) -> ApiResult<PageResponse<University>> {
        self.gateway
            .get_json("/admin/universities", &criteria.to_query())
            .await
    }

    pub async fn detail(&self, id: UniversityId) -> ApiResult<University> {
        self.gateway
            .get_json(&format!("/admin/universities/{}", id.0), &[])
            .await
    }

    pub async fn create(&self, form: &UniversityForm, logo: Option<&LogoUpload>) -> ApiResult<()> {
        self.gateway
            .post_multipart("/admin/universities", multipart_form(form, logo)?)
            .await
    }

    pub async fn update(
        &self,
        id: UniversityId,
        form: &UniversityForm,
        logo: Option<&LogoUpload>,
    ) -> ApiResult<()> {
        self.gateway
            .put_multipart(
                &format!("/admin/universities/{}", id.0),
                multipart_form(form, logo)?,
            )
            .await
    }

    pub async fn delete(&self, id: UniversityId) -> ApiResult<()> {
        self.gateway
            .delete(&format!("/admin/universities/{}", id.0))
            .await
    }

    pub async fn change_status(&self, id: UniversityId, status: UniversityStatus) -> ApiResult<()> {
        self.gateway
            .patch(
                &format!("/admin/universities/{}/status", id.0),
                &ChangeStatusRequest { status },
            )
            .await
    }
}

struct UniversityPageState {
    filters: UniversityFilters,
    committed: UniversityFilters,
    pager: Pager,
}

/// The universities page workflow. Mirrors [`crate::categories::CategoryBrowser`]
/// and adds the status toggle and multipart create/update flows.
pub struct UniversityBrowser {
    api: UniversityApi,
    notifier: Arc<dyn NotificationShell>,
    navigator: Arc<dyn Navigator>,
    page: Mutex<UniversityPageState>,
    list: ListFetcher<University>,
    name_debounce: Debouncer<String>,
    status_debounce: Debouncer<Option<UniversityStatus>>,
    create_action: MutationRunner,
    update_action: MutationRunner,
    delete_action: MutationRunner,
    status_action: MutationRunner,
}

impl UniversityBrowser {
    pub fn new(
        gateway: Gateway,
        notifier: Arc<dyn NotificationShell>,
        navigator: Arc<dyn Navigator>,
    ) -> Arc<Self> {
        Self::new_with_debounce(gateway, notifier, navigator, SEARCH_DEBOUNCE)
    }

    pub fn new_with_debounce(
        gateway: Gateway,
        notifier: Arc<dyn NotificationShell>,
        navigator: Arc<dyn Navigator>,
        window: Duration,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<UniversityBrowser>| {
            let name_debounce = {
                let weak = weak.clone();
                Debouncer::new(window, move |value: String| {
                    if let Some(browser) = weak.upgrade() {
                        tokio::spawn(async move { browser.commit_name(value).await });
                    }
                })
            };
            let status_debounce = {
                let weak = weak.clone();
                Debouncer::new(window, move |value: Option<UniversityStatus>| {
                    if let Some(browser) = weak.upgrade() {
                        tokio::spawn(async move { browser.commit_status(value).await });
                    }
                })
            };
            UniversityBrowser {
                api: UniversityApi::new(gateway),
                notifier: Arc::clone(&notifier),
                navigator,
                page: Mutex::new(UniversityPageState {
                    filters: UniversityFilters::default(),
                    committed: UniversityFilters::default(),
                    pager: Pager::new(),
                }),
                list: ListFetcher::new(),
                name_debounce,
                status_debounce,
                create_action: MutationRunner::new(Arc::clone(&notifier)),
                update_action: MutationRunner::new(Arc::clone(&notifier)),
                delete_action: MutationRunner::new(Arc::clone(&notifier)),
                status_action: MutationRunner::new(notifier),
            }
        })
    }

    pub async fn state(&self) -> ListState<University> {
        self.list.snapshot().await
    }

    pub async fn pager(&self) -> Pager {
        self.page.lock().await.pager
    }

    pub async fn refresh(&self) {
        let criteria = {
            let page = self.page.lock().await;
            UniversityCriteria::build(&page.committed, page.pager.request_page())
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
                    "The university list could not be loaded.".to_string()
                } else {
                    err.message
                };
                self.notifier
                    .open(Notice::error("Failed to load universities", body));
            }
            FetchOutcome::Superseded => {}
        }
    }

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

    pub async fn select_status(&self, status: Option<UniversityStatus>) {
        {
            let mut page = self.page.lock().await;
            page.filters.status = status;
            page.pager.reset();
        }
        self.status_debounce.submit(status).await;
    }

    async fn commit_status(&self, value: Option<UniversityStatus>) {
        {
            let mut page = self.page.lock().await;
            page.committed.status = value;
            page.pager.reset();
        }
        self.refresh().await;
    }

    pub async fn apply_filters(&self, filters: UniversityFilters) {
        self.name_debounce.cancel().await;
        self.status_debounce.cancel().await;
        {
            let mut page = self.page.lock().await;
            page.filters = filters.clone();
            page.committed = filters;
            page.pager.reset();
        }
        self.refresh().await;
    }

    pub async fn clear_filters(&self) {
        self.apply_filters(UniversityFilters::default()).await;
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

    pub async fn create(
        self: &Arc<Self>,
        form: &UniversityForm,
        logo: Option<LogoUpload>,
    ) -> SubmitOutcome {
        if let Err(errors) = form.validate() {
            return SubmitOutcome::Invalid(errors);
        }
        let api = self.api.clone();
        let form = form.clone();
        let browser = Arc::clone(self);
        let messages = MutationMessages::new(
            "University created",
            "The university has been created.",
            "Could not create university",
            "The university could not be created.",
        );
        self.create_action
            .run(
                async move { api.create(&form, logo.as_ref()).await },
                &messages,
                async move {
                    browser.refresh().await;
                    browser.navigator.navigate(Route::Universities);
                },
            )
            .await
    }

    pub async fn update(
        self: &Arc<Self>,
        id: UniversityId,
        form: &UniversityForm,
        logo: Option<LogoUpload>,
    ) -> SubmitOutcome {
        if let Err(errors) = form.validate() {
            return SubmitOutcome::Invalid(errors);
        }
        let api = self.api.clone();
        let form = form.clone();
        let browser = Arc::clone(self);
        let messages = MutationMessages::new(
            "University updated",
            "The university has been updated.",
            "Could not update university",
            "The university could not be updated.",
        );
        self.update_action
            .run(
                async move { api.update(id, &form, logo.as_ref()).await },
                &messages,
                async move {
                    browser.refresh().await;
                    browser.navigator.navigate(Route::UniversityDetail(id));
                },
            )
            .await
    }

    pub async fn delete(self: &Arc<Self>, id: UniversityId) -> SubmitOutcome {
        let api = self.api.clone();
        let browser = Arc::clone(self);
        let messages = MutationMessages::new(
            "University deleted",
            "The university has been deleted.",
            "Could not delete university",
            "The university could not be deleted.",
        );
        self.delete_action
            .run(
                async move { api.delete(id).await },
                &messages,
                async move { browser.refresh().await },
            )
            .await
    }

    /// Flips Active ⇄ Inactive. A deleted record has no toggle affordance,
    /// so the request is rejected locally without a network call.
    pub async fn toggle_status(self: &Arc<Self>, university: &University) -> SubmitOutcome {
        let Some(next) = university.status.toggled() else {
            warn!(
                university_id = university.id.0,
                "universities: status toggle is not available for a deleted record"
            );
            return SubmitOutcome::Invalid(vec![FieldError::new(
                "status",
                "A deleted university cannot change status",
            )]);
        };
        let api = self.api.clone();
        let id = university.id;
        let browser = Arc::clone(self);
        let messages = MutationMessages::new(
            "University status updated",
            "The university status has been updated.",
            "Could not update status",
            "The university status could not be updated.",
        );
        self.status_action
            .run(
                async move { api.change_status(id, next).await },
                &messages,
                async move { browser.refresh().await },
            )
            .await
    }

    pub fn is_deleting(&self) -> bool {
        self.delete_action.is_in_flight()
    }

    pub fn is_changing_status(&self) -> bool {
        self.status_action.is_in_flight()
    }
}

/// Detail page state holder. A reload keeps the previously fetched record
/// visible until the new response lands, so reopening a page mid-refetch
/// never flashes an empty state.
pub struct UniversityDetailView {
    api: UniversityApi,
    detail: DetailFetcher<University>,
}

impl UniversityDetailView {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            api: UniversityApi::new(gateway),
            detail: DetailFetcher::new(),
        }
    }

    pub async fn load(&self, id: UniversityId) -> Result<(), ApiError> {
        let api = self.api.clone();
        self.detail
            .fetch_with(async move { api.detail(id).await })
            .await
    }

    pub async fn snapshot(&self) -> DetailState<University> {
        self.detail.snapshot().await
    }
}
