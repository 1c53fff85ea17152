use std::sync::Arc;

use admin_client::{
    criteria::{CategoryFilters, UniversityFilters},
    mutation::SubmitOutcome,
    notify::SingleSlotShell,
    session::{FileTokenStore, LoginForm, Navigator, Route},
    AdminClient,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::{CategoryType, UniversityId, UniversityStatus};
use url::Url;

mod config;

const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

#[derive(Parser, Debug)]
#[command(name = "study-hub-admin", about = "Study Hub admin console")]
struct Args {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    /// Overrides the configured API base URL.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the signed-in administrator profile.
    Profile,
    /// List categories with optional name/type filters.
    Categories {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        kind: Option<String>,
    },
    /// List universities with optional name/status filters.
    Universities {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one university record.
    University { id: i64 },
}

struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(?route, "console: navigation requested");
    }
}

fn parse_kind(raw: &str) -> Result<CategoryType> {
    match raw.to_ascii_uppercase().as_str() {
        "TOPIC" => Ok(CategoryType::Topic),
        "PRODUCT" => Ok(CategoryType::Product),
        other => bail!("unknown category type '{other}' (expected TOPIC or PRODUCT)"),
    }
}

fn parse_status(raw: &str) -> Result<UniversityStatus> {
    match raw.to_ascii_uppercase().as_str() {
        "ACTIVE" => Ok(UniversityStatus::Active),
        "INACTIVE" => Ok(UniversityStatus::Inactive),
        "DELETED" => Ok(UniversityStatus::Deleted),
        other => bail!("unknown university status '{other}' (expected ACTIVE, INACTIVE or DELETED)"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let settings = config::load_settings();

    let base_url = Url::parse(args.api_url.as_deref().unwrap_or(&settings.api_base_url))
        .context("invalid API base URL")?;

    let tokens = Arc::new(FileTokenStore::new(settings.token_file));
    let shell = Arc::new(SingleSlotShell::new());
    let navigator = Arc::new(ConsoleNavigator);
    let client = AdminClient::new(base_url, tokens, navigator, shell.clone());

    let session = client.session();
    let outcome = session
        .login(&LoginForm {
            email: args.email,
            password: args.password,
        })
        .await;
    match outcome {
        SubmitOutcome::Completed => {}
        SubmitOutcome::Invalid(errors) => {
            for error in errors {
                eprintln!("{}: {}", error.field, error.message);
            }
            bail!("login form is invalid");
        }
        _ => {
            if let Some(notice) = shell.current() {
                bail!("{}: {}", notice.title, notice.body);
            }
            bail!("login failed");
        }
    }

    match args.command {
        Command::Profile => {
            let Some(user) = session.current_user().await else {
                bail!("no active session");
            };
            println!(
                "{} <{}> role={:?} verified={}",
                user.full_name, user.email, user.role, user.is_verified
            );
        }
        Command::Categories { page, name, kind } => {
            let browser = client.categories();
            let filters = CategoryFilters {
                name: name.unwrap_or_default(),
                kind: kind.as_deref().map(parse_kind).transpose()?,
            };
            browser.apply_filters(filters).await;
            if page > 1 {
                browser.go_to_page(page).await;
            }

            let state = browser.state().await;
            for category in &state.items {
                println!(
                    "{:>5}  {:<40}  {:<8}  {}",
                    category.id.0,
                    category.name,
                    category.kind.as_str(),
                    category.created_at.format(DATETIME_FORMAT)
                );
            }
            let pager = browser.pager().await;
            println!(
                "page {}/{} ({} categories)",
                pager.display_page(),
                pager.total_pages().max(1),
                state.total_elements
            );
        }
        Command::Universities { page, name, status } => {
            let browser = client.universities();
            let filters = UniversityFilters {
                name: name.unwrap_or_default(),
                status: status.as_deref().map(parse_status).transpose()?,
            };
            browser.apply_filters(filters).await;
            if page > 1 {
                browser.go_to_page(page).await;
            }

            let state = browser.state().await;
            for university in &state.items {
                println!(
                    "{:>5}  {:<40}  {:<10}  {:<10}  {}",
                    university.id.0,
                    university.name,
                    university.short_name,
                    university.status.as_str(),
                    if university.city.is_empty() {
                        "--"
                    } else {
                        university.city.as_str()
                    }
                );
            }
            let pager = browser.pager().await;
            println!(
                "page {}/{} ({} universities)",
                pager.display_page(),
                pager.total_pages().max(1),
                state.total_elements
            );
        }
        Command::University { id } => {
            let detail = client.university_detail();
            if let Err(err) = detail.load(UniversityId(id)).await {
                bail!("failed to load university {id}: {err}");
            }
            let Some(record) = detail.snapshot().await.record else {
                bail!("university {id} not found");
            };
            println!("{} ({})", record.name, record.short_name);
            println!("  status:       {}", record.status.as_str());
            println!("  email domain: {}", record.email_domain);
            println!("  address:      {}", record.address);
            println!("  city:         {}", record.city);
            println!("  website:      {}", record.website);
            println!("  updated:      {}", record.updated_at.format(DATETIME_FORMAT));
            if !record.description.is_empty() {
                println!("  {}", record.description);
            }
        }
    }

    if let Some(notice) = shell.current() {
        tracing::info!(title = %notice.title, "console: {}", notice.body);
    }

    Ok(())
}
