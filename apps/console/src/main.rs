//! Bella salon admin console.

#![forbid(unsafe_code)]

mod console_config;
mod dev_seed;

use std::sync::Arc;

use bella_application::{
    AccessDecision, AccessGuard, CrudGateway, Notifier, ScreenController, ScreenPage,
    SessionStore, definition_for,
};
use bella_core::{AppError, AppResult, UserRole};
use bella_domain::ColumnDescriptor;
use bella_infrastructure::{
    HttpCrudGateway, InMemoryCrudGateway, InMemorySessionStore, TracingNotifier,
};
use tracing::info;

use crate::console_config::{BackendKind, ConsoleConfig, init_tracing};

const DEV_SESSION_TOKEN: &str = "dev-session";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let session = Arc::new(InMemorySessionStore::new(
        config.auth_token.clone(),
        config.user_role.clone(),
    ));
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier::new());
    let gateway = build_gateway(&config, session.clone()).await?;

    info!(
        backend = ?config.backend,
        api_url = %config.api_url,
        resource = config.resource.as_str(),
        "bella-console started"
    );

    let guard = AccessGuard::new(session, notifier.clone(), config.missing_role_policy);
    match guard.check(&[UserRole::Admin]) {
        AccessDecision::Granted => {}
        AccessDecision::RedirectToLogin => {
            return Err(AppError::Unauthorized(
                "set BELLA_AUTH_TOKEN to an admin session token".to_owned(),
            ));
        }
        AccessDecision::Denied { redirect } => {
            return Err(AppError::Forbidden(format!(
                "admin screens are not available to this session; its home is '{redirect}'"
            )));
        }
    }

    let definition = definition_for(config.resource)?;
    let columns = definition.columns()?;
    let screen = ScreenController::with_page_size(definition, gateway, notifier, config.page_size)?;

    screen.mount().await?;
    if let Some(term) = config.search.as_deref() {
        screen.search(term).await;
    }
    if let Some(key) = config.sort.as_deref() {
        screen.sort(key).await?;
    }
    let delta = i64::try_from(config.page.saturating_sub(1)).unwrap_or(i64::MAX);
    screen.page(delta).await;

    print_page(&columns, &screen.current_page().await);
    screen.unmount().await;

    Ok(())
}

async fn build_gateway(
    config: &ConsoleConfig,
    session: Arc<InMemorySessionStore>,
) -> AppResult<Arc<dyn CrudGateway>> {
    match config.backend {
        BackendKind::Http => Ok(Arc::new(HttpCrudGateway::with_timeout(
            config.api_url.as_str(),
            config.api_timeout,
            session,
        )?)),
        BackendKind::Memory => {
            let gateway = InMemoryCrudGateway::new();
            dev_seed::run(&gateway).await;

            if !session.is_authenticated() {
                info!("using development admin session for in-memory backend");
                session.login(DEV_SESSION_TOKEN, UserRole::Admin);
            }

            Ok(Arc::new(gateway))
        }
    }
}

fn print_page(columns: &[ColumnDescriptor], page: &ScreenPage) {
    let header = columns
        .iter()
        .map(ColumnDescriptor::label)
        .collect::<Vec<_>>()
        .join(" | ");
    println!("{header}");

    if page.cells.is_empty() {
        println!("(no records)");
    }
    for row in &page.cells {
        let line = row
            .iter()
            .map(|cell| match cell.tone {
                Some(tone) => format!("{} [{tone:?}]", cell.text),
                None => cell.text.clone(),
            })
            .collect::<Vec<_>>()
            .join(" | ");
        println!("{line}");
    }

    println!(
        "page {}/{} ({} records)",
        page.page, page.total_pages, page.total_items
    );
}
