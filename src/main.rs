//! Tender Setting CLI
//!
//! Loads a user's tender filter setting from the Config Store, applies
//! edits given on the command line, and saves when there were any.
//!
//! Usage:
//!   tender_setting <user_id> [edit...]
//!
//! Edits:
//!   jenis_proyek+="Jasa Lainnya"      append to a list field
//!   penyelenggara_proyek-="Kota Bogor" remove first occurrence
//!   min=1000000                        set a scalar field (min, max, hbu, kbli)
//!
//! Environment:
//!   API_BASE                  - Config Store base URL (required)
//!   TENDER_HTTP_TIMEOUT_SECS  - request timeout (default: 10)
//!   RUST_LOG                  - log level (default: info)

use eyre::{bail, Result, WrapErr};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tender_setting::utils::constants::{
    is_known_jenis_proyek, APP_NAME, APP_VERSION, JENIS_PROYEK_OPTIONS,
};
use tender_setting::{
    ClientConfig, Config, CurrentUser, Edit, HttpConfigStore, ListField, NoopSession,
    NotificationCenter, NotificationKind, SettingPage, SyncController, UserStateStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let mut args = std::env::args().skip(1);
    let Some(user_id) = args.next() else {
        bail!("usage: tender_setting <user_id> [field+=value | field-=value | field=value ...]");
    };
    let edits = args
        .map(|expr| Edit::parse(&expr).wrap_err_with(|| format!("invalid edit '{}'", expr)))
        .collect::<Result<Vec<_>>>()?;

    info!("🚀 {} v{}", APP_NAME, APP_VERSION);

    let client_config = ClientConfig::from_env()?;
    let store = Arc::new(HttpConfigStore::new(&client_config)?);
    info!("🌐 Config Store: {}", store.api_base());

    let users = Arc::new(UserStateStore::with_user(CurrentUser::new(
        user_id.clone(),
        Config::default(),
    )));
    let notifications = Arc::new(NotificationCenter::new());
    let controller = Arc::new(SyncController::new(
        store,
        users.clone(),
        Arc::new(NoopSession),
        notifications.clone(),
    ));

    // Log every notification the way the dashboard would toast it
    let mut rx = notifications.subscribe();
    let toaster = tokio::spawn(async move {
        while let Ok(n) = rx.recv().await {
            match n.kind {
                NotificationKind::Pending => info!("⏳ {}", n.message),
                NotificationKind::Success => info!("✅ {}", n.message),
                NotificationKind::Failure => error!(
                    "❌ {} ({})",
                    n.message,
                    n.error_code.map(|c| c.as_str()).unwrap_or("unknown")
                ),
            }
            if n.kind.is_terminal() {
                break;
            }
        }
    });

    let page = SettingPage::new(controller.clone());
    let Some(loaded) = page.mount(&user_id).await else {
        bail!("mount for {} was superseded", user_id);
    };
    print_config("Loaded", &loaded);

    match controller.instansi_options().await {
        Ok(options) => info!("📋 {} instansi options available", options.len()),
        Err(e) => warn!("⚠️ Instansi options unavailable: {}", e),
    }
    info!("📋 Jenis proyek options: {}", JENIS_PROYEK_OPTIONS.join(" | "));

    if edits.is_empty() {
        toaster.abort();
        return Ok(());
    }

    if page.may_overwrite_unread() {
        toaster.abort();
        let code = page.load_error().map(|c| c.as_str()).unwrap_or("unknown");
        bail!(
            "stored setting for {} could not be read ({}); refusing to overwrite it",
            user_id,
            code
        );
    }

    for edit in &edits {
        if let Edit::Append(ListField::JenisProyek, label) = edit {
            if !is_known_jenis_proyek(label) {
                warn!("⚠️ '{}' is not one of the jenis proyek options", label);
            }
        }
        page.apply(edit).wrap_err_with(|| format!("edit {:?} failed", edit))?;
    }

    let result = page.save().await;
    let _ = toaster.await;

    let saved = result.wrap_err("save failed")?;
    print_config("Saved", &saved);

    let stats = notifications.stats();
    info!(
        "📊 Save attempts: {}, succeeded: {}, failed: {}",
        stats.attempts, stats.successes, stats.failures
    );
    Ok(())
}

fn print_config(label: &str, config: &Config) {
    println!("{} setting:", label);
    for field in [ListField::PenyelenggaraProyek, ListField::JenisProyek] {
        let items: Vec<&str> = config.visible_items(field).map(|(_, item)| item).collect();
        println!("  {:<22} {}", field.as_str(), items.join(", "));
    }
    println!(
        "  {:<22} {} .. {}",
        "nilai_proyek", config.nilai_proyek.min, config.nilai_proyek.max
    );
    println!("  {:<22} {}", "hbu", config.hbu.as_deref().unwrap_or("-"));
    println!("  {:<22} {}", "kbli", config.kbli.as_deref().unwrap_or("-"));
}
