//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Translate UI form values into core types and core errors into messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens the configured store, runs one repository operation and
//!   releases the connection before returning.
//! - "Not found" is reported with `ok=false, not_found=true`, distinct from
//!   validation or storage failures.

use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use subtrack_core::input::{format_date_input, parse_amount, parse_date_input, start_of_day_utc};
use subtrack_core::{
    core_version as core_version_inner, default_log_level, init_logging as init_logging_inner,
    ping as ping_inner, Currency, CurrencyPreference, Frequency, List, ListRepository,
    NewSubscription, ProfileStore, SqliteStore, Subscription, SubscriptionRepository,
    UuidIdGenerator,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const STORE_FILE_NAME: &str = "subtrack.sqlite3";
static STORE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive); blank
///   selects the build default (`debug` or `info`).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = if level.trim().is_empty() {
        default_log_level().as_str().to_string()
    } else {
        level
    };
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the database file used by every later call.
///
/// Must run before the first storage call; afterwards only the already
/// active path is accepted. Returns empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_storage(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = STORE_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "storage already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// List row returned to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: String,
    pub name: String,
}

/// Subscription row returned to and accepted from the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionItem {
    pub id: String,
    pub name: String,
    /// Emoji avatar; `None` renders `initials`.
    pub icon: Option<String>,
    pub initials: String,
    pub list_id: Option<String>,
    /// `monthly|yearly`.
    pub frequency: String,
    pub amount: f64,
    /// ISO currency code.
    pub currency: String,
    /// Display symbol for `currency`.
    pub currency_symbol: String,
    /// `YYYY-MM-DD` (UTC day of `start_date_iso`).
    pub start_date: String,
    /// Stored RFC 3339 timestamp. Written back unchanged unless `start_date`
    /// names a different day.
    pub start_date_iso: String,
}

/// Raw add-subscription form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionInput {
    pub name: String,
    pub icon: Option<String>,
    pub list_id: Option<String>,
    pub frequency: String,
    /// Amount as typed, thousands separators allowed.
    pub amount: String,
    pub currency: String,
    /// `YYYY-MM-DD`.
    pub start_date: String,
}

/// Currency picker entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyItem {
    pub code: String,
    pub symbol: String,
}

/// Envelope for collection reads.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResponse<T> {
    pub ok: bool,
    pub items: Vec<T>,
    pub message: String,
}

/// Generic action envelope for write calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation changed storage as requested.
    pub ok: bool,
    /// Target id was absent; nothing was written.
    pub not_found: bool,
    /// Id of the created/updated/removed record, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            not_found: false,
            id,
            message: message.into(),
        }
    }

    fn not_found(id: String) -> Self {
        Self {
            ok: false,
            not_found: true,
            message: format!("No record with id {id}."),
            id: Some(id),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            not_found: false,
            id: None,
            message: message.into(),
        }
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn lists_list() -> CollectionResponse<ListItem> {
    collection_response(|store| {
        ListRepository::new(store, &UuidIdGenerator)
            .list()
            .into_iter()
            .map(to_list_item)
            .collect()
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_create(name: String) -> ActionResponse {
    match with_store(|store| ListRepository::new(store, &UuidIdGenerator).create(&name)) {
        Ok(list) => ActionResponse::success("List created.", Some(list.id)),
        Err(err) => failed("list_create", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_rename(id: String, name: String) -> ActionResponse {
    match with_store(|store| ListRepository::new(store, &UuidIdGenerator).update(&id, &name)) {
        Ok(Some(list)) => ActionResponse::success("List renamed.", Some(list.id)),
        Ok(None) => ActionResponse::not_found(id),
        Err(err) => failed("list_rename", err),
    }
}

/// Removes a list; its subscriptions become unassigned.
#[flutter_rust_bridge::frb(sync)]
pub fn list_remove(id: String) -> ActionResponse {
    match with_store(|store| ListRepository::new(store, &UuidIdGenerator).remove(&id)) {
        Ok(Some(list)) => ActionResponse::success("List removed.", Some(list.id)),
        Ok(None) => ActionResponse::not_found(id),
        Err(err) => failed("list_remove", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn subscriptions_list() -> CollectionResponse<SubscriptionItem> {
    collection_response(|store| {
        SubscriptionRepository::new(store, &UuidIdGenerator)
            .list()
            .into_iter()
            .map(to_subscription_item)
            .collect()
    })
}

/// Creates a subscription from raw form values.
#[flutter_rust_bridge::frb(sync)]
pub fn subscription_create(input: SubscriptionInput) -> ActionResponse {
    let fields = match parse_subscription_input(input) {
        Ok(fields) => fields,
        Err(message) => return failed("subscription_create", message),
    };
    match with_store(|store| SubscriptionRepository::new(store, &UuidIdGenerator).create(fields)) {
        Ok(created) => ActionResponse::success("Subscription created.", Some(created.id)),
        Err(err) => failed("subscription_create", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn subscription_update(item: SubscriptionItem) -> ActionResponse {
    let id = item.id.clone();
    let subscription = match from_subscription_item(item) {
        Ok(subscription) => subscription,
        Err(message) => return failed("subscription_update", message),
    };
    match with_store(|store| {
        SubscriptionRepository::new(store, &UuidIdGenerator).update(subscription)
    }) {
        Ok(Some(updated)) => ActionResponse::success("Subscription updated.", Some(updated.id)),
        Ok(None) => ActionResponse::not_found(id),
        Err(err) => failed("subscription_update", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn subscription_remove(id: String) -> ActionResponse {
    match with_store(|store| SubscriptionRepository::new(store, &UuidIdGenerator).remove(&id)) {
        Ok(Some(removed)) => ActionResponse::success("Subscription removed.", Some(removed.id)),
        Ok(None) => ActionResponse::not_found(id),
        Err(err) => failed("subscription_remove", err),
    }
}

/// Persists a drag-to-reorder result as the whole collection.
#[flutter_rust_bridge::frb(sync)]
pub fn subscriptions_save_all(items: Vec<SubscriptionItem>) -> ActionResponse {
    let ordered = match items
        .into_iter()
        .map(from_subscription_item)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(ordered) => ordered,
        Err(message) => return failed("subscriptions_save_all", message),
    };
    match with_store(|store| {
        SubscriptionRepository::new(store, &UuidIdGenerator).save_all(ordered)
    }) {
        Ok(saved) => {
            ActionResponse::success(format!("Saved {} subscription(s).", saved.len()), None)
        }
        Err(err) => failed("subscriptions_save_all", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn currencies_list() -> Vec<CurrencyItem> {
    CurrencyPreference::supported()
        .iter()
        .map(|currency| CurrencyItem {
            code: currency.code().to_string(),
            symbol: currency.symbol().to_string(),
        })
        .collect()
}

/// Preferred currency code, `USD` when unset or unreadable.
#[flutter_rust_bridge::frb(sync)]
pub fn currency_get() -> String {
    with_store(|store| Ok(CurrencyPreference::new(store).get_or_default()))
        .unwrap_or_default()
        .code()
        .to_string()
}

#[flutter_rust_bridge::frb(sync)]
pub fn currency_set(code: String) -> ActionResponse {
    match with_store(|store| CurrencyPreference::new(store).set_code(&code)) {
        Ok(currency) => ActionResponse::success(format!("Currency set to {currency}."), None),
        Err(err) => failed("currency_set", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn user_name_get() -> Option<String> {
    with_store(|store| Ok(ProfileStore::new(store).user_name()))
        .ok()
        .flatten()
}

#[flutter_rust_bridge::frb(sync)]
pub fn user_name_set(name: String) -> ActionResponse {
    match with_store(|store| ProfileStore::new(store).set_user_name(&name)) {
        Ok(_) => ActionResponse::success("Name saved.", None),
        Err(err) => failed("user_name_set", err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn onboarding_is_complete() -> bool {
    with_store(|store| Ok(ProfileStore::new(store).is_onboarding_complete())).unwrap_or(false)
}

#[flutter_rust_bridge::frb(sync)]
pub fn onboarding_complete() -> ActionResponse {
    match with_store(|store| ProfileStore::new(store).set_onboarding_complete()) {
        Ok(()) => ActionResponse::success("Onboarding complete.", None),
        Err(err) => failed("onboarding_complete", err),
    }
}

fn failed(operation: &str, reason: impl std::fmt::Display) -> ActionResponse {
    warn!("event=ffi_call module=ffi status=error operation={operation}");
    ActionResponse::failure(format!("{operation} failed: {reason}"))
}

fn resolve_store_path() -> PathBuf {
    STORE_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("SUBTRACK_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(
    f: impl FnOnce(&SqliteStore) -> subtrack_core::RepoResult<T>,
) -> Result<T, String> {
    let path = resolve_store_path();
    let store = SqliteStore::open(&path).map_err(|err| format!("store open failed: {err}"))?;
    f(&store).map_err(|err| err.to_string())
}

fn collection_response<T>(load: impl FnOnce(&SqliteStore) -> Vec<T>) -> CollectionResponse<T> {
    match with_store(|store| Ok(load(store))) {
        Ok(items) => CollectionResponse {
            ok: true,
            message: format!("Loaded {} item(s).", items.len()),
            items,
        },
        Err(message) => CollectionResponse {
            ok: false,
            items: Vec::new(),
            message,
        },
    }
}

fn to_list_item(list: List) -> ListItem {
    ListItem {
        id: list.id,
        name: list.name,
    }
}

fn to_subscription_item(subscription: Subscription) -> SubscriptionItem {
    SubscriptionItem {
        initials: subscription.initials(),
        frequency: frequency_label(subscription.frequency).to_string(),
        currency: subscription.currency.code().to_string(),
        currency_symbol: subscription.currency.symbol().to_string(),
        start_date: format_date_input(subscription.start_date),
        start_date_iso: subscription
            .start_date
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        id: subscription.id,
        name: subscription.name,
        icon: subscription.icon,
        list_id: subscription.list_id,
        amount: subscription.amount,
    }
}

fn from_subscription_item(item: SubscriptionItem) -> Result<Subscription, String> {
    Ok(Subscription {
        frequency: parse_frequency(&item.frequency)?,
        currency: Currency::from_code(&item.currency).map_err(|err| err.to_string())?,
        start_date: resolve_item_start_date(&item.start_date, &item.start_date_iso)?,
        id: item.id,
        name: item.name,
        icon: blank_to_none(item.icon),
        list_id: blank_to_none(item.list_id),
        amount: item.amount,
    })
}

fn parse_subscription_input(input: SubscriptionInput) -> Result<NewSubscription, String> {
    let amount = parse_amount(&input.amount)
        .ok_or_else(|| format!("invalid amount `{}`", input.amount.trim()))?;
    Ok(NewSubscription {
        frequency: parse_frequency(&input.frequency)?,
        currency: Currency::from_code(&input.currency).map_err(|err| err.to_string())?,
        start_date: parse_start_date(&input.start_date)?,
        name: input.name,
        icon: blank_to_none(input.icon),
        list_id: blank_to_none(input.list_id),
        amount,
    })
}

fn parse_frequency(value: &str) -> Result<Frequency, String> {
    match value.trim() {
        "monthly" => Ok(Frequency::Monthly),
        "yearly" => Ok(Frequency::Yearly),
        other => Err(format!("unsupported frequency `{other}`; expected monthly|yearly")),
    }
}

fn frequency_label(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Monthly => "monthly",
        Frequency::Yearly => "yearly",
    }
}

fn parse_start_date(value: &str) -> Result<DateTime<Utc>, String> {
    parse_date_input(value)
        .map(start_of_day_utc)
        .ok_or_else(|| format!("invalid start date `{}`; expected YYYY-MM-DD", value.trim()))
}

/// Keeps the stored timestamp while the edited day still matches it.
fn resolve_item_start_date(day: &str, stored_iso: &str) -> Result<DateTime<Utc>, String> {
    let edited = parse_date_input(day)
        .ok_or_else(|| format!("invalid start date `{}`; expected YYYY-MM-DD", day.trim()))?;
    match DateTime::parse_from_rfc3339(stored_iso.trim()) {
        Ok(stored) if stored.with_timezone(&Utc).date_naive() == edited => {
            Ok(stored.with_timezone(&Utc))
        }
        _ => Ok(start_of_day_utc(edited)),
    }
}

/// Pickers send empty strings for "none".
fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
