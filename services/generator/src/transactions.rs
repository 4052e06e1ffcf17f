use std::path::Path;

use bank_models::{Transaction, TransactionType};
use chrono::{Datelike, Duration, Utc};
use lake_storage::{get_with_retry, list_with_retry, DecodeStrategy, JsonlStream, ObjectStore, RetryPolicy};
use rand::Rng;
use serde_json::Value;
use tracing::info;

use crate::errors::{PipelineError, PipelineResult};
use crate::publish::save_and_upload;

/// Days of history fabricated per run, counting back from now.
pub const DAYS_HISTORY: i64 = 60;

pub const HOME_BANK: &str = "LuisBank";

pub const EXTERNAL_BANKS: [&str; 10] = [
    "Banco do Brasil",
    "Itaú Unibanco",
    "Bradesco",
    "Caixa Econômica",
    "Nubank",
    "Banco Inter",
    "Santander",
    "C6 Bank",
    "BTG Pactual",
    "Neon",
];

const ACCOUNTS_PREFIX: &str = "accounts/";

/// Recover the account ids published by the previous stage. Lists the
/// accounts prefix, picks the most recent batch (keys are timestamp-suffixed,
/// so the lexicographically last key is the newest), and stream-decodes it.
/// An empty prefix is a fatal ordering violation, not a transient failure.
pub async fn load_existing_account_ids(
    store: &dyn ObjectStore,
    policy: &RetryPolicy,
    bucket: &str,
) -> PipelineResult<Vec<String>> {
    info!(bucket, prefix = ACCOUNTS_PREFIX, "looking up published account batches");
    let mut keys = list_with_retry(store, policy, bucket, ACCOUNTS_PREFIX).await?;
    keys.sort();
    let latest = keys
        .pop()
        .ok_or_else(|| PipelineError::NoPublishedAccounts(ACCOUNTS_PREFIX.to_string()))?;

    info!(key = %latest, "reading most recent accounts batch");
    let body = get_with_retry(store, policy, bucket, &latest).await?;
    let mut stream = JsonlStream::open(body, DecodeStrategy::for_key(&latest)).await?;

    let mut account_ids = Vec::new();
    while let Some(record) = stream.next_record().await? {
        if let Some(id) = record.get("id").and_then(Value::as_str) {
            account_ids.push(id.to_string());
        }
    }

    if account_ids.is_empty() {
        return Err(PipelineError::NoPublishedAccounts(latest));
    }

    info!(accounts = account_ids.len(), "account ids loaded");
    Ok(account_ids)
}

/// Fabricate a transaction history over the last `days_history` days. Daily
/// volume is uniform in [50, 200), scaled by 1.5 (floored) on calendar days
/// 1-10 to model beginning-of-month seasonality. Every event references an
/// account id from the supplied set.
pub fn generate_transactions<R: Rng + ?Sized>(
    rng: &mut R,
    account_ids: &[String],
    days_history: i64,
) -> PipelineResult<Vec<Transaction>> {
    if account_ids.is_empty() {
        return Err(PipelineError::NoPublishedAccounts(ACCOUNTS_PREFIX.to_string()));
    }

    let mut transactions = Vec::new();
    let start = Utc::now() - Duration::days(days_history);

    for day in 0..days_history {
        let current = start + Duration::days(day);
        let base_volume: u32 = rng.random_range(50..200);
        let daily_volume = if current.day() <= 10 {
            (base_volume as f64 * 1.5) as u32
        } else {
            base_volume
        };

        for _ in 0..daily_volume {
            let account_id = account_ids[rng.random_range(0..account_ids.len())].clone();
            let transaction_type =
                TransactionType::ALL[rng.random_range(0..TransactionType::ALL.len())];

            // Whole cents, keeping amounts inside the per-type ranges.
            let amount_cents: u32 = if transaction_type == TransactionType::PixIn {
                rng.random_range(1_000..500_000)
            } else {
                rng.random_range(500..200_000)
            };
            let amount = amount_cents as f64 / 100.0;

            let counterparty_bank = if rng.random_bool(0.3) {
                HOME_BANK.to_string()
            } else {
                EXTERNAL_BANKS[rng.random_range(0..EXTERNAL_BANKS.len())].to_string()
            };

            let transaction_date = current
                + Duration::hours(rng.random_range(0..24))
                + Duration::minutes(rng.random_range(0..60))
                + Duration::seconds(rng.random_range(0..60));

            transactions.push(Transaction::new(
                account_id,
                amount,
                transaction_type,
                transaction_date,
                counterparty_bank,
            )?);
        }
    }

    Ok(transactions)
}

/// Stage 2: recover published account ids, fabricate the history, publish it.
pub async fn run(store: &dyn ObjectStore, bucket: &str, data_dir: &Path) -> PipelineResult<()> {
    let policy = RetryPolicy::default();
    let account_ids = load_existing_account_ids(store, &policy, bucket).await?;

    info!(days = DAYS_HISTORY, "generating transaction history");
    let mut rng = rand::rng();
    let transactions = generate_transactions(&mut rng, &account_ids, DAYS_HISTORY)?;
    info!(transactions = transactions.len(), "generation complete");

    save_and_upload(store, &policy, bucket, data_dir, "transactions", &transactions).await?;
    Ok(())
}
