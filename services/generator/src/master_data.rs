use std::path::Path;

use bank_models::{Account, AccountType, Customer, RiskProfile};
use chrono::{Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use lake_storage::{ensure_bucket_exists, ObjectStore, RetryPolicy};
use rand::Rng;
use tracing::info;

use crate::errors::PipelineResult;
use crate::publish::save_and_upload;

/// Customers fabricated per run.
pub const NUM_CUSTOMERS: usize = 100;

const TWO_YEARS_SECS: i64 = 2 * 365 * 24 * 60 * 60;

/// Fabricate `num_customers` customers and their accounts: 1 account with
/// probability 0.8, otherwise 2, independently per customer. Account creation
/// timestamps are copied from the owning customer.
pub fn generate_customer_data<R: Rng + ?Sized>(
    rng: &mut R,
    num_customers: usize,
) -> PipelineResult<(Vec<Customer>, Vec<Account>)> {
    let mut customers = Vec::with_capacity(num_customers);
    let mut accounts = Vec::new();
    let now = Utc::now();

    for _ in 0..num_customers {
        let created_at = now - Duration::seconds(rng.random_range(0..TWO_YEARS_SECS));
        let first_name: String = FirstName().fake_with_rng(rng);
        let last_name: String = LastName().fake_with_rng(rng);
        let email: String = SafeEmail().fake_with_rng(rng);
        let risk_profile = RiskProfile::ALL[rng.random_range(0..RiskProfile::ALL.len())];

        let customer = Customer::new(
            first_name,
            last_name,
            email,
            random_cpf(rng),
            created_at,
            risk_profile,
        )?;

        let num_accounts = if rng.random_bool(0.2) { 2 } else { 1 };
        for _ in 0..num_accounts {
            let account_type = AccountType::ALL[rng.random_range(0..AccountType::ALL.len())];
            // Drawn in whole cents so the snapshot stays exact at 2 decimals
            // and strictly below the 15000 ceiling.
            let balance = rng.random_range(0..1_500_000) as f64 / 100.0;
            let account_number = format!("{:06}", rng.random_range(0..1_000_000));
            accounts.push(Account::new(
                customer.id.clone(),
                account_number,
                balance,
                account_type,
                created_at,
            )?);
        }

        customers.push(customer);
    }

    Ok((customers, accounts))
}

/// Synthetic Brazilian tax id in display format. Check digits are random,
/// the dashboard only needs the shape.
fn random_cpf<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{:03}.{:03}.{:03}-{:02}",
        rng.random_range(0..1000),
        rng.random_range(0..1000),
        rng.random_range(0..1000),
        rng.random_range(0..100),
    )
}

/// Stage 1: ensure the landing zone exists, then generate and publish the
/// customers and accounts batches.
pub async fn run(store: &dyn ObjectStore, bucket: &str, data_dir: &Path) -> PipelineResult<()> {
    ensure_bucket_exists(store, bucket).await?;

    info!(count = NUM_CUSTOMERS, "generating customers and linked accounts");
    let mut rng = rand::rng();
    let (customers, accounts) = generate_customer_data(&mut rng, NUM_CUSTOMERS)?;
    info!(
        customers = customers.len(),
        accounts = accounts.len(),
        "generation complete"
    );

    let policy = RetryPolicy::default();
    save_and_upload(store, &policy, bucket, data_dir, "customers", &customers).await?;
    save_and_upload(store, &policy, bucket, data_dir, "accounts", &accounts).await?;
    Ok(())
}
