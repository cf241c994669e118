use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;

/// Expected capacity and false-positive rate.
/// Tune these based on real enrollment counts.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static EMAIL_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

#[inline]
fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check if an email might be registered (false positives possible)
pub fn might_exist(email: &str) -> bool {
    let email = normalize(email);
    EMAIL_FILTER
        .read()
        .expect("email filter poisoned")
        .contains(&email)
}

/// Insert a single email into the filter
pub fn insert(email: &str) {
    let email = normalize(email);
    EMAIL_FILTER
        .write()
        .expect("email filter poisoned")
        .add(&email);
}

/// Warm up the email filter using streaming + batching
pub async fn warmup_email_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String,)>("SELECT email FROM students").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (email,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&email));
        total += 1;

        if batch.len() == batch_size {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    log::info!("Email filter warmup complete: {} students", total);
    Ok(())
}

/// Insert a batch of normalized emails
fn insert_batch(emails: &[String]) {
    let mut filter = EMAIL_FILTER.write().expect("email filter poisoned");

    for email in emails {
        filter.add(email);
    }
}
