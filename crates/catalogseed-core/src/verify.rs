//! Post-run checks on the seeded `product` table.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::connection::SeedConnection;
use crate::error::{Result, SeedError};
use crate::schema::{select_names_sql, truncate_sql};
use crate::words::{category_of, PRODUCT_CATEGORIES};

/// How many offending names a report keeps as examples.
const MAX_SAMPLES: usize = 5;

#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    pub total_rows: usize,
    pub empty_names: usize,
    pub unknown_category: usize,
    /// Row count per category, including categories with zero rows.
    pub per_category: BTreeMap<String, usize>,
    /// A few names whose suffix is not a known category.
    pub unknown_samples: Vec<String>,
}

impl VerifyReport {
    /// Tally a list of product names.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut report = VerifyReport {
            total_rows: names.len(),
            per_category: PRODUCT_CATEGORIES
                .iter()
                .map(|c| (c.to_string(), 0))
                .collect(),
            ..Default::default()
        };

        for name in names {
            let name = name.as_ref();
            if name.is_empty() {
                report.empty_names += 1;
            }
            match category_of(name) {
                Some(category) => {
                    *report.per_category.entry(category.to_string()).or_insert(0) += 1;
                }
                None => {
                    report.unknown_category += 1;
                    if report.unknown_samples.len() < MAX_SAMPLES {
                        report.unknown_samples.push(name.to_string());
                    }
                }
            }
        }

        report
    }

    /// True when every name is well-formed and, if given, the row count matches.
    pub fn is_valid(&self, expected_rows: Option<usize>) -> bool {
        self.empty_names == 0
            && self.unknown_category == 0
            && expected_rows.is_none_or(|n| n == self.total_rows)
    }
}

/// Read every product name and check it against the category set.
pub async fn verify_products(conn: &mut SeedConnection) -> Result<VerifyReport> {
    let sql = select_names_sql(conn.database_type());
    let names = conn
        .fetch_strings(&sql)
        .await
        .map_err(|e| SeedError::Query {
            sql_preview: truncate_sql(&sql, 200),
            source: e,
        })?;

    tracing::debug!("Fetched {} product names for verification", names.len());
    Ok(VerifyReport::from_names(&names))
}
