use std::time::Duration;

use chrono::{Datelike, Utc};
use tracing::info;

use crate::app::{AppContext, DocketError, Result};
use crate::domain::CaseQuery;
use crate::engine::dates::MIN_YEAR;

/// Check the query before any network traffic
pub fn build_query(case_type: &str, case_number: &str, year: i32) -> Result<CaseQuery> {
    let case_type = case_type.trim();
    let case_number = case_number.trim();
    if case_type.is_empty() {
        return Err(DocketError::Other("case type must not be empty".into()));
    }
    if case_number.is_empty() {
        return Err(DocketError::Other("case number must not be empty".into()));
    }
    let current_year = Utc::now().year();
    if !(MIN_YEAR..=current_year).contains(&year) {
        return Err(DocketError::Other(format!(
            "filing year must be between {} and {}",
            MIN_YEAR, current_year
        )));
    }
    Ok(CaseQuery::new(case_type, case_number, year))
}

pub async fn search(ctx: &AppContext, query: &CaseQuery, deadline: Option<Duration>) -> Result<()> {
    let mut engine = ctx.engine()?;

    let outcome = match deadline {
        Some(limit) => tokio::time::timeout(limit, engine.fetch_case(query))
            .await
            .map_err(|_| {
                DocketError::Engine(format!("lookup abandoned after {}s", limit.as_secs()))
            })?,
        None => engine.fetch_case(query).await,
    };

    info!("Lookup for {} finished: {}", query, outcome.label());
    if let Some(record) = outcome.record() {
        if record.requires_verification() {
            eprintln!("Low-confidence match: verify the details on the court website");
        }
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

pub async fn probe(ctx: &AppContext) -> Result<()> {
    let report = ctx.engine()?.test_connection().await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub async fn case_types(ctx: &AppContext) -> Result<()> {
    let types = ctx.engine()?.supported_case_types().await;

    if types.is_empty() {
        println!("No case types found");
        return Ok(());
    }

    for option in types {
        println!("{:>6}  {}", option.value, option.label);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_trims_input() {
        let query = build_query(" RCS ", " 123 ", 2021).unwrap();
        assert_eq!(query, CaseQuery::new("RCS", "123", 2021));
    }

    #[test]
    fn test_build_query_rejects_bad_input() {
        assert!(build_query("RCS", "  ", 2021).is_err());
        assert!(build_query("", "1", 2021).is_err());
        assert!(build_query("RCS", "1", 1949).is_err());
        assert!(build_query("RCS", "1", Utc::now().year() + 1).is_err());
    }
}
