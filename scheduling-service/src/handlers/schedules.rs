//! Schedule routes. Query parameters are parsed and checked, the answer is
//! still a fixed acknowledgement.

use axum::extract::{rejection::QueryRejection, Path, Query};
use chrono::NaiveDate;
use serde::Deserialize;
use service_core::error::AppError;

use crate::models::{week_start, YearMonth};

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// Any day of the wanted week, `YYYY-MM-DD`.
    pub week: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// `YYYY-MM`
    pub month: Option<YearMonth>,
}

fn bad_query(rejection: QueryRejection) -> AppError {
    AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
}

/// GET /schedules?week=YYYY-MM-DD
pub async fn week_schedules(
    query: Result<Query<WeekQuery>, QueryRejection>,
) -> Result<&'static str, AppError> {
    let Query(query) = query.map_err(bad_query)?;
    if let Some(day) = query.week {
        tracing::debug!(week_start = %week_start(day), "Weekly schedule lookup not implemented");
    }
    Ok("GET schedules for the week")
}

/// GET /schedules/month?month=YYYY-MM
pub async fn month_schedules(
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<&'static str, AppError> {
    let Query(query) = query.map_err(bad_query)?;
    if let Some(month) = query.month {
        tracing::debug!(month = %month, "Monthly schedule lookup not implemented");
    }
    Ok("GET schedules for the month")
}

/// POST /schedules
pub async fn create_schedule() -> &'static str {
    "CREATE new schedule"
}

/// PUT /schedules/:id
pub async fn update_schedule(Path(id): Path<String>) -> &'static str {
    tracing::debug!(schedule_id = %id, "Schedule update not implemented");
    "UPDATE schedule details"
}
