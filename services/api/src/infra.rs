use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use stay_desk::dates::parse_local_date;
use stay_desk::error::AppError;
use stay_desk::reservation::{BookingSession, BookingSnapshot, SelectionState};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) snapshot: Arc<BookingSnapshot>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_local_date(raw).ok_or_else(|| format!("failed to parse '{raw}' as a date (YYYY-MM-DD)"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

/// Starts a session for the requested dates. A lone check-in leaves the selection
/// waiting for a check-out; a check-out on or before the check-in is rejected.
pub(crate) fn session_for_dates(
    snapshot: &BookingSnapshot,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
) -> Result<BookingSession, AppError> {
    let mut session = BookingSession::for_snapshot(snapshot);
    match (check_in, check_out) {
        (None, None) => {}
        (Some(check_in), None) => {
            session.pick_date(check_in);
        }
        (None, Some(_)) => {
            return Err(AppError::BadRequest(
                "check_out requires a check_in".to_string(),
            ))
        }
        (Some(check_in), Some(check_out)) => {
            session.pick_date(check_in);
            if !matches!(session.pick_date(check_out), SelectionState::Complete { .. }) {
                return Err(AppError::BadRequest(format!(
                    "check_out {check_out} must be after check_in {check_in}"
                )));
            }
        }
    }
    Ok(session)
}
