//! Exchange session status: is the cash market trading right now, and when
//! does it next open.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::MarketSession;
use crate::error::BankDeskError;
use crate::BankDeskResult;

// Longest run of non-trading days we are prepared to skip over.
const MAX_LOOKAHEAD_DAYS: u32 = 366;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStatus {
    Open,
    PreOpen,
    Closed,
}

impl MarketStatus {
    pub fn is_open(self) -> bool {
        self == MarketStatus::Open
    }
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketStatus::Open => f.write_str("Open"),
            MarketStatus::PreOpen => f.write_str("Pre-open"),
            MarketStatus::Closed => f.write_str("Closed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedReason {
    Weekend,
    Holiday,
    AfterHours,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub status: MarketStatus,
    pub closed_reason: Option<ClosedReason>,
    /// Exchange local time the report was taken at.
    pub local_time: NaiveDateTime,
    pub next_open: NaiveDateTime,
    pub session_open: String,
    pub session_close: String,
}

pub fn is_trading_day(date: NaiveDate, holidays: &[NaiveDate]) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !holidays.contains(&date)
}

/// Status at exchange local time `at`. The open and close instants both
/// count as open.
pub fn market_status(
    at: NaiveDateTime,
    session: &MarketSession,
    holidays: &[NaiveDate],
) -> MarketStatus {
    if !is_trading_day(at.date(), holidays) {
        return MarketStatus::Closed;
    }
    let time = at.time();
    if time < session.open {
        MarketStatus::PreOpen
    } else if time <= session.close {
        MarketStatus::Open
    } else {
        MarketStatus::Closed
    }
}

/// The next session open strictly after `at`, or `at` itself when the
/// market opens at exactly that instant.
pub fn next_open(
    at: NaiveDateTime,
    session: &MarketSession,
    holidays: &[NaiveDate],
) -> BankDeskResult<NaiveDateTime> {
    let mut date = at.date();
    if at.time() > session.open {
        date = next_day(date)?;
    }
    for _ in 0..MAX_LOOKAHEAD_DAYS {
        if is_trading_day(date, holidays) {
            return Ok(date.and_time(session.open));
        }
        date = next_day(date)?;
    }
    Err(BankDeskError::InsufficientData(format!(
        "No trading day within {MAX_LOOKAHEAD_DAYS} days of {}.",
        at.date()
    )))
}

/// Full status report for exchange local time `at`.
pub fn session_report(
    at: NaiveDateTime,
    session: &MarketSession,
    holidays: &[NaiveDate],
) -> BankDeskResult<SessionReport> {
    let status = market_status(at, session, holidays);
    let closed_reason = match status {
        MarketStatus::Closed => Some(if matches!(at.weekday(), Weekday::Sat | Weekday::Sun) {
            ClosedReason::Weekend
        } else if holidays.contains(&at.date()) {
            ClosedReason::Holiday
        } else {
            ClosedReason::AfterHours
        }),
        _ => None,
    };

    Ok(SessionReport {
        status,
        closed_reason,
        local_time: at,
        next_open: next_open(at, session, holidays)?,
        session_open: session.open.format("%H:%M").to_string(),
        session_close: session.close.format("%H:%M").to_string(),
    })
}

/// Report for a UTC instant, converted with the session's UTC offset.
pub fn session_report_utc(
    now: DateTime<Utc>,
    session: &MarketSession,
    holidays: &[NaiveDate],
) -> BankDeskResult<SessionReport> {
    let offset = FixedOffset::east_opt(session.utc_offset_minutes * 60).ok_or_else(|| {
        BankDeskError::InvalidInput {
            field: "session.utc_offset_minutes".into(),
            reason: format!("Offset of {} minutes is out of range.", session.utc_offset_minutes),
        }
    })?;
    let local = now.with_timezone(&offset).naive_local();
    log::debug!("session check at {local} (offset {offset})");
    session_report(local, session, holidays)
}

fn next_day(date: NaiveDate) -> BankDeskResult<NaiveDate> {
    date.succ_opt().ok_or_else(|| BankDeskError::ArithmeticDegenerate {
        context: format!("no calendar day after {date}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::nse_holidays_2025;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_weekday_phases() {
        let session = MarketSession::default();
        let holidays = nse_holidays_2025();
        // Monday 2025-03-03
        assert_eq!(market_status(at(2025, 3, 3, 9, 0), &session, &holidays), MarketStatus::PreOpen);
        assert_eq!(market_status(at(2025, 3, 3, 9, 15), &session, &holidays), MarketStatus::Open);
        assert_eq!(market_status(at(2025, 3, 3, 15, 30), &session, &holidays), MarketStatus::Open);
        assert_eq!(market_status(at(2025, 3, 3, 15, 31), &session, &holidays), MarketStatus::Closed);
    }

    #[test]
    fn test_weekend_and_holiday_closed() {
        let session = MarketSession::default();
        let holidays = nse_holidays_2025();
        let saturday = session_report(at(2025, 3, 1, 11, 0), &session, &holidays).unwrap();
        assert_eq!(saturday.status, MarketStatus::Closed);
        assert_eq!(saturday.closed_reason, Some(ClosedReason::Weekend));

        // Independence Day, a Friday
        let holiday = session_report(at(2025, 8, 15, 11, 0), &session, &holidays).unwrap();
        assert_eq!(holiday.closed_reason, Some(ClosedReason::Holiday));
        assert_eq!(holiday.next_open, at(2025, 8, 18, 9, 15));
    }

    #[test]
    fn test_next_open_after_close_skips_weekend() {
        let session = MarketSession::default();
        // Friday evening
        let next = next_open(at(2025, 3, 7, 16, 0), &session, &[]).unwrap();
        assert_eq!(next, at(2025, 3, 10, 9, 15));
        // Same-day open when still pre-open
        let next = next_open(at(2025, 3, 10, 8, 0), &session, &[]).unwrap();
        assert_eq!(next, at(2025, 3, 10, 9, 15));
    }

    #[test]
    fn test_utc_conversion() {
        let session = MarketSession::default();
        // 04:00 UTC is 09:30 IST
        let now = Utc.with_ymd_and_hms(2025, 3, 3, 4, 0, 0).unwrap();
        let report = session_report_utc(now, &session, &[]).unwrap();
        assert!(report.status.is_open());
        assert_eq!(report.local_time, at(2025, 3, 3, 9, 30));
        assert_eq!(report.session_open, "09:15");
    }
}
