//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper rejects at the boundary with a structured `invalid_request`
//! error so nothing malformed reaches the domain or the store.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, ReservationKind};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidDate,
    InvalidKind,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidDate => "invalid_date",
            Self::InvalidKind => "invalid_reservation_kind",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn validation_error(
    field: FieldName,
    message: String,
    code: ErrorCode,
    value: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value.into(),
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(&value).map_err(|_| {
        validation_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            value,
        )
    })
}

/// Parse an ISO `YYYY-MM-DD` calendar day.
pub(crate) fn parse_date(value: String, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::from_str(&value).map_err(|_| {
        validation_error(
            field,
            format!("{} must be a calendar day (YYYY-MM-DD)", field.as_str()),
            ErrorCode::InvalidDate,
            value,
        )
    })
}

/// Parse a reservation kind, rejecting anything outside the closed set.
pub(crate) fn parse_kind(value: String, field: FieldName) -> Result<ReservationKind, Error> {
    ReservationKind::from_str(&value).map_err(|_| {
        validation_error(
            field,
            format!(
                "{} must be one of standard, substitution, contingency",
                field.as_str()
            ),
            ErrorCode::InvalidKind,
            value,
        )
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn parse_uuid_accepts_canonical_form() {
        let parsed = parse_uuid(
            "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned(),
            FieldName::new("boatId"),
        )
        .expect("valid uuid");
        assert_eq!(parsed.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[test]
    fn parse_uuid_reports_the_offending_field() {
        let error = parse_uuid("nope".to_owned(), FieldName::new("boatId"))
            .expect_err("invalid uuid");
        let details = error.details().expect("details attached");
        assert_eq!(details["field"], "boatId");
        assert_eq!(details["code"], "invalid_uuid");
    }

    #[rstest]
    #[case("2026-08-15", true)]
    #[case("2026-02-30", false)]
    #[case("15/08/2026", false)]
    #[case("", false)]
    fn parse_date_accepts_only_iso_days(#[case] raw: &str, #[case] ok: bool) {
        let result = parse_date(raw.to_owned(), FieldName::new("date"));
        assert_eq!(result.is_ok(), ok);
    }

    #[rstest]
    #[case("standard", true)]
    #[case("substitution", true)]
    #[case("contingency", true)]
    #[case("Standard", false)]
    #[case("weekly", false)]
    fn parse_kind_is_a_closed_set(#[case] raw: &str, #[case] ok: bool) {
        let result = parse_kind(raw.to_owned(), FieldName::new("kind"));
        assert_eq!(result.is_ok(), ok);
        if !ok {
            let error = result.expect_err("invalid kind");
            let details = error.details().expect("details attached");
            assert_eq!(details["code"], "invalid_reservation_kind");
        }
    }
}
