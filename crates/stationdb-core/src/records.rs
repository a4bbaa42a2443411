//! Input records and the candidate shapes returned by the place-search API.
//!
//! Absence is explicit everywhere: a field the API did not return is `None`,
//! never an empty string or a sentinel value.

use serde::{Deserialize, Serialize};

/// One station from the input list. Never mutated once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub name: String,
    pub address: String,
    pub phone: String,
    /// Grouping attribute carried through to the output (the station's county).
    pub county: String,
}

/// The top search hit for a text query: just enough to run a match decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    /// Provider identifier, possibly carrying a resource prefix (`places/...`).
    pub id: String,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
}

/// Full field set for one place, fetched only after a positive match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateDetails {
    pub id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub national_phone: Option<String>,
    pub international_phone: Option<String>,
    pub website: Option<String>,
    pub maps_url: Option<String>,
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub business_status: Option<String>,
    pub types: Option<Vec<String>>,
    pub opening_hours: Option<OpeningHours>,
    pub accessibility: Option<AccessibilityOptions>,
}

impl CandidateDetails {
    /// Preferred contact number: the national format, else the international one.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.national_phone
            .as_deref()
            .or(self.international_phone.as_deref())
    }

    /// Wheelchair-accessible entrance flag from the nested accessibility block.
    #[must_use]
    pub fn wheelchair_accessible(&self) -> Option<bool> {
        self.accessibility
            .as_ref()
            .and_then(|a| a.wheelchair_accessible_entrance)
    }
}

/// Opening-hours block, kept in the provider's own (camelCase) shape.
///
/// Fields this type does not model are preserved in `extra`, and empty lists
/// stay distinct from absent ones, so the block round-trips verbatim into the
/// output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<OpeningPeriod>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday_descriptions: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningPeriod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<PeriodPoint>,
    /// Absent for places open around the clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<PeriodPoint>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPoint {
    /// 0 = Sunday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u8>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheelchair_accessible_entrance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheelchair_accessible_parking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheelchair_accessible_restroom: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheelchair_accessible_seating: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_prefers_national_format() {
        let details = CandidateDetails {
            national_phone: Some("(215) 555-0100".to_string()),
            international_phone: Some("+1 215-555-0100".to_string()),
            ..CandidateDetails::default()
        };
        assert_eq!(details.phone(), Some("(215) 555-0100"));
    }

    #[test]
    fn phone_falls_back_to_international() {
        let details = CandidateDetails {
            international_phone: Some("+1 215-555-0100".to_string()),
            ..CandidateDetails::default()
        };
        assert_eq!(details.phone(), Some("+1 215-555-0100"));
    }

    #[test]
    fn wheelchair_flag_absent_without_accessibility_block() {
        assert_eq!(CandidateDetails::default().wheelchair_accessible(), None);
    }

    #[test]
    fn wheelchair_flag_read_from_nested_block() {
        let details = CandidateDetails {
            accessibility: Some(AccessibilityOptions {
                wheelchair_accessible_entrance: Some(false),
                ..AccessibilityOptions::default()
            }),
            ..CandidateDetails::default()
        };
        assert_eq!(details.wheelchair_accessible(), Some(false));
    }

    #[test]
    fn opening_hours_preserve_unmodelled_fields() {
        let raw = serde_json::json!({
            "openNow": true,
            "periods": [
                { "open": { "day": 1, "hour": 6, "minute": 0, "date": { "year": 2024, "month": 11, "day": 4 } },
                  "close": { "day": 1, "hour": 22, "minute": 0 } }
            ],
            "weekdayDescriptions": ["Monday: 6:00 AM – 10:00 PM"],
            "nextCloseTime": "2024-11-04T03:00:00Z"
        });
        let hours: OpeningHours = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(hours.open_now, Some(true));
        assert_eq!(hours.periods.as_ref().map(Vec::len), Some(1));
        assert_eq!(serde_json::to_value(&hours).unwrap(), raw);
    }

    #[test]
    fn opening_hours_keep_empty_lists() {
        let raw = serde_json::json!({
            "openNow": false,
            "periods": [],
            "weekdayDescriptions": []
        });
        let hours: OpeningHours = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(hours.periods, Some(Vec::new()));
        assert_eq!(serde_json::to_value(&hours).unwrap(), raw);
    }

    #[test]
    fn period_point_without_day_still_parses() {
        let raw = serde_json::json!({
            "periods": [
                { "open": { "hour": 6, "minute": 0, "truncated": true } }
            ]
        });
        let hours: OpeningHours = serde_json::from_value(raw.clone()).unwrap();
        let open = hours.periods.as_deref().unwrap()[0].open.as_ref().unwrap();
        assert_eq!(open.day, None);
        assert_eq!(open.hour, Some(6));
        assert_eq!(serde_json::to_value(&hours).unwrap(), raw);
    }
}
