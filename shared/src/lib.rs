use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tickets per entry for the standard grouped tiers (4th, 5th, consolation)
pub const STANDARD_ROW_WIDTH: usize = 3;

/// Tickets per entry for the expanded grouped tiers (6th through 10th)
pub const EXPANDED_ROW_WIDTH: usize = 6;

/// Required ticket length for the digit-constrained tiers (7th through 10th)
pub const DIGIT_TICKET_LENGTH: usize = 4;

/// One of the fixed prize ranks of a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrizeTier {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
    #[serde(rename = "4th")]
    Fourth,
    #[serde(rename = "5th")]
    Fifth,
    #[serde(rename = "6th")]
    Sixth,
    #[serde(rename = "7th")]
    Seventh,
    #[serde(rename = "8th")]
    Eighth,
    #[serde(rename = "9th")]
    Ninth,
    #[serde(rename = "10th")]
    Tenth,
    #[serde(rename = "consolation")]
    Consolation,
}

/// Whether entries of a tier carry their own amount and place, or share one amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierClass {
    /// One ticket, one amount and one place per entry (1st to 3rd)
    Ranked,
    /// Several tickets per entry sharing the tier amount owned by entry 0
    Grouped,
}

/// Fixed shape of a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLayout {
    pub class: TierClass,
    /// Ticket slots per entry
    pub row_width: usize,
    /// Exact numeric length a ticket must have, if constrained
    pub digit_length: Option<usize>,
}

impl PrizeTier {
    /// Storage and submission order
    pub const ALL: [PrizeTier; 11] = [
        PrizeTier::First,
        PrizeTier::Second,
        PrizeTier::Third,
        PrizeTier::Fourth,
        PrizeTier::Fifth,
        PrizeTier::Sixth,
        PrizeTier::Seventh,
        PrizeTier::Eighth,
        PrizeTier::Ninth,
        PrizeTier::Tenth,
        PrizeTier::Consolation,
    ];

    /// Order used by the entry form and the preview
    pub const DISPLAY_ORDER: [PrizeTier; 11] = [
        PrizeTier::First,
        PrizeTier::Second,
        PrizeTier::Third,
        PrizeTier::Consolation,
        PrizeTier::Fourth,
        PrizeTier::Fifth,
        PrizeTier::Sixth,
        PrizeTier::Seventh,
        PrizeTier::Eighth,
        PrizeTier::Ninth,
        PrizeTier::Tenth,
    ];

    /// Index of the tier within [`PrizeTier::ALL`]
    pub fn position(self) -> usize {
        match self {
            PrizeTier::First => 0,
            PrizeTier::Second => 1,
            PrizeTier::Third => 2,
            PrizeTier::Fourth => 3,
            PrizeTier::Fifth => 4,
            PrizeTier::Sixth => 5,
            PrizeTier::Seventh => 6,
            PrizeTier::Eighth => 7,
            PrizeTier::Ninth => 8,
            PrizeTier::Tenth => 9,
            PrizeTier::Consolation => 10,
        }
    }

    /// The single row-width / digit-constraint table for every tier
    pub fn layout(self) -> TierLayout {
        match self {
            PrizeTier::First | PrizeTier::Second | PrizeTier::Third => TierLayout {
                class: TierClass::Ranked,
                row_width: 1,
                digit_length: None,
            },
            PrizeTier::Fourth | PrizeTier::Fifth | PrizeTier::Consolation => TierLayout {
                class: TierClass::Grouped,
                row_width: STANDARD_ROW_WIDTH,
                digit_length: None,
            },
            PrizeTier::Sixth => TierLayout {
                class: TierClass::Grouped,
                row_width: EXPANDED_ROW_WIDTH,
                digit_length: None,
            },
            PrizeTier::Seventh | PrizeTier::Eighth | PrizeTier::Ninth | PrizeTier::Tenth => TierLayout {
                class: TierClass::Grouped,
                row_width: EXPANDED_ROW_WIDTH,
                digit_length: Some(DIGIT_TICKET_LENGTH),
            },
        }
    }

    pub fn class(self) -> TierClass {
        self.layout().class
    }

    pub fn is_ranked(self) -> bool {
        self.class() == TierClass::Ranked
    }

    pub fn is_grouped(self) -> bool {
        self.class() == TierClass::Grouped
    }

    pub fn row_width(self) -> usize {
        self.layout().row_width
    }

    /// Wire key used in form field names and JSON payloads ("1st", "consolation", ...)
    pub fn key(self) -> &'static str {
        match self {
            PrizeTier::First => "1st",
            PrizeTier::Second => "2nd",
            PrizeTier::Third => "3rd",
            PrizeTier::Fourth => "4th",
            PrizeTier::Fifth => "5th",
            PrizeTier::Sixth => "6th",
            PrizeTier::Seventh => "7th",
            PrizeTier::Eighth => "8th",
            PrizeTier::Ninth => "9th",
            PrizeTier::Tenth => "10th",
            PrizeTier::Consolation => "consolation",
        }
    }

    /// Human readable title, e.g. "8th Prize"
    pub fn title(self) -> String {
        match self {
            PrizeTier::Consolation => "Consolation Prize".to_string(),
            other => format!("{} Prize", other.key()),
        }
    }

    pub fn amount_field(self) -> String {
        format!("{}_prize_amount[]", self.key())
    }

    pub fn ticket_field(self) -> String {
        format!("{}_ticket_number[]", self.key())
    }

    pub fn place_field(self) -> String {
        format!("{}_place[]", self.key())
    }

    pub fn parse(key: &str) -> Result<Self, TierParseError> {
        PrizeTier::ALL
            .iter()
            .copied()
            .find(|tier| tier.key() == key)
            .ok_or_else(|| TierParseError(key.to_string()))
    }
}

impl fmt::Display for PrizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Error returned when a tier key is not one of the fixed tiers
#[derive(Debug, Clone, PartialEq)]
pub struct TierParseError(pub String);

impl fmt::Display for TierParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown prize tier: {}", self.0)
    }
}

impl std::error::Error for TierParseError {}

/// Parse a prize amount as typed into the form ("5000", "5,000.00", "₹100")
pub fn parse_amount(input: &str) -> Option<f64> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '₹' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when the amount is present, numeric and not zero
pub fn is_nonzero_amount(input: &str) -> bool {
    parse_amount(input).map(|v| v != 0.0).unwrap_or(false)
}

/// Remove every whitespace character, returning the cleaned value and how many were removed
pub fn strip_whitespace(input: &str) -> (String, usize) {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let removed = input.chars().count() - cleaned.chars().count();
    (cleaned, removed)
}

/// Draw-level information owned by the result form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Draw {
    /// Selected lottery id (value of the lottery dropdown)
    pub lottery: String,
    /// Display name of the selected lottery
    #[serde(default)]
    pub lottery_name: String,
    pub draw_number: String,
    /// ISO date, yyyy-mm-dd
    pub date: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_bumper: bool,
    #[serde(default)]
    pub notify_on_save: bool,
    /// Server-side id once the result has been persisted
    #[serde(default)]
    pub result_id: Option<i64>,
}

impl Draw {
    /// Formats the draw date as dd/mm/yyyy, falling back to the raw value
    pub fn formatted_date(&self) -> Option<String> {
        if self.date.trim().is_empty() {
            return None;
        }
        match chrono::NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date.format("%d/%m/%Y").to_string()),
            Err(_) => Some(self.date.clone()),
        }
    }
}

/// One persisted prize row as supplied for edit-mode hydration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedPrizeEntry {
    pub ticket_number: String,
    pub prize_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

/// Server-supplied mapping of tier to its ordered persisted rows
pub type PrizeEntriesData = BTreeMap<PrizeTier, Vec<HydratedPrizeEntry>>;

/// Payload of the per-slot auto-save call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSaveRequest {
    pub result_id: i64,
    pub prize_type: PrizeTier,
    pub ticket_number: String,
    pub prize_amount: String,
    /// Last value the server confirmed for this slot; `None` means insert
    pub original_ticket_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSaveResponse {
    pub success: bool,
    pub message: String,
}

/// Response to a full-form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSubmissionResponse {
    pub result_id: i64,
    pub message: String,
}

/// Entry of the lottery dropdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryOption {
    pub id: i64,
    pub name: String,
}

/// A persisted result as returned by the hydration endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryResultResponse {
    pub draw: Draw,
    pub prizes: PrizeEntriesData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_keys_round_trip() {
        for (position, tier) in PrizeTier::ALL.iter().enumerate() {
            assert_eq!(PrizeTier::parse(tier.key()).unwrap(), *tier);
            assert_eq!(tier.position(), position);
        }
        assert!(PrizeTier::parse("11th").is_err());
        assert_eq!(
            PrizeTier::parse("first").unwrap_err().to_string(),
            "Unknown prize tier: first"
        );
    }

    #[test]
    fn test_tier_layout_table() {
        assert_eq!(PrizeTier::First.layout().class, TierClass::Ranked);
        assert_eq!(PrizeTier::Third.row_width(), 1);
        assert_eq!(PrizeTier::Consolation.row_width(), STANDARD_ROW_WIDTH);
        assert_eq!(PrizeTier::Fourth.row_width(), 3);
        assert_eq!(PrizeTier::Sixth.row_width(), EXPANDED_ROW_WIDTH);
        assert_eq!(PrizeTier::Sixth.layout().digit_length, None);
        assert_eq!(PrizeTier::Seventh.layout().digit_length, Some(4));
        assert_eq!(PrizeTier::Tenth.layout().digit_length, Some(4));
        assert!(PrizeTier::Consolation.is_grouped());
    }

    #[test]
    fn test_field_names() {
        assert_eq!(PrizeTier::Eighth.ticket_field(), "8th_ticket_number[]");
        assert_eq!(PrizeTier::Consolation.amount_field(), "consolation_prize_amount[]");
        assert_eq!(PrizeTier::Second.place_field(), "2nd_place[]");
        assert_eq!(PrizeTier::Consolation.title(), "Consolation Prize");
        assert_eq!(PrizeTier::First.to_string(), "1st Prize");
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(parse_amount("5000"), Some(5000.0));
        assert_eq!(parse_amount(" 1,00,000.50 "), Some(100000.5));
        assert_eq!(parse_amount("₹100"), Some(100.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert!(is_nonzero_amount("100"));
        assert!(!is_nonzero_amount("0"));
        assert!(!is_nonzero_amount("0.00"));
        assert!(!is_nonzero_amount("  "));
    }

    #[test]
    fn test_strip_whitespace() {
        assert_eq!(strip_whitespace("AB 1234"), ("AB1234".to_string(), 1));
        assert_eq!(strip_whitespace(" 12\t3 "), ("123".to_string(), 3));
        assert_eq!(strip_whitespace("1234"), ("1234".to_string(), 0));
    }

    #[test]
    fn test_hydration_payload_deserializes() {
        let json = r#"{
            "1st": [{"ticket_number": "KA123456", "prize_amount": "7500000.00", "place": "Kollam"}],
            "consolation": [{"ticket_number": "KB123456", "prize_amount": "8000.00"}]
        }"#;
        let data: PrizeEntriesData = serde_json::from_str(json).unwrap();
        assert_eq!(data[&PrizeTier::First][0].place.as_deref(), Some("Kollam"));
        assert_eq!(data[&PrizeTier::Consolation][0].place, None);
    }

    #[test]
    fn test_draw_formatted_date() {
        let draw = Draw {
            date: "2025-06-13".to_string(),
            ..Draw::default()
        };
        assert_eq!(draw.formatted_date().as_deref(), Some("13/06/2025"));
        assert_eq!(Draw::default().formatted_date(), None);
    }

    #[test]
    fn test_auto_save_request_wire_shape() {
        let request = AutoSaveRequest {
            result_id: 42,
            prize_type: PrizeTier::Consolation,
            ticket_number: "KB123456".to_string(),
            prize_amount: "8000".to_string(),
            original_ticket_number: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["prize_type"], "consolation");
        assert!(value["original_ticket_number"].is_null());
    }
}
