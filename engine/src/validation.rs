//! Client-side pre-checks for the result form.
//!
//! The backend stays the authority; these rules only catch what can be known
//! locally. They run at two points:
//!
//! - **Live** ([`Validator::live_issues`]): on every edit, cosmetic and
//!   non-blocking. The form shows the issues next to their fields.
//! - **Submission** ([`Validator::validate_submission`]): blocking. The first
//!   offending field, in display order, stops the whole save.
//!
//! Rules:
//! - digit tiers (7th to 10th) take tickets that are empty or exactly
//!   [`shared::DIGIT_TICKET_LENGTH`] numeric characters
//! - any filled ticket needs a non-empty, non-zero amount
//! - ticket, place and draw-number values never contain whitespace

use shared::{is_nonzero_amount, parse_amount, Draw, PrizeTier};

use crate::entry_model::EntryModel;
use crate::errors::{DrawField, FieldRef, SubmissionError, ValidationError};

/// A rule violation attached to the field it concerns
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub field: FieldRef,
    pub error: ValidationError,
}

pub struct Validator;

impl Validator {
    /// Checks a single ticket value against the rules of its tier
    pub fn check_ticket(tier: PrizeTier, value: &str) -> Result<(), ValidationError> {
        if value.chars().any(char::is_whitespace) {
            return Err(ValidationError::ContainsWhitespace { tier });
        }
        let Some(required) = tier.layout().digit_length else {
            return Ok(());
        };
        if value.is_empty() {
            return Ok(());
        }
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::NonNumericTicket {
                tier,
                value: value.to_string(),
            });
        }

        let entered = value.chars().count();
        if entered < required {
            Err(ValidationError::TooFewDigits {
                tier,
                entered,
                missing: required - entered,
            })
        } else if entered > required {
            Err(ValidationError::TooManyDigits {
                tier,
                entered,
                excess: entered - required,
            })
        } else {
            Ok(())
        }
    }

    /// Checks that an amount is present, numeric and non-zero
    pub fn check_amount(tier: PrizeTier, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingAmount { tier });
        }
        if parse_amount(value).is_none() || !is_nonzero_amount(value) {
            return Err(ValidationError::InvalidAmount {
                tier,
                value: value.trim().to_string(),
            });
        }
        Ok(())
    }

    /// Every issue in the model, in display order. Never blocks anything.
    pub fn live_issues(model: &EntryModel) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        for tier in PrizeTier::DISPLAY_ORDER {
            Self::collect_tier_issues(model, tier, &mut issues);
        }
        issues
    }

    /// Issues of a single tier, in entry and slot order
    pub fn tier_issues(model: &EntryModel, tier: PrizeTier) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        Self::collect_tier_issues(model, tier, &mut issues);
        issues
    }

    fn collect_tier_issues(model: &EntryModel, tier: PrizeTier, issues: &mut Vec<FieldIssue>) {
        let entries = model.tier(tier);

        if tier.is_grouped() && entries.ticket_count() > 0 {
            if let Err(error) = Self::check_amount(tier, entries.amount()) {
                issues.push(FieldIssue {
                    field: FieldRef::Amount { tier, entry: 0 },
                    error,
                });
            }
        }

        for entry in entries.entries() {
            if tier.is_ranked() && entry.has_tickets() {
                if let Err(error) = Self::check_amount(tier, &entry.amount) {
                    issues.push(FieldIssue {
                        field: FieldRef::Amount { tier, entry: entry.index },
                        error,
                    });
                }
            }
            for (slot_index, slot) in entry.slots.iter().enumerate() {
                if let Err(error) = Self::check_ticket(tier, &slot.value) {
                    issues.push(FieldIssue {
                        field: FieldRef::Ticket {
                            tier,
                            entry: entry.index,
                            slot: slot_index,
                        },
                        error,
                    });
                }
            }
            if entry.place.chars().any(char::is_whitespace) {
                issues.push(FieldIssue {
                    field: FieldRef::Place { tier, entry: entry.index },
                    error: ValidationError::ContainsWhitespace { tier },
                });
            }
        }
    }

    /// Blocking check run before the form is submitted. Returns the first
    /// offending field so the caller can focus it.
    pub fn validate_submission(draw: &Draw, model: &EntryModel) -> Result<(), SubmissionError> {
        let required = [
            (DrawField::Lottery, &draw.lottery),
            (DrawField::DrawNumber, &draw.draw_number),
            (DrawField::Date, &draw.date),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(SubmissionError {
                    field: FieldRef::Draw(field),
                    error: ValidationError::MissingDrawField(field),
                });
            }
        }
        if model.total_tickets() == 0 {
            return Err(SubmissionError {
                field: FieldRef::Ticket {
                    tier: PrizeTier::First,
                    entry: 0,
                    slot: 0,
                },
                error: ValidationError::NoEntries,
            });
        }

        match Self::live_issues(model).into_iter().next() {
            Some(issue) => Err(SubmissionError {
                field: issue.field,
                error: issue.error,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draw() -> Draw {
        Draw {
            lottery: "3".to_string(),
            lottery_name: "Karunya".to_string(),
            draw_number: "KR-702".to_string(),
            date: "2025-06-13".to_string(),
            ..Draw::default()
        }
    }

    #[test]
    fn test_eighth_prize_too_few_digits() {
        let err = Validator::check_ticket(PrizeTier::Eighth, "12").unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooFewDigits {
                tier: PrizeTier::Eighth,
                entered: 2,
                missing: 2
            }
        );
        assert_eq!(err.to_string(), "8th Prize: 2 digits entered, 2 more required");
    }

    #[test]
    fn test_eighth_prize_too_many_digits() {
        let err = Validator::check_ticket(PrizeTier::Eighth, "12345").unwrap_err();
        assert_eq!(err.to_string(), "8th Prize: 5 digits entered, 1 must be removed");
    }

    #[test]
    fn test_digit_rule_scope() {
        assert!(Validator::check_ticket(PrizeTier::Tenth, "").is_ok());
        assert!(Validator::check_ticket(PrizeTier::Tenth, "0427").is_ok());
        assert!(matches!(
            Validator::check_ticket(PrizeTier::Seventh, "12a4"),
            Err(ValidationError::NonNumericTicket { .. })
        ));
        // 6th and below accept full ticket numbers
        assert!(Validator::check_ticket(PrizeTier::Sixth, "12").is_ok());
        assert!(Validator::check_ticket(PrizeTier::Consolation, "KB123456").is_ok());
        assert_eq!(
            Validator::check_ticket(PrizeTier::First, "KA 1"),
            Err(ValidationError::ContainsWhitespace { tier: PrizeTier::First })
        );
    }

    #[test]
    fn test_amount_rules() {
        assert!(Validator::check_amount(PrizeTier::First, "7500000").is_ok());
        assert_eq!(
            Validator::check_amount(PrizeTier::First, " "),
            Err(ValidationError::MissingAmount { tier: PrizeTier::First })
        );
        assert!(matches!(
            Validator::check_amount(PrizeTier::First, "0"),
            Err(ValidationError::InvalidAmount { .. })
        ));
        assert!(matches!(
            Validator::check_amount(PrizeTier::First, "lots"),
            Err(ValidationError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_first_prize_ticket_without_amount_blocks_submission() {
        let mut model = EntryModel::new();
        model.set_ticket(PrizeTier::First, 0, 0, "KA123456").unwrap();

        let err = Validator::validate_submission(&complete_draw(), &model).unwrap_err();

        assert_eq!(err.field, FieldRef::Amount { tier: PrizeTier::First, entry: 0 });
        assert_eq!(err.error, ValidationError::MissingAmount { tier: PrizeTier::First });
        assert_eq!(err.field.element_id(), "1st-amount-0");
    }

    #[test]
    fn test_missing_draw_fields_are_reported_first() {
        let mut model = EntryModel::new();
        model.set_ticket(PrizeTier::First, 0, 0, "KA123456").unwrap();
        let draw = Draw {
            draw_number: String::new(),
            ..complete_draw()
        };

        let err = Validator::validate_submission(&draw, &model).unwrap_err();

        assert_eq!(err.field, FieldRef::Draw(DrawField::DrawNumber));
    }

    #[test]
    fn test_empty_form_is_rejected() {
        let model = EntryModel::new();
        let err = Validator::validate_submission(&complete_draw(), &model).unwrap_err();
        assert_eq!(err.error, ValidationError::NoEntries);
        assert_eq!(err.to_string(), "Please add at least one prize entry.");
    }

    #[test]
    fn test_grouped_tier_amount_and_digits() {
        let tier = PrizeTier::Ninth;
        let mut model = EntryModel::new();
        model.set_ticket(tier, 0, 0, "1234").unwrap();
        model.set_ticket(tier, 0, 1, "123").unwrap();

        let issues = Validator::tier_issues(&model, tier);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, FieldRef::Amount { tier, entry: 0 });
        assert_eq!(issues[1].field, FieldRef::Ticket { tier, entry: 0, slot: 1 });

        model.set_amount(tier, 0, "100").unwrap();
        let err = Validator::validate_submission(&complete_draw(), &model).unwrap_err();
        assert_eq!(err.field, FieldRef::Ticket { tier, entry: 0, slot: 1 });

        model.set_ticket(tier, 0, 1, "1235").unwrap();
        assert!(Validator::validate_submission(&complete_draw(), &model).is_ok());
    }

    #[test]
    fn test_submission_checks_tiers_in_display_order() {
        let mut model = EntryModel::new();
        model.set_ticket(PrizeTier::Fourth, 0, 0, "KD111111").unwrap();
        model.set_ticket(PrizeTier::Consolation, 0, 0, "KB222222").unwrap();

        let err = Validator::validate_submission(&complete_draw(), &model).unwrap_err();

        assert_eq!(err.field, FieldRef::Amount { tier: PrizeTier::Consolation, entry: 0 });
    }
}
