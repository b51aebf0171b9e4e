//! Full-form submission payload.
//!
//! The backend reads each tier as parallel repeated fields
//! (`{tier}_prize_amount[]`, `{tier}_ticket_number[]`, and `{tier}_place[]`
//! for ranked tiers) and pairs them up by position, so every row emitted here
//! carries all of its fields.

use shared::{Draw, PrizeTier};

use crate::entry_model::EntryModel;

/// Ordered `name=value` pairs of a form post
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormSubmission {
    fields: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn build(draw: &Draw, model: &EntryModel) -> Self {
        let mut submission = Self::default();
        submission.push("lottery", draw.lottery.trim());
        submission.push("draw_number", draw.draw_number.trim());
        submission.push("date", draw.date.trim());
        for (name, checked) in [
            ("is_published", draw.is_published),
            ("is_bumper", draw.is_bumper),
            ("notify_on_save", draw.notify_on_save),
        ] {
            if checked {
                submission.push(name, "on");
            }
        }
        if let Some(result_id) = draw.result_id {
            submission.push("result_id", &result_id.to_string());
        }

        for tier in PrizeTier::ALL {
            submission.push_tier(model, tier);
        }
        submission
    }

    fn push_tier(&mut self, model: &EntryModel, tier: PrizeTier) {
        let entries = model.tier(tier);
        for entry in entries.entries() {
            for ticket in entry.filled_tickets() {
                let amount = model.effective_amount(tier, entry.index);
                self.push(&tier.amount_field(), amount.trim());
                self.push(&tier.ticket_field(), ticket);
                if tier.is_ranked() {
                    self.push(&tier.place_field(), &entry.place);
                }
            }
        }
    }

    fn push(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Every value posted under `name`, in order
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values(name).into_iter().next()
    }

    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_rows_repeat_the_tier_amount() {
        let tier = PrizeTier::Consolation;
        let mut model = EntryModel::new();
        model.bulk_import(tier, "8000", "KA1 KA2 KA3 KA4").unwrap();
        let draw = Draw {
            lottery: "1".to_string(),
            draw_number: "KR-1".to_string(),
            date: "2025-01-01".to_string(),
            ..Draw::default()
        };

        let submission = FormSubmission::build(&draw, &model);

        assert_eq!(submission.values("consolation_ticket_number[]"), vec!["KA1", "KA2", "KA3", "KA4"]);
        assert_eq!(submission.values("consolation_prize_amount[]"), vec!["8000"; 4]);
        assert!(submission.values("consolation_place[]").is_empty());
        assert_eq!(submission.value("is_published"), None);
        assert_eq!(submission.value("result_id"), None);
    }

    #[test]
    fn test_ranked_rows_are_aligned() {
        let tier = PrizeTier::Second;
        let mut model = EntryModel::new();
        model.set_amount(tier, 0, "1000000").unwrap();
        model.set_ticket(tier, 0, 0, "KB123456").unwrap();
        model.add_entry(tier);
        model.add_entry(tier);
        model.set_amount(tier, 2, "500000").unwrap();
        model.set_ticket(tier, 2, 0, "KC654321").unwrap();
        model.set_place(tier, 2, "Kochi").unwrap();
        let draw = Draw {
            is_published: true,
            notify_on_save: true,
            result_id: Some(9),
            ..Draw::default()
        };

        let submission = FormSubmission::build(&draw, &model);

        assert_eq!(submission.values("2nd_prize_amount[]"), vec!["1000000", "500000"]);
        assert_eq!(submission.values("2nd_ticket_number[]"), vec!["KB123456", "KC654321"]);
        assert_eq!(submission.values("2nd_place[]"), vec!["", "Kochi"]);
        assert_eq!(submission.value("is_published"), Some("on"));
        assert_eq!(submission.value("is_bumper"), None);
        assert_eq!(submission.value("notify_on_save"), Some("on"));
        assert_eq!(submission.value("result_id"), Some("9"));
    }
}
