//! Bulk import of pasted ticket text.
//!
//! Two input formats, chosen by tier class:
//!
//! - **Ranked tiers**: one entry per line, `amount,ticket[,place]`. Lines with
//!   fewer than two fields, an empty ticket or a missing/zero amount are
//!   skipped and counted; the remaining lines still import.
//! - **Grouped tiers**: one shared amount plus whitespace separated ticket
//!   tokens. Tokens that end up empty after trimming stray separators, or that
//!   break the tier's digit rule, are skipped and counted. Tokens fill the
//!   tier's existing empty slots first (earliest entry, earliest slot) before
//!   new entries are allocated at the tier's row width.
//!
//! The only all-or-nothing failure is a grouped import with no usable amount:
//! no amount supplied and no non-zero amount already on entry 0.

use log::{info, warn};
use shared::{is_nonzero_amount, strip_whitespace, PrizeTier};

use crate::entry_model::{EntryModel, SlotStatus};
use crate::errors::BulkImportError;
use crate::validation::Validator;

/// One accepted line of a ranked-tier import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedLine {
    pub amount: String,
    pub ticket: String,
    pub place: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLines {
    pub lines: Vec<RankedLine>,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTokens {
    pub tickets: Vec<String>,
    pub skipped: usize,
}

/// Which input format produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Lines,
    Tokens,
}

/// Aggregate outcome of an import; skips are warnings, never errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub tier: PrizeTier,
    pub format: ImportFormat,
    pub imported: usize,
    pub skipped: usize,
    pub entries_created: usize,
}

impl ImportReport {
    pub fn has_warnings(&self) -> bool {
        self.skipped > 0 || self.imported == 0
    }

    /// The bulk input buffers are only cleared once something was imported
    pub fn should_clear_input(&self) -> bool {
        self.imported > 0
    }

    /// Message naming the tier with success and skip counts together
    pub fn summary(&self) -> String {
        let skipped = match self.format {
            ImportFormat::Tokens => format!("{} entries were skipped.", self.skipped),
            ImportFormat::Lines => {
                format!("{} lines were skipped due to incorrect format.", self.skipped)
            }
        };
        if self.imported == 0 {
            format!("{}: no valid entries found. {}", self.tier, skipped)
        } else if self.skipped > 0 {
            format!(
                "{}: processed {} entries successfully. {}",
                self.tier, self.imported, skipped
            )
        } else {
            format!("{}: successfully processed {} entries.", self.tier, self.imported)
        }
    }
}

pub struct BulkImportParser;

impl BulkImportParser {
    /// Parses `amount,ticket[,place]` lines of a ranked tier
    pub fn parse_ranked_lines(text: &str) -> ParsedLines {
        let mut parsed = ParsedLines::default();
        for line in text.trim().lines() {
            let values: Vec<&str> = line.split(',').map(str::trim).collect();
            if values.len() < 2 {
                parsed.skipped += 1;
                continue;
            }

            let amount = values[0].to_string();
            let ticket = strip_whitespace(values[1]).0;
            let place = values.get(2).map(|p| strip_whitespace(p).0).unwrap_or_default();
            if ticket.is_empty() || !is_nonzero_amount(&amount) {
                parsed.skipped += 1;
                continue;
            }
            parsed.lines.push(RankedLine { amount, ticket, place });
        }
        parsed
    }

    /// Splits grouped-tier text into ticket tokens, dropping unusable ones
    pub fn parse_ticket_tokens(tier: PrizeTier, text: &str) -> ParsedTokens {
        let mut parsed = ParsedTokens::default();
        for raw in text.split_whitespace() {
            let token = raw.trim_matches(|c: char| matches!(c, ',' | ';'));
            if token.is_empty() {
                parsed.skipped += 1;
                continue;
            }
            if Validator::check_ticket(tier, token).is_err() {
                parsed.skipped += 1;
                continue;
            }
            parsed.tickets.push(token.to_string());
        }
        parsed
    }
}

impl EntryModel {
    /// Imports pasted text into a tier. `amount_input` is the bulk amount field
    /// and is only read for grouped tiers.
    pub fn bulk_import(
        &mut self,
        tier: PrizeTier,
        amount_input: &str,
        text: &str,
    ) -> Result<ImportReport, BulkImportError> {
        let report = if tier.is_ranked() {
            self.import_ranked(tier, text)?
        } else {
            self.import_grouped(tier, amount_input, text)?
        };

        if report.skipped > 0 {
            warn!("{}", report.summary());
        } else {
            info!("{}", report.summary());
        }
        Ok(report)
    }

    fn import_ranked(&mut self, tier: PrizeTier, text: &str) -> Result<ImportReport, BulkImportError> {
        if text.trim().is_empty() {
            return Err(BulkImportError::EmptyInput { tier });
        }
        let parsed = BulkImportParser::parse_ranked_lines(text);

        let mut entries_created = 0;
        let mut cursor = 0;
        for line in &parsed.lines {
            let reusable = self
                .tier(tier)
                .entries()
                .iter()
                .skip(cursor)
                .position(|e| !e.has_tickets() && e.amount.trim().is_empty())
                .map(|offset| cursor + offset);
            let index = match reusable {
                Some(index) => index,
                None => {
                    entries_created += 1;
                    self.add_entry(tier)
                }
            };
            cursor = index + 1;

            let entry = &mut self.tier_mut(tier).entries[index];
            entry.amount = line.amount.clone();
            entry.place = line.place.clone();
            entry.slots[0].value = line.ticket.clone();
            entry.slots[0].status = SlotStatus::Unsaved;
        }
        self.renumber(tier);

        Ok(ImportReport {
            tier,
            format: ImportFormat::Lines,
            imported: parsed.lines.len(),
            skipped: parsed.skipped,
            entries_created,
        })
    }

    fn import_grouped(
        &mut self,
        tier: PrizeTier,
        amount_input: &str,
        text: &str,
    ) -> Result<ImportReport, BulkImportError> {
        let supplied = amount_input.trim();
        let amount = if !supplied.is_empty() {
            if !is_nonzero_amount(supplied) {
                return Err(BulkImportError::InvalidAmount {
                    tier,
                    value: supplied.to_string(),
                });
            }
            supplied.to_string()
        } else if is_nonzero_amount(self.tier(tier).amount()) {
            self.tier(tier).amount().to_string()
        } else {
            return Err(BulkImportError::MissingAmount { tier });
        };

        if text.trim().is_empty() {
            return Err(BulkImportError::EmptyInput { tier });
        }
        let parsed = BulkImportParser::parse_ticket_tokens(tier, text);
        let mut report = ImportReport {
            tier,
            format: ImportFormat::Tokens,
            imported: parsed.tickets.len(),
            skipped: parsed.skipped,
            entries_created: 0,
        };
        if parsed.tickets.is_empty() {
            return Ok(report);
        }

        self.tier_mut(tier).entries[0].amount = amount;

        let gaps: Vec<(usize, usize)> = self
            .tier(tier)
            .entries()
            .iter()
            .flat_map(|entry| {
                entry
                    .slots
                    .iter()
                    .enumerate()
                    .filter(|(_, slot)| !slot.is_filled())
                    .map(move |(slot_index, _)| (entry.index, slot_index))
            })
            .collect();

        let mut tickets = parsed.tickets.into_iter();
        for ((entry_index, slot_index), ticket) in gaps.into_iter().zip(tickets.by_ref()) {
            let slot = &mut self.tier_mut(tier).entries[entry_index].slots[slot_index];
            slot.value = ticket;
            slot.status = SlotStatus::Unsaved;
        }

        let remaining: Vec<String> = tickets.collect();
        for chunk in remaining.chunks(tier.row_width()) {
            let index = self.add_entry(tier);
            report.entries_created += 1;
            let entry = &mut self.tier_mut(tier).entries[index];
            for (slot, ticket) in entry.slots.iter_mut().zip(chunk) {
                slot.value = ticket.clone();
            }
        }

        self.sync_mirrors(tier);
        self.renumber(tier);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consolation_import_scenario() {
        let tier = PrizeTier::Consolation;
        let mut model = EntryModel::new();

        let report = model.bulk_import(tier, "100", "1111 2222 3333 4444").unwrap();

        assert_eq!(report.imported, 4);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.entries_created, 1);
        let entries = model.tier(tier).entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].filled_tickets(), vec!["1111", "2222", "3333"]);
        assert_eq!(entries[0].amount, "100");
        assert!(model.is_amount_editable(tier, 0));
        assert_eq!(entries[1].filled_tickets(), vec!["4444"]);
        assert_eq!(entries[1].amount, "100");
        assert!(!model.is_amount_editable(tier, 1));
        assert_eq!(model.tier(tier).ordinals(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_existing_gaps_are_filled_first() {
        let tier = PrizeTier::Fourth;
        let mut model = EntryModel::new();
        model.set_amount(tier, 0, "5000").unwrap();
        model.add_entry(tier);
        model.set_ticket(tier, 0, 1, "KA000001").unwrap();
        model.set_ticket(tier, 1, 0, "KA000002").unwrap();

        let report = model.bulk_import(tier, "", "KB1 KB2 KB3 KB4 KB5").unwrap();

        assert_eq!(report.entries_created, 1);
        let entries = model.tier(tier).entries();
        assert_eq!(entries[0].filled_tickets(), vec!["KB1", "KA000001", "KB2"]);
        assert_eq!(entries[1].filled_tickets(), vec!["KA000002", "KB3", "KB4"]);
        assert_eq!(entries[2].filled_tickets(), vec!["KB5"]);
        assert_eq!(entries[2].amount, "5000");
    }

    #[test]
    fn test_ticket_count_matches_tokens_minus_skips() {
        let tier = PrizeTier::Eighth;
        let mut model = EntryModel::new();
        let before = model.tier(tier).ticket_count();

        let text = "1234 12 5678 , 123456 9012\n3456";
        let report = model.bulk_import(tier, "1000", text).unwrap();

        let tokens = text.split_whitespace().count();
        assert_eq!(report.skipped, 3);
        assert_eq!(report.imported, tokens - report.skipped);
        assert_eq!(model.tier(tier).ticket_count() - before, report.imported);
        assert_eq!(
            report.summary(),
            "8th Prize: processed 4 entries successfully. 3 entries were skipped."
        );
    }

    #[test]
    fn test_missing_amount_aborts_whole_import() {
        let tier = PrizeTier::Fifth;
        let mut model = EntryModel::new();
        let before = model.clone();

        let err = model.bulk_import(tier, "  ", "KA1 KA2").unwrap_err();

        assert_eq!(err, BulkImportError::MissingAmount { tier });
        assert_eq!(err.field().element_id(), "5th-bulk-amount");
        assert_eq!(model, before);
    }

    #[test]
    fn test_zero_amount_is_rejected() {
        let mut model = EntryModel::new();
        assert!(matches!(
            model.bulk_import(PrizeTier::Sixth, "0", "123456"),
            Err(BulkImportError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_empty_amount_inherits_existing_tier_amount() {
        let tier = PrizeTier::Sixth;
        let mut model = EntryModel::new();
        model.set_amount(tier, 0, "500").unwrap();

        let report = model.bulk_import(tier, "", "111111 222222").unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(model.tier(tier).amount(), "500");
    }

    #[test]
    fn test_supplied_amount_overrides_and_propagates() {
        let tier = PrizeTier::Consolation;
        let mut model = EntryModel::new();
        model.set_amount(tier, 0, "100").unwrap();
        model.add_entry(tier);
        model.add_entry(tier);

        model.bulk_import(tier, "8000", "KA1").unwrap();

        assert!(model.tier(tier).entries().iter().all(|e| e.amount == "8000"));
    }

    #[test]
    fn test_all_tokens_invalid_leaves_model_unchanged() {
        let tier = PrizeTier::Tenth;
        let mut model = EntryModel::new();
        let before = model.clone();

        let report = model.bulk_import(tier, "100", "12 ,, 99999").unwrap();

        assert_eq!(report.imported, 0);
        assert_eq!(report.skipped, 3);
        assert!(!report.should_clear_input());
        assert_eq!(model, before);
    }

    #[test]
    fn test_ranked_lines_skip_malformed_lines() {
        let tier = PrizeTier::First;
        let mut model = EntryModel::new();
        let text = "7500000,KA123456,Kollam\nnonsense\n1000000,KB654321\n0,KC111111\n500, ,Ernakulam";

        let report = model.bulk_import(tier, "", text).unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.entries_created, 1);
        let entries = model.tier(tier).entries();
        assert_eq!(entries[0].amount, "7500000");
        assert_eq!(entries[0].place, "Kollam");
        assert_eq!(entries[1].filled_tickets(), vec!["KB654321"]);
        assert_eq!(entries[1].place, "");
        assert_eq!(
            report.summary(),
            "1st Prize: processed 2 entries successfully. 3 lines were skipped due to incorrect format."
        );
    }

    #[test]
    fn test_ranked_import_appends_after_filled_entries() {
        let tier = PrizeTier::Third;
        let mut model = EntryModel::new();
        model.set_amount(tier, 0, "500000").unwrap();
        model.set_ticket(tier, 0, 0, "KA000001").unwrap();

        let report = model.bulk_import(tier, "", "500000,KB000002,Kannur").unwrap();

        assert_eq!(report.entries_created, 1);
        assert_eq!(model.tier(tier).filled_tickets(), vec!["KA000001", "KB000002"]);
        assert_eq!(model.tier(tier).ordinals(), vec![1, 2]);
    }

    #[test]
    fn test_empty_text_is_reported() {
        let mut model = EntryModel::new();
        assert_eq!(
            model.bulk_import(PrizeTier::Second, "", "   \n "),
            Err(BulkImportError::EmptyInput { tier: PrizeTier::Second })
        );
    }

    #[test]
    fn test_summary_without_skips() {
        let mut model = EntryModel::new();
        let report = model.bulk_import(PrizeTier::Fourth, "5000", "KA1 KA2").unwrap();
        assert!(!report.has_warnings());
        assert!(report.should_clear_input());
        assert_eq!(report.summary(), "4th Prize: successfully processed 2 entries.");
    }
}
