//! Normalisation and validation of raw user text before it reaches a registry.

use crate::errors::LedgerError;

use super::category::{Entry, EntryPatch};

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Format (Cf) and private-use (Co) code points.
const INVISIBLE_RANGES: &[(char, char)] = &[
    ('\u{00AD}', '\u{00AD}'),
    ('\u{0600}', '\u{0605}'),
    ('\u{061C}', '\u{061C}'),
    ('\u{06DD}', '\u{06DD}'),
    ('\u{070F}', '\u{070F}'),
    ('\u{0890}', '\u{0891}'),
    ('\u{08E2}', '\u{08E2}'),
    ('\u{180E}', '\u{180E}'),
    ('\u{200B}', '\u{200F}'),
    ('\u{202A}', '\u{202E}'),
    ('\u{2060}', '\u{2064}'),
    ('\u{2066}', '\u{206F}'),
    ('\u{E000}', '\u{F8FF}'),
    ('\u{FEFF}', '\u{FEFF}'),
    ('\u{FFF9}', '\u{FFFB}'),
    ('\u{110BD}', '\u{110BD}'),
    ('\u{110CD}', '\u{110CD}'),
    ('\u{13430}', '\u{1343F}'),
    ('\u{1BCA0}', '\u{1BCA3}'),
    ('\u{1D173}', '\u{1D17A}'),
    ('\u{E0001}', '\u{E0001}'),
    ('\u{E0020}', '\u{E007F}'),
    ('\u{F0000}', '\u{10FFFF}'),
];

fn is_printable_char(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    if ch.is_control() || ch.is_whitespace() {
        return false;
    }
    !INVISIBLE_RANGES
        .iter()
        .any(|(low, high)| (*low..=*high).contains(&ch))
}

/// Rejects control, separator, format and private-use characters; a plain
/// space is the only separator allowed. Unassigned code points pass.
pub fn is_printable(text: &str) -> bool {
    text.chars().all(is_printable_char)
}

/// Normalised category name; empty or non-printable names are rejected.
pub fn validate_name(raw: &str) -> Result<String, LedgerError> {
    let name = normalize_text(raw);
    if name.is_empty() || !is_printable(&name) {
        return Err(LedgerError::InvalidName(raw.to_string()));
    }
    Ok(name)
}

/// Normalised free-text entry field; may be empty.
pub fn validate_text_field(field: &'static str, raw: &str) -> Result<String, LedgerError> {
    let value = normalize_text(raw);
    if !is_printable(&value) {
        return Err(LedgerError::InvalidField {
            field,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

pub fn parse_amount(raw: &str) -> Result<f64, LedgerError> {
    let text = normalize_text(raw);
    let amount = text
        .parse::<f64>()
        .map_err(|_| LedgerError::InvalidAmount(raw.to_string()))?;
    validate_amount(amount)
}

pub fn validate_amount(amount: f64) -> Result<f64, LedgerError> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(LedgerError::InvalidAmount(amount.to_string()))
    }
}

/// Raw text of the entry form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub amount: String,
    pub date: String,
    pub description: String,
    pub subcategory: String,
}

impl EntryForm {
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            ..Self::default()
        }
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = subcategory.into();
        self
    }

    /// Validates every field; the first failing one is reported.
    pub fn to_entry(&self) -> Result<Entry, LedgerError> {
        Ok(Entry {
            amount: parse_amount(&self.amount)?,
            date: validate_text_field("date", &self.date)?,
            description: validate_text_field("description", &self.description)?,
            subcategory: validate_text_field("subcategory", &self.subcategory)?,
        })
    }
}

/// Parses `field=value` assignments into a partial update.
pub fn parse_patch<'a, I>(assignments: I) -> Result<EntryPatch, LedgerError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut patch = EntryPatch::default();
    for assignment in assignments {
        let (field, value) = assignment.split_once('=').ok_or_else(|| {
            LedgerError::InvalidField {
                field: "assignment",
                value: assignment.to_string(),
            }
        })?;
        match field.trim().to_ascii_lowercase().as_str() {
            "amount" => patch.amount = Some(parse_amount(value)?),
            "date" => patch.date = Some(validate_text_field("date", value)?),
            "description" | "desc" => {
                patch.description = Some(validate_text_field("description", value)?)
            }
            "subcategory" | "sub" => {
                patch.subcategory = Some(validate_text_field("subcategory", value)?)
            }
            _ => {
                return Err(LedgerError::InvalidField {
                    field: "name",
                    value: field.to_string(),
                })
            }
        }
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(normalize_text("  cat \t food \n"), "cat food");
    }

    #[test]
    fn blank_name_rejected() {
        assert!(matches!(validate_name("   "), Err(LedgerError::InvalidName(_))));
        assert_eq!(validate_name(" rent ").unwrap(), "rent");
    }

    #[test]
    fn control_characters_rejected() {
        assert!(validate_name("fo\u{7}od").is_err());
        assert!(validate_text_field("date", "12\u{1b}[0m").is_err());
    }

    #[test]
    fn invisible_characters_rejected() {
        for name in ["pet\u{200B}care", "\u{FEFF}food", "rent\u{202E}", "\u{E000}"] {
            assert!(!is_printable(name), "{name:?}");
            assert!(matches!(validate_name(name), Err(LedgerError::InvalidName(_))));
        }
        assert!(is_printable("кофе и чай"));
        assert!(is_printable("café ☕"));
    }

    #[test]
    fn amount_must_be_a_finite_number() {
        assert_eq!(parse_amount(" 12.5 ").unwrap(), 12.5);
        assert!(parse_amount("twelve").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn form_converts_to_entry() {
        let entry = EntryForm::new("10")
            .date("2024-03-01")
            .description("weekly   shop")
            .subcategory("groceries")
            .to_entry()
            .unwrap();
        assert_eq!(entry.amount, 10.0);
        assert_eq!(entry.description, "weekly shop");
    }

    #[test]
    fn patch_only_sets_supplied_fields() {
        let patch = parse_patch(["amount=4.5", "sub=bus"]).unwrap();
        assert_eq!(patch.amount, Some(4.5));
        assert_eq!(patch.subcategory.as_deref(), Some("bus"));
        assert!(patch.date.is_none());
        assert!(patch.description.is_none());
    }

    #[test]
    fn patch_rejects_unknown_field() {
        assert!(parse_patch(["colour=red"]).is_err());
        assert!(parse_patch(["amount"]).is_err());
    }
}
