use std::collections::HashMap;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::error::EntryError;
use crate::model::entry::NewEntry;

pub const ENTRY_KEYS: [&str; 5] = ["date", "odometer", "liters", "price", "full"];

// Order of bare (non key:value) tokens: date odometer liters price.
const POSITIONAL_KEYS: [&str; 4] = ["date", "odometer", "liters", "price"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub positional: Vec<String>,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut positional = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        positional.push(arg.clone());
    }

    ParsedInput {
        positional,
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

pub fn parse_bool_flag(input: &str) -> Result<bool, EntryError> {
    match input.to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "full" => Ok(true),
        "n" | "no" | "false" | "0" | "partial" => Ok(false),
        _ => Err(EntryError::InvalidFlag(input.to_string())),
    }
}

pub fn parse_amount(field: &'static str, input: &str) -> Result<f64, EntryError> {
    // Accept a decimal comma ("1,72").
    let normalized = input.trim().replace(',', ".");
    normalized.parse::<f64>().map_err(|_| EntryError::InvalidNumber {
        field,
        value: input.to_string(),
    })
}

/// Normalizes metadata keys, then fills gaps from positional tokens.
///
/// Returns the resolved fields and warnings for keys that could not be expanded.
pub fn resolve_entry_fields(parsed: ParsedInput) -> (HashMap<String, String>, Vec<String>) {
    let mut fields = HashMap::new();
    let mut warnings = Vec::new();

    for (key, value) in parsed.metadata {
        match expand_key(&key.to_lowercase(), &ENTRY_KEYS) {
            Ok(full_key) => {
                fields.insert(full_key, value);
            }
            Err(e) => warnings.push(e.to_string()),
        }
    }

    let open_slots: Vec<&str> = POSITIONAL_KEYS
        .iter()
        .filter(|k| !fields.contains_key(**k))
        .copied()
        .collect();
    let mut open_slots = open_slots.into_iter();
    for value in parsed.positional {
        match open_slots.next() {
            Some(key) => {
                fields.insert(key.to_string(), value);
            }
            None => warnings.push(format!("Ignoring extra argument: '{}'", value)),
        }
    }

    (fields, warnings)
}

/// Builds an entry from resolved fields. The date parser is injected so callers
/// control what "today" means.
pub fn build_new_entry<F>(fields: &HashMap<String, String>, parse_date: F) -> Result<NewEntry, EntryError>
where
    F: Fn(&str) -> Result<NaiveDate>,
{
    let date = match fields.get("date") {
        Some(d) => parse_date(d).map_err(|_| EntryError::InvalidDate(d.clone()))?,
        None => return Err(EntryError::MissingField("date")),
    };
    let liters = fields
        .get("liters")
        .ok_or(EntryError::MissingField("liters"))
        .and_then(|v| parse_amount("liters", v))?;
    let price_per_liter = fields
        .get("price")
        .ok_or(EntryError::MissingField("price"))
        .and_then(|v| parse_amount("price", v))?;
    // Odometer is optional: 0 records a cost-only fill-up.
    let odometer = match fields.get("odometer") {
        Some(v) => parse_amount("odometer", v)?,
        None => 0.0,
    };
    let is_full_tank = match fields.get("full") {
        Some(v) => parse_bool_flag(v)?,
        None => true,
    };

    let new_entry = NewEntry {
        date,
        odometer,
        liters,
        price_per_liter,
        is_full_tank,
    };
    new_entry.validate()?;
    Ok(new_entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fixed_date(input: &str) -> Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(input, "%Y-%m-%d")?)
    }

    #[test]
    fn test_parse_simple() {
        let parsed = parse_args(&args(&["2025-01-05", "odo:100650", "l:42", "price:1.72"]));
        assert_eq!(parsed.positional, vec!["2025-01-05".to_string()]);
        assert_eq!(parsed.metadata.get("odo"), Some(&"100650".to_string()));
        assert_eq!(parsed.metadata.get("l"), Some(&"42".to_string()));
    }

    #[test]
    fn test_expand_key() {
        let candidates = vec!["date", "odometer", "liters", "price", "full"];

        assert_eq!(expand_key("d", &candidates).unwrap(), "date");
        assert_eq!(expand_key("o", &candidates).unwrap(), "odometer");
        assert_eq!(expand_key("lit", &candidates).unwrap(), "liters");
        assert_eq!(expand_key("full", &candidates).unwrap(), "full");

        // Unknown
        assert!(expand_key("x", &candidates).is_err());

        // Ambiguous
        let candidates = vec!["price", "previous"];
        assert!(expand_key("pr", &candidates).is_err());
    }

    #[test]
    fn test_positional_fields() {
        let parsed = parse_args(&args(&["2025-01-20", "101000", "20", "1.71", "full:no"]));
        let (fields, warnings) = resolve_entry_fields(parsed);
        assert!(warnings.is_empty());

        let new_entry = build_new_entry(&fields, fixed_date).unwrap();
        assert_eq!(new_entry.odometer, 101000.0);
        assert_eq!(new_entry.liters, 20.0);
        assert_eq!(new_entry.price_per_liter, 1.71);
        assert!(!new_entry.is_full_tank);
    }

    #[test]
    fn test_keys_take_precedence_over_positions() {
        // "date" is given by key, so the bare tokens fill odometer, liters, price.
        let parsed = parse_args(&args(&["d:2025-01-20", "101000", "20", "1,71"]));
        let (fields, _) = resolve_entry_fields(parsed);

        let new_entry = build_new_entry(&fields, fixed_date).unwrap();
        assert_eq!(new_entry.date, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
        assert_eq!(new_entry.price_per_liter, 1.71);
        assert!(new_entry.is_full_tank);
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        let parsed = parse_args(&args(&["date:2025-01-20", "liters:20"]));
        let (fields, _) = resolve_entry_fields(parsed);
        assert_eq!(build_new_entry(&fields, fixed_date), Err(EntryError::MissingField("price")));

        let parsed = parse_args(&args(&["date:2025-01-20", "liters:abc", "price:1.7"]));
        let (fields, _) = resolve_entry_fields(parsed);
        assert!(matches!(
            build_new_entry(&fields, fixed_date),
            Err(EntryError::InvalidNumber { field: "liters", .. })
        ));

        let parsed = parse_args(&args(&["date:someday", "liters:20", "price:1.7"]));
        let (fields, _) = resolve_entry_fields(parsed);
        assert_eq!(
            build_new_entry(&fields, fixed_date),
            Err(EntryError::InvalidDate("someday".to_string()))
        );
    }

    #[test]
    fn test_empty_add_is_an_error() {
        let (fields, warnings) = resolve_entry_fields(parse_args(&[]));
        assert!(warnings.is_empty());

        let err: anyhow::Error = build_new_entry(&fields, fixed_date).unwrap_err().into();
        assert_eq!(err.downcast_ref::<EntryError>(), Some(&EntryError::MissingField("date")));
    }

    #[test]
    fn test_unknown_keys_and_extra_tokens_warn() {
        let parsed = parse_args(&args(&["2025-01-20", "1", "2", "3", "4", "zz:1"]));
        let (_, warnings) = resolve_entry_fields(parsed);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_parse_bool_flag() {
        assert_eq!(parse_bool_flag("Yes"), Ok(true));
        assert_eq!(parse_bool_flag("partial"), Ok(false));
        assert!(parse_bool_flag("maybe").is_err());
    }
}
