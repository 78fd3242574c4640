//! Normalize raw datastore rows into canonical records: consistent casing,
//! bucketed town/flat-type categories, numeric price. Pure and total: every
//! raw row produces exactly one canonical row, garbage prices included.

use rayon::prelude::*;

use crate::data::record::{CanonicalRecord, RawRecord, PRICE_MISSING};

/// Upper-case a town name; the datastore splits the central region into
/// several "Central ..." sub-areas which all chart as one category.
fn canonical_town(raw: &str) -> String {
    let town = raw.to_uppercase();
    if town.starts_with("CENTRAL") {
        "CENTRAL".to_string()
    } else {
        town
    }
}

/// Upper-case a flat type; "Executive", "Executive Condominium" and friends
/// all bucket as `EXEC`.
fn canonical_flat_type(raw: &str) -> String {
    let flat_type = raw.to_uppercase();
    if flat_type.starts_with("EXEC") {
        "EXEC".to_string()
    } else {
        flat_type
    }
}

/// Coerce a raw price string to an integer price.
///
/// `"-"` and any casing of `"na"` mean "no transaction recorded" and map to
/// [`PRICE_MISSING`]. Anything else is parsed loosely: leading whitespace and
/// an optional sign are skipped, the leading digit run is taken, and trailing
/// content (including a fractional part) is ignored. No leading digits, or a
/// negative result, also map to the sentinel, so a bad cell degrades to "no
/// recorded price" rather than failing the batch.
pub fn parse_price(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed == "-" || trimmed.eq_ignore_ascii_case("na") {
        return PRICE_MISSING;
    }

    let signed = trimmed
        .strip_prefix('-')
        .map(|rest| (true, rest))
        .or_else(|| trimmed.strip_prefix('+').map(|rest| (false, rest)));
    let (negative, digits_part) = signed.unwrap_or((false, trimmed));

    let digits: String = digits_part
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() || negative {
        return PRICE_MISSING;
    }
    digits.parse::<i64>().unwrap_or(PRICE_MISSING)
}

/// Convert one raw row into its canonical form.
pub fn normalize_record(raw: &RawRecord) -> CanonicalRecord {
    CanonicalRecord {
        town: canonical_town(&raw.town),
        flat_type: canonical_flat_type(&raw.flat_type),
        quarter: raw.quarter.clone(),
        id: raw.id,
        price: parse_price(&raw.price),
    }
}

/// Normalize a whole batch, preserving input order. Rows are independent, so
/// the map runs on the rayon pool; the ordered collect keeps row order.
pub fn normalize_records(raw: &[RawRecord]) -> Vec<CanonicalRecord> {
    raw.par_iter().map(normalize_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(town: &str, flat_type: &str, price: &str) -> RawRecord {
        RawRecord {
            town: town.to_string(),
            flat_type: flat_type.to_string(),
            quarter: "2020-Q1".to_string(),
            id: 1,
            price: price.to_string(),
        }
    }

    #[test]
    fn central_sub_areas_collapse() {
        for town in ["Central Area", "central", "CENTRAL AREA (CORE)"] {
            let rec = normalize_record(&raw(town, "3 ROOM", "1000"));
            assert_eq!(rec.town, "CENTRAL");
        }
    }

    #[test]
    fn executive_variants_collapse() {
        for flat_type in ["Executive", "EXECUTIVE CONDOMINIUM", "exec"] {
            let rec = normalize_record(&raw("Bedok", flat_type, "1000"));
            assert_eq!(rec.flat_type, "EXEC");
        }
    }

    #[test]
    fn placeholder_prices_map_to_sentinel() {
        for price in ["-", "na", "NA", "Na", " na "] {
            assert_eq!(parse_price(price), PRICE_MISSING, "price {price:?}");
        }
    }

    #[test]
    fn loose_integer_parse() {
        assert_eq!(parse_price("385000"), 385_000);
        assert_eq!(parse_price("  42"), 42);
        assert_eq!(parse_price("+7"), 7);
        assert_eq!(parse_price("123.45"), 123);
        assert_eq!(parse_price("123abc"), 123);
        assert_eq!(parse_price(""), PRICE_MISSING);
        assert_eq!(parse_price("abc"), PRICE_MISSING);
        assert_eq!(parse_price("-5"), PRICE_MISSING);
    }

    #[test]
    fn normalize_is_idempotent_on_canonical_input() {
        let once = normalize_record(&raw("Central Area", "Executive", "500000"));
        let again = normalize_record(&RawRecord {
            town: once.town.clone(),
            flat_type: once.flat_type.clone(),
            quarter: once.quarter.clone(),
            id: once.id,
            price: once.price.to_string(),
        });
        assert_eq!(once, again);
    }

    #[test]
    fn batch_preserves_order() {
        let rows: Vec<RawRecord> = (0..100)
            .map(|i| RawRecord {
                town: format!("Town {i}"),
                flat_type: "3 ROOM".to_string(),
                quarter: "2020-Q1".to_string(),
                id: i,
                price: i.to_string(),
            })
            .collect();
        let normalized = normalize_records(&rows);
        let ids: Vec<i64> = normalized.iter().map(|r| r.id).collect();
        assert_eq!(ids, (0..100).collect::<Vec<i64>>());
    }
}
