//! Header-to-column mapping with per-table uniqueness.

use std::collections::HashSet;

use tabload_model::{ColumnMapping, ColumnMappings, KEY_COLUMN};

use crate::sanitize::sanitize_identifier;

/// Characters held back from column names so a suffix still fits.
pub const UNIQUENESS_HEADROOM: usize = 4;

/// Characters held back from the stem of a suffixed name.
const SUFFIX_RESERVE: usize = 9;

/// Base used for headers that sanitize to nothing.
const FALLBACK_BASE: &str = "column";

/// Maps `headers` to sanitized, pairwise-distinct column identifiers.
///
/// Each header is sanitized to `max_ident_len - 4` characters. A name that
/// is already taken (including the surrogate key `id`) is cut to
/// `max_ident_len - 9` characters and suffixed with the header's position.
/// If that collides as well, a counter follows the position until the name
/// is free. Headers with no usable characters become `column_<position>`.
/// Stems shrink so every name fits `max_ident_len`; a suffix too long for
/// any stem gives way to the first free `c<n>`.
pub fn build_column_mappings(headers: &[String], max_ident_len: usize) -> ColumnMappings {
    let base_len = max_ident_len.saturating_sub(UNIQUENESS_HEADROOM);
    let mut used: HashSet<String> = HashSet::from([KEY_COLUMN.to_string()]);
    let mut columns = Vec::with_capacity(headers.len());

    for (index, original) in headers.iter().enumerate() {
        let cleaned = sanitize_identifier(original, base_len);
        let sanitized = if cleaned.is_empty() {
            with_position_suffix(FALLBACK_BASE, index, &used, max_ident_len)
        } else if used.contains(&cleaned) {
            let unique = with_position_suffix(&cleaned, index, &used, max_ident_len);
            tracing::debug!(
                header = %original,
                collided = %cleaned,
                column = %unique,
                "column name collision resolved"
            );
            unique
        } else {
            cleaned
        };
        used.insert(sanitized.clone());
        columns.push(ColumnMapping {
            index,
            original: original.clone(),
            sanitized,
        });
    }

    ColumnMappings::new(columns)
}

fn with_position_suffix(
    base: &str,
    index: usize,
    used: &HashSet<String>,
    max_ident_len: usize,
) -> String {
    let mut suffix = index.to_string();
    let mut attempt = 1usize;
    while let Some(candidate) = fit_suffixed(base, &suffix, max_ident_len) {
        if !used.contains(&candidate) {
            return candidate;
        }
        suffix = format!("{index}_{attempt}");
        attempt += 1;
    }
    compact_name(used)
}

/// `<stem>_<suffix>` cut to `max_ident_len`, or `None` when no stem fits.
fn fit_suffixed(base: &str, suffix: &str, max_ident_len: usize) -> Option<String> {
    let room = max_ident_len.checked_sub(suffix.len() + 1)?;
    let keep = match max_ident_len.saturating_sub(SUFFIX_RESERVE) {
        0 => room,
        stem_limit => stem_limit.min(room),
    };
    let mut stem = base[..keep.min(base.len())].trim_end_matches('_');
    if stem.is_empty() {
        stem = &FALLBACK_BASE[..room.min(FALLBACK_BASE.len())];
    }
    if stem.is_empty() {
        return None;
    }
    Some(format!("{stem}_{suffix}"))
}

/// First free `c<n>`. At most `used.len()` names are taken, so `n` stays
/// below that count.
fn compact_name(used: &HashSet<String>) -> String {
    let mut n = 0usize;
    loop {
        let name = format!("c{n}");
        if !used.contains(&name) {
            return name;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn names(mappings: &ColumnMappings) -> Vec<&str> {
        mappings.sanitized_names().collect()
    }

    #[test]
    fn distinct_headers_pass_through() {
        let mappings = build_column_mappings(&headers(&["First Name", "Age"]), 64);
        assert_eq!(names(&mappings), vec!["first_name", "age"]);
    }

    #[test]
    fn duplicates_get_their_position() {
        let mappings =
            build_column_mappings(&headers(&["Amount", "amount", "AMOUNT!", "other"]), 64);
        assert_eq!(names(&mappings), vec!["amount", "amount_1", "amount_2", "other"]);
    }

    #[test]
    fn suffix_never_collides_with_a_real_header() {
        let mappings = build_column_mappings(&headers(&["a_1", "a", "a"]), 64);
        assert_eq!(names(&mappings), vec!["a_1", "a", "a_2"]);

        // "x_2" is taken by the first header, so the third gets a counter
        let mappings = build_column_mappings(&headers(&["x_2", "x", "x"]), 64);
        assert_eq!(names(&mappings), vec!["x_2", "x", "x_2_1"]);

        let mappings = build_column_mappings(&headers(&["b", "b_1", "b-1", "B"]), 64);
        assert_eq!(names(&mappings), vec!["b", "b_1", "b_1_2", "b_3"]);
    }

    #[test]
    fn surrogate_key_name_is_reserved() {
        let mappings = build_column_mappings(&headers(&["ID", "name"]), 64);
        assert_eq!(names(&mappings), vec!["id_0", "name"]);
    }

    #[test]
    fn empty_headers_get_a_placeholder() {
        let mappings = build_column_mappings(&headers(&["", "???", "x"]), 64);
        assert_eq!(names(&mappings), vec!["column_0", "column_1", "x"]);
    }

    #[test]
    fn long_duplicates_stay_within_limit() {
        let long = format!("{} end", "segment ".repeat(20));
        let mappings = build_column_mappings(&headers(&[&long, &long, &long]), 64);
        let all = names(&mappings);
        assert_eq!(all[0].len(), 60);
        assert!(all[1].ends_with("_1"));
        assert!(all[2].ends_with("_2"));
        assert!(all.iter().all(|n| n.len() <= 64));
        assert_ne!(all[1], all[2]);
    }

    #[test]
    fn smallest_limit_keeps_every_name_bounded() {
        let mappings = build_column_mappings(&vec!["a".to_string(); 12], 8);
        let all = names(&mappings);
        assert_eq!(all[0], "a");
        assert_eq!(all[1], "a_1");
        assert_eq!(all[11], "a_11");
        assert!(all.iter().all(|n| n.len() <= 8), "{all:?}");
        let distinct: HashSet<&str> = all.iter().copied().collect();
        assert_eq!(distinct.len(), all.len());

        let mappings = build_column_mappings(&vec![String::new(); 120], 9);
        let all = names(&mappings);
        assert_eq!(all[0], "column_0");
        assert_eq!(all[119], "colum_119");
        assert!(all.iter().all(|n| n.len() <= 9), "{all:?}");
        let distinct: HashSet<&str> = all.iter().copied().collect();
        assert_eq!(distinct.len(), all.len());
    }

    #[test]
    fn oversized_suffix_falls_back_to_a_compact_name() {
        let used = HashSet::from(["id".to_string(), "c0".to_string()]);
        assert_eq!(with_position_suffix("a", 1_234_567, &used, 8), "c1");
    }
}
