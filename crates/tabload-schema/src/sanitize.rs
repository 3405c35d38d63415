//! Identifier sanitization.

/// Longest prefix kept when a name has to be shortened.
const MAX_KEPT_PREFIX: usize = 30;

/// Turns `raw` into an identifier of at most `max_len` characters.
///
/// Every character other than an ASCII letter, digit or underscore becomes
/// an underscore, runs of underscores collapse into one, leading and
/// trailing underscores are dropped and the result is lowercased.
///
/// Names that are still too long keep their beginning and their end, joined
/// by a single underscore: with the default limit of 64 that is the first 30
/// and the last 33 characters. The result may be empty when `raw` holds no
/// usable characters.
pub fn sanitize_identifier(raw: &str, max_len: usize) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut previous_underscore = false;
    for ch in raw.chars() {
        let mapped = if ch.is_ascii_alphanumeric() {
            ch.to_ascii_lowercase()
        } else {
            '_'
        };
        if mapped == '_' {
            if previous_underscore {
                continue;
            }
            previous_underscore = true;
        } else {
            previous_underscore = false;
        }
        cleaned.push(mapped);
    }
    shorten(cleaned.trim_matches('_'), max_len)
}

/// Cuts an already-clean ASCII identifier down to `max_len`, keeping both ends.
fn shorten(name: &str, max_len: usize) -> String {
    if name.len() <= max_len {
        return name.to_string();
    }
    if max_len < 3 {
        return name[..max_len].to_string();
    }
    let prefix = MAX_KEPT_PREFIX.min(max_len / 2);
    let suffix = max_len - 1 - prefix;
    format!("{}_{}", &name[..prefix], &name[name.len() - suffix..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_collapses_and_lowercases() {
        assert_eq!(sanitize_identifier("Customer Name", 64), "customer_name");
        assert_eq!(sanitize_identifier("  Total ($) -- net  ", 64), "total_net");
        assert_eq!(sanitize_identifier("__already_clean__", 64), "already_clean");
        assert_eq!(sanitize_identifier("Größe/Menge", 64), "gr_e_menge");
    }

    #[test]
    fn empty_when_nothing_usable() {
        assert_eq!(sanitize_identifier("", 64), "");
        assert_eq!(sanitize_identifier("%%% ---", 64), "");
    }

    #[test]
    fn long_names_keep_both_ends() {
        let raw = format!("{}{}", "a".repeat(40), "b".repeat(40));
        let name = sanitize_identifier(&raw, 64);
        assert_eq!(name.len(), 64);
        assert_eq!(&name[..31], format!("{}_", "a".repeat(30)));
        assert_eq!(&name[31..], "b".repeat(33));
    }

    #[test]
    fn headroom_limit_splits_thirty_and_twenty_nine() {
        let raw = "x".repeat(100);
        let name = sanitize_identifier(&raw, 60);
        assert_eq!(name.len(), 60);
        assert_eq!(name.as_bytes()[30], b'_');
    }

    #[test]
    fn exact_limit_is_untouched() {
        let raw = "c".repeat(64);
        assert_eq!(sanitize_identifier(&raw, 64), raw);
    }

    #[test]
    fn tiny_limits_cut_plainly() {
        assert_eq!(sanitize_identifier("abcdef", 2), "ab");
        assert_eq!(sanitize_identifier("abcdef", 0), "");
        assert_eq!(sanitize_identifier("abcdef", 3), "a_f");
    }
}
