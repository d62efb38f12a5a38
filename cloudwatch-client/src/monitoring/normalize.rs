//! ASCII normalization of identifiers sent to CloudWatch.
//!
//! CloudWatch only accepts ASCII in metric names, dimension names and values,
//! and alarm names. German umlauts are transliterated to their digraphs, every
//! other non-ASCII character is dropped.

use std::collections::BTreeMap;

/// Maps an identifier to ASCII.
///
/// `ä ö ü Ä Ö Ü ß` become `ae oe ue Ae Oe Ue ss`; any other non-ASCII
/// character is removed. The result is stable under repeated application.
///
/// ```rust
/// use cloudwatch_client::monitoring::normalize;
///
/// assert_eq!(normalize("Größe"), "Groesse");
/// assert_eq!(normalize("naïve café"), "nave caf");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'Ä' => out.push_str("Ae"),
            'Ö' => out.push_str("Oe"),
            'Ü' => out.push_str("Ue"),
            'ß' => out.push_str("ss"),
            c if c.is_ascii() => out.push(c),
            _ => {}
        }
    }
    out
}

/// Normalizes both keys and values of a dimension map.
///
/// Keys that collide after normalization keep the value of the last key in
/// map order.
pub fn normalize_dimensions<K, V, I>(dimensions: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    dimensions
        .into_iter()
        .map(|(k, v)| (normalize(k.as_ref()), normalize(v.as_ref())))
        .collect()
}

/// Builds the namespaced alarm name: `{namespace}.{normalize(alarm_name)}`,
/// or just the normalized alarm name when the namespace is empty.
pub fn full_alarm_name(namespace: &str, alarm_name: &str) -> String {
    let alarm_name = normalize(alarm_name);
    if namespace.is_empty() {
        alarm_name
    } else {
        format!("{namespace}.{alarm_name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_umlaut_table() {
        assert_eq!(normalize("ä"), "ae");
        assert_eq!(normalize("ö"), "oe");
        assert_eq!(normalize("ü"), "ue");
        assert_eq!(normalize("Ä"), "Ae");
        assert_eq!(normalize("Ö"), "Oe");
        assert_eq!(normalize("Ü"), "Ue");
        assert_eq!(normalize("ß"), "ss");
        assert_eq!(normalize("Übergrößenträger"), "Uebergroessentraeger");
    }

    #[test]
    fn test_unmapped_non_ascii_is_deleted() {
        assert_eq!(normalize("café"), "caf");
        assert_eq!(normalize("Zoë 🚀 Ω"), "Zo  ");
        assert_eq!(normalize("日本"), "");
    }

    #[test]
    fn test_ascii_is_untouched() {
        let input = "jn.importer/Job-Count_1 (EU)";
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn test_full_alarm_name() {
        assert_eq!(full_alarm_name("ns", "cpü"), "ns.cpue");
        assert_eq!(full_alarm_name("", "cpü"), "cpue");
        assert_eq!(full_alarm_name("jn.importer", ""), "jn.importer.");
    }

    #[test]
    fn test_normalize_dimensions() {
        let dims = normalize_dimensions([("Stadt", "München"), ("Größe", "groß")]);
        assert_eq!(dims.get("Stadt"), Some(&"Muenchen".to_string()));
        assert_eq!(dims.get("Groesse"), Some(&"gross".to_string()));
        assert_eq!(dims.len(), 2);
    }
}
