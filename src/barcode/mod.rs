pub mod decode;

/// Canonical form of a barcode for product lookup: leading zeros removed.
///
/// A non-empty input consisting only of zeros collapses to `"0"`; an empty
/// input stays empty. No digit validation happens here, the upstream API
/// rejects garbage on its own.
pub fn normalize(raw: &str) -> String {
    let stripped = raw.trim_start_matches('0');
    if stripped.is_empty() && !raw.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_leading_zeros() {
        assert_eq!(normalize("0000000000123"), "123");
        assert_eq!(normalize("0049000028911"), "49000028911");
    }

    #[test]
    fn leaves_unpadded_barcodes_alone() {
        assert_eq!(normalize("4099200123"), "4099200123");
    }

    #[test]
    fn all_zero_input_collapses_to_single_zero() {
        assert_eq!(normalize("0"), "0");
        assert_eq!(normalize("000"), "0");
        assert_eq!(normalize("0000000000000"), "0");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn is_idempotent() {
        for raw in ["0000000000123", "000", "", "123", "0a0", "00text"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "normalize not idempotent for {raw:?}");
        }
    }

    #[test]
    fn does_not_validate_digits() {
        // non-digit input passes through untouched apart from zero stripping
        assert_eq!(normalize("00abc"), "abc");
        assert_eq!(normalize("abc"), "abc");
    }
}
