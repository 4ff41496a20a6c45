use crate::error::ProtocolError;

/// Permission bits that can be carried in a `C` or `D` header.
const MODE_MASK: u32 = 0o7777;

/// Parses the leading field of a `C` or `D` header into permission bits.
///
/// The field is a single tag letter followed by exactly four octal digits,
/// for example `C0644` or `D0755`.
pub fn parse_permissions(field: &str) -> Result<u32, ProtocolError> {
    let bytes = field.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[0].is_ascii_alphabetic()
        && bytes[1..].iter().all(|byte| matches!(byte, b'0'..=b'7'));
    if !well_formed {
        return Err(ProtocolError::Permissions(field.to_owned()));
    }

    Ok(bytes[1..]
        .iter()
        .fold(0u32, |mode, digit| (mode << 3) | u32::from(digit - b'0')))
}

/// Renders permission bits behind `tag` in header form (`C0644`).
#[must_use]
pub fn format_mode(tag: char, mode: u32) -> String {
    format!("{tag}{:04o}", mode & MODE_MASK)
}

/// Parses a non-negative decimal integer named `field` for diagnostics.
///
/// Signs, whitespace and empty strings are rejected.
pub fn parse_decimal(field: &'static str, text: &str) -> Result<u64, ProtocolError> {
    let error = || ProtocolError::Number {
        field,
        text: text.to_owned(),
    };
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(error());
    }
    text.parse::<u64>().map_err(|_| error())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_permissions() {
        assert_eq!(parse_permissions("C0644"), Ok(0o644));
    }

    #[test]
    fn parses_directory_permissions_with_special_bits() {
        assert_eq!(parse_permissions("D1777"), Ok(0o1777));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            parse_permissions("C644"),
            Err(ProtocolError::Permissions("C644".to_owned()))
        );
        assert!(parse_permissions("C00644").is_err());
        assert!(parse_permissions("").is_err());
    }

    #[test]
    fn rejects_non_octal_digits() {
        assert!(parse_permissions("C0648").is_err());
        assert!(parse_permissions("C06a4").is_err());
        assert!(parse_permissions("C+644").is_err());
    }

    #[test]
    fn rejects_multibyte_prefix_without_panicking() {
        assert!(parse_permissions("é064").is_err());
    }

    #[test]
    fn formats_with_four_digits() {
        assert_eq!(format_mode('C', 0o644), "C0644");
        assert_eq!(format_mode('D', 0o40755), "D0755");
    }

    #[test]
    fn decimal_rejects_signs_and_garbage() {
        assert_eq!(parse_decimal("length", "42"), Ok(42));
        assert!(parse_decimal("length", "+42").is_err());
        assert!(parse_decimal("length", "-1").is_err());
        assert!(parse_decimal("length", "").is_err());
        assert!(parse_decimal("length", "4 2").is_err());
    }

    #[test]
    fn decimal_rejects_overflow() {
        let err = parse_decimal("length", "99999999999999999999999").unwrap_err();
        assert!(matches!(err, ProtocolError::Number { field: "length", .. }));
    }
}
