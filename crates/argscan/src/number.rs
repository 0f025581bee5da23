//! Strict numeric coercion for typed option values.
//!
//! Both parsers require the whole input to be consumed by the literal grammar.
//! Trailing garbage, overflow and empty input are errors, never a partial
//! result.

/// Why a value string could not be coerced to a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("empty numeric literal")]
    Empty,
    #[error("malformed numeric literal")]
    Malformed,
    #[error("numeric literal out of range")]
    OutOfRange,
}

/// Parse a signed 32-bit integer written as a C-style literal.
///
/// Prefix precedence:
/// - `0x` / `0X` => hexadecimal
/// - `0` followed by more digits => octal
/// - anything else => decimal, optionally signed
///
/// Hex and octal literals are unsigned; a value that does not fit in `i32`
/// is rejected rather than wrapped.
pub fn parse_int32(text: &str) -> Result<i32, ConversionError> {
    if text.is_empty() {
        return Err(ConversionError::Empty);
    }

    if let Some(digits) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        return parse_unsigned_radix(digits, 16);
    }
    if text.len() > 1 && text.starts_with('0') {
        return parse_unsigned_radix(&text[1..], 8);
    }

    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConversionError::Malformed);
    }
    // `-017` would read as decimal here but as octal to a C reader.
    if body.len() > 1 && body.starts_with('0') {
        return Err(ConversionError::Malformed);
    }

    // Only overflow can fail past the digit check above.
    text.parse::<i32>().map_err(|_| ConversionError::OutOfRange)
}

fn parse_unsigned_radix(digits: &str, radix: u32) -> Result<i32, ConversionError> {
    // `from_str_radix` accepts a leading sign, so check the digits first.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ConversionError::Malformed);
    }
    let value = u32::from_str_radix(digits, radix).map_err(|_| ConversionError::OutOfRange)?;
    i32::try_from(value).map_err(|_| ConversionError::OutOfRange)
}

/// Parse a 32-bit float in plain decimal or exponent notation.
///
/// Accepted grammar: `[sign] digits [. digits] [(e|E) [sign] digits]`, where
/// either the integer or the fraction part may be empty but not both.
/// `inf`/`nan` spellings and literals that overflow to infinity are rejected.
pub fn parse_float32(text: &str) -> Result<f32, ConversionError> {
    if text.is_empty() {
        return Err(ConversionError::Empty);
    }
    if !is_decimal_float(text.as_bytes()) {
        return Err(ConversionError::Malformed);
    }

    let value: f32 = text.parse().map_err(|_| ConversionError::Malformed)?;
    if value.is_infinite() {
        return Err(ConversionError::OutOfRange);
    }
    Ok(value)
}

fn is_decimal_float(bytes: &[u8]) -> bool {
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0usize;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_end = digits_from(i);
    let mut mantissa_digits = int_end - i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        mantissa_digits += frac_end - (i + 1);
        i = frac_end;
    }
    if mantissa_digits == 0 {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_end = digits_from(i);
        if exp_end == i {
            return false;
        }
        i = exp_end;
    }

    i == bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int32_accepts_each_radix() {
        assert_eq!(parse_int32("1337"), Ok(1337));
        assert_eq!(parse_int32("0x1337"), Ok(0x1337));
        assert_eq!(parse_int32("0X1337"), Ok(0x1337));
        assert_eq!(parse_int32("01337"), Ok(0o1337));
        assert_eq!(parse_int32("0"), Ok(0));
        assert_eq!(parse_int32("-42"), Ok(-42));
        assert_eq!(parse_int32("+42"), Ok(42));
        assert_eq!(parse_int32("-2147483648"), Ok(i32::MIN));
        assert_eq!(parse_int32("0x7fffffff"), Ok(i32::MAX));
    }

    #[test]
    fn int32_rejects_trailing_garbage() {
        assert_eq!(parse_int32("poop"), Err(ConversionError::Malformed));
        assert_eq!(parse_int32("1337poop"), Err(ConversionError::Malformed));
        assert_eq!(parse_int32("0x13g7"), Err(ConversionError::Malformed));
        assert_eq!(parse_int32(" 12"), Err(ConversionError::Malformed));
        assert_eq!(parse_int32("12 "), Err(ConversionError::Malformed));
        assert_eq!(parse_int32(""), Err(ConversionError::Empty));
    }

    #[test]
    fn int32_base_prefixed_literals_are_unsigned() {
        assert_eq!(parse_int32("0x"), Err(ConversionError::Malformed));
        assert_eq!(parse_int32("0x-1"), Err(ConversionError::Malformed));
        assert_eq!(parse_int32("0x+1"), Err(ConversionError::Malformed));
        assert_eq!(parse_int32("-0x10"), Err(ConversionError::Malformed));
        assert_eq!(parse_int32("-017"), Err(ConversionError::Malformed));
        assert_eq!(parse_int32("019"), Err(ConversionError::Malformed));
    }

    #[test]
    fn int32_overflow_is_not_truncated() {
        assert_eq!(parse_int32("2147483648"), Err(ConversionError::OutOfRange));
        assert_eq!(parse_int32("-2147483649"), Err(ConversionError::OutOfRange));
        assert_eq!(parse_int32("0x80000000"), Err(ConversionError::OutOfRange));
        assert_eq!(parse_int32("0xffffffffff"), Err(ConversionError::OutOfRange));
        assert_eq!(parse_int32("077777777777"), Err(ConversionError::OutOfRange));
    }

    #[test]
    fn float32_accepts_decimal_forms() {
        assert_eq!(parse_float32("13.37"), Ok(13.37_f32));
        assert_eq!(parse_float32("1337"), Ok(1337.0));
        assert_eq!(parse_float32("-0.5"), Ok(-0.5));
        assert_eq!(parse_float32(".5"), Ok(0.5));
        assert_eq!(parse_float32("5."), Ok(5.0));
        assert_eq!(parse_float32("1e3"), Ok(1000.0));
        assert_eq!(parse_float32("2.5E-1"), Ok(0.25));
    }

    #[test]
    fn float32_rejects_everything_else() {
        for text in ["poop", "13.37poop", ".", "-", "1e", "1e+", "inf", "NaN", "0x10", "1.2.3"] {
            assert_eq!(
                parse_float32(text),
                Err(ConversionError::Malformed),
                "input: {text:?}"
            );
        }
        assert_eq!(parse_float32(""), Err(ConversionError::Empty));
        assert_eq!(parse_float32("1e39"), Err(ConversionError::OutOfRange));
    }
}
