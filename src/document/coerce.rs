//! Module for coercing string-encoded member values into scalar types

mod sealed {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for bool {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A scalar type a string-encoded member value can be coerced into
///
/// This trait is implemented for `String`, `i32`, `i64`, `bool`, `f32` and
/// `f64`; it is sealed and cannot be implemented outside of this crate.
///
/// Coercion follows the C standard library conversion functions and is
/// deliberately permissive — callers relying on strict validation must check
/// the text themselves:
///
/// - `String`: the text passes through verbatim.
/// - `i32`, `i64`: `strtol`-style base-10 parsing. Leading whitespace is
///   skipped, an optional `+`/`-` sign is consumed, then the longest run of
///   decimal digits is parsed; **trailing non-numeric characters silently
///   truncate the parse** (`"42abc"` yields `42`). No radix prefixes. A text
///   without leading digits yields `0`. A value outside the type's range
///   saturates at the nearest bound.
/// - `f32`, `f64`: `strtod`-style parsing of the longest decimal prefix
///   (optional sign, digits, fraction, exponent); a text without a leading
///   number yields `0.0`.
/// - `bool`: the text is parsed as an integer, nonzero means `true`
///   (`"1"` and `"-3"` are `true`; `"0"`, `"true"` and `"x"` are `false`).
pub trait TextScalar: sealed::Sealed + Sized {
    /// Converts the string-encoded value into this type
    fn from_text(text: &str) -> Self;
}

impl TextScalar for String {
    fn from_text(text: &str) -> Self {
        text.to_owned()
    }
}

duplicate::duplicate! {
    [
        int_type;
        [i32];
        [i64];
    ]
    impl TextScalar for int_type {
        fn from_text(text: &str) -> Self {
            parse_integer_prefix(text, int_type::MIN as i64, int_type::MAX as i64) as int_type
        }
    }
}

impl TextScalar for bool {
    fn from_text(text: &str) -> Self {
        parse_integer_prefix(text, i64::MIN, i64::MAX) != 0
    }
}

duplicate::duplicate! {
    [
        float_type;
        [f32];
        [f64];
    ]
    impl TextScalar for float_type {
        fn from_text(text: &str) -> Self {
            parse_float_prefix(text) as float_type
        }
    }
}

/// Whether the byte is whitespace as defined by C `isspace`
fn is_c_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Parses the longest base-10 integer prefix of `text`, clamped to `[min, max]`
///
/// Returns 0 when the text has no leading digits (after optional whitespace
/// and sign).
fn parse_integer_prefix(text: &str, min: i64, max: i64) -> i64 {
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() && is_c_whitespace(bytes[i]) {
        i += 1;
    }

    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    // Accumulate negatively; the negative range is the larger one
    let mut value: i64 = 0;
    while let Some(digit) = bytes.get(i).and_then(|b| (*b as char).to_digit(10)) {
        value = match value
            .checked_mul(10)
            .and_then(|v| v.checked_sub(digit as i64))
        {
            Some(v) => v,
            // Overflow saturates, remaining digits are irrelevant
            None => return if negative { min } else { max },
        };
        i += 1;
    }

    if negative {
        value.max(min)
    } else {
        match value.checked_neg() {
            Some(v) => v.min(max),
            // `value` is i64::MIN, so the magnitude exceeds any positive bound
            None => max,
        }
    }
}

/// Parses the longest decimal floating-point prefix of `text`
///
/// Accepted prefix shape: optional sign, digits with an optional fraction
/// (at least one digit overall), optional exponent with at least one digit.
/// Returns 0.0 when no such prefix exists.
fn parse_float_prefix(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let mut start = 0;
    while start < bytes.len() && is_c_whitespace(bytes[start]) {
        start += 1;
    }

    let mut end = start;
    if matches!(bytes.get(end), Some(b'-') | Some(b'+')) {
        end += 1;
    }

    let mut mantissa_digits = 0;
    while bytes.get(end).is_some_and(|b| b.is_ascii_digit()) {
        end += 1;
        mantissa_digits += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        let mut fraction_end = end + 1;
        while bytes.get(fraction_end).is_some_and(|b| b.is_ascii_digit()) {
            fraction_end += 1;
            mantissa_digits += 1;
        }
        // Include the '.' only when the prefix still forms a number
        if mantissa_digits > 0 {
            end = fraction_end;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'-') | Some(b'+')) {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while bytes.get(exponent_end).is_some_and(|b| b.is_ascii_digit()) {
            exponent_end += 1;
        }
        // An 'e' without digits is trailing garbage, not part of the number
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }

    text[start..end].parse().unwrap_or(0.0)
}
