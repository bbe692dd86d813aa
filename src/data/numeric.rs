//! Lenient numeric prefixes.
//!
//! Source files and form input are read the way a browser reads them: leading
//! whitespace is skipped, the longest numeric prefix wins and trailing text is
//! ignored (`"2021.0"` is year 2021, `"3.0abc"` is 3.0).

/// Leading base-10 integer, with an optional sign.
pub fn leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let b = s.as_bytes();
    let mut end = usize::from(matches!(b.first(), Some(b'+' | b'-')));
    let digits_start = end;
    while end < b.len() && b[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// Leading decimal literal (`12`, `-1.5`, `.5`, `2e3`) or `Infinity`.
///
/// `None` when no digits lead the input, which a caller treats as NaN.
pub fn leading_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let b = s.as_bytes();
    let negative = b.first() == Some(&b'-');
    let mut end = usize::from(matches!(b.first(), Some(b'+' | b'-')));

    if s[end..].starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_start = end;
    end = skip_digits(b, end);
    let mut digits = end - int_start;

    if b.get(end) == Some(&b'.') {
        let frac_end = skip_digits(b, end + 1);
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(b.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(b.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = skip_digits(b, exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

fn skip_digits(b: &[u8], mut i: usize) -> usize {
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_reads_leading_digits() {
        assert_eq!(leading_int("2021"), Some(2021));
        assert_eq!(leading_int(" 2021.0"), Some(2021));
        assert_eq!(leading_int("20x1"), Some(20));
        assert_eq!(leading_int("-5"), Some(-5));
        assert_eq!(leading_int("x2021"), None);
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int(""), None);
    }

    #[test]
    fn float_reads_longest_prefix() {
        assert_eq!(leading_float("3.0abc"), Some(3.0));
        assert_eq!(leading_float("2.5\r"), Some(2.5));
        assert_eq!(leading_float("500 kWh"), Some(500.0));
        assert_eq!(leading_float(".5"), Some(0.5));
        assert_eq!(leading_float("5."), Some(5.0));
        assert_eq!(leading_float("2e3x"), Some(2000.0));
        assert_eq!(leading_float("2e"), Some(2.0));
        assert_eq!(leading_float("1.2.3"), Some(1.2));
        assert_eq!(leading_float("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn float_without_digits_is_none() {
        assert_eq!(leading_float("abc"), None);
        assert_eq!(leading_float("."), None);
        assert_eq!(leading_float("-"), None);
        assert_eq!(leading_float("NaN"), None);
        assert_eq!(leading_float(""), None);
    }

    #[test]
    fn negative_zero_keeps_its_sign() {
        let v = leading_float("-0").unwrap();
        assert_eq!(v, 0.0);
        assert!(v.is_sign_negative());
    }
}
