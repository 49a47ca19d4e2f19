//! Lenient number parsing for weakly-typed source values.

use serde_json::Value;

/// Turns a source value into a finite number, or `None` when no number can be read.
///
/// - JSON numbers are used as-is.
/// - Strings are scanned for their first numeric run: leading text such as currency signs is
///   skipped, but a `-` anywhere in it makes the value negative (`"-$50"` and `"- 50"` are
///   `-50`). `,` thousands separators inside the run are dropped, and the run stops at the
///   first other character, so trailing units never leak digits into the value
///   (`"1,234.5 tCO2e"` is `1234.5`).
/// - Everything else (null, bool, arrays, objects) is absent.
///
/// ```
/// use esg_ingest::core::numeric::parse_numeric;
/// use serde_json::json;
///
/// assert_eq!(parse_numeric(&json!("1,234.5 tCO2e")), Some(1234.5));
/// assert_eq!(parse_numeric(&json!("abc")), None);
/// assert_eq!(parse_numeric(&json!(-12)), Some(-12.0));
/// ```
#[must_use]
pub fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

/// String half of [`parse_numeric`].
#[must_use]
pub fn parse_numeric_str(s: &str) -> Option<f64> {
    let chars: Vec<char> = s.chars().collect();
    let start = chars
        .iter()
        .position(|c| c.is_ascii_digit() || *c == '.')?;
    let negative = chars[..start].contains(&'-');

    let mut run = String::with_capacity(chars.len() - start + 1);
    if negative {
        run.push('-');
    }
    for &c in &chars[start..] {
        match c {
            '0'..='9' | '.' => run.push(c),
            ',' => {}
            _ => break,
        }
    }

    longest_float_prefix(&run).filter(|v| v.is_finite())
}

/// Parses the longest prefix of `run` that forms a float (`"1.2.3"` reads as `1.2`).
fn longest_float_prefix(run: &str) -> Option<f64> {
    let bytes = run.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut seen_dot = false;
    let mut seen_digit = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    run[..end].parse::<f64>().ok()
}
