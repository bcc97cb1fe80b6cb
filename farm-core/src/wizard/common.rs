//! Small helpers shared by the wizard stages.

/// Parses user-entered text as a floating point number, substituting zero
/// when no number can be read or the result is not finite.
///
/// Leading whitespace is skipped and the longest numeric prefix is used, so
/// trailing units or separators are ignored. This is the only place form
/// text becomes a number.
///
/// # Examples
///
/// ```
/// use farm_core::wizard::common::parse_or_zero;
///
/// assert_eq!(parse_or_zero("10.5"), 10.5);
/// assert_eq!(parse_or_zero(" 7 "), 7.0);
/// assert_eq!(parse_or_zero("12.5 ha"), 12.5);
/// assert_eq!(parse_or_zero("1,200"), 1.0);
/// assert_eq!(parse_or_zero(""), 0.0);
/// assert_eq!(parse_or_zero("abc"), 0.0);
/// ```
pub fn parse_or_zero(text: &str) -> f64 {
    let text = text.trim_start();
    match text[..numeric_prefix_len(text)].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Byte length of the longest `[+-]digits[.digits][e[+-]digits]` prefix.
/// Returns 0 when the prefix holds no digit.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let whole = digits_from(end);
    end += whole;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if whole > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole == 0 && fraction == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }
    end
}

/// Turns a wire field name into a display label: underscores become spaces
/// and the first letter of each word is capitalized.
///
/// # Examples
///
/// ```
/// use farm_core::wizard::common::humanize_field_name;
///
/// assert_eq!(humanize_field_name("Soil_color"), "Soil Color");
/// assert_eq!(humanize_field_name("pH"), "PH");
/// ```
pub fn humanize_field_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Message shown beside a blank required field.
pub fn required_message(name: &str) -> String {
    format!("{} is required.", humanize_field_name(name))
}
