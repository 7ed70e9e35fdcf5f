/// Normalize a destination number to international `+` form.
///
/// `+5511999999999` is kept, `005511999999999` becomes `+5511999999999`, and
/// anything else gets a `+` in front. Surrounding whitespace is trimmed and an
/// empty string stays empty.
pub fn normalize_number(number: &str) -> String {
    let number = number.trim();
    if number.is_empty() || number.starts_with('+') {
        number.to_string()
    } else if let Some(rest) = number.strip_prefix("00") {
        format!("+{}", rest)
    } else {
        format!("+{}", number)
    }
}
