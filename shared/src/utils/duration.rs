//! Parsing of human-friendly duration strings used in configuration
//!
//! Accepted forms: a bare number of seconds (`"3600"`), or one or more
//! `<number><unit>` groups with units `s`, `m`, `h`, `d` (`"15m"`, `"1h30m"`).

use std::time::Duration;

/// Parse a duration string such as `"90"`, `"15m"`, `"24h"` or `"1h30m"`.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration is empty".to_string());
    }

    if let Ok(seconds) = input.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    }

    let mut total: u64 = 0;
    let mut digits = String::new();

    for ch in input.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        let multiplier = match ch {
            's' => 1,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            other => return Err(format!("unknown duration unit '{}' in '{}'", other, input)),
        };
        if digits.is_empty() {
            return Err(format!("missing number before '{}' in '{}'", ch, input));
        }

        let value: u64 = digits
            .parse()
            .map_err(|e| format!("invalid number in '{}': {}", input, e))?;
        total = value
            .checked_mul(multiplier)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| format!("duration '{}' overflows", input))?;
        digits.clear();
    }

    if !digits.is_empty() {
        return Err(format!("trailing number without unit in '{}'", input));
    }

    Ok(Duration::from_secs(total))
}
