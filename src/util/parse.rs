use crate::error::{internal::InternalError, AppError};

/// Parses a u64 value from a String read back from the database
///
/// # Arguments
/// - `value` - The String to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed String to `u64`
/// - `Err(AppError::InternalErr(ParseStringId))` - Failed to parse
///   the string as a u64
pub fn parse_u64_from_string(value: String) -> Result<u64, AppError> {
    let result = value
        .parse::<u64>()
        .map_err(|e| InternalError::ParseStringId { value, source: e })?;

    Ok(result)
}

/// Parses an optional stored ID, treating `None` as absent rather than an error.
pub fn parse_optional_u64(value: Option<String>) -> Result<Option<u64>, AppError> {
    value.map(parse_u64_from_string).transpose()
}

/// Converts a count or goal to its stored column value.
///
/// # Returns
/// - `Ok(i64)` - The value as stored
/// - `Err(AppError::InternalErr(CountOutOfRange))` - The value exceeds `i64::MAX`
pub fn count_to_stored(value: u64) -> Result<i64, AppError> {
    let stored =
        i64::try_from(value).map_err(|_| InternalError::CountOutOfRange(value.to_string()))?;

    Ok(stored)
}

/// Converts a stored count or goal column back to its value, rejecting negatives.
pub fn count_from_stored(value: i64) -> Result<u64, AppError> {
    let count =
        u64::try_from(value).map_err(|_| InternalError::CountOutOfRange(value.to_string()))?;

    Ok(count)
}

/// Extracts a snowflake from a mention such as `<#123>`, `<@&123>` or `<@!123>`, or
/// from a bare numeric ID.
///
/// # Arguments
/// - `value` - Raw command argument
/// - `sigil` - Mention prefix after `<`, e.g. `"#"` for channels or `"@&"` for roles
///
/// # Returns
/// - `Some(u64)` - The ID the argument refers to
/// - `None` - The argument is neither a matching mention nor a number
pub fn parse_mention(value: &str, sigil: &str) -> Option<u64> {
    let value = value.trim();
    let inner = value
        .strip_prefix('<')
        .and_then(|rest| rest.strip_prefix(sigil))
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(value);

    inner.parse::<u64>().ok().filter(|id| *id != 0)
}

/// Normalizes an invite argument to its bare code.
///
/// Accepts bare codes as well as `discord.gg/<code>` and
/// `discord.com/invite/<code>` links with or without a scheme.
pub fn parse_invite_code(value: &str) -> String {
    let value = value.trim();
    let without_scheme = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value);

    for host in ["discord.gg/", "discord.com/invite/", "discordapp.com/invite/"] {
        if let Some(code) = without_scheme.strip_prefix(host) {
            return code.trim_end_matches('/').to_string();
        }
    }

    without_scheme.to_string()
}

/// Splits off the first whitespace-delimited word of a command argument string.
///
/// # Returns
/// - `(&str, &str)` - The word and the trimmed remainder; both empty for blank input
pub fn split_word(value: &str) -> (&str, &str) {
    let value = value.trim();

    match value.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (value, ""),
    }
}
