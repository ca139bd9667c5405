// Phone number normalisation for content API numbers such as `0034.971 123456`

const MIN_E164_LEN: usize = 8;
const DELIMITERS: [char; 4] = ['.', '-', ',', ' '];

/// Converts an upstream-formatted phone number to E.164.
///
/// The first delimiter found (`.`, `-`, `,` or space, not in leading
/// position) is removed everywhere in the number. `+00` and `00`
/// international prefixes are dropped and a leading `+` is ensured.
/// Returns `None` when fewer than eight characters remain.
pub fn parse_e164(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let compact = match raw.find(&DELIMITERS[..]) {
        Some(pos) if pos > 0 => {
            let delimiter = raw[pos..].chars().next()?;
            raw.replace(delimiter, "")
        }
        _ => raw.to_string(),
    };
    if compact.len() < MIN_E164_LEN {
        return None;
    }

    let national = compact
        .strip_prefix("+00")
        .or_else(|| compact.strip_prefix("00"))
        .unwrap_or(&compact);

    if national.starts_with('+') {
        Some(national.to_string())
    } else {
        Some(format!("+{}", national))
    }
}
