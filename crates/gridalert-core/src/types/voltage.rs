//! Voltage level parsing.
//!
//! The asset registry stores voltage levels as free text such as `"132kV"`.
//! Parsing is lenient: the first run of digits immediately followed by `kV`
//! (case-insensitive) wins, anything unparsable yields 0.

/// Parse a free-text voltage level into kilovolts.
///
/// Returns 0 for empty, missing, or malformed input.
pub fn parse_voltage_kv(raw: &str) -> u32 {
    let lower = raw.to_lowercase();
    let bytes = lower.as_bytes();

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            // The unit must follow the digits directly, as in "132kV".
            if lower[i..].starts_with("kv") {
                return lower[start..i].parse().unwrap_or(0);
            }
        } else {
            i += 1;
        }
    }
    0
}
