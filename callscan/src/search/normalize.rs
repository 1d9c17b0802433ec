/// Characters stripped from both ends of every extracted field
const FIELD_WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

/// Trims space, tab, CR and LF from both ends of `field`.
///
/// Interior whitespace is left alone; a field made only of these characters
/// becomes empty.
pub fn normalize_field(field: &str) -> &str {
    field.trim_matches(FIELD_WHITESPACE)
}
