/// Replace characters XML 1.0 cannot carry with U+FFFD.
pub fn make_valid_xml(s: &str) -> String {
    s.chars()
        .map(|c| if is_valid_xml_char(c) { c } else { '\u{FFFD}' })
        .collect()
}

fn is_valid_xml_char(c: char) -> bool {
    matches!(c,
        '\u{0009}' | '\u{000A}' | '\u{000D}' |
        '\u{0020}'..='\u{D7FF}' |
        '\u{E000}'..='\u{FFFD}' |
        '\u{10000}'..='\u{10FFFF}'
    )
}

/// Fold `\r\n` and lone `\r` into `\n`.
pub fn normalize_line_breaks(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}
