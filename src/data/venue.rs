//! Venue code/name table and venue detection
//!
//! Result files carry the venue only as a display name somewhere in the
//! first lines; the two-character code is recovered by reverse lookup.

/// All 24 venues, in code order
pub const VENUES: [(&str, &str); 24] = [
    ("01", "桐生"),
    ("02", "戸田"),
    ("03", "江戸川"),
    ("04", "平和島"),
    ("05", "多摩川"),
    ("06", "浜名湖"),
    ("07", "蒲郡"),
    ("08", "常滑"),
    ("09", "津"),
    ("10", "三国"),
    ("11", "びわこ"),
    ("12", "住之江"),
    ("13", "尼崎"),
    ("14", "鳴門"),
    ("15", "丸亀"),
    ("16", "児島"),
    ("17", "宮島"),
    ("18", "徳山"),
    ("19", "下関"),
    ("20", "若松"),
    ("21", "芦屋"),
    ("22", "福岡"),
    ("23", "唐津"),
    ("24", "大村"),
];

/// Number of leading lines scanned for a venue name
const VENUE_SCAN_LINES: usize = 30;

/// Venue name for a two-character code, or "" if unknown
pub fn name_for_code(code: &str) -> &'static str {
    VENUES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("")
}

/// Venue code for a display name, or "" if unknown
pub fn code_for_name(name: &str) -> &'static str {
    VENUES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(code, _)| *code)
        .unwrap_or("")
}

/// Scan the first lines of a file for a known venue name.
///
/// Returns the (code, name) pair of the first match, testing table order
/// within each line; ("", "") when nothing matches inside the window.
pub fn detect_venue(lines: &[&str]) -> (&'static str, &'static str) {
    for line in lines.iter().take(VENUE_SCAN_LINES) {
        for (code, name) in VENUES.iter() {
            if line.contains(name) {
                return (code, name);
            }
        }
    }
    ("", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_for_code() {
        assert_eq!(name_for_code("01"), "桐生");
        assert_eq!(name_for_code("23"), "唐津");
        assert_eq!(name_for_code("24"), "大村");
        assert_eq!(name_for_code("99"), "");
    }

    #[test]
    fn test_code_for_name() {
        assert_eq!(code_for_name("桐生"), "01");
        assert_eq!(code_for_name("大村"), "24");
        assert_eq!(code_for_name("どこか"), "");
    }

    #[test]
    fn test_codes_and_names_are_bijective() {
        for (code, name) in VENUES.iter() {
            assert_eq!(name_for_code(code), *name);
            assert_eq!(code_for_name(name), *code);
        }
    }

    #[test]
    fn test_detect_venue_first_match() {
        let lines = vec!["ボートレース成績情報", "第12回 大村 モーニング"];
        assert_eq!(detect_venue(&lines), ("24", "大村"));
    }

    #[test]
    fn test_detect_venue_substring_resolves_in_table_order() {
        // 唐津 contains 津 (09), which sits earlier in the table; the scan
        // takes the first table entry that matches, not the longest.
        let lines = vec!["第12回 唐津 モーニング"];
        assert_eq!(detect_venue(&lines), ("09", "津"));
    }

    #[test]
    fn test_detect_venue_table_order_within_line() {
        // Both 戸田 (02) and 大村 (24) appear; table order wins.
        let lines = vec!["大村 から 戸田 へ"];
        assert_eq!(detect_venue(&lines), ("02", "戸田"));
    }

    #[test]
    fn test_detect_venue_outside_window() {
        let mut lines: Vec<&str> = vec!["no venue here"; 30];
        lines.push("唐津");
        assert_eq!(detect_venue(&lines), ("", ""));
    }

    #[test]
    fn test_detect_venue_none() {
        let lines = vec!["nothing", "to see"];
        assert_eq!(detect_venue(&lines), ("", ""));
    }
}
