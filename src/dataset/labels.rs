//! Output column label profiles
//!
//! One extraction pipeline feeds every export; a profile only renames the
//! canonical columns for its audience (machine-learning consumers read the
//! English names, the review CSV carries the Japanese ones).

/// Canonical base columns, in output order
pub const BASE_COLUMNS: [&str; 14] = [
    "date",
    "venue_code",
    "venue_name",
    "race_number",
    "frame_number",
    "boat_number",
    "racer_id",
    "racer_name",
    "age",
    "weight",
    "exhibition_time",
    "start_timing",
    "race_time",
    "finish_position",
];

/// Column naming for an export audience
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelProfile {
    English,
    Japanese,
}

impl LabelProfile {
    /// Rename a canonical column for this profile.
    ///
    /// Columns without a mapping (derived ML columns and the like) keep
    /// their canonical name.
    pub fn rename(&self, column: &str) -> String {
        match self {
            LabelProfile::English => column.to_string(),
            LabelProfile::Japanese => japanese_label(column),
        }
    }
}

fn japanese_label(column: &str) -> String {
    if let Some(bet_key) = column.strip_prefix("odds_") {
        return format!("オッズ_{}", bet_key);
    }

    let label = match column {
        "date" => "日付",
        "venue_code" => "レース場コード",
        "venue_name" => "レース場名",
        "race_number" => "レース番号",
        "frame_number" => "選手枠番",
        "boat_number" => "選手ナンバー",
        "racer_id" => "レーサーID",
        "racer_name" => "レーサー名",
        "age" => "年齢",
        "weight" => "体重",
        "exhibition_time" => "展示タイム",
        "start_timing" => "スタートタイミング",
        "race_time" => "レースタイム",
        "finish_position" => "最終着順",
        other => other,
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_profile_is_identity() {
        assert_eq!(LabelProfile::English.rename("date"), "date");
        assert_eq!(
            LabelProfile::English.rename("odds_exacta_3_1"),
            "odds_exacta_3_1"
        );
    }

    #[test]
    fn test_japanese_base_labels() {
        assert_eq!(LabelProfile::Japanese.rename("date"), "日付");
        assert_eq!(LabelProfile::Japanese.rename("boat_number"), "選手ナンバー");
        assert_eq!(LabelProfile::Japanese.rename("finish_position"), "最終着順");
    }

    #[test]
    fn test_japanese_odds_prefix() {
        assert_eq!(
            LabelProfile::Japanese.rename("odds_trio_1_4_6"),
            "オッズ_trio_1_4_6"
        );
    }

    #[test]
    fn test_unknown_column_passes_through() {
        assert_eq!(LabelProfile::Japanese.rename("year"), "year");
    }

    #[test]
    fn test_every_base_column_has_a_japanese_label() {
        for column in BASE_COLUMNS {
            assert_ne!(LabelProfile::Japanese.rename(column), column);
        }
    }
}
