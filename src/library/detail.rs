//! Render-ready projection of a single character.
//!
//! Holds exactly what a detail page shows, already formatted. Sections
//! with nothing to show are left empty (or `None`) rather than filled
//! with placeholders.

use serde::{Deserialize, Serialize};

use super::content::{capitalize_first, ContentId, ContentRecord};

/// Level whose base stats are shown on the detail page
pub const BASE_STAT_LEVEL: usize = 1;

/// One base-stat block (e.g. "HP" / 1040)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub label: String,
    pub value: i64,
}

/// One numbered constellation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstellationLine {
    /// 1-based position (C1..C6)
    pub index: usize,
    pub title: String,
    /// HTML fragment, passed through as stored
    pub description_html: String,
}

/// Everything a character page shows, already formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDetail {
    pub id: ContentId,
    pub name: String,
    pub image: String,
    pub weapon_label: String,
    pub rarity_label: String,
    pub description: String,
    pub base_stats: Vec<StatLine>,
    pub stat_growth: Option<String>,
    pub constellations: Vec<ConstellationLine>,
}

impl CharacterDetail {
    pub fn build(id: &ContentId, record: &ContentRecord, image: &str) -> Self {
        let base_stats = [("HP", &record.hp), ("ATK", &record.atk), ("DEF", &record.def)]
            .into_iter()
            .filter_map(|(label, curve)| {
                stat_at_level(curve, BASE_STAT_LEVEL).map(|value| StatLine {
                    label: label.to_string(),
                    value,
                })
            })
            .collect();

        let constellations = record
            .constellations
            .iter()
            .enumerate()
            .map(|(i, c)| ConstellationLine {
                index: i + 1,
                title: format!("C{}: {}", i + 1, c.name),
                description_html: c.description.clone(),
            })
            .collect();

        Self {
            id: id.clone(),
            name: id.display_name(),
            image: image.to_string(),
            weapon_label: format!("Weapon: {}", capitalize_first(&record.weapon)),
            rarity_label: format!("Rarity: {}", capitalize_first(&record.rarity)),
            description: record.description.clone(),
            base_stats,
            stat_growth: record
                .stat_grow
                .as_deref()
                .map(humanize_stat_name)
                .filter(|s| !s.is_empty()),
            constellations,
        }
    }
}

/// Rounded stat value at `level`, or `None` when there is nothing to show.
///
/// Missing or `null` entries, zero and non-finite values are all treated
/// as absent.
pub fn stat_at_level(curve: &[Option<f64>], level: usize) -> Option<i64> {
    let value = (*curve.get(level)?)?;
    if value == 0.0 || !value.is_finite() {
        return None;
    }
    Some(value.round() as i64)
}

/// `"critRate"` -> `"Crit Rate"`
pub fn humanize_stat_name(raw: &str) -> String {
    let mut spaced = String::with_capacity(raw.len() + 4);
    for c in raw.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }
    capitalize_first(spaced.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::content::Constellation;
    use std::collections::BTreeMap;

    fn record() -> ContentRecord {
        ContentRecord {
            description: "Adeptus of the Qixing.".to_string(),
            weapon: "bow".to_string(),
            rarity: "5".to_string(),
            hp: vec![Some(0.0), Some(762.6), Some(1978.0)],
            atk: vec![Some(0.0), Some(26.1)],
            def: vec![Some(0.0), Some(49.1)],
            stat_grow: Some("critDamage".to_string()),
            constellations: vec![
                Constellation {
                    name: "Dew-Drinker".to_string(),
                    description: "<span>Frostflake</span> reduces RES".to_string(),
                },
                Constellation {
                    name: "The Auspicious".to_string(),
                    description: "Gains charges".to_string(),
                },
            ],
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_build_full_detail() {
        let id = ContentId::from("ganyu");
        let detail = CharacterDetail::build(&id, &record(), "/media/images/characters/ganyu.png");

        assert_eq!(detail.name, "Ganyu");
        assert_eq!(detail.weapon_label, "Weapon: Bow");
        assert_eq!(detail.rarity_label, "Rarity: 5");
        assert_eq!(
            detail.base_stats,
            vec![
                StatLine { label: "HP".to_string(), value: 763 },
                StatLine { label: "ATK".to_string(), value: 26 },
                StatLine { label: "DEF".to_string(), value: 49 },
            ]
        );
        assert_eq!(detail.stat_growth.as_deref(), Some("Crit Damage"));
        assert_eq!(detail.constellations[0].title, "C1: Dew-Drinker");
        assert_eq!(detail.constellations[1].index, 2);
        assert_eq!(
            detail.constellations[0].description_html,
            "<span>Frostflake</span> reduces RES"
        );
    }

    #[test]
    fn test_level_one_reads_index_one() {
        assert_eq!(
            stat_at_level(&[Some(0.0), Some(1000.0), Some(2000.0)], 1),
            Some(1000)
        );
    }

    #[test]
    fn test_missing_or_zero_stats_are_omitted() {
        let mut r = record();
        r.hp = Vec::new();
        r.atk = vec![Some(0.0)];
        r.def = vec![Some(0.0), None];

        let detail = CharacterDetail::build(&ContentId::from("x"), &r, "");
        assert!(detail.base_stats.is_empty());
    }

    #[test]
    fn test_stat_at_level_rejects_non_finite() {
        assert_eq!(stat_at_level(&[Some(0.0), Some(f64::NAN)], 1), None);
        assert_eq!(stat_at_level(&[Some(0.0), Some(f64::INFINITY)], 1), None);
    }

    #[test]
    fn test_stat_at_level_skips_null_entry() {
        assert_eq!(stat_at_level(&[Some(0.0), None, Some(5.0)], 1), None);
        assert_eq!(stat_at_level(&[Some(0.0), None, Some(5.0)], 2), Some(5));
    }

    #[test]
    fn test_humanize_stat_name() {
        assert_eq!(humanize_stat_name("critRate"), "Crit Rate");
        assert_eq!(humanize_stat_name("elementalMastery"), "Elemental Mastery");
        assert_eq!(humanize_stat_name("ATK"), "A T K");
        assert_eq!(humanize_stat_name("hp"), "Hp");
        assert_eq!(humanize_stat_name(""), "");
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut r = record();
        r.stat_grow = Some(String::new());
        r.constellations.clear();

        let detail = CharacterDetail::build(&ContentId::from("x"), &r, "");
        assert!(detail.stat_growth.is_none());
        assert!(detail.constellations.is_empty());
    }
}
