use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of `GET /api/surah.json`. The array index + 1 is the chapter
/// number; the payload itself carries no number field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SurahRecord {
    #[serde(default, alias = "surahName")]
    pub surah_name: String,
    #[serde(default, alias = "surahNameArabic")]
    pub surah_name_arabic: String,
    #[serde(default, alias = "surahNameArabicLong")]
    pub surah_name_arabic_long: String,
    #[serde(default, alias = "surahNameTranslation")]
    pub surah_name_translation: String,
    #[serde(default, alias = "revelationPlace")]
    pub revelation_place: String,
    #[serde(default, alias = "totalAyah")]
    pub total_ayah: u32,
}

/// Chapter metadata as the rest of the app sees it: identity is `number`
/// (1..=114), everything else is read-only attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterMetadata {
    pub number: u32,
    pub name: String,
    pub name_arabic: String,
    pub translation: String,
    pub total_ayah: u32,
    pub revelation_place: String,
}

impl ChapterMetadata {
    pub fn from_record(number: u32, record: SurahRecord) -> Self {
        Self {
            number,
            name: record.surah_name,
            name_arabic: record.surah_name_arabic,
            translation: record.surah_name_translation,
            total_ayah: record.total_ayah,
            revelation_place: record.revelation_place,
        }
    }

    /// "Meccan" / "Medinan" label used by the chapter rows.
    pub fn revelation_label(&self) -> &'static str {
        if self.revelation_place.eq_ignore_ascii_case("mecca") {
            "Meccan"
        } else {
            "Medinan"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReciterProfile {
    pub id: u32,
    pub name: String,
}

impl ReciterProfile {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Compiled-in reciter set used until (or instead of) the fetched list.
/// Id 1 is the default voice for new sessions.
pub fn default_reciters() -> Vec<ReciterProfile> {
    vec![
        ReciterProfile::new(1, "Mishary Rashid Al Afasy"),
        ReciterProfile::new(2, "Abu Bakr Al Shatri"),
        ReciterProfile::new(3, "Nasser Al Qatami"),
        ReciterProfile::new(4, "Yasser Al Dosari"),
        ReciterProfile::new(5, "Hani Ar Rifai"),
    ]
}

pub fn default_reciter() -> ReciterProfile {
    ReciterProfile::new(1, "Mishary Rashid Al Afasy")
}

/// Response of `GET /api/audio/{chapter}.json`: reciter id (string key) to
/// an untyped object carrying at least `url`. Kept as loose JSON because
/// the per-reciter objects are not versioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AudioResourceMap(pub BTreeMap<String, serde_json::Value>);

impl AudioResourceMap {
    /// URL for the requested reciter, falling back to the entry with the
    /// lowest numeric id when the requested pairing has no audio. The
    /// fallback order is pinned to numeric id so it is deterministic.
    pub fn resolve(&self, reciter_id: u32) -> Option<String> {
        if let Some(url) = self
            .0
            .get(&reciter_id.to_string())
            .and_then(|entry| json_pick_string(entry, &["url"]))
        {
            return Some(url);
        }

        let mut keyed: Vec<(u32, &serde_json::Value)> = self
            .0
            .iter()
            .filter_map(|(key, value)| key.parse::<u32>().ok().map(|id| (id, value)))
            .collect();
        keyed.sort_by_key(|(id, _)| *id);

        keyed
            .into_iter()
            .find_map(|(_, value)| json_pick_string(value, &["url"]))
    }
}

/// First non-empty string found under any of `keys` in a JSON object.
pub(crate) fn json_pick_string(value: &serde_json::Value, keys: &[&str]) -> Option<String> {
    let object = value.as_object()?;
    for key in keys {
        match object.get(*key) {
            Some(serde_json::Value::String(text)) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
            Some(serde_json::Value::Number(number)) => return Some(number.to_string()),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn audio_map(entries: &[(&str, &str)]) -> AudioResourceMap {
        let mut map = BTreeMap::new();
        for (key, url) in entries {
            map.insert(
                key.to_string(),
                json!({ "reciter": "someone", "url": url, "originalUrl": url }),
            );
        }
        AudioResourceMap(map)
    }

    #[test]
    fn resolve_prefers_requested_reciter() {
        let map = audio_map(&[("1", "https://a/1.mp3"), ("2", "https://a/2.mp3")]);
        assert_eq!(map.resolve(2).as_deref(), Some("https://a/2.mp3"));
    }

    #[test]
    fn resolve_falls_back_to_lowest_numeric_id() {
        let map = audio_map(&[("10", "https://a/10.mp3"), ("3", "https://a/3.mp3")]);
        assert_eq!(map.resolve(2).as_deref(), Some("https://a/3.mp3"));
    }

    #[test]
    fn resolve_skips_entries_without_url() {
        let mut map = audio_map(&[("2", "https://a/2.mp3")]);
        map.0.insert("1".to_string(), json!({ "reciter": "broken" }));
        assert_eq!(map.resolve(7).as_deref(), Some("https://a/2.mp3"));
    }

    #[test]
    fn resolve_empty_map_is_none() {
        assert_eq!(AudioResourceMap::default().resolve(1), None);
    }

    #[test]
    fn surah_record_decodes_api_field_names() {
        let record: SurahRecord = serde_json::from_value(json!({
            "surahName": "Ya-Sin",
            "surahNameArabic": "يس",
            "surahNameArabicLong": "سورة يس",
            "surahNameTranslation": "Ya Sin",
            "revelationPlace": "Mecca",
            "totalAyah": 83
        }))
        .unwrap();
        let chapter = ChapterMetadata::from_record(36, record);
        assert_eq!(chapter.number, 36);
        assert_eq!(chapter.name, "Ya-Sin");
        assert_eq!(chapter.total_ayah, 83);
        assert_eq!(chapter.revelation_label(), "Meccan");
    }
}
