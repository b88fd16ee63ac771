use tracing::debug;

use crate::api::ChapterMetadata;

pub const CHAPTER_COUNT: u32 = 114;

/// Write-once holder for the ordered 114-chapter list. Sequence queries
/// never fail: before the list arrives they synthesize placeholders so the
/// transport keeps working on partial data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackCatalog {
    chapters: Vec<ChapterMetadata>,
}

impl TrackCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        !self.chapters.is_empty()
    }

    /// Installs the fetched list. The catalog is write-once; a second call
    /// is ignored.
    pub fn populate(&mut self, chapters: Vec<ChapterMetadata>) {
        if self.is_loaded() {
            debug!("catalog already populated, ignoring reload");
            return;
        }
        self.chapters = chapters;
    }

    pub fn chapters(&self) -> &[ChapterMetadata] {
        &self.chapters
    }

    /// Metadata for a 1-based chapter number; `None` when out of range or
    /// not yet loaded.
    pub fn chapter_at(&self, number: u32) -> Option<&ChapterMetadata> {
        if !(1..=CHAPTER_COUNT).contains(&number) {
            return None;
        }
        self.chapters.get(number as usize - 1)
    }

    /// Like `chapter_at`, but synthesizes a generic stand-in instead of
    /// failing when the catalog is empty.
    pub fn chapter_or_placeholder(&self, number: u32) -> ChapterMetadata {
        self.chapter_at(number)
            .cloned()
            .unwrap_or_else(|| placeholder(number))
    }

    /// Chapter following `number` in natural order, wrapping 114 -> 1.
    pub fn next(&self, number: u32) -> ChapterMetadata {
        let target = number.clamp(1, CHAPTER_COUNT) % CHAPTER_COUNT + 1;
        self.chapter_or_placeholder(target)
    }

    /// Chapter preceding `number` in natural order, wrapping 1 -> 114.
    pub fn previous(&self, number: u32) -> ChapterMetadata {
        let number = number.clamp(1, CHAPTER_COUNT);
        let target = if number == 1 { CHAPTER_COUNT } else { number - 1 };
        self.chapter_or_placeholder(target)
    }
}

/// Generic stand-in used when the catalog has not loaded yet.
fn placeholder(number: u32) -> ChapterMetadata {
    ChapterMetadata {
        number,
        name: format!("Surah {number}"),
        name_arabic: String::new(),
        translation: String::new(),
        total_ayah: 0,
        revelation_place: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(number: u32) -> ChapterMetadata {
        ChapterMetadata {
            number,
            name: format!("Chapter {number}"),
            name_arabic: String::new(),
            translation: String::new(),
            total_ayah: number,
            revelation_place: "Mecca".to_string(),
        }
    }

    fn loaded_catalog() -> TrackCatalog {
        let mut catalog = TrackCatalog::new();
        catalog.populate((1..=CHAPTER_COUNT).map(chapter).collect());
        catalog
    }

    #[test]
    fn next_and_previous_wrap_for_every_chapter() {
        let catalog = loaded_catalog();
        for n in 1..=CHAPTER_COUNT {
            assert_eq!(catalog.next(n).number, n % CHAPTER_COUNT + 1);
            let expected_prev = if n > 1 { n - 1 } else { CHAPTER_COUNT };
            assert_eq!(catalog.previous(n).number, expected_prev);
        }
    }

    #[test]
    fn unloaded_catalog_synthesizes_placeholders() {
        let catalog = TrackCatalog::new();
        let next = catalog.next(3);
        assert_eq!(next.number, 4);
        assert_eq!(next.name, "Surah 4");
        assert_eq!(catalog.previous(1).number, CHAPTER_COUNT);
    }

    #[test]
    fn chapter_at_bounds() {
        let catalog = loaded_catalog();
        assert!(catalog.chapter_at(0).is_none());
        assert!(catalog.chapter_at(115).is_none());
        assert_eq!(catalog.chapter_at(114).map(|c| c.number), Some(114));
        assert!(TrackCatalog::new().chapter_at(5).is_none());
    }

    #[test]
    fn populate_is_write_once() {
        let mut catalog = loaded_catalog();
        catalog.populate(vec![chapter(1)]);
        assert_eq!(catalog.chapters().len(), CHAPTER_COUNT as usize);
    }
}
