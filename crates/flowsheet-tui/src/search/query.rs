//! SearchQuery — the multi-field text typed into a flowsheet search.

/// One of the four text fields of a flowsheet search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Song,
    Artist,
    Album,
    Label,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [Self::Song, Self::Artist, Self::Album, Self::Label];

    pub fn label(self) -> &'static str {
        match self {
            Self::Song => "song",
            Self::Artist => "artist",
            Self::Album => "album",
            Self::Label => "label",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Song => Self::Artist,
            Self::Artist => Self::Album,
            Self::Album => Self::Label,
            Self::Label => Self::Song,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Song => Self::Label,
            Self::Artist => Self::Song,
            Self::Album => Self::Artist,
            Self::Label => Self::Album,
        }
    }
}

/// Fields that describe an album and therefore take part in matching.
/// The song title never matches an album row.
pub const ALBUM_FIELDS: [SearchField; 3] = [SearchField::Artist, SearchField::Album, SearchField::Label];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub song: String,
    pub artist: String,
    pub album: String,
    pub label: String,
    pub request: bool,
}

impl SearchQuery {
    pub fn get(&self, field: SearchField) -> &str {
        match field {
            SearchField::Song => &self.song,
            SearchField::Artist => &self.artist,
            SearchField::Album => &self.album,
            SearchField::Label => &self.label,
        }
    }

    pub fn set(&mut self, field: SearchField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SearchField::Song => self.song = value,
            SearchField::Artist => self.artist = value,
            SearchField::Album => self.album = value,
            SearchField::Label => self.label = value,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when any text field holds something other than whitespace.
    pub fn has_text(&self) -> bool {
        SearchField::ALL
            .iter()
            .any(|&f| !self.get(f).trim().is_empty())
    }

    /// Album fields joined by a space, for term splitting.
    pub fn album_text(&self) -> String {
        ALBUM_FIELDS
            .iter()
            .map(|&f| self.get(f))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Combined character count of the album fields, ignoring surrounding
    /// whitespace.
    pub fn album_text_len(&self) -> usize {
        ALBUM_FIELDS
            .iter()
            .map(|&f| self.get(f).trim().chars().count())
            .sum()
    }

    /// How many of `fields` hold non-blank text.
    pub fn filled(&self, fields: &[SearchField]) -> usize {
        fields
            .iter()
            .filter(|&&f| !self.get(f).trim().is_empty())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_reset() {
        let mut q = SearchQuery::default();
        assert!(!q.has_text());
        q.set(SearchField::Artist, "Miles");
        q.set(SearchField::Album, "Kind");
        q.request = true;
        assert_eq!(q.get(SearchField::Artist), "Miles");
        assert!(q.has_text());
        q.reset();
        assert_eq!(q, SearchQuery::default());
    }

    #[test]
    fn test_whitespace_is_not_text() {
        let mut q = SearchQuery::default();
        q.set(SearchField::Song, "   ");
        assert!(!q.has_text());
    }

    #[test]
    fn test_album_text_excludes_song() {
        let q = SearchQuery {
            song: "So What".into(),
            artist: "ab".into(),
            album: "c".into(),
            ..Default::default()
        };
        assert_eq!(q.album_text(), "ab c");
        assert_eq!(q.album_text_len(), 3);
        assert_eq!(q.filled(&ALBUM_FIELDS), 2);
    }

    #[test]
    fn test_padding_does_not_count_toward_length() {
        let q = SearchQuery {
            artist: "a   ".into(),
            label: "  ".into(),
            ..Default::default()
        };
        assert_eq!(q.album_text_len(), 1);
    }

    #[test]
    fn test_field_cycle() {
        let mut f = SearchField::Song;
        for _ in 0..4 {
            f = f.next();
        }
        assert_eq!(f, SearchField::Song);
        assert_eq!(SearchField::Song.prev(), SearchField::Label);
    }
}
