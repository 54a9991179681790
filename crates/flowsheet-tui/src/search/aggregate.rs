//! Result aggregation — bin, rotation and catalog hits as one tagged list.
//!
//! Display row 0 is the synthetic "new entry" row; display row `i >= 1`
//! is `items[i - 1]`.  Lookup goes through [`AggregatedList::at`] so the
//! renderer and the submission code can never disagree on offsets.

use std::collections::HashSet;

use flowsheet_proto::records::{
    AlbumLike, BinEntry, CandidateRecord, CatalogAlbum, RotationBin, RotationEntry,
};

use super::matching::local_matches;
use super::query::SearchQuery;

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Favorite,
    Rotation,
    Catalog,
}

impl Source {
    pub fn badge(self) -> &'static str {
        match self {
            Self::Favorite => "bin",
            Self::Rotation => "rot",
            Self::Catalog => "lib",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub source: Source,
    pub record: CandidateRecord,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedList {
    items: Vec<Candidate>,
    has_text: bool,
}

impl AggregatedList {
    /// Number of real candidates (the new-entry row is not counted).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any search field had text when this list was built.  Drives
    /// both the new-entry row and the visibility of the result panel.
    pub fn has_text(&self) -> bool {
        self.has_text
    }

    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    /// Candidate behind display row `index`.  Row 0 and rows past the end
    /// have none.
    pub fn at(&self, index: usize) -> Option<&Candidate> {
        index.checked_sub(1).and_then(|i| self.items.get(i))
    }

    pub fn count(&self, source: Source) -> usize {
        self.items.iter().filter(|c| c.source == source).count()
    }
}

fn rotation_status(album_id: i64, rotation: &[RotationEntry]) -> (Option<RotationBin>, Option<i64>) {
    rotation
        .iter()
        .find(|r| r.album_id == album_id)
        .map_or((None, None), |r| (Some(r.bin), Some(r.id)))
}

/// Copy rotation status onto catalog rows whose album is in rotation.
pub fn overlay_rotation(catalog: &mut [CatalogAlbum], rotation: &[RotationEntry]) {
    for row in catalog.iter_mut() {
        (row.rotation, row.rotation_id) = rotation_status(row.id, rotation);
    }
}

/// Same for bin rows, so a binned album that is also in rotation is logged
/// as a rotation play.
pub fn overlay_bin_rotation(bin: &mut [BinEntry], rotation: &[RotationEntry]) {
    for row in bin.iter_mut() {
        (row.rotation, row.rotation_id) = rotation_status(row.album_id, rotation);
    }
}

/// Merge the three sources in favourites → rotation → catalog order.
///
/// Bin and rotation are matched locally against the album fields of
/// `query`; catalog rows arrive already filtered by the backend and only get
/// the rotation overlay, as do bin rows.  An album that shows up in more
/// than one source is kept once, under the first source that produced it.
pub fn aggregate(
    favorites: &[BinEntry],
    rotation: &[RotationEntry],
    catalog: &[CatalogAlbum],
    query: &SearchQuery,
    min_local_len: usize,
) -> AggregatedList {
    if !query.has_text() {
        return AggregatedList::default();
    }

    let mut seen = HashSet::new();
    let mut items = Vec::new();

    let mut local_favs: Vec<BinEntry> = local_matches(favorites, query, min_local_len)
        .into_iter()
        .cloned()
        .collect();
    overlay_bin_rotation(&mut local_favs, rotation);
    for fav in local_favs {
        if seen.insert(fav.album_id()) {
            items.push(Candidate {
                source: Source::Favorite,
                record: CandidateRecord::Bin(fav),
            });
        }
    }

    for rot in local_matches(rotation, query, min_local_len) {
        if seen.insert(rot.album_id()) {
            items.push(Candidate {
                source: Source::Rotation,
                record: CandidateRecord::Rotation(rot.clone()),
            });
        }
    }

    let mut remote = catalog.to_vec();
    overlay_rotation(&mut remote, rotation);
    for row in remote {
        if seen.insert(row.album_id()) {
            items.push(Candidate {
                source: Source::Catalog,
                record: CandidateRecord::Catalog(row),
            });
        }
    }

    AggregatedList {
        items,
        has_text: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsheet_proto::records::ArtistRef;

    fn bin(id: i64, artist: &str, title: &str) -> BinEntry {
        BinEntry {
            album_id: id,
            title: title.into(),
            artist: ArtistRef::new(artist),
            label: String::new(),
            format: String::new(),
            rotation: None,
            rotation_id: None,
        }
    }

    fn rot(id: i64, album_id: i64, artist: &str, title: &str) -> RotationEntry {
        RotationEntry {
            id,
            album_id,
            title: title.into(),
            artist: ArtistRef::new(artist),
            label: String::new(),
            format: String::new(),
            bin: RotationBin::Light,
        }
    }

    pub(crate) fn kind_of_blue() -> CatalogAlbum {
        CatalogAlbum {
            id: 7,
            title: "Kind of Blue".into(),
            artist: ArtistRef::new("Miles Davis"),
            label: "Columbia".into(),
            format: "LP".into(),
            rotation: None,
            rotation_id: None,
        }
    }

    fn miles_kind() -> SearchQuery {
        SearchQuery {
            artist: "Miles".into(),
            album: "Kind".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_query_yields_nothing() {
        let list = aggregate(
            &[bin(1, "Miles Davis", "Kind of Blue")],
            &[],
            &[kind_of_blue()],
            &SearchQuery::default(),
            4,
        );
        assert!(list.is_empty());
        assert!(!list.has_text());
        assert!(list.at(0).is_none());
    }

    #[test]
    fn test_catalog_only_scenario() {
        let catalog = vec![kind_of_blue()];
        let list = aggregate(&[], &[], &catalog, &miles_kind(), 4);
        assert_eq!(list.len(), 1);
        assert!(list.has_text());
        assert!(list.at(0).is_none());
        let c = list.at(1).unwrap();
        assert_eq!(c.source, Source::Catalog);
        assert_eq!(c.record.album_id(), 7);
        assert!(list.at(2).is_none());
    }

    #[test]
    fn test_order_is_favorites_rotation_catalog() {
        let favorites = vec![bin(1, "Miles Davis", "Kind of Blue (mono)")];
        let rotation = vec![rot(10, 2, "Miles Davis", "Kind of Blue Sessions")];
        let catalog = vec![kind_of_blue()];
        let list = aggregate(&favorites, &rotation, &catalog, &miles_kind(), 4);
        let sources: Vec<Source> = list.items().iter().map(|c| c.source).collect();
        assert_eq!(
            sources,
            vec![Source::Favorite, Source::Rotation, Source::Catalog]
        );
    }

    #[test]
    fn test_short_query_keeps_catalog_rows_only() {
        let favorites = vec![bin(1, "ab", "c")];
        let rotation = vec![rot(10, 2, "ab", "c")];
        let catalog = vec![kind_of_blue()];
        let q = SearchQuery {
            artist: "ab".into(),
            album: "c".into(),
            ..Default::default()
        };
        let list = aggregate(&favorites, &rotation, &catalog, &q, 4);
        assert_eq!(list.count(Source::Favorite), 0);
        assert_eq!(list.count(Source::Rotation), 0);
        assert_eq!(list.count(Source::Catalog), 1);
    }

    #[test]
    fn test_duplicates_are_kept_once() {
        let favorites = vec![bin(7, "Miles Davis", "Kind of Blue")];
        let rotation = vec![rot(10, 7, "Miles Davis", "Kind of Blue")];
        let catalog = vec![kind_of_blue()];
        let list = aggregate(&favorites, &rotation, &catalog, &miles_kind(), 4);
        assert_eq!(list.len(), 1);
        assert_eq!(list.items()[0].source, Source::Favorite);
    }

    #[test]
    fn test_binned_album_in_rotation_keeps_rotation_id() {
        let favorites = vec![bin(40, "Miles Davis", "Bitches Brew")];
        let rotation = vec![RotationEntry {
            bin: RotationBin::Heavy,
            ..rot(3, 40, "Miles Davis", "Bitches Brew")
        }];
        let q = SearchQuery {
            artist: "Miles Davis".into(),
            ..Default::default()
        };
        let list = aggregate(&favorites, &rotation, &[], &q, 4);
        assert_eq!(list.len(), 1);
        let c = list.at(1).unwrap();
        assert_eq!(c.source, Source::Favorite);
        assert_eq!(c.record.rotation(), Some(RotationBin::Heavy));
        assert_eq!(c.record.album_ref().rotation_id, Some(3));
    }

    #[test]
    fn test_catalog_rows_get_rotation_overlay() {
        // rotation entry does not match the query text but shares the album id
        let rotation = vec![rot(10, 7, "Someone Else", "Other")];
        let list = aggregate(&[], &rotation, &[kind_of_blue()], &miles_kind(), 4);
        assert_eq!(list.len(), 1);
        let c = list.at(1).unwrap();
        assert_eq!(c.record.rotation(), Some(RotationBin::Light));
        assert_eq!(c.record.rotation_id(), Some(10));
    }

    #[test]
    fn test_overlay_clears_stale_rotation() {
        let mut rows = vec![CatalogAlbum {
            rotation: Some(RotationBin::Heavy),
            rotation_id: Some(3),
            ..kind_of_blue()
        }];
        overlay_rotation(&mut rows, &[]);
        assert!(rows[0].rotation.is_none());
        assert!(rows[0].rotation_id.is_none());
    }
}
