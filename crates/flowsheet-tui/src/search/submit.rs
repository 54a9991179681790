//! Turning a highlighted row into a flowsheet submission, and deciding where
//! it goes.

use flowsheet_proto::records::{AlbumLike, FreeformAlbum, Submission, SubmissionAlbum};
use ratatui::crossterm::event::KeyModifiers;

use super::aggregate::AggregatedList;
use super::query::SearchQuery;

/// Build the submission for display row `index` of `list`.
///
/// Rows `1..=len` resolve to the candidate's album.  Row 0, and any index past
/// the end, produce a freeform album from the typed fields.
pub fn build_submission(list: &AggregatedList, index: usize, query: &SearchQuery) -> Submission {
    let album = match list.at(index) {
        Some(candidate) => SubmissionAlbum::Existing(candidate.record.album_ref()),
        None => SubmissionAlbum::Freeform(FreeformAlbum::new(
            query.album.trim(),
            query.artist.trim(),
            query.label.trim(),
        )),
    };
    Submission {
        track_title: query.song.trim().to_string(),
        request: query.request,
        album,
    }
}

/// Submission for a known album picked outside the flowsheet search
/// (catalog, rotation and bin views).  The track title is filled in later.
pub fn submission_for(record: &dyn AlbumLike) -> Submission {
    Submission {
        track_title: String::new(),
        request: false,
        album: SubmissionAlbum::Existing(record.album_ref()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Post to the flowsheet now.
    Immediate,
    /// Hold in the local queue.
    Queue,
}

/// Modifier that sends a confirmation straight to the flowsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKey {
    Shift,
    Ctrl,
}

impl RouteKey {
    fn modifier(self) -> KeyModifiers {
        match self {
            Self::Shift => KeyModifiers::SHIFT,
            Self::Ctrl => KeyModifiers::CONTROL,
        }
    }
}

pub fn route_for(modifiers: KeyModifiers, key: RouteKey) -> Route {
    if modifiers.contains(key.modifier()) {
        Route::Immediate
    } else {
        Route::Queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::aggregate::aggregate;
    use flowsheet_proto::records::{ArtistRef, CatalogAlbum, NEW_RELEASE};

    fn catalog() -> Vec<CatalogAlbum> {
        vec![
            CatalogAlbum {
                id: 7,
                title: "Kind of Blue".into(),
                artist: ArtistRef::new("Miles Davis"),
                label: "Columbia".into(),
                format: "LP".into(),
                rotation: None,
                rotation_id: None,
            },
            CatalogAlbum {
                id: 8,
                title: "Kind of Pink".into(),
                artist: ArtistRef::new("Miles Away"),
                label: "Nowhere".into(),
                format: "CD".into(),
                rotation: None,
                rotation_id: None,
            },
        ]
    }

    fn miles_kind() -> SearchQuery {
        SearchQuery {
            song: "So What".into(),
            artist: "Miles".into(),
            album: "Kind".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_index_one_is_first_candidate() {
        let q = miles_kind();
        let list = aggregate(&[], &[], &catalog()[..1], &q, 4);
        let sub = build_submission(&list, 1, &q);
        match &sub.album {
            SubmissionAlbum::Existing(a) => {
                assert_eq!(a.album_id, 7);
                assert_eq!(a.title, "Kind of Blue");
                assert_eq!(a.artist.name, "Miles Davis");
            }
            other => panic!("expected existing album, got {other:?}"),
        }
        assert_eq!(sub.track_title, "So What");
    }

    #[test]
    fn test_each_row_maps_to_previous_element() {
        let q = miles_kind();
        let list = aggregate(&[], &[], &catalog(), &q, 4);
        for i in 1..=list.len() {
            let sub = build_submission(&list, i, &q);
            let SubmissionAlbum::Existing(a) = sub.album else {
                panic!("row {i} should be existing");
            };
            assert_eq!(a.album_id, list.items()[i - 1].record.album_id());
        }
    }

    #[test]
    fn test_empty_query_row_zero_is_freeform() {
        let q = SearchQuery::default();
        let list = aggregate(&[], &[], &catalog(), &q, 4);
        assert!(list.is_empty());
        let sub = build_submission(&list, 0, &q);
        match sub.album {
            SubmissionAlbum::Freeform(f) => {
                assert_eq!(f.release, NEW_RELEASE);
                assert!(f.title.is_empty());
            }
            other => panic!("expected freeform, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_falls_back_to_freeform() {
        let q = SearchQuery {
            request: true,
            ..miles_kind()
        };
        let list = aggregate(&[], &[], &catalog(), &q, 4);
        let sub = build_submission(&list, 99, &q);
        assert!(sub.album.is_freeform());
        assert_eq!(sub.album.artist_name(), "Miles");
        assert_eq!(sub.album.title(), "Kind");
        assert!(sub.request);
    }

    #[test]
    fn test_routing_modifiers() {
        assert_eq!(route_for(KeyModifiers::SHIFT, RouteKey::Shift), Route::Immediate);
        assert_eq!(route_for(KeyModifiers::NONE, RouteKey::Shift), Route::Queue);
        assert_eq!(route_for(KeyModifiers::CONTROL, RouteKey::Shift), Route::Queue);
        assert_eq!(
            route_for(KeyModifiers::CONTROL | KeyModifiers::SHIFT, RouteKey::Ctrl),
            Route::Immediate
        );
        assert_eq!(route_for(KeyModifiers::SHIFT, RouteKey::Ctrl), Route::Queue);
    }

    #[test]
    fn test_submission_for_known_album() {
        let sub = submission_for(&catalog()[0]);
        assert!(!sub.album.is_freeform());
        assert!(sub.track_title.is_empty());
    }
}
