//! Term matching for locally held album lists (bin, rotation).

use flowsheet_proto::records::AlbumLike;

use super::query::SearchQuery;

/// Lowercased whitespace-separated terms of `text`.
pub fn query_terms(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Every term must appear in at least one of artist, title or label.
/// An empty term list matches everything.
pub fn record_matches<A: AlbumLike + ?Sized>(record: &A, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let artist = record.artist_name().to_lowercase();
    let title = record.title().to_lowercase();
    let label = record.label().to_lowercase();
    terms.iter().all(|term| {
        artist.contains(term.as_str()) || title.contains(term.as_str()) || label.contains(term.as_str())
    })
}

/// Records matching the album fields of `query`.
///
/// Queries whose album fields add up to fewer than `min_len` characters are
/// not searched at all and yield nothing, so a single keystroke never dumps
/// a whole list into the results.
pub fn local_matches<'a, A: AlbumLike>(
    records: &'a [A],
    query: &SearchQuery,
    min_len: usize,
) -> Vec<&'a A> {
    if query.album_text_len() < min_len {
        return Vec::new();
    }
    let terms = query_terms(&query.album_text());
    if terms.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| record_matches(*r, &terms))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsheet_proto::records::{ArtistRef, BinEntry};

    fn bin(id: i64, artist: &str, title: &str, label: &str) -> BinEntry {
        BinEntry {
            album_id: id,
            title: title.into(),
            artist: ArtistRef::new(artist),
            label: label.into(),
            format: "LP".into(),
            rotation: None,
            rotation_id: None,
        }
    }

    fn query(artist: &str, album: &str, label: &str) -> SearchQuery {
        SearchQuery {
            artist: artist.into(),
            album: album.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_terms_are_lowercased() {
        assert_eq!(query_terms("  Miles  KIND "), vec!["miles", "kind"]);
        assert!(query_terms("   ").is_empty());
    }

    #[test]
    fn test_conjunction_across_terms_disjunction_across_fields() {
        let r = bin(1, "Miles Davis", "Kind of Blue", "Columbia");
        // "miles" hits artist, "columbia" hits label
        assert!(record_matches(&r, &query_terms("miles columbia")));
        // "blue" hits title, "davis" hits artist
        assert!(record_matches(&r, &query_terms("Blue DAVIS")));
        // "impulse" hits nothing
        assert!(!record_matches(&r, &query_terms("miles impulse")));
    }

    #[test]
    fn test_term_must_fit_inside_one_field() {
        // a term spanning artist and title matches neither
        let r = bin(1, "Miles Davis", "Kind of Blue", "Columbia");
        assert!(!record_matches(&r, &["daviskind".to_string()]));
    }

    #[test]
    fn test_length_boundary() {
        let records = vec![bin(1, "abc", "c", "")];
        // 2 + 1 = 3 characters: not searched
        assert!(local_matches(&records, &query("ab", "c", ""), 4).is_empty());
        // 4 characters: searched
        assert_eq!(local_matches(&records, &query("abc", "c", ""), 4).len(), 1);
    }

    #[test]
    fn test_padded_short_query_is_not_searched() {
        let records = vec![bin(1, "abba", "Arrival", "Polar")];
        assert!(local_matches(&records, &query("a   ", "", ""), 4).is_empty());
    }

    #[test]
    fn test_song_field_is_ignored() {
        let records = vec![bin(1, "Talk Talk", "Spirit of Eden", "Parlophone")];
        let q = SearchQuery {
            song: "The Rainbow".into(),
            artist: "talk".into(),
            ..Default::default()
        };
        assert_eq!(local_matches(&records, &q, 4).len(), 1);
    }

    #[test]
    fn test_keeps_input_order() {
        let records = vec![
            bin(1, "Alice Coltrane", "Journey in Satchidananda", "Impulse!"),
            bin(2, "John Coltrane", "A Love Supreme", "Impulse!"),
            bin(3, "Pharoah Sanders", "Karma", "Impulse!"),
        ];
        let hits = local_matches(&records, &query("coltrane", "", "impulse"), 4);
        let ids: Vec<i64> = hits.iter().map(|r| r.album_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
