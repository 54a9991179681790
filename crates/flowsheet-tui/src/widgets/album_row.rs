//! Column layout for album-shaped rows (artist · title · label · rotation).

use flowsheet_proto::records::AlbumLike;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::{C_LABEL, C_PRIMARY, C_SECONDARY, C_SOURCE_ROTATION};

/// Cut `s` to at most `width` terminal cells, ending in `…` when shortened.
pub fn fit(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// `fit`, then right-pad with spaces to exactly `width` cells.
pub fn pad(s: &str, width: usize) -> String {
    let mut out = fit(s, width);
    let w = out.width();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(w)));
    out
}

/// Spans for one album row, `width` cells wide.
pub fn album_spans(record: &dyn AlbumLike, width: usize, highlighted: bool) -> Vec<Span<'static>> {
    let rotation = record.rotation();
    let rot_w = if rotation.is_some() { 3 } else { 0 };
    let avail = width.saturating_sub(rot_w);
    let artist_w = avail * 3 / 10;
    let title_w = avail * 4 / 10;
    let label_w = avail.saturating_sub(artist_w + title_w);

    let artist_style = if highlighted {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_PRIMARY)
    };

    let mut spans = vec![
        Span::styled(pad(record.artist_name(), artist_w), artist_style),
        Span::styled(pad(record.title(), title_w), Style::default().fg(C_SECONDARY)),
        Span::styled(pad(record.label(), label_w), Style::default().fg(C_LABEL)),
    ];
    if let Some(bin) = rotation {
        spans.push(Span::styled(
            format!(" {} ", bin.code()),
            Style::default()
                .fg(C_SOURCE_ROTATION)
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsheet_proto::records::{ArtistRef, CatalogAlbum, RotationBin};

    #[test]
    fn test_fit_ascii() {
        assert_eq!(fit("Kind of Blue", 20), "Kind of Blue");
        assert_eq!(fit("Kind of Blue", 6), "Kind …");
        assert_eq!(fit("Kind of Blue", 0), "");
    }

    #[test]
    fn test_fit_wide_chars() {
        assert_eq!(fit("日本語", 4), "日…");
        assert_eq!(pad("日本語", 4).width(), 4);
    }

    #[test]
    fn test_row_fills_width() {
        let album = CatalogAlbum {
            id: 1,
            title: "Kind of Blue".into(),
            artist: ArtistRef::new("Miles Davis"),
            label: "Columbia".into(),
            format: "LP".into(),
            rotation: Some(RotationBin::Heavy),
            rotation_id: Some(4),
        };
        let spans = album_spans(&album, 40, false);
        let total: usize = spans.iter().map(|s| s.content.width()).sum();
        assert_eq!(total, 40);
        assert_eq!(spans.last().map(|s| s.content.trim()), Some("H"));
    }
}
