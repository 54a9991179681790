use serde::{Deserialize, Serialize};

/// Album identifier shared by catalog, rotation and bin rows.
pub type AlbumId = i64;

/// Release id the backend reads as "not in the library yet".
pub const NEW_RELEASE: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ArtistRef {
    pub name: String,
}

impl ArtistRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Rotation bins, heaviest first.  Single-letter codes on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RotationBin {
    #[serde(rename = "H")]
    Heavy,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Light,
    #[serde(rename = "S")]
    Single,
}

impl RotationBin {
    /// Short badge for list rows.
    pub fn code(self) -> &'static str {
        match self {
            Self::Heavy => "H",
            Self::Medium => "M",
            Self::Light => "L",
            Self::Single => "S",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Heavy => "heavy",
            Self::Medium => "medium",
            Self::Light => "light",
            Self::Single => "single",
        }
    }
}

/// A row returned by the remote catalog search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogAlbum {
    pub id: AlbumId,
    pub title: String,
    pub artist: ArtistRef,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub format: String,
    /// Filled in client-side from the rotation list.
    #[serde(default)]
    pub rotation: Option<RotationBin>,
    #[serde(default)]
    pub rotation_id: Option<i64>,
}

/// An album currently in rotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RotationEntry {
    /// Rotation row id (not the album id).
    pub id: i64,
    pub album_id: AlbumId,
    pub title: String,
    pub artist: ArtistRef,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub format: String,
    pub bin: RotationBin,
}

/// An album saved to a DJ's mail bin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BinEntry {
    pub album_id: AlbumId,
    pub title: String,
    pub artist: ArtistRef,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub format: String,
    /// Filled in client-side when the album is also in rotation.
    #[serde(default)]
    pub rotation: Option<RotationBin>,
    #[serde(default)]
    pub rotation_id: Option<i64>,
}

/// Read-only view shared by every album-shaped row.
pub trait AlbumLike {
    fn album_id(&self) -> AlbumId;
    fn title(&self) -> &str;
    fn artist_name(&self) -> &str;
    fn label(&self) -> &str;
    fn format(&self) -> &str;

    fn rotation(&self) -> Option<RotationBin> {
        None
    }

    fn rotation_id(&self) -> Option<i64> {
        None
    }

    fn album_ref(&self) -> AlbumRef {
        AlbumRef {
            album_id: self.album_id(),
            title: self.title().to_string(),
            artist: ArtistRef::new(self.artist_name()),
            label: self.label().to_string(),
            rotation_id: self.rotation_id(),
        }
    }
}

impl AlbumLike for CatalogAlbum {
    fn album_id(&self) -> AlbumId {
        self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn artist_name(&self) -> &str {
        &self.artist.name
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn format(&self) -> &str {
        &self.format
    }
    fn rotation(&self) -> Option<RotationBin> {
        self.rotation
    }
    fn rotation_id(&self) -> Option<i64> {
        self.rotation_id
    }
}

impl AlbumLike for RotationEntry {
    fn album_id(&self) -> AlbumId {
        self.album_id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn artist_name(&self) -> &str {
        &self.artist.name
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn format(&self) -> &str {
        &self.format
    }
    fn rotation(&self) -> Option<RotationBin> {
        Some(self.bin)
    }
    fn rotation_id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl AlbumLike for BinEntry {
    fn album_id(&self) -> AlbumId {
        self.album_id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn artist_name(&self) -> &str {
        &self.artist.name
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn format(&self) -> &str {
        &self.format
    }
    fn rotation(&self) -> Option<RotationBin> {
        self.rotation
    }
    fn rotation_id(&self) -> Option<i64> {
        self.rotation_id
    }
}

/// Any of the three album sources, treated polymorphically by search.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateRecord {
    Bin(BinEntry),
    Rotation(RotationEntry),
    Catalog(CatalogAlbum),
}

impl CandidateRecord {
    fn inner(&self) -> &dyn AlbumLike {
        match self {
            Self::Bin(b) => b,
            Self::Rotation(r) => r,
            Self::Catalog(c) => c,
        }
    }
}

impl AlbumLike for CandidateRecord {
    fn album_id(&self) -> AlbumId {
        self.inner().album_id()
    }
    fn title(&self) -> &str {
        self.inner().title()
    }
    fn artist_name(&self) -> &str {
        self.inner().artist_name()
    }
    fn label(&self) -> &str {
        self.inner().label()
    }
    fn format(&self) -> &str {
        self.inner().format()
    }
    fn rotation(&self) -> Option<RotationBin> {
        self.inner().rotation()
    }
    fn rotation_id(&self) -> Option<i64> {
        self.inner().rotation_id()
    }
}

/// Reference to an album that already exists in the library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlbumRef {
    pub album_id: AlbumId,
    pub title: String,
    pub artist: ArtistRef,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_id: Option<i64>,
}

/// An album typed in by hand that matched nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreeformAlbum {
    pub release: i64,
    pub title: String,
    pub artist: ArtistRef,
    pub label: String,
}

impl FreeformAlbum {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            release: NEW_RELEASE,
            title: title.into(),
            artist: ArtistRef::new(artist),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SubmissionAlbum {
    Existing(AlbumRef),
    Freeform(FreeformAlbum),
}

impl SubmissionAlbum {
    pub fn title(&self) -> &str {
        match self {
            Self::Existing(a) => &a.title,
            Self::Freeform(f) => &f.title,
        }
    }

    pub fn artist_name(&self) -> &str {
        match self {
            Self::Existing(a) => &a.artist.name,
            Self::Freeform(f) => &f.artist.name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Existing(a) => &a.label,
            Self::Freeform(f) => &f.label,
        }
    }

    pub fn is_freeform(&self) -> bool {
        matches!(self, Self::Freeform(_))
    }
}

/// One normalized flowsheet submission, ready for the entries list or the
/// queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub track_title: String,
    #[serde(default)]
    pub request: bool,
    pub album: SubmissionAlbum,
}

impl Submission {
    /// "Artist – Track (Album)" for toasts and log lines.
    pub fn display(&self) -> String {
        let artist = self.album.artist_name();
        let track = if self.track_title.is_empty() {
            "?"
        } else {
            self.track_title.as_str()
        };
        if self.album.title().is_empty() {
            format!("{} \u{2013} {}", artist, track)
        } else {
            format!("{} \u{2013} {} ({})", artist, track, self.album.title())
        }
    }
}

/// A play logged on the flowsheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowsheetEntry {
    pub id: i64,
    #[serde(default)]
    pub track_title: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub album_title: String,
    #[serde(default)]
    pub record_label: String,
    #[serde(default)]
    pub request_flag: bool,
    #[serde(default)]
    pub rotation: Option<RotationBin>,
    pub play_time: chrono::DateTime<chrono::Utc>,
}

/// Body of `POST /djs/bin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinAddRequest {
    pub dj_id: i64,
    pub album_id: AlbumId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freeform_wire_shape() {
        let album = SubmissionAlbum::Freeform(FreeformAlbum::new("Kind of Blue", "Miles", "Columbia"));
        let json = serde_json::to_value(&album).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "release": -1,
                "title": "Kind of Blue",
                "artist": { "name": "Miles" },
                "label": "Columbia"
            })
        );
    }

    #[test]
    fn test_untagged_album_picks_existing() {
        let json = serde_json::json!({
            "album_id": 7,
            "title": "Kind of Blue",
            "artist": { "name": "Miles Davis" },
            "label": "Columbia"
        });
        let album: SubmissionAlbum = serde_json::from_value(json).unwrap();
        assert!(!album.is_freeform());
        assert_eq!(album.artist_name(), "Miles Davis");
    }

    #[test]
    fn test_rotation_bin_codes() {
        let bin: RotationBin = serde_json::from_str("\"H\"").unwrap();
        assert_eq!(bin, RotationBin::Heavy);
        assert_eq!(bin.code(), "H");
        assert_eq!(serde_json::to_string(&RotationBin::Single).unwrap(), "\"S\"");
    }

    #[test]
    fn test_candidate_record_delegates() {
        let rec = CandidateRecord::Rotation(RotationEntry {
            id: 3,
            album_id: 42,
            title: "Spirit of Eden".into(),
            artist: ArtistRef::new("Talk Talk"),
            label: "Parlophone".into(),
            format: "LP".into(),
            bin: RotationBin::Medium,
        });
        assert_eq!(rec.album_id(), 42);
        assert_eq!(rec.rotation(), Some(RotationBin::Medium));
        let r = rec.album_ref();
        assert_eq!(r.rotation_id, Some(3));
        assert_eq!(r.artist.name, "Talk Talk");
    }

    #[test]
    fn test_submission_display() {
        let s = Submission {
            track_title: "So What".into(),
            request: false,
            album: SubmissionAlbum::Freeform(FreeformAlbum::new("Kind of Blue", "Miles Davis", "")),
        };
        assert_eq!(s.display(), "Miles Davis \u{2013} So What (Kind of Blue)");
    }
}
