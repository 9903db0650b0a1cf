use serde::Deserialize;

/// One playable item as served by the catalog backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// Path resolved against the catalog base address at play time.
    pub src: String,
}

/// Grouping dimension over tracks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Facet {
    Artist,
    Album,
    Genre,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Artist, Facet::Album, Facet::Genre];

    /// The field of `track` this facet groups by.
    pub fn value_of<'a>(&self, track: &'a Track) -> &'a str {
        match self {
            Facet::Artist => &track.artist,
            Facet::Album => &track.album,
            Facet::Genre => &track.genre,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Facet::Artist => "Artists",
            Facet::Album => "Albums",
            Facet::Genre => "Genres",
        }
    }
}

/// A read request against the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogQuery {
    All,
    Artist(String),
    Album(String),
    Genre(String),
}

impl CatalogQuery {
    pub fn for_facet(facet: Facet, value: impl Into<String>) -> Self {
        match facet {
            Facet::Artist => Self::Artist(value.into()),
            Facet::Album => Self::Album(value.into()),
            Facet::Genre => Self::Genre(value.into()),
        }
    }

    /// Request path relative to the base address, with the facet value
    /// percent-encoded.
    pub fn path(&self) -> String {
        match self {
            Self::All => "/tracks".to_string(),
            Self::Artist(v) => format!("/artists/{}", urlencoding::encode(v)),
            Self::Album(v) => format!("/albums/{}", urlencoding::encode(v)),
            Self::Genre(v) => format!("/genres/{}", urlencoding::encode(v)),
        }
    }

    /// True for queries scoped to a facet value.
    pub fn is_scoped(&self) -> bool {
        !matches!(self, Self::All)
    }
}
