use std::collections::HashSet;

use crate::catalog::{Facet, Track};

/// Distinct artist, album and genre values of one track list, each in the
/// order first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub artists: Vec<String>,
    pub albums: Vec<String>,
    pub genres: Vec<String>,
}

impl Facets {
    pub fn from_tracks(tracks: &[Track]) -> Self {
        Self {
            artists: unique_values(tracks, Facet::Artist),
            albums: unique_values(tracks, Facet::Album),
            genres: unique_values(tracks, Facet::Genre),
        }
    }

    pub fn values(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Artist => &self.artists,
            Facet::Album => &self.albums,
            Facet::Genre => &self.genres,
        }
    }
}

fn unique_values(tracks: &[Track], facet: Facet) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    tracks
        .iter()
        .map(|t| facet.value_of(t))
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
