//! Track catalog: where the playlists of a game come from.
//!
//! The built-in per-genre tables are seed data, loaded once into a
//! [`StaticCatalog`] at process start and never mutated by game logic.

use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use anyhow::Context;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::{config::CatalogSource, domain::track::Track, game::rng::GameRng};

pub trait TrackCatalog {
    /// Returns a shuffled, non-empty playlist of at most `count` tracks.
    ///
    /// Unknown or empty genres fall back to the default genre, then to
    /// [`FALLBACK_TRACKS`].
    fn generate(&self, genre: &str, count: usize, rng: &mut GameRng) -> Vec<Track>;

    fn genres(&self) -> Vec<String>;
}

type SeedTable = &'static [(&'static str, &'static str, u32)];

/// Last resort when neither the requested nor the default genre has tracks
pub const FALLBACK_TRACKS: SeedTable = &[
    ("Bohemian Rhapsody", "Queen", 354),
    ("Billie Jean", "Michael Jackson", 294),
    ("Hotel California", "Eagles", 391),
    ("Imagine", "John Lennon", 183),
    ("Like a Rolling Stone", "Bob Dylan", 369),
];

const SEED_DATA: &[(&str, SeedTable)] = &[
    (
        "pop",
        &[
            ("Blinding Lights", "The Weeknd", 200),
            ("Shape of You", "Ed Sheeran", 233),
            ("Rolling in the Deep", "Adele", 228),
            ("Bad Romance", "Lady Gaga", 294),
            ("Halo", "Beyoncé", 261),
            ("Toxic", "Britney Spears", 198),
            ("Levitating", "Dua Lipa", 203),
            ("Uptown Funk", "Mark Ronson", 269),
            ("Call Me Maybe", "Carly Rae Jepsen", 193),
            ("Umbrella", "Rihanna", 275),
            ("Take On Me", "a-ha", 225),
            ("Like a Prayer", "Madonna", 339),
        ],
    ),
    (
        "rock",
        &[
            ("Smells Like Teen Spirit", "Nirvana", 301),
            ("Back in Black", "AC/DC", 255),
            ("Sweet Child o' Mine", "Guns N' Roses", 356),
            ("Seven Nation Army", "The White Stripes", 231),
            ("Paranoid", "Black Sabbath", 168),
            ("Creep", "Radiohead", 238),
            ("Highway to Hell", "AC/DC", 208),
            ("Ace of Spades", "Motörhead", 169),
            ("Livin' on a Prayer", "Bon Jovi", 249),
            ("Enter Sandman", "Metallica", 331),
            ("Wonderwall", "Oasis", 258),
            ("Black Hole Sun", "Soundgarden", 318),
        ],
    ),
    (
        "hip-hop",
        &[
            ("Lose Yourself", "Eminem", 326),
            ("Juicy", "The Notorious B.I.G.", 302),
            ("California Love", "2Pac", 284),
            ("HUMBLE.", "Kendrick Lamar", 177),
            ("Still D.R.E.", "Dr. Dre", 270),
            ("Gold Digger", "Kanye West", 207),
            ("In da Club", "50 Cent", 193),
            ("Hey Ya!", "OutKast", 235),
            ("Nuthin' but a 'G' Thang", "Dr. Dre", 238),
            ("C.R.E.A.M.", "Wu-Tang Clan", 252),
        ],
    ),
    (
        "electro",
        &[
            ("One More Time", "Daft Punk", 320),
            ("Around the World", "Daft Punk", 429),
            ("Levels", "Avicii", 202),
            ("Strobe", "deadmau5", 637),
            ("Titanium", "David Guetta", 245),
            ("Sandstorm", "Darude", 225),
            ("Born Slippy", "Underworld", 575),
            ("Windowlicker", "Aphex Twin", 367),
            ("Genesis", "Justice", 234),
            ("Midnight City", "M83", 243),
        ],
    ),
    (
        "chanson",
        &[
            ("La Vie en rose", "Édith Piaf", 187),
            ("Ne me quitte pas", "Jacques Brel", 221),
            ("La Bohème", "Charles Aznavour", 250),
            ("Comme d'habitude", "Claude François", 229),
            ("Les Champs-Élysées", "Joe Dassin", 148),
            ("Je t'aime... moi non plus", "Serge Gainsbourg", 264),
            ("Non, je ne regrette rien", "Édith Piaf", 140),
            ("Alors on danse", "Stromae", 206),
        ],
    ),
];

fn tracks_from(table: SeedTable) -> Vec<Track> {
    table
        .iter()
        .map(|(title, artist, secs)| Track::new(*title, *artist, *secs))
        .collect()
}

pub fn fallback_tracks() -> Vec<Track> {
    tracks_from(FALLBACK_TRACKS)
}

/// Playlist file found under a catalog directory
#[derive(Debug, Deserialize)]
struct PlaylistFile {
    genre: String,
    #[serde(default)]
    tracks: Vec<Track>,
}

/// In-memory catalog keyed by lowercase genre name
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    genres: BTreeMap<String, Vec<Track>>,
    default_genre: String,
}

impl StaticCatalog {
    /// Catalog holding only the built-in seed data
    pub fn builtin(default_genre: &str) -> Self {
        Self::from_tracks(
            SEED_DATA
                .iter()
                .map(|(genre, table)| (genre.to_string(), tracks_from(table))),
            default_genre,
        )
    }

    pub fn from_tracks(
        genres: impl IntoIterator<Item = (String, Vec<Track>)>,
        default_genre: &str,
    ) -> Self {
        let mut catalog = Self {
            genres: BTreeMap::new(),
            default_genre: default_genre.to_lowercase(),
        };
        for (genre, tracks) in genres {
            catalog.extend(&genre, tracks);
        }
        catalog
    }

    /// Built-in seed data plus every playlist file under the configured dirs
    pub fn load(source: &CatalogSource, default_genre: &str) -> Self {
        let mut catalog = Self::builtin(default_genre);
        for dir in &source.dirs {
            catalog.load_dir(dir, source.follow_symlinks);
        }
        catalog
    }

    /// Appends tracks to a genre, skipping ones it already holds
    pub fn extend(&mut self, genre: &str, tracks: Vec<Track>) {
        let entry = self.genres.entry(genre.to_lowercase()).or_default();
        let mut known = entry.iter().map(Track::id).collect::<HashSet<_>>();
        for track in tracks {
            if known.insert(track.id()) {
                entry.push(track);
            }
        }
    }

    /// Recursively reads `.toml` playlist files. Broken files are skipped.
    pub fn load_dir(&mut self, root: &Path, follow_symlinks: bool) {
        let root_str = root.to_string_lossy();
        let files = WalkDir::new(root)
            .follow_links(follow_symlinks)
            .into_iter()
            .filter_map(|e| match e {
                Ok(e) => Some(e),
                Err(err) => {
                    log::warn!("error while scanning catalog dir {root_str}, skipping an entry: {err}");
                    None
                }
            })
            .map(|e| e.path().to_path_buf())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"));

        for path in files {
            match read_playlist(&path) {
                Ok(playlist) => {
                    log::debug!(
                        "loaded {} tracks for genre '{}' from {}",
                        playlist.tracks.len(),
                        playlist.genre,
                        path.to_string_lossy()
                    );
                    self.extend(&playlist.genre, playlist.tracks);
                }
                Err(err) => log::warn!("skipping playlist file: {err:#}"),
            }
        }
    }

    fn tracks_for(&self, genre: &str) -> Option<&Vec<Track>> {
        self.genres
            .get(&genre.to_lowercase())
            .filter(|tracks| !tracks.is_empty())
    }
}

fn read_playlist(path: &Path) -> anyhow::Result<PlaylistFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.to_string_lossy()))?;
    toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.to_string_lossy()))
}

impl TrackCatalog for StaticCatalog {
    fn generate(&self, genre: &str, count: usize, rng: &mut GameRng) -> Vec<Track> {
        let mut tracks = match self.tracks_for(genre) {
            Some(tracks) => tracks.clone(),
            None => match self.tracks_for(&self.default_genre) {
                Some(tracks) => {
                    log::warn!(
                        "genre '{genre}' has no tracks, using default genre '{}'",
                        self.default_genre
                    );
                    tracks.clone()
                }
                None => {
                    log::warn!("no tracks for '{genre}' nor the default genre, using fallback list");
                    fallback_tracks()
                }
            },
        };

        rng.shuffle(&mut tracks);
        tracks.truncate(count.max(1));
        tracks
    }

    fn genres(&self) -> Vec<String> {
        self.genres
            .iter()
            .filter(|(_, tracks)| !tracks.is_empty())
            .map(|(genre, _)| genre.clone())
            .collect()
    }
}
