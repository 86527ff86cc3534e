//! Application-level configuration loading, including the word categories and
//! the avatar color palette.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "IMPOSTER_BACK_CONFIG_PATH";

/// Discussion countdown applied when a start request omits it.
pub const DEFAULT_ROUND_DURATION_SECS: u32 = 300;
/// Round count applied when a start request omits it.
pub const DEFAULT_TOTAL_ROUNDS: u32 = 3;

/// A named word list players draw their secret word from.
#[derive(Debug, Clone)]
pub struct WordCategory {
    /// Category name shown in the lobby setup screen.
    pub name: String,
    /// Candidate secret words.
    pub words: Vec<String>,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    categories: Vec<WordCategory>,
    avatar_palette: Vec<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in category and palette sets.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        categories = config.categories.len(),
                        "loaded word categories from config"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Option<&WordCategory> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// All category names in configured order.
    pub fn category_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|category| category.name.clone())
            .collect()
    }

    /// The avatar colors players are assigned from.
    pub fn avatar_palette(&self) -> &[String] {
        &self.avatar_palette
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            avatar_palette: default_avatar_palette(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    categories: Vec<RawCategory>,
    #[serde(default)]
    avatar_colors: Option<Vec<String>>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            categories: value
                .categories
                .into_iter()
                .filter(|category| !category.words.is_empty())
                .map(|category| WordCategory {
                    name: category.name,
                    words: category.words,
                })
                .collect(),
            avatar_palette: value
                .avatar_colors
                .filter(|palette| !palette.is_empty())
                .unwrap_or_else(default_avatar_palette),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single category inside the configuration file.
struct RawCategory {
    name: String,
    words: Vec<String>,
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in avatar palette shipped with the binary.
fn default_avatar_palette() -> Vec<String> {
    [
        "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

/// Built-in word categories shipped with the binary.
fn default_categories() -> Vec<WordCategory> {
    fn category(name: &str, words: &[&str]) -> WordCategory {
        WordCategory {
            name: name.to_owned(),
            words: words.iter().map(|word| (*word).to_owned()).collect(),
        }
    }

    vec![
        category(
            "animals",
            &[
                "giraffe", "penguin", "octopus", "kangaroo", "dolphin", "hedgehog", "flamingo",
                "chameleon", "walrus", "meerkat", "platypus", "armadillo",
            ],
        ),
        category(
            "food",
            &[
                "croissant", "sushi", "lasagna", "pancake", "burrito", "meatball", "waffle",
                "dumpling", "pretzel", "omelette", "popcorn", "cheesecake",
            ],
        ),
        category(
            "places",
            &[
                "lighthouse", "airport", "library", "volcano", "aquarium", "castle", "subway",
                "vineyard", "stadium", "glacier", "carnival", "harbor",
            ],
        ),
        category(
            "objects",
            &[
                "umbrella", "typewriter", "telescope", "hammock", "compass", "lantern",
                "accordion", "snow globe", "stapler", "kaleidoscope", "wheelbarrow", "anvil",
            ],
        ),
        category(
            "professions",
            &[
                "astronaut", "locksmith", "beekeeper", "magician", "firefighter", "archaeologist",
                "lifeguard", "conductor", "blacksmith", "cartographer", "florist", "referee",
            ],
        ),
    ]
}
