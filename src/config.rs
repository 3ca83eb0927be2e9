use xdg::BaseDirectories;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use ratatui::style::Color;

/// Page shown when neither a hash nor a persisted page id is available
pub const DEFAULT_PAGE_ID: &str = "home";

/// Number of sibling pages warmed after a page load
pub const DEFAULT_PREFETCH_AHEAD: usize = 2;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_file: String,
    /// Directory or http(s) base URL of the generated site
    pub site_root: String,
    pub default_page: String,
    /// Override for the durable state file (defaults to the XDG state dir)
    pub state_file: Option<String>,
    pub prefetch_ahead: usize,
    pub time_format: String,
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub heading_fg: Color,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            log_file: "/dev/null".to_string(),
            site_root: "docs".to_string(),
            default_page: DEFAULT_PAGE_ID.to_string(),
            state_file: None,
            prefetch_ahead: DEFAULT_PREFETCH_AHEAD,
            time_format: "%H:%M:%S".to_string(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            selection_fg: Color::Rgb(255, 165, 0),
            heading_fg: Color::Cyan,
        }
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", s)))
}

/// Parse a named color, `#rrggbb` / `#rgb` hex, or an `r,g,b` triple
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();

    let named = match s.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "white" => Some(Color::White),
        "orange" => Some(Color::Rgb(255, 165, 0)),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    if let Some(hex) = s.strip_prefix('#') {
        let expanded: String = match hex.len() {
            6 => hex.to_string(),
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
        return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }

    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if let [r, g, b] = parts.as_slice() {
        return Some(Color::Rgb(r.parse().ok()?, g.parse().ok()?, b.parse().ok()?));
    }

    None
}

impl Config {
    /// True when the site root points at a web server rather than a directory
    pub fn site_is_remote(&self) -> bool {
        self.site_root.starts_with("http://") || self.site_root.starts_with("https://")
    }

    /// Location of the durable key-value store
    pub fn state_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.state_file {
            return Some(PathBuf::from(path));
        }
        let xdg_dirs = BaseDirectories::with_prefix(env!("CARGO_PKG_NAME"));
        Some(xdg_dirs.get_state_home()?.join("state.json"))
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    let pgm = env!("CARGO_PKG_NAME");
    let xdg_dirs = BaseDirectories::with_prefix(pgm);
    let config_home = xdg_dirs.get_config_home()?;
    Some(config_home.join("config.toml"))
}

pub fn read() -> Config {
    let config_path = match get_config_path() {
        Some(path) => path,
        None => return Config::default(),
    };

    if !config_path.exists() {
        return Config::default();
    }

    let content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };

    toml::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed config {}: {}", config_path.display(), e);
        Config::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_named() {
        assert_eq!(parse_color("red"), Some(Color::Red));
        assert_eq!(parse_color("ORANGE"), Some(Color::Rgb(255, 165, 0)));
        assert_eq!(parse_color(" Cyan "), Some(Color::Cyan));
    }

    #[test]
    fn test_parse_color_hex() {
        assert_eq!(parse_color("#FF6600"), Some(Color::Rgb(255, 102, 0)));
        assert_eq!(parse_color("#f60"), Some(Color::Rgb(255, 102, 0)));
        assert_eq!(parse_color("#GGGGGG"), None);
        assert_eq!(parse_color("#12345"), None);
    }

    #[test]
    fn test_parse_color_rgb_tuple() {
        assert_eq!(parse_color("255, 102, 0"), Some(Color::Rgb(255, 102, 0)));
        assert_eq!(parse_color("256,0,0"), None);
        assert_eq!(parse_color("1,2"), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.default_page, "home");
        assert_eq!(config.prefetch_ahead, 2);
        assert!(!config.site_is_remote());
    }

    #[test]
    fn test_config_from_partial_toml() {
        let toml_str = r##"
site_root = "https://stats.example.org/dash"
prefetch_ahead = 4

[theme]
selection_fg = "#00FFFF"
        "##;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.site_is_remote());
        assert_eq!(config.prefetch_ahead, 4);
        assert_eq!(config.default_page, "home");
        assert_eq!(config.theme.selection_fg, Color::Rgb(0, 255, 255));
        assert_eq!(config.theme.heading_fg, Color::Cyan);
    }

    #[test]
    fn test_state_path_override() {
        let config = Config {
            state_file: Some("/tmp/mlbdash-state.json".to_string()),
            ..Config::default()
        };
        assert_eq!(config.state_path(), Some(PathBuf::from("/tmp/mlbdash-state.json")));
    }
}
