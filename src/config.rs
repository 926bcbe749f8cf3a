use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::document::LanguageOrdering;
use crate::lookup::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use crate::ui::style::background_is_light;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Persistent defaults, from flag files or the command line.
///
/// Every field is optional so that a later source only overrides what it
/// actually sets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    /// Languages shown first, in this order
    pub languages: Option<Vec<String>>,
    pub show_unlisted: Option<bool>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub theme: Option<ThemeMode>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets; values set in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            languages: other.languages.clone().or_else(|| self.languages.clone()),
            show_unlisted: other.show_unlisted.or(self.show_unlisted),
            endpoint: other.endpoint.clone().or_else(|| self.endpoint.clone()),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            theme: other.theme.or(self.theme),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    pub fn ordering(&self) -> LanguageOrdering {
        LanguageOrdering::new(
            self.languages.clone().unwrap_or_default(),
            self.show_unlisted.unwrap_or(true),
        )
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: self
                .timeout_secs
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
        }
    }

    /// Resolve the theme against the terminal's `COLORFGBG` value.
    pub fn light_background(&self, colorfgbg: Option<&str>) -> bool {
        match self.theme.unwrap_or(ThemeMode::Auto) {
            ThemeMode::Light => true,
            ThemeMode::Dark => false,
            ThemeMode::Auto => background_is_light(colorfgbg),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("lexview").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("lexview")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("lexview").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("lexview")
                .join("config");
        }
    }

    PathBuf::from(".lexviewrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".lexviewrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(split_line)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# lexview defaults (saved with --save)".to_string());
    if let Some(languages) = &flags.languages {
        lines.push(format!("--languages \"{}\"", languages.join(",")));
    }
    match flags.show_unlisted {
        Some(true) => lines.push("--show-unlisted".to_string()),
        Some(false) => lines.push("--hide-unlisted".to_string()),
        None => {}
    }
    if let Some(endpoint) = &flags.endpoint {
        lines.push(format!("--endpoint {endpoint}"));
    }
    if let Some(secs) = flags.timeout_secs {
        lines.push(format!("--timeout {secs}"));
    }
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.as_str()));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file \"{}\"", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from `tokens`, ignoring anything else.
///
/// Both `--flag value` and `--flag=value` are accepted.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--hide-unlisted" => flags.show_unlisted = Some(false),
            "--show-unlisted" => flags.show_unlisted = Some(true),
            _ => {
                let (name, inline_value) = match token.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (token, None),
                };
                if takes_value(name) {
                    let value = match inline_value {
                        Some(value) => Some(value),
                        None => {
                            let next = tokens.get(i + 1).map(String::as_str);
                            if next.is_some() {
                                i += 1;
                            }
                            next
                        }
                    };
                    if let Some(value) = value {
                        apply_value(&mut flags, name, value);
                    }
                }
            }
        }
        i += 1;
    }
    flags
}

fn takes_value(name: &str) -> bool {
    matches!(
        name,
        "--languages" | "--endpoint" | "--timeout" | "--theme" | "--log-file"
    )
}

fn apply_value(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--languages" => flags.languages = Some(parse_languages(value)),
        "--endpoint" => flags.endpoint = Some(value.to_string()),
        "--timeout" => match value.parse() {
            Ok(secs) => flags.timeout_secs = Some(secs),
            Err(_) => tracing::warn!(value, "ignoring invalid --timeout"),
        },
        "--theme" => flags.theme = parse_theme(value),
        "--log-file" => flags.log_file = Some(PathBuf::from(value)),
        _ => {}
    }
}

/// Split a comma-separated language list, dropping blanks.
pub fn parse_languages(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|language| !language.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}

/// Whitespace-split a config line; double quotes group words.
fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut started = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                started = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        tokens.push(current);
    }
    tokens
}
