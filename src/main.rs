//! lexview - A terminal dictionary viewer with linked definitions.
//!
//! # Usage
//!
//! ```bash
//! lexview chat
//! lexview --languages French,English --hide-unlisted chat
//! lexview --print ice cream
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lexview::app::App;
use lexview::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_languages, save_config_flags,
};
use lexview::document::Document;
use lexview::lookup::{WiktionaryClient, lookup_entry};

/// Width used for `--print` output.
const PRINT_WIDTH: usize = 80;

/// A terminal dictionary viewer with linked definitions and history
#[derive(Parser, Debug)]
#[command(name = "lexview", version, about, long_about = None)]
struct Cli {
    /// Word to look up (several words are joined with spaces)
    #[arg(value_name = "WORD")]
    word: Vec<String>,

    /// Comma-separated languages to show first, in order
    #[arg(long, value_name = "A,B")]
    languages: Option<String>,

    /// Show only the languages given with --languages
    #[arg(long, conflicts_with = "show_unlisted")]
    hide_unlisted: bool,

    /// Show languages not given with --languages after the listed ones
    #[arg(long)]
    show_unlisted: bool,

    /// Definition endpoint; the word is appended as a path segment
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Color palette (auto guesses from COLORFGBG)
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Print the entry as plain text instead of opening the viewer
    #[arg(long)]
    print: bool,

    /// Write logs to a file (also LEXVIEW_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn flags(&self) -> ConfigFlags {
        let show_unlisted = if self.hide_unlisted {
            Some(false)
        } else if self.show_unlisted {
            Some(true)
        } else {
            None
        };
        ConfigFlags {
            languages: self.languages.as_deref().map(parse_languages),
            show_unlisted,
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout,
            theme: self.theme,
            log_file: self.log_file.clone(),
        }
    }

    fn word(&self) -> Option<String> {
        let word = self.word.join(" ");
        let word = word.trim();
        (!word.is_empty()).then(|| word.to_string())
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let log_file = effective
        .log_file
        .clone()
        .or_else(|| std::env::var_os("LEXVIEW_LOG").map(PathBuf::from));
    init_logging(log_file.as_deref())?;
    tracing::debug!(?effective, "resolved flags");

    let client = WiktionaryClient::new(&effective.client_config())
        .context("Failed to build HTTP client")?;
    let ordering = effective.ordering();
    let word = cli.word();

    if cli.print {
        let word = word.context("--print needs a word to look up")?;
        let entry = lookup_entry(&client, &word, &ordering)?;
        print!("{}", Document::for_entry(&entry, PRINT_WIDTH).plain_text());
        return Ok(());
    }

    if (cli.save || cli.clear) && word.is_none() {
        return Ok(());
    }

    let colorfgbg = std::env::var("COLORFGBG").ok();
    let app = App::new(Box::new(client))
        .with_initial_word(word)
        .with_ordering(ordering)
        .with_light_background(effective.light_background(colorfgbg.as_deref()))
        .with_config_paths(
            Some(global_path),
            if local_path.exists() {
                Some(local_path)
            } else {
                None
            },
        );

    app.run().context("Application error")
}
