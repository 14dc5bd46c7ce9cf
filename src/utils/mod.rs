use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Once,
};

use dirs::home_dir;

use crate::errors::Result;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIR_NAME: &str = ".hearth_ledger";
const HOME_ENV: &str = "HEARTH_LEDGER_HOME";
const BOOKS_DIR: &str = "books";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "hearth_ledger=info".parse() {
            filter = filter.add_directive(directive);
        }

        // Another subscriber may already be installed by the host application.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}

/// Application data directory, `$HEARTH_LEDGER_HOME` or `~/.hearth_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn books_dir_in(base: &Path) -> PathBuf {
    base.join(BOOKS_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let extension = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{ext}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(extension);
    tmp
}

/// Stages `data` next to `path` and renames it into place.
pub fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Lowercase file-system-safe form of a name; falls back to `fallback` when nothing
/// usable remains.
pub fn canonical_name(name: &str, fallback: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        fallback.into()
    } else {
        sanitized
    }
}

/// Lowercase hex of the UTF-8 bytes of `name`; distinct names never share an encoding.
pub fn hex_name(name: &str) -> String {
    name.bytes().map(|byte| format!("{byte:02x}")).collect()
}
