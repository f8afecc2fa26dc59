//! Loading of the game data: app config, localized strings and puzzles.
//!
//! Data is read from a [`DataSource`], either the copy compiled into the
//! binary or a directory on disk with the same file layout:
//!
//! ```text
//! app.config.json
//! strings.<locale>.json
//! puzzles.<locale>.json
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    app_dirs::AppDirs,
    config::AppConfig,
    puzzle::{Puzzle, PuzzleFile},
    strings::Strings,
};

static DATA_DIR: Dir = include_dir!("src/data");

pub const APP_CONFIG_FILE: &str = "app.config.json";

pub fn strings_file(locale: &str) -> String {
    format!("strings.{locale}.json")
}

pub fn puzzles_file(locale: &str) -> String {
    format!("puzzles.{locale}.json")
}

#[derive(Debug, Error)]
pub enum LoadErrorKind {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

/// A data file that could not be loaded or failed validation
#[derive(Debug, Error)]
#[error("failed to load {file}: {kind}")]
pub struct LoadError {
    pub file: String,
    #[source]
    pub kind: LoadErrorKind,
}

impl LoadError {
    pub fn new(file: impl Into<String>, kind: impl Into<LoadErrorKind>) -> Self {
        Self {
            file: file.into(),
            kind: kind.into(),
        }
    }

    pub fn invalid(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(file, LoadErrorKind::Invalid(message.into()))
    }
}

/// Where data files are read from
pub trait DataSource {
    fn describe(&self) -> String;
    fn read(&self, file: &str) -> io::Result<String>;
}

/// The default data set compiled into the binary
pub struct EmbeddedData;

impl DataSource for EmbeddedData {
    fn describe(&self) -> String {
        "embedded data".to_string()
    }

    fn read(&self, file: &str) -> io::Result<String> {
        let entry = DATA_DIR.get_file(file).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{file} is not embedded"))
        })?;
        entry
            .contents_utf8()
            .map(str::to_string)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "file is not UTF-8"))
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryData {
    root: PathBuf,
}

impl DirectoryData {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataSource for DirectoryData {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn read(&self, file: &str) -> io::Result<String> {
        fs::read_to_string(self.root.join(file))
    }
}

/// Pick the data source: an explicit directory, else the per-user override
/// directory when it holds an app config, else the embedded data.
pub fn resolve_source(explicit: Option<PathBuf>) -> Box<dyn DataSource> {
    if let Some(dir) = explicit {
        return Box::new(DirectoryData::new(dir));
    }
    match AppDirs::data_override_dir() {
        Some(dir) if dir.join(APP_CONFIG_FILE).is_file() => Box::new(DirectoryData::new(dir)),
        _ => Box::new(EmbeddedData),
    }
}

/// Everything the host needs to run a game
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub app: AppConfig,
    pub locale: String,
    pub strings: Strings,
    pub puzzles: Vec<Puzzle>,
}

fn read_json<T: DeserializeOwned>(source: &dyn DataSource, file: &str) -> Result<T, LoadError> {
    let text = source.read(file).map_err(|e| LoadError::new(file, e))?;
    serde_json::from_str(&text).map_err(|e| LoadError::new(file, e))
}

pub fn load_app_config(source: &dyn DataSource) -> Result<AppConfig, LoadError> {
    let config: AppConfig = read_json(source, APP_CONFIG_FILE)?;
    if config.default_locale.trim().is_empty() {
        return Err(LoadError::invalid(
            APP_CONFIG_FILE,
            "invalid config structure: missing defaultLocale",
        ));
    }
    Ok(config)
}

pub fn load_strings(source: &dyn DataSource, locale: &str) -> Result<Strings, LoadError> {
    let file = strings_file(locale);
    let value: serde_json::Value = read_json(source, &file)?;
    let strings = Strings::from_value(value)
        .ok_or_else(|| LoadError::invalid(&file, "strings must be a JSON object"))?;
    if strings.section("ui").is_empty() {
        return Err(LoadError::invalid(
            &file,
            "invalid strings structure: missing ui section",
        ));
    }
    Ok(strings)
}

pub fn load_puzzles(source: &dyn DataSource, locale: &str) -> Result<Vec<Puzzle>, LoadError> {
    let data: PuzzleFile = read_json(source, &puzzles_file(locale))?;
    Ok(data.puzzles)
}

/// Load config first, then strings and puzzles for `locale` or the
/// configured default locale.
pub fn load_all(source: &dyn DataSource, locale: Option<&str>) -> Result<LoadedData, LoadError> {
    let app = load_app_config(source)?;
    let locale = locale.unwrap_or(&app.default_locale).to_string();

    log::info!("loading {locale} data from {}", source.describe());

    let strings = load_strings(source, &locale)?;
    let puzzles = load_puzzles(source, &locale)?;

    Ok(LoadedData {
        app,
        locale,
        strings,
        puzzles,
    })
}

/// Checks the guarantees the engine relies on
pub fn validate_loaded_data(data: &LoadedData) -> Result<(), LoadError> {
    let app = &data.app;
    if !app.enabled_modes.contains(&app.default_mode) {
        return Err(LoadError::invalid(
            APP_CONFIG_FILE,
            format!(
                "default mode \"{}\" is not in enabled modes",
                app.default_mode
            ),
        ));
    }

    if !data.strings.contains("ui.title") {
        return Err(LoadError::invalid(
            strings_file(&data.locale),
            "missing required UI title string",
        ));
    }

    let file = puzzles_file(&data.locale);
    if data.puzzles.is_empty() {
        return Err(LoadError::invalid(&file, "no puzzles loaded"));
    }

    for (index, puzzle) in data.puzzles.iter().enumerate() {
        let missing = [
            ("id", puzzle.id.as_str()),
            ("answer", puzzle.answer.as_str()),
            ("image1.srcBase", puzzle.image1.src_base.as_str()),
            ("image2.srcBase", puzzle.image2.src_base.as_str()),
            ("answerImage.srcBase", puzzle.answer_image.src_base.as_str()),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());

        if let Some((field, _)) = missing {
            return Err(LoadError::invalid(
                &file,
                format!("invalid puzzle structure: puzzles[{index}] has no {field}"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn embedded_data_loads_and_validates() {
        let data = load_all(&EmbeddedData, None).unwrap();
        assert_eq!(data.locale, "nb");
        assert!(!data.puzzles.is_empty());
        assert_eq!(data.strings.get("ui.title"), "Gjett ordet");
        validate_loaded_data(&data).unwrap();
    }

    #[test]
    fn embedded_english_locale() {
        let data = load_all(&EmbeddedData, Some("en")).unwrap();
        assert_eq!(data.locale, "en");
        assert!(data.puzzles.iter().all(|p| p.id.starts_with("en-")));
        validate_loaded_data(&data).unwrap();
    }

    #[test]
    fn missing_locale_names_the_file() {
        let err = load_all(&EmbeddedData, Some("xx")).unwrap_err();
        assert_eq!(err.file, "strings.xx.json");
        assert_matches!(err.kind, LoadErrorKind::Io(_));
    }

    fn write_data(dir: &Path) {
        let config = serde_json::to_string(&AppConfig::default()).unwrap();
        fs::write(dir.join(APP_CONFIG_FILE), config).unwrap();
        fs::write(
            dir.join("strings.nb.json"),
            r#"{ "ui": { "title": "Test" }, "summary": {} }"#,
        )
        .unwrap();
        let puzzles = PuzzleFile {
            puzzles: vec![crate::puzzle::test_puzzle("p1", "skole", "buss")],
        };
        fs::write(
            dir.join("puzzles.nb.json"),
            serde_json::to_string(&puzzles).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn directory_source_roundtrip() {
        let dir = tempdir().unwrap();
        write_data(dir.path());

        let source = DirectoryData::new(dir.path());
        let data = load_all(&source, None).unwrap();

        assert_eq!(data.app, AppConfig::default());
        assert_eq!(data.puzzles.len(), 1);
        validate_loaded_data(&data).unwrap();
    }

    #[test]
    fn broken_json_is_reported() {
        let dir = tempdir().unwrap();
        write_data(dir.path());
        fs::write(dir.path().join("puzzles.nb.json"), "{ not json").unwrap();

        let err = load_all(&DirectoryData::new(dir.path()), None).unwrap_err();
        assert_eq!(err.file, "puzzles.nb.json");
        assert_matches!(err.kind, LoadErrorKind::Json(_));
    }

    #[test]
    fn strings_without_ui_are_rejected() {
        let dir = tempdir().unwrap();
        write_data(dir.path());
        fs::write(dir.path().join("strings.nb.json"), r#"{ "summary": {} }"#).unwrap();

        let err = load_all(&DirectoryData::new(dir.path()), None).unwrap_err();
        assert_matches!(err.kind, LoadErrorKind::Invalid(_));
    }

    #[test]
    fn default_mode_must_be_enabled() {
        let mut data = load_all(&EmbeddedData, None).unwrap();
        data.app.default_mode = "practice".to_string();

        let err = validate_loaded_data(&data).unwrap_err();
        assert_eq!(err.file, APP_CONFIG_FILE);
        assert!(err.to_string().contains("practice"));
    }

    #[test]
    fn empty_answer_is_rejected() {
        let mut data = load_all(&EmbeddedData, None).unwrap();
        data.puzzles[1].answer = "  ".to_string();

        let err = validate_loaded_data(&data).unwrap_err();
        assert!(err.to_string().contains("puzzles[1] has no answer"));
    }

    #[test]
    fn no_puzzles_is_rejected() {
        let mut data = load_all(&EmbeddedData, None).unwrap();
        data.puzzles.clear();
        assert!(validate_loaded_data(&data).is_err());
    }

    #[test]
    fn explicit_directory_wins() {
        let dir = tempdir().unwrap();
        let source = resolve_source(Some(dir.path().to_path_buf()));
        assert_eq!(source.describe(), dir.path().display().to_string());
    }
}
