//! Checks a data set before it is shipped: JSON structure of the three data
//! files and, when a public directory is given, that every referenced image
//! exists for every size tier and stays within the size budget.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crossterm::style::Stylize;
use itertools::Itertools;
use serde_json::Value;

use crate::{
    config::AppConfig,
    loader::{puzzles_file, strings_file, DataSource, APP_CONFIG_FILE},
};

const REQUIRED_CONFIG_KEYS: [&str; 9] = [
    "defaultLocale",
    "enabledModes",
    "defaultMode",
    "timer",
    "selection",
    "input",
    "effects",
    "answerCard",
    "images",
];
const STRATEGIES: [&str; 3] = ["random", "sequential", "shuffled"];
const TRANSITIONS: [&str; 3] = ["fade", "slide", "none"];
const STRING_SECTIONS: [&str; 4] = ["ui", "summary", "errors", "accessibility"];
const UI_KEYS: [&str; 6] = ["title", "submit", "exit", "replay", "changeMode", "placeholder"];
const SUMMARY_KEYS: [&str; 2] = ["title", "scoreText"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub file: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn error(&mut self, file: &str, message: impl Into<String>) {
        self.push(Severity::Error, file, message.into());
    }

    pub fn warning(&mut self, file: &str, message: impl Into<String>) {
        self.push(Severity::Warning, file, message.into());
    }

    fn push(&mut self, severity: Severity, file: &str, message: String) {
        self.issues.push(Issue {
            severity,
            file: file.to_string(),
            message,
        });
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rule = "=".repeat(60);
        writeln!(out, "\n{}", rule.as_str().blue().bold())?;
        writeln!(out, "{}", "Configuration Validation Results".blue().bold())?;
        writeln!(out, "{}\n", rule.as_str().blue().bold())?;

        if self.issues.is_empty() {
            writeln!(out, "{}", "✓ All validations passed!".green())?;
            writeln!(out, "{}\n", "  No errors or warnings found.".green())?;
            return Ok(());
        }

        let errors = self.errors().collect_vec();
        if !errors.is_empty() {
            let heading = format!("✗ {} Error(s) Found:\n", errors.len());
            writeln!(out, "{}", heading.red().bold())?;
            for (n, issue) in errors.iter().enumerate() {
                writeln!(out, "{}", format!("  {}. [{}]", n + 1, issue.file).red())?;
                writeln!(out, "     {}\n", issue.message)?;
            }
        }

        let warnings = self.warnings().collect_vec();
        if !warnings.is_empty() {
            let heading = format!("⚠ {} Warning(s) Found:\n", warnings.len());
            writeln!(out, "{}", heading.yellow().bold())?;
            for (n, issue) in warnings.iter().enumerate() {
                writeln!(out, "{}", format!("  {}. [{}]", n + 1, issue.file).yellow())?;
                writeln!(out, "     {}\n", issue.message)?;
            }
        }

        writeln!(out, "{}", rule.as_str().blue().bold())?;
        if errors.is_empty() {
            writeln!(out, "{}", "Validation PASSED (with warnings)".green())?;
        } else {
            writeln!(out, "{}", "Validation FAILED".red())?;
        }
        writeln!(out, "{}\n", rule.as_str().blue().bold())
    }
}

fn is_non_empty_array(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty())
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

pub fn validate_app_config(config: &Value, file: &str, report: &mut ValidationReport) {
    for key in REQUIRED_CONFIG_KEYS {
        if config.get(key).is_none() {
            report.error(file, format!("Missing required key: {key}"));
        }
    }

    if let Some(timer) = config.get("timer") {
        if timer.get("enabled").is_none() {
            report.error(file, "timer.enabled is required");
        }
        if !is_non_empty_array(timer.get("durations")) {
            report.error(file, "timer.durations must be a non-empty array");
        }
        if !timer.get("default").is_some_and(Value::is_number) {
            report.error(file, "timer.default must be a number");
        }
    }

    if let Some(modes) = config.get("enabledModes") {
        if !is_non_empty_array(Some(modes)) {
            report.error(file, "enabledModes must be a non-empty array");
        }
        if let Some(default_mode) = non_empty_str(config, "defaultMode") {
            let enabled = modes
                .as_array()
                .is_some_and(|m| m.iter().any(|v| v.as_str() == Some(default_mode)));
            if !enabled {
                report.error(
                    file,
                    format!("defaultMode \"{default_mode}\" is not in enabledModes"),
                );
            }
        }
    }

    if let Some(selection) = config.get("selection") {
        let strategy = selection.get("strategy").and_then(Value::as_str);
        if !strategy.is_some_and(|s| STRATEGIES.contains(&s)) {
            report.error(
                file,
                format!("selection.strategy must be one of: {}", STRATEGIES.join(", ")),
            );
        }
    }

    if let Some(images) = config.get("images") {
        if !is_non_empty_array(images.get("tiers")) {
            report.error(file, "images.tiers must be a non-empty array");
        }
        let budget = images.get("budgetKB").and_then(Value::as_f64);
        if !budget.is_some_and(|b| b > 0.0) {
            report.error(file, "images.budgetKB must be a positive number");
        }
    }

    if let Some(card) = config.get("answerCard") {
        if !card.get("showImage").is_some_and(Value::is_boolean) {
            report.error(file, "answerCard.showImage must be a boolean");
        }
        let transition = card.get("transition").and_then(Value::as_str);
        if !transition.is_some_and(|t| TRANSITIONS.contains(&t)) {
            report.error(
                file,
                format!(
                    "answerCard.transition must be one of: {}",
                    TRANSITIONS.join(", ")
                ),
            );
        }
    }
}

pub fn validate_strings(strings: &Value, file: &str, report: &mut ValidationReport) {
    for section in STRING_SECTIONS {
        if strings.get(section).is_none() {
            report.error(file, format!("Missing required section: {section}"));
        }
    }

    let required = [("ui", &UI_KEYS[..]), ("summary", &SUMMARY_KEYS[..])];
    for (section, keys) in required {
        let Some(table) = strings.get(section) else {
            continue;
        };
        for key in keys {
            if table.get(key).is_none() {
                report.error(file, format!("Missing required {section}.{key}"));
            }
        }
    }
}

pub fn validate_puzzles(data: &Value, file: &str, report: &mut ValidationReport) {
    let Some(puzzles) = data.get("puzzles").and_then(Value::as_array) else {
        report.error(file, "Missing or invalid \"puzzles\" array");
        return;
    };
    if puzzles.is_empty() {
        report.error(file, "puzzles array is empty");
        return;
    }

    for (index, puzzle) in puzzles.iter().enumerate() {
        let prefix = format!("puzzles[{index}]");

        for key in ["id", "answer"] {
            if non_empty_str(puzzle, key).is_none() {
                report.error(file, format!("{prefix}: missing {key}"));
            }
        }

        let images = [
            ("image1", "wordPart"),
            ("image2", "wordPart"),
            ("answerImage", "word"),
        ];
        for (image, word_key) in images {
            let Some(descriptor) = puzzle.get(image) else {
                report.error(file, format!("{prefix}: missing {image}"));
                continue;
            };
            for key in ["srcBase", word_key] {
                if non_empty_str(descriptor, key).is_none() {
                    report.error(file, format!("{prefix}.{image}: missing {key}"));
                }
            }
        }
    }
}

/// Distinct `srcBase` values in first-seen order
pub fn collect_src_bases(data: &Value) -> Vec<String> {
    data.get("puzzles")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .flat_map(|puzzle| {
            ["image1", "image2", "answerImage"]
                .into_iter()
                .filter_map(move |image| puzzle.get(image).and_then(|d| non_empty_str(d, "srcBase")))
        })
        .unique()
        .map(str::to_string)
        .collect()
}

pub fn image_file_name(src_base: &str, tier: u32, format: &str) -> String {
    format!("{src_base}-{tier}.{format}")
}

pub fn validate_image_files(
    src_bases: &[String],
    config: &AppConfig,
    public_dir: &Path,
    report: &mut ValidationReport,
) {
    let images_dir = public_dir.join("assets").join("images");
    let formats = config.images.formats();
    let budget_kb = config.images.budget_kb;

    for src_base in src_bases {
        for &tier in &config.images.tiers {
            let found = formats.iter().find_map(|format| {
                let name = image_file_name(src_base, tier, format);
                let path = images_dir.join(&name);
                path.is_file().then_some((name, path))
            });

            match found {
                Some((name, path)) => {
                    let size_kb = file_size_kb(&path);
                    if size_kb > budget_kb {
                        report.warning(
                            "images",
                            format!("{name} exceeds budget: {size_kb:.2}KB > {budget_kb}KB"),
                        );
                    }
                }
                None => report.error(
                    "images",
                    format!(
                        "Missing image file for \"{src_base}\" at tier {tier}. Checked formats: {}",
                        formats.join(", ")
                    ),
                ),
            }
        }
    }
}

fn file_size_kb(path: &Path) -> f64 {
    fs::metadata(path)
        .map(|m| m.len() as f64 / 1024.0)
        .unwrap_or(0.0)
}

fn read_value(source: &dyn DataSource, file: &str, report: &mut ValidationReport) -> Option<Value> {
    let text = match source.read(file) {
        Ok(text) => text,
        Err(e) => {
            report.error(file, format!("File could not be read: {e}"));
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            report.error(file, format!("Failed to parse JSON: {e}"));
            None
        }
    }
}

/// What to validate
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub locale: Option<String>,
    pub public_dir: Option<PathBuf>,
}

pub fn validate_data(source: &dyn DataSource, options: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::default();

    let app_value = read_value(source, APP_CONFIG_FILE, &mut report);
    if let Some(app) = &app_value {
        validate_app_config(app, APP_CONFIG_FILE, &mut report);
    }

    let locale = options
        .locale
        .clone()
        .or_else(|| {
            app_value
                .as_ref()
                .and_then(|app| non_empty_str(app, "defaultLocale"))
                .map(str::to_string)
        })
        .unwrap_or_else(|| "nb".to_string());

    let strings = strings_file(&locale);
    if let Some(value) = read_value(source, &strings, &mut report) {
        validate_strings(&value, &strings, &mut report);
    }

    let puzzles = puzzles_file(&locale);
    let puzzles_value = read_value(source, &puzzles, &mut report);
    if let Some(value) = &puzzles_value {
        validate_puzzles(value, &puzzles, &mut report);
    }

    if let (Some(public_dir), Some(app), Some(puzzles)) =
        (&options.public_dir, app_value, &puzzles_value)
    {
        match serde_json::from_value::<AppConfig>(app) {
            Ok(config) => {
                let src_bases = collect_src_bases(puzzles);
                log::info!("validating {} unique image(s)", src_bases.len());
                validate_image_files(&src_bases, &config, public_dir, &mut report);
            }
            Err(e) => report.error(
                APP_CONFIG_FILE,
                format!("Image check skipped, config does not parse: {e}"),
            ),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{DirectoryData, EmbeddedData};
    use serde_json::json;
    use tempfile::tempdir;

    fn messages(report: &ValidationReport) -> Vec<String> {
        report.issues.iter().map(|i| i.message.clone()).collect()
    }

    #[test]
    fn embedded_data_is_valid() {
        let report = validate_data(
            &EmbeddedData,
            &ValidateOptions {
                locale: None,
                public_dir: None,
            },
        );
        assert!(!report.has_errors(), "{:?}", messages(&report));
    }

    #[test]
    fn config_missing_keys_and_bad_values() {
        let config = json!({
            "defaultLocale": "nb",
            "enabledModes": ["untimed"],
            "defaultMode": "timed",
            "timer": { "durations": [], "default": "60" },
            "selection": { "strategy": "weighted" },
            "images": { "tiers": [320], "budgetKB": 0 },
            "answerCard": { "showImage": "yes", "transition": "zoom" }
        });
        let mut report = ValidationReport::default();
        validate_app_config(&config, "app.config.json", &mut report);

        let msgs = messages(&report);
        for expected in [
            "Missing required key: input",
            "Missing required key: effects",
            "timer.enabled is required",
            "timer.durations must be a non-empty array",
            "timer.default must be a number",
            "defaultMode \"timed\" is not in enabledModes",
            "selection.strategy must be one of: random, sequential, shuffled",
            "images.budgetKB must be a positive number",
            "answerCard.showImage must be a boolean",
            "answerCard.transition must be one of: fade, slide, none",
        ] {
            assert!(msgs.iter().any(|m| m == expected), "missing {expected:?} in {msgs:?}");
        }
    }

    #[test]
    fn strings_missing_sections_and_keys() {
        let strings = json!({ "ui": { "title": "x" }, "summary": { "title": "y" } });
        let mut report = ValidationReport::default();
        validate_strings(&strings, "strings.nb.json", &mut report);

        let msgs = messages(&report);
        assert!(msgs.contains(&"Missing required section: errors".to_string()));
        assert!(msgs.contains(&"Missing required ui.placeholder".to_string()));
        assert!(msgs.contains(&"Missing required summary.scoreText".to_string()));
        assert!(!msgs.contains(&"Missing required ui.title".to_string()));
    }

    #[test]
    fn puzzles_field_errors() {
        let data = json!({ "puzzles": [
            {
                "id": "p1",
                "answer": "",
                "image1": { "srcBase": "skole" },
                "answerImage": { "srcBase": "skolebuss", "word": "skolebuss" }
            }
        ]});
        let mut report = ValidationReport::default();
        validate_puzzles(&data, "puzzles.nb.json", &mut report);

        assert_eq!(
            messages(&report),
            vec![
                "puzzles[0]: missing answer".to_string(),
                "puzzles[0].image1: missing wordPart".to_string(),
                "puzzles[0]: missing image2".to_string(),
            ]
        );
    }

    #[test]
    fn empty_puzzle_list() {
        let mut report = ValidationReport::default();
        validate_puzzles(&json!({ "puzzles": [] }), "p.json", &mut report);
        validate_puzzles(&json!({}), "p.json", &mut report);
        assert_eq!(
            messages(&report),
            vec![
                "puzzles array is empty".to_string(),
                "Missing or invalid \"puzzles\" array".to_string()
            ]
        );
    }

    #[test]
    fn src_bases_are_unique() {
        let data = json!({ "puzzles": [
            { "image1": { "srcBase": "hand" }, "image2": { "srcBase": "ball" },
              "answerImage": { "srcBase": "handball" } },
            { "image1": { "srcBase": "foot" }, "image2": { "srcBase": "ball" },
              "answerImage": { "srcBase": "football" } }
        ]});
        assert_eq!(
            collect_src_bases(&data),
            vec!["hand", "ball", "handball", "foot", "football"]
        );
    }

    #[test]
    fn image_files_checked_per_tier_and_budget() {
        let public = tempdir().unwrap();
        let images = public.path().join("assets").join("images");
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("sun-320.webp"), vec![0u8; 1024]).unwrap();
        fs::write(images.join("sun-640.png"), vec![0u8; 4 * 1024]).unwrap();

        let mut config = AppConfig::default();
        config.images.tiers = vec![320, 640];
        config.images.prefer_formats = Some(vec!["webp".into(), "png".into()]);
        config.images.budget_kb = 2.0;

        let mut report = ValidationReport::default();
        validate_image_files(
            &["sun".to_string(), "shine".to_string()],
            &config,
            public.path(),
            &mut report,
        );

        let warnings = report.warnings().collect_vec();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("sun-640.png exceeds budget"));

        let errors = report.errors().collect_vec();
        assert_eq!(errors.len(), 2);
        assert!(errors[0]
            .message
            .contains("\"shine\" at tier 320. Checked formats: webp, png"));
    }

    #[test]
    fn unreadable_files_are_errors() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(APP_CONFIG_FILE), "{").unwrap();

        let report = validate_data(
            &DirectoryData::new(dir.path()),
            &ValidateOptions {
                locale: Some("nb".to_string()),
                public_dir: None,
            },
        );

        let errors = report.errors().collect_vec();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].message.starts_with("Failed to parse JSON"));
        assert_eq!(errors[1].file, "strings.nb.json");
    }

    #[test]
    fn print_summarizes_counts() {
        let mut report = ValidationReport::default();
        report.error("a.json", "broken");
        report.warning("images", "big");

        let mut out = Vec::new();
        report.print(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("1 Error(s) Found"));
        assert!(text.contains("1 Warning(s) Found"));
        assert!(text.contains("Validation FAILED"));
    }

    #[test]
    fn print_clean_report() {
        let mut out = Vec::new();
        ValidationReport::default().print(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("All validations passed"));
    }
}
