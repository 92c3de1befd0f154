use crate::config::InjectMode;
use crate::diagnostics::Diagnostic;
use crate::errors::{Result, ValcssError};
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static HEAD_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head>").expect("hard-coded pattern compiles"));

/// A style block written by a previous run
static VALCSS_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style data-valcss>.*?</style>\n?").expect("hard-coded pattern compiles")
});

/// What an injection pass touched.
#[derive(Debug, Default)]
pub struct InjectReport {
    /// Stylesheet written in link mode
    pub stylesheet: Option<PathBuf>,
    /// Targets whose content changed
    pub updated: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Deliver `css` to every target according to `mode`.
///
/// Link mode always writes the stylesheet, even when no target exists.
pub fn inject(css: &str, output: &Path, mode: InjectMode, targets: &[PathBuf]) -> Result<InjectReport> {
    let mut report = InjectReport::default();

    if mode == InjectMode::Link {
        write_stylesheet(output, css)?;
        report.stylesheet = Some(output.to_path_buf());
    }

    for target in targets {
        if !target.is_file() {
            report.diagnostics.push(Diagnostic::warning(
                "Target HTML file not found",
                target.display().to_string(),
            ));
            continue;
        }

        let html = fs::read_to_string(target).map_err(|e| ValcssError::InputError {
            path: target.display().to_string(),
            message: e.to_string(),
        })?;
        let updated = match mode {
            InjectMode::Inline => inline_styles(&html, css),
            InjectMode::Link => link_stylesheet(&html, &stylesheet_href(output, target)),
        };

        if updated != html {
            write_atomic(target, &updated).map_err(|e| ValcssError::OutputError {
                path: target.display().to_string(),
                message: e.to_string(),
            })?;
            tracing::info!("Updated {}", target.display());
            report.updated.push(target.clone());
        }
    }

    Ok(report)
}

/// Put `css` in a `<style data-valcss>` block just before `</head>`.
///
/// An existing valcss block is removed first, so repeated runs leave exactly
/// one. A document without `</head>` is returned unchanged.
pub fn inline_styles(html: &str, css: &str) -> String {
    let cleaned = VALCSS_STYLE.replace_all(html, "");
    let Some(head) = HEAD_CLOSE.find(&cleaned) else {
        return html.to_string();
    };

    let block = format!("<style data-valcss>\n{}\n</style>\n", css);
    let mut result = String::with_capacity(cleaned.len() + block.len());
    result.push_str(&cleaned[..head.start()]);
    result.push_str(&block);
    result.push_str(&cleaned[head.start()..]);
    result
}

/// Add `<link rel="stylesheet" href="...">` before `</head>` unless the
/// document already links `href`.
pub fn link_stylesheet(html: &str, href: &str) -> String {
    if html.contains(&format!("href=\"{}\"", href)) {
        return html.to_string();
    }
    let Some(head) = HEAD_CLOSE.find(html) else {
        return html.to_string();
    };

    let tag = format!("<link rel=\"stylesheet\" href=\"{}\">\n", href);
    format!("{}{}{}", &html[..head.start()], tag, &html[head.start()..])
}

/// `output` as seen from the directory holding `target`, when it lives below it.
fn stylesheet_href(output: &Path, target: &Path) -> String {
    let relative = target
        .parent()
        .and_then(|dir| output.strip_prefix(dir).ok())
        .unwrap_or(output);
    relative.to_string_lossy().replace('\\', "/")
}

/// `/* Generated by valcss vX.Y.Z on <timestamp> */`
pub fn header_comment() -> String {
    format!(
        "/* Generated by valcss v{} on {} */\n",
        env!("CARGO_PKG_VERSION"),
        chrono::Utc::now().to_rfc3339()
    )
}

fn write_stylesheet(output: &Path, css: &str) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = format!("{}{}\n", header_comment(), css);
    write_atomic(output, &content).map_err(|e| ValcssError::OutputError {
        path: output.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::info!("Wrote {}", output.display());
    Ok(())
}

/// Write file atomically by writing to temp file then renaming
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    fs::rename(&temp_path, path)
}
