use crate::errors::{Result, ValcssError};
use indexmap::IndexSet;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("hard-coded pattern compiles"));
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("hard-coded pattern compiles"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(^|[^:])//.*").expect("hard-coded pattern compiles"));

/// A markup file ready for extraction
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    /// File content with comments removed
    pub content: String,
}

/// Expand glob patterns into existing files, first-seen order, no duplicates.
pub fn resolve_files(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = IndexSet::new();

    for pattern in patterns {
        for entry in glob::glob(pattern)? {
            let path = entry?;
            if path.is_file() {
                files.insert(path);
            }
        }
    }

    Ok(files.into_iter().collect())
}

/// Remove HTML comments, block comments and line comments.
///
/// A `//` directly after `:` (as in `https://`) does not start a line comment.
pub fn strip_comments(content: &str) -> String {
    let without_html = HTML_COMMENT.replace_all(content, "");
    let without_block = BLOCK_COMMENT.replace_all(&without_html, "");
    LINE_COMMENT.replace_all(&without_block, "${1}").into_owned()
}

pub fn load_document(path: &Path) -> Result<Document> {
    let raw = fs::read_to_string(path).map_err(|e| ValcssError::InputError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Document {
        path: path.to_path_buf(),
        content: strip_comments(&raw),
    })
}

pub fn load_documents(paths: &[PathBuf]) -> Result<Vec<Document>> {
    paths.iter().map(|path| load_document(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strip_comments() {
        let html = "<div class=\"flex\"></div>\n<!-- <p class=\"grid\"></p>\n-->\n/* block\n*/ // trailing\nend";
        let stripped = strip_comments(html);
        assert!(stripped.contains("class=\"flex\""));
        assert!(!stripped.contains("grid"));
        assert!(!stripped.contains("block"));
        assert!(!stripped.contains("trailing"));
        assert!(stripped.contains("end"));
    }

    #[test]
    fn test_urls_survive_comment_stripping() {
        let html = r#"<a href="https://example.com" class="block">x</a> // note"#;
        let stripped = strip_comments(html);
        assert!(stripped.contains(r#"href="https://example.com" class="block""#));
        assert!(!stripped.contains("note"));
    }

    #[test]
    fn test_resolve_files_dedupes_and_skips_dirs() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.html"), "").unwrap();
        fs::write(temp_dir.path().join("b.html"), "").unwrap();
        fs::create_dir(temp_dir.path().join("dir.html")).unwrap();

        let patterns = vec![
            format!("{}/a.html", temp_dir.path().display()),
            format!("{}/*.html", temp_dir.path().display()),
        ];
        let files = resolve_files(&patterns).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.html"));
        assert!(files[1].ends_with("b.html"));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = resolve_files(&["[invalid glob".to_string()]);
        assert!(matches!(result, Err(ValcssError::Pattern(_))));
    }

    #[test]
    fn test_load_missing_document() {
        let err = load_document(Path::new("/definitely/not/here.html")).unwrap_err();
        assert!(err.to_string().contains("here.html"));
    }
}
