use crate::config::BundleConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Files concatenated into the bundle, relative to the asset root. Order matters.
pub const BUNDLE_SOURCES: &[&str] = &[
    "variables.css",
    "reset.css",
    "base.css",
    "utilities/spacing.css",
    "utilities/layout.css",
    "utilities/typography.css",
    "utilities/colors.css",
    "utilities/borders.css",
    "utilities/sizing.css",
    "utilities/position.css",
    "utilities/effects.css",
    "utilities/states.css",
    "components.css",
];

pub const CORE_CSS: &str = "core.css";
pub const CORE_MIN_CSS: &str = "core.min.css";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludedFile {
    pub name: String,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub css: String,
    pub included: Vec<IncludedFile>,
    pub skipped: Vec<String>,
}

impl Bundle {
    pub fn total_input_bytes(&self) -> usize {
        self.included.iter().map(|file| file.bytes).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub included: Vec<IncludedFile>,
    pub skipped: Vec<String>,
    pub total_input_bytes: usize,
    pub core_path: PathBuf,
    pub core_bytes: usize,
    pub minified_path: PathBuf,
    pub minified_bytes: usize,
    pub size_budget_bytes: u64,
}

impl BuildReport {
    pub fn reduction_percent(&self) -> f64 {
        if self.core_bytes == 0 {
            return 0.0;
        }
        (1.0 - self.minified_bytes as f64 / self.core_bytes as f64) * 100.0
    }

    pub fn within_budget(&self) -> bool {
        (self.minified_bytes as u64) < self.size_budget_bytes
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub fn banner(config: &BundleConfig) -> String {
    [
        "/**".to_string(),
        format!(" * {} - Complete CSS Bundle", config.title),
        format!(" * Version: {}", config.version),
        format!(" * License: {}", config.license),
        " */".to_string(),
        String::new(),
    ]
    .join("\n")
}

/// Concatenates `sources` under `assets_root` behind the banner.
///
/// Missing files are recorded in [`Bundle::skipped`] and left out; any other
/// read failure aborts.
pub fn assemble(
    assets_root: &Path,
    sources: &[&str],
    config: &BundleConfig,
) -> Result<Bundle, BundleError> {
    let mut parts = vec![banner(config)];
    let mut included = Vec::new();
    let mut skipped = Vec::new();

    for source in sources {
        let path = assets_root.join(source);
        let name = file_name(&path);
        if !path.is_file() {
            log::debug!("bundle source {} not found", path.display());
            skipped.push(name);
            continue;
        }
        let content = fs::read_to_string(&path).map_err(|source| BundleError::Read {
            path: path.clone(),
            source,
        })?;
        parts.push(format!("\n/* {} */", name));
        included.push(IncludedFile {
            name,
            bytes: content.len(),
        });
        parts.push(content);
    }

    Ok(Bundle {
        css: parts.join("\n"),
        included,
        skipped,
    })
}

/// Assembles the bundle and writes `core.css` and `core.min.css` to the asset root.
pub fn build(assets_root: &Path, config: &BundleConfig) -> Result<BuildReport, BundleError> {
    let bundle = assemble(assets_root, BUNDLE_SOURCES, config)?;
    let minified = minify(&bundle.css);

    let core_path = assets_root.join(CORE_CSS);
    write_artifact(&core_path, &bundle.css)?;
    let minified_path = assets_root.join(CORE_MIN_CSS);
    write_artifact(&minified_path, &minified)?;

    Ok(BuildReport {
        total_input_bytes: bundle.total_input_bytes(),
        included: bundle.included,
        skipped: bundle.skipped,
        core_path,
        core_bytes: bundle.css.len(),
        minified_path,
        minified_bytes: minified.len(),
        size_budget_bytes: config.size_budget_bytes(),
    })
}

fn write_artifact(path: &Path, css: &str) -> Result<(), BundleError> {
    fs::write(path, css).map_err(|source| BundleError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("wrote {} ({} bytes)", path.display(), css.len());
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Textual CSS minifier.
///
/// Strips comments, collapses whitespace and drops whitespace around
/// `{ } : ; , > ~ +`. It does not parse CSS, so string literals containing
/// those characters are rewritten too.
pub fn minify(css: &str) -> String {
    let stripped = strip_comments(css);
    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;
    let mut after_tight = false;

    for ch in stripped.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if is_tight_char(ch) {
            out.push(ch);
            after_tight = true;
        } else {
            if pending_space && !after_tight && !out.is_empty() {
                out.push(' ');
            }
            out.push(ch);
            after_tight = false;
        }
        pending_space = false;
    }

    out
}

fn is_tight_char(ch: char) -> bool {
    matches!(ch, '{' | '}' | ':' | ';' | ',' | '>' | '~' | '+')
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;

    while let Some(start) = rest.find("/*") {
        let Some(len) = rest[start + 2..].find("*/") else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + 2 + len + 2..];
    }

    out.push_str(rest);
    out
}

pub fn format_size(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * 1024;

    if bytes < KIB {
        format!("{} bytes", bytes)
    } else if bytes < MIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    }
}
