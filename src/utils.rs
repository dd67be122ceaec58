/*!
 * Utility functions and default pattern tables for promptdump
 */

use once_cell::sync::Lazy;

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Default allow-list of file name globs
pub static DEFAULT_INCLUDE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Source
        "*.py",
        "*.ts",
        "*.tsx",
        "*.js",
        "*.jsx",
        "*.rs",
        // Markup & styles
        "*.html",
        "*.css",
        // Config
        "*.json",
        "*.toml",
        "*.yml",
        "*.yaml",
        // Docs
        "*.md",
        "*.txt",
        // Shell
        "*.sh",
        // Environment templates
        "*.env.example",
    ]
});

/// File names that are never dumped, even when allow-listed
pub static DEFAULT_EXCLUDED_NAMES: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec![".env", "secrets.json"]);

/// Directory names that are never descended into
pub static DEFAULT_EXCLUDED_DIRS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control
        ".git",
        ".hg",
        ".svn",
        // IDEs & Editors
        ".idea",
        ".vscode",
        // Dependencies
        "node_modules",
        // Python
        ".venv",
        "venv",
        "env",
        "__pycache__",
        ".pytest_cache",
        ".mypy_cache",
        ".tox",
        // Build & Dist
        "dist",
        "build",
        "target",
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sizes_with_units() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5.00 GB");
    }

    #[test]
    fn default_tables_cover_noise_dirs() {
        for dir in ["node_modules", ".git", "__pycache__", "dist", "build", "venv"] {
            assert!(DEFAULT_EXCLUDED_DIRS.contains(&dir), "{} missing", dir);
        }
        assert!(DEFAULT_INCLUDE.contains(&"*.env.example"));
    }
}
