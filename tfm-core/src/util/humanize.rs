//! src/util/humanize.rs

/// `1536` → `"1.5 KB"`. Sizes below 1 KiB keep one decimal like the rest.
pub fn human_readable_size(size: u64) -> String {
    let units: [&'static str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size_f: f64 = size as f64;
    let mut unit_idx: usize = 0;

    while size_f >= 1024.0 && unit_idx < units.len() - 1 {
        size_f /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.1} {}", size_f, units[unit_idx])
}

/// Bytes as GiB with one decimal, for the disk usage line.
pub fn gib(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}

/// Quote `s` for `sh -c`.
pub fn shell_quote(s: &str) -> String {
    if !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | ',' | ':' | '@' | '%'))
    {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(human_readable_size(0), "0.0 B");
        assert_eq!(human_readable_size(512), "512.0 B");
        assert_eq!(human_readable_size(1536), "1.5 KB");
        assert_eq!(human_readable_size(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn quoting() {
        assert_eq!(shell_quote("/tmp/plain.txt"), "/tmp/plain.txt");
        assert_eq!(shell_quote("my file"), "'my file'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }
}
