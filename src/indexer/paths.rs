use std::path::{Component, Path, PathBuf};

/// Lexically normalises `path` for comparison: redundant separators and
/// `.` segments are dropped, `..` pops the previous segment, and the result
/// is case-folded when `fold_case` is set. The file system is not touched.
pub fn normalize_path(path: &str, fold_case: bool) -> String {
    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    let s = if out.as_os_str().is_empty() {
        ".".to_string()
    } else {
        out.to_string_lossy().to_string()
    };

    if fold_case {
        s.to_lowercase()
    } else {
        s
    }
}

/// Number of path segments between `base` and `path`, or `None` when
/// `path` does not lie under `base`.
pub fn depth_under(base: &Path, path: &Path) -> Option<usize> {
    let rel = path.strip_prefix(base).ok()?;
    let depth = rel.components().count();
    if depth == 0 {
        None
    } else {
        Some(depth)
    }
}

/// Drops the verbatim prefix Windows `canonicalize` adds, so `\\?\C:\x`
/// reads `C:\x` and `\\?\UNC\server\share` reads `\\server\share`.
/// Other paths are returned unchanged.
pub fn strip_verbatim(path: PathBuf) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path;
    };
    if let Some(rest) = s.strip_prefix(r"\\?\UNC\") {
        return PathBuf::from(format!(r"\\{}", rest));
    }
    if let Some(rest) = s.strip_prefix(r"\\?\") {
        if rest.as_bytes().get(1) == Some(&b':') {
            return PathBuf::from(rest);
        }
    }
    path
}

/// File-name-safe form of a base path: drive markers dropped, separators
/// replaced with `_`.
pub fn safe_file_stem(base: &Path) -> String {
    base.to_string_lossy()
        .replace(':', "")
        .replace(['\\', '/'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbatim_prefix_is_stripped() {
        assert_eq!(
            strip_verbatim(PathBuf::from(r"\\?\C:\Users\kim\문서")),
            PathBuf::from(r"C:\Users\kim\문서")
        );
        assert_eq!(
            strip_verbatim(PathBuf::from(r"\\?\UNC\nas\share\docs")),
            PathBuf::from(r"\\nas\share\docs")
        );
        assert_eq!(
            strip_verbatim(PathBuf::from("/home/kim/docs")),
            PathBuf::from("/home/kim/docs")
        );
        assert_eq!(
            strip_verbatim(PathBuf::from(r"\\?\Volume{1234}\docs")),
            PathBuf::from(r"\\?\Volume{1234}\docs")
        );
    }

    #[test]
    fn normalize_collapses_redundant_segments() {
        assert_eq!(normalize_path("/a//b/./c", false), "/a/b/c");
        assert_eq!(normalize_path("/a/b/../c", false), "/a/c");
        assert_eq!(normalize_path("/a/b/", false), "/a/b");
    }

    #[test]
    fn normalize_folds_case_on_request() {
        assert_eq!(normalize_path("/Docs/Report.PDF", true), "/docs/report.pdf");
        assert_eq!(normalize_path("/Docs/Report.PDF", false), "/Docs/Report.PDF");
    }

    #[test]
    fn depth_counts_segments_below_base() {
        let base = Path::new("/data/root");
        assert_eq!(depth_under(base, Path::new("/data/root/a")), Some(1));
        assert_eq!(depth_under(base, Path::new("/data/root/a/b/c.txt")), Some(3));
        assert_eq!(depth_under(base, Path::new("/data/other/a")), None);
        assert_eq!(depth_under(base, base), None);
    }

    #[test]
    fn safe_stem_replaces_separators() {
        assert_eq!(safe_file_stem(Path::new("/home/me/docs")), "_home_me_docs");
        assert_eq!(safe_file_stem(Path::new("E:\\work\\docs")), "E_work_docs");
    }
}
