//! Path helpers for image `source` attributes.
//!
//! Relative paths are computed lexically: nothing here touches the file
//! system, so symlinks are not followed and the inputs need not exist.

use std::borrow::Cow;
use std::io;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Compute the path of `target` relative to the directory `reference_dir`.
///
/// `reference_dir` is always treated as a directory, with or without a
/// trailing separator. Both arguments may also be `file://` URIs, whose
/// percent-encoded characters are decoded first. The result uses the
/// platform separator and `..` segments where needed. If the two paths share
/// no root (different drives, or one absolute and one relative) the
/// normalized target is returned unchanged.
///
/// ```
/// use std::path::MAIN_SEPARATOR;
/// let rel = animset::relative_path("/a/b/c/image.png", "/a/b/");
/// assert_eq!(rel, format!("c{MAIN_SEPARATOR}image.png"));
/// ```
pub fn relative_path<T: AsRef<Path>, D: AsRef<Path>>(target: T, reference_dir: D) -> String {
    let target = normalize_lexically(&from_file_uri(target.as_ref()));
    let base = normalize_lexically(&from_file_uri(reference_dir.as_ref()));

    let target_parts: Vec<Component<'_>> = target.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    if anchor(&target_parts) != anchor(&base_parts) {
        return target.to_string_lossy().into_owned();
    }

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push(Component::ParentDir);
    }
    for part in &target_parts[common..] {
        relative.push(part);
    }

    if relative.as_os_str().is_empty() {
        ".".to_string()
    } else {
        relative.to_string_lossy().into_owned()
    }
}

/// Resolve `.` and `..` components without consulting the file system.
///
/// `..` at the root is dropped; leading `..` in a relative path is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Make `path` absolute against the working directory and normalize it.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize_lexically(path))
    } else {
        Ok(normalize_lexically(&std::path::absolute(path)?))
    }
}

/// Strip the scheme from a `file://` URI and percent-decode the rest.
fn from_file_uri(path: &Path) -> Cow<'_, Path> {
    let Some(text) = path.to_str() else {
        return Cow::Borrowed(path);
    };
    let Some(rest) = text.strip_prefix("file://") else {
        return Cow::Borrowed(path);
    };
    let decoded = percent_decode_str(rest).decode_utf8_lossy();

    // file:///C:/dir keeps a slash before the drive letter
    let bytes = decoded.as_bytes();
    let trimmed = if bytes.len() >= 3
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && bytes[2] == b':'
        && cfg!(windows)
    {
        &decoded[1..]
    } else {
        &decoded[..]
    };
    Cow::Owned(PathBuf::from(trimmed))
}

/// The prefix and root components that a relative path cannot cross.
fn anchor<'a>(parts: &[Component<'a>]) -> Vec<Component<'a>> {
    parts
        .iter()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .copied()
        .collect()
}
