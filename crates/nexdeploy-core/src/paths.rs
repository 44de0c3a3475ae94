//! Lexical path helpers shared by the resolvers.
//!
//! Everything here is pure path arithmetic: nothing touches the filesystem
//! except [`absolutize`], which only reads the current directory.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` segments without consulting the filesystem.
///
/// `..` directly below a root is dropped; leading `..` of a relative path is
/// kept.
pub fn normalize(path: &Path) -> PathBuf {
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

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Make `path` absolute against the current directory, then normalize it.
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize(path));
    }
    let cwd = std::env::current_dir()?;
    Ok(normalize(&cwd.join(path)))
}

/// Split a token into its segments, treating both `/` and `\` as separators.
fn token_segments(token: &str) -> impl Iterator<Item = &str> {
    token.split(['/', '\\']).filter(|s| !s.is_empty())
}

/// The token relative to the directory its leading `../` addresses.
///
/// Tokens are written relative to the document directory, so the first
/// parent marker climbs to the base. `../mod//x/./` becomes `mod/x`.
pub fn anchored_token(token: &str) -> PathBuf {
    let mut segments = token_segments(token).peekable();
    if segments.peek() == Some(&"..") {
        segments.next();
    }
    normalize(&segments.collect::<PathBuf>())
}

/// Map key for a token: the anchored token with `/` separators.
pub fn normalized_token(token: &str) -> String {
    let anchored = anchored_token(token);
    anchored
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a token onto a base directory and normalize the result.
///
/// `../a/b` under `/X` is `/X/a/b`.
pub fn resolve_token(base: &Path, token: &str) -> PathBuf {
    normalize(&base.join(anchored_token(token)))
}

/// Case-insensitive extension check against a set of `.ext` strings.
pub fn has_extension<S: AsRef<str>>(path: &Path, allowed: &[S]) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = format!(".{}", ext.to_string_lossy().to_ascii_lowercase());
    allowed.iter().any(|a| a.as_ref().eq_ignore_ascii_case(&ext))
}

/// Whether two paths name the same location after normalization.
pub fn same_path(a: &Path, b: &Path) -> bool {
    normalize(a) == normalize(b)
}
