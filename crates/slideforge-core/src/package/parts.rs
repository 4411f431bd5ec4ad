//! Part-name arithmetic for package paths.
//!
//! Part names are zip entry names: no leading `/`, forward slashes. The
//! package root is the empty string.

/// Name of the `.rels` part that holds relationships for `source`.
pub fn rels_part_name(source: &str) -> String {
    match source.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None if source.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", source),
    }
}

/// Inverse of [`rels_part_name`]; `None` when `rels_part` is not a `.rels` part.
pub fn source_for_rels_part(rels_part: &str) -> Option<String> {
    let stem = rels_part.strip_suffix(".rels")?;
    let (dir, file) = match stem.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => return None,
    };
    let parent = if dir == "_rels" {
        ""
    } else {
        dir.strip_suffix("/_rels")?
    };
    Some(match (parent.is_empty(), file.is_empty()) {
        (_, true) => String::new(),
        (true, false) => file.to_string(),
        (false, false) => format!("{}/{}", parent, file),
    })
}

fn directory_of(part: &str) -> &str {
    part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Resolve a relationship target against the part that owns the relationship.
pub fn resolve_relative(source: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(absolute);
    }
    let base = directory_of(source);
    if base.is_empty() {
        normalize(target)
    } else {
        normalize(&format!("{}/{}", base, target))
    }
}

fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Relative target from `source` to the part `target`, as written in `.rels`.
pub fn relative_target(source: &str, target: &str) -> String {
    let from: Vec<&str> = directory_of(source)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let to: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count()
        .min(to.len().saturating_sub(1));

    let mut parts: Vec<&str> = std::iter::repeat("..").take(from.len() - common).collect();
    parts.extend(&to[common..]);
    parts.join("/")
}

/// File name without directory.
pub fn file_name(part: &str) -> &str {
    part.rsplit_once('/').map(|(_, name)| name).unwrap_or(part)
}

/// Lower-cased extension of a part name.
pub fn extension(part: &str) -> Option<String> {
    let (_, ext) = file_name(part).rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}
