use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ociguard_types::RepoPath;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Directories never scanned: provider/module caches and VCS metadata.
const SKIP_DIRS: [&str; 2] = [".terraform", ".git"];

/// Discover `*.tf` files under `root`, repo-relative and sorted.
///
/// `exclude` globs are matched against both the file path and its directory.
pub fn discover_terraform_files(root: &Utf8Path, exclude: &[String]) -> anyhow::Result<Vec<RepoPath>> {
    let exclude_set = build_globset(exclude).context("compile exclude globset")?;

    let mut out: Vec<RepoPath> = Vec::new();
    for abs in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
        .filter(|p| p.extension() == Some("tf"))
    {
        let rel = abs
            .strip_prefix(root)
            .unwrap_or(&abs)
            .as_str()
            .replace('\\', "/");
        let dir_rel = Utf8Path::new(&rel)
            .parent()
            .map(|p| p.as_str())
            .unwrap_or("");

        if exclude_set.is_match(&rel) || (!dir_rel.is_empty() && exclude_set.is_match(dir_rel)) {
            continue;
        }
        out.push(RepoPath::new(&rel));
    }

    // Stable order.
    out.sort();
    out.dedup();

    Ok(out)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

pub(crate) fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p).with_context(|| format!("invalid glob `{p}`"))?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
