// File: src/core/resolver.rs
use crate::core::types::{CanonicalKey, PictogramSource, PictogramVariant, Resolved, ResolutionPolicy};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const EXTENSION: &str = ".png";

/// The `.png` files of one flat directory, indexed by name without extension.
///
/// Membership is an exact, case-sensitive string match regardless of
/// how the host filesystem treats case.
#[derive(Debug, Clone)]
pub struct PictogramDirectory {
    base: PathBuf,
    names: HashSet<String>,
}

impl PictogramDirectory {
    /// Lists `base` once. An unreadable directory yields an empty index.
    pub fn scan(base: &Path) -> Self {
        let mut names = HashSet::new();
        match fs::read_dir(base) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let is_file = entry.file_type().map(|t| !t.is_dir()).unwrap_or(false);
                    if !is_file {
                        continue;
                    }
                    if let Some(name) = entry.file_name().to_str() {
                        if let Some(stem) = name.strip_suffix(EXTENSION) {
                            names.insert(stem.to_string());
                        }
                    }
                }
            }
            Err(e) => warn!("Cannot read pictogram directory {}: {}", base.display(), e),
        }
        Self {
            base: base.to_path_buf(),
            names,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// `{base}/{name}.png` if that file was listed.
    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        if self.contains(name) {
            Some(self.base.join(format!("{}{}", name, EXTENSION)))
        } else {
            None
        }
    }
}

/// Takes the first file `find` offers that `load` accepts. Rejected
/// files are remembered in `failed` and never offered again.
fn load_first<T, P, F>(mut find: P, failed: &mut HashSet<PathBuf>, load: &mut F) -> Option<(PathBuf, T)>
where
    P: FnMut(&HashSet<PathBuf>) -> Option<PathBuf>,
    F: FnMut(&Path) -> Option<T>,
{
    while let Some(path) = find(&*failed) {
        match load(&path) {
            Some(payload) => return Some((path, payload)),
            None => {
                failed.insert(path);
            }
        }
    }
    None
}

/// Maps canonical keys (alone or in adjacent pairs) to pictogram files.
pub struct PictogramResolver {
    dir: PictogramDirectory,
    policy: ResolutionPolicy,
}

impl PictogramResolver {
    pub fn new(dir: PictogramDirectory, policy: ResolutionPolicy) -> Self {
        Self { dir, policy }
    }

    /// The variant's suffixed file first, then the plain one, skipping
    /// anything in `skip`.
    fn probe(&self, name: &str, variant: PictogramVariant, skip: &HashSet<PathBuf>) -> Option<PathBuf> {
        let suffixed = variant
            .suffix()
            .and_then(|suffix| self.dir.path_for(&format!("{}{}", name, suffix)));
        suffixed
            .into_iter()
            .chain(self.dir.path_for(name))
            .find(|path| !skip.contains(path))
    }

    fn first_hit(
        &self,
        candidates: &[String],
        variant: PictogramVariant,
        skip: &HashSet<PathBuf>,
    ) -> Option<PathBuf> {
        for candidate in candidates {
            if let Some(path) = self.probe(candidate, variant, skip) {
                info!("Pictogram found for '{}': {}", candidate, path.display());
                return Some(path);
            }
        }
        None
    }

    /// Names tried for a single key, most specific first.
    fn single_candidates(&self, key: &str, previous: Option<&str>, next: Option<&str>) -> Vec<String> {
        let mut candidates = Vec::with_capacity(3);
        if self.policy == ResolutionPolicy::Pairwise {
            if let Some(prev) = previous {
                candidates.push(format!("{} {}", prev, key));
            }
            if let Some(next) = next {
                candidates.push(format!("{} {}", key, next));
            }
        }
        candidates.push(key.to_string());
        candidates
    }

    fn pair_excluding(
        &self,
        first: &str,
        second: &str,
        variant: PictogramVariant,
        skip: &HashSet<PathBuf>,
    ) -> Option<PathBuf> {
        self.first_hit(&[format!("{} {}", first, second)], variant, skip)
    }

    fn key_excluding(
        &self,
        key: &str,
        variant: PictogramVariant,
        previous: Option<&str>,
        next: Option<&str>,
        skip: &HashSet<PathBuf>,
    ) -> Option<PathBuf> {
        let candidates = self.single_candidates(key, previous, next);
        self.first_hit(&candidates, variant, skip)
    }

    /// Looks up the two-word name "`first` `second`". A miss is silent.
    pub fn resolve_pair(&self, first: &str, second: &str, variant: PictogramVariant) -> Option<PathBuf> {
        self.pair_excluding(first, second, variant, &HashSet::new())
    }

    /// Resolves one key. Under the pairwise policy the combinations with
    /// its neighbours are tried before the bare key.
    pub fn resolve(
        &self,
        key: &str,
        variant: PictogramVariant,
        previous: Option<&str>,
        next: Option<&str>,
    ) -> Option<PathBuf> {
        let hit = self.key_excluding(key, variant, previous, next, &HashSet::new());
        if hit.is_none() {
            warn!("No pictogram found for '{}'", key);
        }
        hit
    }

    /// Walks `keys` left to right, pairs first, and hands every hit to
    /// `load`. Keys with no file that `load` accepts are left out; a pair
    /// that fails to load is retried key by key.
    pub fn resolve_sequence<T, F>(
        &self,
        keys: &[CanonicalKey],
        variant: PictogramVariant,
        mut load: F,
    ) -> Vec<Resolved<T>>
    where
        F: FnMut(&Path) -> Option<T>,
    {
        let pairwise = self.policy == ResolutionPolicy::Pairwise;
        let mut resolved = Vec::with_capacity(keys.len());
        let mut failed = HashSet::new();
        let mut previous: Option<&str> = None;
        let mut i = 0;

        while i < keys.len() {
            let key = keys[i].as_str();
            let next = if pairwise { keys.get(i + 1).map(String::as_str) } else { None };

            if let Some(next) = next {
                let pair = |skip: &HashSet<PathBuf>| self.pair_excluding(key, next, variant, skip);
                if let Some((path, payload)) = load_first(pair, &mut failed, &mut load) {
                    resolved.push(Resolved {
                        source: PictogramSource::Pair(key.to_string(), next.to_string()),
                        path,
                        payload,
                    });
                    previous = Some(next);
                    i += 2;
                    continue;
                }
            }

            let single = |skip: &HashSet<PathBuf>| self.key_excluding(key, variant, previous, next, skip);
            match load_first(single, &mut failed, &mut load) {
                Some((path, payload)) => resolved.push(Resolved {
                    source: PictogramSource::Key(key.to_string()),
                    path,
                    payload,
                }),
                None => warn!("No pictogram found for '{}'", key),
            }
            previous = Some(key);
            i += 1;
        }
        resolved
    }
}
