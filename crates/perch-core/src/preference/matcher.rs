//! Preference matching cascade.
//!
//! Stored model paths go stale when assets are moved or renamed, so a record
//! is looked up by a fixed sequence of increasingly loose strategies. Each
//! strategy is an independent pure predicate; the first strategy that accepts
//! any record decides, and within it the first record in input order wins.

use std::collections::HashSet;

use super::model::PreferenceRecord;

/// Descriptor suffixes stripped from the last path segment when deriving a
/// model name token.
pub const MODEL_DESCRIPTOR_SUFFIXES: [&str; 2] = [".model3.json", ".model.json"];

/// Minimum number of shared path segments for [`MatchStrategy::PathOverlap`].
pub const MIN_COMMON_SEGMENTS: usize = 2;

/// The match strategies, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStrategy {
    /// `record.model_path == requested`
    Exact,
    /// Last path segments are equal and non-empty.
    Basename,
    /// The derived model name token occurs in `record.model_path`.
    NameToken,
    /// The non-empty segment sets share at least [`MIN_COMMON_SEGMENTS`] entries.
    PathOverlap,
}

impl MatchStrategy {
    pub const CASCADE: [MatchStrategy; 4] = [
        MatchStrategy::Exact,
        MatchStrategy::Basename,
        MatchStrategy::NameToken,
        MatchStrategy::PathOverlap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::Basename => "basename",
            MatchStrategy::NameToken => "name_token",
            MatchStrategy::PathOverlap => "path_overlap",
        }
    }

    /// Returns whether `candidate` (a stored model path) is accepted for the
    /// requested identity under this strategy.
    pub fn accepts(&self, requested: &RequestedIdentity<'_>, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }
        match self {
            MatchStrategy::Exact => candidate == requested.raw,
            MatchStrategy::Basename => {
                let theirs = basename(candidate);
                !requested.basename.is_empty() && !theirs.is_empty() && requested.basename == theirs
            }
            MatchStrategy::NameToken => requested
                .name_token
                .is_some_and(|token| candidate.contains(token)),
            MatchStrategy::PathOverlap => {
                let theirs: HashSet<&str> = segments(candidate).collect();
                requested.segments.intersection(&theirs).count() >= MIN_COMMON_SEGMENTS
            }
        }
    }
}

/// The requested model identity, pre-split once for all strategies.
#[derive(Debug, Clone)]
pub struct RequestedIdentity<'a> {
    raw: &'a str,
    basename: &'a str,
    name_token: Option<&'a str>,
    segments: HashSet<&'a str>,
}

impl<'a> RequestedIdentity<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            basename: basename(raw),
            name_token: derive_name_token(raw),
            segments: segments(raw).collect(),
        }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn name_token(&self) -> Option<&'a str> {
        self.name_token
    }
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'a> {
    None,
    Resolved(&'a PreferenceRecord),
}

impl<'a> MatchResult<'a> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, MatchResult::Resolved(_))
    }

    pub fn record(&self) -> Option<&'a PreferenceRecord> {
        match self {
            MatchResult::Resolved(record) => Some(record),
            MatchResult::None => None,
        }
    }
}

/// Resolves the preference record for `requested` out of `records`.
pub fn resolve<'a>(requested: &str, records: &'a [PreferenceRecord]) -> MatchResult<'a> {
    match resolve_with_strategy(requested, records) {
        Some((_, record)) => MatchResult::Resolved(record),
        None => MatchResult::None,
    }
}

/// Same cascade as [`resolve`], also reporting which strategy decided.
/// Intended for diagnostics and logging.
pub fn resolve_with_strategy<'a>(
    requested: &str,
    records: &'a [PreferenceRecord],
) -> Option<(MatchStrategy, &'a PreferenceRecord)> {
    if records.is_empty() {
        return None;
    }
    let identity = RequestedIdentity::new(requested);

    MatchStrategy::CASCADE.iter().find_map(|strategy| {
        records
            .iter()
            .find(|record| strategy.accepts(&identity, &record.model_path))
            .map(|record| (*strategy, record))
    })
}

/// Final `/`-separated segment; empty when the path ends with `/`.
fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Second-to-last non-empty segment, or the last one with its descriptor
/// suffix removed when the path has a single segment.
fn derive_name_token(path: &str) -> Option<&str> {
    let parts: Vec<&str> = segments(path).collect();
    let token = match parts.as_slice() {
        [] => return None,
        [only] => strip_descriptor_suffix(*only),
        [.., parent, _] => *parent,
    };
    (!token.is_empty()).then_some(token)
}

fn strip_descriptor_suffix(segment: &str) -> &str {
    MODEL_DESCRIPTOR_SUFFIXES
        .iter()
        .find_map(|suffix| segment.strip_suffix(*suffix))
        .unwrap_or(segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::model::Vec2;

    fn rec(path: &str) -> PreferenceRecord {
        PreferenceRecord::new(path, Vec2::new(0.0, 0.0), Vec2::splat(1.0))
    }

    #[test]
    fn test_empty_records_resolve_to_none() {
        assert_eq!(resolve("/a/b.model3.json", &[]), MatchResult::None);
    }

    #[test]
    fn test_exact_match_wins_over_basename() {
        let records = vec![
            rec("/a/b/Model/Model.model3.json"),
            rec("/x/Model/Model.model3.json"),
        ];
        let (strategy, record) =
            resolve_with_strategy("/a/b/Model/Model.model3.json", &records).unwrap();
        assert_eq!(strategy, MatchStrategy::Exact);
        assert!(std::ptr::eq(record, &records[0]));
    }

    #[test]
    fn test_exact_match_later_in_list_beats_earlier_basename() {
        let records = vec![
            rec("/x/Model/Model.model3.json"),
            rec("/a/b/Model/Model.model3.json"),
        ];
        let result = resolve("/a/b/Model/Model.model3.json", &records);
        assert_eq!(result.record(), Some(&records[1]));
    }

    #[test]
    fn test_basename_fallback() {
        let records = vec![rec("/old/Foo/Foo.model3.json")];
        let (strategy, _) = resolve_with_strategy("/new/Foo/Foo.model3.json", &records).unwrap();
        assert_eq!(strategy, MatchStrategy::Basename);
    }

    #[test]
    fn test_basename_requires_non_empty_segment() {
        let records = vec![rec("/old/Foo/")];
        assert_eq!(
            resolve_with_strategy("/new/Bar/", &records).map(|(s, _)| s),
            None
        );
    }

    #[test]
    fn test_name_token_from_parent_directory() {
        let records = vec![rec("/archive/Hiyori_v2/hiyori_pro.model3.json")];
        let (strategy, _) =
            resolve_with_strategy("/static/Hiyori/Hiyori.model3.json", &records).unwrap();
        assert_eq!(strategy, MatchStrategy::NameToken);
    }

    #[test]
    fn test_name_token_from_single_segment_strips_suffix() {
        let identity = RequestedIdentity::new("Mao.model3.json");
        assert_eq!(identity.name_token(), Some("Mao"));

        let legacy = RequestedIdentity::new("/Haru.model.json");
        assert_eq!(legacy.name_token(), Some("Haru"));

        let records = vec![rec("/models/Mao/other.json")];
        let (strategy, _) = resolve_with_strategy("Mao.model3.json", &records).unwrap();
        assert_eq!(strategy, MatchStrategy::NameToken);
    }

    #[test]
    fn test_name_token_absent_for_bare_suffix() {
        assert_eq!(RequestedIdentity::new(".model3.json").name_token(), None);
        assert_eq!(RequestedIdentity::new("").name_token(), None);
    }

    #[test]
    fn test_partial_overlap_floor() {
        let matching = vec![rec("/x/b/y/d")];
        assert!(resolve("/a/b/c/d", &matching).is_resolved());

        // Same segment set, reordered so only the overlap strategy applies.
        let reordered = vec![rec("/x/d/y/b")];
        let (strategy, _) = resolve_with_strategy("/a/b/c/d", &reordered).unwrap();
        assert_eq!(strategy, MatchStrategy::PathOverlap);

        let too_few = vec![rec("/x/b/y/z")];
        assert_eq!(resolve("/a/b/c/d", &too_few), MatchResult::None);
    }

    #[test]
    fn test_overlap_counts_distinct_segments() {
        // "b" repeated on the requested side is still one shared segment.
        let records = vec![rec("/q/b/r/s")];
        assert_eq!(resolve("/b/b/t/u", &records), MatchResult::None);
    }

    #[test]
    fn test_empty_model_path_never_matches() {
        let records = vec![rec("")];
        assert_eq!(resolve("", &records), MatchResult::None);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let records = vec![
            rec("/one/Foo/Foo.model3.json"),
            rec("/two/Foo/Foo.model3.json"),
            rec("/three/Bar/Bar.model3.json"),
        ];
        let first = resolve("/new/Foo/Foo.model3.json", &records);
        for _ in 0..10 {
            assert_eq!(resolve("/new/Foo/Foo.model3.json", &records), first);
        }
        assert_eq!(first.record(), Some(&records[0]));
    }
}
