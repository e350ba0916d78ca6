use crate::error::AppError;
use crate::models::{CandidateSearchRequest, SwipeFilter, User};

/// Split a comma-separated tag string into normalized tags: trimmed,
/// empties dropped, case preserved, duplicates removed (first wins).
pub fn normalize_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let tag = part.trim();
        if tag.is_empty() {
            continue;
        }
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Normalize a list of raw tag entries. Each entry may itself be
/// comma-separated, so client-side pre-split input and raw text both land
/// in the same canonical form.
pub fn normalize_tag_entries(entries: &[String]) -> Vec<String> {
    let joined = entries.join(",");
    normalize_tags(&joined)
}

/// Build a canonical [`SwipeFilter`] from raw search criteria.
///
/// Rejects inverted or underage age bounds; an empty normalized tag set
/// imposes no tag constraint. No side effects.
pub fn build_filter(req: &CandidateSearchRequest) -> Result<SwipeFilter, AppError> {
    for age in [req.min_age, req.max_age].into_iter().flatten() {
        if age < 18 {
            return Err(AppError::Validation(
                "Age filter must be at least 18".to_string(),
            ));
        }
    }

    if let (Some(min), Some(max)) = (req.min_age, req.max_age) {
        if min > max {
            return Err(AppError::Validation(format!(
                "min_age ({}) must not exceed max_age ({})",
                min, max
            )));
        }
    }

    let tags = req
        .tags
        .as_deref()
        .map(normalize_tag_entries)
        .filter(|t| !t.is_empty());

    Ok(SwipeFilter {
        gender: req.gender,
        min_age: req.min_age,
        max_age: req.max_age,
        tags,
    })
}

/// Check whether a candidate satisfies every specified filter constraint.
#[inline]
pub fn matches_filter(candidate: &User, filter: &SwipeFilter) -> bool {
    if let Some(gender) = filter.gender {
        if candidate.gender != gender {
            return false;
        }
    }

    if let Some(min_age) = filter.min_age {
        if candidate.age < min_age {
            return false;
        }
    }

    if let Some(max_age) = filter.max_age {
        if candidate.age > max_age {
            return false;
        }
    }

    if let Some(tags) = &filter.tags {
        if !tags_intersect(&candidate.tags, tags) {
            return false;
        }
    }

    true
}

/// At least one candidate tag matches a filter tag, case-insensitively.
#[inline]
pub fn tags_intersect(candidate_tags: &[String], filter_tags: &[String]) -> bool {
    candidate_tags
        .iter()
        .any(|ct| filter_tags.iter().any(|ft| ct.eq_ignore_ascii_case(ft)))
}
