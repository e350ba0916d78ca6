// Unit tests for the kindred discovery core

use std::collections::HashSet;

use chrono::Utc;
use kindred::core::{build_filter, normalize_tags, resolve, tags_intersect};
use kindred::error::AppError;
use kindred::models::{CandidateSearchRequest, Gender, SwipeFilter, User};

fn create_user(id: i32, age: i32, gender: Gender, tags: &str) -> User {
    User {
        id,
        email: format!("user{}@test.com", id),
        password_digest: String::new(),
        password_salt: String::new(),
        name: format!("User {}", id),
        gender,
        age,
        location: Some("SF".to_string()),
        bio: None,
        tags: normalize_tags(tags),
        photo_url: None,
        created_at: Utc::now(),
    }
}

#[test]
fn test_normalize_tags_basic() {
    assert_eq!(normalize_tags("hiking,coffee"), vec!["hiking", "coffee"]);
}

#[test]
fn test_normalize_tags_whitespace_and_empties() {
    assert_eq!(
        normalize_tags(" hiking , ,coffee ,, wine "),
        vec!["hiking", "coffee", "wine"]
    );
    assert!(normalize_tags(",, ,").is_empty());
}

#[test]
fn test_normalize_tags_case_preserved() {
    assert_eq!(normalize_tags("Rock Climbing"), vec!["Rock Climbing"]);
}

#[test]
fn test_build_filter_passthrough() {
    let req = CandidateSearchRequest {
        gender: Some(Gender::Female),
        min_age: Some(25),
        max_age: Some(35),
        tags: Some(vec!["hiking".to_string()]),
    };

    let filter = build_filter(&req).unwrap();
    assert_eq!(filter.gender, Some(Gender::Female));
    assert_eq!(filter.min_age, Some(25));
    assert_eq!(filter.max_age, Some(35));
    assert_eq!(filter.tags, Some(vec!["hiking".to_string()]));
}

#[test]
fn test_build_filter_inverted_range_rejected() {
    let req = CandidateSearchRequest {
        min_age: Some(36),
        max_age: Some(25),
        ..Default::default()
    };
    assert!(matches!(build_filter(&req), Err(AppError::Validation(_))));
}

#[test]
fn test_build_filter_underage_rejected() {
    for (min_age, max_age) in [(Some(17), None), (None, Some(16))] {
        let req = CandidateSearchRequest {
            min_age,
            max_age,
            ..Default::default()
        };
        assert!(build_filter(&req).is_err());
    }
}

#[test]
fn test_tags_intersect_any_overlap() {
    let candidate = vec!["hiking".to_string(), "coffee".to_string()];
    assert!(tags_intersect(&candidate, &["HIKING".to_string()]));
    assert!(!tags_intersect(&candidate, &["sailing".to_string()]));
    assert!(!tags_intersect(&[], &["hiking".to_string()]));
}

#[test]
fn test_resolve_scenario_ten_user_pool() {
    // Filter {gender: female, 25-35, tags: [hiking]} against 10 users
    let pool = vec![
        create_user(1, 28, Gender::Female, "hiking,coffee"), // requester
        create_user(2, 27, Gender::Female, "hiking"),        // match
        create_user(3, 31, Gender::Female, "hiking,yoga"),   // match
        create_user(4, 24, Gender::Female, "hiking"),        // too young
        create_user(5, 36, Gender::Female, "hiking"),        // too old
        create_user(6, 30, Gender::Female, "coffee"),        // no shared tag
        create_user(7, 30, Gender::Male, "hiking"),          // wrong gender
        create_user(8, 25, Gender::Female, "Hiking"),        // match (case-insensitive tag)
        create_user(9, 35, Gender::Other, "hiking"),         // wrong gender
        create_user(10, 33, Gender::Female, ""),             // no tags
    ];

    let filter = SwipeFilter {
        gender: Some(Gender::Female),
        min_age: Some(25),
        max_age: Some(35),
        tags: Some(vec!["hiking".to_string()]),
    };

    let result = resolve(1, pool, &HashSet::new(), &filter);

    let ids: Vec<i32> = result.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 3, 8]);
}

#[test]
fn test_resolve_excludes_swiped_regardless_of_direction() {
    let pool = vec![
        create_user(2, 25, Gender::Female, ""),
        create_user(3, 25, Gender::Female, ""),
        create_user(4, 25, Gender::Female, ""),
    ];
    // 2 was passed, 3 was liked; both stay excluded
    let swiped: HashSet<i32> = [2, 3].into_iter().collect();

    let result = resolve(1, pool, &swiped, &SwipeFilter::default());
    let ids: Vec<i32> = result.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![4]);
}

#[test]
fn test_resolve_empty_pool_is_not_an_error() {
    let result = resolve(1, vec![], &HashSet::new(), &SwipeFilter::default());
    assert!(result.is_empty());
}

#[test]
fn test_resolve_repeated_calls_stable_order() {
    let make_pool = || {
        vec![
            create_user(8, 30, Gender::Male, "chess"),
            create_user(3, 26, Gender::Male, "chess"),
            create_user(12, 41, Gender::Male, "chess"),
        ]
    };
    let filter = SwipeFilter {
        gender: Some(Gender::Male),
        ..Default::default()
    };
    let swiped = HashSet::new();

    let a = resolve(1, make_pool(), &swiped, &filter);
    let b = resolve(1, make_pool(), &swiped, &filter);

    assert_eq!(
        a.iter().map(|c| c.id).collect::<Vec<_>>(),
        b.iter().map(|c| c.id).collect::<Vec<_>>()
    );
    assert_eq!(a.iter().map(|c| c.id).collect::<Vec<_>>(), vec![3, 8, 12]);
}

#[test]
fn test_unconstrained_filter_passes_everyone_but_requester() {
    let pool: Vec<User> = (1..=5)
        .map(|i| create_user(i, 20 + i, Gender::Other, ""))
        .collect();

    let result = resolve(3, pool, &HashSet::new(), &SwipeFilter::default());
    let ids: Vec<i32> = result.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5]);
}
