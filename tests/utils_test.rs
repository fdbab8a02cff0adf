mod common;

use std::collections::HashMap;

use axum::http::StatusCode;
use sporlapi::{
    api::{
        FromQuery, IdsQuery, PROBE_TRACK_IDS, ProbeIdsQuery, ProbeSearchQuery,
        RecommendationQuery, SearchQuery, TrackSeededQuery,
    },
    utils::*,
};

use common::{features, track};

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_param_trims_and_drops_blanks() {
    let params = query(&[("q", "  queen "), ("empty", "   ")]);

    assert_eq!(param(&params, "q"), Some("queen"));
    assert_eq!(param(&params, "empty"), None);
    assert_eq!(param(&params, "missing"), None);
}

#[test]
fn test_required_param_names_the_parameter() {
    let err = required_param(&query(&[]), "ids").unwrap_err();

    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "Query parameter \"ids\" is required");
}

#[test]
fn test_parse_limit() {
    assert_eq!(parse_limit(&query(&[]), 10).unwrap(), 10);
    assert_eq!(parse_limit(&query(&[("limit", "3")]), 10).unwrap(), 3);
    assert_eq!(parse_limit(&query(&[("limit", " ")]), 7).unwrap(), 7);
    // not clamped
    assert_eq!(parse_limit(&query(&[("limit", "500")]), 10).unwrap(), 500);

    for bad in ["ten", "-1", "2.5"] {
        let err = parse_limit(&query(&[("limit", bad)]), 10).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}

#[test]
fn test_split_ids() {
    assert_eq!(split_ids("a,b,c"), vec!["a", "b", "c"]);
    assert_eq!(split_ids(" a , ,b,"), vec!["a", "b"]);
    assert!(split_ids(",,").is_empty());
}

#[test]
fn test_summarize_track() {
    let summary = summarize_track(&track("a", "Queen", 77));

    assert_eq!(summary.id, "a");
    assert_eq!(summary.name, "Track a");
    assert_eq!(summary.artist, "Queen");
    assert_eq!(summary.album, "Album a");
    assert_eq!(summary.image.as_deref(), Some("https://i.scdn.co/image/a"));
    assert_eq!(summary.popularity, 77);
}

#[test]
fn test_summarize_track_without_artists_or_images() {
    let mut t = track("a", "Queen", 10);
    t.artists.clear();
    t.album.images.clear();

    let summary = summarize_track(&t);

    assert_eq!(summary.artist, "");
    assert_eq!(summary.image, None);
}

#[test]
fn test_align_features_by_position() {
    let tracks = vec![track("a", "A", 1), track("b", "B", 1)];
    let feats = vec![Some(features("a", 0.1, 0.1, 0.1, 0.1)), None];

    let aligned = align_features(&tracks, &feats);

    assert_eq!(aligned[0].as_ref().map(|f| f.id.as_str()), Some("a"));
    assert_eq!(aligned[1], None);
}

#[test]
fn test_align_features_falls_back_to_id_lookup() {
    let tracks = vec![track("a", "A", 1), track("b", "B", 1), track("c", "C", 1)];
    let feats = vec![
        Some(features("b", 0.2, 0.2, 0.2, 0.2)),
        Some(features("a", 0.1, 0.1, 0.1, 0.1)),
    ];

    let aligned = align_features(&tracks, &feats);
    let ids: Vec<Option<&str>> = aligned
        .iter()
        .map(|f| f.as_ref().map(|f| f.id.as_str()))
        .collect();

    assert_eq!(ids, vec![Some("a"), Some("b"), None]);
}

#[test]
fn test_token_prefix() {
    assert_eq!(token_prefix("BQDabcdefghijkl", 10), "BQDabcdefg");
    assert_eq!(token_prefix("short", 10), "short");
}

#[test]
fn test_search_query_defaults() {
    let q = SearchQuery::<10>::from_query(&query(&[("q", "queen")])).unwrap();
    assert_eq!(q.q, "queen");
    assert_eq!(q.limit, 10);

    let q = SearchQuery::<5>::from_query(&query(&[("q", "queen"), ("limit", "2")])).unwrap();
    assert_eq!(q.limit, 2);

    assert!(SearchQuery::<5>::from_query(&query(&[("limit", "2")])).is_err());
}

#[test]
fn test_ids_query() {
    let q = IdsQuery::from_query(&query(&[("ids", "a,b")])).unwrap();
    assert_eq!(q.ids, vec!["a", "b"]);

    assert!(IdsQuery::from_query(&query(&[("ids", ",")])).is_err());
    assert!(IdsQuery::from_query(&query(&[])).is_err());
}

#[test]
fn test_recommendation_query_defaults_and_targets() {
    let q = RecommendationQuery::from_query(&query(&[
        ("seed_tracks", "t1,t2"),
        ("target_valence", "0.3"),
        ("target_unknown", "1"),
    ]))
    .unwrap();

    assert_eq!(q.limit, 15);
    assert_eq!(q.market, "BR");
    assert_eq!(
        q.targets,
        vec![("target_valence".to_string(), "0.3".to_string())]
    );

    let params = q.upstream_params();
    assert!(params.contains(&("seed_tracks".to_string(), "t1,t2".to_string())));
    assert!(!params.iter().any(|(k, _)| k == "target_unknown"));
}

#[test]
fn test_recommendation_query_needs_any_seed() {
    assert!(RecommendationQuery::from_query(&query(&[("market", "US")])).is_err());
    assert!(RecommendationQuery::from_query(&query(&[("seed_artists", "x")])).is_ok());
    assert!(RecommendationQuery::from_query(&query(&[("seed_genres", "rock")])).is_ok());
}

#[test]
fn test_track_seeded_query() {
    let q = TrackSeededQuery::from_query(&query(&[
        ("seed_tracks", " first ,second"),
        ("seed_genres", "rock"),
    ]))
    .unwrap();

    assert_eq!(q.primary_seed().as_deref(), Some("first"));
    assert_eq!(q.0.seed_genres, None);

    assert!(TrackSeededQuery::from_query(&query(&[("seed_genres", "rock")])).is_err());
}

#[test]
fn test_probe_queries_have_defaults() {
    let q = ProbeSearchQuery::from_query(&query(&[])).unwrap();
    assert_eq!(q.q, "test");

    let q = ProbeIdsQuery::from_query(&query(&[])).unwrap();
    assert_eq!(q.ids, PROBE_TRACK_IDS.to_vec());

    let q = ProbeIdsQuery::from_query(&query(&[("ids", "x")])).unwrap();
    assert_eq!(q.ids, vec!["x"]);
}
