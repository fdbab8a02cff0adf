//! Audio feature similarity and the simulated-feature fallback.

use std::cmp::Reverse;

use rand::Rng;

use crate::types::{AudioFeatures, FeatureVector, ScoredTrack, SimulatedFeatures, TrackSummary};

/// Lowest score ever reported. Anything less similar is clamped up to it.
pub const SIMILARITY_FLOOR: u8 = 70;

/// Scores how close `candidate` sounds to `seed`, from 70 to 100.
///
/// Only energy, danceability, valence and acousticness take part; tempo and
/// instrumentalness are ignored. The score is the rounded complement of the
/// mean absolute difference over those four, floored at 70, so it only
/// separates tracks in the top quartile.
///
/// Returns `None` when either vector is missing.
pub fn similarity_score(
    candidate: Option<&FeatureVector>,
    seed: Option<&FeatureVector>,
) -> Option<u8> {
    let (c, s) = (candidate?, seed?);

    let avg_diff = [
        (c.energy - s.energy).abs(),
        (c.danceability - s.danceability).abs(),
        (c.valence - s.valence).abs(),
        (c.acousticness - s.acousticness).abs(),
    ]
    .iter()
    .sum::<f64>()
        / 4.0;

    let raw = ((1.0 - avg_diff) * 100.0).round();
    // max/min rather than clamp so a NaN input lands on the floor
    Some(raw.max(SIMILARITY_FLOOR as f64).min(100.0) as u8)
}

/// Attaches a similarity score to every recommendation and orders them.
///
/// `tracks` and `features` correspond by position. Without seed features
/// every score is `None` and the upstream order is kept. With them the list is
/// sorted by descending score; the sort is stable so equal scores keep their
/// upstream order, and tracks without features sort as if they scored 0.
pub fn rank_by_similarity(
    tracks: Vec<TrackSummary>,
    features: Vec<Option<AudioFeatures>>,
    seed: Option<&AudioFeatures>,
) -> Vec<ScoredTrack> {
    let seed_vector = seed.map(FeatureVector::from);

    let mut scored: Vec<ScoredTrack> = tracks
        .into_iter()
        .zip(features)
        .map(|(track, audio_features)| {
            let vector = audio_features.as_ref().map(FeatureVector::from);
            ScoredTrack {
                similarity: similarity_score(vector.as_ref(), seed_vector.as_ref()),
                track,
                audio_features,
            }
        })
        .collect();

    if seed_vector.is_some() {
        scored.sort_by_key(|t| Reverse(t.similarity.unwrap_or(0)));
    }

    scored
}

/// Makes up a plausible feature vector from a track's popularity.
///
/// This is NOT measured data. It backs `/api/search-simple` for when the audio
/// features endpoint is unavailable, and the result is always flagged as
/// simulated. More popular tracks lean more energetic, danceable and faster;
/// every value gets bounded noise on top.
pub fn simulate_features<R: Rng + ?Sized>(popularity: u32, rng: &mut R) -> SimulatedFeatures {
    let p = popularity.min(100) as f64 / 100.0;

    let features = FeatureVector {
        energy: unit(0.3 + 0.4 * p + rng.random_range(-0.15..=0.15)),
        danceability: unit(0.4 + 0.3 * p + rng.random_range(-0.15..=0.15)),
        valence: unit(0.5 + rng.random_range(-0.3..=0.3)),
        acousticness: unit(0.5 - 0.3 * p + rng.random_range(-0.2..=0.2)),
        instrumentalness: unit(rng.random_range(0.0..0.3)),
        tempo: round_to(90.0 + 40.0 * p + rng.random_range(-20.0..=20.0), 1),
    };

    SimulatedFeatures {
        features,
        simulated: true,
    }
}

fn unit(value: f64) -> f64 {
    round_to(value.clamp(0.0, 1.0), 3)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
