//! C11 steps 5-6: reciprocal-rank fusion across the vector and keyword arms,
//! plus the definition-score boost. Adapted from the teacher's
//! `rrf_fuse()`/`RRF_K`, re-keyed by `(file_path, location)` since the new
//! `Chunk` carries no synthetic id the way the old `CodeChunk` did.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::models::{Chunk, MatchType, SearchResult};

pub const RRF_K: f32 = 60.0;
pub const DEFINITION_BOOST: f32 = 2.0;

fn fuse_key(chunk: &Chunk) -> String {
    format!(
        "{}:{}:{}",
        chunk.file_path, chunk.location.start_line, chunk.location.end_line
    )
}

struct Fused {
    chunk: Chunk,
    score: f32,
    vector_score: Option<f32>,
    keyword_score: Option<f32>,
    both: bool,
}

/// Fuses two rank-ordered result lists (best first) into one, applying the
/// definition boost and re-sorting, then truncates to `limit` (spec §4.11
/// steps 5-7, minus the `min_score` cutoff which the caller applies after
/// fusion since it operates on the final fused score).
pub fn rrf_fuse(vector: Vec<SearchResult>, keyword: Vec<SearchResult>, limit: usize) -> Vec<SearchResult> {
    let mut fused: HashMap<String, Fused> = HashMap::new();

    for (rank, result) in vector.into_iter().enumerate() {
        let key = fuse_key(&result.chunk);
        let contribution = 1.0 / (RRF_K + (rank + 1) as f32);
        let entry = fused.entry(key).or_insert_with(|| Fused {
            chunk: result.chunk.clone(),
            score: 0.0,
            vector_score: None,
            keyword_score: None,
            both: false,
        });
        entry.score += contribution;
        entry.vector_score = Some(result.score);
    }

    for (rank, result) in keyword.into_iter().enumerate() {
        let key = fuse_key(&result.chunk);
        let contribution = 1.0 / (RRF_K + (rank + 1) as f32);
        match fused.get_mut(&key) {
            Some(entry) => {
                entry.score += contribution;
                entry.keyword_score = Some(result.score);
                entry.both = true;
            }
            None => {
                fused.insert(
                    key,
                    Fused {
                        chunk: result.chunk.clone(),
                        score: contribution,
                        vector_score: None,
                        keyword_score: Some(result.score),
                        both: false,
                    },
                );
            }
        }
    }

    let mut entries: Vec<Fused> = fused.into_values().collect();

    for entry in entries.iter_mut() {
        if entry.chunk.symbol.is_some() {
            entry.score *= DEFINITION_BOOST;
        }
    }

    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.both.cmp(&a.both))
            .then_with(|| {
                b.vector_score
                    .unwrap_or(f32::MIN)
                    .partial_cmp(&a.vector_score.unwrap_or(f32::MIN))
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| {
                (a.chunk.file_path.as_str(), a.chunk.location.start_line, a.chunk.location.end_line).cmp(&(
                    b.chunk.file_path.as_str(),
                    b.chunk.location.start_line,
                    b.chunk.location.end_line,
                ))
            })
    });

    entries
        .into_iter()
        .take(limit)
        .map(|entry| SearchResult {
            chunk: entry.chunk,
            score: entry.score,
            match_type: if entry.both {
                MatchType::Hybrid
            } else if entry.keyword_score.is_some() {
                MatchType::Keyword
            } else {
                MatchType::Vector
            },
            vector_score: entry.vector_score,
            keyword_score: entry.keyword_score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ChunkLocation;

    fn chunk(path: &str, line: u32) -> Chunk {
        Chunk::new(path, ChunkLocation::new(line, line), "content", "rust", "function")
    }

    #[test]
    fn hybrid_ranking_matches_the_literal_scenario() {
        // Both results appear in both arms: vector ranks 1,3; keyword ranks 2,1.
        let a = chunk("a.rs", 1);
        let b = chunk("b.rs", 2);

        let vector = vec![SearchResult::vector(a.clone(), 0.9), SearchResult::vector(b.clone(), 0.5)];
        let keyword = vec![SearchResult::keyword(b.clone(), 0.8), SearchResult::keyword(a.clone(), 0.6)];

        let fused = rrf_fuse(vector, keyword, 10);
        assert_eq!(fused.len(), 2);
        // a: 1/61 (vector rank1) + 1/62 (keyword rank2); b: 1/63 (keyword rank1) + 1/62 (vector rank2)
        let score_a = 1.0 / 61.0 + 1.0 / 62.0;
        let score_b = 1.0 / 63.0 + 1.0 / 62.0;
        assert!(score_a > score_b);
        assert_eq!(fused[0].chunk.file_path, "a.rs");
        assert_eq!(fused[0].match_type, MatchType::Hybrid);
    }

    #[test]
    fn definition_boost_reorders_results() {
        let non_def = chunk("a.rs", 1);
        let mut def = chunk("b.rs", 2);
        def.symbol = Some(crate::domain::models::SymbolMetadata {
            kind: crate::domain::models::SymbolKind::Function,
            name: "foo".into(),
            signature: None,
        });

        let vector = vec![SearchResult::vector(non_def.clone(), 0.6)];
        let keyword = vec![SearchResult::keyword(def.clone(), 0.4)];

        let fused = rrf_fuse(vector, keyword, 10);
        let def_score = fused.iter().find(|r| r.chunk.file_path == "b.rs").unwrap().score;
        let non_def_score = fused.iter().find(|r| r.chunk.file_path == "a.rs").unwrap().score;
        // The definition chunk's lone rank-1 contribution got doubled; the
        // non-definition chunk's lone rank-1 contribution did not.
        assert!((def_score - 2.0 * (1.0 / 61.0)).abs() < 1e-6);
        assert!((non_def_score - 1.0 / 61.0).abs() < 1e-6);
        assert!(def_score > non_def_score);
    }
}
