use super::engine::CandidateScore;

/// Order surviving candidates by descending total score and truncate to the
/// configured cap. The sort is stable: candidates with equal scores keep the
/// order of the candidate snapshot, and no secondary key is introduced.
pub fn rank(mut scored: Vec<CandidateScore>, limit: usize) -> Vec<CandidateScore> {
    scored.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    scored.truncate(limit);
    scored
}
