use lightpath_core::game::PlayerId;

/// Best-to-worst finishing order: survivors first (tied at the top),
/// then the dead from last eliminated to first.
pub fn final_ranking(survivors: &[PlayerId], elimination_order: &[PlayerId]) -> Vec<PlayerId> {
    survivors
        .iter()
        .chain(elimination_order.iter().rev())
        .copied()
        .collect()
}

/// Points for each ranked player, looked up by position in `table`.
/// Positions past the end of the table earn nothing.
pub fn rank_points(ranking: &[PlayerId], table: &[u32]) -> Vec<(PlayerId, u32)> {
    ranking
        .iter()
        .enumerate()
        .map(|(pos, &id)| (id, table.get(pos).copied().unwrap_or(0)))
        .collect()
}

/// Whether the session is over for these cumulative scores.
///
/// The leader must reach `winning_score` and lead the runner-up by at
/// least `margin`. With fewer than two scores the margin clause holds
/// vacuously.
pub fn is_session_won(scores: &[u32], winning_score: u32, margin: u32) -> bool {
    let mut sorted = scores.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    match sorted.as_slice() {
        [] => false,
        [highest] => *highest >= winning_score,
        [highest, second, ..] => *highest >= winning_score && highest - second >= margin,
    }
}

/// Player with the highest score; earliest entry wins ties.
pub fn leader(scores: &[(PlayerId, u32)]) -> Option<PlayerId> {
    scores
        .iter()
        .fold(None, |best: Option<(PlayerId, u32)>, &(id, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((id, score)),
        })
        .map(|(id, _)| id)
}
