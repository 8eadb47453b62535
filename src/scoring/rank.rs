use super::engine::ScoredVendor;

/// Order of `scored` by total descending.
///
/// Returns positions into `scored`. The sort is stable, so vendors with equal
/// totals keep their original row order.
pub fn rank_order(scored: &[ScoredVendor]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scored.len()).collect();
    order.sort_by(|&a, &b| scored[b].total.total_cmp(&scored[a].total));
    order
}
