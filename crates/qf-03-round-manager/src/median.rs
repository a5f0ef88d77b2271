//! Deterministic median computation over reported fee values.

use shared_types::FeeBps;

/// Lower median of a value set: for odd counts the middle element, for even
/// counts the lower of the two middle elements. Deterministic, no averaging.
///
/// Returns `None` on empty input.
pub fn lower_median(values: &[FeeBps]) -> Option<FeeBps> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    Some(sorted[(sorted.len() - 1) / 2])
}

/// Weighted median over `(value, weight)` samples: the smallest value whose
/// cumulative weight reaches half the total. With equal weights this reduces
/// to [`lower_median`]; the weight parameter is the extension point for
/// stake-weighted aggregation.
///
/// Returns `None` on empty input or zero total weight.
pub fn weighted_median(samples: &[(FeeBps, u64)]) -> Option<FeeBps> {
    let total: u64 = samples.iter().map(|(_, weight)| weight).sum();
    if total == 0 {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable_by_key(|(value, _)| *value);

    let mut cumulative = 0u64;
    for (value, weight) in sorted {
        cumulative += weight;
        if cumulative * 2 >= total {
            return Some(value);
        }
    }
    None
}
