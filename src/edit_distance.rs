//! Edit distances for "did you mean" suggestions.

/// Levenshtein distance between `a` and `b`, or `None` when it exceeds
/// `limit`.
pub fn edit_distance(a: &str, b: &str, limit: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // The distance is at least the difference in lengths.
    if a.len().abs_diff(b.len()) > limit {
        return None;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let insertion = current[j] + 1;
            let deletion = prev[j + 1] + 1;
            current[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    let distance = prev[b.len()];
    (distance <= limit).then_some(distance)
}

/// Finds the candidate closest to `lookup`, if any is close enough.
///
/// A case-insensitive exact match wins outright. Otherwise the candidate with
/// the smallest edit distance within `dist` is returned; when `dist` is
/// `None` the threshold is a third of the lookup's length. Ties go to the
/// earlier candidate.
pub fn find_best_match_for_name(
    candidates: &[&str],
    lookup: &str,
    dist: Option<usize>,
) -> Option<String> {
    let lookup_lowercase = lookup.to_lowercase();
    if let Some(exact) = candidates
        .iter()
        .find(|candidate| candidate.to_lowercase() == lookup_lowercase)
    {
        return Some((*exact).to_owned());
    }

    let dist = dist.unwrap_or_else(|| std::cmp::max(lookup.len(), 3) / 3);
    let mut best: Option<(usize, &str)> = None;
    for &candidate in candidates {
        if let Some(d) = edit_distance(candidate, lookup, dist) {
            match best {
                Some((best_d, _)) if best_d <= d => {}
                _ => best = Some((d, candidate)),
            }
        }
    }
    best.map(|(_, candidate)| candidate.to_owned())
}
