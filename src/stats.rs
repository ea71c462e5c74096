//! Order statistics over small integer multisets, plus tie-preserving
//! argmax/argmin. The mode is explicit about ambiguity: when no value
//! strictly repeats most often there is no mode, not an arbitrary pick.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub min: u32,
    pub max: u32,
    pub mean: f64,
    pub median: f64,
    pub mode: Option<u32>,
}

/// Min/max/mean/median/mode of a multiset; `None` for an empty input.
pub fn summarize(values: &[u32]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let mean = sorted.iter().map(|&v| v as f64).sum::<f64>() / sorted.len() as f64;
    Some(Summary {
        min,
        max,
        mean,
        median: median_of_sorted(&sorted),
        mode: mode(values),
    })
}

fn median_of_sorted(sorted: &[u32]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
    }
}

/// Most frequent value, or `None` when the top frequency is shared.
pub fn mode(values: &[u32]) -> Option<u32> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let top = counts.values().copied().max()?;
    let mut tied = counts.iter().filter(|(_, &count)| count == top);
    let (&value, _) = tied.next()?;
    if tied.next().is_some() {
        None
    } else {
        Some(value)
    }
}

/// Maximum value and every key attaining it; `None` for an empty input.
/// Ties are kept as a set, never collapsed to a single key.
pub fn arg_max<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Option<(V, Vec<K>)>
where
    V: PartialOrd + Copy,
{
    let mut iter = items.into_iter();
    let (key, value) = iter.next()?;
    let mut best = value;
    let mut keys = vec![key];
    for (key, value) in iter {
        if value > best {
            best = value;
            keys = vec![key];
        } else if value == best {
            keys.push(key);
        }
    }
    Some((best, keys))
}

/// Mirror of [`arg_max`] for the minimum.
pub fn arg_min<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Option<(V, Vec<K>)>
where
    V: PartialOrd + Copy,
{
    let mut iter = items.into_iter();
    let (key, value) = iter.next()?;
    let mut best = value;
    let mut keys = vec![key];
    for (key, value) in iter {
        if value < best {
            best = value;
            keys = vec![key];
        } else if value == best {
            keys.push(key);
        }
    }
    Some((best, keys))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_odd_count() {
        let summary = summarize(&[2, 0, 0]).unwrap();
        assert_eq!(summary.min, 0);
        assert_eq!(summary.max, 2);
        assert!((summary.mean - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.median, 0.0);
        assert_eq!(summary.mode, Some(0));
    }

    #[test]
    fn summarize_even_count_interpolates_median() {
        let summary = summarize(&[1, 2, 3, 10]).unwrap();
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.mode, None);
    }

    #[test]
    fn summarize_empty_is_none() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn mode_requires_a_strict_winner() {
        assert_eq!(mode(&[1, 1, 2]), Some(1));
        assert_eq!(mode(&[1, 1, 2, 2]), None);
        assert_eq!(mode(&[7]), Some(7));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn arg_max_keeps_every_tied_key() {
        let (value, keys) = arg_max([("a", 1.0), ("b", 3.0), ("c", 3.0)]).unwrap();
        assert_eq!(value, 3.0);
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn arg_min_keeps_every_tied_key() {
        let (value, keys) = arg_min([("a", 2), ("b", 1), ("c", 1), ("d", 5)]).unwrap();
        assert_eq!(value, 1);
        assert_eq!(keys, vec!["b", "c"]);
        assert_eq!(arg_min(Vec::<(u8, u8)>::new()), None);
    }
}
