//! Reproducible stratified train/test partitioning.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Split row indices into (train, test) partitions, stratified on the
/// binary label so both classes appear on both sides.
///
/// The split is deterministic for a fixed seed. Callers must ensure each
/// class has at least two members; a single-member class would end up
/// entirely in the test partition.
pub fn stratified_split(labels: &[u8], test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [0u8, 1] {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == class)
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            continue;
        }
        members.shuffle(&mut rng);

        let requested = (members.len() as f64 * test_fraction).round() as usize;
        let take = requested.clamp(1, members.len().saturating_sub(1).max(1));
        let (test_part, train_part) = members.split_at(take);
        test.extend_from_slice(test_part);
        train.extend_from_slice(train_part);
    }

    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(negatives: usize, positives: usize) -> Vec<u8> {
        let mut all = vec![0u8; negatives];
        all.extend(vec![1u8; positives]);
        all
    }

    #[test]
    fn test_split_is_reproducible() {
        let y = labels(30, 10);
        let first = stratified_split(&y, 0.25, 42);
        let second = stratified_split(&y, 0.25, 42);
        assert_eq!(first, second);
    }

    #[test]
    fn test_split_covers_all_rows_exactly_once() {
        let y = labels(30, 10);
        let (train, test) = stratified_split(&y, 0.25, 42);
        let mut seen: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        seen.sort();
        assert_eq!(seen, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn test_both_classes_in_both_partitions() {
        let y = labels(36, 4);
        let (train, test) = stratified_split(&y, 0.25, 42);
        for partition in [&train, &test] {
            assert!(partition.iter().any(|&i| y[i] == 0));
            assert!(partition.iter().any(|&i| y[i] == 1));
        }
    }

    #[test]
    fn test_split_proportions() {
        let y = labels(32, 8);
        let (train, test) = stratified_split(&y, 0.25, 42);
        assert_eq!(test.len(), 10); // 8 of 32 negatives + 2 of 8 positives
        assert_eq!(train.len(), 30);
    }

    #[test]
    fn test_different_seeds_differ() {
        let y = labels(30, 10);
        let first = stratified_split(&y, 0.25, 1);
        let second = stratified_split(&y, 0.25, 2);
        assert_ne!(first, second);
    }
}
