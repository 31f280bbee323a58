//! Weighted cluster selection.

use crate::config::WeightedClusterConfig;

/// One candidate upstream cluster of a weighted route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedClusterEntry {
    cluster_name: String,
    cluster_weight: u32,
}

impl WeightedClusterEntry {
    pub fn new(cluster_name: impl Into<String>, cluster_weight: u32) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            cluster_weight,
        }
    }

    /// Build from configuration. `None` if the weight is missing.
    pub fn from_config(config: &WeightedClusterConfig) -> Option<Self> {
        config
            .weight
            .map(|weight| Self::new(config.name.clone(), weight))
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn cluster_weight(&self) -> u32 {
        self.cluster_weight
    }
}

/// Sum of all weights.
pub fn total_weight(clusters: &[WeightedClusterEntry]) -> u64 {
    clusters.iter().map(|c| u64::from(c.cluster_weight)).sum()
}

/// Pick the cluster whose weight range covers `random_value % total_weight`.
///
/// Clusters own consecutive half-open ranges in list order, so the result is
/// a pure function of its inputs. Returns `None` only for an empty list or a
/// zero total, which route construction rules out.
pub fn pick_cluster(
    clusters: &[WeightedClusterEntry],
    total_weight: u64,
    random_value: u64,
) -> Option<&WeightedClusterEntry> {
    if total_weight == 0 {
        return None;
    }

    let selected = random_value % total_weight;
    let mut end = 0u64;
    for cluster in clusters {
        end += u64::from(cluster.cluster_weight);
        if selected < end {
            return Some(cluster);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn clusters(weights: &[u32]) -> Vec<WeightedClusterEntry> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| WeightedClusterEntry::new(format!("c{}", i), *w))
            .collect()
    }

    fn pick_name(list: &[WeightedClusterEntry], random_value: u64) -> &str {
        pick_cluster(list, total_weight(list), random_value)
            .unwrap()
            .cluster_name()
    }

    #[test]
    fn test_boundaries() {
        let list = vec![
            WeightedClusterEntry::new("A", 30),
            WeightedClusterEntry::new("B", 70),
        ];
        assert_eq!(total_weight(&list), 100);

        assert_eq!(pick_name(&list, 0), "A");
        assert_eq!(pick_name(&list, 29), "A");
        assert_eq!(pick_name(&list, 30), "B");
        assert_eq!(pick_name(&list, 99), "B");
    }

    #[test]
    fn test_random_value_wraps() {
        let list = clusters(&[1, 2, 3]);
        assert_eq!(pick_name(&list, 6), "c0");
        assert_eq!(pick_name(&list, 7), "c1");
        assert_eq!(pick_name(&list, u64::MAX), pick_name(&list, u64::MAX % 6));
    }

    #[test]
    fn test_every_cumulative_boundary() {
        let weights = [5, 1, 10, 4];
        let list = clusters(&weights);
        let mut begin = 0u64;
        for (i, w) in weights.iter().enumerate() {
            let end = begin + u64::from(*w);
            let expected = format!("c{}", i);
            assert_eq!(pick_name(&list, begin), expected);
            assert_eq!(pick_name(&list, end - 1), expected);
            begin = end;
        }
        assert_eq!(pick_name(&list, begin - 1), "c3");
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(pick_cluster(&[], 0, 5).is_none());
        assert!(pick_cluster(&clusters(&[1]), 0, 5).is_none());
    }

    #[test]
    fn test_from_config() {
        let entry = WeightedClusterEntry::from_config(&WeightedClusterConfig {
            name: "a".into(),
            weight: Some(3),
        })
        .unwrap();
        assert_eq!(entry.cluster_name(), "a");
        assert_eq!(entry.cluster_weight(), 3);

        assert!(WeightedClusterEntry::from_config(&WeightedClusterConfig {
            name: "a".into(),
            weight: None,
        })
        .is_none());
    }

    proptest! {
        #[test]
        fn prop_selects_covering_range(
            weights in proptest::collection::vec(1u32..50, 1..8),
            seed in any::<u64>(),
        ) {
            let list = clusters(&weights);
            let total = total_weight(&list);
            let r = seed % total;

            let picked = pick_cluster(&list, total, r).unwrap();
            let index = list.iter().position(|c| c == picked).unwrap();
            let before: u64 = weights[..index].iter().map(|w| u64::from(*w)).sum();
            let through = before + u64::from(weights[index]);

            prop_assert!(before <= r && r < through);
            prop_assert_eq!(pick_cluster(&list, total, r), Some(picked));
        }
    }
}
