use avtask_core::Trial;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::CategoryPool;
use crate::config::ExperimentConfig;
use crate::error::{ExperimentError, ExperimentResult};

/// Draws the session's trials from the category pools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialSampler {
    counts: Vec<usize>,
    allow_duplicates: bool,
}

impl TrialSampler {
    pub fn new(counts: Vec<usize>, allow_duplicates: bool) -> Self {
        Self {
            counts,
            allow_duplicates,
        }
    }

    pub fn from_config(config: &ExperimentConfig) -> Self {
        Self::new(config.category_counts.clone(), config.allow_duplicates)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Draws `counts[i]` trials from `pools[i]` and shuffles the combined list.
    ///
    /// Without duplicates each drawn trial leaves its pool, so a category can
    /// never supply the same folder twice.
    pub fn sample<R: Rng>(
        &self,
        pools: Vec<CategoryPool>,
        rng: &mut R,
    ) -> ExperimentResult<Vec<Trial>> {
        if pools.len() < self.counts.len() {
            return Err(ExperimentError::MissingCategories {
                configured: self.counts.len(),
                found: pools.len(),
            });
        }

        let mut selected = Vec::with_capacity(self.total());
        for (pool, &count) in pools.into_iter().zip(&self.counts) {
            self.draw(pool, count, rng, &mut selected)?;
        }

        selected.shuffle(rng);
        Ok(selected)
    }

    fn draw<R: Rng>(
        &self,
        pool: CategoryPool,
        count: usize,
        rng: &mut R,
        out: &mut Vec<Trial>,
    ) -> ExperimentResult<()> {
        let CategoryPool { name, mut trials } = pool;

        let starved = if self.allow_duplicates {
            count > 0 && trials.is_empty()
        } else {
            count > trials.len()
        };
        if starved {
            return Err(ExperimentError::InsufficientTrials {
                category: name,
                requested: count,
                available: trials.len(),
            });
        }

        for _ in 0..count {
            let index = rng.random_range(0..trials.len());
            let folder = if self.allow_duplicates {
                trials[index].clone()
            } else {
                trials.remove(index)
            };
            out.push(Trial::new(name.clone(), folder));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn pool(name: &str, size: usize) -> CategoryPool {
        CategoryPool::new(name, (0..size).map(|i| format!("{name}{i}")).collect())
    }

    #[test]
    fn draws_configured_count_per_category_without_repeats() {
        let sampler = TrialSampler::new(vec![2, 1], false);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let trials = sampler
                .sample(vec![pool("A", 3), pool("B", 5)], &mut rng)
                .unwrap();

            assert_eq!(trials.len(), 3);
            assert_eq!(trials.iter().filter(|t| t.category == "A").count(), 2);
            assert_eq!(trials.iter().filter(|t| t.category == "B").count(), 1);
            let unique: HashSet<_> = trials.iter().collect();
            assert_eq!(unique.len(), trials.len());
            assert!(trials.iter().all(|t| t.folder.starts_with(&t.category)));
        }
    }

    #[test]
    fn exhausting_a_pool_draws_every_folder_once() {
        let sampler = TrialSampler::new(vec![4], false);
        let mut rng = StdRng::seed_from_u64(7);
        let trials = sampler.sample(vec![pool("A", 4)], &mut rng).unwrap();
        let mut folders: Vec<_> = trials.into_iter().map(|t| t.folder).collect();
        folders.sort();
        assert_eq!(folders, vec!["A0", "A1", "A2", "A3"]);
    }

    #[test]
    fn over_asking_without_duplicates_is_a_configuration_error() {
        let sampler = TrialSampler::new(vec![4, 1], false);
        let mut rng = StdRng::seed_from_u64(1);
        let err = sampler
            .sample(vec![pool("A", 3), pool("B", 5)], &mut rng)
            .unwrap_err();
        match err {
            ExperimentError::InsufficientTrials {
                category,
                requested,
                available,
            } => {
                assert_eq!(category, "A");
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicates_allow_asking_more_than_available() {
        let sampler = TrialSampler::new(vec![6], true);
        let mut rng = StdRng::seed_from_u64(3);
        let trials = sampler.sample(vec![pool("A", 2)], &mut rng).unwrap();
        assert_eq!(trials.len(), 6);
        assert!(trials.iter().all(|t| t.folder == "A0" || t.folder == "A1"));
    }

    #[test]
    fn duplicates_still_need_a_non_empty_pool() {
        let sampler = TrialSampler::new(vec![1], true);
        let mut rng = StdRng::seed_from_u64(3);
        let err = sampler.sample(vec![pool("A", 0)], &mut rng).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn fewer_folders_than_counts_is_rejected() {
        let sampler = TrialSampler::new(vec![1, 1, 1], false);
        let mut rng = StdRng::seed_from_u64(3);
        let err = sampler
            .sample(vec![pool("A", 2), pool("B", 2)], &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            ExperimentError::MissingCategories {
                configured: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn extra_categories_are_not_sampled() {
        let sampler = TrialSampler::new(vec![1], false);
        let mut rng = StdRng::seed_from_u64(9);
        let trials = sampler
            .sample(vec![pool("A", 2), pool("B", 2)], &mut rng)
            .unwrap();
        assert_eq!(trials.len(), 1);
        assert_eq!(trials[0].category, "A");
    }

    #[test]
    fn final_order_is_shuffled_across_categories() {
        let sampler = TrialSampler::new(vec![5, 5], false);
        let mixed = (0..20).any(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let trials = sampler
                .sample(vec![pool("A", 5), pool("B", 5)], &mut rng)
                .unwrap();
            trials.iter().take(5).any(|t| t.category == "B")
        });
        assert!(mixed, "category B never appeared in the first half");
    }
}
