//! Turning per-kind scores into one block.
//!
//! Scores are first perturbed by a small random amount so that ties (and
//! near ties) between kinds are broken unpredictably. The kinds are then
//! ranked from worst to best for the player and one rank is drawn from a
//! cumulative percentile table, which mostly picks the worst kind but
//! occasionally deals the second, third or fourth worst.

use bastet_engine::BlockKind;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::evaluator::{HEIGHT_WEIGHT, KindScores, Score};

/// Tunable parameters of the selection step.
///
/// `percentiles[n]` is the cumulative chance, in percent, of dealing one of
/// the `n + 1` worst kinds. `perturbation` is the exclusive upper bound of
/// the noise added to every score.
///
/// # Example
///
/// ```
/// use bastet_chooser::policy::SelectionPolicy;
///
/// let policy: SelectionPolicy =
///     serde_json::from_str(r#"{"percentiles": [50, 100, 100, 100, 100, 100, 100]}"#).unwrap();
/// assert_eq!(policy.percentiles()[0], 50);
/// assert_eq!(policy.perturbation(), SelectionPolicy::DEFAULT.perturbation());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SelectionPolicyRepr")]
pub struct SelectionPolicy {
    percentiles: [u8; BlockKind::LEN],
    perturbation: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidPolicyError {
    #[display("percentile table decreases at index {index}")]
    NotMonotonic { index: usize },
    #[display("percentile table must end at 100, ends at {last}")]
    DoesNotReach100 { last: u8 },
    #[display("perturbation must be in 1..={max}, got {value}")]
    Perturbation { value: u32, max: u32 },
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SelectionPolicyRepr {
    percentiles: [u8; BlockKind::LEN],
    perturbation: u32,
}

impl Default for SelectionPolicyRepr {
    fn default() -> Self {
        let SelectionPolicy {
            percentiles,
            perturbation,
        } = SelectionPolicy::DEFAULT;
        Self {
            percentiles,
            perturbation,
        }
    }
}

impl TryFrom<SelectionPolicyRepr> for SelectionPolicy {
    type Error = InvalidPolicyError;

    fn try_from(repr: SelectionPolicyRepr) -> Result<Self, Self::Error> {
        Self::new(repr.percentiles, repr.perturbation)
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const MAX_PERTURBATION: u32 = HEIGHT_WEIGHT as u32;

impl SelectionPolicy {
    /// 81% worst, 12% second, 6% third and 1% fourth worst; noise below 100.
    pub const DEFAULT: Self = Self {
        percentiles: [80, 92, 98, 100, 100, 100, 100],
        perturbation: 100,
    };

    pub fn new(
        percentiles: [u8; BlockKind::LEN],
        perturbation: u32,
    ) -> Result<Self, InvalidPolicyError> {
        let policy = Self {
            percentiles,
            perturbation,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Checks that the table is a cumulative distribution and that the noise
    /// stays below the smallest height difference between two wells.
    pub fn validate(&self) -> Result<(), InvalidPolicyError> {
        if let Some(index) = self.percentiles.windows(2).position(|w| w[0] > w[1]) {
            return Err(InvalidPolicyError::NotMonotonic { index: index + 1 });
        }
        let last = self.percentiles[BlockKind::LEN - 1];
        if last != 100 {
            return Err(InvalidPolicyError::DoesNotReach100 { last });
        }
        if !(1..=MAX_PERTURBATION).contains(&self.perturbation) {
            return Err(InvalidPolicyError::Perturbation {
                value: self.perturbation,
                max: MAX_PERTURBATION,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn percentiles(&self) -> &[u8; BlockKind::LEN] {
        &self.percentiles
    }

    #[must_use]
    pub fn perturbation(&self) -> u32 {
        self.perturbation
    }

    /// Adds independent noise to each score, drawing in kind order.
    pub fn perturb<R>(&self, scores: &KindScores, rng: &mut R) -> KindScores
    where
        R: Rng + ?Sized,
    {
        scores.map(|score| score + Score::from(rng.random_range(0..self.perturbation)))
    }

    /// Draws a rank: 0 is the worst kind for the player.
    pub fn draw_rank<R>(&self, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let r = rng.random_range(0..100);
        self.percentiles
            .iter()
            .position(|&p| p >= r)
            .unwrap_or(BlockKind::LEN - 1)
    }

    /// Picks a block from main scores.
    ///
    /// With `avoid` set, the worst kind is dealt outright unless it equals
    /// `avoid`, in which case the percentile draw decides. Without it the
    /// percentile draw always decides.
    pub fn select<R>(
        &self,
        main_scores: KindScores,
        avoid: Option<BlockKind>,
        rng: &mut R,
    ) -> Decision
    where
        R: Rng + ?Sized,
    {
        let final_scores = self.perturb(&main_scores, rng);
        let worst = kind_at_rank(&final_scores, 0);

        let (chosen, rule) = match avoid {
            Some(front) if front != worst => (worst, SelectionRule::Worst),
            _ => {
                let rank = self.draw_rank(rng);
                (kind_at_rank(&final_scores, rank), SelectionRule::Percentile { rank })
            }
        };

        Decision {
            main_scores,
            final_scores,
            chosen,
            rule,
        }
    }
}

/// Returns the first kind, in kind order, whose score equals the `rank`-th
/// lowest score.
///
/// Tied kinds share the score value, so when the two lowest scores tie both
/// rank 0 and rank 1 deal the same kind.
#[must_use]
pub fn kind_at_rank(scores: &KindScores, rank: usize) -> BlockKind {
    let mut sorted = *scores;
    sorted.sort_unstable();
    let target = sorted[rank];
    scores
        .iter()
        .zip(BlockKind::ALL)
        .find_map(|(&score, kind)| (score == target).then_some(kind))
        .unwrap_or(BlockKind::ALL[rank])
}

/// Which step of the selection picked the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRule {
    /// The worst kind differed from the previewed block and was dealt directly.
    Worst,
    /// Drawn from the percentile table; `rank` 0 is the worst kind.
    Percentile { rank: usize },
}

/// Outcome of one choice, with the scores that led to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    main_scores: KindScores,
    final_scores: KindScores,
    chosen: BlockKind,
    rule: SelectionRule,
}

impl Decision {
    /// Scores before perturbation, indexed by [`BlockKind::index`].
    #[must_use]
    pub fn main_scores(&self) -> &KindScores {
        &self.main_scores
    }

    #[must_use]
    pub fn final_scores(&self) -> &KindScores {
        &self.final_scores
    }

    #[must_use]
    pub fn chosen(&self) -> BlockKind {
        self.chosen
    }

    #[must_use]
    pub fn rule(&self) -> SelectionRule {
        self.rule
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::evaluator::GAME_OVER_SCORE;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_default_policy_is_valid() {
        assert_eq!(SelectionPolicy::DEFAULT.validate(), Ok(()));
        assert_eq!(SelectionPolicy::default(), SelectionPolicy::DEFAULT);
    }

    #[test]
    fn test_invalid_policies() {
        assert_eq!(
            SelectionPolicy::new([80, 70, 98, 100, 100, 100, 100], 100),
            Err(InvalidPolicyError::NotMonotonic { index: 1 })
        );
        assert_eq!(
            SelectionPolicy::new([80, 92, 98, 99, 99, 99, 99], 100),
            Err(InvalidPolicyError::DoesNotReach100 { last: 99 })
        );
        assert_eq!(
            SelectionPolicy::new([100; 7], 0),
            Err(InvalidPolicyError::Perturbation { value: 0, max: 1000 })
        );
        assert!(SelectionPolicy::new([100; 7], 1001).is_err());
        assert!(SelectionPolicy::new([100; 7], 1000).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let err = serde_json::from_str::<SelectionPolicy>(
            r#"{"percentiles": [90, 80, 100, 100, 100, 100, 100]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("decreases"));

        let err = serde_json::from_str::<SelectionPolicy>(r#"{"perturbaton": 5}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));

        let policy: SelectionPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, SelectionPolicy::DEFAULT);
    }

    #[test]
    fn test_serialize_round_trip() {
        let policy = SelectionPolicy::new([50, 75, 100, 100, 100, 100, 100], 10).unwrap();
        let json = serde_json::to_string(&policy).unwrap();
        assert_eq!(json, r#"{"percentiles":[50,75,100,100,100,100,100],"perturbation":10}"#);
        assert_eq!(serde_json::from_str::<SelectionPolicy>(&json).unwrap(), policy);
    }

    #[test]
    fn test_perturbation_stays_below_bound() {
        let policy = SelectionPolicy::DEFAULT;
        let scores = [0, 10, 20, 30, 40, 50, GAME_OVER_SCORE];
        let mut rng = rng();
        for _ in 0..1000 {
            let perturbed = policy.perturb(&scores, &mut rng);
            for (before, after) in scores.iter().zip(perturbed) {
                assert!((0..100).contains(&(after - before)));
            }
        }
    }

    #[test]
    fn test_rank_distribution_converges() {
        let policy = SelectionPolicy::DEFAULT;
        let mut rng = rng();
        let mut counts = [0_u32; BlockKind::LEN];
        let draws = 100_000;
        for _ in 0..draws {
            counts[policy.draw_rank(&mut rng)] += 1;
        }

        let expected = [0.81, 0.12, 0.06, 0.01, 0.0, 0.0, 0.0];
        for (rank, (&count, &p)) in counts.iter().zip(&expected).enumerate() {
            let freq = f64::from(count) / f64::from(draws);
            assert!((freq - p).abs() < 0.01, "rank {rank}: {freq}");
        }
        assert_eq!(counts[4..], [0, 0, 0]);
    }

    #[test]
    fn test_select_deals_worst_unless_it_repeats() {
        let policy = SelectionPolicy::DEFAULT;
        // Gaps far wider than the noise keep the ranking fixed.
        let scores = [7000, 1000, 2000, 3000, 4000, 5000, 6000];
        let mut rng = rng();

        let decision = policy.select(scores, Some(BlockKind::O), &mut rng);
        assert_eq!(decision.chosen(), BlockKind::I);
        assert_eq!(decision.rule(), SelectionRule::Worst);
        assert_eq!(decision.main_scores(), &scores);

        for _ in 0..100 {
            let decision = policy.select(scores, Some(BlockKind::I), &mut rng);
            let SelectionRule::Percentile { rank } = decision.rule() else {
                panic!("expected a percentile draw");
            };
            assert!(rank < 4);
            assert_eq!(decision.chosen(), BlockKind::ALL[rank + 1]);
        }
    }

    #[test]
    fn test_kind_at_rank_repeats_tied_kinds() {
        let scores = [5, 3, 3, 9, 1, 3, 9];
        assert_eq!(kind_at_rank(&scores, 0), BlockKind::J);
        assert_eq!(kind_at_rank(&scores, 1), BlockKind::I);
        assert_eq!(kind_at_rank(&scores, 2), BlockKind::I);
        assert_eq!(kind_at_rank(&scores, 3), BlockKind::I);
        assert_eq!(kind_at_rank(&scores, 4), BlockKind::O);
        assert_eq!(kind_at_rank(&scores, 5), BlockKind::T);
        assert_eq!(kind_at_rank(&scores, 6), BlockKind::T);
    }

    #[test]
    fn test_select_tied_minimum_redeals_the_front_block() {
        // Perturbation 1 adds nothing, so O and I stay tied for worst.
        let policy = SelectionPolicy::new([0, 100, 100, 100, 100, 100, 100], 1).unwrap();
        let scores = [3, 3, 5, 6, 7, 8, 9];
        let mut rng = rng();
        for _ in 0..100 {
            let decision = policy.select(scores, Some(BlockKind::O), &mut rng);
            assert!(matches!(decision.rule(), SelectionRule::Percentile { .. }));
            assert_eq!(decision.chosen(), BlockKind::O);
        }
    }

    #[test]
    fn test_select_without_preview_always_draws() {
        let policy = SelectionPolicy::new([100; 7], 1).unwrap();
        let mut rng = rng();
        let decision = policy.select([3, 2, 1, 4, 5, 6, 7], None, &mut rng);
        assert_eq!(decision.final_scores(), &[3, 2, 1, 4, 5, 6, 7]);
        assert_eq!(decision.chosen(), BlockKind::Z);
        assert_eq!(decision.rule(), SelectionRule::Percentile { rank: 0 });
    }
}
