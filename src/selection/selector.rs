use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::layout::Layout;
use crate::core::types::Canvas;
use crate::selection::scorers::LayoutScorer;
use crate::selection::task::Task;
use crate::selection::SelectionError;

/// Default number of exemplars to return
pub const DEFAULT_NUM_PROMPT: usize = 10;

/// Configuration for an exemplar selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Size of the random candidate pool drawn once from the corpus;
    /// 0 keeps the whole corpus in its original order
    #[serde(default)]
    pub candidate_size: usize,

    /// Maximum number of exemplars returned per query
    #[serde(default = "default_num_prompt")]
    pub num_prompt: usize,

    /// Randomly permute the selected exemplars before returning them
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,

    /// Seed for pool sampling and shuffling; OS entropy when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Canvas for content-aware rasterization
    #[serde(default)]
    pub canvas: Canvas,
}

fn default_num_prompt() -> usize {
    DEFAULT_NUM_PROMPT
}

fn default_shuffle() -> bool {
    true
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            candidate_size: 0,
            num_prompt: DEFAULT_NUM_PROMPT,
            shuffle: true,
            seed: None,
            canvas: Canvas::default(),
        }
    }
}

/// Score of one pool layout against a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    /// Index of the layout in the corpus the selector was built from
    pub index: usize,
    /// Position of the layout in the selector's pool
    pub position: usize,
    pub score: f64,
}

/// A selected exemplar, borrowed from the selector's pool
#[derive(Debug, Clone, Copy)]
pub struct Exemplar<'a> {
    /// Index of the layout in the corpus the selector was built from
    pub index: usize,
    pub score: f64,
    pub layout: &'a Layout,
}

/// Ranks a fixed pool of training layouts against query layouts.
///
/// The pool is drawn once at construction; afterwards ranking never mutates
/// it, so [`ExemplarSelector::rank`] and [`ExemplarSelector::select_with_rng`]
/// only need `&self`.
pub struct ExemplarSelector {
    pool: Vec<Layout>,
    /// Corpus index of each pool layout
    origins: Vec<usize>,
    scorer: Box<dyn LayoutScorer>,
    config: SelectorConfig,
    rng: StdRng,
}

impl std::fmt::Debug for ExemplarSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExemplarSelector")
            .field("scorer", &self.scorer.name())
            .field("pool_size", &self.pool.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ExemplarSelector {
    /// Create a selector for one of the built-in tasks
    ///
    /// # Errors
    ///
    /// Returns an error if the task's scorer cannot be built.
    pub fn new(
        task: Task,
        corpus: Vec<Layout>,
        config: SelectorConfig,
    ) -> Result<Self, SelectionError> {
        let scorer = task.scorer(config.canvas)?;
        Ok(Self::with_scorer(scorer, corpus, config))
    }

    /// Create a selector with a custom scoring strategy.
    ///
    /// Takes the corpus by value: sampling the candidate pool shuffles this
    /// copy, never the caller's data. Each pool layout remembers its corpus
    /// index, which is what rankings and exemplars report.
    #[must_use]
    pub fn with_scorer(
        scorer: Box<dyn LayoutScorer>,
        corpus: Vec<Layout>,
        config: SelectorConfig,
    ) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let corpus_size = corpus.len();
        let mut entries: Vec<(usize, Layout)> = corpus.into_iter().enumerate().collect();
        if config.candidate_size > 0 {
            entries.shuffle(&mut rng);
            entries.truncate(config.candidate_size);
        }
        let (origins, pool): (Vec<usize>, Vec<Layout>) = entries.into_iter().unzip();
        debug!(
            "{} selector: {} candidates from a corpus of {}",
            scorer.name(),
            pool.len(),
            corpus_size
        );

        Self {
            pool,
            origins,
            scorer,
            config,
            rng,
        }
    }

    /// The candidate pool, in sampled order
    #[must_use]
    pub fn pool(&self) -> &[Layout] {
        &self.pool
    }

    /// Corpus index of each pool layout, aligned with [`ExemplarSelector::pool`]
    #[must_use]
    pub fn pool_indices(&self) -> &[usize] {
        &self.origins
    }

    #[must_use]
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    #[must_use]
    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Score every pool layout and sort best-first.
    ///
    /// Ties are broken by corpus index, whatever order sampling left the
    /// pool in. NaN scores are ranked last.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::AtCandidate` wrapping the first scoring
    /// failure, labelled with the candidate's corpus index.
    pub fn rank(&self, query: &Layout) -> Result<Vec<ScoredCandidate>, SelectionError> {
        let mut scored = Vec::with_capacity(self.pool.len());
        for (position, (candidate, &index)) in self.pool.iter().zip(&self.origins).enumerate() {
            let score = self
                .scorer
                .score(candidate, query)
                .map_err(|e| SelectionError::AtCandidate {
                    index,
                    source: Box::new(e),
                })?;
            let score = if score.is_nan() {
                f64::NEG_INFINITY
            } else {
                score
            };
            scored.push(ScoredCandidate {
                index,
                position,
                score,
            });
        }

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.index.cmp(&b.index))
        });
        Ok(scored)
    }

    /// Select up to `num_prompt` exemplars for `query`, drawing any
    /// randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Propagates scoring failures from [`ExemplarSelector::rank`].
    pub fn select_with_rng<R: Rng + ?Sized>(
        &self,
        query: &Layout,
        rng: &mut R,
    ) -> Result<Vec<Exemplar<'_>>, SelectionError> {
        let ranked = self.rank(query)?;
        Ok(retrieve(&self.pool, &ranked, &self.config, rng))
    }

    /// Select up to `num_prompt` exemplars for `query` using the selector's
    /// own seeded generator.
    ///
    /// # Errors
    ///
    /// Propagates scoring failures from [`ExemplarSelector::rank`].
    pub fn select(&mut self, query: &Layout) -> Result<Vec<Exemplar<'_>>, SelectionError> {
        let ranked = self.rank(query)?;
        Ok(retrieve(&self.pool, &ranked, &self.config, &mut self.rng))
    }
}

/// Walk the ranking, skip degenerate layouts, keep the first `num_prompt`
fn retrieve<'a, R: Rng + ?Sized>(
    pool: &'a [Layout],
    ranked: &[ScoredCandidate],
    config: &SelectorConfig,
    rng: &mut R,
) -> Vec<Exemplar<'a>> {
    let mut exemplars = Vec::with_capacity(config.num_prompt.min(ranked.len()));
    let mut skipped = 0usize;

    for candidate in ranked {
        if exemplars.len() == config.num_prompt {
            break;
        }
        let layout = &pool[candidate.position];
        if layout.is_degenerate() {
            skipped += 1;
            continue;
        }
        exemplars.push(Exemplar {
            index: candidate.index,
            score: candidate.score,
            layout,
        });
    }

    if skipped > 0 {
        debug!("Skipped {skipped} degenerate candidates");
    }
    if exemplars.len() < config.num_prompt {
        debug!(
            "Only {} of {} requested exemplars available",
            exemplars.len(),
            config.num_prompt
        );
    }

    if config.shuffle {
        exemplars.shuffle(rng);
    }
    exemplars
}

/// Look up a task by name and build its selector
///
/// # Errors
///
/// Returns `SelectionError::UnknownTask` for an unrecognized name.
pub fn create_selector(
    task: &str,
    corpus: Vec<Layout>,
    config: SelectorConfig,
) -> Result<ExemplarSelector, SelectionError> {
    ExemplarSelector::new(Task::from_name(task)?, corpus, config)
}
