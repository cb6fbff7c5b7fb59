use crate::libtaimal::catalog::ContentItem;
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Target option count per question. Small pools degrade below this rather
/// than padding with fabricated choices; see [`sample_options`].
pub const OPTION_COUNT: usize = 4;

/// Minimum usable option count: the correct answer plus one real distractor.
pub const MIN_OPTIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    MeaningToPron,
    PronToMeaning,
}

impl QuizMode {
    fn answer_side<'a>(&self, item: &'a ContentItem) -> &'a str {
        match self {
            QuizMode::MeaningToPron => &item.pronunciation,
            QuizMode::PronToMeaning => &item.meaning,
        }
    }

    fn prompt_side<'a>(&self, item: &'a ContentItem) -> &'a str {
        match self {
            QuizMode::MeaningToPron => &item.meaning,
            QuizMode::PronToMeaning => &item.pronunciation,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Question {
    pub item_id: String,
    pub prompt: String,
    pub correct: String,
    pub options: Vec<String>,
    pub script: Option<String>,
    pub roman: Option<String>,
    pub emoji: Option<String>,
}

/// Builds the option set for one question: `correct` plus up to `k - 1`
/// distractors drawn without replacement from `candidates`, uniformly
/// shuffled so the correct answer lands in no particular slot.
///
/// Duplicates, empty strings and copies of `correct` are dropped from the
/// pool first. When the pool runs short the result is simply shorter than
/// `k`; no placeholder options are ever invented.
pub fn sample_options<R: Rng + ?Sized>(
    rng: &mut R,
    correct: &str,
    candidates: &[String],
    k: usize,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut pool: Vec<&str> = candidates
        .iter()
        .map(String::as_str)
        .filter(|c| !c.is_empty() && *c != correct && seen.insert(*c))
        .collect();
    pool.shuffle(rng);
    pool.truncate(k.saturating_sub(1));

    let mut options: Vec<String> = pool.into_iter().map(str::to_owned).collect();
    options.push(correct.to_owned());
    options.shuffle(rng);
    options
}

/// Turns `items` into a shuffled quiz of up to `count` questions (all items
/// when `count` is `None`). Each item's distractors come from the answer
/// side of the *other* items. Items that cannot get even one real
/// distractor are skipped with a warning.
pub fn build_questions<R: Rng + ?Sized>(
    rng: &mut R,
    items: &[ContentItem],
    mode: QuizMode,
    count: Option<usize>,
) -> Vec<Question> {
    let mut picked: Vec<&ContentItem> = items.iter().collect();
    picked.shuffle(rng);
    if let Some(count) = count {
        picked.truncate(count);
    }
    debug!(
        "[Setup] Building {} questions from {} items.",
        picked.len(),
        items.len()
    );

    let mut questions = Vec::with_capacity(picked.len());
    for item in picked {
        let correct = mode.answer_side(item);
        let candidates: Vec<String> = items
            .iter()
            .filter(|other| other.id != item.id)
            .map(|other| mode.answer_side(other).to_owned())
            .collect();

        let options = sample_options(rng, correct, &candidates, OPTION_COUNT);
        if options.len() < MIN_OPTIONS {
            warn!(
                "[Setup] Skipping item '{}': no usable distractors.",
                item.id
            );
            continue;
        }

        questions.push(Question {
            item_id: item.id.clone(),
            prompt: mode.prompt_side(item).to_owned(),
            correct: correct.to_owned(),
            options,
            script: item.script.clone(),
            roman: item.roman.clone(),
            emoji: item.emoji.clone(),
        });
    }
    questions
}
