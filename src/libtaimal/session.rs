use crate::libtaimal::catalog::ContentItem;
use crate::libtaimal::munje::{build_questions, Question, QuizMode};
use log::{debug, warn};
use rand::Rng;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingAnswer,
    Locked,
    Complete,
}

/// Read-only projection of the current question for the presentation layer.
/// `correct` is only populated once the question is locked, so a renderer
/// cannot leak the answer early.
#[derive(Debug)]
pub struct SessionView<'a> {
    pub prompt: &'a str,
    pub options: &'a [String],
    pub index: usize,
    pub total: usize,
    pub score: u32,
    pub locked: bool,
    pub selection: Option<&'a str>,
    pub correct: Option<&'a str>,
    pub script: Option<&'a str>,
    pub roman: Option<&'a str>,
    pub emoji: Option<&'a str>,
}

/// One quiz attempt. Owns its question snapshot; all quiz truth lives here,
/// the presentation layer only renders views and forwards choices back.
///
/// Invalid transitions (stale index, answering while locked or complete,
/// advancing while unanswered) are absorbed as logged no-ops so a confused
/// caller can never corrupt the tally.
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<Question>,
    mode: QuizMode,
    current: usize,
    selection: Option<String>,
    score: u32,
    missed: BTreeSet<String>,
}

impl QuizSession {
    /// Starts a session over a non-empty question list. `None` for an empty
    /// list; callers surface that as "category unavailable" before any
    /// screen is shown.
    pub fn start(questions: Vec<Question>, mode: QuizMode) -> Option<QuizSession> {
        if questions.is_empty() {
            warn!("[Quiz] Refusing to start a session with no questions.");
            return None;
        }
        debug!("[Quiz] Starting session with {} questions.", questions.len());
        Some(QuizSession {
            questions,
            mode,
            current: 0,
            selection: None,
            score: 0,
            missed: BTreeSet::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        if self.current >= self.questions.len() {
            Phase::Complete
        } else if self.selection.is_some() {
            Phase::Locked
        } else {
            Phase::AwaitingAnswer
        }
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn missed_ids(&self) -> &BTreeSet<String> {
        &self.missed
    }

    pub fn has_missed(&self) -> bool {
        !self.missed.is_empty()
    }

    /// Records the user's choice for the question at `index`. Only the
    /// current, still-unanswered question accepts a choice; every other
    /// call (double-click, stale screen, finished session) is a no-op.
    pub fn answer(&mut self, index: usize, choice: &str) {
        if self.phase() != Phase::AwaitingAnswer || index != self.current {
            warn!(
                "[Quiz] Ignoring answer for question {} in phase {:?} (current {}).",
                index,
                self.phase(),
                self.current
            );
            return;
        }
        let question = &self.questions[self.current];
        if choice == question.correct {
            self.score += 1;
        } else {
            self.missed.insert(question.item_id.clone());
        }
        self.selection = Some(choice.to_owned());
    }

    /// Moves past a locked question, clearing the selection; completes the
    /// session after the last one. A no-op unless locked.
    pub fn advance(&mut self) {
        if self.phase() != Phase::Locked {
            warn!("[Quiz] Ignoring advance in phase {:?}.", self.phase());
            return;
        }
        self.selection = None;
        self.current += 1;
        if self.phase() == Phase::Complete {
            debug!(
                "[Quiz] Session complete: {}/{} (missed {}).",
                self.score,
                self.questions.len(),
                self.missed.len()
            );
        }
    }

    /// Builds a fresh session over only the items missed in this one, in the
    /// same mode. Question and option order are reshuffled like any new
    /// quiz. `None` unless this session is complete with something missed.
    pub fn review_missed<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        items: &[ContentItem],
    ) -> Option<QuizSession> {
        if self.phase() != Phase::Complete || self.missed.is_empty() {
            return None;
        }
        let missed_items: Vec<ContentItem> = items
            .iter()
            .filter(|item| self.missed.contains(&item.id))
            .cloned()
            .collect();
        debug!("[Quiz] Reviewing {} missed items.", missed_items.len());
        let questions = build_questions(rng, &missed_items, self.mode, None);
        QuizSession::start(questions, self.mode)
    }

    pub fn view(&self) -> Option<SessionView<'_>> {
        if self.phase() == Phase::Complete {
            return None;
        }
        let question = &self.questions[self.current];
        let locked = self.selection.is_some();
        Some(SessionView {
            prompt: &question.prompt,
            options: &question.options,
            index: self.current,
            total: self.questions.len(),
            score: self.score,
            locked,
            selection: self.selection.as_deref(),
            correct: if locked { Some(&question.correct) } else { None },
            script: question.script.as_deref(),
            roman: question.roman.as_deref(),
            emoji: question.emoji.as_deref(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn question(id: &str, prompt: &str, correct: &str, wrong: &str) -> Question {
        Question {
            item_id: id.to_owned(),
            prompt: prompt.to_owned(),
            correct: correct.to_owned(),
            options: vec![correct.to_owned(), wrong.to_owned()],
            script: None,
            roman: None,
            emoji: None,
        }
    }

    fn two_question_session() -> QuizSession {
        QuizSession::start(
            vec![
                question("a", "하나", "능", "썽"),
                question("b", "둘", "썽", "능"),
            ],
            QuizMode::MeaningToPron,
        )
        .unwrap()
    }

    fn manners_items() -> Vec<ContentItem> {
        let item = |id: &str, meaning: &str, pron: &str| ContentItem {
            id: id.to_owned(),
            meaning: meaning.to_owned(),
            pronunciation: pron.to_owned(),
            script: None,
            roman: None,
            emoji: None,
        };
        vec![
            item("khop-khun", "고마워요", "콥쿤"),
            item("khor-thot", "미안해요", "커 톳"),
            item("tao-rai", "얼마예요?", "타오라이"),
        ]
    }

    #[test]
    fn empty_question_list_cannot_start() {
        assert!(QuizSession::start(vec![], QuizMode::MeaningToPron).is_none());
    }

    #[test]
    fn score_counts_only_correct_answers_and_never_decreases() {
        let mut session = two_question_session();
        session.answer(0, "능");
        assert_eq!(session.score(), 1);
        session.advance();
        session.answer(1, "능");
        assert_eq!(session.score(), 1);
        session.advance();
        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn missed_set_tracks_exactly_the_wrong_first_choices() {
        let mut session = two_question_session();
        session.answer(0, "썽");
        session.advance();
        session.answer(1, "썽");
        session.advance();
        let missed: Vec<&str> = session.missed_ids().iter().map(String::as_str).collect();
        assert_eq!(missed, vec!["a"]);
    }

    #[test]
    fn second_answer_on_a_locked_question_is_a_no_op() {
        let mut session = two_question_session();
        session.answer(0, "썽");
        assert_eq!(session.phase(), Phase::Locked);
        // A different choice after the lock must change nothing.
        session.answer(0, "능");
        assert_eq!(session.score(), 0);
        assert_eq!(session.view().unwrap().selection, Some("썽"));
        assert!(session.missed_ids().contains("a"));
    }

    #[test]
    fn stale_and_future_indices_are_no_ops() {
        let mut session = two_question_session();
        session.answer(1, "썽");
        assert_eq!(session.phase(), Phase::AwaitingAnswer);
        assert_eq!(session.score(), 0);
        session.answer(0, "능");
        session.advance();
        session.answer(0, "능");
        assert_eq!(session.score(), 1);
        assert_eq!(session.phase(), Phase::AwaitingAnswer);
    }

    #[test]
    fn advance_before_answering_is_a_no_op() {
        let mut session = two_question_session();
        session.advance();
        assert_eq!(session.phase(), Phase::AwaitingAnswer);
        assert_eq!(session.view().unwrap().index, 0);
    }

    #[test]
    fn advancing_past_the_last_question_completes_the_session() {
        let mut session = two_question_session();
        session.answer(0, "능");
        session.advance();
        session.answer(1, "썽");
        session.advance();
        assert_eq!(session.phase(), Phase::Complete);
        assert!(session.view().is_none());
        // Anything after completion is ignored.
        session.answer(2, "능");
        session.advance();
        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn correct_answer_is_hidden_until_locked() {
        let mut session = two_question_session();
        assert_eq!(session.view().unwrap().correct, None);
        session.answer(0, "썽");
        let view = session.view().unwrap();
        assert!(view.locked);
        assert_eq!(view.correct, Some("능"));
    }

    #[test]
    fn review_is_unavailable_until_complete_and_without_misses() {
        let mut rng = StdRng::seed_from_u64(9);
        let items = manners_items();
        let mut session = two_question_session();
        assert!(session.review_missed(&mut rng, &items).is_none());
        session.answer(0, "능");
        session.advance();
        session.answer(1, "썽");
        session.advance();
        // Complete but nothing missed.
        assert!(session.review_missed(&mut rng, &items).is_none());
    }

    #[test]
    fn review_covers_exactly_the_missed_items() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = manners_items();
        let questions = build_questions(&mut rng, &items, QuizMode::PronToMeaning, None);
        let mut session = QuizSession::start(questions.clone(), QuizMode::PronToMeaning).unwrap();
        // Miss every question.
        for (index, q) in questions.iter().enumerate() {
            let wrong = q.options.iter().find(|o| **o != q.correct).unwrap().clone();
            session.answer(index, &wrong);
            session.advance();
        }
        assert_eq!(session.missed_ids().len(), 3);

        let review = session.review_missed(&mut rng, &items).unwrap();
        assert_eq!(review.total(), 3);
        assert_eq!(review.score(), 0);
        assert!(!review.has_missed());
        assert_eq!(review.mode(), QuizMode::PronToMeaning);
    }

    #[test]
    fn manners_end_to_end() {
        let items = manners_items();
        let mut rng = StdRng::seed_from_u64(2026);
        let questions = build_questions(&mut rng, &items, QuizMode::PronToMeaning, Some(3));
        assert_eq!(questions.len(), 3);
        let ids: HashSet<&str> = questions.iter().map(|q| q.item_id.as_str()).collect();
        assert_eq!(
            ids,
            HashSet::from(["khop-khun", "khor-thot", "tao-rai"])
        );

        // All correct: full score, nothing to review.
        let mut session = QuizSession::start(questions.clone(), QuizMode::PronToMeaning).unwrap();
        for index in 0..3 {
            let correct = questions[index].correct.clone();
            session.answer(index, &correct);
            session.advance();
        }
        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.score(), 3);
        assert!(!session.has_missed());
        assert!(session.review_missed(&mut rng, &items).is_none());

        // Miss only khor-thot: score 2, a one-question review of that item.
        let mut session = QuizSession::start(questions.clone(), QuizMode::PronToMeaning).unwrap();
        for index in 0..3 {
            let q = &questions[index];
            let choice = if q.item_id == "khor-thot" {
                q.options.iter().find(|o| **o != q.correct).unwrap().clone()
            } else {
                q.correct.clone()
            };
            session.answer(index, &choice);
            session.advance();
        }
        assert_eq!(session.score(), 2);
        let missed: Vec<&str> = session.missed_ids().iter().map(String::as_str).collect();
        assert_eq!(missed, vec!["khor-thot"]);

        let review = session.review_missed(&mut rng, &items).unwrap();
        assert_eq!(review.total(), 1);
        let view = review.view().unwrap();
        assert_eq!(view.prompt, "커 톳");
        assert!(view.options.contains(&"미안해요".to_owned()));
    }
}
