//! Multiple-choice quiz generation and session scoring.
//!
//! Candidates come from the configured selection (categories or
//! recency); distractors always come from the whole vocabulary so a
//! quiz over a small category still gets plausible wrong answers.
//! Questions that cannot find three unique distractors are dropped
//! rather than padded, so a generated set can be smaller than the
//! candidate pool, down to empty.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::models::WordEntry;

/// A quiz needs one correct answer and three distractors, so fewer
/// than four candidate words cannot start one.
pub const MIN_CANDIDATES: usize = 4;

const DISTRACTOR_COUNT: usize = 3;

/// Offered sizes for the "most recent N" selection.
pub const RECENT_COUNTS: [usize; 3] = [10, 20, 50];

pub const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizDirection {
    SourceToTarget,
    TargetToSource,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    SourceToTarget,
    TargetToSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    ByCategory,
    ByRecency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecencyMode {
    /// The N most recently added words.
    Count(usize),
    /// Everything added within the last seven days.
    LastWeek,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSettings {
    pub direction: QuizDirection,
    pub selection_mode: SelectionMode,
    /// Empty means "all words" when selecting by category.
    pub selected_category_ids: Vec<String>,
    pub recency: RecencyMode,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            direction: QuizDirection::Mixed,
            selection_mode: SelectionMode::ByCategory,
            selected_category_ids: Vec::new(),
            recency: RecencyMode::Count(RECENT_COUNTS[0]),
        }
    }
}

/// Words eligible for a quiz under `settings`. Recency selections are
/// ordered newest first; category selections keep collection order.
pub fn candidates(
    words: &[WordEntry],
    settings: &QuizSettings,
    now: DateTime<Utc>,
) -> Vec<WordEntry> {
    match settings.selection_mode {
        SelectionMode::ByCategory => {
            if settings.selected_category_ids.is_empty() {
                return words.to_vec();
            }
            words
                .iter()
                .filter(|word| {
                    word.category_ids
                        .iter()
                        .any(|id| settings.selected_category_ids.contains(id))
                })
                .cloned()
                .collect()
        }
        SelectionMode::ByRecency => {
            let mut sorted = words.to_vec();
            sorted.sort_by(|a, b| b.added_at.cmp(&a.added_at));
            match settings.recency {
                RecencyMode::Count(count) => {
                    sorted.truncate(count);
                    sorted
                }
                RecencyMode::LastWeek => sorted
                    .into_iter()
                    .filter(|word| now - word.added_at <= Duration::days(RECENT_WINDOW_DAYS))
                    .collect(),
            }
        }
    }
}

pub fn can_start(candidate_count: usize) -> bool {
    candidate_count >= MIN_CANDIDATES
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub word: WordEntry,
    /// Exactly four options, one of them the correct answer.
    pub options: Vec<String>,
    pub question_type: QuestionType,
}

impl QuizQuestion {
    pub fn correct_answer(&self) -> &str {
        answer_field(&self.word, self.question_type)
    }

    /// The field shown as the question prompt.
    pub fn prompt(&self) -> &str {
        match self.question_type {
            QuestionType::SourceToTarget => &self.word.display_form,
            QuestionType::TargetToSource => &self.word.translation,
        }
    }
}

fn answer_field(word: &WordEntry, question_type: QuestionType) -> &str {
    match question_type {
        QuestionType::SourceToTarget => &word.translation,
        QuestionType::TargetToSource => &word.display_form,
    }
}

/// Fixed directions map straight to a question type; Mixed flips a
/// fair coin per question.
fn resolve_question_type<R: Rng>(direction: QuizDirection, rng: &mut R) -> QuestionType {
    match direction {
        QuizDirection::SourceToTarget => QuestionType::SourceToTarget,
        QuizDirection::TargetToSource => QuestionType::TargetToSource,
        QuizDirection::Mixed => {
            if rng.gen_bool(0.5) {
                QuestionType::SourceToTarget
            } else {
                QuestionType::TargetToSource
            }
        }
    }
}

/// Builds questions for every candidate, in shuffled candidate order.
/// Distractors are drawn from `all_words` minus the candidate itself,
/// with case-sensitive uniqueness against the correct answer and each
/// other. Candidates without three unique distractors are skipped.
pub fn generate_questions<R: Rng>(
    all_words: &[WordEntry],
    candidates: &[WordEntry],
    direction: QuizDirection,
    rng: &mut R,
) -> Vec<QuizQuestion> {
    let mut order: Vec<&WordEntry> = candidates.iter().collect();
    order.shuffle(rng);

    let mut questions = Vec::new();
    for word in order {
        let question_type = resolve_question_type(direction, rng);
        let correct = answer_field(word, question_type).to_string();

        let mut pool: Vec<&WordEntry> = all_words.iter().filter(|w| w.id != word.id).collect();
        pool.shuffle(rng);

        let mut used = vec![correct.clone()];
        let mut distractors = Vec::new();
        for other in pool {
            let value = answer_field(other, question_type);
            if !used.iter().any(|u| u == value) {
                used.push(value.to_string());
                distractors.push(value.to_string());
                if distractors.len() == DISTRACTOR_COUNT {
                    break;
                }
            }
        }

        if distractors.len() < DISTRACTOR_COUNT {
            continue;
        }

        let mut options = distractors;
        options.push(correct);
        options.shuffle(rng);

        questions.push(QuizQuestion {
            word: word.clone(),
            options,
            question_type,
        });
    }
    questions
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Setup,
    InProgress,
    Finished,
}

/// A running quiz. One question at a time; the first submitted answer
/// per question is final.
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    score: usize,
    missed: Vec<WordEntry>,
    selected: Option<String>,
    state: QuizState,
}

impl QuizSession {
    pub fn start(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current: 0,
            score: 0,
            missed: Vec::new(),
            selected: None,
            state: QuizState::InProgress,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    /// The answer already submitted for the current question, if any.
    pub fn selected_answer(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Submits an answer for the current question. Returns whether it
    /// was correct, or None when the question was already answered (or
    /// the quiz is not running) and the submission was ignored.
    pub fn answer(&mut self, choice: &str) -> Option<bool> {
        if self.state != QuizState::InProgress || self.selected.is_some() {
            return None;
        }
        let question = self.questions.get(self.current)?;
        let correct = choice == question.correct_answer();
        if correct {
            self.score += 1;
        } else {
            self.missed.push(question.word.clone());
        }
        self.selected = Some(choice.to_string());
        Some(correct)
    }

    /// Moves to the next question; past the last one the quiz
    /// finishes.
    pub fn advance(&mut self) {
        if self.state != QuizState::InProgress {
            return;
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.selected = None;
        } else {
            self.state = QuizState::Finished;
        }
    }

    /// Score as a rounded integer percentage. An empty question set
    /// scores 0 rather than dividing by zero.
    pub fn score_percent(&self) -> u32 {
        if self.questions.is_empty() {
            return 0;
        }
        ((self.score as f64 / self.questions.len() as f64) * 100.0).round() as u32
    }

    /// Words answered incorrectly, in the order they were missed.
    pub fn missed_words(&self) -> &[WordEntry] {
        &self.missed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::mock::StepRng;
    use uuid::Uuid;

    fn word(display: &str, translation: &str, categories: &[&str]) -> WordEntry {
        WordEntry {
            id: Uuid::new_v4(),
            base_form: display.to_string(),
            display_form: display.to_string(),
            part_of_speech: "noun".to_string(),
            translation: translation.to_string(),
            examples: Vec::new(),
            category_ids: categories.iter().map(|c| c.to_string()).collect(),
            added_at: Utc::now(),
        }
    }

    fn word_added_at(display: &str, translation: &str, added_at: DateTime<Utc>) -> WordEntry {
        let mut w = word(display, translation, &[]);
        w.added_at = added_at;
        w
    }

    fn sample_words() -> Vec<WordEntry> {
        vec![
            word("hund", "собака", &["nouns"]),
            word("katt", "кіт", &["nouns"]),
            word("häst", "кінь", &["nouns"]),
            word("fisk", "риба", &["nouns"]),
        ]
    }

    fn rng() -> StepRng {
        StepRng::new(0, 0x9E37_79B9_7F4A_7C15)
    }

    #[test]
    fn test_category_selection_with_no_categories_keeps_all() {
        let words = sample_words();
        let settings = QuizSettings::default();
        assert_eq!(candidates(&words, &settings, Utc::now()).len(), 4);
    }

    #[test]
    fn test_category_selection_filters_on_any_match() {
        let mut words = sample_words();
        words.push(word("äta", "їсти", &["verbs", "food-drink"]));
        let settings = QuizSettings {
            selected_category_ids: vec!["verbs".to_string()],
            ..QuizSettings::default()
        };
        let picked = candidates(&words, &settings, Utc::now());
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].display_form, "äta");
    }

    #[test]
    fn test_recency_count_takes_newest_first() {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let words: Vec<WordEntry> = (0..5)
            .map(|i| {
                word_added_at(
                    &format!("ord{}", i),
                    &format!("слово{}", i),
                    base + Duration::days(i),
                )
            })
            .collect();
        let settings = QuizSettings {
            selection_mode: SelectionMode::ByRecency,
            recency: RecencyMode::Count(2),
            ..QuizSettings::default()
        };
        let picked = candidates(&words, &settings, base + Duration::days(5));
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].display_form, "ord4");
        assert_eq!(picked[1].display_form, "ord3");
    }

    #[test]
    fn test_recency_week_window_excludes_old_words() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let words = vec![
            word_added_at("ny", "новий", now - Duration::days(2)),
            word_added_at("gammal", "старий", now - Duration::days(30)),
        ];
        let settings = QuizSettings {
            selection_mode: SelectionMode::ByRecency,
            recency: RecencyMode::LastWeek,
            ..QuizSettings::default()
        };
        let picked = candidates(&words, &settings, now);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].display_form, "ny");
    }

    #[test]
    fn test_cannot_start_with_three_candidates() {
        assert!(!can_start(3));
        assert!(can_start(4));
    }

    #[test]
    fn test_every_question_has_four_distinct_options_with_answer() {
        let words = sample_words();
        let questions =
            generate_questions(&words, &words, QuizDirection::SourceToTarget, &mut rng());
        assert_eq!(questions.len(), 4);
        for question in &questions {
            assert_eq!(question.options.len(), 4);
            let mut unique = question.options.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), 4, "options must be distinct");
            let hits = question
                .options
                .iter()
                .filter(|o| o.as_str() == question.correct_answer())
                .count();
            assert_eq!(hits, 1, "correct answer appears exactly once");
        }
    }

    #[test]
    fn test_correct_answer_never_among_distractors() {
        let words = sample_words();
        let questions =
            generate_questions(&words, &words, QuizDirection::TargetToSource, &mut rng());
        for question in &questions {
            let distractors: Vec<&String> = question
                .options
                .iter()
                .filter(|o| o.as_str() != question.correct_answer())
                .collect();
            assert_eq!(distractors.len(), 3);
            assert!(
                distractors
                    .iter()
                    .all(|d| d.as_str() != question.correct_answer())
            );
        }
    }

    #[test]
    fn test_shared_translations_drop_questions() {
        // Four of five words share one translation: asking in the
        // translation direction leaves at most two unique wrong
        // answers, so those questions must be dropped.
        let words = vec![
            word("en", "samma", &[]),
            word("två", "samma", &[]),
            word("tre", "samma", &[]),
            word("fyra", "samma", &[]),
            word("fem", "annan", &[]),
        ];
        let questions =
            generate_questions(&words, &words, QuizDirection::SourceToTarget, &mut rng());
        assert!(questions.len() < words.len());
        assert!(questions.is_empty());
    }

    #[test]
    fn test_distractors_come_from_whole_collection() {
        // All candidates share one translation, so every distractor
        // has to come from the words outside the candidate set.
        let candidate_set = vec![
            word("en", "samma", &["siffror"]),
            word("ett", "samma", &["siffror"]),
            word("först", "samma", &["siffror"]),
            word("ensam", "samma", &["siffror"]),
        ];
        let mut words = candidate_set.clone();
        words.push(word("björn", "ведмідь", &["animals"]));
        words.push(word("varg", "вовк", &["animals"]));
        words.push(word("räv", "лисиця", &["animals"]));

        let questions = generate_questions(
            &words,
            &candidate_set,
            QuizDirection::SourceToTarget,
            &mut rng(),
        );
        assert_eq!(questions.len(), 4);
        let outside = ["ведмідь", "вовк", "лисиця"];
        for question in &questions {
            let distractors: Vec<&String> = question
                .options
                .iter()
                .filter(|o| o.as_str() != "samma")
                .collect();
            assert_eq!(distractors.len(), 3);
            assert!(distractors.iter().all(|d| outside.contains(&d.as_str())));
        }
    }

    #[test]
    fn test_fixed_directions_ignore_rng() {
        // A constant low draw would always pick source-to-target in
        // mixed mode; fixed directions must not consult it at all.
        let mut low = StepRng::new(0, 0);
        assert_eq!(
            resolve_question_type(QuizDirection::SourceToTarget, &mut low),
            QuestionType::SourceToTarget
        );
        assert_eq!(
            resolve_question_type(QuizDirection::TargetToSource, &mut low),
            QuestionType::TargetToSource
        );
    }

    #[test]
    fn test_mixed_direction_follows_coin_flip() {
        let mut low = StepRng::new(0, 0);
        assert_eq!(
            resolve_question_type(QuizDirection::Mixed, &mut low),
            QuestionType::SourceToTarget
        );
        let mut high = StepRng::new(u64::MAX, 0);
        assert_eq!(
            resolve_question_type(QuizDirection::Mixed, &mut high),
            QuestionType::TargetToSource
        );
    }

    #[test]
    fn test_mixed_generation_produces_well_formed_questions() {
        let words = sample_words();
        let questions = generate_questions(&words, &words, QuizDirection::Mixed, &mut rng());
        assert_eq!(questions.len(), 4);
        for question in &questions {
            assert_eq!(question.options.len(), 4);
            assert!(question.options.iter().any(|o| o == question.correct_answer()));
        }
    }

    #[test]
    fn test_full_collection_quiz_round() {
        // Four words, source-to-target, no category filter: four
        // questions whose options are drawn from the four
        // translations.
        let words = sample_words();
        let settings = QuizSettings {
            direction: QuizDirection::SourceToTarget,
            ..QuizSettings::default()
        };
        let picked = candidates(&words, &settings, Utc::now());
        assert_eq!(picked.len(), 4);

        let questions = generate_questions(&words, &picked, settings.direction, &mut rng());
        assert_eq!(questions.len(), 4);

        let translations = ["собака", "кіт", "кінь", "риба"];
        for question in &questions {
            assert!(
                question
                    .options
                    .iter()
                    .all(|o| translations.contains(&o.as_str()))
            );
        }

        let mut session = QuizSession::start(questions);
        while session.state() == QuizState::InProgress {
            let answer = session.current_question().unwrap().correct_answer().to_string();
            assert_eq!(session.answer(&answer), Some(true));
            session.advance();
        }
        assert_eq!(session.state(), QuizState::Finished);
        assert_eq!(session.score_percent(), 100);
        assert!(session.missed_words().is_empty());
    }

    #[test]
    fn test_first_answer_is_final() {
        let words = sample_words();
        let questions =
            generate_questions(&words, &words, QuizDirection::SourceToTarget, &mut rng());
        let mut session = QuizSession::start(questions);

        let correct = session.current_question().unwrap().correct_answer().to_string();
        let wrong = session
            .current_question()
            .unwrap()
            .options
            .iter()
            .find(|o| o.as_str() != correct)
            .unwrap()
            .clone();

        assert_eq!(session.answer(&wrong), Some(false));
        // Changing the answer afterwards is ignored.
        assert_eq!(session.answer(&correct), None);
        assert_eq!(session.score(), 0);
        assert_eq!(session.missed_words().len(), 1);
    }

    #[test]
    fn test_missed_words_keep_order_and_allow_duplicates() {
        let w = word("hund", "собака", &[]);
        let make_question = || QuizQuestion {
            word: w.clone(),
            options: vec![
                "собака".to_string(),
                "кіт".to_string(),
                "кінь".to_string(),
                "риба".to_string(),
            ],
            question_type: QuestionType::SourceToTarget,
        };
        let mut session = QuizSession::start(vec![make_question(), make_question()]);
        session.answer("кіт");
        session.advance();
        session.answer("риба");
        session.advance();

        assert_eq!(session.state(), QuizState::Finished);
        assert_eq!(session.missed_words().len(), 2);
        assert!(session.missed_words().iter().all(|m| m.id == w.id));
    }

    #[test]
    fn test_score_percent_rounds() {
        let words = vec![
            word("a", "1", &[]),
            word("b", "2", &[]),
            word("c", "3", &[]),
            word("d", "4", &[]),
            word("e", "5", &[]),
            word("f", "6", &[]),
        ];
        let questions =
            generate_questions(&words, &words[..3], QuizDirection::SourceToTarget, &mut rng());
        assert_eq!(questions.len(), 3);
        let mut session = QuizSession::start(questions);

        let first = session.current_question().unwrap().correct_answer().to_string();
        session.answer(&first);
        session.advance();
        let wrong = |s: &QuizSession| {
            s.current_question()
                .unwrap()
                .options
                .iter()
                .find(|o| o.as_str() != s.current_question().unwrap().correct_answer())
                .unwrap()
                .clone()
        };
        let w = wrong(&session);
        session.answer(&w);
        session.advance();
        let w = wrong(&session);
        session.answer(&w);
        session.advance();

        // 1 of 3 correct rounds to 33.
        assert_eq!(session.score_percent(), 33);
    }

    #[test]
    fn test_empty_question_set_scores_zero() {
        let mut session = QuizSession::start(Vec::new());
        assert!(session.is_empty());
        assert_eq!(session.score_percent(), 0);
        assert_eq!(session.answer("vad som helst"), None);
    }
}
