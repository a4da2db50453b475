use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use glosor::ai_worker::spawn_ai_worker;
use glosor::categories;
use glosor::config::{self, Config};
use glosor::models::{AiRequest, AiResponse, AppState, WordEntry};
use glosor::quiz::{candidates, generate_questions, QuizSession};
use glosor::speech::{SpeechEngine, SpeechEvent, SpeechUpdate};
use glosor::store::{self, Store};
use glosor::tokenizer::tokenize;
use glosor::ui::{
    draw_library, draw_quiz, draw_quiz_setup, draw_reader, draw_summary, draw_texts,
    handle_library_input, handle_quiz_input, handle_quiz_setup_input, handle_reader_input,
    handle_texts_input, LibraryEffect, LibraryView, PendingWords, QuizEffect, QuizSetupView,
    QuizView, ReaderEffect, ReaderView, SetupEffect, TextsEffect, TextsView,
};
use glosor::vocabulary::{initial_category_ids, Library};
use glosor::{logger, GlosorError};

/// No speech engine ships with the terminal build. An integration
/// implements `SpeechEngine`, delivers its events through `tx`, and is
/// returned here; the reader reports playback as unavailable
/// otherwise.
fn create_speech_engine(_tx: &Sender<SpeechUpdate>) -> Option<Box<dyn SpeechEngine>> {
    None
}

struct App {
    state: AppState,
    library: Library,
    library_view: LibraryView,
    reader: ReaderView,
    texts_view: TextsView,
    quiz_setup: QuizSetupView,
    quiz_view: QuizView,
    quiz_session: Option<QuizSession>,
    status: Option<String>,
    store: Store,
    config: Config,
    ai_tx: Sender<AiRequest>,
    speech_engine: Option<Box<dyn SpeechEngine>>,
}

impl App {
    fn save_library(&mut self) {
        let results = [
            self.store.save(store::WORDS_KEY, &self.library.words),
            self.store
                .save(store::CATEGORIES_KEY, &self.library.thematic),
            self.store.save(store::FOLDERS_KEY, &self.library.folders),
            self.store.save(store::TEXTS_KEY, &self.library.texts),
        ];
        for result in results {
            if let Err(e) = result {
                logger::log(&format!("Failed to save snapshot: {}", e));
                self.status = Some(format!("Failed to save changes: {}", e));
            }
        }
    }

    fn send_ai_request(&mut self, request: AiRequest) {
        if self.ai_tx.send(request).is_err() {
            self.library_view.loading = false;
            self.reader.loading = false;
            self.status = Some(GlosorError::AiUnavailable.to_string());
        }
    }

    fn handle_ai_response(&mut self, response: AiResponse) {
        match response {
            AiResponse::WordDetails { word, entries } => {
                if self.reader.loading {
                    // Words picked in the reader are added directly,
                    // with only their automatic part-of-speech
                    // category.
                    self.reader.loading = false;
                    let new_entries: Vec<WordEntry> = entries
                        .into_iter()
                        .map(|details| {
                            let ids = initial_category_ids(&details.part_of_speech, &[]);
                            WordEntry::from_details(&word, details, ids)
                        })
                        .collect();
                    self.library.add_words(new_entries);
                    self.save_library();
                } else {
                    self.library_view.loading = false;
                    self.library_view.pending = Some(PendingWords {
                        base_form: word,
                        entries,
                        selected_category_ids: Vec::new(),
                        category_cursor: 0,
                    });
                }
            }
            AiResponse::NewExample { word_id, example } => {
                self.library_view.loading = false;
                self.library
                    .append_example(word_id, glosor::Example::from_pair(example));
                self.save_library();
            }
            AiResponse::Failed { message } => {
                self.library_view.loading = false;
                self.reader.loading = false;
                self.status = Some(message);
            }
        }
    }

    fn handle_speech_update(&mut self, update: SpeechUpdate) {
        if self.reader.sync.apply(&update)
            && let SpeechEvent::Error(e) = &update.event
        {
            self.status = Some(e.to_string());
        }
    }

    fn start_speaking(&mut self) {
        let Some(engine) = self.speech_engine.as_mut() else {
            self.status = Some("Speech synthesis is not available in this build.".to_string());
            return;
        };
        // A new utterance always replaces the active one.
        engine.cancel();
        let utterance = self.reader.sync.begin(tokenize(&self.reader.content));
        engine.speak(
            utterance,
            &self.reader.content,
            self.reader.rate,
            &self.config.speech_language,
        );
    }

    fn stop_speaking(&mut self) {
        if let Some(engine) = self.speech_engine.as_mut() {
            engine.cancel();
        }
        self.reader.sync.cancel();
    }

    fn start_quiz(&mut self) {
        let picked = candidates(
            &self.library.words,
            &self.quiz_setup.settings,
            chrono::Utc::now(),
        );
        let questions = generate_questions(
            &self.library.words,
            &picked,
            self.quiz_setup.settings.direction,
            &mut rand::thread_rng(),
        );
        if questions.is_empty() {
            // Enough candidates, but none of them could get three
            // unique distractors.
            self.status = Some(
                "Could not build any questions from the selected words; too many share the same translation."
                    .to_string(),
            );
            self.state = AppState::QuizSetup;
            return;
        }
        self.quiz_session = Some(QuizSession::start(questions));
        self.quiz_view = QuizView::default();
        self.state = AppState::Quiz;
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.status = None;

        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            return false;
        }

        // View switching works everywhere except inside a running
        // quiz, which must be abandoned explicitly.
        if self.state != AppState::Quiz {
            match key.code {
                KeyCode::F(1) => {
                    self.state = AppState::Library;
                    return true;
                }
                KeyCode::F(2) => {
                    self.state = AppState::Reader;
                    return true;
                }
                KeyCode::F(3) => {
                    self.state = AppState::Texts;
                    return true;
                }
                KeyCode::F(4) => {
                    self.state = AppState::QuizSetup;
                    return true;
                }
                _ => {}
            }
        }

        match self.state {
            AppState::Library => {
                let effect = handle_library_input(&mut self.library_view, &mut self.library, key);
                match effect {
                    LibraryEffect::FetchDetails(word) => {
                        self.send_ai_request(AiRequest::WordDetails { word })
                    }
                    LibraryEffect::FetchExample {
                        word_id,
                        word,
                        existing,
                    } => self.send_ai_request(AiRequest::NewExample {
                        word_id,
                        word,
                        existing,
                    }),
                    LibraryEffect::Save => self.save_library(),
                    LibraryEffect::None => {}
                }
            }
            AppState::Reader => {
                let effect = handle_reader_input(&mut self.reader, &self.library, key);
                match effect {
                    ReaderEffect::Speak => self.start_speaking(),
                    ReaderEffect::CancelSpeech => self.stop_speaking(),
                    ReaderEffect::SaveText => {
                        match self.library.save_text(&self.reader.title, &self.reader.content) {
                            Ok(()) => self.save_library(),
                            Err(e) => self.status = Some(e.to_string()),
                        }
                    }
                    ReaderEffect::AddWord(word) => {
                        self.send_ai_request(AiRequest::WordDetails { word })
                    }
                    ReaderEffect::None => {}
                }
            }
            AppState::Texts => {
                let effect = handle_texts_input(&mut self.texts_view, &mut self.library, key);
                match effect {
                    TextsEffect::Open(text) => {
                        self.stop_speaking();
                        self.reader.open_text(&text);
                        self.state = AppState::Reader;
                    }
                    TextsEffect::Save => self.save_library(),
                    TextsEffect::None => {}
                }
            }
            AppState::QuizSetup => {
                let effect = handle_quiz_setup_input(&mut self.quiz_setup, &self.library, key);
                if effect == SetupEffect::Start {
                    self.start_quiz();
                }
            }
            AppState::Quiz => {
                if let Some(session) = self.quiz_session.as_mut() {
                    match handle_quiz_input(&mut self.quiz_view, session, key) {
                        QuizEffect::Abandon => {
                            self.quiz_session = None;
                            self.state = AppState::QuizSetup;
                        }
                        QuizEffect::Finished => self.state = AppState::QuizSummary,
                        QuizEffect::None => {}
                    }
                } else {
                    self.state = AppState::QuizSetup;
                }
            }
            AppState::QuizSummary => match key.code {
                KeyCode::Char('r') => self.start_quiz(),
                KeyCode::Char('n') => {
                    self.quiz_session = None;
                    self.state = AppState::QuizSetup;
                }
                _ => {}
            },
        }

        true
    }
}

fn load_library(store: &Store) -> Result<Library, GlosorError> {
    let words = store.load(store::WORDS_KEY)?.unwrap_or_default();
    let thematic = store
        .load(store::CATEGORIES_KEY)?
        .unwrap_or_else(categories::default_thematic_categories);
    let folders = store.load(store::FOLDERS_KEY)?.unwrap_or_default();
    let texts = store.load(store::TEXTS_KEY)?.unwrap_or_default();
    Ok(Library::new(words, thematic, folders, texts))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init();
    let config = config::load();

    let store = Store::open(&config.database_path)?;
    let library = load_library(&store)?;

    let (ai_tx, worker_rx) = mpsc::channel::<AiRequest>();
    let (worker_tx, ai_rx) = mpsc::channel::<AiResponse>();
    let _worker = spawn_ai_worker(
        config.source_language.clone(),
        config.target_language.clone(),
        worker_tx,
        worker_rx,
    );

    let (speech_tx, speech_rx) = mpsc::channel::<SpeechUpdate>();
    let speech_engine = create_speech_engine(&speech_tx);

    let reader = ReaderView::new(config.playback_rate);
    let mut app = App {
        state: AppState::Library,
        library,
        library_view: LibraryView::default(),
        reader,
        texts_view: TextsView::default(),
        quiz_setup: QuizSetupView::default(),
        quiz_view: QuizView::default(),
        quiz_session: None,
        status: None,
        store,
        config,
        ai_tx,
        speech_engine,
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &ai_rx, &speech_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    ai_rx: &Receiver<AiResponse>,
    speech_rx: &Receiver<SpeechUpdate>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Worker and engine messages arrive between key events; they
        // are drained one at a time on this thread.
        while let Ok(response) = ai_rx.try_recv() {
            app.handle_ai_response(response);
        }
        while let Ok(update) = speech_rx.try_recv() {
            app.handle_speech_update(update);
        }

        terminal.draw(|f| match app.state {
            AppState::Library => {
                draw_library(f, &app.library_view, &app.library, app.status.as_deref())
            }
            AppState::Reader => draw_reader(
                f,
                &app.reader,
                &app.library,
                app.speech_engine.is_some(),
                app.status.as_deref(),
            ),
            AppState::Texts => {
                draw_texts(f, &app.texts_view, &app.library, app.status.as_deref())
            }
            AppState::QuizSetup => draw_quiz_setup(f, &app.quiz_setup, &app.library),
            AppState::Quiz => {
                if let Some(session) = &app.quiz_session {
                    draw_quiz(f, &app.quiz_view, session);
                }
            }
            AppState::QuizSummary => {
                if let Some(session) = &app.quiz_session {
                    draw_summary(f, session);
                }
            }
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && !app.handle_key(key)
        {
            break;
        }
    }

    Ok(())
}
