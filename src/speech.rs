//! Speech playback plumbing for the reader view.
//!
//! The engine itself is external: implementations synthesize audio and
//! deliver [`SpeechUpdate`]s through an mpsc channel into the UI loop,
//! one at a time. [`HighlightSync`] turns boundary events back into
//! span indices and guards against callbacks from cancelled
//! utterances.

use thiserror::Error;

use crate::tokenizer::TextSpan;

pub type UtteranceId = u64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("The selected language is not available for speech synthesis.")]
    LanguageUnavailable,

    #[error("Speech synthesis failed. The engine may be temporarily unavailable.")]
    SynthesisFailed,

    #[error("Audio playback was blocked.")]
    NotAllowed,

    #[error("The text is too long to speak. Try a shorter passage.")]
    TextTooLong,

    #[error("No voice is available for the selected language.")]
    VoiceUnavailable,

    #[error("Speech error: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// The engine reached the word starting at this char offset.
    Boundary { char_offset: usize },
    End,
    Error(SpeechError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechUpdate {
    pub utterance: UtteranceId,
    pub event: SpeechEvent,
}

/// External text-to-speech engine. `speak` must tag every update it
/// sends with the utterance id it was given; `cancel` stops the active
/// utterance. Implementations must not block the caller.
pub trait SpeechEngine: Send {
    fn speak(&mut self, utterance: UtteranceId, text: &str, rate: f32, language: &str);
    fn cancel(&mut self);
}

/// Maps boundary events from the speech engine back onto tokenizer
/// spans. Each playback is a session keyed by a monotonically
/// increasing utterance id; events tagged with a stale id are dropped,
/// so a cancelled utterance can never touch the highlight again.
#[derive(Debug, Default)]
pub struct HighlightSync {
    spans: Vec<TextSpan>,
    utterance: UtteranceId,
    active: bool,
    highlighted: Option<usize>,
}

impl HighlightSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new session over `spans`, implicitly ending any
    /// previous one, and returns the id the engine must tag events
    /// with.
    pub fn begin(&mut self, spans: Vec<TextSpan>) -> UtteranceId {
        self.utterance += 1;
        self.spans = spans;
        self.active = true;
        self.highlighted = None;
        self.utterance
    }

    /// Stops the current session: clears the highlight and invalidates
    /// events still in flight for it.
    pub fn cancel(&mut self) {
        self.utterance += 1;
        self.active = false;
        self.highlighted = None;
    }

    /// Applies one engine update. Returns false when the update was
    /// stale (cancelled or superseded utterance) and was ignored.
    pub fn apply(&mut self, update: &SpeechUpdate) -> bool {
        if !self.active || update.utterance != self.utterance {
            return false;
        }
        match &update.event {
            SpeechEvent::Boundary { char_offset } => {
                // Offsets landing in separators or out of range leave
                // the previous word lit.
                if let Some(index) = self.word_span_at(*char_offset) {
                    self.highlighted = Some(index);
                }
            }
            SpeechEvent::End | SpeechEvent::Error(_) => {
                self.active = false;
                self.highlighted = None;
            }
        }
        true
    }

    fn word_span_at(&self, offset: usize) -> Option<usize> {
        self.spans
            .iter()
            .position(|span| span.is_word && span.contains(offset))
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_utterance(&self) -> UtteranceId {
        self.utterance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn boundary(utterance: UtteranceId, char_offset: usize) -> SpeechUpdate {
        SpeechUpdate {
            utterance,
            event: SpeechEvent::Boundary { char_offset },
        }
    }

    #[test]
    fn test_boundary_maps_to_word_span_not_separator() {
        let spans = tokenize("Hej  värld");
        let mut sync = HighlightSync::new();
        let id = sync.begin(spans.clone());

        // "värld" starts after "Hej" (3 chars) and two spaces.
        assert!(sync.apply(&boundary(id, 5)));
        let highlighted = sync.highlighted().unwrap();
        assert_eq!(spans[highlighted].text, "värld");
        assert!(spans[highlighted].is_word);
    }

    #[test]
    fn test_boundary_inside_separator_keeps_previous_highlight() {
        let mut sync = HighlightSync::new();
        let id = sync.begin(tokenize("Hej  värld"));

        assert!(sync.apply(&boundary(id, 0)));
        assert_eq!(sync.highlighted(), Some(0));

        // Offset 3 is the first space; engines sometimes report these.
        assert!(sync.apply(&boundary(id, 3)));
        assert_eq!(sync.highlighted(), Some(0));
    }

    #[test]
    fn test_boundary_past_end_is_a_no_op() {
        let mut sync = HighlightSync::new();
        let id = sync.begin(tokenize("kort"));
        assert!(sync.apply(&boundary(id, 99)));
        assert_eq!(sync.highlighted(), None);
    }

    #[test]
    fn test_end_clears_highlight() {
        let mut sync = HighlightSync::new();
        let id = sync.begin(tokenize("Hej värld"));
        sync.apply(&boundary(id, 0));
        assert!(sync.highlighted().is_some());

        sync.apply(&SpeechUpdate {
            utterance: id,
            event: SpeechEvent::End,
        });
        assert_eq!(sync.highlighted(), None);
        assert!(!sync.is_active());
    }

    #[test]
    fn test_cancel_suppresses_in_flight_events() {
        let mut sync = HighlightSync::new();
        let id = sync.begin(tokenize("Hej värld"));
        sync.apply(&boundary(id, 0));
        assert!(sync.highlighted().is_some());

        sync.cancel();
        assert_eq!(sync.highlighted(), None);

        // Events for the cancelled utterance still arrive afterwards.
        assert!(!sync.apply(&boundary(id, 4)));
        assert_eq!(sync.highlighted(), None);
    }

    #[test]
    fn test_new_utterance_invalidates_previous_session() {
        let mut sync = HighlightSync::new();
        let first = sync.begin(tokenize("gammal text"));
        let second = sync.begin(tokenize("ny text"));
        assert_ne!(first, second);

        assert!(!sync.apply(&boundary(first, 0)));
        assert_eq!(sync.highlighted(), None);

        assert!(sync.apply(&boundary(second, 0)));
        assert_eq!(sync.highlighted(), Some(0));
    }

    #[test]
    fn test_error_event_ends_session() {
        let mut sync = HighlightSync::new();
        let id = sync.begin(tokenize("text"));
        sync.apply(&SpeechUpdate {
            utterance: id,
            event: SpeechEvent::Error(SpeechError::SynthesisFailed),
        });
        assert!(!sync.is_active());
        assert_eq!(sync.highlighted(), None);
    }

    #[test]
    fn test_stale_error_event_is_ignored() {
        let mut sync = HighlightSync::new();
        let first = sync.begin(tokenize("text"));
        let second = sync.begin(tokenize("text"));
        assert!(!sync.apply(&SpeechUpdate {
            utterance: first,
            event: SpeechEvent::Error(SpeechError::SynthesisFailed),
        }));
        assert!(sync.is_active());
        assert_eq!(sync.current_utterance(), second);
    }
}
