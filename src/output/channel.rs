//! Serialized speech output channel

use std::sync::Arc;

use tokio::sync::{broadcast, oneshot, watch, Mutex};
use tracing::debug;

use crate::config::AccessibilityConfig;
use crate::events::VoiceEvent;

use super::synth::{SynthesizerBackend, Utterance, VoiceInfo};
use super::voices::VoiceSelector;

/// Speaking state owned by the output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakingState {
    Idle,
    Speaking,
}

impl std::fmt::Display for SpeakingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeakingState::Idle => write!(f, "Idle"),
            SpeakingState::Speaking => write!(f, "Speaking"),
        }
    }
}

struct ChannelInner {
    state: SpeakingState,
    /// Ties each completion signal to the utterance that produced it, so
    /// a cancelled utterance cannot flip a newer one back to Idle
    generation: u64,
    voices: VoiceSelector,
}

/// The single audio-output owner.
///
/// Enforces at-most-one audible utterance: an interrupting `speak`
/// cancels in-flight speech first, a non-interrupting `speak` is
/// dropped while busy (never queued).
pub struct SpeakerChannel {
    backend: Arc<dyn SynthesizerBackend>,
    config: watch::Receiver<AccessibilityConfig>,
    events: broadcast::Sender<VoiceEvent>,
    inner: Arc<Mutex<ChannelInner>>,
}

impl SpeakerChannel {
    pub fn new(
        backend: Arc<dyn SynthesizerBackend>,
        config: watch::Receiver<AccessibilityConfig>,
        events: broadcast::Sender<VoiceEvent>,
    ) -> Self {
        let mut voices = VoiceSelector::new(&config.borrow().locale);
        voices.select(&backend.voices());
        Self {
            backend,
            config,
            events,
            inner: Arc::new(Mutex::new(ChannelInner {
                state: SpeakingState::Idle,
                generation: 0,
                voices,
            })),
        }
    }

    /// Speak one utterance. Returns whether it started.
    ///
    /// `interrupt = true` cancels any in-flight speech first;
    /// `interrupt = false` drops this text if the channel is busy.
    pub async fn speak(&self, text: &str, interrupt: bool) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        let mut inner = self.inner.lock().await;
        if inner.state == SpeakingState::Speaking {
            if !interrupt {
                debug!(text, "utterance dropped, channel busy");
                let _ = self.events.send(VoiceEvent::SpeechDropped {
                    text: text.to_string(),
                });
                return false;
            }
            self.backend.cancel();
        }

        // Platforms may report their voice list late; retry selection
        // until a voice is known
        if inner.voices.cached().is_none() {
            let available = self.backend.voices();
            inner.voices.select(&available);
        }

        inner.generation += 1;
        let generation = inner.generation;
        inner.state = SpeakingState::Speaking;

        let utterance = Utterance {
            text: text.to_string(),
            interrupt_prior: interrupt,
        };
        let (done_tx, done_rx) = oneshot::channel();
        self.backend.utter(&utterance, inner.voices.cached(), done_tx);
        drop(inner);

        let inner_arc = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let _ = done_rx.await;
            let mut inner = inner_arc.lock().await;
            if inner.generation == generation {
                inner.state = SpeakingState::Idle;
            }
        });

        true
    }

    /// Narration entry point for screens. Speaks only when the current
    /// accessibility mode auto-narrates.
    pub async fn narrate(&self, text: &str) -> bool {
        if !self.config.borrow().auto_narrate() {
            return false;
        }
        self.speak(text, true).await
    }

    /// Cancel any in-flight utterance. Idempotent.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state == SpeakingState::Speaking {
            self.backend.cancel();
        }
        inner.generation += 1;
        inner.state = SpeakingState::Idle;
    }

    /// Whether an utterance is currently audible
    pub async fn is_speaking(&self) -> bool {
        self.inner.lock().await.state == SpeakingState::Speaking
    }

    /// Current speaking state
    pub async fn state(&self) -> SpeakingState {
        self.inner.lock().await.state
    }

    /// Re-run voice selection after the platform reports a changed
    /// voice list
    pub async fn refresh_voices(&self) {
        let available = self.backend.voices();
        let mut inner = self.inner.lock().await;
        inner.voices.select(&available);
    }

    /// The currently selected voice, if any
    pub async fn selected_voice(&self) -> Option<VoiceInfo> {
        self.inner.lock().await.voices.cached().cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use super::*;
    use crate::output::synth::UtteranceOutcome;

    #[derive(Default)]
    struct FakeSynth {
        voices: StdMutex<Vec<VoiceInfo>>,
        /// Order of backend calls: "utter:<text>" and "cancel"
        log: StdMutex<Vec<String>>,
        /// Voice passed with each utterance
        used_voices: StdMutex<Vec<Option<String>>>,
        pending: StdMutex<Vec<oneshot::Sender<UtteranceOutcome>>>,
    }

    impl FakeSynth {
        fn with_voices(voices: Vec<VoiceInfo>) -> Self {
            Self {
                voices: StdMutex::new(voices),
                ..Self::default()
            }
        }

        fn set_voices(&self, voices: Vec<VoiceInfo>) {
            *self.voices.lock().unwrap() = voices;
        }

        fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }

        fn active_count(&self) -> usize {
            self.pending.lock().unwrap().len()
        }

        fn complete_next(&self) {
            let sender = self.pending.lock().unwrap().remove(0);
            let _ = sender.send(UtteranceOutcome::Completed);
        }
    }

    impl SynthesizerBackend for FakeSynth {
        fn voices(&self) -> Vec<VoiceInfo> {
            self.voices.lock().unwrap().clone()
        }

        fn utter(
            &self,
            utterance: &Utterance,
            voice: Option<&VoiceInfo>,
            done: oneshot::Sender<UtteranceOutcome>,
        ) {
            self.log
                .lock()
                .unwrap()
                .push(format!("utter:{}", utterance.text));
            self.used_voices
                .lock()
                .unwrap()
                .push(voice.map(|v| v.id.clone()));
            self.pending.lock().unwrap().push(done);
        }

        fn cancel(&self) {
            self.log.lock().unwrap().push("cancel".to_string());
            // Cancelling resolves the pending utterance, as platforms do
            for sender in self.pending.lock().unwrap().drain(..) {
                let _ = sender.send(UtteranceOutcome::Cancelled);
            }
        }
    }

    fn channel_with(backend: Arc<FakeSynth>) -> (SpeakerChannel, broadcast::Receiver<VoiceEvent>) {
        let (_cfg_tx, cfg_rx) = watch::channel(AccessibilityConfig::default());
        let (event_tx, event_rx) = broadcast::channel(16);
        (SpeakerChannel::new(backend, cfg_rx, event_tx), event_rx)
    }

    async fn until_idle(channel: &SpeakerChannel) {
        for _ in 0..100 {
            if !channel.is_speaking().await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("channel never settled to Idle");
    }

    #[tokio::test]
    async fn test_interrupt_cancels_prior_utterance() {
        let backend = Arc::new(FakeSynth::default());
        let (channel, _) = channel_with(backend.clone());

        assert!(channel.speak("A", true).await);
        assert!(channel.speak("B", true).await);

        // A was cancelled before B started; only B is audible
        assert_eq!(backend.log(), vec!["utter:A", "cancel", "utter:B"]);
        assert_eq!(backend.active_count(), 1);
        assert!(channel.is_speaking().await);
    }

    #[tokio::test]
    async fn test_cancelled_utterance_cannot_idle_its_successor() {
        let backend = Arc::new(FakeSynth::default());
        let (channel, _) = channel_with(backend.clone());

        channel.speak("A", true).await;
        channel.speak("B", true).await;

        // A's Cancelled completion has been delivered; B must stay Speaking
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(channel.is_speaking().await);

        backend.complete_next();
        until_idle(&channel).await;
    }

    #[tokio::test]
    async fn test_non_interrupting_speech_is_dropped_not_queued() {
        let backend = Arc::new(FakeSynth::default());
        let (channel, mut event_rx) = channel_with(backend.clone());

        assert!(channel.speak("A", true).await);
        assert!(!channel.speak("B", false).await);

        assert_eq!(backend.log(), vec!["utter:A"]);
        assert!(channel.is_speaking().await);
        let event = event_rx.recv().await.unwrap();
        assert!(matches!(event, VoiceEvent::SpeechDropped { text } if text == "B"));

        // Completing A must not resurrect B
        backend.complete_next();
        until_idle(&channel).await;
        assert_eq!(backend.log(), vec!["utter:A"]);
    }

    #[tokio::test]
    async fn test_non_interrupting_speech_starts_when_idle() {
        let backend = Arc::new(FakeSynth::default());
        let (channel, _) = channel_with(backend.clone());

        assert!(channel.speak("A", false).await);
        assert_eq!(backend.log(), vec!["utter:A"]);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let backend = Arc::new(FakeSynth::default());
        let (channel, _) = channel_with(backend.clone());

        channel.speak("A", true).await;
        channel.stop().await;
        assert!(!channel.is_speaking().await);
        channel.stop().await;
        assert!(!channel.is_speaking().await);
    }

    #[tokio::test]
    async fn test_empty_text_is_ignored() {
        let backend = Arc::new(FakeSynth::default());
        let (channel, _) = channel_with(backend.clone());

        assert!(!channel.speak("", true).await);
        assert!(!channel.speak("   ", true).await);
        assert!(backend.log().is_empty());
    }

    #[tokio::test]
    async fn test_voice_selection_prefers_configured_locale() {
        let backend = Arc::new(FakeSynth::with_voices(vec![
            VoiceInfo {
                id: "en".to_string(),
                locale: "en-US".to_string(),
            },
            VoiceInfo {
                id: "es".to_string(),
                locale: "es-419".to_string(),
            },
        ]));
        let (channel, _) = channel_with(backend.clone());

        channel.speak("hola", true).await;
        assert_eq!(
            backend.used_voices.lock().unwrap().as_slice(),
            &[Some("es".to_string())]
        );
    }

    #[tokio::test]
    async fn test_late_voice_list_is_picked_up() {
        let backend = Arc::new(FakeSynth::default());
        let (channel, _) = channel_with(backend.clone());
        assert!(channel.selected_voice().await.is_none());

        backend.set_voices(vec![VoiceInfo {
            id: "es".to_string(),
            locale: "es-ES".to_string(),
        }]);
        channel.refresh_voices().await;
        assert_eq!(channel.selected_voice().await.unwrap().id, "es");
    }

    #[tokio::test]
    async fn test_speak_retries_selection_while_cache_is_empty() {
        let backend = Arc::new(FakeSynth::default());
        let (channel, _) = channel_with(backend.clone());

        // Voices arrive after construction, before any refresh call
        backend.set_voices(vec![VoiceInfo {
            id: "es".to_string(),
            locale: "es-ES".to_string(),
        }]);
        channel.speak("hola", true).await;
        assert_eq!(
            backend.used_voices.lock().unwrap().as_slice(),
            &[Some("es".to_string())]
        );
    }

    #[tokio::test]
    async fn test_narrate_honors_vision_mode() {
        let backend = Arc::new(FakeSynth::default());
        let (cfg_tx, cfg_rx) = watch::channel(AccessibilityConfig::default());
        let (event_tx, _) = broadcast::channel(16);
        let channel = SpeakerChannel::new(backend.clone(), cfg_rx, event_tx);

        // Standard mode: ambient narration stays silent
        assert!(!channel.narrate("Pantalla principal").await);
        assert!(backend.log().is_empty());

        cfg_tx
            .send_modify(|c| c.vision_mode = crate::config::AccessibilityMode::Blind);
        assert!(channel.narrate("Pantalla principal").await);
        assert_eq!(backend.log(), vec!["utter:Pantalla principal"]);
    }
}
