//! Locale-aware voice selection
//!
//! Preference order: exact locale match, then any voice sharing the
//! language (so "es-419" satisfies an "es-ES" preference), then the
//! platform default (first reported voice). Selection is cached and
//! re-run when the platform reports its voice list late.

use super::synth::VoiceInfo;

fn language_of(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// Caches the voice chosen for the configured locale
#[derive(Debug)]
pub struct VoiceSelector {
    preferred_locale: String,
    cached: Option<VoiceInfo>,
}

impl VoiceSelector {
    pub fn new(preferred_locale: &str) -> Self {
        Self {
            preferred_locale: preferred_locale.to_string(),
            cached: None,
        }
    }

    /// Re-run selection over the currently reported voices
    pub fn select(&mut self, available: &[VoiceInfo]) -> Option<&VoiceInfo> {
        let language = language_of(&self.preferred_locale);
        let chosen = available
            .iter()
            .find(|v| v.locale == self.preferred_locale)
            .or_else(|| {
                available
                    .iter()
                    .find(|v| language_of(&v.locale) == language)
            })
            .or_else(|| available.first());
        self.cached = chosen.cloned();
        self.cached.as_ref()
    }

    /// The cached selection, if any voice list has been seen
    pub fn cached(&self) -> Option<&VoiceInfo> {
        self.cached.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(id: &str, locale: &str) -> VoiceInfo {
        VoiceInfo {
            id: id.to_string(),
            locale: locale.to_string(),
        }
    }

    #[test]
    fn test_exact_locale_preferred() {
        let mut selector = VoiceSelector::new("es-ES");
        let voices = [voice("a", "en-US"), voice("b", "es-419"), voice("c", "es-ES")];
        assert_eq!(selector.select(&voices).unwrap().id, "c");
    }

    #[test]
    fn test_language_prefix_fallback() {
        let mut selector = VoiceSelector::new("es-ES");
        let voices = [voice("a", "en-US"), voice("b", "es-419")];
        assert_eq!(selector.select(&voices).unwrap().id, "b");
    }

    #[test]
    fn test_platform_default_fallback() {
        let mut selector = VoiceSelector::new("es-ES");
        let voices = [voice("a", "en-US"), voice("b", "fr-FR")];
        assert_eq!(selector.select(&voices).unwrap().id, "a");
    }

    #[test]
    fn test_empty_list_selects_nothing() {
        let mut selector = VoiceSelector::new("es-ES");
        assert!(selector.select(&[]).is_none());
        assert!(selector.cached().is_none());
    }

    #[test]
    fn test_late_voice_list_replaces_cache() {
        let mut selector = VoiceSelector::new("es-ES");
        selector.select(&[voice("a", "en-US")]);
        assert_eq!(selector.cached().unwrap().id, "a");

        selector.select(&[voice("a", "en-US"), voice("b", "es-ES")]);
        assert_eq!(selector.cached().unwrap().id, "b");
    }
}
