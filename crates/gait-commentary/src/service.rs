//! Commentary service: one generator call per analysis result.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OnceCell, RwLock};

use gait_analysis::{AnalysisId, AnalysisResult};

use crate::agent::{CommentaryConfig, CommentaryError, CommentaryGenerator, CommentaryInput};

/// Wraps a generator with per-result caching and failure fallback.
///
/// Entries are never evicted on their own. The owner of the results removes
/// the entry of every result it discards with [`invalidate`](Self::invalidate),
/// or drops them all with [`clear`](Self::clear) when the session ends.
pub struct CommentaryService<G> {
    generator: G,
    config: CommentaryConfig,

    /// Commentary per analysis result, filled at most once
    cache: RwLock<HashMap<AnalysisId, Arc<OnceCell<String>>>>,
}

impl<G: CommentaryGenerator> CommentaryService<G> {
    pub fn new(generator: G, config: CommentaryConfig) -> Self {
        Self {
            generator,
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Commentary for `result`.
    ///
    /// The generator runs at most once per result id, also under concurrent
    /// callers. Failures yield the configured fallback message, which is
    /// cached like any other text.
    pub async fn commentary(&self, subject_id: &str, result: &AnalysisResult) -> String {
        let cell = self.cell(result.id).await;

        cell.get_or_init(|| async {
            let input = CommentaryInput::new(subject_id, result.metrics, result.labels);
            match self.generate(&input).await {
                Ok(text) => {
                    tracing::info!(
                        generator = self.generator.name(),
                        analysis = %result.id.0,
                        "Generated commentary"
                    );
                    text
                }
                Err(e) => {
                    tracing::warn!(
                        generator = self.generator.name(),
                        analysis = %result.id.0,
                        error = %e,
                        "Commentary generation failed, using fallback"
                    );
                    self.config.fallback_message.clone()
                }
            }
        })
        .await
        .clone()
    }

    /// Previously generated commentary, if any
    pub async fn cached(&self, id: AnalysisId) -> Option<String> {
        let cache = self.cache.read().await;
        cache.get(&id).and_then(|cell| cell.get().cloned())
    }

    /// Forget commentary for a discarded result
    pub async fn invalidate(&self, id: AnalysisId) {
        let mut cache = self.cache.write().await;
        cache.remove(&id);
    }

    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
    }

    /// Number of results with a cache entry
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    async fn cell(&self, id: AnalysisId) -> Arc<OnceCell<String>> {
        {
            let cache = self.cache.read().await;
            if let Some(cell) = cache.get(&id) {
                return Arc::clone(cell);
            }
        }

        let mut cache = self.cache.write().await;
        Arc::clone(cache.entry(id).or_insert_with(|| Arc::new(OnceCell::new())))
    }

    async fn generate(&self, input: &CommentaryInput) -> Result<String, CommentaryError> {
        self.generator.validate_input(input)?;

        let timeout = Duration::from_millis(self.config.timeout_ms);
        match tokio::time::timeout(timeout, self.generator.generate(input)).await {
            Ok(result) => result,
            Err(_) => Err(CommentaryError::Timeout(self.config.timeout_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{CommentaryResult, FALLBACK_MESSAGE};
    use crate::template::TemplateCommentator;
    use async_trait::async_trait;
    use gait_analysis::{AnalysisConfig, GaitSession};
    use gait_signal::SyntheticWalk;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn analysis() -> AnalysisResult {
        let raw = SyntheticWalk::new()
            .with_seed(3)
            .with_walking_freq(1.8)
            .generate();
        let mut session = GaitSession::from_raw(&raw, AnalysisConfig::default()).unwrap();
        session.detect_events(None).unwrap();
        session.analyze().unwrap()
    }

    /// Counts calls, optionally failing or stalling
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        fail: bool,
        delay_ms: u64,
    }

    #[async_trait]
    impl CommentaryGenerator for Counting {
        fn name(&self) -> &str {
            "Counting"
        }

        async fn generate(&self, input: &CommentaryInput) -> CommentaryResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.fail {
                return Err(CommentaryError::Unavailable);
            }
            Ok(format!("commentary for {}", input.subject_id))
        }
    }

    #[tokio::test]
    async fn test_generates_once_per_result() {
        let service = CommentaryService::new(Counting::default(), CommentaryConfig::default());
        let result = analysis();

        let first = service.commentary("S01", &result).await;
        let second = service.commentary("S01", &result).await;

        assert_eq!(first, "commentary for S01");
        assert_eq!(first, second);
        assert_eq!(service.generator().calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.cached(result.id).await, Some(first));
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_call() {
        let generator = Counting {
            delay_ms: 20,
            ..Default::default()
        };
        let service = CommentaryService::new(generator, CommentaryConfig::default());
        let result = analysis();

        let (a, b) = tokio::join!(
            service.commentary("S01", &result),
            service.commentary("S01", &result)
        );

        assert_eq!(a, b);
        assert_eq!(service.generator().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let generator = Counting {
            fail: true,
            ..Default::default()
        };
        let service = CommentaryService::new(generator, CommentaryConfig::default());
        let result = analysis();

        assert_eq!(service.commentary("S01", &result).await, FALLBACK_MESSAGE);
        assert_eq!(service.commentary("S01", &result).await, FALLBACK_MESSAGE);
        assert_eq!(service.generator().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_configured_fallback_message() {
        let generator = Counting {
            fail: true,
            ..Default::default()
        };
        let config = CommentaryConfig {
            fallback_message: "No commentary today.".to_string(),
            ..Default::default()
        };
        let service = CommentaryService::new(generator, config);

        assert_eq!(service.commentary("S01", &analysis()).await, "No commentary today.");
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let generator = Counting {
            delay_ms: 500,
            ..Default::default()
        };
        let config = CommentaryConfig {
            timeout_ms: 10,
            ..Default::default()
        };
        let service = CommentaryService::new(generator, config);

        assert_eq!(service.commentary("S01", &analysis()).await, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_invalidate_regenerates() {
        let service = CommentaryService::new(Counting::default(), CommentaryConfig::default());
        let result = analysis();

        service.commentary("S01", &result).await;
        service.invalidate(result.id).await;
        assert_eq!(service.cached(result.id).await, None);

        service.commentary("S01", &result).await;
        assert_eq!(service.generator().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_template_commentary() {
        let service =
            CommentaryService::new(TemplateCommentator::new(), CommentaryConfig::default());
        let result = analysis();

        let text = service.commentary("S02", &result).await;
        assert!(text.contains("S02"));
        assert!(text.contains("Left and Right"));

        service.clear().await;
        assert_eq!(service.cached(result.id).await, None);
    }

    #[tokio::test]
    async fn test_entries_live_until_invalidated() {
        let service = CommentaryService::new(Counting::default(), CommentaryConfig::default());
        let first = analysis();
        let second = analysis();
        assert!(service.is_empty().await);

        service.commentary("S01", &first).await;
        service.commentary("S01", &second).await;
        service.commentary("S01", &first).await;
        assert_eq!(service.len().await, 2);

        service.invalidate(first.id).await;
        assert_eq!(service.len().await, 1);
        assert_eq!(service.cached(second.id).await, Some("commentary for S01".to_string()));

        service.clear().await;
        assert!(service.is_empty().await);
    }
}
