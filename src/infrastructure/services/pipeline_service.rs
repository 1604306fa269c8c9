//! Pipeline service - end-to-end content generation orchestration

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::PipelineSettings;
use crate::domain::artifact::{PipelineInput, PipelineOutput, QualityReport};
use crate::domain::generation::{GenerationProvider, GenerationRequest, Usage};
use crate::domain::DomainError;
use crate::infrastructure::budget::{BudgetManager, ResourceTier};
use crate::infrastructure::cache::FingerprintCache;
use crate::infrastructure::humanize::Humanizer;
use crate::infrastructure::parser::DraftParser;
use crate::infrastructure::quality::QualityGate;

/// Cache intent for full pipeline runs
const CACHE_INTENT: &str = "generate";

/// Orchestration knobs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Repair rounds allowed after a failed quality check
    pub max_repair_attempts: u32,
    /// When false, a failed check returns the draft as-is
    pub auto_repair: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_repair_attempts: 1,
            auto_repair: true,
        }
    }
}

impl From<&PipelineSettings> for PipelineConfig {
    fn from(settings: &PipelineSettings) -> Self {
        Self {
            max_repair_attempts: settings.max_repair_attempts,
            auto_repair: settings.auto_repair,
        }
    }
}

/// One generation round: drafted, humanized, and quality-checked
struct Attempt {
    title: String,
    description: String,
    slug: String,
    body: String,
    report: QualityReport,
    usage: Usage,
}

/// Drives a content request through caching, budgeting, generation,
/// parsing, humanization, and the quality gate, with bounded
/// repair-retry on failure.
///
/// Only publishable outputs are cached; a provider error aborts the run
/// without caching anything.
#[derive(Debug)]
pub struct PipelineService {
    cache: Arc<FingerprintCache>,
    budget: Arc<BudgetManager>,
    provider: Arc<dyn GenerationProvider>,
    gate: QualityGate,
    humanizer: Humanizer,
    parser: DraftParser,
    config: PipelineConfig,
}

impl PipelineService {
    pub fn new(
        cache: Arc<FingerprintCache>,
        budget: Arc<BudgetManager>,
        provider: Arc<dyn GenerationProvider>,
    ) -> Self {
        Self {
            cache,
            budget,
            provider,
            gate: QualityGate::new(),
            humanizer: Humanizer::new(),
            parser: DraftParser::new(),
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_humanizer(mut self, humanizer: Humanizer) -> Self {
        self.humanizer = humanizer;
        self
    }

    /// Runs the full pipeline for one input.
    ///
    /// A publishable cached output short-circuits everything else. After
    /// the configured repair rounds are spent, the last draft is returned
    /// with its failing report intact rather than discarded.
    pub async fn generate(&self, input: PipelineInput) -> Result<PipelineOutput, DomainError> {
        let started = Instant::now();

        if let Some(mut cached) = self
            .cache
            .get::<PipelineOutput>(&input.topic, CACHE_INTENT, input.category)
            .await
        {
            if cached.quality.can_publish {
                info!(topic = %input.topic, "Serving pipeline output from cache");
                cached.from_cache = true;
                cached.elapsed_ms = elapsed_ms(started);
                return Ok(cached);
            }
        }

        let tier = self.budget.select_tier(input.category);
        debug!(topic = %input.topic, tier = tier.name, "Selected resource tier");

        let pruned = self.budget.prune_context(
            &input.context,
            input.prior_article.as_deref(),
            tier.max_input_tokens,
        );
        if !pruned.skipped.is_empty() {
            debug!(skipped = ?pruned.skipped, "Context classes dropped to fit the input budget");
        }

        let system_prompt = self.budget.compress_prompt(&Self::system_prompt(&input));
        let user_prompt = self
            .budget
            .compress_prompt(&Self::user_prompt(&input, pruned.render()));

        let mut attempt = self
            .run_attempt(&input.topic, tier, &system_prompt, &user_prompt)
            .await?;
        let mut total_usage = attempt.usage;

        let mut rounds = 0;
        while !attempt.report.can_publish
            && self.config.auto_repair
            && rounds < self.config.max_repair_attempts
        {
            rounds += 1;
            info!(
                topic = %input.topic,
                round = rounds,
                issues = attempt.report.issues.len(),
                "Quality check failed, attempting repair"
            );

            let repair_prompt = self
                .budget
                .compress_prompt(&Self::repair_prompt(&attempt.body, &attempt.report));
            attempt = self
                .run_attempt(&input.topic, tier, &system_prompt, &repair_prompt)
                .await?;
            total_usage = add_usage(total_usage, attempt.usage);
        }

        self.finish(&input, attempt, total_usage, started).await
    }

    /// One explicit repair round against a previously returned draft.
    ///
    /// Useful when the caller wants to spend more rounds than the
    /// configured limit, or gathered new context in between.
    pub async fn retry_with_fixes(
        &self,
        input: &PipelineInput,
        previous: &PipelineOutput,
    ) -> Result<PipelineOutput, DomainError> {
        let started = Instant::now();
        let tier = self.budget.select_tier(input.category);

        let system_prompt = self.budget.compress_prompt(&Self::system_prompt(input));
        let repair_prompt = self
            .budget
            .compress_prompt(&Self::repair_prompt(&previous.body, &previous.quality));

        let attempt = self
            .run_attempt(&input.topic, tier, &system_prompt, &repair_prompt)
            .await?;
        let usage = attempt.usage;

        self.finish(input, attempt, usage, started).await
    }

    async fn run_attempt(
        &self,
        topic: &str,
        tier: &ResourceTier,
        system_prompt: &str,
        prompt: &str,
    ) -> Result<Attempt, DomainError> {
        let request = GenerationRequest::builder(prompt)
            .system_prompt(system_prompt)
            .max_output_tokens(tier.max_output_tokens)
            .temperature(tier.temperature)
            .build();

        let response = self.provider.generate(request).await?;

        // Provider-reported usage wins; otherwise estimate from lengths
        let usage = response.usage.unwrap_or_else(|| {
            Usage::new(
                self.budget.estimate_tokens(system_prompt) + self.budget.estimate_tokens(prompt),
                self.budget.estimate_tokens(&response.text),
            )
        });
        self.budget
            .track_usage(u64::from(usage.prompt_tokens), u64::from(usage.completion_tokens));

        let draft = self.parser.parse(&response.text, topic);
        let body = self.humanizer.humanize(&draft.body);
        let report = self.gate.preflight_check(&body, topic);

        Ok(Attempt {
            title: draft.title,
            description: draft.description,
            slug: draft.slug,
            body,
            report,
            usage,
        })
    }

    async fn finish(
        &self,
        input: &PipelineInput,
        attempt: Attempt,
        usage: Usage,
        started: Instant,
    ) -> Result<PipelineOutput, DomainError> {
        let publishable = attempt.report.can_publish;

        let mut output =
            PipelineOutput::new(attempt.title, attempt.description, attempt.slug, attempt.body)
                .with_quality(attempt.report)
                .with_usage(usage);
        output.elapsed_ms = elapsed_ms(started);

        if publishable {
            self.cache
                .set(&input.topic, CACHE_INTENT, input.category, &output)
                .await;
            info!(
                topic = %input.topic,
                words = output.word_count,
                confidence = output.quality.score.confidence,
                "Pipeline output published and cached"
            );
        } else {
            warn!(
                topic = %input.topic,
                issues = ?output.quality.issues,
                "Returning draft that failed the quality gate"
            );
        }

        Ok(output)
    }

    fn system_prompt(input: &PipelineInput) -> String {
        format!(
            "You are a senior editor writing a long-form article about {}.\n\
             Write 2500 to 3200 words of markdown with clear section headings.\n\
             Mark internal links as {{{{link:slug}}}} using only the provided candidate slugs; include at least 6.\n\
             Mark external references as [[cite:url]]; include at least 2.\n\
             Respond with a single JSON object with fields title, description, slug, and body.",
            input.topic
        )
    }

    fn user_prompt(input: &PipelineInput, rendered_context: String) -> String {
        let mut prompt = format!("Topic: {}\n", input.topic);

        if !rendered_context.is_empty() {
            prompt.push_str("\nBackground material:\n");
            prompt.push_str(&rendered_context);
            prompt.push('\n');
        }

        if !input.cross_links.is_empty() {
            prompt.push_str("\nInternal link candidates:\n");
            for candidate in &input.cross_links {
                prompt.push_str(&format!("- {} ({})\n", candidate.slug, candidate.title));
            }
        }

        prompt
    }

    fn repair_prompt(body: &str, report: &QualityReport) -> String {
        let mut prompt = String::from(
            "The draft below failed editorial review. Revise it to address every issue \
             while keeping the structure, internal link markers, and citations.\n\nIssues:\n",
        );
        for issue in &report.issues {
            prompt.push_str(&format!("- {}\n", issue));
        }
        if !report.suggestions.is_empty() {
            prompt.push_str("\nSuggestions:\n");
            for suggestion in &report.suggestions {
                prompt.push_str(&format!("- {}\n", suggestion));
            }
        }
        prompt.push_str("\nDraft:\n");
        prompt.push_str(body);
        prompt.push_str("\n\nReturn the full corrected article in the same JSON envelope.");
        prompt
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn add_usage(a: Usage, b: Usage) -> Usage {
    Usage::new(
        a.prompt_tokens + b.prompt_tokens,
        a.completion_tokens + b.completion_tokens,
    )
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::domain::artifact::ArtifactCategory;
    use crate::domain::generation::{GenerationResponse, MockGenerationProvider};
    use crate::infrastructure::cache::CacheConfig;
    use crate::infrastructure::quality::passing_article;

    use super::*;

    const TOPIC: &str = "ergonomic keyboards";

    fn envelope(body: &str) -> GenerationResponse {
        let json = serde_json::json!({
            "title": "The honest guide to ergonomic keyboards",
            "description": "What actually matters when you pick one.",
            "slug": "ergonomic-keyboards-guide",
            "body": body,
        })
        .to_string();
        GenerationResponse::new(json).with_usage(Usage::new(1_200, 2_900))
    }

    /// A fixed seed keeps the humanization pass reproducible across runs
    /// while still exercising its probabilistic branches.
    fn service(provider: MockGenerationProvider) -> (PipelineService, Arc<MockGenerationProvider>) {
        let provider = Arc::new(provider);
        let cache = Arc::new(FingerprintCache::new(CacheConfig::default()));
        let budget = Arc::new(BudgetManager::default());
        let service = PipelineService::new(cache, budget, provider.clone())
            .with_humanizer(Humanizer::with_rng(StdRng::seed_from_u64(42)));
        (service, provider)
    }

    fn input() -> PipelineInput {
        PipelineInput::new(TOPIC, ArtifactCategory::GeneratedArticle)
    }

    #[tokio::test]
    async fn test_publishable_draft_is_cached_and_reused() {
        let provider = MockGenerationProvider::new("mock")
            .with_response(envelope(&passing_article(TOPIC)));
        let (service, provider) = service(provider);

        let first = service.generate(input()).await.unwrap();
        assert!(first.quality.can_publish);
        assert!(!first.from_cache);
        assert!(first.word_count >= 2_500);
        assert_eq!(first.usage.prompt_tokens, 1_200);
        assert_eq!(first.slug, "ergonomic-keyboards-guide");

        let second = service.generate(input()).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(second.body, first.body);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unpublishable_draft_is_returned_but_not_cached() {
        let provider =
            MockGenerationProvider::new("mock").with_response(envelope("Far too short."));
        let (service, provider) = service(provider);

        let output = service.generate(input()).await.unwrap();

        assert!(!output.quality.can_publish);
        assert!(output.quality.has_issues());
        // One draft round plus one repair round, both failing
        assert_eq!(provider.call_count(), 2);
        assert!(
            !service
                .cache
                .has(TOPIC, CACHE_INTENT, ArtifactCategory::GeneratedArticle)
                .await
        );
    }

    #[tokio::test]
    async fn test_repair_round_recovers_failing_draft() {
        let provider = MockGenerationProvider::new("mock").with_responses(vec![
            envelope("Far too short."),
            envelope(&passing_article(TOPIC)),
        ]);
        let (service, provider) = service(provider);

        let output = service.generate(input()).await.unwrap();

        assert!(output.quality.can_publish);
        assert_eq!(provider.call_count(), 2);
        // Usage sums both rounds
        assert_eq!(output.usage.prompt_tokens, 2_400);
        assert_eq!(service.budget.usage_stats().calls, 2);
        assert!(
            service
                .cache
                .has(TOPIC, CACHE_INTENT, ArtifactCategory::GeneratedArticle)
                .await
        );
    }

    #[tokio::test]
    async fn test_provider_error_aborts_without_caching() {
        let provider = MockGenerationProvider::new("mock").with_error("upstream unavailable");
        let (service, provider) = service(provider);

        let err = service.generate(input()).await.unwrap_err();

        assert!(err.is_generation());
        assert_eq!(provider.call_count(), 1);
        assert_eq!(service.budget.usage_stats().calls, 0);
        assert!(
            !service
                .cache
                .has(TOPIC, CACHE_INTENT, ArtifactCategory::GeneratedArticle)
                .await
        );
    }

    #[tokio::test]
    async fn test_retry_with_fixes_spends_an_extra_round() {
        let provider = MockGenerationProvider::new("mock").with_responses(vec![
            envelope("Far too short."),
            envelope(&passing_article(TOPIC)),
        ]);
        let (service, provider) = service(provider);
        let service = service.with_config(PipelineConfig {
            max_repair_attempts: 0,
            auto_repair: false,
        });

        let first = service.generate(input()).await.unwrap();
        assert!(!first.quality.can_publish);
        assert_eq!(provider.call_count(), 1);

        let second = service.retry_with_fixes(&input(), &first).await.unwrap();
        assert!(second.quality.can_publish);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_estimated_usage_when_provider_reports_none() {
        let provider = MockGenerationProvider::new("mock").with_response(
            GenerationResponse::new(
                serde_json::json!({
                    "title": "T",
                    "body": passing_article(TOPIC),
                })
                .to_string(),
            ),
        );
        let (service, _) = service(provider);

        let output = service.generate(input()).await.unwrap();

        assert!(output.usage.prompt_tokens > 0);
        assert!(output.usage.completion_tokens > 0);
        assert_eq!(output.usage.total_tokens, output.usage.prompt_tokens + output.usage.completion_tokens);
    }
}
