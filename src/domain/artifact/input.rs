//! Pipeline input and auxiliary context types

use serde::{Deserialize, Serialize};

use super::ArtifactCategory;

/// A single external search result used as context material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSnippet {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl SearchSnippet {
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }
}

/// Candidate article for internal cross-linking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossLinkCandidate {
    pub title: String,
    pub slug: String,
}

impl CrossLinkCandidate {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
        }
    }
}

/// Auxiliary research material accompanying a generation request.
///
/// Each field is an explicit context class with its own priority and size
/// estimation rule in the budget manager; absent classes are simply empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuxiliaryContext {
    /// Questions readers ask about the topic (highest priority)
    #[serde(default)]
    pub questions: Vec<String>,
    /// Top external search snippets
    #[serde(default)]
    pub search_snippets: Vec<SearchSnippet>,
    /// Gap summaries extracted from competitor content
    #[serde(default)]
    pub competitor_gaps: Vec<String>,
}

impl AuxiliaryContext {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
            && self.search_snippets.is_empty()
            && self.competitor_gaps.is_empty()
    }
}

/// Input to a single pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineInput {
    pub topic: String,
    pub category: ArtifactCategory,
    /// Prior version of the article, if one exists (lowest pruning priority)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_article: Option<String>,
    #[serde(default)]
    pub context: AuxiliaryContext,
    /// Internal articles the generated body may cross-link to
    #[serde(default)]
    pub cross_links: Vec<CrossLinkCandidate>,
}

impl PipelineInput {
    pub fn new(topic: impl Into<String>, category: ArtifactCategory) -> Self {
        Self {
            topic: topic.into(),
            category,
            prior_article: None,
            context: AuxiliaryContext::default(),
            cross_links: Vec::new(),
        }
    }

    pub fn builder(topic: impl Into<String>) -> PipelineInputBuilder {
        PipelineInputBuilder::new(topic)
    }
}

/// Builder for [`PipelineInput`]
#[derive(Debug)]
pub struct PipelineInputBuilder {
    input: PipelineInput,
}

impl PipelineInputBuilder {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            input: PipelineInput::new(topic, ArtifactCategory::GeneratedArticle),
        }
    }

    pub fn category(mut self, category: ArtifactCategory) -> Self {
        self.input.category = category;
        self
    }

    pub fn prior_article(mut self, text: impl Into<String>) -> Self {
        self.input.prior_article = Some(text.into());
        self
    }

    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.input.context.questions.push(question.into());
        self
    }

    pub fn search_snippet(mut self, snippet: SearchSnippet) -> Self {
        self.input.context.search_snippets.push(snippet);
        self
    }

    pub fn competitor_gap(mut self, gap: impl Into<String>) -> Self {
        self.input.context.competitor_gaps.push(gap.into());
        self
    }

    pub fn cross_link(mut self, candidate: CrossLinkCandidate) -> Self {
        self.input.cross_links.push(candidate);
        self
    }

    pub fn build(self) -> PipelineInput {
        self.input
    }
}
