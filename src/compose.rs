//! Article composition stage: turns analyzed content into a structured
//! markdown article.
//!
//! The topic comes from the configured topic set through the injected
//! [`SelectionPolicy`]; the body carries the analyzed content verbatim,
//! followed by the fixed policy sections and a provenance footer.
//! Composition never truncates or summarizes the input; display truncation
//! happens only during result assembly.

use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::contract::{AnalyzedContent, Article, PipelineError, SelectionPolicy};

/// Composes an article from analyzed content.
///
/// Failure here is a programming-error class: an empty topic set or an
/// out-of-range policy choice violates the configuration invariant and is
/// surfaced as [`PipelineError::Internal`].
pub fn compose(
    config: &PipelineConfig,
    policy: &dyn SelectionPolicy,
    analyzed: &AnalyzedContent,
) -> Result<Article, PipelineError> {
    if config.topics.is_empty() {
        error!("Topic set is empty, cannot compose");
        return Err(PipelineError::Internal(
            "configured topic set is empty".to_string(),
        ));
    }
    let idx = policy.choose(config.topics.len());
    let topic = config.topics.get(idx).ok_or_else(|| {
        error!(idx, topics = config.topics.len(), "Selection policy chose out of range");
        PipelineError::Internal(format!(
            "selection policy returned index {idx} for {} topics",
            config.topics.len()
        ))
    })?;

    let title = format!("{topic}: Analysis and Market Outlook");
    let body = render_body(topic, analyzed.as_str(), &config.provenance);

    info!(topic = %topic, body_len = body.len(), "Composed article");
    Ok(Article { title, body })
}

fn render_body(topic: &str, analyzed: &str, provenance: &str) -> String {
    format!(
        "# {topic}: Detailed Analysis\n\
         \n\
         {analyzed}\n\
         \n\
         ## Key Points\n\
         \n\
         The financial market keeps presenting interesting opportunities for attentive \
         investors. This analysis walks through the most relevant trends and how they may \
         affect your portfolio.\n\
         \n\
         ### Current Scenario\n\
         \n\
         Economic indicators show signs of stability, with investors seeking \
         diversification and protection against volatility. Technical signals suggest \
         meaningful moves over the coming months.\n\
         \n\
         ### Recommendations\n\
         \n\
         1. **Diversification**: Keep a balanced portfolio\n\
         2. **Ongoing Analysis**: Track economic indicators\n\
         3. **Long-Term Planning**: Focus on sustainable goals\n\
         4. **Risk Management**: Protect your capital\n\
         \n\
         ### Conclusion\n\
         \n\
         The moment calls for attention and strategy. Prepared investors tend to make the \
         most of market opportunities.\n\
         \n\
         *Published via {provenance}*"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::PinnedSelection;

    fn analyzed(text: &str) -> AnalyzedContent {
        AnalyzedContent(text.to_string())
    }

    #[test]
    fn body_contains_analyzed_content_verbatim() {
        let config = PipelineConfig::default();
        let input = "Rates held steady; équities rallied on the news.";
        let article = compose(&config, &PinnedSelection(0), &analyzed(input)).unwrap();
        assert!(article.body.contains(input));
    }

    #[test]
    fn pinned_policy_fixes_the_topic() {
        let config = PipelineConfig::default();
        let article = compose(&config, &PinnedSelection(1), &analyzed("x")).unwrap();
        assert!(article.title.starts_with("Cryptocurrencies"));
        assert!(article.body.starts_with("# Cryptocurrencies: Detailed Analysis"));
    }

    #[test]
    fn title_is_never_empty_and_embeds_a_configured_topic() {
        let config = PipelineConfig::default();
        for idx in 0..config.topics.len() {
            let article = compose(&config, &PinnedSelection(idx), &analyzed("x")).unwrap();
            assert!(!article.title.is_empty());
            assert!(article.title.contains(&config.topics[idx]));
        }
    }

    #[test]
    fn body_carries_policy_sections_and_provenance_footer() {
        let config = PipelineConfig::default();
        let article = compose(&config, &PinnedSelection(0), &analyzed("x")).unwrap();
        for section in ["## Key Points", "### Current Scenario", "### Recommendations", "### Conclusion"] {
            assert!(article.body.contains(section), "missing section {section}");
        }
        assert!(article.body.contains(&config.provenance));
    }

    #[test]
    fn long_input_is_never_truncated_by_composition() {
        let config = PipelineConfig::default();
        let input = "long analysis ".repeat(500);
        let article = compose(&config, &PinnedSelection(0), &analyzed(&input)).unwrap();
        assert!(article.body.contains(&input));
    }

    #[test]
    fn empty_topic_set_is_an_internal_error() {
        let config = PipelineConfig {
            topics: vec![],
            ..PipelineConfig::default()
        };
        let err = compose(&config, &PinnedSelection(0), &analyzed("x")).unwrap_err();
        assert!(matches!(err, PipelineError::Internal(_)));
    }
}
