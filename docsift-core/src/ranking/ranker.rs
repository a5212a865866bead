use super::keywords::KeywordSet;
use super::similarity::SemanticScorer;
use crate::config::RankingConfig;
use crate::normalize::normalize_key;
use crate::types::{RankedSection, Section};
use std::collections::HashSet;

const EPSILON: f32 = 1e-6;

/// Per-factor breakdown of a section's relevance score
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreFactors {
    pub body_keywords: f32,
    pub title_keywords: f32,
    pub topical: f32,
    pub social: f32,
    pub budget: f32,
    pub semantic: f32,
}

/// Scores, categorizes and selects sections for a persona and task
#[derive(Debug)]
pub struct SectionRanker {
    config: RankingConfig,
    semantic: SemanticScorer,
}

impl SectionRanker {
    pub fn new(config: &RankingConfig, semantic: SemanticScorer) -> Self {
        Self {
            config: config.clone(),
            semantic,
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn factors(&self, section: &Section, keywords: &KeywordSet) -> ScoreFactors {
        let body = section.text.to_lowercase();
        let title = section.title.to_lowercase();

        ScoreFactors {
            body_keywords: match_ratio(&body, keywords.terms()),
            title_keywords: match_ratio(&title, keywords.terms()),
            topical: match_ratio(&body, &self.config.topical_terms),
            social: match_ratio(&body, &self.config.social_terms),
            budget: match_ratio(&body, &self.config.budget_terms),
            semantic: self.semantic.similarity(&section.text, &self.semantic_reference(keywords)),
        }
    }

    /// Weighted mean of the factors, boosted when the body mentions a topical term
    pub fn score(&self, section: &Section, keywords: &KeywordSet) -> f32 {
        let f = self.factors(section, keywords);
        let w = &self.config.weights;
        let total = w.total();
        if total <= 0.0 {
            return 0.0;
        }

        let mut score = (w.body_keywords * f.body_keywords
            + w.title_keywords * f.title_keywords
            + w.topical * f.topical
            + w.social * f.social
            + w.budget * f.budget
            + w.semantic * f.semantic)
            / total;

        let body = section.text.to_lowercase();
        if self.config.topical_terms.iter().any(|t| body.contains(&t.to_lowercase())) {
            score *= self.config.topical_multiplier;
        }
        score
    }

    /// Category with the most term hits over title and body; earlier
    /// categories win ties, no hits at all gives the fallback category.
    pub fn categorize(&self, section: &Section) -> String {
        let text = format!("{} {}", section.title, section.text).to_lowercase();
        let mut best: Option<(&str, usize)> = None;
        for category in &self.config.categories {
            let hits = category
                .terms
                .iter()
                .filter(|t| text.contains(&t.to_lowercase()))
                .count();
            if hits > best.map(|(_, h)| h).unwrap_or(0) {
                best = Some((&category.name, hits));
            }
        }
        best.map(|(name, _)| name.to_string())
            .unwrap_or_else(|| self.config.fallback_category.clone())
    }

    /// Coverage pass over the priority order, then fill by score.
    ///
    /// Output never repeats a (title, page) pair and holds at most `top_n`
    /// sections, ranked 1.. in selection order.
    pub fn rank(&self, sections: &[Section], keywords: &KeywordSet) -> Vec<RankedSection> {
        let scored: Vec<(f32, String)> = sections
            .iter()
            .map(|s| (self.score(s, keywords), self.categorize(s)))
            .collect();

        // Indices ordered by score, ties kept in input order
        let mut by_score: Vec<usize> = (0..sections.len()).collect();
        by_score.sort_by(|&a, &b| scored[b].0.total_cmp(&scored[a].0));

        let top_n = self.config.top_n;
        let mut selected: Vec<usize> = Vec::new();
        let mut seen: HashSet<(String, u32)> = HashSet::new();
        let mut take = |index: usize, selected: &mut Vec<usize>| -> bool {
            let section = &sections[index];
            if selected.len() >= top_n
                || selected.contains(&index)
                || !seen.insert((normalize_key(&section.title), section.page_number))
            {
                return false;
            }
            selected.push(index);
            true
        };

        for category in &self.config.priority {
            let picks = if self.config.bonus_category.as_deref() == Some(category.as_str()) {
                2
            } else {
                1
            };
            let mut taken = 0;
            for &index in by_score.iter().filter(|&&i| &scored[i].1 == category) {
                if taken == picks {
                    break;
                }
                if take(index, &mut selected) {
                    taken += 1;
                }
            }
        }

        for &index in &by_score {
            take(index, &mut selected);
        }

        tracing::info!(
            "🏆 Ranked {} of {} section(s) against {} term(s)",
            selected.len(),
            sections.len(),
            keywords.len()
        );

        selected
            .into_iter()
            .enumerate()
            .map(|(position, index)| RankedSection {
                section: sections[index].clone(),
                score: scored[index].0,
                category: scored[index].1.clone(),
                rank: position + 1,
            })
            .collect()
    }

    fn semantic_reference(&self, keywords: &KeywordSet) -> String {
        keywords
            .terms()
            .iter()
            .chain(&self.config.topical_terms)
            .chain(&self.config.social_terms)
            .chain(&self.config.budget_terms)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Share of terms contained in already-lowercased text
fn match_ratio(text: &str, terms: &[String]) -> f32 {
    let matches = terms.iter().filter(|t| text.contains(&t.to_lowercase())).count();
    matches as f32 / (terms.len() as f32 + EPSILON)
}
