//! Semantic similarity through an injected embedding collaborator.
//!
//! The ranker only ever sees a number: the cosine of two embeddings, or 0.0
//! when no embedder is configured or the embedder fails.

use sha2::{Digest, Sha256};

/// Text embedding collaborator
pub trait Embedder {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    fn name(&self) -> &str;
}

/// Cosine of two vectors; 0.0 for mismatched lengths or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Wraps an optional embedder so that similarity never fails
#[derive(Default)]
pub struct SemanticScorer {
    embedder: Option<Box<dyn Embedder>>,
}

impl SemanticScorer {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            embedder: Some(embedder),
        }
    }

    pub fn disabled() -> Self {
        Self { embedder: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.embedder.is_some()
    }

    pub fn similarity(&self, text: &str, reference: &str) -> f32 {
        let Some(embedder) = &self.embedder else {
            return 0.0;
        };
        let embeddings = embedder.embed(text).and_then(|a| Ok((a, embedder.embed(reference)?)));
        match embeddings {
            Ok((a, b)) => {
                let similarity = cosine_similarity(&a, &b);
                if similarity.is_finite() {
                    similarity
                } else {
                    0.0
                }
            }
            Err(e) => {
                tracing::warn!("⚠️  embedder '{}' failed: {e}", embedder.name());
                0.0
            }
        }
    }
}

impl std::fmt::Debug for SemanticScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.embedder {
            Some(embedder) => write!(f, "SemanticScorer({})", embedder.name()),
            None => f.write_str("SemanticScorer(disabled)"),
        }
    }
}

pub const DEFAULT_DIMENSIONS: usize = 256;

/// Hashed bag-of-words embedding: every lowercase alphanumeric token adds one
/// to a bucket picked by its SHA-256 digest. Stable across runs and platforms.
#[derive(Debug, Clone)]
pub struct HashedBagOfWords {
    dimensions: usize,
}

impl Default for HashedBagOfWords {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl HashedBagOfWords {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        (u64::from_le_bytes(prefix) % self.dimensions as u64) as usize
    }
}

impl Embedder for HashedBagOfWords {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut vector = vec![0.0; self.dimensions];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            vector[self.bucket(token)] += 1.0;
        }
        Ok(vector)
    }

    fn name(&self) -> &str {
        "hashed-bag-of-words"
    }
}
