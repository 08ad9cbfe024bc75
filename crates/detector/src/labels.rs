//! Classification result and the sidecar label file.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File name of the label list inside a model directory
pub const LABELS_FILE: &str = "labels.txt";

/// Lenient cutoff for [`Labels::nsfw`]: flags the most images
pub const THRESHOLD_SAFE: f32 = 0.75;
/// Middle cutoff for [`Labels::nsfw`]
pub const THRESHOLD_MEDIUM: f32 = 0.85;
/// Strict cutoff for [`Labels::nsfw`]: flags only confident scores
pub const THRESHOLD_HIGH: f32 = 0.9;

/// Images with at least this neutral score are never flagged
const NEUTRAL_OVERRIDE: f32 = 0.25;

/// Content categories, in the order of the model's output vector.
///
/// The order is a property of the packaged model artifact. It is not read
/// from `labels.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Drawing,
    Hentai,
    Neutral,
    Porn,
    Sexy,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Drawing,
        Category::Hentai,
        Category::Neutral,
        Category::Porn,
        Category::Sexy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Drawing => "drawing",
            Category::Hentai => "hentai",
            Category::Neutral => "neutral",
            Category::Porn => "porn",
            Category::Sexy => "sexy",
        }
    }

    /// Whether a line of `labels.txt` names this category
    fn matches_label(&self, label: &str) -> bool {
        let label = label.trim().to_lowercase();
        label == self.as_str() || label.strip_suffix('s') == Some(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence scores for one image.
///
/// Scores come straight from the model's output layer. With the packaged
/// softmax model each lies in [0, 1] and they sum to roughly 1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Labels {
    pub drawing: f32,
    pub hentai: f32,
    pub neutral: f32,
    pub porn: f32,
    pub sexy: f32,
}

impl Labels {
    /// Map a raw output row by position. Returns `None` for fewer than five scores.
    pub fn from_scores(scores: &[f32]) -> Option<Self> {
        match scores {
            [drawing, hentai, neutral, porn, sexy, ..] => Some(Self {
                drawing: *drawing,
                hentai: *hentai,
                neutral: *neutral,
                porn: *porn,
                sexy: *sexy,
            }),
            _ => None,
        }
    }

    pub fn score(&self, category: Category) -> f32 {
        match category {
            Category::Drawing => self.drawing,
            Category::Hentai => self.hentai,
            Category::Neutral => self.neutral,
            Category::Porn => self.porn,
            Category::Sexy => self.sexy,
        }
    }

    /// Highest-scoring category. Ties resolve to the earlier output position.
    pub fn top(&self) -> (Category, f32) {
        Category::ALL
            .iter()
            .map(|&category| (category, self.score(category)))
            .fold((Category::Drawing, f32::MIN), |best, candidate| {
                if candidate.1 > best.1 { candidate } else { best }
            })
    }

    /// True when the image should be treated as sensitive.
    pub fn nsfw(&self, threshold: f32) -> bool {
        if self.neutral > NEUTRAL_OVERRIDE {
            return false;
        }

        self.porn > threshold || self.sexy > threshold || self.hentai > threshold
    }

    pub fn is_safe(&self, threshold: f32) -> bool {
        !self.nsfw(threshold)
    }
}

/// Parse a label list: one name per line, blank lines skipped.
pub fn parse_labels(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Read and parse `labels.txt` from a model directory.
pub fn load_labels(model_dir: &Path) -> anyhow::Result<Vec<String>> {
    let path = model_dir.join(LABELS_FILE);

    tracing::info!(path = %path.display(), "Loading classification labels");

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read labels from {}", path.display()))?;

    let labels = parse_labels(&contents);
    check_label_order(&labels);

    Ok(labels)
}

/// Warn when the label file disagrees with the fixed output positions.
///
/// The mapping is never reordered: output position decides the category.
fn check_label_order(labels: &[String]) -> bool {
    let consistent = labels.len() == Category::ALL.len()
        && labels
            .iter()
            .zip(Category::ALL.iter())
            .all(|(label, category)| category.matches_label(label));

    if !consistent {
        tracing::warn!(
            labels = ?labels,
            expected = ?Category::ALL.map(|c| c.as_str()),
            "Label file does not match the model's output order; scores are mapped by position"
        );
    }

    consistent
}
