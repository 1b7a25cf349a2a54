use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::canvas::Color;

/// Cells held per color. Entries outlive the sessions that created them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreTable {
    scores: BTreeMap<Color, u32>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zero entry unless the color already has one
    pub fn register(&mut self, color: &Color) {
        self.scores.entry(color.clone()).or_insert(0);
    }

    pub fn get(&self, color: &Color) -> u32 {
        self.scores.get(color).copied().unwrap_or(0)
    }

    /// Move one cell of credit from `previous` (if any) to `color`
    pub fn transfer(&mut self, previous: Option<&Color>, color: &Color) {
        if let Some(previous) = previous {
            if let Some(score) = self.scores.get_mut(previous) {
                *score = score.saturating_sub(1);
            }
        }
        *self.scores.entry(color.clone()).or_insert(0) += 1;
    }

    pub fn total(&self) -> u64 {
        self.scores.values().map(|&score| u64::from(score)).sum()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Color, u32)> {
        self.scores.iter().map(|(color, &score)| (color, score))
    }

    /// The color with the strictly highest score. Ties at the top, an empty
    /// table and a table of zeros all count as a draw.
    pub fn winner(&self) -> Option<Color> {
        let mut best: Option<(&Color, u32)> = None;
        let mut tied = false;

        for (color, score) in self.iter() {
            match best {
                Some((_, top)) if score < top => {}
                Some((_, top)) if score == top => tied = true,
                _ => {
                    best = Some((color, score));
                    tied = false;
                }
            }
        }

        match best {
            Some((color, score)) if score > 0 && !tied => Some(color.clone()),
            _ => None,
        }
    }
}

impl FromIterator<(Color, u32)> for ScoreTable {
    fn from_iter<I: IntoIterator<Item = (Color, u32)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}
