use std::collections::HashMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{
    game::{PlayError, SelectionValidator},
    models::{LetterNode, NodePosition},
    utils::letters::puzzle_word,
};

/// Where the letter wheel is drawn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RadialLayout {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Default for RadialLayout {
    fn default() -> Self {
        Self {
            center_x: 150.0,
            center_y: 150.0,
            radius: 120.0,
        }
    }
}

impl RadialLayout {
    /// Node `index` of `count`, starting at twelve o'clock and going clockwise
    pub fn position(&self, index: usize, count: usize) -> NodePosition {
        let step = 2.0 * PI / count.max(1) as f64;
        let angle = index as f64 * step - PI / 2.0;
        NodePosition {
            x: self.center_x + self.radius * angle.cos(),
            y: self.center_y + self.radius * angle.sin(),
        }
    }
}

/// Minimal letter multiset for a word list: each letter appears as many
/// times as the most any single word uses it. Letters keep first-seen order.
pub fn letter_bag(words: &[String]) -> Vec<char> {
    let mut order: Vec<char> = Vec::new();
    let mut max_counts: HashMap<char, usize> = HashMap::new();

    for word in words {
        let mut local: HashMap<char, usize> = HashMap::new();
        for letter in word.chars() {
            *local.entry(letter).or_default() += 1;
        }
        for letter in word.chars() {
            if !max_counts.contains_key(&letter) {
                order.push(letter);
            }
            let best = max_counts.entry(letter).or_default();
            *best = (*best).max(local[&letter]);
        }
    }

    order
        .into_iter()
        .flat_map(|letter| std::iter::repeat(letter).take(max_counts[&letter]))
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterGraph {
    /// Distinct uppercase target words
    pub words: Vec<String>,
    pub nodes: Vec<LetterNode>,
}

impl LetterGraph {
    pub fn build(words: &[String], layout: RadialLayout) -> Self {
        let mut targets: Vec<String> = Vec::with_capacity(words.len());
        for raw in words {
            let word: String = puzzle_word(raw).into_iter().collect();
            if !word.is_empty() && !targets.contains(&word) {
                targets.push(word);
            }
        }

        let bag = letter_bag(&targets);
        let count = bag.len();
        let nodes = bag
            .into_iter()
            .enumerate()
            .map(|(index, letter)| LetterNode {
                index,
                letter,
                position: layout.position(index, count),
            })
            .collect();

        let graph = Self {
            words: targets,
            nodes,
        };
        if let Some(word) = graph.words.iter().find(|word| !graph.can_spell(word)) {
            tracing::warn!("Letter wheel cannot spell target word '{}'", word);
        }
        graph
    }

    /// Whether `word` can be traced without reusing a node
    pub fn can_spell(&self, word: &str) -> bool {
        let mut available: HashMap<char, usize> = HashMap::new();
        for node in &self.nodes {
            *available.entry(node.letter).or_default() += 1;
        }
        puzzle_word(word).into_iter().all(|letter| match available.get_mut(&letter) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        })
    }
}

/// Live word-connect round
#[derive(Debug, Clone)]
pub struct WordConnectPlay {
    graph: LetterGraph,
    found: Vec<String>,
    selection: Vec<usize>,
    dragging: bool,
}

impl WordConnectPlay {
    pub fn new(graph: LetterGraph) -> Self {
        Self {
            graph,
            found: Vec::new(),
            selection: Vec::new(),
            dragging: false,
        }
    }

    pub fn graph(&self) -> &LetterGraph {
        &self.graph
    }

    pub fn found(&self) -> &[String] {
        &self.found
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Letters spelled by the gesture so far
    pub fn current(&self) -> String {
        self.selection
            .iter()
            .map(|idx| self.graph.nodes[*idx].letter)
            .collect()
    }

    fn check_node(&self, index: usize) -> Result<(), PlayError> {
        SelectionValidator::node_in_range(self.graph.nodes.len(), index)
    }

    pub fn begin(&mut self, index: usize) -> Result<(), PlayError> {
        self.check_node(index)?;
        self.selection = vec![index];
        self.dragging = true;
        Ok(())
    }

    /// Add a node to the gesture. Ignored outside a drag or for a node
    /// already in the gesture.
    pub fn extend(&mut self, index: usize) -> Result<(), PlayError> {
        self.check_node(index)?;
        if self.dragging && !self.selection.contains(&index) {
            self.selection.push(index);
        }
        Ok(())
    }

    /// End the gesture. Returns the word if it is a target not found before.
    pub fn release(&mut self) -> Option<String> {
        if !self.dragging {
            return None;
        }
        let candidate = self.current().to_uppercase();
        self.selection.clear();
        self.dragging = false;

        if self.graph.words.contains(&candidate) && !self.found.contains(&candidate) {
            self.found.push(candidate.clone());
            Some(candidate)
        } else {
            None
        }
    }

    /// Play a whole gesture at once
    pub fn trace(&mut self, nodes: &[usize]) -> Result<Option<String>, PlayError> {
        for index in nodes {
            self.check_node(*index)?;
        }
        let Some((first, rest)) = nodes.split_first() else {
            return Ok(None);
        };
        self.begin(*first)?;
        for index in rest {
            self.extend(*index)?;
        }
        Ok(self.release())
    }

    pub fn is_complete(&self) -> bool {
        !self.graph.words.is_empty() && self.found.len() == self.graph.words.len()
    }
}
