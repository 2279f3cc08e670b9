use std::path::Path;

use anyhow::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::{game::GameSetup, models::CrosswordWord};

/// A ready-to-play word list, so a front end can start without the generation API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSet {
    pub title: String,
    pub category: String,
    pub game: GameSetup,
}

fn word_list(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn clued(entries: &[(u32, &str, &str)]) -> Vec<CrosswordWord> {
    entries
        .iter()
        .map(|(id, word, clue)| CrosswordWord {
            id: *id,
            word: word.to_string(),
            clue: clue.to_string(),
        })
        .collect()
}

/// Built-in sample sets
pub static BUILTIN_SAMPLES: Lazy<Vec<SampleSet>> = Lazy::new(|| {
    vec![
        SampleSet {
            title: "Sistema Solar".to_string(),
            category: "Astronomía".to_string(),
            game: GameSetup::WordSearch {
                words: word_list(&["SOL", "LUNA", "MARTE", "TIERRA", "ORBITA", "COMETA"]),
                size: Some(10),
                seed: None,
            },
        },
        SampleSet {
            title: "Matemáticas Básicas".to_string(),
            category: "Matemáticas".to_string(),
            game: GameSetup::Crossword {
                words: clued(&[
                    (1, "SUMA", "Operación matemática de adición"),
                    (2, "RESTA", "Operación matemática de sustracción"),
                    (3, "MULTI", "Abreviatura de multiplicación"),
                    (4, "DIVISION", "Operación de repartir en partes iguales"),
                    (5, "NUMERO", "Concepto matemático fundamental"),
                ]),
                size: Some(12),
                seed: None,
            },
        },
        SampleSet {
            title: "Animales".to_string(),
            category: "Biología".to_string(),
            game: GameSetup::Crossword {
                words: clued(&[
                    (1, "PERRO", "Mejor amigo del hombre"),
                    (2, "GATO", "Animal doméstico independiente"),
                    (3, "PAJARO", "Animal que vuela y tiene plumas"),
                    (4, "PEZ", "Animal que vive en el agua"),
                ]),
                size: Some(10),
                seed: None,
            },
        },
        SampleSet {
            title: "Colores Básicos".to_string(),
            category: "Colores".to_string(),
            game: GameSetup::WordConnect {
                words: word_list(&["ROJO", "AZUL", "VERDE", "AMARILLO", "NEGRO"]),
            },
        },
        SampleSet {
            title: "Familia".to_string(),
            category: "Familia".to_string(),
            game: GameSetup::WordConnect {
                words: word_list(&["PADRE", "MADRE", "HIJO", "HIJA", "HERMANO"]),
            },
        },
    ]
});

#[derive(Debug)]
pub struct Catalog {
    samples: Vec<SampleSet>,
}

impl Catalog {
    /// Load sample sets from a JSON file (an array of sample sets)
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let samples: Vec<SampleSet> = serde_json::from_str(&content)?;

        tracing::info!("Loaded {} sample sets into catalog", samples.len());

        Ok(Self { samples })
    }

    pub fn builtin() -> Self {
        Self {
            samples: BUILTIN_SAMPLES.clone(),
        }
    }

    pub fn samples(&self) -> &[SampleSet] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
