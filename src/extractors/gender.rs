// src/extractors/gender.rs
use crate::utils::error::TableError;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Probability used for names the table has never seen.
const UNKNOWN_NAME_FEMALE_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Female,
    Male,
}

#[derive(Debug, Deserialize)]
struct NameRow {
    #[serde(rename = "Name")]
    name: String,
    female_prob: f64,
}

/// Lowercase first name -> probability that the bearer is female.
#[derive(Debug, Clone, Default)]
pub struct NameGenderTable {
    probabilities: HashMap<String, f64>,
}

impl NameGenderTable {
    /// Builds a table from `(name, probability)` pairs. Later duplicates win.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut probabilities = HashMap::new();
        for (name, probability) in pairs {
            let name = name.as_ref();
            if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
                return Err(TableError::InvalidProbability {
                    name: name.to_string(),
                    probability,
                });
            }
            probabilities.insert(name.to_lowercase(), probability);
        }
        Ok(Self { probabilities })
    }

    /// Loads a `Name,female_prob` CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let table = Self::from_csv_reader(file)?;
        tracing::info!("Loaded {} name probabilities from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in reader.deserialize::<NameRow>() {
            let row = result?;
            rows.push((row.name, row.female_prob));
        }
        Self::from_pairs(rows)
    }

    /// Probability for an already-lowercased name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.probabilities.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }
}

/// Guesses gender from a first name by drawing against the table probability.
///
/// The draw is deliberately random: a name listed at 0.9 comes back female on
/// roughly nine calls in ten. Pass a seeded generator for reproducible results.
#[derive(Debug, Clone)]
pub struct GenderGuesser {
    table: NameGenderTable,
}

impl GenderGuesser {
    pub fn new(table: NameGenderTable) -> Self {
        Self { table }
    }

    pub fn female_probability(&self, first_name: &str) -> f64 {
        self.table
            .get(&first_name.to_lowercase())
            .unwrap_or(UNKNOWN_NAME_FEMALE_PROBABILITY)
    }

    pub fn guess<R: Rng + ?Sized>(&self, first_name: &str, rng: &mut R) -> Gender {
        let probability = self.female_probability(first_name);
        let draw: f64 = rng.gen();
        let gender = if draw < probability { Gender::Female } else { Gender::Male };
        tracing::trace!("Guessed {:?} for '{}' (p={}, draw={:.3})", gender, first_name, probability, draw);
        gender
    }
}
