//! Self-report questionnaire extraction
//!
//! Parses the semicolon-delimited per-subject questionnaire file. Only lines
//! starting with the PANAS marker contribute; each accepted row zips its
//! first 26 numeric fields positionally to the fixed adjective vocabulary.
//! Rows that fail to parse are recorded (and logged), never raised — a
//! partially readable file still yields the rows it has.

use crate::error::CorpusError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Marker prefix of a PANAS row in the questionnaire file
pub const PANAS_MARKER: &str = "# PANAS";

/// Field delimiter of the questionnaire file
pub const PANAS_DELIMITER: char = ';';

/// Upper end of the observed self-report scale
pub const PANAS_SCALE_MAX: f64 = 5.0;

/// The fixed 26-item affect-adjective vocabulary, in file column order
pub const PANAS_VOCABULARY: [&str; 26] = [
    "Active",
    "Distressed",
    "Interested",
    "Inspired",
    "Annoyed",
    "Strong",
    "Guilty",
    "Scared",
    "Hostile",
    "Excited",
    "Proud",
    "Irritable",
    "Enthusiastic",
    "Ashamed",
    "Alert",
    "Nervous",
    "Determined",
    "Attentive",
    "Jittery",
    "Afraid",
    "Stressed",
    "Frustrated",
    "Happy",
    "Angry",
    "Irritated",
    "Sad",
];

/// One condition's self-report scores, positionally aligned to
/// [`PANAS_VOCABULARY`]. Row `i` of a file corresponds to condition label
/// `i + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanasResponse {
    pub scores: Vec<f64>,
}

impl PanasResponse {
    /// Score for a single adjective, `None` if the name is not in the vocabulary
    pub fn score_for(&self, adjective: &str) -> Option<f64> {
        PANAS_VOCABULARY
            .iter()
            .position(|a| a.eq_ignore_ascii_case(adjective))
            .and_then(|i| self.scores.get(i))
            .copied()
    }

    /// Scores for a subset of adjectives; unknown names contribute nothing
    pub fn subset(&self, adjectives: &[String]) -> Vec<f64> {
        adjectives
            .iter()
            .filter_map(|a| self.score_for(a))
            .collect()
    }
}

/// A row that did not contribute a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based line number in the source file
    pub line: usize,
    pub message: String,
}

/// All responses and row errors extracted from one questionnaire file
#[derive(Debug, Clone, Default)]
pub struct ParsedQuestionnaire {
    /// Responses in file order (assumed ascending condition-label order)
    pub responses: Vec<PanasResponse>,
    pub row_errors: Vec<RowError>,
}

/// Extractor for PANAS rows of a questionnaire file
pub struct QuestionnaireExtractor;

impl QuestionnaireExtractor {
    /// Read and parse a questionnaire file from disk
    pub fn parse_file(path: &Path) -> Result<ParsedQuestionnaire, CorpusError> {
        if !path.exists() {
            return Err(CorpusError::MissingFile(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::parse_str(&raw))
    }

    /// Parse questionnaire text. Never fails as a whole: unparseable rows
    /// land in `row_errors`.
    pub fn parse_str(raw: &str) -> ParsedQuestionnaire {
        let mut parsed = ParsedQuestionnaire::default();

        for (index, line) in raw.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim_start();
            if !trimmed.starts_with(PANAS_MARKER) {
                continue;
            }
            match parse_row(trimmed) {
                Ok(response) => parsed.responses.push(response),
                Err(message) => {
                    warn!("questionnaire line {line_no}: {message}");
                    parsed.row_errors.push(RowError {
                        line: line_no,
                        message,
                    });
                }
            }
        }
        parsed
    }
}

fn parse_row(line: &str) -> Result<PanasResponse, String> {
    let mut fields = line.split(PANAS_DELIMITER);
    // First field is the marker token itself.
    fields.next();

    let mut values = Vec::with_capacity(PANAS_VOCABULARY.len());
    for field in fields {
        let token = field.trim();
        if token.is_empty() {
            continue;
        }
        let value: f64 = token
            .parse()
            .map_err(|_| format!("non-numeric field '{token}'"))?;
        values.push(value);
    }

    if values.len() < PANAS_VOCABULARY.len() {
        return Err(format!(
            "{} numeric fields, expected at least {}",
            values.len(),
            PANAS_VOCABULARY.len()
        ));
    }

    // Extra trailing fields are ignored.
    values.truncate(PANAS_VOCABULARY.len());
    Ok(PanasResponse { scores: values })
}
