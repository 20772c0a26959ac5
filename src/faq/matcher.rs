use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::FaqRecord;

/// Minimum score a record needs before it counts as a match.
const MATCH_THRESHOLD: f64 = 1.0;

const CONTAINMENT_WEIGHT: f64 = 3.0;
const TAG_WEIGHT: f64 = 1.0;
const OVERLAP_WEIGHT: f64 = 0.1;

/// Lowercases, decomposes and drops combining marks, so "Café" and "cafe"
/// compare equal. Total: any input maps to some string, empty included.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn score_record(nq: &str, record: &FaqRecord) -> f64 {
    let n_question = normalize(&record.question);
    let mut score = 0.0;

    // Containment in either direction is the strongest signal. A very short
    // query contained in every question scores this for every record; that
    // quirk is part of the contract.
    if n_question.contains(nq) || nq.contains(n_question.as_str()) {
        score += CONTAINMENT_WEIGHT;
    }

    for tag in &record.tags {
        if nq.contains(normalize(tag).as_str()) {
            score += TAG_WEIGHT;
        }
    }

    // Uncapped and undeduplicated: a token repeated in the query counts each
    // time it appears.
    let overlap = nq
        .split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
        .filter(|token| n_question.contains(*token))
        .count();
    score += overlap as f64 * OVERLAP_WEIGHT;

    score
}

/// Scans the records in order and returns the one with the strictly highest
/// score, provided it reaches the acceptance threshold. Ties keep the
/// earliest record.
pub fn find<'a>(query: &str, records: &'a [FaqRecord]) -> Option<&'a FaqRecord> {
    let nq = normalize(query);
    let mut best: Option<&'a FaqRecord> = None;
    let mut best_score = 0.0;

    for record in records {
        let score = score_record(&nq, record);
        if score > best_score {
            best_score = score;
            best = Some(record);
        }
    }

    if best_score >= MATCH_THRESHOLD {
        best
    } else {
        None
    }
}
