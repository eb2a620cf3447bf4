use crate::model::Value;
use crate::normalize::{normalize, Normalized};

/// Similarity of two raw values in [0, 1].
///
/// Equal normalized values score 1.0. Two text values score by normalized
/// Levenshtein distance. Anything else (a number against text, two unequal
/// numbers) scores 0.
pub fn similarity(a: &Value, b: &Value) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    if a.same_as(&b) {
        return 1.0;
    }

    match (&a, &b) {
        (Normalized::Text(a), Normalized::Text(b)) => text_similarity(a, b),
        _ => 0.0,
    }
}

/// `(len(longer) - distance) / len(longer)`, lengths in chars.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let (longer, shorter, longer_len) = if a_len > b_len {
        (a, b, a_len)
    } else {
        (b, a, b_len)
    };

    if longer_len == 0 {
        return 1.0;
    }

    (longer_len - edit_distance(longer, shorter)) as f64 / longer_len as f64
}

/// Levenshtein distance; insertion, deletion and substitution each cost 1.
///
/// Full DP table with `len(s2) + 1` rows and `len(s1) + 1` columns.
pub fn edit_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    let mut table = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            table[i][j] = if b[i - 1] == a[j - 1] {
                table[i - 1][j - 1]
            } else {
                1 + table[i - 1][j - 1].min(table[i][j - 1]).min(table[i - 1][j])
            };
        }
    }

    table[b.len()][a.len()]
}
