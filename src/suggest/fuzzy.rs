//! Approximate keyword matching: plain Levenshtein distance plus the
//! substring-or-near-word test the keyword matcher runs per keyword.

/// Levenshtein edit distance (substitution, insertion and deletion all cost 1).
///
/// Works on `char`s rather than bytes so accented merchant names are not
/// penalised per UTF-8 byte.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // matrix[i][j] = distance between b[..i] and a[..j]
    let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            matrix[i][j] = if b[i - 1] == a[j - 1] {
                matrix[i - 1][j - 1]
            } else {
                (matrix[i - 1][j - 1] + 1)
                    .min(matrix[i][j - 1] + 1)
                    .min(matrix[i - 1][j] + 1)
            };
        }
    }

    matrix[b.len()][a.len()]
}

/// True when `keyword` occurs inside `normalized` or any whitespace-separated
/// word of `normalized` is within `threshold` edits of it.
///
/// Both arguments must already be normalized.
pub(crate) fn matches_keyword(normalized: &str, keyword: &str, threshold: usize) -> bool {
    if normalized.contains(keyword) {
        return true;
    }

    normalized
        .split_whitespace()
        .any(|word| levenshtein(word, keyword) <= threshold)
}

#[cfg(test)]
#[path = "fuzzy_tests.rs"]
mod tests;
