//! Edit-distance suggestions and case-insensitive column resolution.
//!
//! Column-scoped property keys name their column in free text, so a typo
//! must fail loudly. Resolution is exact first, then case-insensitive
//! (Hive folds column names to lower case), and a miss carries a
//! "did you mean" hint.

/// Edit distance between two column names, counted in characters.
///
/// Keeps a single row of the distance table; `diag` holds the cell the row
/// overwrote one step earlier.
fn edit_distance(a: &[char], b: &[char]) -> usize {
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = diag + usize::from(ca != cb);
            diag = row[j + 1];
            row[j + 1] = substitute.min(diag + 1).min(row[j] + 1);
        }
    }
    row[b.len()]
}

fn folded(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// The declared column a mistyped name most likely meant.
///
/// Names are compared with case folded. A candidate equal to `input` is not
/// a typo and is skipped; on a tie the earlier column wins.
#[must_use]
pub fn closest_match<'a>(
    input: &str,
    candidates: &[&'a str],
    max_distance: usize,
) -> Option<&'a str> {
    let input = folded(input);
    candidates
        .iter()
        .map(|&candidate| (candidate, edit_distance(&input, &folded(candidate))))
        .filter(|&(_, distance)| (1..=max_distance).contains(&distance))
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

/// Error from [`resolve_column`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnResolveError {
    /// No column matched (exact or case-insensitive).
    NotFound {
        /// An edit-distance suggestion, if available.
        suggestion: Option<String>,
    },
    /// Multiple columns matched case-insensitively.
    Ambiguous {
        /// All columns that matched case-insensitively.
        matches: Vec<String>,
    },
}

/// Resolves a column name to its index in `available`.
///
/// 1. **Exact match** wins.
/// 2. **Unique case-insensitive match** is accepted.
/// 3. **Several case-insensitive matches** are ambiguous.
/// 4. **No match** returns a suggestion within two edits, if any.
///
/// # Errors
///
/// Returns [`ColumnResolveError::NotFound`] or
/// [`ColumnResolveError::Ambiguous`].
pub fn resolve_column(input: &str, available: &[&str]) -> Result<usize, ColumnResolveError> {
    if let Some(i) = available.iter().position(|&col| col == input) {
        return Ok(i);
    }

    let matches: Vec<usize> = available
        .iter()
        .enumerate()
        .filter(|(_, c)| c.eq_ignore_ascii_case(input))
        .map(|(i, _)| i)
        .collect();

    match matches.as_slice() {
        [only] => Ok(*only),
        [] => Err(ColumnResolveError::NotFound {
            suggestion: closest_match(input, available, 2).map(ToString::to_string),
        }),
        many => Err(ColumnResolveError::Ambiguous {
            matches: many.iter().map(|&i| available[i].to_string()).collect(),
        }),
    }
}
