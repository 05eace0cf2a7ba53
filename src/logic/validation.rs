//! Small pure helpers: ordinal labels and permutation checks.

use std::collections::HashSet;
use std::hash::Hash;

/// "1st", "2nd", "3rd", "4th", ..., with "th" for 10..=20 modulo 100 ("11th", "112th").
pub fn ordinal(n: u32) -> String {
    let suffix = if (10..=20).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{}", n, suffix)
}

/// True iff no entry equals `empty` and all entries are pairwise distinct.
pub fn is_valid_permutation<T>(choices: &[T], empty: &T) -> bool
where
    T: Eq + Hash,
{
    if choices.contains(empty) {
        return false;
    }
    let mut seen = HashSet::with_capacity(choices.len());
    choices.iter().all(|c| seen.insert(c))
}
