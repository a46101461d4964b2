// ABOUTME: Spanish collation keys for ordering food names
// ABOUTME: Case and accents are ignored at the primary level, ñ sorts after n
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nido Contributors

use std::cmp::Ordering;

/// Primary-strength collation key for `name`
///
/// Each character maps to twice its folded code point; `ñ` takes the odd slot
/// right after `n`, so it lands between `n` and `o`.
#[must_use]
pub fn collation_key(name: &str) -> Vec<u32> {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match fold_accent(c) {
            'ñ' => u32::from('n') * 2 + 1,
            folded => u32::from(folded) * 2,
        })
        .collect()
}

/// Compare two names the way a Spanish-locale sort would
///
/// Falls back to a plain comparison when the primary keys tie so the order
/// stays total.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

const fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ç' => 'c',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accents_and_case_ignored() {
        assert_eq!(collation_key("Plátano"), collation_key("platano"));
        assert_eq!(compare("avena", "Avena"), "avena".cmp("Avena"));
    }

    #[test]
    fn test_enye_sorts_after_n() {
        let mut names = vec!["Ñame", "Nabo", "Ostra", "Manzana"];
        names.sort_by(|a, b| compare(a, b));
        assert_eq!(names, vec!["Manzana", "Nabo", "Ñame", "Ostra"]);
    }

    #[test]
    fn test_accented_vowel_sorts_with_base_letter() {
        let mut names = vec!["Zanahoria", "Él", "Espinaca", "Calabacín"];
        names.sort_by(|a, b| compare(a, b));
        assert_eq!(names, vec!["Calabacín", "Él", "Espinaca", "Zanahoria"]);
    }
}
