//! Portuguese-aware string ordering.
//!
//! Names are compared in three passes, like a locale collator: first by base
//! letters ignoring case and accents, then by accents, then by case
//! (lowercase first). "Útil" therefore sorts between "Tiago" and "Vitor"
//! rather than after "Zico" as a byte comparison would put it.

use std::cmp::Ordering;

/// Compares two strings using Portuguese collation rules.
pub fn compare(a: &str, b: &str) -> Ordering {
    let primary = a.chars().map(base_letter).cmp(b.chars().map(base_letter));
    if primary != Ordering::Equal {
        return primary;
    }

    let secondary = a.chars().map(accent_weight).cmp(b.chars().map(accent_weight));
    if secondary != Ordering::Equal {
        return secondary;
    }

    let tertiary = a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase));
    if tertiary != Ordering::Equal {
        return tertiary;
    }

    a.cmp(b)
}

/// Sorts names in place using [`compare`]. The sort is stable.
pub fn sort_names(names: &mut [String]) {
    names.sort_by(|a, b| compare(a, b));
}

/// Lowercases `s` and strips accents, for accent-insensitive matching.
pub fn fold(s: &str) -> String {
    s.chars().map(base_letter).collect()
}

fn base_letter(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

// Unaccented letters weigh 0 so "Ana" < "Aná". The order among accents
// follows the usual collation tables: acute, grave, circumflex, tilde,
// diaeresis, cedilla.
fn accent_weight(c: char) -> u8 {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
        'á' | 'é' | 'í' | 'ó' | 'ú' | 'ý' => 1,
        'à' | 'è' | 'ì' | 'ò' | 'ù' => 2,
        'â' | 'ê' | 'î' | 'ô' | 'û' => 3,
        'ã' | 'õ' | 'ñ' => 4,
        'ä' | 'ë' | 'ï' | 'ö' | 'ü' | 'ÿ' => 5,
        'ç' => 6,
        'å' => 7,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        sort_names(&mut v);
        v
    }

    #[test]
    fn test_accented_initial_sorts_by_base_letter() {
        assert_eq!(
            sorted(&["Zico", "Útil", "Ana", "Vitor", "Tiago"]),
            vec!["Ana", "Tiago", "Útil", "Vitor", "Zico"]
        );
    }

    #[test]
    fn test_case_insensitive_primary() {
        assert_eq!(
            sorted(&["bruno", "Carla", "ana"]),
            vec!["ana", "bruno", "Carla"]
        );
    }

    #[test]
    fn test_unaccented_before_accented_on_tie() {
        assert_eq!(compare("Joao", "João"), Ordering::Less);
        assert_eq!(compare("Érica", "Erica"), Ordering::Greater);
    }

    #[test]
    fn test_lowercase_before_uppercase_on_tie() {
        assert_eq!(compare("ana", "Ana"), Ordering::Less);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(
            sorted(&["Ana Clara", "Ana", "Anabela"]),
            vec!["Ana", "Ana Clara", "Anabela"]
        );
    }

    #[test]
    fn test_cedilla() {
        assert_eq!(
            sorted(&["Cauã Silva", "Çamila", "Beatriz"]),
            vec!["Beatriz", "Çamila", "Cauã Silva"]
        );
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("Berçário"), "bercario");
        assert_eq!(fold("INTERMEDIÁRIOS"), "intermediarios");
        assert_eq!(fold("15/10/2023"), "15/10/2023");
    }

    #[test]
    fn test_equal_strings() {
        assert_eq!(compare("Helena", "Helena"), Ordering::Equal);
    }
}
