use serde::{Deserialize, Serialize};

/// Development stage, ordered from least to most mature.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentStage {
    Idea,
    Prototype,
    Mvp,
    Launched,
    Scaling,
}

const SCALING_KEYWORDS: &[&str] = &[
    "scaling",
    "scale-up",
    "scaleup",
    "espansione internazionale",
    "series a",
    "serie a",
    "in crescita",
];
const LAUNCHED_KEYWORDS: &[&str] = &[
    "lanciat",
    "launched",
    "sul mercato",
    "in produzione",
    "in production",
    "clienti paganti",
    "paying customers",
];
const MVP_KEYWORDS: &[&str] = &["mvp", "beta", "pilot", "pilota", "early adopter"];
const PROTOTYPE_KEYWORDS: &[&str] = &["prototip", "prototype", "proof of concept", "demo"];

impl DevelopmentStage {
    /// Detect the stage from free text, most mature match wins.
    /// Anything unrecognised (including blank text) is an idea.
    pub fn detect(text: &str) -> Self {
        let text = text.to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

        if has(SCALING_KEYWORDS) {
            DevelopmentStage::Scaling
        } else if has(LAUNCHED_KEYWORDS) {
            DevelopmentStage::Launched
        } else if has(MVP_KEYWORDS) {
            DevelopmentStage::Mvp
        } else if has(PROTOTYPE_KEYWORDS) {
            DevelopmentStage::Prototype
        } else {
            DevelopmentStage::Idea
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DevelopmentStage::Idea => "idea",
            DevelopmentStage::Prototype => "prototype",
            DevelopmentStage::Mvp => "MVP",
            DevelopmentStage::Launched => "launched",
            DevelopmentStage::Scaling => "scaling",
        }
    }
}

impl std::fmt::Display for DevelopmentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A number found in free text, with whatever decorated it
#[derive(Debug, Clone, PartialEq)]
struct NumberToken {
    value: f64,
    multiplier: Option<f64>,
    currency: bool,
}

impl NumberToken {
    fn amount(&self) -> f64 {
        self.value * self.multiplier.unwrap_or(1.0)
    }
}

// Longest spellings first so "milioni" is not read as "m" + "ilioni".
const MAGNITUDES: &[(&str, f64)] = &[
    ("miliardi", 1e9),
    ("miliardo", 1e9),
    ("billions", 1e9),
    ("billion", 1e9),
    ("mld", 1e9),
    ("bn", 1e9),
    ("b", 1e9),
    ("milioni", 1e6),
    ("milione", 1e6),
    ("millions", 1e6),
    ("million", 1e6),
    ("mln", 1e6),
    ("mio", 1e6),
    ("m", 1e6),
    ("thousands", 1e3),
    ("thousand", 1e3),
    ("mila", 1e3),
    ("k", 1e3),
];

const CURRENCY_MARKERS: &[&str] = &["€", "$", "eur", "euro", "usd", "dollari", "dollars"];

/// Parse a run of digits and separators ("1.500.000", "2,5", "1,200.50").
///
/// Repeated separators of one kind are thousands separators. With both kinds
/// present, the last one is the decimal point. A lone separator followed by
/// exactly three digits is a thousands separator.
fn parse_numeric_run(run: &str) -> Option<f64> {
    let dots = run.matches('.').count();
    let commas = run.matches(',').count();

    let normalized = match (dots, commas) {
        (0, 0) => run.to_string(),
        (d, 0) if d > 1 => run.replace('.', ""),
        (0, c) if c > 1 => run.replace(',', ""),
        (d, c) if d > 0 && c > 0 => {
            let last_dot = run.rfind('.')?;
            let last_comma = run.rfind(',')?;
            if last_dot > last_comma {
                run.replace(',', "")
            } else {
                run.replace('.', "").replace(',', ".")
            }
        }
        _ => {
            let sep = if dots == 1 { '.' } else { ',' };
            let (_, frac) = run.split_once(sep)?;
            if frac.len() == 3 {
                run.replace(sep, "")
            } else {
                run.replace(sep, ".")
            }
        }
    };

    normalized.trim_matches('.').parse().ok()
}

/// Read the magnitude suffix right after a number, if any.
/// A suffix only counts as a whole word: "24 mesi" is months, "5 milanesi"
/// is people and "b2b" is not billions.
fn magnitude_after(rest: &str) -> Option<f64> {
    let rest = rest.trim_start();
    MAGNITUDES.iter().find_map(|(suffix, factor)| {
        let after = rest.strip_prefix(suffix)?;
        let word_continues = after.chars().next().is_some_and(|c| c.is_alphanumeric());
        (!word_continues).then_some(*factor)
    })
}

fn scan_numbers(text: &str) -> Vec<NumberToken> {
    let lower = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut chars = lower.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if !c.is_ascii_digit() {
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(i, next)) = chars.peek() {
            if next.is_ascii_digit() || next == '.' || next == ',' {
                end = i + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        // Digits glued to letters ("b2b", "q3") are part of a word
        if lower[..start].chars().next_back().is_some_and(|p| p.is_alphabetic()) {
            continue;
        }

        // Trailing punctuation belongs to the sentence, not the number
        let run = lower[start..end].trim_end_matches(['.', ',']);
        let Some(value) = parse_numeric_run(run) else {
            continue;
        };

        let after = &lower[start + run.len()..];
        let before = lower[..start].trim_end();
        let after_trimmed = after.trim_start();
        let currency = CURRENCY_MARKERS
            .iter()
            .any(|m| before.ends_with(m) || after_trimmed.starts_with(m))
            || magnitude_after(after)
                .map(|_| {
                    // "2.5M€" / "3 milioni di euro"
                    let rest = after_trimmed.trim_start_matches(|c: char| c.is_alphabetic());
                    let rest = rest.trim_start().trim_start_matches("di ").trim_start();
                    CURRENCY_MARKERS.iter().any(|m| rest.starts_with(m))
                })
                .unwrap_or(false);

        tokens.push(NumberToken {
            value,
            multiplier: magnitude_after(after),
            currency,
        });
    }

    tokens
}

/// Parse a monetary amount out of free text ("€2,5M", "500k", "3 miliardi").
///
/// The first number carrying a magnitude suffix or a currency marker wins;
/// otherwise the first plain number. Returns `None` when the text holds no
/// number at all.
pub fn parse_amount(text: &str) -> Option<f64> {
    let tokens = scan_numbers(text);
    tokens
        .iter()
        .find(|t| t.multiplier.is_some() || t.currency)
        .or_else(|| tokens.first())
        .map(NumberToken::amount)
}

const WORD_NUMBERS: &[(&str, u32)] = &[
    ("one", 1),
    ("uno", 1),
    ("two", 2),
    ("due", 2),
    ("three", 3),
    ("tre", 3),
    ("four", 4),
    ("quattro", 4),
    ("five", 5),
    ("cinque", 5),
    ("six", 6),
    ("sei", 6),
];

/// Parse a team size out of free text ("5+ persone" -> 5, "2-3" -> 3).
///
/// Uses the largest integer found, then spelled-out numbers. Blank text is 0;
/// non-blank text without any number ("solo founder") is 1.
pub fn parse_team_size(text: &str) -> u32 {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return 0;
    }

    let largest = lower
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|s| s.parse::<u32>().ok())
        .filter(|n| *n < 1_000)
        .max();
    if let Some(n) = largest {
        return n;
    }

    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();
    if let Some(n) = WORD_NUMBERS
        .iter()
        .filter(|(w, _)| words.contains(w))
        .map(|(_, n)| *n)
        .max()
    {
        return n;
    }

    1
}

fn number_word(token: &str) -> Option<u32> {
    let token = token.trim_matches(|c: char| !c.is_alphanumeric());
    if let Ok(n) = token.trim_end_matches('+').parse::<u32>() {
        return Some(n);
    }
    WORD_NUMBERS
        .iter()
        .find(|(w, _)| *w == token)
        .map(|(_, n)| *n)
}

/// Largest count written right before one of the unit words
/// ("siamo 4 persone", "three founders"). `None` when no unit is counted.
pub fn count_before(text: &str, units: &[&str]) -> Option<u32> {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    tokens
        .windows(2)
        .filter(|pair| units.iter().any(|u| pair[1].starts_with(u)))
        .filter_map(|pair| number_word(pair[0]))
        .filter(|n| *n < 1_000)
        .max()
}

/// Whether any keyword occurs in the (already lower-cased) text.
///
/// Plain substring matching: "mercato" anywhere counts, whatever the sentence
/// is about.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_millions_suffix() {
        assert_eq!(parse_amount("€2.5M"), Some(2_500_000.0));
        assert_eq!(parse_amount("2,5 milioni di euro"), Some(2_500_000.0));
    }

    #[test]
    fn test_parse_amount_thousands() {
        assert_eq!(parse_amount("Cerchiamo 500k"), Some(500_000.0));
        assert_eq!(parse_amount("300 mila euro"), Some(300_000.0));
    }

    #[test]
    fn test_parse_amount_billions() {
        assert_eq!(parse_amount("Il mercato vale 3 miliardi"), Some(3_000_000_000.0));
        assert_eq!(parse_amount("TAM $1.2B"), Some(1_200_000_000.0));
    }

    #[test]
    fn test_parse_amount_separators() {
        assert_eq!(parse_amount("1.500.000"), Some(1_500_000.0));
        assert_eq!(parse_amount("1,200,000"), Some(1_200_000.0));
        assert_eq!(parse_amount("1.200.000,50"), Some(1_200_000.5));
        assert_eq!(parse_amount("150.000 euro"), Some(150_000.0));
    }

    #[test]
    fn test_parse_amount_prefers_money_over_plain_numbers() {
        // "18" is months; the amount is the one with a magnitude
        assert_eq!(parse_amount("In 18 mesi ci servono 200k"), Some(200_000.0));
    }

    #[test]
    fn test_parse_amount_months_are_not_millions() {
        assert_eq!(parse_amount("24 mesi"), Some(24.0));
    }

    #[test]
    fn test_parse_amount_suffix_needs_word_boundary() {
        assert_eq!(parse_amount("5 milanesi"), Some(5.0));
        assert_eq!(parse_amount("5 b2b clienti"), Some(5.0));
        assert_eq!(parse_amount("Fase q3, mercato da 4 millions"), Some(4_000_000.0));
    }

    #[test]
    fn test_parse_amount_none() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("da definire"), None);
    }

    #[test]
    fn test_parse_amount_trailing_period() {
        assert_eq!(parse_amount("Chiediamo 750000."), Some(750_000.0));
    }

    #[test]
    fn test_parse_team_size() {
        assert_eq!(parse_team_size("5+ persone"), 5);
        assert_eq!(parse_team_size("2-3"), 3);
        assert_eq!(parse_team_size("tre co-founder"), 3);
        assert_eq!(parse_team_size("solo founder"), 1);
        assert_eq!(parse_team_size("   "), 0);
        assert_eq!(parse_team_size("un team motivato"), 1);
    }

    #[test]
    fn test_count_before() {
        let units = &["persone", "people", "founder"];
        assert_eq!(count_before("Siamo 4 persone a Milano", units), Some(4));
        assert_eq!(count_before("Three founders and 12 people", units), Some(12));
        assert_eq!(count_before("Un team di 5+ persone", units), Some(5));
        assert_eq!(count_before("Nessun numero qui", units), None);
    }

    #[test]
    fn test_detect_stage() {
        assert_eq!(DevelopmentStage::detect(""), DevelopmentStage::Idea);
        assert_eq!(DevelopmentStage::detect("Prototipo funzionante"), DevelopmentStage::Prototype);
        assert_eq!(DevelopmentStage::detect("MVP in beta privata"), DevelopmentStage::Mvp);
        assert_eq!(DevelopmentStage::detect("Prodotto lanciato nel 2023"), DevelopmentStage::Launched);
        assert_eq!(DevelopmentStage::detect("Scaling in Europe"), DevelopmentStage::Scaling);
    }

    #[test]
    fn test_stage_ordering() {
        assert!(DevelopmentStage::Idea < DevelopmentStage::Mvp);
        assert!(DevelopmentStage::Launched < DevelopmentStage::Scaling);
    }

    #[test]
    fn test_contains_any_is_substring_match() {
        // Unrelated sentence still counts, the heuristic is literal
        assert!(contains_any("il supermercato sotto casa", &["mercato"]));
        assert!(!contains_any("nessuna parola chiave", &["mercato"]));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  uno due\ntre  "), 3);
        assert_eq!(word_count(""), 0);
    }
}
