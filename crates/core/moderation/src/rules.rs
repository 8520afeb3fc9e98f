use anuncios_models::v0::{Classification, ListingContent, RulesEnforcement};
use once_cell::sync::Lazy;
use regex::Regex;

/// Terms that always block a listing
static PROHIBITED_KEYWORDS: &[&str] = &[
    "contra revolucion",
    "contra-revolucion",
    "contrarevolucion",
    "propaganda enemiga",
    "subversion",
    "anti gobierno",
    "anti-gobierno",
    "golpe de estado",
];

/// Terms blocked under standard and strict enforcement
static SUSPICIOUS_PATTERNS: &[&str] = &[
    "cambio divisa ilegal",
    "dolares baratos",
    "armas",
    "drogas",
    "narcotrafico",
    "trafico de personas",
    "pornografia",
    "contenido sexual explicito",
];

/// Terms that route a listing to a human under strict enforcement
static MANUAL_REVIEW_KEYWORDS: &[&str] = &[
    "politica",
    "politico",
    "gobierno",
    "censura",
    "vpn",
    "proxy",
];

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?[0-9]{8,15}").expect("valid regex"));
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://|www\.").expect("valid regex"));
static SPECIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[!@#$%^&*()]").expect("valid regex"));

// Repetition scans are quadratic, so long descriptions are truncated first.
const REPETITION_SCAN_LIMIT: usize = 1024;

/// Whether the text contains a run of at least ten bytes repeated three
/// or more times back to back
fn has_repetitive_text(text: &str) -> bool {
    let bytes = &text.as_bytes()[..text.len().min(REPETITION_SCAN_LIMIT)];

    for start in 0..bytes.len() {
        let remaining = bytes.len() - start;
        for len in 10..=(remaining / 3) {
            let unit = &bytes[start..start + len];
            if unit == &bytes[start + len..start + 2 * len]
                && unit == &bytes[start + 2 * len..start + 3 * len]
            {
                return true;
            }
        }
    }

    false
}

/// Collect spam indicators over a submission
///
/// A submission counts as spam when two or more indicators fire at once,
/// a single one is common in legitimate listings.
pub fn spam_indicators(content: &ListingContent) -> Vec<String> {
    let text = content.text();
    let mut indicators = vec![];

    if has_repetitive_text(&text) {
        indicators.push("repetitive_text".to_string());
    }

    let letters = content.title.chars().filter(|c| c.is_alphabetic()).count();
    let uppercase = content
        .title
        .chars()
        .filter(|c| c.is_uppercase())
        .count();
    if letters > 0
        && uppercase as f64 / letters as f64 > 0.7
        && content.title.chars().count() > 10
    {
        indicators.push("excessive_caps".to_string());
    }

    let specials = SPECIAL_RE.find_iter(&text).count();
    if !text.is_empty() && specials as f64 / text.chars().count() as f64 > 0.15 {
        indicators.push("excessive_special_chars".to_string());
    }

    if PHONE_RE.find_iter(&content.description).count() > 3 {
        indicators.push("multiple_phone_numbers".to_string());
    }

    if URL_RE.find_iter(&text).count() > 2 {
        indicators.push("multiple_urls".to_string());
    }

    indicators
}

pub fn is_spam(indicators: &[String]) -> bool {
    indicators.len() >= 2
}

/// Scan listing text for rule violations
///
/// Relaxed enforcement only applies the prohibited list; standard and
/// strict also apply the suspicious list.
pub fn keyword_violations(content: &ListingContent, enforcement: RulesEnforcement) -> Vec<String> {
    let text = content.text().to_lowercase();
    let mut violations = vec![];

    for keyword in PROHIBITED_KEYWORDS {
        if text.contains(keyword) {
            violations.push(format!("prohibited_keyword:{keyword}"));
        }
    }

    if !matches!(enforcement, RulesEnforcement::Relaxed) {
        for pattern in SUSPICIOUS_PATTERNS {
            if text.contains(pattern) {
                violations.push(format!("suspicious_pattern:{pattern}"));
            }
        }
    }

    violations
}

/// Whether a submission must wait for a human decision
///
/// Only strict enforcement routes borderline terms to manual review.
pub fn needs_manual_review(content: &ListingContent, enforcement: RulesEnforcement) -> bool {
    if !matches!(enforcement, RulesEnforcement::Strict) {
        return false;
    }

    let text = content.text().to_lowercase();
    MANUAL_REVIEW_KEYWORDS
        .iter()
        .any(|keyword| text.contains(keyword))
}

/// Weigh text and image verdicts into one 0-100 score
///
/// Text carries 0.6, images 0.3 (85 assumed when there are none) and a
/// clean submission earns a small bonus. Spam caps the score at 40.
pub fn composite_score(text: &Classification, image_scores: &[i32], spam: bool) -> i32 {
    let mut score = text.score as f64 * 0.6;

    if image_scores.is_empty() {
        score += 85.0 * 0.3;
    } else {
        let average = image_scores.iter().sum::<i32>() as f64 / image_scores.len() as f64;
        score += average * 0.3;
    }

    if spam {
        score = score.min(40.0);
    } else {
        score += 10.0 * 0.1;
    }

    score.round() as i32
}

#[cfg(test)]
mod tests {
    use anuncios_models::v0::{Classification, ListingContent, RulesEnforcement};

    use super::*;

    fn listing(title: &str, description: &str) -> ListingContent {
        ListingContent {
            title: title.to_string(),
            description: description.to_string(),
            images: vec![],
        }
    }

    #[test]
    fn spam_needs_two_indicators() {
        let clean = listing("Bicicleta 26", "Bicicleta de uso en buen estado, 53 5555555");
        assert!(spam_indicators(&clean).is_empty());

        let shouting = listing("GANGA INCREIBLE AHORA", "Llama ya");
        let indicators = spam_indicators(&shouting);
        assert_eq!(indicators, vec!["excessive_caps"]);
        assert!(!is_spam(&indicators));

        let spammy = listing(
            "GANGA INCREIBLE AHORA",
            "Llama 53555501 53555502 53555503 53555504 ya mismo",
        );
        let indicators = spam_indicators(&spammy);
        assert!(indicators.contains(&"excessive_caps".to_string()));
        assert!(indicators.contains(&"multiple_phone_numbers".to_string()));
        assert!(is_spam(&indicators));
    }

    #[test]
    fn repeated_runs_are_detected() {
        let repeated = listing(
            "Oferta",
            &"compra ya mismo ".repeat(10),
        );
        assert!(spam_indicators(&repeated).contains(&"repetitive_text".to_string()));
    }

    #[test]
    fn enforcement_levels_gate_the_lists() {
        let suspicious = listing("Vendo", "armas de caza");

        assert!(keyword_violations(&suspicious, RulesEnforcement::Relaxed).is_empty());
        assert_eq!(
            keyword_violations(&suspicious, RulesEnforcement::Standard),
            vec!["suspicious_pattern:armas"]
        );

        let prohibited = listing("Vendo", "propaganda enemiga impresa");
        assert_eq!(
            keyword_violations(&prohibited, RulesEnforcement::Relaxed),
            vec!["prohibited_keyword:propaganda enemiga"]
        );
    }

    #[test]
    fn manual_review_only_under_strict() {
        let borderline = listing("Servicio VPN", "acceso rapido");

        assert!(needs_manual_review(&borderline, RulesEnforcement::Strict));
        assert!(!needs_manual_review(&borderline, RulesEnforcement::Standard));
    }

    #[test]
    fn spam_caps_the_composite_score() {
        let text = Classification {
            score: 90,
            issues: vec![],
        };

        // 90 * 0.6 + 85 * 0.3 + 1 = 80.5 -> 81 (rounded)
        assert_eq!(composite_score(&text, &[], false), 81);
        assert_eq!(composite_score(&text, &[], true), 40);
        assert_eq!(composite_score(&text, &[100, 50], false), 78);
    }
}
