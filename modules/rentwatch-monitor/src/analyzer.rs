//! Rental-ad content analysis: keyword, price and contact extraction plus
//! the confidence score.

use std::sync::LazyLock;

use regex::Regex;

use rentwatch_common::{AnalysisResult, Sender, CONFIDENCE_STRONG_ACCEPT};

/// Curated rental vocabulary across the three languages seen in the
/// monitored chats. Stored lowercase; matching is substring containment
/// on the lowercased text. Some terms repeat across language blocks and
/// each entry counts on its own, matching the table's weighting.
pub const RENTAL_KEYWORDS: &[&str] = &[
    // Uzbek
    "ijara", "ijaraga", "rent", "rental", "arenda",
    "uy", "xonadon", "kvartira", "dom", "apartment",
    "sotiladi", "ijargaberiladi", "beriladi",
    "narx", "narxi", "pul", "so'm", "sum", "dollar", "$",
    "xona", "room", "yotoqxona", "bedroom",
    "hammom", "oshxona", "kitchen", "bathroom",
    "yangi", "new", "ta'mirli", "remont",
    "metro", "avtovokzal", "markazga", "yaqin",
    "telefon", "tel", "contact", "bog'laning",
    "rasm", "photo", "video", "ko'rish",
    "kirish", "entry", "deposit", "kafolat",
    "kommunal", "utilities", "gaz", "svet", "suv",
    // Russian
    "квартира", "дом", "комната", "сдается", "сдаю",
    "аренда", "снять", "цена", "рубль", "евро",
    "новый", "ремонт", "метро", "центр", "рядом",
    "телефон", "звонить", "фото", "видео",
    "залог", "коммунальные", "газ", "свет", "вода",
    // English
    "house", "apartment", "room", "bedroom", "flat",
    "rent", "lease", "price", "month", "monthly",
    "new", "renovated", "near", "close", "metro",
    "phone", "call", "photo", "pictures", "deposit",
];

static PRICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // currency-suffixed numbers
        r"(?i)\b\d+\s*(?:so'm|sum|сум|руб|rub|\$|usd|€|eur)\b",
        // thousands and millions
        r"(?i)\b\d+\s*(?:ming|тыс|k|thousand)\b",
        r"(?i)\b\d+\s*(?:million|mln|млн)\b",
        r"\$\s*\d+",
        r"\d+\s*\$",
        // bare 3+ digit number, low-precision fallback
        r"\b\d{3,}\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("price pattern must compile"))
    .collect()
});

static CONTACT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // phone-shaped digit runs
        r"\+?\d{1,4}[\s\-()]*\d{2,3}[\s\-()]*\d{3,4}[\s\-()]*\d{2,4}",
        // @handle mentions
        r"@\w+",
        // deep links
        r"t\.me/\w+",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("contact pattern must compile"))
    .collect()
});

/// Score a message (or a combined batch) for rental-ad likelihood.
///
/// Pure and deterministic: text, sender metadata and a media count in,
/// findings and a clamped [0, 1] confidence out. Empty text is fine and
/// contributes nothing.
pub fn analyze(text: &str, sender: &Sender, media_count: usize) -> AnalysisResult {
    let text_lower = text.to_lowercase();

    let keywords_found: Vec<String> = RENTAL_KEYWORDS
        .iter()
        .filter(|keyword| text_lower.contains(**keyword))
        .map(|keyword| keyword.to_string())
        .collect();

    let prices_found = collect_matches(&PRICE_PATTERNS, text);
    let contacts_found = collect_matches(&CONTACT_PATTERNS, text);

    let mut confidence = 0.0_f32;

    if !keywords_found.is_empty() {
        confidence += (keywords_found.len() as f32 * 0.15).min(0.6);
    }
    if !prices_found.is_empty() {
        confidence += 0.25;
    }
    if !contacts_found.is_empty() {
        confidence += 0.2;
    }
    if media_count > 0 {
        confidence += (media_count as f32 * 0.05).min(0.3);
    }

    let phone_hint = contacts_found
        .iter()
        .any(|contact| contact.to_lowercase().contains("phone"));
    if sender.has_username() || phone_hint {
        confidence += 0.1;
    }

    let confidence = confidence.min(1.0);

    AnalysisResult {
        keywords_found,
        prices_found,
        contacts_found,
        is_likely_rental: confidence >= CONFIDENCE_STRONG_ACCEPT,
        confidence,
    }
}

fn collect_matches(patterns: &[Regex], text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for pattern in patterns {
        for m in pattern.find_iter(text) {
            found.push(m.as_str().to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender_with_username() -> Sender {
        Sender {
            id: 1001,
            username: Some("landlord".to_string()),
            first_name: Some("Aziz".to_string()),
            last_name: None,
        }
    }

    fn anonymous_sender() -> Sender {
        Sender {
            id: 1002,
            username: None,
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn empty_text_scores_zero() {
        let result = analyze("", &anonymous_sender(), 0);
        assert_eq!(result.confidence, 0.0);
        assert!(!result.is_likely_rental);
        assert!(result.keywords_found.is_empty());
        assert!(result.prices_found.is_empty());
        assert!(result.contacts_found.is_empty());
    }

    #[test]
    fn keyword_contribution_caps_at_point_six() {
        // far more than four distinct keywords
        let text = "ijara kvartira uy xonadon dom narx metro remont hammom oshxona";
        let result = analyze(text, &anonymous_sender(), 0);
        assert!(result.keywords_found.len() > 4);
        assert!((result.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn score_is_monotonic_in_keyword_count() {
        let one = analyze("kvartira", &anonymous_sender(), 0);
        let two = analyze("kvartira metro", &anonymous_sender(), 0);
        let three = analyze("kvartira metro remont", &anonymous_sender(), 0);
        assert!(one.confidence <= two.confidence);
        assert!(two.confidence <= three.confidence);
    }

    #[test]
    fn price_tokens_detected() {
        for text in ["narxi 300$", "$ 450", "500000 so'm", "200 ming", "3 mln"] {
            let result = analyze(text, &anonymous_sender(), 0);
            assert!(!result.prices_found.is_empty(), "no price found in {text:?}");
        }
    }

    #[test]
    fn bare_three_digit_number_is_a_price_fallback() {
        let result = analyze("qwerty 450 asdf", &anonymous_sender(), 0);
        assert_eq!(result.prices_found, vec!["450".to_string()]);
    }

    #[test]
    fn contact_tokens_detected() {
        for text in ["+998 90 123 45 67", "yozing @uybor_admin", "t.me/uybor"] {
            let result = analyze(text, &anonymous_sender(), 0);
            assert!(
                !result.contacts_found.is_empty(),
                "no contact found in {text:?}"
            );
        }
    }

    #[test]
    fn username_presence_adds_exactly_the_handle_bonus() {
        let text = "kvartira";
        let without = analyze(text, &anonymous_sender(), 0);
        let with = analyze(text, &sender_with_username(), 0);
        assert!((with.confidence - without.confidence - 0.1).abs() < 1e-6);
    }

    #[test]
    fn empty_string_username_earns_no_bonus() {
        let sender = Sender {
            id: 1,
            username: Some(String::new()),
            first_name: None,
            last_name: None,
        };
        let result = analyze("kvartira", &sender, 0);
        assert!((result.confidence - 0.15).abs() < 1e-6);
    }

    #[test]
    fn media_contribution_caps_at_point_three() {
        let six = analyze("", &anonymous_sender(), 6);
        let ten = analyze("", &anonymous_sender(), 10);
        assert!((six.confidence - 0.3).abs() < 1e-6);
        assert!((ten.confidence - 0.3).abs() < 1e-6);
    }

    #[test]
    fn score_is_monotonic_in_media_count() {
        let mut previous = 0.0;
        for count in 0..8 {
            let score = analyze("", &anonymous_sender(), count).confidence;
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn confidence_is_clamped_to_one() {
        let text = "ijara ijaraga kvartira uy narxi 300$ metro remont tel +998901234567 @uybor";
        let result = analyze(text, &sender_with_username(), 10);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn rental_announcement_scenario() {
        let text = "3 xonali kvartira ijaraga beriladi, narxi 300$, tel +998901234567";
        let result = analyze(text, &sender_with_username(), 1);

        for expected in ["ijaraga", "kvartira", "xona", "narxi"] {
            assert!(
                result.keywords_found.iter().any(|k| k == expected),
                "expected keyword {expected:?} in {:?}",
                result.keywords_found
            );
        }
        assert!(result.keywords_found.len() >= 4);
        assert!(!result.prices_found.is_empty());
        assert!(!result.contacts_found.is_empty());
        // 0.6 keywords + 0.25 price + 0.2 contact + 0.05 media + 0.1 handle
        assert_eq!(result.confidence, 1.0);
        assert!(result.is_likely_rental);
    }

    #[test]
    fn unrelated_chatter_is_rejected() {
        let result = analyze("bugun ob-havo juda yaxshi ekan", &anonymous_sender(), 0);
        assert!(result.confidence < CONFIDENCE_STRONG_ACCEPT);
        assert!(!result.is_likely_rental);
    }
}
