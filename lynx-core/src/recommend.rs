//! Rule tables mapping a temperature and condition label to suggestions.
//!
//! Each table is evaluated top to bottom and the first matching row wins.
//! Conditions are matched by substring on the provider's category label, so
//! unrecognized categories simply fall through to the later rows.

use crate::model::Suggestion;

struct Rule {
    applies: fn(f64, &str) -> bool,
    text: &'static str,
}

const CLOTHING_FALLBACK: &str = "Adaptable outfit for dynamic conditions";

const CLOTHING_RULES: &[Rule] = &[
    Rule {
        applies: |t, _| t < 10.0,
        text: "Thermal jacket, insulated pants, gloves",
    },
    Rule {
        applies: |t, _| (10.0..20.0).contains(&t),
        text: "Light jacket, long sleeves, jeans",
    },
    Rule {
        applies: |t, c| t >= 20.0 && is_rainy(c),
        text: "Waterproof jacket, umbrella",
    },
    Rule {
        applies: |t, _| t >= 20.0,
        text: "T-shirt, shorts, sunglasses",
    },
];

const ACTIVITY_DEFAULT: &str = "Great day for a casual walk or photography";

const ACTIVITY_RULES: &[Rule] = &[
    Rule {
        applies: |_, c| is_rainy(c),
        text: "Cozy up with a book or movie indoors",
    },
    Rule {
        applies: |t, _| t > 20.0,
        text: "Perfect for a hike or picnic in the sun",
    },
    Rule {
        applies: |t, _| t < 10.0,
        text: "Try indoor yoga or a warm coffee run",
    },
    Rule {
        applies: |_, _| true,
        text: ACTIVITY_DEFAULT,
    },
];

/// Case-sensitive: matches "Rain", not "rain".
fn is_rainy(condition: &str) -> bool {
    condition.contains("Rain")
}

fn first_match(rules: &[Rule], temperature: f64, condition: &str) -> Option<&'static str> {
    rules
        .iter()
        .find(|rule| (rule.applies)(temperature, condition))
        .map(|rule| rule.text)
}

pub fn clothing(temperature_celsius: f64, condition: &str) -> &'static str {
    // Only NaN escapes the table.
    first_match(CLOTHING_RULES, temperature_celsius, condition).unwrap_or(CLOTHING_FALLBACK)
}

pub fn activity(temperature_celsius: f64, condition: &str) -> &'static str {
    first_match(ACTIVITY_RULES, temperature_celsius, condition).unwrap_or(ACTIVITY_DEFAULT)
}

/// Clothing and activity suggestions for a reading. Pure and total.
pub fn suggest(temperature_celsius: f64, condition: &str) -> Suggestion {
    Suggestion {
        clothing: clothing(temperature_celsius, condition).to_string(),
        activity: activity(temperature_celsius, condition).to_string(),
    }
}
