//! Heuristic strength scoring
//!
//! A record's strength starts from its rarity and accumulates bonuses from
//! an ordered list of text rules matched against the lower-cased
//! description. Some rules count every match (scaled by a captured number),
//! others add a flat bonus once if the text matches at all.
//!
//! The result is always within [`MIN_STRENGTH`, `MAX_STRENGTH`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::reference::rarity_score;

pub const MIN_STRENGTH: u8 = 1;
pub const MAX_STRENGTH: u8 = 100;

/// Penalty for items that require attunement
const ATTUNEMENT_PENALTY: i64 = 5;
/// Single-use items are scored at a third
const CONSUMABLE_DIVISOR: i64 = 3;
const CONSUMABLE_MARKERS: &[&str] = &["potion", "consumable"];

/// How a rule turns matches into points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    /// `weight × n` for every match, where `n` is the first capture group
    PerMatch,
    /// `weight` once if there is any match
    Once,
}

/// A single scoring rule
#[derive(Debug, Clone)]
pub struct ScoreRule {
    pub name: &'static str,
    pub weight: i64,
    pub tally: Tally,
    pattern: Regex,
}

impl ScoreRule {
    pub fn new(
        name: &'static str,
        pattern: &str,
        weight: i64,
        tally: Tally,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            weight,
            tally,
            pattern: Regex::new(pattern)?,
        })
    }

    /// Points this rule awards for already lower-cased text
    pub fn apply(&self, text: &str) -> i64 {
        match self.tally {
            Tally::Once => {
                if self.pattern.is_match(text) {
                    self.weight
                } else {
                    0
                }
            }
            Tally::PerMatch => self
                .pattern
                .captures_iter(text)
                .map(|cap| {
                    let n = cap.get(1).map_or(1, |m| parse_count(m.as_str()));
                    self.weight.saturating_mul(n)
                })
                .fold(0i64, i64::saturating_add),
        }
    }
}

/// Value of a matched `\d+` run. Any Unicode decimal digit counts; overflow saturates.
fn parse_count(digits: &str) -> i64 {
    digits
        .chars()
        .map(|c| i64::from(decimal_digit(c).unwrap_or(0)))
        .fold(0i64, |n, d| n.saturating_mul(10).saturating_add(d))
}

/// Value of a decimal digit (Unicode category Nd).
///
/// Nd digits come in contiguous runs of ten from zero to nine, so the value
/// is the offset from the start of the run, modulo ten.
fn decimal_digit(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal(c) {
        return None;
    }

    let mut run = 0u32;
    let mut code = u32::from(c);
    while let Some(prev) = code.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal(prev) {
            break;
        }
        run += 1;
        code -= 1;
    }
    Some(run % 10)
}

fn is_decimal(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

static DECIMAL_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d$").expect("digit pattern is valid"));

/// (name, pattern, weight, tally), applied in order
const STANDARD_RULES: &[(&str, &str, i64, Tally)] = &[
    ("attack bonus", r"\+(\d) to attack", 10, Tally::PerMatch),
    ("damage bonus", r"\+(\d) to damage", 8, Tally::PerMatch),
    ("armor bonus", r"\+(\d) to ac", 12, Tally::PerMatch),
    ("dice", r"(\d+)d(\d+)", 6, Tally::PerMatch),
    ("resistance", r"resistance", 8, Tally::Once),
    ("immunity", r"immune|immunity", 20, Tally::Once),
    ("advantage", r"advantage", 5, Tally::Once),
    ("flight", r"fly speed|flight", 15, Tally::Once),
    ("invisibility", r"invisible", 15, Tally::Once),
    ("teleport", r"teleport", 15, Tally::Once),
    ("spell level", r"(\d)(?:st|nd|rd|th)-level spell", 3, Tally::PerMatch),
    ("at will", r"at will", 10, Tally::Once),
];

static STANDARD_SCORER: Lazy<Scorer> = Lazy::new(Scorer::standard);

/// What the scorer looks at
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInput<'a> {
    pub rarity: Option<&'a str>,
    pub attunement: bool,
    pub item_type: Option<&'a str>,
    pub description: &'a str,
}

/// Rule list plus the accumulator that applies it
#[derive(Debug, Clone)]
pub struct Scorer {
    rules: Vec<ScoreRule>,
}

impl Scorer {
    /// Scorer with the standard rule set
    pub fn standard() -> Self {
        let rules = STANDARD_RULES
            .iter()
            .map(|&(name, pattern, weight, tally)| {
                ScoreRule::new(name, pattern, weight, tally)
                    .expect("standard rule patterns are valid")
            })
            .collect();
        Self { rules }
    }

    pub fn with_rules(rules: Vec<ScoreRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ScoreRule] {
        &self.rules
    }

    /// Sum of every rule's points for the description
    pub fn description_points(&self, description: &str) -> i64 {
        let text = description.to_lowercase();
        self.rules
            .iter()
            .map(|rule| rule.apply(&text))
            .fold(0i64, i64::saturating_add)
    }

    pub fn score(&self, input: &ScoreInput<'_>) -> u8 {
        let mut total = input.rarity.map(rarity_score).unwrap_or(0);
        total = total.saturating_add(self.description_points(input.description));

        if input.attunement {
            total = total.saturating_sub(ATTUNEMENT_PENALTY);
        }

        if is_consumable(input.item_type) {
            total = total.div_euclid(CONSUMABLE_DIVISOR).max(1);
        }

        total.clamp(i64::from(MIN_STRENGTH), i64::from(MAX_STRENGTH)) as u8
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::standard()
    }
}

fn is_consumable(item_type: Option<&str>) -> bool {
    let Some(item_type) = item_type else {
        return false;
    };
    let lowered = item_type.to_lowercase();
    CONSUMABLE_MARKERS.iter().any(|m| lowered.contains(m))
}

/// Score with the standard rule set
pub fn score(input: &ScoreInput<'_>) -> u8 {
    STANDARD_SCORER.score(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static ScoreRule {
        STANDARD_SCORER
            .rules()
            .iter()
            .find(|r| r.name == name)
            .unwrap()
    }

    #[test]
    fn test_rare_weapon() {
        let input = ScoreInput {
            rarity: Some("rare"),
            attunement: false,
            item_type: Some("Weapon"),
            description: "deals 2d6 damage, grants advantage",
        };
        assert_eq!(score(&input), 47);
    }

    #[test]
    fn test_potion_dampening() {
        let input = ScoreInput {
            rarity: Some("rare"),
            attunement: false,
            item_type: Some("Potion"),
            description: "deals 2d6 damage, grants advantage",
        };
        assert_eq!(score(&input), 15);

        let input = ScoreInput {
            item_type: Some("Consumable Scroll"),
            ..Default::default()
        };
        assert_eq!(score(&input), 1);
    }

    #[test]
    fn test_per_match_rules() {
        assert_eq!(rule("attack bonus").apply("+1 to attack and +2 to attack"), 30);
        assert_eq!(rule("damage bonus").apply("+3 to damage"), 24);
        assert_eq!(rule("armor bonus").apply("+2 to ac"), 24);
        assert_eq!(rule("dice").apply("1d8 plus 3d6"), 24);
        assert_eq!(rule("spell level").apply("a 3rd-level spell or a 1st-level spell"), 12);
    }

    #[test]
    fn test_non_ascii_digits() {
        // Arabic-Indic three
        assert_eq!(rule("attack bonus").apply("+\u{0663} to attack"), 30);
        // Devanagari four, fullwidth two
        assert_eq!(rule("dice").apply("\u{096A}d6 and \u{FF12}d8"), 36);
        assert_eq!(parse_count("\u{0661}\u{0660}"), 10);
        assert_eq!(parse_count("1234"), 1234);
        assert_eq!(parse_count("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_flat_rules_count_once() {
        assert_eq!(rule("resistance").apply("resistance to fire and resistance to cold"), 8);
        assert_eq!(rule("immunity").apply("immune to poison; immunity to charm"), 20);
        assert_eq!(rule("flight").apply("gains a fly speed"), 15);
        assert_eq!(rule("at will").apply("cast at will"), 10);
        assert_eq!(rule("teleport").apply("walks"), 0);
    }

    #[test]
    fn test_description_is_lowercased() {
        let input = ScoreInput {
            description: "You have ADVANTAGE and become INVISIBLE",
            ..Default::default()
        };
        assert_eq!(score(&input), 20);
    }

    #[test]
    fn test_attunement_penalty() {
        let input = ScoreInput {
            rarity: Some("Uncommon"),
            attunement: true,
            item_type: None,
            description: "",
        };
        assert_eq!(score(&input), 10);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(score(&ScoreInput::default()), MIN_STRENGTH);

        let input = ScoreInput {
            rarity: Some("artifact"),
            attunement: true,
            item_type: None,
            description: "+3 to attack, +3 to damage, 10d10, immune, teleport at will",
        };
        assert_eq!(score(&input), MAX_STRENGTH);

        let input = ScoreInput {
            rarity: None,
            attunement: true,
            item_type: Some("potion"),
            description: "",
        };
        assert_eq!(score(&input), MIN_STRENGTH);

        let input = ScoreInput {
            description: "99999999999999999999999d6",
            ..Default::default()
        };
        assert_eq!(score(&input), MAX_STRENGTH);
    }

    #[test]
    fn test_custom_rules() {
        let vorpal = ScoreRule::new("vorpal", r"vorpal", 40, Tally::Once).unwrap();
        let scorer = Scorer::with_rules(vec![vorpal]);
        let input = ScoreInput {
            rarity: Some("rare"),
            description: "A Vorpal blade",
            ..Default::default()
        };
        assert_eq!(scorer.score(&input), 70);
    }
}
