//! Static pattern tables shared by the field extractors.
//!
//! Every table is compiled on first use and then shared read-only for the life
//! of the process.

use regex::Regex;
use std::sync::OnceLock;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        pub(crate) fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

macro_rules! table {
    ($name:ident, $role:expr, [$(($rule:literal, $pat:expr)),+ $(,)?]) => {
        pub fn $name() -> &'static PatternTable {
            static T: OnceLock<PatternTable> = OnceLock::new();
            T.get_or_init(|| PatternTable::build($role, &[$(($rule, $pat)),+]))
        }
    };
}

/// What a rule means when it matches a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRole {
    /// The line is never a source for the field.
    Skip,
    /// The line names a known retailer or a kind of business.
    MerchantIndicator,
    /// The line announces the transaction total; `weight` is the base score.
    TotalKeyword { weight: i32 },
    /// The match is a date-shaped substring worth parsing.
    DateShape,
}

#[derive(Debug)]
pub struct PatternRule {
    pub name: &'static str,
    pub regex: Regex,
    pub role: PatternRole,
}

/// An ordered, immutable list of rules.
#[derive(Debug)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
}

impl PatternTable {
    fn build(role: PatternRole, rules: &[(&'static str, &str)]) -> Self {
        let rules = rules
            .iter()
            .map(|&(name, pat)| PatternRule {
                name,
                regex: Regex::new(pat).expect("invalid regex"),
                role,
            })
            .collect();
        Self { rules }
    }

    fn with_weights(rules: &[(&'static str, &str, i32)]) -> Self {
        let rules = rules
            .iter()
            .map(|&(name, pat, weight)| PatternRule {
                name,
                regex: Regex::new(pat).expect("invalid regex"),
                role: PatternRole::TotalKeyword { weight },
            })
            .collect();
        Self { rules }
    }

    /// The first rule, in table order, that matches `text`.
    pub fn first_match(&self, text: &str) -> Option<&PatternRule> {
        self.rules.iter().find(|r| r.regex.is_match(text))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter()
    }
}

// ── Amounts ──────────────────────────────────────────────────────────────────

re!(re_amount,
    r"\b(\d{1,3}(?:,\d{3})+\.\d{2}|\d+\.\d{2})\b");
re!(re_well_formed_amount,
    r"^(?:0|[1-9]\d{0,2}(?:,\d{3})+|[1-9]\d*)\.\d{2}$");
re!(re_standalone_total,
    r"(?i)^(?:(?:(?:grand|final)\s+)?total\s*:?|totai\.?)$");

/// Keywords that mark a total line, strongest first.
pub fn total_keywords() -> &'static PatternTable {
    static T: OnceLock<PatternTable> = OnceLock::new();
    T.get_or_init(|| {
        PatternTable::with_weights(&[
            ("grand_total", r"(?i)\bgrand\s*total\b", 100),
            ("final_total", r"(?i)\bfinal\s*total\b", 100),
            ("total", r"(?i)total", 80),
            ("ocr_totai", r"(?i)\btotai\b", 80),
        ])
    })
}

table!(amount_skip, PatternRole::Skip, [
    ("tender", r"(?i)\b(?:cash|debit|credit|check|card)\s*tend"),
    ("card_payment", r"(?i)\b(?:visa|master\s*card|amex|american\s+express|discover|gift\s*card|credit\s*card|debit\s*card|apple\s*pay|google\s*pay|paypal|venmo|ebt)\b"),
    ("change_refund", r"(?i)\b(?:change(?:\s+due)?|refund|return)\b"),
    ("account_reference", r"(?i)\b(?:acct|account|approval|approved|auth(?:orization)?|terminal|term\s*id)\b|\bref(?:erence)?\s*(?:#|no\b)|\btrans(?:action)?\s*(?:#|id\b|no\b)"),
    ("balance", r"(?i)\bbal(?:ance)?\b"),
    ("store_metadata", r"(?i)\b(?:manager|mgr|phone|tel|address|items?\s+sold|cashier|register)\b|\b(?:store|st|reg)\s*#"),
    ("promo_footer", r"(?i)\b(?:thank\s*you|thanks|survey|you\s+saved|savings?|rewards?|points?|coupon|member|visit|feedback)\b|www\.|\.com\b"),
    ("raw_date", r"\b\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}\b"),
    ("long_digits", r"\d{10,}"),
    ("subtotal_tax", r"(?i)\bsub\s*-?\s*total|\b(?:tax|vat|gst|hst|pst)\b"),
]);

// ── Dates ────────────────────────────────────────────────────────────────────

// Whole month names and their abbreviations only; `Decatur` or `Market` must not match.
macro_rules! month_name {
    () => {
        r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sept?(?:ember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?"
    };
}

table!(date_line_skip, PatternRole::Skip, [
    ("item_or_total", r"(?i)\b(?:total|subtotal|tax|qty|quantity|price|items?|amount|change|balance|tend(?:er)?)\b"),
    ("currency", r"[$€£¥]"),
]);

table!(date_shapes, PatternRole::DateShape, [
    ("iso", r"\b\d{4}[/.\-]\d{1,2}[/.\-]\d{1,2}\b"),
    ("four_digit_year", r"\b\d{1,2}[/.\-]\d{1,2}[/.\-]\d{4}\b"),
    ("two_digit_year", r"\b\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2}\b"),
    ("undelimited", r"\b\d{6}\b"),
    ("month_name_first", concat!(r"(?i)\b", month_name!(), r"\s+\d{1,2},?\s+\d{4}\b")),
    ("day_then_month_name", concat!(r"(?i)\b\d{1,2}\s+", month_name!(), r",?\s+\d{4}\b")),
]);

/// Formats tried against every date-shaped match, in priority order.
/// Day-first precedes month-first, so `03/04/24` reads as 3 April.
pub const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d/%m/%y",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%d-%m-%y",
    "%m-%d-%Y",
    "%m-%d-%y",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d.%m.%y",
    "%Y.%m.%d",
    "%d%m%y",
    "%m%d%y",
    "%b %d %Y",
    "%d %b %Y",
];

// ── Merchant ─────────────────────────────────────────────────────────────────

table!(merchant_skip, PatternRole::Skip, [
    ("promotional", r"(?i)\b(?:thank\s*you|thanks|welcome|come\s+again|visit\s+us|survey|feedback|save|savings|you\s+saved|rewards?|member(?:ship)?|coupon|offer)\b"),
    ("web", r"(?i)www\.|https?://|\.com\b|@"),
    ("receipt_header", r"(?i)\b(?:receipt|invoice|order|transaction|register|terminal|table|guest|copy)\b|\b(?:ref|store|reg|check|trans)\s*(?:#|no\b)"),
    ("contact_staff", r"(?i)\b(?:tel|phone|fax|email|manager|mgr|cashier|server|associate|operator|street|avenue|ave|blvd|boulevard|road|suite|hwy|highway)\b"),
    ("phone", r"\(?\d{3}\)?[\s.\-]\d{3}[\s.\-]\d{4}"),
    ("financial", r"(?i)\b(?:total|subtotal|sub\s*total|tax|vat|amount|balance|change|cash|credit|debit|visa|mastercard|amex|payment|tend(?:er)?|due|paid|price|qty|items?)\b"),
    ("slogan", r"(?i)\b(?:save\s+money|live\s+better|expect\s+more|pay\s+less|low\s+prices|every\s*day|always)\b"),
    ("leading_digit", r"^\d"),
    ("date", r"\b\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}\b|\b\d{4}-\d{2}-\d{2}\b"),
    ("written_date", concat!(
        r"(?i)\b", month_name!(), r"\s+\d{1,2},?\s+\d{4}\b",
        r"|\b\d{1,2}\s+", month_name!(), r",?\s+\d{4}\b",
    )),
    ("currency_amount", r"[$€£]\s*\d|\b\d+\.\d{2}\b"),
    ("long_digits", r"\d{10,}"),
]);

table!(merchant_indicators, PatternRole::MerchantIndicator, [
    ("retail_chain", r"(?i)\b(?:wal-?mart|target|costco|kroger|safeway|walgreens|cvs|home\s+depot|lowe'?s|best\s+buy|starbucks|mcdonald'?s|whole\s+foods|trader\s+joe'?s|aldi|lidl|publix|7-eleven|dollar\s+(?:tree|general)|ikea|amazon|tesco|sainsbury'?s|subway|chipotle|shell|chevron)\b"),
    ("business_type", r"(?i)\b(?:market|supermarket|store|stores|shop|mart|caf[eé]|coffee|restaurant|grill|kitchen|bakery|pharmacy|deli|pizza|pizzeria|bistro|diner|bar|pub|foods?|grocery|groceries|inc|llc|ltd|co)\b"),
]);
