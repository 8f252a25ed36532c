//! Amount-in-words using the Indian numbering system (Thousand, Lakh, Crore)

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

pub const HUNDRED: u64 = 100;
pub const THOUSAND: u64 = 1_000;
pub const LAKH: u64 = 1_00_000;
pub const CRORE: u64 = 1_00_00_000;

/// Spell out a whole number, e.g. `150000 -> "One Lakh Fifty Thousand"`.
///
/// Groups follow the Indian convention: hundreds, thousands, lakhs, then
/// crores. Counts of crores are spelled recursively, so `1_00_00_00_000`
/// reads `"One Hundred Crore"`.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }
    spell(n)
}

fn spell(n: u64) -> String {
    if n < 20 {
        ONES[n as usize].to_string()
    } else if n < HUNDRED {
        let ones = ONES[(n % 10) as usize];
        if ones.is_empty() {
            TENS[(n / 10) as usize].to_string()
        } else {
            format!("{} {}", TENS[(n / 10) as usize], ones)
        }
    } else if n < THOUSAND {
        compose(n / HUNDRED, "Hundred", n % HUNDRED)
    } else if n < LAKH {
        compose(n / THOUSAND, "Thousand", n % THOUSAND)
    } else if n < CRORE {
        compose(n / LAKH, "Lakh", n % LAKH)
    } else {
        compose(n / CRORE, "Crore", n % CRORE)
    }
}

/// Spell out a whole number of any size. Counts of crores beyond `u64`
/// recurse on `n / CRORE` just like smaller ones.
pub fn integer_to_words(n: &BigInt) -> String {
    match n.to_u64() {
        Some(small) => number_to_words(small),
        None => spell_big(n),
    }
}

fn spell_big(n: &BigInt) -> String {
    if let Some(small) = n.to_u64() {
        return spell(small);
    }

    let crore = BigInt::from(CRORE);
    let count = n / &crore;
    let remainder = (n % &crore).to_u64().unwrap_or(0);

    let head = format!("{} Crore", spell_big(&count));
    if remainder == 0 {
        head
    } else {
        format!("{} {}", head, spell(remainder))
    }
}

fn compose(count: u64, scale: &str, remainder: u64) -> String {
    let head = format!("{} {}", spell(count), scale);
    if remainder == 0 {
        head
    } else {
        format!("{} {}", head, spell(remainder))
    }
}

/// Spell out a currency amount for the printed invoice.
///
/// `1234.5` with code `INR` reads `"INR One Thousand Two Hundred Thirty Four
/// and Fifty Paise Only"`. Rupees are the floor of the amount; paise are the
/// remaining fraction rounded half-up to a whole number, carrying into the
/// rupees at 100. Rupees of any magnitude are spelled out in full. An amount
/// that rounds to nothing reads `"Zero"`.
/// Negative amounts read `"Minus ..."`.
pub fn amount_in_words(amount: &BigDecimal, currency_code: &str) -> String {
    let zero = BigDecimal::from(0);
    let negative = *amount < zero;
    let magnitude = amount.abs();

    let rupees_part = magnitude.with_scale_round(0, RoundingMode::Floor);
    let paise_part = ((&magnitude - &rupees_part) * BigDecimal::from(100))
        .with_scale_round(0, RoundingMode::HalfUp);

    let (mut rupees, _) = rupees_part.with_scale(0).into_bigint_and_exponent();
    let mut paise = paise_part.to_u64().unwrap_or(0);
    if paise >= 100 {
        rupees += 1u32;
        paise = 0;
    }

    if rupees == BigInt::from(0) && paise == 0 {
        return "Zero".to_string();
    }

    let mut words = String::new();
    if !currency_code.is_empty() {
        words.push_str(currency_code);
        words.push(' ');
    }
    if negative {
        words.push_str("Minus ");
    }
    words.push_str(&integer_to_words(&rupees));
    if paise > 0 {
        words.push_str(" and ");
        words.push_str(&number_to_words(paise));
        words.push_str(" Paise");
    }
    words.push_str(" Only");
    words
}
