use crate::error::RangeError;

/// Letters allowed in letter-counting ranges. IOQSXZ look too much like digits.
pub const LETTERS: &str = "ABCDEFGHJKLMNPRTUVWY";

const RADIX: u64 = LETTERS.len() as u64;

fn letter_value(ch: char, value: &str) -> Result<u64, RangeError> {
    LETTERS
        .find(ch)
        .map(|i| i as u64)
        .ok_or_else(|| RangeError::InvalidLetter {
            ch,
            value: value.to_owned(),
        })
}

fn is_letter_count(value: &str) -> bool {
    value.chars().next().is_some_and(|c| LETTERS.contains(c))
}

/// Parse a letter-counting numeral: `A` = 0, ..., `Y` = 19, `AA` = 20.
///
/// Every digit but the last counts one higher, like spreadsheet columns.
pub fn parse_letter_count(value: &str) -> Result<u64, RangeError> {
    let mut chars = value.chars();
    let Some(last) = chars.next_back() else {
        return Err(RangeError::InvalidNumber(value.to_owned()));
    };
    let overflow = || RangeError::InvalidNumber(value.to_owned());
    let mut n: u64 = 0;
    for ch in chars {
        n = n
            .checked_add(1 + letter_value(ch, value)?)
            .and_then(|n| n.checked_mul(RADIX))
            .ok_or_else(overflow)?;
    }
    n.checked_add(letter_value(last, value)?).ok_or_else(overflow)
}

/// Inverse of [`parse_letter_count`]
pub fn letter_count(value: u64) -> String {
    let mut digits = Vec::new();
    let mut n = value + 1;
    while n > 0 {
        n -= 1;
        digits.push(LETTERS.as_bytes()[(n % RADIX) as usize] as char);
        n /= RADIX;
    }
    digits.iter().rev().collect()
}

fn parse_decimal(value: &str) -> Result<i64, RangeError> {
    value
        .trim()
        .parse()
        .map_err(|_| RangeError::InvalidNumber(value.to_owned()))
}

fn parse_step(step: Option<&str>) -> Result<i64, RangeError> {
    let Some(step) = step else {
        return Ok(1);
    };
    let step: i64 = step
        .trim()
        .parse()
        .map_err(|_| RangeError::InvalidStep(step.to_owned()))?;
    if step <= 0 {
        return Err(RangeError::NonPositiveStep(step));
    }
    Ok(step)
}

/// Both bounds are inclusive; a `stop` below `start` counts down.
fn inclusive(start: i64, stop: i64, step: i64) -> impl Iterator<Item = i64> {
    let descending = stop < start;
    let mut next = Some(start);
    std::iter::from_fn(move || {
        let current = next?;
        next = if descending {
            current.checked_sub(step).filter(|n| *n >= stop)
        } else {
            current.checked_add(step).filter(|n| *n <= stop)
        };
        Some(current)
    })
}

/// Expand `start:stop[:step]` into its members.
///
/// The numeral system is taken from the first character of `start`: one of
/// [`LETTERS`] selects letter counting, anything else decimal. `step` is a
/// magnitude and must be positive even when counting down.
pub fn expand_range(start: &str, stop: &str, step: Option<&str>) -> Result<Vec<String>, RangeError> {
    let step = parse_step(step)?;
    let letters = is_letter_count(start);
    if !stop.is_empty() && letters != is_letter_count(stop) {
        return Err(RangeError::MixedNumerals {
            start: start.to_owned(),
            stop: stop.to_owned(),
        });
    }

    if letters {
        let bound = |value: &str| {
            i64::try_from(parse_letter_count(value)?)
                .map_err(|_| RangeError::InvalidNumber(value.to_owned()))
        };
        let first = bound(start)?;
        let last = bound(stop)?;
        Ok(inclusive(first, last, step)
            .map(|n| letter_count(n as u64))
            .collect())
    } else {
        let first = parse_decimal(start)?;
        let last = parse_decimal(stop)?;
        Ok(inclusive(first, last, step).map(|n| n.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("1", "3", None, &["1", "2", "3"])]
    #[case("3", "1", None, &["3", "2", "1"])]
    #[case("0", "10", Some("5"), &["0", "5", "10"])]
    #[case("10", "0", Some("5"), &["10", "5", "0"])]
    #[case("0", "9", Some("4"), &["0", "4", "8"])]
    #[case("7", "7", None, &["7"])]
    #[case("15", "8", None, &["15", "14", "13", "12", "11", "10", "9", "8"])]
    #[case("A", "D", None, &["A", "B", "C", "D"])]
    #[case("A", "D", Some("2"), &["A", "C"])]
    #[case("F", "A", None, &["F", "E", "D", "C", "B", "A"])]
    #[case("H", "K", None, &["H", "J", "K"])]
    #[case("W", "AB", None, &["W", "Y", "AA", "AB"])]
    fn expands_ranges(
        #[case] start: &str,
        #[case] stop: &str,
        #[case] step: Option<&str>,
        #[case] expected: &[&str],
    ) {
        assert_eq!(expand_range(start, stop, step).unwrap(), expected);
    }

    #[rstest]
    #[case("A", 0)]
    #[case("Y", 19)]
    #[case("AA", 20)]
    #[case("AB", 21)]
    #[case("YY", 419)]
    #[case("AAA", 420)]
    fn parses_letter_counts(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(parse_letter_count(input).unwrap(), expected);
        assert_eq!(letter_count(expected), input);
    }

    #[test]
    fn letter_count_round_trips() {
        for n in 0..2000 {
            let s = letter_count(n);
            assert_eq!(parse_letter_count(&s).unwrap(), n, "{s}");
        }
    }

    #[rstest]
    #[case("A", "AI", None, RangeError::InvalidLetter { ch: 'I', value: "AI".into() })]
    #[case("1", "x", None, RangeError::InvalidNumber("x".into()))]
    #[case("1", "", None, RangeError::InvalidNumber("".into()))]
    #[case("", "3", None, RangeError::InvalidNumber("".into()))]
    #[case("1", "5", Some("0"), RangeError::NonPositiveStep(0))]
    #[case("1", "5", Some("-2"), RangeError::NonPositiveStep(-2))]
    #[case("1", "5", Some("two"), RangeError::InvalidStep("two".into()))]
    #[case("A", "AAAAAAAAAAAAAAAAAAAA", None, RangeError::InvalidNumber("AAAAAAAAAAAAAAAAAAAA".into()))]
    #[case("A", "5", None, RangeError::MixedNumerals { start: "A".into(), stop: "5".into() })]
    #[case("1", "D", None, RangeError::MixedNumerals { start: "1".into(), stop: "D".into() })]
    fn rejects_bad_ranges(
        #[case] start: &str,
        #[case] stop: &str,
        #[case] step: Option<&str>,
        #[case] expected: RangeError,
    ) {
        assert_eq!(expand_range(start, stop, step).unwrap_err(), expected);
    }
}
