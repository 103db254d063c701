//! Fixed-point decimal formatting
//!
//! Rounds the exact decimal value of a double instead of a scaled copy of it.
//! `1.115_f64` is stored as 1.114999..., so two decimals give `"1.11"`, while
//! multiplying by 100 first lands on 111.5 and rounds the wrong way.

/// Extra digits printed past the requested precision. Any finite double is
/// either an exact tie or differs from one well before this many places.
const GUARD_DIGITS: usize = 40;

/// Format `value` with exactly `digits` decimals.
///
/// Exact ties round away from zero, so `2.25` becomes `"2.3"`. Negative values
/// keep their sign even when they round to zero.
pub fn to_fixed(value: f64, digits: usize) -> String {
  if !value.is_finite() {
    return value.to_string();
  }

  let expanded = format!("{:.*}", digits + GUARD_DIGITS, value.abs());
  let (kept, dropped) = expanded.split_at(expanded.len() - GUARD_DIGITS);
  let kept = kept.trim_end_matches('.');

  let magnitude = if dropped.as_bytes().first().is_some_and(|digit| *digit >= b'5') {
    increment(kept)
  } else {
    kept.to_string()
  };

  if value < 0.0 {
    format!("-{magnitude}")
  } else {
    magnitude
  }
}

/// Round `value` to `digits` decimals using [`to_fixed`]
pub fn round_to(value: f64, digits: usize) -> f64 {
  to_fixed(value, digits).parse().unwrap_or(value)
}

/// Add one unit in the last place of a plain decimal string
fn increment(magnitude: &str) -> String {
  let mut digits: Vec<char> = magnitude.chars().collect();

  for slot in digits.iter_mut().rev() {
    match *slot {
      '.' => continue,
      '9' => *slot = '0',
      digit => {
        *slot = (digit as u8 + 1) as char;
        return digits.into_iter().collect();
      }
    }
  }

  let mut carried = String::from("1");
  carried.extend(digits);
  carried
}
