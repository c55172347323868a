//! Tick-label text cleanup, number extraction and sequence repair.

use std::sync::LazyLock;

use regex::Regex;

/// Optional leading dash (ASCII or typographic), digits, optional fraction.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[‐–—-]?[0-9]+(?:\.[0-9]+)?").expect("valid number regex"));

/// Fix the character confusions OCR typically makes on tick labels.
///
/// Applied in order: `O`→`0`, `_`→`-`, `$`→`3`, `"- "`→`"-"`, `~`→`-`,
/// then `L`→`1` wherever the `L` is next to a digit.
pub fn normalize_ocr_text(text: &str) -> String {
    let text = text
        .replace('O', "0")
        .replace('_', "-")
        .replace('$', "3")
        .replace("- ", "-")
        .replace('~', "-");

    // Neighbours are read from the text before any L is rewritten.
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if c != 'L' {
                return c;
            }
            let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let next_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if prev_digit || next_digit {
                '1'
            } else {
                c
            }
        })
        .collect()
}

/// Extract every signed decimal number from OCR text, in reading order.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    let text = normalize_ocr_text(text);
    NUMBER_RE
        .find_iter(&text)
        .filter_map(|m| {
            let ascii = m.as_str().replace(['‐', '–', '—'], "-");
            ascii.parse::<f64>().ok()
        })
        .collect()
}

/// Non-decreasing or non-increasing.
pub fn is_monotonic(values: &[f64]) -> bool {
    let non_dec = values.windows(2).all(|w| w[0] <= w[1]);
    let non_inc = values.windows(2).all(|w| w[0] >= w[1]);
    non_dec || non_inc
}

/// Most frequent step among `diffs` (rounded to 2 decimals).
///
/// Falls back to the median when no single step is the most frequent.
pub fn expected_delta(diffs: &[f64]) -> Option<f64> {
    if diffs.is_empty() {
        return None;
    }
    let mut rounded: Vec<f64> = diffs.iter().map(|d| (d * 100.0).round() / 100.0).collect();
    rounded.sort_by(f64::total_cmp);

    let mut best: Option<(f64, usize)> = None;
    let mut tie = false;
    let mut i = 0;
    while i < rounded.len() {
        let mut j = i;
        while j < rounded.len() && rounded[j] == rounded[i] {
            j += 1;
        }
        let count = j - i;
        match best {
            Some((_, c)) if count == c => tie = true,
            Some((_, c)) if count < c => {}
            _ => {
                best = Some((rounded[i], count));
                tie = false;
            }
        }
        i = j;
    }

    if tie {
        Some(median_sorted(&rounded))
    } else {
        best.map(|(v, _)| v)
    }
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    }
}

fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
    a == b || (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}

/// Force a tick sequence onto an arithmetic progression.
///
/// Each raw step whose size is within `rel_tol` of the expected step keeps
/// the recognized value; any other step is replaced by the previous
/// corrected value plus the expected step in the sequence direction.
pub fn repair_axis_values(values: &[f64], rel_tol: f64) -> Vec<f64> {
    if values.len() < 2 {
        return values.to_vec();
    }
    let diffs: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let Some(delta) = expected_delta(&diffs) else {
        return values.to_vec();
    };
    let direction = if values[1] >= values[0] { 1.0 } else { -1.0 };

    let mut out = Vec::with_capacity(values.len());
    out.push(values[0]);
    for (w, &diff) in values.windows(2).zip(&diffs) {
        let next = if is_close(diff, delta, rel_tol) {
            w[1]
        } else {
            out[out.len() - 1] + direction * delta
        };
        out.push(next);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_fixes_common_confusions() {
        assert_eq!(normalize_ocr_text("1O0 _5 $0 - 2 ~4"), "100 -5 30 -2 -4");
        assert_eq!(normalize_ocr_text("L0 2L LL"), "10 21 LL");
        // The first L only touches another L, the second touches a digit.
        assert_eq!(normalize_ocr_text("LL5"), "L15");
    }

    #[test]
    fn extraction_handles_signs_and_decimals() {
        assert_eq!(extract_numbers("0 20 40 60"), vec![0.0, 20.0, 40.0, 60.0]);
        assert_eq!(extract_numbers("-30\n-20 −x 0.5"), vec![-30.0, -20.0, 0.5]);
        assert_eq!(extract_numbers("–10 —5 ‐2"), vec![-10.0, -5.0, -2.0]);
        assert!(extract_numbers("no digits here").is_empty());
    }

    #[test]
    fn extraction_treats_dash_between_digits_as_sign() {
        // "2-0" reads as 2 followed by -0 and "3~5" becomes "3-5".
        let v = extract_numbers("1O.5, 2-0, -3~5");
        assert_eq!(v, vec![10.5, 2.0, -0.0, -3.0, -5.0]);
    }

    #[test]
    fn monotonic_accepts_flat_runs() {
        assert!(is_monotonic(&[]));
        assert!(is_monotonic(&[1.0]));
        assert!(is_monotonic(&[0.0, 0.0, 10.0]));
        assert!(is_monotonic(&[30.0, 20.0, 20.0, -10.0]));
        assert!(!is_monotonic(&[0.0, 20.0, 10.0]));
    }

    #[test]
    fn expected_delta_prefers_unique_mode() {
        assert_eq!(expected_delta(&[10.0, 10.0, 30.0]), Some(10.0));
        assert_eq!(expected_delta(&[10.004, 9.996, 7.0]), Some(10.0));
        // Two equally common steps fall back to the median.
        assert_eq!(expected_delta(&[10.0, 10.0, 20.0, 20.0]), Some(15.0));
        assert_eq!(expected_delta(&[1.0, 2.0, 4.0]), Some(2.0));
        assert_eq!(expected_delta(&[]), None);
    }

    #[test]
    fn repair_replaces_inconsistent_steps() {
        let v = repair_axis_values(&[0.0, 20.0, 40.0, 6.0, 80.0], 0.1);
        // 40 -> 6 and 6 -> 80 both break the 20 step.
        assert_eq!(v, vec![0.0, 20.0, 40.0, 60.0, 80.0]);
    }

    #[test]
    fn repair_follows_decreasing_direction() {
        let v = repair_axis_values(&[30.0, 20.0, 10.0, 0.0, 1.0], 0.1);
        assert_eq!(v, vec![30.0, 20.0, 10.0, 0.0, -10.0]);
    }

    #[test]
    fn repair_leaves_short_sequences() {
        assert_eq!(repair_axis_values(&[], 0.1), Vec::<f64>::new());
        assert_eq!(repair_axis_values(&[5.0], 0.1), vec![5.0]);
    }
}
