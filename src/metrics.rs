/// Characters that make up one "word" for speed calculations
pub const CHARS_PER_WORD: f64 = 5.0;

/// Result figures for one finished session
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Metrics {
    pub correct_chars: usize,
    pub error_count: usize,
    pub accuracy_percent: f64,
    pub wpm: f64,
    pub cpm: f64,
}

impl Metrics {
    /// Score `input` against `passage` over `elapsed_secs` of typing time.
    ///
    /// Only positions the user actually reached are scored. Rates are zero
    /// when no time has elapsed, accuracy is zero when nothing was typed.
    pub fn compute(input: &[char], passage: &[char], elapsed_secs: f64) -> Self {
        let typed = input.len();
        let correct_chars = count_correct(input, passage);
        let error_count = typed - correct_chars;

        let accuracy_percent = if typed > 0 {
            (correct_chars as f64 / typed as f64) * 100.0
        } else {
            0.0
        };

        let minutes = elapsed_secs / 60.0;
        let (wpm, cpm) = if minutes > 0.0 {
            (
                (correct_chars as f64 / CHARS_PER_WORD) / minutes,
                correct_chars as f64 / minutes,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            correct_chars,
            error_count,
            accuracy_percent,
            wpm: non_negative(wpm),
            cpm: non_negative(cpm),
        }
    }
}

// NaN fails the comparison and maps to zero as well
fn non_negative(v: f64) -> f64 {
    if v > 0.0 {
        v
    } else {
        0.0
    }
}

pub fn count_correct(input: &[char], passage: &[char]) -> usize {
    input
        .iter()
        .zip(passage.iter())
        .filter(|(typed, expected)| typed == expected)
        .count()
}

/// What the presentation layer receives once a session finishes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionResults {
    pub wpm: f64,
    pub cpm: f64,
    pub accuracy_percent: f64,
    pub error_count: usize,
    pub elapsed_secs: f64,
}

impl SessionResults {
    pub fn new(metrics: &Metrics, elapsed_secs: f64) -> Self {
        Self {
            wpm: metrics.wpm,
            cpm: metrics.cpm,
            accuracy_percent: metrics.accuracy_percent,
            error_count: metrics.error_count,
            elapsed_secs,
        }
    }
}
