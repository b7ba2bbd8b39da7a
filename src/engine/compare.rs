/// Where a typed recitation first diverges from the passage.
///
/// Indices are 0-based. `char` counts chars within the word, not bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Match,
    /// The candidate ran out. `char` is `None` when a whole word is missing,
    /// `Some(j)` when the candidate word stopped after `j` chars.
    InputTooShort { word: usize, char: Option<usize> },
    /// The candidate has extra text. `char` is `Some(len)` when a word has
    /// trailing chars, `None` when whole words follow the end of the passage.
    InputTooLong { word: usize, char: Option<usize> },
    Mismatch { word: usize, char: usize },
}

impl Comparison {
    pub fn is_match(self) -> bool {
        matches!(self, Comparison::Match)
    }
}

/// Compare a candidate recitation against the reference words.
///
/// Scans word-major, char-minor and stops at the first divergence. The
/// comparison is not symmetric: swapping the arguments swaps which of the
/// too-short/too-long outcomes fires.
pub fn compare<R, C>(reference: &[R], candidate: &[C]) -> Comparison
where
    R: AsRef<str>,
    C: AsRef<str>,
{
    for (i, expected) in reference.iter().enumerate() {
        let Some(typed) = candidate.get(i) else {
            return Comparison::InputTooShort {
                word: i,
                char: None,
            };
        };

        let mut typed_chars = typed.as_ref().chars();
        let mut expected_len = 0;
        for (j, want) in expected.as_ref().chars().enumerate() {
            match typed_chars.next() {
                None => {
                    return Comparison::InputTooShort {
                        word: i,
                        char: Some(j),
                    };
                }
                Some(got) if got != want => {
                    return Comparison::Mismatch { word: i, char: j };
                }
                Some(_) => {}
            }
            expected_len = j + 1;
        }

        if typed_chars.next().is_some() {
            return Comparison::InputTooLong {
                word: i,
                char: Some(expected_len),
            };
        }
    }

    if candidate.len() > reference.len() {
        return Comparison::InputTooLong {
            word: reference.len(),
            char: None,
        };
    }

    Comparison::Match
}
