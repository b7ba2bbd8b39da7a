use crate::engine::compare::Comparison;

/// Human-readable verdict for a comparison. Positions are shown 1-based.
pub fn describe<R, C>(outcome: Comparison, reference: &[R], candidate: &[C]) -> String
where
    R: AsRef<str>,
    C: AsRef<str>,
{
    match outcome {
        Comparison::Match => "Correct!".to_string(),
        Comparison::InputTooShort { .. } => "Incorrect: your input is too short.".to_string(),
        Comparison::InputTooLong { .. } => "Incorrect: your input is too long.".to_string(),
        Comparison::Mismatch { word, char } => {
            let typed = candidate.get(word).map_or("", |w| w.as_ref());
            let expected = reference.get(word).map_or("", |w| w.as_ref());
            format!(
                "Incorrect at word {}, character {}: you typed \"{typed}\", expected \"{expected}\".",
                word + 1,
                char + 1
            )
        }
    }
}
