//! Spoken phrases used by the drill. Everything the caller hears is built here.

pub fn ask_exercise(exercise: &str) -> String {
    format!("Wieviel ist {exercise}")
}

pub fn repeat_exercise(exercise: &str) -> String {
    format!("Ich wiederhole noch einmal die Aufgabe: {}", ask_exercise(exercise))
}

pub fn greet_with_exercise(name: &str, exercise: &str) -> String {
    format!("{name}, wieviel ist {exercise}")
}

/// Reminds the caller how to phrase an answer so the platform can resolve the number.
pub fn answer_hint(exercise: &str) -> String {
    format!("Bitte sage mir was {exercise} ist, indem du sagst: die Antwort ist")
}

pub fn correct(exercise: &str, answer: i64) -> String {
    format!("Richtig. {exercise} macht {answer}. Noch ein Spiel?")
}

pub fn incorrect(exercise: &str, answer: i64, expected: i64) -> String {
    format!(
        "Leider falsch. {exercise} ist leider NICHT {answer}. Die richtige Antwort ist {expected}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_wraps_the_question() {
        assert_eq!(
            repeat_exercise("2 plus 2"),
            "Ich wiederhole noch einmal die Aufgabe: Wieviel ist 2 plus 2"
        );
    }

    #[test]
    fn test_incorrect_mentions_answer_and_expected_result() {
        let text = incorrect("7 minus 3", 5, 4);

        assert!(text.contains("7 minus 3"));
        assert!(text.contains("NICHT 5"));
        assert!(text.ends_with("Die richtige Antwort ist 4"));
    }
}
