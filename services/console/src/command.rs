use calclearn_core::TurnEvent;

/// A line typed into the console, decoded.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    Turn(TurnEvent),
    Quit,
}

/// Decodes one input line.
///
/// The console accepts explicit commands only:
/// *   empty line or `start`: ask for a new exercise
/// *   `name <name>`: introduce yourself
/// *   `answer <number>` or just `<number>`: answer the pending exercise
/// *   `quit` / `exit`: leave
///
/// A `name` or `answer` command without a usable argument becomes `Unrecognized`,
/// the same way the voice platform handles an unresolved slot.
pub fn parse_line(line: &str) -> ConsoleCommand {
    let line = line.trim();
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    let turn = match keyword.to_lowercase().as_str() {
        "quit" | "exit" if rest.is_empty() => return ConsoleCommand::Quit,
        "" | "start" if rest.is_empty() => TurnEvent::Launch,
        "name" if !rest.is_empty() => TurnEvent::ProvideName(rest.to_string()),
        "answer" => match rest.parse::<i64>() {
            Ok(answer) => TurnEvent::ProvideAnswer(answer),
            Err(_) => TurnEvent::Unrecognized,
        },
        _ => match line.parse::<i64>() {
            Ok(answer) => TurnEvent::ProvideAnswer(answer),
            Err(_) => TurnEvent::Unrecognized,
        },
    };
    ConsoleCommand::Turn(turn)
}
