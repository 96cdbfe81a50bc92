use crate::command::{ConsoleCommand, parse_line};
use anyhow::{Context, Result};
use calclearn_core::{DialogController, DialogResponse, ExerciseSource, Session, TurnEvent};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

async fn say<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(format!("{text}\n").as_bytes())
        .await
        .context("Failed to write to output")?;
    output.flush().await.context("Failed to flush output")?;
    Ok(())
}

/// Runs one drill conversation over a line-based input and a text output.
///
/// Opening the drill counts as a launch. After `reprompt_after` of silence the last
/// reprompt is written once; it is armed again by the next turn. The conversation
/// ends on `quit`, at end of input, or when a response stops expecting an answer.
pub async fn run_drill<S, R, W>(
    controller: &mut DialogController<S>,
    session: &mut Session,
    input: R,
    output: &mut W,
    reprompt_after: Duration,
) -> Result<()>
where
    S: ExerciseSource,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tracing::info!("Session started");

    let mut last: DialogResponse = controller.handle_turn(session, TurnEvent::Launch);
    say(output, &last.speech).await?;

    let mut lines = input.lines();
    let mut reprompted = false;

    while last.expects_answer {
        let line = match tokio::time::timeout(reprompt_after, lines.next_line()).await {
            // Silence: repeat the question once, then keep waiting.
            Err(_) => {
                if !reprompted {
                    say(output, &last.reprompt).await?;
                    reprompted = true;
                }
                continue;
            }
            Ok(line) => line.context("Failed to read input")?,
        };

        let Some(line) = line else {
            break;
        };

        match parse_line(&line) {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Turn(turn) => {
                last = controller.handle_turn(session, turn);
                reprompted = false;
                say(output, &last.speech).await?;
            }
        }
    }

    tracing::info!(?session, "Session ended");
    Ok(())
}
