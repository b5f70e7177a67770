//! Interactive driver: one instruction per line, one command at a time.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::command::Registry;
use crate::dates::Clock;
use crate::engine;
use crate::store::BookingStore;

pub const PROMPT: &str = "Waiting for command. Type 'exit' to quit.";

/// Drive one interactive session to completion.
///
/// Commands run strictly one at a time: each instruction is dispatched,
/// executed and printed before the next line is read. Any failure is
/// reported on `err` and never ends the session; only `exit` or end of
/// input does.
pub async fn run_session<R, W, E>(
    input: R,
    mut out: W,
    mut err: E,
    registry: &Registry,
    store: &dyn BookingStore,
    clock: &dyn Clock,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    let mut reader = input.lines();
    loop {
        write_line(&mut out, PROMPT).await?;
        let Some(line) = reader.next_line().await? else {
            break;
        };
        // The grammars are whitespace-free; strip it all before matching.
        let instruction: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        if instruction == "exit" {
            break;
        }
        match registry.dispatch(&instruction, clock.today()) {
            Ok(command) => {
                debug!("executing {command:?}");
                match engine::execute(&command, store).await {
                    Ok(output) => {
                        for line in &output {
                            write_line(&mut out, line).await?;
                        }
                    }
                    Err(e) => write_line(&mut err, &e.to_string()).await?,
                }
            }
            Err(e) => write_line(&mut err, &e.to_string()).await?,
        }
    }
    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
