//! Local sandbox transport: the same engine as the Telegram poller, fed
//! from lines instead of updates. Used for development, piped input and
//! the no-input demo.

use std::io::{self, BufRead, Read, Write};

use lana_engine::{ChatEngine, Outcome};
use lana_models::LanaError;

/// The sandbox always talks as this pseudo-user.
pub const LOCAL_USER_ID: i64 = 1;
pub const LOCAL_USERNAME: &str = "local_user";

const QUIT_COMMANDS: &[&str] = &["/quit", ":q", "exit"];

enum Step {
    Continue,
    Quit,
}

/// Run a session over an iterator of input lines, writing `lana>` replies
/// to `out`.
pub async fn run_session<I, W>(engine: &ChatEngine, lines: I, out: &mut W) -> Result<(), LanaError>
where
    I: IntoIterator<Item = String>,
    W: Write,
{
    for raw in lines {
        if let Step::Quit = step(engine, &raw, out).await? {
            break;
        }
    }
    Ok(())
}

/// Interactive `you>` loop on a terminal. Ends on quit commands, EOF or
/// an unreadable stdin.
pub async fn run_interactive(engine: &ChatEngine) -> Result<(), LanaError> {
    let mut out = io::stdout();
    writeln!(out, "Lana local sandbox ✨ (type /quit to exit, /reset to clear)")?;
    let stdin = io::stdin();
    loop {
        write!(out, "you> ")?;
        out.flush()?;
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                writeln!(out)?;
                break;
            }
            Ok(_) => {}
        }
        if let Step::Quit = step(engine, &line, &mut out).await? {
            break;
        }
    }
    Ok(())
}

async fn step<W: Write>(
    engine: &ChatEngine,
    raw: &str,
    out: &mut W,
) -> Result<Step, LanaError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(Step::Continue);
    }
    if QUIT_COMMANDS.contains(&text) {
        return Ok(Step::Quit);
    }
    if text == "/reset" {
        let confirmation = engine.reset(LOCAL_USER_ID).await?;
        writeln!(out, "lana> {confirmation}")?;
        return Ok(Step::Continue);
    }

    let outcome = engine
        .handle_message(LOCAL_USER_ID, Some(LOCAL_USERNAME), text)
        .await?;
    match outcome {
        Outcome::Reply(reply) | Outcome::Paywalled(reply) => {
            writeln!(out, "lana> {reply}")?;
        }
    }
    Ok(Step::Continue)
}

/// The transcript played when local mode gets no input at all.
pub fn demo_transcript() -> Vec<String> {
    [
        "Привет, Лана!",
        "Как твои дела?",
        "/reset",
        "Давай начнём заново",
        "/quit",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Read all lines from a reader, treating an unreadable stream as empty.
/// Some sandboxes expose a stdin whose reads fail with `EIO`.
pub fn read_lines_safely<R: Read>(mut reader: R) -> Vec<String> {
    let mut buf = String::new();
    match reader.read_to_string(&mut buf) {
        Ok(_) => buf.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStdin;

    impl Read for BrokenStdin {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from_raw_os_error(29)) // EIO/ESPIPE-style failure
        }
    }

    #[test]
    fn broken_stdin_yields_no_lines() {
        assert!(read_lines_safely(BrokenStdin).is_empty());
    }

    #[test]
    fn readable_input_splits_into_lines() {
        let lines = read_lines_safely("hi\n/quit\n".as_bytes());
        assert_eq!(lines, vec!["hi".to_string(), "/quit".to_string()]);
    }
}
