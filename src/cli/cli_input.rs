use std::io::{BufRead, Write};

/// Terminal the menus talk to. Generic over the streams so the menus can be driven
/// from a script in tests.
pub struct Console<R: BufRead, W: Write> {
    input: R,
    pub out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn say(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }

    /// Prints the prompt and reads one line. `None` at the end of input.
    pub fn ask(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.out, "\x1b[36m{}\x1b[0m", prompt);
        let _ = self.out.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    /// Like `ask`, but converts the answer; an empty answer gives `Ok(None)`.
    pub fn ask_value<T, E, F>(&mut self, prompt: &str, parse: F) -> Result<Option<T>, String>
    where
        F: Fn(&str) -> Result<T, E>,
        E: std::fmt::Display,
    {
        match self.ask(prompt) {
            None => Err("input closed".to_string()),
            Some(answer) if answer.is_empty() => Ok(None),
            Some(answer) => parse(&answer).map(Some).map_err(|e| e.to_string()),
        }
    }
}
