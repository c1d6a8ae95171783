use std::io::{self, BufRead, Write};

pub struct ShellPrompt {
    prompt: String,
}

impl ShellPrompt {
    pub fn new(prompt: &str) -> Self {
        ShellPrompt {
            prompt: prompt.to_string(),
        }
    }

    pub fn show_prompt<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.prompt.as_bytes())?;
        // No newline follows, so flush explicitly
        out.flush()
    }

    /// Reads one line without its terminator. `None` at end of input.
    pub fn read_line<R: BufRead>(&self, input: &mut R) -> io::Result<Option<String>> {
        let mut buf = String::new();
        let bytes_read = input.read_line(&mut buf)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }
}
