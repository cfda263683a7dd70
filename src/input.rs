use std::io::Write;

// Characters of standard input, read a line at a time
// The prompt is shown whenever another line is needed
pub struct StdinChars {
    line: Vec<char>,
    position: usize,
    prompt: bool,
    finished: bool,
}

impl StdinChars {
    pub fn new(prompt: bool) -> StdinChars {
        StdinChars {
            line: Vec::new(),
            position: 0,
            prompt,
            finished: false,
        }
    }

    fn read_line(&mut self) {
        if self.prompt {
            eprint!("ready> ");
            let _ = std::io::stderr().flush();
        }
        let mut buffer = String::new();
        match std::io::stdin().read_line(&mut buffer) {
            Ok(0) => self.finished = true,
            Ok(_) => {
                self.line = buffer.chars().collect();
                self.position = 0;
            }
            Err(error) => {
                log::error!("Failed to read standard input: {}", error);
                self.finished = true;
            }
        }
    }
}

impl Iterator for StdinChars {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        while self.position >= self.line.len() {
            if self.finished {
                return None;
            }
            self.read_line();
        }
        let c = self.line[self.position];
        self.position += 1;
        Some(c)
    }
}
