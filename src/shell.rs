//! Optional terminal pane attached to a renderer.
//!
//! The windowing layer feeds typed text into a [`CommandLine`]; each submitted
//! line becomes a [`ShellEvent`] that is handed to the scene's
//! [`ShellListener`]. The renderer only keeps a weak reference to the shell.

use log::info;

use crate::renderer::Renderer;

pub trait Shell {
  /// Writes one line of output to the shell.
  fn print(&mut self, line: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShellEvent {
  pub command: String,
  pub args: Vec<String>,
}
impl ShellEvent {
  /// Splits a command line on whitespace, `None` for a blank line.
  pub fn parse(line: &str) -> Option<Self> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_owned();
    Some(Self { command, args: parts.map(str::to_owned).collect() })
  }
  pub fn arg(&self, n: usize) -> Option<&str> {
    self.args.get(n).map(String::as_str)
  }
}

/// Receives each command line submitted to the shell.
#[allow(unused_variables)]
pub trait ShellListener {
  fn command_complete(&mut self, renderer: &mut Renderer, event: &ShellEvent) {}
}

/// Line-editing shell that echoes its output to the log.
#[derive(Debug, Default)]
pub struct CommandLine {
  buffer: String,
  output: Vec<String>,
}
impl CommandLine {
  pub fn new() -> Self {
    Self::default()
  }
  pub fn pending(&self) -> &str {
    &self.buffer
  }
  pub fn output(&self) -> &[String] {
    &self.output
  }
  /// Feeds typed text. Returns the event for a submitted line.
  pub fn push_str(&mut self, text: &str) -> Option<ShellEvent> {
    let mut submitted = None;
    for c in text.chars() {
      match c {
        '\r' | '\n' => {
          let line = std::mem::take(&mut self.buffer);
          if let Some(event) = ShellEvent::parse(&line) {
            info!("> {line}");
            submitted = Some(event);
          }
        }
        // backspace / delete
        '\u{8}' | '\u{7f}' => {
          self.buffer.pop();
        }
        c if c.is_control() => (),
        c => self.buffer.push(c),
      }
    }
    submitted
  }
}
impl Shell for CommandLine {
  fn print(&mut self, line: &str) {
    info!("{line}");
    self.output.push(line.to_owned());
  }
}
