//! Terminal output for the cookbook CLI.
//!
//! Every status line is a marker followed by a message. With colors on, the
//! marker is a glyph; with `--no-color` it is a bracketed tag so the output
//! stays greppable in scripts and CI logs.

use owo_colors::OwoColorize;

/// Kind of status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Ok,
    Info,
    Warn,
    Error,
    Created,
    Skipped,
}

impl Mark {
    fn tag(self) -> &'static str {
        match self {
            Mark::Ok => "[OK]",
            Mark::Info => "[INFO]",
            Mark::Warn => "[WARN]",
            Mark::Error => "[ERROR]",
            Mark::Created => "[CREATED]",
            Mark::Skipped => "[SKIPPED]",
        }
    }

    fn glyph(self) -> String {
        match self {
            Mark::Ok | Mark::Created => "✓".green().bold().to_string(),
            Mark::Info => "•".blue().to_string(),
            Mark::Warn => "⚠".yellow().bold().to_string(),
            Mark::Error => "✗".red().bold().to_string(),
            Mark::Skipped => "○".yellow().to_string(),
        }
    }
}

/// CLI printer; `colored` selects glyphs and ANSI styling over plain tags.
pub struct Output {
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// The line for `mark` and an already-styled `message`, without a newline.
    pub fn render(&self, mark: Mark, message: &str) -> String {
        if self.colored {
            format!("  {} {}", mark.glyph(), message)
        } else {
            format!("  {} {}", mark.tag(), message)
        }
    }

    fn paint(&self, message: &str, style: fn(&str) -> String) -> String {
        if self.colored {
            style(message)
        } else {
            message.to_string()
        }
    }

    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let name = self.paint("Cookbook", |s| s.bright_yellow().bold().to_string());
        let version = self.paint(&version, |s| s.dimmed().to_string());
        println!("\n   {} {}\n", name, version);
    }

    pub fn success(&self, message: &str) {
        let message = self.paint(message, |s| s.green().to_string());
        println!("{}", self.render(Mark::Ok, &message));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.render(Mark::Info, message));
    }

    pub fn warning(&self, message: &str) {
        let message = self.paint(message, |s| s.yellow().to_string());
        println!("{}", self.render(Mark::Warn, &message));
    }

    /// Errors go to stderr.
    pub fn error(&self, message: &str) {
        let message = self.paint(message, |s| s.red().to_string());
        eprintln!("{}", self.render(Mark::Error, &message));
    }

    pub fn created(&self, kind: &str, path: &str) {
        let kind = self.paint(kind, |s| s.dimmed().to_string());
        let path = self.paint(path, |s| s.bright_white().to_string());
        println!("{}", self.render(Mark::Created, &format!("{} {}", kind, path)));
    }

    pub fn skipped(&self, path: &str, reason: &str) {
        let path = self.paint(path, |s| s.dimmed().to_string());
        let reason = self.paint(&format!("({})", reason), |s| s.yellow().to_string());
        println!("{}", self.render(Mark::Skipped, &format!("{} {}", path, reason)));
    }

    pub fn created_dir(&self, path: &str) {
        self.created("directory", path);
    }

    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        let key = self.paint(key, |s| s.dimmed().to_string());
        let value = self.paint(value, |s| s.bright_white().to_string());
        println!("    {}: {}", key, value);
    }

    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "tip:".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// A shell command the user is expected to run next.
    pub fn command(&self, cmd: &str) {
        let line = format!("$ {}", cmd);
        println!("     {}", self.paint(&line, |s| s.bright_cyan().to_string()));
    }

    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {}", message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    pub fn newline(&self) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_modes() {
        assert!(Output::new().colored);
        assert!(Output::default().colored);
        assert!(!Output::no_color().colored);
    }

    #[test]
    fn test_plain_render_uses_tags() {
        let output = Output::no_color();
        assert_eq!(output.render(Mark::Ok, "done"), "  [OK] done");
        assert_eq!(output.render(Mark::Skipped, "x"), "  [SKIPPED] x");
    }

    #[test]
    fn test_colored_render_has_no_tags() {
        let line = Output::new().render(Mark::Error, "boom");
        assert!(line.contains("boom"));
        assert!(!line.contains("[ERROR]"));
    }

    #[test]
    fn test_output_methods_no_panic() {
        for output in [Output::no_color(), Output::new()] {
            output.banner();
            output.success("saved");
            output.info("note");
            output.warning("careful");
            output.error("failed");
            output.created("config", "cookbook.toml");
            output.skipped("data", "already exists");
            output.created_dir("data");
            output.header("Server");
            output.subheader("Creating directories");
            output.kv("address", "127.0.0.1:3000");
            output.hint("use --force");
            output.command("cookbook-server");
            output.complete("done");
            output.newline();
        }
    }
}
