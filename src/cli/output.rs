//! Terminal output for the lexgate-server commands.
//!
//! Lines are rendered to a `String` before printing so the plain form can be
//! asserted on in tests. Failures go to stderr, everything else to stdout.

use owo_colors::OwoColorize;

/// Placeholder for a secret whose env var is not set.
pub const UNSET: &str = "<unset>";

/// Outcome shown at the start of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Warn,
    Fail,
}

impl Tone {
    fn tag(self) -> &'static str {
        match self {
            Tone::Ok => "[OK]",
            Tone::Warn => "[WARN]",
            Tone::Fail => "[ERROR]",
        }
    }
}

/// Show only the first and last four characters of a secret.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn secret_display(value: Option<&str>) -> String {
    value.map(mask_secret).unwrap_or_else(|| UNSET.to_string())
}

/// Printer for the `serve`, `keygen` and `config` commands.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    colored: bool,
}

impl Output {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn render_status(&self, tone: Tone, message: &str) -> String {
        if !self.colored {
            return format!("  {} {}", tone.tag(), message);
        }
        match tone {
            Tone::Ok => format!("  {} {}", "✓".green().bold(), message.green()),
            Tone::Warn => format!("  {} {}", "⚠".yellow().bold(), message.yellow()),
            Tone::Fail => format!("  {} {}", "✗".red().bold(), message.red()),
        }
    }

    pub fn status(&self, tone: Tone, message: &str) {
        let line = self.render_status(tone, message);
        if tone == Tone::Fail {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    pub fn render_section(&self, title: &str) -> String {
        if self.colored {
            format!("\n  {}", title.bright_white().bold().underline())
        } else {
            format!("\n  === {} ===", title)
        }
    }

    /// Section heading followed by its `key: value` rows.
    pub fn section(&self, title: &str) {
        println!("{}", self.render_section(title));
    }

    pub fn render_field(&self, key: &str, value: &str) -> String {
        if self.colored {
            format!("    {}: {}", key.dimmed(), value.bright_white())
        } else {
            format!("    {}: {}", key, value)
        }
    }

    pub fn field(&self, key: &str, value: &str) {
        println!("{}", self.render_field(key, value));
    }

    /// Row for an env-backed secret, masked when set.
    pub fn secret_field(&self, key: &str, value: Option<&str>) {
        self.field(key, &secret_display(value));
    }

    /// A tip, optionally followed by the command that acts on it.
    pub fn render_suggestion(&self, hint: &str, command: Option<&str>) -> String {
        let mut text = if self.colored {
            format!("\n  {} {}", "›".dimmed(), hint.dimmed().italic())
        } else {
            format!("\n  [TIP] {}", hint)
        };
        if let Some(cmd) = command {
            let cmd = format!("$ {}", cmd);
            if self.colored {
                text.push_str(&format!("\n     {}", cmd.bright_cyan()));
            } else {
                text.push_str(&format!("\n     {}", cmd));
            }
        }
        text
    }

    pub fn suggest(&self, hint: &str, command: Option<&str>) {
        println!("{}", self.render_suggestion(hint, command));
    }

    /// Startup banner with the address the server accepts connections on.
    pub fn render_banner(&self, bind_address: &str) -> String {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let url = format!("http://{}", bind_address);
        if self.colored {
            format!(
                "\n   {} {}\n   {} {}\n",
                "lexgate".bright_cyan().bold(),
                version.dimmed(),
                "listening on".bright_white(),
                url.green()
            )
        } else {
            format!("\n   lexgate {}\n   listening on {}\n", version, url)
        }
    }

    pub fn banner(&self, bind_address: &str) {
        println!("{}", self.render_banner(bind_address));
    }

    pub fn blank(&self) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("short"), "*****");
        assert_eq!(mask_secret("12345678"), "********");
        assert_eq!(mask_secret("0123456789abcdef"), "0123...cdef");
    }

    #[test]
    fn test_secret_display_unset() {
        assert_eq!(secret_display(None), "<unset>");
        assert_eq!(secret_display(Some("0123456789abcdef")), "0123...cdef");
    }

    #[test]
    fn test_plain_status_tags() {
        let out = Output::new(false);
        assert!(!out.is_colored());
        assert_eq!(out.render_status(Tone::Ok, "valid"), "  [OK] valid");
        assert_eq!(out.render_status(Tone::Warn, "http"), "  [WARN] http");
        assert_eq!(out.render_status(Tone::Fail, "missing"), "  [ERROR] missing");
    }

    #[test]
    fn test_plain_section_and_field() {
        let out = Output::new(false);
        assert_eq!(out.render_section("Auth"), "\n  === Auth ===");
        assert_eq!(
            out.render_field("bind", "127.0.0.1:3000"),
            "    bind: 127.0.0.1:3000"
        );
    }

    #[test]
    fn test_plain_suggestion() {
        let out = Output::new(false);
        assert_eq!(
            out.render_suggestion("Generate keys", Some("lexgate-server keygen --env")),
            "\n  [TIP] Generate keys\n     $ lexgate-server keygen --env"
        );
        assert_eq!(out.render_suggestion("Fix it", None), "\n  [TIP] Fix it");
    }

    #[test]
    fn test_plain_banner_names_address() {
        let banner = Output::new(false).render_banner("0.0.0.0:8080");
        assert!(banner.contains(env!("CARGO_PKG_VERSION")));
        assert!(banner.contains("listening on http://0.0.0.0:8080"));
    }

    #[test]
    fn test_colored_keeps_text_and_adds_escapes() {
        let out = Output::new(true);
        let line = out.render_status(Tone::Fail, "config not found");
        assert!(line.contains("config not found"));
        assert!(line.contains('\u{1b}'));
        assert!(!line.contains("[ERROR]"));

        let row = out.render_field("port", "3000");
        assert!(row.contains("port") && row.contains("3000"));
    }
}
