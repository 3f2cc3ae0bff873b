//! Usage and help rendering for registered arguments.
//!
//! Renders a usage line followed by aligned `Arguments` and `Options`
//! sections. The core resolver only supplies help strings; layout is
//! this engine's job.

use argdecl_core::{ActionKind, Arity};

use crate::parser::{ArgParser, Registered};

impl ArgParser {
    /// Renders the full help text for this parser.
    ///
    /// # Examples
    ///
    /// ```
    /// use argdecl_core::{ActionKind, ParserEngine, RegistrationArgs};
    /// use argdecl_engine::ArgParser;
    ///
    /// let mut parser = ArgParser::new("demo", "A demonstration");
    /// parser
    ///     .add_argument(RegistrationArgs {
    ///         flags: vec!["--verbose".into()],
    ///         help: "Enable verbose output".into(),
    ///         dest: Some("verbose".into()),
    ///         factory: None,
    ///         default: None,
    ///         required: Some(false),
    ///         action: ActionKind::StoreTrue,
    ///         nargs: None,
    ///     })
    ///     .unwrap();
    ///
    /// let help = parser.render_help();
    /// assert!(help.starts_with("Usage: demo"));
    /// assert!(help.contains("--verbose"));
    /// assert!(help.contains("Enable verbose output"));
    /// ```
    pub fn render_help(&self) -> String {
        let mut out = usage_line(self);

        if !self.description().is_empty() {
            out.push('\n');
            out.push_str(self.description());
            out.push('\n');
        }

        let positionals: Vec<&Registered> =
            self.args.iter().filter(|r| r.is_positional()).collect();
        let options: Vec<&Registered> = self.args.iter().filter(|r| !r.is_positional()).collect();

        if !positionals.is_empty() {
            out.push_str("\nArguments:\n");
            out.push_str(&section(&positionals));
        }
        if !options.is_empty() {
            out.push_str("\nOptions:\n");
            out.push_str(&section(&options));
        }
        out
    }
}

fn usage_line(parser: &ArgParser) -> String {
    let mut usage = format!("Usage: {}", parser.prog());
    if parser.args.iter().any(|r| !r.is_positional()) {
        usage.push_str(" [OPTIONS]");
    }
    for reg in parser.args.iter().filter(|r| r.is_positional()) {
        usage.push(' ');
        usage.push_str(&positional_placeholder(reg));
    }
    usage.push('\n');
    usage
}

fn positional_placeholder(reg: &Registered) -> String {
    let dest = reg.dest();
    match reg.args.nargs {
        Some(Arity::Optional) => format!("[{dest}]"),
        Some(Arity::ZeroOrMore) => format!("[{dest}...]"),
        Some(Arity::OneOrMore) => format!("<{dest}>..."),
        _ => format!("<{dest}>"),
    }
}

fn section(entries: &[&Registered]) -> String {
    let labels: Vec<String> = entries.iter().map(|r| label(r)).collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0);

    let mut out = String::new();
    for (reg, label) in entries.iter().zip(&labels) {
        out.push_str(&format!("  {label:width$}  {}\n", reg.args.help));
    }
    out
}

fn label(reg: &Registered) -> String {
    if reg.is_positional() {
        return positional_placeholder(reg);
    }

    let mut label = reg.args.flags.join(", ");
    if matches!(reg.args.action, ActionKind::Store | ActionKind::Append) {
        label.push_str(&format!(" <{}>", reg.dest().to_uppercase()));
    }
    label
}
