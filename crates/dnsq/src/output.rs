//! Rendering decoded responses for the terminal.

use console::style;
use dnsq_proto::Message;

/// How a response is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One answer value per line.
    #[default]
    Short,

    /// dig-style header and every section.
    Verbose,

    /// The whole message as JSON.
    Json,
}

impl OutputFormat {
    /// Picks the format from the command-line flags; JSON wins.
    pub fn from_flags(verbose: bool, json: bool) -> Self {
        match (json, verbose) {
            (true, _) => Self::Json,
            (false, true) => Self::Verbose,
            (false, false) => Self::Short,
        }
    }
}

/// Renders `message` in the requested format.
///
/// `wire_len` is the size of the response as received. Only JSON rendering
/// can fail.
pub fn render(
    message: &Message,
    format: OutputFormat,
    wire_len: usize,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Short => Ok(render_short(message)),
        OutputFormat::Verbose => Ok(render_verbose(message, wire_len)),
        OutputFormat::Json => render_json(message),
    }
}

/// One answer value per line, in answer order.
pub fn render_short(message: &Message) -> String {
    message
        .answers()
        .iter()
        .map(|r| format!("{}\n", r.rdata()))
        .collect()
}

/// The full message in dig's layout, followed by the response size.
pub fn render_verbose(message: &Message, wire_len: usize) -> String {
    format!(
        "{message}\n{} {wire_len}\n",
        style(";; MSG SIZE  rcvd:").dim()
    )
}

/// Pretty-printed JSON.
pub fn render_json(message: &Message) -> serde_json::Result<String> {
    serde_json::to_string_pretty(message).map(|json| json + "\n")
}
