//! Format detection and per-format Markdown rendering.
//!
//! Detection order: declared content type, then file extension, then magic
//! bytes. Rendering is synchronous; callers run it on the blocking pool.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ConversionOutput, ConverterError};

static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").expect("valid title regex"));

static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("valid script regex")
});

/// Formats the engine knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Pdf,
    Markdown,
    PlainText,
    Json,
    Csv,
    Tsv,
}

impl Format {
    /// Map a file extension (without the dot, any case).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" | "xhtml" => Some(Format::Html),
            "pdf" => Some(Format::Pdf),
            "md" | "markdown" => Some(Format::Markdown),
            "txt" | "text" | "log" => Some(Format::PlainText),
            "json" => Some(Format::Json),
            "csv" => Some(Format::Csv),
            "tsv" | "tab" => Some(Format::Tsv),
            _ => None,
        }
    }

    /// Map a `Content-Type` header value; parameters are ignored.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "text/html" | "application/xhtml+xml" => Some(Format::Html),
            "application/pdf" => Some(Format::Pdf),
            "text/markdown" | "text/x-markdown" => Some(Format::Markdown),
            "text/plain" => Some(Format::PlainText),
            "application/json" => Some(Format::Json),
            "text/csv" => Some(Format::Csv),
            "text/tab-separated-values" => Some(Format::Tsv),
            other if other.ends_with("+json") => Some(Format::Json),
            _ => None,
        }
    }

    /// Guess from the leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF") {
            return Some(Format::Pdf);
        }

        let text = std::str::from_utf8(bytes).ok()?;
        let head: String = strip_bom(text)
            .trim_start()
            .chars()
            .take(64)
            .collect::<String>()
            .to_ascii_lowercase();

        if head.starts_with("<!doctype html") || head.starts_with("<html") {
            Some(Format::Html)
        } else {
            Some(Format::PlainText)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Format::Html => "HTML",
            Format::Pdf => "PDF",
            Format::Markdown => "Markdown",
            Format::PlainText => "text",
            Format::Json => "JSON",
            Format::Csv => "CSV",
            Format::Tsv => "TSV",
        }
    }
}

/// Pick a format from whatever hints are available.
pub fn detect(content_type: Option<&str>, extension: Option<&str>, bytes: &[u8]) -> Option<Format> {
    content_type
        .and_then(Format::from_mime)
        .or_else(|| extension.and_then(Format::from_extension))
        .or_else(|| Format::sniff(bytes))
}

/// Render `bytes` of the given format to Markdown.
pub fn render(format: Format, bytes: &[u8]) -> Result<ConversionOutput, ConverterError> {
    match format {
        Format::Pdf => render_pdf(bytes),
        Format::Html => Ok(render_html(&String::from_utf8_lossy(bytes))),
        Format::Markdown | Format::PlainText => {
            let text = utf8(format, bytes)?;
            Ok(ConversionOutput::new(strip_bom(text).trim_end()))
        }
        Format::Json => render_json(utf8(format, bytes)?),
        Format::Csv => Ok(ConversionOutput::new(delimited_to_markdown(
            strip_bom(utf8(format, bytes)?),
            ',',
        ))),
        Format::Tsv => Ok(ConversionOutput::new(delimited_to_markdown(
            strip_bom(utf8(format, bytes)?),
            '\t',
        ))),
    }
}

fn render_pdf(bytes: &[u8]) -> Result<ConversionOutput, ConverterError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ConverterError::Pdf(e.to_string()))?;
    Ok(ConversionOutput::new(text.trim()))
}

fn render_html(html: &str) -> ConversionOutput {
    let title = TITLE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty());

    let cleaned = SCRIPT_OR_STYLE.replace_all(html, "");
    let markdown = html2md::parse_html(&cleaned);

    ConversionOutput {
        title,
        text_content: markdown.trim().to_string(),
    }
}

fn render_json(text: &str) -> Result<ConversionOutput, ConverterError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| ConverterError::Parse {
        format: Format::Json.label(),
        message: e.to_string(),
    })?;
    let pretty = serde_json::to_string_pretty(&value).map_err(|e| ConverterError::Parse {
        format: Format::Json.label(),
        message: e.to_string(),
    })?;
    Ok(ConversionOutput::new(format!("```json\n{pretty}\n```")))
}

fn utf8(format: Format, bytes: &[u8]) -> Result<&str, ConverterError> {
    std::str::from_utf8(bytes).map_err(|e| ConverterError::Parse {
        format: format.label(),
        message: format!("not valid UTF-8 ({e})"),
    })
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Render delimiter-separated rows as a Markdown table; the first row is the header.
fn delimited_to_markdown(text: &str, delimiter: char) -> String {
    let rows: Vec<Vec<String>> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| split_record(line, delimiter))
        .collect();

    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };
    let width = rows.iter().map(Vec::len).max().unwrap_or_default();

    let mut out = String::new();
    push_row(&mut out, header, width);
    out.push('|');
    for _ in 0..width {
        out.push_str(" --- |");
    }
    out.push('\n');
    for row in body {
        push_row(&mut out, row, width);
    }

    out.trim_end().to_string()
}

fn push_row(out: &mut String, cells: &[String], width: usize) {
    out.push('|');
    for i in 0..width {
        let cell = cells.get(i).map(String::as_str).unwrap_or_default();
        out.push(' ');
        out.push_str(&cell.trim().replace('|', "\\|"));
        out.push_str(" |");
    }
    out.push('\n');
}

fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}
