use super::{attributes::TimestampMode, Record};

pub const DEFAULT_FORMAT: &str = "[%T] [%F:%C %P] [%L] :: %S";

/// Renders records against a `%`-token template.
///
/// | token | output                                   |
/// |-------|------------------------------------------|
/// | `%T`  | timestamp, per [`TimestampMode`]         |
/// | `%F`  | source file                              |
/// | `%C`  | line number, or `??` when it is zero     |
/// | `%P`  | function                                 |
/// | `%L`  | severity name                            |
/// | `%S`  | message body                             |
/// | `%%`  | a literal `%`                            |
///
/// Any other token is dropped. A `%` at the very end of the template
/// renders as `%` followed by a newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFormatter {
    template: String,
    timestamp_mode: TimestampMode,
}

impl TemplateFormatter {
    pub fn new(template: impl Into<String>, timestamp_mode: TimestampMode) -> Self {
        Self {
            template: template.into(),
            timestamp_mode,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = template.into();
    }

    pub fn timestamp_mode(&self) -> TimestampMode {
        self.timestamp_mode
    }

    pub fn set_timestamp_mode(&mut self, mode: TimestampMode) {
        self.timestamp_mode = mode;
    }

    pub fn format(&self, record: &Record) -> String {
        let mut out = String::with_capacity(self.template.len() + record.body.len());
        self.format_into(&mut out, record);
        out
    }

    /// Appends the rendered record to `out`.
    pub fn format_into(&self, out: &mut String, record: &Record) {
        let mut chars = self.template.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }

            match chars.next() {
                None => out.push_str("%\n"),
                Some('%') => out.push('%'),
                Some('T') => out.push_str(&self.timestamp_mode.render()),
                Some('F') => out.push_str(record.file),
                Some('C') if record.line != 0 => out.push_str(&record.line.to_string()),
                Some('C') => out.push_str("??"),
                Some('P') => out.push_str(record.function),
                Some('L') => out.push_str(record.severity.name()),
                Some('S') => out.push_str(record.body),
                Some(_) => {}
            }
        }
    }
}

impl Default for TemplateFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT, TimestampMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::attributes::Severity;

    fn record(line: u32) -> Record<'static> {
        Record {
            severity: Severity::Info,
            file: "a.c",
            function: "f",
            line,
            body: "hi",
        }
    }

    fn render(template: &str, line: u32) -> String {
        TemplateFormatter::new(template, TimestampMode::None).format(&record(line))
    }

    #[test]
    fn default_template_without_timestamp() {
        assert_eq!(render(DEFAULT_FORMAT, 10), "[] [a.c:10 f] [INFO] :: hi");
    }

    #[test]
    fn zero_line_renders_question_marks() {
        assert_eq!(render(DEFAULT_FORMAT, 0), "[] [a.c:?? f] [INFO] :: hi");
        assert_eq!(render("%C", 0), "??");
    }

    #[test]
    fn double_percent_is_literal() {
        assert_eq!(render("100%% %S", 1), "100% hi");
    }

    #[test]
    fn unknown_tokens_are_dropped() {
        assert_eq!(render("<%x%Q%S>", 1), "<hi>");
    }

    #[test]
    fn trailing_percent_adds_line_break() {
        assert_eq!(render("%S %", 1), "hi %\n");
    }

    #[test]
    fn content_is_not_escaped() {
        let formatter = TemplateFormatter::new("%S|%F", TimestampMode::None);
        let record = Record {
            body: "50% %S\nnext",
            file: "%P",
            ..record(1)
        };
        assert_eq!(formatter.format(&record), "50% %S\nnext|%P");
    }

    #[test]
    fn format_into_appends() {
        let mut out = String::from(">");
        TemplateFormatter::new("%L", TimestampMode::None).format_into(&mut out, &record(1));
        assert_eq!(out, ">INFO");
    }

    #[test]
    fn timestamp_token_uses_mode() {
        let formatter = TemplateFormatter::new("%T", TimestampMode::DateTime);
        assert_eq!(formatter.format(&record(1)).len(), 24);
    }
}
