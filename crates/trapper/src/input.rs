use std::io::BufRead;

use trapper_sender::Sample;

use crate::exit::{CliError, CliResult};

/// Parse an input file with one sample per line.
///
/// Line format is `<host> <key> <value>`, or `<host> <key> <clock> <value>`
/// when `with_timestamps` is set. Fields may be double-quoted; `\"` and `\\`
/// are unescaped inside quotes. A host of `-` means `default_host`. Blank
/// lines and `#` comments are skipped.
pub fn parse_samples<R: BufRead>(
    input: R,
    default_host: Option<&str>,
    with_timestamps: bool,
) -> CliResult<Vec<Sample>> {
    let expected = if with_timestamps { 4 } else { 3 };
    let mut samples = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|err| CliError::usage(format!("input line {line_no}: {err}")))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields = split_fields(trimmed)
            .map_err(|msg| CliError::usage(format!("input line {line_no}: {msg}")))?;
        if fields.len() != expected {
            return Err(CliError::usage(format!(
                "input line {line_no}: expected {expected} fields, found {}",
                fields.len()
            )));
        }

        let mut fields = fields.into_iter();
        let mut host = fields.next().unwrap_or_default();
        if host == "-" {
            host = default_host
                .ok_or_else(|| {
                    CliError::usage(format!("input line {line_no}: host '-' requires --host"))
                })?
                .to_string();
        }
        let key = fields.next().unwrap_or_default();

        let mut builder_clock = None;
        if with_timestamps {
            let raw = fields.next().unwrap_or_default();
            let clock: i64 = raw.parse().map_err(|_| {
                CliError::usage(format!("input line {line_no}: invalid timestamp '{raw}'"))
            })?;
            builder_clock = Some(clock);
        }
        let value = fields.next().unwrap_or_default();

        let mut builder = Sample::builder(host, key, value);
        if let Some(clock) = builder_clock {
            builder = builder.clock(clock);
        }
        let sample = builder
            .build()
            .map_err(|err| CliError::usage(format!("input line {line_no}: {err}")))?;
        samples.push(sample);
    }

    Ok(samples)
}

fn split_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        let mut field = String::new();
        if first == '"' {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some(escaped @ ('"' | '\\')) => field.push(escaped),
                        Some(other) => {
                            field.push('\\');
                            field.push(other);
                        }
                        None => field.push('\\'),
                    },
                    other => field.push(other),
                }
            }
            if !closed {
                return Err("unterminated quoted field".to_string());
            }
            if chars.peek().is_some_and(|c| !c.is_whitespace()) {
                return Err("missing separator after quoted field".to_string());
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                field.push(c);
            }
        }
        fields.push(field);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::exit::USAGE;

    fn parse(text: &str, default_host: Option<&str>, with_timestamps: bool) -> CliResult<Vec<Sample>> {
        parse_samples(Cursor::new(text), default_host, with_timestamps)
    }

    #[test]
    fn parses_plain_lines() {
        let samples = parse("web01 cpu.load 0.5\nweb02 mem.free 1024\n", None, false).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], Sample::new("web01", "cpu.load", "0.5").unwrap());
        assert_eq!(samples[1].host(), "web02");
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let samples = parse("\n# header\n  \nweb01 k v\n", None, false).unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn quoted_value_with_spaces_and_escapes() {
        let samples = parse(r#"web01 "log[app]" "said \"hi\" \\ bye""#, None, false).unwrap();

        assert_eq!(samples[0].key(), "log[app]");
        assert_eq!(samples[0].value(), r#"said "hi" \ bye"#);
    }

    #[test]
    fn dash_host_uses_default() {
        let samples = parse("- k v", Some("fallback"), false).unwrap();
        assert_eq!(samples[0].host(), "fallback");

        let err = parse("- k v", None, false).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn timestamps_column() {
        let samples = parse("web01 k 1700000000 \"v 1\"", None, true).unwrap();
        assert_eq!(samples[0].clock(), Some(1_700_000_000));
        assert_eq!(samples[0].value(), "v 1");

        let err = parse("web01 k soon v", None, true).unwrap_err();
        assert!(err.message.contains("line 1"));
    }

    #[test]
    fn wrong_field_count_names_line() {
        let err = parse("web01 k v\nweb01 k\n", None, false).unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.contains("line 2"), "{}", err.message);
    }

    #[test]
    fn unterminated_quote_rejected() {
        let err = parse("web01 k \"open", None, false).unwrap_err();
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn empty_quoted_value_allowed() {
        let samples = parse("web01 k \"\"", None, false).unwrap();
        assert_eq!(samples[0].value(), "");
    }
}
