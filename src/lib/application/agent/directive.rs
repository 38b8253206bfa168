//! The one-line command grammar the model must answer in:
//!
//! ```text
//! FUNCTION_CALL: tool_name|arg1|arg2|...
//! FINAL_ANSWER: message
//! ```
//!
//! Only the first line carrying either prefix counts; everything else the
//! model wrote is discarded.

pub const FUNCTION_CALL_PREFIX: &str = "FUNCTION_CALL:";
pub const FINAL_ANSWER_PREFIX: &str = "FINAL_ANSWER:";
pub const ARGUMENT_DELIMITER: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    ToolInvocation {
        tool_name: String,
        raw_args: Vec<String>,
    },
    FinalAnswer {
        message: String,
    },
    Malformed,
}

pub fn parse_command(response: &str) -> CommandLine {
    for line in response.lines() {
        let line = line.trim();
        if let Some(body) = line.strip_prefix(FUNCTION_CALL_PREFIX) {
            return parse_invocation(body);
        }
        if let Some(message) = line.strip_prefix(FINAL_ANSWER_PREFIX) {
            return CommandLine::FinalAnswer {
                message: message.trim().to_string(),
            };
        }
    }
    CommandLine::Malformed
}

fn parse_invocation(body: &str) -> CommandLine {
    let mut segments = split_arguments(body).into_iter();
    match segments.next() {
        Some(tool_name) if !tool_name.is_empty() => CommandLine::ToolInvocation {
            tool_name,
            raw_args: segments.collect(),
        },
        _ => CommandLine::Malformed,
    }
}

/// Splits on `|`, keeping a segment that opens with `[` or `{` intact up to
/// its balancing bracket so JSON arguments may contain the delimiter.
fn split_arguments(body: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut rest = body;
    loop {
        let candidate = rest.trim_start();
        if let Some(close) = bracketed_len(candidate) {
            let tail = &candidate[close..];
            match tail.find(ARGUMENT_DELIMITER) {
                Some(offset) => {
                    segments.push(candidate[..close + offset].trim().to_string());
                    rest = &tail[offset + 1..];
                    continue;
                }
                None => {
                    segments.push(candidate.trim().to_string());
                    break;
                }
            }
        }

        match rest.find(ARGUMENT_DELIMITER) {
            Some(offset) => {
                segments.push(rest[..offset].trim().to_string());
                rest = &rest[offset + 1..];
            }
            None => {
                segments.push(rest.trim().to_string());
                break;
            }
        }
    }
    segments
}

/// Byte length of the balanced bracket group at the start of `text`, if any.
fn bracketed_len(text: &str) -> Option<usize> {
    if !text.starts_with(['[', '{']) {
        return None;
    }
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut previous = ' ';
    for (offset, ch) in text.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
                previous = ch;
            }
            continue;
        }
        if !ch.is_whitespace() {
            let after = previous;
            previous = ch;
            // A quote only opens a string where a value starts; `Bob's` is prose.
            if matches!(ch, '"' | '\'') && matches!(after, '[' | '{' | '(' | ',' | ':') {
                quote = Some(ch);
                continue;
            }
        }
        match ch {
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(tool: &str, args: &[&str]) -> CommandLine {
        CommandLine::ToolInvocation {
            tool_name: tool.to_string(),
            raw_args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    #[test]
    fn parses_function_call_with_trimmed_segments() {
        assert_eq!(
            parse_command("FUNCTION_CALL: create_keynote_with_text| Hello World |540|430"),
            invocation("create_keynote_with_text", &["Hello World", "540", "430"])
        );
    }

    #[test]
    fn first_recognised_line_wins() {
        let response = "Sure, here you go.\n  FUNCTION_CALL: save|now\nFINAL_ANSWER: [done]";
        assert_eq!(parse_command(response), invocation("save", &["now"]));

        let response = "FINAL_ANSWER: [done]\nFUNCTION_CALL: save|now";
        assert_eq!(
            parse_command(response),
            CommandLine::FinalAnswer {
                message: "[done]".into()
            }
        );
    }

    #[test]
    fn final_answer_keeps_delimiters_verbatim() {
        assert_eq!(
            parse_command("FINAL_ANSWER: saved | closed"),
            CommandLine::FinalAnswer {
                message: "saved | closed".into()
            }
        );
    }

    #[test]
    fn unrecognised_output_is_malformed() {
        assert_eq!(parse_command("I created the presentation."), CommandLine::Malformed);
        assert_eq!(parse_command(""), CommandLine::Malformed);
        assert_eq!(parse_command("FUNCTION_CALL:   |a"), CommandLine::Malformed);
        assert_eq!(parse_command("function_call: save"), CommandLine::Malformed);
    }

    #[test]
    fn tool_without_arguments() {
        assert_eq!(parse_command("FUNCTION_CALL: save"), invocation("save", &[]));
    }

    #[test]
    fn bracketed_argument_may_contain_delimiter() {
        assert_eq!(
            parse_command(r#"FUNCTION_CALL: add_slides|["a|b", "c"]|3"#),
            invocation("add_slides", &[r#"["a|b", "c"]"#, "3"])
        );
        assert_eq!(
            parse_command(r#"FUNCTION_CALL: add_slides|{"title": "x|y"}"#),
            invocation("add_slides", &[r#"{"title": "x|y"}"#])
        );
    }

    #[test]
    fn unbalanced_bracket_falls_back_to_plain_split() {
        assert_eq!(
            parse_command("FUNCTION_CALL: note|[draft|2"),
            invocation("note", &["[draft", "2"])
        );
    }

    #[test]
    fn apostrophes_in_bracketed_prose_do_not_open_strings() {
        assert_eq!(
            parse_command("FUNCTION_CALL: add|[Bob's slide]|[Ann's]|3"),
            invocation("add", &["[Bob's slide]", "[Ann's]", "3"])
        );
        assert_eq!(
            parse_command("FUNCTION_CALL: add|['a]b', \"Ann's\"]|3"),
            invocation("add", &["['a]b', \"Ann's\"]", "3"])
        );
    }

    #[test]
    fn text_after_closing_bracket_stays_in_segment() {
        assert_eq!(
            parse_command("FUNCTION_CALL: note|[1] extra|2"),
            invocation("note", &["[1] extra", "2"])
        );
    }
}
