use nu_ansi_term::{Color, Style};
use reedline::{StyledText, ValidationResult, Validator};
use stepwise::TokenKind;
use stepwise_core::lexer::{LexErrorKind, tokenize};

fn token_color(kind: TokenKind) -> Color {
    match kind {
        TokenKind::Keyword => Color::Magenta,
        TokenKind::Number => Color::Cyan,
        TokenKind::String => Color::Green,
        TokenKind::Identifier => Color::Red,
        TokenKind::Operator | TokenKind::Punctuation => Color::White,
    }
}

/// Colors REPL input by token kind. Text between tokens (whitespace,
/// comments, unrecognized characters) is dimmed.
pub struct Highlighter;

impl reedline::Highlighter for Highlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut output = StyledText::new();
        let gap = Style::new().fg(Color::DarkGray);
        let (tokens, _) = tokenize(line);

        let mut position = 0;
        for token in &tokens {
            let (start, end) = (token.span.0.start, token.span.0.end);
            if start > position {
                output.push((gap, line[position..start].to_string()));
            }
            let style = Style::new().fg(token_color(token.kind));
            output.push((style, line[start..end].to_string()));
            position = end;
        }
        if position < line.len() {
            output.push((gap, line[position..].to_string()));
        }

        output
    }
}

/// Nesting depth of parentheses and braces, or `None` while a string or
/// block comment is still open.
pub fn calculate_depth(buffer: &str) -> Option<usize> {
    let (tokens, errors) = tokenize(buffer);
    let unterminated = errors.iter().any(|e| {
        matches!(
            e.kind,
            LexErrorKind::UnterminatedString { .. } | LexErrorKind::UnclosedComment { .. }
        )
    });
    if unterminated {
        return None;
    }

    let mut depth: isize = 0;
    for token in tokens.iter().filter(|t| t.kind == TokenKind::Punctuation) {
        match token.value {
            "(" | "{" => depth += 1,
            ")" | "}" => depth -= 1,
            _ => {}
        }
    }
    Some(depth.max(0) as usize)
}

/// Keeps the REPL reading lines while a group, string or comment is open.
pub struct InputValidator;

impl Validator for InputValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        match calculate_depth(line) {
            Some(0) => ValidationResult::Complete,
            _ => ValidationResult::Incomplete,
        }
    }
}
