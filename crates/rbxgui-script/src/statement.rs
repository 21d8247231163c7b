use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Statement ─────────────────────────────────────────────────────────────

/// The right-hand side of a `.Parent = ...` assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// A bare identifier, looked up in the symbol table.
    Binding(String),
    /// Anything longer (`player.PlayerGui`, `script.Parent`, a method call),
    /// kept as source-like text for logging.
    Path(String),
}

/// One recognized statement of the construction subset.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `[local] binding = Instance.new("Class"[, parent])`
    Construct {
        binding: String,
        class: String,
        parent: Option<Target>,
    },
    /// `binding.Parent = target`
    Parent { binding: String, target: Target },
    /// `binding.Property = value`, with the value left as raw tokens for the
    /// property-specific sub-grammars in [`crate::value`].
    Assign {
        binding: String,
        property: String,
        value: Vec<Token>,
    },
}

/// A statement, or the raw tokens of a fragment that matched nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Recognized(Statement),
    Skipped(Vec<Token>),
}

/// A [`Line`] with the 1-based source line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct LineWithPos {
    pub line: usize,
    pub item: Line,
}

// ── Splitting ─────────────────────────────────────────────────────────────

/// Splits `src` into statements.
///
/// Statements end at a newline or `;`. Blank and comment-only lines produce
/// nothing; fragments that are not part of the construction subset come back
/// as [`Line::Skipped`].
pub fn lines(src: &str) -> Vec<LineWithPos> {
    let tokens = Lexer::new(src).tokenize();
    let mut out = Vec::new();
    let mut chunk: Vec<Token> = Vec::new();
    let mut chunk_line = 1;

    let mut flush = |chunk: &mut Vec<Token>, line: usize| {
        if chunk.is_empty() {
            return;
        }
        let toks = std::mem::take(chunk);
        let item = match parse_statement(&toks) {
            Some(stmt) => Line::Recognized(stmt),
            None => Line::Skipped(toks),
        };
        out.push(LineWithPos { line, item });
    };

    for TokenWithPos { token, line } in tokens {
        match token {
            Token::Newline | Token::Semicolon => flush(&mut chunk, chunk_line),
            tok => {
                if chunk.is_empty() {
                    chunk_line = line;
                }
                chunk.push(tok);
            }
        }
    }
    flush(&mut chunk, chunk_line);
    out
}

/// Recognized statements only, with their line numbers.
pub fn statements(src: &str) -> impl Iterator<Item = (usize, Statement)> {
    lines(src).into_iter().filter_map(|l| match l.item {
        Line::Recognized(stmt) => Some((l.line, stmt)),
        Line::Skipped(_) => None,
    })
}

// ── Statement grammar ─────────────────────────────────────────────────────

fn parse_statement(toks: &[Token]) -> Option<Statement> {
    match toks {
        [Token::Local, rest @ ..] => parse_construct(rest),
        [Token::Ident(binding), Token::Dot, Token::Ident(property), Token::Eq, value @ ..]
            if !value.is_empty() =>
        {
            if property == "Parent" {
                let target = parse_target(value)?;
                Some(Statement::Parent { binding: binding.clone(), target })
            } else {
                Some(Statement::Assign {
                    binding: binding.clone(),
                    property: property.clone(),
                    value: value.to_vec(),
                })
            }
        }
        _ => parse_construct(toks),
    }
}

/// `binding = Instance.new("Class"[, parent])`, after any `local`.
fn parse_construct(toks: &[Token]) -> Option<Statement> {
    let [
        Token::Ident(binding),
        Token::Eq,
        Token::Ident(instance),
        Token::Dot,
        Token::Ident(new),
        Token::LParen,
        Token::Str(class),
        rest @ ..,
    ] = toks
    else {
        return None;
    };
    if instance != "Instance" || new != "new" {
        return None;
    }
    let parent = match rest {
        [Token::RParen] => None,
        [Token::Comma, inner @ .., Token::RParen] => Some(parse_target(inner)?),
        _ => return None,
    };
    Some(Statement::Construct { binding: binding.clone(), class: class.clone(), parent })
}

/// A parent expression: a bare identifier, or a dotted/method path rooted at
/// one. `nil` and anything that does not start with an identifier is
/// rejected.
fn parse_target(toks: &[Token]) -> Option<Target> {
    match toks {
        [Token::Ident(name)] if name == "nil" => None,
        [Token::Ident(name)] => Some(Target::Binding(name.clone())),
        [Token::Ident(_), rest @ ..] => {
            let balanced = rest.iter().try_fold(0i32, |depth, t| {
                let depth = match t {
                    Token::LParen => depth + 1,
                    Token::RParen => depth - 1,
                    _ => depth,
                };
                (depth >= 0).then_some(depth)
            });
            let path_tokens_only = rest.iter().all(|t| {
                matches!(
                    t,
                    Token::Ident(_) | Token::Dot | Token::Colon | Token::LParen
                        | Token::RParen | Token::Str(_) | Token::Comma | Token::Number(_)
                )
            });
            if balanced == Some(0) && path_tokens_only {
                Some(Target::Path(render(toks)))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Renders tokens back to compact source text.
pub fn render(toks: &[Token]) -> String {
    let mut out = String::new();
    for t in toks {
        match t {
            Token::Ident(s)  => out.push_str(s),
            Token::Str(s)    => { out.push('"'); out.push_str(s); out.push('"'); }
            Token::Number(n) => out.push_str(&n.to_string()),
            Token::Dot       => out.push('.'),
            Token::Colon     => out.push(':'),
            Token::Comma     => out.push_str(", "),
            Token::LParen    => out.push('('),
            Token::RParen    => out.push(')'),
            Token::Eq        => out.push_str(" = "),
            Token::Semicolon => out.push(';'),
            Token::Local     => out.push_str("local "),
            Token::Other(c)  => out.push(*c),
            Token::Newline   => out.push('\n'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(src: &str) -> Option<Statement> {
        match lines(src).into_iter().next()?.item {
            Line::Recognized(s) => Some(s),
            Line::Skipped(_) => None,
        }
    }

    #[test]
    fn construct_with_and_without_local() {
        let expected = Statement::Construct {
            binding: "f".into(),
            class: "Frame".into(),
            parent: None,
        };
        assert_eq!(one(r#"local f = Instance.new("Frame")"#), Some(expected.clone()));
        assert_eq!(one(r#"f = Instance.new('Frame');"#), Some(expected));
    }

    #[test]
    fn construct_with_parent_argument() {
        assert_eq!(
            one(r#"local b = Instance.new("TextButton", frame)"#),
            Some(Statement::Construct {
                binding: "b".into(),
                class: "TextButton".into(),
                parent: Some(Target::Binding("frame".into())),
            })
        );
    }

    #[test]
    fn parent_to_path() {
        assert_eq!(
            one(r#"gui.Parent = player:WaitForChild("PlayerGui")"#),
            Some(Statement::Parent {
                binding: "gui".into(),
                target: Target::Path(r#"player:WaitForChild("PlayerGui")"#.into()),
            })
        );
    }

    #[test]
    fn parent_nil_is_not_recognized() {
        assert_eq!(one("f.Parent = nil"), None);
    }

    #[test]
    fn assignment_keeps_raw_value() {
        let Some(Statement::Assign { binding, property, value }) = one("f.TextSize = 18") else {
            panic!("expected an assignment");
        };
        assert_eq!(binding, "f");
        assert_eq!(property, "TextSize");
        assert_eq!(value, vec![Token::Number(18.0)]);
    }

    #[test]
    fn blank_and_comment_lines_produce_nothing() {
        assert!(lines("\n   \n-- hi\n--[[ block\n comment ]]\n").is_empty());
    }

    #[test]
    fn semicolons_split_statements() {
        let got: Vec<usize> = statements("a.Text = 'x'; a.TextSize = 3\n\nb.Text = 'y'")
            .map(|(line, _)| line)
            .collect();
        assert_eq!(got, vec![1, 1, 3]);
    }

    #[test]
    fn unrecognized_fragments_are_skipped() {
        let out = lines("print('hi')\nfor i = 1, 10 do\nend");
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|l| matches!(l.item, Line::Skipped(_))));
    }

    #[test]
    fn missing_value_is_skipped() {
        assert_eq!(one("f.Size ="), None);
    }
}
