//! Property-value sub-grammars.
//!
//! Each parser takes the raw tokens to the right of `=` and returns `None`
//! when they do not match, so a bad literal degrades that one field to absent.

use crate::lexer::Token;
use crate::model::{Color3, UDim, UDim2};

/// `Ctor.method(n, n, ...)` → (`method`, numbers). Rejects anything after the
/// closing paren.
fn numeric_call<'t>(toks: &'t [Token], ctor: &str) -> Option<(&'t str, Vec<f32>)> {
    let [Token::Ident(c), Token::Dot, Token::Ident(method), Token::LParen, args @ .., Token::RParen] = toks
    else {
        return None;
    };
    if c != ctor {
        return None;
    }
    let mut nums = Vec::new();
    for (i, t) in args.iter().enumerate() {
        match (i % 2, t) {
            (0, Token::Number(n)) => nums.push(*n),
            (1, Token::Comma) => {}
            _ => return None,
        }
    }
    // `f(1, 2,)` leaves a dangling comma
    if args.len() % 2 == 0 && !args.is_empty() {
        return None;
    }
    Some((method.as_str(), nums))
}

/// `UDim2.new(sx, ox, sy, oy)`, `UDim2.fromScale(sx, sy)`, `UDim2.fromOffset(ox, oy)`.
pub fn udim2(toks: &[Token]) -> Option<UDim2> {
    let (method, n) = numeric_call(toks, "UDim2")?;
    match (method, n.as_slice()) {
        ("new", &[sx, ox, sy, oy])   => Some(UDim2::new(sx, ox, sy, oy)),
        ("fromScale", &[sx, sy])     => Some(UDim2::from_scale(sx, sy)),
        ("fromOffset", &[ox, oy])    => Some(UDim2::from_offset(ox, oy)),
        _ => None,
    }
}

/// `UDim.new(scale, offset)`.
pub fn udim(toks: &[Token]) -> Option<UDim> {
    match numeric_call(toks, "UDim")? {
        ("new", n) => match n.as_slice() {
            &[scale, offset] => Some(UDim::new(scale, offset)),
            _ => None,
        },
        _ => None,
    }
}

/// `Color3.new(r, g, b)` (0–1), `Color3.fromRGB(r, g, b)` (0–255), or
/// `Color3.fromHex("#rrggbb")`.
pub fn color3(toks: &[Token]) -> Option<Color3> {
    if let [Token::Ident(c), Token::Dot, Token::Ident(m), Token::LParen, Token::Str(hex), Token::RParen] = toks {
        return (c == "Color3" && m == "fromHex").then(|| Color3::from_hex(hex)).flatten();
    }
    let (method, n) = numeric_call(toks, "Color3")?;
    match (method, n.as_slice()) {
        ("new", &[r, g, b])     => Some(Color3::new(r, g, b)),
        ("fromRGB", &[r, g, b]) => Some(Color3::from_rgb_f32(r, g, b)),
        _ => None,
    }
}

/// The first quoted string literal.
pub fn string(toks: &[Token]) -> Option<String> {
    toks.iter().find_map(|t| match t {
        Token::Str(s) => Some(s.clone()),
        _ => None,
    })
}

/// The first numeric literal, truncated to a non-negative integer.
pub fn integer(toks: &[Token]) -> Option<u32> {
    match toks.first()? {
        Token::Number(n) if n.is_finite() && *n >= 0.0 && *n <= u32::MAX as f32 => Some(n.trunc() as u32),
        _ => None,
    }
}

/// A lone numeric literal.
pub fn float(toks: &[Token]) -> Option<f32> {
    match toks {
        [Token::Number(n)] if n.is_finite() => Some(*n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn toks(src: &str) -> Vec<Token> {
        Lexer::new(src).tokenize().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn udim2_forms() {
        assert_eq!(udim2(&toks("UDim2.new(0.4, 0, 0.6, -5)")), Some(UDim2::new(0.4, 0.0, 0.6, -5.0)));
        assert_eq!(udim2(&toks("UDim2.fromScale(1, 0.5)")), Some(UDim2::from_scale(1.0, 0.5)));
        assert_eq!(udim2(&toks("UDim2.fromOffset(10, 20)")), Some(UDim2::from_offset(10.0, 20.0)));
    }

    #[test]
    fn udim2_rejects_wrong_arity_and_junk() {
        assert_eq!(udim2(&toks("UDim2.new(0.4, 0, 0.6)")), None);
        assert_eq!(udim2(&toks("UDim2.new(0.4, 0, 0.6, 0,)")), None);
        assert_eq!(udim2(&toks("UDim2.new(a, 0, 0.6, 0)")), None);
        assert_eq!(udim2(&toks("UDim2.new(0, 0, 0, 0) + x")), None);
        assert_eq!(udim2(&toks("Vector2.new(0, 0, 0, 0)")), None);
    }

    #[test]
    fn color_forms() {
        assert_eq!(color3(&toks("Color3.new(1, 0.5, 0)")), Some(Color3::new(1.0, 0.5, 0.0)));
        assert_eq!(color3(&toks("Color3.fromRGB(255, 128, 0)")), Some(Color3::from_rgb(255, 128, 0)));
        assert_eq!(color3(&toks(r##"Color3.fromHex("#2d2d2d")"##)), Some(Color3::from_rgb(45, 45, 45)));
        assert_eq!(color3(&toks(r##"Color3.fromHex("nope")"##)), None);
        assert_eq!(color3(&toks("Color3.fromRGB(255, 128)")), None);
    }

    #[test]
    fn udim_form() {
        assert_eq!(udim(&toks("UDim.new(0, 8)")), Some(UDim::new(0.0, 8.0)));
        assert_eq!(udim(&toks("UDim.new(8)")), None);
    }

    #[test]
    fn scalars() {
        assert_eq!(string(&toks(r#"  "Click Me!" "#)), Some("Click Me!".to_string()));
        assert_eq!(string(&toks("x")), None);
        assert_eq!(integer(&toks("18")), Some(18));
        assert_eq!(integer(&toks("14.7")), Some(14));
        assert_eq!(integer(&toks("-2")), None);
        assert_eq!(integer(&toks("Enum.Font.Arial")), None);
        assert_eq!(float(&toks("0.25")), Some(0.25));
        assert_eq!(float(&toks("0.25 0.5")), None);
    }
}
