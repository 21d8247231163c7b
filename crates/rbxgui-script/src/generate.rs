use std::collections::HashSet;
use std::fmt::{self, Write};
use std::rc::Rc;

use crate::extract::{CORNER_CLASS, DEFAULT_ROOT_CONTAINERS};
use crate::model::{Color3, Element, UDim2};

// ── Options ───────────────────────────────────────────────────────────────

/// Generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    /// Binding the preamble declares the `ScreenGui` under. Root elements are
    /// parented to it.
    pub root_binding: String,
    /// Expression the `ScreenGui` itself is parented to.
    pub container_binding: String,
    /// Names the extractor treats as the root container. Elements are never
    /// bound to these, or they would lose their children on re-extraction.
    pub root_containers: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            root_binding: "gui".to_string(),
            container_binding: "PlayerGui".to_string(),
            root_containers: DEFAULT_ROOT_CONTAINERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Lua keywords plus the globals the generated text relies on.
const RESERVED: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
    "Instance", "UDim", "UDim2", "Color3", "Enum", "game", "script", "workspace",
];

// ── Entry points ──────────────────────────────────────────────────────────

/// Emits source text for `forest` that [`extract`](crate::extract) reads
/// back to an equal forest.
///
/// Output is deterministic: equal forests give byte-identical text.
pub fn generate(forest: &[Element], root_binding: &str, container_binding: &str) -> String {
    let options = GenerateOptions {
        root_binding: root_binding.to_string(),
        container_binding: container_binding.to_string(),
        ..GenerateOptions::default()
    };
    generate_with(forest, &options)
}

pub fn generate_with(forest: &[Element], options: &GenerateOptions) -> String {
    let mut g = Generator::new(options);
    // `fmt::Write` for `String` never returns an error.
    let _ = g.emit(forest);
    g.out
}

// ── Generator ─────────────────────────────────────────────────────────────

struct Generator<'o> {
    options: &'o GenerateOptions,
    out: String,
    used: HashSet<String>,
    /// Pre-order index of the element being emitted, 1-based.
    index: usize,
}

impl<'o> Generator<'o> {
    fn new(options: &'o GenerateOptions) -> Self {
        let mut used = HashSet::new();
        used.insert(options.root_binding.clone());
        used.insert(options.container_binding.clone());
        Self { options, out: String::new(), used, index: 0 }
    }

    /// Preamble, then every element in pre-order, walked with an explicit
    /// stack.
    fn emit(&mut self, forest: &[Element]) -> fmt::Result {
        let root = &self.options.root_binding;
        writeln!(self.out, "local {} = Instance.new(\"ScreenGui\")", root)?;
        writeln!(self.out, "{}.Parent = {}", root, self.options.container_binding)?;

        let mut stack: Vec<(&Element, Rc<str>)> = Vec::new();
        let root: Rc<str> = Rc::from(root.as_str());
        stack.extend(forest.iter().rev().map(|e| (e, Rc::clone(&root))));
        while let Some((e, parent)) = stack.pop() {
            let b: Rc<str> = Rc::from(self.element(e, &parent)?);
            stack.extend(e.children.iter().rev().map(|c| (c, Rc::clone(&b))));
        }
        Ok(())
    }

    fn usable(&self, name: &str) -> bool {
        is_identifier(name)
            && !RESERVED.contains(&name)
            && !self.options.root_containers.iter().any(|c| c == name)
            && !self.used.contains(name)
    }

    /// Claims `preferred` if possible, else `fallback`, else `fallback_N`.
    fn claim(&mut self, preferred: Option<&str>, fallback: String) -> String {
        let pick = match preferred {
            Some(name) if self.usable(name) => name.to_string(),
            _ => {
                let mut candidate = fallback.clone();
                let mut n = 1;
                while !self.usable(&candidate) {
                    candidate = format!("{}_{}", fallback, n);
                    n += 1;
                }
                candidate
            }
        };
        self.used.insert(pick.clone());
        pick
    }

    /// Emits one element's block and returns the binding it claimed.
    fn element(&mut self, e: &Element, parent: &str) -> Result<String, fmt::Error> {
        self.index += 1;
        let fallback = format!("element{}", self.index);
        let b = self.claim(e.name.as_deref(), fallback);

        self.out.push('\n');
        writeln!(self.out, "local {} = Instance.new({})", b, lua_string(e.kind.class_name()))?;

        if let Some(name) = e.name.as_deref().filter(|n| *n != b) {
            writeln!(self.out, "{}.Name = {}", b, lua_string(name))?;
        }
        if let Some(s) = e.size {
            writeln!(self.out, "{}.Size = {}", b, udim2(s))?;
        }
        if let Some(p) = e.position {
            writeln!(self.out, "{}.Position = {}", b, udim2(p))?;
        }
        if let Some(c) = e.background_color {
            writeln!(self.out, "{}.BackgroundColor3 = {}", b, color3(c))?;
        }
        if let Some(t) = e.background_transparency {
            writeln!(self.out, "{}.BackgroundTransparency = {}", b, num(t))?;
        }
        if let Some(n) = e.border_size_pixel {
            writeln!(self.out, "{}.BorderSizePixel = {}", b, n)?;
        }
        if let Some(t) = e.text.as_deref() {
            writeln!(self.out, "{}.Text = {}", b, lua_string(t))?;
        }
        if let Some(c) = e.text_color {
            writeln!(self.out, "{}.TextColor3 = {}", b, color3(c))?;
        }
        if let Some(n) = e.text_size {
            writeln!(self.out, "{}.TextSize = {}", b, n)?;
        }
        if let Some(i) = e.image.as_deref() {
            writeln!(self.out, "{}.Image = {}", b, lua_string(i))?;
        }
        if let Some(r) = e.corner_radius {
            let c = self.claim(None, format!("{}Corner", b));
            writeln!(self.out, "local {} = Instance.new({})", c, lua_string(CORNER_CLASS))?;
            writeln!(self.out, "{}.CornerRadius = UDim.new(0, {})", c, num(r))?;
            writeln!(self.out, "{}.Parent = {}", c, b)?;
        }
        writeln!(self.out, "{}.Parent = {}", b, parent)?;
        Ok(b)
    }
}

// ── Literal formatting ────────────────────────────────────────────────────

/// Shortest decimal that parses back to the same `f32`.
fn num(v: f32) -> String {
    format!("{}", v)
}

fn udim2(u: UDim2) -> String {
    format!(
        "UDim2.new({}, {}, {}, {})",
        num(u.x.scale),
        num(u.x.offset),
        num(u.y.scale),
        num(u.y.offset)
    )
}

/// `Color3.fromRGB` with floored bytes when every channel is an exact byte,
/// `Color3.new` otherwise.
fn color3(c: Color3) -> String {
    match c.to_rgb8() {
        Some([r, g, b]) => format!("Color3.fromRGB({}, {}, {})", r, g, b),
        None => format!("Color3.new({}, {}, {})", num(c.r), num(c.g), num(c.b)),
    }
}

fn lua_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"'  => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c    => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
