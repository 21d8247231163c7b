use std::collections::HashMap;

use crate::error::ExtractError;
use crate::lexer::Token;
use crate::model::{Element, ElementKind};
use crate::statement::{self, Line, Statement, Target};
use crate::value;

// ── Options ───────────────────────────────────────────────────────────────

/// Parent names that mean "top level" when no element is bound to them.
pub const DEFAULT_ROOT_CONTAINERS: &[&str] = &["gui", "screenGui", "ScreenGui", "PlayerGui", "playerGui"];

/// Classes whose instances act as root containers rather than elements.
pub const CONTAINER_CLASSES: &[&str] = &["ScreenGui", "SurfaceGui", "BillboardGui"];

/// Modifier class that contributes `corner_radius` to its parent.
pub const CORNER_CLASS: &str = "UICorner";

/// Nesting limit used by [`ExtractOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Extraction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Parent names treated as the root container. Checked before the symbol
    /// table, so an element bound to one of these names cannot have children.
    pub root_containers: Vec<String>,
    /// Longest source [`try_extract`] accepts, in bytes.
    pub max_source_len: usize,
    /// Deepest nesting kept, counting root elements as depth 1. [`try_extract`]
    /// refuses deeper scripts; [`extract`] lifts the too-deep subtrees to the
    /// root level instead.
    pub max_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            root_containers: DEFAULT_ROOT_CONTAINERS.iter().map(|s| s.to_string()).collect(),
            max_source_len: 4 * 1024 * 1024,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ── Entry points ──────────────────────────────────────────────────────────

/// Extracts the element forest from `src` with default options.
///
/// Never fails: unrecognized statements are skipped and bad literals leave
/// their field absent.
pub fn extract(src: &str) -> Vec<Element> {
    Extraction::new(&ExtractOptions::default()).run(src).0
}

/// Like [`extract`], but honours `options` and refuses input that cannot be
/// a script at all (too large, or binary).
pub fn try_extract(src: &str, options: &ExtractOptions) -> Result<Vec<Element>, ExtractError> {
    if src.len() > options.max_source_len {
        return Err(ExtractError::SourceTooLarge { len: src.len(), limit: options.max_source_len });
    }
    if let Some(offset) = src.bytes().position(|b| b == 0) {
        return Err(ExtractError::Binary { offset });
    }
    let (forest, depth) = Extraction::new(options).run(src);
    if depth > options.max_depth {
        return Err(ExtractError::TooDeep { depth, limit: options.max_depth });
    }
    Ok(forest)
}

// ── Extraction state ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingConstruction,
    /// An element was constructed and has not been parented yet.
    InElement(usize),
}

#[derive(Debug, Clone, Copy)]
enum Binding {
    Element(usize),
    Container,
    Corner(usize),
}

/// Where a slot hangs. The `u64` is the order the Parent assignment ran in,
/// which becomes sibling order.
#[derive(Debug, Clone, Copy)]
enum Attach {
    Unattached,
    Root(u64),
    Child(usize, u64),
}

#[derive(Debug, Clone, Copy)]
enum ParentRef {
    Root,
    Element(usize),
}

struct Slot {
    element: Element,
    attach: Attach,
}

struct Corner {
    radius: Option<f32>,
    parent: Option<(usize, u64)>,
}

/// Per-call extraction state. Nothing here outlives one [`extract`] call.
struct Extraction<'o> {
    options: &'o ExtractOptions,
    state: State,
    symbols: HashMap<String, Binding>,
    slots: Vec<Slot>,
    corners: Vec<Corner>,
    seq: u64,
    skipped: usize,
}

impl<'o> Extraction<'o> {
    fn new(options: &'o ExtractOptions) -> Self {
        Self {
            options,
            state: State::AwaitingConstruction,
            symbols: HashMap::new(),
            slots: Vec::new(),
            corners: Vec::new(),
            seq: 0,
            skipped: 0,
        }
    }

    /// The forest, and how deep the script nested before any lifting.
    fn run(mut self, src: &str) -> (Vec<Element>, usize) {
        let lines = statement::lines(src);
        let total = lines.len();
        for l in lines {
            match l.item {
                Line::Recognized(stmt) => self.statement(l.line, stmt),
                Line::Skipped(toks) => {
                    self.skipped += 1;
                    log::trace!("line {}: skipped `{}`", l.line, statement::render(&toks));
                }
            }
        }
        let skipped = self.skipped;
        let (forest, depth) = self.finish();
        log::debug!(
            "extracted {} root element(s) from {} statement(s), {} skipped, depth {}",
            forest.len(),
            total,
            skipped,
            depth
        );
        (forest, depth)
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn statement(&mut self, line: usize, stmt: Statement) {
        match stmt {
            Statement::Construct { binding, class, parent } => self.construct(line, binding, class, parent),
            Statement::Parent { binding, target } => match self.symbols.get(&binding).copied() {
                Some(Binding::Element(idx)) => {
                    self.attach(line, idx, &target);
                    if self.state == State::InElement(idx) {
                        self.state = State::AwaitingConstruction;
                    }
                }
                Some(Binding::Corner(ci)) => self.attach_corner(ci, &target),
                Some(Binding::Container) => {
                    log::trace!("line {}: container `{}` parent ignored", line, binding);
                }
                None => self.skip(line, &binding),
            },
            Statement::Assign { binding, property, value } => match self.symbols.get(&binding).copied() {
                Some(Binding::Element(idx)) => {
                    if !apply_property(&mut self.slots[idx].element, &property, &value) {
                        log::trace!("line {}: unknown property `{}.{}`", line, binding, property);
                    }
                }
                Some(Binding::Corner(ci)) if property == "CornerRadius" => {
                    self.corners[ci].radius = value::udim(&value).map(|u| u.offset);
                }
                _ => self.skip(line, &binding),
            },
        }
    }

    fn skip(&mut self, line: usize, binding: &str) {
        self.skipped += 1;
        log::trace!("line {}: `{}` is not a tracked element", line, binding);
    }

    fn construct(&mut self, line: usize, binding: String, class: String, parent: Option<Target>) {
        if CONTAINER_CLASSES.contains(&class.as_str()) {
            self.symbols.insert(binding, Binding::Container);
            return;
        }
        if class == CORNER_CLASS {
            let ci = self.corners.len();
            self.corners.push(Corner { radius: None, parent: None });
            self.symbols.insert(binding, Binding::Corner(ci));
            if let Some(target) = parent {
                self.attach_corner(ci, &target);
            }
            return;
        }

        if let State::InElement(open) = self.state {
            // Still addressable by binding; picked up at end of input if
            // nothing parents it.
            log::trace!(
                "line {}: `{}` left open by new construction",
                line,
                self.slots[open].element.name.as_deref().unwrap_or("?")
            );
        }

        let idx = self.slots.len();
        let element = Element::named(ElementKind::from_class(&class), binding.clone());
        self.slots.push(Slot { element, attach: Attach::Unattached });
        if let Some(Binding::Element(old)) = self.symbols.insert(binding, Binding::Element(idx)) {
            log::trace!("line {}: binding shadows element #{}", line, old);
        }
        self.state = State::InElement(idx);

        if let Some(target) = parent {
            self.attach(line, idx, &target);
        }
    }

    /// Resolves a parent target. `None` means the target names something
    /// that cannot hold elements (a corner modifier).
    fn resolve_parent(&self, target: &Target) -> Option<ParentRef> {
        match target {
            Target::Path(_) => Some(ParentRef::Root),
            Target::Binding(name) => {
                if self.options.root_containers.iter().any(|c| c == name) {
                    return Some(ParentRef::Root);
                }
                match self.symbols.get(name) {
                    Some(Binding::Element(p)) => Some(ParentRef::Element(*p)),
                    Some(Binding::Container) | None => Some(ParentRef::Root),
                    Some(Binding::Corner(_)) => None,
                }
            }
        }
    }

    fn attach(&mut self, line: usize, idx: usize, target: &Target) {
        let attach = match self.resolve_parent(target) {
            Some(ParentRef::Root) => Attach::Root(self.next_seq()),
            Some(ParentRef::Element(parent)) => {
                if self.would_cycle(idx, parent) {
                    log::trace!("line {}: parent assignment would form a cycle", line);
                    self.skipped += 1;
                    return;
                }
                Attach::Child(parent, self.next_seq())
            }
            None => {
                self.skipped += 1;
                return;
            }
        };
        self.slots[idx].attach = attach;
    }

    fn attach_corner(&mut self, ci: usize, target: &Target) {
        if let Some(ParentRef::Element(parent)) = self.resolve_parent(target) {
            let seq = self.next_seq();
            self.corners[ci].parent = Some((parent, seq));
        }
    }

    /// True when `parent` is `child` or one of its descendants.
    fn would_cycle(&self, child: usize, parent: usize) -> bool {
        let mut cur = Some(parent);
        while let Some(c) = cur {
            if c == child {
                return true;
            }
            cur = match self.slots[c].attach {
                Attach::Child(p, _) => Some(p),
                _ => None,
            };
        }
        false
    }

    fn finish(mut self) -> (Vec<Element>, usize) {
        let mut corners: Vec<(u64, usize, f32)> = self
            .corners
            .iter()
            .filter_map(|c| Some((c.parent?.1, c.parent?.0, c.radius?)))
            .collect();
        corners.sort_by_key(|&(seq, ..)| seq);
        for (_, parent, radius) in corners {
            self.slots[parent].element.corner_radius = Some(radius);
        }

        let n = self.slots.len();
        let mut roots: Vec<(u64, usize)> = Vec::new();
        let mut loose: Vec<usize> = Vec::new();
        let mut kids: Vec<Vec<(u64, usize)>> = vec![Vec::new(); n];
        for (i, slot) in self.slots.iter().enumerate() {
            match slot.attach {
                Attach::Unattached => loose.push(i),
                Attach::Root(seq) => roots.push((seq, i)),
                Attach::Child(p, seq) => kids[p].push((seq, i)),
            }
        }
        roots.sort_by_key(|&(seq, _)| seq);
        let kids: Vec<Vec<usize>> = kids
            .into_iter()
            .map(|mut k| {
                k.sort_by_key(|&(seq, _)| seq);
                k.into_iter().map(|(_, i)| i).collect()
            })
            .collect();

        let mut order: Vec<usize> = roots.into_iter().map(|(_, i)| i).chain(loose).collect();
        let depth = deepest(&order, &kids);
        if depth > self.options.max_depth {
            log::debug!("nesting depth {} exceeds {}, lifting deeper subtrees", depth, self.options.max_depth);
        }

        let limit = self.options.max_depth.max(1);
        let mut taken: Vec<Option<Element>> = self.slots.into_iter().map(|s| Some(s.element)).collect();
        let mut forest = Vec::with_capacity(order.len());
        let mut next = 0;
        while next < order.len() {
            let mut lifted = Vec::new();
            if let Some(element) = build(order[next], &mut taken, &kids, limit, &mut lifted) {
                forest.push(element);
            }
            order.extend(lifted);
            next += 1;
        }
        (forest, depth)
    }
}

/// Deepest level reached from `roots`, with roots at depth 1.
fn deepest(roots: &[usize], kids: &[Vec<usize>]) -> usize {
    let mut max = 0;
    let mut stack: Vec<(usize, usize)> = roots.iter().map(|&r| (r, 1)).collect();
    while let Some((slot, depth)) = stack.pop() {
        max = max.max(depth);
        stack.extend(kids[slot].iter().map(|&c| (c, depth + 1)));
    }
    max
}

/// Assembles the subtree under slot `root` with an explicit stack. Children
/// that would sit below `limit` are left out and pushed onto `lifted`.
fn build(
    root: usize,
    taken: &mut [Option<Element>],
    kids: &[Vec<usize>],
    limit: usize,
    lifted: &mut Vec<usize>,
) -> Option<Element> {
    let element = taken[root].take()?;
    let mut stack = vec![(element, root, 0usize)];
    while let Some((_, slot, cursor)) = stack.last_mut() {
        let slot = *slot;
        match kids[slot].get(*cursor).copied() {
            Some(child) => {
                *cursor += 1;
                if stack.len() >= limit {
                    lifted.push(child);
                } else if let Some(e) = taken[child].take() {
                    stack.push((e, child, 0));
                }
            }
            None => {
                let Some((done, _, _)) = stack.pop() else { break };
                match stack.last_mut() {
                    Some((parent, _, _)) => parent.children.push(done),
                    None => return Some(done),
                }
            }
        }
    }
    None
}

/// Applies one `binding.Property = value` assignment. Returns `false` for a
/// property name this model does not carry.
///
/// A recognized property whose value fails to parse becomes absent.
fn apply_property(element: &mut Element, property: &str, value: &[Token]) -> bool {
    match property {
        "Size"                   => element.size = value::udim2(value),
        "Position"               => element.position = value::udim2(value),
        "BackgroundColor3"       => element.background_color = value::color3(value),
        "TextColor3"             => element.text_color = value::color3(value),
        "BackgroundTransparency" => element.background_transparency = value::float(value),
        "Text"                   => element.text = value::string(value),
        "Image"                  => element.image = value::string(value),
        "TextSize"               => element.text_size = value::integer(value),
        "BorderSizePixel"        => element.border_size_pixel = value::integer(value),
        "Name" => {
            if let Some(name) = value::string(value) {
                element.name = Some(name);
            }
        }
        _ => return false,
    }
    true
}
