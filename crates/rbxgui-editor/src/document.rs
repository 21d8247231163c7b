use std::collections::HashSet;

use rbxgui_engine::coords::{Vec2, Viewport};
use rbxgui_engine::layout::{self, LayoutNode};
use rbxgui_script::{
    defaults, generate_with, try_extract, Element, ElementKind, ExtractError, ExtractOptions,
    GenerateOptions,
};

use crate::edit::Edit;
use crate::error::EditError;
use crate::path::ElementPath;

// ── Document ──────────────────────────────────────────────────────────────

/// An element forest together with the source text it is kept in step with.
///
/// Text flows in through [`sync_from_source`](Self::sync_from_source); every
/// successful edit regenerates the text from the forest. Elements are
/// addressed by [`ElementPath`], never by name.
#[derive(Debug, Clone, Default)]
pub struct Document {
    forest: Vec<Element>,
    source: String,
    extract_options: ExtractOptions,
    generate_options: GenerateOptions,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(extract_options: ExtractOptions, generate_options: GenerateOptions) -> Self {
        Self { extract_options, generate_options, ..Self::default() }
    }

    /// A document loaded from `text`.
    pub fn from_source(text: impl Into<String>) -> Result<Self, ExtractError> {
        let mut doc = Self::new();
        doc.sync_from_source(text)?;
        Ok(doc)
    }

    pub fn forest(&self) -> &[Element] {
        &self.forest
    }

    /// The text the forest was last loaded from or generated into.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn generate_options(&self) -> &GenerateOptions {
        &self.generate_options
    }

    pub fn get(&self, path: &ElementPath) -> Option<&Element> {
        path.get(&self.forest)
    }

    /// Total number of elements, at any depth.
    pub fn len(&self) -> usize {
        self.forest.iter().map(Element::subtree_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    // ── Text → forest ────────────────────────────────────────────────────

    /// Re-extracts the forest from `text`, replacing the current one
    /// wholesale.
    ///
    /// When the text cannot be processed at all the previous forest and text
    /// are kept, and the error is returned for the caller to report.
    pub fn sync_from_source(&mut self, text: impl Into<String>) -> Result<(), ExtractError> {
        let text = text.into();
        match try_extract(&text, &self.extract_options) {
            Ok(forest) => {
                log::debug!("synced {} root element(s) from {} byte(s)", forest.len(), text.len());
                self.forest = forest;
                self.source = text;
                Ok(())
            }
            Err(err) => {
                log::warn!("source rejected, keeping last good document: {}", err);
                Err(err)
            }
        }
    }

    // ── Forest → text ────────────────────────────────────────────────────

    /// Regenerates the source text from the forest and returns it.
    pub fn to_source(&mut self) -> &str {
        self.regenerate();
        &self.source
    }

    fn regenerate(&mut self) {
        self.source = generate_with(&self.forest, &self.generate_options);
    }

    // ── Structural edits ─────────────────────────────────────────────────

    /// Adds a default-shaped element of `kind` as the last child of `parent`
    /// (or the last root). The element gets a fresh name like `TextButton2`.
    pub fn add_element(&mut self, kind: ElementKind, parent: Option<&ElementPath>) -> Result<ElementPath, EditError> {
        if let Some(parent) = parent {
            self.get(parent).ok_or_else(|| EditError::NoSuchElement(parent.clone()))?;
            self.check_depth(parent.depth() + 1)?;
        }
        let mut element = defaults::shape(&kind);
        element.name = Some(fresh_name(&mut self.names(), kind.class_name()));
        let path = self.append(parent, element)?;
        log::debug!("added {} at {}", kind, path);
        self.regenerate();
        Ok(path)
    }

    /// Substitutes the element at `path`, children included, returning the
    /// old one.
    pub fn replace(&mut self, path: &ElementPath, element: Element) -> Result<Element, EditError> {
        self.get(path).ok_or_else(|| EditError::NoSuchElement(path.clone()))?;
        self.check_depth(path.depth() - 1 + height(&element))?;
        let slot = path.get_mut(&mut self.forest).ok_or_else(|| EditError::NoSuchElement(path.clone()))?;
        let old = std::mem::replace(slot, element);
        log::debug!("replaced element at {}", path);
        self.regenerate();
        Ok(old)
    }

    /// Applies one property edit to the element at `path`.
    pub fn apply(&mut self, path: &ElementPath, edit: Edit) -> Result<(), EditError> {
        edit.validate()?;
        let element = path.get_mut(&mut self.forest).ok_or_else(|| EditError::NoSuchElement(path.clone()))?;
        log::debug!("edit {:?} at {}", edit, path);
        edit.apply(element);
        self.regenerate();
        Ok(())
    }

    /// Moves the subtree at `path` to the end of `new_parent`'s children, or
    /// to the end of the root level. Returns its new path.
    pub fn reparent(&mut self, path: &ElementPath, new_parent: Option<&ElementPath>) -> Result<ElementPath, EditError> {
        let moving = self.get(path).ok_or_else(|| EditError::NoSuchElement(path.clone()))?;
        let moving_height = height(moving);
        let target = match new_parent {
            Some(parent) => {
                if path.contains(parent) {
                    return Err(EditError::CyclicReparent { path: path.clone(), new_parent: parent.clone() });
                }
                self.get(parent).ok_or_else(|| EditError::NoSuchElement(parent.clone()))?;
                Some(parent.after_removal_of(path))
            }
            None => None,
        };
        self.check_depth(target.as_ref().map_or(0, ElementPath::depth) + moving_height)?;
        let element = self.take(path)?;
        let new_path = self.append(target.as_ref(), element)?;
        log::debug!("moved {} to {}", path, new_path);
        self.regenerate();
        Ok(new_path)
    }

    /// Deep-copies the subtree at `path` and inserts the copy right after it.
    /// Every named element in the copy gets a fresh name.
    pub fn duplicate(&mut self, path: &ElementPath) -> Result<ElementPath, EditError> {
        let mut copy = self.get(path).ok_or_else(|| EditError::NoSuchElement(path.clone()))?.clone();
        rename_subtree(&mut copy, &mut self.names());
        let index = path.index().ok_or_else(|| EditError::NoSuchElement(path.clone()))?;
        let siblings = path.siblings_mut(&mut self.forest).ok_or_else(|| EditError::NoSuchElement(path.clone()))?;
        siblings.insert(index + 1, copy);
        let new_path = path.with_index(index + 1);
        log::debug!("duplicated {} to {}", path, new_path);
        self.regenerate();
        Ok(new_path)
    }

    /// Drops the subtree at `path`, returning it.
    pub fn remove(&mut self, path: &ElementPath) -> Result<Element, EditError> {
        let element = self.take(path)?;
        log::debug!("removed {} ({} element(s))", path, element.subtree_len());
        self.regenerate();
        Ok(element)
    }

    fn check_depth(&self, depth: usize) -> Result<(), EditError> {
        let limit = self.extract_options.max_depth;
        if depth > limit {
            return Err(EditError::TooDeep { depth, limit });
        }
        Ok(())
    }

    fn take(&mut self, path: &ElementPath) -> Result<Element, EditError> {
        let missing = || EditError::NoSuchElement(path.clone());
        let index = path.index().ok_or_else(missing)?;
        let siblings = path.siblings_mut(&mut self.forest).ok_or_else(missing)?;
        if index >= siblings.len() {
            return Err(missing());
        }
        Ok(siblings.remove(index))
    }

    fn append(&mut self, parent: Option<&ElementPath>, element: Element) -> Result<ElementPath, EditError> {
        match parent {
            None => {
                self.forest.push(element);
                Ok(ElementPath::root(self.forest.len() - 1))
            }
            Some(parent) => {
                let p = parent.get_mut(&mut self.forest).ok_or_else(|| EditError::NoSuchElement(parent.clone()))?;
                p.children.push(element);
                Ok(parent.child(p.children.len() - 1))
            }
        }
    }

    fn names(&self) -> HashSet<String> {
        let mut out = HashSet::new();
        let mut stack: Vec<&Element> = self.forest.iter().collect();
        while let Some(e) = stack.pop() {
            if let Some(name) = &e.name {
                out.insert(name.clone());
            }
            stack.extend(&e.children);
        }
        out
    }

    // ── Preview ──────────────────────────────────────────────────────────

    /// Resolved layout of the whole forest.
    pub fn layout(&self, viewport: Viewport) -> Vec<LayoutNode> {
        layout::resolve(&self.forest, viewport)
    }

    /// The top-most element under `point`.
    pub fn element_at(&self, viewport: Viewport, point: Vec2) -> Option<ElementPath> {
        let nodes = self.layout(viewport);
        layout::hit_test(&nodes, point).map(ElementPath::from)
    }

    /// Drags the element at `path` by `delta` pixels.
    pub fn drag(&mut self, path: &ElementPath, delta: Vec2) -> Result<(), EditError> {
        self.apply(path, Edit::Nudge { dx: delta.x, dy: delta.y })
    }
}

/// Levels in the subtree rooted at `e`, counting `e` itself.
fn height(e: &Element) -> usize {
    let mut max = 0;
    let mut stack = vec![(e, 1)];
    while let Some((e, level)) = stack.pop() {
        max = max.max(level);
        stack.extend(e.children.iter().map(|c| (c, level + 1)));
    }
    max
}

// ── Naming ────────────────────────────────────────────────────────────────

/// `stem` followed by the smallest number ≥ 1 that makes it unused. The new
/// name is recorded in `used`.
fn fresh_name(used: &mut HashSet<String>, stem: &str) -> String {
    let mut n = 1u32;
    loop {
        let candidate = format!("{}{}", stem, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn rename_subtree(e: &mut Element, used: &mut HashSet<String>) {
    if let Some(name) = &e.name {
        let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
        let stem = if stem.is_empty() { e.kind.class_name() } else { stem };
        let fresh = fresh_name(used, stem);
        e.name = Some(fresh);
    }
    for child in &mut e.children {
        rename_subtree(child, used);
    }
}
