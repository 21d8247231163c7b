use std::fmt;
use std::str::FromStr;

use rbxgui_script::Element;
use serde::{Deserialize, Serialize};

/// Structural address of an element: the index at each level, starting from
/// the root level of the forest.
///
/// Paths are positional. Any structural edit (add, remove, reparent,
/// duplicate) may shift the paths of later siblings and their subtrees, so a
/// path is only meaningful against the forest it was taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementPath(Vec<usize>);

impl ElementPath {
    /// The `index`-th root element.
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut v = self.0.clone();
        v.push(index);
        Self(v)
    }

    /// `None` for root elements.
    pub fn parent(&self) -> Option<Self> {
        match self.0.len() {
            0 | 1 => None,
            n => Some(Self(self.0[..n - 1].to_vec())),
        }
    }

    /// Index among its siblings.
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Nesting level, counting root elements as 1, the way
    /// [`ExtractOptions::max_depth`](rbxgui_script::ExtractOptions) does.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// True when `self` is `other` or one of its ancestors.
    pub fn contains(&self, other: &ElementPath) -> bool {
        other.0.starts_with(&self.0)
    }

    /// The same path with its last index replaced.
    pub(crate) fn with_index(&self, index: usize) -> Self {
        let mut v = self.0.clone();
        if let Some(last) = v.last_mut() {
            *last = index;
        }
        Self(v)
    }

    /// Where `self` ends up once the element at `removed` is taken out of the
    /// forest. Later siblings of `removed` (and their subtrees) shift left.
    pub(crate) fn after_removal_of(&self, removed: &ElementPath) -> Self {
        let level = removed.0.len();
        let mut v = self.0.clone();
        if level > 0
            && v.len() >= level
            && v[..level - 1] == removed.0[..level - 1]
            && v[level - 1] > removed.0[level - 1]
        {
            v[level - 1] -= 1;
        }
        Self(v)
    }

    pub fn get<'a>(&self, forest: &'a [Element]) -> Option<&'a Element> {
        let (first, rest) = self.0.split_first()?;
        let mut cur = forest.get(*first)?;
        for &i in rest {
            cur = cur.children.get(i)?;
        }
        Some(cur)
    }

    pub fn get_mut<'a>(&self, forest: &'a mut [Element]) -> Option<&'a mut Element> {
        let (first, rest) = self.0.split_first()?;
        let mut cur = forest.get_mut(*first)?;
        for &i in rest {
            cur = cur.children.get_mut(i)?;
        }
        Some(cur)
    }

    /// The sibling list this path indexes into.
    pub(crate) fn siblings_mut<'a>(&self, forest: &'a mut Vec<Element>) -> Option<&'a mut Vec<Element>> {
        match self.parent() {
            None if !self.is_empty() => Some(forest),
            None => None,
            Some(parent) => parent.get_mut(forest).map(|p| &mut p.children),
        }
    }
}

impl From<Vec<usize>> for ElementPath {
    fn from(v: Vec<usize>) -> Self {
        Self(v)
    }
}

impl From<&[usize]> for ElementPath {
    fn from(v: &[usize]) -> Self {
        Self(v.to_vec())
    }
}

/// `0/2/1`
impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", idx)?;
        }
        Ok(())
    }
}

impl FromStr for ElementPath {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split('/').map(|p| p.trim().parse()).collect::<Result<Vec<_>, _>>().map(Self)
    }
}

/// Every path in `forest`, pre-order.
pub fn all_paths(forest: &[Element]) -> Vec<ElementPath> {
    let mut out = Vec::new();
    let mut stack: Vec<(&Element, ElementPath)> =
        forest.iter().enumerate().rev().map(|(i, e)| (e, ElementPath::root(i))).collect();
    while let Some((e, path)) = stack.pop() {
        stack.extend(e.children.iter().enumerate().rev().map(|(i, c)| (c, path.child(i))));
        out.push(path);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbxgui_script::ElementKind;

    fn p(v: &[usize]) -> ElementPath {
        ElementPath::from(v)
    }

    fn forest() -> Vec<Element> {
        vec![
            Element::named(ElementKind::Frame, "a")
                .with_child(Element::named(ElementKind::TextLabel, "a0"))
                .with_child(Element::named(ElementKind::Frame, "a1").with_child(Element::named(ElementKind::TextButton, "a10"))),
            Element::named(ElementKind::Frame, "b"),
        ]
    }

    #[test]
    fn lookup() {
        let f = forest();
        assert_eq!(p(&[0, 1, 0]).get(&f).and_then(|e| e.name.as_deref()), Some("a10"));
        assert_eq!(p(&[1]).get(&f).and_then(|e| e.name.as_deref()), Some("b"));
        assert!(p(&[0, 5]).get(&f).is_none());
        assert!(ElementPath::default().get(&f).is_none());
    }

    #[test]
    fn parent_and_index() {
        assert_eq!(p(&[0, 1, 0]).parent(), Some(p(&[0, 1])));
        assert_eq!(p(&[3]).parent(), None);
        assert_eq!(p(&[0, 1]).index(), Some(1));
    }

    #[test]
    fn containment() {
        assert!(p(&[0]).contains(&p(&[0, 1, 0])));
        assert!(p(&[0, 1]).contains(&p(&[0, 1])));
        assert!(!p(&[0, 1]).contains(&p(&[0])));
        assert!(!p(&[1]).contains(&p(&[0, 1])));
    }

    #[test]
    fn removal_shifts_later_siblings_only() {
        let removed = p(&[0, 0]);
        assert_eq!(p(&[0, 1, 0]).after_removal_of(&removed), p(&[0, 0, 0]));
        assert_eq!(p(&[1]).after_removal_of(&removed), p(&[1]));
        assert_eq!(p(&[2, 3]).after_removal_of(&p(&[0])), p(&[1, 3]));
    }

    #[test]
    fn display_and_parse() {
        let path = p(&[0, 2, 1]);
        assert_eq!(path.to_string(), "0/2/1");
        assert_eq!("0/2/1".parse::<ElementPath>(), Ok(path));
        assert!("0/x".parse::<ElementPath>().is_err());
    }

    #[test]
    fn depth_counts_roots_as_one() {
        assert_eq!(p(&[4]).depth(), 1);
        assert_eq!(p(&[0, 1, 0]).depth(), 3);
    }

    #[test]
    fn serializes_as_a_plain_index_array() {
        let path = p(&[0, 2, 1]);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!([0, 2, 1]));
        assert_eq!(serde_json::from_value::<ElementPath>(json).unwrap(), path);
        assert!(serde_json::from_str::<ElementPath>("[0, -1]").is_err());
    }

    #[test]
    fn all_paths_is_pre_order() {
        let paths: Vec<String> = all_paths(&forest()).iter().map(|p| p.to_string()).collect();
        assert_eq!(paths, vec!["0", "0/0", "0/1", "0/1/0", "1"]);
    }
}
