//! Layout resolution: element forest → absolute rects with resolved paint.
//!
//! Every element is placed against its parent's rect (the viewport for
//! roots):
//!
//! | Quantity | Rule |
//! |----------|------|
//! | left / top | `parent.origin + scale · parent.size + offset` |
//! | width / height | `scale · parent.size + offset`, or just `offset` when `scale == 0` |
//!
//! Absent fields fall back to [`rbxgui_script::defaults`]. Elements clip their
//! descendants, so each node also carries the visible part of its rect.

use rbxgui_script::defaults;
use rbxgui_script::{Element, ElementKind, UDim};
use serde::{Deserialize, Serialize};

use crate::coords::{ColorRgba, CornerRadii, Rect, Vec2, Viewport};

/// Inner padding between an element's edge and its content.
pub const CONTENT_PADDING: Vec2 = Vec2::new(8.0, 4.0);

// ── LayoutNode ────────────────────────────────────────────────────────────

/// How content sits inside its box. Labels read left-aligned, everything
/// else is centered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    Start,
    Center,
}

/// What to draw inside a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Content {
    None,
    Text { text: String },
    /// A directly loadable image reference.
    Image { source: String },
    /// A platform asset id (`rbxassetid://...`) or a missing image: the
    /// consumer draws a placeholder tile.
    ImagePlaceholder { asset: Option<String> },
}

/// One resolved element, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    /// Index path of the element in the forest.
    pub path: Vec<usize>,
    pub kind: ElementKind,
    pub name: Option<String>,
    /// Full rect, before clipping. May have negative size.
    pub rect: Rect,
    /// Part of `rect` left visible by the ancestors' clipping, `None` when
    /// fully clipped away.
    pub visible: Option<Rect>,
    pub background: ColorRgba,
    pub border_width: f32,
    pub border_color: ColorRgba,
    pub corner_radii: CornerRadii,
    pub content: Content,
    pub content_rect: Rect,
    pub align: Align,
    pub text_color: ColorRgba,
    pub text_size: f32,
    /// Responds to clicks (button kinds).
    pub interactive: bool,
}

impl LayoutNode {
    /// Whether `p` lands on the visible part of this node.
    pub fn hit(&self, p: Vec2) -> bool {
        self.visible.is_some_and(|v| v.contains(p))
    }
}

// ── Resolution ────────────────────────────────────────────────────────────

/// Resolves `forest` against `viewport`, returning nodes in pre-order, which
/// is also paint order: later nodes draw on top of earlier ones.
///
/// An invalid viewport (zero, negative, or non-finite) resolves nothing.
pub fn resolve(forest: &[Element], viewport: Viewport) -> Vec<LayoutNode> {
    if !viewport.is_valid() {
        log::warn!("layout skipped: invalid viewport {}x{}", viewport.width, viewport.height);
        return Vec::new();
    }
    let root = viewport.rect();
    let mut out = Vec::new();
    // (element, parent rect, parent clip, path); popped in pre-order.
    let mut stack: Vec<(&Element, Rect, Option<Rect>, Vec<usize>)> = forest
        .iter()
        .enumerate()
        .rev()
        .map(|(i, e)| (e, root, Some(root), vec![i]))
        .collect();
    while let Some((e, parent, clip, path)) = stack.pop() {
        let rect = place(e, parent);
        let visible = clip.and_then(|c| c.intersect(rect));
        for (i, child) in e.children.iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(i);
            stack.push((child, rect, visible, child_path));
        }
        out.push(paint(e, rect, visible, path));
    }
    log::debug!("resolved {} node(s) in {}x{}", out.len(), viewport.width, viewport.height);
    out
}

/// The element's rect inside `parent`.
pub fn place(e: &Element, parent: Rect) -> Rect {
    let pos = e.position.unwrap_or(defaults::POSITION);
    let size = e.size.unwrap_or(defaults::SIZE);
    Rect::from_origin_size(
        parent.origin + Vec2::from_udim2(pos, parent.size),
        Vec2::new(extent(size.x, parent.size.x), extent(size.y, parent.size.y)),
    )
}

fn extent(u: UDim, parent: f32) -> f32 {
    if u.scale != 0.0 {
        u.scale * parent + u.offset
    } else {
        u.offset
    }
}

fn paint(e: &Element, rect: Rect, visible: Option<Rect>, path: Vec<usize>) -> LayoutNode {
    let transparency = match (e.background_color, e.background_transparency) {
        (_, Some(t)) => t,
        (Some(_), None) => defaults::BACKGROUND_TRANSPARENCY,
        (None, None) => defaults::UNSET_BACKGROUND_TRANSPARENCY,
    };
    let background = ColorRgba::from_transparency(
        e.background_color.unwrap_or(defaults::BACKGROUND_COLOR),
        transparency,
    );
    let radius = e.corner_radius.unwrap_or(defaults::CORNER_RADIUS);

    LayoutNode {
        path,
        kind: e.kind.clone(),
        name: e.name.clone(),
        rect,
        visible,
        background,
        border_width: e.border_size_pixel.unwrap_or(defaults::BORDER_SIZE_PIXEL) as f32,
        border_color: ColorRgba::border(),
        corner_radii: CornerRadii::all(radius).fit(rect),
        content: content(e),
        content_rect: rect.inset(CONTENT_PADDING),
        align: if e.kind == ElementKind::TextLabel { Align::Start } else { Align::Center },
        text_color: ColorRgba::from_color3(e.text_color.unwrap_or(defaults::TEXT_COLOR), 1.0),
        text_size: e.text_size.unwrap_or(defaults::TEXT_SIZE) as f32,
        interactive: e.kind.is_button(),
    }
}

fn content(e: &Element) -> Content {
    if e.kind.has_text() {
        let text = e.text.clone().unwrap_or_else(|| e.kind.class_name().to_string());
        return Content::Text { text };
    }
    if e.kind.has_image() {
        return match e.image.as_deref() {
            Some(src) if !src.is_empty() && !src.contains("rbxassetid://") => {
                Content::Image { source: src.to_string() }
            }
            asset => Content::ImagePlaceholder { asset: asset.map(str::to_string) },
        };
    }
    Content::None
}

// ── Hit testing ───────────────────────────────────────────────────────────

/// Path of the top-most node whose visible area contains `point`.
pub fn hit_test(nodes: &[LayoutNode], point: Vec2) -> Option<&[usize]> {
    nodes.iter().rev().find(|n| n.hit(point)).map(|n| n.path.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbxgui_script::{extract, Color3, UDim2};

    const VIEW: Viewport = Viewport::new(800.0, 600.0);

    fn frame(name: &str) -> Element {
        Element::named(ElementKind::Frame, name)
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn scale_and_offset_resolve_against_the_viewport() {
        let forest = vec![frame("f")
            .with_position(UDim2::new(0.25, 10.0, 0.5, -20.0))
            .with_size(UDim2::new(0.5, 0.0, 0.0, 40.0))];
        let nodes = resolve(&forest, VIEW);
        assert_eq!(nodes[0].rect, Rect::new(210.0, 280.0, 400.0, 40.0));
    }

    #[test]
    fn children_resolve_against_their_parent() {
        let forest = vec![frame("outer")
            .with_position(UDim2::from_offset(100.0, 50.0))
            .with_size(UDim2::from_offset(200.0, 100.0))
            .with_child(
                frame("inner")
                    .with_position(UDim2::from_scale(0.5, 0.5))
                    .with_size(UDim2::from_scale(0.5, 0.5)),
            )];
        let nodes = resolve(&forest, VIEW);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].path, vec![0, 0]);
        assert_eq!(nodes[1].rect, Rect::new(200.0, 100.0, 100.0, 50.0));
    }

    #[test]
    fn deep_nesting_resolves_in_pre_order() {
        let depth = rbxgui_script::DEFAULT_MAX_DEPTH;
        let mut chain = frame("leaf").with_size(UDim2::from_scale(1.0, 1.0));
        for _ in 1..depth {
            chain = frame("link").with_size(UDim2::from_scale(1.0, 1.0)).with_child(chain);
        }
        let forest = vec![chain, frame("sibling")];
        let nodes = resolve(&forest, VIEW);
        assert_eq!(nodes.len(), depth + 1);
        assert_eq!(nodes[depth - 1].path.len(), depth);
        assert_eq!(nodes[depth - 1].name.as_deref(), Some("leaf"));
        assert_eq!(nodes[depth - 1].rect, VIEW.rect());
        assert_eq!(nodes[depth].path, vec![1]);
    }

    #[test]
    fn missing_size_and_position_use_defaults() {
        let nodes = resolve(&[frame("f")], VIEW);
        assert_eq!(nodes[0].rect, Rect::new(0.0, 0.0, 100.0, 30.0));
    }

    #[test]
    fn example_script_lays_out() {
        let forest = extract(rbxgui_script::EXAMPLE_SCRIPT);
        let nodes = resolve(&forest, VIEW);
        assert_eq!(nodes.len(), 4);
        // MainFrame: 0.4 x 0.6 of 800x600 at (0.3, 0.2)
        let r = nodes[0].rect;
        for (got, want) in [(r.origin.x, 240.0), (r.origin.y, 120.0), (r.size.x, 320.0), (r.size.y, 360.0)] {
            assert!((got - want).abs() < 1e-3, "{got} != {want}");
        }
        assert_eq!(nodes[0].border_width, 2.0);
        assert_eq!(nodes[0].corner_radii, CornerRadii::all(8.0));
        // TitleLabel spans the frame's width
        assert_eq!(nodes[1].rect.size.x, r.size.x);
        assert_eq!(nodes[1].align, Align::Start);
        assert!(nodes[2].interactive);
    }

    // ── clipping ──────────────────────────────────────────────────────────

    #[test]
    fn descendants_are_clipped_to_ancestors() {
        let forest = vec![frame("box")
            .with_size(UDim2::from_offset(100.0, 100.0))
            .with_child(frame("spill").with_position(UDim2::from_offset(50.0, 50.0)).with_size(UDim2::from_offset(100.0, 100.0)))
            .with_child(frame("gone").with_position(UDim2::from_offset(200.0, 0.0)))];
        let nodes = resolve(&forest, VIEW);
        assert_eq!(nodes[1].visible, Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
        assert_eq!(nodes[2].visible, None);
    }

    // ── paint ─────────────────────────────────────────────────────────────

    #[test]
    fn unstyled_background_is_faint_white() {
        let node = &resolve(&[frame("f")], VIEW)[0];
        assert_eq!((node.background.r, node.background.g, node.background.b), (1.0, 1.0, 1.0));
        assert!((node.background.a - 0.1).abs() < 1e-6);
    }

    #[test]
    fn transparency_sets_alpha_without_touching_color() {
        let forest = vec![
            frame("a").with_background(Color3::from_rgb(255, 0, 0)),
            Element { background_transparency: Some(1.0), ..frame("b").with_background(Color3::black()) },
        ];
        let nodes = resolve(&forest, VIEW);
        assert_eq!(nodes[0].background, ColorRgba::new(1.0, 0.0, 0.0, 1.0));
        assert!(nodes[1].background.is_invisible());
    }

    #[test]
    fn content_per_kind() {
        let forest = vec![
            Element::new(ElementKind::TextButton),
            Element::new(ElementKind::TextLabel).with_text("hi"),
            Element::new(ElementKind::ImageLabel).with_image("rbxassetid://42"),
            Element::new(ElementKind::ImageButton).with_image("https://example.com/a.png"),
            Element::new(ElementKind::ImageLabel),
            frame("f"),
        ];
        let content: Vec<Content> = resolve(&forest, VIEW).into_iter().map(|n| n.content).collect();
        assert_eq!(
            content,
            vec![
                Content::Text { text: "TextButton".into() },
                Content::Text { text: "hi".into() },
                Content::ImagePlaceholder { asset: Some("rbxassetid://42".into()) },
                Content::Image { source: "https://example.com/a.png".into() },
                Content::ImagePlaceholder { asset: None },
                Content::None,
            ]
        );
    }

    #[test]
    fn invalid_viewport_resolves_nothing() {
        assert!(resolve(&[frame("f")], Viewport::new(0.0, 600.0)).is_empty());
    }

    // ── hit testing ───────────────────────────────────────────────────────

    #[test]
    fn hit_test_prefers_the_top_most_node() {
        let forest = vec![
            frame("under").with_size(UDim2::from_offset(300.0, 300.0)).with_child(
                frame("child").with_position(UDim2::from_offset(10.0, 10.0)).with_size(UDim2::from_offset(50.0, 50.0)),
            ),
            frame("over").with_position(UDim2::from_offset(200.0, 200.0)).with_size(UDim2::from_offset(50.0, 50.0)),
        ];
        let nodes = resolve(&forest, VIEW);
        assert_eq!(hit_test(&nodes, Vec2::new(20.0, 20.0)), Some(&[0, 0][..]));
        assert_eq!(hit_test(&nodes, Vec2::new(220.0, 220.0)), Some(&[1][..]));
        assert_eq!(hit_test(&nodes, Vec2::new(150.0, 150.0)), Some(&[0][..]));
        assert_eq!(hit_test(&nodes, Vec2::new(700.0, 500.0)), None);
    }

    #[test]
    fn clipped_parts_do_not_hit() {
        let forest = vec![frame("box")
            .with_size(UDim2::from_offset(100.0, 100.0))
            .with_child(frame("spill").with_position(UDim2::from_offset(80.0, 0.0)))];
        let nodes = resolve(&forest, VIEW);
        assert_eq!(hit_test(&nodes, Vec2::new(150.0, 10.0)), None);
        assert_eq!(hit_test(&nodes, Vec2::new(90.0, 10.0)), Some(&[0, 0][..]));
    }

    #[test]
    fn nodes_serialize_to_json() {
        let nodes = resolve(&[frame("f")], VIEW);
        let json = serde_json::to_value(&nodes).unwrap();
        assert_eq!(json[0]["kind"], "Frame");
        assert_eq!(json[0]["rect"]["size"]["x"], 100.0);
        assert_eq!(json[0]["content"]["type"], "none");
    }
}
