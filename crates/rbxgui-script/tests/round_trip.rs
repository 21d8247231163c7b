//! Generate → extract round trips.
//!
//! The generator's output must read back to the forest it came from, for
//! hand-written scripts and for arbitrary forests alike.

use proptest::prelude::*;
use rbxgui_script::{extract, generate, Color3, Element, ElementKind, UDim2, EXAMPLE_SCRIPT};

fn round_trip(forest: &[Element]) -> Vec<Element> {
    extract(&generate(forest, "gui", "PlayerGui"))
}

// ── Fixed scenarios ───────────────────────────────────────────────────────

#[test]
fn comments_and_blank_lines_are_ignored() {
    let plain = r#"local f = Instance.new("Frame")
f.Size = UDim2.new(0.4, 0, 0.6, 0)
f.Parent = gui
"#;
    let noisy = r#"
-- header comment

local f = Instance.new("Frame") -- trailing comment
   --[[ a block
        comment ]]
f.Size = UDim2.new(0.4, 0, 0.6, 0);

	f.Parent = gui -- done
"#;
    assert_eq!(extract(plain), extract(noisy));
}

#[test]
fn rgb_colors_regenerate_to_the_same_bytes() {
    let src = "local f = Instance.new('Frame')\nf.BackgroundColor3 = Color3.fromRGB(255, 128, 0)\nf.TextColor3 = Color3.fromRGB(0, 0, 255)";
    let forest = extract(src);
    let bg = forest[0].background_color.unwrap();
    assert_eq!(bg.r, 1.0);
    assert!((bg.g - 0.502).abs() < 1e-3);
    assert_eq!(bg.b, 0.0);

    let out = generate(&forest, "gui", "PlayerGui");
    assert!(out.contains("f.BackgroundColor3 = Color3.fromRGB(255, 128, 0)"));
    assert!(out.contains("f.TextColor3 = Color3.fromRGB(0, 0, 255)"));
}

#[test]
fn unset_fields_stay_unset() {
    let forest = vec![Element::named(ElementKind::TextLabel, "t").with_text("hi")];
    let back = round_trip(&forest);
    assert_eq!(back, forest);
    assert!(back[0].size.is_none());
    assert!(back[0].text_color.is_none());
}

#[test]
fn example_script_is_a_fixpoint() {
    let forest = extract(EXAMPLE_SCRIPT);
    let once = generate(&forest, "gui", "PlayerGui");
    let twice = generate(&extract(&once), "gui", "PlayerGui");
    assert_eq!(once, twice);
}

#[test]
fn nested_scenario() {
    let forest = vec![
        Element::named(ElementKind::Frame, "panel")
            .with_size(UDim2::new(0.5, 0.0, 0.5, 0.0))
            .with_background(Color3::from_rgb(45, 45, 45))
            .with_corner_radius(6.0)
            .with_child(Element::named(ElementKind::TextLabel, "title").with_text("Title"))
            .with_child(
                Element::named(ElementKind::Frame, "row")
                    .with_child(Element::named(ElementKind::TextButton, "ok").with_text("OK"))
                    .with_child(Element::named(ElementKind::TextButton, "cancel").with_text("Cancel")),
            ),
        Element::named(ElementKind::ImageLabel, "logo").with_image("rbxassetid://123"),
    ];
    assert_eq!(round_trip(&forest), forest);
}

// ── Properties ────────────────────────────────────────────────────────────

fn arb_kind() -> impl Strategy<Value = ElementKind> {
    prop_oneof![
        4 => prop::sample::select(ElementKind::KNOWN.to_vec()),
        1 => "[A-Z][a-zA-Z]{2,10}"
            .prop_filter("container and modifier classes are not elements", |s| {
                !matches!(s.as_str(), "ScreenGui" | "SurfaceGui" | "BillboardGui" | "UICorner")
            })
            .prop_map(|s| ElementKind::from_class(&s)),
    ]
}

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,8}",
        // not identifiers: these need a `.Name` line
        "[a-zA-Z0-9 ]{1,8}",
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?'\"\\\\\n\t-]{0,16}"
}

fn arb_udim2() -> impl Strategy<Value = UDim2> {
    (-2.0f32..2.0, -500.0f32..500.0, -2.0f32..2.0, -500.0f32..500.0)
        .prop_map(|(sx, ox, sy, oy)| UDim2::new(sx, ox, sy, oy))
}

fn arb_color() -> impl Strategy<Value = Color3> {
    prop_oneof![
        any::<[u8; 3]>().prop_map(|[r, g, b]| Color3::from_rgb(r, g, b)),
        (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0).prop_map(|(r, g, b)| Color3::new(r, g, b)),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Element> {
    let head = (
        arb_kind(),
        arb_name(),
        prop::option::of(arb_udim2()),
        prop::option::of(arb_udim2()),
        prop::option::of(arb_color()),
        prop::option::of(0.0f32..=1.0),
    );
    let tail = (
        prop::option::of(0u32..16),
        prop::option::of(arb_text()),
        prop::option::of(arb_color()),
        prop::option::of(8u32..100),
        prop::option::of("rbxassetid://[0-9]{1,10}"),
        prop::option::of(0.0f32..64.0),
    );
    (head, tail).prop_map(
        |(
            (kind, name, position, size, background_color, background_transparency),
            (border_size_pixel, text, text_color, text_size, image, corner_radius),
        )| Element {
            position,
            size,
            background_color,
            background_transparency,
            border_size_pixel,
            text,
            text_color,
            text_size,
            image,
            corner_radius,
            ..Element::named(kind, name)
        },
    )
}

fn arb_forest() -> impl Strategy<Value = Vec<Element>> {
    let tree = arb_leaf().prop_recursive(3, 24, 4, |inner| {
        (arb_leaf(), prop::collection::vec(inner, 0..4)).prop_map(|(mut e, children)| {
            e.children = children;
            e
        })
    });
    prop::collection::vec(tree, 0..5)
}

proptest! {
    #[test]
    fn extract_inverts_generate(forest in arb_forest()) {
        prop_assert_eq!(round_trip(&forest), forest);
    }

    #[test]
    fn generate_is_deterministic(forest in arb_forest()) {
        prop_assert_eq!(
            generate(&forest, "gui", "PlayerGui"),
            generate(&forest, "gui", "PlayerGui")
        );
    }
}
