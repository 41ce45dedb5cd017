//! crates/rhyme_workshop_core/src/icons.rs
//!
//! The fixed watermark icon table. Shapes are polygons in unit space
//! (roughly -1.0..=1.0 on both axes, y pointing down) and are scaled by the
//! page composer.

use std::f32::consts::PI;

use crate::domain::IconName;
use crate::layout::Point;

/// A drawable icon: a list of filled polygons.
pub type IconAsset = Vec<Vec<Point>>;

/// Looks up the vector asset for `icon`. Icons without artwork return `None`.
pub fn asset(icon: IconName) -> Option<IconAsset> {
    match icon {
        IconName::Estrela => Some(vec![star(0.0, 0.0, 1.0, 0.4, 5)]),
        IconName::Coracao => Some(vec![heart()]),
        IconName::Sol => Some(sun()),
        IconName::Lua => Some(vec![crescent()]),
        IconName::Flor => Some(flower()),
        IconName::Nuvem => Some(cloud()),
        IconName::Borboleta | IconName::Nota => None,
    }
}

/// True when every polygon is closed-able and every coordinate is finite.
pub fn is_drawable(asset: &IconAsset) -> bool {
    !asset.is_empty()
        && asset
            .iter()
            .all(|shape| shape.len() >= 3 && shape.iter().all(|p| p.x.is_finite() && p.y.is_finite()))
}

/// A star with `tips` points alternating between the two radii, first tip up.
pub fn star(cx: f32, cy: f32, outer: f32, inner: f32, tips: usize) -> Vec<Point> {
    let step = PI / tips as f32;
    (0..tips * 2)
        .map(|i| {
            let angle = i as f32 * step - PI / 2.0;
            let radius = if i % 2 == 0 { outer } else { inner };
            Point::new(cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

fn circle(cx: f32, cy: f32, r: f32, segments: usize) -> Vec<Point> {
    (0..segments)
        .map(|i| {
            let angle = i as f32 * 2.0 * PI / segments as f32;
            Point::new(cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect()
}

fn heart() -> Vec<Point> {
    (0..48)
        .map(|i| {
            let t = i as f32 * 2.0 * PI / 48.0;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            Point::new(x / 17.0, -y / 17.0)
        })
        .collect()
}

fn sun() -> IconAsset {
    let mut shapes = vec![circle(0.0, 0.0, 0.5, 32)];
    for ray in 0..8 {
        let angle = ray as f32 * PI / 4.0;
        let spread = PI / 16.0;
        shapes.push(vec![
            Point::new(0.6 * (angle - spread).cos(), 0.6 * (angle - spread).sin()),
            Point::new(angle.cos(), angle.sin()),
            Point::new(0.6 * (angle + spread).cos(), 0.6 * (angle + spread).sin()),
        ]);
    }
    shapes
}

/// Outer arc on the left, inner arc back from a circle shifted right.
fn crescent() -> Vec<Point> {
    let outer = (0..=24).map(|i| {
        let angle = PI / 3.0 + i as f32 * (4.0 * PI / 3.0) / 24.0;
        Point::new(0.9 * angle.cos(), 0.9 * angle.sin())
    });
    let inner = (0..=24).rev().map(|i| {
        let angle = PI / 2.5 + i as f32 * (1.2 * PI) / 24.0;
        Point::new(0.35 + 0.7 * angle.cos(), 0.7 * angle.sin())
    });
    outer.chain(inner).collect()
}

fn flower() -> IconAsset {
    let mut shapes: IconAsset = (0..5)
        .map(|petal| {
            let angle = petal as f32 * 2.0 * PI / 5.0 - PI / 2.0;
            circle(0.6 * angle.cos(), 0.6 * angle.sin(), 0.38, 20)
        })
        .collect();
    shapes.push(circle(0.0, 0.0, 0.3, 20));
    shapes
}

fn cloud() -> IconAsset {
    vec![
        circle(-0.45, 0.1, 0.4, 24),
        circle(0.05, -0.15, 0.55, 24),
        circle(0.55, 0.15, 0.35, 24),
        vec![
            Point::new(-0.45, 0.1),
            Point::new(0.55, 0.1),
            Point::new(0.55, 0.5),
            Point::new(-0.45, 0.5),
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawable_icons_produce_valid_polygons() {
        for icon in IconName::ALL {
            if let Some(shapes) = asset(icon) {
                assert!(is_drawable(&shapes), "{} is not drawable", icon.as_str());
            }
        }
    }

    #[test]
    fn icons_without_artwork_have_no_asset() {
        assert!(asset(IconName::Borboleta).is_none());
        assert!(asset(IconName::Nota).is_none());
    }

    #[test]
    fn degenerate_assets_are_rejected() {
        assert!(!is_drawable(&vec![vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]]));
        assert!(!is_drawable(&vec![vec![
            Point::new(0.0, 0.0),
            Point::new(f32::NAN, 1.0),
            Point::new(1.0, 0.0)
        ]]));
        assert!(!is_drawable(&Vec::new()));
    }

    #[test]
    fn ten_point_star_alternates_radii() {
        let points = star(0.0, 0.0, 10.0, 4.0, 5);
        assert_eq!(points.len(), 10);
        assert!((points[0].y + 10.0).abs() < 1e-4);
        let r1 = (points[1].x.powi(2) + points[1].y.powi(2)).sqrt();
        assert!((r1 - 4.0).abs() < 1e-4);
    }
}
