// THEORY:
// The authored composition is the hand-drawn scene that is always on screen: one
// black circle and six red bars, after Malevich. It is stored as static SVG path
// text and parsed into `SceneElement`s at startup, with the generated flag cleared
// so the scene can tell it apart from pipeline output.

use crate::core_modules::boundary_path::BoundaryPath;
use crate::core_modules::placement::SceneElement;
use crate::core_modules::style_mapper::HexColor;
use crate::error::PipelineError;
use glam::Vec3;

struct AuthoredShape {
    name: &'static str,
    path: &'static str,
    color: HexColor,
    position: [f32; 3],
    scale: f32,
}

const COMPOSITION: [AuthoredShape; 7] = [
    AuthoredShape {
        name: "Black Circle",
        path: "M253.867 125.376C257.372 206.493 191.207 259.57 123.178 259.57C55.1486 259.57 0 201.955 0 130.884C0 59.8129 59.8967 0.195412 127.926 0.195412C193.02 -3.81038 253.867 54.305 253.867 125.376Z",
        color: HexColor::rgb(0x00, 0x00, 0x00),
        position: [0.0, 0.0, 0.0],
        scale: 0.008,
    },
    AuthoredShape {
        name: "Red Rectangle 1",
        path: "M3.03918 73.7323L0.532891 36.6393L367.453 0.54877L370.461 37.6418L3.03918 73.7323Z",
        color: HexColor::rgb(0xff, 0x00, 0x00),
        position: [-1.5, 0.8, 0.3],
        scale: 0.006,
    },
    AuthoredShape {
        name: "Red Rectangle 2",
        path: "M0.53527 3.03335L39.061 0.531674L81.5895 645.963L47.0664 648.465L0.53527 3.03335Z",
        color: HexColor::rgb(0xcc, 0x00, 0x00),
        position: [0.5, -1.2, -0.2],
        scale: 0.004,
    },
    AuthoredShape {
        name: "Red Rectangle 3",
        path: "M0.654203 66.7893L10.6725 90.3323L158.944 23.2096L149.927 0.668397L0.654203 66.7893Z",
        color: HexColor::rgb(0xdd, 0x11, 0x11),
        position: [-2.0, -0.5, 0.6],
        scale: 0.01,
    },
    AuthoredShape {
        name: "Red Rectangle 4",
        path: "M0.672891 19.9454L11.822 44.2708L52.3643 26.0268L43.2423 0.68785L0.672891 19.9454Z",
        color: HexColor::rgb(0xee, 0x22, 0x22),
        position: [1.2, 0.3, -0.7],
        scale: 0.015,
    },
    AuthoredShape {
        name: "Red Rectangle 5",
        path: "M0.672324 93.84L4.67563 102.347L214.849 10.7714V0.763082L0.672324 93.84Z",
        color: HexColor::rgb(0xff, 0x33, 0x33),
        position: [0.8, -0.9, 0.4],
        scale: 0.008,
    },
    AuthoredShape {
        name: "Red Rectangle 6",
        path: "M0.643888 43.8924L111.768 0.649642L126.349 37.3557L15.2257 83.1125L0.643888 43.8924Z",
        color: HexColor::rgb(0xaa, 0x00, 0x00),
        position: [1.6, 0.6, -0.5],
        scale: 0.012,
    },
];

/// Parses the authored composition into scene elements.
pub fn authored_elements() -> Result<Vec<SceneElement>, PipelineError> {
    COMPOSITION
        .iter()
        .map(|shape| -> Result<SceneElement, PipelineError> {
            Ok(SceneElement {
                name: shape.name.to_string(),
                path: shape.path.parse::<BoundaryPath>()?,
                color: shape.color,
                position: Vec3::from_array(shape.position),
                scale: shape.scale,
                is_generated: false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    #[test]
    fn composition_parses_completely() {
        let elements = authored_elements().unwrap();
        assert_eq!(elements.len(), 7);
        assert!(elements.iter().all(|e| !e.is_generated));
        assert_eq!(elements[0].name, "Black Circle");
        assert_eq!(elements[0].color.to_string(), "#000000");
        assert_eq!(elements[6].color.to_string(), "#aa0000");
        assert_eq!(elements[3].position, Vec3::new(-2.0, -0.5, 0.6));
    }

    #[test]
    fn circle_is_drawn_with_cubic_curves() {
        let elements = authored_elements().unwrap();
        let cubic_count = elements[0]
            .path
            .elements()
            .iter()
            .filter(|e| matches!(e, PathEl::CurveTo(..)))
            .count();
        assert_eq!(cubic_count, 4);

        let (min, max) = elements[0].path.bounds().unwrap();
        assert!(min.x > -1.0 && min.y > -5.0);
        assert!(max.x > 250.0 && max.y > 255.0);
    }

    #[test]
    fn bars_are_closed_quadrilaterals() {
        for element in &authored_elements().unwrap()[1..] {
            let elements = element.path.elements();
            assert!(matches!(elements.first(), Some(PathEl::MoveTo(_))));
            assert_eq!(elements.last(), Some(&PathEl::ClosePath));
            assert_eq!(elements.len(), 6, "{}", element.name);
        }
    }
}
