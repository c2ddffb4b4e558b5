//! Shape generation for the ball sprite

use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Triangle fan for a unit disc, scaled by the ball radius in the shader.
///
/// Vertex 0 is the center; rim vertices run counter-clockwise and the last
/// one repeats the first angle so the fan closes. Texture coordinates map the
/// disc onto the full image, top of the image at the top of the disc.
pub fn disc_mesh(segments: u32) -> (Vec<Vertex>, Vec<u32>) {
    let segments = segments.max(3);
    let step = TAU / segments as f32;

    let mut vertices = Vec::with_capacity(segments as usize + 2);
    vertices.push(Vertex::new(0.0, 0.0, 0.5, 0.5));
    for i in 0..=segments {
        let (sin, cos) = (i as f32 * step).sin_cos();
        // Texture v grows downward
        vertices.push(Vertex::new(cos, sin, cos * 0.5 + 0.5, 0.5 - sin * 0.5));
    }

    let mut indices = Vec::with_capacity(segments as usize * 3);
    for i in 0..segments {
        indices.extend_from_slice(&[0, i + 1, i + 2]);
    }

    (vertices, indices)
}
