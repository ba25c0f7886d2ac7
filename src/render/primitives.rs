use bytemuck::{Pod, Zeroable};

use crate::math::{Vec3, PI};

/// Vertex of a local-space mesh, before it is placed by the model-view matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
  pub position: [f32; 3],
  pub normal: [f32; 3],
}
impl MeshVertex {
  fn new(position: Vec3, normal: Vec3) -> Self {
    Self { position: position.as_array(), normal: normal.normalize().as_array() }
  }
}

/// Indexed triangle-list generators for the solid shapes.
/// Cones and cylinders sit on the z = 0 plane and extend along +z.
pub struct Primitives;
impl Primitives {
  pub fn cone(base: f32, height: f32, slices: u32, stacks: u32) -> (Vec<MeshVertex>, Vec<u32>) {
    let slices = slices.max(3);
    let stacks = stacks.max(1);
    let mut verts: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // side wall, normals lean towards the apex
    let slant = f32::sqrt(base * base + height * height).max(0.00001);
    for j in 0..=stacks {
      let t = j as f32 / stacks as f32;
      let z = t * height;
      let r = base * (1.0 - t);
      for i in 0..=slices {
        let (sin, cos) = slice_angle(i, slices).sin_cos();
        let normal = Vec3::new(cos * height / slant, sin * height / slant, base / slant);
        verts.push(MeshVertex::new(Vec3::new(cos * r, sin * r, z), normal));
      }
    }
    push_grid_indices(&mut indices, 0, slices, stacks);

    // base disk facing -z
    push_disk(&mut verts, &mut indices, base, 0.0, slices, false);
    (verts, indices)
  }

  pub fn cylinder(radius: f32, height: f32, slices: u32, stacks: u32) -> (Vec<MeshVertex>, Vec<u32>) {
    let slices = slices.max(3);
    let stacks = stacks.max(1);
    let mut verts: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for j in 0..=stacks {
      let z = j as f32 / stacks as f32 * height;
      for i in 0..=slices {
        let (sin, cos) = slice_angle(i, slices).sin_cos();
        verts.push(MeshVertex::new(
          Vec3::new(cos * radius, sin * radius, z),
          Vec3::new(cos, sin, 0.0)
        ));
      }
    }
    push_grid_indices(&mut indices, 0, slices, stacks);

    // end caps
    push_disk(&mut verts, &mut indices, radius, 0.0, slices, false);
    push_disk(&mut verts, &mut indices, radius, height, slices, true);
    (verts, indices)
  }

  pub fn sphere(radius: f32, slices: u32, stacks: u32) -> (Vec<MeshVertex>, Vec<u32>) {
    let slices = slices.max(3);
    let stacks = stacks.max(2);
    let mut verts: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // rings from the south pole (-z) to the north pole (+z)
    for j in 0..=stacks {
      let phi = PI * (j as f32 / stacks as f32) - PI * 0.5;
      let (sin_phi, cos_phi) = phi.sin_cos();
      for i in 0..=slices {
        let (sin, cos) = slice_angle(i, slices).sin_cos();
        let n = Vec3::new(cos * cos_phi, sin * cos_phi, sin_phi);
        verts.push(MeshVertex::new(n * radius, n));
      }
    }
    push_grid_indices(&mut indices, 0, slices, stacks);
    (verts, indices)
  }

  pub fn cube(size: f32) -> (Vec<MeshVertex>, Vec<u32>) {
    let h = size * 0.5;
    let faces: [(Vec3, Vec3, Vec3); 6] = [
      // normal, u axis, v axis
      (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
      (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
      (Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0)),
      (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
      (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
      (Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
    ];
    let mut verts: Vec<MeshVertex> = Vec::with_capacity(24);
    let mut indices: Vec<u32> = Vec::with_capacity(36);
    for (n, u, v) in faces {
      let base = verts.len() as u32;
      let center = n * h;
      for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        verts.push(MeshVertex::new(center + u * (su * h) + v * (sv * h), n));
      }
      indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (verts, indices)
  }
}

fn slice_angle(i: u32, slices: u32) -> f32 {
  2.0 * PI * (i as f32 / slices as f32)
}

// quads between consecutive rings of (slices + 1) vertices
fn push_grid_indices(indices: &mut Vec<u32>, first: u32, slices: u32, stacks: u32) {
  let ring = slices + 1;
  for j in 0..stacks {
    for i in 0..slices {
      let a = first + j * ring + i;
      let b = a + 1;
      let c = a + ring;
      let d = c + 1;
      indices.extend_from_slice(&[a, b, d, a, d, c]);
    }
  }
}

fn push_disk(verts: &mut Vec<MeshVertex>, indices: &mut Vec<u32>, radius: f32, z: f32, slices: u32, facing_up: bool) {
  let normal = if facing_up { Vec3::new(0.0, 0.0, 1.0) } else { Vec3::new(0.0, 0.0, -1.0) };
  let center = verts.len() as u32;
  verts.push(MeshVertex::new(Vec3::new(0.0, 0.0, z), normal));
  for i in 0..=slices {
    let (sin, cos) = slice_angle(i, slices).sin_cos();
    verts.push(MeshVertex::new(Vec3::new(cos * radius, sin * radius, z), normal));
  }
  for i in 0..slices {
    let a = center + 1 + i;
    if facing_up {
      indices.extend_from_slice(&[center, a, a + 1]);
    } else {
      indices.extend_from_slice(&[center, a + 1, a]);
    }
  }
}

#[cfg(test)]
mod primitives_tests {
  use super::*;
  use approx::assert_abs_diff_eq;

  fn bounds(verts: &[MeshVertex]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for v in verts {
      for k in 0..3 {
        min[k] = min[k].min(v.position[k]);
        max[k] = max[k].max(v.position[k]);
      }
    }
    (min, max)
  }

  #[test]
  fn cone_extends_along_z() {
    let (verts, indices) = Primitives::cone(0.0625, 0.25, 10, 1);
    let (min, max) = bounds(&verts);
    assert_abs_diff_eq!(min[2], 0.0);
    assert_abs_diff_eq!(max[2], 0.25, epsilon = 1e-6);
    assert_abs_diff_eq!(max[0], 0.0625, epsilon = 1e-6);
    // 10 side quads + 10 base triangles
    assert_eq!(indices.len(), 10 * 6 + 10 * 3);
    assert!(indices.iter().all(|i| (*i as usize) < verts.len()));
  }
  #[test]
  fn cylinder_has_caps() {
    let (verts, indices) = Primitives::cylinder(0.075, 0.0312, 10, 1);
    let (min, max) = bounds(&verts);
    assert_abs_diff_eq!(min[2], 0.0);
    assert_abs_diff_eq!(max[2], 0.0312, epsilon = 1e-6);
    assert_eq!(indices.len(), 10 * 6 + 2 * 10 * 3);
    assert!(verts.iter().any(|v| v.normal == [0.0, 0.0, 1.0]));
    assert!(verts.iter().any(|v| v.normal == [0.0, 0.0, -1.0]));
  }
  #[test]
  fn degenerate_slices_are_raised() {
    let (_, indices) = Primitives::cylinder(1.0, 1.0, 0, 0);
    assert_eq!(indices.len(), 3 * 6 + 2 * 3 * 3);
  }
  #[test]
  fn sphere_normals_are_unit() {
    let (verts, _) = Primitives::sphere(2.0, 12, 8);
    for v in &verts {
      let n = Vec3::from_array(v.normal);
      assert_abs_diff_eq!(n.magnitude(), 1.0, epsilon = 1e-5);
      assert_abs_diff_eq!(Vec3::from_array(v.position).magnitude(), 2.0, epsilon = 1e-5);
    }
  }
  #[test]
  fn cube_is_centered() {
    let (verts, indices) = Primitives::cube(2.0);
    assert_eq!(verts.len(), 24);
    assert_eq!(indices.len(), 36);
    let (min, max) = bounds(&verts);
    assert_eq!(min, [-1.0, -1.0, -1.0]);
    assert_eq!(max, [1.0, 1.0, 1.0]);
  }
}
