use bytemuck::{Pod, Zeroable};

use crate::math::Vec3;
use crate::render::LineSegment;

mod lifecycle;
pub use lifecycle::*;

mod root;
pub use root::*;

// --- --- --- --- --- --- --- --- //
// --- ---   GPU Objects   --- --- //
// --- --- --- --- --- --- --- --- //

/// Per-frame uniform shared by both pipelines.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
  pub projection: [f32; 16],
  /// width, height, lighting flag, unused
  pub viewport: [f32; 4],
}

/// One corner of a line quad. The vertex shader offsets it sideways in
/// screen space by half the line width.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
  pub start: [f32; 3],
  pub end: [f32; 3],
  pub color: [f32; 4],
  /// end selector (0 or 1), side (-1 or 1), width in pixels
  pub params: [f32; 3],
}

// two triangles per segment
const LINE_CORNERS: [(f32, f32); 6] = [
  (0.0, -1.0), (1.0, -1.0), (1.0, 1.0),
  (0.0, -1.0), (1.0, 1.0), (0.0, 1.0),
];

// eye-space depth both endpoints are cut to, keeps clip w positive
const LINE_CLIP_Z: f32 = -1e-4;

/// Cuts a segment to the half-space in front of the eye. Returns None when it
/// lies entirely behind.
pub fn clip_to_front(seg: &LineSegment) -> Option<LineSegment> {
  let (za, zb) = (seg.start[2], seg.end[2]);
  match (za <= LINE_CLIP_Z, zb <= LINE_CLIP_Z) {
    (true, true) => Some(*seg),
    (false, false) => None,
    (start_in_front, _) => {
      let a = Vec3::from_array(seg.start);
      let b = Vec3::from_array(seg.end);
      let t = (LINE_CLIP_Z - za) / (zb - za);
      let mut cut = (a + (b - a) * t).as_array();
      cut[2] = LINE_CLIP_Z;
      let mut out = *seg;
      if start_in_front { out.end = cut } else { out.start = cut }
      Some(out)
    }
  }
}

/// Expands recorded segments into a non-indexed triangle list. Segments are
/// clipped in front of the eye first.
pub fn expand_lines(lines: &[LineSegment]) -> Vec<LineVertex> {
  let mut out = Vec::with_capacity(lines.len() * LINE_CORNERS.len());
  for seg in lines.iter().filter_map(clip_to_front) {
    for (t, side) in LINE_CORNERS {
      out.push(LineVertex {
        start: seg.start,
        end: seg.end,
        color: seg.color,
        params: [t, side, seg.width],
      });
    }
  }
  out
}

#[cfg(test)]
mod renderer_tests {
  use super::*;

  #[test]
  fn uniforms_match_shader_layout() {
    assert_eq!(std::mem::size_of::<FrameUniforms>(), 80);
    assert_eq!(std::mem::size_of::<LineVertex>(), 52);
  }
  fn segment(start: [f32; 3], end: [f32; 3]) -> LineSegment {
    LineSegment { start, end, color: [1.0; 4], width: 3.0 }
  }

  #[test]
  fn segments_become_quads() {
    let seg = segment([0.0, 0.0, -1.0], [1.0, 0.0, -1.0]);
    let verts = expand_lines(&[seg, seg]);
    assert_eq!(verts.len(), 12);
    assert!(verts.iter().all(|v| v.params[2] == 3.0 && v.end == [1.0, 0.0, -1.0]));
    // each quad touches both ends on both sides
    let quad = &verts[..6];
    for (t, side) in [(0.0, -1.0), (0.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
      assert!(quad.iter().any(|v| v.params[0] == t && v.params[1] == side));
    }
  }
  #[test]
  fn segment_through_eye_is_cut() {
    let seg = segment([0.0, 0.0, -5.0], [0.0, 0.0, 5.0]);
    let cut = clip_to_front(&seg).unwrap();
    assert_eq!(cut.start, seg.start);
    assert_eq!(cut.end, [0.0, 0.0, LINE_CLIP_Z]);
    // the other direction keeps the end
    let cut = clip_to_front(&segment([2.0, 0.0, 3.0], [0.0, 0.0, -3.0])).unwrap();
    assert_eq!(cut.end, [0.0, 0.0, -3.0]);
    assert!((cut.start[0] - 1.0).abs() < 1e-3);
    assert!(cut.start[2] < 0.0);
  }
  #[test]
  fn segment_behind_eye_is_dropped() {
    let behind = segment([0.0, 0.0, 1.0], [1.0, 0.0, 2.0]);
    assert!(clip_to_front(&behind).is_none());
    let verts = expand_lines(&[behind, segment([0.0, 0.0, -1.0], [0.0, 1.0, -1.0])]);
    assert_eq!(verts.len(), 6);
    assert!(verts.iter().all(|v| v.start[2] < 0.0 && v.end[2] < 0.0));
  }
  #[test]
  fn no_segments_no_vertices() {
    assert!(expand_lines(&[]).is_empty());
  }
}
