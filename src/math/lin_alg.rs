use std::ops::{Add, Mul, Sub};

pub const PI: f32 = std::f32::consts::PI;

/**
 * Note: These matrices are in column major order, as per wgpu requirements.
 * `Mat4::multiply(a, b)` yields `a * b`, so transforms read right to left.
 */
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Mat4 {
  data: [f32; 16],
}
impl Default for Mat4 {
  fn default() -> Self {
    Self::identity()
  }
}
impl Mat4 {
  pub const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
  ];
  // util fns
  pub fn identity() -> Self {
    Self { data: Self::IDENTITY }
  }
  pub fn from_col_major(arr: [f32; 16]) -> Self {
    Self { data: arr }
  }
  pub fn post_multiply(&mut self, rhs: &[f32; 16]) {
    self.data = Mat4::multiply(&self.data, rhs);
  }
  pub fn transform_point(&self, p: Vec3) -> Vec3 {
    let out = Mat4::multiply_vec4(&self.data, &[p.x, p.y, p.z, 1.0]);
    if out[3] != 0.0 && out[3] != 1.0 {
      return Vec3::new(out[0] / out[3], out[1] / out[3], out[2] / out[3]);
    }
    Vec3::new(out[0], out[1], out[2])
  }
  // directions ignore translation
  pub fn transform_vector(&self, v: Vec3) -> Vec3 {
    let out = Mat4::multiply_vec4(&self.data, &[v.x, v.y, v.z, 0.0]);
    Vec3::new(out[0], out[1], out[2])
  }
  pub fn transform_normal(&self, n: Vec3) -> Vec3 {
    self.transform_vector(n).normalize()
  }
  // matrix transforms
  pub fn perspective(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> [f32; 16] {
    let f = f32::tan(PI * 0.5 - 0.5 * fov_y * PI / 180.0);
    let range = 1.0 / (near - far);
    let a = f / aspect_ratio;
    let c = far * range;
    let d = near * far * range;
    [
      a, 0.0, 0.0, 0.0,
      0.0, f, 0.0, 0.0,
      0.0, 0.0, c, -1.0,
      0.0, 0.0, d, 0.0
    ]
  }
  pub fn translate(x: f32, y: f32, z: f32) -> [f32; 16] {
    [
      1.0, 0.0, 0.0, 0.0,
      0.0, 1.0, 0.0, 0.0,
      0.0, 0.0, 1.0, 0.0,
      x, y, z, 1.0
    ]
  }
  pub fn rotate(axis: &Vec3, deg: f32) -> [f32; 16] {
    // zero-length axis leaves the matrix untouched
    let n = axis.magnitude();
    if n < 0.00001 {
      return Self::IDENTITY;
    }
    let x = axis.x / n;
    let y = axis.y / n;
    let z = axis.z / n;
    // helpers
    let xx = x * x;
    let yy = y * y;
    let zz = z * z;
    let c = f32::cos(deg * PI / 180.0);
    let s = f32::sin(deg * PI / 180.0);
    let o = 1.0 - c;
    [
      xx + (1.0 - xx) * c,
      x * y * o + z * s,
      x * z * o - y * s,
      0.0,

      x * y * o - z * s,
      yy + (1.0 - yy) * c,
      y * z * o + x * s,
      0.0,

      x * z * o + y * s,
      y * z * o - x * s,
      zz + (1.0 - zz) * c,
      0.0,

      0.0,
      0.0,
      0.0,
      1.0
    ]
  }
  pub fn scale(x: f32, y: f32, z: f32) -> [f32; 16] {
    [
      x, 0.0, 0.0, 0.0,
      0.0, y, 0.0, 0.0,
      0.0, 0.0, z, 0.0,
      0.0, 0.0, 0.0, 1.0
    ]
  }
  pub fn multiply(a: &[f32; 16], b: &[f32; 16]) -> [f32; 16] {
    let mut dst = [0.0; 16];
    for col in 0..4 {
      for row in 0..4 {
        let mut sum = 0.0;
        for k in 0..4 {
          sum += a[k * 4 + row] * b[col * 4 + k];
        }
        dst[col * 4 + row] = sum;
      }
    }
    dst
  }
  pub fn multiply_vec4(mat: &[f32; 16], vec: &[f32; 4]) -> [f32; 4] {
    let mut out = [0.0; 4];
    for i in 0..4 {
      for j in 0..4 {
        out[i] += mat[j * 4 + i] * vec[j];
      }
    }
    out
  }
}

#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct Vec3 {
  pub x: f32,
  pub y: f32,
  pub z: f32,
}
impl Vec3 {
  pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
  pub fn new(x: f32, y: f32, z: f32) -> Vec3 {
    Self { x, y, z }
  }
  pub fn from_array(arr: [f32; 3]) -> Self {
    Self { x: arr[0], y: arr[1], z: arr[2] }
  }
  pub fn as_array(&self) -> [f32; 3] {
    [self.x, self.y, self.z]
  }
  pub fn cross(&self, rhs: Vec3) -> Vec3 {
    Vec3::new(
      self.y * rhs.z - self.z * rhs.y,
      self.z * rhs.x - self.x * rhs.z,
      self.x * rhs.y - self.y * rhs.x
    )
  }
  pub fn normalize(&self) -> Vec3 {
    let n = self.magnitude();
    if n < 0.00001 { return Vec3::ZERO };
    Vec3::new(self.x / n, self.y / n, self.z / n)
  }
  pub fn magnitude(&self) -> f32 {
    f32::sqrt(self.x * self.x + self.y * self.y + self.z * self.z)
  }
}
impl Add for Vec3 {
  type Output = Vec3;
  fn add(self, rhs: Self) -> Self::Output {
    Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
  }
}
impl Sub for Vec3 {
  type Output = Vec3;
  fn sub(self, rhs: Self) -> Self::Output {
    Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
  }
}
impl Mul<f32> for Vec3 {
  type Output = Vec3;
  fn mul(self, rhs: f32) -> Self::Output {
    Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
  }
}

#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct Vec2 { pub x: f32, pub y: f32 }
impl Vec2 {
  pub fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }
}
impl Sub for Vec2 {
  type Output = Vec2;
  fn sub(self, rhs: Self) -> Self::Output {
    Vec2::new(self.x - rhs.x, self.y - rhs.y)
  }
}

#[cfg(test)]
mod lin_alg_tests {
  use super::*;
  use approx::assert_abs_diff_eq;

  fn assert_vec3_eq(a: Vec3, b: Vec3) {
    assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-5);
    assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-5);
    assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-5);
  }

  #[test]
  fn mat4_persp() {
    let o = Mat4::perspective(80.0, 1.5, 1.0, 1000.0);
    let ans: [f32; 16] = [
      0.79450244, 0.0, 0.0, 0.0,
      0.0, 1.1917536, 0.0, 0.0,
      0.0, 0.0, -1.001001, -1.0,
      0.0, 0.0, -1.001001, 0.0,
    ];
    for i in 0..16 {
      assert_abs_diff_eq!(o[i], ans[i], epsilon = 1e-5);
    }
  }
  #[test]
  fn mat4_persp_depth_range() {
    let proj = Mat4::from_col_major(Mat4::perspective(45.0, 1.0, 0.1, 100.0));
    let near = proj.transform_point(Vec3::new(0.0, 0.0, -0.1));
    let far = proj.transform_point(Vec3::new(0.0, 0.0, -100.0));
    assert_abs_diff_eq!(near.z, 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-4);
  }
  #[test]
  fn mat4_rotate_y_maps_z_to_x() {
    let r = Mat4::from_col_major(Mat4::rotate(&Vec3::new(0.0, 1.0, 0.0), 90.0));
    assert_vec3_eq(r.transform_point(Vec3::new(0.0, 0.0, 1.0)), Vec3::new(1.0, 0.0, 0.0));
  }
  #[test]
  fn mat4_rotate_neg_x_maps_z_to_y() {
    let r = Mat4::from_col_major(Mat4::rotate(&Vec3::new(-1.0, 0.0, 0.0), 90.0));
    assert_vec3_eq(r.transform_point(Vec3::new(0.0, 0.0, 1.0)), Vec3::new(0.0, 1.0, 0.0));
  }
  #[test]
  fn mat4_rotate_zero_axis() {
    assert_eq!(Mat4::rotate(&Vec3::ZERO, 45.0), Mat4::IDENTITY);
  }
  #[test]
  fn mat4_multiply_order() {
    // translate after rotate: point is rotated first, then moved
    let t = Mat4::translate(5.0, 0.0, 0.0);
    let r = Mat4::rotate(&Vec3::new(0.0, 1.0, 0.0), 90.0);
    let m = Mat4::from_col_major(Mat4::multiply(&t, &r));
    assert_vec3_eq(m.transform_point(Vec3::new(0.0, 0.0, 1.0)), Vec3::new(6.0, 0.0, 0.0));
  }
  #[test]
  fn mat4_normal_ignores_translation() {
    let mut m = Mat4::identity();
    m.post_multiply(&Mat4::translate(3.0, 4.0, 5.0));
    m.post_multiply(&Mat4::scale(2.0, 2.0, 2.0));
    assert_vec3_eq(m.transform_normal(Vec3::new(0.0, 1.0, 0.0)), Vec3::new(0.0, 1.0, 0.0));
  }
}
