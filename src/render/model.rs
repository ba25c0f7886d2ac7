use super::{DrawContext, Palette};

/// Something that knows how to draw itself.
///
/// `draw` is called from a scene's display hook, once per frame. Models reach
/// the shared preset materials through [`DrawContext::palette`] and the solid
/// shape helpers through the context itself, so nothing shared is stored per
/// model. Deriving `Clone` on a model gives the copy semantics: owned
/// materials are duplicated, the palette stays shared.
pub trait Model {
  fn draw(&self, ctx: &mut DrawContext);
  fn palette(&self, ctx: &DrawContext) -> &'static Palette {
    ctx.palette()
  }
}

impl<M: Model + ?Sized> Model for Box<M> {
  fn draw(&self, ctx: &mut DrawContext) {
    (**self).draw(ctx)
  }
}

impl<M: Model> Model for [M] {
  fn draw(&self, ctx: &mut DrawContext) {
    for m in self {
      ctx.with_pushed_matrix(|ctx| m.draw(ctx));
    }
  }
}

#[cfg(test)]
mod model_tests {
  use super::*;
  use crate::math::Vec3;
  use crate::render::Material;

  #[derive(Debug, Clone)]
  struct Marker {
    offset: f32,
    body: Material,
  }
  impl Model for Marker {
    fn draw(&self, ctx: &mut DrawContext) {
      ctx.translate(self.offset, 0.0, 0.0);
      ctx.use_material(&self.body);
      ctx.line(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
      let palette = self.palette(ctx);
      ctx.use_material(&palette.green);
      ctx.line(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
    }
  }

  #[test]
  fn cloned_model_is_independent() {
    let original = Marker { offset: 1.0, body: Material::ORANGE };
    let mut copy = original.clone();
    copy.body.set_diffuse(0.0, 0.0, 0.0, 1.0);
    assert_eq!(original.body, Material::ORANGE);
    assert_ne!(original.body, copy.body);
  }
  #[test]
  fn model_sees_shared_palette() {
    let mut ctx = DrawContext::default();
    Marker { offset: 0.0, body: Material::RED }.draw(&mut ctx);
    assert_eq!(ctx.lines()[1].color, Palette::standard().green.diffuse());
  }
  #[test]
  fn slice_of_models_isolates_transforms() {
    let mut ctx = DrawContext::default();
    let models = vec![
      Marker { offset: 1.0, body: Material::RED },
      Marker { offset: 2.0, body: Material::BLUE },
    ];
    models.as_slice().draw(&mut ctx);
    assert_eq!(ctx.lines()[0].start, [1.0, 0.0, 0.0]);
    assert_eq!(ctx.lines()[2].start, [2.0, 0.0, 0.0]);
    assert_eq!(ctx.matrix_depth(), 1);
  }
}
