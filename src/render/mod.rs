mod material;
pub use material::*;

mod primitives;
pub use primitives::*;

mod draw;
pub use draw::*;

mod axes;
pub use axes::*;

mod model;
pub use model::*;
