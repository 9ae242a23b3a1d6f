pub mod f32;
pub mod io;
pub mod stack;
pub mod tile;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::stack::ImageStack;
pub use self::tile::ImageTile;
pub use self::traits::{ImageView, ImageViewMut, Rows};
