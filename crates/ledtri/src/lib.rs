#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use ledtri_3d as k3d;

#[doc(inline)]
pub use ledtri_camera as camera;

#[doc(inline)]
pub use ledtri_match as matching;
