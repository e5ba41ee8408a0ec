pub mod scene;
pub mod scene_decode;
pub mod story;
