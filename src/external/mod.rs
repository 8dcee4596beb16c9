pub mod device;
pub mod google_maps;
pub mod mock;
