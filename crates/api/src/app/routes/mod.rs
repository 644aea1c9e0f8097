pub mod system;
pub mod usuarios;
