pub mod transport;
pub mod wav;
