pub mod authcode;
pub mod capabilities;
