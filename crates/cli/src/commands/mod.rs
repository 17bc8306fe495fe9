pub mod bench;
pub mod selftest;
