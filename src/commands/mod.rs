pub mod trim_pe;
