// Copyright @yucwang 2026

pub mod direct;
pub mod mis;
pub mod path;
