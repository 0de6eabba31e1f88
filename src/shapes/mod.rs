// Copyright @yucwang 2026

pub mod disc;
pub mod square_plane;
