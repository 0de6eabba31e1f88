// Copyright @yucwang 2026

pub mod cornell_box;
