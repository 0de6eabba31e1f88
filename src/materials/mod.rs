// Copyright @yucwang 2026

pub mod blinn_microfacet;
pub mod diffuse_transmission;
pub mod lambertian_diffuse;
pub mod microfacet;
