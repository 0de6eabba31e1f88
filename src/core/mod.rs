// Copyright @yucwang 2021

pub mod bvh;
pub mod bxdf;
pub mod config;
pub mod integrator;
pub mod interaction;
pub mod material;
pub mod rng;
pub mod sensor;
pub mod scene;
pub mod shape;
pub mod texture;
