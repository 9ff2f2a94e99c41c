//! Skin assessment service: accepts front/left/right face photos and relays a
//! multimodal model's dermatology assessment.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
