//! Core scene data model

pub mod entity;
