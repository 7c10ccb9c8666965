//! UI module - small widgets shared by the views

pub mod components;
